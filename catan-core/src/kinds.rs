//! Canonical lookup tables.
//!
//! Every enumeration that crosses the wire or lands in an observation slot is
//! defined once here with an explicit integer code. Encoders, decoders and
//! tests all go through these tables.

use crate::error::SchemaViolation;
use serde::{Deserialize, Serialize};

macro_rules! code_table {
    (
        $(#[$meta:meta])*
        $name:ident, $table:literal {
            $($variant:ident = $code:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// All variants in code order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Number of variants.
            pub const COUNT: usize = Self::ALL.len();

            pub fn code(self) -> u32 {
                match self {
                    $($name::$variant => $code),+
                }
            }

            pub fn from_code(code: u32) -> Option<Self> {
                match code {
                    $($code => Some($name::$variant),)+
                    _ => None,
                }
            }

            /// Name as it appears on the wire.
            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }

            pub fn from_name(name: &str) -> Result<Self, SchemaViolation> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.name() == name)
                    .ok_or_else(|| SchemaViolation::UnknownName {
                        table: $table,
                        name: name.to_string(),
                    })
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

code_table! {
    /// Tile terrain, in observation code order.
    Terrain, "terrain" {
        Desert = 0,
        Forest = 1,
        Hills = 2,
        Fields = 3,
        Plains = 4,
        Mountains = 5,
    }
}

code_table! {
    /// Resource cards. Code order is also the slot order for bank and hand counts.
    ResourceKind, "resource" {
        Lumber = 0,
        Ore = 1,
        Brick = 2,
        Wheat = 3,
        Sheep = 4,
    }
}

code_table! {
    /// Development cards. Code order is the slot order for the hand block.
    DevCardKind, "development card" {
        YearOfPlenty = 0,
        Knight = 1,
        RoadBuilding = 2,
        Monopoly = 3,
        VictoryPoint = 4,
    }
}

code_table! {
    /// Harbor kinds. Resource ports share the resource codes; `ThreeToOne` is generic.
    PortKind, "port" {
        Lumber = 0,
        Ore = 1,
        Brick = 2,
        Wheat = 3,
        Sheep = 4,
        ThreeToOne = 5,
    }
}

code_table! {
    /// Action kinds selected by slot 0 of the action vector.
    ActionKind, "action" {
        RollDice = 0,
        PlaceRobber = 1,
        PlaySettlement = 2,
        PlayRoad = 3,
        PlayCity = 4,
        OfferTrade = 5,
        AcceptTrade = 6,
        DeclineTrade = 7,
        PlayDevelopmentCard = 8,
        DrawDevelopmentCard = 9,
        Discard = 10,
        EndTurn = 11,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_dense_and_ordered() {
        for (i, kind) in ActionKind::ALL.iter().enumerate() {
            assert_eq!(kind.code() as usize, i);
            assert_eq!(ActionKind::from_code(i as u32), Some(*kind));
        }
        assert_eq!(ActionKind::COUNT, 12);
        assert_eq!(ActionKind::from_code(12), None);
    }

    #[test]
    fn test_terrain_codes() {
        assert_eq!(Terrain::Desert.code(), 0);
        assert_eq!(Terrain::Mountains.code(), 5);
        assert_eq!(Terrain::from_name("Hills"), Ok(Terrain::Hills));
    }

    #[test]
    fn test_unknown_name_is_schema_violation() {
        let err = Terrain::from_name("Lava").unwrap_err();
        assert_eq!(
            err,
            SchemaViolation::UnknownName {
                table: "terrain",
                name: "Lava".to_string()
            }
        );
    }

    #[test]
    fn test_ports_share_resource_codes() {
        for resource in ResourceKind::ALL {
            let port = PortKind::from_name(resource.name()).unwrap();
            assert_eq!(port.code(), resource.code());
        }
        assert_eq!(PortKind::ThreeToOne.code(), 5);
    }

    #[test]
    fn test_action_kind_serializes_as_name() {
        let json = serde_json::to_string(&ActionKind::DrawDevelopmentCard).unwrap();
        assert_eq!(json, "\"DrawDevelopmentCard\"");
    }
}
