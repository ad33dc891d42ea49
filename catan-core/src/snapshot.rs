//! Game-state snapshots as reported by the server.
//!
//! The layout mirrors the reply JSON one-to-one. Enumerated names (terrain,
//! resources, ports) are deliberately kept as strings: mapping them onto the
//! canonical tables is the codec's job, so an unknown name surfaces as a
//! [`SchemaViolation`] from [`crate::schema::ObservationSchema::encode`].

use crate::error::SchemaViolation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name → count map as sent by the server (resources, development cards).
pub type CountMap = BTreeMap<String, i64>;

/// One immutable point-in-time view of the full game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Whether the server accepted the command that produced this snapshot.
    pub last_action_successful: bool,
    pub game: GameState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    pub bank: Bank,
    pub players: Vec<Player>,
    pub current_player_id: usize,
    /// `None` before the first roll.
    #[serde(default)]
    pub previous_dice_roll: Option<i64>,
    pub game_ended: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub tiles: Vec<Tile>,
    pub edges: Vec<Edge>,
    pub nodes: Vec<Node>,
    pub ports: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub terrain: String,
    /// Number token; `None` (or 0) on the desert.
    #[serde(default)]
    pub chit: Option<i64>,
    #[serde(default)]
    pub has_robber: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(default)]
    pub position: usize,
    pub building: Option<Building>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(default)]
    pub position: usize,
    pub building: Option<Building>,
}

/// A piece on the board: `(position, owning player id)`.
///
/// Externally tagged, so a node can never hold a settlement and a city at
/// once; a reply that tries fails to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Building {
    Settlement(usize, usize),
    City(usize, usize),
    Road(usize, usize),
}

impl Building {
    pub fn owner(&self) -> usize {
        match *self {
            Building::Settlement(_, owner) | Building::City(_, owner) | Building::Road(_, owner) => {
                owner
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Building::Settlement(..) => "settlement",
            Building::City(..) => "city",
            Building::Road(..) => "road",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bank {
    pub resource_cards: CountMap,
    /// Remaining development deck.
    pub development_cards: Vec<String>,
    /// Draw pointer into `development_cards` when the server sends the full deck.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub development_card_pointer: Option<usize>,
}

impl Bank {
    /// Cards still drawable from the development deck.
    pub fn development_deck_size(&self) -> usize {
        let pointer = self.development_card_pointer.unwrap_or(0);
        self.development_cards.len().saturating_sub(pointer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub victory_points: i64,
    pub num_knights_played: i64,
    pub num_unplaced_cities: i64,
    pub num_unplaced_settlements: i64,
    pub num_unplaced_roads: i64,
    pub resource_cards: CountMap,
    pub development_cards: CountMap,
    pub development_cards_drawn_this_turn: CountMap,
    pub longest_road: bool,
    pub largest_army: bool,
}

/// Look up a fixed key in one of the server's count maps.
pub fn count(map: &CountMap, map_name: &'static str, key: &str) -> Result<i64, SchemaViolation> {
    map.get(key)
        .copied()
        .ok_or_else(|| SchemaViolation::MissingKey {
            map: map_name,
            key: key.to_string(),
        })
}

impl GameSnapshot {
    /// Decode a raw server reply.
    pub fn from_json(reply: &str) -> Result<Self, SchemaViolation> {
        Ok(serde_json::from_str(reply)?)
    }

    pub fn to_json(&self) -> Result<String, SchemaViolation> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn player(&self, id: usize) -> Result<&Player, SchemaViolation> {
        self.game
            .players
            .get(id)
            .ok_or(SchemaViolation::PlayerOutOfRange {
                id,
                players: self.game.players.len(),
            })
    }

    /// The player whose turn it is.
    pub fn current_player(&self) -> Result<&Player, SchemaViolation> {
        self.player(self.game.current_player_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::SnapshotBuilder;

    #[test]
    fn test_building_is_externally_tagged() {
        let b: Building = serde_json::from_str(r#"{"Road": [12, 2]}"#).unwrap();
        assert_eq!(b, Building::Road(12, 2));
        assert_eq!(b.owner(), 2);
    }

    #[test]
    fn test_settlement_and_city_on_one_node_rejected() {
        let err = serde_json::from_str::<Node>(
            r#"{"position": 4, "building": {"Settlement": [4, 0], "City": [4, 1]}}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_deck_size_honors_pointer() {
        let mut bank = Bank {
            resource_cards: CountMap::new(),
            development_cards: vec!["Knight".to_string(); 25],
            development_card_pointer: None,
        };
        assert_eq!(bank.development_deck_size(), 25);
        bank.development_card_pointer = Some(7);
        assert_eq!(bank.development_deck_size(), 18);
        bank.development_card_pointer = Some(40);
        assert_eq!(bank.development_deck_size(), 0);
    }

    #[test]
    fn test_json_roundtrip_through_builder() {
        let snapshot = SnapshotBuilder::new().current_player(2).dice(9).build();
        let json = snapshot.to_json().unwrap();
        assert!(json.contains("\"last_action_successful\""));
        assert_eq!(GameSnapshot::from_json(&json).unwrap(), snapshot);
    }

    #[test]
    fn test_missing_top_level_key_is_malformed() {
        let err = GameSnapshot::from_json(r#"{"game": {}}"#).unwrap_err();
        assert!(matches!(err, SchemaViolation::Malformed(_)));
    }

    #[test]
    fn test_current_player_out_of_range() {
        let snapshot = SnapshotBuilder::new().current_player(9).build();
        assert_eq!(
            snapshot.current_player().unwrap_err(),
            SchemaViolation::PlayerOutOfRange { id: 9, players: 4 }
        );
    }
}
