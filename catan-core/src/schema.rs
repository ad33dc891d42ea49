//! Observation schema and state encoding.
//!
//! The schema is one ordered table of [`Slot`]s. The space declaration
//! ([`ObservationSchema::space`]) and the encoder ([`ObservationSchema::encode`])
//! both walk the same table, so slot order and bounds cannot drift apart.
//!
//! # Layout (reference board, 272 slots)
//!
//! | block | slots | values |
//! |-------|-------|--------|
//! | tiles | 19 × 2 | terrain code, chit (0 = none) |
//! | bank resources | 5 | count per resource |
//! | bank development deck | 1 | cards left |
//! | current player's resources | 5 | count per resource |
//! | current player's development cards | 5 | count per kind |
//! | edges | 72 | 0 = empty, else owner + 1 |
//! | settlements | 54 | 0 = empty or city, else owner + 1 |
//! | cities | 54 | 0 = empty or settlement, else owner + 1 |
//! | ports | 9 | port code |
//! | per-player metadata | 4 × 7 | VP, knights, cities/settlements/roads left, longest road, largest army |
//! | dice | 1 | previous roll (0 = none) |

use crate::config::BoardTopology;
use crate::error::SchemaViolation;
use crate::kinds::{DevCardKind, PortKind, ResourceKind, Terrain};
use crate::snapshot::{count, Building, GameSnapshot};
use crate::space::MultiDiscrete;

/// Encoded observation, one value per schema slot.
pub type Observation = Vec<u32>;

/// Per-player metadata fields, in slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerStat {
    VictoryPoints,
    KnightsPlayed,
    CitiesLeft,
    SettlementsLeft,
    RoadsLeft,
    LongestRoad,
    LargestArmy,
}

impl PlayerStat {
    pub const ALL: [PlayerStat; 7] = [
        PlayerStat::VictoryPoints,
        PlayerStat::KnightsPlayed,
        PlayerStat::CitiesLeft,
        PlayerStat::SettlementsLeft,
        PlayerStat::RoadsLeft,
        PlayerStat::LongestRoad,
        PlayerStat::LargestArmy,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PlayerStat::VictoryPoints => "victory_points",
            PlayerStat::KnightsPlayed => "knights_played",
            PlayerStat::CitiesLeft => "cities_left",
            PlayerStat::SettlementsLeft => "settlements_left",
            PlayerStat::RoadsLeft => "roads_left",
            PlayerStat::LongestRoad => "longest_road",
            PlayerStat::LargestArmy => "largest_army",
        }
    }

    fn cardinality(self) -> u32 {
        match self {
            PlayerStat::VictoryPoints => 13,
            PlayerStat::KnightsPlayed => 15,
            PlayerStat::CitiesLeft => 5,
            PlayerStat::SettlementsLeft => 6,
            PlayerStat::RoadsLeft => 16,
            PlayerStat::LongestRoad | PlayerStat::LargestArmy => 2,
        }
    }
}

/// One fixed-position entry of the observation vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    TileTerrain(usize),
    TileChit(usize),
    BankResource(ResourceKind),
    BankDevelopmentDeck,
    HandResource(ResourceKind),
    HandDevCard(DevCardKind),
    Road(usize),
    Settlement(usize),
    City(usize),
    Port(usize),
    Player(usize, PlayerStat),
    DiceRoll,
}

/// Owner channel value: 0 for none, owner + 1 otherwise.
fn owner_code(owner: usize) -> i64 {
    owner as i64 + 1
}

fn flag(value: bool) -> i64 {
    i64::from(value)
}

impl Slot {
    /// Number of distinct values; valid values are `0..cardinality`.
    pub fn cardinality(&self) -> u32 {
        match self {
            Slot::TileTerrain(_) => Terrain::COUNT as u32,
            Slot::TileChit(_) => 13,
            Slot::BankResource(_) => 20,
            Slot::BankDevelopmentDeck => 26,
            Slot::HandResource(_) | Slot::HandDevCard(_) => 20,
            Slot::Road(_) | Slot::Settlement(_) | Slot::City(_) => 6,
            Slot::Port(_) => PortKind::COUNT as u32,
            Slot::Player(_, stat) => stat.cardinality(),
            Slot::DiceRoll => 13,
        }
    }

    /// Inclusive upper bound.
    pub fn max_value(&self) -> u32 {
        self.cardinality() - 1
    }

    pub fn name(&self) -> String {
        match self {
            Slot::TileTerrain(i) => format!("tile[{i}].terrain"),
            Slot::TileChit(i) => format!("tile[{i}].chit"),
            Slot::BankResource(r) => format!("bank.{r}"),
            Slot::BankDevelopmentDeck => "bank.development_deck".to_string(),
            Slot::HandResource(r) => format!("hand.{r}"),
            Slot::HandDevCard(d) => format!("hand.{d}"),
            Slot::Road(i) => format!("edge[{i}]"),
            Slot::Settlement(i) => format!("settlement[{i}]"),
            Slot::City(i) => format!("city[{i}]"),
            Slot::Port(i) => format!("port[{i}]"),
            Slot::Player(p, stat) => format!("player[{p}].{}", stat.name()),
            Slot::DiceRoll => "dice".to_string(),
        }
    }

    /// Raw value of this slot. Range checking is left to the schema.
    ///
    /// A list too short for this slot's index is a topology mismatch.
    pub fn extract(&self, snapshot: &GameSnapshot) -> Result<i64, SchemaViolation> {
        let game = &snapshot.game;
        let board = &game.board;
        match *self {
            Slot::TileTerrain(i) => Ok(Terrain::from_name(&at(&board.tiles, i, "tiles")?.terrain)?.code().into()),
            Slot::TileChit(i) => Ok(at(&board.tiles, i, "tiles")?.chit.unwrap_or(0)),
            Slot::BankResource(r) => count(&game.bank.resource_cards, "bank.resource_cards", r.name()),
            Slot::BankDevelopmentDeck => Ok(game.bank.development_deck_size() as i64),
            Slot::HandResource(r) => count(
                &snapshot.current_player()?.resource_cards,
                "player.resource_cards",
                r.name(),
            ),
            Slot::HandDevCard(d) => count(
                &snapshot.current_player()?.development_cards,
                "player.development_cards",
                d.name(),
            ),
            Slot::Road(i) => match at(&board.edges, i, "edges")?.building {
                None => Ok(0),
                Some(Building::Road(_, owner)) => Ok(owner_code(owner)),
                Some(other) => Err(SchemaViolation::UnexpectedBuilding {
                    building: other.label(),
                    location: format!("edge {i}"),
                }),
            },
            Slot::Settlement(i) => match node_building(snapshot, i)? {
                Some(Building::Settlement(_, owner)) => Ok(owner_code(owner)),
                _ => Ok(0),
            },
            Slot::City(i) => match node_building(snapshot, i)? {
                Some(Building::City(_, owner)) => Ok(owner_code(owner)),
                _ => Ok(0),
            },
            Slot::Port(i) => Ok(PortKind::from_name(at(&board.ports, i, "ports")?)?.code().into()),
            Slot::Player(p, stat) => {
                let player = snapshot.player(p)?;
                Ok(match stat {
                    PlayerStat::VictoryPoints => player.victory_points,
                    PlayerStat::KnightsPlayed => player.num_knights_played,
                    PlayerStat::CitiesLeft => player.num_unplaced_cities,
                    PlayerStat::SettlementsLeft => player.num_unplaced_settlements,
                    PlayerStat::RoadsLeft => player.num_unplaced_roads,
                    PlayerStat::LongestRoad => flag(player.longest_road),
                    PlayerStat::LargestArmy => flag(player.largest_army),
                })
            }
            Slot::DiceRoll => Ok(game.previous_dice_roll.unwrap_or(0)),
        }
    }
}

fn at<'a, T>(list: &'a [T], i: usize, what: &'static str) -> Result<&'a T, SchemaViolation> {
    list.get(i).ok_or(SchemaViolation::TopologyMismatch {
        what,
        expected: i + 1,
        actual: list.len(),
    })
}

/// A node's building, rejecting roads. Settlement and city channels both read through here.
fn node_building(snapshot: &GameSnapshot, i: usize) -> Result<Option<Building>, SchemaViolation> {
    match at(&snapshot.game.board.nodes, i, "nodes")?.building {
        Some(road @ Building::Road(..)) => Err(SchemaViolation::UnexpectedBuilding {
            building: road.label(),
            location: format!("node {i}"),
        }),
        building => Ok(building),
    }
}

/// The ordered slot table for one board topology.
#[derive(Debug, Clone)]
pub struct ObservationSchema {
    topology: BoardTopology,
    slots: Vec<Slot>,
}

impl ObservationSchema {
    pub fn new(topology: BoardTopology) -> Self {
        let mut slots = Vec::new();
        for i in 0..topology.tiles {
            slots.push(Slot::TileTerrain(i));
            slots.push(Slot::TileChit(i));
        }
        slots.extend(ResourceKind::ALL.iter().map(|&r| Slot::BankResource(r)));
        slots.push(Slot::BankDevelopmentDeck);
        slots.extend(ResourceKind::ALL.iter().map(|&r| Slot::HandResource(r)));
        slots.extend(DevCardKind::ALL.iter().map(|&d| Slot::HandDevCard(d)));
        slots.extend((0..topology.edges).map(Slot::Road));
        slots.extend((0..topology.nodes).map(Slot::Settlement));
        slots.extend((0..topology.nodes).map(Slot::City));
        slots.extend((0..topology.ports).map(Slot::Port));
        for p in 0..topology.players {
            slots.extend(PlayerStat::ALL.iter().map(|&stat| Slot::Player(p, stat)));
        }
        slots.push(Slot::DiceRoll);

        Self { topology, slots }
    }

    pub fn topology(&self) -> BoardTopology {
        self.topology
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Observation space declaration.
    pub fn space(&self) -> MultiDiscrete {
        MultiDiscrete::new(self.slots.iter().map(Slot::cardinality).collect())
    }

    /// Encode a snapshot into the fixed-length observation.
    pub fn encode(&self, snapshot: &GameSnapshot) -> Result<Observation, SchemaViolation> {
        self.check_topology(snapshot).inspect_err(|e| {
            log::debug!("Snapshot does not match board topology: {}", e);
        })?;

        self.slots
            .iter()
            .map(|slot| {
                let value = slot.extract(snapshot).inspect_err(|e| {
                    log::debug!("Cannot encode {}: {}", slot.name(), e);
                })?;
                let max = slot.max_value();
                if value < 0 || value > i64::from(max) {
                    log::debug!("{} = {} exceeds bound {}", slot.name(), value, max);
                    return Err(SchemaViolation::ValueOutOfRange {
                        slot: slot.name(),
                        value,
                        max,
                    });
                }
                Ok(value as u32)
            })
            .collect()
    }

    fn check_topology(&self, snapshot: &GameSnapshot) -> Result<(), SchemaViolation> {
        let game = &snapshot.game;
        let counts = [
            ("tiles", self.topology.tiles, game.board.tiles.len()),
            ("edges", self.topology.edges, game.board.edges.len()),
            ("nodes", self.topology.nodes, game.board.nodes.len()),
            ("ports", self.topology.ports, game.board.ports.len()),
            ("players", self.topology.players, game.players.len()),
        ];
        for (what, expected, actual) in counts {
            if expected != actual {
                return Err(SchemaViolation::TopologyMismatch {
                    what,
                    expected,
                    actual,
                });
            }
        }
        snapshot.current_player()?;
        Ok(())
    }
}

impl Default for ObservationSchema {
    fn default() -> Self {
        Self::new(BoardTopology::REFERENCE)
    }
}
