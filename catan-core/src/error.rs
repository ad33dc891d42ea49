//! Error types shared by the codecs and the reward shaper.

use thiserror::Error;

/// The server reply could not be mapped onto the fixed observation schema.
///
/// Always fatal: it means the server broke the protocol contract and there is
/// no meaningful observation to hand to the agent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaViolation {
    /// Reply JSON did not match the snapshot layout at all.
    #[error("malformed snapshot: {0}")]
    Malformed(String),
    /// An enumerated name (terrain, resource, port, ...) outside its table.
    #[error("unknown {table} name {name:?}")]
    UnknownName { table: &'static str, name: String },
    /// A fixed key is absent from a resource or development-card map.
    #[error("missing key {key:?} in {map}")]
    MissingKey { map: &'static str, key: String },
    /// A board list has a different length than the configured topology.
    #[error("expected {expected} {what}, got {actual}")]
    TopologyMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    /// A value is negative or exceeds its slot's inclusive bound.
    #[error("slot {slot} value {value} outside 0..={max}")]
    ValueOutOfRange { slot: String, value: i64, max: u32 },
    /// A road on a node, or a settlement/city on an edge.
    #[error("unexpected {building} building at {location}")]
    UnexpectedBuilding {
        building: &'static str,
        location: String,
    },
    /// `current_player_id` (or a building owner) does not name a seated player.
    #[error("player id {id} out of range for {players} players")]
    PlayerOutOfRange { id: usize, players: usize },
}

impl From<serde_json::Error> for SchemaViolation {
    fn from(err: serde_json::Error) -> Self {
        SchemaViolation::Malformed(err.to_string())
    }
}

/// Slot 0 of an action vector does not select one of the action kinds.
///
/// Recoverable: the episode controller turns this into a penalty instead of
/// failing the step.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("action kind index {index} outside 0..{kinds}")]
pub struct InvalidAction {
    pub index: u32,
    pub kinds: usize,
}
