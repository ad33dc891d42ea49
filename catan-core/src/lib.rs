//! # Catan Environment Core
//!
//! Turns a remote Catan server's variable-shape JSON state into a fixed-schema
//! numeric interface for reinforcement-learning agents.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   decode   ┌─────────┐            ┌──────────────┐
//! │ ActionVector │───────────▶│ Command │──(wire)──▶ │ remote server│
//! └──────────────┘            └─────────┘            └──────┬───────┘
//!                                                           │ reply
//! ┌──────────────┐   encode   ┌──────────────┐              │
//! │ Observation  │◀───────────│ GameSnapshot │◀─────────────┘
//! └──────────────┘            └──────┬───────┘
//!                                    │ (pre, post)
//!                             ┌──────▼───────┐
//!                             │ RewardShaper │──▶ f64
//!                             └──────────────┘
//! ```
//!
//! ## Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`GameSnapshot`] | One decoded server reply |
//! | [`ObservationSchema`] | Single slot table: space bounds and encoder |
//! | [`ActionVector`] / [`Command`] | Agent output and its wire form |
//! | [`RewardShaper`] | Declarative reward rule table |
//! | [`EnvConfig`] | Weights, episode cap, board topology |
//!
//! Transport and episode orchestration live in the `catan-env` crate.

pub mod action;
pub mod config;
pub mod error;
pub mod kinds;
pub mod policy;
pub mod reward;
pub mod schema;
pub mod snapshot;
pub mod space;
pub mod testing;

pub use action::{action_space, decode, ActionVector, Command, ACTION_NVEC, ACTION_SLOTS};
pub use config::{BoardTopology, EnvConfig};
pub use error::{InvalidAction, SchemaViolation};
pub use kinds::{ActionKind, DevCardKind, PortKind, ResourceKind, Terrain};
pub use policy::{Policy, RandomPolicy};
pub use reward::{RewardBreakdown, RewardShaper, REWARD_RULES};
pub use schema::{Observation, ObservationSchema, Slot};
pub use snapshot::GameSnapshot;
pub use space::MultiDiscrete;
