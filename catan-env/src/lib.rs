//! # Catan Environment
//!
//! Gym-style call surface over a remote Catan server:
//!
//! - `reset() -> (observation, info)`
//! - `step(action) -> Transition { observation, reward, terminated, truncated, info }`
//!
//! The controller is single-threaded and blocking. It owns its [`Transport`]
//! exclusively; sharing one across callers needs external locking.

pub mod env;
pub mod protocol;
pub mod testing;
pub mod transport;

pub use env::{EnvError, EpisodeController, EpisodeState, StepInfo, Transition};
pub use protocol::Request;
pub use transport::{ServerConfig, Transport, TransportError, WsTransport};
