//! Episode orchestration.
//!
//! Per step: decode the action → send it → block for the reply → encode the
//! new observation and shape the reward against the pre-action snapshot.
//! Strictly sequential; there is never more than one request in flight.
//!
//! # States
//!
//! ```text
//! AwaitingReset ──reset()──▶ Active ──game_ended / step cap──▶ Terminated
//!       ▲                                                          │
//!       └──────────────── fatal error          reset() ◀───────────┘
//! ```
//!
//! Only schema violations and transport failures surface as `Err`. Invalid
//! actions, server rejections and the step cap are folded into the reward and
//! termination signals.

use crate::protocol::Request;
use crate::transport::{ServerConfig, Transport, TransportError, WsTransport};
use catan_core::{
    action_space, decode, ActionKind, ActionVector, EnvConfig, GameSnapshot, InvalidAction,
    MultiDiscrete, Observation, ObservationSchema, RewardShaper, SchemaViolation,
};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeState {
    AwaitingReset,
    Active,
    Terminated,
}

#[derive(Error, Debug)]
pub enum EnvError {
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),
    #[error("schema violation: {0}")]
    Schema(#[from] SchemaViolation),
    #[error("step called in state {0:?}; call reset first")]
    NotActive(EpisodeState),
}

/// What happened during a step, beyond the numeric signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepInfo {
    Reset,
    /// The command reached the server; `accepted` mirrors `last_action_successful`.
    Applied { kind: ActionKind, accepted: bool },
    /// Slot 0 was out of range; nothing was sent.
    InvalidAction { index: u32 },
    /// Step cap reached; nothing was sent.
    EpisodeCap { steps: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub observation: Observation,
    pub reward: f64,
    pub terminated: bool,
    pub truncated: bool,
    pub info: StepInfo,
}

struct Current {
    snapshot: GameSnapshot,
    observation: Observation,
}

/// Owns the server connection and runs episodes against it.
pub struct EpisodeController<T: Transport> {
    transport: T,
    config: EnvConfig,
    schema: ObservationSchema,
    shaper: RewardShaper,
    state: EpisodeState,
    steps: u64,
    current: Option<Current>,
}

impl EpisodeController<WsTransport> {
    /// Controller over a WebSocket connection (opened lazily on `reset`).
    pub fn connect(server: ServerConfig, config: EnvConfig) -> Self {
        Self::new(WsTransport::new(server), config)
    }
}

impl<T: Transport> EpisodeController<T> {
    pub fn new(transport: T, config: EnvConfig) -> Self {
        Self {
            schema: ObservationSchema::new(config.topology),
            shaper: RewardShaper::new(config.reward_weight),
            transport,
            config,
            state: EpisodeState::AwaitingReset,
            steps: 0,
            current: None,
        }
    }

    pub fn observation_space(&self) -> MultiDiscrete {
        self.schema.space()
    }

    pub fn action_space(&self) -> MultiDiscrete {
        action_space()
    }

    pub fn schema(&self) -> &ObservationSchema {
        &self.schema
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn state(&self) -> EpisodeState {
        self.state
    }

    /// Steps taken in the current episode.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Latest snapshot reported by the server.
    pub fn snapshot(&self) -> Option<&GameSnapshot> {
        self.current.as_ref().map(|c| &c.snapshot)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Start a new game and return its initial observation.
    pub fn reset(&mut self) -> Result<(Observation, StepInfo), EnvError> {
        self.state = EpisodeState::AwaitingReset;
        self.current = None;
        self.steps = 0;

        let snapshot = self.request(&Request::NewGame)?;
        let observation = self.schema.encode(&snapshot)?;
        log::info!(
            "New game: player {} to move",
            snapshot.game.current_player_id
        );

        self.current = Some(Current {
            snapshot,
            observation: observation.clone(),
        });
        self.state = EpisodeState::Active;
        Ok((observation, StepInfo::Reset))
    }

    /// Advance the episode by one action.
    ///
    /// A failed step leaves the controller in `AwaitingReset`.
    pub fn step(&mut self, action: &ActionVector) -> Result<Transition, EnvError> {
        if self.state != EpisodeState::Active {
            return Err(EnvError::NotActive(self.state));
        }

        let result = self.try_step(action);
        match &result {
            Ok(transition) if transition.terminated => self.state = EpisodeState::Terminated,
            Ok(_) => {}
            Err(e) => {
                log::error!("Step failed, episode abandoned: {}", e);
                self.state = EpisodeState::AwaitingReset;
                self.current = None;
            }
        }
        result
    }

    fn try_step(&mut self, action: &ActionVector) -> Result<Transition, EnvError> {
        self.steps += 1;
        if self.steps >= self.config.max_episode_steps {
            let steps = self.steps;
            self.steps = 0;
            log::info!("Episode cap of {} steps reached", steps);
            return Ok(Transition {
                observation: self.current()?.observation.clone(),
                reward: 0.0,
                terminated: true,
                truncated: false,
                info: StepInfo::EpisodeCap { steps },
            });
        }

        let command = match decode(action) {
            Ok(command) => command,
            Err(invalid) => return self.invalid_action(invalid),
        };

        let post = self.request(&Request::TakeAction { action: command })?;
        let observation = self.schema.encode(&post)?;
        let breakdown = self.shaper.breakdown(&self.current()?.snapshot, &post)?;
        let reward = breakdown.total();
        let accepted = post.last_action_successful;
        let terminated = post.game.game_ended;

        log::debug!(
            "Step {}: {} {} reward {:+.3} {:?}",
            self.steps,
            command.kind,
            if accepted { "accepted" } else { "rejected" },
            reward,
            breakdown.components
        );
        if terminated {
            log::info!("Game ended after {} steps", self.steps);
        }

        self.current = Some(Current {
            snapshot: post,
            observation: observation.clone(),
        });
        Ok(Transition {
            observation,
            reward,
            terminated,
            truncated: false,
            info: StepInfo::Applied {
                kind: command.kind,
                accepted,
            },
        })
    }

    fn invalid_action(&self, invalid: InvalidAction) -> Result<Transition, EnvError> {
        log::debug!("Step {}: {}", self.steps, invalid);
        let current = self.current()?;
        Ok(Transition {
            observation: current.observation.clone(),
            reward: self.config.invalid_action_reward,
            terminated: current.snapshot.game.game_ended,
            truncated: false,
            info: StepInfo::InvalidAction {
                index: invalid.index,
            },
        })
    }

    fn current(&self) -> Result<&Current, EnvError> {
        self.current.as_ref().ok_or(EnvError::NotActive(self.state))
    }

    fn request(&mut self, request: &Request) -> Result<GameSnapshot, EnvError> {
        let reply = self.transport.exchange(request)?;
        Ok(GameSnapshot::from_json(&reply)?)
    }
}
