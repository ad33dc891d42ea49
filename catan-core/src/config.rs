use serde::{Deserialize, Serialize};

/// Board topology constants. These fix the observation length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardTopology {
    pub tiles: usize,
    pub edges: usize,
    pub nodes: usize,
    pub ports: usize,
    pub players: usize,
}

impl BoardTopology {
    /// The standard four-player board.
    pub const REFERENCE: BoardTopology = BoardTopology {
        tiles: 19,
        edges: 72,
        nodes: 54,
        ports: 9,
        players: 4,
    };
}

impl Default for BoardTopology {
    fn default() -> Self {
        Self::REFERENCE
    }
}

/// Environment configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    /// Base reward weight `W`; one victory point is worth `W`.
    pub reward_weight: f64,
    /// Steps after which an episode is force-ended without contacting the server.
    pub max_episode_steps: u64,
    /// Reward returned when slot 0 of the action vector is out of range.
    pub invalid_action_reward: f64,
    pub topology: BoardTopology,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            reward_weight: 8.0,
            max_episode_steps: 1000,
            invalid_action_reward: -1.0,
            topology: BoardTopology::REFERENCE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EnvConfig::default();
        assert_eq!(config.reward_weight, 8.0);
        assert_eq!(config.max_episode_steps, 1000);
        assert_eq!(config.invalid_action_reward, -1.0);
        assert_eq!(config.topology, BoardTopology::REFERENCE);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: EnvConfig = serde_json::from_str(r#"{"max_episode_steps": 50}"#).unwrap();
        assert_eq!(config.max_episode_steps, 50);
        assert_eq!(config.reward_weight, 8.0);
        assert_eq!(config.topology.edges, 72);
    }
}
