//! Layered run settings.
//!
//! Precedence, lowest first: built-in defaults, the `--config` file,
//! `CATAN_HOST` / `CATAN_PORT` (a `.env` file is honored), command-line flags.

use anyhow::{Context, Result};
use catan_core::EnvConfig;
use catan_env::ServerConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub env: EnvConfig,
    pub server: ServerConfig,
}

impl Settings {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let settings = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        log::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Apply `CATAN_HOST` / `CATAN_PORT` from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_vars(
            std::env::var("CATAN_HOST").ok(),
            std::env::var("CATAN_PORT").ok(),
        )
    }

    fn apply_vars(&mut self, host: Option<String>, port: Option<String>) -> Result<()> {
        if let Some(host) = host {
            self.server.host = host;
        }
        if let Some(port) = port {
            self.server.port = port
                .parse()
                .with_context(|| format!("CATAN_PORT is not a port number: {port}"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_path_gives_defaults() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings.server, ServerConfig::default());
        assert_eq!(settings.env.max_episode_steps, 1000);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"env": {{"reward_weight": 2.0}}, "server": {{"port": 9000}}}}"#
        )
        .unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.env.reward_weight, 2.0);
        assert_eq!(settings.env.max_episode_steps, 1000);
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.path, "/handleMove");
    }

    #[test]
    fn test_bad_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = Settings::load(Some(file.path())).unwrap_err();
        assert!(format!("{err:#}").contains("parsing config"));
    }

    #[test]
    fn test_env_vars_override_file() {
        let mut settings = Settings::default();
        settings
            .apply_vars(Some("game-server".to_string()), Some("7000".to_string()))
            .unwrap();
        assert_eq!(settings.server.address(), "game-server:7000");

        assert!(settings
            .apply_vars(None, Some("seventy".to_string()))
            .is_err());
    }
}
