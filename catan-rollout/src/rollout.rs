use catan_core::Policy;
use catan_env::{EnvError, EpisodeController, StepInfo, Transport};
use serde::Serialize;

/// Totals for one finished episode.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EpisodeSummary {
    pub reward: f64,
    pub steps: u64,
    pub invalid: u64,
    pub rejected: u64,
    pub capped: bool,
}

/// Play one episode from reset until it terminates or truncates.
pub fn run_episode<T: Transport, P: Policy>(
    env: &mut EpisodeController<T>,
    policy: &mut P,
) -> Result<EpisodeSummary, EnvError> {
    let (mut observation, _) = env.reset()?;
    let mut summary = EpisodeSummary::default();

    loop {
        let action = policy.act(&observation);
        let transition = env.step(&action)?;

        summary.steps += 1;
        summary.reward += transition.reward;
        match transition.info {
            StepInfo::InvalidAction { .. } => summary.invalid += 1,
            StepInfo::Applied {
                accepted: false, ..
            } => summary.rejected += 1,
            StepInfo::EpisodeCap { .. } => summary.capped = true,
            _ => {}
        }

        if transition.terminated || transition.truncated {
            return Ok(summary);
        }
        observation = transition.observation;
    }
}

/// Aggregate over a batch of episodes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub episodes: usize,
    pub mean_reward: f64,
    pub mean_steps: f64,
    pub invalid: u64,
    pub rejected: u64,
    pub capped: usize,
}

impl RunSummary {
    pub fn from_episodes(episodes: &[EpisodeSummary]) -> Self {
        if episodes.is_empty() {
            return Self::default();
        }
        let n = episodes.len() as f64;
        Self {
            episodes: episodes.len(),
            mean_reward: episodes.iter().map(|e| e.reward).sum::<f64>() / n,
            mean_steps: episodes.iter().map(|e| e.steps as f64).sum::<f64>() / n,
            invalid: episodes.iter().map(|e| e.invalid).sum(),
            rejected: episodes.iter().map(|e| e.rejected).sum(),
            capped: episodes.iter().filter(|e| e.capped).count(),
        }
    }
}
