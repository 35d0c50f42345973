use std::env;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

pub const DEFAULT_SIMS: usize = 10_000;
pub const DEFAULT_HISTORY_GW: usize = 5;
pub const MAX_SIMS: usize = 2_000_000;

/// Calibrated constants for the spread heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VarianceConfig {
    /// Minimum history length before the sample standard deviation is trusted.
    pub min_history: usize,
    /// Spread as a fraction of the mean when history is thin.
    pub fallback_multiplier: f64,
}

impl Default for VarianceConfig {
    fn default() -> Self {
        Self {
            min_history: 3,
            fallback_multiplier: 0.35,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub n_sims: usize,
    /// How many recent periods are pulled from the store for the spread.
    pub history_window: usize,
    #[serde(default)]
    pub variance: VarianceConfig,
    /// Fixed seed for reproducible runs; `None` draws from process entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

fn default_parallel() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            n_sims: DEFAULT_SIMS,
            history_window: DEFAULT_HISTORY_GW,
            variance: VarianceConfig::default(),
            seed: None,
            parallel: default_parallel(),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let d = Self::default();
        let n_sims = env_parse::<usize>("FPL_SIMS")
            .unwrap_or(d.n_sims)
            .clamp(1, MAX_SIMS);
        let history_window = env_parse::<usize>("FPL_HISTORY_GW")
            .unwrap_or(d.history_window)
            .clamp(1, 38);
        let min_history = env_parse::<usize>("FPL_MIN_HISTORY")
            .unwrap_or(d.variance.min_history)
            .clamp(1, 38);
        let fallback_multiplier = env_parse::<f64>("FPL_FALLBACK_SPREAD")
            .filter(|v| v.is_finite())
            .unwrap_or(d.variance.fallback_multiplier)
            .clamp(0.0, 5.0);
        let seed = env_parse::<u64>("FPL_SEED");
        let parallel = env_bool("FPL_PARALLEL", d.parallel);

        Self {
            n_sims,
            history_window,
            variance: VarianceConfig {
                min_history,
                fallback_multiplier,
            },
            seed,
            parallel,
        }
    }

    pub fn with_sims(mut self, n_sims: usize) -> Self {
        self.n_sims = n_sims;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_sims == 0 {
            return Err(EngineError::invalid("n_sims must be at least 1"));
        }
        if self.n_sims > MAX_SIMS {
            return Err(EngineError::invalid(format!(
                "n_sims {} exceeds the limit of {MAX_SIMS}",
                self.n_sims
            )));
        }
        let m = self.variance.fallback_multiplier;
        if !m.is_finite() || m < 0.0 {
            return Err(EngineError::invalid(format!(
                "fallback spread multiplier must be non-negative, got {m}"
            )));
        }
        Ok(())
    }
}

/// Loads `.env.local` then `.env` into the process environment, if present.
pub fn load_dotenv() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .map(|v| {
            let t = v.trim().to_ascii_lowercase();
            !(t.is_empty() || t == "0" || t == "false" || t == "off" || t == "no")
        })
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_calibration() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.n_sims, 10_000);
        assert_eq!(cfg.history_window, 5);
        assert_eq!(cfg.variance.min_history, 3);
        assert!((cfg.variance.fallback_multiplier - 0.35).abs() < 1e-12);
        assert!(cfg.seed.is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_sims_is_rejected() {
        assert!(EngineConfig::default().with_sims(0).validate().is_err());
    }

    #[test]
    fn oversized_sims_is_rejected() {
        assert!(EngineConfig::default().with_sims(MAX_SIMS).validate().is_ok());
        assert!(matches!(
            EngineConfig::default().with_sims(MAX_SIMS + 1).validate(),
            Err(EngineError::InvalidInput(_))
        ));
    }

    #[test]
    fn negative_multiplier_is_rejected() {
        let mut cfg = EngineConfig::default();
        cfg.variance.fallback_multiplier = -0.1;
        assert!(cfg.validate().is_err());
    }
}
