use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;
use thiserror::Error;

/// Oxygen-oxygen distance (Angstroms) under which two sites are hydrogen bonded.
pub const DEFAULT_CUTOFF: f64 = 3.0;
pub const DEFAULT_MAX_REPAIR_ITERATIONS: usize = 1_000_000;
pub const DEFAULT_MAX_ROUND_RETRIES: usize = 10;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// When the round loop gives up before reaching the dipole target.
#[derive(Debug, Clone, Default)]
pub struct StopConditions {
    pub max_rounds: Option<u64>,
    pub time_limit: Option<Duration>,
    /// Raised by another thread to stop the loop at the next round boundary.
    pub cancel: Option<Arc<AtomicBool>>,
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub cutoff: f64,
    pub dipole_target: f64,
    /// Random flips per shake; `None` derives it from the bond count.
    pub nshakes: Option<usize>,
    pub max_repair_iterations: usize,
    pub max_round_retries: usize,
    pub seed: Option<u64>,
}

impl SearchConfig {
    /// Shake size for a network with `bond_count` bonds: the configured value, or one
    /// tenth of the bonds (at least one).
    pub fn shakes_for(&self, bond_count: usize) -> usize {
        self.nshakes.unwrap_or((bond_count / 10).max(1))
    }
}

#[derive(Debug, Clone)]
pub struct DisorderConfig {
    pub search: SearchConfig,
    pub stop: StopConditions,
    pub checkpoint_path: Option<PathBuf>,
    pub resume_from: Option<PathBuf>,
}

#[derive(Default)]
pub struct DisorderConfigBuilder {
    cutoff: Option<f64>,
    dipole_target: Option<f64>,
    nshakes: Option<usize>,
    max_repair_iterations: Option<usize>,
    max_round_retries: Option<usize>,
    seed: Option<u64>,
    max_rounds: Option<u64>,
    time_limit: Option<Duration>,
    cancel: Option<Arc<AtomicBool>>,
    checkpoint_path: Option<PathBuf>,
    resume_from: Option<PathBuf>,
}

impl DisorderConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = Some(cutoff);
        self
    }
    pub fn dipole_target(mut self, target: f64) -> Self {
        self.dipole_target = Some(target);
        self
    }
    pub fn nshakes(mut self, nshakes: usize) -> Self {
        self.nshakes = Some(nshakes);
        self
    }
    pub fn max_repair_iterations(mut self, iterations: usize) -> Self {
        self.max_repair_iterations = Some(iterations);
        self
    }
    pub fn max_round_retries(mut self, retries: usize) -> Self {
        self.max_round_retries = Some(retries);
        self
    }
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
    pub fn max_rounds(mut self, rounds: u64) -> Self {
        self.max_rounds = Some(rounds);
        self
    }
    pub fn time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }
    pub fn cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }
    pub fn checkpoint_path(mut self, path: PathBuf) -> Self {
        self.checkpoint_path = Some(path);
        self
    }
    pub fn resume_from(mut self, path: PathBuf) -> Self {
        self.resume_from = Some(path);
        self
    }

    pub fn build(self) -> Result<DisorderConfig, ConfigError> {
        let cutoff = self.cutoff.unwrap_or(DEFAULT_CUTOFF);
        if !(cutoff.is_finite() && cutoff > 0.0) {
            return Err(invalid("cutoff", format!("must be positive and finite, got {cutoff}")));
        }

        let dipole_target = self
            .dipole_target
            .ok_or(ConfigError::MissingParameter("dipole_target"))?;
        if !(dipole_target.is_finite() && dipole_target >= 0.0) {
            return Err(invalid(
                "dipole_target",
                format!("must be non-negative and finite, got {dipole_target}"),
            ));
        }

        if self.nshakes == Some(0) {
            return Err(invalid("nshakes", "at least one flip per shake is required"));
        }

        let max_repair_iterations = self
            .max_repair_iterations
            .unwrap_or(DEFAULT_MAX_REPAIR_ITERATIONS);
        if max_repair_iterations == 0 {
            return Err(invalid("max_repair_iterations", "must be at least 1"));
        }

        Ok(DisorderConfig {
            search: SearchConfig {
                cutoff,
                dipole_target,
                nshakes: self.nshakes,
                max_repair_iterations,
                max_round_retries: self.max_round_retries.unwrap_or(DEFAULT_MAX_ROUND_RETRIES),
                seed: self.seed,
            },
            stop: StopConditions {
                max_rounds: self.max_rounds,
                time_limit: self.time_limit,
                cancel: self.cancel,
            },
            checkpoint_path: self.checkpoint_path,
            resume_from: self.resume_from,
        })
    }
}

fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidParameter {
        name,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dipole_target_is_required() {
        let err = DisorderConfigBuilder::new().build().unwrap_err();
        assert_eq!(err, ConfigError::MissingParameter("dipole_target"));
    }

    #[test]
    fn defaults_fill_optional_parameters() {
        let config = DisorderConfigBuilder::new()
            .dipole_target(0.1)
            .build()
            .unwrap();
        assert_eq!(config.search.cutoff, DEFAULT_CUTOFF);
        assert_eq!(
            config.search.max_repair_iterations,
            DEFAULT_MAX_REPAIR_ITERATIONS
        );
        assert_eq!(config.search.max_round_retries, DEFAULT_MAX_ROUND_RETRIES);
        assert!(config.search.seed.is_none());
        assert!(config.stop.max_rounds.is_none());
        assert!(config.checkpoint_path.is_none());
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let base = || DisorderConfigBuilder::new().dipole_target(0.1);
        assert!(matches!(
            base().cutoff(0.0).build(),
            Err(ConfigError::InvalidParameter { name: "cutoff", .. })
        ));
        assert!(matches!(
            DisorderConfigBuilder::new().dipole_target(-1.0).build(),
            Err(ConfigError::InvalidParameter {
                name: "dipole_target",
                ..
            })
        ));
        assert!(matches!(
            base().nshakes(0).build(),
            Err(ConfigError::InvalidParameter { name: "nshakes", .. })
        ));
        assert!(matches!(
            base().max_repair_iterations(0).build(),
            Err(ConfigError::InvalidParameter {
                name: "max_repair_iterations",
                ..
            })
        ));
    }

    #[test]
    fn shake_count_defaults_to_a_tenth_of_the_bonds() {
        let config = DisorderConfigBuilder::new()
            .dipole_target(0.1)
            .build()
            .unwrap();
        assert_eq!(config.search.shakes_for(160), 16);
        assert_eq!(config.search.shakes_for(16), 1);
        assert_eq!(config.search.shakes_for(3), 1);

        let explicit = DisorderConfigBuilder::new()
            .dipole_target(0.1)
            .nshakes(7)
            .build()
            .unwrap();
        assert_eq!(explicit.search.shakes_for(160), 7);
    }
}
