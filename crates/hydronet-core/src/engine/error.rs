use super::checkpoint::CheckpointError;
use super::config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("The lattice produced no hydrogen bonds; check the cutoff and box dimensions")]
    EmptyNetwork,

    #[error(
        "Ice rule could not be restored after {iterations} repair iterations ({violations} violating bond(s) left)"
    )]
    ConstraintUnsatisfiable { iterations: usize, violations: usize },

    #[error("Gave up after {attempts} consecutive failed attempts: {last}")]
    RetriesExhausted {
        attempts: usize,
        #[source]
        last: Box<EngineError>,
    },

    #[error("Oxygen {oxygen} owns {count} hydrogen(s); the dipole is only defined under the ice rule")]
    IceRuleViolated { oxygen: usize, count: u8 },

    #[error("Checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),

    #[error("Checkpoint does not match this lattice: {reason}")]
    CheckpointMismatch { reason: String },

    #[error("Internal logic error: {0}")]
    Internal(String),
}
