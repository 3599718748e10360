//! Persisting the best accepted assignment so an interrupted run can be resumed.
//!
//! A checkpoint is a small TOML document holding the round it was taken at, the dipole
//! of the stored assignment, the seed of the run and the owner of every bond encoded as
//! a string of `0` (first endpoint) and `1` (second endpoint) in bond id order.

use super::error::EngineError;
use crate::core::models::network::{BondNetwork, Configuration, Owner};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

pub const SAVE_ATTEMPTS: u32 = 3;
const SAVE_BACKOFF: Duration = Duration::from_millis(50);

#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to encode checkpoint: {0}")]
    Encode(#[from] toml::ser::Error),
    #[error("Failed to decode checkpoint: {0}")]
    Decode(#[from] toml::de::Error),
    #[error("Unexpected owner flag '{0}' (expected '0' or '1')")]
    InvalidOwner(char),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Checkpoint {
    pub round: u64,
    pub dipole: f64,
    pub seed: u64,
    pub oxygens: usize,
    pub bonds: usize,
    pub owners: String,
}

impl Checkpoint {
    pub fn capture(
        network: &BondNetwork,
        configuration: &Configuration,
        round: u64,
        dipole: f64,
        seed: u64,
    ) -> Self {
        let owners = configuration
            .owners()
            .iter()
            .map(|owner| match owner {
                Owner::First => '0',
                Owner::Second => '1',
            })
            .collect();
        Self {
            round,
            dipole,
            seed,
            oxygens: network.oxygen_count(),
            bonds: network.bond_count(),
            owners,
        }
    }

    pub fn load(path: &Path) -> Result<Self, CheckpointError> {
        let text = fs::read_to_string(path).map_err(|source| CheckpointError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&text)?)
    }

    /// Writes the checkpoint through a temporary sibling file and renames it into place,
    /// so a crash mid-write never leaves a truncated checkpoint behind.
    pub fn save(&self, path: &Path) -> Result<(), CheckpointError> {
        let text = toml::to_string(self)?;
        let tmp = path.with_extension("tmp");
        let io_err = |source| CheckpointError::Io {
            path: path.to_path_buf(),
            source,
        };
        fs::write(&tmp, text).map_err(io_err)?;
        fs::rename(&tmp, path).map_err(io_err)
    }

    /// Saves with up to [`SAVE_ATTEMPTS`] attempts and a linear back-off between them.
    pub fn save_with_retry(&self, path: &Path) -> Result<(), EngineError> {
        let mut attempt = 1;
        loop {
            match self.save(path) {
                Ok(()) => {
                    debug!(?path, round = self.round, "Checkpoint written.");
                    return Ok(());
                }
                Err(e) if attempt < SAVE_ATTEMPTS => {
                    warn!(?path, attempt, error = %e, "Checkpoint write failed, retrying.");
                    thread::sleep(SAVE_BACKOFF * attempt);
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Rebuilds the stored configuration against `network`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::CheckpointMismatch`] if the checkpoint was taken on a
    /// different network or its assignment violates the ice rule.
    pub fn restore(&self, network: &BondNetwork) -> Result<Configuration, EngineError> {
        if self.oxygens != network.oxygen_count() || self.bonds != network.bond_count() {
            return Err(EngineError::CheckpointMismatch {
                reason: format!(
                    "checkpoint has {} oxygens and {} bonds, lattice has {} and {}",
                    self.oxygens,
                    self.bonds,
                    network.oxygen_count(),
                    network.bond_count()
                ),
            });
        }

        let owners = self
            .owners
            .chars()
            .map(|c| match c {
                '0' => Ok(Owner::First),
                '1' => Ok(Owner::Second),
                other => Err(CheckpointError::InvalidOwner(other)),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let configuration = Configuration::from_owners(network, owners).ok_or_else(|| {
            EngineError::CheckpointMismatch {
                reason: format!(
                    "{} owner flags stored for {} bonds",
                    self.owners.chars().count(),
                    network.bond_count()
                ),
            }
        })?;

        if let Some((oxygen, count)) = configuration.first_violation() {
            return Err(EngineError::CheckpointMismatch {
                reason: format!("stored assignment gives oxygen {oxygen} {count} hydrogen(s)"),
            });
        }
        Ok(configuration)
    }
}
