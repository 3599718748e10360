use crate::core::models::lattice::Lattice;
use crate::core::models::network::{BondNetwork, Configuration};
use crate::engine::checkpoint::Checkpoint;
use crate::engine::config::{DisorderConfig, StopConditions};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::state::{OptimizationState, Solution, Termination};
use crate::engine::tasks::{adjust, dipole, initialize, neighbor_graph, shake};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng, thread_rng};
use std::sync::atomic::Ordering;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

pub use crate::engine::tasks::neighbor_graph::NeighborAnomaly;

// Rounds between status updates sent to the progress reporter.
const STATUS_INTERVAL: u64 = 100;

#[derive(Debug, Clone)]
pub struct DisorderResult {
    pub network: BondNetwork,
    pub anomalies: Vec<NeighborAnomaly>,
    pub best: Solution,
    /// Index of the last round performed, counted from the start of the run being resumed.
    pub rounds: u64,
    pub accepted_rounds: u64,
    pub failed_attempts: u64,
    pub seed: u64,
    pub termination: Termination,
}

/// Searches an ice-rule hydrogen assignment with a minimal net dipole.
///
/// Builds the bond network, reaches a first valid configuration (or restores one from a
/// checkpoint), then repeats shake/adjust rounds on a copy of the best configuration,
/// committing a round only when it strictly lowers the dipole.
#[instrument(skip_all, name = "disorder_workflow")]
pub fn run(
    lattice: &Lattice,
    config: &DisorderConfig,
    reporter: &ProgressReporter,
) -> Result<DisorderResult, EngineError> {
    // === Phase 1: Bond network ===
    reporter.report(Progress::PhaseStart {
        name: "Building Network",
    });
    let graph = neighbor_graph::run(lattice, config.search.cutoff, reporter);
    reporter.report(Progress::PhaseFinish);
    if graph.network.bond_count() == 0 {
        return Err(EngineError::EmptyNetwork);
    }
    let network = &graph.network;

    let seed = config
        .search
        .seed
        .unwrap_or_else(|| thread_rng().r#gen::<u64>());
    info!(seed, "Seeding random number generator.");
    let mut rng = StdRng::seed_from_u64(seed);

    // === Phase 2: First valid configuration ===
    reporter.report(Progress::PhaseStart {
        name: "Initial Assignment",
    });
    let (configuration, start_round) = initial_configuration(network, config, &mut rng)?;
    let initial = Solution {
        dipole: dipole::run(lattice, network, &configuration)?,
        configuration,
    };
    info!(
        dipole = initial.dipole,
        round = start_round,
        "Initial configuration satisfies the ice rule."
    );
    reporter.report(Progress::Message(format!(
        "Initial dipole is {:.5}",
        initial.dipole
    )));
    let mut state = OptimizationState::new(initial, start_round);
    write_checkpoint(network, &state, seed, config)?;
    reporter.report(Progress::PhaseFinish);

    // === Phase 3: Accept/reject rounds ===
    reporter.report(Progress::PhaseStart {
        name: "Optimization",
    });
    let nshakes = config.search.shakes_for(network.bond_count());
    debug!(nshakes, target = config.search.dipole_target, "Starting round loop.");
    let started = Instant::now();

    let termination = loop {
        if let Some(reason) = stop_reason(&state, start_round, config, started) {
            break reason;
        }
        state.round += 1;

        let candidate = perturb_and_repair(network, &mut state, nshakes, config, &mut rng)?;
        let score = dipole::run(lattice, network, &candidate)?;
        let improved = state.submit(Solution {
            dipole: score,
            configuration: candidate,
        });

        if improved {
            info!(round = state.round, dipole = score, "Dipole improved.");
            reporter.report(Progress::RoundImproved {
                round: state.round,
                dipole: score,
            });
            write_checkpoint(network, &state, seed, config)?;
        }
        if state.round % STATUS_INTERVAL == 0 {
            reporter.report(Progress::StatusUpdate {
                text: format!(
                    "Round {}, best dipole {:.5}",
                    state.round,
                    state.best_dipole()
                ),
            });
        }
    };
    reporter.report(Progress::PhaseFinish);

    info!(
        %termination,
        rounds = state.round,
        accepted = state.accepted_rounds,
        failed_attempts = state.failed_attempts,
        dipole = state.best_dipole(),
        "Disorder workflow complete."
    );

    Ok(DisorderResult {
        rounds: state.round,
        accepted_rounds: state.accepted_rounds,
        failed_attempts: state.failed_attempts,
        best: state.into_best(),
        network: graph.network,
        anomalies: graph.anomalies,
        seed,
        termination,
    })
}

fn initial_configuration(
    network: &BondNetwork,
    config: &DisorderConfig,
    rng: &mut StdRng,
) -> Result<(Configuration, u64), EngineError> {
    if let Some(path) = &config.resume_from {
        let checkpoint = Checkpoint::load(path)?;
        let configuration = checkpoint.restore(network)?;
        info!(
            ?path,
            round = checkpoint.round,
            dipole = checkpoint.dipole,
            "Resuming from checkpoint."
        );
        return Ok((configuration, checkpoint.round));
    }

    let mut failures = 0;
    loop {
        let mut configuration = initialize::run(network, rng)?;
        match adjust::run(
            network,
            &mut configuration,
            config.search.max_repair_iterations,
            rng,
        ) {
            Ok(iterations) => {
                debug!(iterations, "Initial repair converged.");
                return Ok((configuration, 0));
            }
            Err(e @ EngineError::ConstraintUnsatisfiable { .. }) => {
                failures += 1;
                if failures > config.search.max_round_retries {
                    return Err(EngineError::RetriesExhausted {
                        attempts: failures,
                        last: Box::new(e),
                    });
                }
                warn!(attempt = failures, error = %e, "Initial repair failed, redrawing owners.");
            }
            Err(e) => return Err(e),
        }
    }
}

/// Shakes and repairs a copy of the best configuration, retrying on repair failure.
fn perturb_and_repair(
    network: &BondNetwork,
    state: &mut OptimizationState,
    nshakes: usize,
    config: &DisorderConfig,
    rng: &mut StdRng,
) -> Result<Configuration, EngineError> {
    let mut failures = 0;
    loop {
        let mut trial = state.best().configuration.clone();
        shake::run(network, &mut trial, nshakes, rng);
        match adjust::run(network, &mut trial, config.search.max_repair_iterations, rng) {
            Ok(_) => return Ok(trial),
            Err(e @ EngineError::ConstraintUnsatisfiable { .. }) => {
                failures += 1;
                state.failed_attempts += 1;
                if failures > config.search.max_round_retries {
                    return Err(EngineError::RetriesExhausted {
                        attempts: failures,
                        last: Box::new(e),
                    });
                }
                debug!(round = state.round, attempt = failures, error = %e, "Round discarded.");
            }
            Err(e) => return Err(e),
        }
    }
}

fn stop_reason(
    state: &OptimizationState,
    start_round: u64,
    config: &DisorderConfig,
    started: Instant,
) -> Option<Termination> {
    let StopConditions {
        max_rounds,
        time_limit,
        cancel,
    } = &config.stop;

    if state.best_dipole() < config.search.dipole_target {
        Some(Termination::TargetReached)
    } else if cancel.as_ref().is_some_and(|flag| flag.load(Ordering::Relaxed)) {
        Some(Termination::Cancelled)
    } else if max_rounds.is_some_and(|max| state.round - start_round >= max) {
        Some(Termination::MaxRounds)
    } else if time_limit.is_some_and(|limit| started.elapsed() >= limit) {
        Some(Termination::TimeLimit)
    } else {
        None
    }
}

fn write_checkpoint(
    network: &BondNetwork,
    state: &OptimizationState,
    seed: u64,
    config: &DisorderConfig,
) -> Result<(), EngineError> {
    let Some(path) = &config.checkpoint_path else {
        return Ok(());
    };
    let best = state.best();
    Checkpoint::capture(network, &best.configuration, state.round, best.dipole, seed)
        .save_with_retry(path)
}
