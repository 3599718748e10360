use crate::core::models::network::Configuration;
use std::fmt;

/// An ice-rule-satisfying configuration together with its dipole score.
#[derive(Debug, Clone)]
pub struct Solution {
    pub dipole: f64,
    pub configuration: Configuration,
}

impl PartialEq for Solution {
    fn eq(&self, other: &Self) -> bool {
        self.dipole == other.dipole
    }
}
impl Eq for Solution {}

// Lower dipole compares greater, so `max` picks the better solution.
impl PartialOrd for Solution {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Solution {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .dipole
            .partial_cmp(&self.dipole)
            .unwrap_or(std::cmp::Ordering::Equal)
    }
}

/// Why the round loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    TargetReached,
    MaxRounds,
    TimeLimit,
    Cancelled,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::TargetReached => write!(f, "dipole target reached"),
            Termination::MaxRounds => write!(f, "round limit reached"),
            Termination::TimeLimit => write!(f, "time limit reached"),
            Termination::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Bookkeeping of the accept/reject loop. The best solution only ever improves.
#[derive(Debug, Clone)]
pub struct OptimizationState {
    best: Solution,
    pub round: u64,
    pub accepted_rounds: u64,
    pub failed_attempts: u64,
}

impl OptimizationState {
    pub fn new(initial: Solution, starting_round: u64) -> Self {
        Self {
            best: initial,
            round: starting_round,
            accepted_rounds: 0,
            failed_attempts: 0,
        }
    }

    pub fn best(&self) -> &Solution {
        &self.best
    }

    pub fn best_dipole(&self) -> f64 {
        self.best.dipole
    }

    /// Replaces the best solution if `candidate` has a strictly lower dipole.
    ///
    /// Returns whether the candidate was committed. A NaN score never ranks higher.
    pub fn submit(&mut self, candidate: Solution) -> bool {
        if candidate > self.best {
            self.best = candidate;
            self.accepted_rounds += 1;
            true
        } else {
            false
        }
    }

    pub fn into_best(self) -> Solution {
        self.best
    }
}
