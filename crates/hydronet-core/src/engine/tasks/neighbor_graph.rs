use crate::core::models::lattice::Lattice;
use crate::core::models::network::BondNetwork;
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Neighbor count of every oxygen in a defect-free ice lattice.
pub const EXPECTED_NEIGHBORS: usize = 4;

/// An oxygen whose bond count differs from [`EXPECTED_NEIGHBORS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighborAnomaly {
    pub oxygen: usize,
    pub neighbors: usize,
}

#[derive(Debug, Clone)]
pub struct NeighborGraph {
    pub network: BondNetwork,
    pub anomalies: Vec<NeighborAnomaly>,
}

/// Connects every oxygen pair whose minimum-image distance is within `cutoff`.
///
/// Bond ids follow ascending `(i, j)` order regardless of how the pair scan is scheduled.
#[instrument(skip_all, name = "neighbor_graph_task")]
pub fn run(lattice: &Lattice, cutoff: f64, reporter: &ProgressReporter) -> NeighborGraph {
    let n = lattice.len();
    let cutoff_sq = cutoff * cutoff;
    info!(oxygens = n, cutoff, "Building hydrogen-bond network.");
    reporter.report(Progress::TaskStart {
        total_steps: n as u64,
    });

    let partners_of = |i: usize| -> Vec<usize> {
        let partners = ((i + 1)..n)
            .filter(|&j| lattice.displacement(i, j).norm_squared() <= cutoff_sq)
            .collect();
        reporter.report(Progress::TaskIncrement);
        partners
    };

    #[cfg(not(feature = "parallel"))]
    let rows: Vec<Vec<usize>> = (0..n).map(partners_of).collect();

    #[cfg(feature = "parallel")]
    let rows: Vec<Vec<usize>> = (0..n).into_par_iter().map(partners_of).collect();

    let mut network = BondNetwork::with_oxygens(n);
    for (i, partners) in rows.into_iter().enumerate() {
        for j in partners {
            network.push_bond(i, j);
        }
    }
    reporter.report(Progress::TaskFinish);

    let anomalies: Vec<NeighborAnomaly> = (0..n)
        .filter(|&oxygen| network.degree(oxygen) != EXPECTED_NEIGHBORS)
        .map(|oxygen| NeighborAnomaly {
            oxygen,
            neighbors: network.degree(oxygen),
        })
        .collect();
    for anomaly in &anomalies {
        warn!(
            oxygen = anomaly.oxygen,
            neighbors = anomaly.neighbors,
            expected = EXPECTED_NEIGHBORS,
            "Oxygen has an unexpected number of neighbors."
        );
    }

    info!(
        bonds = network.bond_count(),
        anomalies = anomalies.len(),
        "Hydrogen-bond network built."
    );
    NeighborGraph { network, anomalies }
}
