use crate::core::models::network::{BondId, BondNetwork, Configuration};
use crate::engine::error::EngineError;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, trace};

/// Bonds touching at least one oxygen that breaks the ice rule.
///
/// Supports O(1) insertion, removal and uniform sampling.
struct ViolatingSet {
    members: Vec<BondId>,
    slots: Vec<Option<usize>>,
}

impl ViolatingSet {
    fn collect(network: &BondNetwork, configuration: &Configuration) -> Self {
        let mut set = Self {
            members: Vec::new(),
            slots: vec![None; network.bond_count()],
        };
        for (id, _) in network.bonds_iter() {
            if configuration.is_violating(network, id) {
                set.insert(id);
            }
        }
        set
    }

    fn insert(&mut self, id: BondId) {
        if self.slots[id.index()].is_none() {
            self.slots[id.index()] = Some(self.members.len());
            self.members.push(id);
        }
    }

    fn remove(&mut self, id: BondId) {
        if let Some(pos) = self.slots[id.index()].take() {
            self.members.swap_remove(pos);
            if let Some(&moved) = self.members.get(pos) {
                self.slots[moved.index()] = Some(pos);
            }
        }
    }

    /// Re-evaluates membership of every bond around `oxygen` after its count changed.
    fn refresh(&mut self, network: &BondNetwork, configuration: &Configuration, oxygen: usize) {
        for &id in network.bonds_of(oxygen) {
            if configuration.is_violating(network, id) {
                self.insert(id);
            } else {
                self.remove(id);
            }
        }
    }

    fn choose(&self, rng: &mut impl Rng) -> Option<BondId> {
        self.members.choose(rng).copied()
    }

    fn len(&self) -> usize {
        self.members.len()
    }
}

fn imbalance(configuration: &Configuration, first: usize, second: usize) -> u8 {
    configuration.count(first).abs_diff(configuration.count(second))
}

/// Greedy repair of the ice rule.
///
/// Repeatedly picks a random bond touching a violating oxygen and flips it, keeping the
/// flip unless it widens the count difference between the bond's endpoints. Returns the
/// number of iterations used.
///
/// # Errors
///
/// Returns [`EngineError::ConstraintUnsatisfiable`] if violations remain after
/// `max_iterations` picks.
pub fn run(
    network: &BondNetwork,
    configuration: &mut Configuration,
    max_iterations: usize,
    rng: &mut impl Rng,
) -> Result<usize, EngineError> {
    let mut violating = ViolatingSet::collect(network, configuration);
    let mut iterations = 0;

    while let Some(id) = violating.choose(rng) {
        if iterations >= max_iterations {
            debug!(
                iterations,
                violations = violating.len(),
                "Repair iteration budget exhausted."
            );
            return Err(EngineError::ConstraintUnsatisfiable {
                iterations,
                violations: violating.len(),
            });
        }
        iterations += 1;

        let bond = network.bonds()[id.index()];
        let before = imbalance(configuration, bond.first, bond.second);
        configuration.flip(network, id);
        if imbalance(configuration, bond.first, bond.second) > before {
            configuration.flip(network, id);
            continue;
        }
        violating.refresh(network, configuration, bond.first);
        violating.refresh(network, configuration, bond.second);
    }

    trace!(iterations, "Ice rule restored.");
    Ok(iterations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::network::Owner;
    use crate::engine::progress::ProgressReporter;
    use crate::engine::tasks::{fixtures, initialize, neighbor_graph, shake};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn repairs_random_diamond_configurations() {
        let graph = neighbor_graph::run(&fixtures::diamond(), 3.0, &ProgressReporter::new());
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut configuration = initialize::run(&graph.network, &mut rng).unwrap();
            run(&graph.network, &mut configuration, 100_000, &mut rng).unwrap();

            assert!(configuration.satisfies_ice_rule(), "seed {seed}");
            assert!(configuration.counts_consistent(&graph.network));
        }
    }

    #[test]
    fn repairs_after_shaking_a_valid_configuration() {
        let graph = neighbor_graph::run(&fixtures::diamond(), 3.0, &ProgressReporter::new());
        let mut rng = StdRng::seed_from_u64(99);
        let mut configuration = initialize::run(&graph.network, &mut rng).unwrap();
        run(&graph.network, &mut configuration, 100_000, &mut rng).unwrap();

        for _ in 0..10 {
            shake::run(&graph.network, &mut configuration, 4, &mut rng);
            run(&graph.network, &mut configuration, 100_000, &mut rng).unwrap();
            assert!(configuration.satisfies_ice_rule());
        }
    }

    #[test]
    fn valid_configuration_needs_no_iterations() {
        let network = BondNetwork::from_pairs(2, [(0, 1), (0, 1), (0, 1), (0, 1)]).unwrap();
        let mut configuration = Configuration::from_owners(
            &network,
            vec![Owner::First, Owner::Second, Owner::First, Owner::Second],
        )
        .unwrap();
        let iterations = run(
            &network,
            &mut configuration,
            10,
            &mut StdRng::seed_from_u64(0),
        )
        .unwrap();
        assert_eq!(iterations, 0);
    }

    #[test]
    fn unsatisfiable_network_hits_the_budget() {
        // A single bond can never give both oxygens two hydrogens.
        let network = BondNetwork::from_pairs(2, [(0, 1)]).unwrap();
        let mut configuration =
            Configuration::from_owners(&network, vec![Owner::First]).unwrap();
        let err = run(
            &network,
            &mut configuration,
            50,
            &mut StdRng::seed_from_u64(0),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            EngineError::ConstraintUnsatisfiable {
                iterations: 50,
                violations: 1
            }
        ));
    }

    #[test]
    fn violating_set_tracks_membership() {
        let network = BondNetwork::from_pairs(3, [(0, 1), (1, 2), (0, 2)]).unwrap();
        let configuration =
            Configuration::from_owners(&network, vec![Owner::First, Owner::First, Owner::First])
                .unwrap();
        let mut set = ViolatingSet::collect(&network, &configuration);
        assert_eq!(set.len(), 3);

        set.remove(BondId(0));
        set.remove(BondId(0));
        assert_eq!(set.len(), 2);
        assert!(set.members.contains(&BondId(1)));
        assert!(set.members.contains(&BondId(2)));
        assert_eq!(set.slots[0], None);

        set.insert(BondId(0));
        assert_eq!(set.len(), 3);
        for (pos, id) in set.members.iter().enumerate() {
            assert_eq!(set.slots[id.index()], Some(pos));
        }
    }
}
