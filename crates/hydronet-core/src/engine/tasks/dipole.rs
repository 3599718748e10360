use crate::core::models::lattice::Lattice;
use crate::core::models::network::{BondNetwork, Configuration};
use crate::core::utils::geometry::bisector_sum;
use crate::engine::error::EngineError;
use nalgebra::Vector3;

/// Net dipole magnitude of an ice-rule configuration.
///
/// Every owned bond contributes the unit vector from its owning oxygen toward the
/// neighbor (minimum image). The two vectors of each molecule are summed without
/// renormalization and the molecular sums are accumulated over the lattice.
///
/// # Errors
///
/// Returns [`EngineError::IceRuleViolated`] for the first oxygen that does not own
/// exactly two bonds.
pub fn run(
    lattice: &Lattice,
    network: &BondNetwork,
    configuration: &Configuration,
) -> Result<f64, EngineError> {
    if let Some((oxygen, count)) = configuration.first_violation() {
        return Err(EngineError::IceRuleViolated { oxygen, count });
    }

    let total = (0..network.oxygen_count()).fold(Vector3::zeros(), |acc, oxygen| {
        let directions: Vec<Vector3<f64>> = configuration
            .owned_neighbors(network, oxygen)
            .map(|neighbor| {
                lattice
                    .direction(oxygen, neighbor)
                    .unwrap_or_else(Vector3::zeros)
            })
            .collect();
        acc + bisector_sum(&directions)
    });
    Ok(total.norm())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::lattice::SimBox;
    use crate::core::models::network::Owner;
    use crate::engine::progress::ProgressReporter;
    use crate::engine::tasks::{adjust, fixtures, initialize, neighbor_graph};
    use nalgebra::Point3;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn pair_lattice() -> Lattice {
        Lattice::new(
            vec![Point3::new(1.0, 1.0, 1.0), Point3::new(3.5, 1.0, 1.0)],
            SimBox::cubic(20.0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn opposing_molecules_cancel() {
        let network = BondNetwork::from_pairs(2, [(0, 1), (0, 1), (0, 1), (0, 1)]).unwrap();
        let configuration = Configuration::from_owners(
            &network,
            vec![Owner::First, Owner::Second, Owner::Second, Owner::First],
        )
        .unwrap();
        let dipole = run(&pair_lattice(), &network, &configuration).unwrap();
        assert!(dipole.abs() < 1e-12);
    }

    #[test]
    fn violations_are_rejected() {
        let network = BondNetwork::from_pairs(2, [(0, 1), (0, 1), (0, 1), (0, 1)]).unwrap();
        let configuration = Configuration::from_owners(&network, vec![Owner::First; 4]).unwrap();
        assert!(matches!(
            run(&pair_lattice(), &network, &configuration),
            Err(EngineError::IceRuleViolated {
                oxygen: 0,
                count: 4
            })
        ));
    }

    #[test]
    fn aligned_molecules_add_up() {
        // Periodic ring of three sites along x; every molecule points both hydrogens toward +x.
        let lattice = Lattice::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(2.5, 0.0, 0.0),
                Point3::new(5.0, 0.0, 0.0),
            ],
            SimBox::orthorhombic(Vector3::new(7.5, 20.0, 20.0)).unwrap(),
        )
        .unwrap();
        let network =
            BondNetwork::from_pairs(3, [(0, 1), (0, 1), (1, 2), (1, 2), (0, 2), (0, 2)]).unwrap();
        let configuration = Configuration::from_owners(
            &network,
            vec![
                Owner::First,
                Owner::First,
                Owner::First,
                Owner::First,
                Owner::Second,
                Owner::Second,
            ],
        )
        .unwrap();
        let dipole = run(&lattice, &network, &configuration).unwrap();
        assert!((dipole - 6.0).abs() < 1e-12);
    }

    #[test]
    fn repaired_diamond_scores_are_finite_and_non_negative() {
        let graph = neighbor_graph::run(&fixtures::diamond(), 3.0, &ProgressReporter::new());
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..5 {
            let mut configuration = initialize::run(&graph.network, &mut rng).unwrap();
            adjust::run(&graph.network, &mut configuration, 100_000, &mut rng).unwrap();
            let dipole = run(&fixtures::diamond(), &graph.network, &configuration).unwrap();
            assert!(dipole.is_finite());
            assert!(dipole >= 0.0);
        }
    }
}
