use crate::core::models::network::{BondNetwork, Configuration, Owner};
use crate::engine::error::EngineError;
use rand::Rng;
use tracing::debug;

/// Assigns every bond a random owner with equal probability, in bond id order.
pub fn run(network: &BondNetwork, rng: &mut impl Rng) -> Result<Configuration, EngineError> {
    let owners: Vec<Owner> = (0..network.bond_count())
        .map(|_| {
            if rng.r#gen::<f64>() < 0.5 {
                Owner::First
            } else {
                Owner::Second
            }
        })
        .collect();

    let configuration = Configuration::from_owners(network, owners)
        .ok_or_else(|| EngineError::Internal("owner vector does not cover the network".into()))?;
    debug!(
        violating_oxygens = (0..network.oxygen_count())
            .filter(|&o| !configuration.is_satisfied(o))
            .count(),
        "Initial owners drawn."
    );
    Ok(configuration)
}
