use crate::core::models::network::{BondId, BondNetwork, Configuration};
use rand::Rng;
use tracing::trace;

/// Flips `nshakes` uniformly chosen bonds without regard to the ice rule.
///
/// The same bond may be drawn more than once.
pub fn run(
    network: &BondNetwork,
    configuration: &mut Configuration,
    nshakes: usize,
    rng: &mut impl Rng,
) {
    let bonds = network.bond_count();
    if bonds == 0 {
        return;
    }
    for _ in 0..nshakes {
        let id = BondId(rng.gen_range(0..bonds));
        configuration.flip(network, id);
    }
    trace!(nshakes, "Shake applied.");
}
