use std::fmt;

/// Number of owned bonds every oxygen must end with under the ice rule.
pub const ICE_RULE_BONDS: u8 = 2;

/// Stable handle of a bond inside a [`BondNetwork`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BondId(pub usize);

impl BondId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for BondId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An unordered hydrogen-bonded oxygen pair, stored with `first < second`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    pub first: usize,
    pub second: usize,
}

impl Bond {
    pub fn new(a: usize, b: usize) -> Self {
        debug_assert_ne!(a, b, "a bond needs two distinct oxygens");
        if a < b {
            Self {
                first: a,
                second: b,
            }
        } else {
            Self {
                first: b,
                second: a,
            }
        }
    }

    pub fn contains(&self, oxygen: usize) -> bool {
        self.first == oxygen || self.second == oxygen
    }

    /// Returns the endpoint opposite to `oxygen`, or `None` if `oxygen` is not on this bond.
    pub fn other(&self, oxygen: usize) -> Option<usize> {
        if oxygen == self.first {
            Some(self.second)
        } else if oxygen == self.second {
            Some(self.first)
        } else {
            None
        }
    }

    pub fn endpoint(&self, owner: Owner) -> usize {
        match owner {
            Owner::First => self.first,
            Owner::Second => self.second,
        }
    }
}

/// The bond topology of a lattice: an arena of bonds plus per-oxygen adjacency lists.
///
/// Built once by the neighbor graph task and never modified afterwards. Every bond id
/// appears in the adjacency list of both of its endpoints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BondNetwork {
    bonds: Vec<Bond>,
    adjacency: Vec<Vec<BondId>>,
}

impl BondNetwork {
    /// Creates a network over `oxygen_count` oxygens without any bonds.
    pub fn with_oxygens(oxygen_count: usize) -> Self {
        Self {
            bonds: Vec::new(),
            adjacency: vec![Vec::new(); oxygen_count],
        }
    }

    /// Builds a network from a list of oxygen pairs, in the given order.
    ///
    /// Returns `None` if a pair references an oxygen outside `0..oxygen_count` or is a
    /// self pair.
    pub fn from_pairs(
        oxygen_count: usize,
        pairs: impl IntoIterator<Item = (usize, usize)>,
    ) -> Option<Self> {
        let mut network = Self::with_oxygens(oxygen_count);
        for (a, b) in pairs {
            if a == b || a >= oxygen_count || b >= oxygen_count {
                return None;
            }
            network.push_bond(a, b);
        }
        Some(network)
    }

    pub(crate) fn push_bond(&mut self, a: usize, b: usize) -> BondId {
        let id = BondId(self.bonds.len());
        let bond = Bond::new(a, b);
        self.bonds.push(bond);
        self.adjacency[bond.first].push(id);
        self.adjacency[bond.second].push(id);
        id
    }

    pub fn bond(&self, id: BondId) -> Option<&Bond> {
        self.bonds.get(id.0)
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn bonds_iter(&self) -> impl Iterator<Item = (BondId, &Bond)> {
        self.bonds.iter().enumerate().map(|(i, b)| (BondId(i), b))
    }

    /// Bond handles touching `oxygen`, in the order they were discovered.
    pub fn bonds_of(&self, oxygen: usize) -> &[BondId] {
        self.adjacency
            .get(oxygen)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn degree(&self, oxygen: usize) -> usize {
        self.bonds_of(oxygen).len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    pub fn oxygen_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bonds.is_empty()
    }
}

/// Which endpoint of a bond owns (is covalently bonded to) the shared hydrogen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Owner {
    #[default]
    First,
    Second,
}

impl Owner {
    pub fn flipped(self) -> Self {
        match self {
            Owner::First => Owner::Second,
            Owner::Second => Owner::First,
        }
    }
}

/// A complete assignment of hydrogen owners over a [`BondNetwork`].
///
/// Keeps a running count of owned bonds per oxygen. Both arrays are flat, so cloning a
/// configuration is the snapshot used to roll back rejected rounds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Configuration {
    owners: Vec<Owner>,
    counts: Vec<u8>,
}

impl Configuration {
    /// Builds a configuration from explicit owners, deriving the per-oxygen counts.
    ///
    /// Returns `None` if `owners` does not have one entry per bond of `network`.
    pub fn from_owners(network: &BondNetwork, owners: Vec<Owner>) -> Option<Self> {
        if owners.len() != network.bond_count() {
            return None;
        }
        let mut counts = vec![0u8; network.oxygen_count()];
        for (bond, owner) in network.bonds().iter().zip(&owners) {
            counts[bond.endpoint(*owner)] += 1;
        }
        Some(Self { owners, counts })
    }

    pub fn owner(&self, id: BondId) -> Owner {
        self.owners[id.0]
    }

    pub fn owners(&self) -> &[Owner] {
        &self.owners
    }

    /// The oxygen currently owning the hydrogen of bond `id`.
    pub fn owning_oxygen(&self, network: &BondNetwork, id: BondId) -> usize {
        network.bonds[id.0].endpoint(self.owners[id.0])
    }

    pub fn count(&self, oxygen: usize) -> u8 {
        self.counts[oxygen]
    }

    pub fn counts(&self) -> &[u8] {
        &self.counts
    }

    /// Toggles the owner of bond `id`, moving one unit of count between its endpoints.
    pub fn flip(&mut self, network: &BondNetwork, id: BondId) {
        let bond = network.bonds[id.0];
        let old = self.owners[id.0];
        let new = old.flipped();
        self.counts[bond.endpoint(old)] -= 1;
        self.counts[bond.endpoint(new)] += 1;
        self.owners[id.0] = new;
    }

    /// Whether oxygen `oxygen` owns exactly two bonds.
    #[inline]
    pub fn is_satisfied(&self, oxygen: usize) -> bool {
        self.counts[oxygen] == ICE_RULE_BONDS
    }

    /// Whether bond `id` touches an oxygen that violates the ice rule.
    #[inline]
    pub fn is_violating(&self, network: &BondNetwork, id: BondId) -> bool {
        let bond = network.bonds[id.0];
        !self.is_satisfied(bond.first) || !self.is_satisfied(bond.second)
    }

    pub fn satisfies_ice_rule(&self) -> bool {
        self.counts.iter().all(|&c| c == ICE_RULE_BONDS)
    }

    /// First oxygen (by index) whose count differs from two, with its count.
    pub fn first_violation(&self) -> Option<(usize, u8)> {
        self.counts
            .iter()
            .enumerate()
            .find(|(_, c)| **c != ICE_RULE_BONDS)
            .map(|(i, c)| (i, *c))
    }

    /// Neighbors of `oxygen` reached through the bonds it owns, in adjacency order.
    pub fn owned_neighbors<'a>(
        &'a self,
        network: &'a BondNetwork,
        oxygen: usize,
    ) -> impl Iterator<Item = usize> + 'a {
        network.bonds_of(oxygen).iter().filter_map(move |&id| {
            let bond = network.bonds[id.0];
            if bond.endpoint(self.owners[id.0]) == oxygen {
                bond.other(oxygen)
            } else {
                None
            }
        })
    }

    /// Recomputes the counts from the owners and checks them against the running counts.
    pub fn counts_consistent(&self, network: &BondNetwork) -> bool {
        Self::from_owners(network, self.owners.clone())
            .is_some_and(|fresh| fresh.counts == self.counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> BondNetwork {
        BondNetwork::from_pairs(3, [(0, 1), (2, 1), (0, 2)]).unwrap()
    }

    #[test]
    fn bond_normalizes_endpoint_order() {
        let bond = Bond::new(5, 2);
        assert_eq!(bond.first, 2);
        assert_eq!(bond.second, 5);
        assert_eq!(bond.other(2), Some(5));
        assert_eq!(bond.other(5), Some(2));
        assert_eq!(bond.other(3), None);
        assert!(bond.contains(5));
        assert!(!bond.contains(4));
    }

    #[test]
    fn adjacency_is_symmetric() {
        let network = triangle();
        for (id, bond) in network.bonds_iter() {
            assert!(network.bonds_of(bond.first).contains(&id));
            assert!(network.bonds_of(bond.second).contains(&id));
        }
        assert_eq!(network.degree(0), 2);
        assert_eq!(network.bond(BondId(1)), Some(&Bond::new(1, 2)));
        assert!(network.bonds_of(99).is_empty());
    }

    #[test]
    fn from_pairs_rejects_invalid_pairs() {
        assert!(BondNetwork::from_pairs(2, [(0, 0)]).is_none());
        assert!(BondNetwork::from_pairs(2, [(0, 2)]).is_none());
    }

    #[test]
    fn configuration_counts_follow_owners() {
        let network = triangle();
        let config =
            Configuration::from_owners(&network, vec![Owner::First, Owner::First, Owner::Second])
                .unwrap();
        // bonds: (0,1) -> 0, (1,2) -> 1, (0,2) -> 2
        assert_eq!(config.counts(), &[1, 1, 1]);
        assert_eq!(config.owning_oxygen(&network, BondId(1)), 1);
        assert!(Configuration::from_owners(&network, vec![Owner::First]).is_none());
    }

    #[test]
    fn flip_moves_one_unit_of_count() {
        let network = triangle();
        let mut config =
            Configuration::from_owners(&network, vec![Owner::First; 3]).unwrap();
        assert_eq!(config.counts(), &[2, 1, 0]);

        config.flip(&network, BondId(0));
        assert_eq!(config.owner(BondId(0)), Owner::Second);
        assert_eq!(config.counts(), &[1, 2, 0]);
        assert!(config.counts_consistent(&network));

        config.flip(&network, BondId(0));
        assert_eq!(config.counts(), &[2, 1, 0]);
    }

    #[test]
    fn violation_queries_reflect_counts() {
        let network = BondNetwork::from_pairs(
            4,
            [(0, 1), (1, 2), (2, 3), (3, 0), (0, 2), (1, 3)],
        )
        .unwrap();
        let owners = vec![
            Owner::First,
            Owner::First,
            Owner::First,
            Owner::First,
            Owner::First,
            Owner::First,
        ];
        let config = Configuration::from_owners(&network, owners).unwrap();
        // (0,1)->0 (1,2)->1 (2,3)->2 (0,3)->0 (0,2)->0 (1,3)->1
        assert_eq!(config.counts(), &[3, 2, 1, 0]);
        assert!(!config.satisfies_ice_rule());
        assert_eq!(config.first_violation(), Some((0, 3)));
        assert!(config.is_violating(&network, BondId(0)));
        assert!(config.is_satisfied(1));
    }

    #[test]
    fn owned_neighbors_point_away_from_owner() {
        let network = triangle();
        let config =
            Configuration::from_owners(&network, vec![Owner::First, Owner::Second, Owner::First])
                .unwrap();
        // (0,1)->0, (1,2)->2, (0,2)->0
        let mut zero: Vec<_> = config.owned_neighbors(&network, 0).collect();
        zero.sort();
        assert_eq!(zero, vec![1, 2]);
        assert_eq!(config.owned_neighbors(&network, 1).count(), 0);
        assert_eq!(config.owned_neighbors(&network, 2).collect::<Vec<_>>(), vec![1]);
    }
}
