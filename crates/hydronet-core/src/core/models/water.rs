use super::lattice::Lattice;
use super::network::{BondNetwork, Configuration};
use crate::core::utils::geometry::{place_along, virtual_site};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// O-H bond length used when placing hydrogens, in Angstroms.
pub const OH_BOND_LENGTH: f64 = 0.9572;

/// Coefficients of the TIP4P virtual site, `M = O + a (H1 - O) + b (H2 - O)`.
pub const TIP4P_VIRTUAL_SITE_A: f64 = 0.128012065;
pub const TIP4P_VIRTUAL_SITE_B: f64 = 0.128012065;

pub const WATER_RESIDUE_NAME: &str = "HOH";

#[derive(Debug, Error, PartialEq, Clone)]
pub enum WaterBuildError {
    #[error("Oxygen {oxygen} owns {count} hydrogen(s); exactly two are required")]
    WrongHydrogenCount { oxygen: usize, count: usize },
    #[error("Oxygen {oxygen} coincides with its bonded neighbor {neighbor} under periodic boundaries")]
    CoincidentSites { oxygen: usize, neighbor: usize },
    #[error("Configuration covers {network} oxygens but the lattice has {lattice}")]
    SizeMismatch { network: usize, lattice: usize },
}

/// Rigid water model used when writing the reconstructed structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaterModel {
    /// Three sites: O, H1, H2.
    Tip3p,
    /// Four sites: O, H1, H2 and the massless virtual site M.
    #[default]
    Tip4p,
}

impl WaterModel {
    pub fn sites_per_molecule(self) -> usize {
        match self {
            WaterModel::Tip3p => 3,
            WaterModel::Tip4p => 4,
        }
    }
}

impl fmt::Display for WaterModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaterModel::Tip3p => write!(f, "TIP3P"),
            WaterModel::Tip4p => write!(f, "TIP4P"),
        }
    }
}

/// Kind of site within a water molecule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SiteKind {
    Oxygen,
    Hydrogen1,
    Hydrogen2,
    Virtual,
}

impl SiteKind {
    /// Element-style name used by the XYZ and CSV writers.
    pub fn element_name(self) -> &'static str {
        match self {
            SiteKind::Oxygen => "O",
            SiteKind::Hydrogen1 | SiteKind::Hydrogen2 => "H",
            SiteKind::Virtual => "M",
        }
    }

    /// Atom name used in PDB records.
    pub fn pdb_name(self) -> &'static str {
        match self {
            SiteKind::Oxygen => "OW",
            SiteKind::Hydrogen1 => "HW1",
            SiteKind::Hydrogen2 => "HW2",
            SiteKind::Virtual => "MW",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterSite {
    /// One-based residue number, shared by every site of the same molecule.
    pub residue_number: usize,
    pub kind: SiteKind,
    pub position: Point3<f64>,
}

/// Fully reconstructed water structure, ready to be written to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct WaterStructure {
    pub sites: Vec<WaterSite>,
    pub box_lengths: Vector3<f64>,
    pub model: WaterModel,
}

impl WaterStructure {
    /// Places hydrogens (and the TIP4P virtual site) for every oxygen of the lattice.
    ///
    /// Each hydrogen sits [`OH_BOND_LENGTH`] from its oxygen along the minimum-image
    /// direction of one owned bond; molecules are emitted in oxygen index order.
    ///
    /// # Errors
    ///
    /// Fails if any oxygen does not own exactly two bonds, or if a bonded pair coincides.
    pub fn build(
        lattice: &Lattice,
        network: &BondNetwork,
        configuration: &Configuration,
        model: WaterModel,
    ) -> Result<Self, WaterBuildError> {
        if network.oxygen_count() != lattice.len() {
            return Err(WaterBuildError::SizeMismatch {
                network: network.oxygen_count(),
                lattice: lattice.len(),
            });
        }

        let mut sites = Vec::with_capacity(lattice.len() * model.sites_per_molecule());
        for (oxygen, position) in lattice.sites().iter().enumerate() {
            let neighbors: Vec<usize> = configuration.owned_neighbors(network, oxygen).collect();
            let [n1, n2] = neighbors[..] else {
                return Err(WaterBuildError::WrongHydrogenCount {
                    oxygen,
                    count: neighbors.len(),
                });
            };

            let hydrogen = |neighbor: usize| {
                lattice
                    .direction(oxygen, neighbor)
                    .map(|u| place_along(position, &u, OH_BOND_LENGTH))
                    .ok_or(WaterBuildError::CoincidentSites { oxygen, neighbor })
            };
            let h1 = hydrogen(n1)?;
            let h2 = hydrogen(n2)?;

            let residue_number = oxygen + 1;
            let mut push = |kind, position| {
                sites.push(WaterSite {
                    residue_number,
                    kind,
                    position,
                })
            };
            push(SiteKind::Oxygen, *position);
            push(SiteKind::Hydrogen1, h1);
            push(SiteKind::Hydrogen2, h2);
            if model == WaterModel::Tip4p {
                push(
                    SiteKind::Virtual,
                    virtual_site(position, &h1, &h2, TIP4P_VIRTUAL_SITE_A, TIP4P_VIRTUAL_SITE_B),
                );
            }
        }

        Ok(Self {
            sites,
            box_lengths: lattice.cell().lengths(),
            model,
        })
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn oxygen_positions(&self) -> impl Iterator<Item = &Point3<f64>> {
        self.sites
            .iter()
            .filter(|s| s.kind == SiteKind::Oxygen)
            .map(|s| &s.position)
    }
}
