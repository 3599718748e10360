//! Computational steps of the disordering search.
//!
//! Each submodule exposes a `run` function performing one step: building the bond
//! network, drawing initial owners, perturbing (shake), repairing the ice rule (adjust)
//! and scoring the dipole. The round controller in [`crate::workflows::disorder`] chains
//! them.

pub mod adjust;
pub mod dipole;
pub mod initialize;
pub mod neighbor_graph;
pub mod shake;
