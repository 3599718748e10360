//! # Core Module
//!
//! Fundamental data structures and file I/O for ice lattices.
//!
//! - **Lattice Representation** ([`models`]) - Oxygen sites, the periodic box, the bond
//!   network and its direction state, and reconstructed water molecules
//! - **File I/O** ([`io`]) - Reading oxygen tables and writing XYZ, PDB and CSV structures
//! - **Utilities** ([`utils`]) - Geometry helpers shared by the engine and the writers

pub mod io;
pub mod models;
pub mod utils;
