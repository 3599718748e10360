//! # Core Models Module
//!
//! Data structures describing an ice lattice and the state of its proton network.
//!
//! ## Key Components
//!
//! - [`lattice`] - Oxygen coordinates and the orthorhombic periodic box
//! - [`network`] - Bond arena, per-oxygen adjacency and the mutable bond directions
//! - [`water`] - Water molecules reconstructed from a finished configuration
//!
//! ## Lifecycle
//!
//! A [`lattice::Lattice`] and the [`network::BondNetwork`] derived from it are built once
//! and shared read-only for the rest of a run. Only [`network::Configuration`] is
//! mutated, and it is cheap to clone so the optimizer can snapshot and roll back rounds.

pub mod lattice;
pub mod network;
pub mod water;
