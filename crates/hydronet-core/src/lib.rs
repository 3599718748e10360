//! # HydroNet Core Library
//!
//! Generates proton-disordered hydrogen-bond networks for crystalline ice lattices.
//! Given the oxygen positions of an ice structure, the library decides which oxygen of
//! every hydrogen-bonded pair owns the shared proton, so that every oxygen owns exactly
//! two protons (the Bernal-Fowler ice rule) and the net dipole of the cell is minimized.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Immutable lattice geometry, the bond network topology,
//!   the mutable bond-direction `Configuration`, water geometry reconstruction and the
//!   file formats used to read oxygen tables and write finished structures.
//!
//! - **[`engine`]: The Logic Core.** Configuration, errors, progress reporting,
//!   checkpointing and the individual algorithmic tasks: neighbor graph construction,
//!   random initialization, the shake and adjust phases of the local search, and the
//!   dipole evaluator.
//!
//! - **[`workflows`]: The Public API.** The round controller that ties the tasks into the
//!   accept/reject Monte Carlo loop and returns the best configuration found.

pub mod core;
pub mod engine;
pub mod workflows;
