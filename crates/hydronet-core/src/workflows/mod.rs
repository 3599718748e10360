//! # Workflows Module
//!
//! Top-level entry points that run the complete optimization pipeline.
//!
//! - **Disorder Workflow** ([`disorder`]) - Builds the bond network for a lattice, reaches
//!   a first ice-rule configuration and runs the shake/adjust/accept round loop until the
//!   dipole target or a stop condition is reached.

pub mod disorder;
