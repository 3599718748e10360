//! # Engine Module
//!
//! The optimization engine behind proton disordering: it turns a lattice of oxygen
//! sites into a hydrogen-bond network and searches hydrogen assignments that obey the
//! ice rule while driving the net dipole toward zero.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Search parameters, stop conditions and validation
//! - **State Tracking** ([`state`]) - Scored solutions and the best-so-far record
//! - **Checkpointing** ([`checkpoint`]) - Persisting and restoring accepted assignments
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Error Handling** ([`error`]) - Engine-specific error types
//!
//! The individual computational steps (neighbor detection, initialization, shake, adjust
//! and dipole scoring) live in the crate-private `tasks` module and are orchestrated by
//! [`crate::workflows::disorder`].

pub mod checkpoint;
pub mod config;
pub mod error;
pub mod progress;
pub mod state;
pub(crate) mod tasks;
