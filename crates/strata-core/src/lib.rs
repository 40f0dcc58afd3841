//! # STRATA Core
//!
//! Shared foundation for the STRATA basin-model crates.  This crate is
//! engine-agnostic and holds only what every layer above needs:
//!
//! - [`constants`] - Process-wide physical constants with unit read-out
//! - [`size_class`] - Wentworth grain-size classes as bit masks
//! - [`facies`] - Depositional facies flags

pub mod constants;
pub mod facies;
pub mod size_class;

pub use constants::*;
pub use facies::Facies;
pub use size_class::SizeClass;
