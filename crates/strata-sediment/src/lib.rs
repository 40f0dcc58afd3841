//! # STRATA Sediment
//!
//! The grain-type catalog for the STRATA basin model:
//!
//! - [`grain`] - A single grain class and its material-property formulas
//! - [`catalog`] - The ordered catalog, fraction-weighted reducers and the
//!   process-wide ambient registry
//! - [`config`] - Scanner for the grouped key/value sediment text format
//!
//! Cells and columns do not hold a catalog reference; they resolve grain
//! properties through the ambient catalog registered at startup.

pub mod catalog;
pub mod config;
pub mod error;
pub mod grain;

pub use catalog::{
    ambient, ambient_is_set, ambient_size, clear_ambient, set_ambient, Catalog,
};
pub use config::DEFAULT_CATALOG;
pub use error::{Result, SedimentError};
pub use grain::{
    removal_rate_to_settling_velocity, settling_velocity_to_removal_rate, GrainType,
};
