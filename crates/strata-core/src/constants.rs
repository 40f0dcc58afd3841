//! Physical constants for the basin model.
//!
//! The settable constants (gravity, water and grain densities, salinity,
//! water viscosities) live in a process-wide table that is configured once
//! at startup and read everywhere else.  Readers can request values in
//! MKS, CGS or Imperial units.  All internal calculations use MKS.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

// =============================================================================
// DEFAULTS
// =============================================================================

/// Acceleration due to gravity (m/s^2)
pub const DEFAULT_GRAVITY: f64 = 9.81;

/// Density of sea water (kg/m^3)
pub const DEFAULT_RHO_SEA_WATER: f64 = 1030.0;

/// Density of fresh water (kg/m^3)
pub const DEFAULT_RHO_FRESH_WATER: f64 = 1000.0;

/// Salinity of the ocean (psu)
pub const DEFAULT_SEA_SALINITY: f64 = 35.0;

/// Density of quartz (kg/m^3)
pub const DEFAULT_RHO_QUARTZ: f64 = 2650.0;

/// Density of the mantle (kg/m^3)
pub const DEFAULT_RHO_MANTLE: f64 = 3300.0;

/// Dynamic viscosity of water (kg/m/s)
pub const DEFAULT_MU_WATER: f64 = 0.0014;

/// Kinematic viscosity of clear water (m^2/s)
pub const DEFAULT_ETA_WATER: f64 = 0.0014e-3;

// =============================================================================
// FIXED CONSTANTS
// =============================================================================

/// Unit weight of water (N/m^3)
pub const GAMMA_WATER: f64 = 10_000.0;

/// Unit weight of closely compacted sediment (N/m^3)
pub const GAMMA_GRAIN: f64 = 26_500.0;

/// Speed of sound in water (m/s)
pub const VELOCITY_IN_WATER: f64 = 1500.0;

/// Speed of sound in rock (m/s)
pub const VELOCITY_IN_ROCK: f64 = 5230.0;

pub const SECONDS_PER_HOUR: f64 = 3600.0;
pub const SECONDS_PER_DAY: f64 = 86_400.0;
pub const SECONDS_PER_YEAR: f64 = 31_536_000.0;
pub const DAYS_PER_SECOND: f64 = 1.157_407_407_407_407e-5;
pub const DAYS_PER_YEAR: f64 = 365.0;
pub const YEARS_PER_DAY: f64 = 0.002_739_726_027_40;

/// Bursik (1995) constant a_3 for the removal-rate/settling conversion.
pub const BURSIK_CONST_A3: f64 = 1.74;

/// Bursik (1995) plume-thickness constant.
pub const BURSIK_CONST_H: f64 = 7.5;

pub fn years_to_secs(a: f64) -> f64 {
    a * SECONDS_PER_YEAR
}

pub fn secs_to_years(a: f64) -> f64 {
    a / SECONDS_PER_YEAR
}

// =============================================================================
// UNIT SYSTEMS
// =============================================================================

/// Unit system for constant read-out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Meter / kilogram / second (internal representation)
    #[default]
    Mks,
    /// Centimeter / gram / second
    Cgs,
    /// Foot / pound / second
    Imperial,
}

impl Units {
    /// Conversion factor for accelerations (from m/s^2)
    fn acceleration_factor(self) -> f64 {
        match self {
            Units::Mks => 1.0,
            Units::Cgs => 100.0,
            Units::Imperial => 3.280_839_9,
        }
    }

    /// Conversion factor for densities (from kg/m^3)
    fn density_factor(self) -> f64 {
        match self {
            Units::Mks => 1.0,
            Units::Cgs => 0.001,
            Units::Imperial => 0.062_428,
        }
    }
}

// =============================================================================
// SETTABLE CONSTANTS TABLE
// =============================================================================

#[derive(Debug, Clone, Copy)]
struct ConstantsTable {
    gravity: f64,
    rho_sea_water: f64,
    rho_fresh_water: f64,
    sea_salinity: f64,
    rho_quartz: f64,
    rho_mantle: f64,
    mu_water: f64,
    eta_water: f64,
}

impl ConstantsTable {
    const DEFAULT: ConstantsTable = ConstantsTable {
        gravity: DEFAULT_GRAVITY,
        rho_sea_water: DEFAULT_RHO_SEA_WATER,
        rho_fresh_water: DEFAULT_RHO_FRESH_WATER,
        sea_salinity: DEFAULT_SEA_SALINITY,
        rho_quartz: DEFAULT_RHO_QUARTZ,
        rho_mantle: DEFAULT_RHO_MANTLE,
        mu_water: DEFAULT_MU_WATER,
        eta_water: DEFAULT_ETA_WATER,
    };
}

static CONSTANTS: RwLock<ConstantsTable> = RwLock::new(ConstantsTable::DEFAULT);

/// Acceleration due to gravity (m/s^2)
pub fn gravity() -> f64 {
    CONSTANTS.read().gravity
}

/// Gravity in the requested unit system
pub fn gravity_in(units: Units) -> f64 {
    gravity() * units.acceleration_factor()
}

/// Set the acceleration due to gravity; returns the new value.
pub fn set_gravity(new_val: f64) -> f64 {
    CONSTANTS.write().gravity = new_val;
    new_val
}

/// Density of sea water (kg/m^3)
pub fn rho_sea_water() -> f64 {
    CONSTANTS.read().rho_sea_water
}

/// Sea-water density in the requested unit system
pub fn rho_sea_water_in(units: Units) -> f64 {
    rho_sea_water() * units.density_factor()
}

/// Set the density of sea water; returns the new value.
pub fn set_rho_sea_water(new_val: f64) -> f64 {
    CONSTANTS.write().rho_sea_water = new_val;
    new_val
}

/// Density of fresh water (kg/m^3)
pub fn rho_fresh_water() -> f64 {
    CONSTANTS.read().rho_fresh_water
}

/// Fresh-water density in the requested unit system
pub fn rho_fresh_water_in(units: Units) -> f64 {
    rho_fresh_water() * units.density_factor()
}

/// Set the density of fresh water; returns the new value.
pub fn set_rho_fresh_water(new_val: f64) -> f64 {
    CONSTANTS.write().rho_fresh_water = new_val;
    new_val
}

/// Salinity of the ocean (psu)
pub fn sea_salinity() -> f64 {
    CONSTANTS.read().sea_salinity
}

/// Salinity as a mass fraction, independent of the unit system.
pub fn sea_salinity_in(_units: Units) -> f64 {
    sea_salinity() * 0.001
}

/// Set the ocean salinity; returns the new value.
pub fn set_sea_salinity(new_val: f64) -> f64 {
    CONSTANTS.write().sea_salinity = new_val;
    new_val
}

/// Density of quartz (kg/m^3), the upper bound for grain densities
pub fn rho_quartz() -> f64 {
    CONSTANTS.read().rho_quartz
}

/// Quartz density in the requested unit system
pub fn rho_quartz_in(units: Units) -> f64 {
    rho_quartz() * units.density_factor()
}

/// Set the density of quartz; returns the new value.
pub fn set_rho_quartz(new_val: f64) -> f64 {
    CONSTANTS.write().rho_quartz = new_val;
    new_val
}

/// Density of the mantle (kg/m^3)
pub fn rho_mantle() -> f64 {
    CONSTANTS.read().rho_mantle
}

/// Mantle density in the requested unit system
pub fn rho_mantle_in(units: Units) -> f64 {
    rho_mantle() * units.density_factor()
}

/// Set the density of the mantle; returns the new value.
pub fn set_rho_mantle(new_val: f64) -> f64 {
    CONSTANTS.write().rho_mantle = new_val;
    new_val
}

/// Dynamic viscosity of water (kg/m/s)
pub fn mu_water() -> f64 {
    CONSTANTS.read().mu_water
}

/// Set the dynamic viscosity of water; returns the new value.
pub fn set_mu_water(new_val: f64) -> f64 {
    CONSTANTS.write().mu_water = new_val;
    new_val
}

/// Kinematic viscosity of water (m^2/s)
pub fn eta_water() -> f64 {
    CONSTANTS.read().eta_water
}

/// Set the kinematic viscosity of water; returns the new value.
pub fn set_eta_water(new_val: f64) -> f64 {
    CONSTANTS.write().eta_water = new_val;
    new_val
}

// =============================================================================
// TESTS
// =============================================================================
