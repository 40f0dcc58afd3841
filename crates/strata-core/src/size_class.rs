//! Wentworth grain-size classes.
//!
//! Classes are bit flags so that clients can build masks (all sand, all
//! mud, ...) and test membership cheaply.  Each single-bit class covers a
//! phi interval; the coarse sand/silt/clay bucketing used for bulk cell
//! properties follows the class of the *mean* phi, not the dominant one.
//!
//! phi = -log2(d / 1mm), so larger phi means finer grains.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Wentworth size classes and their aggregates
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct SizeClass: u32 {
        const BOULDER          = 1 << 0;  // -12 -> -8 phi
        const COBBLE           = 1 << 1;  //  -8 -> -5 phi
        const PEBBLE           = 1 << 2;  //  -5 -> -2 phi
        const GRANULE          = 1 << 3;  //  -2 -> -1 phi
        const VERY_COARSE_SAND = 1 << 4;  //  -1 ->  0 phi
        const COARSE_SAND      = 1 << 5;  //   0 ->  1 phi
        const MEDIUM_SAND      = 1 << 6;  //   1 ->  2 phi
        const FINE_SAND        = 1 << 7;  //   2 ->  3 phi
        const VERY_FINE_SAND   = 1 << 8;  //   3 ->  4 phi
        const COARSE_SILT      = 1 << 9;  //   4 ->  5 phi
        const MEDIUM_SILT      = 1 << 10; //   5 ->  6 phi
        const FINE_SILT        = 1 << 11; //   6 ->  7 phi
        const VERY_FINE_SILT   = 1 << 12; //   7 ->  8 phi
        const COARSE_CLAY      = 1 << 13; //   8 ->  9 phi
        const MEDIUM_CLAY      = 1 << 14; //   9 -> 10 phi
        const FINE_CLAY        = 1 << 15; //  10 -> 11 phi

        const GRAVEL = Self::PEBBLE.bits() | Self::GRANULE.bits();
        const SAND = Self::VERY_COARSE_SAND.bits()
                   | Self::COARSE_SAND.bits()
                   | Self::MEDIUM_SAND.bits()
                   | Self::FINE_SAND.bits()
                   | Self::VERY_FINE_SAND.bits();
        const SILT = Self::COARSE_SILT.bits()
                   | Self::MEDIUM_SILT.bits()
                   | Self::FINE_SILT.bits()
                   | Self::VERY_FINE_SILT.bits();
        const CLAY = Self::COARSE_CLAY.bits()
                   | Self::MEDIUM_CLAY.bits()
                   | Self::FINE_CLAY.bits();
        const MUD = Self::SILT.bits() | Self::CLAY.bits();
    }
}

impl Default for SizeClass {
    fn default() -> SizeClass {
        SizeClass::empty()
    }
}

/// Maximum phi for each single-bit size class.
pub const BOULDER_PHI: f64 = -8.0;
pub const COBBLE_PHI: f64 = -5.0;
pub const PEBBLE_PHI: f64 = -2.0;
pub const GRANULE_PHI: f64 = -1.0;
pub const VERY_COARSE_SAND_PHI: f64 = 0.0;
pub const COARSE_SAND_PHI: f64 = 1.0;
pub const MEDIUM_SAND_PHI: f64 = 2.0;
pub const FINE_SAND_PHI: f64 = 3.0;
pub const VERY_FINE_SAND_PHI: f64 = 4.0;
pub const COARSE_SILT_PHI: f64 = 5.0;
pub const MEDIUM_SILT_PHI: f64 = 6.0;
pub const FINE_SILT_PHI: f64 = 7.0;
pub const VERY_FINE_SILT_PHI: f64 = 8.0;
pub const COARSE_CLAY_PHI: f64 = 9.0;
pub const MEDIUM_CLAY_PHI: f64 = 10.0;
pub const FINE_CLAY_PHI: f64 = 11.0;

impl SizeClass {
    /// Coarse Wentworth bucket for a grain size in phi units.
    ///
    /// Grains at or below very-fine-sand phi are sand, at or below
    /// very-fine-silt phi are silt, and everything finer is clay.
    pub fn from_phi(phi: f64) -> SizeClass {
        if phi <= VERY_FINE_SAND_PHI {
            SizeClass::SAND
        } else if phi <= VERY_FINE_SILT_PHI {
            SizeClass::SILT
        } else {
            SizeClass::CLAY
        }
    }

    /// Fine Wentworth bucket (one single-bit class) for a phi value.
    pub fn from_phi_fine(phi: f64) -> SizeClass {
        if phi <= BOULDER_PHI {
            SizeClass::BOULDER
        } else if phi <= COBBLE_PHI {
            SizeClass::COBBLE
        } else if phi <= PEBBLE_PHI {
            SizeClass::PEBBLE
        } else if phi <= GRANULE_PHI {
            SizeClass::GRANULE
        } else if phi <= VERY_COARSE_SAND_PHI {
            SizeClass::VERY_COARSE_SAND
        } else if phi <= COARSE_SAND_PHI {
            SizeClass::COARSE_SAND
        } else if phi <= MEDIUM_SAND_PHI {
            SizeClass::MEDIUM_SAND
        } else if phi <= FINE_SAND_PHI {
            SizeClass::FINE_SAND
        } else if phi <= VERY_FINE_SAND_PHI {
            SizeClass::VERY_FINE_SAND
        } else if phi <= COARSE_SILT_PHI {
            SizeClass::COARSE_SILT
        } else if phi <= MEDIUM_SILT_PHI {
            SizeClass::MEDIUM_SILT
        } else if phi <= FINE_SILT_PHI {
            SizeClass::FINE_SILT
        } else if phi <= VERY_FINE_SILT_PHI {
            SizeClass::VERY_FINE_SILT
        } else if phi <= COARSE_CLAY_PHI {
            SizeClass::COARSE_CLAY
        } else if phi <= MEDIUM_CLAY_PHI {
            SizeClass::MEDIUM_CLAY
        } else {
            SizeClass::FINE_CLAY
        }
    }

    /// Does this class share any bits with the mask?
    pub fn is_in(self, mask: SizeClass) -> bool {
        self.intersects(mask)
    }
}
