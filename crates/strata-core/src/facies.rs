//! Depositional facies flags.
//!
//! A cell of sediment accumulates one bit per process that touched it.
//! Mixing two cells ORs their facies together, so the mask records the
//! full depositional history rather than a single dominant process.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Facies designation of a parcel of sediment
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Facies: u8 {
        const BEDLOAD     = 1 << 0;
        const PLUME       = 1 << 1;
        const DEBRIS_FLOW = 1 << 2;
        const TURBIDITE   = 1 << 3;
        const DIFFUSED    = 1 << 4;
        const RIVER       = 1 << 5;
        const WAVE        = 1 << 6;
        const ALONG_SHORE = 1 << 7;
    }
}

impl Default for Facies {
    fn default() -> Facies {
        Facies::empty()
    }
}

impl Facies {
    /// The blank designation of untouched sediment.
    pub fn nothing() -> Facies {
        Facies::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_is_bitwise_or() {
        let a = Facies::PLUME | Facies::RIVER;
        let b = Facies::WAVE;
        assert_eq!(a | b, Facies::PLUME | Facies::RIVER | Facies::WAVE);
        assert!(Facies::nothing().is_empty());
    }

    #[test]
    fn round_trips_through_bits() {
        let f = Facies::TURBIDITE | Facies::DIFFUSED;
        assert_eq!(Facies::from_bits(f.bits()), Some(f));
    }
}
