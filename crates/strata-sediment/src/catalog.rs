//! The ordered grain-type catalog and the ambient registry.
//!
//! A [`Catalog`] is an append-only sequence of grain types; index 0 is
//! bedload by convention.  One catalog can be registered as the ambient,
//! process-wide catalog that cells and columns resolve their composition
//! against.  Registration is set-once: the first call wins and later
//! calls are ignored until the ambient is cleared (a teardown or test
//! seam).

use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

use crate::grain::GrainType;

/// An ordered, append-only collection of grain types.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    types: Vec<GrainType>,
}

impl Catalog {
    pub fn new() -> Catalog {
        Catalog { types: Vec::new() }
    }

    /// Build a catalog from an ordered list of grain types, deduplicating
    /// equal entries the way [`Catalog::add`] does.
    pub fn from_types(types: impl IntoIterator<Item = GrainType>) -> Catalog {
        let mut cat = Catalog::new();
        for t in types {
            cat.add(t);
        }
        cat
    }

    /// Number of grain types in the catalog.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// The grain type at a given index.
    pub fn get(&self, i: usize) -> Option<&GrainType> {
        self.types.get(i)
    }

    /// The bedload grain type (index 0 by convention).
    pub fn bedload(&self) -> Option<&GrainType> {
        self.types.first()
    }

    /// Append a grain type unless an equal one is already present.
    ///
    /// Returns true when the type was appended.
    pub fn add(&mut self, t: GrainType) -> bool {
        if self.has_type(&t) {
            false
        } else {
            self.types.push(t);
            true
        }
    }

    /// Is an equal grain type already present?
    pub fn has_type(&self, t: &GrainType) -> bool {
        self.types.iter().any(|u| u.approx_eq(t))
    }

    pub fn iter(&self) -> impl Iterator<Item = &GrainType> {
        self.types.iter()
    }

    // -------------------------------------------------------------------------
    // Reducers
    // -------------------------------------------------------------------------

    /// Evaluate a per-type property for every entry.
    pub fn property(&self, p: impl Fn(&GrainType) -> f64) -> Vec<f64> {
        self.types.iter().map(p).collect()
    }

    /// Fraction-weighted average of a per-type property.
    pub fn avg(&self, f: &[f64], p: impl Fn(&GrainType) -> f64) -> f64 {
        self.types
            .iter()
            .zip(f)
            .map(|(t, &frac)| frac * p(t))
            .sum()
    }

    /// Fraction-weighted average of a one-argument per-type property.
    pub fn avg1(&self, f: &[f64], arg: f64, p: impl Fn(&GrainType, f64) -> f64) -> f64 {
        self.types
            .iter()
            .zip(f)
            .map(|(t, &frac)| frac * p(t, arg))
            .sum()
    }

    /// Fraction-weighted average of a two-argument per-type property.
    pub fn avg2(
        &self,
        f: &[f64],
        arg_1: f64,
        arg_2: f64,
        p: impl Fn(&GrainType, f64, f64) -> f64,
    ) -> f64 {
        self.types
            .iter()
            .zip(f)
            .map(|(t, &frac)| frac * p(t, arg_1, arg_2))
            .sum()
    }

    /// Fraction-weighted average that skips vanishing fractions.
    ///
    /// Used by the reductions whose per-type function is undefined for an
    /// absent grain class (compaction density, strength, consolidation,
    /// size-class membership).
    pub fn avg_filtered(&self, f: &[f64], p: impl Fn(&GrainType) -> f64) -> f64 {
        self.types
            .iter()
            .zip(f)
            .filter(|(_, &frac)| frac > 1e-12)
            .map(|(t, &frac)| frac * p(t))
            .sum()
    }
}

// =============================================================================
// AMBIENT CATALOG
// =============================================================================

static AMBIENT: RwLock<Option<Arc<Catalog>>> = RwLock::new(None);

/// Register a catalog as the process-wide ambient catalog.
///
/// Only the first registration takes effect; the catalog is cloned so the
/// caller keeps ownership of its copy.  Returns true when the catalog was
/// installed, false when an ambient catalog was already set.
pub fn set_ambient(cat: &Catalog) -> bool {
    let mut slot = AMBIENT.write();
    if slot.is_some() {
        return false;
    }
    debug!(n_types = cat.len(), "registering ambient sediment catalog");
    *slot = Some(Arc::new(cat.clone()));
    true
}

/// Clear the ambient catalog (teardown / test seam).
pub fn clear_ambient() {
    let mut slot = AMBIENT.write();
    if slot.take().is_some() {
        debug!("cleared ambient sediment catalog");
    }
}

/// A handle to the ambient catalog, if one is registered.
pub fn ambient() -> Option<Arc<Catalog>> {
    AMBIENT.read().clone()
}

/// Is an ambient catalog registered?
pub fn ambient_is_set() -> bool {
    AMBIENT.read().is_some()
}

/// Number of grain types in the ambient catalog, 0 when unset.
pub fn ambient_size() -> usize {
    AMBIENT.read().as_ref().map_or(0, |c| c.len())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn grain(gz: f64) -> GrainType {
        let mut g = GrainType::new();
        g.set_grain_size(gz)
            .set_rho_grain(2600.0)
            .set_rho_sat(1800.0)
            .set_void_ratio_min(0.2)
            .set_diff_coef(0.25)
            .set_lambda(16.8)
            .set_c_consolidation(10_000.0)
            .set_compressibility(5e-8);
        g
    }

    #[test]
    fn add_deduplicates_equal_types() {
        let mut cat = Catalog::new();
        assert!(cat.add(grain(100.0)));
        assert!(!cat.add(grain(100.0)));
        assert!(cat.add(grain(40.0)));
        assert_eq!(cat.len(), 2);
    }

    #[test]
    fn bedload_is_index_zero() {
        let cat = Catalog::from_types([grain(200.0), grain(40.0)]);
        assert!((cat.bedload().unwrap().grain_size() - 200.0).abs() < 1e-12);
        assert!((cat.get(1).unwrap().grain_size() - 40.0).abs() < 1e-12);
        assert!(cat.get(2).is_none());
    }

    #[test]
    fn avg_weights_by_fraction() {
        let cat = Catalog::from_types([grain(200.0), grain(40.0)]);
        let f = [0.25, 0.75];
        let avg = cat.avg(&f, |g| g.grain_size());
        assert!((avg - (0.25 * 200.0 + 0.75 * 40.0)).abs() < 1e-12);
    }

    #[test]
    fn avg_filtered_skips_vanishing_fractions() {
        let cat = Catalog::from_types([grain(200.0), grain(40.0)]);
        let f = [1.0, 1e-15];
        let avg = cat.avg_filtered(&f, |g| g.grain_size());
        assert!((avg - 200.0).abs() < 1e-12);
    }
}
