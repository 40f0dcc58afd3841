//! A parcel of sediment.
//!
//! A [`Cell`] holds some amount of sediment as a vector of grain-type
//! fractions plus a current and an uncompacted thickness.  The ratio
//! t/t_0 <= 1 encodes how far the parcel has compacted; `resize` changes
//! the amount of sediment while preserving that ratio, `compact` changes
//! the current thickness only.  Cells also carry the mean age of their
//! sediment, the excess pore-water pressure, and the facies history.
//!
//! Thicknesses are per unit area, so a cell's mass has units of kg/m^2
//! and its load is a pressure.
//!
//! Composition-dependent properties are fraction-weighted reductions over
//! the ambient catalog; with no ambient catalog registered they all
//! return 0.

use strata_core::{constants, Facies, SizeClass};
use strata_sediment::catalog::{self, Catalog};
use strata_sediment::GrainType;

/// Kozeny-Carman shape factor, as in the per-type permeability.
const S_F: f64 = 1.25;

/// A homogeneous parcel of sediment.
///
/// The default value is the zero-width placeholder used for unfilled
/// column storage: no grain types, no thickness.  Adding sediment to a
/// placeholder adopts the composition width of the added cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    /// Fraction of each grain type; sums to 1 when the cell is non-empty
    pub(crate) f: Vec<f64>,
    /// Current thickness (m)
    pub(crate) t: f64,
    /// Uncompacted thickness (m), >= t
    pub(crate) t_0: f64,
    /// Mean age of the sediment (yr)
    pub(crate) age: f64,
    /// Excess pore-water pressure (Pa)
    pub(crate) pressure: f64,
    /// Facies history
    pub(crate) facies: Facies,
}

impl Cell {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// A clear cell with `n` grain types.
    pub fn new(n: usize) -> Cell {
        assert!(n > 0, "a cell needs at least one grain type");
        Cell {
            f: vec![0.0; n],
            ..Cell::default()
        }
    }

    /// A clear cell sized to the ambient catalog, or `None` when no
    /// ambient catalog is registered.
    pub fn new_ambient() -> Option<Cell> {
        match catalog::ambient_size() {
            0 => None,
            n => Some(Cell::new(n)),
        }
    }

    /// A cell with the given fractions and thickness.
    pub fn new_sized(n: usize, t: f64, f: &[f64]) -> Cell {
        let mut c = Cell::new(n);
        c.resize(t);
        c.set_fraction(f);
        c
    }

    /// A cell of thickness `t` composed entirely of one grain type.
    ///
    /// `cat` defaults to the ambient catalog when `None`.
    pub fn new_typed(cat: Option<&Catalog>, t: f64, grain: &GrainType) -> Option<Cell> {
        let ambient;
        let cat = match cat {
            Some(c) => c,
            None => {
                ambient = catalog::ambient()?;
                &*ambient
            }
        };

        let f: Vec<f64> = cat
            .iter()
            .map(|g| if g.approx_eq(grain) { 1.0 } else { 0.0 })
            .collect();

        Some(Cell::new_sized(f.len(), t, &f))
    }

    /// A cell of thickness `t` spread uniformly over the grain types
    /// whose size class intersects `class`.
    pub fn new_classed(cat: Option<&Catalog>, t: f64, class: SizeClass) -> Option<Cell> {
        let ambient;
        let cat = match cat {
            Some(c) => c,
            None => {
                ambient = catalog::ambient()?;
                &*ambient
            }
        };

        let mut f: Vec<f64> = cat.iter().map(|g| g.is_size_class(class)).collect();
        let sum: f64 = f.iter().sum();
        if sum > 0.0 {
            for v in f.iter_mut() {
                *v /= sum;
            }
        }

        Some(Cell::new_sized(f.len(), t, &f))
    }

    /// A cell of thickness `t` of pure bedload (catalog index 0).
    pub fn new_bedload(cat: Option<&Catalog>, t: f64) -> Option<Cell> {
        let ambient;
        let cat = match cat {
            Some(c) => c,
            None => {
                ambient = catalog::ambient()?;
                &*ambient
            }
        };

        let mut f = vec![0.0; cat.len()];
        f[0] = 1.0;
        Some(Cell::new_sized(f.len(), t, &f))
    }

    /// Deep-copy `src` into this cell.
    pub fn copy_from(&mut self, src: &Cell) {
        debug_assert!(
            self.f.is_empty() || self.is_compatible(src),
            "copying between incompatible cells"
        );
        self.f.clear();
        self.f.extend_from_slice(&src.f);
        self.t = src.t;
        self.t_0 = src.t_0;
        self.age = src.age;
        self.pressure = src.pressure;
        self.facies = src.facies;
    }

    /// Reset all state to the newly-created form.
    pub fn clear(&mut self) -> &mut Self {
        for v in self.f.iter_mut() {
            *v = 0.0;
        }
        self.t = 0.0;
        self.t_0 = 0.0;
        self.age = 0.0;
        self.pressure = 0.0;
        self.facies = Facies::nothing();
        self
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Number of grain types.
    pub fn n_types(&self) -> usize {
        self.f.len()
    }

    /// Current thickness (m).
    pub fn size(&self) -> f64 {
        self.t
    }

    /// Uncompacted thickness (m).
    pub fn size_0(&self) -> f64 {
        self.t_0
    }

    /// Mean age of the sediment (yr).
    pub fn age(&self) -> f64 {
        self.age
    }

    /// Mean age in years.
    pub fn age_in_years(&self) -> f64 {
        self.age
    }

    /// Excess pore-water pressure (Pa).
    pub fn pressure(&self) -> f64 {
        self.pressure
    }

    /// Facies history.
    pub fn facies(&self) -> Facies {
        self.facies
    }

    /// Fraction of grain type `n`, 0 for an out-of-range index.
    pub fn fraction(&self, n: usize) -> f64 {
        self.f.get(n).copied().unwrap_or(0.0)
    }

    /// The fraction vector.
    pub fn fractions(&self) -> &[f64] {
        &self.f
    }

    /// A copy of the fraction vector.
    pub fn copy_fraction(&self) -> Vec<f64> {
        self.f.clone()
    }

    // -------------------------------------------------------------------------
    // Setters
    // -------------------------------------------------------------------------

    pub fn set_age(&mut self, age: f64) -> &mut Self {
        self.age = age;
        self
    }

    pub fn set_pressure(&mut self, p: f64) -> &mut Self {
        self.pressure = p;
        self
    }

    pub fn set_facies(&mut self, f: Facies) -> &mut Self {
        self.facies = f;
        self
    }

    /// OR a facies flag into the history.
    pub fn add_facies(&mut self, f: Facies) -> &mut Self {
        self.facies |= f;
        self
    }

    /// Overwrite the fraction vector.
    pub fn set_fraction(&mut self, f: &[f64]) -> &mut Self {
        debug_assert_eq!(f.len(), self.f.len());
        self.f.copy_from_slice(f);
        self
    }

    /// Set every fraction to 1/n.
    pub fn set_equal_fraction(&mut self) -> &mut Self {
        let len = self.f.len();
        for v in self.f.iter_mut() {
            *v = 1.0 / len as f64;
        }
        self
    }

    /// Set both composition and size from per-type amounts.
    ///
    /// The fractions are the normalized amounts and the new size is their
    /// sum; a zero sum clears the cell.
    pub fn set_amount(&mut self, t: &[f64]) -> &mut Self {
        debug_assert_eq!(t.len(), self.f.len());
        let sum: f64 = t.iter().sum();

        if sum > 0.0 {
            for (v, &ti) in self.f.iter_mut().zip(t) {
                *v = ti / sum;
            }
            self.resize(sum);
        } else {
            self.clear();
        }
        self
    }

    /// Mass-weighted merge with per-type amounts of fresh, uncompacted
    /// sediment: both t and t_0 grow by the total amount.
    pub fn add_amount(&mut self, t: &[f64]) -> &mut Self {
        debug_assert_eq!(t.len(), self.f.len());
        let sum: f64 = t.iter().sum();

        if sum > 0.0 {
            let new_t = sum + self.t;
            for (v, &ti) in self.f.iter_mut().zip(t) {
                *v = (*v * self.t + ti) / new_t;
            }
            self.t += sum;
            self.t_0 += sum;
        }
        self
    }

    /// Change the amount of sediment, preserving the compaction ratio.
    ///
    /// A non-positive thickness clears the cell.
    pub fn resize(&mut self, t: f64) -> &mut Self {
        if t > 0.0 {
            if self.t > 0.0 {
                let ratio = self.t_0 / self.t;
                self.t = t;
                self.t_0 = t * ratio;
            } else {
                self.t = t;
                self.t_0 = t;
            }
        } else {
            self.clear();
        }
        self
    }

    /// Squeeze the parcel to a new current thickness.
    ///
    /// The uncompacted thickness is untouched, so the sediment becomes
    /// denser.
    pub fn compact(&mut self, new_t: f64) -> &mut Self {
        debug_assert!(new_t >= 0.0);
        self.t = new_t.max(0.0);
        self
    }

    // -------------------------------------------------------------------------
    // Mixing
    // -------------------------------------------------------------------------

    /// Mix another cell into this one.
    ///
    /// Fractions mix mass-weighted, thicknesses add, age and pressure mix
    /// size-weighted, facies OR together.  Adding an empty cell is a
    /// no-op; adding to a zero-width placeholder adopts the composition.
    pub fn add(&mut self, b: &Cell) -> &mut Self {
        if b.is_empty() {
            return self;
        }

        if self.f.is_empty() {
            self.copy_from(b);
            return self;
        }

        debug_assert!(self.is_compatible(b), "adding incompatible cells");

        let ratio = self.t / b.t;
        for (v, &bf) in self.f.iter_mut().zip(&b.f) {
            *v = (*v * ratio + bf) / (ratio + 1.0);
        }

        self.t += b.t;
        self.t_0 += b.t_0;
        self.age = (self.age * ratio + b.age) / (ratio + 1.0);
        self.pressure = (self.pressure * ratio + b.pressure) / (ratio + 1.0);
        self.facies |= b.facies;

        self
    }

    // -------------------------------------------------------------------------
    // Predicates
    // -------------------------------------------------------------------------

    /// Is the parcel too thin to matter?
    pub fn is_empty(&self) -> bool {
        self.t < 1e-12
    }

    /// Is the cell in the newly-created state (empty and fraction-free)?
    pub fn is_clear(&self) -> bool {
        self.is_empty() && self.f.iter().all(|&v| v < 1e-12)
    }

    /// Structural validity: positive grain count, non-negative size,
    /// fractions in [0, 1] summing to 1 unless clear.
    pub fn is_valid(&self) -> bool {
        if self.f.is_empty() || self.t < 0.0 {
            return false;
        }

        let mut sum = 0.0;
        for &v in &self.f {
            if !(0.0..=1.0).contains(&v) {
                return false;
            }
            sum += v;
        }

        (sum - 1.0).abs() <= 1e-6 || self.is_clear()
    }

    /// Do two cells hold the same number of grain types?
    pub fn is_compatible(&self, other: &Cell) -> bool {
        self.f.len() == other.f.len()
    }

    pub fn is_size(&self, t: f64) -> bool {
        (self.t - t).abs() < 1e-12
    }

    pub fn is_age(&self, a: f64) -> bool {
        (self.age - a).abs() < 1e-12
    }

    pub fn is_mass(&self, m: f64) -> bool {
        (self.mass() - m).abs() < 1e-12
    }

    /// Does the cell's size class intersect the mask?
    pub fn is_size_class(&self, mask: SizeClass) -> bool {
        self.size_class().intersects(mask)
    }

    /// Field-wise comparison with a 1e-6 tolerance.
    pub fn approx_eq(&self, other: &Cell) -> bool {
        self.f.len() == other.f.len()
            && (self.t - other.t).abs() <= 1e-6
            && (self.age - other.age).abs() <= 1e-6
            && self.facies == other.facies
            && self
                .f
                .iter()
                .zip(&other.f)
                .all(|(a, b)| (a - b).abs() <= 1e-6)
    }

    // -------------------------------------------------------------------------
    // Separation
    // -------------------------------------------------------------------------

    /// Remove up to `t` of thickness from this cell, returning the
    /// removed parcel.
    pub fn separate_thickness(&mut self, t: f64) -> Cell {
        let total = self.t;
        let in_size = (total - t).clamp(0.0, total);
        let out_size = total - in_size;

        let mut out = self.clone();
        self.resize(in_size);
        out.resize(out_size);
        out
    }

    /// Remove a fraction of each grain type, returning the removed
    /// parcel.
    pub fn separate_fraction(&mut self, f: &[f64]) -> Cell {
        let mut out = self.clone();

        if !self.is_empty() {
            let in_size = self.t;
            let in_t: Vec<f64> = self
                .f
                .iter()
                .zip(f)
                .map(|(&fi, &sep)| (1.0 - sep) * in_size * fi)
                .collect();
            let out_t: Vec<f64> = self
                .f
                .iter()
                .zip(f)
                .map(|(&fi, &sep)| sep * in_size * fi)
                .collect();

            self.set_amount(&in_t);
            out.set_amount(&out_t);
        }

        out
    }

    /// Remove explicit per-type thicknesses, returning the removed
    /// parcel.  Amounts beyond what is present are clamped.
    pub fn separate_amount(&mut self, t: &[f64]) -> Cell {
        if self.is_empty() {
            let mut out = self.clone();
            out.resize(0.0);
            return out;
        }

        let total = self.t;
        let f: Vec<f64> = self
            .f
            .iter()
            .zip(t)
            .map(|(&fi, &ti)| {
                if fi > 0.0 {
                    (ti / (total * fi)).clamp(0.0, 1.0)
                } else {
                    0.0
                }
            })
            .collect();

        self.separate_fraction(&f)
    }

    /// Remove a total thickness `t` distributed over the grain types by
    /// the normalized weights `f`.
    pub fn separate(&mut self, f: &[f64], t: f64) -> Cell {
        debug_assert!(t >= 0.0);

        if self.is_empty() {
            return self.clone();
        }

        let sum: f64 = f.iter().sum();
        let t_rem: Vec<f64> = f.iter().map(|&fi| fi / sum * t).collect();
        self.separate_amount(&t_rem)
    }

    /// Remove a parcel matching another cell's composition and size,
    /// discarding it.
    pub fn separate_cell(&mut self, reference: &Cell) {
        let f = reference.copy_fraction();
        let _ = self.separate(&f, reference.size());
    }

    /// Move `t` of thickness into another cell (accumulating).
    pub fn move_thickness(&mut self, dest: &mut Cell, t: f64) {
        debug_assert!(self.is_compatible(dest));
        if t > 0.0 {
            let tmp = self.separate_thickness(t);
            dest.add(&tmp);
        }
    }

    /// Move per-type fractions into another cell (accumulating).
    pub fn move_fraction(&mut self, dest: &mut Cell, f: &[f64]) {
        debug_assert!(self.is_compatible(dest));
        let tmp = self.separate_fraction(f);
        dest.add(&tmp);
    }

    /// Move fractions of a maximum thickness into another cell; the
    /// unselected part of the removed thickness returns to this cell.
    pub fn move_cell(&mut self, dest: &mut Cell, f: &[f64], t: f64) {
        let mut removed = self.separate_thickness(t);
        let selected = removed.separate_fraction(f);

        self.add(&removed);
        dest.add(&selected);
    }

    // -------------------------------------------------------------------------
    // Bulk properties (reductions over the ambient catalog)
    // -------------------------------------------------------------------------

    fn with_ambient(&self, f: impl FnOnce(&Catalog) -> f64) -> f64 {
        match catalog::ambient() {
            Some(cat) => f(&cat),
            None => 0.0,
        }
    }

    /// Bulk density in the uncompacted reference state (kg/m^3).
    pub fn density_0(&self) -> f64 {
        self.with_ambient(|cat| cat.avg(&self.f, |g| g.density_0()))
    }

    /// Bulk density accounting for compaction (kg/m^3).
    pub fn density(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let d = self.t / self.t_0;
        self.with_ambient(|cat| cat.avg_filtered(&self.f, |g| g.density_compacted(d)))
    }

    /// Mean grain density (kg/m^3).
    pub fn grain_density(&self) -> f64 {
        self.with_ambient(|cat| cat.avg(&self.f, |g| g.rho_grain()))
    }

    /// Bulk density at closest packing (kg/m^3).
    pub fn max_density(&self) -> f64 {
        self.with_ambient(|cat| cat.avg(&self.f, |g| g.rho_max()))
    }

    /// Mean grain size (um).
    pub fn grain_size(&self) -> f64 {
        self.with_ambient(|cat| cat.avg(&self.f, |g| g.grain_size()))
    }

    /// Mean grain size in phi units.
    pub fn grain_size_in_phi(&self) -> f64 {
        self.with_ambient(|cat| cat.avg(&self.f, |g| g.grain_size_in_phi()))
    }

    /// Fraction of the cell that is sand.
    pub fn sand_fraction(&self) -> f64 {
        self.with_ambient(|cat| cat.avg(&self.f, |g| g.is_sand()))
    }

    /// Fraction of the cell that is silt.
    pub fn silt_fraction(&self) -> f64 {
        self.with_ambient(|cat| cat.avg(&self.f, |g| g.is_silt()))
    }

    /// Fraction of the cell that is clay.
    pub fn clay_fraction(&self) -> f64 {
        self.with_ambient(|cat| cat.avg(&self.f, |g| g.is_clay()))
    }

    /// Fraction of the cell that is mud (silt and clay).
    pub fn mud_fraction(&self) -> f64 {
        self.with_ambient(|cat| cat.avg(&self.f, |g| g.is_mud()))
    }

    /// Alias for [`Cell::fraction`], matching the property registry.
    pub fn nth_fraction(&self, n: usize) -> f64 {
        self.fraction(n)
    }

    /// Speed of sound through the cell (m/s).
    pub fn velocity(&self) -> f64 {
        self.with_ambient(|cat| cat.avg(&self.f, |g| g.velocity()))
    }

    /// Mean viscosity (kg/m/s).
    pub fn viscosity(&self) -> f64 {
        self.with_ambient(|cat| cat.avg(&self.f, |g| g.viscosity()))
    }

    /// Mean relative density.
    pub fn relative_density(&self) -> f64 {
        self.with_ambient(|cat| cat.avg(&self.f, |g| g.relative_density()))
    }

    /// Mean reference-state porosity.
    pub fn porosity(&self) -> f64 {
        self.with_ambient(|cat| cat.avg(&self.f, |g| g.porosity()))
    }

    /// Mean closest-packed porosity.
    pub fn porosity_min(&self) -> f64 {
        self.with_ambient(|cat| cat.avg(&self.f, |g| g.porosity_min()))
    }

    /// Mean loosest-state porosity.
    pub fn porosity_max(&self) -> f64 {
        self.with_ambient(|cat| cat.avg(&self.f, |g| g.porosity_max()))
    }

    /// Mean plastic index.
    pub fn plastic_index(&self) -> f64 {
        self.with_ambient(|cat| cat.avg(&self.f, |g| g.plastic_index()))
    }

    /// Mean per-type permeability (m^2).
    pub fn permeability(&self) -> f64 {
        self.with_ambient(|cat| cat.avg(&self.f, |g| g.permeability()))
    }

    /// Mean per-type hydraulic conductivity (m/s).
    pub fn hydraulic_conductivity(&self) -> f64 {
        self.with_ambient(|cat| cat.avg(&self.f, |g| g.hydraulic_conductivity()))
    }

    /// Whole-cell Kozeny-Carman permeability from the mean specific
    /// surface and the compaction-corrected void ratio (m^2).
    pub fn bulk_permeability(&self) -> f64 {
        let e = self.void_ratio();
        let s =
            6.0 * self.with_ambient(|cat| cat.avg(&self.f, |g| g.inv_grain_size_in_meters()));

        1.0 / (5.0 * S_F * s * s) * (e.powi(3) / (1.0 + e))
    }

    /// Whole-cell hydraulic conductivity (m/s).
    pub fn bulk_hydraulic_conductivity(&self) -> f64 {
        self.bulk_permeability() * constants::GAMMA_WATER / constants::mu_water()
    }

    /// Void ratio accounting for compaction.
    pub fn void_ratio(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let e = self.with_ambient(|cat| cat.avg(&self.f, |g| g.void_ratio()));
        (self.t / self.t_0) * (1.0 + e) - 1.0
    }

    /// Mean closest-packed void ratio.
    pub fn void_ratio_min(&self) -> f64 {
        self.with_ambient(|cat| cat.avg(&self.f, |g| g.void_ratio_min()))
    }

    /// Mean loosest-state void ratio.
    pub fn void_ratio_max(&self) -> f64 {
        self.with_ambient(|cat| cat.avg(&self.f, |g| g.void_ratio_max()))
    }

    /// Mean Coulomb friction angle (degrees).
    pub fn friction_angle(&self) -> f64 {
        self.with_ambient(|cat| cat.avg(&self.f, |g| g.friction_angle()))
    }

    /// Mean consolidation coefficient (m^2/yr).
    pub fn cc(&self) -> f64 {
        self.with_ambient(|cat| cat.avg(&self.f, |g| g.c_consolidation()))
    }

    /// Mean compressibility coefficient.
    pub fn compressibility(&self) -> f64 {
        self.with_ambient(|cat| cat.avg(&self.f, |g| g.compressibility()))
    }

    /// Mean remolded yield strength (Pa).
    pub fn yield_strength(&self) -> f64 {
        self.with_ambient(|cat| cat.avg(&self.f, |g| g.yield_strength()))
    }

    /// Whole-cell remolded yield strength (Pa), from the bulk sediment
    /// concentration.
    pub fn bulk_yield_strength(&self) -> f64 {
        let conc = 1.0 - self.porosity();
        0.1 * (13.0 * (conc - 0.05)).exp()
    }

    /// Mean dynamic viscosity (kg/m/s).
    pub fn dynamic_viscosity(&self) -> f64 {
        self.with_ambient(|cat| cat.avg(&self.f, |g| g.dynamic_viscosity()))
    }

    /// Whole-cell dynamic viscosity (kg/m/s), from the bulk sediment
    /// concentration.
    pub fn bulk_dynamic_viscosity(&self) -> f64 {
        let conc = 1.0 - self.porosity();
        constants::eta_water() * (1.0 + 2.5 * conc + (10.0 * (conc - 0.05)).exp())
    }

    /// Mean coefficient of volume compressibility.
    pub fn mv(&self) -> f64 {
        self.with_ambient(|cat| cat.avg(&self.f, |g| g.compressibility()))
    }

    /// Mean per-type coefficient of consolidation.
    pub fn cv(&self) -> f64 {
        self.with_ambient(|cat| cat.avg(&self.f, |g| g.cv()))
    }

    /// Whole-cell coefficient of consolidation.
    pub fn bulk_cv(&self) -> f64 {
        let mv = self.mv();
        self.bulk_hydraulic_conductivity() / (constants::GAMMA_WATER * mv)
    }

    /// Undrained shear strength under an effective load (Pa).
    pub fn shear_strength(&self, load: f64) -> f64 {
        self.with_ambient(|cat| cat.avg_filtered(&self.f, |g| g.shear_strength(load)))
    }

    /// Cohesion under a load reduced by the excess pore pressure (Pa).
    pub fn cohesion(&self, load: f64) -> f64 {
        let load = (load - self.pressure).max(0.0);
        self.with_ambient(|cat| cat.avg_filtered(&self.f, |g| g.cohesion(load)))
    }

    /// Average degree of consolidation at the model time `now`.
    pub fn consolidation(&self, now: f64) -> f64 {
        let dt = now - self.age;
        let d = self.t;
        self.with_ambient(|cat| cat.avg_filtered(&self.f, |g| g.consolidation(d, dt)))
    }

    /// Consolidation rate at the model time `now`.
    pub fn consolidation_rate(&self, now: f64) -> f64 {
        let dt = now - self.age;
        let d = self.t;
        self.with_ambient(|cat| cat.avg_filtered(&self.f, |g| g.consolidation_rate(d, dt)))
    }

    /// Pore pressure in excess of hydrostatic, floored at zero (Pa).
    pub fn excess_pressure(&self, hydro_static: f64) -> f64 {
        (self.pressure - hydro_static).max(0.0)
    }

    /// Pore pressure as a fraction of the overlying load.
    pub fn relative_pressure(&self, load: f64) -> f64 {
        if load <= 0.0 {
            0.0
        } else {
            self.pressure / load
        }
    }

    /// Wentworth class of the mean grain size.
    pub fn size_class(&self) -> SizeClass {
        SizeClass::from_phi(self.grain_size_in_phi())
    }

    /// Fraction of the cell contained within a size-class mask.
    pub fn size_class_percent(&self, mask: SizeClass) -> f64 {
        self.with_ambient(|cat| cat.avg_filtered(&self.f, |g| g.is_size_class(mask)))
    }

    /// Union of the size classes of every grain type present.
    pub fn size_classes(&self) -> SizeClass {
        match catalog::ambient() {
            Some(cat) => cat
                .iter()
                .zip(&self.f)
                .filter(|(_, &frac)| frac > 1e-12)
                .fold(SizeClass::empty(), |acc, (g, _)| acc | g.size_class()),
            None => SizeClass::empty(),
        }
    }

    /// Volume of solid sediment per unit area (m).
    pub fn sediment_volume(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.t / (self.void_ratio() + 1.0)
    }

    /// Mass of solid sediment per unit area (kg/m^2).
    pub fn sediment_mass(&self) -> f64 {
        self.grain_density() * self.sediment_volume()
    }

    /// Mass of the saturated parcel per unit area (kg/m^2).
    pub fn mass(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.t * self.density()
    }

    /// Load exerted by the saturated parcel (Pa).
    pub fn load(&self) -> f64 {
        self.mass() * constants::gravity()
    }

    /// Load exerted by the solid sediment alone (Pa).
    pub fn sediment_load(&self) -> f64 {
        self.sediment_mass() * constants::gravity()
    }
}

// =============================================================================
// TESTS
// =============================================================================
