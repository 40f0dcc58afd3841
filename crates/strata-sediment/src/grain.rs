//! A single grain class and its material-property formulas.
//!
//! A [`GrainType`] stores the handful of measured parameters a sediment
//! configuration provides; everything else (void ratio, porosity,
//! permeability, strength, consolidation, ...) is derived on demand from
//! closed forms.
//!
//! # References
//! - Bursik, M.I. (1995) - Theory of the sedimentation of suspended
//!   particles from fluvial plumes
//! - Julien, P. (1995) - Erosion and Sedimentation (yield strength and
//!   dynamic viscosity of hyperconcentrated flows)
//! - Bardet, J.-P. (1997) - Experimental Soil Mechanics (consolidation)

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use strata_core::{constants, SizeClass};

/// Kozeny-Carman shape factor
const S_F: f64 = 1.25;

/// Convert a plume removal rate (1/day) to a settling velocity (m/day).
///
/// The conversion constants come from Bursik (1995).
pub fn removal_rate_to_settling_velocity(lambda: f64) -> f64 {
    lambda * constants::BURSIK_CONST_A3 * constants::BURSIK_CONST_H
}

/// Convert a settling velocity (m/day) back to a removal rate (1/day).
pub fn settling_velocity_to_removal_rate(w_s: f64) -> f64 {
    w_s / (constants::BURSIK_CONST_A3 * constants::BURSIK_CONST_H)
}

/// Terzaghi average degree of consolidation for a layer.
///
/// `c_v` is the consolidation coefficient (m^2/yr), `d` the drainage
/// length (m) and `t` the elapsed time (yr).
pub fn avg_consolidation(c_v: f64, d: f64, t: f64) -> f64 {
    if d <= 0.0 {
        return 1.0;
    }
    let t_v = c_v * t / (d * d);
    if t_v < 0.2827 {
        (4.0 / PI * t_v).sqrt()
    } else {
        1.0 - 8.0 / (PI * PI) * (-PI * PI / 4.0 * t_v).exp()
    }
}

/// Terzaghi degree of consolidation at a depth `z` within a layer.
///
/// Series solution, truncated once successive terms change the sum by
/// less than 0.1%.
pub fn consolidation_at(c_v: f64, d: f64, z: f64, t: f64) -> f64 {
    if d <= 0.0 {
        return 1.0;
    }
    if t <= 0.0 {
        return 0.0;
    }

    let t_v = c_v * t / (d * d);
    let mut u = 0.0;
    let mut eps = f64::MAX;
    let mut n = 1.0;

    while eps > 1e-3 {
        let u_0 = u;
        u += 1.0 / n * (n * PI * z / d).sin() * (-(n * PI * 0.5).powi(2) * t_v).exp();
        eps = ((u_0 - u) / u).abs();
        n += 2.0;
    }
    u *= 4.0 / PI;

    1.0 - u
}

/// One grain class of a sediment catalog.
///
/// The stored fields are exactly the measured quantities of the sediment
/// configuration format; the settling velocity is cached and kept in sync
/// with the removal rate by the two setters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GrainType {
    /// Median grain diameter (um)
    grain_size: f64,
    /// Density of the solid mineral grain (kg/m^3)
    rho_grain: f64,
    /// Saturated bulk density at the reference state (kg/m^3)
    rho_sat: f64,
    /// Void ratio at closest packing (-)
    void_min: f64,
    /// Diffusion coefficient used by client processes (-)
    diff_coef: f64,
    /// Removal rate (1/day)
    lambda: f64,
    /// Consolidation coefficient (m^2/yr)
    c_v: f64,
    /// Compressibility coefficient (-)
    c: f64,
    /// Plastic index (-)
    plastic_index: f64,
    /// Settling velocity (m/day), cached from the removal rate
    w_s: f64,
}

impl GrainType {
    pub fn new() -> GrainType {
        GrainType::default()
    }

    // -------------------------------------------------------------------------
    // Setters (chainable, keeping lambda and w_s consistent)
    // -------------------------------------------------------------------------

    pub fn set_grain_size(&mut self, gz: f64) -> &mut Self {
        self.grain_size = gz;
        self
    }

    pub fn set_rho_grain(&mut self, rho_grain: f64) -> &mut Self {
        self.rho_grain = rho_grain;
        self
    }

    pub fn set_rho_sat(&mut self, rho_sat: f64) -> &mut Self {
        self.rho_sat = rho_sat;
        self
    }

    pub fn set_void_ratio_min(&mut self, void_min: f64) -> &mut Self {
        self.void_min = void_min;
        self
    }

    pub fn set_diff_coef(&mut self, k: f64) -> &mut Self {
        self.diff_coef = k;
        self
    }

    /// Set the removal rate; the settling velocity follows.
    pub fn set_lambda(&mut self, lambda: f64) -> &mut Self {
        self.lambda = lambda;
        self.w_s = removal_rate_to_settling_velocity(lambda);
        self
    }

    /// Set the settling velocity; the removal rate follows.
    pub fn set_settling_velocity(&mut self, w_s: f64) -> &mut Self {
        self.w_s = w_s;
        self.lambda = settling_velocity_to_removal_rate(w_s);
        self
    }

    pub fn set_c_consolidation(&mut self, c_v: f64) -> &mut Self {
        self.c_v = c_v;
        self
    }

    pub fn set_compressibility(&mut self, c: f64) -> &mut Self {
        self.c = c;
        self
    }

    pub fn set_plastic_index(&mut self, pi: f64) -> &mut Self {
        self.plastic_index = pi;
        self
    }

    // -------------------------------------------------------------------------
    // Stored quantities
    // -------------------------------------------------------------------------

    /// Median grain diameter (um)
    pub fn grain_size(&self) -> f64 {
        self.grain_size
    }

    /// Grain density (kg/m^3)
    pub fn rho_grain(&self) -> f64 {
        self.rho_grain
    }

    /// Saturated bulk density (kg/m^3)
    pub fn rho_sat(&self) -> f64 {
        self.rho_sat
    }

    /// Void ratio at closest packing
    pub fn void_ratio_min(&self) -> f64 {
        self.void_min
    }

    /// Diffusion coefficient
    pub fn diff_coef(&self) -> f64 {
        self.diff_coef
    }

    /// Removal rate (1/day)
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Removal rate (1/s)
    pub fn lambda_in_per_seconds(&self) -> f64 {
        self.lambda * constants::DAYS_PER_SECOND
    }

    /// Settling velocity (m/day)
    pub fn settling_velocity(&self) -> f64 {
        self.w_s
    }

    /// Consolidation coefficient (m^2/yr)
    pub fn c_consolidation(&self) -> f64 {
        self.c_v
    }

    /// Compressibility coefficient
    pub fn compressibility(&self) -> f64 {
        self.c
    }

    /// Plastic index
    pub fn plastic_index(&self) -> f64 {
        self.plastic_index
    }

    // -------------------------------------------------------------------------
    // Derived quantities
    // -------------------------------------------------------------------------

    /// Bulk density in the uncompacted reference state (kg/m^3)
    pub fn density_0(&self) -> f64 {
        self.rho_sat
    }

    /// Bulk density at closest packing (kg/m^3)
    pub fn rho_max(&self) -> f64 {
        let e = self.void_min;
        (self.rho_grain + e * constants::rho_sea_water()) / (e + 1.0)
    }

    /// Grain diameter (m)
    pub fn grain_size_in_meters(&self) -> f64 {
        self.grain_size * 1e-6
    }

    /// Reciprocal grain diameter (1/m)
    pub fn inv_grain_size_in_meters(&self) -> f64 {
        1.0 / self.grain_size_in_meters()
    }

    /// Grain diameter in phi units
    pub fn grain_size_in_phi(&self) -> f64 {
        -(self.grain_size / 1000.0).log2()
    }

    /// Wentworth class of this grain type
    pub fn size_class(&self) -> SizeClass {
        SizeClass::from_phi(self.grain_size_in_phi())
    }

    /// 1.0 when this grain type is sand, else 0.0
    pub fn is_sand(&self) -> f64 {
        indicator(self.size_class().intersects(SizeClass::SAND))
    }

    /// 1.0 when this grain type is silt, else 0.0
    pub fn is_silt(&self) -> f64 {
        indicator(self.size_class().intersects(SizeClass::SILT))
    }

    /// 1.0 when this grain type is clay, else 0.0
    pub fn is_clay(&self) -> f64 {
        indicator(self.size_class().intersects(SizeClass::CLAY))
    }

    /// 1.0 when this grain type is silt or clay, else 0.0
    pub fn is_mud(&self) -> f64 {
        indicator(self.size_class().intersects(SizeClass::MUD))
    }

    /// 1.0 when this grain type lies within the size-class mask, else 0.0
    pub fn is_size_class(&self, mask: SizeClass) -> f64 {
        indicator(self.size_class().intersects(mask))
    }

    /// Void ratio in the reference state
    pub fn void_ratio(&self) -> f64 {
        (self.rho_grain - self.rho_sat) / (self.rho_sat - constants::rho_sea_water())
    }

    /// Void ratio in the loosest (uncompacted) state
    pub fn void_ratio_max(&self) -> f64 {
        let p_max = self.porosity_max();
        p_max / (1.0 - p_max)
    }

    /// Void ratio after compacting by the thickness ratio `d` = t/t_0
    pub fn void_ratio_compacted(&self, d: f64) -> f64 {
        d * (1.0 + self.void_ratio()) - 1.0
    }

    /// Bulk density after compacting by the thickness ratio `d` = t/t_0
    pub fn density_compacted(&self, d: f64) -> f64 {
        let e = self.void_ratio_compacted(d);
        (self.rho_grain + e * constants::rho_sea_water()) / (1.0 + e)
    }

    /// Porosity in the reference state
    pub fn porosity(&self) -> f64 {
        let e = self.void_ratio();
        e / (1.0 + e)
    }

    /// Porosity at closest packing
    pub fn porosity_min(&self) -> f64 {
        let e_min = self.void_min;
        e_min / (1.0 + e_min)
    }

    /// Porosity in the loosest state
    pub fn porosity_max(&self) -> f64 {
        self.porosity()
    }

    /// Density relative to the loosest and closest-packed states
    pub fn relative_density(&self) -> f64 {
        let e = self.void_ratio();
        let e_min = self.void_ratio_min();
        let e_max = self.void_ratio_max();
        (e_max - e) / (e_max - e_min)
    }

    /// Kozeny-Carman permeability (m^2), with an assumed shape factor of
    /// 6/d for the specific surface.
    pub fn permeability(&self) -> f64 {
        let e = self.void_ratio();
        let d = self.grain_size_in_meters();
        let s = 6.0 / d;

        (1.0 / (5.0 * S_F * s * s)) * (e.powi(3) / (1.0 + e))
    }

    /// Hydraulic conductivity (m/s)
    pub fn hydraulic_conductivity(&self) -> f64 {
        self.permeability() * constants::GAMMA_WATER / constants::mu_water()
    }

    /// Water mass per unit grain mass
    pub fn water_content(&self) -> f64 {
        self.void_ratio() * (constants::rho_sea_water() / self.rho_grain)
    }

    /// Specific gravity of the solid grains
    pub fn specific_gravity(&self) -> f64 {
        self.rho_grain / constants::rho_sea_water()
    }

    /// Speed of sound through the saturated sediment (m/s)
    pub fn velocity(&self) -> f64 {
        let e = self.void_ratio();
        (e * constants::VELOCITY_IN_WATER + constants::VELOCITY_IN_ROCK) / (e + 1.0)
    }

    /// Viscosity relative to the closest-packed state (kg/m/s).
    ///
    /// Capped at 25x the viscosity of water above a packing ratio of 0.8.
    pub fn viscosity(&self) -> f64 {
        let r = self.void_ratio() / self.void_ratio_min();

        if r > 0.8 {
            constants::eta_water() * 25.0
        } else {
            constants::eta_water() * (1.0 - r).powi(-2)
        }
    }

    /// Dynamic viscosity of the remolded sediment (kg/m/s), Julien's
    /// concentration form.
    pub fn dynamic_viscosity(&self) -> f64 {
        let c = 1.0 - self.porosity();
        let a = if self.size_class() == SizeClass::SAND {
            10.0
        } else {
            23.0
        };

        constants::mu_water() * (1.0 + 2.5 * c + (a * (c - 0.05)).exp())
    }

    /// Coulomb friction angle (degrees), corrected for grain size and
    /// relative density.
    pub fn friction_angle(&self) -> f64 {
        let mut phi = 36.0;
        let grain_size = self.grain_size_in_meters();
        let rho_rel = self.relative_density();

        if grain_size >= 2e-3 {
            phi -= 11.0;
        } else if grain_size >= 0.6e-3 {
            phi -= 9.0;
        } else if grain_size >= 0.2e-3 {
            phi -= 4.0;
        }

        if rho_rel <= 0.5 {
            phi -= 1.0;
        } else if rho_rel > 0.75 {
            phi += 4.0;
        }

        phi
    }

    /// Remolded yield strength of a debris flow (Pa), Julien's form with
    /// the coefficient chosen by size class.
    pub fn yield_strength(&self) -> f64 {
        let c = 1.0 - self.porosity();
        let class = self.size_class();
        let a = if class == SizeClass::SAND {
            3.0
        } else if class == SizeClass::SILT {
            13.0
        } else {
            23.0
        };

        0.1 * (a * (c - 0.05)).exp()
    }

    /// Coefficient of volume compressibility
    pub fn mv(&self) -> f64 {
        self.c
    }

    /// Coefficient of consolidation from permeability and compressibility
    pub fn cv(&self) -> f64 {
        let mv = self.c;
        self.hydraulic_conductivity() / (constants::GAMMA_WATER * mv)
    }

    /// Undrained shear strength under an effective load (Pa)
    pub fn shear_strength(&self, load: f64) -> f64 {
        load * (0.11 + 0.0037 * self.plastic_index)
    }

    /// Cohesion under an effective load (Pa)
    pub fn cohesion(&self, load: f64) -> f64 {
        let a = 0.69;
        let m = 0.6;

        (a * (1.0 - m) * (load * 1e-6).powf(m)) * 1e6
    }

    /// Average degree of consolidation of a layer of drainage length `d`
    /// after a time `dt`.
    pub fn consolidation(&self, d: f64, dt: f64) -> f64 {
        avg_consolidation(self.c_v, d, dt)
    }

    /// Rate form of the degree of consolidation.
    pub fn consolidation_rate(&self, d: f64, dt: f64) -> f64 {
        let t_v = self.c_v * dt / (d * d);

        if t_v < 0.2827 {
            0.5 / (4.0 / PI * dt).sqrt()
        } else {
            2.0 * (-PI * PI * 0.25 * t_v).exp()
        }
    }

    /// Field-wise comparison with a 1e-12 tolerance.
    pub fn approx_eq(&self, other: &GrainType) -> bool {
        (self.rho_grain - other.rho_grain).abs() < 1e-12
            && (self.rho_sat - other.rho_sat).abs() < 1e-12
            && (self.grain_size - other.grain_size).abs() < 1e-12
            && (self.plastic_index - other.plastic_index).abs() < 1e-12
            && (self.void_min - other.void_min).abs() < 1e-12
            && (self.diff_coef - other.diff_coef).abs() < 1e-12
            && (self.lambda - other.lambda).abs() < 1e-12
            && (self.c_v - other.c_v).abs() < 1e-12
            && (self.c - other.c).abs() < 1e-12
            && (self.w_s - other.w_s).abs() < 1e-12
    }
}

fn indicator(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sand() -> GrainType {
        let mut g = GrainType::new();
        g.set_grain_size(200.0)
            .set_rho_grain(2625.0)
            .set_rho_sat(1850.0)
            .set_void_ratio_min(0.3)
            .set_plastic_index(0.1)
            .set_diff_coef(0.25)
            .set_lambda(50.0)
            .set_c_consolidation(100_000.0)
            .set_compressibility(3.68e-8);
        g
    }

    #[test]
    fn settling_velocity_tracks_removal_rate() {
        let g = sand();
        assert!((g.settling_velocity() - 50.0 * 1.74 * 7.5).abs() < 1e-12);

        let mut g2 = g;
        g2.set_settling_velocity(g.settling_velocity());
        assert!((g2.lambda() - 50.0).abs() < 1e-12);
    }

    #[test]
    fn phi_and_size_class() {
        let g = sand();
        // 200 um -> phi = -log2(0.2) = 2.32...
        assert!((g.grain_size_in_phi() - 2.321928).abs() < 1e-5);
        assert_eq!(g.size_class(), SizeClass::SAND);
        assert_eq!(g.is_sand(), 1.0);
        assert_eq!(g.is_mud(), 0.0);
    }

    #[test]
    fn void_ratio_and_porosity() {
        let g = sand();
        let e = (2625.0 - 1850.0) / (1850.0 - 1030.0);
        assert!((g.void_ratio() - e).abs() < 1e-12);
        assert!((g.porosity() - e / (1.0 + e)).abs() < 1e-12);
        // uncompacted state: compaction ratio 1 recovers the reference
        assert!((g.void_ratio_compacted(1.0) - e).abs() < 1e-12);
        assert!((g.density_compacted(1.0) - 1850.0).abs() < 1e-9);
    }

    #[test]
    fn permeability_is_positive_and_small() {
        let g = sand();
        let k = g.permeability();
        assert!(k > 0.0 && k < 1e-8);
        assert!(g.hydraulic_conductivity() > 0.0);
    }

    #[test]
    fn consolidation_limits() {
        // no time -> no consolidation; long time -> full consolidation
        assert!(avg_consolidation(100.0, 10.0, 0.0).abs() < 1e-12);
        assert!((avg_consolidation(100.0, 10.0, 1e6) - 1.0).abs() < 1e-9);
        // zero drainage length consolidates instantly
        assert_eq!(avg_consolidation(100.0, 0.0, 1.0), 1.0);
    }

    #[test]
    fn shear_strength_scales_with_load() {
        let g = sand();
        assert!((g.shear_strength(1000.0) - 1000.0 * (0.11 + 0.0037 * 0.1)).abs() < 1e-9);
        assert_eq!(g.shear_strength(0.0), 0.0);
    }

    #[test]
    fn approx_eq_tolerates_copies() {
        let g = sand();
        let h = g;
        assert!(g.approx_eq(&h));
        let mut h2 = h;
        h2.set_grain_size(201.0);
        assert!(!g.approx_eq(&h2));
    }
}
