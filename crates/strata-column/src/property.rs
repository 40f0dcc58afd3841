//! Named property descriptors.
//!
//! Bulk reductions over a column are parameterized by the property being
//! reduced.  A [`Property`] bundles the measuring function with an
//! explicit flag saying what its extra argument is (nothing, the cell's
//! overlying load, or the column age), so callers dispatch on the flag
//! instead of matching on property names.

use crate::cell::Cell;

/// The measuring function of a property, tagged by arity.
#[derive(Clone, Copy)]
pub enum PropertyFn {
    /// Property of the cell alone
    Zero(fn(&Cell) -> f64),
    /// Property with one extra scalar (a load or a time)
    One(fn(&Cell, f64) -> f64),
    /// Property with two extra scalars
    Two(fn(&Cell, f64, f64) -> f64),
}

/// What a property's extra argument means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtraArg {
    /// No extra argument
    None,
    /// The load overlying the cell (Pa)
    Load,
    /// The column age (yr)
    ColumnAge,
}

/// A named, measurable property of a sediment cell.
#[derive(Clone, Copy)]
pub struct Property {
    name: &'static str,
    ext: &'static str,
    f: PropertyFn,
    extra: ExtraArg,
}

fn facies_bits(c: &Cell) -> f64 {
    c.facies().bits() as f64
}

/// Every property addressable by name.
static ALL: &[Property] = &[
    Property::new("age", "age", PropertyFn::Zero(Cell::age), ExtraArg::None),
    Property::new("facies", "facies", PropertyFn::Zero(facies_bits), ExtraArg::None),
    Property::new("pressure", "press", PropertyFn::Zero(Cell::pressure), ExtraArg::None),
    Property::new("density", "bulk", PropertyFn::Zero(Cell::density), ExtraArg::None),
    Property::new("grain_density", "rhograin", PropertyFn::Zero(Cell::grain_density), ExtraArg::None),
    Property::new("max_density", "rho_max", PropertyFn::Zero(Cell::max_density), ExtraArg::None),
    Property::new("grain", "grain", PropertyFn::Zero(Cell::grain_size_in_phi), ExtraArg::None),
    Property::new("grain_in_meters", "grain", PropertyFn::Zero(Cell::grain_size), ExtraArg::None),
    Property::new("sand", "sand", PropertyFn::Zero(Cell::sand_fraction), ExtraArg::None),
    Property::new("silt", "silt", PropertyFn::Zero(Cell::silt_fraction), ExtraArg::None),
    Property::new("clay", "clay", PropertyFn::Zero(Cell::clay_fraction), ExtraArg::None),
    Property::new("mud", "mud", PropertyFn::Zero(Cell::mud_fraction), ExtraArg::None),
    Property::new("velocity", "vel", PropertyFn::Zero(Cell::velocity), ExtraArg::None),
    Property::new("viscosity", "visc", PropertyFn::Zero(Cell::viscosity), ExtraArg::None),
    Property::new("relative_density", "dr", PropertyFn::Zero(Cell::relative_density), ExtraArg::None),
    Property::new("porosity", "por", PropertyFn::Zero(Cell::porosity), ExtraArg::None),
    Property::new("porosity_min", "pormin", PropertyFn::Zero(Cell::porosity_min), ExtraArg::None),
    Property::new("porosity_max", "pormax", PropertyFn::Zero(Cell::porosity_max), ExtraArg::None),
    Property::new("pi", "pi", PropertyFn::Zero(Cell::plastic_index), ExtraArg::None),
    Property::new("permeability", "perm", PropertyFn::Zero(Cell::permeability), ExtraArg::None),
    Property::new("void_ratio", "void", PropertyFn::Zero(Cell::void_ratio), ExtraArg::None),
    Property::new("void_ratio_min", "emin", PropertyFn::Zero(Cell::void_ratio_min), ExtraArg::None),
    Property::new("void_ratio_max", "emax", PropertyFn::Zero(Cell::void_ratio_max), ExtraArg::None),
    Property::new("friction_angle", "angle", PropertyFn::Zero(Cell::friction_angle), ExtraArg::None),
    Property::new("cc", "cc", PropertyFn::Zero(Cell::cc), ExtraArg::None),
    Property::new("yield_strength", "yield", PropertyFn::Zero(Cell::yield_strength), ExtraArg::None),
    Property::new("dynamic_viscosity", "nu", PropertyFn::Zero(Cell::dynamic_viscosity), ExtraArg::None),
    Property::new("mv", "mv", PropertyFn::Zero(Cell::mv), ExtraArg::None),
    Property::new("cv", "cv", PropertyFn::Zero(Cell::cv), ExtraArg::None),
    Property::new("hydraulic_con", "hydro", PropertyFn::Zero(Cell::bulk_hydraulic_conductivity), ExtraArg::None),
    Property::new("shear_strength", "shear", PropertyFn::One(Cell::shear_strength), ExtraArg::Load),
    Property::new("cohesion", "cohesion", PropertyFn::One(Cell::cohesion), ExtraArg::Load),
    Property::new("consolidation", "con", PropertyFn::One(Cell::consolidation), ExtraArg::ColumnAge),
    Property::new("consolidation_rate", "du", PropertyFn::One(Cell::consolidation_rate), ExtraArg::ColumnAge),
    Property::new("excess_pressure", "excess", PropertyFn::One(Cell::excess_pressure), ExtraArg::Load),
    Property::new("relative_pressure", "rel", PropertyFn::One(Cell::relative_pressure), ExtraArg::Load),
];

impl Property {
    const fn new(name: &'static str, ext: &'static str, f: PropertyFn, extra: ExtraArg) -> Property {
        Property { name, ext, f, extra }
    }

    /// Look a property up by name, case-insensitively.
    ///
    /// A trailing `=...` qualifier (used by output-file specifications)
    /// is stripped before the lookup.
    pub fn by_name(name: &str) -> Option<&'static Property> {
        let name = name.split('=').next().unwrap_or(name).trim();
        ALL.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Every registered property.
    pub fn all() -> &'static [Property] {
        ALL
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// File extension used when the property is written out.
    pub fn ext(&self) -> &'static str {
        self.ext
    }

    /// What the extra argument of the measuring function means.
    pub fn extra(&self) -> ExtraArg {
        self.extra
    }

    /// Does the measuring function take an extra argument?
    pub fn takes_extra_arg(&self) -> bool {
        !matches!(self.f, PropertyFn::Zero(_))
    }

    /// Measure the property on a cell with no extra argument.
    ///
    /// Properties that expect an extra argument receive 0.
    pub fn measure(&self, c: &Cell) -> f64 {
        match self.f {
            PropertyFn::Zero(f) => f(c),
            PropertyFn::One(f) => f(c, 0.0),
            PropertyFn::Two(f) => f(c, 0.0, 0.0),
        }
    }

    /// Measure the property on a cell with one extra argument.
    pub fn measure_with(&self, c: &Cell, arg: f64) -> f64 {
        match self.f {
            PropertyFn::Zero(f) => f(c),
            PropertyFn::One(f) => f(c, arg),
            PropertyFn::Two(f) => f(c, arg, 0.0),
        }
    }

    /// Measure the property on a cell with two extra arguments.
    pub fn measure_with2(&self, c: &Cell, arg_1: f64, arg_2: f64) -> f64 {
        match self.f {
            PropertyFn::Zero(f) => f(c),
            PropertyFn::One(f) => f(c, arg_1),
            PropertyFn::Two(f) => f(c, arg_1, arg_2),
        }
    }
}

impl std::fmt::Debug for Property {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("ext", &self.ext)
            .field("extra", &self.extra)
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
