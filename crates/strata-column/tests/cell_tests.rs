//! Integration tests for the sediment cell algebra

use strata_core::{Facies, SizeClass};
use strata_column::Cell;
use strata_sediment::{set_ambient, Catalog};

fn setup() {
    let _ = set_ambient(&Catalog::default_catalog());
}

fn sand(t: f64) -> Cell {
    setup();
    Cell::new_classed(None, t, SizeClass::SAND).unwrap()
}

fn mud(t: f64) -> Cell {
    setup();
    Cell::new_classed(None, t, SizeClass::MUD).unwrap()
}

// ============================================================
// Composition invariants
// ============================================================

#[test]
fn non_clear_cells_sum_to_one() {
    let cells = [
        sand(1.0),
        mud(2.5),
        Cell::new_sized(5, 3.0, &[0.1, 0.2, 0.3, 0.2, 0.2]),
    ];

    for c in &cells {
        let sum: f64 = c.fractions().iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(c.is_valid());
    }
}

#[test]
fn mixing_keeps_the_composition_normalized() {
    let mut a = sand(1.0);
    a.add(&mud(2.0));
    a.add(&sand(0.1));
    a.add(&mud(7.3));

    let sum: f64 = a.fractions().iter().sum();
    assert!((sum - 1.0).abs() < 1e-6);
    assert!(a.is_valid());
    assert!(a.is_size(10.4));
}

// ============================================================
// Mass conservation
// ============================================================

#[test]
fn add_conserves_mass() {
    setup();
    let mut a = sand(2.0);
    let b = mud(3.0);
    let total = a.mass() + b.mass();

    a.add(&b);
    assert!((a.mass() - total).abs() < 1e-12 * total.max(1.0));
}

#[test]
fn separate_conserves_mass() {
    setup();
    let mut c = Cell::new_sized(5, 6.0, &[0.2; 5]);
    let before = c.mass();

    let out = c.separate_thickness(2.5);
    assert!((c.mass() + out.mass() - before).abs() < 1e-12 * before);

    let mut c2 = Cell::new_sized(5, 6.0, &[0.2; 5]);
    let before2 = c2.mass();
    let out2 = c2.separate_fraction(&[0.5, 0.0, 1.0, 0.25, 0.0]);
    assert!((c2.mass() + out2.mass() - before2).abs() < 1e-12 * before2);
}

#[test]
fn separated_thickness_keeps_the_composition() {
    let mut c = Cell::new_sized(3, 9.0, &[0.5, 0.25, 0.25]);
    let out = c.separate_thickness(3.0);

    for i in 0..3 {
        assert!((out.fraction(i) - c.fraction(i)).abs() < 1e-12);
    }
}

// ============================================================
// Compaction
// ============================================================

#[test]
fn compaction_ratio_survives_resize() {
    let mut c = sand(10.0);
    c.compact(6.0);
    assert!((c.size_0() - 10.0).abs() < 1e-12);

    let ratio = c.size() / c.size_0();
    c.resize(3.0);
    assert!((c.size() / c.size_0() - ratio).abs() < 1e-12);

    c.resize(12.0);
    assert!((c.size() / c.size_0() - ratio).abs() < 1e-12);
}

#[test]
fn compacted_sediment_is_denser() {
    setup();
    let mut c = sand(10.0);
    let rho_loose = c.density();

    c.compact(7.0);
    assert!(c.density() > rho_loose);

    // mass is the same sediment, just squeezed
    let mass_ratio = (c.mass() - 10.0 * rho_loose).abs() / (10.0 * rho_loose);
    assert!(mass_ratio < 0.2, "compaction should not create sediment");
}

// ============================================================
// Size classes and facies
// ============================================================

#[test]
fn size_class_follows_the_mean_phi() {
    setup();
    // pure sand stays sand, pure mud is silt or clay
    assert_eq!(sand(1.0).size_class(), SizeClass::SAND);
    assert!(mud(1.0).size_class().intersects(SizeClass::MUD));

    // the class of a mix is the class of the mean, not the dominant part
    let mut c = sand(1.0);
    c.add(&mud(1.0));
    let phi = c.grain_size_in_phi();
    assert_eq!(c.size_class(), SizeClass::from_phi(phi));
}

#[test]
fn size_class_percent_is_fraction_weighted() {
    setup();
    let mut c = sand(1.0);
    c.add(&mud(3.0));

    assert!((c.size_class_percent(SizeClass::SAND) - 0.25).abs() < 1e-9);
    assert!((c.size_class_percent(SizeClass::MUD) - 0.75).abs() < 1e-9);
    assert!((c.sand_fraction() - 0.25).abs() < 1e-9);
    assert!((c.mud_fraction() - 0.75).abs() < 1e-9);
}

#[test]
fn size_classes_union_all_members() {
    setup();
    let mut c = sand(1.0);
    c.add(&mud(1.0));
    let classes = c.size_classes();
    assert!(classes.contains(SizeClass::SAND));
    assert!(classes.intersects(SizeClass::MUD));
}

#[test]
fn facies_history_accumulates() {
    let mut c = sand(1.0);
    c.add_facies(Facies::PLUME);

    let mut other = sand(1.0);
    other.set_facies(Facies::TURBIDITE);

    c.add(&other);
    assert_eq!(c.facies(), Facies::PLUME | Facies::TURBIDITE);
}

// ============================================================
// Load-dependent properties
// ============================================================

#[test]
fn shear_strength_and_cohesion_respond_to_load() {
    setup();
    let c = mud(2.0);
    assert!(c.shear_strength(1e5) > c.shear_strength(1e4));
    assert!(c.cohesion(1e5) > 0.0);

    // pore pressure carries part of the load
    let mut pressurized = mud(2.0);
    pressurized.set_pressure(5e4);
    assert!(pressurized.cohesion(1e5) < c.cohesion(1e5));
}

#[test]
fn consolidation_grows_with_time() {
    setup();
    let mut c = mud(2.0);
    c.set_age(0.0);
    let early = c.consolidation(0.001);
    let late = c.consolidation(100.0);
    assert!(late > early);
    assert!(late <= 1.0 + 1e-9);
}

// ============================================================
// Typed constructors
// ============================================================

#[test]
fn typed_cell_selects_one_grain() {
    setup();
    let cat = Catalog::default_catalog();
    let grain = *cat.get(2).unwrap();

    let c = Cell::new_typed(None, 2.0, &grain).unwrap();
    assert!((c.fraction(2) - 1.0).abs() < 1e-12);
    assert!((c.grain_size() - grain.grain_size()).abs() < 1e-9);
}

#[test]
fn explicit_catalog_overrides_the_ambient() {
    setup();
    let cat = Catalog::default_catalog();
    let two = Catalog::from_types([*cat.get(0).unwrap(), *cat.get(4).unwrap()]);

    let c = Cell::new_classed(Some(&two), 1.0, SizeClass::SAND).unwrap();
    assert_eq!(c.n_types(), 2);
    assert!((c.fraction(0) - 1.0).abs() < 1e-12);
}
