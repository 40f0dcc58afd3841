//! Geometry, copy semantics and storage-management tests for columns

use strata_core::SizeClass;
use strata_column::{column::ADD_BINS, Cell, Column};
use strata_sediment::{set_ambient, Catalog};

fn setup() {
    let _ = set_ambient(&Catalog::default_catalog());
}

fn sand(t: f64) -> Cell {
    setup();
    Cell::new_classed(None, t, SizeClass::SAND).unwrap()
}

// ============================================================
// Accessors
// ============================================================

#[test]
fn scalar_setters_round_trip() {
    let mut c = Column::new(1);
    c.set_base_height(33.0)
        .set_x_position(3.14)
        .set_y_position(2.78)
        .set_z_res(0.707)
        .set_age(12.0)
        .set_sea_level(-4.5);

    assert!((c.base_height() - 33.0).abs() < 1e-12);
    assert!((c.x_position() - 3.14).abs() < 1e-12);
    assert!((c.y_position() - 2.78).abs() < 1e-12);
    assert!((c.z_res() - 0.707).abs() < 1e-12);
    assert!((c.age() - 12.0).abs() < 1e-12);
    assert!((c.sea_level() + 4.5).abs() < 1e-12);

    c.adjust_base_height(-3.0);
    assert!(c.base_height_is(30.0));
}

#[test]
fn top_height_is_base_plus_thickness() {
    setup();
    let mut c = Column::new(1);
    c.set_base_height(142.0);
    c.add_cell(&sand(10.0));

    assert!(c.top_height_is(152.0));
    assert!(c.base_height_is(142.0));

    // an empty column's top sits at its base
    let mut empty = Column::new(1);
    empty.set_base_height(15.0);
    assert!((empty.top_height() - empty.base_height()).abs() < 1e-12);
}

#[test]
fn above_and_below_compare_the_surface() {
    setup();
    let mut c = Column::new(1);
    c.set_base_height(10.0);
    c.add_cell(&sand(5.0));

    assert!(c.is_above(14.0));
    assert!(c.is_below(16.0));
    assert!(!c.is_above(15.0));
    assert!(!c.is_below(15.0));
}

#[test]
fn water_depth_flips_sign_at_the_surface() {
    setup();
    let mut c = Column::new(1);
    c.add_cell(&sand(5.0));

    c.set_sea_level(12.0);
    assert!((c.water_depth() - 7.0).abs() < 1e-12);
    assert!(c.water_pressure() > 0.0);

    c.set_sea_level(3.0);
    assert!((c.water_depth() + 2.0).abs() < 1e-12);
    assert_eq!(c.water_pressure(), 0.0);
}

// ============================================================
// Copy semantics
// ============================================================

#[test]
fn copy_from_is_deep() {
    setup();
    let mut src = Column::new(1);
    src.set_base_height(7.0).set_sea_level(2.0);
    src.add_cell(&sand(3.5));

    let mut dst = Column::new(1);
    dst.copy_from(&src);

    assert!(dst.approx_eq_data(&src));
    assert!(dst.approx_eq(&src));

    // mutating the copy leaves the source alone
    dst.remove_top(1.0);
    assert!(src.size_is(3.5));
    assert!(dst.size_is(2.5));
}

#[test]
fn clone_matches_copy_from() {
    setup();
    let mut src = Column::new(1);
    src.add_cell(&sand(2.25));

    let dup = src.clone();
    assert!(dup.approx_eq(&src));
    assert_eq!(dup.capacity(), src.capacity());
}

#[test]
fn copy_public_data_skips_the_stack() {
    setup();
    let mut src = Column::new(1);
    src.set_base_height(9.0).set_z_res(0.5).set_age(3.0);
    src.add_cell(&sand(2.0));

    let mut dst = Column::new(1);
    dst.copy_public_data(&src);

    assert!(dst.is_empty());
    assert!(dst.base_height_is(9.0));
    assert!((dst.z_res() - 0.5).abs() < 1e-12);
    assert!((dst.age() - 3.0).abs() < 1e-12);
}

#[test]
fn clear_preserves_the_geometry() {
    setup();
    let mut c = Column::new(1);
    c.set_base_height(5.0).set_z_res(0.25).set_x_position(1.0);
    c.add_cell(&sand(2.0));

    c.clear();
    assert!(c.is_empty());
    assert!(c.size_is(0.0));
    assert!(c.mass_is(0.0));
    assert!(c.base_height_is(5.0));
    assert!((c.z_res() - 0.25).abs() < 1e-12);
    assert!((c.x_position() - 1.0).abs() < 1e-12);
}

// ============================================================
// Storage management
// ============================================================

#[test]
fn storage_grows_in_blocks() {
    setup();
    let c = Column::new(1);
    assert_eq!(c.capacity(), ADD_BINS);

    let big = Column::new(17);
    assert_eq!(big.capacity(), 2 * ADD_BINS);

    // deposition grows the storage on demand
    let mut tall = Column::new(1);
    tall.add_cell(&sand(40.0));
    assert!(tall.capacity() >= 40);
    assert_eq!(tall.capacity() % ADD_BINS, 0);
}

#[test]
fn shrinking_resize_clears_but_keeps_storage() {
    setup();
    let mut c = Column::new(1);
    c.add_cell(&sand(10.0));
    let cap = c.capacity();

    // storage beyond the requested length is wiped; the live length and
    // cached thickness are the caller's business
    c.resize(4);
    assert_eq!(c.capacity(), cap);
    assert!(!c.nth_cell(0).unwrap().is_clear());
    assert!(c.nth_cell(4).unwrap().is_clear());
}

#[test]
fn index_classification() {
    setup();
    let mut c = Column::new(1);
    c.add_cell(&sand(3.0));

    assert!(c.is_get_index(0));
    assert!(c.is_get_index(2));
    assert!(!c.is_get_index(3));
    assert!(c.is_set_index(3));
    assert!(!c.is_set_index(4));
    assert!(c.is_valid_index(15));
    assert!(!c.is_valid_index(16));
    assert_eq!(c.top_index(), 2);
    assert_eq!(Column::new(1).top_index(), -1);
}

#[test]
fn nth_cell_answers_the_next_placeholder() {
    setup();
    let mut c = Column::new(1);
    assert!(c.nth_cell(0).unwrap().is_clear());
    assert!(c.nth_cell(1).is_none());

    c.add_cell(&sand(2.0));
    assert!(!c.nth_cell(1).unwrap().is_clear());
    assert!(c.nth_cell(2).unwrap().is_clear());
    assert!(c.nth_cell(3).is_none());
}

// ============================================================
// Elevation indexing
// ============================================================

#[test]
fn index_at_is_base_relative() {
    setup();
    let mut c = Column::new(1);
    c.set_base_height(100.0);
    c.add_cell(&sand(10.0));

    assert_eq!(c.index_at(100.5), 0);
    assert_eq!(c.index_at(109.9), 9);
    assert_eq!(c.index_at(100.0), -1);
    assert_eq!(c.index_at(95.0), -1);
}

#[test]
fn load_dependent_average_grows_with_depth() {
    setup();
    let mut c = Column::new(1);
    c.add_cell(&sand(10.0));

    let shear = strata_column::Property::by_name("shear_strength").unwrap();
    let avg = c.avg_property_with_load(shear, 0, 0);

    // deeper windows feel more load, so the running average grows
    assert_eq!(avg.len(), 10);
    assert!(avg[0] > avg[5]);
    assert!(avg[5] > avg[9]);

    let totals = c.total_property(strata_column::Property::by_name("pressure").unwrap(), 0, 0);
    assert_eq!(totals.len(), 10);
}
