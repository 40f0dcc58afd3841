//! Binary persistence tests.
//!
//! This binary deliberately never registers an ambient catalog, so
//! records of any grain count can be read back and the grain-count guard
//! stays out of the way (it has its own test next to the column tests).

use std::io::{Seek, SeekFrom};

use pretty_assertions::assert_eq;
use strata_core::Facies;
use strata_column::{Cell, Column, Endian};

fn mixed_cell() -> Cell {
    let mut c = Cell::new_sized(5, 23.1, &[0.3, 0.2, 0.2, 0.2, 0.1]);
    c.set_age(4.5).set_pressure(12.25).add_facies(Facies::RIVER);
    c
}

// ============================================================
// Cell records
// ============================================================

#[test]
fn cell_round_trips_little_endian() {
    let c = mixed_cell();

    let mut buf = Vec::new();
    c.write_to(&mut buf).unwrap();
    let back = Cell::read_from(&mut buf.as_slice()).unwrap();

    assert_eq!(back, c);
}

#[test]
fn cell_round_trips_big_endian() {
    let c = mixed_cell();

    let mut buf = Vec::new();
    c.write_to_order(&mut buf, Endian::Big).unwrap();
    let back = Cell::read_from_order(&mut buf.as_slice(), Endian::Big).unwrap();

    assert_eq!(back, c);
}

#[test]
fn byte_orders_produce_different_bytes() {
    let c = mixed_cell();

    let mut le = Vec::new();
    let mut be = Vec::new();
    c.write_to_order(&mut le, Endian::Little).unwrap();
    c.write_to_order(&mut be, Endian::Big).unwrap();

    assert_eq!(le.len(), be.len());
    assert_ne!(le, be);
}

#[test]
fn cell_record_matches_the_frozen_reference() {
    let mut c = Cell::new_sized(2, 2.0, &[0.25, 0.75]);
    c.compact(1.5);
    c.set_age(3.0);
    c.add_facies(Facies::BEDLOAD | Facies::PLUME);

    let mut buf = Vec::new();
    c.write_to(&mut buf).unwrap();

    #[rustfmt::skip]
    let expected: [u8; 53] = [
        // n = 2
        0x02, 0x00, 0x00, 0x00,
        // f[0] = 0.25, f[1] = 0.75
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xD0, 0x3F,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xE8, 0x3F,
        // t_0 = 2.0, t = 1.5
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x40,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xF8, 0x3F,
        // age = 3.0
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x08, 0x40,
        // pressure = 0.0
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        // facies = bedload | plume
        0x03,
    ];
    assert_eq!(buf, expected);

    #[rustfmt::skip]
    let expected_be: [u8; 53] = [
        0x00, 0x00, 0x00, 0x02,
        0x3F, 0xD0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x3F, 0xE8, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x40, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x3F, 0xF8, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x40, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x03,
    ];
    let mut buf_be = Vec::new();
    c.write_to_order(&mut buf_be, Endian::Big).unwrap();
    assert_eq!(buf_be, expected_be);
}

#[test]
fn truncated_cell_record_is_an_io_error() {
    let mut buf = Vec::new();
    mixed_cell().write_to(&mut buf).unwrap();
    buf.truncate(buf.len() - 4);

    assert!(matches!(
        Cell::read_from(&mut buf.as_slice()),
        Err(strata_column::ColumnError::Io(_))
    ));
}

// ============================================================
// Column records
// ============================================================

fn reference_column() -> Column {
    let mut c = Column::new(1);
    c.set_base_height(1.414)
        .set_z_res(2.718)
        .set_x_position(3.14)
        .set_y_position(9.81)
        .set_age(33.0);
    c.append_cell(&mixed_cell());
    c
}

#[test]
fn column_round_trips_little_endian() {
    let c = reference_column();

    let mut buf = Vec::new();
    c.write_to(&mut buf).unwrap();
    let back = Column::read_from(&mut buf.as_slice()).unwrap();

    assert_eq!(back.base_height(), c.base_height());
    assert_eq!(back.thickness(), c.thickness());
    assert_eq!(back.z_res(), c.z_res());
    assert_eq!(back.x_position(), c.x_position());
    assert_eq!(back.y_position(), c.y_position());
    assert_eq!(back.age(), c.age());
    assert_eq!(back.sea_level(), c.sea_level());
    assert_eq!(back.len(), c.len());
    assert_eq!(back.capacity(), c.capacity());
    assert_eq!(back.nth_cell(0).unwrap(), c.nth_cell(0).unwrap());
}

#[test]
fn column_round_trips_big_endian() {
    let c = reference_column();

    let mut buf = Vec::new();
    c.write_to_order(&mut buf, Endian::Big).unwrap();
    let back = Column::read_from_order(&mut buf.as_slice(), Endian::Big).unwrap();

    assert_eq!(back.base_height(), c.base_height());
    assert_eq!(back.nth_cell(0).unwrap(), c.nth_cell(0).unwrap());
}

#[test]
fn full_storage_is_serialized() {
    let c = reference_column();

    let mut buf = Vec::new();
    c.write_to(&mut buf).unwrap();

    // header: 7 doubles + 2 ints; one live 5-type cell; 15 clear
    // zero-width placeholders
    let header = 7 * 8 + 2 * 4;
    let live = 4 + 5 * 8 + 4 * 8 + 1;
    let placeholder = 4 + 4 * 8 + 1;
    assert_eq!(c.capacity(), 16);
    assert_eq!(buf.len(), header + live + 15 * placeholder);
}

#[test]
fn consecutive_records_frame_themselves() {
    let a = reference_column();
    let mut b = reference_column();
    b.set_base_height(-7.25);

    let mut buf = Vec::new();
    a.write_to(&mut buf).unwrap();
    b.write_to(&mut buf).unwrap();

    let mut r = buf.as_slice();
    let a_back = Column::read_from(&mut r).unwrap();
    let b_back = Column::read_from(&mut r).unwrap();

    assert_eq!(a_back.base_height(), 1.414);
    assert_eq!(b_back.base_height(), -7.25);
    assert!(r.is_empty());
}

#[test]
fn column_survives_a_real_file() {
    let c = reference_column();

    let mut file = tempfile::tempfile().unwrap();
    c.write_to(&mut file).unwrap();
    file.seek(SeekFrom::Start(0)).unwrap();

    let back = Column::read_from(&mut file).unwrap();
    assert_eq!(back.thickness(), c.thickness());
    assert_eq!(back.nth_cell(0).unwrap(), c.nth_cell(0).unwrap());
}

#[test]
fn inconsistent_lengths_are_rejected() {
    let c = reference_column();
    let mut buf = Vec::new();
    c.write_to(&mut buf).unwrap();

    // corrupt the len field (bytes 16..20) to exceed the size field
    buf[16..20].copy_from_slice(&999i32.to_le_bytes());

    assert!(matches!(
        Column::read_from(&mut buf.as_slice()),
        Err(strata_column::ColumnError::BadRecord(_))
    ));
}
