//! Binary persistence of cells and columns.
//!
//! Records are little-endian by default; a big-endian writer/reader pair
//! exists for foreign byte orders.  A column record carries its full
//! backing storage (`size` cells, not just the live `len`), so a read
//! reconstructs the column byte-for-byte.
//!
//! Record layouts:
//!
//! ```text
//! cell:    n: i32, f[0..n): f64, t_0: f64, t: f64, age: f64,
//!          pressure: f64, facies: u8
//! column:  z: f64, t: f64, len: i32, size: i32, dz: f64, x: f64,
//!          y: f64, age: f64, sl: f64, cells[0..size)
//! ```
//!
//! Reading a cell requires its grain count to match the ambient catalog
//! when one is registered.

use byteorder::{BigEndian, ByteOrder, LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};
use tracing::debug;

use strata_core::Facies;
use strata_sediment::catalog;

use crate::cell::Cell;
use crate::column::Column;
use crate::error::{ColumnError, Result};

/// Byte order of a binary record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endian {
    #[default]
    Little,
    Big,
}

// =============================================================================
// CELL RECORDS
// =============================================================================

fn write_cell<B: ByteOrder, W: Write>(c: &Cell, w: &mut W) -> Result<()> {
    w.write_i32::<B>(c.f.len() as i32)?;
    for &v in &c.f {
        w.write_f64::<B>(v)?;
    }
    w.write_f64::<B>(c.t_0)?;
    w.write_f64::<B>(c.t)?;
    w.write_f64::<B>(c.age)?;
    w.write_f64::<B>(c.pressure)?;
    w.write_u8(c.facies.bits())?;
    Ok(())
}

fn read_cell<B: ByteOrder, R: Read>(r: &mut R) -> Result<Cell> {
    let n = r.read_i32::<B>()?;
    if n < 0 {
        return Err(ColumnError::BadRecord(format!(
            "negative grain count {n}"
        )));
    }
    let n = n as usize;

    let ambient = catalog::ambient_size();
    if ambient > 0 && n > 0 && n != ambient {
        return Err(ColumnError::CatalogMismatch {
            expected: ambient,
            found: n,
        });
    }

    let mut f = vec![0.0; n];
    for v in f.iter_mut() {
        *v = r.read_f64::<B>()?;
    }

    let t_0 = r.read_f64::<B>()?;
    let t = r.read_f64::<B>()?;
    let age = r.read_f64::<B>()?;
    let pressure = r.read_f64::<B>()?;
    let facies = Facies::from_bits_truncate(r.read_u8()?);

    Ok(Cell {
        f,
        t,
        t_0,
        age,
        pressure,
        facies,
    })
}

impl Cell {
    /// Write this cell as a little-endian record.
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<()> {
        self.write_to_order(w, Endian::Little)
    }

    /// Write this cell with an explicit byte order.
    pub fn write_to_order<W: Write>(&self, w: &mut W, order: Endian) -> Result<()> {
        match order {
            Endian::Little => write_cell::<LittleEndian, W>(self, w),
            Endian::Big => write_cell::<BigEndian, W>(self, w),
        }
    }

    /// Read a little-endian cell record.
    pub fn read_from<R: Read>(r: &mut R) -> Result<Cell> {
        Cell::read_from_order(r, Endian::Little)
    }

    /// Read a cell record with an explicit byte order.
    pub fn read_from_order<R: Read>(r: &mut R, order: Endian) -> Result<Cell> {
        match order {
            Endian::Little => read_cell::<LittleEndian, R>(r),
            Endian::Big => read_cell::<BigEndian, R>(r),
        }
    }
}

// =============================================================================
// COLUMN RECORDS
// =============================================================================

fn write_column<B: ByteOrder, W: Write>(c: &Column, w: &mut W) -> Result<()> {
    w.write_f64::<B>(c.z)?;
    w.write_f64::<B>(c.t)?;
    w.write_i32::<B>(c.len as i32)?;
    w.write_i32::<B>(c.cells.len() as i32)?;
    w.write_f64::<B>(c.dz)?;
    w.write_f64::<B>(c.x)?;
    w.write_f64::<B>(c.y)?;
    w.write_f64::<B>(c.age)?;
    w.write_f64::<B>(c.sl)?;

    for cell in &c.cells {
        write_cell::<B, W>(cell, w)?;
    }

    Ok(())
}

fn read_column<B: ByteOrder, R: Read>(r: &mut R) -> Result<Column> {
    let z = r.read_f64::<B>()?;
    let t = r.read_f64::<B>()?;
    let len = r.read_i32::<B>()?;
    let size = r.read_i32::<B>()?;
    let dz = r.read_f64::<B>()?;
    let x = r.read_f64::<B>()?;
    let y = r.read_f64::<B>()?;
    let age = r.read_f64::<B>()?;
    let sl = r.read_f64::<B>()?;

    if len < 0 || size < len {
        return Err(ColumnError::BadRecord(format!(
            "inconsistent lengths: len = {len}, size = {size}"
        )));
    }

    let mut cells = Vec::with_capacity(size as usize);
    for _ in 0..size {
        cells.push(read_cell::<B, R>(r)?);
    }

    debug!(len, size, "read column record");

    Ok(Column {
        cells,
        len: len as usize,
        z,
        t,
        dz,
        x,
        y,
        age,
        sl,
    })
}

impl Column {
    /// Write this column as a little-endian record.
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<()> {
        self.write_to_order(w, Endian::Little)
    }

    /// Write this column with an explicit byte order.
    pub fn write_to_order<W: Write>(&self, w: &mut W, order: Endian) -> Result<()> {
        match order {
            Endian::Little => write_column::<LittleEndian, W>(self, w),
            Endian::Big => write_column::<BigEndian, W>(self, w),
        }
    }

    /// Read a little-endian column record.
    pub fn read_from<R: Read>(r: &mut R) -> Result<Column> {
        Column::read_from_order(r, Endian::Little)
    }

    /// Read a column record with an explicit byte order.
    pub fn read_from_order<R: Read>(r: &mut R, order: Endian) -> Result<Column> {
        match order {
            Endian::Little => read_column::<LittleEndian, R>(r),
            Endian::Big => read_column::<BigEndian, R>(r),
        }
    }
}
