//! # STRATA Column
//!
//! The stratigraphic column storage engine:
//!
//! - [`cell`] - A parcel of sediment: fractional composition, compacted
//!   and uncompacted thickness, age, pore pressure, facies
//! - [`column`] - An ordered stack of cells over a base elevation with a
//!   fixed nominal cell height
//! - [`property`] - Named property descriptors for bulk reductions
//! - [`io`] - Binary persistence of cells and columns
//! - [`grid`] - A dense 2-D grid of cells
//!
//! Process modules deposit and erode through [`Column::add_cell`],
//! [`Column::extract_top`] and friends; the grid/cube layer owns columns
//! and moves them through the binary format.  Composition-dependent
//! properties resolve grain parameters through the ambient catalog
//! registered with [`strata_sediment::set_ambient`].
//!
//! [`Column::add_cell`]: column::Column::add_cell
//! [`Column::extract_top`]: column::Column::extract_top

pub mod cell;
pub mod column;
pub mod error;
pub mod grid;
pub mod io;
pub mod property;

pub use cell::Cell;
pub use column::Column;
pub use error::{ColumnError, Result};
pub use grid::CellGrid;
pub use io::Endian;
pub use property::{ExtraArg, Property, PropertyFn};
