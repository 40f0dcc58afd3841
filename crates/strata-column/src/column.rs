//! A vertical stack of sediment cells.
//!
//! A [`Column`] models the deposition history at one horizontal location
//! as an ordered stack of [`Cell`]s above a base elevation.  Cells fill
//! to a nominal height `dz`: new sediment flows into the partial top
//! cell first and overflow opens fresh cells, so every live cell except
//! possibly the topmost is full.  Storage grows in blocks of 16
//! pre-allocated clear cells that sit above the live stack (and are
//! carried through serialization).
//!
//! Thicknesses are per unit area; loads are pressures in Pa.

use tracing::debug;

use strata_core::{constants, SizeClass};
use strata_sediment::catalog;

use crate::cell::Cell;
use crate::property::{ExtraArg, Property};

/// Storage growth quantum, in cells.
pub const ADD_BINS: usize = 16;

/// An ordered stack of sediment cells over a base elevation.
#[derive(Debug, Clone)]
pub struct Column {
    /// Backing storage; `cells[0..len]` is the live stack, bottom up
    pub(crate) cells: Vec<Cell>,
    /// Number of live cells
    pub(crate) len: usize,
    /// Base elevation (m above the datum)
    pub(crate) z: f64,
    /// Cached total thickness of the live stack (m)
    pub(crate) t: f64,
    /// Nominal cell height, the fill quantum (m)
    pub(crate) dz: f64,
    /// Horizontal position
    pub(crate) x: f64,
    pub(crate) y: f64,
    /// Column age (time coordinate maintained by clients, yr)
    pub(crate) age: f64,
    /// Sea level relative to the datum (m)
    pub(crate) sl: f64,
}

fn placeholder_cell() -> Cell {
    match catalog::ambient_size() {
        0 => Cell::default(),
        n => Cell::new(n),
    }
}

impl Column {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// A new, empty column with capacity for at least `n_bins` cells.
    ///
    /// Defaults: base elevation 0, cell height 1, position and age 0.
    pub fn new(n_bins: usize) -> Column {
        assert!(n_bins > 0, "a column needs capacity for at least one cell");

        let mut c = Column {
            cells: Vec::new(),
            len: 0,
            z: 0.0,
            t: 0.0,
            dz: 1.0,
            x: 0.0,
            y: 0.0,
            age: 0.0,
            sl: 0.0,
        };
        c.resize(n_bins);
        c
    }

    /// A column holding a single classed cell of thickness `t`.
    ///
    /// `None` when no ambient catalog is registered.
    pub fn new_filled(t: f64, class: SizeClass) -> Option<Column> {
        let cell = Cell::new_classed(None, t, class)?;
        let mut c = Column::new(1);
        c.add_cell(&cell);
        Some(c)
    }

    /// Clear all live cells; the geometry (base, resolution, position,
    /// age, sea level) is preserved.
    pub fn clear(&mut self) -> &mut Self {
        for i in 0..self.len {
            self.cells[i].clear();
        }
        self.len = 0;
        self.t = 0.0;
        self
    }

    /// Deep-copy another column into this one, growing storage as
    /// needed.
    pub fn copy_from(&mut self, src: &Column) {
        self.resize(src.cells.len());

        for i in 0..src.cells.len() {
            self.cells[i].copy_from(&src.cells[i]);
        }
        for i in src.cells.len()..self.cells.len() {
            self.cells[i].clear();
        }

        self.z = src.z;
        self.t = src.t;
        self.len = src.len;
        self.dz = src.dz;
        self.x = src.x;
        self.y = src.y;
        self.age = src.age;
        self.sl = src.sl;
    }

    /// Copy the scalar state (including the live length and cached
    /// thickness) without touching the cells.
    pub fn copy_data(&mut self, src: &Column) {
        self.z = src.z;
        self.t = src.t;
        self.len = src.len;
        self.dz = src.dz;
        self.x = src.x;
        self.y = src.y;
        self.age = src.age;
        self.sl = src.sl;
    }

    /// Copy only the client-facing scalars: base, resolution, position,
    /// age, sea level.
    pub fn copy_public_data(&mut self, src: &Column) {
        self.z = src.z;
        self.dz = src.dz;
        self.x = src.x;
        self.y = src.y;
        self.age = src.age;
        self.sl = src.sl;
    }

    /// Grow storage to hold at least `n` cells, in blocks of
    /// [`ADD_BINS`]; shrinking instead clears the cells above `n`
    /// without releasing them.  The live length is unchanged.
    pub fn resize(&mut self, n: usize) -> &mut Self {
        if n > self.cells.len() {
            let add = ((n - self.cells.len()) / ADD_BINS + 1) * ADD_BINS;
            let new_size = self.cells.len() + add;
            while self.cells.len() < new_size {
                self.cells.push(placeholder_cell());
            }
        } else {
            for i in n..self.cells.len() {
                self.cells[i].clear();
            }
        }
        self
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Number of live (filled or partially filled) cells.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Capacity of the backing storage, in cells.
    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Elevation of the column base (m).
    pub fn base_height(&self) -> f64 {
        self.z
    }

    /// Elevation of the sediment surface (m).
    pub fn top_height(&self) -> f64 {
        self.z + self.t
    }

    /// Total sediment thickness (m).
    pub fn thickness(&self) -> f64 {
        self.t
    }

    /// Nominal cell height, the fill quantum (m).
    pub fn z_res(&self) -> f64 {
        self.dz
    }

    pub fn x_position(&self) -> f64 {
        self.x
    }

    pub fn y_position(&self) -> f64 {
        self.y
    }

    pub fn age(&self) -> f64 {
        self.age
    }

    pub fn sea_level(&self) -> f64 {
        self.sl
    }

    /// Water depth over the column (negative when subaerial).
    pub fn water_depth(&self) -> f64 {
        self.sl - self.top_height()
    }

    pub fn set_base_height(&mut self, z: f64) -> &mut Self {
        self.z = z;
        self
    }

    pub fn adjust_base_height(&mut self, dz: f64) -> &mut Self {
        self.z += dz;
        self
    }

    pub fn set_x_position(&mut self, x: f64) -> &mut Self {
        self.x = x;
        self
    }

    pub fn set_y_position(&mut self, y: f64) -> &mut Self {
        self.y = y;
        self
    }

    pub fn set_age(&mut self, age: f64) -> &mut Self {
        self.age = age;
        self
    }

    pub fn set_sea_level(&mut self, sl: f64) -> &mut Self {
        self.sl = sl;
        self
    }

    pub fn set_z_res(&mut self, dz: f64) -> &mut Self {
        self.dz = dz;
        self
    }

    /// Index of the top live cell, -1 when empty.
    pub fn top_index(&self) -> isize {
        self.len as isize - 1
    }

    /// The top live cell.
    pub fn top_cell(&self) -> Option<&Cell> {
        if self.is_empty() {
            None
        } else {
            Some(&self.cells[self.len - 1])
        }
    }

    /// The cell `n` bins up from the base.
    ///
    /// The index just above the live stack resolves to the next clear
    /// placeholder (so an empty column still answers index 0); anything
    /// farther out is `None`.
    pub fn nth_cell(&self, n: usize) -> Option<&Cell> {
        if n <= self.len && n < self.cells.len() {
            Some(&self.cells[n])
        } else {
            None
        }
    }

    /// Is `n` inside the backing storage?
    pub fn is_valid_index(&self, n: usize) -> bool {
        n < self.cells.len()
    }

    /// Is `n` a readable (live) cell index?
    pub fn is_get_index(&self, n: usize) -> bool {
        n < self.len
    }

    /// Is `n` an index sediment can be placed at?
    pub fn is_set_index(&self, n: usize) -> bool {
        n <= self.len
    }

    /// Is the sediment surface below the elevation `z`?
    pub fn is_below(&self, z: f64) -> bool {
        self.top_height() < z
    }

    /// Is the sediment surface above the elevation `z`?
    pub fn is_above(&self, z: f64) -> bool {
        self.top_height() > z
    }

    pub fn size_is(&self, t: f64) -> bool {
        (self.t - t).abs() < 1e-12
    }

    pub fn mass_is(&self, m: f64) -> bool {
        (self.mass() - m).abs() < 1e-12
    }

    pub fn sediment_mass_is(&self, m: f64) -> bool {
        (self.sediment_mass() - m).abs() < 1e-12
    }

    pub fn base_height_is(&self, z: f64) -> bool {
        (self.z - z).abs() < 1e-12
    }

    pub fn top_height_is(&self, z: f64) -> bool {
        (self.top_height() - z).abs() < 1e-12
    }

    /// Scalar-state comparison with a 1e-12 tolerance.
    pub fn approx_eq_data(&self, other: &Column) -> bool {
        (self.z - other.z).abs() < 1e-12
            && (self.t - other.t).abs() < 1e-12
            && (self.dz - other.dz).abs() < 1e-12
            && (self.x - other.x).abs() < 1e-12
            && (self.y - other.y).abs() < 1e-12
            && (self.age - other.age).abs() < 1e-12
            && (self.sl - other.sl).abs() < 1e-12
            && self.len == other.len
    }

    /// Scalar state plus cell-by-cell comparison.
    pub fn approx_eq(&self, other: &Column) -> bool {
        self.approx_eq_data(other)
            && (0..self.len).all(|i| self.cells[i].approx_eq(&other.cells[i]))
    }

    // -------------------------------------------------------------------------
    // Mass
    // -------------------------------------------------------------------------

    /// Total saturated mass per unit area (kg/m^2).
    pub fn mass(&self) -> f64 {
        self.cells[..self.len].iter().map(Cell::mass).sum()
    }

    /// Total solid-sediment mass per unit area (kg/m^2).
    pub fn sediment_mass(&self) -> f64 {
        self.cells[..self.len].iter().map(Cell::sediment_mass).sum()
    }

    /// Hydrostatic pressure of the overlying water column (Pa), zero
    /// when the surface is subaerial.
    pub fn water_pressure(&self) -> f64 {
        let depth = self.water_depth();
        if depth > 0.0 {
            depth * constants::rho_sea_water() * constants::gravity()
        } else {
            0.0
        }
    }

    // -------------------------------------------------------------------------
    // Deposition
    // -------------------------------------------------------------------------

    fn add_cell_mode(&mut self, cell: &Cell, update_pressure: bool) -> f64 {
        if cell.is_empty() {
            return 0.0;
        }

        let amount = cell.size();

        if update_pressure {
            let cell_load = cell.load();
            for i in 0..self.len {
                let p = self.cells[i].pressure();
                self.cells[i].set_pressure(p + cell_load);
            }
        }

        if self.is_empty() {
            self.resize(1);
            self.len = 1;
        }

        let mut chunk = cell.clone();
        let mut left = amount;

        while left > 0.0 {
            let free = self.dz - self.cells[self.len - 1].size();

            if free <= 1e-12 {
                // top cell is full: open a fresh one
                self.resize(self.len + 1);
                self.len += 1;
                continue;
            }

            let take = free.min(left);
            chunk.resize(take);
            self.cells[self.len - 1].add(&chunk);
            self.t += take;
            left -= take;
        }

        amount
    }

    /// Push a cell's sediment onto the top of the column, filling the
    /// partial top cell first and opening new cells of height `dz` for
    /// the overflow.  The incoming load is added to every live cell's
    /// pore pressure before filling.  Returns the thickness added; the
    /// input cell is unchanged.
    pub fn add_cell(&mut self, cell: &Cell) -> f64 {
        self.add_cell_mode(cell, true)
    }

    /// Like [`Column::add_cell`], but without the pressure pre-update:
    /// pressure mixes size-weighted through cell addition instead.
    pub fn add_cell_avg_pressure(&mut self, cell: &Cell) -> f64 {
        self.add_cell_mode(cell, false)
    }

    /// Append a copy of `cell` as a new top cell, without rebinning to
    /// `dz`.  Returns the thickness added.
    pub fn append_cell(&mut self, cell: &Cell) -> f64 {
        self.resize(self.len + 1);
        self.cells[self.len].copy_from(cell);
        self.len += 1;
        self.t += cell.size();
        cell.size()
    }

    /// Deposit per-type amounts of fresh sediment.  Returns the total
    /// thickness added.
    pub fn add_vec(&mut self, t: &[f64]) -> f64 {
        let mut cell = Cell::new(t.len());
        cell.add_amount(t);
        self.add_cell(&cell)
    }

    /// Push copies of every live cell of `src` onto this column.
    pub fn add(&mut self, src: &Column) -> &mut Self {
        for i in 0..src.len {
            self.add_cell(&src.cells[i]);
        }
        self
    }

    /// Append copies of every live cell of `src` without rebinning.
    pub fn append(&mut self, src: &Column) -> &mut Self {
        for i in 0..src.len {
            self.append_cell(&src.cells[i]);
        }
        self
    }

    // -------------------------------------------------------------------------
    // Extraction and erosion
    // -------------------------------------------------------------------------

    /// Remove the top fraction `f` (clamped to [0, 1]) of the top cell,
    /// returning the removed parcel.
    pub fn extract_top_cell(&mut self, f: f64) -> Option<Cell> {
        let f = f.clamp(0.0, 1.0);

        let top = self.top_cell()?;
        let mut dest = top.clone();
        dest.resize(dest.size() * f);
        self.remove_top_cell(f);

        Some(dest)
    }

    /// Discard the top fraction `f` (clamped to [0, 1]) of the top cell.
    /// A top cell shrunk below threshold is retired.
    pub fn remove_top_cell(&mut self, f: f64) -> &mut Self {
        let f = f.clamp(0.0, 1.0);

        if self.is_empty() {
            return self;
        }

        let top = &mut self.cells[self.len - 1];
        let size = top.size();
        top.resize(size * (1.0 - f));
        self.t -= f * size;

        if self.cells[self.len - 1].size() < 1e-12 {
            self.cells[self.len - 1].clear();
            self.len -= 1;
        }

        self
    }

    fn extract_top_inner(&mut self, t: f64, mut fill: Option<&mut Cell>, dest: &mut Cell) {
        dest.clear();

        if let Some(fill) = fill.as_deref_mut() {
            fill.resize(f64::MIN_POSITIVE);
        }

        if t <= 0.0 {
            return;
        }

        let mut left = t;
        let mut more = true;

        while !self.is_empty() && more {
            let available = self.cells[self.len - 1].size();
            let f = if available > left {
                more = false;
                left / available
            } else {
                1.0
            };

            match self.extract_top_cell(f) {
                Some(chunk) => {
                    left -= chunk.size();
                    dest.add(&chunk);
                }
                None => break,
            }
        }

        // an over-deep extraction with a filler erodes into the base
        if let Some(fill) = fill {
            if (dest.size() - t).abs() > 1e-12 {
                let dh = t - dest.size();
                if dh > 0.0 {
                    debug_assert!(self.t < 1e-12);
                    debug!(shortfall = dh, "extraction reached below the column base");
                    fill.resize(dh);
                    self.z -= dh;
                    dest.add(fill);
                }
            }
        }
    }

    /// Remove up to `t` of thickness from the top into `dest` (which is
    /// cleared first).  A column shorter than `t` yields what it has.
    pub fn extract_top(&mut self, t: f64, dest: &mut Cell) {
        self.extract_top_inner(t, None, dest);
    }

    /// Like [`Column::extract_top`], but a shortfall lowers the base by
    /// the missing thickness and pads `dest` with a parcel of `fill`
    /// that size, modeling incision into the substrate.
    pub fn extract_top_fill(&mut self, t: f64, fill: &mut Cell, dest: &mut Cell) {
        self.extract_top_inner(t, Some(fill), dest);
    }

    /// Discard the top `t` of sediment.
    pub fn remove_top(&mut self, t: f64) -> &mut Self {
        if t <= 0.0 || self.is_empty() {
            return self;
        }

        let mut left = t;
        let mut more = true;

        while !self.is_empty() && more {
            let available = self.cells[self.len - 1].size();
            let f = if available >= left {
                more = false;
                left / available
            } else {
                1.0
            };

            self.remove_top_cell(f);
            left -= f * available;
        }

        self
    }

    /// Discard the top `t`; if `t` exceeds the column thickness the base
    /// drops by the excess (erosion into the substrate).
    pub fn remove_top_erode(&mut self, t: f64) -> &mut Self {
        let erode = t - self.t;

        self.remove_top(t);

        if erode > 0.0 {
            debug!(depth = erode, "eroding below the column base");
            self.z -= erode;
        }

        self
    }

    /// Extract the top `t`, keep the fraction `f[i]` of each grain type
    /// out, and return the rest to the column.  Returns the removed
    /// parcel.
    pub fn separate_top(&mut self, t: f64, f: &[f64]) -> Cell {
        let mut lag = Cell::default();
        self.extract_top(t, &mut lag);
        let removed = lag.separate_fraction(f);
        self.add_cell_avg_pressure(&lag);
        removed
    }

    /// Extract the top `total_t`, remove explicit per-type amounts, and
    /// return the rest to the column.  Returns the removed parcel.
    pub fn separate_top_amounts(&mut self, total_t: f64, t: &[f64]) -> Cell {
        let mut lag = Cell::default();
        self.extract_top(total_t, &mut lag);
        let removed = lag.separate_amount(t);
        self.add_cell_avg_pressure(&lag);
        removed
    }

    /// [`Column::separate_top_amounts`] with substrate incision: a
    /// shortfall is made up from `fill` and the base drops.
    pub fn separate_top_amounts_fill(&mut self, total_t: f64, t: &[f64], fill: &mut Cell) -> Cell {
        let mut lag = Cell::default();
        self.extract_top_fill(total_t, fill, &mut lag);
        let removed = lag.separate_amount(t);
        self.add_cell_avg_pressure(&lag);
        removed
    }

    /// Copy the top `t` of sediment into `dest` without modifying the
    /// column.  A column shorter than `t` yields what it has.
    pub fn top(&self, t: f64, dest: &mut Cell) {
        dest.clear();

        let mut left = t;
        let mut i = self.len as isize - 1;

        while left > 1e-12 && i >= 0 {
            let cell = &self.cells[i as usize];
            let available = cell.size();

            if available > left {
                let mut part = cell.clone();
                part.resize(left);
                dest.add(&part);
                left = 0.0;
            } else {
                dest.add(cell);
                left -= available;
            }
            i -= 1;
        }
    }

    /// Interpret `src` as an erosion surface: whatever of this column
    /// rises above `src`'s base is removed, and a fully consumed column
    /// adopts `src`'s base elevation.
    pub fn remove(&mut self, src: &Column) -> &mut Self {
        let d = self.top_height() - src.base_height();

        if d > 0.0 {
            self.remove_top(d);
            if self.is_empty() {
                self.z = src.z;
            }
        }

        self
    }

    /// Remove all sediment above the elevation `z` and return it as
    /// cells of height `dz` (the last one partial).
    pub fn extract_cells_above(&mut self, z: f64) -> Vec<Cell> {
        let t_above = self.top_height() - z;
        if t_above <= 0.0 {
            return Vec::new();
        }

        let mut pulled = Cell::default();
        self.extract_top(t_above, &mut pulled);

        let mut out = Vec::new();
        while pulled.size() > 1e-12 {
            let take = pulled.size().min(self.dz);
            out.push(pulled.separate_thickness(take));
        }

        out
    }

    // -------------------------------------------------------------------------
    // Chop / chomp / strip
    // -------------------------------------------------------------------------

    /// Copy the part of this column above the elevation `z` into a new
    /// column based at `z`.  The bottom cell is trimmed to the boundary;
    /// cells keep their sizes otherwise.
    pub fn height_copy(&self, z: f64) -> Column {
        let mut dest = Column::new(1);
        dest.copy_public_data(self);
        dest.set_base_height(z);

        if self.is_empty() {
            return dest;
        }

        let t = z - self.z;
        if t <= 0.0 {
            // at or below the base: everything
            dest.append(self);
            return dest;
        }

        let start = self.index_thickness(t).max(0) as usize;
        if start >= self.len {
            return dest;
        }

        let dh = self.thickness_index(start as isize) - t;
        if dh > 0.0 {
            dest.append_cell(&self.cells[start]);
            dest.resize_cell(0, dh);
        }

        for i in start + 1..self.len {
            dest.append_cell(&self.cells[i]);
        }

        dest
    }

    /// Remove sediment below the elevation `bottom`.  A boundary above
    /// the top empties the column and moves its base up; one below the
    /// base is a no-op.
    pub fn chomp(&mut self, bottom: f64) -> &mut Self {
        if bottom > self.z {
            let kept = self.height_copy(bottom);
            self.copy_from(&kept);
        }
        self
    }

    /// Remove sediment above the elevation `top`.  A boundary above the
    /// top is a no-op; one below the base empties the column and drops
    /// its base to `top`.
    pub fn chop(&mut self, top: f64) -> &mut Self {
        if top < self.top_height() {
            let t = self.top_height() - top;
            self.remove_top(t);

            if top < self.z {
                self.z = top;
            }
        }
        self
    }

    /// Keep only the sediment between the elevations `bottom` and `top`.
    pub fn strip(&mut self, bottom: f64, top: f64) -> &mut Self {
        self.chomp(bottom).chop(top)
    }

    // -------------------------------------------------------------------------
    // Per-cell resizing
    // -------------------------------------------------------------------------

    /// Resize a live cell (preserving its compaction ratio) and update
    /// the cached thickness.
    pub fn resize_cell(&mut self, i: usize, new_t: f64) -> &mut Self {
        if self.is_get_index(i) {
            let old_t = self.cells[i].size();
            let new_t = new_t.max(0.0);

            self.cells[i].resize(new_t);
            self.t += new_t - old_t;
        }
        self
    }

    /// Compact a live cell (its uncompacted thickness is untouched) and
    /// update the cached thickness.
    pub fn compact_cell(&mut self, i: usize, new_t: f64) -> &mut Self {
        if self.is_get_index(i) {
            let old_t = self.cells[i].size();

            self.cells[i].compact(new_t);
            self.t += new_t - old_t;
        }
        self
    }

    /// Pull all sediment out and deposit it again, restoring the
    /// uniform-`dz` layout after arbitrary per-cell mutations.  Mass is
    /// conserved.
    pub fn rebin(&mut self) -> &mut Self {
        let snapshot = self.clone();
        self.clear();

        for i in 0..snapshot.len {
            self.add_cell_avg_pressure(&snapshot.cells[i]);
        }

        debug!(len = self.len, thickness = self.t, "rebinned column");
        self
    }

    // -------------------------------------------------------------------------
    // Indexing and geometry
    // -------------------------------------------------------------------------

    /// Index of the cell containing the thickness `t` measured up from
    /// the base; -1 for `t <= 0`.  Searches from whichever end of the
    /// column is closer.
    pub fn index_thickness(&self, t: f64) -> isize {
        if t > self.t * 0.5 {
            return self.index_depth(self.t - t);
        }

        let t = t.max(0.0);
        let mut total = 0.0;
        let mut i = 0;

        while total < t && i < self.len {
            total += self.cells[i].size();
            i += 1;
        }

        i as isize - 1
    }

    /// Index of the cell at burial depth `d` from the top; -1 for
    /// `d >= thickness`.
    pub fn index_depth(&self, d: f64) -> isize {
        if d >= self.t * 0.5 {
            return self.index_thickness(self.t - d);
        }

        let d = d.max(0.0);
        let mut total = 0.0;
        let mut i = self.len as isize - 1;

        while i >= 0 && total <= d {
            total += self.cells[i as usize].size();
            i -= 1;
        }

        i + 1
    }

    /// Index of the cell at the elevation `z`.
    pub fn index_at(&self, z: f64) -> isize {
        self.index_thickness(z - self.z)
    }

    /// Cumulative thickness from the base through cell `i` inclusive.
    /// Negative indices give 0; indices above the top give the total
    /// thickness.
    pub fn thickness_index(&self, i: isize) -> f64 {
        let top = (i + 1).clamp(0, self.len as isize) as usize;
        self.cells[..top].iter().map(Cell::size).sum()
    }

    /// Burial depth at which cell age first drops to `age`, integrating
    /// from the top.
    pub fn depth_age(&self, age: f64) -> f64 {
        let mut d = 0.0;

        for i in (0..self.len).rev() {
            if self.cells[i].age() <= age {
                break;
            }
            d += self.cells[i].size();
        }

        d
    }

    /// Number of cells (partial ones counted whole) covering the span
    /// from the elevation `z` to the top.
    pub fn top_nbins(&self, z: f64) -> usize {
        if self.is_empty() {
            return 0;
        }

        let t = z - self.z;
        if t > 0.0 {
            let bot = self.index_thickness(t).max(0) as usize;
            self.len - bot
        } else {
            self.len
        }
    }

    // -------------------------------------------------------------------------
    // Load model
    // -------------------------------------------------------------------------

    /// Load from the cells strictly above cell `n` (Pa).
    pub fn load_at(&self, n: usize) -> f64 {
        self.cells[(n + 1).min(self.len)..self.len]
            .iter()
            .map(Cell::load)
            .sum()
    }

    fn window(&self, start: usize, n_bins: usize) -> usize {
        if n_bins == 0 || start + n_bins > self.len {
            self.len.saturating_sub(start)
        } else {
            n_bins
        }
    }

    /// Cumulative sediment load on each cell of a window, counting
    /// everything above the window plus an `overlying_load` offset.
    ///
    /// Element `i` is the load on cell `start + i`; `n_bins == 0` runs
    /// the window to the top of the column.
    pub fn total_load(&self, start: usize, n_bins: usize, overlying_load: f64) -> Vec<f64> {
        let n = self.window(start, n_bins);
        if n == 0 {
            return Vec::new();
        }

        let mut load = vec![0.0; n];

        // the load on a cell includes its own weight
        let mut load0 = overlying_load;
        for i in (start + n - 1..self.len).rev() {
            load0 += self.cells[i].sediment_load();
        }

        load[n - 1] = load0;
        for i in (0..n - 1).rev() {
            load[i] = load[i + 1] + self.cells[i + start].sediment_load();
        }

        load
    }

    /// [`Column::total_load`] with no overlying offset.
    pub fn load(&self, start: usize, n_bins: usize) -> Vec<f64> {
        self.total_load(start, n_bins, 0.0)
    }

    /// [`Column::total_load`] with the water column's hydrostatic
    /// pressure as the offset.
    pub fn load_with_water(&self, start: usize, n_bins: usize) -> Vec<f64> {
        self.total_load(start, n_bins, self.water_pressure())
    }

    // -------------------------------------------------------------------------
    // Property reductions
    // -------------------------------------------------------------------------

    /// Running totals of a property from the top of a window down;
    /// everything above the window is folded into the top element.
    pub fn total_property(&self, prop: &Property, start: usize, n_bins: usize) -> Vec<f64> {
        let n = self.window(start, n_bins);
        if n == 0 {
            return Vec::new();
        }

        let mut val = vec![0.0; n];

        let mut val0 = 0.0;
        for i in (start + n - 1..self.len).rev() {
            val0 += prop.measure(&self.cells[i]);
        }

        val[n - 1] = val0;
        for i in (0..n - 1).rev() {
            val[i] = val[i + 1] + prop.measure(&self.cells[i + start]);
        }

        val
    }

    /// Thickness-weighted running averages of a property from the top of
    /// a window down.
    pub fn avg_property(&self, prop: &Property, start: usize, n_bins: usize) -> Vec<f64> {
        let n = self.window(start, n_bins);
        if n == 0 {
            return Vec::new();
        }

        let mut t = vec![0.0; n];
        let mut val = vec![0.0; n];

        t[n - 1] = self.cells[start + n - 1].size();
        for i in (0..n - 1).rev() {
            t[i] = t[i + 1] + self.cells[start + i].size();
        }

        val[n - 1] = prop.measure(&self.cells[start + n - 1]);
        for i in (0..n - 1).rev() {
            val[i] = (val[i + 1] * t[i + 1]
                + prop.measure(&self.cells[start + i]) * (t[i] - t[i + 1]))
                / t[i];
        }

        val
    }

    /// [`Column::avg_property`] for load-dependent properties: each cell
    /// is measured under its own overlying load.
    pub fn avg_property_with_load(
        &self,
        prop: &Property,
        start: usize,
        n_bins: usize,
    ) -> Vec<f64> {
        let n = self.window(start, n_bins);
        if n == 0 {
            return Vec::new();
        }

        let load = self.load(start, n);
        let mut t = vec![0.0; n];
        let mut val = vec![0.0; n];

        t[n - 1] = self.cells[start + n - 1].size();
        for i in (0..n - 1).rev() {
            t[i] = t[i + 1] + self.cells[start + i].size();
        }

        val[n - 1] = prop.measure_with(&self.cells[start + n - 1], load[n - 1]);
        for i in (0..n - 1).rev() {
            val[i] = (val[i + 1] * t[i + 1]
                + prop.measure_with(&self.cells[start + i], load[i]) * (t[i] - t[i + 1]))
                / t[i];
        }

        val
    }

    /// Raw per-cell property values over a window.
    pub fn at_property(&self, prop: &Property, start: usize, n_bins: usize) -> Vec<f64> {
        let n = self.window(start, n_bins);
        (0..n)
            .map(|i| prop.measure(&self.cells[start + i]))
            .collect()
    }

    /// Thickness-weighted column mean of a property, ignoring any extra
    /// argument.
    pub fn property_0(&self, prop: &Property) -> f64 {
        if self.t <= 0.0 {
            return 0.0;
        }

        let val: f64 = self.cells[..self.len]
            .iter()
            .map(|c| prop.measure(c) * c.size())
            .sum();

        val / self.t
    }

    /// Thickness-weighted column mean of a property.  Two-argument
    /// properties receive the column age when flagged for it, otherwise
    /// each cell's overlying load.
    pub fn property(&self, prop: &Property) -> f64 {
        if self.t <= 0.0 {
            return 0.0;
        }

        let val: f64 = if prop.takes_extra_arg() {
            match prop.extra() {
                ExtraArg::ColumnAge => self.cells[..self.len]
                    .iter()
                    .map(|c| prop.measure_with(c, self.age) * c.size())
                    .sum(),
                _ => {
                    let load = self.load(0, 0);
                    self.cells[..self.len]
                        .iter()
                        .zip(&load)
                        .map(|(c, &l)| prop.measure_with(c, l) * c.size())
                        .sum()
                }
            }
        } else {
            self.cells[..self.len]
                .iter()
                .map(|c| prop.measure(c) * c.size())
                .sum()
        };

        val / self.t
    }

    /// Bulk property of the top `t` of sediment, ignoring any extra
    /// argument.
    pub fn top_property_0(&self, prop: &Property, t: f64) -> f64 {
        let mut avg = Cell::default();
        self.top(t, &mut avg);
        prop.measure(&avg)
    }

    /// Bulk property of the top `t` of sediment.  Two-argument
    /// properties receive the column age when flagged for it, otherwise
    /// the load of the extracted parcel itself.
    pub fn top_property(&self, prop: &Property, t: f64) -> f64 {
        let mut avg = Cell::default();
        self.top(t, &mut avg);

        if prop.takes_extra_arg() {
            let extra = match prop.extra() {
                ExtraArg::ColumnAge => self.age,
                _ => avg.load(),
            };
            prop.measure_with(&avg, extra)
        } else {
            prop.measure(&avg)
        }
    }

    /// Bulk density of the top `t` of sediment.
    pub fn top_rho(&self, t: f64) -> f64 {
        let mut avg = Cell::default();
        self.top(t, &mut avg);
        avg.density()
    }

    /// Mean age of the top `t` of sediment.
    pub fn top_age(&self, t: f64) -> f64 {
        let mut avg = Cell::default();
        self.top(t, &mut avg);
        avg.age()
    }
}

impl Cell {
    /// Mix every live cell of a column into this cell (accumulating).
    pub fn add_column(&mut self, src: &Column) -> &mut Self {
        for i in 0..src.len {
            self.add(&src.cells[i]);
        }
        self
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use strata_sediment::{set_ambient, Catalog};

    fn setup() {
        let _ = set_ambient(&Catalog::default_catalog());
    }

    fn sand_cell(t: f64) -> Cell {
        setup();
        Cell::new_classed(None, t, SizeClass::SAND).unwrap()
    }

    #[test]
    fn new_column_defaults() {
        let c = Column::new(5);
        assert!(c.is_empty());
        assert_eq!(c.len(), 0);
        assert!(c.capacity() >= 5);
        assert_eq!(c.capacity() % ADD_BINS, 0);
        assert!(c.thickness().abs() < 1e-12);
        assert!(c.base_height().abs() < 1e-12);
        assert!((c.z_res() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn add_cell_fills_in_dz_quanta() {
        setup();
        let mut c = Column::new(1);
        let s = sand_cell(1.0);

        let added = c.add_cell(&s);
        assert!((added - 1.0).abs() < 1e-12);
        assert_eq!(c.len(), 1);
        assert!(c.size_is(1.0));

        // a second full cell opens a new bin
        c.add_cell(&s);
        assert_eq!(c.len(), 2);
        assert!(c.size_is(2.0));
    }

    #[test]
    fn partial_top_cell_fills_first() {
        setup();
        let mut c = Column::new(1);
        c.add_cell(&sand_cell(0.25));
        assert_eq!(c.len(), 1);

        c.add_cell(&sand_cell(0.5));
        assert_eq!(c.len(), 1);
        assert!(c.size_is(0.75));

        // overflow opens a second bin
        c.add_cell(&sand_cell(0.5));
        assert_eq!(c.len(), 2);
        assert!(c.size_is(1.25));

        // fill discipline: all cells below the top are full
        for i in 0..c.len() - 1 {
            assert!((c.nth_cell(i).unwrap().size() - c.z_res()).abs() < 1e-12);
        }
    }

    #[test]
    fn add_cell_conserves_mass_and_leaves_input_alone() {
        setup();
        let s = sand_cell(128.0);
        let mass_in = s.mass();

        let mut c = Column::new(1);
        let added = c.add_cell(&s);

        assert!((added - 128.0).abs() < 1e-12);
        assert_eq!(c.len(), 128);
        assert!((s.mass() - mass_in).abs() < 1e-12);
        assert!((c.mass() - mass_in).abs() < 1e-9 * mass_in);
    }

    #[test]
    fn add_cell_updates_pore_pressure_below() {
        setup();
        let mut c = Column::new(1);
        c.add_cell(&sand_cell(1.0));
        let p_before = c.nth_cell(0).unwrap().pressure();

        let s = sand_cell(1.0);
        let expected_load = s.load();
        c.add_cell(&s);

        let p_after = c.nth_cell(0).unwrap().pressure();
        assert!((p_after - p_before - expected_load).abs() < 1e-9 * expected_load);
    }

    #[test]
    fn append_cell_keeps_cell_sizes() {
        setup();
        let mut c = Column::new(1);
        c.append_cell(&sand_cell(2.5));
        c.append_cell(&sand_cell(0.5));

        assert_eq!(c.len(), 2);
        assert!(c.size_is(3.0));
        assert!((c.nth_cell(0).unwrap().size() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn extract_top_cell_state_machine() {
        setup();
        let mut c = Column::new(1);
        c.add_cell(&sand_cell(1.0));

        // full -> partial
        let part = c.extract_top_cell(0.25).unwrap();
        assert!((part.size() - 0.25).abs() < 1e-12);
        assert_eq!(c.len(), 1);
        assert!(c.size_is(0.75));

        // partial -> retired
        c.extract_top_cell(1.0).unwrap();
        assert!(c.is_empty());
        assert!(c.size_is(0.0));
    }

    #[test]
    fn index_thickness_and_duality() {
        setup();
        let mut c = Column::new(1);
        c.add_cell(&sand_cell(10.0));

        assert_eq!(c.index_thickness(-1.0), -1);
        assert_eq!(c.index_thickness(0.0), -1);
        assert_eq!(c.index_thickness(0.5), 0);
        assert_eq!(c.index_thickness(9.5), 9);
        // boundary thicknesses belong to the lower cell
        assert_eq!(c.index_thickness(1.0), 0);

        assert_eq!(c.index_depth(0.0), 9);
        assert_eq!(c.index_depth(9.5), 0);
        assert_eq!(c.index_depth(10.0), -1);

        for i in 0..c.len() as isize {
            let t = c.thickness_index(i);
            assert_eq!(c.index_thickness(t), i);
        }
    }

    #[test]
    fn thickness_index_clamps() {
        setup();
        let mut c = Column::new(1);
        c.add_cell(&sand_cell(4.0));

        assert!(c.thickness_index(-3).abs() < 1e-12);
        assert!((c.thickness_index(1) - 2.0).abs() < 1e-12);
        assert!((c.thickness_index(99) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn top_nbins_counts_partials_whole() {
        setup();
        let mut c = Column::new(1);
        c.set_base_height(10.0);
        c.add_cell(&sand_cell(4.5));

        assert_eq!(c.len(), 5);
        assert_eq!(c.top_nbins(10.0), 5);
        assert_eq!(c.top_nbins(5.0), 5);
        assert_eq!(c.top_nbins(c.top_height()), 1);
        assert_eq!(c.top_nbins(13.2), 2);
    }

    #[test]
    fn resize_cell_and_compact_cell_track_thickness() {
        setup();
        let mut c = Column::new(1);
        c.add_cell(&sand_cell(3.0));

        c.resize_cell(1, 0.5);
        assert!(c.size_is(2.5));

        c.compact_cell(0, 0.75);
        assert!(c.size_is(2.25));
        assert!((c.nth_cell(0).unwrap().size_0() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn load_at_sums_strictly_above() {
        setup();
        let mut c = Column::new(1);
        c.add_cell(&sand_cell(3.0));

        let per_cell = c.nth_cell(2).unwrap().load();
        assert!((c.load_at(0) - 2.0 * per_cell).abs() < 1e-9 * per_cell);
        assert!((c.load_at(2)).abs() < 1e-12);
    }

    #[test]
    fn remove_interprets_erosion_column() {
        setup();
        let mut c = Column::new(1);
        c.set_base_height(0.0);
        c.add_cell(&sand_cell(10.0));

        let mut surface = Column::new(1);
        surface.set_base_height(6.0);

        c.remove(&surface);
        assert!(c.top_height_is(6.0));

        let mut deep = Column::new(1);
        deep.set_base_height(-5.0);
        c.remove(&deep);
        assert!(c.is_empty());
        assert!(c.base_height_is(-5.0));
    }
}
