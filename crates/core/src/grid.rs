//! Grid module - the cell store pieces are placed into
//!
//! The grid is a `cols x rows` matrix of cell values using a flat array:
//! `0` is empty, `1..COLOR_COUNT` is a piece colour. Storage is column-major
//! (`x * rows + y`), which is also the wire order of `BOARD` messages, so a
//! snapshot is a plain copy of the backing array.
//!
//! Coordinates are signed: a piece centred on an edge cell reaches one cell
//! past the border, and those reads must come back as [`INVALID_CELL`] rather
//! than panic.

use std::collections::BTreeSet;

use crate::pieces::GamePiece;
use crate::types::{BlockCoordinate, COLOR_COUNT, EMPTY_CELL, INVALID_CELL};

/// The game grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cols: u8,
    rows: u8,
    /// Flat array of cells, column-major order (x * rows + y)
    cells: Vec<i32>,
    /// Bumped on every mutation; observers compare it to skip redraws
    revision: u32,
}

/// Rows and columns found full by [`Grid::full_lines`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FullLines {
    pub rows: Vec<u8>,
    pub cols: Vec<u8>,
}

impl FullLines {
    /// Number of full lines; a row and a column count separately even when
    /// they share a cell
    pub fn count(&self) -> usize {
        self.rows.len() + self.cols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.cols.is_empty()
    }
}

impl Grid {
    /// Create an empty grid
    pub fn new(cols: u8, rows: u8) -> Self {
        Self {
            cols,
            rows,
            cells: vec![EMPTY_CELL; cols as usize * rows as usize],
            revision: 0,
        }
    }

    /// Rebuild a grid from column-major values, as carried by `BOARD`.
    ///
    /// Returns `None` when the length does not match or a value is outside
    /// `[0, COLOR_COUNT)`.
    pub fn from_column_major(cols: u8, rows: u8, values: &[i32]) -> Option<Self> {
        if values.len() != cols as usize * rows as usize {
            return None;
        }
        if values.iter().any(|&v| !is_cell_value(v)) {
            return None;
        }
        Some(Self {
            cols,
            rows,
            cells: values.to_vec(),
            revision: 0,
        })
    }

    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.cols as i32 || y >= self.rows as i32 {
            return None;
        }
        Some(x as usize * self.rows as usize + y as usize)
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn revision(&self) -> u32 {
        self.revision
    }

    /// Get cell at position (x, y)
    /// Returns `INVALID_CELL` if out of bounds
    pub fn get(&self, x: i32, y: i32) -> i32 {
        match self.index(x, y) {
            Some(idx) => self.cells[idx],
            None => INVALID_CELL,
        }
    }

    /// Set cell at position (x, y)
    /// Returns false (and leaves the grid untouched) if out of bounds or
    /// `value` is not a valid cell value
    pub fn set(&mut self, x: i32, y: i32, value: i32) -> bool {
        if !is_cell_value(value) {
            return false;
        }
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = value;
                self.bump();
                true
            }
            None => false,
        }
    }

    /// Check if position is within bounds and empty
    pub fn is_empty_at(&self, x: i32, y: i32) -> bool {
        self.get(x, y) == EMPTY_CELL
    }

    /// Check whether `piece` fits with its centre on `(x, y)`.
    ///
    /// Every occupied pattern cell must land on an in-bounds empty cell.
    pub fn can_play_piece(&self, piece: &GamePiece, x: i32, y: i32) -> bool {
        piece
            .occupied_offsets()
            .all(|(dx, dy)| self.is_empty_at(x + dx, y + dy))
    }

    /// Write `piece` onto the grid centred on `(x, y)`.
    ///
    /// Does not check legality; call [`Grid::can_play_piece`] first. Pattern
    /// cells that fall outside the grid are skipped.
    pub fn play_piece(&mut self, piece: &GamePiece, x: i32, y: i32) {
        for (dx, dy) in piece.occupied_offsets() {
            if let Some(idx) = self.index(x + dx, y + dy) {
                self.cells[idx] = piece.value();
            }
        }
        self.bump();
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: u8) -> bool {
        y < self.rows && (0..self.cols).all(|x| self.get(x as i32, y as i32) != EMPTY_CELL)
    }

    /// Check if a column is completely filled
    pub fn is_column_full(&self, x: u8) -> bool {
        if x >= self.cols {
            return false;
        }
        let start = x as usize * self.rows as usize;
        self.cells[start..start + self.rows as usize]
            .iter()
            .all(|&cell| cell != EMPTY_CELL)
    }

    /// Scan every row and every column independently
    pub fn full_lines(&self) -> FullLines {
        FullLines {
            rows: (0..self.rows).filter(|&y| self.is_row_full(y)).collect(),
            cols: (0..self.cols).filter(|&x| self.is_column_full(x)).collect(),
        }
    }

    /// Union of the cells covered by `lines`, each cell once
    pub fn cells_in(&self, lines: &FullLines) -> BTreeSet<BlockCoordinate> {
        let mut blocks = BTreeSet::new();
        for &y in &lines.rows {
            for x in 0..self.cols {
                blocks.insert(BlockCoordinate::new(x, y));
            }
        }
        for &x in &lines.cols {
            for y in 0..self.rows {
                blocks.insert(BlockCoordinate::new(x, y));
            }
        }
        blocks
    }

    /// Empty every listed cell; returns how many were in bounds
    pub fn clear_cells<'a, I>(&mut self, blocks: I) -> usize
    where
        I: IntoIterator<Item = &'a BlockCoordinate>,
    {
        let mut cleared = 0;
        for block in blocks {
            if let Some(idx) = self.index(block.x as i32, block.y as i32) {
                self.cells[idx] = EMPTY_CELL;
                cleared += 1;
            }
        }
        if cleared > 0 {
            self.bump();
        }
        cleared
    }

    /// Empty the whole grid
    pub fn clear(&mut self) {
        self.cells.fill(EMPTY_CELL);
        self.bump();
    }

    /// Number of non-empty cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != EMPTY_CELL).count()
    }

    /// Backing cells in column-major order
    pub fn cells(&self) -> &[i32] {
        &self.cells
    }

    /// Column-major copy of the cells, ready for a `BOARD` message
    pub fn to_column_major(&self) -> Vec<i32> {
        self.cells.clone()
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

fn is_cell_value(value: i32) -> bool {
    (EMPTY_CELL..COLOR_COUNT).contains(&value)
}

#[cfg(test)]
impl Grid {
    /// Fill a row with `value` (for testing)
    pub fn fill_row(&mut self, y: u8, value: i32) {
        for x in 0..self.cols {
            self.set(x as i32, y as i32, value);
        }
    }

    /// Fill a column with `value` (for testing)
    pub fn fill_column(&mut self, x: u8, value: i32) {
        for y in 0..self.rows {
            self.set(x as i32, y as i32, value);
        }
    }
}
