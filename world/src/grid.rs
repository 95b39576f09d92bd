//! Dense cell storage backing the map.

use thornfield_core::{CellCoord, CellState, LockRule};

/// Rectangular map of cell states addressed by column and row.
///
/// Every in-range address always holds exactly one [`CellState`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    columns: u32,
    rows: u32,
    cells: Vec<CellState>,
}

impl Grid {
    /// Creates a grid of fresh ground.
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        Self::filled(columns, rows, CellState::FRESH)
    }

    /// Creates a grid where every cell holds the provided state.
    #[must_use]
    pub fn filled(columns: u32, rows: u32, state: CellState) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            cells: vec![state; capacity],
        }
    }

    /// Builds a grid from row-major cells, padding or truncating to fit.
    #[must_use]
    pub fn from_cells(columns: u32, rows: u32, cells: Vec<CellState>) -> Self {
        let mut grid = Self::new(columns, rows);
        let len = grid.cells.len();
        for (slot, state) in grid.cells.iter_mut().zip(cells.into_iter().take(len)) {
            *slot = state;
        }
        grid
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Provides the dimensions of the grid as `(columns, rows)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Reports whether the coordinate addresses a cell of this grid.
    #[must_use]
    pub const fn in_bounds(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Returns the state of an in-bounds cell.
    ///
    /// # Panics
    ///
    /// Panics when the coordinate lies outside the grid. Guard with
    /// [`Grid::in_bounds`] or use [`Grid::try_get`].
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> CellState {
        match self.index(cell) {
            Some(index) => self.cells[index],
            None => panic!(
                "cell {cell:?} outside {}x{} grid",
                self.columns, self.rows
            ),
        }
    }

    /// Returns the state of the cell, or `None` when out of bounds.
    #[must_use]
    pub fn try_get(&self, cell: CellCoord) -> Option<CellState> {
        self.index(cell).map(|index| self.cells[index])
    }

    /// Overwrites an in-bounds cell.
    ///
    /// # Panics
    ///
    /// Panics when the coordinate lies outside the grid.
    pub fn set(&mut self, cell: CellCoord, state: CellState) {
        let Some(index) = self.index(cell) else {
            panic!("cell {cell:?} outside {}x{} grid", self.columns, self.rows);
        };
        self.cells[index] = state;
    }

    /// Reports whether lock cells currently block movement.
    ///
    /// Scans the whole grid: locked iff any cell is ripe or thorned.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.is_locked_under(LockRule::RipeOrThorned)
    }

    /// Evaluates an arbitrary lock rule with a full scan.
    #[must_use]
    pub fn is_locked_under(&self, rule: LockRule) -> bool {
        self.cells.iter().any(|state| rule.locks_on(*state))
    }

    /// Iterates every cell in row-major order alongside its coordinate.
    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, CellState)> + '_ {
        let columns = self.columns.max(1);
        self.cells.iter().enumerate().map(move |(index, state)| {
            let index = index as u32;
            (CellCoord::new(index % columns, index / columns), *state)
        })
    }

    /// Row-major cell states.
    #[must_use]
    pub fn as_slice(&self) -> &[CellState] {
        &self.cells
    }

    /// Renders the grid using the text level alphabet, one line per row.
    #[must_use]
    pub fn to_text(&self) -> String {
        let width = usize::try_from(self.columns).unwrap_or(0).max(1);
        let mut text = String::with_capacity(self.cells.len() + self.cells.len() / width);
        for row in self.cells.chunks(width) {
            text.extend(row.iter().map(|state| state.symbol()));
            text.push('\n');
        }
        text
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.in_bounds(cell) {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}
