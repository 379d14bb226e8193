//! The compiled template grid

use crate::cell::Cell;
use crate::row::Row;

/// A fully-compiled grid of rows, ready to hand to a writer
///
/// By the time a `Template` exists every formula cell's AST has been
/// resolved: no `Variable` nodes and no calls to user-defined functions
/// remain, only literals, cell references, and spreadsheet-level calls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Template {
    /// Rows in grid order
    pub rows: Vec<Row>,
}

impl Template {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Look up a cell by grid coordinates
    pub fn cell_at(&self, row: usize, cell: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.cells.get(cell))
    }

    /// Number of rows in the grid
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate all cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.rows.iter().flat_map(|r| r.cells.iter())
    }
}
