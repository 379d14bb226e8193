//! Row types

use crate::cell::Cell;
use crate::modifier::Modifier;

/// One grid row: an ordered sequence of cells plus row-level modifier state
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Row index (0-based), reassigned when rows are expanded
    pub index: usize,
    /// Cells in this row, in field order
    pub cells: Vec<Cell>,
    /// Row-level modifier (expand directive)
    pub modifier: Modifier,
}

impl Row {
    /// Create a row with no modifier
    pub fn new(index: usize, cells: Vec<Cell>) -> Self {
        Self {
            index,
            cells,
            modifier: Modifier::default(),
        }
    }

    /// Create a row carrying a modifier
    pub fn with_modifier(index: usize, cells: Vec<Cell>, modifier: Modifier) -> Self {
        Self {
            index,
            cells,
            modifier,
        }
    }

    /// Reassign this row's index, keeping cell coordinates consistent
    pub fn reindex(&mut self, index: usize) {
        self.index = index;
        for cell in &mut self.cells {
            cell.row_index = index;
        }
    }

    /// Number of cells in the row
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reindex_updates_cells() {
        let mut row = Row::new(0, vec![Cell::new(0, 0, "a"), Cell::new(0, 1, "b")]);
        row.reindex(4);

        assert_eq!(row.index, 4);
        assert!(row.cells.iter().all(|c| c.row_index == 4));
        assert_eq!(row.cells[1].index, 1);
    }
}
