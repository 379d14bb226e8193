//! Grid position tracking types

use std::fmt;

/// The current location within the grid during a compile pass
///
/// Both coordinates are unset outside of an iteration pass; `row` is set
/// while mapping rows and `cell` only while mapping the cells of one row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    /// Current row index (0-based), if a row pass is active
    pub row: Option<usize>,
    /// Current cell index within the row (0-based), if a cell pass is active
    pub cell: Option<usize>,
}

impl Position {
    /// The 1-based row number, as seen by `$$rownum`
    pub fn rownum(&self) -> Option<usize> {
        self.row.map(|r| r + 1)
    }

    /// The 1-based cell number, as seen by `$$cellnum`
    pub fn cellnum(&self) -> Option<usize> {
        self.cell.map(|c| c + 1)
    }
}

/// Where in the source file an error happened
///
/// Renders as `filename:line[row,cell]`, dropping the bracket suffix when no
/// grid pass was active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Source filename, or a placeholder when compiling from memory
    pub filename: String,
    /// 1-based line number in the original file
    pub line_number: usize,
    /// Grid position, if the error happened during a row/cell pass
    pub position: Position,
}

impl SourceLocation {
    /// Create a location with no active grid position
    pub fn new<S: Into<String>>(filename: S, line_number: usize) -> Self {
        Self {
            filename: filename.into(),
            line_number,
            position: Position::default(),
        }
    }

    /// Create a location with a grid position attached
    pub fn with_position<S: Into<String>>(
        filename: S,
        line_number: usize,
        position: Position,
    ) -> Self {
        Self {
            filename: filename.into(),
            line_number,
            position,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.filename, self.line_number)?;
        match (self.position.row, self.position.cell) {
            (Some(row), Some(cell)) => write!(f, "[{},{}]", row, cell),
            (Some(row), None) => write!(f, "[{}]", row),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rownum_cellnum() {
        let pos = Position {
            row: Some(0),
            cell: Some(2),
        };
        assert_eq!(pos.rownum(), Some(1));
        assert_eq!(pos.cellnum(), Some(3));

        assert_eq!(Position::default().rownum(), None);
    }

    #[test]
    fn test_location_display() {
        let loc = SourceLocation::new("foo.csvpp", 3);
        assert_eq!(loc.to_string(), "foo.csvpp:3");

        let loc = SourceLocation::with_position(
            "foo.csvpp",
            5,
            Position {
                row: Some(1),
                cell: Some(2),
            },
        );
        assert_eq!(loc.to_string(), "foo.csvpp:5[1,2]");

        let loc = SourceLocation::with_position(
            "foo.csvpp",
            5,
            Position {
                row: Some(1),
                cell: None,
            },
        );
        assert_eq!(loc.to_string(), "foo.csvpp:5[1]");
    }
}
