//! Compile-phase position tracking and input staging
//!
//! One [`Runtime`] lives for the duration of a compile. It owns the staging
//! buffer holding "the input still to be parsed" (the whole file at first,
//! only the grid section once the code section has been consumed) and
//! tracks the `(line, row, cell)` coordinates every error gets stamped
//! with. Strictly single-threaded; phases run in sequence over the same
//! instance.

use csvpp_core::entity::Entity;
use csvpp_core::error::{Error, Result};
use csvpp_core::position::{Position, SourceLocation};
use csvpp_core::DEFAULT_FILENAME;
use csvpp_lang::builtins;

/// The owned text the current phase is parsing
///
/// Stands in for a temp file: rewriting it swaps the whole contents, and
/// releasing it frees the allocation. Dropping the buffer releases it
/// regardless, so error unwinds never leak the staged input.
#[derive(Debug)]
pub struct StagingBuffer {
    contents: String,
}

impl StagingBuffer {
    fn new(contents: String) -> Self {
        Self { contents }
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Truncate and replace the staged text
    fn rewrite(&mut self, contents: String) {
        self.contents = contents;
    }

    fn release(&mut self) {
        self.contents = String::new();
    }
}

/// Position-tracking state machine for one compile
#[derive(Debug)]
pub struct Runtime {
    filename: String,
    position: Position,
    line_number: usize,
    buffer: StagingBuffer,
    length_of_code_section: usize,
    length_of_csv_section: usize,
    length_of_original_file: usize,
}

impl Runtime {
    /// Stage `input` for compilation. `filename` only feeds error
    /// locations; compiles from memory use a placeholder.
    pub fn new(input: &str, filename: Option<&str>) -> Self {
        Self {
            filename: filename.unwrap_or(DEFAULT_FILENAME).to_string(),
            position: Position::default(),
            line_number: 1,
            buffer: StagingBuffer::new(input.to_string()),
            length_of_code_section: 0,
            length_of_csv_section: 0,
            length_of_original_file: input.lines().count(),
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// The text currently staged for parsing
    pub fn input(&self) -> &str {
        self.buffer.contents()
    }

    pub fn length_of_code_section(&self) -> usize {
        self.length_of_code_section
    }

    pub fn length_of_csv_section(&self) -> usize {
        self.length_of_csv_section
    }

    pub fn length_of_original_file(&self) -> usize {
        self.length_of_original_file
    }

    /// The current coordinates, for stamping an error
    pub fn source_location(&self) -> SourceLocation {
        SourceLocation::with_position(&self.filename, self.line_number, self.position)
    }

    /// The file line a given grid row came from
    pub fn row_location(&self, row_index: usize) -> SourceLocation {
        SourceLocation::with_position(
            &self.filename,
            self.length_of_code_section + 1 + row_index,
            Position {
                row: Some(row_index),
                cell: None,
            },
        )
    }

    /// Split the staged input at the end-of-code marker line (`---`)
    ///
    /// Returns `(code_text, grid_text)`; `code_text` is `None` when the
    /// input has no marker and is all grid. The code-section line count
    /// recorded here includes the marker line, so grid line numbers stay
    /// aligned with the original file.
    pub fn split_input(&mut self) -> (Option<String>, String) {
        let lines: Vec<&str> = self.buffer.contents().lines().collect();

        let marker = lines.iter().position(|line| {
            let trimmed = line.trim();
            trimmed.len() >= 3 && trimmed.chars().all(|c| c == '-')
        });

        match marker {
            Some(at) => {
                let code = lines[..at].join("\n");
                let grid = lines[at + 1..].join("\n");
                self.length_of_code_section = at + 1;
                self.length_of_csv_section = lines.len() - at - 1;
                (Some(code), grid)
            }
            None => {
                self.length_of_code_section = 0;
                self.length_of_csv_section = lines.len();
                (None, self.buffer.contents().to_string())
            }
        }
    }

    /// Replace the staged input, e.g. with just the grid section
    pub fn rewrite_input(&mut self, contents: String) {
        self.buffer.rewrite(contents);
    }

    /// Reset coordinates for a fresh phase over the whole input
    pub fn start(&mut self) {
        self.position = Position::default();
        self.line_number = 1;
    }

    /// Reset coordinates for a phase over the grid section, seeding the
    /// line number to the first grid line of the original file
    pub fn start_at_csv(&mut self) {
        self.start();
        self.line_number = self.length_of_code_section + 1;
    }

    /// Apply `f` to each line, advancing the line number after every call
    /// and the row index too when a row pass is active
    pub fn map_lines<T, U, F>(&mut self, lines: Vec<T>, mut f: F) -> Vec<U>
    where
        F: FnMut(&mut Self, T) -> U,
    {
        lines
            .into_iter()
            .map(|line| {
                let mapped = f(self, line);
                self.line_number += 1;
                if let Some(row) = self.position.row {
                    self.position.row = Some(row + 1);
                }
                mapped
            })
            .collect()
    }

    /// Apply `f` to each cell of one row, tracking the cell index. Leaves
    /// the line number and row index alone.
    pub fn map_row<T, U, F>(&mut self, cells: Vec<T>, mut f: F) -> Vec<U>
    where
        F: FnMut(&mut Self, T) -> U,
    {
        let mapped = cells
            .into_iter()
            .enumerate()
            .map(|(index, cell)| {
                self.position.cell = Some(index);
                f(self, cell)
            })
            .collect();
        self.position.cell = None;
        mapped
    }

    /// Apply `f` to each row, starting the row index at 0. Iterating a
    /// row's cells inside `f` is done with [`Runtime::map_row`].
    pub fn map_rows<T, U, F>(&mut self, rows: Vec<T>, f: F) -> Vec<U>
    where
        F: FnMut(&mut Self, T) -> U,
    {
        self.position.row = Some(0);
        let mapped = self.map_lines(rows, f);
        self.position.row = None;
        mapped
    }

    /// Resolve a builtin runtime-only variable at the current position
    pub fn runtime_value(&self, id: &str) -> Result<Entity> {
        match builtins::runtime_variable(id) {
            Some(Entity::RuntimeValue(resolve)) => Ok(resolve(&self.position)),
            Some(value) => Ok(value.clone()),
            None => Err(Error::UndefinedReference {
                location: self.source_location(),
                ids: vec![id.to_string()],
            }),
        }
    }

    /// Release the staging buffer. Idempotent; dropping the runtime has
    /// the same effect.
    pub fn cleanup(&mut self) {
        self.buffer.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csvpp_core::entity::Number;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_input_with_code_section() {
        let mut rt = Runtime::new("foo := 1\nbar := 2\n---\na,b\nc,d\n", None);
        let (code, grid) = rt.split_input();

        assert_eq!(code.as_deref(), Some("foo := 1\nbar := 2"));
        assert_eq!(grid, "a,b\nc,d");
        assert_eq!(rt.length_of_code_section(), 3);
        assert_eq!(rt.length_of_csv_section(), 2);
    }

    #[test]
    fn test_split_input_without_code_section() {
        let mut rt = Runtime::new("a,b\nc,d\n", None);
        let (code, grid) = rt.split_input();

        assert_eq!(code, None);
        assert_eq!(grid, "a,b\nc,d\n");
        assert_eq!(rt.length_of_code_section(), 0);
    }

    #[test]
    fn test_start_at_csv_seeds_line_number() {
        let mut rt = Runtime::new("x := 1\n---\na\n", None);
        let (_, grid) = rt.split_input();
        rt.rewrite_input(grid);

        rt.start_at_csv();
        assert_eq!(rt.line_number(), 3);
        assert_eq!(rt.position(), Position::default());
    }

    #[test]
    fn test_map_rows_position_sequence() {
        let mut rt = Runtime::new("", None);
        let rows = vec![vec!["a", "b", "c"]; 3];

        let mut seen = Vec::new();
        rt.map_rows(rows, |rt, cells| {
            rt.map_row(cells, |rt, _cell| {
                let p = rt.position();
                seen.push((p.row.unwrap(), p.cell.unwrap()));
            });
        });

        let row_sequence: Vec<usize> = seen.iter().map(|(r, _)| *r).collect();
        assert_eq!(row_sequence, vec![0, 0, 0, 1, 1, 1, 2, 2, 2]);
        let cell_sequence: Vec<usize> = seen.iter().map(|(_, c)| *c).collect();
        assert_eq!(cell_sequence, vec![0, 1, 2, 0, 1, 2, 0, 1, 2]);

        // Both indices reset once the pass ends
        assert_eq!(rt.position(), Position::default());
    }

    #[test]
    fn test_map_lines_advances_line_but_not_unset_row() {
        let mut rt = Runtime::new("", None);

        let mut lines_seen = Vec::new();
        rt.map_lines(vec!["x", "y"], |rt, _| {
            lines_seen.push(rt.line_number());
            assert_eq!(rt.position().row, None);
        });
        assert_eq!(lines_seen, vec![1, 2]);
        assert_eq!(rt.line_number(), 3);
    }

    #[test]
    fn test_runtime_value() {
        let mut rt = Runtime::new("", None);
        rt.map_rows(vec![()], |rt, _| {
            assert_eq!(
                rt.runtime_value("rownum").unwrap(),
                Entity::Number(Number::Integer(1))
            );
        });

        let err = rt.runtime_value("nope").unwrap_err();
        assert!(err.to_string().contains("undefined reference: nope"));
    }

    #[test]
    fn test_cleanup_releases_buffer() {
        let mut rt = Runtime::new("foo := 1\n---\na,b\n", None);
        rt.cleanup();
        assert_eq!(rt.input(), "");
        // A second cleanup is harmless
        rt.cleanup();
    }

    #[test]
    fn test_row_location() {
        let mut rt = Runtime::new("x := 1\n---\na\nb\n", Some("t.csvpp"));
        rt.split_input();
        assert_eq!(rt.row_location(1).to_string(), "t.csvpp:4[1]");
    }
}
