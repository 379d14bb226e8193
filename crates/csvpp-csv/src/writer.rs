//! CSV writer
//!
//! Persists a compiled [`Template`]: formula cells render as `=` plus
//! their resolved AST, literal cells keep their raw text.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::CsvResult;
use crate::options::{CsvWriteOptions, LineTerminator};
use csvpp_core::Template;

/// CSV file writer for compiled templates
pub struct CsvWriter;

impl CsvWriter {
    /// Write a template to a CSV file
    pub fn write_file<P: AsRef<Path>>(
        template: &Template,
        path: P,
        options: &CsvWriteOptions,
    ) -> CsvResult<()> {
        let file = File::create(path)?;
        Self::write(template, file, options)
    }

    /// Write a template to a writer
    pub fn write<W: Write>(
        template: &Template,
        writer: W,
        options: &CsvWriteOptions,
    ) -> CsvResult<()> {
        let terminator = match options.line_terminator {
            LineTerminator::LF => csv::Terminator::Any(b'\n'),
            LineTerminator::CRLF => csv::Terminator::CRLF,
        };

        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .terminator(terminator)
            .flexible(true)
            .from_writer(writer);

        for row in &template.rows {
            let record: Vec<String> = row.cells.iter().map(|cell| cell.output_field()).collect();
            csv_writer.write_record(&record)?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}
