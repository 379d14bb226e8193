//! csvpp CLI - compile spreadsheet templates to CSV

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use csvpp::prelude::*;
use csvpp::{CsvWriteOptions, LineTerminator};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "csvpp")]
#[command(author, version, about = "Compile csv++ templates into spreadsheets")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a template and write the resulting CSV
    #[command(alias = "c")]
    Compile {
        /// Input template file (.csvpp)
        input: PathBuf,

        /// Output CSV file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Field delimiter (default: comma)
        #[arg(short, long, default_value = ",")]
        delimiter: char,

        /// Use CRLF line endings
        #[arg(long)]
        crlf: bool,
    },

    /// Compile a template and dump the resolved cell ASTs
    Ast {
        /// Input template file (.csvpp)
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Compile {
            input,
            output,
            delimiter,
            crlf,
        } => compile_to_csv(&input, output.as_deref(), delimiter, crlf),
        Commands::Ast { input } => dump_ast(&input),
    }
}

fn compile_template(input: &Path) -> Result<Template> {
    let source = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read '{}'", input.display()))?;

    let options = CompileOptions {
        filename: Some(input.display().to_string()),
    };
    let template = compile_with_options(&source, &options)?;
    Ok(template)
}

fn compile_to_csv(input: &Path, output: Option<&Path>, delimiter: char, crlf: bool) -> Result<()> {
    let template = compile_template(input)?;

    let options = CsvWriteOptions {
        delimiter: delimiter as u8,
        line_terminator: if crlf {
            LineTerminator::CRLF
        } else {
            LineTerminator::LF
        },
        ..Default::default()
    };

    match output {
        Some(path) => {
            CsvWriter::write_file(&template, path, &options)
                .with_context(|| format!("Failed to write '{}'", path.display()))?;
            eprintln!("Wrote {} rows to '{}'", template.len(), path.display());
        }
        None => {
            let stdout = io::stdout();
            CsvWriter::write(&template, stdout.lock(), &options)
                .context("Failed to write to stdout")?;
        }
    }

    Ok(())
}

fn dump_ast(input: &Path) -> Result<()> {
    let template = compile_template(input)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for cell in template.cells() {
        if let Some(ast) = &cell.ast {
            writeln!(out, "[{},{}] {}", cell.row_index, cell.index, ast)?;
        }
    }

    Ok(())
}
