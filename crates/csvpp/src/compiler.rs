//! Compile orchestration
//!
//! Phases run in strict order: split the input at the `---` marker, parse
//! and statically resolve the code section, parse the grid section
//! row-by-row, validate and apply row expansion, then resolve every cell's
//! AST at its final grid position. Any phase failure aborts the compile;
//! the runtime's staging buffer is released either way.
//!
//! # Example
//!
//! ```rust
//! use csvpp::compile;
//!
//! let template = compile("fees := 2\n---\n=A1 - $$fees,done\n").unwrap();
//! assert_eq!(template.cell_at(0, 0).unwrap().to_string(), "=(A1 - 2)");
//! ```

use crate::runtime::Runtime;
use csvpp_core::error::{Error, Result};
use csvpp_core::position::SourceLocation;
use csvpp_core::{Cell, Row, Template, MAX_ROWS};
use csvpp_lang::{parse_cell_value, parse_code_section, parse_row_modifier, LangError, Scope};

/// Options for a compile run
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Filename reported in error locations
    pub filename: Option<String>,
}

/// Compile csvpp source into a resolved [`Template`]
pub fn compile(input: &str) -> Result<Template> {
    compile_with_options(input, &CompileOptions::default())
}

/// Compile with explicit options
pub fn compile_with_options(input: &str, options: &CompileOptions) -> Result<Template> {
    let mut runtime = Runtime::new(input, options.filename.as_deref());
    let result = compile_phases(&mut runtime);
    runtime.cleanup();
    result
}

fn compile_phases(runtime: &mut Runtime) -> Result<Template> {
    runtime.start();
    let (code_text, grid_text) = runtime.split_input();

    let scope = match code_text {
        Some(code) => {
            let code_section =
                parse_code_section(&code).map_err(|e| locate_code_error(runtime, e))?;
            let scope = Scope::new(code_section).map_err(|e| locate_code_error(runtime, e))?;
            log::debug!(
                "parsed code section: {} variables, {} functions",
                scope.code_section().variables().count(),
                scope.code_section().functions().count()
            );
            scope
        }
        None => Scope::default(),
    };

    runtime.rewrite_input(grid_text);

    let rows = parse_grid(runtime)?;
    validate_expansion(runtime, &rows)?;
    let rows = expand_rows(rows);
    let rows = resolve_cells(runtime, &scope, rows)?;

    log::debug!("compiled template with {} rows", rows.len());
    Ok(Template::new(rows))
}

/// Phase 3: CSV-decode the grid section into rows of parsed cells
fn parse_grid(runtime: &mut Runtime) -> Result<Vec<Row>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(runtime.input().as_bytes());

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| Error::Syntax {
            location: runtime.row_location(records.len()),
            message: format!("invalid csv: {}", e),
        })?;
        records.push(record);
    }

    runtime.start_at_csv();
    runtime
        .map_rows(records, |rt, record| parse_row(rt, &record))
        .into_iter()
        .collect()
}

fn parse_row(runtime: &mut Runtime, record: &csv::StringRecord) -> Result<Row> {
    let row_index = runtime.position().row.unwrap_or(0);

    let mut fields: Vec<String> = record.iter().map(str::to_string).collect();

    // The row modifier rides in front of the first field's content
    let mut modifier = Default::default();
    if let Some(first) = fields.first_mut() {
        let (parsed, rest) =
            parse_row_modifier(first).map_err(|e| locate_cell_error(runtime, e))?;
        modifier = parsed;
        *first = rest.to_string();
    }

    let cells = runtime
        .map_row(fields, |rt, field| {
            let cell_index = rt.position().cell.unwrap_or(0);
            match parse_cell_value(&field).map_err(|e| locate_cell_error(rt, e))? {
                Some(ast) => Ok(Cell::with_ast(row_index, cell_index, field, ast)),
                None => Ok(Cell::new(row_index, cell_index, field)),
            }
        })
        .into_iter()
        .collect::<Result<Vec<_>>>()?;

    Ok(Row::with_modifier(row_index, cells, modifier))
}

/// Phase 4: reject expansion setups that can't fit the grid
fn validate_expansion(runtime: &Runtime, rows: &[Row]) -> Result<()> {
    let mut fixed = 0usize;
    let mut infinite: Option<usize> = None;

    for row in rows {
        match row.modifier.expand {
            Some(expand) if expand.is_infinite() => {
                if infinite.is_some() {
                    return Err(Error::ModifierValidation {
                        location: runtime.row_location(row.index),
                        message: "at most one row may expand infinitely".to_string(),
                    });
                }
                infinite = Some(row.index);
            }
            Some(expand) => fixed += expand.amount.unwrap_or(1),
            None => fixed += 1,
        }
    }

    let minimum = fixed + infinite.map_or(0, |_| 1);
    if minimum > MAX_ROWS {
        return Err(Error::ModifierValidation {
            location: runtime.row_location(rows.len().saturating_sub(1)),
            message: format!(
                "template expands to {} rows, more than the maximum of {}",
                minimum, MAX_ROWS
            ),
        });
    }

    Ok(())
}

/// Phase 5: repeat rows per their expand directives. An infinite expand
/// fills whatever the fixed rows leave of the grid.
fn expand_rows(rows: Vec<Row>) -> Vec<Row> {
    let fixed: usize = rows
        .iter()
        .map(|row| match row.modifier.expand {
            Some(expand) if expand.is_infinite() => 0,
            Some(expand) => expand.amount.unwrap_or(1),
            None => 1,
        })
        .sum();
    let fill = MAX_ROWS.saturating_sub(fixed);

    let mut expanded = Vec::new();
    for row in rows {
        let copies = match row.modifier.expand {
            Some(expand) if expand.is_infinite() => fill,
            Some(expand) => expand.amount.unwrap_or(1),
            None => 1,
        };
        for _ in 0..copies {
            let mut copy = row.clone();
            copy.reindex(expanded.len());
            expanded.push(copy);
        }
    }
    expanded
}

/// Phase 6: resolve every formula cell at its final position
fn resolve_cells(runtime: &mut Runtime, scope: &Scope, rows: Vec<Row>) -> Result<Vec<Row>> {
    runtime.start_at_csv();
    runtime
        .map_rows(rows, |rt, mut row| {
            let cells = std::mem::take(&mut row.cells);
            row.cells = rt
                .map_row(cells, |rt, mut cell| {
                    if let Some(ast) = &cell.ast {
                        let position = rt.position();
                        let resolved = scope
                            .resolve_cell_ast(ast, &position)
                            .map_err(|e| locate_cell_error(rt, e))?;
                        cell.ast = Some(resolved);
                    }
                    Ok(cell)
                })
                .into_iter()
                .collect::<Result<Vec<_>>>()?;
            Ok(row)
        })
        .into_iter()
        .collect()
}

/// Stamp a code-section error with its original file line. Code sections
/// start at line 1, and syntax errors carry their offset within it.
fn locate_code_error(runtime: &Runtime, err: LangError) -> Error {
    let line = match &err {
        LangError::Syntax { line, .. } => line + 1,
        _ => 1,
    };
    located(SourceLocation::new(runtime.filename(), line), err)
}

/// Stamp a grid-phase error with the runtime's current coordinates
fn locate_cell_error(runtime: &Runtime, err: LangError) -> Error {
    located(runtime.source_location(), err)
}

fn located(location: SourceLocation, err: LangError) -> Error {
    match err {
        LangError::Syntax { .. } => Error::Syntax {
            location,
            message: err.to_string(),
        },
        LangError::ModifierSyntax(message) => Error::ModifierSyntax { location, message },
        LangError::UndefinedReference { ids } => Error::UndefinedReference { location, ids },
        LangError::CyclicReference { ids } => Error::CyclicReference { location, ids },
        err @ (LangError::Argument { .. } | LangError::ArgumentCount { .. }) => Error::Syntax {
            location,
            message: err.to_string(),
        },
    }
}
