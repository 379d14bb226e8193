//! Builtin variables and functions
//!
//! Two lookup tables the resolver falls back to after user definitions:
//! runtime variables whose value depends on the grid position being
//! resolved (`$$rownum`, `$$cellnum`), and relative-reference functions
//! (`cellabove`, `celladjacent`, `cellbelow`) that turn a column into an
//! A1 reference anchored at the current row.

use crate::error::{LangError, LangResult};
use ahash::AHashMap;
use csvpp_core::entity::{Entity, Number};
use csvpp_core::position::Position;
use once_cell::sync::Lazy;

/// A builtin function body, applied to already-resolved arguments
pub type BuiltinFunction = fn(&Position, &[Entity]) -> LangResult<Entity>;

static RUNTIME_VARIABLES: Lazy<AHashMap<&'static str, Entity>> = Lazy::new(|| {
    let mut vars = AHashMap::new();
    vars.insert("rownum", Entity::RuntimeValue(rownum));
    vars.insert("cellnum", Entity::RuntimeValue(cellnum));
    vars
});

static BUILTIN_FUNCTIONS: Lazy<AHashMap<&'static str, BuiltinFunction>> = Lazy::new(|| {
    let mut fns: AHashMap<&'static str, BuiltinFunction> = AHashMap::new();
    fns.insert("cellabove", cell_above);
    fns.insert("celladjacent", cell_adjacent);
    fns.insert("cellbelow", cell_below);
    fns
});

/// Look up a runtime variable by (lowercased) id
pub fn runtime_variable(id: &str) -> Option<&'static Entity> {
    RUNTIME_VARIABLES.get(id)
}

/// Look up a builtin function by (lowercased) id
pub fn builtin_function(id: &str) -> Option<BuiltinFunction> {
    BUILTIN_FUNCTIONS.get(id).copied()
}

/// Is `id` satisfied by a builtin rather than a user definition?
///
/// Builtin ids are excluded from the static dependency graph since they
/// can only resolve once a grid position is known.
pub fn is_builtin(id: &str) -> bool {
    RUNTIME_VARIABLES.contains_key(id) || BUILTIN_FUNCTIONS.contains_key(id)
}

fn rownum(position: &Position) -> Entity {
    Entity::Number(Number::Integer(position.rownum().unwrap_or(0) as i64))
}

fn cellnum(position: &Position) -> Entity {
    Entity::Number(Number::Integer(position.cellnum().unwrap_or(0) as i64))
}

fn cell_above(position: &Position, args: &[Entity]) -> LangResult<Entity> {
    let column = column_arg("cellabove", args)?;
    let row = current_rownum("cellabove", position)?;
    if row <= 1 {
        return Err(LangError::Argument {
            function: "cellabove".to_string(),
            message: "no row above the first row".to_string(),
        });
    }
    Ok(Entity::CellReference(format!("{}{}", column, row - 1)))
}

fn cell_adjacent(position: &Position, args: &[Entity]) -> LangResult<Entity> {
    let column = column_arg("celladjacent", args)?;
    let row = current_rownum("celladjacent", position)?;
    Ok(Entity::CellReference(format!("{}{}", column, row)))
}

fn cell_below(position: &Position, args: &[Entity]) -> LangResult<Entity> {
    let column = column_arg("cellbelow", args)?;
    let row = current_rownum("cellbelow", position)?;
    Ok(Entity::CellReference(format!("{}{}", column, row + 1)))
}

/// The single column argument all relative-reference builtins take
fn column_arg(function: &str, args: &[Entity]) -> LangResult<String> {
    if args.len() != 1 {
        return Err(LangError::ArgumentCount {
            function: function.to_string(),
            expected: "1".to_string(),
            actual: args.len(),
        });
    }

    match &args[0] {
        Entity::CellReference(column)
            if column.chars().all(|c| c.is_ascii_alphabetic()) =>
        {
            Ok(column.to_uppercase())
        }
        other => Err(LangError::Argument {
            function: function.to_string(),
            message: format!("expected a column reference, got {}", other),
        }),
    }
}

fn current_rownum(function: &str, position: &Position) -> LangResult<usize> {
    position.rownum().ok_or_else(|| LangError::Argument {
        function: function.to_string(),
        message: "no current row".to_string(),
    })
}
