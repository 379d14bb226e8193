//! Template AST types
//!
//! Every parsed expression - a code-section definition or a `=`-prefixed cell
//! formula - is an [`Entity`] tree. Entities are immutable once built;
//! resolution always produces new trees rather than mutating shared ones.

use crate::position::Position;
use std::fmt;
use std::str::FromStr;

/// Resolver for a position-dependent builtin value (e.g. `$$rownum`)
pub type RuntimeResolver = fn(&Position) -> Entity;

/// A numeric literal
///
/// Integers and floats are kept apart so `1` round-trips as `1`, not `1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    /// The value as an f64, whichever variant it is
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::Float(f) => *f,
        }
    }
}

impl FromStr for Number {
    type Err = std::num::ParseFloatError;

    /// Parse a decimal literal, sign included. Integer form wins when the
    /// text has no fractional part.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(i) = s.parse::<i64>() {
            return Ok(Number::Integer(i));
        }
        s.parse::<f64>().map(Number::Float)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Float(fl) => write!(f, "{}", fl),
        }
    }
}

/// An AST node
///
/// `id` fields are always lowercased at construction so lookups never need
/// to normalize. Equality is structural (variant + id + children);
/// [`Entity::RuntimeValue`] compares by resolver address.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    /// Boolean literal
    Boolean(bool),
    /// Numeric literal
    Number(Number),
    /// String literal, quotes already stripped
    String(String),
    /// Raw A1-notation reference, kept opaque
    CellReference(String),
    /// Reference to a variable (`$$id`)
    Variable(String),
    /// A function call, prefix (`FOO(a, b)`) or infix (`a + b`)
    FunctionCall {
        id: String,
        args: Vec<Entity>,
        /// Infix calls render as `(a OP b)`; the flag only affects display
        infix: bool,
    },
    /// A user-defined function definition
    Function {
        id: String,
        params: Vec<String>,
        body: Box<Entity>,
    },
    /// A value that only exists at a grid position (e.g. `$$rownum`)
    RuntimeValue(RuntimeResolver),
}

impl Entity {
    /// Build a boolean from token text, case-insensitively
    pub fn boolean(text: &str) -> Option<Entity> {
        match text.to_lowercase().as_str() {
            "true" => Some(Entity::Boolean(true)),
            "false" => Some(Entity::Boolean(false)),
            _ => None,
        }
    }

    /// Build a variable reference, lowercasing the id
    pub fn variable<S: Into<String>>(id: S) -> Entity {
        Entity::Variable(id.into().to_lowercase())
    }

    /// Build a prefix function call, lowercasing the id
    pub fn function_call<S: Into<String>>(id: S, args: Vec<Entity>) -> Entity {
        Entity::FunctionCall {
            id: id.into().to_lowercase(),
            args,
            infix: false,
        }
    }

    /// Build an infix call (`a + b`); the operator text is the id
    pub fn infix_call<S: Into<String>>(id: S, left: Entity, right: Entity) -> Entity {
        Entity::FunctionCall {
            id: id.into().to_lowercase(),
            args: vec![left, right],
            infix: true,
        }
    }

    /// Build a function definition, lowercasing id and parameter names
    pub fn function<S: Into<String>>(id: S, params: Vec<String>, body: Entity) -> Entity {
        Entity::Function {
            id: id.into().to_lowercase(),
            params: params.into_iter().map(|p| p.to_lowercase()).collect(),
            body: Box::new(body),
        }
    }

    /// The id of a variable, call, or definition, if this variant has one
    pub fn id(&self) -> Option<&str> {
        match self {
            Entity::Variable(id) => Some(id),
            Entity::FunctionCall { id, .. } => Some(id),
            Entity::Function { id, .. } => Some(id),
            _ => None,
        }
    }

    /// Is this a function call with the given id?
    pub fn is_function_call(&self, call_id: &str) -> bool {
        matches!(self, Entity::FunctionCall { id, .. } if id == call_id)
    }

    /// Is this a reference to the given variable?
    pub fn is_variable(&self, var_id: &str) -> bool {
        matches!(self, Entity::Variable(id) if id == var_id)
    }
}

impl fmt::Display for Entity {
    /// Render in spreadsheet-formula syntax, suitable for writing back out
    /// as a cell formula or quoting in an error message.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Boolean(true) => write!(f, "TRUE"),
            Entity::Boolean(false) => write!(f, "FALSE"),
            Entity::Number(n) => write!(f, "{}", n),
            Entity::String(s) => write!(f, "\"{}\"", s.replace('"', "\\\"")),
            Entity::CellReference(r) => write!(f, "{}", r),
            Entity::Variable(id) => write!(f, "$${}", id),
            Entity::FunctionCall { id, args, infix } => {
                if *infix && args.len() == 2 {
                    write!(f, "({} {} {})", args[0], id.to_uppercase(), args[1])
                } else {
                    let rendered: Vec<String> = args.iter().map(|a| a.to_string()).collect();
                    write!(f, "{}({})", id.to_uppercase(), rendered.join(", "))
                }
            }
            Entity::Function { id, params, body } => {
                write!(f, "def {}({}) {}", id, params.join(", "), body)
            }
            Entity::RuntimeValue(_) => write!(f, "(runtime value)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_number_from_str() {
        assert_eq!("42".parse::<Number>().unwrap(), Number::Integer(42));
        assert_eq!("-7".parse::<Number>().unwrap(), Number::Integer(-7));
        assert_eq!("3.25".parse::<Number>().unwrap(), Number::Float(3.25));
        assert!("4x2".parse::<Number>().is_err());
    }

    #[test]
    fn test_boolean_case_insensitive() {
        assert_eq!(Entity::boolean("TRUE"), Some(Entity::Boolean(true)));
        assert_eq!(Entity::boolean("False"), Some(Entity::Boolean(false)));
        assert_eq!(Entity::boolean("yes"), None);
    }

    #[test]
    fn test_ids_lowercased() {
        assert_eq!(Entity::variable("Foo"), Entity::Variable("foo".into()));

        let call = Entity::function_call("SUM", vec![]);
        assert_eq!(call.id(), Some("sum"));

        let def = Entity::function("Profit", vec!["Price".into()], Entity::Boolean(true));
        if let Entity::Function { params, .. } = &def {
            assert_eq!(params, &vec!["price".to_string()]);
        } else {
            panic!("Expected Function");
        }
    }

    #[test]
    fn test_display_literals() {
        assert_eq!(Entity::Boolean(true).to_string(), "TRUE");
        assert_eq!(Entity::Number(Number::Integer(5)).to_string(), "5");
        assert_eq!(Entity::Number(Number::Float(1.5)).to_string(), "1.5");
        assert_eq!(Entity::String("hi".into()).to_string(), "\"hi\"");
        assert_eq!(Entity::CellReference("A1".into()).to_string(), "A1");
        assert_eq!(Entity::variable("foo").to_string(), "$$foo");
    }

    #[test]
    fn test_display_calls() {
        let prefix = Entity::function_call(
            "sum",
            vec![
                Entity::Number(Number::Integer(1)),
                Entity::CellReference("A1".into()),
            ],
        );
        assert_eq!(prefix.to_string(), "SUM(1, A1)");

        let infix = Entity::infix_call(
            "+",
            Entity::Number(Number::Integer(1)),
            Entity::Number(Number::Integer(2)),
        );
        assert_eq!(infix.to_string(), "(1 + 2)");
    }

    #[test]
    fn test_structural_equality() {
        let a = Entity::function_call("f", vec![Entity::variable("x")]);
        let b = Entity::function_call("F", vec![Entity::variable("X")]);
        assert_eq!(a, b);

        let c = Entity::function_call("f", vec![Entity::variable("y")]);
        assert_ne!(a, c);
    }

    #[test]
    fn test_predicates() {
        let call = Entity::function_call("sum", vec![]);
        assert!(call.is_function_call("sum"));
        assert!(!call.is_function_call("avg"));
        assert!(!call.is_variable("sum"));

        let var = Entity::variable("foo");
        assert!(var.is_variable("foo"));
        assert!(!var.is_function_call("foo"));
    }
}
