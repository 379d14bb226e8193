//! Reference extraction
//!
//! One resolution pass starts by collecting every `Variable` and
//! `FunctionCall` node present in an AST. The collected sets drive the
//! substitutions for that pass and, compared against the previous pass,
//! decide whether the resolver is still making progress.

use csvpp_core::entity::Entity;

/// The variable and function-call references found in one AST walk
///
/// Both sequences preserve discovery order (depth-first, parents before
/// children). Built per resolution pass and discarded after use.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct References {
    /// Ids of every `Variable` node
    pub variables: Vec<String>,
    /// Every `FunctionCall` node, cloned whole so the resolver can match
    /// and replace the exact call
    pub functions: Vec<Entity>,
}

impl References {
    /// Walk `ast` and collect all references
    pub fn extract(ast: &Entity) -> Self {
        let mut refs = Self::default();
        refs.walk(ast);
        refs
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty() && self.functions.is_empty()
    }

    fn walk(&mut self, ast: &Entity) {
        match ast {
            Entity::Variable(id) => {
                if !self.variables.contains(id) {
                    self.variables.push(id.clone());
                }
            }
            Entity::FunctionCall { args, .. } => {
                if !self.functions.contains(ast) {
                    self.functions.push(ast.clone());
                }
                for arg in args {
                    self.walk(arg);
                }
            }
            Entity::Function { body, .. } => self.walk(body),
            Entity::Boolean(_)
            | Entity::Number(_)
            | Entity::String(_)
            | Entity::CellReference(_)
            | Entity::RuntimeValue(_) => {}
        }
    }
}
