//! Definition tables and reference resolution
//!
//! [`CodeSection`] holds the raw variable and function definitions produced
//! by the code-section grammar. [`Scope`] finalizes them: variables are
//! resolved against each other once, up front (undefined references and
//! cycles are rejected here), while cell formulas are resolved on demand
//! against the finished tables plus the builtins.
//!
//! Ids that are neither defined nor builtin are treated differently by
//! kind: an unknown variable is an error, an unknown function call is
//! assumed to be a native spreadsheet function (`SUM`, `IF`, ...) and left
//! in the output untouched.

use crate::builtins;
use crate::error::{LangError, LangResult};
use crate::references::References;
use ahash::AHashMap;
use csvpp_core::entity::Entity;
use csvpp_core::position::Position;

/// Cap on per-cell resolution rounds. A formula that is still changing
/// after this many rounds is expanding without converging (e.g. a
/// self-recursive function) and is returned as-is.
const MAX_RESOLUTION_PASSES: usize = 32;

/// The variable and function definitions parsed from a code section
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodeSection {
    variables: AHashMap<String, Entity>,
    functions: AHashMap<String, Entity>,
    // Definition order, for deterministic resolution and error output
    variable_order: Vec<String>,
}

impl CodeSection {
    /// Define (or redefine) a variable
    pub fn define_variable<S: Into<String>>(&mut self, name: S, value: Entity) {
        let name = name.into();
        if !self.variables.contains_key(&name) {
            self.variable_order.push(name.clone());
        }
        self.variables.insert(name, value);
    }

    /// Define a function. `function` must be an [`Entity::Function`]; its
    /// own id names the table entry.
    pub fn define_function(&mut self, function: Entity) {
        if let Some(id) = function.id() {
            self.functions.insert(id.to_string(), function);
        }
    }

    pub fn variable(&self, name: &str) -> Option<&Entity> {
        self.variables.get(name)
    }

    pub fn function(&self, name: &str) -> Option<&Entity> {
        self.functions.get(name)
    }

    /// All variable definitions, in definition order
    pub fn variables(&self) -> impl Iterator<Item = (&str, &Entity)> {
        self.variable_order
            .iter()
            .filter_map(|name| self.variables.get(name).map(|e| (name.as_str(), e)))
    }

    pub fn functions(&self) -> impl Iterator<Item = (&str, &Entity)> {
        self.functions.iter().map(|(name, e)| (name.as_str(), e))
    }
}

/// A finalized code section, ready to resolve cell formulas against
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    code_section: CodeSection,
}

impl Scope {
    /// Finalize `code_section` by resolving every variable definition
    /// down to literals, references, and builtin leftovers.
    pub fn new(code_section: CodeSection) -> LangResult<Self> {
        let mut scope = Self { code_section };
        scope.resolve_static_variables()?;
        Ok(scope)
    }

    pub fn code_section(&self) -> &CodeSection {
        &self.code_section
    }

    /// Resolve variable-to-variable references in definition bodies
    ///
    /// Builds the dependency graph, rejects undefined and cyclic
    /// references, then substitutes in topological order. Substituting in
    /// that order against the already-updated table resolves every chain
    /// in a single pass.
    fn resolve_static_variables(&mut self) -> LangResult<()> {
        let graph = self.dependency_graph()?;
        let order = topological_order(&self.code_section.variable_order, &graph)?;

        for name in order {
            let Some(body) = self.code_section.variables.get(&name).cloned() else {
                continue;
            };
            let resolved = substitute(&body, &|id| self.code_section.variables.get(id).cloned());
            self.code_section.variables.insert(name, resolved);
        }

        Ok(())
    }

    /// Edges from each variable to the defined variables its body
    /// references. Builtin ids never appear in the graph; ids that are
    /// neither defined nor builtin are an error.
    fn dependency_graph(&self) -> LangResult<AHashMap<String, Vec<String>>> {
        let mut graph = AHashMap::new();
        let mut undefined = Vec::new();

        for (name, body) in self.code_section.variables() {
            let refs = References::extract(body);
            let mut deps = Vec::new();
            for id in refs.variables {
                if self.code_section.variables.contains_key(&id) {
                    deps.push(id);
                } else if !builtins::is_builtin(&id) && !undefined.contains(&id) {
                    undefined.push(id);
                }
            }
            graph.insert(name.to_string(), deps);
        }

        // Function bodies can't be substituted yet but their free
        // variables are checked here too, with parameters shadowing.
        for (_, function) in self.code_section.functions() {
            let Entity::Function { params, body, .. } = function else {
                continue;
            };
            for id in References::extract(body).variables {
                if !params.contains(&id)
                    && !self.code_section.variables.contains_key(&id)
                    && !builtins::is_builtin(&id)
                    && !undefined.contains(&id)
                {
                    undefined.push(id);
                }
            }
        }

        if undefined.is_empty() {
            Ok(graph)
        } else {
            undefined.sort();
            Err(LangError::UndefinedReference { ids: undefined })
        }
    }

    /// Resolve one cell formula at `position`
    ///
    /// Repeatedly rewrites the AST until no references remain or a round
    /// makes no progress; whatever is left is assumed to be native
    /// spreadsheet vocabulary and survives into the output.
    pub fn resolve_cell_ast(&self, ast: &Entity, position: &Position) -> LangResult<Entity> {
        let mut current = ast.clone();
        let mut previous = References::default();

        for _ in 0..MAX_RESOLUTION_PASSES {
            let refs = References::extract(&current);
            if refs.is_empty() || refs == previous {
                break;
            }
            previous = refs;

            let mut undefined = Vec::new();
            current = self.resolve_entity(&current, position, &mut undefined)?;
            if !undefined.is_empty() {
                undefined.sort();
                undefined.dedup();
                return Err(LangError::UndefinedReference { ids: undefined });
            }
        }

        Ok(current)
    }

    /// One rewrite round: substitute variables and expand function calls,
    /// innermost arguments first
    fn resolve_entity(
        &self,
        ast: &Entity,
        position: &Position,
        undefined: &mut Vec<String>,
    ) -> LangResult<Entity> {
        match ast {
            Entity::Variable(id) => {
                if let Some(value) = self.code_section.variable(id) {
                    Ok(value.clone())
                } else if let Some(value) = builtins::runtime_variable(id) {
                    Ok(materialize(value, position))
                } else {
                    undefined.push(id.clone());
                    Ok(ast.clone())
                }
            }

            Entity::FunctionCall { id, args, infix } => {
                let args = args
                    .iter()
                    .map(|arg| self.resolve_entity(arg, position, undefined))
                    .collect::<LangResult<Vec<_>>>()?;

                if let Some(function) = self.code_section.function(id) {
                    Ok(expand_user_function(function, &args))
                } else if let Some(builtin) = builtins::builtin_function(id) {
                    builtin(position, &args)
                } else {
                    Ok(Entity::FunctionCall {
                        id: id.clone(),
                        args,
                        infix: *infix,
                    })
                }
            }

            other => Ok(other.clone()),
        }
    }
}

/// Resolve a runtime value against the current position; anything else
/// passes through
fn materialize(value: &Entity, position: &Position) -> Entity {
    match value {
        Entity::RuntimeValue(resolve) => resolve(position),
        other => other.clone(),
    }
}

/// Replace each `Variable` node for which `lookup` has a value.
/// Parameters of nested function definitions shadow the lookup.
fn substitute(ast: &Entity, lookup: &dyn Fn(&str) -> Option<Entity>) -> Entity {
    match ast {
        Entity::Variable(id) => lookup(id).unwrap_or_else(|| ast.clone()),

        Entity::FunctionCall { id, args, infix } => Entity::FunctionCall {
            id: id.clone(),
            args: args.iter().map(|arg| substitute(arg, lookup)).collect(),
            infix: *infix,
        },

        Entity::Function { id, params, body } => {
            let shadowed =
                |i: &str| -> Option<Entity> { (!params.iter().any(|p| p == i)).then(|| lookup(i)).flatten() };
            Entity::Function {
                id: id.clone(),
                params: params.clone(),
                body: Box::new(substitute(body, &shadowed)),
            }
        }

        other => other.clone(),
    }
}

/// Splice a user-defined function body in place of a call, binding
/// parameters to arguments in declared order. Surplus arguments are
/// dropped; unbound parameters stay as variable references.
fn expand_user_function(function: &Entity, args: &[Entity]) -> Entity {
    let Entity::Function { params, body, .. } = function else {
        return function.clone();
    };

    let mut bindings: AHashMap<&str, &Entity> = AHashMap::new();
    for (param, arg) in params.iter().zip(args) {
        bindings.insert(param.as_str(), arg);
    }

    substitute(body, &|id| bindings.get(id).map(|&e| e.clone()))
}

/// Order variables so every definition comes after the ones it depends
/// on. Depth-first with an in-progress stack; revisiting an in-progress
/// node is a cycle.
fn topological_order(
    names: &[String],
    graph: &AHashMap<String, Vec<String>>,
) -> LangResult<Vec<String>> {
    let mut done: Vec<String> = Vec::with_capacity(names.len());
    let mut in_progress: Vec<String> = Vec::new();

    for name in names {
        visit(name, graph, &mut done, &mut in_progress)?;
    }

    Ok(done)
}

fn visit(
    name: &str,
    graph: &AHashMap<String, Vec<String>>,
    done: &mut Vec<String>,
    in_progress: &mut Vec<String>,
) -> LangResult<()> {
    if done.iter().any(|d| d == name) {
        return Ok(());
    }

    if let Some(at) = in_progress.iter().position(|v| v == name) {
        // The stack from the first occurrence onward is the cycle
        return Err(LangError::CyclicReference {
            ids: in_progress[at..].to_vec(),
        });
    }

    in_progress.push(name.to_string());
    if let Some(deps) = graph.get(name) {
        for dep in deps {
            visit(dep, graph, done, in_progress)?;
        }
    }
    in_progress.pop();

    done.push(name.to_string());
    Ok(())
}
