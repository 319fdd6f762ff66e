//! Semantic validation for Lux shader modules.
//!
//! Checks a [`Module`] (or a standalone statement tree) against the
//! language rules: every identifier resolves, every expression types,
//! interface declarations are well formed. Typing is a side effect:
//! successful validation leaves every expression node with a cached type,
//! which the later passes rely on.
//!
//! # Design
//!
//! Validation is fail-fast. The walk carries an ephemeral [`Context`]
//! (scope stack, entry-function slots, claimed bindings) that exists only
//! for the duration of one call; nothing is retained between runs, so a
//! module can be re-validated after editing.

mod category;
mod error;
mod expr;
mod scope;
mod stmt;

use lux_ir::{AstArena, ExpressionType, Module, ShaderStage, StmtId, Variable};
use rustc_hash::FxHashSet;

pub use category::{classify, ExpressionCategory};
pub use error::{ErrorKind, ValidationError};
pub use scope::{Binding, Scope};

use expr::validate_expr;
use stmt::validate_stmt;

/// Per-run validation state.
struct Context {
    scope: Scope,
    /// Declared compile-time condition names.
    conditions: FxHashSet<String>,
    /// Name of the entry function claimed per stage.
    entry_functions: [Option<String>; ShaderStage::COUNT],
    declared_externals: FxHashSet<String>,
    used_bindings: FxHashSet<u32>,
    /// Return type of the function currently being walked.
    current_return: Option<ExpressionType>,
}

impl Context {
    fn new(conditions: FxHashSet<String>) -> Self {
        Context {
            scope: Scope::new(),
            conditions,
            entry_functions: Default::default(),
            declared_externals: FxHashSet::default(),
            used_bindings: FxHashSet::default(),
            current_return: None,
        }
    }
}

/// Validate a complete module.
///
/// The module's interface tables (structs, inputs, outputs, uniforms) are
/// registered in the root scope before any function body is walked, so
/// bodies may reference them freely. On success every expression in the
/// arena carries a cached type.
#[tracing::instrument(level = "trace", skip(module), fields(stage = ?module.stage))]
pub fn validate(module: &mut Module) -> Result<(), ValidationError> {
    let mut ctx = Context::new(module.conditions.iter().cloned().collect());

    for description in &module.structs {
        ctx.scope
            .declare(description.name.clone(), Binding::Struct(description.clone()));
    }
    for input in &module.inputs {
        ctx.scope.declare(
            input.name.clone(),
            Binding::Variable(Variable::Input {
                name: input.name.clone(),
                ty: input.ty.clone(),
            }),
        );
    }
    for output in &module.outputs {
        ctx.scope.declare(
            output.name.clone(),
            Binding::Variable(Variable::Output {
                name: output.name.clone(),
                ty: output.ty.clone(),
            }),
        );
    }
    for uniform in &module.uniforms {
        ctx.scope.declare(
            uniform.name.clone(),
            Binding::Variable(Variable::Uniform {
                name: uniform.name.clone(),
                ty: uniform.ty.clone(),
            }),
        );
    }

    let Module {
        functions, arena, ..
    } = module;

    for function in functions.iter() {
        ctx.scope.push();
        for parameter in &function.parameters {
            ctx.scope.declare(
                parameter.name.clone(),
                Binding::Variable(Variable::Parameter {
                    name: parameter.name.clone(),
                    ty: parameter.ty.clone(),
                }),
            );
        }
        ctx.current_return = Some(function.return_type.clone());
        let result = validate_stmt(arena, &mut ctx, function.body);
        ctx.current_return = None;
        ctx.scope.pop();
        result?;
    }

    Ok(())
}

/// Validate a standalone statement tree.
///
/// Used for trees built outside a module, typically declaration lists.
/// The condition table is empty, so conditional nodes always fail here.
#[tracing::instrument(level = "trace", skip(arena))]
pub fn validate_statement(arena: &mut AstArena, root: StmtId) -> Result<(), ValidationError> {
    let mut ctx = Context::new(FxHashSet::default());
    validate_stmt(arena, &mut ctx, root)
}

/// Validate a standalone expression tree, returning its type.
#[tracing::instrument(level = "trace", skip(arena))]
pub fn validate_expression(
    arena: &mut AstArena,
    root: lux_ir::ExprId,
) -> Result<ExpressionType, ValidationError> {
    let mut ctx = Context::new(FxHashSet::default());
    validate_expr(arena, &mut ctx, root)
}
