//! Optimization passes for Lux shader trees.
//!
//! Three simplifications, applied in one walk:
//! - **constant folding**: binary nodes over two literals collapse to a
//!   literal when a fold rule is registered (see [`fold`])
//! - **branch simplification**: runtime branches with statically known
//!   arm conditions lose dead arms, possibly the whole branch
//! - **condition resolution**: when the caller supplies an enabled-bit
//!   mask, compile-time conditionals resolve to their chosen path;
//!   without a mask they pass through untouched
//!
//! The input is trusted to have passed validation and is never mutated;
//! every entry point returns a freshly allocated tree. Optimizing twice
//! with the same inputs is a no-op the second time.

pub mod fold;

mod rewrite;

use lux_ir::{AstArena, Function, Module, StmtId};

use rewrite::{ConditionSet, Rewriter};

/// Optimize a module, leaving compile-time conditionals unresolved.
#[tracing::instrument(level = "trace", skip(module), fields(stage = ?module.stage))]
pub fn optimize(module: &Module) -> Module {
    optimize_module(module, None)
}

/// Optimize a module, resolving compile-time conditionals against
/// `enabled`: bit `i` gates the condition at index `i` of the module's
/// condition table.
#[tracing::instrument(level = "trace", skip(module), fields(stage = ?module.stage))]
pub fn optimize_with_conditions(module: &Module, enabled: u64) -> Module {
    let conditions = ConditionSet::new(&module.conditions, enabled);
    optimize_module(module, Some(conditions))
}

/// Optimize a standalone statement tree.
///
/// No condition table is in play; compile-time conditionals pass through.
#[tracing::instrument(level = "trace", skip(arena))]
pub fn optimize_statement(arena: &AstArena, root: StmtId) -> (AstArena, StmtId) {
    let mut rewriter = Rewriter::new(arena, None);
    let root = rewriter.rewrite_stmt(root);
    (rewriter.finish(), root)
}

/// Optimize a standalone statement tree, resolving compile-time
/// conditionals against the given table and mask.
#[tracing::instrument(level = "trace", skip(arena, conditions))]
pub fn optimize_statement_with_conditions(
    arena: &AstArena,
    root: StmtId,
    conditions: &[String],
    enabled: u64,
) -> (AstArena, StmtId) {
    let mut rewriter = Rewriter::new(arena, Some(ConditionSet::new(conditions, enabled)));
    let root = rewriter.rewrite_stmt(root);
    (rewriter.finish(), root)
}

fn optimize_module(module: &Module, conditions: Option<ConditionSet<'_>>) -> Module {
    let mut rewriter = Rewriter::new(&module.arena, conditions);

    let functions = module
        .functions
        .iter()
        .map(|function| Function {
            name: function.name.clone(),
            return_type: function.return_type.clone(),
            parameters: function.parameters.clone(),
            body: rewriter.rewrite_stmt(function.body),
        })
        .collect();

    Module {
        stage: module.stage,
        conditions: module.conditions.clone(),
        structs: module.structs.clone(),
        inputs: module.inputs.clone(),
        outputs: module.outputs.clone(),
        uniforms: module.uniforms.clone(),
        functions,
        arena: rewriter.finish(),
    }
}
