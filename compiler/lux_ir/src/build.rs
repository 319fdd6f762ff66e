//! Convenience constructors for building trees by hand.
//!
//! Thin wrappers over [`AstArena`] allocation, used heavily by tests and
//! by tools that assemble shaders programmatically.

use smallvec::SmallVec;

use crate::arena::AstArena;
use crate::constant::ConstantValue;
use crate::expr::ExprKind;
use crate::node_id::{ExprId, StmtId};
use crate::op::{AssignOp, BinaryOp, IntrinsicKind, SwizzleComponent};
use crate::stmt::{BranchArm, StmtKind};
use crate::types::ExpressionType;
use crate::variable::Variable;

/// Literal constant.
pub fn constant(arena: &mut AstArena, value: ConstantValue) -> ExprId {
    arena.alloc_expr(ExprKind::Constant(value))
}

/// Variable reference by name.
pub fn identifier(arena: &mut AstArena, name: impl Into<String>) -> ExprId {
    arena.alloc_expr(ExprKind::Identifier(name.into()))
}

/// Binary operation.
pub fn binary(arena: &mut AstArena, op: BinaryOp, left: ExprId, right: ExprId) -> ExprId {
    arena.alloc_expr(ExprKind::Binary { op, left, right })
}

/// Simple assignment.
pub fn assign(arena: &mut AstArena, left: ExprId, right: ExprId) -> ExprId {
    arena.alloc_expr(ExprKind::Assign {
        op: AssignOp::Simple,
        left,
        right,
    })
}

/// Member access through a path of field names.
pub fn access_member(
    arena: &mut AstArena,
    expr: ExprId,
    member_path: impl IntoIterator<Item = impl Into<String>>,
) -> ExprId {
    arena.alloc_expr(ExprKind::AccessMember {
        expr,
        member_path: member_path.into_iter().map(Into::into).collect(),
    })
}

/// Construction cast from up to four operands.
pub fn cast(arena: &mut AstArena, target: ExpressionType, operands: &[ExprId]) -> ExprId {
    debug_assert!(operands.len() <= 4);
    let mut expressions = [ExprId::INVALID; 4];
    for (slot, id) in expressions.iter_mut().zip(operands) {
        *slot = *id;
    }
    arena.alloc_expr(ExprKind::Cast {
        target,
        expressions,
    })
}

/// Intrinsic call.
pub fn intrinsic(arena: &mut AstArena, kind: IntrinsicKind, parameters: &[ExprId]) -> ExprId {
    arena.alloc_expr(ExprKind::Intrinsic {
        intrinsic: kind,
        parameters: SmallVec::from_slice(parameters),
    })
}

/// Swizzle selecting the given components.
pub fn swizzle(arena: &mut AstArena, expr: ExprId, selected: &[SwizzleComponent]) -> ExprId {
    debug_assert!(!selected.is_empty() && selected.len() <= 4);
    let mut components = [SwizzleComponent::First; 4];
    for (slot, c) in components.iter_mut().zip(selected) {
        *slot = *c;
    }
    arena.alloc_expr(ExprKind::Swizzle {
        expr,
        components,
        component_count: selected.len() as u32,
    })
}

/// Compile-time conditional expression.
pub fn conditional_expr(
    arena: &mut AstArena,
    condition: impl Into<String>,
    true_path: ExprId,
    false_path: ExprId,
) -> ExprId {
    arena.alloc_expr(ExprKind::Conditional {
        condition: condition.into(),
        true_path,
        false_path,
    })
}

/// Statement block.
pub fn block(arena: &mut AstArena, statements: impl IntoIterator<Item = StmtId>) -> StmtId {
    arena.alloc_stmt(StmtKind::Block(statements.into_iter().collect()))
}

/// Expression statement.
pub fn expr_stmt(arena: &mut AstArena, expr: ExprId) -> StmtId {
    arena.alloc_stmt(StmtKind::Expression(expr))
}

/// Two-way branch.
pub fn branch(
    arena: &mut AstArena,
    condition: ExprId,
    true_statement: StmtId,
    else_statement: Option<StmtId>,
) -> StmtId {
    arena.alloc_stmt(StmtKind::Branch {
        arms: smallvec::smallvec![BranchArm {
            condition,
            statement: true_statement,
        }],
        else_statement,
    })
}

/// Multi-arm branch.
pub fn branch_arms(
    arena: &mut AstArena,
    arms: impl IntoIterator<Item = (ExprId, StmtId)>,
    else_statement: Option<StmtId>,
) -> StmtId {
    arena.alloc_stmt(StmtKind::Branch {
        arms: arms
            .into_iter()
            .map(|(condition, statement)| BranchArm {
                condition,
                statement,
            })
            .collect(),
        else_statement,
    })
}

/// Compile-time conditional statement.
pub fn conditional_stmt(
    arena: &mut AstArena,
    condition: impl Into<String>,
    statement: StmtId,
) -> StmtId {
    arena.alloc_stmt(StmtKind::Conditional {
        condition: condition.into(),
        statement,
    })
}

/// Local variable declaration.
pub fn declare_local(
    arena: &mut AstArena,
    name: impl Into<String>,
    ty: ExpressionType,
    initial: Option<ExprId>,
) -> StmtId {
    arena.alloc_stmt(StmtKind::DeclareVariable {
        variable: Variable::Local {
            name: name.into(),
            ty,
        },
        initial,
    })
}

/// Return statement.
pub fn ret(arena: &mut AstArena, expr: Option<ExprId>) -> StmtId {
    arena.alloc_stmt(StmtKind::Return(expr))
}

/// Empty statement.
pub fn no_op(arena: &mut AstArena) -> StmtId {
    arena.alloc_stmt(StmtKind::NoOp)
}
