//! Arena allocation for the flat AST.
//!
//! All expressions and statements of one tree live in two contiguous
//! arrays; child references are [`ExprId`]/[`StmtId`] indices. One tree,
//! one arena: passes that produce a new tree (the optimizer, the
//! deserializer) allocate a fresh arena rather than mutating their input.

use std::fmt;

use crate::expr::{ExprKind, Expression};
use crate::node_id::{ExprId, StmtId};
use crate::stmt::StmtKind;
use crate::types::ExpressionType;

/// Contiguous storage for all nodes of one shader tree.
#[derive(Clone, Default, PartialEq)]
pub struct AstArena {
    exprs: Vec<Expression>,
    stmts: Vec<StmtKind>,
}

impl AstArena {
    /// Create a new empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Expression allocation =====

    /// Allocate an expression, return its ID.
    #[inline]
    pub fn alloc_expr(&mut self, kind: ExprKind) -> ExprId {
        let id = ExprId::new(self.exprs.len() as u32);
        self.exprs.push(Expression::new(kind));
        id
    }

    /// Get an expression by ID.
    ///
    /// # Panics
    /// Panics if `id` is out of bounds.
    #[inline]
    #[track_caller]
    pub fn expr(&self, id: ExprId) -> &Expression {
        &self.exprs[id.index()]
    }

    /// Get a mutable expression by ID.
    ///
    /// # Panics
    /// Panics if `id` is out of bounds.
    #[inline]
    #[track_caller]
    pub fn expr_mut(&mut self, id: ExprId) -> &mut Expression {
        &mut self.exprs[id.index()]
    }

    /// Cached resolved type of an expression, if validation populated it.
    #[inline]
    #[track_caller]
    pub fn expr_type(&self, id: ExprId) -> Option<&ExpressionType> {
        self.exprs[id.index()].ty()
    }

    /// Populate an expression's type cache (validator only).
    #[inline]
    #[track_caller]
    pub fn set_expr_type(&mut self, id: ExprId, ty: ExpressionType) {
        self.exprs[id.index()].set_ty(ty);
    }

    /// Number of expressions.
    #[inline]
    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    // ===== Statement allocation =====

    /// Allocate a statement, return its ID.
    #[inline]
    pub fn alloc_stmt(&mut self, kind: StmtKind) -> StmtId {
        let id = StmtId::new(self.stmts.len() as u32);
        self.stmts.push(kind);
        id
    }

    /// Get a statement by ID.
    ///
    /// # Panics
    /// Panics if `id` is out of bounds.
    #[inline]
    #[track_caller]
    pub fn stmt(&self, id: StmtId) -> &StmtKind {
        &self.stmts[id.index()]
    }

    /// Number of statements.
    #[inline]
    pub fn stmt_count(&self) -> usize {
        self.stmts.len()
    }

    /// Check if the arena is empty.
    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty() && self.stmts.is_empty()
    }
}

impl fmt::Debug for AstArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AstArena {{ {} exprs, {} stmts }}",
            self.exprs.len(),
            self.stmts.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constant::ConstantValue;
    use crate::types::{ExpressionType, PrimitiveType};
    use pretty_assertions::assert_eq;

    #[test]
    fn alloc_and_get() {
        let mut arena = AstArena::new();
        let a = arena.alloc_expr(ExprKind::Constant(ConstantValue::Int32(1)));
        let b = arena.alloc_expr(ExprKind::Constant(ConstantValue::Int32(2)));

        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(arena.expr_count(), 2);
        assert!(matches!(
            arena.expr(a).kind,
            ExprKind::Constant(ConstantValue::Int32(1))
        ));
    }

    #[test]
    fn type_cache_starts_empty() {
        let mut arena = AstArena::new();
        let id = arena.alloc_expr(ExprKind::Constant(ConstantValue::Bool(true)));
        assert_eq!(arena.expr_type(id), None);

        arena.set_expr_type(id, ExpressionType::Primitive(PrimitiveType::Boolean));
        assert_eq!(
            arena.expr_type(id),
            Some(&ExpressionType::Primitive(PrimitiveType::Boolean))
        );
    }

    #[test]
    fn equality_ignores_type_cache() {
        let mut a = AstArena::new();
        let id = a.alloc_expr(ExprKind::Constant(ConstantValue::Bool(true)));
        let mut b = a.clone();

        a.set_expr_type(id, ExpressionType::Primitive(PrimitiveType::Boolean));
        assert_eq!(a, b);

        b.alloc_expr(ExprKind::Constant(ConstantValue::Bool(false)));
        assert_ne!(a, b);
    }
}
