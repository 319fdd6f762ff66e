//! Expression category classification.
//!
//! Decides whether an expression designates an assignable location. Only
//! the assignment rule consults this; everything else is a value.

use lux_ir::{AstArena, ExprId, ExprKind};

/// Value category of an expression.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ExpressionCategory {
    /// Assignable location: a variable, a struct member, or a swizzle of
    /// an assignable location.
    LValue,
    /// Plain value.
    RValue,
}

/// Classify an expression.
pub fn classify(arena: &AstArena, id: ExprId) -> ExpressionCategory {
    match &arena.expr(id).kind {
        ExprKind::Identifier(_) | ExprKind::AccessMember { .. } => ExpressionCategory::LValue,
        ExprKind::Swizzle { expr, .. } => classify(arena, *expr),
        _ => ExpressionCategory::RValue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lux_ir::{build, ConstantValue, SwizzleComponent};

    #[test]
    fn identifiers_and_members_are_lvalues() {
        let mut arena = AstArena::new();
        let ident = build::identifier(&mut arena, "color");
        let member = build::access_member(&mut arena, ident, ["r"]);
        assert_eq!(classify(&arena, ident), ExpressionCategory::LValue);
        assert_eq!(classify(&arena, member), ExpressionCategory::LValue);
    }

    #[test]
    fn swizzle_inherits_its_source_category() {
        let mut arena = AstArena::new();
        let ident = build::identifier(&mut arena, "v");
        let on_var = build::swizzle(&mut arena, ident, &[SwizzleComponent::First]);
        assert_eq!(classify(&arena, on_var), ExpressionCategory::LValue);

        let lit = build::constant(&mut arena, ConstantValue::Vec2F32([0.0, 1.0]));
        let on_lit = build::swizzle(&mut arena, lit, &[SwizzleComponent::Second]);
        assert_eq!(classify(&arena, on_lit), ExpressionCategory::RValue);
    }

    #[test]
    fn constants_are_rvalues() {
        let mut arena = AstArena::new();
        let lit = build::constant(&mut arena, ConstantValue::Float32(1.0));
        assert_eq!(classify(&arena, lit), ExpressionCategory::RValue);
    }
}
