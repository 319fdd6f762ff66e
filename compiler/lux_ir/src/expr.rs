//! Expression nodes.
//!
//! A closed set of kinds; every child is an [`ExprId`] into the owning
//! arena, so each node exclusively owns its subtree (no sharing, no
//! cycles; children are always allocated before their parent).

use smallvec::SmallVec;

use crate::constant::ConstantValue;
use crate::node_id::ExprId;
use crate::op::{AssignOp, BinaryOp, IntrinsicKind, SwizzleComponent};
use crate::types::ExpressionType;

/// An expression node plus its validator-populated type cache.
///
/// The cache starts empty and is filled exactly once during validation;
/// reading it before then signals a bug in a pass, not bad user input,
/// which is why [`Expression::ty`] surfaces an `Option` instead of
/// panicking.
#[derive(Clone, Debug)]
pub struct Expression {
    pub kind: ExprKind,
    ty: Option<ExpressionType>,
}

impl Expression {
    pub fn new(kind: ExprKind) -> Self {
        Expression { kind, ty: None }
    }

    /// Cached resolved type, if validation has populated it.
    #[inline]
    pub fn ty(&self) -> Option<&ExpressionType> {
        self.ty.as_ref()
    }

    /// Populate the type cache (validator only).
    #[inline]
    pub fn set_ty(&mut self, ty: ExpressionType) {
        self.ty = Some(ty);
    }
}

/// Structural equality compares node kinds only; the type cache is
/// derived data and the wire format does not carry it.
impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

/// Expression variants.
#[derive(Clone, PartialEq, Debug)]
pub enum ExprKind {
    /// Member access into a (possibly nested) struct: `light.color.rgb`
    /// walks one path segment at a time.
    AccessMember {
        expr: ExprId,
        member_path: Vec<String>,
    },

    /// Assignment; the left side must classify as an l-value.
    Assign {
        op: AssignOp,
        left: ExprId,
        right: ExprId,
    },

    /// Binary arithmetic or comparison.
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },

    /// Component-wise construction cast: `vec4[f32](pos, 1.0)`.
    ///
    /// Up to four operand slots; `ExprId::INVALID` marks an empty slot.
    /// Occupied slots are always a prefix.
    Cast {
        target: ExpressionType,
        expressions: [ExprId; 4],
    },

    /// Compile-time selection on a named condition.
    Conditional {
        condition: String,
        true_path: ExprId,
        false_path: ExprId,
    },

    /// Literal value.
    Constant(ConstantValue),

    /// Variable reference, resolved by name through the scope table.
    Identifier(String),

    /// Built-in function call.
    Intrinsic {
        intrinsic: IntrinsicKind,
        parameters: SmallVec<[ExprId; 2]>,
    },

    /// Component selection/reordering: `v.xyz`.
    Swizzle {
        expr: ExprId,
        components: [SwizzleComponent; 4],
        component_count: u32,
    },
}

impl ExprKind {
    /// Occupied operand slots of a `Cast`, in order.
    pub fn cast_operands(expressions: &[ExprId; 4]) -> impl Iterator<Item = ExprId> + '_ {
        expressions.iter().copied().take_while(|id| id.is_valid())
    }
}
