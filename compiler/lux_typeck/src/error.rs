//! Validation errors.
//!
//! Validation is fail-fast: the first violated rule aborts the walk with
//! a single structured error. The error carries a kind, a rendered
//! message (via `thiserror`) and, where available, the offending node.

use lux_ir::{AttributeKind, BinaryOp, ExprId, ExpressionType, NodeRef, StmtId};
use thiserror::Error;

/// What went wrong.
#[derive(Clone, PartialEq, Debug, Error)]
pub enum ErrorKind {
    #[error("unknown identifier {0}")]
    UnknownIdentifier(String),

    #[error("unknown structure {0}")]
    UnknownStruct(String),

    #[error("unknown field {0}")]
    UnknownField(String),

    #[error("expression is not a structure")]
    NotAStruct,

    #[error("left expression type ({left}) must match right expression type ({right})")]
    TypeMismatch {
        left: ExpressionType,
        right: ExpressionType,
    },

    #[error("assignment is only possible with an l-value")]
    NotAnLValue,

    #[error("invalid operand types for {op}: {left} and {right}")]
    InvalidBinaryOperands {
        op: BinaryOp,
        left: ExpressionType,
        right: ExpressionType,
    },

    #[error("this operation is not supported for booleans")]
    BooleanOperand,

    #[error("invalid cast target {0}")]
    InvalidCastTarget(ExpressionType),

    #[error("incompatible cast operand type {0}")]
    InvalidCastOperand(ExpressionType),

    #[error("component count doesn't match required component count")]
    ComponentCountMismatch,

    #[error("expected {expected} parameters, found {found}")]
    IntrinsicArity { expected: usize, found: usize },

    #[error("all intrinsic parameter types must match")]
    IntrinsicParamMismatch,

    #[error("cross product only works with vec3[f32] expressions")]
    InvalidCrossProductOperand,

    #[error("dot product requires vector operands")]
    InvalidDotProductOperand,

    #[error("texture sampling requires a sampler as first parameter")]
    ExpectedSampler,

    #[error("texture sampling requires vector coordinates")]
    ExpectedCoordinates,

    #[error("cannot swizzle more than four elements")]
    SwizzleTooLong,

    #[error("invalid swizzle")]
    InvalidSwizzle,

    #[error("swizzle component out of range for {0}")]
    SwizzleOutOfRange(ExpressionType),

    #[error("cannot swizzle type {0}")]
    CannotSwizzle(ExpressionType),

    #[error("unknown condition {0}")]
    UnknownCondition(String),

    #[error("branch condition must resolve to a boolean")]
    NonBooleanCondition,

    #[error("external variable {0} is already declared")]
    DuplicateExternal(String),

    #[error("binding {0} is already in use")]
    DuplicateBinding(u32),

    #[error("multiple {0:?} attributes on one declaration")]
    DuplicateAttribute(AttributeKind),

    #[error("invalid attribute value {0}")]
    InvalidAttributeValue(String),

    #[error("the same entry stage has been defined multiple times")]
    MultipleEntryPoints,

    #[error("entry functions can take at most one parameter")]
    TooManyEntryParameters,

    #[error("only local variables can be declared in a statement")]
    NonLocalDeclaration,

    #[error("struct member {0} found multiple times")]
    DuplicateMember(String),

    #[error("alias cycle detected while resolving {0}")]
    AliasCycle(String),
}

/// A failed validation run.
#[derive(Clone, PartialEq, Debug, Error)]
#[error("{kind}")]
pub struct ValidationError {
    pub kind: ErrorKind,
    pub node: Option<NodeRef>,
}

impl ValidationError {
    pub fn new(kind: ErrorKind) -> Self {
        ValidationError { kind, node: None }
    }

    pub fn at_expr(kind: ErrorKind, id: ExprId) -> Self {
        ValidationError {
            kind,
            node: Some(NodeRef::Expr(id)),
        }
    }

    pub fn at_stmt(kind: ErrorKind, id: StmtId) -> Self {
        ValidationError {
            kind,
            node: Some(NodeRef::Stmt(id)),
        }
    }
}

impl From<ErrorKind> for ValidationError {
    fn from(kind: ErrorKind) -> Self {
        ValidationError::new(kind)
    }
}
