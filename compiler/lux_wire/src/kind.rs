//! Stable wire discriminators.
//!
//! Node kinds share one `i32` space: a dedicated `None` value for absent
//! optional nodes, expressions at 0..=8, statements at 9..=19, all in
//! alphabetical order within their category. These values are part of the
//! format; changing any of them requires a version bump.

use lux_ir::{
    AssignOp, AttributeKind, BinaryOp, BuiltinEntry, IntrinsicKind, MemoryLayout, ShaderStage,
    SwizzleComponent, VariableKind,
};

use crate::error::WireError;

pub(crate) const NODE_NONE: i32 = -1;

// ===== expression kinds =====
pub(crate) const NODE_ACCESS_MEMBER: i32 = 0;
pub(crate) const NODE_ASSIGN: i32 = 1;
pub(crate) const NODE_BINARY: i32 = 2;
pub(crate) const NODE_CAST: i32 = 3;
pub(crate) const NODE_CONDITIONAL_EXPR: i32 = 4;
pub(crate) const NODE_CONSTANT: i32 = 5;
pub(crate) const NODE_IDENTIFIER: i32 = 6;
pub(crate) const NODE_INTRINSIC: i32 = 7;
pub(crate) const NODE_SWIZZLE: i32 = 8;

// ===== statement kinds =====
pub(crate) const NODE_BLOCK: i32 = 9;
pub(crate) const NODE_BRANCH: i32 = 10;
pub(crate) const NODE_CONDITIONAL_STMT: i32 = 11;
pub(crate) const NODE_DECLARE_EXTERNAL: i32 = 12;
pub(crate) const NODE_DECLARE_FUNCTION: i32 = 13;
pub(crate) const NODE_DECLARE_STRUCT: i32 = 14;
pub(crate) const NODE_DECLARE_VARIABLE: i32 = 15;
pub(crate) const NODE_DISCARD: i32 = 16;
pub(crate) const NODE_EXPRESSION: i32 = 17;
pub(crate) const NODE_NO_OP: i32 = 18;
pub(crate) const NODE_RETURN: i32 = 19;

pub(crate) const fn is_expression_kind(kind: i32) -> bool {
    kind >= NODE_ACCESS_MEMBER && kind <= NODE_SWIZZLE
}

pub(crate) const fn is_statement_kind(kind: i32) -> bool {
    kind >= NODE_BLOCK && kind <= NODE_RETURN
}

// ===== small enumerations =====

pub(crate) const fn stage_tag(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => 0,
        ShaderStage::Fragment => 1,
    }
}

pub(crate) fn stage_from_tag(tag: u32) -> Result<ShaderStage, WireError> {
    match tag {
        0 => Ok(ShaderStage::Vertex),
        1 => Ok(ShaderStage::Fragment),
        _ => Err(WireError::tag("stage", tag)),
    }
}

pub(crate) const fn binary_op_tag(op: BinaryOp) -> u32 {
    match op {
        BinaryOp::Add => 0,
        BinaryOp::Subtract => 1,
        BinaryOp::Multiply => 2,
        BinaryOp::Divide => 3,
        BinaryOp::CompEq => 4,
        BinaryOp::CompGe => 5,
        BinaryOp::CompGt => 6,
        BinaryOp::CompLe => 7,
        BinaryOp::CompLt => 8,
        BinaryOp::CompNe => 9,
    }
}

pub(crate) fn binary_op_from_tag(tag: u32) -> Result<BinaryOp, WireError> {
    let op = match tag {
        0 => BinaryOp::Add,
        1 => BinaryOp::Subtract,
        2 => BinaryOp::Multiply,
        3 => BinaryOp::Divide,
        4 => BinaryOp::CompEq,
        5 => BinaryOp::CompGe,
        6 => BinaryOp::CompGt,
        7 => BinaryOp::CompLe,
        8 => BinaryOp::CompLt,
        9 => BinaryOp::CompNe,
        _ => return Err(WireError::tag("binary operator", tag)),
    };
    Ok(op)
}

pub(crate) const fn assign_op_tag(op: AssignOp) -> u32 {
    match op {
        AssignOp::Simple => 0,
    }
}

pub(crate) fn assign_op_from_tag(tag: u32) -> Result<AssignOp, WireError> {
    match tag {
        0 => Ok(AssignOp::Simple),
        _ => Err(WireError::tag("assignment operator", tag)),
    }
}

pub(crate) const fn intrinsic_tag(kind: IntrinsicKind) -> u32 {
    match kind {
        IntrinsicKind::CrossProduct => 0,
        IntrinsicKind::DotProduct => 1,
        IntrinsicKind::SampleTexture => 2,
    }
}

pub(crate) fn intrinsic_from_tag(tag: u32) -> Result<IntrinsicKind, WireError> {
    let kind = match tag {
        0 => IntrinsicKind::CrossProduct,
        1 => IntrinsicKind::DotProduct,
        2 => IntrinsicKind::SampleTexture,
        _ => return Err(WireError::tag("intrinsic", tag)),
    };
    Ok(kind)
}

pub(crate) fn swizzle_component_from_tag(tag: u32) -> Result<SwizzleComponent, WireError> {
    let component = match tag {
        0 => SwizzleComponent::First,
        1 => SwizzleComponent::Second,
        2 => SwizzleComponent::Third,
        3 => SwizzleComponent::Fourth,
        _ => return Err(WireError::tag("swizzle component", tag)),
    };
    Ok(component)
}

pub(crate) const fn attribute_kind_tag(kind: AttributeKind) -> u32 {
    match kind {
        AttributeKind::Entry => 0,
        AttributeKind::Binding => 1,
        AttributeKind::Layout => 2,
        AttributeKind::Location => 3,
    }
}

pub(crate) fn attribute_kind_from_tag(tag: u32) -> Result<AttributeKind, WireError> {
    let kind = match tag {
        0 => AttributeKind::Entry,
        1 => AttributeKind::Binding,
        2 => AttributeKind::Layout,
        3 => AttributeKind::Location,
        _ => return Err(WireError::tag("attribute kind", tag)),
    };
    Ok(kind)
}

pub(crate) const fn layout_tag(layout: MemoryLayout) -> u32 {
    match layout {
        MemoryLayout::Std140 => 0,
    }
}

pub(crate) fn layout_from_tag(tag: u32) -> Result<MemoryLayout, WireError> {
    match tag {
        0 => Ok(MemoryLayout::Std140),
        _ => Err(WireError::tag("memory layout", tag)),
    }
}

pub(crate) const fn builtin_tag(entry: BuiltinEntry) -> u32 {
    match entry {
        BuiltinEntry::VertexPosition => 0,
    }
}

pub(crate) fn builtin_from_tag(tag: u32) -> Result<BuiltinEntry, WireError> {
    match tag {
        0 => Ok(BuiltinEntry::VertexPosition),
        _ => Err(WireError::tag("builtin", tag)),
    }
}

pub(crate) const fn variable_kind_tag(kind: VariableKind) -> i32 {
    match kind {
        VariableKind::Builtin => 0,
        VariableKind::Input => 1,
        VariableKind::Local => 2,
        VariableKind::Output => 3,
        VariableKind::Parameter => 4,
        VariableKind::Uniform => 5,
    }
}

pub(crate) fn variable_kind_from_tag(tag: i32) -> Result<VariableKind, WireError> {
    let kind = match tag {
        0 => VariableKind::Builtin,
        1 => VariableKind::Input,
        2 => VariableKind::Local,
        3 => VariableKind::Output,
        4 => VariableKind::Parameter,
        5 => VariableKind::Uniform,
        _ => return Err(WireError::InvalidVariableKind),
    };
    Ok(kind)
}
