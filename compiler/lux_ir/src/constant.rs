//! Compile-time constant values.
//!
//! The closed set of literal kinds a `Constant` expression can hold. The
//! wire format persists these by a stable kind index (see `lux_wire`), so
//! the set and its order must not change without a format version bump.

use crate::types::{ExpressionType, PrimitiveType};

/// A literal value carried by a `Constant` expression.
#[derive(Clone, PartialEq, Debug)]
pub enum ConstantValue {
    Bool(bool),
    Float32(f32),
    Int32(i32),
    UInt32(u32),
    Vec2F32([f32; 2]),
    Vec3F32([f32; 3]),
    Vec4F32([f32; 4]),
    Vec2I32([i32; 2]),
    Vec3I32([i32; 3]),
    Vec4I32([i32; 4]),
}

impl ConstantValue {
    /// Stable kind index used by the wire format (0..=9).
    pub const fn kind_index(&self) -> u32 {
        match self {
            ConstantValue::Bool(_) => 0,
            ConstantValue::Float32(_) => 1,
            ConstantValue::Int32(_) => 2,
            ConstantValue::UInt32(_) => 3,
            ConstantValue::Vec2F32(_) => 4,
            ConstantValue::Vec3F32(_) => 5,
            ConstantValue::Vec4F32(_) => 6,
            ConstantValue::Vec2I32(_) => 7,
            ConstantValue::Vec3I32(_) => 8,
            ConstantValue::Vec4I32(_) => 9,
        }
    }

    /// Type of the literal; follows directly from its concrete kind.
    pub const fn type_of(&self) -> ExpressionType {
        match self {
            ConstantValue::Bool(_) => ExpressionType::Primitive(PrimitiveType::Boolean),
            ConstantValue::Float32(_) => ExpressionType::Primitive(PrimitiveType::Float32),
            ConstantValue::Int32(_) => ExpressionType::Primitive(PrimitiveType::Int32),
            ConstantValue::UInt32(_) => ExpressionType::Primitive(PrimitiveType::UInt32),
            ConstantValue::Vec2F32(_) => ExpressionType::vector(2, PrimitiveType::Float32),
            ConstantValue::Vec3F32(_) => ExpressionType::vector(3, PrimitiveType::Float32),
            ConstantValue::Vec4F32(_) => ExpressionType::vector(4, PrimitiveType::Float32),
            ConstantValue::Vec2I32(_) => ExpressionType::vector(2, PrimitiveType::Int32),
            ConstantValue::Vec3I32(_) => ExpressionType::vector(3, PrimitiveType::Int32),
            ConstantValue::Vec4I32(_) => ExpressionType::vector(4, PrimitiveType::Int32),
        }
    }

    /// Boolean payload, if this is a boolean constant.
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            ConstantValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}
