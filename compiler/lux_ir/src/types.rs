//! The shader type algebra.
//!
//! A closed set of value types: scalars, vectors, matrices, samplers and
//! named references to structs or aliases declared in scope. Equality is
//! exact structural equality; there is no implicit widening or promotion
//! anywhere in the compiler.

use std::fmt;

/// Scalar base type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum PrimitiveType {
    Boolean,
    Float32,
    Int32,
    UInt32,
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PrimitiveType::Boolean => "bool",
            PrimitiveType::Float32 => "f32",
            PrimitiveType::Int32 => "i32",
            PrimitiveType::UInt32 => "u32",
        };
        f.write_str(s)
    }
}

/// Vector of 2 to 4 components over a scalar base.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct VectorType {
    pub component_count: u32,
    pub base: PrimitiveType,
}

/// Square matrix of 2 to 4 columns over a scalar base.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct MatrixType {
    pub column_count: u32,
    pub base: PrimitiveType,
}

/// Texture sampler; sampling yields a 4-component vector of the sampled base.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct SamplerType {
    pub sampled_type: PrimitiveType,
}

/// Resolved or to-be-resolved type of an expression.
///
/// `Named` refers to a struct or an alias declared in scope; after
/// validation every expression carries an alias-free type in its cache.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExpressionType {
    Primitive(PrimitiveType),
    Vector(VectorType),
    Matrix(MatrixType),
    Sampler(SamplerType),
    Named(String),
}

impl ExpressionType {
    /// Shorthand for a vector type.
    pub const fn vector(component_count: u32, base: PrimitiveType) -> Self {
        ExpressionType::Vector(VectorType {
            component_count,
            base,
        })
    }

    /// Shorthand for a matrix type.
    pub const fn matrix(column_count: u32, base: PrimitiveType) -> Self {
        ExpressionType::Matrix(MatrixType { column_count, base })
    }

    /// Shorthand for a sampler type.
    pub const fn sampler(sampled_type: PrimitiveType) -> Self {
        ExpressionType::Sampler(SamplerType { sampled_type })
    }

    pub const fn is_primitive(&self) -> bool {
        matches!(self, ExpressionType::Primitive(_))
    }

    pub const fn is_vector(&self) -> bool {
        matches!(self, ExpressionType::Vector(_))
    }

    pub const fn is_matrix(&self) -> bool {
        matches!(self, ExpressionType::Matrix(_))
    }

    pub const fn is_sampler(&self) -> bool {
        matches!(self, ExpressionType::Sampler(_))
    }

    pub const fn is_named(&self) -> bool {
        matches!(self, ExpressionType::Named(_))
    }

    /// Scalar base of a primitive or vector/matrix type, if any.
    pub const fn base(&self) -> Option<PrimitiveType> {
        match self {
            ExpressionType::Primitive(p) => Some(*p),
            ExpressionType::Vector(v) => Some(v.base),
            ExpressionType::Matrix(m) => Some(m.base),
            ExpressionType::Sampler(_) | ExpressionType::Named(_) => None,
        }
    }

    /// Number of scalar components, for the types that have one.
    ///
    /// Primitives count 1, vectors their component count, matrices
    /// columns squared. Samplers and named types have none.
    pub const fn component_count(&self) -> Option<u32> {
        match self {
            ExpressionType::Primitive(_) => Some(1),
            ExpressionType::Vector(v) => Some(v.component_count),
            ExpressionType::Matrix(m) => Some(m.column_count * m.column_count),
            ExpressionType::Sampler(_) | ExpressionType::Named(_) => None,
        }
    }
}

impl From<PrimitiveType> for ExpressionType {
    fn from(p: PrimitiveType) -> Self {
        ExpressionType::Primitive(p)
    }
}

impl fmt::Display for ExpressionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpressionType::Primitive(p) => write!(f, "{p}"),
            ExpressionType::Vector(v) => write!(f, "vec{}[{}]", v.component_count, v.base),
            ExpressionType::Matrix(m) => write!(f, "mat{}[{}]", m.column_count, m.base),
            ExpressionType::Sampler(s) => write!(f, "sampler2D[{}]", s.sampled_type),
            ExpressionType::Named(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn structural_equality_is_exact() {
        let a = ExpressionType::vector(3, PrimitiveType::Float32);
        let b = ExpressionType::vector(3, PrimitiveType::Float32);
        let c = ExpressionType::vector(3, PrimitiveType::Int32);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, ExpressionType::vector(4, PrimitiveType::Float32));
    }

    #[test]
    fn component_counts() {
        assert_eq!(
            ExpressionType::Primitive(PrimitiveType::Boolean).component_count(),
            Some(1)
        );
        assert_eq!(
            ExpressionType::vector(2, PrimitiveType::Float32).component_count(),
            Some(2)
        );
        assert_eq!(
            ExpressionType::matrix(4, PrimitiveType::Float32).component_count(),
            Some(16)
        );
        assert_eq!(
            ExpressionType::sampler(PrimitiveType::Float32).component_count(),
            None
        );
        assert_eq!(
            ExpressionType::Named("Light".to_owned()).component_count(),
            None
        );
    }

    #[test]
    fn display() {
        assert_eq!(
            ExpressionType::vector(3, PrimitiveType::Float32).to_string(),
            "vec3[f32]"
        );
        assert_eq!(
            ExpressionType::matrix(4, PrimitiveType::Float32).to_string(),
            "mat4[f32]"
        );
        assert_eq!(ExpressionType::Named("Light".to_owned()).to_string(), "Light");
    }
}
