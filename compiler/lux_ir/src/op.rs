//! Operator, attribute and stage enumerations shared across the compiler.

use std::fmt;

/// Binary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    CompEq,
    CompGe,
    CompGt,
    CompLe,
    CompLt,
    CompNe,
}

impl BinaryOp {
    /// Ordering comparisons (`>=`, `>`, `<=`, `<`).
    pub const fn is_ordering(self) -> bool {
        matches!(
            self,
            BinaryOp::CompGe | BinaryOp::CompGt | BinaryOp::CompLe | BinaryOp::CompLt
        )
    }

    /// Any of the six comparison operators.
    pub const fn is_comparison(self) -> bool {
        self.is_ordering() || matches!(self, BinaryOp::CompEq | BinaryOp::CompNe)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::CompEq => "==",
            BinaryOp::CompGe => ">=",
            BinaryOp::CompGt => ">",
            BinaryOp::CompLe => "<=",
            BinaryOp::CompLt => "<",
            BinaryOp::CompNe => "!=",
        };
        f.write_str(s)
    }
}

/// Assignment operators. Only simple assignment exists today.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum AssignOp {
    Simple,
}

/// Built-in shader functions.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum IntrinsicKind {
    CrossProduct,
    DotProduct,
    SampleTexture,
}

/// One selected component of a swizzle.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SwizzleComponent {
    First,
    Second,
    Third,
    Fourth,
}

impl SwizzleComponent {
    /// Zero-based component index.
    pub const fn index(self) -> u32 {
        match self {
            SwizzleComponent::First => 0,
            SwizzleComponent::Second => 1,
            SwizzleComponent::Third => 2,
            SwizzleComponent::Fourth => 3,
        }
    }
}

/// Shader pipeline stages.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// Number of stages; sizes the validator's entry-function table.
    pub const COUNT: usize = 2;

    /// Table index for per-stage bookkeeping.
    pub const fn index(self) -> usize {
        match self {
            ShaderStage::Vertex => 0,
            ShaderStage::Fragment => 1,
        }
    }

    /// Parse an `entry` attribute keyword.
    pub fn from_entry_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "vert" => Some(ShaderStage::Vertex),
            "frag" => Some(ShaderStage::Fragment),
            _ => None,
        }
    }
}

/// Values a shader may read or write without declaring them.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BuiltinEntry {
    VertexPosition,
}

/// Memory layout of a uniform block.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum MemoryLayout {
    Std140,
}

/// Attribute kinds a parser may attach to declarations.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum AttributeKind {
    Entry,
    Binding,
    Layout,
    Location,
}

/// A raw attribute as produced by the front-end.
///
/// The value is unparsed text; the validator checks it against the
/// attribute kind (integer for `Binding`/`Location`, a stage keyword for
/// `Entry`, a layout name for `Layout`).
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Attribute {
    pub kind: AttributeKind,
    pub value: String,
}

impl Attribute {
    pub fn new(kind: AttributeKind, value: impl Into<String>) -> Self {
        Attribute {
            kind,
            value: value.into(),
        }
    }
}
