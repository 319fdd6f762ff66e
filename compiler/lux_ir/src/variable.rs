//! Variables and their classification.
//!
//! An `Identifier` expression never owns a variable; it carries a name
//! that the validator resolves through the scope table to one of these.

use crate::op::BuiltinEntry;
use crate::types::ExpressionType;

/// Kind discriminator, also used by the wire format.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum VariableKind {
    Builtin,
    Input,
    Local,
    Output,
    Parameter,
    Uniform,
}

/// A variable binding: where a value lives and what type it has.
#[derive(Clone, PartialEq, Debug)]
pub enum Variable {
    Builtin { entry: BuiltinEntry, ty: ExpressionType },
    Input { name: String, ty: ExpressionType },
    Local { name: String, ty: ExpressionType },
    Output { name: String, ty: ExpressionType },
    Parameter { name: String, ty: ExpressionType },
    Uniform { name: String, ty: ExpressionType },
}

impl Variable {
    pub const fn kind(&self) -> VariableKind {
        match self {
            Variable::Builtin { .. } => VariableKind::Builtin,
            Variable::Input { .. } => VariableKind::Input,
            Variable::Local { .. } => VariableKind::Local,
            Variable::Output { .. } => VariableKind::Output,
            Variable::Parameter { .. } => VariableKind::Parameter,
            Variable::Uniform { .. } => VariableKind::Uniform,
        }
    }

    /// Declared name; builtins are anonymous.
    pub fn name(&self) -> Option<&str> {
        match self {
            Variable::Builtin { .. } => None,
            Variable::Input { name, .. }
            | Variable::Local { name, .. }
            | Variable::Output { name, .. }
            | Variable::Parameter { name, .. }
            | Variable::Uniform { name, .. } => Some(name),
        }
    }

    /// Declared type.
    pub const fn ty(&self) -> &ExpressionType {
        match self {
            Variable::Builtin { ty, .. }
            | Variable::Input { ty, .. }
            | Variable::Local { ty, .. }
            | Variable::Output { ty, .. }
            | Variable::Parameter { ty, .. }
            | Variable::Uniform { ty, .. } => ty,
        }
    }
}
