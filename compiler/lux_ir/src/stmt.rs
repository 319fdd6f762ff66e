//! Statement nodes and the declaration payloads they carry.

use smallvec::SmallVec;

use crate::node_id::{ExprId, StmtId};
use crate::op::Attribute;
use crate::types::ExpressionType;
use crate::variable::Variable;

/// One `condition => statement` arm of a branch.
#[derive(Clone, PartialEq, Debug)]
pub struct BranchArm {
    pub condition: ExprId,
    pub statement: StmtId,
}

/// A member of a declared struct.
#[derive(Clone, PartialEq, Debug)]
pub struct StructMember {
    pub name: String,
    pub ty: ExpressionType,
}

/// A struct declaration: name plus ordered members.
#[derive(Clone, PartialEq, Debug)]
pub struct StructDescription {
    pub name: String,
    pub members: Vec<StructMember>,
}

impl StructDescription {
    /// Find a member by name.
    pub fn member(&self, name: &str) -> Option<&StructMember> {
        self.members.iter().find(|m| m.name == name)
    }
}

/// One variable of an external (uniform/sampler) block declaration.
///
/// Attributes are the raw front-end form; the validator parses and
/// checks them (binding uniqueness, `std140` layout).
#[derive(Clone, PartialEq, Debug)]
pub struct ExternalVar {
    pub name: String,
    pub ty: ExpressionType,
    pub attributes: Vec<Attribute>,
}

/// A function parameter.
#[derive(Clone, PartialEq, Debug)]
pub struct Parameter {
    pub name: String,
    pub ty: ExpressionType,
}

/// Statement variants.
#[derive(Clone, PartialEq, Debug)]
pub enum StmtKind {
    /// Scoped sequence of statements.
    Block(Vec<StmtId>),

    /// Runtime if/else-if/else chain.
    Branch {
        arms: SmallVec<[BranchArm; 2]>,
        else_statement: Option<StmtId>,
    },

    /// Compile-time gate on a named condition.
    Conditional { condition: String, statement: StmtId },

    /// Declaration of external resources (uniforms, samplers).
    DeclareExternal(Vec<ExternalVar>),

    /// Function declaration, possibly carrying an `entry` attribute.
    DeclareFunction {
        name: String,
        attributes: Vec<Attribute>,
        parameters: Vec<Parameter>,
        return_type: ExpressionType,
        body: StmtId,
    },

    /// Struct declaration.
    DeclareStruct(StructDescription),

    /// Local variable declaration with optional initializer.
    DeclareVariable {
        variable: Variable,
        initial: Option<ExprId>,
    },

    /// Fragment discard.
    Discard,

    /// Expression evaluated for its effect.
    Expression(ExprId),

    /// Empty statement; the optimizer's replacement for eliminated code.
    NoOp,

    /// Function return with optional value.
    Return(Option<ExprId>),
}
