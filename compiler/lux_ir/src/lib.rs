//! Lux IR: intermediate representation for the Lux shader compiler.
//!
//! This crate contains the shared substrate the other compiler crates
//! operate on:
//! - the type algebra (scalars, vectors, matrices, samplers, named types)
//! - constant values
//! - the arena-allocated AST (expressions, statements, variables)
//! - the shader [`Module`] that ties interface tables to function bodies
//! - builders for assembling trees by hand
//!
//! # Design
//!
//! - **Flatten everything**: no `Box<Expr>`; children are `ExprId(u32)` /
//!   `StmtId(u32)` indices into a per-tree [`AstArena`].
//! - **Exclusive ownership**: a node's children belong to it alone; trees
//!   share nothing and contain no cycles.
//! - **Name-based cross-references**: an `Identifier` expression refers to
//!   a variable by name, resolved through the validator's scope table,
//!   never by owning pointer.

pub mod build;

mod arena;
mod constant;
mod expr;
mod module;
mod node_id;
mod op;
mod stmt;
mod types;
mod variable;

pub use arena::AstArena;
pub use constant::ConstantValue;
pub use expr::{ExprKind, Expression};
pub use module::{Function, InputOutput, Module, Uniform};
pub use node_id::{ExprId, NodeRef, StmtId};
pub use op::{
    AssignOp, Attribute, AttributeKind, BinaryOp, BuiltinEntry, IntrinsicKind, MemoryLayout,
    ShaderStage, SwizzleComponent,
};
pub use stmt::{BranchArm, ExternalVar, Parameter, StmtKind, StructDescription, StructMember};
pub use types::{ExpressionType, MatrixType, PrimitiveType, SamplerType, VectorType};
pub use variable::{Variable, VariableKind};
