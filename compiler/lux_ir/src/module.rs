//! The shader module: one complete shader program.
//!
//! Holds the interface tables (conditions, structs, inputs, outputs,
//! uniforms), the function list and the arena that owns every node of
//! every function body. This is the unit the validator checks and the
//! wire format persists.

use crate::arena::AstArena;
use crate::node_id::StmtId;
use crate::op::{MemoryLayout, ShaderStage};
use crate::stmt::{Parameter, StructDescription};
use crate::types::ExpressionType;

/// A shader stage input or output.
#[derive(Clone, PartialEq, Debug)]
pub struct InputOutput {
    pub name: String,
    pub ty: ExpressionType,
    pub location: Option<u32>,
}

/// An external resource visible to the shader.
#[derive(Clone, PartialEq, Debug)]
pub struct Uniform {
    pub name: String,
    pub ty: ExpressionType,
    pub binding: Option<u32>,
    pub layout: Option<MemoryLayout>,
}

/// A shader function; its body is a statement tree in the module arena.
#[derive(Clone, PartialEq, Debug)]
pub struct Function {
    pub name: String,
    pub return_type: ExpressionType,
    pub parameters: Vec<Parameter>,
    pub body: StmtId,
}

/// One complete shader program.
#[derive(Clone, PartialEq, Debug)]
pub struct Module {
    pub stage: ShaderStage,
    /// Named compile-time switches; names only, values are supplied to
    /// the optimizer as a bitmask.
    pub conditions: Vec<String>,
    pub structs: Vec<StructDescription>,
    pub inputs: Vec<InputOutput>,
    pub outputs: Vec<InputOutput>,
    pub uniforms: Vec<Uniform>,
    pub functions: Vec<Function>,
    pub arena: AstArena,
}

impl Module {
    /// Create an empty module for the given stage.
    pub fn new(stage: ShaderStage) -> Self {
        Module {
            stage,
            conditions: Vec::new(),
            structs: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            uniforms: Vec::new(),
            functions: Vec::new(),
            arena: AstArena::new(),
        }
    }

    /// Index of a named condition, if declared.
    pub fn find_condition(&self, name: &str) -> Option<usize> {
        self.conditions.iter().position(|c| c == name)
    }

    /// Look up a struct declaration by name.
    pub fn find_struct(&self, name: &str) -> Option<&StructDescription> {
        self.structs.iter().find(|s| s.name == name)
    }
}
