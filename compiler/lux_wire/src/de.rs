//! Module decoding.
//!
//! Builds an entirely new tree per call; nothing is shared with other
//! invocations. Fail-fast: the first structural problem aborts the whole
//! decode with a [`WireError`] and no partial module escapes.

use lux_ir::{
    AstArena, Attribute, BranchArm, ConstantValue, ExprId, ExprKind, ExpressionType, ExternalVar,
    Function, InputOutput, Module, Parameter, StmtId, StmtKind, StructDescription, StructMember,
    SwizzleComponent, Uniform, Variable,
};
use smallvec::SmallVec;

use crate::error::WireError;
use crate::kind;
use crate::tag::type_from_tag;
use crate::{CURRENT_VERSION, MAGIC, TYPE_DISC_CONCRETE, TYPE_DISC_NAMED};

/// Deepest node nesting the decoder accepts; a corrupt stream cannot
/// recurse past it.
const MAX_NODE_DEPTH: usize = 256;

/// Decode a module from its binary form.
#[tracing::instrument(level = "trace", skip(bytes), fields(len = bytes.len()))]
pub fn deserialize(bytes: &[u8]) -> Result<Module, WireError> {
    Deserializer {
        bytes,
        pos: 0,
        depth: 0,
        arena: AstArena::new(),
    }
    .module()
}

struct Deserializer<'a> {
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
    arena: AstArena,
}

impl Deserializer<'_> {
    // ===== primitives =====

    fn take(&mut self, len: usize) -> Result<&[u8], WireError> {
        let end = self.pos.checked_add(len).ok_or(WireError::UnexpectedEof)?;
        let slice = self.bytes.get(self.pos..end).ok_or(WireError::UnexpectedEof)?;
        self.pos = end;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8, WireError> {
        Ok(self.take(1)?[0])
    }

    fn u32(&mut self) -> Result<u32, WireError> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn i32(&mut self) -> Result<i32, WireError> {
        Ok(self.u32()? as i32)
    }

    fn f32(&mut self) -> Result<f32, WireError> {
        Ok(f32::from_bits(self.u32()?))
    }

    fn bool(&mut self) -> Result<bool, WireError> {
        match self.u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(WireError::InvalidBool(other)),
        }
    }

    fn string(&mut self) -> Result<String, WireError> {
        let len = self.u32()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| WireError::InvalidString)
    }

    fn opt_u32(&mut self) -> Result<Option<u32>, WireError> {
        if self.bool()? {
            Ok(Some(self.u32()?))
        } else {
            Ok(None)
        }
    }

    /// Capacity hint for a count-prefixed sequence, bounded by the bytes
    /// left in the stream so a corrupt count cannot trigger a huge
    /// allocation before the payload is read.
    fn capacity(&self, count: u32) -> usize {
        (count as usize).min(self.bytes.len().saturating_sub(self.pos))
    }

    // ===== types =====

    fn ty(&mut self) -> Result<ExpressionType, WireError> {
        match self.u8()? {
            TYPE_DISC_CONCRETE => type_from_tag(self.u32()?),
            TYPE_DISC_NAMED => Ok(ExpressionType::Named(self.string()?)),
            other => Err(WireError::tag("type discriminator", u32::from(other))),
        }
    }

    // ===== module layout =====

    fn module(mut self) -> Result<Module, WireError> {
        if self.u32()? != MAGIC {
            return Err(WireError::InvalidMagic);
        }
        if self.u32()? > CURRENT_VERSION {
            return Err(WireError::UnsupportedVersion);
        }

        let stage = kind::stage_from_tag(self.u32()?)?;
        let mut module = Module::new(stage);

        let condition_count = self.u32()?;
        for _ in 0..condition_count {
            module.conditions.push(self.string()?);
        }

        let struct_count = self.u32()?;
        for _ in 0..struct_count {
            let description = self.struct_description()?;
            module.structs.push(description);
        }

        for _ in 0..self.u32()? {
            let io = self.input_output()?;
            module.inputs.push(io);
        }
        for _ in 0..self.u32()? {
            let io = self.input_output()?;
            module.outputs.push(io);
        }

        let uniform_count = self.u32()?;
        for _ in 0..uniform_count {
            let name = self.string()?;
            let ty = self.ty()?;
            let binding = self.opt_u32()?;
            let layout = if self.bool()? {
                Some(kind::layout_from_tag(self.u32()?)?)
            } else {
                None
            };
            module.uniforms.push(Uniform {
                name,
                ty,
                binding,
                layout,
            });
        }

        let function_count = self.u32()?;
        for _ in 0..function_count {
            let name = self.string()?;
            let return_type = self.ty()?;
            let parameter_count = self.u32()?;
            let mut parameters = Vec::with_capacity(self.capacity(parameter_count));
            for _ in 0..parameter_count {
                let name = self.string()?;
                let ty = self.ty()?;
                parameters.push(Parameter { name, ty });
            }
            let body = self.function_body()?;
            module.functions.push(Function {
                name,
                return_type,
                parameters,
                body,
            });
        }

        module.arena = self.arena;
        Ok(module)
    }

    fn input_output(&mut self) -> Result<InputOutput, WireError> {
        let name = self.string()?;
        let ty = self.ty()?;
        let location = self.opt_u32()?;
        Ok(InputOutput { name, ty, location })
    }

    fn struct_description(&mut self) -> Result<StructDescription, WireError> {
        let name = self.string()?;
        let member_count = self.u32()?;
        let mut members = Vec::with_capacity(self.capacity(member_count));
        for _ in 0..member_count {
            let name = self.string()?;
            let ty = self.ty()?;
            members.push(StructMember { name, ty });
        }
        Ok(StructDescription { name, members })
    }

    fn attributes(&mut self) -> Result<Vec<Attribute>, WireError> {
        let count = self.u32()?;
        let mut attributes = Vec::with_capacity(self.capacity(count));
        for _ in 0..count {
            let attribute_kind = kind::attribute_kind_from_tag(self.u32()?)?;
            let value = self.string()?;
            attributes.push(Attribute::new(attribute_kind, value));
        }
        Ok(attributes)
    }

    // ===== nodes =====

    /// A function body must decode to a statement node.
    fn function_body(&mut self) -> Result<StmtId, WireError> {
        let node_kind = self.i32()?;
        if kind::is_expression_kind(node_kind) {
            return Err(WireError::ExpectedStatement);
        }
        self.stmt_from_kind(node_kind)
    }

    fn expr(&mut self) -> Result<ExprId, WireError> {
        let node_kind = self.i32()?;
        self.expr_from_kind(node_kind)
    }

    fn opt_expr(&mut self) -> Result<Option<ExprId>, WireError> {
        let node_kind = self.i32()?;
        if node_kind == kind::NODE_NONE {
            return Ok(None);
        }
        self.expr_from_kind(node_kind).map(Some)
    }

    fn stmt(&mut self) -> Result<StmtId, WireError> {
        let node_kind = self.i32()?;
        self.stmt_from_kind(node_kind)
    }

    fn opt_stmt(&mut self) -> Result<Option<StmtId>, WireError> {
        let node_kind = self.i32()?;
        if node_kind == kind::NODE_NONE {
            return Ok(None);
        }
        self.stmt_from_kind(node_kind).map(Some)
    }

    fn expr_from_kind(&mut self, node_kind: i32) -> Result<ExprId, WireError> {
        if !kind::is_expression_kind(node_kind) {
            return Err(if kind::is_statement_kind(node_kind) {
                WireError::MismatchedNode
            } else {
                WireError::InvalidNodeKind
            });
        }

        self.depth += 1;
        if self.depth > MAX_NODE_DEPTH {
            return Err(WireError::NestingTooDeep);
        }

        let expr_kind = match node_kind {
            kind::NODE_ACCESS_MEMBER => {
                let expr = self.expr()?;
                let segment_count = self.u32()?;
                let mut member_path = Vec::with_capacity(self.capacity(segment_count));
                for _ in 0..segment_count {
                    member_path.push(self.string()?);
                }
                ExprKind::AccessMember { expr, member_path }
            }

            kind::NODE_ASSIGN => {
                let op = kind::assign_op_from_tag(self.u32()?)?;
                let left = self.expr()?;
                let right = self.expr()?;
                ExprKind::Assign { op, left, right }
            }

            kind::NODE_BINARY => {
                let op = kind::binary_op_from_tag(self.u32()?)?;
                let left = self.expr()?;
                let right = self.expr()?;
                ExprKind::Binary { op, left, right }
            }

            kind::NODE_CAST => {
                let target = self.ty()?;
                let mut expressions = [ExprId::INVALID; 4];
                for slot in &mut expressions {
                    if let Some(id) = self.opt_expr()? {
                        *slot = id;
                    }
                }
                ExprKind::Cast {
                    target,
                    expressions,
                }
            }

            kind::NODE_CONDITIONAL_EXPR => {
                let condition = self.string()?;
                let true_path = self.expr()?;
                let false_path = self.expr()?;
                ExprKind::Conditional {
                    condition,
                    true_path,
                    false_path,
                }
            }

            kind::NODE_CONSTANT => ExprKind::Constant(self.constant()?),

            kind::NODE_IDENTIFIER => ExprKind::Identifier(self.string()?),

            kind::NODE_INTRINSIC => {
                let intrinsic = kind::intrinsic_from_tag(self.u32()?)?;
                let parameter_count = self.u32()?;
                let mut parameters = SmallVec::with_capacity(self.capacity(parameter_count));
                for _ in 0..parameter_count {
                    parameters.push(self.expr()?);
                }
                ExprKind::Intrinsic {
                    intrinsic,
                    parameters,
                }
            }

            kind::NODE_SWIZZLE => {
                let expr = self.expr()?;
                let component_count = self.u32()?;
                if component_count == 0 || component_count > 4 {
                    return Err(WireError::tag("swizzle count", component_count));
                }
                let mut components = [SwizzleComponent::First; 4];
                for slot in components.iter_mut().take(component_count as usize) {
                    *slot = kind::swizzle_component_from_tag(self.u32()?)?;
                }
                ExprKind::Swizzle {
                    expr,
                    components,
                    component_count,
                }
            }

            _ => return Err(WireError::InvalidNodeKind),
        };

        self.depth -= 1;
        Ok(self.arena.alloc_expr(expr_kind))
    }

    fn constant(&mut self) -> Result<ConstantValue, WireError> {
        let value = match self.u32()? {
            0 => ConstantValue::Bool(self.bool()?),
            1 => ConstantValue::Float32(self.f32()?),
            2 => ConstantValue::Int32(self.i32()?),
            3 => ConstantValue::UInt32(self.u32()?),
            4 => ConstantValue::Vec2F32([self.f32()?, self.f32()?]),
            5 => ConstantValue::Vec3F32([self.f32()?, self.f32()?, self.f32()?]),
            6 => ConstantValue::Vec4F32([self.f32()?, self.f32()?, self.f32()?, self.f32()?]),
            7 => ConstantValue::Vec2I32([self.i32()?, self.i32()?]),
            8 => ConstantValue::Vec3I32([self.i32()?, self.i32()?, self.i32()?]),
            9 => ConstantValue::Vec4I32([self.i32()?, self.i32()?, self.i32()?, self.i32()?]),
            other => return Err(WireError::tag("constant kind", other)),
        };
        Ok(value)
    }

    fn variable(&mut self) -> Result<Variable, WireError> {
        let variable_kind = kind::variable_kind_from_tag(self.i32()?)?;

        if variable_kind == lux_ir::VariableKind::Builtin {
            let entry = kind::builtin_from_tag(self.u32()?)?;
            let ty = self.ty()?;
            return Ok(Variable::Builtin { entry, ty });
        }

        let name = self.string()?;
        let ty = self.ty()?;
        let variable = match variable_kind {
            lux_ir::VariableKind::Input => Variable::Input { name, ty },
            lux_ir::VariableKind::Local => Variable::Local { name, ty },
            lux_ir::VariableKind::Output => Variable::Output { name, ty },
            lux_ir::VariableKind::Parameter => Variable::Parameter { name, ty },
            lux_ir::VariableKind::Uniform => Variable::Uniform { name, ty },
            lux_ir::VariableKind::Builtin => unreachable!("handled above"),
        };
        Ok(variable)
    }

    fn stmt_from_kind(&mut self, node_kind: i32) -> Result<StmtId, WireError> {
        if !kind::is_statement_kind(node_kind) {
            return Err(if kind::is_expression_kind(node_kind) {
                WireError::MismatchedNode
            } else {
                WireError::InvalidNodeKind
            });
        }

        self.depth += 1;
        if self.depth > MAX_NODE_DEPTH {
            return Err(WireError::NestingTooDeep);
        }

        let stmt_kind = match node_kind {
            kind::NODE_BLOCK => {
                let statement_count = self.u32()?;
                let mut statements = Vec::with_capacity(self.capacity(statement_count));
                for _ in 0..statement_count {
                    statements.push(self.stmt()?);
                }
                StmtKind::Block(statements)
            }

            kind::NODE_BRANCH => {
                let arm_count = self.u32()?;
                let mut arms = SmallVec::with_capacity(self.capacity(arm_count));
                for _ in 0..arm_count {
                    let condition = self.expr()?;
                    let statement = self.stmt()?;
                    arms.push(BranchArm {
                        condition,
                        statement,
                    });
                }
                let else_statement = self.opt_stmt()?;
                StmtKind::Branch {
                    arms,
                    else_statement,
                }
            }

            kind::NODE_CONDITIONAL_STMT => {
                let condition = self.string()?;
                let statement = self.stmt()?;
                StmtKind::Conditional {
                    condition,
                    statement,
                }
            }

            kind::NODE_DECLARE_EXTERNAL => {
                let var_count = self.u32()?;
                let mut vars = Vec::with_capacity(self.capacity(var_count));
                for _ in 0..var_count {
                    let name = self.string()?;
                    let ty = self.ty()?;
                    let attributes = self.attributes()?;
                    vars.push(ExternalVar {
                        name,
                        ty,
                        attributes,
                    });
                }
                StmtKind::DeclareExternal(vars)
            }

            kind::NODE_DECLARE_FUNCTION => {
                let name = self.string()?;
                let attributes = self.attributes()?;
                let parameter_count = self.u32()?;
                let mut parameters = Vec::with_capacity(self.capacity(parameter_count));
                for _ in 0..parameter_count {
                    let name = self.string()?;
                    let ty = self.ty()?;
                    parameters.push(Parameter { name, ty });
                }
                let return_type = self.ty()?;
                let body = self.stmt()?;
                StmtKind::DeclareFunction {
                    name,
                    attributes,
                    parameters,
                    return_type,
                    body,
                }
            }

            kind::NODE_DECLARE_STRUCT => StmtKind::DeclareStruct(self.struct_description()?),

            kind::NODE_DECLARE_VARIABLE => {
                let variable = self.variable()?;
                let initial = self.opt_expr()?;
                StmtKind::DeclareVariable { variable, initial }
            }

            kind::NODE_DISCARD => StmtKind::Discard,

            kind::NODE_EXPRESSION => StmtKind::Expression(self.expr()?),

            kind::NODE_NO_OP => StmtKind::NoOp,

            kind::NODE_RETURN => StmtKind::Return(self.opt_expr()?),

            _ => return Err(WireError::InvalidNodeKind),
        };

        self.depth -= 1;
        Ok(self.arena.alloc_stmt(stmt_kind))
    }
}
