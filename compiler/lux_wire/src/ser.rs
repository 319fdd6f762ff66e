//! Module encoding.
//!
//! Everything is little-endian. Strings are a u32 byte length followed by
//! UTF-8 bytes; booleans are one byte, 0 or 1; optional values write a
//! boolean presence flag first. Serialization is read-only over the input
//! and cannot fail.

use lux_ir::{
    Attribute, ConstantValue, ExprId, ExprKind, ExpressionType, Module, StmtId, StmtKind,
    StructDescription, Variable,
};

use crate::kind;
use crate::tag::type_tag;
use crate::{CURRENT_VERSION, MAGIC, TYPE_DISC_CONCRETE, TYPE_DISC_NAMED};

/// Encode a module into its binary form.
#[tracing::instrument(level = "trace", skip(module), fields(stage = ?module.stage))]
pub fn serialize(module: &Module) -> Vec<u8> {
    let mut ser = Serializer {
        module,
        out: Vec::new(),
    };
    ser.module();
    ser.out
}

struct Serializer<'a> {
    module: &'a Module,
    out: Vec<u8>,
}

impl Serializer<'_> {
    // ===== primitives =====

    fn u8(&mut self, v: u8) {
        self.out.push(v);
    }

    fn u32(&mut self, v: u32) {
        self.out.extend_from_slice(&v.to_le_bytes());
    }

    fn i32(&mut self, v: i32) {
        self.out.extend_from_slice(&v.to_le_bytes());
    }

    fn f32(&mut self, v: f32) {
        self.out.extend_from_slice(&v.to_le_bytes());
    }

    fn bool(&mut self, v: bool) {
        self.u8(u8::from(v));
    }

    fn string(&mut self, s: &str) {
        self.u32(s.len() as u32);
        self.out.extend_from_slice(s.as_bytes());
    }

    fn opt_u32(&mut self, v: Option<u32>) {
        self.bool(v.is_some());
        if let Some(v) = v {
            self.u32(v);
        }
    }

    // ===== types =====

    fn ty(&mut self, ty: &ExpressionType) {
        match type_tag(ty) {
            Some(tag) => {
                self.u8(TYPE_DISC_CONCRETE);
                self.u32(tag);
            }
            None => {
                self.u8(TYPE_DISC_NAMED);
                if let ExpressionType::Named(name) = ty {
                    self.string(name);
                }
            }
        }
    }

    // ===== module layout =====

    fn module(&mut self) {
        let module = self.module;

        self.u32(MAGIC);
        self.u32(CURRENT_VERSION);
        self.u32(kind::stage_tag(module.stage));

        self.u32(module.conditions.len() as u32);
        for condition in &module.conditions {
            self.string(condition);
        }

        self.u32(module.structs.len() as u32);
        for description in &module.structs {
            self.struct_description(description);
        }

        for list in [&module.inputs, &module.outputs] {
            self.u32(list.len() as u32);
            for io in list.iter() {
                self.string(&io.name);
                self.ty(&io.ty);
                self.opt_u32(io.location);
            }
        }

        self.u32(module.uniforms.len() as u32);
        for uniform in &module.uniforms {
            self.string(&uniform.name);
            self.ty(&uniform.ty);
            self.opt_u32(uniform.binding);
            self.bool(uniform.layout.is_some());
            if let Some(layout) = uniform.layout {
                self.u32(kind::layout_tag(layout));
            }
        }

        self.u32(module.functions.len() as u32);
        for function in &module.functions {
            self.string(&function.name);
            self.ty(&function.return_type);
            self.u32(function.parameters.len() as u32);
            for parameter in &function.parameters {
                self.string(&parameter.name);
                self.ty(&parameter.ty);
            }
            self.stmt(function.body);
        }
    }

    fn struct_description(&mut self, description: &StructDescription) {
        self.string(&description.name);
        self.u32(description.members.len() as u32);
        for member in &description.members {
            self.string(&member.name);
            self.ty(&member.ty);
        }
    }

    fn attributes(&mut self, attributes: &[Attribute]) {
        self.u32(attributes.len() as u32);
        for attribute in attributes {
            self.u32(kind::attribute_kind_tag(attribute.kind));
            self.string(&attribute.value);
        }
    }

    // ===== nodes =====

    fn opt_expr(&mut self, id: Option<ExprId>) {
        match id {
            Some(id) => self.expr(id),
            None => self.i32(kind::NODE_NONE),
        }
    }

    fn opt_stmt(&mut self, id: Option<StmtId>) {
        match id {
            Some(id) => self.stmt(id),
            None => self.i32(kind::NODE_NONE),
        }
    }

    fn expr(&mut self, id: ExprId) {
        match self.module.arena.expr(id).kind.clone() {
            ExprKind::AccessMember { expr, member_path } => {
                self.i32(kind::NODE_ACCESS_MEMBER);
                self.expr(expr);
                self.u32(member_path.len() as u32);
                for segment in &member_path {
                    self.string(segment);
                }
            }

            ExprKind::Assign { op, left, right } => {
                self.i32(kind::NODE_ASSIGN);
                self.u32(kind::assign_op_tag(op));
                self.expr(left);
                self.expr(right);
            }

            ExprKind::Binary { op, left, right } => {
                self.i32(kind::NODE_BINARY);
                self.u32(kind::binary_op_tag(op));
                self.expr(left);
                self.expr(right);
            }

            ExprKind::Cast {
                target,
                expressions,
            } => {
                self.i32(kind::NODE_CAST);
                self.ty(&target);
                for slot in expressions {
                    self.opt_expr(slot.is_valid().then_some(slot));
                }
            }

            ExprKind::Conditional {
                condition,
                true_path,
                false_path,
            } => {
                self.i32(kind::NODE_CONDITIONAL_EXPR);
                self.string(&condition);
                self.expr(true_path);
                self.expr(false_path);
            }

            ExprKind::Constant(value) => {
                self.i32(kind::NODE_CONSTANT);
                self.constant(&value);
            }

            ExprKind::Identifier(name) => {
                self.i32(kind::NODE_IDENTIFIER);
                self.string(&name);
            }

            ExprKind::Intrinsic {
                intrinsic,
                parameters,
            } => {
                self.i32(kind::NODE_INTRINSIC);
                self.u32(kind::intrinsic_tag(intrinsic));
                self.u32(parameters.len() as u32);
                for parameter in parameters {
                    self.expr(parameter);
                }
            }

            ExprKind::Swizzle {
                expr,
                components,
                component_count,
            } => {
                self.i32(kind::NODE_SWIZZLE);
                self.expr(expr);
                self.u32(component_count);
                for component in &components[..component_count as usize] {
                    self.u32(component.index());
                }
            }
        }
    }

    fn constant(&mut self, value: &ConstantValue) {
        self.u32(value.kind_index());
        match value {
            ConstantValue::Bool(b) => self.bool(*b),
            ConstantValue::Float32(v) => self.f32(*v),
            ConstantValue::Int32(v) => self.i32(*v),
            ConstantValue::UInt32(v) => self.u32(*v),
            ConstantValue::Vec2F32(v) => v.iter().for_each(|c| self.f32(*c)),
            ConstantValue::Vec3F32(v) => v.iter().for_each(|c| self.f32(*c)),
            ConstantValue::Vec4F32(v) => v.iter().for_each(|c| self.f32(*c)),
            ConstantValue::Vec2I32(v) => v.iter().for_each(|c| self.i32(*c)),
            ConstantValue::Vec3I32(v) => v.iter().for_each(|c| self.i32(*c)),
            ConstantValue::Vec4I32(v) => v.iter().for_each(|c| self.i32(*c)),
        }
    }

    fn variable(&mut self, variable: &Variable) {
        self.i32(kind::variable_kind_tag(variable.kind()));
        match variable {
            Variable::Builtin { entry, ty } => {
                self.u32(kind::builtin_tag(*entry));
                self.ty(ty);
            }
            Variable::Input { name, ty }
            | Variable::Local { name, ty }
            | Variable::Output { name, ty }
            | Variable::Parameter { name, ty }
            | Variable::Uniform { name, ty } => {
                self.string(name);
                self.ty(ty);
            }
        }
    }

    fn stmt(&mut self, id: StmtId) {
        match self.module.arena.stmt(id).clone() {
            StmtKind::Block(statements) => {
                self.i32(kind::NODE_BLOCK);
                self.u32(statements.len() as u32);
                for statement in statements {
                    self.stmt(statement);
                }
            }

            StmtKind::Branch {
                arms,
                else_statement,
            } => {
                self.i32(kind::NODE_BRANCH);
                self.u32(arms.len() as u32);
                for arm in arms {
                    self.expr(arm.condition);
                    self.stmt(arm.statement);
                }
                self.opt_stmt(else_statement);
            }

            StmtKind::Conditional {
                condition,
                statement,
            } => {
                self.i32(kind::NODE_CONDITIONAL_STMT);
                self.string(&condition);
                self.stmt(statement);
            }

            StmtKind::DeclareExternal(vars) => {
                self.i32(kind::NODE_DECLARE_EXTERNAL);
                self.u32(vars.len() as u32);
                for var in &vars {
                    self.string(&var.name);
                    self.ty(&var.ty);
                    self.attributes(&var.attributes);
                }
            }

            StmtKind::DeclareFunction {
                name,
                attributes,
                parameters,
                return_type,
                body,
            } => {
                self.i32(kind::NODE_DECLARE_FUNCTION);
                self.string(&name);
                self.attributes(&attributes);
                self.u32(parameters.len() as u32);
                for parameter in &parameters {
                    self.string(&parameter.name);
                    self.ty(&parameter.ty);
                }
                self.ty(&return_type);
                self.stmt(body);
            }

            StmtKind::DeclareStruct(description) => {
                self.i32(kind::NODE_DECLARE_STRUCT);
                self.struct_description(&description);
            }

            StmtKind::DeclareVariable { variable, initial } => {
                self.i32(kind::NODE_DECLARE_VARIABLE);
                self.variable(&variable);
                self.opt_expr(initial);
            }

            StmtKind::Discard => self.i32(kind::NODE_DISCARD),

            StmtKind::Expression(expr) => {
                self.i32(kind::NODE_EXPRESSION);
                self.expr(expr);
            }

            StmtKind::NoOp => self.i32(kind::NODE_NO_OP),

            StmtKind::Return(value) => {
                self.i32(kind::NODE_RETURN);
                self.opt_expr(value);
            }
        }
    }
}
