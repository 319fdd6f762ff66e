//! Bottom-up expression typing.
//!
//! Children are typed before their parent; every computed type is cached
//! on the node before being returned. All operand types are alias-resolved
//! before any rule fires, so the cached result is always alias-free.

use lux_ir::{
    AstArena, BinaryOp, ExprId, ExprKind, ExpressionType, IntrinsicKind, PrimitiveType,
};

use crate::category::{classify, ExpressionCategory};
use crate::error::{ErrorKind, ValidationError};
use crate::scope::Binding;
use crate::Context;

/// Type an expression, caching the result on the node.
pub(crate) fn validate_expr(
    arena: &mut AstArena,
    ctx: &mut Context,
    id: ExprId,
) -> Result<ExpressionType, ValidationError> {
    let kind = arena.expr(id).kind.clone();

    let ty = match kind {
        ExprKind::Constant(value) => value.type_of(),

        ExprKind::Identifier(name) => match ctx.scope.find_identifier(&name) {
            Some(Binding::Variable(var)) => {
                let declared = var.ty().clone();
                resolve(ctx, id, declared)?
            }
            _ => return Err(ValidationError::at_expr(ErrorKind::UnknownIdentifier(name), id)),
        },

        ExprKind::AccessMember { expr, member_path } => {
            let base = validate_expr(arena, ctx, expr)?;
            access_member_type(ctx, id, base, &member_path)?
        }

        ExprKind::Assign { op: _, left, right } => {
            let left_ty = validate_expr(arena, ctx, left)?;
            let right_ty = validate_expr(arena, ctx, right)?;

            if classify(arena, left) != ExpressionCategory::LValue {
                return Err(ValidationError::at_expr(ErrorKind::NotAnLValue, id));
            }
            if left_ty != right_ty {
                return Err(ValidationError::at_expr(
                    ErrorKind::TypeMismatch {
                        left: left_ty,
                        right: right_ty,
                    },
                    id,
                ));
            }
            right_ty
        }

        ExprKind::Binary { op, left, right } => {
            let left_ty = validate_expr(arena, ctx, left)?;
            let right_ty = validate_expr(arena, ctx, right)?;
            binary_type(ctx, id, op, left_ty, right_ty)?
        }

        ExprKind::Cast {
            target,
            expressions,
        } => {
            let required = target
                .component_count()
                .ok_or_else(|| {
                    ValidationError::at_expr(ErrorKind::InvalidCastTarget(target.clone()), id)
                })?;

            let mut supplied = 0;
            for operand in ExprKind::cast_operands(&expressions) {
                let ty = validate_expr(arena, ctx, operand)?;
                supplied += match resolve(ctx, id, ty)? {
                    ExpressionType::Primitive(_) => 1,
                    ExpressionType::Vector(v) => v.component_count,
                    other => {
                        return Err(ValidationError::at_expr(
                            ErrorKind::InvalidCastOperand(other),
                            id,
                        ))
                    }
                };
            }

            if supplied != required {
                return Err(ValidationError::at_expr(ErrorKind::ComponentCountMismatch, id));
            }
            target
        }

        ExprKind::Conditional {
            condition,
            true_path,
            false_path,
        } => {
            if !ctx.conditions.contains(&condition) {
                return Err(ValidationError::at_expr(
                    ErrorKind::UnknownCondition(condition),
                    id,
                ));
            }

            let true_ty = validate_expr(arena, ctx, true_path)?;
            let false_ty = validate_expr(arena, ctx, false_path)?;
            if true_ty != false_ty {
                return Err(ValidationError::at_expr(
                    ErrorKind::TypeMismatch {
                        left: true_ty,
                        right: false_ty,
                    },
                    id,
                ));
            }
            true_ty
        }

        ExprKind::Intrinsic {
            intrinsic,
            parameters,
        } => {
            let mut param_types = Vec::with_capacity(parameters.len());
            for &param in &parameters {
                let ty = validate_expr(arena, ctx, param)?;
                param_types.push(resolve(ctx, id, ty)?);
            }
            intrinsic_type(id, intrinsic, &param_types)?
        }

        ExprKind::Swizzle {
            expr,
            components,
            component_count,
        } => {
            if component_count > 4 {
                return Err(ValidationError::at_expr(ErrorKind::SwizzleTooLong, id));
            }
            if component_count == 0 {
                return Err(ValidationError::at_expr(ErrorKind::InvalidSwizzle, id));
            }

            let source = validate_expr(arena, ctx, expr)?;
            let source = resolve(ctx, id, source)?;
            let (source_components, base) = match &source {
                ExpressionType::Primitive(p) => (1, *p),
                ExpressionType::Vector(v) => (v.component_count, v.base),
                _ => {
                    return Err(ValidationError::at_expr(ErrorKind::CannotSwizzle(source), id))
                }
            };

            for component in &components[..component_count as usize] {
                if component.index() >= source_components {
                    return Err(ValidationError::at_expr(
                        ErrorKind::SwizzleOutOfRange(source.clone()),
                        id,
                    ));
                }
            }

            if component_count == 1 {
                ExpressionType::Primitive(base)
            } else {
                ExpressionType::vector(component_count, base)
            }
        }
    };

    arena.set_expr_type(id, ty.clone());
    Ok(ty)
}

/// Alias-resolve a type, attaching the node on failure.
fn resolve(
    ctx: &Context,
    id: ExprId,
    ty: ExpressionType,
) -> Result<ExpressionType, ValidationError> {
    ctx.scope
        .resolve_alias(ty)
        .map_err(|kind| ValidationError::at_expr(kind, id))
}

/// Walk a member path through (possibly nested) struct types.
fn access_member_type(
    ctx: &Context,
    id: ExprId,
    base: ExpressionType,
    member_path: &[String],
) -> Result<ExpressionType, ValidationError> {
    let mut struct_name = match resolve(ctx, id, base)? {
        ExpressionType::Named(name) => name,
        _ => return Err(ValidationError::at_expr(ErrorKind::NotAStruct, id)),
    };

    debug_assert!(!member_path.is_empty(), "empty member path");

    let mut result = None;
    for (depth, segment) in member_path.iter().enumerate() {
        let description = match ctx.scope.find_identifier(&struct_name) {
            Some(Binding::Struct(description)) => description,
            _ => {
                return Err(ValidationError::at_expr(
                    ErrorKind::UnknownStruct(struct_name),
                    id,
                ))
            }
        };

        let member_ty = match description.member(segment) {
            Some(member) => member.ty.clone(),
            None => {
                return Err(ValidationError::at_expr(
                    ErrorKind::UnknownField(segment.clone()),
                    id,
                ))
            }
        };

        if depth + 1 < member_path.len() {
            // Intermediate segments must themselves resolve to a struct.
            match resolve(ctx, id, member_ty)? {
                ExpressionType::Named(name) => struct_name = name,
                _ => return Err(ValidationError::at_expr(ErrorKind::NotAStruct, id)),
            }
        } else {
            result = Some(resolve(ctx, id, member_ty)?);
        }
    }

    // The loop always runs at least once.
    result.ok_or_else(|| ValidationError::at_expr(ErrorKind::NotAStruct, id))
}

/// The binary promotion table. Any combination that falls through is a
/// type error; there is no implicit widening anywhere.
fn binary_type(
    ctx: &Context,
    id: ExprId,
    op: BinaryOp,
    left: ExpressionType,
    right: ExpressionType,
) -> Result<ExpressionType, ValidationError> {
    let left = resolve(ctx, id, left)?;
    let right = resolve(ctx, id, right)?;

    let invalid = |left: ExpressionType, right: ExpressionType| {
        ValidationError::at_expr(ErrorKind::InvalidBinaryOperands { op, left, right }, id)
    };

    match (&left, op) {
        // ===== Primitive left-hand side =====
        (ExpressionType::Primitive(p), _) if op.is_ordering() => {
            if *p == PrimitiveType::Boolean {
                return Err(ValidationError::at_expr(ErrorKind::BooleanOperand, id));
            }
            if right != left {
                return Err(invalid(left, right));
            }
            Ok(ExpressionType::Primitive(PrimitiveType::Boolean))
        }

        (
            ExpressionType::Primitive(_),
            BinaryOp::Add | BinaryOp::Subtract | BinaryOp::CompEq | BinaryOp::CompNe,
        ) => {
            if right != left {
                return Err(invalid(left, right));
            }
            Ok(left)
        }

        (ExpressionType::Primitive(p), BinaryOp::Multiply | BinaryOp::Divide) => {
            if *p == PrimitiveType::Boolean {
                return Err(ValidationError::at_expr(ErrorKind::BooleanOperand, id));
            }
            // Identical primitive, or broadcast over a vector/matrix of
            // the same base; the result takes the right-hand type.
            let compatible = match &right {
                ExpressionType::Primitive(_)
                | ExpressionType::Vector(_)
                | ExpressionType::Matrix(_) => right.base() == Some(*p),
                _ => false,
            };
            if !compatible {
                return Err(invalid(left, right));
            }
            Ok(right)
        }

        // ===== Matrix left-hand side =====
        (ExpressionType::Matrix(_), _) if op.is_comparison() => {
            if right != left {
                return Err(invalid(left, right));
            }
            Ok(ExpressionType::Primitive(PrimitiveType::Boolean))
        }

        (ExpressionType::Matrix(_), BinaryOp::Add | BinaryOp::Subtract) => {
            if right != left {
                return Err(invalid(left, right));
            }
            Ok(left)
        }

        (ExpressionType::Matrix(m), BinaryOp::Multiply | BinaryOp::Divide) => match &right {
            ExpressionType::Matrix(_) if right == left => Ok(left),
            ExpressionType::Primitive(p) if *p == m.base => Ok(left),
            ExpressionType::Vector(v) if v.base == m.base && v.component_count == m.column_count => {
                Ok(right)
            }
            _ => Err(invalid(left, right)),
        },

        // ===== Vector left-hand side =====
        (ExpressionType::Vector(_), _) if op.is_comparison() => {
            if right != left {
                return Err(invalid(left, right));
            }
            Ok(ExpressionType::Primitive(PrimitiveType::Boolean))
        }

        (ExpressionType::Vector(_), BinaryOp::Add | BinaryOp::Subtract) => {
            if right != left {
                return Err(invalid(left, right));
            }
            Ok(left)
        }

        (ExpressionType::Vector(v), BinaryOp::Multiply | BinaryOp::Divide) => match &right {
            ExpressionType::Primitive(p) if *p == v.base => Ok(right),
            ExpressionType::Vector(_) if right == left => Ok(right),
            _ => Err(invalid(left, right)),
        },

        // Samplers and named types support no binary operation.
        _ => Err(invalid(left, right)),
    }
}

/// Intrinsic signature rules.
fn intrinsic_type(
    id: ExprId,
    intrinsic: IntrinsicKind,
    param_types: &[ExpressionType],
) -> Result<ExpressionType, ValidationError> {
    let arity = |expected: usize| -> Result<(), ValidationError> {
        if param_types.len() != expected {
            return Err(ValidationError::at_expr(
                ErrorKind::IntrinsicArity {
                    expected,
                    found: param_types.len(),
                },
                id,
            ));
        }
        Ok(())
    };

    match intrinsic {
        IntrinsicKind::CrossProduct | IntrinsicKind::DotProduct => {
            arity(2)?;
            if param_types[0] != param_types[1] {
                return Err(ValidationError::at_expr(ErrorKind::IntrinsicParamMismatch, id));
            }

            match intrinsic {
                IntrinsicKind::CrossProduct => {
                    if param_types[0] != ExpressionType::vector(3, PrimitiveType::Float32) {
                        return Err(ValidationError::at_expr(
                            ErrorKind::InvalidCrossProductOperand,
                            id,
                        ));
                    }
                    Ok(param_types[0].clone())
                }
                _ => match &param_types[0] {
                    ExpressionType::Vector(v) => Ok(ExpressionType::Primitive(v.base)),
                    _ => Err(ValidationError::at_expr(
                        ErrorKind::InvalidDotProductOperand,
                        id,
                    )),
                },
            }
        }

        IntrinsicKind::SampleTexture => {
            arity(2)?;
            let sampler = match &param_types[0] {
                ExpressionType::Sampler(s) => *s,
                _ => return Err(ValidationError::at_expr(ErrorKind::ExpectedSampler, id)),
            };
            if !param_types[1].is_vector() {
                return Err(ValidationError::at_expr(ErrorKind::ExpectedCoordinates, id));
            }
            Ok(ExpressionType::vector(4, sampler.sampled_type))
        }
    }
}
