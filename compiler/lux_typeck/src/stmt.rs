//! Statement validation.
//!
//! Statements are walked in order; declarations register bindings in the
//! scope as they are encountered, so later statements see earlier names.

use lux_ir::{
    AstArena, Attribute, AttributeKind, ExprId, ExpressionType, PrimitiveType, ShaderStage,
    StmtId, StmtKind, Variable,
};

use crate::error::{ErrorKind, ValidationError};
use crate::expr::validate_expr;
use crate::scope::Binding;
use crate::Context;

/// Validate one statement and everything below it.
pub(crate) fn validate_stmt(
    arena: &mut AstArena,
    ctx: &mut Context,
    id: StmtId,
) -> Result<(), ValidationError> {
    let kind = arena.stmt(id).clone();

    match kind {
        StmtKind::Block(statements) => {
            ctx.scope.push();
            for statement in statements {
                validate_stmt(arena, ctx, statement)?;
            }
            ctx.scope.pop();
        }

        StmtKind::Branch {
            arms,
            else_statement,
        } => {
            for arm in arms {
                expect_boolean(arena, ctx, arm.condition)?;
                validate_stmt(arena, ctx, arm.statement)?;
            }
            if let Some(else_statement) = else_statement {
                validate_stmt(arena, ctx, else_statement)?;
            }
        }

        StmtKind::Conditional {
            condition,
            statement,
        } => {
            if !ctx.conditions.contains(&condition) {
                return Err(ValidationError::at_stmt(
                    ErrorKind::UnknownCondition(condition),
                    id,
                ));
            }
            validate_stmt(arena, ctx, statement)?;
        }

        StmtKind::DeclareExternal(vars) => {
            for var in vars {
                if !ctx.declared_externals.insert(var.name.clone()) {
                    return Err(ValidationError::at_stmt(
                        ErrorKind::DuplicateExternal(var.name),
                        id,
                    ));
                }

                if let Some(binding) = parse_binding(&var.attributes, id)? {
                    if !ctx.used_bindings.insert(binding) {
                        return Err(ValidationError::at_stmt(
                            ErrorKind::DuplicateBinding(binding),
                            id,
                        ));
                    }
                }
                check_layout(&var.attributes, id)?;

                ctx.scope.declare(
                    var.name.clone(),
                    Binding::Variable(Variable::Uniform {
                        name: var.name,
                        ty: var.ty,
                    }),
                );
            }
        }

        StmtKind::DeclareFunction {
            name,
            attributes,
            parameters,
            return_type,
            body,
        } => {
            if let Some(stage) = parse_entry(&attributes, id)? {
                let slot = &mut ctx.entry_functions[stage.index()];
                if slot.is_some() {
                    return Err(ValidationError::at_stmt(ErrorKind::MultipleEntryPoints, id));
                }
                if parameters.len() > 1 {
                    return Err(ValidationError::at_stmt(
                        ErrorKind::TooManyEntryParameters,
                        id,
                    ));
                }
                *slot = Some(name);
            }

            ctx.scope.push();
            for parameter in parameters {
                ctx.scope.declare(
                    parameter.name.clone(),
                    Binding::Variable(Variable::Parameter {
                        name: parameter.name,
                        ty: parameter.ty,
                    }),
                );
            }

            let outer_return = ctx.current_return.replace(return_type);
            let result = validate_stmt(arena, ctx, body);
            ctx.current_return = outer_return;
            ctx.scope.pop();
            result?;
        }

        StmtKind::DeclareStruct(description) => {
            let mut seen = rustc_hash::FxHashSet::default();
            for member in &description.members {
                if !seen.insert(member.name.as_str()) {
                    return Err(ValidationError::at_stmt(
                        ErrorKind::DuplicateMember(member.name.clone()),
                        id,
                    ));
                }
            }
            ctx.scope
                .declare(description.name.clone(), Binding::Struct(description));
        }

        StmtKind::DeclareVariable { variable, initial } => {
            let (name, declared) = match &variable {
                Variable::Local { name, ty } => (name.clone(), ty.clone()),
                _ => return Err(ValidationError::at_stmt(ErrorKind::NonLocalDeclaration, id)),
            };

            if let Some(initial) = initial {
                let initial_ty = validate_expr(arena, ctx, initial)?;
                let declared_resolved = ctx
                    .scope
                    .resolve_alias(declared.clone())
                    .map_err(|kind| ValidationError::at_stmt(kind, id))?;
                if initial_ty != declared_resolved {
                    return Err(ValidationError::at_stmt(
                        ErrorKind::TypeMismatch {
                            left: declared_resolved,
                            right: initial_ty,
                        },
                        id,
                    ));
                }
            }

            ctx.scope.declare(name, Binding::Variable(variable));
        }

        StmtKind::Expression(expr) => {
            validate_expr(arena, ctx, expr)?;
        }

        StmtKind::Return(value) => {
            if let Some(value) = value {
                let value_ty = validate_expr(arena, ctx, value)?;
                if let Some(expected) = ctx.current_return.clone() {
                    let expected = ctx
                        .scope
                        .resolve_alias(expected)
                        .map_err(|kind| ValidationError::at_stmt(kind, id))?;
                    if value_ty != expected {
                        return Err(ValidationError::at_stmt(
                            ErrorKind::TypeMismatch {
                                left: expected,
                                right: value_ty,
                            },
                            id,
                        ));
                    }
                }
            }
        }

        StmtKind::Discard | StmtKind::NoOp => {}
    }

    Ok(())
}

fn expect_boolean(
    arena: &mut AstArena,
    ctx: &mut Context,
    condition: ExprId,
) -> Result<(), ValidationError> {
    let ty = validate_expr(arena, ctx, condition)?;
    if ty != ExpressionType::Primitive(PrimitiveType::Boolean) {
        return Err(ValidationError::at_expr(
            ErrorKind::NonBooleanCondition,
            condition,
        ));
    }
    Ok(())
}

/// Extract the binding index of an external variable, if any.
fn parse_binding(
    attributes: &[Attribute],
    id: StmtId,
) -> Result<Option<u32>, ValidationError> {
    let mut binding = None;
    for attribute in attributes {
        if attribute.kind != AttributeKind::Binding {
            continue;
        }
        if binding.is_some() {
            return Err(ValidationError::at_stmt(
                ErrorKind::DuplicateAttribute(AttributeKind::Binding),
                id,
            ));
        }
        let value = attribute.value.parse::<u32>().map_err(|_| {
            ValidationError::at_stmt(
                ErrorKind::InvalidAttributeValue(attribute.value.clone()),
                id,
            )
        })?;
        binding = Some(value);
    }
    Ok(binding)
}

/// Layout attributes on externals must name a supported layout.
fn check_layout(attributes: &[Attribute], id: StmtId) -> Result<(), ValidationError> {
    let mut seen = false;
    for attribute in attributes {
        if attribute.kind != AttributeKind::Layout {
            continue;
        }
        if seen {
            return Err(ValidationError::at_stmt(
                ErrorKind::DuplicateAttribute(AttributeKind::Layout),
                id,
            ));
        }
        if attribute.value != "std140" {
            return Err(ValidationError::at_stmt(
                ErrorKind::InvalidAttributeValue(attribute.value.clone()),
                id,
            ));
        }
        seen = true;
    }
    Ok(())
}

/// Extract and parse the entry-stage attribute of a function, if any.
fn parse_entry(
    attributes: &[Attribute],
    id: StmtId,
) -> Result<Option<ShaderStage>, ValidationError> {
    let mut entry = None;
    for attribute in attributes {
        if attribute.kind != AttributeKind::Entry {
            continue;
        }
        if entry.is_some() {
            return Err(ValidationError::at_stmt(
                ErrorKind::DuplicateAttribute(AttributeKind::Entry),
                id,
            ));
        }
        let stage = ShaderStage::from_entry_keyword(&attribute.value).ok_or_else(|| {
            ValidationError::at_stmt(
                ErrorKind::InvalidAttributeValue(attribute.value.clone()),
                id,
            )
        })?;
        entry = Some(stage);
    }
    Ok(entry)
}
