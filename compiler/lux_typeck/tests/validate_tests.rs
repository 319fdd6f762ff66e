//! End-to-end validation tests over hand-built modules.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use lux_ir::{
    build, AstArena, Attribute, AttributeKind, BinaryOp, ConstantValue, ExpressionType, ExternalVar,
    Function, InputOutput, IntrinsicKind, Module, Parameter, PrimitiveType, ShaderStage, StmtKind,
    StructDescription, StructMember, SwizzleComponent, Uniform, Variable,
};
use lux_typeck::{validate, validate_statement, ErrorKind, ValidationError};
use pretty_assertions::assert_eq;

fn f32_ty() -> ExpressionType {
    ExpressionType::Primitive(PrimitiveType::Float32)
}

fn vec_ty(n: u32) -> ExpressionType {
    ExpressionType::vector(n, PrimitiveType::Float32)
}

fn error_kind(result: Result<(), ValidationError>) -> ErrorKind {
    result.unwrap_err().kind
}

/// Module with one non-entry function wrapping the given body statements.
fn module_with_body(
    build_body: impl FnOnce(&mut AstArena) -> Vec<lux_ir::StmtId>,
) -> Module {
    let mut module = Module::new(ShaderStage::Fragment);
    let statements = build_body(&mut module.arena);
    let body = build::block(&mut module.arena, statements);
    module.functions.push(Function {
        name: "main".to_owned(),
        return_type: f32_ty(),
        parameters: Vec::new(),
        body,
    });
    module
}

// ===== expression typing =====

#[test]
fn arithmetic_types_and_caches() {
    let mut module = module_with_body(|arena| {
        let a = build::constant(arena, ConstantValue::Float32(1.0));
        let b = build::constant(arena, ConstantValue::Float32(2.0));
        let sum = build::binary(arena, BinaryOp::Add, a, b);
        vec![build::declare_local(arena, "x", f32_ty(), Some(sum))]
    });

    validate(&mut module).unwrap();

    // Every expression carries a cached type after validation.
    for index in 0..module.arena.expr_count() {
        let id = lux_ir::ExprId::new(index as u32);
        assert!(module.arena.expr_type(id).is_some(), "uncached {id:?}");
    }
}

#[test]
fn vector_times_scalar_takes_the_scalar_type() {
    let mut module = module_with_body(|arena| {
        let v = build::constant(arena, ConstantValue::Vec3F32([1.0, 2.0, 3.0]));
        let s = build::constant(arena, ConstantValue::Float32(2.0));
        let product = build::binary(arena, BinaryOp::Multiply, v, s);
        vec![build::declare_local(arena, "x", f32_ty(), Some(product))]
    });
    validate(&mut module).unwrap();
}

#[test]
fn scalar_times_vector_broadcasts() {
    let mut module = module_with_body(|arena| {
        let s = build::constant(arena, ConstantValue::Float32(2.0));
        let v = build::constant(arena, ConstantValue::Vec3F32([1.0, 2.0, 3.0]));
        let product = build::binary(arena, BinaryOp::Multiply, s, v);
        vec![build::declare_local(arena, "x", vec_ty(3), Some(product))]
    });
    validate(&mut module).unwrap();
}

#[test]
fn vector_addition_keeps_the_operand_type() {
    let mut module = module_with_body(|arena| {
        let a = build::constant(arena, ConstantValue::Vec3F32([1.0, 2.0, 3.0]));
        let b = build::constant(arena, ConstantValue::Vec3F32([4.0, 5.0, 6.0]));
        let sum = build::binary(arena, BinaryOp::Add, a, b);
        vec![build::declare_local(arena, "v", vec_ty(3), Some(sum))]
    });
    validate(&mut module).unwrap();
}

#[test]
fn matrix_vector_multiplication_checks_columns() {
    let mat4 = ExpressionType::matrix(4, PrimitiveType::Float32);

    let mut module = module_with_body(|arena| {
        let declare_m = build::declare_local(arena, "m", mat4.clone(), None);
        let declare_v = build::declare_local(arena, "v", vec_ty(4), None);
        let m = build::identifier(arena, "m");
        let v = build::identifier(arena, "v");
        let product = build::binary(arena, BinaryOp::Multiply, m, v);
        let declare_r = build::declare_local(arena, "r", vec_ty(4), Some(product));
        vec![declare_m, declare_v, declare_r]
    });
    validate(&mut module).unwrap();

    let mat4 = ExpressionType::matrix(4, PrimitiveType::Float32);
    let mut module = module_with_body(|arena| {
        let declare_m = build::declare_local(arena, "m", mat4.clone(), None);
        let declare_v = build::declare_local(arena, "v", vec_ty(3), None);
        let m = build::identifier(arena, "m");
        let v = build::identifier(arena, "v");
        let product = build::binary(arena, BinaryOp::Multiply, m, v);
        let bad = build::expr_stmt(arena, product);
        vec![declare_m, declare_v, bad]
    });
    assert!(matches!(
        error_kind(validate(&mut module)),
        ErrorKind::InvalidBinaryOperands { .. }
    ));
}

#[test]
fn mixed_base_operands_are_rejected() {
    let mut module = module_with_body(|arena| {
        let a = build::constant(arena, ConstantValue::Float32(1.0));
        let b = build::constant(arena, ConstantValue::Int32(2));
        let sum = build::binary(arena, BinaryOp::Add, a, b);
        vec![build::expr_stmt(arena, sum)]
    });
    assert!(matches!(
        error_kind(validate(&mut module)),
        ErrorKind::InvalidBinaryOperands { .. }
    ));
}

#[test]
fn boolean_multiplication_is_rejected() {
    let mut module = module_with_body(|arena| {
        let a = build::constant(arena, ConstantValue::Bool(true));
        let b = build::constant(arena, ConstantValue::Bool(false));
        let product = build::binary(arena, BinaryOp::Multiply, a, b);
        vec![build::expr_stmt(arena, product)]
    });
    assert_eq!(error_kind(validate(&mut module)), ErrorKind::BooleanOperand);
}

#[test]
fn comparison_yields_boolean() {
    let mut module = module_with_body(|arena| {
        let a = build::constant(arena, ConstantValue::Int32(1));
        let b = build::constant(arena, ConstantValue::Int32(2));
        let lt = build::binary(arena, BinaryOp::CompLt, a, b);
        vec![build::declare_local(
            arena,
            "ok",
            ExpressionType::Primitive(PrimitiveType::Boolean),
            Some(lt),
        )]
    });
    validate(&mut module).unwrap();
}

#[test]
fn unknown_identifier_is_rejected() {
    let mut module = module_with_body(|arena| {
        let ident = build::identifier(arena, "missing");
        vec![build::expr_stmt(arena, ident)]
    });
    assert_eq!(
        error_kind(validate(&mut module)),
        ErrorKind::UnknownIdentifier("missing".to_owned())
    );
}

#[test]
fn assignment_requires_an_lvalue() {
    let mut module = module_with_body(|arena| {
        let lit = build::constant(arena, ConstantValue::Float32(0.0));
        let rhs = build::constant(arena, ConstantValue::Float32(1.0));
        let assign = build::assign(arena, lit, rhs);
        vec![build::expr_stmt(arena, assign)]
    });
    assert_eq!(error_kind(validate(&mut module)), ErrorKind::NotAnLValue);
}

#[test]
fn assignment_through_a_swizzled_output() {
    let mut module = Module::new(ShaderStage::Fragment);
    module.outputs.push(InputOutput {
        name: "color".to_owned(),
        ty: vec_ty(4),
        location: Some(0),
    });

    let value = build::constant(&mut module.arena, ConstantValue::Float32(1.0));
    let color = build::identifier(&mut module.arena, "color");
    let target = build::swizzle(&mut module.arena, color, &[SwizzleComponent::First]);
    let assign = build::assign(&mut module.arena, target, value);
    let body_stmt = build::expr_stmt(&mut module.arena, assign);
    let body = build::block(&mut module.arena, [body_stmt]);
    module.functions.push(Function {
        name: "main".to_owned(),
        return_type: f32_ty(),
        parameters: Vec::new(),
        body,
    });

    validate(&mut module).unwrap();
}

#[test]
fn member_access_walks_nested_structs() {
    let mut module = Module::new(ShaderStage::Fragment);
    module.structs.push(StructDescription {
        name: "Color".to_owned(),
        members: vec![StructMember {
            name: "rgba".to_owned(),
            ty: vec_ty(4),
        }],
    });
    module.structs.push(StructDescription {
        name: "Light".to_owned(),
        members: vec![StructMember {
            name: "color".to_owned(),
            ty: ExpressionType::Named("Color".to_owned()),
        }],
    });
    module.uniforms.push(Uniform {
        name: "light".to_owned(),
        ty: ExpressionType::Named("Light".to_owned()),
        binding: Some(0),
        layout: None,
    });

    let light = build::identifier(&mut module.arena, "light");
    let rgba = build::access_member(&mut module.arena, light, ["color", "rgba"]);
    let stmt = build::declare_local(&mut module.arena, "c", vec_ty(4), Some(rgba));
    let body = build::block(&mut module.arena, [stmt]);
    module.functions.push(Function {
        name: "main".to_owned(),
        return_type: f32_ty(),
        parameters: Vec::new(),
        body,
    });

    validate(&mut module).unwrap();
}

#[test]
fn unknown_field_is_rejected() {
    let mut module = Module::new(ShaderStage::Fragment);
    module.structs.push(StructDescription {
        name: "Light".to_owned(),
        members: vec![StructMember {
            name: "color".to_owned(),
            ty: vec_ty(4),
        }],
    });
    module.uniforms.push(Uniform {
        name: "light".to_owned(),
        ty: ExpressionType::Named("Light".to_owned()),
        binding: None,
        layout: None,
    });

    let light = build::identifier(&mut module.arena, "light");
    let bad = build::access_member(&mut module.arena, light, ["intensity"]);
    let stmt = build::expr_stmt(&mut module.arena, bad);
    let body = build::block(&mut module.arena, [stmt]);
    module.functions.push(Function {
        name: "main".to_owned(),
        return_type: f32_ty(),
        parameters: Vec::new(),
        body,
    });

    assert_eq!(
        error_kind(validate(&mut module)),
        ErrorKind::UnknownField("intensity".to_owned())
    );
}

#[test]
fn swizzle_bounds_are_checked() {
    let mut module = module_with_body(|arena| {
        let v = build::constant(arena, ConstantValue::Vec2F32([1.0, 2.0]));
        let bad = build::swizzle(arena, v, &[SwizzleComponent::Third]);
        vec![build::expr_stmt(arena, bad)]
    });
    assert!(matches!(
        error_kind(validate(&mut module)),
        ErrorKind::SwizzleOutOfRange(_)
    ));
}

#[test]
fn swizzle_result_types() {
    let mut module = module_with_body(|arena| {
        let v = build::constant(arena, ConstantValue::Vec4F32([1.0, 2.0, 3.0, 4.0]));
        let single = build::swizzle(arena, v, &[SwizzleComponent::Fourth]);
        let pair = build::swizzle(
            arena,
            v,
            &[SwizzleComponent::First, SwizzleComponent::Second],
        );
        vec![
            build::declare_local(arena, "w", f32_ty(), Some(single)),
            build::declare_local(arena, "xy", vec_ty(2), Some(pair)),
        ]
    });
    validate(&mut module).unwrap();
}

#[test]
fn cast_component_counts_must_sum() {
    let mut module = module_with_body(|arena| {
        let xy = build::constant(arena, ConstantValue::Vec2F32([0.0, 1.0]));
        let z = build::constant(arena, ConstantValue::Float32(2.0));
        let ok = build::cast(arena, vec_ty(3), &[xy, z]);
        vec![build::declare_local(arena, "v", vec_ty(3), Some(ok))]
    });
    validate(&mut module).unwrap();

    let mut module = module_with_body(|arena| {
        let xy = build::constant(arena, ConstantValue::Vec2F32([0.0, 1.0]));
        let bad = build::cast(arena, vec_ty(4), &[xy]);
        vec![build::expr_stmt(arena, bad)]
    });
    assert_eq!(
        error_kind(validate(&mut module)),
        ErrorKind::ComponentCountMismatch
    );
}

#[test]
fn intrinsic_signatures() {
    // Cross product demands vec3[f32].
    let mut module = module_with_body(|arena| {
        let a = build::constant(arena, ConstantValue::Vec2F32([1.0, 0.0]));
        let b = build::constant(arena, ConstantValue::Vec2F32([0.0, 1.0]));
        let cross = build::intrinsic(arena, IntrinsicKind::CrossProduct, &[a, b]);
        vec![build::expr_stmt(arena, cross)]
    });
    assert_eq!(
        error_kind(validate(&mut module)),
        ErrorKind::InvalidCrossProductOperand
    );

    // Dot product yields the base scalar.
    let mut module = module_with_body(|arena| {
        let a = build::constant(arena, ConstantValue::Vec3F32([1.0, 0.0, 0.0]));
        let b = build::constant(arena, ConstantValue::Vec3F32([0.0, 1.0, 0.0]));
        let dot = build::intrinsic(arena, IntrinsicKind::DotProduct, &[a, b]);
        vec![build::declare_local(arena, "d", f32_ty(), Some(dot))]
    });
    validate(&mut module).unwrap();
}

#[test]
fn texture_sampling_yields_vec4() {
    let mut module = Module::new(ShaderStage::Fragment);
    module.uniforms.push(Uniform {
        name: "tex".to_owned(),
        ty: ExpressionType::sampler(PrimitiveType::Float32),
        binding: Some(0),
        layout: None,
    });

    let tex = build::identifier(&mut module.arena, "tex");
    let uv = build::constant(&mut module.arena, ConstantValue::Vec2F32([0.5, 0.5]));
    let sample = build::intrinsic(&mut module.arena, IntrinsicKind::SampleTexture, &[tex, uv]);
    let stmt = build::declare_local(&mut module.arena, "texel", vec_ty(4), Some(sample));
    let body = build::block(&mut module.arena, [stmt]);
    module.functions.push(Function {
        name: "main".to_owned(),
        return_type: f32_ty(),
        parameters: Vec::new(),
        body,
    });

    validate(&mut module).unwrap();
}

// ===== statement rules =====

#[test]
fn branch_condition_must_be_boolean() {
    let mut module = module_with_body(|arena| {
        let cond = build::constant(arena, ConstantValue::Int32(1));
        let then = build::no_op(arena);
        vec![build::branch(arena, cond, then, None)]
    });
    assert_eq!(
        error_kind(validate(&mut module)),
        ErrorKind::NonBooleanCondition
    );
}

#[test]
fn conditional_requires_a_declared_condition() {
    let mut module = module_with_body(|arena| {
        let inner = build::no_op(arena);
        vec![build::conditional_stmt(arena, "HAS_FOG", inner)]
    });
    assert_eq!(
        error_kind(validate(&mut module)),
        ErrorKind::UnknownCondition("HAS_FOG".to_owned())
    );

    let mut module = module_with_body(|arena| {
        let inner = build::no_op(arena);
        vec![build::conditional_stmt(arena, "HAS_FOG", inner)]
    });
    module.conditions.push("HAS_FOG".to_owned());
    validate(&mut module).unwrap();
}

#[test]
fn conditional_expression_paths_must_agree() {
    let mut module = module_with_body(|arena| {
        let a = build::constant(arena, ConstantValue::Float32(1.0));
        let b = build::constant(arena, ConstantValue::Int32(1));
        let pick = build::conditional_expr(arena, "HIGH_QUALITY", a, b);
        vec![build::expr_stmt(arena, pick)]
    });
    module.conditions.push("HIGH_QUALITY".to_owned());
    assert!(matches!(
        error_kind(validate(&mut module)),
        ErrorKind::TypeMismatch { .. }
    ));
}

#[test]
fn declared_locals_are_visible_and_scoped() {
    let mut module = module_with_body(|arena| {
        let init = build::constant(arena, ConstantValue::Float32(1.0));
        let declare = build::declare_local(arena, "x", f32_ty(), Some(init));
        let x = build::identifier(arena, "x");
        let two = build::constant(arena, ConstantValue::Float32(2.0));
        let double = build::binary(arena, BinaryOp::Multiply, x, two);
        let use_it = build::declare_local(arena, "y", f32_ty(), Some(double));
        vec![declare, use_it]
    });
    validate(&mut module).unwrap();
}

#[test]
fn initializer_must_match_declared_type() {
    let mut module = module_with_body(|arena| {
        let init = build::constant(arena, ConstantValue::Int32(1));
        vec![build::declare_local(arena, "x", f32_ty(), Some(init))]
    });
    assert!(matches!(
        error_kind(validate(&mut module)),
        ErrorKind::TypeMismatch { .. }
    ));
}

#[test]
fn only_locals_can_be_declared_in_statements() {
    let mut module = module_with_body(|arena| {
        vec![arena.alloc_stmt(StmtKind::DeclareVariable {
            variable: Variable::Input {
                name: "uv".to_owned(),
                ty: vec_ty(2),
            },
            initial: None,
        })]
    });
    assert_eq!(
        error_kind(validate(&mut module)),
        ErrorKind::NonLocalDeclaration
    );
}

#[test]
fn return_type_must_match_the_function() {
    let mut module = module_with_body(|arena| {
        let value = build::constant(arena, ConstantValue::Int32(0));
        vec![build::ret(arena, Some(value))]
    });
    assert!(matches!(
        error_kind(validate(&mut module)),
        ErrorKind::TypeMismatch { .. }
    ));

    let mut module = module_with_body(|arena| {
        let value = build::constant(arena, ConstantValue::Float32(0.0));
        vec![build::ret(arena, Some(value))]
    });
    validate(&mut module).unwrap();
}

// ===== declaration statements (standalone trees) =====

fn external(name: &str, attributes: Vec<Attribute>) -> ExternalVar {
    ExternalVar {
        name: name.to_owned(),
        ty: ExpressionType::sampler(PrimitiveType::Float32),
        attributes,
    }
}

#[test]
fn duplicate_bindings_are_rejected() {
    let mut arena = AstArena::new();
    let stmt = arena.alloc_stmt(StmtKind::DeclareExternal(vec![
        external("a", vec![Attribute::new(AttributeKind::Binding, "0")]),
        external("b", vec![Attribute::new(AttributeKind::Binding, "0")]),
    ]));
    let result = validate_statement(&mut arena, stmt);
    assert_eq!(result.unwrap_err().kind, ErrorKind::DuplicateBinding(0));

    let mut arena = AstArena::new();
    let stmt = arena.alloc_stmt(StmtKind::DeclareExternal(vec![
        external("a", vec![Attribute::new(AttributeKind::Binding, "0")]),
        external("b", vec![Attribute::new(AttributeKind::Binding, "1")]),
    ]));
    validate_statement(&mut arena, stmt).unwrap();
}

#[test]
fn duplicate_external_names_are_rejected() {
    let mut arena = AstArena::new();
    let stmt = arena.alloc_stmt(StmtKind::DeclareExternal(vec![
        external("tex", Vec::new()),
        external("tex", Vec::new()),
    ]));
    let result = validate_statement(&mut arena, stmt);
    assert_eq!(
        result.unwrap_err().kind,
        ErrorKind::DuplicateExternal("tex".to_owned())
    );
}

#[test]
fn binding_value_must_be_an_integer() {
    let mut arena = AstArena::new();
    let stmt = arena.alloc_stmt(StmtKind::DeclareExternal(vec![external(
        "tex",
        vec![Attribute::new(AttributeKind::Binding, "first")],
    )]));
    let result = validate_statement(&mut arena, stmt);
    assert_eq!(
        result.unwrap_err().kind,
        ErrorKind::InvalidAttributeValue("first".to_owned())
    );
}

#[test]
fn layout_must_be_std140() {
    let mut arena = AstArena::new();
    let stmt = arena.alloc_stmt(StmtKind::DeclareExternal(vec![external(
        "block",
        vec![Attribute::new(AttributeKind::Layout, "std430")],
    )]));
    let result = validate_statement(&mut arena, stmt);
    assert_eq!(
        result.unwrap_err().kind,
        ErrorKind::InvalidAttributeValue("std430".to_owned())
    );

    let mut arena = AstArena::new();
    let stmt = arena.alloc_stmt(StmtKind::DeclareExternal(vec![external(
        "block",
        vec![Attribute::new(AttributeKind::Layout, "std140")],
    )]));
    validate_statement(&mut arena, stmt).unwrap();
}

fn declare_function(
    arena: &mut AstArena,
    name: &str,
    attributes: Vec<Attribute>,
    parameters: Vec<Parameter>,
) -> lux_ir::StmtId {
    let inner = build::no_op(arena);
    let body = build::block(arena, [inner]);
    arena.alloc_stmt(StmtKind::DeclareFunction {
        name: name.to_owned(),
        attributes,
        parameters,
        return_type: f32_ty(),
        body,
    })
}

#[test]
fn one_entry_point_per_stage() {
    let mut arena = AstArena::new();
    let entry = vec![Attribute::new(AttributeKind::Entry, "frag")];
    let first = declare_function(&mut arena, "main", entry.clone(), Vec::new());
    let second = declare_function(&mut arena, "main2", entry, Vec::new());
    let root = build::block(&mut arena, [first, second]);
    let result = validate_statement(&mut arena, root);
    assert_eq!(result.unwrap_err().kind, ErrorKind::MultipleEntryPoints);
}

#[test]
fn distinct_stages_may_each_have_an_entry() {
    let mut arena = AstArena::new();
    let vert = declare_function(
        &mut arena,
        "vs",
        vec![Attribute::new(AttributeKind::Entry, "vert")],
        Vec::new(),
    );
    let frag = declare_function(
        &mut arena,
        "fs",
        vec![Attribute::new(AttributeKind::Entry, "frag")],
        Vec::new(),
    );
    let root = build::block(&mut arena, [vert, frag]);
    validate_statement(&mut arena, root).unwrap();
}

#[test]
fn entry_functions_take_at_most_one_parameter() {
    let mut arena = AstArena::new();
    let parameters = vec![
        Parameter {
            name: "a".to_owned(),
            ty: f32_ty(),
        },
        Parameter {
            name: "b".to_owned(),
            ty: f32_ty(),
        },
    ];
    let stmt = declare_function(
        &mut arena,
        "main",
        vec![Attribute::new(AttributeKind::Entry, "frag")],
        parameters,
    );
    let result = validate_statement(&mut arena, stmt);
    assert_eq!(result.unwrap_err().kind, ErrorKind::TooManyEntryParameters);
}

#[test]
fn unknown_entry_keyword_is_rejected() {
    let mut arena = AstArena::new();
    let stmt = declare_function(
        &mut arena,
        "main",
        vec![Attribute::new(AttributeKind::Entry, "geom")],
        Vec::new(),
    );
    let result = validate_statement(&mut arena, stmt);
    assert_eq!(
        result.unwrap_err().kind,
        ErrorKind::InvalidAttributeValue("geom".to_owned())
    );
}

#[test]
fn duplicate_struct_members_are_rejected() {
    let mut arena = AstArena::new();
    let stmt = arena.alloc_stmt(StmtKind::DeclareStruct(StructDescription {
        name: "Light".to_owned(),
        members: vec![
            StructMember {
                name: "color".to_owned(),
                ty: vec_ty(4),
            },
            StructMember {
                name: "color".to_owned(),
                ty: vec_ty(3),
            },
        ],
    }));
    let result = validate_statement(&mut arena, stmt);
    assert_eq!(
        result.unwrap_err().kind,
        ErrorKind::DuplicateMember("color".to_owned())
    );
}

#[test]
fn declared_structs_are_visible_to_later_statements() {
    let mut arena = AstArena::new();
    let declare = arena.alloc_stmt(StmtKind::DeclareStruct(StructDescription {
        name: "Light".to_owned(),
        members: vec![StructMember {
            name: "color".to_owned(),
            ty: vec_ty(4),
        }],
    }));
    let local = build::declare_local(
        &mut arena,
        "light",
        ExpressionType::Named("Light".to_owned()),
        None,
    );
    let light = build::identifier(&mut arena, "light");
    let color = build::access_member(&mut arena, light, ["color"]);
    let use_it = build::declare_local(&mut arena, "c", vec_ty(4), Some(color));
    let root = build::block(&mut arena, [declare, local, use_it]);
    validate_statement(&mut arena, root).unwrap();
}
