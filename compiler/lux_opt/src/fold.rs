//! The constant fold table.
//!
//! One pure function per registered (operator, kind, kind) combination,
//! dispatched by an exhaustive match. Absence of a rule is not an error:
//! the caller leaves the node unfolded. Registered rules:
//!
//! - comparisons and `+`/`-` over same-kind pairs of `f32`, `i32` and
//!   their vec2..vec4 forms; booleans support `==`/`!=` only;
//! - `*`/`/` additionally over every scalar*vector and vector*scalar
//!   pairing of the same base.
//!
//! Integer arithmetic wraps. Integer division by zero (in any component)
//! has no rule and the expression stays unfolded; float division follows
//! IEEE semantics and folds.

use lux_ir::{BinaryOp, ConstantValue};

/// Fold a binary operation over two literals, if a rule is registered.
pub fn binary(op: BinaryOp, lhs: &ConstantValue, rhs: &ConstantValue) -> Option<ConstantValue> {
    use BinaryOp::*;
    use ConstantValue::*;

    let value = match (op, lhs, rhs) {
        // ===== booleans =====
        (CompEq, Bool(a), Bool(b)) => Bool(a == b),
        (CompNe, Bool(a), Bool(b)) => Bool(a != b),

        // ===== f32 scalars =====
        (Add, Float32(a), Float32(b)) => Float32(a + b),
        (Subtract, Float32(a), Float32(b)) => Float32(a - b),
        (Multiply, Float32(a), Float32(b)) => Float32(a * b),
        (Divide, Float32(a), Float32(b)) => Float32(a / b),
        (CompEq, Float32(a), Float32(b)) => Bool(a == b),
        (CompNe, Float32(a), Float32(b)) => Bool(a != b),
        (CompGe, Float32(a), Float32(b)) => Bool(a >= b),
        (CompGt, Float32(a), Float32(b)) => Bool(a > b),
        (CompLe, Float32(a), Float32(b)) => Bool(a <= b),
        (CompLt, Float32(a), Float32(b)) => Bool(a < b),

        // ===== i32 scalars =====
        (Add, Int32(a), Int32(b)) => Int32(a.wrapping_add(*b)),
        (Subtract, Int32(a), Int32(b)) => Int32(a.wrapping_sub(*b)),
        (Multiply, Int32(a), Int32(b)) => Int32(a.wrapping_mul(*b)),
        (Divide, Int32(a), Int32(b)) if *b != 0 => Int32(a.wrapping_div(*b)),
        (CompEq, Int32(a), Int32(b)) => Bool(a == b),
        (CompNe, Int32(a), Int32(b)) => Bool(a != b),
        (CompGe, Int32(a), Int32(b)) => Bool(a >= b),
        (CompGt, Int32(a), Int32(b)) => Bool(a > b),
        (CompLe, Int32(a), Int32(b)) => Bool(a <= b),
        (CompLt, Int32(a), Int32(b)) => Bool(a < b),

        // ===== f32 vectors, same shape =====
        (_, Vec2F32(a), Vec2F32(b)) => fold_float_vectors(op, a, b, Vec2F32)?,
        (_, Vec3F32(a), Vec3F32(b)) => fold_float_vectors(op, a, b, Vec3F32)?,
        (_, Vec4F32(a), Vec4F32(b)) => fold_float_vectors(op, a, b, Vec4F32)?,

        // ===== i32 vectors, same shape =====
        (_, Vec2I32(a), Vec2I32(b)) => fold_int_vectors(op, a, b, Vec2I32)?,
        (_, Vec3I32(a), Vec3I32(b)) => fold_int_vectors(op, a, b, Vec3I32)?,
        (_, Vec4I32(a), Vec4I32(b)) => fold_int_vectors(op, a, b, Vec4I32)?,

        // ===== f32 scalar broadcast over vectors (`*` and `/` only) =====
        (Multiply, Float32(s), Vec2F32(v)) => Vec2F32(v.map(|c| s * c)),
        (Multiply, Float32(s), Vec3F32(v)) => Vec3F32(v.map(|c| s * c)),
        (Multiply, Float32(s), Vec4F32(v)) => Vec4F32(v.map(|c| s * c)),
        (Multiply, Vec2F32(v), Float32(s)) => Vec2F32(v.map(|c| c * s)),
        (Multiply, Vec3F32(v), Float32(s)) => Vec3F32(v.map(|c| c * s)),
        (Multiply, Vec4F32(v), Float32(s)) => Vec4F32(v.map(|c| c * s)),
        (Divide, Float32(s), Vec2F32(v)) => Vec2F32(v.map(|c| s / c)),
        (Divide, Float32(s), Vec3F32(v)) => Vec3F32(v.map(|c| s / c)),
        (Divide, Float32(s), Vec4F32(v)) => Vec4F32(v.map(|c| s / c)),
        (Divide, Vec2F32(v), Float32(s)) => Vec2F32(v.map(|c| c / s)),
        (Divide, Vec3F32(v), Float32(s)) => Vec3F32(v.map(|c| c / s)),
        (Divide, Vec4F32(v), Float32(s)) => Vec4F32(v.map(|c| c / s)),

        // ===== i32 scalar broadcast over vectors (`*` and `/` only) =====
        (Multiply, Int32(s), Vec2I32(v)) => Vec2I32(v.map(|c| s.wrapping_mul(c))),
        (Multiply, Int32(s), Vec3I32(v)) => Vec3I32(v.map(|c| s.wrapping_mul(c))),
        (Multiply, Int32(s), Vec4I32(v)) => Vec4I32(v.map(|c| s.wrapping_mul(c))),
        (Multiply, Vec2I32(v), Int32(s)) => Vec2I32(v.map(|c| c.wrapping_mul(*s))),
        (Multiply, Vec3I32(v), Int32(s)) => Vec3I32(v.map(|c| c.wrapping_mul(*s))),
        (Multiply, Vec4I32(v), Int32(s)) => Vec4I32(v.map(|c| c.wrapping_mul(*s))),
        (Divide, Int32(s), Vec2I32(v)) => Vec2I32(div_int_by_vector(*s, v)?),
        (Divide, Int32(s), Vec3I32(v)) => Vec3I32(div_int_by_vector(*s, v)?),
        (Divide, Int32(s), Vec4I32(v)) => Vec4I32(div_int_by_vector(*s, v)?),
        (Divide, Vec2I32(v), Int32(s)) => Vec2I32(div_int_vector_by(v, *s)?),
        (Divide, Vec3I32(v), Int32(s)) => Vec3I32(div_int_vector_by(v, *s)?),
        (Divide, Vec4I32(v), Int32(s)) => Vec4I32(div_int_vector_by(v, *s)?),

        // No rule registered.
        _ => return None,
    };

    Some(value)
}

/// Same-shape f32 vector rules. Comparisons collapse to one boolean:
/// equality is component-wise, ordering is lexicographic.
fn fold_float_vectors<const N: usize>(
    op: BinaryOp,
    a: &[f32; N],
    b: &[f32; N],
    wrap: fn([f32; N]) -> ConstantValue,
) -> Option<ConstantValue> {
    use BinaryOp::*;
    let folded = match op {
        Add => zip(a, b, |x, y| x + y),
        Subtract => zip(a, b, |x, y| x - y),
        Multiply => zip(a, b, |x, y| x * y),
        Divide => zip(a, b, |x, y| x / y),
        _ => return compare(op, a, b).map(ConstantValue::Bool),
    };
    Some(wrap(folded))
}

/// Same-shape i32 vector rules; arithmetic wraps, division by a zero
/// component disables the fold.
fn fold_int_vectors<const N: usize>(
    op: BinaryOp,
    a: &[i32; N],
    b: &[i32; N],
    wrap: fn([i32; N]) -> ConstantValue,
) -> Option<ConstantValue> {
    use BinaryOp::*;
    let folded = match op {
        Add => zip(a, b, |x, y| x.wrapping_add(y)),
        Subtract => zip(a, b, |x, y| x.wrapping_sub(y)),
        Multiply => zip(a, b, |x, y| x.wrapping_mul(y)),
        Divide => {
            if b.contains(&0) {
                return None;
            }
            zip(a, b, |x, y| x.wrapping_div(y))
        }
        _ => return compare(op, a, b).map(ConstantValue::Bool),
    };
    Some(wrap(folded))
}

fn zip<T: Copy, const N: usize>(a: &[T; N], b: &[T; N], f: impl Fn(T, T) -> T) -> [T; N] {
    std::array::from_fn(|i| f(a[i], b[i]))
}

fn div_int_by_vector<const N: usize>(s: i32, v: &[i32; N]) -> Option<[i32; N]> {
    if v.contains(&0) {
        return None;
    }
    Some(v.map(|c| s.wrapping_div(c)))
}

fn div_int_vector_by<const N: usize>(v: &[i32; N], s: i32) -> Option<[i32; N]> {
    if s == 0 {
        return None;
    }
    Some(v.map(|c| c.wrapping_div(s)))
}

/// Vector comparison: `==`/`!=` component-wise, ordering lexicographic.
fn compare<T: Copy + PartialOrd, const N: usize>(
    op: BinaryOp,
    a: &[T; N],
    b: &[T; N],
) -> Option<bool> {
    use BinaryOp::*;
    let result = match op {
        CompEq => a == b,
        CompNe => a != b,
        CompLt => lex_lt(a, b),
        CompGt => lex_lt(b, a),
        CompLe => !lex_lt(b, a),
        CompGe => !lex_lt(a, b),
        _ => return None,
    };
    Some(result)
}

fn lex_lt<T: Copy + PartialOrd, const N: usize>(a: &[T; N], b: &[T; N]) -> bool {
    for (x, y) in a.iter().zip(b) {
        if x != y {
            return x < y;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn float_addition_folds_exactly() {
        let folded = binary(
            BinaryOp::Add,
            &ConstantValue::Float32(0.1),
            &ConstantValue::Float32(0.2),
        );
        assert_eq!(folded, Some(ConstantValue::Float32(0.1 + 0.2)));
    }

    #[test]
    fn int_arithmetic_wraps() {
        let folded = binary(
            BinaryOp::Add,
            &ConstantValue::Int32(i32::MAX),
            &ConstantValue::Int32(1),
        );
        assert_eq!(folded, Some(ConstantValue::Int32(i32::MIN)));
    }

    #[test]
    fn integer_division_by_zero_has_no_rule() {
        assert_eq!(
            binary(
                BinaryOp::Divide,
                &ConstantValue::Int32(1),
                &ConstantValue::Int32(0)
            ),
            None
        );
        assert_eq!(
            binary(
                BinaryOp::Divide,
                &ConstantValue::Vec2I32([4, 4]),
                &ConstantValue::Vec2I32([2, 0])
            ),
            None
        );
    }

    #[test]
    fn float_division_by_zero_folds_to_infinity() {
        let folded = binary(
            BinaryOp::Divide,
            &ConstantValue::Float32(1.0),
            &ConstantValue::Float32(0.0),
        );
        assert_eq!(folded, Some(ConstantValue::Float32(f32::INFINITY)));
    }

    #[test]
    fn scalar_vector_broadcast() {
        let folded = binary(
            BinaryOp::Multiply,
            &ConstantValue::Float32(2.0),
            &ConstantValue::Vec3F32([1.0, 2.0, 3.0]),
        );
        assert_eq!(folded, Some(ConstantValue::Vec3F32([2.0, 4.0, 6.0])));

        let folded = binary(
            BinaryOp::Divide,
            &ConstantValue::Vec2I32([8, 6]),
            &ConstantValue::Int32(2),
        );
        assert_eq!(folded, Some(ConstantValue::Vec2I32([4, 3])));
    }

    #[test]
    fn vector_comparisons_collapse_to_booleans() {
        let a = ConstantValue::Vec2F32([1.0, 2.0]);
        let b = ConstantValue::Vec2F32([1.0, 3.0]);
        assert_eq!(
            binary(BinaryOp::CompEq, &a, &b),
            Some(ConstantValue::Bool(false))
        );
        assert_eq!(
            binary(BinaryOp::CompLt, &a, &b),
            Some(ConstantValue::Bool(true))
        );
    }

    #[test]
    fn booleans_only_support_equality() {
        let t = ConstantValue::Bool(true);
        let f = ConstantValue::Bool(false);
        assert_eq!(binary(BinaryOp::CompNe, &t, &f), Some(ConstantValue::Bool(true)));
        assert_eq!(binary(BinaryOp::Add, &t, &f), None);
    }

    #[test]
    fn mixed_kinds_have_no_rule() {
        assert_eq!(
            binary(
                BinaryOp::Add,
                &ConstantValue::Float32(1.0),
                &ConstantValue::Int32(1)
            ),
            None
        );
        assert_eq!(
            binary(
                BinaryOp::Add,
                &ConstantValue::UInt32(1),
                &ConstantValue::UInt32(1)
            ),
            None
        );
    }
}
