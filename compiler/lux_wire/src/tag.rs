//! Compact numeric tags for concrete types.
//!
//! Every concrete (non-named) type maps bijectively onto a `u32` below 32:
//!
//! ```text
//!  0..= 3   primitives (bool, f32, i32, u32)
//!  4..=15   vec2..vec4 over each primitive
//! 16..=27   mat2..mat4 over each primitive
//! 28..=31   samplers over each primitive
//! ```
//!
//! Named types are not taggable; the wire format writes them as strings
//! under a separate discriminator.

use lux_ir::{ExpressionType, PrimitiveType};

use crate::error::WireError;

const VECTOR_BASE: u32 = 4;
const MATRIX_BASE: u32 = 16;
const SAMPLER_BASE: u32 = 28;
const TAG_LIMIT: u32 = 32;

const fn primitive_tag(p: PrimitiveType) -> u32 {
    match p {
        PrimitiveType::Boolean => 0,
        PrimitiveType::Float32 => 1,
        PrimitiveType::Int32 => 2,
        PrimitiveType::UInt32 => 3,
    }
}

const fn primitive_from_tag(tag: u32) -> Option<PrimitiveType> {
    match tag {
        0 => Some(PrimitiveType::Boolean),
        1 => Some(PrimitiveType::Float32),
        2 => Some(PrimitiveType::Int32),
        3 => Some(PrimitiveType::UInt32),
        _ => None,
    }
}

/// Tag of a concrete type; `None` for named types.
pub(crate) fn type_tag(ty: &ExpressionType) -> Option<u32> {
    let tag = match ty {
        ExpressionType::Primitive(p) => primitive_tag(*p),
        ExpressionType::Vector(v) => {
            VECTOR_BASE + (v.component_count - 2) * 4 + primitive_tag(v.base)
        }
        ExpressionType::Matrix(m) => {
            MATRIX_BASE + (m.column_count - 2) * 4 + primitive_tag(m.base)
        }
        ExpressionType::Sampler(s) => SAMPLER_BASE + primitive_tag(s.sampled_type),
        ExpressionType::Named(_) => return None,
    };
    Some(tag)
}

/// Type for a tag; tags at or above 32 are invalid.
pub(crate) fn type_from_tag(tag: u32) -> Result<ExpressionType, WireError> {
    if tag >= TAG_LIMIT {
        return Err(WireError::tag("type", tag));
    }

    let ty = if tag < VECTOR_BASE {
        match primitive_from_tag(tag) {
            Some(p) => ExpressionType::Primitive(p),
            None => return Err(WireError::tag("type", tag)),
        }
    } else if tag < MATRIX_BASE {
        let offset = tag - VECTOR_BASE;
        match primitive_from_tag(offset % 4) {
            Some(base) => ExpressionType::vector(offset / 4 + 2, base),
            None => return Err(WireError::tag("type", tag)),
        }
    } else if tag < SAMPLER_BASE {
        let offset = tag - MATRIX_BASE;
        match primitive_from_tag(offset % 4) {
            Some(base) => ExpressionType::matrix(offset / 4 + 2, base),
            None => return Err(WireError::tag("type", tag)),
        }
    } else {
        match primitive_from_tag(tag - SAMPLER_BASE) {
            Some(base) => ExpressionType::sampler(base),
            None => return Err(WireError::tag("type", tag)),
        }
    };

    Ok(ty)
}
