//! Decoding errors.
//!
//! All fatal: the deserializer aborts on the first structural problem
//! and never produces a partial module.

use thiserror::Error;

/// Why a byte stream failed to decode.
#[derive(Clone, Eq, PartialEq, Debug, Error)]
pub enum WireError {
    /// The stream does not start with the shader magic number.
    #[error("invalid shader file")]
    InvalidMagic,

    /// The stream's format version is newer than this implementation.
    #[error("unsupported version")]
    UnsupportedVersion,

    /// A node discriminator outside the known range.
    #[error("invalid node type")]
    InvalidNodeKind,

    /// A variable discriminator outside the known range.
    #[error("invalid variable kind")]
    InvalidVariableKind,

    /// A function body decoded to an expression node.
    #[error("functions can only have statements")]
    ExpectedStatement,

    /// A statement slot decoded to an expression node, or vice versa.
    #[error("mismatched node category")]
    MismatchedNode,

    /// Node nesting beyond the decoder's depth limit.
    #[error("shader tree is nested too deeply")]
    NestingTooDeep,

    /// The stream ended in the middle of a field.
    #[error("unexpected end of stream")]
    UnexpectedEof,

    /// A string payload is not valid UTF-8.
    #[error("invalid string payload")]
    InvalidString,

    /// A boolean byte other than 0 or 1.
    #[error("invalid boolean tag {0}")]
    InvalidBool(u8),

    /// An out-of-range enumeration tag.
    #[error("invalid {what} tag {tag}")]
    InvalidTag { what: &'static str, tag: u32 },
}

impl WireError {
    pub(crate) fn tag(what: &'static str, tag: u32) -> Self {
        WireError::InvalidTag { what, tag }
    }
}
