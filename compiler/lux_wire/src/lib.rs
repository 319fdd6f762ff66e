//! Binary wire format for Lux shader modules.
//!
//! One bit-exact, versioned layout shared by every implementation:
//! magic number, format version, stage tag, the module's interface
//! tables, then each function's statement tree encoded recursively with
//! `i32` node discriminators. The type cache is derived data and is not
//! persisted; deserialized modules are re-validated before use.
//!
//! [`deserialize`]`(`[`serialize`]`(m))` reproduces `m` exactly for any
//! legal module. Streams from a newer format version are rejected, never
//! guessed at.

mod de;
mod error;
mod kind;
mod ser;
mod tag;

pub use de::deserialize;
pub use error::WireError;
pub use ser::serialize;

/// File magic, `"RHSN"` little-endian.
pub const MAGIC: u32 = 0x4E53_4852;

/// Newest format version this implementation reads and writes.
pub const CURRENT_VERSION: u32 = 1;

/// Type discriminator for concrete (taggable) types.
const TYPE_DISC_CONCRETE: u8 = 0;

/// Type discriminator for named struct/alias references.
const TYPE_DISC_NAMED: u8 = 1;
