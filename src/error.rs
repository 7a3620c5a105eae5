//! Error taxonomy for the codec.
//!
//! Five kinds, matching the failure semantics a caller needs to
//! distinguish: a bad argument, an undersized output buffer, a
//! corrupted/truncated artifact, a checksum disagreement, and the
//! catch-all for a post-condition the implementation believes is
//! impossible.

use thiserror::Error;

/// Errors returned by [`crate::compress::compress`] and friends.
#[derive(Error, Debug, Clone, Copy, Eq, PartialEq)]
pub enum CompressError {
    #[error("input buffer is empty")]
    InvalidArgument,

    /// Output capacity was insufficient. `required` is the number of bytes
    /// that would have been needed.
    #[error("output buffer too small, need {required} bytes")]
    OutputTooSmall { required: usize },

    #[error("internal invariant violated: {0}")]
    Internal(&'static str),
}

/// Errors returned by [`crate::decompress::decompress`] and friends.
#[derive(Error, Debug, Clone, Copy, Eq, PartialEq)]
pub enum DecompressError {
    /// Reserved for a null/empty input buffer. Rust's `&[u8]` has no null
    /// case, so well-formedness problems (including a bad magic) surface
    /// as [`DecompressError::Malformed`] instead; kept for parity with the
    /// documented five-kind taxonomy.
    #[error("invalid argument")]
    InvalidArgument,

    /// Output capacity was insufficient. `required` is the number of bytes
    /// that would have been needed.
    #[error("output buffer too small, need {required} bytes")]
    OutputTooSmall { required: usize },

    #[error("malformed artifact: {0}")]
    Malformed(&'static str),

    #[error("checksum mismatch: expected {expected:#06x}, computed {actual:#06x}")]
    ChecksumMismatch { expected: u16, actual: u16 },

    #[error("internal invariant violated: {0}")]
    Internal(&'static str),
}
