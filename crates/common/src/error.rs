//! Common error types shared across crates.

use thiserror::Error;

/// Top-level pipeline error type.
///
/// The C boundary reports each variant as a `SealStatus` code.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// The key is not 16, 24 or 32 bytes long.
    #[error("invalid key size: {0} bytes (expected 16, 24 or 32)")]
    InvalidKeySize(usize),

    /// The IV is not exactly one AES block long.
    #[error("invalid IV size: {0} bytes (expected 16)")]
    InvalidIvSize(usize),

    /// The output buffer could not be allocated.
    #[error("failed to allocate {0} bytes for output")]
    AllocationFailure(usize),

    /// A caller-provided destination cannot hold the produced output.
    #[error("output buffer too small: need {required} bytes, have {capacity}")]
    OutputBufferTooSmall {
        /// Bytes the pipeline produced.
        required: usize,
        /// Bytes the caller made available.
        capacity: usize,
    },

    /// The DEFLATE encoder reported a failure.
    #[error("compression failed: {0}")]
    Compression(String),

    /// A payload size does not fit in a 32-bit size header field.
    #[error("payload of {0} bytes exceeds the size header range")]
    PayloadTooLarge(usize),
}
