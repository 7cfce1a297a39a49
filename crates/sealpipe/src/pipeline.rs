//! The transform pipeline executor.
//!
//! Every public operation is one call to [`run`] with a stage selection and
//! a [`Sink`]. Stage order is fixed: compress, then encrypt, then encode.
//! Compressing after encryption would gain nothing on high-entropy bytes.

use common::PipelineError;
use tracing::debug;

use crate::compress::zlib_compress;
use crate::crypto::CtrCipher;
use crate::encode::{encode_into, encoded_len};
use crate::sink::{SliceSink, Sink, VecSink};

/// Stage selection for one pipeline run.
///
/// Key and IV are borrowed for the duration of the call only.
#[derive(Clone, Copy)]
pub enum Pipeline<'k> {
    /// zlib, then AES-CTR, then Base64.
    Encrypt { key: &'k [u8], iv: &'k [u8] },
    /// AES-CTR, then Base64.
    EncryptNoCompress { key: &'k [u8], iv: &'k [u8] },
    /// zlib only; raw bytes out.
    Compress,
}

impl Pipeline<'_> {
    /// Short name for log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Pipeline::Encrypt { .. } => "encrypt",
            Pipeline::EncryptNoCompress { .. } => "encrypt_no_compress",
            Pipeline::Compress => "compress",
        }
    }
}

impl std::fmt::Debug for Pipeline<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key or IV bytes.
        write!(f, "Pipeline({})", self.name())
    }
}

/// Push `input` through the selected stages into `sink`.
///
/// Returns the number of bytes written to the sink. Key and IV are validated
/// before any work is done.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidKeySize`] or [`PipelineError::InvalidIvSize`]
/// for bad cipher parameters, and whatever the sink or compressor reports.
pub fn run<S: Sink + ?Sized>(
    pipeline: Pipeline<'_>,
    input: &[u8],
    sink: &mut S,
) -> Result<usize, PipelineError> {
    let written = match pipeline {
        Pipeline::Encrypt { key, iv } => {
            let cipher = CtrCipher::new(key, iv)?;
            let compressed = zlib_compress(input)?;
            debug!(
                input_len = input.len(),
                compressed_len = compressed.len(),
                "compressed payload"
            );
            encrypt_and_encode(cipher, compressed, sink)?
        }
        Pipeline::EncryptNoCompress { key, iv } => {
            let cipher = CtrCipher::new(key, iv)?;
            let mut staged = Vec::new();
            staged
                .try_reserve_exact(input.len())
                .map_err(|_| PipelineError::AllocationFailure(input.len()))?;
            staged.extend_from_slice(input);
            encrypt_and_encode(cipher, staged, sink)?
        }
        Pipeline::Compress => {
            let compressed = zlib_compress(input)?;
            sink.claim(compressed.len())?.copy_from_slice(&compressed);
            compressed.len()
        }
    };

    debug!(
        pipeline = pipeline.name(),
        input_len = input.len(),
        output_len = written,
        "pipeline run complete"
    );
    Ok(written)
}

/// Apply the keystream in place, then Base64 straight into the sink.
fn encrypt_and_encode<S: Sink + ?Sized>(
    mut cipher: CtrCipher,
    mut staged: Vec<u8>,
    sink: &mut S,
) -> Result<usize, PipelineError> {
    cipher.apply_keystream(&mut staged);
    let out = sink.claim(encoded_len(staged.len()))?;
    encode_into(&staged, out)
}

pub(crate) fn run_to_vec(pipeline: Pipeline<'_>, input: &[u8]) -> Result<Vec<u8>, PipelineError> {
    let mut sink = VecSink::new();
    run(pipeline, input, &mut sink)?;
    Ok(sink.into_inner())
}

fn run_into_slice(
    pipeline: Pipeline<'_>,
    input: &[u8],
    out: &mut [u8],
) -> Result<usize, PipelineError> {
    run(pipeline, input, &mut SliceSink::new(out))
}

// ---------------------------------------------------------------------------
// Allocating variants
// ---------------------------------------------------------------------------

/// Compress, encrypt, and Base64-encode `input`.
///
/// `key` must be 16, 24 or 32 bytes; `iv` must be 16 bytes and must never be
/// reused with the same key for a different input.
///
/// # Errors
///
/// See [`run`].
pub fn encrypt(input: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>, PipelineError> {
    run_to_vec(Pipeline::Encrypt { key, iv }, input)
}

/// Encrypt and Base64-encode `input` without compressing it.
///
/// Output length is always [`encoded_len`]`(input.len())`.
///
/// # Errors
///
/// See [`run`].
pub fn encrypt_no_compress(input: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>, PipelineError> {
    run_to_vec(Pipeline::EncryptNoCompress { key, iv }, input)
}

/// zlib-compress `input` at best compression.
///
/// # Errors
///
/// See [`run`].
pub fn compress(input: &[u8]) -> Result<Vec<u8>, PipelineError> {
    run_to_vec(Pipeline::Compress, input)
}

// ---------------------------------------------------------------------------
// Caller-buffer variants
// ---------------------------------------------------------------------------

/// [`encrypt`] into a caller buffer; returns the bytes written.
///
/// # Errors
///
/// Returns [`PipelineError::OutputBufferTooSmall`] if `out` cannot hold the
/// result; `out` is not modified in that case.
pub fn encrypt_into(
    input: &[u8],
    out: &mut [u8],
    key: &[u8],
    iv: &[u8],
) -> Result<usize, PipelineError> {
    run_into_slice(Pipeline::Encrypt { key, iv }, input, out)
}

/// [`encrypt_no_compress`] into a caller buffer; returns the bytes written.
///
/// # Errors
///
/// Returns [`PipelineError::OutputBufferTooSmall`] if `out` cannot hold the
/// result; `out` is not modified in that case.
pub fn encrypt_no_compress_into(
    input: &[u8],
    out: &mut [u8],
    key: &[u8],
    iv: &[u8],
) -> Result<usize, PipelineError> {
    run_into_slice(Pipeline::EncryptNoCompress { key, iv }, input, out)
}

/// [`compress`] into a caller buffer; returns the bytes written.
///
/// # Errors
///
/// Returns [`PipelineError::OutputBufferTooSmall`] if `out` cannot hold the
/// result; `out` is not modified in that case.
pub fn compress_into(input: &[u8], out: &mut [u8]) -> Result<usize, PipelineError> {
    run_into_slice(Pipeline::Compress, input, out)
}
