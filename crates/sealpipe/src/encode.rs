//! Base64 encoding stage: standard alphabet, `=` padding, no line breaks.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::PipelineError;

/// Exact Base64 length for `len` input bytes (`4 * ceil(len / 3)`).
///
/// Saturates at `usize::MAX` for lengths whose encoding cannot be addressed.
pub fn encoded_len(len: usize) -> usize {
    base64::encoded_len(len, true).unwrap_or(usize::MAX)
}

/// Encode `data` into `out`, which must be exactly [`encoded_len`] bytes.
///
/// # Errors
///
/// Returns [`PipelineError::OutputBufferTooSmall`] if `out` is too short.
pub fn encode_into(data: &[u8], out: &mut [u8]) -> Result<usize, PipelineError> {
    let capacity = out.len();
    STANDARD
        .encode_slice(data, out)
        .map_err(|_| PipelineError::OutputBufferTooSmall {
            required: encoded_len(data.len()),
            capacity,
        })
}
