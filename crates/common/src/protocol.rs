//! Size metadata recorded alongside every sealed payload.
//!
//! Archive readers need all three sizes to undo a seal: the encoded size to
//! know how many Base64 bytes to read, the compressed size to size the
//! decrypted stream, and the plain size to size the inflated output.

use serde::{Deserialize, Serialize};

/// Byte counts describing one sealed payload.
///
/// Sizes alone do not say whether the payload was compressed: a zlib stream
/// can be exactly as long as its input. That flag travels separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeHeader {
    /// Length of the Base64 text.
    pub encoded_size: u32,
    /// Length of the zlib stream, or the plain length when uncompressed.
    pub compressed_size: u32,
    /// Length of the plain input.
    pub size: u32,
}

impl SizeHeader {
    /// Construct a [`SizeHeader`] from its three sizes.
    pub fn new(encoded_size: u32, compressed_size: u32, size: u32) -> Self {
        Self {
            encoded_size,
            compressed_size,
            size,
        }
    }
}
