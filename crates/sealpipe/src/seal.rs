//! Sealing with size metadata.
//!
//! Archive writers store a [`SizeHeader`] next to every payload so readers
//! can size their buffers. [`seal`] runs the same stages as
//! [`encrypt`](crate::encrypt) / [`encrypt_no_compress`](crate::encrypt_no_compress)
//! and records the length after each one.

use common::{PipelineError, SizeHeader};
use tracing::trace;

use crate::crypto::check_params;
use crate::pipeline::{compress, encrypt_no_compress};

/// A sealed payload and the sizes needed to open it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    /// Base64 text.
    pub bytes: Vec<u8>,
    /// Encoded, compressed and plain sizes.
    pub header: SizeHeader,
    /// Whether the zlib stage ran. Readers must inflate only when set.
    pub compressed: bool,
}

/// Seal `input`, optionally compressing first, and report its sizes.
///
/// With `compress_first = false` the header's compressed size equals the
/// plain size.
///
/// # Errors
///
/// Returns [`PipelineError::PayloadTooLarge`] if any size exceeds `u32::MAX`,
/// plus any error of the underlying pipeline.
pub fn seal(
    input: &[u8],
    compress_first: bool,
    key: &[u8],
    iv: &[u8],
) -> Result<Sealed, PipelineError> {
    check_params(key, iv)?;
    let size = header_field(input.len())?;

    let (bytes, compressed_size) = if compress_first {
        let compressed = compress(input)?;
        let compressed_size = header_field(compressed.len())?;
        (encrypt_no_compress(&compressed, key, iv)?, compressed_size)
    } else {
        (encrypt_no_compress(input, key, iv)?, size)
    };

    let header = SizeHeader::new(header_field(bytes.len())?, compressed_size, size);
    trace!(?header, compress_first, "sealed payload");
    Ok(Sealed {
        bytes,
        header,
        compressed: compress_first,
    })
}

fn header_field(len: usize) -> Result<u32, PipelineError> {
    u32::try_from(len).map_err(|_| PipelineError::PayloadTooLarge(len))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::encrypt;

    const KEY: [u8; 32] = [0x5A; 32];
    const IV: [u8; 16] = [0xA5; 16];

    #[test]
    fn compressed_seal_matches_encrypt() {
        let input = b"1,luapack.o\r\n";
        let sealed = seal(input, true, &KEY, &IV).unwrap();
        assert_eq!(sealed.bytes, encrypt(input, &KEY, &IV).unwrap());
        assert_eq!(sealed.header.size, 13);
        assert_eq!(
            sealed.header.compressed_size as usize,
            compress(input).unwrap().len()
        );
        assert_eq!(sealed.header.encoded_size as usize, sealed.bytes.len());
        assert!(sealed.compressed);
    }

    #[test]
    fn uncompressed_seal_repeats_plain_size() {
        let input = [0u8; 13];
        let sealed = seal(&input, false, &KEY, &IV).unwrap();
        assert_eq!(sealed.header, SizeHeader::new(20, 13, 13));
        assert!(!sealed.compressed);
    }

    #[test]
    fn compressed_flag_holds_when_zlib_length_equals_input_length() {
        // Short periodic inputs land on a zlib stream of exactly their length.
        let input = (1..=12usize)
            .flat_map(|period| (1..64usize).map(move |len| (period, len)))
            .map(|(period, len)| {
                b"abcdefghijkl"[..period]
                    .iter()
                    .copied()
                    .cycle()
                    .take(len)
                    .collect::<Vec<u8>>()
            })
            .find(|input| compress(input).unwrap().len() == input.len())
            .expect("some periodic input compresses to its own length");

        let sealed = seal(&input, true, &KEY, &IV).unwrap();
        assert_eq!(sealed.header.compressed_size, sealed.header.size);
        assert!(sealed.compressed);
        assert_eq!(sealed.bytes, encrypt(&input, &KEY, &IV).unwrap());
    }

    #[test]
    fn empty_uncompressed_seal_is_all_zero() {
        let sealed = seal(&[], false, &KEY, &IV).unwrap();
        assert!(sealed.bytes.is_empty());
        assert_eq!(sealed.header, SizeHeader::default());
    }

    #[test]
    fn bad_key_rejected_before_compression() {
        assert_eq!(
            seal(b"x", true, &[0u8; 20], &IV).unwrap_err(),
            PipelineError::InvalidKeySize(20)
        );
    }

    #[test]
    fn bad_iv_propagates() {
        assert_eq!(
            seal(b"x", true, &KEY, &[0u8; 4]).unwrap_err(),
            PipelineError::InvalidIvSize(4)
        );
    }

    #[test]
    fn header_field_rejects_oversized() {
        assert_eq!(header_field(u32::MAX as usize).unwrap(), u32::MAX);
        #[cfg(target_pointer_width = "64")]
        assert_eq!(
            header_field(u32::MAX as usize + 1).unwrap_err(),
            PipelineError::PayloadTooLarge(u32::MAX as usize + 1)
        );
    }
}
