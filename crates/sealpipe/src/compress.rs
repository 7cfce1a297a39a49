//! zlib compression stage.
//!
//! Output is a complete zlib stream: the `78 DA` header for best
//! compression, the DEFLATE body, and the Adler-32 trailer.

use std::io::Write;

use common::PipelineError;
use flate2::write::ZlibEncoder;
use flate2::Compression;

/// DEFLATE effort used by every pipeline that compresses.
pub const LEVEL: u32 = 9;

/// log2 of the DEFLATE window (32 KiB), the zlib maximum and the encoder default.
pub const WINDOW_BITS: u8 = 15;

/// Worst-case zlib output length for `len` input bytes.
///
/// Same bound as zlib's `compressBound`: stored-block overhead plus the
/// 2-byte header, 4-byte trailer, and slack for the final block.
pub fn compress_bound(len: usize) -> usize {
    len.saturating_add(len >> 12)
        .saturating_add(len >> 14)
        .saturating_add(len >> 25)
        .saturating_add(13)
}

/// Compress `data` into a new zlib stream.
///
/// # Errors
///
/// Returns [`PipelineError::AllocationFailure`] if the working buffer cannot
/// be reserved, or [`PipelineError::Compression`] if the encoder fails.
pub fn zlib_compress(data: &[u8]) -> Result<Vec<u8>, PipelineError> {
    let bound = compress_bound(data.len());
    let mut out = Vec::new();
    out.try_reserve(bound)
        .map_err(|_| PipelineError::AllocationFailure(bound))?;

    let mut encoder = ZlibEncoder::new(out, Compression::new(LEVEL));
    encoder
        .write_all(data)
        .map_err(|e| PipelineError::Compression(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| PipelineError::Compression(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::ZlibDecoder;
    use hex_literal::hex;
    use std::io::Read;

    fn inflate(data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        ZlibDecoder::new(data).read_to_end(&mut out).unwrap();
        out
    }

    #[test]
    fn best_compression_header() {
        let out = zlib_compress(b"anything").unwrap();
        assert_eq!(out[..2], hex!("78da"));
    }

    #[test]
    fn known_vector() {
        assert_eq!(
            zlib_compress(b"1,luapack.o\r\n").unwrap(),
            hex!("78da33d4c9294d2c484cced6cbe7e502001df203f3")
        );
    }

    #[test]
    fn empty_input_is_a_complete_stream() {
        let out = zlib_compress(&[]).unwrap();
        assert_eq!(out[..2], hex!("78da"));
        // Adler-32 of nothing is 1.
        assert_eq!(out[out.len() - 4..], hex!("00000001"));
        assert!(inflate(&out).is_empty());
    }

    #[test]
    fn stays_within_bound() {
        let noisy: Vec<u8> = (0u32..70_000)
            .map(|i| (i.wrapping_mul(2_654_435_761) >> 13) as u8)
            .collect();
        let out = zlib_compress(&noisy).unwrap();
        assert!(out.len() <= compress_bound(noisy.len()));
        assert_eq!(inflate(&out), noisy);
    }

    #[test]
    fn bound_saturates() {
        assert_eq!(compress_bound(0), 13);
        assert_eq!(compress_bound(usize::MAX), usize::MAX);
    }
}
