//! `sealpipe`: fixed compress → AES-CTR → Base64 transform pipelines.
//!
//! Three operations, each with an allocating and a caller-buffer variant:
//!
//! | Operation | Stages |
//! |---|---|
//! | [`encrypt`] / [`encrypt_into`] | zlib (level 9, 32 KiB window), AES-CTR, Base64 |
//! | [`encrypt_no_compress`] / [`encrypt_no_compress_into`] | AES-CTR, Base64 |
//! | [`compress`] / [`compress_into`] | zlib |
//!
//! [`seal`] wraps the encrypt operations and reports a [`SizeHeader`].
//! The [`ffi`] module exposes the same operations over a C ABI.
//!
//! # Preconditions
//!
//! - Keys are 16, 24 or 32 bytes; IVs are 16 bytes. Both are checked.
//! - A key + IV pair must never encrypt two different inputs. Not checked.
//!
//! No decryption is provided.

pub mod compress;
pub mod crypto;
pub mod encode;
pub mod ffi;
pub mod pipeline;
pub mod seal;
pub mod sink;

pub use common::{PipelineError, SizeHeader};
pub use compress::compress_bound;
pub use encode::encoded_len;
pub use pipeline::{
    compress, compress_into, encrypt, encrypt_into, encrypt_no_compress,
    encrypt_no_compress_into, run, Pipeline,
};
pub use seal::{seal, Sealed};
pub use sink::{Sink, SliceSink, VecSink};

/// Upper bound on [`encrypt`] output for `len` input bytes.
///
/// A buffer this large always satisfies [`encrypt_into`].
pub fn max_encrypt_len(len: usize) -> usize {
    encoded_len(compress_bound(len))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_encrypt_len_covers_incompressible_input() {
        let key = [1u8; 32];
        let iv = [2u8; 16];
        let noisy: Vec<u8> = (0u32..5_000)
            .map(|i| (i.wrapping_mul(0x9E37_79B9) >> 24) as u8)
            .collect();
        let mut buf = vec![0u8; max_encrypt_len(noisy.len())];
        let n = encrypt_into(&noisy, &mut buf, &key, &iv).unwrap();
        assert_eq!(&buf[..n], encrypt(&noisy, &key, &iv).unwrap().as_slice());
    }

    #[test]
    fn max_encrypt_len_of_empty() {
        assert_eq!(max_encrypt_len(0), encoded_len(13));
    }
}
