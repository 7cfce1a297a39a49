//! Shared test utilities: the inverse pipeline and deterministic inputs.
//!
//! The library ships no decryption; round-trip tests open sealed payloads
//! here with the same primitives.

#![allow(dead_code)]

use std::io::Read;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use flate2::read::ZlibDecoder;
use sealpipe::crypto::CtrCipher;

/// Key of the archive test vector.
pub const VECTOR_KEY: [u8; 32] = hex_literal::hex!(
    "7E4AC5F2A2ECADA8E54A038551632FFD334E3DF1063A42E5C55B993D0FD7B0E0"
);

/// IV of the archive test vector.
pub const VECTOR_IV: [u8; 16] = hex_literal::hex!("DA919C916B9533B1AA706680F00BEC9E");

/// Plaintext of the archive test vector.
pub const VECTOR_PLAIN: &[u8] = b"1,luapack.o\r\n";

/// Base64-decode only.
pub fn decode(encoded: &[u8]) -> Vec<u8> {
    STANDARD.decode(encoded).expect("valid base64")
}

/// Base64-decode and AES-CTR-decrypt.
pub fn open_no_decompress(encoded: &[u8], key: &[u8], iv: &[u8]) -> Vec<u8> {
    let mut bytes = decode(encoded);
    CtrCipher::new(key, iv)
        .expect("valid key and iv")
        .apply_keystream(&mut bytes);
    bytes
}

/// Inflate a zlib stream.
pub fn inflate(compressed: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    ZlibDecoder::new(compressed)
        .read_to_end(&mut out)
        .expect("valid zlib stream");
    out
}

/// Full inverse of `sealpipe::encrypt`.
pub fn open(encoded: &[u8], key: &[u8], iv: &[u8]) -> Vec<u8> {
    inflate(&open_no_decompress(encoded, key, iv))
}

/// Deterministic pseudo-random bytes (xorshift64*).
pub fn noise(len: usize, seed: u64) -> Vec<u8> {
    let mut state = seed | 1;
    (0..len)
        .map(|_| {
            state ^= state >> 12;
            state ^= state << 25;
            state ^= state >> 27;
            (state.wrapping_mul(0x2545_F491_4F6C_DD1D) >> 56) as u8
        })
        .collect()
}
