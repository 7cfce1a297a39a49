//! AES in counter mode over whole in-memory buffers.
//!
//! **Mode choice:** CTR turns AES into a stream cipher, so ciphertext length
//! equals plaintext length and no padding is involved.
//!
//! **Never reuse a key + IV pair for two different plaintexts.** Two
//! ciphertexts under the same keystream XOR to the XOR of their plaintexts.
//! This layer cannot detect reuse; the caller owns IV uniqueness.

use aes::cipher::{KeyIvInit, StreamCipher};
use aes::{Aes128, Aes192, Aes256};
use thiserror::Error;

/// Accepted AES key lengths in bytes (AES-128, AES-192, AES-256).
pub const KEY_LENS: [usize; 3] = [16, 24, 32];

/// Byte length of the IV, which is one AES block.
pub const IV_LEN: usize = 16;

type Aes128Ctr = ctr::Ctr128BE<Aes128>;
type Aes192Ctr = ctr::Ctr128BE<Aes192>;
type Aes256Ctr = ctr::Ctr128BE<Aes256>;

/// Errors produced by the cipher layer.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CipherError {
    /// The key is not one of [`KEY_LENS`].
    #[error("invalid AES key length: {0} bytes")]
    InvalidKeyLength(usize),

    /// The IV is not [`IV_LEN`] bytes.
    #[error("invalid IV length: expected {IV_LEN} bytes, got {0}")]
    InvalidIvLength(usize),
}

impl From<CipherError> for common::PipelineError {
    fn from(e: CipherError) -> Self {
        match e {
            CipherError::InvalidKeyLength(n) => common::PipelineError::InvalidKeySize(n),
            CipherError::InvalidIvLength(n) => common::PipelineError::InvalidIvSize(n),
        }
    }
}

/// AES-CTR keystream generator for any supported key size.
///
/// The variant is picked from the key length at construction; callers never
/// name the AES width.
pub enum CtrCipher {
    Aes128(Aes128Ctr),
    Aes192(Aes192Ctr),
    Aes256(Aes256Ctr),
}

impl CtrCipher {
    /// Build a cipher from raw key and IV bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidIvLength`] if `iv` is not [`IV_LEN`] bytes.
    /// Returns [`CipherError::InvalidKeyLength`] if `key` is not one of [`KEY_LENS`].
    pub fn new(key: &[u8], iv: &[u8]) -> Result<Self, CipherError> {
        if iv.len() != IV_LEN {
            return Err(CipherError::InvalidIvLength(iv.len()));
        }
        let invalid_key = |_| CipherError::InvalidKeyLength(key.len());
        match key.len() {
            16 => Aes128Ctr::new_from_slices(key, iv)
                .map(Self::Aes128)
                .map_err(invalid_key),
            24 => Aes192Ctr::new_from_slices(key, iv)
                .map(Self::Aes192)
                .map_err(invalid_key),
            32 => Aes256Ctr::new_from_slices(key, iv)
                .map(Self::Aes256)
                .map_err(invalid_key),
            n => Err(CipherError::InvalidKeyLength(n)),
        }
    }

    /// XOR the next `buf.len()` keystream bytes into `buf`.
    pub fn apply_keystream(&mut self, buf: &mut [u8]) {
        match self {
            Self::Aes128(c) => c.apply_keystream(buf),
            Self::Aes192(c) => c.apply_keystream(buf),
            Self::Aes256(c) => c.apply_keystream(buf),
        }
    }

    /// Key width in bits, for log fields.
    pub fn key_bits(&self) -> usize {
        match self {
            Self::Aes128(_) => 128,
            Self::Aes192(_) => 192,
            Self::Aes256(_) => 256,
        }
    }
}

/// Check key and IV lengths without building a cipher.
///
/// # Errors
///
/// Same as [`CtrCipher::new`].
pub fn check_params(key: &[u8], iv: &[u8]) -> Result<(), CipherError> {
    if iv.len() != IV_LEN {
        return Err(CipherError::InvalidIvLength(iv.len()));
    }
    if !KEY_LENS.contains(&key.len()) {
        return Err(CipherError::InvalidKeyLength(key.len()));
    }
    Ok(())
}

impl std::fmt::Debug for CtrCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Keystream state is derived from the key; never print it.
        write!(f, "CtrCipher(AES-{}, [REDACTED])", self.key_bits())
    }
}
