//! AES-CTR keystream primitives.
//!
//! This module is intentionally free of compression and encoding concerns.
//! It provides the single cipher stage used by the pipeline executor.
//!
//! # Counter layout
//!
//! ```text
//! block i keystream = AES_k(IV + i mod 2^128)   (IV read as a big-endian u128)
//! ```
//!
//! The whole 16-byte IV is the counter; there is no separate nonce half.

pub mod cipher;

pub use cipher::{check_params, CipherError, CtrCipher, IV_LEN, KEY_LENS};
