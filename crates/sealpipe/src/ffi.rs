//! C ABI for the pipeline operations.
//!
//! Every entry point returns a [`SealStatus`]. Allocating variants hand out a
//! [`SealBuffer`] that must be released with [`sealpipe_free_buffer`] and
//! never with the caller's own allocator. Caller-buffer variants write at
//! most `dst_cap` bytes and report the produced (or, on
//! [`SealStatus::OutputBufferTooSmall`], the required) length through
//! `out_len`.
//!
//! # Safety
//!
//! Pointer arguments must be null or valid for the stated lengths for the
//! duration of the call. Buffers must not alias.

use std::cell::RefCell;
use std::ffi::{c_char, CString};
use std::ptr;
use std::slice;

use common::PipelineError;

use crate::pipeline::{self, Pipeline};
use crate::sink::SliceSink;

// ============================================================================
// Status codes
// ============================================================================

/// Result codes returned by every FFI function.
///
/// | Code | Meaning |
/// |---|---|
/// | 0 | success |
/// | 1 | key is not 16, 24 or 32 bytes |
/// | 2 | IV is not 16 bytes |
/// | 3 | output allocation failed |
/// | 4 | caller buffer too small; `out_len` holds the required length |
/// | 5 | zlib encoder failure |
/// | 6 | a size exceeds the 32-bit size header range |
/// | 7 | a required pointer argument was null |
///
/// Codes 1 to 6 come from [`PipelineError`] through the `From` impl below;
/// 7 is raised only at this boundary.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SealStatus {
    Success = 0,
    InvalidKeySize = 1,
    InvalidIvSize = 2,
    AllocationFailure = 3,
    OutputBufferTooSmall = 4,
    CompressionError = 5,
    PayloadTooLarge = 6,
    NullPointer = 7,
}

impl From<&PipelineError> for SealStatus {
    fn from(e: &PipelineError) -> Self {
        match e {
            PipelineError::InvalidKeySize(_) => SealStatus::InvalidKeySize,
            PipelineError::InvalidIvSize(_) => SealStatus::InvalidIvSize,
            PipelineError::AllocationFailure(_) => SealStatus::AllocationFailure,
            PipelineError::OutputBufferTooSmall { .. } => SealStatus::OutputBufferTooSmall,
            PipelineError::Compression(_) => SealStatus::CompressionError,
            PipelineError::PayloadTooLarge(_) => SealStatus::PayloadTooLarge,
        }
    }
}

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    // Interior NULs cannot appear in our messages; fall back to empty if they do.
    let msg = CString::new(msg).unwrap_or_default();
    LAST_ERROR.with(|e| *e.borrow_mut() = Some(msg));
}

fn clear_last_error() {
    LAST_ERROR.with(|e| *e.borrow_mut() = None);
}

fn fail(e: &PipelineError) -> SealStatus {
    set_last_error(&e.to_string());
    SealStatus::from(e)
}

/// Get the last error message set on this thread.
///
/// Returns null if the last call succeeded. The pointer stays valid until the
/// next FFI call on the same thread.
#[no_mangle]
pub extern "C" fn sealpipe_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match e.borrow().as_ref() {
        Some(msg) => msg.as_ptr(),
        None => ptr::null(),
    })
}

/// Get the library version as a NUL-terminated string.
#[no_mangle]
pub extern "C" fn sealpipe_version() -> *const c_char {
    static VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "\0");
    VERSION.as_ptr() as *const c_char
}

// ============================================================================
// Memory management
// ============================================================================

/// Owned output of an allocating call.
#[repr(C)]
#[derive(Debug)]
pub struct SealBuffer {
    pub data: *mut u8,
    pub len: usize,
    pub capacity: usize,
}

impl SealBuffer {
    fn new(data: Vec<u8>) -> Self {
        let mut data = std::mem::ManuallyDrop::new(data);
        SealBuffer {
            data: data.as_mut_ptr(),
            len: data.len(),
            capacity: data.capacity(),
        }
    }

    fn null() -> Self {
        SealBuffer {
            data: ptr::null_mut(),
            len: 0,
            capacity: 0,
        }
    }
}

/// Release a buffer produced by an allocating call and reset it to null.
///
/// Safe to call on an already-freed or null buffer.
///
/// # Safety
///
/// `buffer` must be null or point to a [`SealBuffer`] filled in by this library.
#[no_mangle]
pub unsafe extern "C" fn sealpipe_free_buffer(buffer: *mut SealBuffer) {
    if buffer.is_null() {
        return;
    }
    let buf = &mut *buffer;
    if !buf.data.is_null() {
        drop(Vec::from_raw_parts(buf.data, buf.len, buf.capacity));
    }
    *buf = SealBuffer::null();
}

// ============================================================================
// Argument helpers
// ============================================================================

/// Borrow `len` bytes at `data`; a null pointer is only accepted for `len == 0`.
unsafe fn input<'a>(data: *const u8, len: usize, what: &str) -> Result<&'a [u8], SealStatus> {
    if len == 0 {
        return Ok(&[]);
    }
    if data.is_null() {
        set_last_error(&format!("{what} pointer is null"));
        return Err(SealStatus::NullPointer);
    }
    Ok(slice::from_raw_parts(data, len))
}

unsafe fn output<'a>(data: *mut u8, cap: usize) -> Result<&'a mut [u8], SealStatus> {
    if cap == 0 {
        return Ok(&mut []);
    }
    if data.is_null() {
        set_last_error("output buffer pointer is null");
        return Err(SealStatus::NullPointer);
    }
    Ok(slice::from_raw_parts_mut(data, cap))
}

macro_rules! try_status {
    ($e:expr) => {
        match $e {
            Ok(v) => v,
            Err(status) => return status,
        }
    };
}

/// Shared body of the allocating entry points.
unsafe fn allocating(
    src: *const u8,
    src_len: usize,
    out: *mut SealBuffer,
    pipeline: Pipeline<'_>,
) -> SealStatus {
    if out.is_null() {
        set_last_error("output buffer pointer is null");
        return SealStatus::NullPointer;
    }
    *out = SealBuffer::null();
    let src = try_status!(input(src, src_len, "input"));
    match pipeline::run_to_vec(pipeline, src) {
        Ok(bytes) => {
            *out = SealBuffer::new(bytes);
            SealStatus::Success
        }
        Err(e) => fail(&e),
    }
}

/// Shared body of the caller-buffer entry points.
unsafe fn into_buffer(
    src: *const u8,
    src_len: usize,
    dst: *mut u8,
    dst_cap: usize,
    out_len: *mut usize,
    pipeline: Pipeline<'_>,
) -> SealStatus {
    let src = try_status!(input(src, src_len, "input"));
    let dst = try_status!(output(dst, dst_cap));
    let result = pipeline::run(pipeline, src, &mut SliceSink::new(dst));
    let (status, len) = match result {
        Ok(n) => (SealStatus::Success, n),
        Err(e) => {
            let required = match e {
                PipelineError::OutputBufferTooSmall { required, .. } => required,
                _ => 0,
            };
            (fail(&e), required)
        }
    };
    if !out_len.is_null() {
        *out_len = len;
    }
    status
}

unsafe fn cipher_params<'a>(
    key: *const u8,
    key_len: usize,
    iv: *const u8,
    iv_len: usize,
) -> Result<(&'a [u8], &'a [u8]), SealStatus> {
    Ok((input(key, key_len, "key")?, input(iv, iv_len, "IV")?))
}

// ============================================================================
// Entry points
// ============================================================================

/// Compress, encrypt, and Base64-encode into a newly allocated buffer.
///
/// # Safety
///
/// See the module-level safety notes.
#[no_mangle]
pub unsafe extern "C" fn sealpipe_encrypt(
    src: *const u8,
    src_len: usize,
    out: *mut SealBuffer,
    key: *const u8,
    key_len: usize,
    iv: *const u8,
    iv_len: usize,
) -> SealStatus {
    clear_last_error();
    let (key, iv) = try_status!(cipher_params(key, key_len, iv, iv_len));
    allocating(src, src_len, out, Pipeline::Encrypt { key, iv })
}

/// Compress, encrypt, and Base64-encode into a caller buffer.
///
/// # Safety
///
/// See the module-level safety notes.
#[no_mangle]
pub unsafe extern "C" fn sealpipe_encrypt_into(
    src: *const u8,
    src_len: usize,
    dst: *mut u8,
    dst_cap: usize,
    out_len: *mut usize,
    key: *const u8,
    key_len: usize,
    iv: *const u8,
    iv_len: usize,
) -> SealStatus {
    clear_last_error();
    let (key, iv) = try_status!(cipher_params(key, key_len, iv, iv_len));
    into_buffer(src, src_len, dst, dst_cap, out_len, Pipeline::Encrypt { key, iv })
}

/// Encrypt and Base64-encode, without compression, into a newly allocated buffer.
///
/// # Safety
///
/// See the module-level safety notes.
#[no_mangle]
pub unsafe extern "C" fn sealpipe_encrypt_no_compress(
    src: *const u8,
    src_len: usize,
    out: *mut SealBuffer,
    key: *const u8,
    key_len: usize,
    iv: *const u8,
    iv_len: usize,
) -> SealStatus {
    clear_last_error();
    let (key, iv) = try_status!(cipher_params(key, key_len, iv, iv_len));
    allocating(src, src_len, out, Pipeline::EncryptNoCompress { key, iv })
}

/// Encrypt and Base64-encode, without compression, into a caller buffer.
///
/// # Safety
///
/// See the module-level safety notes.
#[no_mangle]
pub unsafe extern "C" fn sealpipe_encrypt_no_compress_into(
    src: *const u8,
    src_len: usize,
    dst: *mut u8,
    dst_cap: usize,
    out_len: *mut usize,
    key: *const u8,
    key_len: usize,
    iv: *const u8,
    iv_len: usize,
) -> SealStatus {
    clear_last_error();
    let (key, iv) = try_status!(cipher_params(key, key_len, iv, iv_len));
    into_buffer(
        src,
        src_len,
        dst,
        dst_cap,
        out_len,
        Pipeline::EncryptNoCompress { key, iv },
    )
}

/// zlib-compress into a newly allocated buffer.
///
/// # Safety
///
/// See the module-level safety notes.
#[no_mangle]
pub unsafe extern "C" fn sealpipe_compress(
    src: *const u8,
    src_len: usize,
    out: *mut SealBuffer,
) -> SealStatus {
    clear_last_error();
    allocating(src, src_len, out, Pipeline::Compress)
}

/// zlib-compress into a caller buffer.
///
/// # Safety
///
/// See the module-level safety notes.
#[no_mangle]
pub unsafe extern "C" fn sealpipe_compress_into(
    src: *const u8,
    src_len: usize,
    dst: *mut u8,
    dst_cap: usize,
    out_len: *mut usize,
) -> SealStatus {
    clear_last_error();
    into_buffer(src, src_len, dst, dst_cap, out_len, Pipeline::Compress)
}
