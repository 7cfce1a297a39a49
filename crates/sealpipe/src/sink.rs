//! Output sinks for the pipeline's final stage.
//!
//! The executor asks a sink for a writable region of exactly the produced
//! length and writes the last stage's output straight into it. The two
//! buffer-ownership variants differ only in the sink they pass.

use common::PipelineError;

/// Destination capability for a pipeline run.
pub trait Sink {
    /// Hand out a writable region of exactly `len` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::AllocationFailure`] or
    /// [`PipelineError::OutputBufferTooSmall`] when `len` bytes cannot be provided.
    fn claim(&mut self, len: usize) -> Result<&mut [u8], PipelineError>;
}

/// Growable sink that allocates exactly the produced length.
#[derive(Debug, Default)]
pub struct VecSink {
    buf: Vec<u8>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the produced bytes.
    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

impl Sink for VecSink {
    fn claim(&mut self, len: usize) -> Result<&mut [u8], PipelineError> {
        self.buf.clear();
        self.buf
            .try_reserve_exact(len)
            .map_err(|_| PipelineError::AllocationFailure(len))?;
        self.buf.resize(len, 0);
        Ok(&mut self.buf[..])
    }
}

/// Fixed-capacity sink over a caller-provided buffer.
///
/// Bytes past the claimed length are left untouched.
#[derive(Debug)]
pub struct SliceSink<'a> {
    buf: &'a mut [u8],
}

impl<'a> SliceSink<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf }
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }
}

impl Sink for SliceSink<'_> {
    fn claim(&mut self, len: usize) -> Result<&mut [u8], PipelineError> {
        let capacity = self.buf.len();
        self.buf
            .get_mut(..len)
            .ok_or(PipelineError::OutputBufferTooSmall {
                required: len,
                capacity,
            })
    }
}
