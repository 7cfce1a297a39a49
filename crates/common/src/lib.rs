//! Common types, size headers, and errors shared across `sealpipe` crates.

pub mod error;
pub mod protocol;

pub use error::PipelineError;
pub use protocol::SizeHeader;
