//! One-shot execution: stdin → pipeline → stdout.

use std::io::{Read, Write};

use anyhow::{Context, Result};
use common::SizeHeader;
use tracing::{info, warn};

use crate::config::{Job, Mode};

/// Output of one job.
#[derive(Debug)]
pub struct Outcome {
    pub bytes: Vec<u8>,
    /// Present for the encrypting modes.
    pub header: Option<SizeHeader>,
}

/// Run `job` over `input`.
///
/// # Errors
///
/// Returns an error if the pipeline rejects its parameters or fails.
pub fn execute(job: &Job, input: &[u8]) -> Result<Outcome> {
    let outcome = match (job.mode, job.cipher.as_ref()) {
        (Mode::Compress, _) => Outcome {
            bytes: sealpipe::compress(input).context("compression failed")?,
            header: None,
        },
        (mode, Some(params)) => {
            let sealed = sealpipe::seal(
                input,
                mode == Mode::Encrypt,
                params.key.as_slice(),
                &params.iv,
            )
            .context("sealing failed")?;
            Outcome {
                bytes: sealed.bytes,
                header: Some(sealed.header),
            }
        }
        (mode, None) => anyhow::bail!("{mode:?} requires a key and IV"),
    };

    info!(
        mode = ?job.mode,
        input_len = input.len(),
        output_len = outcome.bytes.len(),
        "pipeline finished"
    );
    Ok(outcome)
}

/// Read all of `reader`, run `job`, and write the result to `writer`.
///
/// When the job asks for it, the size header is written to `header_out` as
/// one line of JSON.
///
/// # Errors
///
/// Returns an error on I/O failure or pipeline failure.
pub fn run<R, W, H>(job: &Job, mut reader: R, mut writer: W, mut header_out: H) -> Result<()>
where
    R: Read,
    W: Write,
    H: Write,
{
    let mut input = Vec::new();
    reader
        .read_to_end(&mut input)
        .context("failed to read input")?;

    let outcome = execute(job, &input)?;

    writer
        .write_all(&outcome.bytes)
        .and_then(|_| writer.flush())
        .context("failed to write output")?;

    if job.emit_header {
        match outcome.header {
            Some(header) => {
                serde_json::to_writer(&mut header_out, &header)
                    .context("failed to serialise size header")?;
                writeln!(header_out).context("failed to write size header")?;
            }
            None => warn!("size header requested but compress mode produces none"),
        }
    }
    Ok(())
}
