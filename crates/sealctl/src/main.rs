//! `sealctl`: run one sealpipe pipeline over stdin.
//!
//! Startup sequence:
//! 1. Load and validate [`config::Config`] from `SEALCTL_*` environment variables.
//! 2. Initialise structured JSON logging on stderr.
//! 3. Read stdin, run the pipeline, write the result to stdout.

mod config;
mod run;
mod telemetry;

use anyhow::Result;
use tracing::info;

fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = config::Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: sealctl configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init(&cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        mode = %cfg.mode,
        "sealctl starting"
    );

    // -----------------------------------------------------------------------
    // 3. Pipeline
    // -----------------------------------------------------------------------
    let job = cfg.job()?;
    run::run(
        &job,
        std::io::stdin().lock(),
        std::io::stdout().lock(),
        std::io::stderr(),
    )
}
