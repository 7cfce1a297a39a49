//! Configuration loading and validation for `sealctl`.
//!
//! All values are read from `SEALCTL_*` environment variables. Key and IV are
//! decoded and size-checked here, before any input is read.

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use sealpipe::crypto::{IV_LEN, KEY_LENS};
use serde::Deserialize;
use zeroize::Zeroizing;

/// Raw `sealctl` configuration as read from the environment.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Pipeline to run: `encrypt`, `encrypt-no-compress` or `compress`.
    #[serde(default = "default_mode")]
    pub mode: String,

    /// Hex AES key. **Required** unless `mode` is `compress`.
    #[serde(default)]
    pub key_hex: Option<String>,

    /// Hex IV. **Required** unless `mode` is `compress`.
    #[serde(default)]
    pub iv_hex: Option<String>,

    /// Print the size header as JSON on stderr after sealing.
    #[serde(default)]
    pub emit_header: bool,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_mode() -> String {
    "encrypt".into()
}
fn default_log_level() -> String {
    "info".into()
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("mode", &self.mode)
            .field("key_hex", &self.key_hex.as_ref().map(|_| "[REDACTED]"))
            .field("iv_hex", &self.iv_hex)
            .field("emit_header", &self.emit_header)
            .field("log_level", &self.log_level)
            .finish()
    }
}

/// Pipeline selected by `SEALCTL_MODE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Encrypt,
    EncryptNoCompress,
    Compress,
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "encrypt" => Ok(Mode::Encrypt),
            "encrypt-no-compress" => Ok(Mode::EncryptNoCompress),
            "compress" => Ok(Mode::Compress),
            other => anyhow::bail!(
                "SEALCTL_MODE must be encrypt, encrypt-no-compress or compress (got {other:?})"
            ),
        }
    }
}

/// Decoded key bytes, wiped on drop.
pub struct KeyBytes(Zeroizing<Vec<u8>>);

impl KeyBytes {
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for KeyBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyBytes({} bytes, [REDACTED])", self.0.len())
    }
}

/// Key and IV for the encrypting modes.
#[derive(Debug)]
pub struct CipherParams {
    pub key: KeyBytes,
    pub iv: [u8; IV_LEN],
}

/// A fully validated job.
#[derive(Debug)]
pub struct Job {
    pub mode: Mode,
    /// `None` only for [`Mode::Compress`].
    pub cipher: Option<CipherParams>,
    pub emit_header: bool,
}

impl Config {
    /// Load configuration from `SEALCTL_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or the job is invalid.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::with_prefix("SEALCTL"))
            .build()
            .context("failed to build sealctl configuration")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise sealctl configuration")?;

        c.validate()?;
        Ok(c)
    }

    fn validate(&self) -> Result<()> {
        self.job().map(|_| ())
    }

    /// Decode and check every field, producing the [`Job`] to run.
    ///
    /// # Errors
    ///
    /// Returns a descriptive error on the first invalid field.
    pub fn job(&self) -> Result<Job> {
        let mode: Mode = self.mode.parse()?;
        let cipher = match mode {
            Mode::Compress => None,
            Mode::Encrypt | Mode::EncryptNoCompress => Some(self.cipher_params()?),
        };
        Ok(Job {
            mode,
            cipher,
            emit_header: self.emit_header,
        })
    }

    fn cipher_params(&self) -> Result<CipherParams> {
        let key = KeyBytes(Zeroizing::new(decode_hex(
            self.key_hex.as_deref(),
            "SEALCTL_KEY_HEX",
        )?));
        if !KEY_LENS.contains(&key.0.len()) {
            anyhow::bail!(
                "SEALCTL_KEY_HEX must decode to 16, 24 or 32 bytes (got {})",
                key.0.len()
            );
        }

        let iv_bytes = decode_hex(self.iv_hex.as_deref(), "SEALCTL_IV_HEX")?;
        let iv: [u8; IV_LEN] = iv_bytes.as_slice().try_into().map_err(|_| {
            anyhow::anyhow!(
                "SEALCTL_IV_HEX must decode to {IV_LEN} bytes (got {})",
                iv_bytes.len()
            )
        })?;

        Ok(CipherParams { key, iv })
    }
}

fn decode_hex(value: Option<&str>, name: &str) -> Result<Vec<u8>> {
    let value = match value {
        Some(v) if !v.trim().is_empty() => v.trim(),
        _ => anyhow::bail!("{name} is required for encrypting modes"),
    };
    // Never echo the value itself; it may be key material.
    hex::decode(value).with_context(|| format!("{name} is not valid hex"))
}
