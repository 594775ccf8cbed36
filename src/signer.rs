// src/signer.rs

//! Signing via jarsigner
//!
//! Produces `signed_<name>` next to the unsigned artifact. Cryptography
//! is entirely jarsigner's problem; we only pass credentials through.

use crate::error::{Error, Result};
use crate::keystore::KeystoreConfig;
use crate::tools::{self, ToolSet};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::info;

/// Name of the signed artifact produced for an unsigned one.
pub fn signed_name(unsigned: &Path) -> String {
    let name = unsigned
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("signed_{}", name)
}

/// Sign `unsigned` with the configured key, returning the signed path.
///
/// Fails with `Error::Signing` on a non-zero exit (alias not found,
/// password mismatch).
pub fn sign(tools: &ToolSet, unsigned: &Path, config: &KeystoreConfig) -> Result<PathBuf> {
    let signed = unsigned.with_file_name(signed_name(unsigned));
    info!("signing {} as {}", unsigned.display(), signed.display());

    let mut cmd = Command::new(&tools.jarsigner);
    cmd.arg("-keystore")
        .arg(&config.path)
        .arg("-storepass")
        .arg(&config.store_password)
        .arg("-keypass")
        .arg(&config.key_password)
        .arg("-signedjar")
        .arg(&signed)
        .arg(unsigned)
        .arg(&config.alias);

    tools::run_streamed(&mut cmd).map_err(Error::Signing)?;
    Ok(signed)
}
