// src/apktool.rs

//! Decoder/rebuilder invoker
//!
//! Shells out to apktool to turn an APK into an editable directory tree
//! and back. Tool output is streamed live; a non-zero exit aborts the
//! pipeline.

use crate::error::{Error, Result};
use crate::tools::{self, ToolSet};
use std::fs;
use std::path::Path;
use std::process::Command;
use tracing::info;

/// Decode an APK into `out_dir` with `apktool d`.
///
/// Any previous decoded tree at `out_dir` is removed first; apktool
/// recreates the directory.
pub fn decode(tools: &ToolSet, apk: &Path, out_dir: &Path) -> Result<()> {
    if out_dir.exists() {
        fs::remove_dir_all(out_dir)?;
    }

    info!("decoding {} into {}", apk.display(), out_dir.display());

    let mut cmd = Command::new(&tools.apktool);
    cmd.arg("d").arg(apk).arg("-o").arg(out_dir);
    tools::run_streamed(&mut cmd).map_err(Error::ToolExecution)
}

/// Rebuild a decoded tree into an unsigned APK with `apktool b`.
pub fn rebuild(tools: &ToolSet, out_dir: &Path, artifact: &Path) -> Result<()> {
    info!(
        "rebuilding {} into {}",
        out_dir.display(),
        artifact.display()
    );

    let mut cmd = Command::new(&tools.apktool);
    cmd.arg("b").arg(out_dir).arg("-o").arg(artifact);
    tools::run_streamed(&mut cmd).map_err(Error::ToolExecution)
}
