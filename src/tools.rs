// src/tools.rs

//! External tool resolution and process execution
//!
//! The pipeline delegates all heavy lifting to four external tools:
//! apktool (decode/rebuild), keytool (keystore management), jarsigner
//! (signing), and adb (device deployment). This module resolves them on
//! PATH and provides the two ways the pipeline runs them:
//!
//! - streamed: stdout/stderr forwarded live to the operator (apktool,
//!   keytool, jarsigner)
//! - captured: output buffered for decision-making (adb)

use crate::error::{Error, Result, ToolFailure};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// Tools every pipeline run depends on, in invocation order.
pub const REQUIRED_TOOLS: &[&str] = &["apktool", "keytool", "jarsigner", "adb"];

/// Resolved paths to the external tools.
#[derive(Debug, Clone)]
pub struct ToolSet {
    pub apktool: PathBuf,
    pub keytool: PathBuf,
    pub jarsigner: PathBuf,
    pub adb: PathBuf,
}

impl ToolSet {
    /// Resolve all required tools from PATH.
    ///
    /// Fails with the full list of missing tools so the operator can fix
    /// their environment in one pass.
    pub fn from_path() -> Result<Self> {
        let missing = missing_tools();
        if !missing.is_empty() {
            return Err(Error::MissingTools(missing));
        }

        Ok(Self {
            apktool: resolve("apktool")?,
            keytool: resolve("keytool")?,
            jarsigner: resolve("jarsigner")?,
            adb: resolve("adb")?,
        })
    }

    /// Build a tool set from a single directory containing all four tools.
    ///
    /// Used to pin the pipeline to a specific SDK/JDK installation instead
    /// of whatever PATH resolves to.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            apktool: dir.join("apktool"),
            keytool: dir.join("keytool"),
            jarsigner: dir.join("jarsigner"),
            adb: dir.join("adb"),
        }
    }
}

/// Names of required tools that cannot be resolved on PATH.
pub fn missing_tools() -> Vec<String> {
    REQUIRED_TOOLS
        .iter()
        .filter(|name| which::which(name).is_err())
        .map(|name| name.to_string())
        .collect()
}

fn resolve(name: &str) -> Result<PathBuf> {
    which::which(name).map_err(|_| Error::MissingTools(vec![name.to_string()]))
}

/// File name of the invoked binary, for error reporting.
fn tool_name(cmd: &Command) -> String {
    Path::new(cmd.get_program())
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| cmd.get_program().to_string_lossy().into_owned())
}

fn spawn_failure(cmd: &Command, err: &std::io::Error) -> ToolFailure {
    ToolFailure {
        tool: tool_name(cmd),
        code: -1,
        stderr: format!("failed to start: {}", err),
    }
}

/// Run a command with its output forwarded live to the operator.
///
/// The pipeline blocks until the process exits; no timeout is enforced.
pub fn run_streamed(cmd: &mut Command) -> std::result::Result<(), ToolFailure> {
    debug!("running {:?}", cmd);

    cmd.stdin(Stdio::null());
    let status = match cmd.status() {
        Ok(status) => status,
        Err(e) => return Err(spawn_failure(cmd, &e)),
    };

    if status.success() {
        Ok(())
    } else {
        Err(ToolFailure {
            tool: tool_name(cmd),
            code: status.code().unwrap_or(-1),
            stderr: String::new(),
        })
    }
}

/// Run a command with stdout and stderr captured.
///
/// Returns stdout on success; a non-zero exit carries the captured stderr.
pub fn run_captured(cmd: &mut Command) -> std::result::Result<String, ToolFailure> {
    debug!("running {:?}", cmd);

    cmd.stdin(Stdio::null());
    let output = match cmd.output() {
        Ok(output) => output,
        Err(e) => return Err(spawn_failure(cmd, &e)),
    };

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    } else {
        Err(ToolFailure {
            tool: tool_name(cmd),
            code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
