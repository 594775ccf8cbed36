// src/error.rs

//! Error types for the patch-sign-deploy pipeline

use std::fmt;
use thiserror::Error;

/// Detail carried by a non-zero exit from an external tool.
#[derive(Debug, Clone)]
pub struct ToolFailure {
    /// Tool name (file name of the invoked binary)
    pub tool: String,
    /// Exit code, or -1 if the process was killed by a signal
    pub code: i32,
    /// Captured stderr, empty when the tool's output was streamed live
    pub stderr: String,
}

impl fmt::Display for ToolFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' exited with status {}", self.tool, self.code)?;
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            write!(f, ": {}", stderr)?;
        }
        Ok(())
    }
}

/// Errors that can occur during a pipeline run
#[derive(Error, Debug)]
pub enum Error {
    /// Required external tools are not on PATH
    #[error("missing required tools: {}", .0.join(", "))]
    MissingTools(Vec<String>),

    /// An external command exited non-zero (decode, rebuild, device listing)
    #[error("{0}")]
    ToolExecution(ToolFailure),

    /// Manifest unreadable, malformed, or missing the package attribute
    #[error("failed to parse AndroidManifest.xml: {0}")]
    ManifestParse(String),

    /// Key-pair generation failed
    #[error("keystore generation failed: {0}")]
    KeystoreGeneration(ToolFailure),

    /// Keystore listing failed - usually a wrong store password
    #[error("keystore is not readable with the supplied store password: {0}")]
    KeystoreAccess(ToolFailure),

    /// Signing tool failed (alias not found, password mismatch)
    #[error("signing failed: {0}")]
    Signing(ToolFailure),

    /// Install on the device failed
    #[error("install failed: {0}")]
    Install(ToolFailure),

    /// Launching the main activity failed
    #[error("app launch failed: {0}")]
    Launch(ToolFailure),

    /// Invalid pipeline or credential configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Settings file unreadable or malformed
    #[error("settings error: {0}")]
    Settings(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
