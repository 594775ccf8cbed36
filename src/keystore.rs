// src/keystore.rs

//! Signing credential management
//!
//! Key and certificate generation is fully delegated to keytool; this
//! module decides whether a keystore needs generating and verifies the
//! store password with a read-only listing before the sign step.
//!
//! No credential defaults are compiled in. Every field must be supplied
//! by the caller and is validated before keytool is invoked.

use crate::error::{Error, Result};
use crate::tools::{self, ToolSet};
use std::path::PathBuf;
use std::process::Command;
use tracing::{debug, info};

/// Caller-supplied signing credentials.
#[derive(Debug, Clone)]
pub struct KeystoreConfig {
    /// Keystore file; generated here when absent, reused as-is otherwise
    pub path: PathBuf,
    pub store_password: String,
    pub key_password: String,
    pub alias: String,
    /// Distinguished name embedded in a newly generated certificate,
    /// e.g. "CN=example.com, OU=RD, O=., L=., S=., C=US"
    pub distinguished_name: String,
}

impl KeystoreConfig {
    /// Reject empty credential fields before any external call.
    pub fn validate(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Err(Error::InvalidConfig("keystore path is empty".to_string()));
        }
        if self.store_password.is_empty() {
            return Err(Error::InvalidConfig(
                "keystore password must be supplied".to_string(),
            ));
        }
        if self.key_password.is_empty() {
            return Err(Error::InvalidConfig(
                "key password must be supplied".to_string(),
            ));
        }
        if self.alias.is_empty() {
            return Err(Error::InvalidConfig(
                "key alias must be supplied".to_string(),
            ));
        }
        if self.distinguished_name.is_empty() {
            return Err(Error::InvalidConfig(
                "distinguished name must be supplied".to_string(),
            ));
        }
        Ok(())
    }
}

/// Make sure a usable keystore exists at the configured path.
///
/// A missing keystore is generated (RSA 2048, 10000-day validity, JKS);
/// an existing one is reused without inspecting its alias or DN. Either
/// way the store password is then verified with a read-only listing, so
/// a wrong password surfaces here instead of failing the costlier sign
/// step.
pub fn ensure_keystore(tools: &ToolSet, config: &KeystoreConfig) -> Result<()> {
    config.validate()?;

    if config.path.exists() {
        debug!("keystore {} exists, reusing", config.path.display());
    } else {
        info!("keystore not found, generating {}", config.path.display());
        generate(tools, config)?;
    }

    check_access(tools, config)
}

fn generate(tools: &ToolSet, config: &KeystoreConfig) -> Result<()> {
    let mut cmd = Command::new(&tools.keytool);
    cmd.arg("-genkeypair")
        .arg("-v")
        .arg("-storetype")
        .arg("JKS")
        .arg("-keystore")
        .arg(&config.path)
        .arg("-storepass")
        .arg(&config.store_password)
        .arg("-keypass")
        .arg(&config.key_password)
        .arg("-alias")
        .arg(&config.alias)
        .arg("-keyalg")
        .arg("RSA")
        .arg("-keysize")
        .arg("2048")
        .arg("-validity")
        .arg("10000")
        .arg("-dname")
        .arg(&config.distinguished_name);

    tools::run_streamed(&mut cmd).map_err(Error::KeystoreGeneration)
}

fn check_access(tools: &ToolSet, config: &KeystoreConfig) -> Result<()> {
    let mut cmd = Command::new(&tools.keytool);
    cmd.arg("-list")
        .arg("-keystore")
        .arg(&config.path)
        .arg("-storepass")
        .arg(&config.store_password);

    tools::run_streamed(&mut cmd).map_err(Error::KeystoreAccess)
}
