// src/lib.rs

//! apkpatcher
//!
//! Patches an Android APK to permit cleartext or custom-trust-anchor
//! network traffic for a given domain, re-signs it, and optionally
//! redeploys it to a connected device.
//!
//! # Architecture
//!
//! - One linear patch-sign-deploy pipeline, fail-fast at every stage
//! - All heavy lifting delegated to external tools: apktool, keytool,
//!   jarsigner, adb
//! - Manifest edits are textual substitutions so unrelated content is
//!   preserved byte-for-byte
//! - No compiled-in signing credentials; everything is caller-supplied

pub mod apktool;
pub mod config;
pub mod deploy;
mod error;
pub mod i18n;
pub mod keystore;
pub mod manifest;
pub mod pipeline;
pub mod policy;
pub mod signer;
pub mod tools;

pub use config::Settings;
pub use error::{Error, Result, ToolFailure};
pub use i18n::Catalog;
pub use keystore::KeystoreConfig;
pub use manifest::ManifestInfo;
pub use pipeline::{PatchOutcome, PatchRequest, Pipeline, Stage, DECODE_DIR};
pub use policy::SecurityPolicy;
pub use tools::ToolSet;
