// src/cli.rs
//! CLI definitions for apkpatcher
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "apkpatcher")]
#[command(author = "apkpatcher Contributors")]
#[command(version)]
#[command(
    about = "Patch Android APKs to allow cleartext traffic, re-sign, and deploy",
    long_about = None
)]
pub struct Cli {
    /// Display language (en, zh, zh-TW, ja, ko); overrides the saved
    /// preference for this invocation
    #[arg(long, global = true)]
    pub lang: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Patch an APK, re-sign it, and deploy it to a connected device
    Patch {
        /// Path to the APK file
        apk: PathBuf,

        /// Domain to allow cleartext traffic for (omit for a global policy)
        #[arg(short, long)]
        domain: Option<String>,

        /// Path to the signing keystore (generated if absent)
        #[arg(short, long, default_value = "keystore.jks")]
        keystore: PathBuf,

        /// Keystore password
        #[arg(long)]
        store_password: String,

        /// Signing key password
        #[arg(long)]
        key_password: String,

        /// Key alias inside the keystore
        #[arg(long)]
        alias: String,

        /// Distinguished name used when generating a new key,
        /// e.g. "CN=example.com, OU=RD, O=., L=., S=., C=US"
        #[arg(long)]
        dname: String,

        /// Directory for the decoded tree and output artifacts
        #[arg(long, default_value = ".")]
        work_dir: PathBuf,

        /// Skip device deployment even if a device is attached
        #[arg(long)]
        no_deploy: bool,
    },

    /// List connected devices
    Devices,

    /// Check that required external tools are on PATH
    Check,

    /// Show or set the preferred display language
    Lang {
        /// Language code to persist (en, zh, zh-TW, ja, ko)
        language: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
