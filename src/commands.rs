// src/commands.rs
//! Command handlers for the apkpatcher CLI

use crate::cli::Cli;
use anyhow::Result;
use apkpatcher::i18n::{Catalog, SUPPORTED_LANGUAGES};
use apkpatcher::{deploy, tools, KeystoreConfig, PatchRequest, Pipeline, Settings, ToolSet};
use clap::CommandFactory;
use clap_complete::Shell;
use std::io;
use std::path::PathBuf;
use tracing::info;

/// Arguments for the patch command, collected from the CLI.
pub struct PatchArgs {
    pub apk: PathBuf,
    pub domain: Option<String>,
    pub keystore: PathBuf,
    pub store_password: String,
    pub key_password: String,
    pub alias: String,
    pub dname: String,
    pub work_dir: PathBuf,
    pub no_deploy: bool,
}

/// Run the full patch-sign-deploy pipeline.
pub fn cmd_patch(catalog: &Catalog, args: PatchArgs) -> Result<()> {
    let missing = tools::missing_tools();
    if !missing.is_empty() {
        return Err(anyhow::anyhow!(
            "{}: {}",
            catalog.get("missing-tools"),
            missing.join(", ")
        ));
    }

    let request = PatchRequest {
        apk_path: args.apk,
        domain: args.domain,
        keystore: KeystoreConfig {
            path: args.keystore,
            store_password: args.store_password,
            key_password: args.key_password,
            alias: args.alias,
            distinguished_name: args.dname,
        },
        work_dir: args.work_dir,
        deploy: !args.no_deploy,
    };

    println!("{}", catalog.get("patch-started"));
    let pipeline = Pipeline::new(ToolSet::from_path()?, request);
    let outcome = pipeline.run()?;

    println!("{}", catalog.get("patch-complete"));
    println!(
        "{}: {}",
        catalog.get("signed-artifact"),
        outcome.signed_apk.display()
    );
    match outcome.deployed_to {
        Some(device) => println!("{}: {}", catalog.get("deployed-to"), device),
        None => println!("{}", catalog.get("no-device")),
    }

    Ok(())
}

/// List attached devices.
pub fn cmd_devices(catalog: &Catalog) -> Result<()> {
    let tools = ToolSet::from_path()?;
    let devices = deploy::list_devices(&tools)?;

    if devices.is_empty() {
        println!("{}", catalog.get("no-devices"));
    } else {
        println!("{}:", catalog.get("attached-devices"));
        for device in devices {
            println!("  {}", device);
        }
    }

    Ok(())
}

/// Report missing external tools.
pub fn cmd_check(catalog: &Catalog) -> Result<()> {
    let missing = tools::missing_tools();

    if missing.is_empty() {
        println!("{}", catalog.get("tools-ok"));
        Ok(())
    } else {
        Err(anyhow::anyhow!(
            "{}: {}",
            catalog.get("missing-tools"),
            missing.join(", ")
        ))
    }
}

/// Show or persist the preferred display language.
pub fn cmd_lang(catalog: &Catalog, language: Option<String>) -> Result<()> {
    match language {
        Some(lang) => {
            if !SUPPORTED_LANGUAGES.contains(&lang.as_str()) {
                return Err(anyhow::anyhow!(
                    "unsupported language '{}' (supported: {})",
                    lang,
                    SUPPORTED_LANGUAGES.join(", ")
                ));
            }

            let mut settings = Settings::load().unwrap_or_default();
            settings.language = Some(lang.clone());
            settings.save()?;
            info!("language preference set to {}", lang);
            println!("{}: {}", catalog.get("language-saved"), lang);
        }
        None => {
            println!("{}: {}", catalog.get("current-language"), catalog.language());
        }
    }

    Ok(())
}

/// Generate shell completions on stdout.
pub fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "apkpatcher", &mut io::stdout());
}
