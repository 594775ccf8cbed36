// src/main.rs

mod cli;
mod commands;

use anyhow::Result;
use apkpatcher::{config, Catalog, Settings};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;
use tracing::warn;

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Language resolution: CLI flag, then saved preference, then the
    // system locale.
    let settings = Settings::load().unwrap_or_else(|e| {
        warn!("ignoring unreadable settings: {}", e);
        Settings::default()
    });
    let lang = cli
        .lang
        .clone()
        .or_else(|| settings.language.clone())
        .unwrap_or_else(config::system_language);
    let catalog = Catalog::load(&lang, Path::new("."));

    match cli.command {
        Some(Commands::Patch {
            apk,
            domain,
            keystore,
            store_password,
            key_password,
            alias,
            dname,
            work_dir,
            no_deploy,
        }) => commands::cmd_patch(
            &catalog,
            commands::PatchArgs {
                apk,
                domain,
                keystore,
                store_password,
                key_password,
                alias,
                dname,
                work_dir,
                no_deploy,
            },
        ),
        Some(Commands::Devices) => commands::cmd_devices(&catalog),
        Some(Commands::Check) => commands::cmd_check(&catalog),
        Some(Commands::Lang { language }) => commands::cmd_lang(&catalog, language),
        Some(Commands::Completions { shell }) => {
            commands::cmd_completions(shell);
            Ok(())
        }
        None => {
            // No command provided, show help
            println!("apkpatcher v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'apkpatcher --help' for usage information");
            Ok(())
        }
    }
}
