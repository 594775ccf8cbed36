// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: keystore path
fn keystore_arg() -> Arg {
    Arg::new("keystore")
        .short('k')
        .long("keystore")
        .value_name("PATH")
        .default_value("keystore.jks")
        .help("Path to the signing keystore (generated if absent)")
}

fn build_cli() -> Command {
    Command::new("apkpatcher")
        .version(env!("CARGO_PKG_VERSION"))
        .author("apkpatcher Contributors")
        .about("Patch Android APKs to allow cleartext traffic, re-sign, and deploy")
        .subcommand_required(false)
        .subcommand(
            Command::new("patch")
                .about("Patch an APK, re-sign it, and deploy it to a connected device")
                .arg(Arg::new("apk").required(true).help("Path to the APK file"))
                .arg(
                    Arg::new("domain")
                        .short('d')
                        .long("domain")
                        .help("Domain to allow cleartext traffic for (omit for a global policy)"),
                )
                .arg(keystore_arg())
                .arg(
                    Arg::new("store_password")
                        .long("store-password")
                        .required(true)
                        .help("Keystore password"),
                )
                .arg(
                    Arg::new("key_password")
                        .long("key-password")
                        .required(true)
                        .help("Signing key password"),
                )
                .arg(
                    Arg::new("alias")
                        .long("alias")
                        .required(true)
                        .help("Key alias inside the keystore"),
                )
                .arg(
                    Arg::new("dname")
                        .long("dname")
                        .required(true)
                        .help("Distinguished name used when generating a new key"),
                )
                .arg(
                    Arg::new("work_dir")
                        .long("work-dir")
                        .default_value(".")
                        .help("Directory for the decoded tree and output artifacts"),
                )
                .arg(
                    Arg::new("no_deploy")
                        .long("no-deploy")
                        .action(ArgAction::SetTrue)
                        .help("Skip device deployment even if a device is attached"),
                ),
        )
        .subcommand(Command::new("devices").about("List connected devices"))
        .subcommand(Command::new("check").about("Check that required external tools are on PATH"))
        .subcommand(
            Command::new("lang")
                .about("Show or set the preferred display language")
                .arg(Arg::new("language").help("Language code to persist (en, zh, zh-TW, ja, ko)")),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completions")
                .arg(Arg::new("shell").required(true).help("Shell to generate completions for")),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory - use CARGO_MANIFEST_DIR which is always set by cargo
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    // Generate main man page
    let cmd = build_cli();
    let man = Man::new(cmd);
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("apkpatcher.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
        return;
    }

    println!("cargo:warning=Man page generated at {}", man_path.display());
}
