// src/deploy.rs

//! Device deployment via adb
//!
//! Discovers attached devices by parsing `adb devices` output, then
//! drives uninstall/install/launch against the first one. adb output is
//! captured rather than streamed because it feeds decisions here.

use crate::error::{Error, Result, ToolFailure};
use crate::tools::{self, ToolSet};
use std::path::Path;
use std::process::Command;
use tracing::info;

/// Header line adb prints before the device table.
const DEVICE_LIST_HEADER: &str = "List of devices attached";

/// List serials of attached devices.
///
/// An empty list is the normal "no device attached" case, not an error.
pub fn list_devices(tools: &ToolSet) -> Result<Vec<String>> {
    let mut cmd = Command::new(&tools.adb);
    cmd.arg("devices");

    let output = tools::run_captured(&mut cmd).map_err(Error::ToolExecution)?;
    Ok(parse_device_list(&output))
}

/// Parse `adb devices` output into device serials.
///
/// A device line contains the `device` marker; the serial is its first
/// whitespace-delimited token. The header line is excluded.
pub fn parse_device_list(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| line.contains("device") && !line.contains(DEVICE_LIST_HEADER))
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

/// Uninstall any previous version of the package.
///
/// Failures are returned for the caller to log; "package not previously
/// installed" is a common, harmless cause and must not abort the run.
pub fn uninstall(
    tools: &ToolSet,
    device: &str,
    package: &str,
) -> std::result::Result<(), ToolFailure> {
    info!("uninstalling {} from {}", package, device);

    let mut cmd = Command::new(&tools.adb);
    cmd.arg("-s").arg(device).arg("uninstall").arg(package);
    tools::run_captured(&mut cmd).map(|_| ())
}

/// Install the signed artifact, replacing any existing install.
pub fn install(tools: &ToolSet, device: &str, apk: &Path) -> Result<()> {
    info!("installing {} on {}", apk.display(), device);

    let mut cmd = Command::new(&tools.adb);
    cmd.arg("-s").arg(device).arg("install").arg("-r").arg(apk);
    tools::run_captured(&mut cmd)
        .map(|_| ())
        .map_err(Error::Install)
}

/// Launch the package's main activity.
pub fn launch(tools: &ToolSet, device: &str, package: &str, activity: &str) -> Result<()> {
    let component = format!("{}/{}", package, activity);
    info!("launching {} on {}", component, device);

    let mut cmd = Command::new(&tools.adb);
    cmd.arg("-s")
        .arg(device)
        .arg("shell")
        .arg("am")
        .arg("start")
        .arg("-n")
        .arg(&component);
    tools::run_captured(&mut cmd)
        .map(|_| ())
        .map_err(Error::Launch)
}
