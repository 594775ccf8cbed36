// src/pipeline.rs

//! The patch-sign-deploy pipeline
//!
//! A strictly sequential run: decode, edit the manifest, write the
//! policy resource, rebuild, check credentials, sign, then deploy to the
//! first attached device if there is one. The first error aborts the
//! remaining stages; no stage is retried. A run owns no shared state, so
//! concurrent runs race on the work directory and keystore - callers
//! serialize invocations.

use crate::deploy;
use crate::error::Result;
use crate::keystore::{self, KeystoreConfig};
use crate::manifest::{self, ManifestInfo};
use crate::policy::SecurityPolicy;
use crate::tools::ToolSet;
use crate::{apktool, policy, signer};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Name of the decoded tree inside the work directory. Destroyed and
/// recreated on every run.
pub const DECODE_DIR: &str = "output";

/// Immutable input to one pipeline run.
#[derive(Debug, Clone)]
pub struct PatchRequest {
    /// The APK to patch
    pub apk_path: PathBuf,
    /// Domain to scope the cleartext policy to; empty or absent means a
    /// global policy
    pub domain: Option<String>,
    /// Signing credentials
    pub keystore: KeystoreConfig,
    /// Directory holding the decoded tree and the output artifacts
    pub work_dir: PathBuf,
    /// Whether to attempt device deployment after signing
    pub deploy: bool,
}

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct PatchOutcome {
    /// Package identifier read from the manifest
    pub package: String,
    /// Path of the signed artifact left on disk
    pub signed_apk: PathBuf,
    /// Serial of the device deployed to, if any was attached
    pub deployed_to: Option<String>,
}

/// Pipeline stages, in execution order.
///
/// Every stage transitions to the next on success and aborts the run on
/// the first error. The deployment stages are skipped (not failed) when
/// no device is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Decoding,
    ManifestEditing,
    PolicyWriting,
    Rebuilding,
    CredentialCheck,
    Signing,
    DeviceDetection,
    Uninstalling,
    Installing,
    Launching,
}

impl Stage {
    /// Human-readable stage name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Decoding => "decoding",
            Self::ManifestEditing => "manifest editing",
            Self::PolicyWriting => "policy writing",
            Self::Rebuilding => "rebuilding",
            Self::CredentialCheck => "credential check",
            Self::Signing => "signing",
            Self::DeviceDetection => "device detection",
            Self::Uninstalling => "uninstalling",
            Self::Installing => "installing",
            Self::Launching => "launching",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One patch-sign-deploy run.
pub struct Pipeline {
    tools: ToolSet,
    request: PatchRequest,
}

impl Pipeline {
    pub fn new(tools: ToolSet, request: PatchRequest) -> Self {
        Self { tools, request }
    }

    /// Execute the pipeline to completion.
    ///
    /// Each stage blocks until its external process exits; a hung tool
    /// hangs the run.
    pub fn run(&self) -> Result<PatchOutcome> {
        // Surface bad credentials before clobbering the work directory.
        self.request.keystore.validate()?;

        let out_dir = self.request.work_dir.join(DECODE_DIR);

        info!("[{}] {}", Stage::Decoding, self.request.apk_path.display());
        apktool::decode(&self.tools, &self.request.apk_path, &out_dir)?;

        info!("[{}] AndroidManifest.xml", Stage::ManifestEditing);
        let manifest_path = out_dir.join("AndroidManifest.xml");
        let info = manifest::read_manifest(&manifest_path)?;
        let text = fs::read_to_string(&manifest_path)?;
        fs::write(&manifest_path, manifest::inject_policy_reference(&text))?;

        info!("[{}]", Stage::PolicyWriting);
        let policy = SecurityPolicy::for_domain(self.request.domain.as_deref());
        policy::write_policy(&out_dir, &policy)?;

        info!("[{}]", Stage::Rebuilding);
        let unsigned = self
            .request
            .work_dir
            .join(format!("{}_modified.apk", info.package));
        apktool::rebuild(&self.tools, &out_dir, &unsigned)?;

        info!("[{}]", Stage::CredentialCheck);
        keystore::ensure_keystore(&self.tools, &self.request.keystore)?;

        info!("[{}]", Stage::Signing);
        let signed = signer::sign(&self.tools, &unsigned, &self.request.keystore)?;
        info!("signed artifact ready: {}", signed.display());

        let deployed_to = if self.request.deploy {
            self.deploy(&info, &signed)?
        } else {
            None
        };

        Ok(PatchOutcome {
            package: info.package,
            signed_apk: signed,
            deployed_to,
        })
    }

    /// Uninstall, install, and launch on the first attached device.
    fn deploy(&self, info: &ManifestInfo, signed: &Path) -> Result<Option<String>> {
        info!("[{}]", Stage::DeviceDetection);
        let devices = deploy::list_devices(&self.tools)?;
        let Some(device) = devices.first() else {
            info!("no device attached, install manually: {}", signed.display());
            return Ok(None);
        };

        info!("[{}] {}", Stage::Uninstalling, info.package);
        if let Err(e) = deploy::uninstall(&self.tools, device, &info.package) {
            // Most often the package simply was not installed before.
            warn!("uninstall failed, continuing: {}", e);
        }

        info!("[{}] {}", Stage::Installing, signed.display());
        deploy::install(&self.tools, device, signed)?;

        match &info.main_activity {
            Some(activity) => {
                info!("[{}] {}/{}", Stage::Launching, info.package, activity);
                deploy::launch(&self.tools, device, &info.package, activity)?;
            }
            None => warn!("manifest declares no activity, skipping launch"),
        }

        Ok(Some(device.clone()))
    }
}
