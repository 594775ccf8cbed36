// src/manifest.rs

//! AndroidManifest.xml reading and policy-reference injection
//!
//! Reading uses an XML event scan; the rewrite is deliberately a textual
//! regex substitution rather than a structural re-serialization, so every
//! byte of unrelated manifest content survives unchanged. Downstream
//! tooling (apktool) can be sensitive to reformatting.

use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

/// The attribute value the pipeline points the manifest at.
pub const SECURITY_CONFIG_ATTR: &str =
    r#"android:networkSecurityConfig="@xml/network_security_config""#;

/// Matches any existing network-security-config reference.
static EXISTING_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"android:networkSecurityConfig="@xml/[^"]+""#).unwrap());

/// Matches the opening tag of an application element.
static APPLICATION_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<application[^>]*>").unwrap());

/// Identity and entry point extracted from a decoded manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestInfo {
    /// The package attribute of the manifest element
    pub package: String,
    /// android:name of the first declared activity, if any
    pub main_activity: Option<String>,
}

/// Read and parse the manifest at `path`.
pub fn read_manifest(path: &Path) -> Result<ManifestInfo> {
    let text = fs::read_to_string(path)
        .map_err(|e| Error::ManifestParse(format!("cannot read {}: {}", path.display(), e)))?;
    parse_manifest(&text)
}

/// Extract the package identifier and the first activity name.
///
/// Fails if the document is not well-formed or the manifest element lacks
/// a package attribute. A manifest without any activity is accepted; the
/// launch stage is skipped for such packages.
pub fn parse_manifest(text: &str) -> Result<ManifestInfo> {
    let mut reader = Reader::from_str(text);
    let mut package: Option<String> = None;
    let mut main_activity: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"manifest" => {
                    if package.is_none() {
                        package = attribute(&e, "package")?;
                    }
                }
                b"activity" => {
                    if main_activity.is_none() {
                        main_activity = attribute(&e, "android:name")?;
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(Error::ManifestParse(e.to_string())),
        }
    }

    let package = package.ok_or_else(|| {
        Error::ManifestParse("manifest element has no package attribute".to_string())
    })?;

    Ok(ManifestInfo {
        package,
        main_activity,
    })
}

fn attribute(element: &BytesStart<'_>, name: &str) -> Result<Option<String>> {
    let attr = element
        .try_get_attribute(name)
        .map_err(|e| Error::ManifestParse(e.to_string()))?;

    match attr {
        Some(a) => {
            let value = a
                .unescape_value()
                .map_err(|e| Error::ManifestParse(e.to_string()))?;
            Ok(Some(value.into_owned()))
        }
        None => Ok(None),
    }
}

/// Point the manifest at the injected network-security-config resource.
///
/// If a reference already exists its value is replaced in place; otherwise
/// the attribute is inserted into every application opening tag. All other
/// content is preserved byte-for-byte, and the transform is idempotent: a
/// second application takes the replace path and changes nothing.
///
/// A manifest with no application element is returned unmodified.
pub fn inject_policy_reference(manifest: &str) -> String {
    if EXISTING_ATTR.is_match(manifest) {
        return EXISTING_ATTR
            .replace_all(manifest, SECURITY_CONFIG_ATTR)
            .into_owned();
    }

    APPLICATION_TAG
        .replace_all(manifest, |caps: &regex::Captures<'_>| {
            let tag = &caps[0];
            // Insert before the closing '>' (or '/>') so the reference is
            // a real attribute of the element.
            let body = &tag[..tag.len() - 1];
            match body.strip_suffix('/') {
                Some(stripped) => format!("{} {}/>", stripped, SECURITY_CONFIG_ATTR),
                None => format!("{} {}>", body, SECURITY_CONFIG_ATTR),
            }
        })
        .into_owned()
}
