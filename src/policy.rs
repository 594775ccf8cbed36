// src/policy.rs

//! Network security policy generation
//!
//! Renders one of two fixed XML templates. The output is byte-exact
//! (whitespace and attribute order included) because apktool's resource
//! handling downstream is allowed to be order-sensitive.

use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name of the generated resource, matching the injected
/// manifest reference `@xml/network_security_config`.
pub const POLICY_FILE_NAME: &str = "network_security_config.xml";

/// The security policy to inject into the decoded tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecurityPolicy {
    /// Cleartext permitted for one domain and its subdomains
    DomainScoped(String),
    /// Cleartext permitted globally
    GlobalAllow,
}

impl SecurityPolicy {
    /// Select a policy for an optional domain; empty means global.
    pub fn for_domain(domain: Option<&str>) -> Self {
        match domain {
            Some(d) if !d.is_empty() => Self::DomainScoped(d.to_string()),
            _ => Self::GlobalAllow,
        }
    }

    /// Render the policy as the exact XML apktool will package.
    ///
    /// Both variants trust the system and user certificate stores; a
    /// domain-scoped policy never contains a base-config element and
    /// vice versa.
    pub fn render(&self) -> String {
        match self {
            Self::DomainScoped(domain) => format!(
                r#"<?xml version="1.0" encoding="utf-8"?>
<network-security-config>
    <domain-config cleartextTrafficPermitted="true">
        <domain includeSubdomains="true">{}</domain>
        <trust-anchors>
            <certificates src="system" />
            <certificates src="user" />
        </trust-anchors>
    </domain-config>
</network-security-config>"#,
                domain
            ),
            Self::GlobalAllow => r#"<?xml version="1.0" encoding="utf-8"?>
<network-security-config>
    <base-config cleartextTrafficPermitted="true">
        <trust-anchors>
            <certificates src="system" />
            <certificates src="user" />
        </trust-anchors>
    </base-config>
</network-security-config>"#
                .to_string(),
        }
    }
}

/// Write the rendered policy into the decoded tree at `res/xml/`.
///
/// Returns the path of the written resource.
pub fn write_policy(out_dir: &Path, policy: &SecurityPolicy) -> Result<PathBuf> {
    let res_dir = out_dir.join("res").join("xml");
    fs::create_dir_all(&res_dir)?;

    let path = res_dir.join(POLICY_FILE_NAME);
    fs::write(&path, policy.render())?;
    info!("wrote {:?} policy to {}", policy_kind(policy), path.display());

    Ok(path)
}

fn policy_kind(policy: &SecurityPolicy) -> &'static str {
    match policy {
        SecurityPolicy::DomainScoped(_) => "domain-scoped",
        SecurityPolicy::GlobalAllow => "global",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_policy_wraps_literal_domain() {
        let xml = SecurityPolicy::DomainScoped("example.com".to_string()).render();
        assert!(xml.contains(r#"<domain includeSubdomains="true">example.com</domain>"#));
        assert!(xml.contains("<domain-config cleartextTrafficPermitted=\"true\">"));
        assert!(!xml.contains("base-config"));
    }

    #[test]
    fn test_global_policy_has_no_domain_config() {
        let xml = SecurityPolicy::GlobalAllow.render();
        assert!(xml.contains("<base-config cleartextTrafficPermitted=\"true\">"));
        assert!(!xml.contains("domain-config"));
    }

    #[test]
    fn test_both_variants_trust_system_and_user_stores() {
        for policy in [
            SecurityPolicy::DomainScoped("example.com".to_string()),
            SecurityPolicy::GlobalAllow,
        ] {
            let xml = policy.render();
            assert!(xml.contains(r#"<certificates src="system" />"#));
            assert!(xml.contains(r#"<certificates src="user" />"#));
        }
    }

    #[test]
    fn test_for_domain_treats_empty_as_global() {
        assert_eq!(SecurityPolicy::for_domain(None), SecurityPolicy::GlobalAllow);
        assert_eq!(
            SecurityPolicy::for_domain(Some("")),
            SecurityPolicy::GlobalAllow
        );
        assert_eq!(
            SecurityPolicy::for_domain(Some("example.com")),
            SecurityPolicy::DomainScoped("example.com".to_string())
        );
    }

    #[test]
    fn test_write_policy_creates_res_xml_resource() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_policy(dir.path(), &SecurityPolicy::GlobalAllow).unwrap();
        assert_eq!(
            path,
            dir.path().join("res").join("xml").join(POLICY_FILE_NAME)
        );
        let written = std::fs::read_to_string(path).unwrap();
        assert_eq!(written, SecurityPolicy::GlobalAllow.render());
    }
}
