// tests/pipeline.rs

//! End-to-end pipeline tests against stub external tools.
//!
//! Each test generates shell-script stand-ins for apktool, keytool,
//! jarsigner, and adb in a temp directory. The stubs append their argv to
//! a call log, which the assertions read back to verify stage ordering
//! and the exact identifiers passed to each tool.

#![cfg(unix)]

mod common;

use apkpatcher::{KeystoreConfig, PatchRequest, Pipeline, ToolSet};
use common::StubTools;
use std::fs;

fn request(stub: &StubTools, deploy: bool) -> PatchRequest {
    PatchRequest {
        apk_path: stub.work_dir().join("input.apk"),
        domain: Some("example.com".to_string()),
        keystore: KeystoreConfig {
            path: stub.work_dir().join("keystore.jks"),
            store_password: "storepass".to_string(),
            key_password: "keypass".to_string(),
            alias: "release".to_string(),
            distinguished_name: "CN=example.com, OU=RD, O=., L=., S=., C=US".to_string(),
        },
        work_dir: stub.work_dir().to_path_buf(),
        deploy,
    }
}

#[test]
fn test_pipeline_produces_signed_artifact_and_deploys_in_order() {
    let stub = StubTools::new(true);
    let pipeline = Pipeline::new(ToolSet::from_dir(stub.bin_dir()), request(&stub, true));

    let outcome = pipeline.run().unwrap();

    assert_eq!(outcome.package, "com.example.app");
    assert_eq!(
        outcome.signed_apk,
        stub.work_dir().join("signed_com.example.app_modified.apk")
    );
    assert!(outcome.signed_apk.exists(), "signed artifact should exist");
    assert_eq!(outcome.deployed_to.as_deref(), Some("emulator-5554"));

    // Deployment must reference the package and component in strict
    // uninstall -> install -> launch order.
    let log = stub.call_log();
    let uninstall = log
        .iter()
        .position(|l| l.contains("uninstall com.example.app"))
        .expect("uninstall should be called");
    let install = log
        .iter()
        .position(|l| l.contains("install -r") && l.contains("signed_com.example.app_modified.apk"))
        .expect("install should be called");
    let launch = log
        .iter()
        .position(|l| l.contains("am start -n com.example.app/.MainActivity"))
        .expect("launch should be called");
    assert!(uninstall < install, "uninstall must precede install");
    assert!(install < launch, "install must precede launch");
}

#[test]
fn test_pipeline_injects_policy_into_decoded_tree() {
    let stub = StubTools::new(false);
    let pipeline = Pipeline::new(ToolSet::from_dir(stub.bin_dir()), request(&stub, true));

    pipeline.run().unwrap();

    let manifest =
        fs::read_to_string(stub.work_dir().join("output").join("AndroidManifest.xml")).unwrap();
    assert!(manifest.contains(r#"android:networkSecurityConfig="@xml/network_security_config""#));

    let policy = fs::read_to_string(
        stub.work_dir()
            .join("output")
            .join("res")
            .join("xml")
            .join("network_security_config.xml"),
    )
    .unwrap();
    assert!(policy.contains(r#"<domain includeSubdomains="true">example.com</domain>"#));
    assert!(!policy.contains("base-config"));
}

#[test]
fn test_pipeline_without_device_skips_deployment() {
    let stub = StubTools::new(false);
    let pipeline = Pipeline::new(ToolSet::from_dir(stub.bin_dir()), request(&stub, true));

    let outcome = pipeline.run().unwrap();

    assert!(outcome.deployed_to.is_none());
    assert!(outcome.signed_apk.exists());
    let log = stub.call_log();
    assert!(log.iter().any(|l| l.starts_with("adb devices")));
    assert!(!log.iter().any(|l| l.contains("install")));
}

#[test]
fn test_no_deploy_flag_never_touches_adb() {
    let stub = StubTools::new(true);
    let pipeline = Pipeline::new(ToolSet::from_dir(stub.bin_dir()), request(&stub, false));

    let outcome = pipeline.run().unwrap();

    assert!(outcome.deployed_to.is_none());
    assert!(!stub.call_log().iter().any(|l| l.starts_with("adb")));
}

#[test]
fn test_existing_keystore_skips_generation() {
    let stub = StubTools::new(false);
    let req = request(&stub, true);
    fs::write(&req.keystore.path, b"existing keystore").unwrap();

    Pipeline::new(ToolSet::from_dir(stub.bin_dir()), req)
        .run()
        .unwrap();

    let log = stub.call_log();
    assert!(
        !log.iter().any(|l| l.contains("-genkeypair")),
        "generation must be skipped for an existing keystore"
    );
    assert!(
        log.iter().any(|l| l.contains("keytool -list")),
        "the listing check must always run"
    );
}

#[test]
fn test_missing_keystore_generates_before_listing() {
    let stub = StubTools::new(false);
    Pipeline::new(ToolSet::from_dir(stub.bin_dir()), request(&stub, true))
        .run()
        .unwrap();

    let log = stub.call_log();
    let genkey = log
        .iter()
        .position(|l| l.contains("-genkeypair"))
        .expect("keystore should be generated");
    let list = log
        .iter()
        .position(|l| l.contains("keytool -list"))
        .expect("listing check should run");
    assert!(genkey < list, "generation must precede the listing check");
}

#[test]
fn test_failed_rebuild_aborts_remaining_stages() {
    let stub = StubTools::new(true);
    stub.fail_rebuild();

    let err = Pipeline::new(ToolSet::from_dir(stub.bin_dir()), request(&stub, true))
        .run()
        .unwrap_err();
    assert!(err.to_string().contains("apktool"));

    let log = stub.call_log();
    assert!(
        !log.iter().any(|l| l.starts_with("keytool")),
        "credential stage must not run after a failed rebuild"
    );
    assert!(!log.iter().any(|l| l.starts_with("jarsigner")));
    assert!(!log.iter().any(|l| l.starts_with("adb")));
}

#[test]
fn test_empty_credentials_fail_before_any_tool_runs() {
    let stub = StubTools::new(true);
    let mut req = request(&stub, true);
    req.keystore.store_password.clear();

    let err = Pipeline::new(ToolSet::from_dir(stub.bin_dir()), req)
        .run()
        .unwrap_err();
    assert!(err.to_string().contains("keystore password"));
    assert!(stub.call_log().is_empty());
}

#[test]
fn test_global_policy_when_no_domain_given() {
    let stub = StubTools::new(false);
    let mut req = request(&stub, true);
    req.domain = None;

    Pipeline::new(ToolSet::from_dir(stub.bin_dir()), req)
        .run()
        .unwrap();

    let policy = fs::read_to_string(
        stub.work_dir()
            .join("output")
            .join("res")
            .join("xml")
            .join("network_security_config.xml"),
    )
    .unwrap();
    assert!(policy.contains("base-config"));
    assert!(!policy.contains("domain-config"));
}
