// tests/common/mod.rs

//! Shared test utilities: shell-script stand-ins for the external tools.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use tempfile::TempDir;

const STUB_MANIFEST: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<manifest xmlns:android="http://schemas.android.com/apk/res/android" package="com.example.app">
    <application android:label="@string/app_name">
        <activity android:name=".MainActivity">
            <intent-filter>
                <action android:name="android.intent.action.MAIN" />
            </intent-filter>
        </activity>
    </application>
</manifest>
"#;

/// A temp directory holding stub apktool/keytool/jarsigner/adb scripts,
/// a work directory, and a call log the stubs append their argv to.
///
/// Keep the struct alive for the duration of the test to prevent cleanup.
pub struct StubTools {
    dir: TempDir,
}

impl StubTools {
    /// Set up stub tools. `with_device` controls whether the adb stub
    /// reports an attached device.
    pub fn new(with_device: bool) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let stub = Self { dir };

        fs::create_dir_all(stub.bin_dir()).unwrap();
        fs::create_dir_all(stub.work_dir()).unwrap();
        fs::write(stub.work_dir().join("input.apk"), b"stub apk").unwrap();
        if with_device {
            fs::write(stub.device_marker(), b"").unwrap();
        }

        stub.write_script("apktool", &stub.apktool_script());
        stub.write_script("keytool", &stub.keytool_script());
        stub.write_script("jarsigner", &stub.jarsigner_script());
        stub.write_script("adb", &stub.adb_script());
        stub
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.dir.path().join("bin")
    }

    pub fn work_dir(&self) -> PathBuf {
        self.dir.path().join("work")
    }

    fn log_path(&self) -> PathBuf {
        self.dir.path().join("calls.log")
    }

    fn device_marker(&self) -> PathBuf {
        self.dir.path().join("device-attached")
    }

    fn fail_rebuild_marker(&self) -> PathBuf {
        self.dir.path().join("fail-rebuild")
    }

    /// Make the apktool stub fail its next `b` invocation.
    pub fn fail_rebuild(&self) {
        fs::write(self.fail_rebuild_marker(), b"").unwrap();
    }

    /// Lines of the call log, one per tool invocation, in order.
    pub fn call_log(&self) -> Vec<String> {
        match fs::read_to_string(self.log_path()) {
            Ok(content) => content.lines().map(str::to_string).collect(),
            Err(_) => Vec::new(),
        }
    }

    fn write_script(&self, name: &str, body: &str) {
        let path = self.bin_dir().join(name);
        fs::write(&path, body).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn apktool_script(&self) -> String {
        format!(
            r#"#!/bin/sh
echo "apktool $*" >> "{log}"
if [ "$1" = "d" ]; then
    mkdir -p "$4"
    cat > "$4/AndroidManifest.xml" <<'MANIFEST'
{manifest}MANIFEST
elif [ "$1" = "b" ]; then
    if [ -f "{fail}" ]; then
        echo "brut.androlib.AndrolibException: stub rebuild failure" >&2
        exit 1
    fi
    : > "$4"
fi
exit 0
"#,
            log = self.log_path().display(),
            manifest = STUB_MANIFEST,
            fail = self.fail_rebuild_marker().display(),
        )
    }

    fn keytool_script(&self) -> String {
        format!(
            r#"#!/bin/sh
echo "keytool $*" >> "{log}"
if [ "$1" = "-genkeypair" ]; then
    : > "$6"
fi
exit 0
"#,
            log = self.log_path().display(),
        )
    }

    fn jarsigner_script(&self) -> String {
        format!(
            r#"#!/bin/sh
echo "jarsigner $*" >> "{log}"
: > "$8"
exit 0
"#,
            log = self.log_path().display(),
        )
    }

    fn adb_script(&self) -> String {
        format!(
            r#"#!/bin/sh
echo "adb $*" >> "{log}"
if [ "$1" = "devices" ]; then
    echo "List of devices attached"
    if [ -f "{device}" ]; then
        printf 'emulator-5554\tdevice\n'
    fi
    echo ""
fi
exit 0
"#,
            log = self.log_path().display(),
            device = self.device_marker().display(),
        )
    }
}
