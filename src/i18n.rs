// src/i18n.rs

//! Translation catalog
//!
//! Key-to-string lookup for operator-facing messages with a defined
//! fallback chain: an external `<lang>.toml` in the working directory,
//! then the compiled-in table for the language, then English, then the
//! key itself. Entirely decoupled from the pipeline core.

use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

/// Languages with compiled-in tables.
pub const SUPPORTED_LANGUAGES: &[&str] = &["en", "zh", "zh-TW", "ja", "ko"];

const EN: &[(&str, &str)] = &[
    ("patch-started", "Patching APK..."),
    ("patch-complete", "APK patched, rebuilt, and signed successfully"),
    ("signed-artifact", "Signed artifact"),
    ("deployed-to", "Installed and launched on device"),
    ("no-device", "No device detected, install manually"),
    ("missing-tools", "Missing required tools"),
    ("tools-ok", "All required tools are available"),
    ("no-devices", "No devices attached"),
    ("attached-devices", "Attached devices"),
    ("language-saved", "Language preference saved"),
    ("current-language", "Current language"),
];

const ZH: &[(&str, &str)] = &[
    ("patch-started", "正在修改 APK..."),
    ("patch-complete", "APK 修改、重建并签名完成"),
    ("signed-artifact", "已签名的文件"),
    ("deployed-to", "已安装并在设备上启动"),
    ("no-device", "没有检测到设备，请手动安装"),
    ("missing-tools", "缺少必需的工具"),
    ("tools-ok", "所有必需的工具均可用"),
    ("no-devices", "没有连接的设备"),
    ("attached-devices", "已连接的设备"),
    ("language-saved", "语言偏好已保存"),
    ("current-language", "当前语言"),
];

const ZH_TW: &[(&str, &str)] = &[
    ("patch-started", "正在修改 APK..."),
    ("patch-complete", "APK 修改、重建並簽名完成"),
    ("signed-artifact", "已簽名的檔案"),
    ("deployed-to", "已安裝並在裝置上啟動"),
    ("no-device", "沒有偵測到裝置，請手動安裝"),
    ("missing-tools", "缺少必需的工具"),
    ("tools-ok", "所有必需的工具均可用"),
    ("no-devices", "沒有連接的裝置"),
    ("attached-devices", "已連接的裝置"),
    ("language-saved", "語言偏好已儲存"),
    ("current-language", "目前語言"),
];

const JA: &[(&str, &str)] = &[
    ("patch-started", "APK を修正しています..."),
    ("patch-complete", "APK の修正、再構築、署名が完了しました"),
    ("signed-artifact", "署名済みファイル"),
    ("deployed-to", "デバイスにインストールして起動しました"),
    ("no-device", "デバイスが見つかりません。手動でインストールしてください"),
    ("missing-tools", "必要なツールがありません"),
    ("tools-ok", "必要なツールはすべて利用可能です"),
    ("no-devices", "接続されたデバイスはありません"),
    ("attached-devices", "接続済みデバイス"),
    ("language-saved", "言語設定を保存しました"),
    ("current-language", "現在の言語"),
];

const KO: &[(&str, &str)] = &[
    ("patch-started", "APK 수정 중..."),
    ("patch-complete", "APK 수정, 재빌드 및 서명 완료"),
    ("signed-artifact", "서명된 파일"),
    ("deployed-to", "기기에 설치 및 실행 완료"),
    ("no-device", "기기를 찾을 수 없습니다. 수동으로 설치하세요"),
    ("missing-tools", "필수 도구가 없습니다"),
    ("tools-ok", "모든 필수 도구를 사용할 수 있습니다"),
    ("no-devices", "연결된 기기가 없습니다"),
    ("attached-devices", "연결된 기기"),
    ("language-saved", "언어 설정이 저장되었습니다"),
    ("current-language", "현재 언어"),
];

fn builtin(lang: &str) -> &'static [(&'static str, &'static str)] {
    match lang {
        "zh" => ZH,
        "zh-TW" => ZH_TW,
        "ja" => JA,
        "ko" => KO,
        _ => EN,
    }
}

/// Message catalog for one language.
pub struct Catalog {
    lang: String,
    external: HashMap<String, String>,
}

impl Catalog {
    /// Catalog backed only by the compiled-in tables.
    pub fn new(lang: &str) -> Self {
        Self {
            lang: lang.to_string(),
            external: HashMap::new(),
        }
    }

    /// Load a catalog, overlaying `<dir>/<lang>.toml` when present.
    ///
    /// An unreadable or malformed file falls back to the compiled-in
    /// table with a warning.
    pub fn load(lang: &str, dir: &Path) -> Self {
        let mut catalog = Self::new(lang);
        let path = dir.join(format!("{}.toml", lang));

        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(content) => match toml::from_str::<HashMap<String, String>>(&content) {
                    Ok(table) => catalog.external = table,
                    Err(e) => warn!("ignoring malformed {}: {}", path.display(), e),
                },
                Err(e) => warn!("cannot read {}: {}", path.display(), e),
            }
        }

        catalog
    }

    pub fn language(&self) -> &str {
        &self.lang
    }

    /// Look up a message, falling back external file -> compiled-in
    /// table -> English -> the key itself.
    pub fn get<'a>(&'a self, key: &'a str) -> &'a str {
        if let Some(value) = self.external.get(key) {
            return value;
        }
        lookup(builtin(&self.lang), key)
            .or_else(|| lookup(EN, key))
            .unwrap_or(key)
    }
}

fn lookup(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_builtin_lookup() {
        let catalog = Catalog::new("ja");
        assert_eq!(catalog.get("signed-artifact"), "署名済みファイル");
    }

    #[test]
    fn test_unknown_language_falls_back_to_english() {
        let catalog = Catalog::new("fr");
        assert_eq!(catalog.get("tools-ok"), "All required tools are available");
    }

    #[test]
    fn test_unknown_key_falls_back_to_key() {
        let catalog = Catalog::new("en");
        assert_eq!(catalog.get("does-not-exist"), "does-not-exist");
    }

    #[test]
    fn test_external_file_overrides_builtin() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("en.toml"),
            "patch-started = \"Let's go\"\n",
        )
        .unwrap();

        let catalog = Catalog::load("en", dir.path());
        assert_eq!(catalog.get("patch-started"), "Let's go");
        // Keys absent from the external file still resolve.
        assert_eq!(catalog.get("no-devices"), "No devices attached");
    }

    #[test]
    fn test_malformed_external_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ko.toml"), "not valid toml [[[").unwrap();

        let catalog = Catalog::load("ko", dir.path());
        assert_eq!(catalog.get("no-devices"), "연결된 기기가 없습니다");
    }

    #[test]
    fn test_every_language_covers_the_english_keys() {
        for lang in SUPPORTED_LANGUAGES {
            let table = builtin(lang);
            for (key, _) in EN {
                assert!(
                    lookup(table, key).is_some(),
                    "{} is missing key {}",
                    lang,
                    key
                );
            }
        }
    }
}
