//! Descriptor - 변환 대상 앱 설정
//!
//! 파이프라인 전체를 값(value)으로 흘러가는 루트 객체입니다.
//! 모든 플러그인은 Descriptor 를 소유권째 받아 (새로운) Descriptor 를 반환합니다.
//!
//! - 사용자 설정: `name`, `slug`, `version`, `platforms`, `plugins`, 그 외 필드(`extra`)
//! - `_internal`: 프로젝트 루트, 플러그인 history, mod 결과 (직렬화됨)
//! - `mods`: Mod Registry (직렬화되지 않음)

use crate::mods::ModRegistry;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::PathBuf;

// ============================================================================
// PluginHistoryItem
// ============================================================================

/// 적용된 플러그인 기록
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginHistoryItem {
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

// ============================================================================
// InternalState
// ============================================================================

/// 엔진 내부 상태 (`_internal`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalState {
    /// 프로젝트 루트
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_root: Option<PathBuf>,

    /// 플러그인 history (이름 -> 기록), 삭제되지 않음
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub plugin_history: BTreeMap<String, PluginHistoryItem>,

    /// 컴파일된 mod 결과 (platform -> mod -> value)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub mod_results: BTreeMap<String, BTreeMap<String, Value>>,

    /// mod 체인 디버그 트레이스
    #[serde(skip)]
    pub debug: bool,

    /// 현재 실행 중인 플러그인 이름 스택 (디버그 트레이스용)
    #[serde(skip)]
    pub plugin_stack: Vec<String>,
}

impl InternalState {
    /// mod 결과 조회
    pub fn mod_result(&self, platform: &str, mod_name: &str) -> Option<&Value> {
        self.mod_results.get(platform)?.get(mod_name)
    }

    /// mod 결과 저장
    pub fn set_mod_result(&mut self, platform: &str, mod_name: &str, value: Value) {
        self.mod_results
            .entry(platform.to_string())
            .or_default()
            .insert(mod_name.to_string(), value);
    }
}

// ============================================================================
// Descriptor
// ============================================================================

/// 앱 설정 Descriptor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Descriptor {
    /// 앱 이름
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// 대상 플랫폼
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub platforms: Vec<String>,

    /// static 플러그인 참조 (`"name"` 또는 `["name", props]`)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<Value>,

    /// 엔진 내부 상태
    #[serde(rename = "_internal", default)]
    pub internal: InternalState,

    /// 그 외 사용자 설정
    #[serde(flatten)]
    pub extra: Map<String, Value>,

    /// Mod Registry
    #[serde(skip)]
    pub mods: ModRegistry,
}

impl Descriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// JSON 값에서 생성
    pub fn from_value(value: Value) -> crate::Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// JSON 값으로 변환 (mods 제외)
    pub fn to_value(&self) -> crate::Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    // ========================================================================
    // Builder
    // ========================================================================

    pub fn with_platforms(mut self, platforms: &[&str]) -> Self {
        self.platforms = platforms.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.internal.project_root = Some(root.into());
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.internal.debug = debug;
        self
    }

    pub fn with_plugin(mut self, plugin: Value) -> Self {
        self.plugins.push(plugin);
        self
    }

    // ========================================================================
    // 접근자
    // ========================================================================

    /// 사용자 설정 필드 조회
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// 사용자 설정 필드 설정
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.extra.insert(key.into(), value);
    }

    /// 플러그인 history 조회
    pub fn history_item(&self, name: &str) -> Option<&PluginHistoryItem> {
        self.internal.plugin_history.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_round_trip_keeps_extra_fields() {
        let value = json!({
            "name": "my-app",
            "slug": "my-app",
            "android": { "package": "com.example" },
            "plugins": ["expo-camera", ["expo-location", { "mode": "always" }]],
        });

        let descriptor = Descriptor::from_value(value).unwrap();
        assert_eq!(descriptor.name, "my-app");
        assert_eq!(descriptor.plugins.len(), 2);
        assert_eq!(descriptor.get("android").unwrap()["package"], "com.example");

        let back = descriptor.to_value().unwrap();
        assert_eq!(back["android"]["package"], "com.example");
        assert!(back.get("mods").is_none());
    }

    #[test]
    fn test_internal_state_serialization() {
        let mut descriptor = Descriptor::new("app").with_debug(true);
        descriptor.internal.plugin_history.insert(
            "with-thing".into(),
            PluginHistoryItem {
                name: "with-thing".into(),
                version: "1.0.0".into(),
                platform: None,
            },
        );
        descriptor
            .internal
            .set_mod_result("ios", "infoPlist", json!({ "CFBundleName": "app" }));

        let value = descriptor.to_value().unwrap();
        assert_eq!(value["_internal"]["pluginHistory"]["with-thing"]["version"], "1.0.0");
        assert_eq!(value["_internal"]["modResults"]["ios"]["infoPlist"]["CFBundleName"], "app");
        assert!(value["_internal"].get("debug").is_none());

        let restored = Descriptor::from_value(value).unwrap();
        assert!(restored.history_item("with-thing").is_some());
        assert!(!restored.internal.debug);
        assert_eq!(
            restored.internal.mod_result("ios", "infoPlist").unwrap()["CFBundleName"],
            "app"
        );
    }
}
