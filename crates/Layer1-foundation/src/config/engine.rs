//! Engine Config - mod 컴파일 설정
//!
//! 글로벌(`<config_dir>/modkit/modkit.json`)과 프로젝트(`.modkit/modkit.json`)
//! 설정을 병합한 뒤 환경 변수로 덮어씁니다.

use crate::storage::JsonStore;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// 설정 파일명
pub const MODKIT_CONFIG_FILE: &str = "modkit.json";

/// 디버그 트레이스 환경 변수
pub const ENV_DEBUG: &str = "MODKIT_DEBUG";

// ============================================================================
// Engine Config
// ============================================================================

/// 엔진 설정
///
/// 모든 필드는 Optional 이며, 병합 시 설정된 값만 덮어씁니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// 버전 (마이그레이션용)
    #[serde(default = "default_version")]
    pub version: u32,

    /// mod 체인 디버그 트레이스
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,

    /// 컴파일 대상 플랫폼 (None 이면 전체)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platforms: Option<Vec<String>>,

    /// provider 가 없는 mod 를 에러로 처리할지 여부
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assert_missing_providers: Option<bool>,

    /// 기존 네이티브 파일 대신 템플릿 사용
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_existing_native_files: Option<bool>,

    /// 디스크에 쓰지 않는 introspection 모드
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub introspect: Option<bool>,
}

fn default_version() -> u32 {
    1
}

impl EngineConfig {
    pub fn new() -> Self {
        Self {
            version: default_version(),
            ..Self::default()
        }
    }

    // ========================================================================
    // Load / Save
    // ========================================================================

    /// 글로벌 + 프로젝트 + 환경 변수 병합 로드
    pub fn load(project_root: &Path) -> Result<Self> {
        let mut config = Self::new();

        // 1. 글로벌 설정
        if let Ok(global) = JsonStore::global() {
            if let Some(global_config) = global.load_optional::<EngineConfig>(MODKIT_CONFIG_FILE)? {
                config.merge(global_config);
            }
        }

        // 2. 프로젝트 설정
        let project = JsonStore::project(project_root);
        if let Some(project_config) = project.load_optional::<EngineConfig>(MODKIT_CONFIG_FILE)? {
            config.merge(project_config);
        }

        // 3. 환경 변수
        if let Ok(value) = std::env::var(ENV_DEBUG) {
            config.apply_debug_env(&value);
        }

        debug!("Loaded engine config: {:?}", config);
        Ok(config)
    }

    /// 프로젝트 설정 저장
    pub fn save_project(&self, project_root: &Path) -> Result<()> {
        JsonStore::project(project_root).save(MODKIT_CONFIG_FILE, self)
    }

    // ========================================================================
    // Merge
    // ========================================================================

    /// 다른 설정과 병합 (other가 우선)
    pub fn merge(&mut self, other: EngineConfig) {
        if other.debug.is_some() {
            self.debug = other.debug;
        }
        if other.platforms.is_some() {
            self.platforms = other.platforms;
        }
        if other.assert_missing_providers.is_some() {
            self.assert_missing_providers = other.assert_missing_providers;
        }
        if other.ignore_existing_native_files.is_some() {
            self.ignore_existing_native_files = other.ignore_existing_native_files;
        }
        if other.introspect.is_some() {
            self.introspect = other.introspect;
        }
    }

    /// `MODKIT_DEBUG` 값 적용 (인식할 수 없는 값은 무시)
    pub fn apply_debug_env(&mut self, value: &str) {
        match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => self.debug = Some(true),
            "0" | "false" | "no" | "off" => self.debug = Some(false),
            _ => {}
        }
    }

    // ========================================================================
    // 접근자 (기본값 적용)
    // ========================================================================

    pub fn is_debug(&self) -> bool {
        self.debug.unwrap_or(false)
    }

    pub fn asserts_missing_providers(&self) -> bool {
        self.assert_missing_providers.unwrap_or(true)
    }

    pub fn ignores_existing_native_files(&self) -> bool {
        self.ignore_existing_native_files.unwrap_or(false)
    }

    pub fn is_introspect(&self) -> bool {
        self.introspect.unwrap_or(false)
    }

    // ========================================================================
    // Builder
    // ========================================================================

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }

    pub fn platforms(mut self, platforms: Vec<String>) -> Self {
        self.platforms = Some(platforms);
        self
    }

    pub fn introspect(mut self, introspect: bool) -> Self {
        self.introspect = Some(introspect);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::new();
        assert_eq!(config.version, 1);
        assert!(!config.is_debug());
        assert!(config.asserts_missing_providers());
        assert!(!config.ignores_existing_native_files());
        assert!(!config.is_introspect());
    }

    #[test]
    fn test_merge_prefers_other() {
        let mut base = EngineConfig::new().debug(true).platforms(vec!["ios".into()]);
        let other = EngineConfig {
            assert_missing_providers: Some(false),
            platforms: Some(vec!["android".into()]),
            ..EngineConfig::new()
        };

        base.merge(other);

        assert!(base.is_debug());
        assert!(!base.asserts_missing_providers());
        assert_eq!(base.platforms, Some(vec!["android".to_string()]));
    }

    #[test]
    fn test_debug_env_values() {
        let mut config = EngineConfig::new();
        config.apply_debug_env("true");
        assert!(config.is_debug());
        config.apply_debug_env("0");
        assert!(!config.is_debug());
        config.apply_debug_env("maybe");
        assert_eq!(config.debug, Some(false));
    }

    #[test]
    fn test_project_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig::new().introspect(true);
        config.save_project(dir.path()).unwrap();

        let store = JsonStore::project(dir.path());
        let loaded: EngineConfig = store.load(MODKIT_CONFIG_FILE).unwrap();
        assert!(loaded.is_introspect());
    }

    #[test]
    fn test_camel_case_fields() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "assertMissingProviders": false, "ignoreExistingNativeFiles": true }"#)
                .unwrap();
        assert!(!config.asserts_missing_providers());
        assert!(config.ignores_existing_native_files());
        assert_eq!(config.version, 1);
    }
}
