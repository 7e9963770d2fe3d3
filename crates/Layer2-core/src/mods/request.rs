//! Mod Request - (platform, mod) 실행 단위 컨텍스트

use super::registry::ModChain;
use crate::descriptor::Descriptor;
use crate::Result;
use serde_json::Value;
use std::path::{Path, PathBuf};

// ============================================================================
// ModRequest
// ============================================================================

/// mod 실행 요청 컨텍스트
///
/// 컴파일러가 (platform, mod) 마다 새로 만들고, 실행이 끝나면 버립니다.
/// 플러그인에는 `&ModRequest` 로만 노출됩니다.
#[derive(Clone)]
pub struct ModRequest {
    /// 프로젝트 루트
    pub project_root: PathBuf,

    /// 플랫폼 프로젝트 루트 (`<project_root>/<platform>`)
    pub platform_project_root: PathBuf,

    /// iOS 프로젝트 이름 (xcodeproj 기준)
    pub project_name: Option<String>,

    /// 플랫폼 ID
    pub platform: String,

    /// mod 이름
    pub mod_name: String,

    /// 디스크에 쓰지 않는 introspection 모드
    pub introspect: bool,

    /// 기존 네이티브 파일 대신 템플릿 사용
    pub ignore_existing_native_files: bool,

    /// 이 링크가 감싸고 있는 이전 체인
    pub(crate) next_mod: Option<ModChain>,
}

impl ModRequest {
    pub fn new(
        project_root: impl Into<PathBuf>,
        platform: impl Into<String>,
        mod_name: impl Into<String>,
    ) -> Self {
        let project_root = project_root.into();
        let platform = platform.into();
        Self {
            platform_project_root: project_root.join(&platform),
            project_root,
            project_name: None,
            platform,
            mod_name: mod_name.into(),
            introspect: false,
            ignore_existing_native_files: false,
            next_mod: None,
        }
    }

    pub fn with_project_name(mut self, name: Option<String>) -> Self {
        self.project_name = name;
        self
    }

    pub fn with_introspect(mut self, introspect: bool) -> Self {
        self.introspect = introspect;
        self
    }

    pub fn with_ignore_existing_native_files(mut self, ignore: bool) -> Self {
        self.ignore_existing_native_files = ignore;
        self
    }

    pub fn platform_project_root(&self) -> &Path {
        &self.platform_project_root
    }

    /// 이어서 호출할 체인이 있는지
    pub fn has_next_mod(&self) -> bool {
        self.next_mod.is_some()
    }
}

impl std::fmt::Debug for ModRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModRequest")
            .field("project_root", &self.project_root)
            .field("platform_project_root", &self.platform_project_root)
            .field("project_name", &self.project_name)
            .field("platform", &self.platform)
            .field("mod_name", &self.mod_name)
            .field("introspect", &self.introspect)
            .field("ignore_existing_native_files", &self.ignore_existing_native_files)
            .field("has_next_mod", &self.next_mod.is_some())
            .finish()
    }
}

// ============================================================================
// ModConfig
// ============================================================================

/// 체인을 따라 흘러가는 값
///
/// - `config`: Descriptor
/// - `results`: 대상 파일의 구조화된 값 (provider 가 채우기 전에는 null)
/// - `request`: 읽기 전용 요청 컨텍스트
#[derive(Debug, Clone)]
pub struct ModConfig {
    pub config: Descriptor,
    pub results: Value,
    request: ModRequest,
}

impl ModConfig {
    pub fn new(config: Descriptor, request: ModRequest) -> Self {
        Self {
            config,
            results: Value::Null,
            request,
        }
    }

    /// 요청 컨텍스트 (읽기 전용)
    pub fn request(&self) -> &ModRequest {
        &self.request
    }

    /// 이전 체인 호출
    ///
    /// raw 링크(`extend`)에서 체인을 이어갈 때 사용합니다.
    /// 이전 체인이 없으면 그대로 반환합니다.
    pub async fn next(mut self) -> Result<ModConfig> {
        match self.request.next_mod.take() {
            Some(next) => next.invoke(self).await,
            None => Ok(self),
        }
    }

    /// Descriptor 와 결과로 분해
    pub fn into_parts(self) -> (Descriptor, Value) {
        (self.config, self.results)
    }

    pub(crate) fn take_next_mod(&mut self) -> Option<ModChain> {
        self.request.next_mod.take()
    }

    pub(crate) fn set_next_mod(&mut self, next: ModChain) {
        self.request.next_mod = Some(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mods::registry::mod_action;
    use serde_json::json;

    #[test]
    fn test_request_paths() {
        let request = ModRequest::new("/app", "android", "manifest");
        assert_eq!(request.platform_project_root(), Path::new("/app/android"));
        assert!(!request.has_next_mod());
    }

    #[tokio::test]
    async fn test_next_without_chain_returns_self() {
        let config = ModConfig::new(Descriptor::new("app"), ModRequest::new("/app", "ios", "infoPlist"));
        let config = config.next().await.unwrap();
        assert!(config.results.is_null());
    }

    #[tokio::test]
    async fn test_next_invokes_chain_once() {
        let mut config = ModConfig::new(Descriptor::new("app"), ModRequest::new("/app", "ios", "infoPlist"));
        config.set_next_mod(ModChain::new(mod_action(|mut config: ModConfig| async move {
            config.results = json!({ "visited": true });
            Ok(config)
        })));

        let config = config.next().await.unwrap();
        assert_eq!(config.results["visited"], true);
        assert!(!config.request().has_next_mod());
    }
}
