//! File Mod Provider - 포맷 기반 파일 provider
//!
//! 후보 경로(glob 패턴) 중 처음 존재하는 파일을 읽고, 같은 경로에 씁니다.
//! 아무 후보도 존재하지 않으면 첫 번째 후보 경로를 사용합니다.

use super::provider::BaseModProvider;
use super::registry::ResultShape;
use super::request::ModRequest;
use crate::{Error, Result};
use async_trait::async_trait;
use modkit_foundation::FileFormat;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// 후보 경로의 프로젝트 이름 자리표시자
pub const PROJECT_NAME_PLACEHOLDER: &str = "{projectName}";

/// 파일 기반 provider
pub struct FileModProvider {
    /// 플랫폼 프로젝트 루트 기준 후보 경로 (glob 패턴 허용)
    candidates: Vec<String>,
    format: Arc<dyn FileFormat>,
    shape: ResultShape,
    template: Option<Value>,
    introspective: bool,
    always_materialize: bool,
}

impl FileModProvider {
    pub fn new(candidate: impl Into<String>, format: Arc<dyn FileFormat>) -> Self {
        Self {
            candidates: vec![candidate.into()],
            format,
            shape: ResultShape::Object,
            template: None,
            introspective: true,
            always_materialize: false,
        }
    }

    /// 후보 경로 추가 (앞의 후보가 우선)
    pub fn with_candidate(mut self, candidate: impl Into<String>) -> Self {
        self.candidates.push(candidate.into());
        self
    }

    pub fn with_shape(mut self, shape: ResultShape) -> Self {
        self.shape = shape;
        self
    }

    /// 읽기 실패 시 사용할 템플릿
    pub fn with_template(mut self, template: Value) -> Self {
        self.template = Some(template);
        self
    }

    pub fn with_introspective(mut self, introspective: bool) -> Self {
        self.introspective = introspective;
        self
    }

    pub fn with_always_materialize(mut self, always: bool) -> Self {
        self.always_materialize = always;
        self
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn format_name(&self) -> &str {
        self.format.name()
    }

    /// 후보 경로 해석
    pub fn resolve_path(&self, request: &ModRequest) -> Result<PathBuf> {
        let root = request.platform_project_root();
        let mut fallback = None;

        for candidate in &self.candidates {
            let relative = expand_candidate(candidate, request)?;

            if let Some(found) = first_match(&root, &relative)? {
                debug!("Resolved {}.{} -> {}", request.platform, request.mod_name, found.display());
                return Ok(found);
            }

            if fallback.is_none() && !is_glob(&relative) {
                fallback = Some(root.join(&relative));
            }
        }

        fallback.ok_or_else(|| {
            Error::provider(
                &request.platform,
                &request.mod_name,
                format!("No file matches {:?} in {}", self.candidates, root.display()),
            )
        })
    }
}

impl std::fmt::Debug for FileModProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileModProvider")
            .field("candidates", &self.candidates)
            .field("format", &self.format.name())
            .field("shape", &self.shape)
            .field("introspective", &self.introspective)
            .field("always_materialize", &self.always_materialize)
            .finish()
    }
}

#[async_trait]
impl BaseModProvider for FileModProvider {
    fn shape(&self) -> ResultShape {
        self.shape
    }

    fn is_introspective(&self) -> bool {
        self.introspective
    }

    fn always_materialize(&self) -> bool {
        self.always_materialize
    }

    fn template(&self, _request: &ModRequest) -> Option<Value> {
        self.template.clone()
    }

    async fn file_path(&self, request: &ModRequest) -> Result<PathBuf> {
        self.resolve_path(request)
    }

    async fn read(&self, file_path: &Path, request: &ModRequest) -> Result<Value> {
        let bytes = tokio::fs::read(file_path).await.map_err(|e| {
            Error::provider(
                &request.platform,
                &request.mod_name,
                format!("Failed to read {}: {}", file_path.display(), e),
            )
        })?;
        self.format.parse(file_path, &bytes)
    }

    async fn write(&self, file_path: &Path, results: &Value, _request: &ModRequest) -> Result<()> {
        let bytes = self.format.serialize(file_path, results)?;
        if let Some(parent) = file_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(file_path, bytes).await?;
        debug!("Wrote {}", file_path.display());
        Ok(())
    }
}

// ============================================================================
// 경로 헬퍼
// ============================================================================

fn expand_candidate(candidate: &str, request: &ModRequest) -> Result<String> {
    if !candidate.contains(PROJECT_NAME_PLACEHOLDER) {
        return Ok(candidate.to_string());
    }

    match &request.project_name {
        Some(name) => Ok(candidate.replace(PROJECT_NAME_PLACEHOLDER, name)),
        None => Err(Error::Consistency(format!(
            "Project name is required to resolve `{}` for mods.{}.{}",
            candidate, request.platform, request.mod_name
        ))),
    }
}

fn is_glob(path: &str) -> bool {
    path.contains(['*', '?', '['])
}

/// `root` 는 그대로, `relative` 만 패턴으로 해석
fn first_match(root: &Path, relative: &str) -> Result<Option<PathBuf>> {
    let pattern = Path::new(&glob::Pattern::escape(&root.to_string_lossy())).join(relative);
    let pattern = pattern.to_string_lossy();
    let paths = glob::glob(&pattern)
        .map_err(|e| Error::Internal(format!("Invalid path pattern {}: {}", pattern, e)))?;

    let mut matches: Vec<PathBuf> = paths.filter_map(|entry| entry.ok()).filter(|p| p.is_file()).collect();
    matches.sort();
    Ok(matches.into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;
    use modkit_foundation::{JsonFormat, TextFormat};
    use serde_json::json;
    use tempfile::TempDir;

    fn request(root: &Path, platform: &str, mod_name: &str) -> ModRequest {
        ModRequest::new(root, platform, mod_name)
    }

    #[test]
    fn test_resolve_falls_back_to_first_literal_candidate() {
        let temp = TempDir::new().unwrap();
        let provider = FileModProvider::new("Podfile.properties.json", Arc::new(JsonFormat));

        let path = provider.resolve_path(&request(temp.path(), "ios", "podfileProperties")).unwrap();
        assert_eq!(path, temp.path().join("ios").join("Podfile.properties.json"));
    }

    #[test]
    fn test_resolve_prefers_existing_glob_match() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("android/app/src/main/java/com/example");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("MainActivity.kt"), "class MainActivity").unwrap();

        let provider = FileModProvider::new("app/src/main/java/**/MainActivity.java", Arc::new(TextFormat))
            .with_candidate("app/src/main/java/**/MainActivity.kt");

        let path = provider.resolve_path(&request(temp.path(), "android", "mainActivity")).unwrap();
        assert_eq!(path, dir.join("MainActivity.kt"));
    }

    #[test]
    fn test_resolve_treats_root_literally() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("app [beta]*");
        let dir = root.join("android/app/src/main/java/com/example");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("MainActivity.kt"), "class MainActivity").unwrap();

        let provider = FileModProvider::new("app/src/main/java/**/MainActivity.kt", Arc::new(TextFormat));
        let path = provider.resolve_path(&request(&root, "android", "mainActivity")).unwrap();
        assert_eq!(path, dir.join("MainActivity.kt"));
    }

    #[test]
    fn test_project_name_is_required() {
        let temp = TempDir::new().unwrap();
        let provider = FileModProvider::new("{projectName}/Info.plist", Arc::new(JsonFormat));

        let err = provider.resolve_path(&request(temp.path(), "ios", "infoPlist")).unwrap_err();
        assert_eq!(err.code(), "CONSISTENCY");

        let path = provider
            .resolve_path(&request(temp.path(), "ios", "infoPlist").with_project_name(Some("App".into())))
            .unwrap();
        assert_eq!(path, temp.path().join("ios/App/Info.plist"));
    }

    #[tokio::test]
    async fn test_read_write() {
        let temp = TempDir::new().unwrap();
        let provider = FileModProvider::new("nested/config.json", Arc::new(JsonFormat));
        let request = request(temp.path(), "ios", "podfileProperties");
        let path = provider.file_path(&request).await.unwrap();

        assert!(provider.read(&path, &request).await.is_err());

        provider.write(&path, &json!({ "expo.jsEngine": "hermes" }), &request).await.unwrap();
        let value = provider.read(&path, &request).await.unwrap();
        assert_eq!(value["expo.jsEngine"], "hermes");
    }
}
