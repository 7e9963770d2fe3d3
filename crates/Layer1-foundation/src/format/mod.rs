//! File Formats - 네이티브 파일 파서 인터페이스
//!
//! 엔진은 파일 내용을 해석하지 않습니다. 각 포맷은 bytes 를 JSON 값 트리로
//! 변환(parse)하고 다시 bytes 로 직렬화(serialize)하는 역할만 합니다.
//!
//! - `json`, `text`: 내장 포맷
//! - `xml`, `plist`, `pbxproj`, `properties`: 임베딩 측에서 등록
//!
//! ```ignore
//! let mut formats = FormatRegistry::with_builtin();
//! formats.register(Arc::new(MyXmlFormat));
//! ```

mod json;
mod text;

pub use json::JsonFormat;
pub use text::{language_for_path, TextFormat};

use crate::{Error, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

// ============================================================================
// FileFormat Trait
// ============================================================================

/// 파일 포맷 (parse / serialize)
pub trait FileFormat: Send + Sync {
    /// 포맷 이름 ("xml", "plist", ...)
    fn name(&self) -> &str;

    /// bytes -> 구조화된 값
    fn parse(&self, path: &Path, bytes: &[u8]) -> Result<Value>;

    /// 구조화된 값 -> bytes
    fn serialize(&self, path: &Path, value: &Value) -> Result<Vec<u8>>;
}

/// 등록되지 않은 포맷의 자리표시자
///
/// 실제로 해당 mod 가 컴파일될 때만 에러를 냅니다.
#[derive(Debug, Clone)]
pub struct UnavailableFormat {
    name: String,
}

impl UnavailableFormat {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl FileFormat for UnavailableFormat {
    fn name(&self) -> &str {
        &self.name
    }

    fn parse(&self, _path: &Path, _bytes: &[u8]) -> Result<Value> {
        Err(Error::FormatUnavailable(self.name.clone()))
    }

    fn serialize(&self, _path: &Path, _value: &Value) -> Result<Vec<u8>> {
        Err(Error::FormatUnavailable(self.name.clone()))
    }
}

// ============================================================================
// FormatRegistry
// ============================================================================

/// 포맷 레지스트리 (이름 -> 포맷)
#[derive(Clone, Default)]
pub struct FormatRegistry {
    formats: HashMap<String, Arc<dyn FileFormat>>,
}

impl FormatRegistry {
    /// 빈 레지스트리
    pub fn new() -> Self {
        Self::default()
    }

    /// 내장 포맷(json, text)이 등록된 레지스트리
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(JsonFormat));
        registry.register(Arc::new(TextFormat));
        registry
    }

    /// 포맷 등록 (같은 이름이면 교체)
    pub fn register(&mut self, format: Arc<dyn FileFormat>) {
        self.formats.insert(format.name().to_string(), format);
    }

    /// 포맷 조회
    pub fn get(&self, name: &str) -> Option<Arc<dyn FileFormat>> {
        self.formats.get(name).cloned()
    }

    /// 포맷 조회 (없으면 UnavailableFormat)
    pub fn resolve(&self, name: &str) -> Arc<dyn FileFormat> {
        self.get(name)
            .unwrap_or_else(|| Arc::new(UnavailableFormat::new(name)) as Arc<dyn FileFormat>)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// 등록된 포맷 이름 (정렬됨)
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }
}

impl std::fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("formats", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strings::{FORMAT_JSON, FORMAT_TEXT, FORMAT_XML};

    #[test]
    fn test_builtin_formats() {
        let registry = FormatRegistry::with_builtin();
        assert!(registry.contains(FORMAT_JSON));
        assert!(registry.contains(FORMAT_TEXT));
        assert!(!registry.contains(FORMAT_XML));
        assert_eq!(registry.names(), vec!["json".to_string(), "text".to_string()]);
    }

    #[test]
    fn test_unavailable_format() {
        let registry = FormatRegistry::with_builtin();
        let xml = registry.resolve(FORMAT_XML);

        assert_eq!(xml.name(), "xml");
        let err = xml.parse(Path::new("AndroidManifest.xml"), b"<manifest/>").unwrap_err();
        assert!(matches!(err, Error::FormatUnavailable(ref name) if name == "xml"));
    }
}
