//! 텍스트 포맷 - 내용을 해석하지 않고 `{ "contents", "language" }` 로 감쌉니다.

use super::FileFormat;
use crate::strings::FORMAT_TEXT;
use crate::{Error, Result};
use serde_json::{json, Value};
use std::path::Path;

/// 원문 텍스트 포맷 (gradle, Podfile, 소스 파일)
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFormat;

/// 파일 경로로 언어 추정
pub fn language_for_path(path: &Path) -> Option<&'static str> {
    if path.file_name().and_then(|n| n.to_str()) == Some("Podfile") {
        return Some("rb");
    }

    match path.extension().and_then(|e| e.to_str())? {
        "gradle" => Some("groovy"),
        "kts" | "kt" => Some("kt"),
        "java" => Some("java"),
        "swift" => Some("swift"),
        "m" => Some("objc"),
        "mm" => Some("objcpp"),
        "rb" => Some("rb"),
        _ => None,
    }
}

impl FileFormat for TextFormat {
    fn name(&self) -> &str {
        FORMAT_TEXT
    }

    fn parse(&self, path: &Path, bytes: &[u8]) -> Result<Value> {
        let contents = std::str::from_utf8(bytes)
            .map_err(|e| Error::format(FORMAT_TEXT, format!("{}: {}", path.display(), e)))?;

        let mut value = json!({ "contents": contents });
        if let Some(language) = language_for_path(path) {
            value["language"] = json!(language);
        }
        Ok(value)
    }

    fn serialize(&self, path: &Path, value: &Value) -> Result<Vec<u8>> {
        value
            .get("contents")
            .and_then(Value::as_str)
            .map(|contents| contents.as_bytes().to_vec())
            .ok_or_else(|| {
                Error::format(
                    FORMAT_TEXT,
                    format!("{}: expected a string `contents` field", path.display()),
                )
            })
    }
}
