//! JSON 포맷

use super::FileFormat;
use crate::strings::FORMAT_JSON;
use crate::{Error, Result};
use serde_json::Value;
use std::path::Path;

/// JSON 파일 포맷 (pretty print + trailing newline)
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl FileFormat for JsonFormat {
    fn name(&self) -> &str {
        FORMAT_JSON
    }

    fn parse(&self, path: &Path, bytes: &[u8]) -> Result<Value> {
        serde_json::from_slice(bytes)
            .map_err(|e| Error::format(FORMAT_JSON, format!("{}: {}", path.display(), e)))
    }

    fn serialize(&self, _path: &Path, value: &Value) -> Result<Vec<u8>> {
        let mut bytes = serde_json::to_vec_pretty(value)?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_object() {
        let value = JsonFormat
            .parse(Path::new("Podfile.properties.json"), br#"{"expo.jsEngine":"hermes"}"#)
            .unwrap();
        assert_eq!(value, json!({ "expo.jsEngine": "hermes" }));
    }

    #[test]
    fn test_parse_error_names_file() {
        let err = JsonFormat
            .parse(Path::new("Podfile.properties.json"), b"{")
            .unwrap_err();
        assert!(err.to_string().contains("Podfile.properties.json"));
    }

    #[test]
    fn test_serialize_trailing_newline() {
        let bytes = JsonFormat
            .serialize(Path::new("a.json"), &json!({ "a": 1 }))
            .unwrap();
        assert!(bytes.ends_with(b"}\n"));
    }
}
