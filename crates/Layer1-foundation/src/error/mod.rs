//! Error types for modkit
//!
//! 모든 에러를 중앙에서 관리

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// modkit 에러 타입
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // 설정 관련
    // ========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    // ========================================================================
    // 플러그인 해석 (fallback 으로 복구 가능)
    // ========================================================================
    #[error(
        "Failed to resolve plugin for module \"{reference}\" relative to \"{}\"",
        project_root.display()
    )]
    PluginNotFound {
        reference: String,
        project_root: PathBuf,
    },

    #[error("Invalid plugin type: {0}")]
    InvalidPluginType(String),

    #[error("Failed to load plugin \"{reference}\": {message}")]
    PluginLoad { reference: String, message: String },

    // ========================================================================
    // 플러그인 사용 오류
    // ========================================================================
    #[error("Invalid static plugin: {0}")]
    InvalidStaticPlugin(String),

    #[error("Plugin property '{0}' is reserved")]
    ReservedProperty(String),

    #[error("Plugin error: {0}")]
    Plugin(String),

    // ========================================================================
    // Mod 관련
    // ========================================================================
    #[error(
        "Mod `mods.{platform}.{mod_name}` evaluated to an invalid result. Expected {expected}, instead got: {snapshot}"
    )]
    ModShape {
        platform: String,
        mod_name: String,
        expected: String,
        snapshot: String,
    },

    #[error(
        "Initial base modifier for \"{platform}.{mod_name}\" is not a provider and therefore will not provide modResults to child mods"
    )]
    MissingProvider { platform: String, mod_name: String },

    #[error("Provider error in `mods.{platform}.{mod_name}`: {message}")]
    Provider {
        platform: String,
        mod_name: String,
        message: String,
    },

    // ========================================================================
    // 파일 포맷
    // ========================================================================
    #[error("No file format registered for \"{0}\"")]
    FormatUnavailable(String),

    #[error("Format error ({format}): {message}")]
    Format { format: String, message: String },

    // ========================================================================
    // 일관성 (임베딩 측 프로그래밍 오류)
    // ========================================================================
    #[error("Project root is required: {0}")]
    MissingProjectRoot(String),

    #[error("Consistency error: {0}")]
    Consistency(String),

    // ========================================================================
    // 외부 에러 변환
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ========================================================================
    // 기타
    // ========================================================================
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// 안정적인 에러 코드
    pub fn code(&self) -> &'static str {
        match self {
            Error::Config(_) => "INVALID_CONFIG",
            Error::PluginNotFound { .. } => "PLUGIN_NOT_FOUND",
            Error::InvalidPluginType(_) => "INVALID_PLUGIN_TYPE",
            Error::PluginLoad { .. } => "PLUGIN_LOAD_FAILED",
            Error::InvalidStaticPlugin(_) => "INVALID_STATIC_PLUGIN",
            Error::ReservedProperty(_) => "RESERVED_PROPERTY",
            Error::Plugin(_) => "PLUGIN_FAILED",
            Error::ModShape { .. } => "INVALID_MOD_RESULTS",
            Error::MissingProvider { .. } => "MISSING_PROVIDER",
            Error::Provider { .. } => "PROVIDER_FAILED",
            Error::FormatUnavailable(_) => "FORMAT_UNAVAILABLE",
            Error::Format { .. } => "INVALID_FORMAT",
            Error::MissingProjectRoot(_) => "MISSING_PROJECT_ROOT",
            Error::Consistency(_) => "CONSISTENCY",
            Error::Io(_) => "IO",
            Error::Json(_) => "JSON",
            Error::Internal(_) => "INTERNAL",
        }
    }

    /// fallback 플러그인으로 대체 가능한 해석 에러인지 확인
    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            Error::PluginNotFound { .. } | Error::InvalidPluginType(_) | Error::PluginLoad { .. }
        )
    }

    /// Provider 에러 생성 헬퍼
    pub fn provider(
        platform: impl Into<String>,
        mod_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Error::Provider {
            platform: platform.into(),
            mod_name: mod_name.into(),
            message: message.into(),
        }
    }

    /// Format 에러 생성 헬퍼
    pub fn format(format: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Format {
            format: format.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// From 구현 (추가 변환)
// ============================================================================

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Internal(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Internal(s.to_string())
    }
}
