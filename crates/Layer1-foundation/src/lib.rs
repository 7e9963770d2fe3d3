//! # modkit-foundation
//!
//! Foundation layer for modkit:
//! - Error: 중앙 에러 타입 (에러 코드 포함)
//! - Config: 엔진 설정 (EngineConfig, 글로벌 + 프로젝트 병합)
//! - Storage: JsonStore (설정 파일)
//! - Format: 네이티브 파일 포맷 인터페이스 (json/text 내장)
//! - Strings: 플랫폼/mod/포맷 이름 상수
//!
//! ## 아키텍처
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Layer3-cli (modkit)                                    │
//! │                     │                                   │
//! │  Layer2-core: Plugin Resolver / Mod Registry / Compiler │
//! │                     │                                   │
//! │          ┌──────────┴──────────┐                        │
//! │          ▼                     ▼                        │
//! │   FormatRegistry         EngineConfig                   │
//! │   (json, text, ...)      (JsonStore)                    │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod storage;
pub mod strings;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, Result};

// ============================================================================
// Config (설정)
// ============================================================================
pub use config::{EngineConfig, ENV_DEBUG, MODKIT_CONFIG_FILE};

// ============================================================================
// Storage (저장소)
// ============================================================================
pub use storage::JsonStore;

// ============================================================================
// Format (파일 포맷)
// ============================================================================
pub use format::{
    language_for_path, FileFormat, FormatRegistry, JsonFormat, TextFormat, UnavailableFormat,
};
