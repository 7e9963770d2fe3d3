//! Config - 엔진 설정 관리
//!
//! - `engine.rs` - EngineConfig (글로벌 + 프로젝트 병합)

mod engine;

pub use engine::{EngineConfig, ENV_DEBUG, MODKIT_CONFIG_FILE};
