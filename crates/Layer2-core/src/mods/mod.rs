//! # Mod System
//!
//! 네이티브 프로젝트 파일 변환 엔진
//!
//! ## 아키텍처
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                       ModCompiler                         │
//! │   1. BaseModProviders::attach  (provider 를 바깥에 연결)    │
//! │   2. evaluate                                             │
//! │      platform (등록 순서)                                  │
//! │        └─ mod (dangerous -> ... -> finalized)             │
//! │             └─ [provider] -> [P2] -> [P1] -> [noop]       │
//! │   3. 결과를 _internal.modResults 에 반영                   │
//! └───────────────────────────────────────────────────────────┘
//! ```

mod compiler;
mod defaults;
mod extend;
mod file_provider;
mod provider;
mod registry;
mod request;

pub use compiler::{
    compile, evaluate, find_project_name, mod_precedence, sort_mods, CompileOptions, ModCompiler,
    MOD_PRECEDENCE,
};
pub use defaults::BaseModProviders;
pub use extend::{extend, extend_dangerous, extend_finalized, extend_strict, ExtendOptions};
pub use file_provider::{FileModProvider, PROJECT_NAME_PLACEHOLDER};
pub use provider::{
    attach_provider, read_results, validate_mod_results, BaseModProvider, PassThroughProvider,
};
pub use registry::{mod_action, ModChain, ModHandler, ModRegistry, ResultShape};
pub use request::{ModConfig, ModRequest};
