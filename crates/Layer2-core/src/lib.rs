//! modkit-core: Config Plugin & Mod Engine
//!
//! Layer2 - 플러그인 해석과 네이티브 프로젝트 파일 변환 레이어
//!
//! # 주요 모듈
//!
//! - `descriptor`: 앱 설정 Descriptor (플러그인 history, mod 결과 포함)
//! - `plugin`: Config Plugin 해석 및 적용 (static 참조, fallback, run-once)
//! - `mods`: Mod Registry, Interception Chain, Base Mod Provider, Compiler
//!
//! # 사용 예시
//!
//! ```ignore
//! use modkit_core::{compile, extend_strict, mod_action, CompileOptions, Descriptor};
//!
//! let config = Descriptor::new("my-app").with_platforms(&["android"]);
//!
//! // AndroidManifest.xml 편집 예약
//! let config = extend_strict(config, "android", "manifest", mod_action(|mut config| async move {
//!     config.results["manifest"]["$"]["package"] = json!("com.example");
//!     Ok(config)
//! }));
//!
//! // provider 연결 후 read -> 플러그인 -> write
//! let config = compile(config, &CompileOptions::new("/path/to/project")).await?;
//! ```

pub mod descriptor;
pub mod mods;
pub mod plugin;

// Re-exports: Foundation
pub use modkit_foundation::{Error, Result};

// Re-exports: Descriptor
pub use descriptor::{Descriptor, InternalState, PluginHistoryItem};

// Re-exports: Mods
pub use mods::{
    attach_provider, compile, evaluate, extend, extend_dangerous, extend_finalized,
    extend_strict, find_project_name, mod_action, mod_precedence, sort_mods,
    validate_mod_results, BaseModProvider, BaseModProviders, CompileOptions, ExtendOptions,
    FileModProvider, ModChain, ModCompiler, ModConfig, ModHandler, ModRegistry, ModRequest,
    PassThroughProvider, ResultShape, MOD_PRECEDENCE,
};

// Re-exports: Plugin
pub use plugin::{
    add_history_item, apply_descriptor_plugins, create_run_once_plugin,
    resolve_config_plugin_function, resolve_static_plugin, run_once, warn_unresolved_plugin,
    with_plugins, CatalogLoader, ConfigPlugin, PluginExport, PluginLoader, PluginLocation,
    PluginPackage, PluginProps, PluginReference, RunOnceOptions, StaticPlugin,
    StaticPluginOptions,
};
