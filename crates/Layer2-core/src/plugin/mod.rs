//! # Plugin System
//!
//! Config Plugin 해석, 적용, 중복 방지
//!
//! ## 개요
//!
//! 플러그인은 `Descriptor -> Descriptor` 함수입니다. 플러그인은 Descriptor 를
//! 직접 수정하거나, mod 를 등록해 네이티브 파일 편집을 예약합니다.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │              resolve_static_plugin            │
//! │  "pkg" / ["pkg", props] / ConfigPlugin        │
//! │          │                                    │
//! │          ▼                                    │
//! │   PluginLoader (locate, load)                 │
//! │     └─ CatalogLoader (in-memory packages)     │
//! │          │ 실패 시                             │
//! │          ▼                                    │
//! │   fallback (resolver_error 전달)              │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## 예시
//!
//! ```ignore
//! let loader = CatalogLoader::new()
//!     .with_package(PluginPackage::with_app_plugin("with-camera", camera_plugin));
//!
//! let config = apply_descriptor_plugins(config, &loader, None)?;
//! ```

mod catalog;
mod history;
mod resolver;
mod traits;

pub use catalog::{CatalogLoader, PluginPackage, PROJECT_PACKAGE};
pub use history::{add_history_item, create_run_once_plugin, run_once, RunOnceOptions};
pub use resolver::{
    apply_descriptor_plugins, resolve_config_plugin_function, resolve_static_plugin,
    warn_unresolved_plugin, with_plugins, PluginExport, PluginLoader, PluginLocation,
    PluginReference, StaticPlugin, StaticPluginOptions,
};
pub use traits::{ConfigPlugin, PluginFn, PluginProps};
