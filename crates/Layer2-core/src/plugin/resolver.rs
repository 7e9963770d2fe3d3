//! Plugin Resolver - static 플러그인 참조 해석 및 적용
//!
//! ```text
//!   "pkg"                  -> locate(pkg) -> app.plugin | main
//!   "pkg/sub/file"         -> locate(pkg) -> sub/file
//!   ["pkg", { props }]     -> 위와 같고 props 전달
//!   ConfigPlugin           -> 그대로 호출
//! ```
//!
//! 해석 실패(찾지 못함, 잘못된 export, 로드 에러)는 fallback 이 있으면
//! fallback 으로 대체됩니다. 플러그인 자체가 낸 에러는 항상 전파됩니다.

use super::traits::{ConfigPlugin, PluginProps};
use crate::descriptor::Descriptor;
use crate::{Error, Result};
use modkit_foundation::strings::RESOLVER_ERROR_PROPERTY;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

// ============================================================================
// PluginLoader Trait
// ============================================================================

/// 찾아낸 플러그인 파일 위치
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginLocation {
    /// 패키지 이름
    pub package: String,

    /// 패키지 안의 파일 (`app.plugin`, main, 또는 직접 지정한 경로)
    pub entry: String,

    /// 해석 기준 프로젝트 루트
    pub project_root: PathBuf,
}

impl PluginLocation {
    /// 진단 메시지용 참조 문자열
    pub fn reference(&self) -> String {
        format!("{}/{}", self.package, self.entry)
    }
}

/// 플러그인 모듈이 내보낸 값
#[derive(Debug, Clone)]
pub enum PluginExport {
    /// 호출 가능한 플러그인
    Plugin(ConfigPlugin),

    /// `default` 래퍼 (한 단계만 풀림)
    Default(Box<PluginExport>),

    /// 호출할 수 없는 값
    Value(Value),
}

impl PluginExport {
    /// 단일 플러그인으로 변환
    pub fn into_plugin(self, reference: &str) -> Result<ConfigPlugin> {
        let export = match self {
            Self::Default(inner) => *inner,
            other => other,
        };

        match export {
            Self::Plugin(plugin) => Ok(plugin.or_named(reference)),
            Self::Default(_) => Err(Error::InvalidPluginType(format!(
                "Plugin \"{}\" exports a nested default wrapper instead of a function",
                reference
            ))),
            Self::Value(value) => Err(Error::InvalidPluginType(format!(
                "Plugin \"{}\" must export a function, found {}",
                reference,
                value_kind(&value)
            ))),
        }
    }
}

/// 플러그인 로더
///
/// `locate` 는 패키지를 찾지 못하면 `Ok(None)` 을 반환하고,
/// `load` 는 로드 실패를 `Error::PluginLoad` 로 보고합니다.
pub trait PluginLoader: Send + Sync {
    fn locate(&self, project_root: &Path, reference: &str) -> Result<Option<PluginLocation>>;

    fn load(&self, location: &PluginLocation) -> Result<PluginExport>;
}

/// 문자열 참조를 플러그인 함수로 해석
pub fn resolve_config_plugin_function(
    loader: &dyn PluginLoader,
    project_root: &Path,
    reference: &str,
) -> Result<ConfigPlugin> {
    let location = loader
        .locate(project_root, reference)?
        .ok_or_else(|| Error::PluginNotFound {
            reference: reference.to_string(),
            project_root: project_root.to_path_buf(),
        })?;

    debug!("Loading plugin {} from {}", reference, location.reference());
    loader.load(&location)?.into_plugin(reference)
}

// ============================================================================
// StaticPlugin
// ============================================================================

/// 플러그인 참조
#[derive(Debug, Clone)]
pub enum PluginReference {
    /// 패키지 이름 또는 파일 경로
    Named(String),

    /// 이미 로드된 플러그인
    Function(ConfigPlugin),
}

/// static 플러그인 (참조 + 속성)
#[derive(Debug, Clone)]
pub struct StaticPlugin {
    pub reference: PluginReference,
    pub props: Value,
}

impl StaticPlugin {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            reference: PluginReference::Named(name.into()),
            props: Value::Null,
        }
    }

    pub fn function(plugin: ConfigPlugin) -> Self {
        Self {
            reference: PluginReference::Function(plugin),
            props: Value::Null,
        }
    }

    pub fn with_props(mut self, props: Value) -> Self {
        self.props = props;
        self
    }

    /// JSON 형태(`"name"`, `["name"]`, `["name", props]`)에서 생성
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::String(name) => Ok(Self::named(name.clone())),
            Value::Array(items) => {
                if items.is_empty() || items.len() > 2 {
                    return Err(Error::InvalidStaticPlugin(format!(
                        "Wrong number of arguments for plugin: expected 1 or 2, found {} ({})",
                        items.len(),
                        value
                    )));
                }
                match &items[0] {
                    Value::String(name) => Ok(Self::named(name.clone())
                        .with_props(items.get(1).cloned().unwrap_or(Value::Null))),
                    other => Err(Error::InvalidPluginType(format!(
                        "Plugin reference must be a string, found {}",
                        value_kind(other)
                    ))),
                }
            }
            other => Err(Error::InvalidPluginType(format!(
                "Plugin reference must be a string or an array, found {}",
                value_kind(other)
            ))),
        }
    }

    /// 진단용 이름
    pub fn display_name(&self) -> String {
        match &self.reference {
            PluginReference::Named(name) => name.clone(),
            PluginReference::Function(plugin) => plugin.name().unwrap_or("<anonymous>").to_string(),
        }
    }
}

impl From<ConfigPlugin> for StaticPlugin {
    fn from(plugin: ConfigPlugin) -> Self {
        Self::function(plugin)
    }
}

// ============================================================================
// resolve_static_plugin
// ============================================================================

/// `resolve_static_plugin` 옵션
#[derive(Debug, Clone)]
pub struct StaticPluginOptions {
    pub plugin: StaticPlugin,

    /// 해석에 실패했을 때 대신 실행할 플러그인
    pub fallback: Option<ConfigPlugin>,

    /// 없으면 Descriptor 의 프로젝트 루트 사용
    pub project_root: Option<PathBuf>,
}

impl StaticPluginOptions {
    pub fn new(plugin: StaticPlugin) -> Self {
        Self {
            plugin,
            fallback: None,
            project_root: None,
        }
    }

    pub fn with_fallback(mut self, fallback: ConfigPlugin) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = Some(root.into());
        self
    }
}

/// static 플러그인 해석 후 적용
pub fn resolve_static_plugin(
    config: Descriptor,
    loader: &dyn PluginLoader,
    options: StaticPluginOptions,
) -> Result<Descriptor> {
    let StaticPluginOptions {
        plugin,
        fallback,
        project_root,
    } = options;

    if plugin.props.get(RESOLVER_ERROR_PROPERTY).is_some() {
        return Err(Error::ReservedProperty(RESOLVER_ERROR_PROPERTY.to_string()));
    }
    let props = PluginProps::new(plugin.props);

    let name = match plugin.reference {
        PluginReference::Function(func) => return func.apply(config, &props),
        PluginReference::Named(name) => name,
    };

    let project_root = project_root
        .or_else(|| config.internal.project_root.clone())
        .ok_or_else(|| Error::MissingProjectRoot(format!("cannot resolve plugin \"{}\"", name)))?;

    match resolve_config_plugin_function(loader, &project_root, &name) {
        Ok(func) => func.apply(config, &props),
        Err(e) if e.is_resolution_error() => match fallback {
            Some(fallback) => {
                debug!("Plugin {} could not be resolved, using fallback: {}", name, e);
                fallback.apply(config, &props.with_resolver_error(Arc::new(e)))
            }
            None => Err(e),
        },
        Err(e) => Err(e),
    }
}

// ============================================================================
// 플러그인 목록
// ============================================================================

/// 플러그인 목록을 순서대로 적용
pub fn with_plugins(
    config: Descriptor,
    loader: &dyn PluginLoader,
    plugins: impl IntoIterator<Item = StaticPlugin>,
) -> Result<Descriptor> {
    plugins.into_iter().try_fold(config, |config, plugin| {
        resolve_static_plugin(config, loader, StaticPluginOptions::new(plugin))
    })
}

/// Descriptor 의 `plugins` 배열 적용
///
/// 모든 참조를 먼저 검증한 뒤 적용합니다.
pub fn apply_descriptor_plugins(
    config: Descriptor,
    loader: &dyn PluginLoader,
    fallback: Option<ConfigPlugin>,
) -> Result<Descriptor> {
    let plugins = config
        .plugins
        .iter()
        .map(StaticPlugin::from_value)
        .collect::<Result<Vec<_>>>()?;

    plugins.into_iter().try_fold(config, |config, plugin| {
        let mut options = StaticPluginOptions::new(plugin);
        options.fallback = fallback.clone();
        resolve_static_plugin(config, loader, options)
    })
}

/// 해석 실패 시 경고만 남기고 넘어가는 fallback
pub fn warn_unresolved_plugin() -> ConfigPlugin {
    ConfigPlugin::new("warn-unresolved", |config, props| {
        match props.resolver_error() {
            Some(e) => warn!("Skipping unresolved plugin: {}", e),
            None => warn!("Skipping unresolved plugin"),
        }
        Ok(config)
    })
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
