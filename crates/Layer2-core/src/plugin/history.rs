//! Run-Once Guard - 플러그인 history 기반 중복 적용 방지

use super::traits::{ConfigPlugin, PluginProps};
use crate::descriptor::{Descriptor, PluginHistoryItem};
use crate::Result;
use modkit_foundation::strings::UNVERSIONED;
use tracing::debug;

/// `run_once` 옵션
#[derive(Debug, Clone)]
pub struct RunOnceOptions {
    pub plugin: ConfigPlugin,
    pub name: String,
    pub version: Option<String>,
}

impl RunOnceOptions {
    pub fn new(plugin: ConfigPlugin, name: impl Into<String>) -> Self {
        Self {
            plugin,
            name: name.into(),
            version: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

/// history 기록 (같은 이름이면 덮어씀)
pub fn add_history_item(mut config: Descriptor, item: PluginHistoryItem) -> Descriptor {
    config.internal.plugin_history.insert(item.name.clone(), item);
    config
}

/// 이름 기준으로 플러그인을 한 번만 적용
pub fn run_once(config: Descriptor, options: RunOnceOptions) -> Result<Descriptor> {
    run_once_with_props(
        config,
        &options.plugin,
        &options.name,
        options.version.as_deref(),
        &PluginProps::default(),
    )
}

/// `run_once` 를 재사용 가능한 플러그인으로 포장
///
/// 받은 속성은 그대로 내부 플러그인에 전달됩니다.
pub fn create_run_once_plugin(
    plugin: ConfigPlugin,
    name: impl Into<String>,
    version: Option<String>,
) -> ConfigPlugin {
    let name = name.into();
    let label = name.clone();
    ConfigPlugin::new(label, move |config, props| {
        run_once_with_props(config, &plugin, &name, version.as_deref(), props)
    })
}

fn run_once_with_props(
    config: Descriptor,
    plugin: &ConfigPlugin,
    name: &str,
    version: Option<&str>,
    props: &PluginProps,
) -> Result<Descriptor> {
    if config.history_item(name).is_some() {
        debug!("Plugin {} already applied, skipping", name);
        return Ok(config);
    }

    let config = add_history_item(
        config,
        PluginHistoryItem {
            name: name.to_string(),
            version: version.unwrap_or(UNVERSIONED).to_string(),
            platform: None,
        },
    );
    plugin.apply(config, props)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn counting_plugin() -> ConfigPlugin {
        ConfigPlugin::new("counter", |mut config, _| {
            let count = config.get("count").and_then(Value::as_u64).unwrap_or(0);
            config.set("count", json!(count + 1));
            Ok(config)
        })
    }

    #[test]
    fn test_run_once_applies_plugin_once() {
        let options = RunOnceOptions::new(counting_plugin(), "counter").with_version("1.2.0");

        let config = run_once(Descriptor::new("app"), options.clone()).unwrap();
        let config = run_once(config, options).unwrap();

        assert_eq!(config.get("count"), Some(&json!(1)));
        assert_eq!(config.history_item("counter").unwrap().version, "1.2.0");
    }

    #[test]
    fn test_default_version() {
        let config = run_once(Descriptor::new("app"), RunOnceOptions::new(counting_plugin(), "counter")).unwrap();
        assert_eq!(config.history_item("counter").unwrap().version, UNVERSIONED);
    }

    #[test]
    fn test_run_once_plugin_forwards_props() {
        let inner = ConfigPlugin::new("with-name", |mut config, props| {
            config.set("label", props.value().clone());
            Ok(config)
        });
        let plugin = create_run_once_plugin(inner, "with-name", None);

        let config = plugin
            .apply(Descriptor::new("app"), &PluginProps::new(json!("first")))
            .unwrap();
        let config = plugin.apply(config, &PluginProps::new(json!("second"))).unwrap();

        assert_eq!(config.get("label"), Some(&json!("first")));
    }
}
