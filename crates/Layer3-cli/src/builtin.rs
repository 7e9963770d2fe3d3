//! 내장 플러그인 카탈로그
//!
//! CLI 는 네이티브 코드를 동적으로 로드하지 않으므로, Descriptor 의 `plugins`
//! 에서 참조할 수 있는 선언형 플러그인을 함께 제공합니다.
//!
//! ```json
//! "plugins": [
//!   ["@modkit/set-config", { "android": { "package": "com.example" } }],
//!   ["@modkit/merge-results", { "platform": "ios", "mod": "podfileProperties",
//!                               "values": { "expo.jsEngine": "hermes" } }],
//!   ["@modkit/append-text", { "platform": "android", "mod": "appBuildGradle",
//!                             "line": "apply plugin: 'com.google.gms.google-services'" }]
//! ]
//! ```

use modkit_core::{
    extend_strict, mod_action, CatalogLoader, ConfigPlugin, Descriptor, Error, ModConfig,
    PluginPackage, PluginProps, Result,
};
use serde_json::Value;

pub const SET_CONFIG: &str = "@modkit/set-config";
pub const MERGE_RESULTS: &str = "@modkit/merge-results";
pub const APPEND_TEXT: &str = "@modkit/append-text";

/// 내장 플러그인이 등록된 카탈로그
pub fn catalog() -> CatalogLoader {
    CatalogLoader::new()
        .with_package(PluginPackage::with_app_plugin(SET_CONFIG, ConfigPlugin::new(SET_CONFIG, set_config)))
        .with_package(PluginPackage::with_app_plugin(
            MERGE_RESULTS,
            ConfigPlugin::new(MERGE_RESULTS, merge_results),
        ))
        .with_package(PluginPackage::with_app_plugin(APPEND_TEXT, ConfigPlugin::new(APPEND_TEXT, append_text)))
}

/// set-config 로 바꿀 수 없는 필드
const PROTECTED_KEYS: &[&str] = &["plugins", "_internal"];

/// 속성 객체를 Descriptor 사용자 설정에 병합
///
/// `name`, `slug` 같은 필드도 직렬화된 Descriptor 전체에 병합한 뒤 다시
/// 읽어 들이므로 typed 필드에 반영됩니다.
fn set_config(config: Descriptor, props: &PluginProps) -> Result<Descriptor> {
    let Some(values) = props.value().as_object() else {
        return Err(Error::Plugin(format!("{} expects an object of config values", SET_CONFIG)));
    };
    if let Some(key) = values.keys().find(|key| PROTECTED_KEYS.contains(&key.as_str())) {
        return Err(Error::Plugin(format!("{} cannot change `{}`", SET_CONFIG, key)));
    }

    let mut merged = config.to_value()?;
    deep_merge(&mut merged, props.value());

    let mut next = Descriptor::from_value(merged)
        .map_err(|e| Error::Plugin(format!("{} produced an invalid config: {}", SET_CONFIG, e)))?;
    next.internal = config.internal;
    next.mods = config.mods;
    Ok(next)
}

/// mod 결과 객체에 값 병합
fn merge_results(config: Descriptor, props: &PluginProps) -> Result<Descriptor> {
    let (platform, mod_name) = target(MERGE_RESULTS, props)?;
    let values = props
        .get("values")
        .filter(|v| v.is_object())
        .cloned()
        .ok_or_else(|| Error::Plugin(format!("{} requires an object `values`", MERGE_RESULTS)))?;

    Ok(extend_strict(
        config,
        platform,
        mod_name,
        mod_action(move |mut config: ModConfig| {
            let values = values.clone();
            async move {
                deep_merge(&mut config.results, &values);
                Ok(config)
            }
        }),
    ))
}

/// 텍스트 mod 에 줄 추가 (이미 있으면 생략)
fn append_text(config: Descriptor, props: &PluginProps) -> Result<Descriptor> {
    let (platform, mod_name) = target(APPEND_TEXT, props)?;
    let line = props
        .get("line")
        .and_then(Value::as_str)
        .map(String::from)
        .ok_or_else(|| Error::Plugin(format!("{} requires a string `line`", APPEND_TEXT)))?;

    Ok(extend_strict(
        config,
        platform,
        mod_name,
        mod_action(move |mut config: ModConfig| {
            let line = line.clone();
            async move {
                let contents = config
                    .results
                    .get("contents")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();

                if !contents.lines().any(|existing| existing.trim() == line.trim()) {
                    let separator = if contents.is_empty() || contents.ends_with('\n') { "" } else { "\n" };
                    config.results["contents"] = Value::String(format!("{}{}{}\n", contents, separator, line));
                }
                Ok(config)
            }
        }),
    ))
}

fn target(plugin: &str, props: &PluginProps) -> Result<(String, String)> {
    let field = |key: &str| {
        props
            .get(key)
            .and_then(Value::as_str)
            .map(String::from)
            .ok_or_else(|| Error::Plugin(format!("{} requires a string `{}`", plugin, key)))
    };
    Ok((field("platform")?, field("mod")?))
}

/// 객체는 재귀 병합, 그 외 값은 덮어씀
fn deep_merge(target: &mut Value, source: &Value) {
    match (target, source) {
        (Value::Object(target), Value::Object(source)) => {
            for (key, value) in source {
                deep_merge(target.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
        (target, source) => *target = source.clone(),
    }
}
