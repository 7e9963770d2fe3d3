//! Plugin 통합 테스트 - 해석, fallback, run-once, 디스크 기반 컴파일
//!
//! `cargo test -p modkit-core --test plugin_test`

use modkit_core::{
    apply_descriptor_plugins, compile, create_run_once_plugin, extend_strict, mod_action,
    resolve_static_plugin, run_once, with_plugins, CatalogLoader, CompileOptions, ConfigPlugin,
    Descriptor, Error, ModConfig, PluginExport, PluginPackage, RunOnceOptions, StaticPlugin,
    StaticPluginOptions,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;

/// 속성 `label` 을 Descriptor 에 기록하는 플러그인
fn label_plugin(name: &str) -> ConfigPlugin {
    ConfigPlugin::new(name, |mut config, props| {
        let label = props.get("label").cloned().unwrap_or(json!("none"));
        config.set("label", label);
        Ok(config)
    })
}

fn catalog() -> CatalogLoader {
    CatalogLoader::new()
        .with_package(PluginPackage::with_app_plugin("with-label", label_plugin("with-label")))
        .with_package(
            PluginPackage::new("with-main")
                .with_main("build/index")
                .with_file(
                    "build/index",
                    PluginExport::Default(Box::new(PluginExport::Plugin(label_plugin("main")))),
                ),
        )
        .with_package(PluginPackage::new("not-callable").with_file("app.plugin", PluginExport::Value(json!({}))))
        .with_package(PluginPackage::new("broken").with_broken_file("app.plugin", "SyntaxError: unexpected token"))
}

fn descriptor() -> Descriptor {
    Descriptor::new("app").with_project_root("/project")
}

#[test]
fn test_named_plugin_receives_props() {
    let config = resolve_static_plugin(
        descriptor(),
        &catalog(),
        StaticPluginOptions::new(StaticPlugin::named("with-label").with_props(json!({ "label": "camera" }))),
    )
    .unwrap();
    assert_eq!(config.get("label"), Some(&json!("camera")));

    let config = resolve_static_plugin(
        descriptor(),
        &catalog(),
        StaticPluginOptions::new(StaticPlugin::named("with-main")),
    )
    .unwrap();
    assert_eq!(config.get("label"), Some(&json!("none")));
}

#[test]
fn test_resolution_errors_without_fallback() {
    let loader = catalog();
    for (name, code) in [
        ("unknown-plugin", "PLUGIN_NOT_FOUND"),
        ("not-callable", "INVALID_PLUGIN_TYPE"),
        ("broken", "PLUGIN_LOAD_FAILED"),
    ] {
        let err = resolve_static_plugin(descriptor(), &loader, StaticPluginOptions::new(StaticPlugin::named(name)))
            .unwrap_err();
        assert_eq!(err.code(), code, "{}", name);
    }
}

#[test]
fn test_fallback_receives_resolver_error() {
    let seen = Arc::new(Mutex::new(None));
    let fallback = {
        let seen = Arc::clone(&seen);
        ConfigPlugin::new("fallback", move |mut config, props| {
            *seen.lock() = props.resolver_error().map(|e| e.code());
            config.set("fallback", props.value().clone());
            Ok(config)
        })
    };

    let config = resolve_static_plugin(
        descriptor(),
        &catalog(),
        StaticPluginOptions::new(StaticPlugin::named("unknown-plugin").with_props(json!({ "x": 1 })))
            .with_fallback(fallback),
    )
    .unwrap();

    assert_eq!(*seen.lock(), Some("PLUGIN_NOT_FOUND"));
    assert_eq!(config.get("fallback"), Some(&json!({ "x": 1 })));
}

#[test]
fn test_plugin_errors_are_not_replaced_by_fallback() {
    let loader = CatalogLoader::new().with_package(PluginPackage::with_app_plugin(
        "failing",
        ConfigPlugin::new("failing", |_, _| Err(Error::Plugin("boom".into()))),
    ));

    let err = resolve_static_plugin(
        descriptor(),
        &loader,
        StaticPluginOptions::new(StaticPlugin::named("failing"))
            .with_fallback(ConfigPlugin::new("fallback", |config, _| Ok(config))),
    )
    .unwrap_err();
    assert_eq!(err.code(), "PLUGIN_FAILED");
}

#[test]
fn test_reserved_property_and_project_root() {
    let err = resolve_static_plugin(
        descriptor(),
        &catalog(),
        StaticPluginOptions::new(StaticPlugin::named("with-label").with_props(json!({ "_resolverError": "x" }))),
    )
    .unwrap_err();
    assert_eq!(err.code(), "RESERVED_PROPERTY");

    let err = resolve_static_plugin(
        Descriptor::new("app"),
        &catalog(),
        StaticPluginOptions::new(StaticPlugin::named("with-label")),
    )
    .unwrap_err();
    assert_eq!(err.code(), "MISSING_PROJECT_ROOT");

    let config = resolve_static_plugin(
        Descriptor::new("app"),
        &catalog(),
        StaticPluginOptions::new(StaticPlugin::named("with-label")).with_project_root("/elsewhere"),
    )
    .unwrap();
    assert_eq!(config.get("label"), Some(&json!("none")));
}

#[test]
fn test_run_once_is_idempotent() {
    let calls = Arc::new(Mutex::new(0));
    let plugin = {
        let calls = Arc::clone(&calls);
        ConfigPlugin::new("counted", move |config, _| {
            *calls.lock() += 1;
            Ok(config)
        })
    };

    let options = RunOnceOptions::new(plugin.clone(), "counted");
    let config = run_once(descriptor(), options.clone()).unwrap();
    let config = run_once(config, options).unwrap();

    let wrapped = create_run_once_plugin(plugin, "counted", Some("2.0.0".into()));
    let config = with_plugins(config, &catalog(), [StaticPlugin::function(wrapped)]).unwrap();

    assert_eq!(*calls.lock(), 1);
    assert_eq!(config.history_item("counted").unwrap().version, "UNVERSIONED");
}

#[test]
fn test_apply_descriptor_plugins() {
    let config = Descriptor::from_value(json!({
        "name": "app",
        "plugins": ["with-main", ["with-label", { "label": "last" }], "unknown-plugin"],
        "_internal": { "projectRoot": "/project" },
    }))
    .unwrap();

    let err = apply_descriptor_plugins(config.clone(), &catalog(), None).unwrap_err();
    assert_eq!(err.code(), "PLUGIN_NOT_FOUND");

    let skip = ConfigPlugin::new("skip", |config, _| Ok(config));
    let config = apply_descriptor_plugins(config, &catalog(), Some(skip)).unwrap();
    assert_eq!(config.get("label"), Some(&json!("last")));

    let bad = Descriptor::new("app").with_plugin(json!(["a", {}, "extra"]));
    let err = apply_descriptor_plugins(bad, &catalog(), None).unwrap_err();
    assert_eq!(err.code(), "INVALID_STATIC_PLUGIN");
}

#[tokio::test]
async fn test_plugin_edits_gradle_file_on_disk() {
    let temp = TempDir::new().unwrap();
    let gradle = temp.path().join("android/app/build.gradle");
    std::fs::create_dir_all(gradle.parent().unwrap()).unwrap();
    std::fs::write(&gradle, "android {\n}\n").unwrap();

    let with_gradle = ConfigPlugin::new("with-gradle", |config, props| {
        let line = props.get("line").and_then(Value::as_str).unwrap_or_default().to_string();
        Ok(extend_strict(
            config,
            "android",
            "appBuildGradle",
            mod_action(move |mut config: ModConfig| {
                let line = line.clone();
                async move {
                    let contents = config.results["contents"].as_str().unwrap_or_default().to_string();
                    config.results["contents"] = json!(format!("{}{}\n", contents, line));
                    Ok(config)
                }
            }),
        ))
    });
    let loader = CatalogLoader::new().with_package(PluginPackage::with_app_plugin("with-gradle", with_gradle));

    let config = Descriptor::new("app")
        .with_project_root(temp.path())
        .with_plugin(json!(["with-gradle", { "line": "apply plugin: 'x'" }]));
    let config = apply_descriptor_plugins(config, &loader, None).unwrap();
    let config = compile(config, &CompileOptions::new(temp.path())).await.unwrap();

    assert_eq!(
        std::fs::read_to_string(&gradle).unwrap(),
        "android {\n}\napply plugin: 'x'\n"
    );
    let result = config.internal.mod_result("android", "appBuildGradle").unwrap();
    assert_eq!(result["language"], "groovy");
}

#[tokio::test]
async fn test_optional_json_provider_uses_template() {
    let temp = TempDir::new().unwrap();

    let config = extend_strict(
        Descriptor::new("app"),
        "ios",
        "podfileProperties",
        mod_action(|mut config: ModConfig| async move {
            config.results["expo.jsEngine"] = json!("hermes");
            Ok(config)
        }),
    );

    compile(config.clone(), &CompileOptions::new(temp.path()).with_introspect(true))
        .await
        .unwrap();
    let path = temp.path().join("ios/Podfile.properties.json");
    assert!(!path.exists());

    compile(config, &CompileOptions::new(temp.path())).await.unwrap();
    let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written, json!({ "expo.jsEngine": "hermes" }));
}
