//! Interception Chain - mod 등록/감싸기
//!
//! `extend` 가 호출될 때마다 기존 체인을 `next_mod` 로 캡처한 새 링크가
//! 레지스트리 항목을 교체합니다 (onion 모델).
//!
//! ```text
//!   compile ──▶ [provider] ──▶ [P2] ──▶ [P1] ──▶ [noop]
//!                  read          │        │
//!                  write ◀───────┴────────┘
//! ```
//!
//! 나중에 등록된 링크가 먼저 실행됩니다.

use super::registry::{ModChain, ModHandler};
use super::request::ModConfig;
use crate::descriptor::Descriptor;
use crate::Result;
use futures::future::BoxFuture;
use modkit_foundation::strings::{MOD_DANGEROUS, MOD_FINALIZED};
use std::sync::Arc;
use tracing::debug;

// ============================================================================
// ExtendOptions
// ============================================================================

/// `extend` 옵션
pub struct ExtendOptions {
    pub platform: String,
    pub mod_name: String,
    pub action: ModHandler,

    /// 기존 체인이 없으면 등록하지 않음
    pub skip_empty_mod: bool,
}

impl ExtendOptions {
    pub fn new(platform: impl Into<String>, mod_name: impl Into<String>, action: ModHandler) -> Self {
        Self {
            platform: platform.into(),
            mod_name: mod_name.into(),
            action,
            skip_empty_mod: false,
        }
    }

    pub fn skip_empty_mod(mut self, skip: bool) -> Self {
        self.skip_empty_mod = skip;
        self
    }
}

// ============================================================================
// extend / extend_strict
// ============================================================================

/// mod 등록 (raw)
///
/// `action` 이 `ModConfig::next()` 호출 여부를 직접 결정합니다.
/// 디버깅용 계측처럼 체인 진행을 제어해야 하는 코드용입니다.
pub fn extend(mut config: Descriptor, options: ExtendOptions) -> Descriptor {
    let ExtendOptions {
        platform,
        mod_name,
        action,
        skip_empty_mod,
    } = options;

    let intercepted = match config.mods.get(&platform, &mod_name) {
        Some(chain) => chain.clone(),
        None if skip_empty_mod => {
            debug!("Skipping empty mod {}.{}", platform, mod_name);
            return config;
        }
        None => ModChain::noop(),
    };

    // 새 링크는 이전 플러그인 링크만 감싸고 provider 는 그대로 바깥에 둠
    let inner = intercepted.links();
    let trace = config
        .internal
        .debug
        .then(|| debug_trace(&platform, &mod_name, &config.internal.plugin_stack));

    let handler: ModHandler = Arc::new(
        move |mut mod_config: ModConfig| -> BoxFuture<'static, Result<ModConfig>> {
            if let Some(trace) = &trace {
                debug!(target: "modkit::mods", "{}", trace);
            }
            mod_config.set_next_mod(inner.clone());
            action(mod_config)
        },
    );

    config.mods.set(
        &platform,
        &mod_name,
        ModChain::new(handler).inherit_provider(&intercepted),
    );
    config
}

/// mod 등록 (strict)
///
/// `action` 이 끝나면 항상 이전 체인을 이어서 호출합니다.
/// `action` 안에서는 `next_mod` 가 보이지 않습니다.
pub fn extend_strict(
    config: Descriptor,
    platform: impl Into<String>,
    mod_name: impl Into<String>,
    action: ModHandler,
) -> Descriptor {
    let handler: ModHandler = Arc::new(
        move |mut mod_config: ModConfig| -> BoxFuture<'static, Result<ModConfig>> {
            let action = Arc::clone(&action);
            Box::pin(async move {
                let next = mod_config.take_next_mod();
                let results = action(mod_config).await?;
                match next {
                    Some(next) => next.invoke(results).await,
                    None => Ok(results),
                }
            })
        },
    );

    extend(config, ExtendOptions::new(platform, mod_name, handler))
}

/// `dangerous` mod 등록 - 구조화된 mod 보다 먼저 실행
pub fn extend_dangerous(
    config: Descriptor,
    platform: impl Into<String>,
    action: ModHandler,
) -> Descriptor {
    extend_strict(config, platform, MOD_DANGEROUS, action)
}

/// `finalized` mod 등록 - 다른 모든 mod 이후 실행
pub fn extend_finalized(
    config: Descriptor,
    platform: impl Into<String>,
    action: ModHandler,
) -> Descriptor {
    extend_strict(config, platform, MOD_FINALIZED, action)
}

/// 등록 시점의 플러그인 스택 트레이스
fn debug_trace(platform: &str, mod_name: &str, plugin_stack: &[String]) -> String {
    let stack = if plugin_stack.is_empty() {
        "<anonymous>".to_string()
    } else {
        plugin_stack.join(" ➜ ")
    };
    format!("{}.{}: {}", platform, mod_name, stack)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mods::registry::mod_action;
    use crate::mods::request::ModRequest;
    use parking_lot::Mutex;
    use serde_json::json;

    fn request() -> ModRequest {
        ModRequest::new("/app", "android", "manifest")
    }

    fn recording(log: &Arc<Mutex<Vec<String>>>, label: &'static str) -> ModHandler {
        let log = Arc::clone(log);
        mod_action(move |config: ModConfig| {
            let log = Arc::clone(&log);
            async move {
                log.lock().push(label.to_string());
                Ok(config)
            }
        })
    }

    #[test]
    fn test_skip_empty_mod() {
        let config = extend(
            Descriptor::new("app"),
            ExtendOptions::new(
                "android",
                "manifest",
                mod_action(|config: ModConfig| async move { Ok(config) }),
            )
            .skip_empty_mod(true),
        );
        assert!(config.mods.is_empty());
    }

    #[tokio::test]
    async fn test_strict_links_run_newest_first() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut config = Descriptor::new("app");
        config = extend_strict(config, "android", "manifest", recording(&log, "p1"));
        config = extend_strict(config, "android", "manifest", recording(&log, "p2"));

        let chain = config.mods.get("android", "manifest").unwrap().clone();
        chain.invoke(ModConfig::new(config, request())).await.unwrap();

        assert_eq!(*log.lock(), vec!["p2", "p1"]);
    }

    #[tokio::test]
    async fn test_raw_link_can_short_circuit() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut config = Descriptor::new("app");
        config = extend_strict(config, "android", "manifest", recording(&log, "inner"));
        config = extend(
            config,
            ExtendOptions::new(
                "android",
                "manifest",
                mod_action(|mut config: ModConfig| async move {
                    config.results = json!({ "stopped": true });
                    Ok(config)
                }),
            ),
        );

        let chain = config.mods.get("android", "manifest").unwrap().clone();
        let result = chain.invoke(ModConfig::new(config, request())).await.unwrap();

        assert_eq!(result.results["stopped"], true);
        assert!(log.lock().is_empty());
    }

    #[tokio::test]
    async fn test_raw_link_sees_inner_output() {
        let mut config = Descriptor::new("app");
        config = extend_strict(
            config,
            "android",
            "manifest",
            mod_action(|mut config: ModConfig| async move {
                config.results = json!({ "from": "inner" });
                Ok(config)
            }),
        );
        config = extend(
            config,
            ExtendOptions::new(
                "android",
                "manifest",
                mod_action(|config: ModConfig| async move {
                    let mut config = config.next().await?;
                    config.results["wrapped"] = json!(true);
                    Ok(config)
                }),
            ),
        );

        let chain = config.mods.get("android", "manifest").unwrap().clone();
        let result = chain.invoke(ModConfig::new(config, request())).await.unwrap();

        assert_eq!(result.results, json!({ "from": "inner", "wrapped": true }));
    }

    #[tokio::test]
    async fn test_strict_action_cannot_see_next_mod() {
        let config = extend_strict(
            Descriptor::new("app"),
            "android",
            "manifest",
            mod_action(|config: ModConfig| async move {
                assert!(!config.request().has_next_mod());
                Ok(config)
            }),
        );

        let chain = config.mods.get("android", "manifest").unwrap().clone();
        chain.invoke(ModConfig::new(config, request())).await.unwrap();
    }

    #[test]
    fn test_debug_trace_format() {
        assert_eq!(
            debug_trace("ios", "infoPlist", &["with-a".into(), "with-b".into()]),
            "ios.infoPlist: with-a ➜ with-b"
        );
        assert_eq!(debug_trace("ios", "infoPlist", &[]), "ios.infoPlist: <anonymous>");
    }
}
