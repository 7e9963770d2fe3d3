//! Config Plugin - Descriptor -> Descriptor 변환 함수

use crate::descriptor::Descriptor;
use crate::{Error, Result};
use serde_json::Value;
use std::sync::Arc;

// ============================================================================
// PluginProps
// ============================================================================

/// 플러그인에 전달되는 속성
///
/// `value` 는 static 플러그인의 두 번째 요소(`["name", props]`) 그대로입니다.
/// `resolver_error` 는 fallback 플러그인에만 채워집니다.
#[derive(Debug, Clone, Default)]
pub struct PluginProps {
    value: Value,
    resolver_error: Option<Arc<Error>>,
}

impl PluginProps {
    pub fn new(value: Value) -> Self {
        Self {
            value,
            resolver_error: None,
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// 객체 속성 조회
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.value.get(key)
    }

    /// 플러그인 해석 실패 원인 (fallback 전용)
    pub fn resolver_error(&self) -> Option<&Error> {
        self.resolver_error.as_deref()
    }

    pub(crate) fn with_resolver_error(mut self, error: Arc<Error>) -> Self {
        self.resolver_error = Some(error);
        self
    }
}

// ============================================================================
// ConfigPlugin
// ============================================================================

/// 플러그인 함수 타입
pub type PluginFn = Arc<dyn Fn(Descriptor, &PluginProps) -> Result<Descriptor> + Send + Sync>;

/// Config Plugin
#[derive(Clone)]
pub struct ConfigPlugin {
    name: Option<String>,
    func: PluginFn,
}

impl ConfigPlugin {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(Descriptor, &PluginProps) -> Result<Descriptor> + Send + Sync + 'static,
    {
        Self {
            name: Some(name.into()),
            func: Arc::new(func),
        }
    }

    /// 이름 없는 플러그인
    pub fn anonymous<F>(func: F) -> Self
    where
        F: Fn(Descriptor, &PluginProps) -> Result<Descriptor> + Send + Sync + 'static,
    {
        Self {
            name: None,
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// 이름이 없을 때만 이름 지정
    pub fn or_named(mut self, name: impl Into<String>) -> Self {
        if self.name.is_none() {
            self.name = Some(name.into());
        }
        self
    }

    /// 플러그인 적용
    ///
    /// 실행 중에는 플러그인 이름이 `plugin_stack` 에 올라가 있어,
    /// 이 안에서 등록된 mod 의 디버그 트레이스에 표시됩니다.
    pub fn apply(&self, mut config: Descriptor, props: &PluginProps) -> Result<Descriptor> {
        let depth = config.internal.plugin_stack.len();
        if let Some(name) = &self.name {
            config.internal.plugin_stack.push(name.clone());
        }

        let mut config = (self.func)(config, props)?;
        config.internal.plugin_stack.truncate(depth);
        Ok(config)
    }
}

impl std::fmt::Debug for ConfigPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigPlugin")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
