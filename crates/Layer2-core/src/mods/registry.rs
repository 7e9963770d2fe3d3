//! Mod Registry - platform -> mod 이름 -> 체인

use super::request::ModConfig;
use crate::Result;
use futures::future::BoxFuture;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

// ============================================================================
// 핸들러 타입
// ============================================================================

/// mod 핸들러 (비동기)
pub type ModHandler = Arc<dyn Fn(ModConfig) -> BoxFuture<'static, Result<ModConfig>> + Send + Sync>;

/// async 클로저를 ModHandler 로 변환
///
/// ```ignore
/// let action = mod_action(|mut config: ModConfig| async move {
///     config.results["package"] = json!("com.example");
///     Ok(config)
/// });
/// ```
pub fn mod_action<F, Fut>(f: F) -> ModHandler
where
    F: Fn(ModConfig) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ModConfig>> + Send + 'static,
{
    Arc::new(move |config: ModConfig| -> BoxFuture<'static, Result<ModConfig>> {
        Box::pin(f(config))
    })
}

// ============================================================================
// ResultShape
// ============================================================================

/// provider 가 기대하는 mod 결과 형태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultShape {
    /// 검사하지 않음
    #[default]
    Any,

    /// JSON 객체
    Object,

    /// `contents` 문자열을 가진 JSON 객체
    Text,
}

impl ResultShape {
    /// 값이 형태에 맞는지 확인
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::Any => true,
            Self::Object => value.is_object(),
            Self::Text => value.get("contents").is_some_and(Value::is_string),
        }
    }

    /// 진단 메시지용 설명
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Any => "any value",
            Self::Object => "an object",
            Self::Text => "an object with a string `contents` field",
        }
    }
}

// ============================================================================
// ModChain
// ============================================================================

/// 하나의 (platform, mod) 에 대한 체인
///
/// 가장 바깥 플러그인 링크만 보관합니다. 이전 링크들은 각 링크의 클로저 안에
/// `next_mod` 로 캡처되어 있습니다.
///
/// provider 는 onion 밖의 별도 슬롯에 두고, 새 링크가 등록되어도 그대로
/// 물려받습니다. 그래서 컴파일 후 다시 `extend` 해도 provider 는 하나뿐이고
/// 항상 가장 바깥에서 실행됩니다.
#[derive(Clone)]
pub struct ModChain {
    handler: ModHandler,
    provider: Option<ModHandler>,
    is_introspective: bool,
    shape: ResultShape,
}

impl ModChain {
    pub fn new(handler: ModHandler) -> Self {
        Self {
            handler,
            provider: None,
            is_introspective: false,
            shape: ResultShape::Any,
        }
    }

    /// 아무것도 하지 않는 체인 (x -> x)
    pub fn noop() -> Self {
        Self::new(mod_action(|config| async move { Ok(config) }))
    }

    /// provider 링크 설정
    pub(crate) fn with_provider(
        mut self,
        provider: ModHandler,
        is_introspective: bool,
        shape: ResultShape,
    ) -> Self {
        self.provider = Some(provider);
        self.is_introspective = is_introspective;
        self.shape = shape;
        self
    }

    /// 이전 체인의 provider 와 플래그를 물려받음
    pub(crate) fn inherit_provider(mut self, from: &ModChain) -> Self {
        self.provider = from.provider.clone();
        self.is_introspective = from.is_introspective;
        self.shape = from.shape;
        self
    }

    /// provider 를 뺀 플러그인 링크
    pub(crate) fn links(&self) -> ModChain {
        Self::new(Arc::clone(&self.handler))
    }

    /// 체인 실행
    pub fn invoke(&self, mut config: ModConfig) -> BoxFuture<'static, Result<ModConfig>> {
        match &self.provider {
            Some(provider) => {
                config.set_next_mod(self.links());
                provider(config)
            }
            None => (self.handler)(config),
        }
    }

    /// provider 가 연결되어 있는지
    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    pub fn is_introspective(&self) -> bool {
        self.is_introspective
    }

    pub fn shape(&self) -> ResultShape {
        self.shape
    }
}

impl std::fmt::Debug for ModChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModChain")
            .field("has_provider", &self.provider.is_some())
            .field("is_introspective", &self.is_introspective)
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// ModRegistry
// ============================================================================

/// 플랫폼별 Mod Tree
#[derive(Clone, Debug)]
struct PlatformMods {
    platform: String,
    mods: Vec<(String, ModChain)>,
}

/// Mod Registry - Descriptor 가 소유
///
/// 플랫폼과 mod 는 삽입 순서대로 열거됩니다. 이미 있는 키를 다시 등록하면
/// 자리는 유지하고 체인만 교체합니다.
#[derive(Clone, Debug, Default)]
pub struct ModRegistry {
    platforms: Vec<PlatformMods>,
}

impl ModRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 체인 조회
    pub fn get(&self, platform: &str, mod_name: &str) -> Option<&ModChain> {
        self.platform(platform)?
            .mods
            .iter()
            .find(|(name, _)| name == mod_name)
            .map(|(_, chain)| chain)
    }

    /// 체인 등록/교체
    pub fn set(&mut self, platform: &str, mod_name: &str, chain: ModChain) {
        let index = match self.platforms.iter().position(|p| p.platform == platform) {
            Some(index) => index,
            None => {
                self.platforms.push(PlatformMods {
                    platform: platform.to_string(),
                    mods: Vec::new(),
                });
                self.platforms.len() - 1
            }
        };

        let mods = &mut self.platforms[index].mods;
        match mods.iter_mut().find(|(name, _)| name == mod_name) {
            Some(entry) => entry.1 = chain,
            None => mods.push((mod_name.to_string(), chain)),
        }
    }

    pub fn contains(&self, platform: &str, mod_name: &str) -> bool {
        self.get(platform, mod_name).is_some()
    }

    pub fn has_platform(&self, platform: &str) -> bool {
        self.platform(platform).is_some()
    }

    /// 플랫폼 목록 (삽입 순서)
    pub fn platforms(&self) -> Vec<String> {
        self.platforms.iter().map(|p| p.platform.clone()).collect()
    }

    /// 플랫폼의 mod 이름 목록 (삽입 순서)
    pub fn mod_names(&self, platform: &str) -> Vec<String> {
        self.platform(platform)
            .map(|p| p.mods.iter().map(|(name, _)| name.clone()).collect())
            .unwrap_or_default()
    }

    /// 플랫폼의 (mod 이름, 체인) 스냅샷 (삽입 순서)
    pub fn entries(&self, platform: &str) -> Vec<(String, ModChain)> {
        self.platform(platform)
            .map(|p| p.mods.clone())
            .unwrap_or_default()
    }

    /// 전체 mod 수
    pub fn len(&self) -> usize {
        self.platforms.iter().map(|p| p.mods.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn platform(&self, platform: &str) -> Option<&PlatformMods> {
        self.platforms.iter().find(|p| p.platform == platform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insertion_order_is_kept() {
        let mut registry = ModRegistry::new();
        registry.set("android", "strings", ModChain::noop());
        registry.set("android", "dangerous", ModChain::noop());
        registry.set("ios", "infoPlist", ModChain::noop());
        registry.set("android", "manifest", ModChain::noop());

        assert_eq!(registry.platforms(), vec!["android", "ios"]);
        assert_eq!(
            registry.mod_names("android"),
            vec!["strings", "dangerous", "manifest"]
        );
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut registry = ModRegistry::new();
        registry.set("android", "strings", ModChain::noop());
        registry.set("android", "manifest", ModChain::noop());
        registry.set(
            "android",
            "strings",
            ModChain::noop().with_provider(
                mod_action(|config| async move { Ok(config) }),
                true,
                ResultShape::Object,
            ),
        );

        assert_eq!(registry.mod_names("android"), vec!["strings", "manifest"]);
        assert!(registry.get("android", "strings").unwrap().has_provider());
        assert!(!registry.contains("ios", "strings"));
    }

    #[test]
    fn test_result_shapes() {
        assert!(ResultShape::Any.matches(&json!(null)));
        assert!(ResultShape::Object.matches(&json!({})));
        assert!(!ResultShape::Object.matches(&json!([1, 2])));
        assert!(!ResultShape::Object.matches(&json!("text")));
        assert!(ResultShape::Text.matches(&json!({ "contents": "" })));
        assert!(!ResultShape::Text.matches(&json!({ "contents": 1 })));
    }
}
