//! Base Mod Provider - 대상 파일 read / write
//!
//! provider 는 (platform, mod) 마다 하나만 붙으며, 모든 플러그인 링크를 감쌉니다.
//! 따라서 read 는 어떤 플러그인보다 먼저, write 는 모든 플러그인 이후에
//! 정확히 한 번 실행됩니다.

use super::registry::{mod_action, ModChain, ResultShape};
use super::request::{ModConfig, ModRequest};
use crate::descriptor::Descriptor;
use crate::{Error, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

// ============================================================================
// BaseModProvider Trait
// ============================================================================

/// Base Mod Provider
#[async_trait]
pub trait BaseModProvider: Send + Sync {
    /// 결과 형태 (write 전에 검증)
    fn shape(&self) -> ResultShape {
        ResultShape::Object
    }

    /// introspection 모드에서 실행 가능한지
    fn is_introspective(&self) -> bool {
        true
    }

    /// 아무 플러그인도 등록하지 않아도 파일을 만들지
    fn always_materialize(&self) -> bool {
        false
    }

    /// 파일이 없거나 읽을 수 없을 때 사용할 템플릿 (optional provider)
    fn template(&self, _request: &ModRequest) -> Option<Value> {
        None
    }

    /// 대상 파일 경로
    async fn file_path(&self, request: &ModRequest) -> Result<PathBuf>;

    /// 파일 -> 구조화된 값
    async fn read(&self, file_path: &Path, request: &ModRequest) -> Result<Value>;

    /// 구조화된 값 -> 파일
    async fn write(&self, file_path: &Path, results: &Value, request: &ModRequest) -> Result<()>;
}

// ============================================================================
// PassThroughProvider - dangerous / finalized
// ============================================================================

/// 파일도 값도 없는 provider (순서 고정용)
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughProvider;

#[async_trait]
impl BaseModProvider for PassThroughProvider {
    fn shape(&self) -> ResultShape {
        ResultShape::Any
    }

    fn is_introspective(&self) -> bool {
        false
    }

    async fn file_path(&self, request: &ModRequest) -> Result<PathBuf> {
        Ok(request.platform_project_root.clone())
    }

    async fn read(&self, _file_path: &Path, _request: &ModRequest) -> Result<Value> {
        Ok(Value::Null)
    }

    async fn write(&self, _file_path: &Path, _results: &Value, _request: &ModRequest) -> Result<()> {
        Ok(())
    }
}

// ============================================================================
// attach_provider
// ============================================================================

/// provider 를 (platform, mod) 체인의 바깥에 연결
///
/// 체인에 이미 provider 가 있으면 그대로 반환합니다. 그 뒤에 등록된 링크가
/// 있어도 마찬가지입니다. 체인이 없으면 `always_materialize` 인 provider 만
/// 빈 체인을 만들어 연결합니다.
pub fn attach_provider(
    mut config: Descriptor,
    platform: &str,
    mod_name: &str,
    provider: Arc<dyn BaseModProvider>,
) -> Descriptor {
    let chain = match config.mods.get(platform, mod_name) {
        Some(chain) if chain.has_provider() => {
            debug!("Provider already attached to {}.{}", platform, mod_name);
            return config;
        }
        Some(chain) => chain.clone(),
        None if provider.always_materialize() => ModChain::noop(),
        None => {
            debug!("Skipping empty mod {}.{}", platform, mod_name);
            return config;
        }
    };

    let shape = provider.shape();
    let is_introspective = provider.is_introspective();
    let action = mod_action(move |config: ModConfig| {
        let provider = Arc::clone(&provider);
        async move { run_provider(provider.as_ref(), config).await }
    });

    config
        .mods
        .set(platform, mod_name, chain.with_provider(action, is_introspective, shape));
    config
}

/// read -> 체인 -> 검증 -> write
async fn run_provider(provider: &dyn BaseModProvider, mut config: ModConfig) -> Result<ModConfig> {
    let request = config.request().clone();
    let file_path = provider.file_path(&request).await?;

    config.results = read_results(provider, &file_path, &request).await?;
    debug!(
        "Read {}.{} from {}",
        request.platform,
        request.mod_name,
        file_path.display()
    );

    let config = config.next().await?;
    validate_mod_results(&request.platform, &request.mod_name, provider.shape(), &config.results)?;

    if request.introspect {
        debug!("Introspection: skipping write for {}.{}", request.platform, request.mod_name);
    } else {
        provider.write(&file_path, &config.results, &request).await?;
    }

    Ok(config)
}

/// 파일 읽기 (템플릿 fallback 포함)
pub async fn read_results(
    provider: &dyn BaseModProvider,
    file_path: &Path,
    request: &ModRequest,
) -> Result<Value> {
    if request.ignore_existing_native_files {
        if let Some(template) = provider.template(request) {
            return Ok(template);
        }
    }

    match provider.read(file_path, request).await {
        Ok(value) => Ok(value),
        Err(e) => match provider.template(request) {
            Some(template) => {
                warn!(
                    "Could not read {} for {}.{}, using template: {}",
                    file_path.display(),
                    request.platform,
                    request.mod_name,
                    e
                );
                Ok(template)
            }
            None => Err(e),
        },
    }
}

/// mod 결과 형태 검증
pub fn validate_mod_results(
    platform: &str,
    mod_name: &str,
    shape: ResultShape,
    results: &Value,
) -> Result<()> {
    if shape.matches(results) {
        return Ok(());
    }

    Err(Error::ModShape {
        platform: platform.to_string(),
        mod_name: mod_name.to_string(),
        expected: shape.describe().to_string(),
        snapshot: serde_json::to_string(results).unwrap_or_else(|_| results.to_string()),
    })
}
