//! Mod Compiler - 등록된 체인을 실행하고 결과를 Descriptor 에 반영
//!
//! 모든 (platform, mod) 쌍은 순서대로 하나씩 실행됩니다.
//! 에러가 나면 전체 패스가 중단되며, 이미 쓴 파일은 되돌리지 않습니다.

use super::defaults::BaseModProviders;
use super::provider::validate_mod_results;
use super::registry::ModChain;
use super::request::{ModConfig, ModRequest};
use crate::descriptor::Descriptor;
use crate::{Error, Result};
use modkit_foundation::strings::{MOD_DANGEROUS, MOD_FINALIZED, PLATFORM_IOS};
use modkit_foundation::EngineConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

// ============================================================================
// CompileOptions
// ============================================================================

/// 컴파일 옵션
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// 프로젝트 루트
    pub project_root: PathBuf,

    /// 컴파일할 플랫폼 (None 이면 전체)
    pub platforms: Option<Vec<String>>,

    /// 디스크에 쓰지 않음
    pub introspect: bool,

    /// provider 가 없는 mod 를 에러로 처리
    pub assert_missing_providers: bool,

    /// optional provider 가 디스크 대신 템플릿 사용
    pub ignore_existing_native_files: bool,
}

impl CompileOptions {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            platforms: None,
            introspect: false,
            assert_missing_providers: true,
            ignore_existing_native_files: false,
        }
    }

    /// 엔진 설정에서 생성
    pub fn from_config(project_root: impl Into<PathBuf>, config: &EngineConfig) -> Self {
        Self {
            project_root: project_root.into(),
            platforms: config.platforms.clone(),
            introspect: config.is_introspect(),
            assert_missing_providers: config.asserts_missing_providers(),
            ignore_existing_native_files: config.ignores_existing_native_files(),
        }
    }

    pub fn with_platforms(mut self, platforms: Vec<String>) -> Self {
        self.platforms = Some(platforms);
        self
    }

    pub fn with_introspect(mut self, introspect: bool) -> Self {
        self.introspect = introspect;
        self
    }

    pub fn with_assert_missing_providers(mut self, assert: bool) -> Self {
        self.assert_missing_providers = assert;
        self
    }

    pub fn with_ignore_existing_native_files(mut self, ignore: bool) -> Self {
        self.ignore_existing_native_files = ignore;
        self
    }

    /// 플랫폼이 컴파일 대상인지
    pub fn includes_platform(&self, platform: &str) -> bool {
        self.platforms
            .as_ref()
            .map_or(true, |platforms| platforms.iter().any(|p| p == platform))
    }
}

// ============================================================================
// 순서
// ============================================================================

/// mod 우선순위 (낮을수록 먼저)
pub const MOD_PRECEDENCE: &[(&str, i32)] = &[(MOD_DANGEROUS, -2), (MOD_FINALIZED, 2)];

pub fn mod_precedence(mod_name: &str) -> i32 {
    MOD_PRECEDENCE
        .iter()
        .find(|(name, _)| *name == mod_name)
        .map_or(0, |(_, precedence)| *precedence)
}

/// 우선순위로 정렬 (같은 우선순위는 등록 순서 유지)
pub fn sort_mods(mut entries: Vec<(String, ModChain)>) -> Vec<(String, ModChain)> {
    entries.sort_by_key(|(name, _)| mod_precedence(name));
    entries
}

/// iOS 프로젝트 이름
///
/// `ios_root` 의 첫 번째 `*.xcodeproj` 이름, 없으면 앱 이름의 ASCII 영숫자만
/// 사용합니다. Xcode 타겟 이름 규칙에 맞춰 악센트 문자 등은 버립니다
/// (`"Café"` -> `"Caf"`).
pub fn find_project_name(ios_root: &Path, fallback_name: &str) -> Option<String> {
    let pattern = Path::new(&glob::Pattern::escape(&ios_root.to_string_lossy())).join("*.xcodeproj");
    let from_disk = glob::glob(&pattern.to_string_lossy())
        .ok()
        .and_then(|paths| {
            let mut found: Vec<PathBuf> = paths.filter_map(|entry| entry.ok()).collect();
            found.sort();
            found.into_iter().next()
        })
        .and_then(|path| path.file_stem().map(|stem| stem.to_string_lossy().into_owned()));

    from_disk.or_else(|| {
        let sanitized: String = fallback_name.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
        (!sanitized.is_empty()).then_some(sanitized)
    })
}

// ============================================================================
// ModCompiler
// ============================================================================

/// Mod Compiler
#[derive(Debug, Clone)]
pub struct ModCompiler {
    providers: BaseModProviders,
}

impl Default for ModCompiler {
    fn default() -> Self {
        Self::new(BaseModProviders::new())
    }
}

impl ModCompiler {
    pub fn new(providers: BaseModProviders) -> Self {
        Self { providers }
    }

    pub fn providers(&self) -> &BaseModProviders {
        &self.providers
    }

    /// provider 연결 후 전체 mod 실행
    pub async fn compile(&self, mut config: Descriptor, options: &CompileOptions) -> Result<Descriptor> {
        if config.internal.project_root.is_none() {
            config.internal.project_root = Some(options.project_root.clone());
        }

        info!(
            "Compiling mods for {} (platforms: {:?}, introspect: {})",
            config.name,
            config.mods.platforms(),
            options.introspect
        );

        let config = self.providers.attach(config, options);
        evaluate(config, options).await
    }
}

/// 기본 provider 로 컴파일
pub async fn compile(config: Descriptor, options: &CompileOptions) -> Result<Descriptor> {
    ModCompiler::default().compile(config, options).await
}

/// provider 를 연결하지 않고 등록된 체인만 실행
pub async fn evaluate(mut config: Descriptor, options: &CompileOptions) -> Result<Descriptor> {
    for platform in config.mods.platforms() {
        if !options.includes_platform(&platform) {
            debug!("Skipping platform {}", platform);
            continue;
        }

        let platform_root = options.project_root.join(&platform);
        let project_name = if platform == PLATFORM_IOS {
            find_project_name(&platform_root, &config.name)
        } else {
            None
        };

        for (mod_name, chain) in sort_mods(config.mods.entries(&platform)) {
            // introspection 에서는 introspective provider 만 연결됨
            if options.introspect && !chain.is_introspective() {
                debug!("Introspection: skipping mods.{}.{}", platform, mod_name);
                continue;
            }

            if !chain.has_provider() {
                if options.assert_missing_providers {
                    return Err(Error::MissingProvider {
                        platform: platform.clone(),
                        mod_name,
                    });
                }
                warn!("No provider for mods.{}.{}, skipping", platform, mod_name);
                continue;
            }

            let request = ModRequest::new(&options.project_root, &platform, &mod_name)
                .with_project_name(project_name.clone())
                .with_introspect(options.introspect)
                .with_ignore_existing_native_files(options.ignore_existing_native_files);

            debug!("Running mods.{}.{}", platform, mod_name);
            let (next, results) = chain.invoke(ModConfig::new(config, request)).await?.into_parts();

            if !next.mods.has_platform(&platform) {
                return Err(Error::ModShape {
                    platform,
                    mod_name,
                    expected: "a descriptor that still carries its mod tree".to_string(),
                    snapshot: serde_json::to_string(&next.to_value()?)?,
                });
            }
            validate_mod_results(&platform, &mod_name, chain.shape(), &results)?;

            config = next;
            if !results.is_null() {
                config.internal.set_mod_result(&platform, &mod_name, results);
            }
        }
    }

    Ok(config)
}
