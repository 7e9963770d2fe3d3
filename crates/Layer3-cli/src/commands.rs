//! modkit 명령 구현

use crate::builtin;
use anyhow::{bail, Context};
use modkit_core::{
    apply_descriptor_plugins, warn_unresolved_plugin, CompileOptions, Descriptor, ModCompiler,
};
use modkit_foundation::EngineConfig;
use std::path::{Path, PathBuf};
use tracing::info;

/// `modkit compile` 옵션
#[derive(Debug, Clone, Default)]
pub struct CompileArgs {
    pub descriptor: PathBuf,
    pub project_root: Option<PathBuf>,
    pub platforms: Vec<String>,
    pub introspect: bool,
    pub skip_unresolved: bool,
    pub output: Option<PathBuf>,
    pub debug: bool,
}

/// Descriptor 파일 로드
pub async fn load_descriptor(path: &Path) -> anyhow::Result<Descriptor> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read descriptor {}", path.display()))?;
    let value = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse descriptor {}", path.display()))?;
    Ok(Descriptor::from_value(value)?)
}

/// 프로젝트 루트: 인자 > Descriptor 파일의 디렉토리
fn project_root(args: &CompileArgs) -> anyhow::Result<PathBuf> {
    if let Some(root) = &args.project_root {
        return Ok(root.clone());
    }

    match args.descriptor.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => Ok(parent.to_path_buf()),
        _ => Ok(std::env::current_dir()?),
    }
}

/// 플러그인 적용 후 mod 컴파일
pub async fn compile(args: &CompileArgs) -> anyhow::Result<Descriptor> {
    let root = project_root(args)?;
    if !root.is_dir() {
        bail!("Project root {} is not a directory", root.display());
    }

    let mut engine_config = EngineConfig::load(&root)?;
    if args.debug {
        engine_config = engine_config.debug(true);
    }
    if args.introspect {
        engine_config = engine_config.introspect(true);
    }
    if !args.platforms.is_empty() {
        engine_config = engine_config.platforms(args.platforms.clone());
    }

    let mut descriptor = load_descriptor(&args.descriptor).await?;
    if descriptor.internal.project_root.is_none() {
        descriptor = descriptor.with_project_root(&root);
    }
    descriptor = descriptor.with_debug(engine_config.is_debug());

    let loader = builtin::catalog();
    let fallback = args.skip_unresolved.then(warn_unresolved_plugin);
    let descriptor = apply_descriptor_plugins(descriptor, &loader, fallback)
        .context("Failed to apply plugins")?;

    let options = CompileOptions::from_config(&root, &engine_config);
    let descriptor = ModCompiler::default()
        .compile(descriptor, &options)
        .await
        .context("Failed to compile mods")?;

    let rendered = serde_json::to_string_pretty(&descriptor.to_value()?)?;
    match &args.output {
        Some(path) => {
            tokio::fs::write(path, format!("{}\n", rendered))
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote compiled descriptor to {}", path.display());
        }
        None => println!("{}", rendered),
    }

    Ok(descriptor)
}

/// 플러그인 history 출력
pub async fn history(path: &Path) -> anyhow::Result<()> {
    let descriptor = load_descriptor(path).await?;
    let history = &descriptor.internal.plugin_history;

    if history.is_empty() {
        println!("No plugins recorded.");
        return Ok(());
    }

    println!("{:<40} {:<15} {:<10}", "Plugin", "Version", "Platform");
    println!("{}", "-".repeat(65));
    for item in history.values() {
        println!(
            "{:<40} {:<15} {:<10}",
            item.name,
            item.version,
            item.platform.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}
