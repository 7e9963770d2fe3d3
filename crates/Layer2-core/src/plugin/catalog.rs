//! Catalog Loader - 메모리 내 플러그인 패키지 카탈로그
//!
//! 패키지 참조 규칙:
//! - `pkg`, `@scope/pkg`: `app.plugin` 이 있으면 그것을, 없으면 main 파일
//! - `pkg/sub/file`, `@scope/pkg/file`: 해당 파일을 직접 사용
//! - `./file`: 프로젝트 로컬 패키지(`.`)의 파일

use super::resolver::{PluginExport, PluginLoader, PluginLocation};
use super::traits::ConfigPlugin;
use crate::{Error, Result};
use modkit_foundation::strings::PLUGIN_ENTRY_FILE;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// 프로젝트 로컬 파일용 패키지 이름
pub const PROJECT_PACKAGE: &str = ".";

/// main 이 지정되지 않은 패키지의 기본 main
const DEFAULT_MAIN: &str = "index";

#[derive(Debug, Clone)]
enum CatalogFile {
    Export(PluginExport),
    Broken(String),
}

/// 플러그인 패키지
#[derive(Debug, Clone)]
pub struct PluginPackage {
    name: String,
    main: Option<String>,
    files: HashMap<String, CatalogFile>,
}

impl PluginPackage {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            main: None,
            files: HashMap::new(),
        }
    }

    /// `app.plugin` 엔트리가 있는 패키지
    pub fn with_app_plugin(name: impl Into<String>, plugin: ConfigPlugin) -> Self {
        Self::new(name).with_file(PLUGIN_ENTRY_FILE, PluginExport::Plugin(plugin))
    }

    pub fn with_main(mut self, main: impl Into<String>) -> Self {
        self.main = Some(main.into());
        self
    }

    pub fn with_file(mut self, path: impl Into<String>, export: PluginExport) -> Self {
        self.files.insert(path.into(), CatalogFile::Export(export));
        self
    }

    /// 로드 시 실패하는 파일 (구문 에러 등)
    pub fn with_broken_file(mut self, path: impl Into<String>, message: impl Into<String>) -> Self {
        self.files.insert(path.into(), CatalogFile::Broken(message.into()));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn entry(&self) -> &str {
        if self.files.contains_key(PLUGIN_ENTRY_FILE) {
            PLUGIN_ENTRY_FILE
        } else {
            self.main.as_deref().unwrap_or(DEFAULT_MAIN)
        }
    }
}

/// 메모리 내 카탈로그 로더
#[derive(Debug, Clone, Default)]
pub struct CatalogLoader {
    packages: HashMap<String, PluginPackage>,
}

impl CatalogLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// 패키지 등록 (같은 이름이면 교체)
    pub fn register(&mut self, package: PluginPackage) {
        debug!("Registered plugin package: {}", package.name);
        self.packages.insert(package.name.clone(), package);
    }

    pub fn with_package(mut self, package: PluginPackage) -> Self {
        self.register(package);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    /// 등록된 패키지 이름 (정렬됨)
    pub fn package_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.packages.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl PluginLoader for CatalogLoader {
    fn locate(&self, project_root: &Path, reference: &str) -> Result<Option<PluginLocation>> {
        let (package_name, sub_path) = split_reference(reference);
        let Some(package) = self.packages.get(package_name) else {
            return Ok(None);
        };

        let entry = match sub_path {
            Some(path) if package.files.contains_key(path) => path,
            Some(_) => return Ok(None),
            None => package.entry(),
        };

        Ok(Some(PluginLocation {
            package: package.name.clone(),
            entry: entry.to_string(),
            project_root: project_root.to_path_buf(),
        }))
    }

    fn load(&self, location: &PluginLocation) -> Result<PluginExport> {
        let file = self
            .packages
            .get(&location.package)
            .and_then(|package| package.files.get(&location.entry));

        match file {
            Some(CatalogFile::Export(export)) => Ok(export.clone()),
            Some(CatalogFile::Broken(message)) => Err(Error::PluginLoad {
                reference: location.reference(),
                message: message.clone(),
            }),
            None => Err(Error::PluginLoad {
                reference: location.reference(),
                message: "entry file does not exist".to_string(),
            }),
        }
    }
}

/// 참조를 (패키지, 하위 경로) 로 분리
fn split_reference(reference: &str) -> (&str, Option<&str>) {
    if let Some(path) = reference.strip_prefix("./") {
        return (PROJECT_PACKAGE, Some(path));
    }

    // @scope/name 은 두 구간이 패키지 이름
    let segments = if reference.starts_with('@') { 2 } else { 1 };
    let mut split_at = None;
    for (seen, (index, _)) in reference.match_indices('/').enumerate() {
        if seen + 1 == segments {
            split_at = Some(index);
            break;
        }
    }

    match split_at {
        Some(index) => (&reference[..index], Some(&reference[index + 1..]).filter(|p| !p.is_empty())),
        None => (reference, None),
    }
}
