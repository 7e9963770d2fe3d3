//! 기본 provider 테이블 (Android / iOS)

use super::compiler::CompileOptions;
use super::file_provider::FileModProvider;
use super::provider::{attach_provider, BaseModProvider, PassThroughProvider};
use super::registry::ResultShape;
use crate::descriptor::Descriptor;
use modkit_foundation::strings::*;
use modkit_foundation::FormatRegistry;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

/// 플랫폼별 provider 테이블
#[derive(Clone, Default)]
pub struct BaseModProviders {
    entries: Vec<(String, String, Arc<dyn BaseModProvider>)>,
}

impl BaseModProviders {
    /// 빈 테이블
    pub fn empty() -> Self {
        Self::default()
    }

    /// 내장 포맷(json, text)만 사용하는 기본 테이블
    pub fn new() -> Self {
        Self::with_formats(&FormatRegistry::with_builtin())
    }

    /// 주어진 포맷으로 기본 테이블 생성
    ///
    /// 등록되지 않은 포맷의 provider 는 실제로 컴파일될 때 실패합니다.
    pub fn with_formats(formats: &FormatRegistry) -> Self {
        let mut providers = Self::empty();
        providers.insert_android(formats);
        providers.insert_ios(formats);
        providers
    }

    /// provider 등록 (같은 키면 교체)
    pub fn insert(
        &mut self,
        platform: impl Into<String>,
        mod_name: impl Into<String>,
        provider: Arc<dyn BaseModProvider>,
    ) {
        let platform = platform.into();
        let mod_name = mod_name.into();
        match self
            .entries
            .iter_mut()
            .find(|(p, m, _)| *p == platform && *m == mod_name)
        {
            Some(entry) => entry.2 = provider,
            None => self.entries.push((platform, mod_name, provider)),
        }
    }

    pub fn get(&self, platform: &str, mod_name: &str) -> Option<&Arc<dyn BaseModProvider>> {
        self.entries
            .iter()
            .find(|(p, m, _)| p == platform && m == mod_name)
            .map(|(_, _, provider)| provider)
    }

    /// 플랫폼의 mod 이름 목록
    pub fn mod_names(&self, platform: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(p, _, _)| p == platform)
            .map(|(_, m, _)| m.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Descriptor 가 선언했거나 mod 가 등록된 모든 플랫폼에 provider 연결
    ///
    /// 아무 플러그인도 건드리지 않은 플랫폼이라도 `always_materialize`
    /// provider 는 연결됩니다.
    pub fn attach(&self, mut config: Descriptor, options: &CompileOptions) -> Descriptor {
        let mut platforms = config.platforms.clone();
        for platform in config.mods.platforms() {
            if !platforms.contains(&platform) {
                platforms.push(platform);
            }
        }

        for platform in platforms {
            if !options.includes_platform(&platform) {
                continue;
            }

            for (_, mod_name, provider) in self.entries.iter().filter(|(p, _, _)| *p == platform) {
                if options.introspect && !provider.is_introspective() {
                    debug!("Introspection: not attaching {}.{}", platform, mod_name);
                    continue;
                }
                config = attach_provider(config, &platform, mod_name, Arc::clone(provider));
            }
        }
        config
    }

    // ========================================================================
    // 기본 테이블
    // ========================================================================

    fn insert_android(&mut self, formats: &FormatRegistry) {
        let xml = formats.resolve(FORMAT_XML);
        let text = formats.resolve(FORMAT_TEXT);
        let resources = json!({ "resources": {} });

        self.insert_file(
            PLATFORM_ANDROID,
            MOD_MANIFEST,
            FileModProvider::new("app/src/main/AndroidManifest.xml", xml.clone()),
        );
        for (mod_name, path) in [
            (MOD_STRINGS, "app/src/main/res/values/strings.xml"),
            (MOD_COLORS, "app/src/main/res/values/colors.xml"),
            (MOD_COLORS_NIGHT, "app/src/main/res/values-night/colors.xml"),
            (MOD_STYLES, "app/src/main/res/values/styles.xml"),
        ] {
            self.insert_file(
                PLATFORM_ANDROID,
                mod_name,
                FileModProvider::new(path, xml.clone()).with_template(resources.clone()),
            );
        }
        self.insert_file(
            PLATFORM_ANDROID,
            MOD_GRADLE_PROPERTIES,
            FileModProvider::new("gradle.properties", formats.resolve(FORMAT_PROPERTIES)),
        );

        for (mod_name, groovy, kotlin) in [
            (MOD_PROJECT_BUILD_GRADLE, "build.gradle", "build.gradle.kts"),
            (MOD_APP_BUILD_GRADLE, "app/build.gradle", "app/build.gradle.kts"),
            (MOD_SETTINGS_GRADLE, "settings.gradle", "settings.gradle.kts"),
            (
                MOD_MAIN_ACTIVITY,
                "app/src/main/java/**/MainActivity.java",
                "app/src/main/java/**/MainActivity.kt",
            ),
            (
                MOD_MAIN_APPLICATION,
                "app/src/main/java/**/MainApplication.java",
                "app/src/main/java/**/MainApplication.kt",
            ),
        ] {
            self.insert_file(
                PLATFORM_ANDROID,
                mod_name,
                FileModProvider::new(groovy, text.clone())
                    .with_candidate(kotlin)
                    .with_shape(ResultShape::Text),
            );
        }

        self.insert_pass_through(PLATFORM_ANDROID);
    }

    fn insert_ios(&mut self, formats: &FormatRegistry) {
        let plist = formats.resolve(FORMAT_PLIST);
        let text = formats.resolve(FORMAT_TEXT);

        self.insert_file(
            PLATFORM_IOS,
            MOD_INFO_PLIST,
            FileModProvider::new("{projectName}/Info.plist", plist.clone()),
        );
        self.insert_file(
            PLATFORM_IOS,
            MOD_EXPO_PLIST,
            FileModProvider::new("{projectName}/Supporting/Expo.plist", plist.clone()),
        );
        self.insert_file(
            PLATFORM_IOS,
            MOD_ENTITLEMENTS,
            FileModProvider::new("{projectName}/{projectName}.entitlements", plist)
                .with_candidate("{projectName}/*.entitlements")
                .with_template(json!({})),
        );
        self.insert_file(
            PLATFORM_IOS,
            MOD_XCODEPROJ,
            FileModProvider::new("{projectName}.xcodeproj/project.pbxproj", formats.resolve(FORMAT_PBXPROJ))
                .with_introspective(false),
        );
        self.insert_file(
            PLATFORM_IOS,
            MOD_PODFILE,
            FileModProvider::new("Podfile", text.clone()).with_shape(ResultShape::Text),
        );
        self.insert_file(
            PLATFORM_IOS,
            MOD_PODFILE_PROPERTIES,
            FileModProvider::new("Podfile.properties.json", formats.resolve(FORMAT_JSON))
                .with_template(json!({})),
        );
        self.insert_file(
            PLATFORM_IOS,
            MOD_APP_DELEGATE,
            FileModProvider::new("{projectName}/AppDelegate.mm", text)
                .with_candidate("{projectName}/AppDelegate.m")
                .with_candidate("{projectName}/AppDelegate.swift")
                .with_shape(ResultShape::Text),
        );

        self.insert_pass_through(PLATFORM_IOS);
    }

    fn insert_file(&mut self, platform: &str, mod_name: &str, provider: FileModProvider) {
        self.insert(platform, mod_name, Arc::new(provider));
    }

    fn insert_pass_through(&mut self, platform: &str) {
        self.insert(platform, MOD_DANGEROUS, Arc::new(PassThroughProvider));
        self.insert(platform, MOD_FINALIZED, Arc::new(PassThroughProvider));
    }
}

impl std::fmt::Debug for BaseModProviders {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keys: Vec<String> = self
            .entries
            .iter()
            .map(|(p, m, _)| format!("{}.{}", p, m))
            .collect();
        f.debug_struct("BaseModProviders").field("providers", &keys).finish()
    }
}
