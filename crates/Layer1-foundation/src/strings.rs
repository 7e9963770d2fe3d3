//! String constants
//!
//! 플랫폼, mod 이름, 포맷 이름 등 자주 쓰는 정적 문자열.
//!
//! # Usage
//!
//! ```ignore
//! use modkit_foundation::strings::{PLATFORM_ANDROID, MOD_MANIFEST};
//!
//! config = extend_strict(config, PLATFORM_ANDROID, MOD_MANIFEST, action);
//! ```

// ============================================================================
// Platform Constants
// ============================================================================

/// iOS platform ID
pub const PLATFORM_IOS: &str = "ios";
/// Android platform ID
pub const PLATFORM_ANDROID: &str = "android";

// ============================================================================
// Mod Name Constants - 공통
// ============================================================================

/// 구조화되지 않은 부수효과 mod (항상 가장 먼저 실행)
pub const MOD_DANGEROUS: &str = "dangerous";
/// 다른 모든 mod 이후에 실행되는 mod
pub const MOD_FINALIZED: &str = "finalized";

// ============================================================================
// Mod Name Constants - Android
// ============================================================================

pub const MOD_MANIFEST: &str = "manifest";
pub const MOD_STRINGS: &str = "strings";
pub const MOD_COLORS: &str = "colors";
pub const MOD_COLORS_NIGHT: &str = "colorsNight";
pub const MOD_STYLES: &str = "styles";
pub const MOD_GRADLE_PROPERTIES: &str = "gradleProperties";
pub const MOD_PROJECT_BUILD_GRADLE: &str = "projectBuildGradle";
pub const MOD_APP_BUILD_GRADLE: &str = "appBuildGradle";
pub const MOD_SETTINGS_GRADLE: &str = "settingsGradle";
pub const MOD_MAIN_ACTIVITY: &str = "mainActivity";
pub const MOD_MAIN_APPLICATION: &str = "mainApplication";

// ============================================================================
// Mod Name Constants - iOS
// ============================================================================

pub const MOD_INFO_PLIST: &str = "infoPlist";
pub const MOD_EXPO_PLIST: &str = "expoPlist";
pub const MOD_ENTITLEMENTS: &str = "entitlements";
pub const MOD_XCODEPROJ: &str = "xcodeproj";
pub const MOD_PODFILE: &str = "podfile";
pub const MOD_PODFILE_PROPERTIES: &str = "podfileProperties";
pub const MOD_APP_DELEGATE: &str = "appDelegate";

// ============================================================================
// Format Constants
// ============================================================================

pub const FORMAT_JSON: &str = "json";
pub const FORMAT_TEXT: &str = "text";
pub const FORMAT_XML: &str = "xml";
pub const FORMAT_PLIST: &str = "plist";
pub const FORMAT_PBXPROJ: &str = "pbxproj";
pub const FORMAT_PROPERTIES: &str = "properties";

// ============================================================================
// Plugin Constants
// ============================================================================

/// 버전이 없는 플러그인의 history 버전 값
pub const UNVERSIONED: &str = "UNVERSIONED";
/// 패키지 안의 관례적 플러그인 엔트리 파일
pub const PLUGIN_ENTRY_FILE: &str = "app.plugin";
/// fallback 플러그인에 전달되는 예약 속성
pub const RESOLVER_ERROR_PROPERTY: &str = "_resolverError";
