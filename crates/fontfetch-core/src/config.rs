//! Runtime configuration for fontfetch
//!
//! Install roots and the settings location come from environment overrides
//! with per-platform defaults; privilege detection lives here as well.

use crate::settings;
use crate::{FontError, FontResult, FontScope};
use std::env;
use std::path::PathBuf;

/// Resolved runtime configuration
#[derive(Debug, Clone)]
pub struct FontfetchConfig {
    /// Font directory configuration
    pub font_paths: FontPaths,
    /// Location of the settings document holding the API key
    pub settings_path: PathBuf,
}

/// Font directory configuration
#[derive(Debug, Clone, Default)]
pub struct FontPaths {
    /// Override per-user font root (FONTFETCH_OVERRIDE_USER_FONTS)
    pub user_fonts_override: Option<PathBuf>,
    /// Override system font root (FONTFETCH_OVERRIDE_SYSTEM_FONTS)
    pub system_fonts_override: Option<PathBuf>,
}

impl Default for FontfetchConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl FontfetchConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            font_paths: FontPaths::from_env(),
            settings_path: settings::settings_path(),
        }
    }

    /// Configuration rooted entirely under explicit directories
    pub fn with_roots(user: PathBuf, system: PathBuf, settings_path: PathBuf) -> Self {
        Self {
            font_paths: FontPaths {
                user_fonts_override: Some(user),
                system_fonts_override: Some(system),
            },
            settings_path,
        }
    }

    /// Get effective per-user font root
    pub fn user_font_dir(&self) -> FontResult<PathBuf> {
        match &self.font_paths.user_fonts_override {
            Some(path) => Ok(path.clone()),
            None => default_user_font_dir(),
        }
    }

    /// Get effective system font root
    pub fn system_font_dir(&self) -> PathBuf {
        self.font_paths
            .system_fonts_override
            .clone()
            .unwrap_or_else(default_system_font_dir)
    }

    /// Font root for the given scope
    pub fn font_dir(&self, scope: FontScope) -> FontResult<PathBuf> {
        match scope {
            FontScope::User => self.user_font_dir(),
            FontScope::System => Ok(self.system_font_dir()),
        }
    }
}

impl FontPaths {
    pub fn from_env() -> Self {
        let user_fonts_override = env::var("FONTFETCH_OVERRIDE_USER_FONTS")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let system_fonts_override = env::var("FONTFETCH_OVERRIDE_SYSTEM_FONTS")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Self {
            user_fonts_override,
            system_fonts_override,
        }
    }
}

/// Get default per-user font root based on platform
fn default_user_font_dir() -> FontResult<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        dirs::data_local_dir()
            .map(|d| d.join("Microsoft").join("Windows").join("Fonts"))
            .ok_or_else(|| FontError::PermissionDenied("Cannot determine local app data directory".to_string()))
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = dirs::home_dir()
            .ok_or_else(|| FontError::PermissionDenied("Cannot determine home directory".to_string()))?;

        #[cfg(target_os = "macos")]
        {
            Ok(home.join("Library").join("Fonts"))
        }

        #[cfg(not(target_os = "macos"))]
        {
            Ok(home.join(".local").join("share").join("fonts"))
        }
    }
}

/// Get default system font root based on platform
fn default_system_font_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        PathBuf::from("/Library/Fonts")
    }

    #[cfg(target_os = "windows")]
    {
        PathBuf::from("C:\\Windows\\Fonts")
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        PathBuf::from("/usr/share/fonts")
    }
}

/// Decides whether the process may write to system-wide font directories
pub trait PrivilegeCheck {
    fn is_privileged(&self) -> bool;
}

/// Effective-UID based check (root on Unix)
#[derive(Debug, Default, Clone, Copy)]
pub struct EffectiveUidCheck;

impl PrivilegeCheck for EffectiveUidCheck {
    fn is_privileged(&self) -> bool {
        is_admin()
    }
}

/// Fixed answer, for tests and embedding
#[derive(Debug, Clone, Copy)]
pub struct StaticPrivilege(pub bool);

impl PrivilegeCheck for StaticPrivilege {
    fn is_privileged(&self) -> bool {
        self.0
    }
}

/// Check if current process has administrator/root privileges
pub fn is_admin() -> bool {
    #[cfg(unix)]
    {
        unsafe { libc::geteuid() == 0 }
    }

    #[cfg(not(unix))]
    {
        // TODO: query the process token elevation on Windows
        false
    }
}
