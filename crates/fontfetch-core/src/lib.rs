//! fontfetch-core - Catalog resolution and font installation for fontfetch
//!
//! This library turns font-name queries into downloadable [`FontVariant`]
//! records by searching remote font catalogs, decides which variants to
//! fetch, and writes them into per-user or system-wide font directories.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub mod catalog;
pub mod config;
pub mod filter;
pub mod http;
pub mod installer;
pub mod resolver;
pub mod settings;
pub mod weights;


pub use catalog::{CatalogKind, CatalogMatches, FontCatalog, FontSquirrelCatalog, GoogleFontsCatalog};
pub use config::{FontfetchConfig, PrivilegeCheck};
pub use filter::FilterOptions;
pub use http::{HttpBackend, ProgressFn, ReqwestBackend};
pub use installer::FontInstaller;
pub use resolver::{CatalogMiss, QueryResolver, Resolution};
pub use settings::{CatalogCredentials, Settings};

/// Core errors for catalog and installation operations
#[derive(Error, Debug)]
pub enum FontError {
    #[error("Catalog '{catalog}' is unavailable: {reason}\n→ Suggestion: Check your network connection or try again with --no-google")]
    CatalogUnavailable { catalog: String, reason: String },

    #[error("Invalid catalog response: {0}\n→ Suggestion: The service may have changed its format; retry later")]
    InvalidResponse(String),

    #[error("HTTP request to {url} failed with status {status}\n→ Suggestion: Verify the API key and that the font is still published")]
    HttpStatus { status: u16, url: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP transport error: {0}\n→ Suggestion: Check your network connection")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid font family name: '{0}'\n→ Suggestion: Use the family name as shown by a search, without path separators")]
    InvalidFamilyName(String),

    #[error("IO error: {0}\n→ Suggestion: Check file permissions and disk space")]
    IoError(#[from] std::io::Error),

    #[error("Permission denied: {0}\n→ Suggestion: Re-run with sudo to use system-wide font directories")]
    PermissionDenied(String),

    #[error("Settings error: {0}\n→ Suggestion: Check or delete the settings file at {1}")]
    Settings(String, PathBuf),
}

/// Result type for font operations
pub type FontResult<T> = Result<T, FontError>;

/// Font installation scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FontScope {
    /// Per-user font directory under the home directory
    User,
    /// Shared system font directory (requires root)
    System,
}

impl FontScope {
    pub fn from_system_flag(system_wide: bool) -> Self {
        if system_wide {
            FontScope::System
        } else {
            FontScope::User
        }
    }

    /// Get a human-readable description
    pub fn description(self) -> &'static str {
        match self {
            FontScope::User => "user-level",
            FontScope::System => "system-level",
        }
    }
}

/// Canonical style bucket of a variant.
///
/// Google Fonts variants land in one of the first four buckets; Font Squirrel
/// only distinguishes proportional from monospaced families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleProperty {
    Regular,
    Bold,
    Italic,
    /// Weight token did not end in one of the canonical buckets
    #[serde(rename = "")]
    Unclassified,
    Proportional,
    Monospace,
}

impl StyleProperty {
    pub fn as_str(self) -> &'static str {
        match self {
            StyleProperty::Regular => "regular",
            StyleProperty::Bold => "bold",
            StyleProperty::Italic => "italic",
            StyleProperty::Unclassified => "",
            StyleProperty::Proportional => "proportional",
            StyleProperty::Monospace => "monospace",
        }
    }

    pub fn is_empty(self) -> bool {
        self == StyleProperty::Unclassified
    }
}

impl fmt::Display for StyleProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One concrete downloadable file of a font family
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FontVariant {
    /// Normalized family identifier (lowercase, spaces replaced with hyphens)
    pub family: String,
    pub style_property: StyleProperty,
    /// Descriptive weight token such as `light-italic`; empty for Font Squirrel
    pub weight: String,
    /// File extension including the leading dot
    pub file_format: String,
    pub source_url: String,
}

impl FontVariant {
    /// File name the variant is stored under inside its family directory
    pub fn file_name(&self) -> String {
        if self.style_property.is_empty() {
            format!("{}{}", self.family, self.file_format)
        } else {
            format!("{}-{}{}", self.family, self.style_property, self.file_format)
        }
    }
}

/// Normalize a family name or query: lowercase with spaces replaced by hyphens.
pub fn normalize_family_name(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

/// Whether `family` (already normalized) is selected by the normalized `query`.
///
/// Matching is by prefix only, so `robo` selects `roboto` and
/// `roboto-condensed` but never `eroboto`.
pub fn family_matches(family: &str, query: &str) -> bool {
    family.starts_with(query)
}
