//! Remote font catalogs
//!
//! Both catalogs expose one capability, searching by family-name prefix, and
//! normalize every matching file entry into a [`FontVariant`].

use crate::{FontError, FontResult, FontVariant};
use async_trait::async_trait;
use std::fmt;

mod google;
mod squirrel;

pub use google::{GoogleFontsCatalog, GOOGLE_FONTS_ENDPOINT};
pub use squirrel::{FontSquirrelCatalog, FONT_SQUIRREL_DOWNLOAD_BASE, FONT_SQUIRREL_ENDPOINT};

/// Which catalog produced a set of variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CatalogKind {
    /// Keyed web-font catalog with per-weight files
    Primary,
    /// Unkeyed archive catalog, one file per family
    Secondary,
}

impl CatalogKind {
    pub fn display_name(self) -> &'static str {
        match self {
            CatalogKind::Primary => "Google Fonts",
            CatalogKind::Secondary => "Font Squirrel",
        }
    }

    /// Whether variants from this catalog carry weight granularity
    pub fn has_weights(self) -> bool {
        self == CatalogKind::Primary
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Attribute a connection-level fetch failure to the catalog being searched.
///
/// HTTP status and decoding errors pass through unchanged.
pub(crate) fn fetch_error(kind: CatalogKind, err: FontError) -> FontError {
    match err {
        FontError::Transport(e) => FontError::CatalogUnavailable {
            catalog: kind.display_name().to_string(),
            reason: e.to_string(),
        },
        FontError::CatalogUnavailable { reason, .. } => FontError::CatalogUnavailable {
            catalog: kind.display_name().to_string(),
            reason,
        },
        other => other,
    }
}

/// Outcome of one catalog search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogMatches {
    /// Variants grouped per query term, then contiguously per family
    pub variants: Vec<FontVariant>,
    /// Query terms that matched no family, in query order
    pub unmatched: Vec<String>,
}

impl CatalogMatches {
    /// Result for a catalog that could not be consulted: nothing matched.
    pub fn nothing_for(names: &[String]) -> Self {
        Self {
            variants: Vec::new(),
            unmatched: names.to_vec(),
        }
    }
}

/// Search capability shared by all catalogs
#[async_trait]
pub trait FontCatalog: Send + Sync {
    fn kind(&self) -> CatalogKind;

    /// Search for families whose normalized name starts with one of `names`.
    ///
    /// `names` must already be normalized. An error means the catalog could
    /// not be fetched or parsed at all.
    async fn search(&self, names: &[String]) -> FontResult<CatalogMatches>;
}

/// Extension of a file name or URL, starting at its last dot.
pub(crate) fn extension_from_last_dot(s: &str) -> Option<&str> {
    s.rfind('.').map(|pos| &s[pos..])
}

/// Extension of a file name, starting at its first dot.
pub(crate) fn extension_from_first_dot(s: &str) -> Option<&str> {
    s.find('.').map(|pos| &s[pos..])
}
