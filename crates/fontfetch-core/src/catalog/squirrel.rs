use super::{extension_from_first_dot, fetch_error, CatalogKind, CatalogMatches, FontCatalog};
use crate::http::HttpBackend;
use crate::{family_matches, normalize_family_name, FontError, FontResult, FontVariant, StyleProperty};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

/// Public "list all fonts" endpoint, no credentials required
pub const FONT_SQUIRREL_ENDPOINT: &str = "https://www.fontsquirrel.com/api/fontlist/all";

/// Prefix of per-family download URLs; the family's `family_urlname` is appended
pub const FONT_SQUIRREL_DOWNLOAD_BASE: &str = "https://www.fontsquirrel.com/fonts/download/";

#[derive(Debug, Deserialize)]
struct SquirrelFamily {
    family_name: String,
    family_urlname: String,
    font_filename: String,
    #[serde(default = "proportional_flag")]
    is_monospace: String,
}

fn proportional_flag() -> String {
    "N".to_string()
}

/// Font Squirrel catalog client
pub struct FontSquirrelCatalog {
    backend: Arc<dyn HttpBackend>,
    endpoint: String,
    download_base: String,
}

impl FontSquirrelCatalog {
    pub fn new(backend: Arc<dyn HttpBackend>) -> Self {
        Self {
            backend,
            endpoint: FONT_SQUIRREL_ENDPOINT.to_string(),
            download_base: FONT_SQUIRREL_DOWNLOAD_BASE.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl FontCatalog for FontSquirrelCatalog {
    fn kind(&self) -> CatalogKind {
        CatalogKind::Secondary
    }

    async fn search(&self, names: &[String]) -> FontResult<CatalogMatches> {
        let body = self
            .backend
            .get_bytes(&self.endpoint)
            .await
            .map_err(|e| fetch_error(CatalogKind::Secondary, e))?;
        let families: Vec<SquirrelFamily> = serde_json::from_slice(&body)
            .map_err(|e| FontError::InvalidResponse(format!("Font Squirrel: {e}")))?;

        log::debug!("Font Squirrel returned {} families", families.len());
        Ok(match_families(&families, names, &self.download_base))
    }
}

fn match_families(families: &[SquirrelFamily], names: &[String], download_base: &str) -> CatalogMatches {
    let mut matches = CatalogMatches::default();

    for name in names {
        let mut found = false;

        for entry in families {
            let family = normalize_family_name(&entry.family_name);
            if family.is_empty() || !family_matches(&family, name) {
                continue;
            }

            // Unlike Google Fonts URLs, the format comes from the first dot.
            // Catalog file names carry a single extension, so both rules agree.
            let Some(file_format) = extension_from_first_dot(&entry.font_filename) else {
                log::warn!(
                    "Skipping Font Squirrel family '{}': file name '{}' has no extension",
                    family,
                    entry.font_filename
                );
                continue;
            };

            found = true;
            let style_property = if entry.is_monospace == "N" {
                StyleProperty::Proportional
            } else {
                StyleProperty::Monospace
            };

            matches.variants.push(FontVariant {
                family,
                style_property,
                weight: String::new(),
                file_format: file_format.to_string(),
                source_url: format!("{download_base}{}", entry.family_urlname),
            });
        }

        if !found {
            matches.unmatched.push(name.clone());
        }
    }

    matches
}
