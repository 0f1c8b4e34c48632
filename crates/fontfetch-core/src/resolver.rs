//! Primary-then-secondary catalog resolution

use crate::catalog::{CatalogKind, CatalogMatches, FontCatalog};
use crate::FontVariant;

/// A query term a catalog did not match
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CatalogMiss {
    pub catalog: CatalogKind,
    pub name: String,
}

/// Variants from exactly one catalog, plus every miss recorded on the way
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub variants: Vec<FontVariant>,
    pub source: CatalogKind,
    pub misses: Vec<CatalogMiss>,
}

impl Resolution {
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Terms that the catalog whose results were used did not match
    pub fn unmatched(&self) -> Vec<&str> {
        self.misses
            .iter()
            .filter(|m| m.catalog == self.source)
            .map(|m| m.name.as_str())
            .collect()
    }
}

/// Resolves queries against the primary catalog with a secondary fallback
pub struct QueryResolver<'a> {
    primary: Option<&'a dyn FontCatalog>,
    secondary: &'a dyn FontCatalog,
}

impl<'a> QueryResolver<'a> {
    /// `primary` is `None` when no primary catalog is configured
    pub fn new(primary: Option<&'a dyn FontCatalog>, secondary: &'a dyn FontCatalog) -> Self {
        Self { primary, secondary }
    }

    /// Resolve `names` (already normalized).
    ///
    /// With `prefer_primary`, the primary catalog is asked first and its
    /// results are used whenever they are non-empty; otherwise, or when the
    /// primary fails, the secondary catalog's results are used in full.
    /// Results are never merged.
    pub async fn resolve(&self, names: &[String], prefer_primary: bool) -> Resolution {
        let mut misses = Vec::new();

        if prefer_primary {
            if let Some(primary) = self.primary {
                let matches = search_or_nothing(primary, names).await;
                record_misses(&mut misses, primary.kind(), &matches);

                if !matches.variants.is_empty() {
                    return Resolution {
                        variants: matches.variants,
                        source: primary.kind(),
                        misses,
                    };
                }
                log::info!(
                    "{} returned no variants, falling back to {}",
                    primary.kind(),
                    self.secondary.kind()
                );
            }
        }

        let matches = search_or_nothing(self.secondary, names).await;
        record_misses(&mut misses, self.secondary.kind(), &matches);

        Resolution {
            variants: matches.variants,
            source: self.secondary.kind(),
            misses,
        }
    }
}

async fn search_or_nothing(catalog: &dyn FontCatalog, names: &[String]) -> CatalogMatches {
    match catalog.search(names).await {
        Ok(matches) => matches,
        Err(e) => {
            log::warn!("{} search failed: {}", catalog.kind(), e);
            CatalogMatches::nothing_for(names)
        }
    }
}

fn record_misses(misses: &mut Vec<CatalogMiss>, catalog: CatalogKind, matches: &CatalogMatches) {
    misses.extend(matches.unmatched.iter().map(|name| CatalogMiss {
        catalog,
        name: name.clone(),
    }));
}
