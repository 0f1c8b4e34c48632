use super::{extension_from_last_dot, fetch_error, CatalogKind, CatalogMatches, FontCatalog};
use crate::http::HttpBackend;
use crate::settings::CatalogCredentials;
use crate::weights::{style_property_for_weight, weight_from_file_key};
use crate::{family_matches, normalize_family_name, FontError, FontResult, FontVariant};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// "List all webfonts" endpoint; the API key is appended as `?key=`
pub const GOOGLE_FONTS_ENDPOINT: &str = "https://www.googleapis.com/webfonts/v1/webfonts";

#[derive(Debug, Deserialize)]
struct WebfontList {
    #[serde(default)]
    items: Vec<WebfontFamily>,
}

#[derive(Debug, Deserialize)]
struct WebfontFamily {
    family: String,
    /// File key (`regular`, `700italic`, ...) to download URL, in key order
    #[serde(default)]
    files: BTreeMap<String, String>,
}

/// Google Fonts developer API client
pub struct GoogleFontsCatalog {
    backend: Arc<dyn HttpBackend>,
    credentials: CatalogCredentials,
    endpoint: String,
}

impl GoogleFontsCatalog {
    pub fn new(backend: Arc<dyn HttpBackend>, credentials: CatalogCredentials) -> Self {
        Self {
            backend,
            credentials,
            endpoint: GOOGLE_FONTS_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Full request URL including the API key
    pub fn request_url(&self) -> String {
        format!("{}?key={}", self.endpoint, self.credentials.api_key())
    }
}

#[async_trait]
impl FontCatalog for GoogleFontsCatalog {
    fn kind(&self) -> CatalogKind {
        CatalogKind::Primary
    }

    async fn search(&self, names: &[String]) -> FontResult<CatalogMatches> {
        let body = self
            .backend
            .get_bytes(&self.request_url())
            .await
            .map_err(|e| fetch_error(CatalogKind::Primary, e))?;
        let list: WebfontList = serde_json::from_slice(&body)
            .map_err(|e| FontError::InvalidResponse(format!("Google Fonts: {e}")))?;

        log::debug!("Google Fonts returned {} families", list.items.len());
        Ok(match_families(&list.items, names))
    }
}

fn match_families(families: &[WebfontFamily], names: &[String]) -> CatalogMatches {
    let mut matches = CatalogMatches::default();

    for name in names {
        let mut found = false;

        for entry in families {
            let family = normalize_family_name(&entry.family);
            if family.is_empty() || !family_matches(&family, name) {
                continue;
            }
            found = true;
            log::debug!("'{}' matched Google Fonts family '{}'", name, family);

            for (key, url) in &entry.files {
                let Some(file_format) = extension_from_last_dot(url) else {
                    log::warn!("Skipping {} file '{}': URL has no extension", family, key);
                    continue;
                };

                let weight = weight_from_file_key(key);
                matches.variants.push(FontVariant {
                    family: family.clone(),
                    style_property: style_property_for_weight(&weight),
                    weight,
                    file_format: file_format.to_string(),
                    source_url: url.clone(),
                });
            }
        }

        if !found {
            matches.unmatched.push(name.clone());
        }
    }

    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::FakeBackend;
    use crate::StyleProperty;
    use serde_json::json;

    fn sample_catalog() -> serde_json::Value {
        json!({
            "kind": "webfonts#webfontList",
            "items": [
                {
                    "family": "Open Sans",
                    "files": {
                        "regular": "https://fonts.gstatic.com/s/opensans/v1/OpenSans-Regular.ttf",
                        "700": "https://fonts.gstatic.com/s/opensans/v1/OpenSans-Bold.ttf",
                        "700italic": "https://fonts.gstatic.com/s/opensans/v1/OpenSans-BoldItalic.ttf"
                    }
                },
                {
                    "family": "Roboto",
                    "files": {
                        "300": "https://fonts.gstatic.com/s/roboto/v1/Roboto-Light.ttf",
                        "regular": "https://fonts.gstatic.com/s/roboto/v1/Roboto-Regular.ttf"
                    }
                },
                {
                    "family": "Roboto Condensed",
                    "files": {
                        "regular": "https://fonts.gstatic.com/s/robotocondensed/v1/RobotoCondensed.woff2"
                    }
                },
                {
                    "family": "Eroboto",
                    "files": {
                        "regular": "https://fonts.gstatic.com/s/eroboto/v1/Eroboto.ttf"
                    }
                }
            ]
        })
    }

    fn catalog_with(backend: FakeBackend) -> GoogleFontsCatalog {
        GoogleFontsCatalog::new(Arc::new(backend), CatalogCredentials::new("test-key"))
    }

    fn search_url() -> String {
        format!("{GOOGLE_FONTS_ENDPOINT}?key=test-key")
    }

    #[tokio::test]
    async fn open_sans_yields_three_classified_variants() {
        let catalog = catalog_with(FakeBackend::new().with_json(search_url(), &sample_catalog()));

        let matches = catalog
            .search(&["open-sans".to_string()])
            .await
            .expect("search");

        assert!(matches.unmatched.is_empty());
        assert_eq!(matches.variants.len(), 3);
        assert!(matches.variants.iter().all(|v| v.family == "open-sans"));

        // files are visited in key order: "700", "700italic", "regular"
        let weights: Vec<&str> = matches.variants.iter().map(|v| v.weight.as_str()).collect();
        assert_eq!(weights, vec!["bold", "bold-italic", "regular"]);

        let props: Vec<StyleProperty> =
            matches.variants.iter().map(|v| v.style_property).collect();
        assert_eq!(
            props,
            vec![StyleProperty::Bold, StyleProperty::Italic, StyleProperty::Regular]
        );
        assert!(matches.variants.iter().all(|v| v.file_format == ".ttf"));
    }

    #[tokio::test]
    async fn prefix_query_matches_several_families_contiguously() {
        let catalog = catalog_with(FakeBackend::new().with_json(search_url(), &sample_catalog()));

        let matches = catalog.search(&["robo".to_string()]).await.expect("search");

        let families: Vec<&str> = matches.variants.iter().map(|v| v.family.as_str()).collect();
        assert_eq!(families, vec!["roboto", "roboto", "roboto-condensed"]);
        assert_eq!(matches.variants[2].file_format, ".woff2");
        assert_eq!(matches.variants[0].weight, "light");
        assert_eq!(matches.variants[0].style_property, StyleProperty::Unclassified);
    }

    #[tokio::test]
    async fn unmatched_terms_are_reported_in_query_order() {
        let catalog = catalog_with(FakeBackend::new().with_json(search_url(), &sample_catalog()));

        let names = vec![
            "nope".to_string(),
            "roboto-condensed".to_string(),
            "missing".to_string(),
        ];
        let matches = catalog.search(&names).await.expect("search");

        assert_eq!(matches.unmatched, vec!["nope".to_string(), "missing".to_string()]);
        assert_eq!(matches.variants.len(), 1);
    }

    #[tokio::test]
    async fn request_carries_api_key() {
        let backend = Arc::new(FakeBackend::new().with_json(search_url(), &sample_catalog()));
        let catalog = GoogleFontsCatalog::new(backend.clone(), CatalogCredentials::new("test-key"));

        catalog.search(&["roboto".to_string()]).await.expect("search");

        assert_eq!(backend.requests(), vec![search_url()]);
    }

    #[tokio::test]
    async fn http_failure_is_an_error() {
        let catalog = catalog_with(FakeBackend::new().with_status(search_url(), 400));
        let err = catalog.search(&["roboto".to_string()]).await.unwrap_err();
        assert!(matches!(err, FontError::HttpStatus { status: 400, .. }));
    }

    #[tokio::test]
    async fn unreachable_service_is_reported_as_unavailable_catalog() {
        let catalog = catalog_with(FakeBackend::new().with_unreachable(search_url()));
        let err = catalog.search(&["roboto".to_string()]).await.unwrap_err();
        match err {
            FontError::CatalogUnavailable { catalog, .. } => assert_eq!(catalog, "Google Fonts"),
            other => panic!("expected CatalogUnavailable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_json_is_invalid_response() {
        let catalog = catalog_with(FakeBackend::new().with_body(search_url(), b"<html>".to_vec()));
        let err = catalog.search(&["roboto".to_string()]).await.unwrap_err();
        assert!(matches!(err, FontError::InvalidResponse(_)));
    }

    #[test]
    fn files_without_extension_are_skipped() {
        let families = vec![WebfontFamily {
            family: "Odd".to_string(),
            files: BTreeMap::from([
                ("regular".to_string(), "https://fonts/odd-regular.ttf".to_string()),
                ("700".to_string(), "no-extension".to_string()),
            ]),
        }];

        let matches = match_families(&families, &["odd".to_string()]);
        assert_eq!(matches.variants.len(), 1);
        assert_eq!(matches.variants[0].weight, "regular");
    }
}
