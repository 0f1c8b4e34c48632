//! HTTP transport for catalog queries and font downloads.
//!
//! Catalog clients and the installer only see the [`HttpBackend`] trait, so
//! tests can swap in the canned-response backend from [`testing`].

use crate::{FontError, FontResult};
use async_trait::async_trait;
use futures_util::StreamExt;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::time::Duration;

/// Progress callback invoked with `(downloaded_bytes, total_bytes)`.
/// `total_bytes` is 0 when the server does not announce a length.
pub type ProgressFn = dyn Fn(u64, u64) + Send + Sync;

const USER_AGENT: &str = concat!("fontfetch/", env!("CARGO_PKG_VERSION"));

/// Transport capability used by catalogs and the installer
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// Fetch a URL and return the full response body.
    async fn get_bytes(&self, url: &str) -> FontResult<Vec<u8>>;

    /// Stream a URL into `dest`, returning the number of bytes written.
    async fn download_to(
        &self,
        url: &str,
        dest: &Path,
        progress: Option<&ProgressFn>,
    ) -> FontResult<u64>;
}

/// Production backend built on reqwest
pub struct ReqwestBackend {
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new() -> FontResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { client })
    }

    async fn send(&self, url: &str) -> FontResult<reqwest::Response> {
        let parsed = reqwest::Url::parse(url).map_err(|e| FontError::InvalidUrl(format!("{url}: {e}")))?;

        log::debug!("GET {}", redact_key(url));
        let response = self.client.get(parsed).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FontError::HttpStatus {
                status: status.as_u16(),
                url: redact_key(url),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn get_bytes(&self, url: &str) -> FontResult<Vec<u8>> {
        let response = self.send(url).await?;
        let body = response.bytes().await?;
        Ok(body.to_vec())
    }

    async fn download_to(
        &self,
        url: &str,
        dest: &Path,
        progress: Option<&ProgressFn>,
    ) -> FontResult<u64> {
        let response = self.send(url).await?;
        let total = response.content_length().unwrap_or(0);

        let mut file = File::create(dest)?;
        let mut downloaded: u64 = 0;
        let mut stream = response.bytes_stream();

        let result: FontResult<()> = async {
            while let Some(chunk) = stream.next().await {
                let chunk = chunk?;
                file.write_all(&chunk)?;
                downloaded += chunk.len() as u64;
                if let Some(cb) = progress {
                    cb(downloaded, total);
                }
            }
            file.flush()?;
            Ok(())
        }
        .await;

        if let Err(e) = result {
            drop(file);
            // Never leave a truncated font behind
            let _ = fs::remove_file(dest);
            return Err(e);
        }

        Ok(downloaded)
    }
}

/// Hide the value of a `key=` query parameter before a URL is logged or shown.
pub fn redact_key(url: &str) -> String {
    match url.find("key=") {
        Some(pos) => {
            let start = pos + "key=".len();
            let end = url[start..].find('&').map(|i| start + i).unwrap_or(url.len());
            format!("{}***{}", &url[..start], &url[end..])
        }
        None => url.to_string(),
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================

#[cfg(any(test, feature = "test-support"))]
pub mod testing {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Canned outcome for one URL
    #[derive(Clone, Debug)]
    pub enum CannedResponse {
        Body(Vec<u8>),
        Status(u16),
        /// Connection-level failure (no HTTP status)
        Unreachable,
    }

    /// A fake HTTP backend that returns canned responses and records requests.
    #[derive(Default)]
    pub struct FakeBackend {
        responses: HashMap<String, CannedResponse>,
        requests: Mutex<Vec<String>>,
    }

    impl FakeBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_body(mut self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
            self.responses
                .insert(url.into(), CannedResponse::Body(body.into()));
            self
        }

        pub fn with_json(self, url: impl Into<String>, json: &serde_json::Value) -> Self {
            let body = serde_json::to_vec(json).unwrap_or_default();
            self.with_body(url, body)
        }

        pub fn with_status(mut self, url: impl Into<String>, status: u16) -> Self {
            self.responses
                .insert(url.into(), CannedResponse::Status(status));
            self
        }

        pub fn with_unreachable(mut self, url: impl Into<String>) -> Self {
            self.responses
                .insert(url.into(), CannedResponse::Unreachable);
            self
        }

        /// URLs requested so far, in order
        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().map(|r| r.clone()).unwrap_or_default()
        }

        fn respond(&self, url: &str) -> FontResult<Vec<u8>> {
            if let Ok(mut requests) = self.requests.lock() {
                requests.push(url.to_string());
            }

            match self.responses.get(url) {
                Some(CannedResponse::Body(body)) => Ok(body.clone()),
                Some(CannedResponse::Status(status)) => Err(FontError::HttpStatus {
                    status: *status,
                    url: redact_key(url),
                }),
                Some(CannedResponse::Unreachable) => Err(FontError::CatalogUnavailable {
                    catalog: "fake".to_string(),
                    reason: format!("{} unreachable", redact_key(url)),
                }),
                None => Err(FontError::HttpStatus {
                    status: 404,
                    url: redact_key(url),
                }),
            }
        }
    }

    #[async_trait]
    impl HttpBackend for FakeBackend {
        async fn get_bytes(&self, url: &str) -> FontResult<Vec<u8>> {
            self.respond(url)
        }

        async fn download_to(
            &self,
            url: &str,
            dest: &Path,
            progress: Option<&ProgressFn>,
        ) -> FontResult<u64> {
            let body = self.respond(url)?;
            fs::write(dest, &body)?;
            let len = body.len() as u64;
            if let Some(cb) = progress {
                cb(len, len);
            }
            Ok(len)
        }
    }
}
