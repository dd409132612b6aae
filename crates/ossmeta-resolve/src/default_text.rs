//! # Default License Texts
//!
//! Canonical license texts from the SPDX license-list-data repository, used
//! when a package ships no license file and the build asked for texts to be
//! replenished.
//!
//! ## Cache Lifetime
//!
//! [`LicenseTextCache`] is an explicit object. Construct it once per process
//! (or per build) and hand the same `Arc` to every text resolver that should
//! share it. License text for a given identifier never changes, so sharing
//! across builds is safe.
//!
//! ## Single-flight
//!
//! Each identifier maps to its own `tokio::sync::OnceCell`. Concurrent
//! requests for the same identifier wait on one fetch. A failed fetch leaves
//! the cell empty so a later build can try again.
//!
//! ## Retry
//!
//! None. A transport error or non-2xx response fails the build.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use ossmeta_core::ResolveError;
use parking_lot::Mutex;
use tokio::sync::OnceCell;

/// Base URL of the SPDX license text files (`<base>/<identifier>.txt`).
pub const DEFAULT_LICENSE_TEXT_BASE_URL: &str =
    "https://raw.githubusercontent.com/spdx/license-list-data/main/text";

/// Configuration for [`SpdxTextClient`].
#[derive(Debug, Clone)]
pub struct SpdxTextConfig {
    /// Base URL; the identifier and `.txt` are appended.
    pub base_url: String,
    /// Request timeout in seconds (default: 30).
    pub timeout_secs: u64,
}

impl SpdxTextConfig {
    /// Configuration pointing at a custom base URL, default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: 30,
        }
    }
}

impl Default for SpdxTextConfig {
    fn default() -> Self {
        Self::new(DEFAULT_LICENSE_TEXT_BASE_URL)
    }
}

/// HTTP client for canonical SPDX license texts.
#[derive(Debug, Clone)]
pub struct SpdxTextClient {
    client: reqwest::Client,
    base_url: String,
}

impl SpdxTextClient {
    /// Build a client from configuration.
    pub fn new(config: SpdxTextConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    /// URL of the text for `license`.
    pub fn url_for(&self, license: &str) -> String {
        format!("{}/{license}.txt", self.base_url)
    }

    /// Fetch the text for `license`, bypassing any cache.
    pub async fn fetch(&self, license: &str) -> Result<String, ResolveError> {
        let url = self.url_for(license);
        tracing::info!(license, url = %url, "fetching default license text");

        let fetch_error = |reason: String| ResolveError::DefaultTextFetch {
            license: license.to_string(),
            reason,
        };

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| fetch_error(format!("{url}: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(fetch_error(format!("{url}: HTTP {status}")));
        }

        resp.text()
            .await
            .map_err(|e| fetch_error(format!("{url}: failed to read body: {e}")))
    }
}

/// Process-lifetime cache of default license texts, keyed by identifier.
#[derive(Debug, Default)]
pub struct LicenseTextCache {
    entries: Mutex<HashMap<String, Arc<OnceCell<String>>>>,
}

impl LicenseTextCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached text for `license`, if a fetch has completed.
    pub fn get(&self, license: &str) -> Option<String> {
        self.entries
            .lock()
            .get(license)
            .and_then(|cell| cell.get().cloned())
    }

    /// Number of identifiers with a completed fetch.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .values()
            .filter(|cell| cell.initialized())
            .count()
    }

    /// Whether no fetch has completed yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the cached text for `license`, running `fetch` at most once
    /// across concurrent callers if it is not cached yet.
    pub async fn get_or_fetch<F, Fut>(&self, license: &str, fetch: F) -> Result<String, ResolveError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, ResolveError>>,
    {
        let cell = {
            let mut entries = self.entries.lock();
            entries.entry(license.to_string()).or_default().clone()
        };

        if cell.initialized() {
            tracing::debug!(license, "default license text served from cache");
        }

        cell.get_or_try_init(fetch).await.cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn url_for_trims_trailing_slash() {
        let client = SpdxTextClient::new(SpdxTextConfig::new("https://example.test/text/")).unwrap();
        assert_eq!(client.url_for("MIT"), "https://example.test/text/MIT.txt");
    }

    #[test]
    fn default_config_points_at_spdx_license_list() {
        let client = SpdxTextClient::new(SpdxTextConfig::default()).unwrap();
        assert_eq!(
            client.url_for("Apache-2.0"),
            "https://raw.githubusercontent.com/spdx/license-list-data/main/text/Apache-2.0.txt"
        );
    }

    #[tokio::test]
    async fn fetch_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/MIT.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("MIT License\n"))
            .expect(1)
            .mount(&server)
            .await;

        let client = SpdxTextClient::new(SpdxTextConfig::new(server.uri())).unwrap();
        assert_eq!(client.fetch("MIT").await.unwrap(), "MIT License\n");
    }

    #[tokio::test]
    async fn fetch_fails_on_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/Nope.txt"))
            .respond_with(ResponseTemplate::new(404).set_body_string("404: Not Found"))
            .mount(&server)
            .await;

        let client = SpdxTextClient::new(SpdxTextConfig::new(server.uri())).unwrap();
        let err = client.fetch("Nope").await.unwrap_err();
        match err {
            ResolveError::DefaultTextFetch { license, reason } => {
                assert_eq!(license, "Nope");
                assert!(reason.contains("404"), "unexpected reason: {reason}");
            }
            other => panic!("expected DefaultTextFetch, got {other}"),
        }
    }

    #[tokio::test]
    async fn cache_runs_fetch_once() {
        let cache = LicenseTextCache::new();
        let calls = AtomicU32::new(0);

        for _ in 0..3 {
            let text = cache
                .get_or_fetch("MIT", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok("MIT License".to_string())
                })
                .await
                .unwrap();
            assert_eq!(text, "MIT License");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("MIT").as_deref(), Some("MIT License"));
    }

    #[tokio::test]
    async fn cache_does_not_remember_failures() {
        let cache = LicenseTextCache::new();

        let err = cache
            .get_or_fetch("ISC", || async {
                Err(ResolveError::DefaultTextFetch {
                    license: "ISC".into(),
                    reason: "offline".into(),
                })
            })
            .await;
        assert!(err.is_err());
        assert!(cache.is_empty());

        let text = cache
            .get_or_fetch("ISC", || async { Ok("ISC License".to_string()) })
            .await
            .unwrap();
        assert_eq!(text, "ISC License");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_requests_share_one_fetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/Apache-2.0.txt"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("Apache License")
                    .set_delay(Duration::from_millis(100)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = SpdxTextClient::new(SpdxTextConfig::new(server.uri())).unwrap();
        let cache = Arc::new(LicenseTextCache::new());

        let mut handles = Vec::new();
        for _ in 0..8 {
            let client = client.clone();
            let cache = Arc::clone(&cache);
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_fetch("Apache-2.0", || client.fetch("Apache-2.0"))
                    .await
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), "Apache License");
        }
    }
}
