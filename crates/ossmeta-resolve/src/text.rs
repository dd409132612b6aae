//! # License Text Resolution
//!
//! Obtains the human-readable license text for a package whose identifier
//! is already known.
//!
//! ## Order
//!
//! 1. `SEE LICENSE IN <file>`: read `<file>` from the package directory. A
//!    missing file is an error and nothing else is tried.
//! 2. The first regular entry of the package directory whose name starts
//!    with `licence` or `license` (any case), in directory-listing order.
//! 3. The canonical SPDX text, if replenishing is enabled.
//! 4. Otherwise no text.
//!
//! Discovery (step 2) and file reading (steps 1 and 2) go through the
//! [`LicenseFileLocator`] and [`LicenseFileReader`] strategies.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use ossmeta_core::{license_file_pointer, PackageId, ResolveError};

use crate::default_text::{LicenseTextCache, SpdxTextClient};
use crate::options::LicenseOptions;

/// Finds the license file of a package.
#[async_trait]
pub trait LicenseFileLocator: Send + Sync {
    /// File name (relative to `package_dir`) of the license file, if any.
    async fn locate(&self, package_dir: &Path) -> std::io::Result<Option<String>>;
}

/// Reads a license file.
#[async_trait]
pub trait LicenseFileReader: Send + Sync {
    /// Contents of the file at `path`.
    async fn read_license_file(&self, path: &Path) -> std::io::Result<String>;
}

/// Default locator: scans the immediate entries of the package directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryScan;

impl DirectoryScan {
    /// Whether `name` looks like a license file (`licen[cs]e` prefix, any case).
    pub fn is_license_file_name(name: &str) -> bool {
        name.get(..7).is_some_and(|prefix| {
            prefix.eq_ignore_ascii_case("license") || prefix.eq_ignore_ascii_case("licence")
        })
    }
}

#[async_trait]
impl LicenseFileLocator for DirectoryScan {
    async fn locate(&self, package_dir: &Path) -> std::io::Result<Option<String>> {
        let mut entries = tokio::fs::read_dir(package_dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                continue;
            }
            let name = entry.file_name();
            if let Some(name) = name.to_str() {
                if Self::is_license_file_name(name) {
                    return Ok(Some(name.to_string()));
                }
            }
        }

        Ok(None)
    }
}

/// Default reader: file contents via `tokio::fs`, decoded as UTF-8.
///
/// Invalid sequences (a Latin-1 copyright line, say) become U+FFFD rather
/// than failing the build.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLicenseFileReader;

#[async_trait]
impl LicenseFileReader for FsLicenseFileReader {
    async fn read_license_file(&self, path: &Path) -> std::io::Result<String> {
        let bytes = tokio::fs::read(path).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Resolves license text using pluggable discovery and reading strategies
/// and a shared default-text cache.
#[derive(Clone)]
pub struct LicenseTextResolver {
    locator: Arc<dyn LicenseFileLocator>,
    reader: Arc<dyn LicenseFileReader>,
    client: SpdxTextClient,
    cache: Arc<LicenseTextCache>,
}

impl LicenseTextResolver {
    /// Resolver with the default strategies.
    pub fn new(client: SpdxTextClient, cache: Arc<LicenseTextCache>) -> Self {
        Self {
            locator: Arc::new(DirectoryScan),
            reader: Arc::new(FsLicenseFileReader),
            client,
            cache,
        }
    }

    /// Replace the license file discovery strategy.
    pub fn with_locator(mut self, locator: Arc<dyn LicenseFileLocator>) -> Self {
        self.locator = locator;
        self
    }

    /// Replace the license file reading strategy.
    pub fn with_reader(mut self, reader: Arc<dyn LicenseFileReader>) -> Self {
        self.reader = reader;
        self
    }

    /// The default-text cache shared by this resolver.
    pub fn cache(&self) -> &Arc<LicenseTextCache> {
        &self.cache
    }

    /// Resolve the license text of one package.
    ///
    /// Returns `Ok(None)` when no text is available and replenishing is off.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::MissingLicenseFile`] when a `SEE LICENSE IN` pointer
    ///   cannot be followed.
    /// - [`ResolveError::Io`] when the package directory cannot be listed or
    ///   a discovered license file cannot be read.
    /// - [`ResolveError::DefaultTextFetch`] when the remote fallback fails.
    pub async fn resolve_text(
        &self,
        package_id: &PackageId,
        license: &str,
        package_dir: &Path,
        options: &LicenseOptions,
    ) -> Result<Option<String>, ResolveError> {
        if let Some(file_name) = license_file_pointer(license) {
            let path = package_dir.join(file_name);
            return match self.reader.read_license_file(&path).await {
                Ok(text) => Ok(Some(text)),
                Err(e) => {
                    tracing::debug!(%package_id, path = %path.display(), "license pointer unreadable: {e}");
                    Err(ResolveError::MissingLicenseFile {
                        package_id: package_id.clone(),
                        path,
                    })
                }
            };
        }

        let located = self
            .locator
            .locate(package_dir)
            .await
            .map_err(|source| ResolveError::Io {
                path: package_dir.to_path_buf(),
                source,
            })?;

        if let Some(file_name) = located {
            let path = package_dir.join(&file_name);
            tracing::debug!(%package_id, file = %file_name, "license file found");
            let text = self
                .reader
                .read_license_file(&path)
                .await
                .map_err(|source| ResolveError::Io {
                    path: path.clone(),
                    source,
                })?;
            return Ok(Some(text));
        }

        if options.replenish_default_license_texts {
            let text = self
                .cache
                .get_or_fetch(license, || self.client.fetch(license))
                .await?;
            return Ok(Some(text));
        }

        tracing::debug!(%package_id, "no license text available");
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::default_text::SpdxTextConfig;
    use std::sync::atomic::{AtomicU32, Ordering};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn foo() -> PackageId {
        PackageId::new("foo", "1.2.3")
    }

    fn resolver_for(base_url: &str) -> LicenseTextResolver {
        let client = SpdxTextClient::new(SpdxTextConfig::new(base_url)).unwrap();
        LicenseTextResolver::new(client, Arc::new(LicenseTextCache::new()))
    }

    fn offline_resolver() -> LicenseTextResolver {
        resolver_for("http://127.0.0.1:1")
    }

    /// Locator that never finds anything.
    struct NoLicenseFile;

    #[async_trait]
    impl LicenseFileLocator for NoLicenseFile {
        async fn locate(&self, _package_dir: &Path) -> std::io::Result<Option<String>> {
            Ok(None)
        }
    }

    /// Reader that counts calls and delegates to the filesystem.
    #[derive(Default)]
    struct CountingReader {
        calls: AtomicU32,
    }

    #[async_trait]
    impl LicenseFileReader for CountingReader {
        async fn read_license_file(&self, path: &Path) -> std::io::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            FsLicenseFileReader.read_license_file(path).await
        }
    }

    #[test]
    fn license_file_name_matching() {
        for name in ["LICENSE", "LICENCE", "license.md", "License-MIT.txt", "licence"] {
            assert!(DirectoryScan::is_license_file_name(name), "{name}");
        }
        for name in ["COPYING", "README.md", "my-license", "lic", "LICENS"] {
            assert!(!DirectoryScan::is_license_file_name(name), "{name}");
        }
    }

    #[tokio::test]
    async fn reads_local_license_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("LICENSE.md"), "MIT License\n").unwrap();
        std::fs::write(dir.path().join("index.js"), "").unwrap();

        let text = offline_resolver()
            .resolve_text(&foo(), "MIT", dir.path(), &LicenseOptions::default())
            .await
            .unwrap();
        assert_eq!(text.as_deref(), Some("MIT License\n"));
    }

    #[tokio::test]
    async fn non_utf8_license_file_is_decoded_lossily() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("LICENSE"), b"Copyright (c) J\xf6rg M\xfcller\n").unwrap();

        let text = offline_resolver()
            .resolve_text(&foo(), "MIT", dir.path(), &LicenseOptions::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(text, "Copyright (c) J\u{FFFD}rg M\u{FFFD}ller\n");
    }

    #[tokio::test]
    async fn non_utf8_pointer_file_is_not_reported_missing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("TERMS.txt"), b"Licen\xe7a\n").unwrap();

        let text = offline_resolver()
            .resolve_text(
                &foo(),
                "SEE LICENSE IN TERMS.txt",
                dir.path(),
                &LicenseOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(text.as_deref(), Some("Licen\u{FFFD}a\n"));
    }

    #[tokio::test]
    async fn ignores_directories_named_license() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("licenses")).unwrap();

        let text = offline_resolver()
            .resolve_text(&foo(), "MIT", dir.path(), &LicenseOptions::default())
            .await
            .unwrap();
        assert!(text.is_none());
    }

    #[tokio::test]
    async fn no_file_and_no_replenish_yields_none() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("package.json"), "{}").unwrap();

        let text = offline_resolver()
            .resolve_text(&foo(), "MIT", dir.path(), &LicenseOptions::default())
            .await
            .unwrap();
        assert!(text.is_none());
    }

    #[tokio::test]
    async fn follows_see_license_in_pointer() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("TERMS.txt"), "Custom terms").unwrap();
        std::fs::write(dir.path().join("LICENSE"), "ignored").unwrap();

        let text = offline_resolver()
            .resolve_text(
                &foo(),
                "SEE LICENSE IN TERMS.txt",
                dir.path(),
                &LicenseOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(text.as_deref(), Some("Custom terms"));
    }

    #[tokio::test]
    async fn missing_pointer_file_fails_without_fallback() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("LICENSE"), "present but not consulted").unwrap();

        let options = LicenseOptions {
            replenish_default_license_texts: true,
            ..LicenseOptions::default()
        };
        let err = offline_resolver()
            .resolve_text(&foo(), "SEE LICENSE IN missing.txt", dir.path(), &options)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Could not find file specified in package.json license field of foo@1.2.3"
        );
    }

    #[tokio::test]
    async fn custom_locator_and_reader_are_used() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("LICENSE"), "MIT License").unwrap();
        let reader = Arc::new(CountingReader::default());

        let resolver = offline_resolver().with_reader(reader.clone());
        let text = resolver
            .resolve_text(&foo(), "MIT", dir.path(), &LicenseOptions::default())
            .await
            .unwrap();
        assert_eq!(text.as_deref(), Some("MIT License"));
        assert_eq!(reader.calls.load(Ordering::SeqCst), 1);

        let resolver = resolver.with_locator(Arc::new(NoLicenseFile));
        let text = resolver
            .resolve_text(&foo(), "MIT", dir.path(), &LicenseOptions::default())
            .await
            .unwrap();
        assert!(text.is_none());
        assert_eq!(reader.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unlistable_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");

        let err = offline_resolver()
            .resolve_text(&foo(), "MIT", &missing, &LicenseOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::Io { .. }));
    }

    #[tokio::test]
    async fn replenishes_from_remote_once_per_identifier() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/MIT.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("MIT License"))
            .expect(1)
            .mount(&server)
            .await;

        let resolver = resolver_for(&server.uri()).with_locator(Arc::new(NoLicenseFile));
        let options = LicenseOptions {
            replenish_default_license_texts: true,
            ..LicenseOptions::default()
        };
        let dir = tempfile::tempdir().unwrap();

        for package in [foo(), PackageId::new("bar", "2.0.0")] {
            let text = resolver
                .resolve_text(&package, "MIT", dir.path(), &options)
                .await
                .unwrap();
            assert_eq!(text.as_deref(), Some("MIT License"));
        }
        assert_eq!(resolver.cache().len(), 1);
    }
}
