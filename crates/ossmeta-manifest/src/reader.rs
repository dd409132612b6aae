//! # Package Metadata Reader
//!
//! Loads a package's `package.json`. A missing or malformed manifest is
//! fatal. Nothing is cached; each package is visited once per build.
//!
//! Callers that need synthetic or adjusted metadata supply their own
//! [`PackageMetaReader`]. [`PatchedMetaReader`] covers the common case of
//! delegating to the default reader and then editing, or replacing, what it
//! returned.

use std::path::Path;

use async_trait::async_trait;
use ossmeta_core::{MetaReadError, PackageMeta};

/// File name of the package-level manifest.
pub const PACKAGE_MANIFEST: &str = "package.json";

/// Reads package metadata from a package directory.
#[async_trait]
pub trait PackageMetaReader: Send + Sync {
    /// Metadata of the package rooted at `package_dir`.
    async fn read_meta(&self, package_dir: &Path) -> Result<PackageMeta, MetaReadError>;
}

/// Default reader: `<package_dir>/package.json` decoded with `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsPackageMetaReader;

#[async_trait]
impl PackageMetaReader for FsPackageMetaReader {
    async fn read_meta(&self, package_dir: &Path) -> Result<PackageMeta, MetaReadError> {
        let path = package_dir.join(PACKAGE_MANIFEST);

        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(source) => return Err(MetaReadError::Io { path, source }),
        };

        serde_json::from_str(&contents).map_err(|source| MetaReadError::Parse { path, source })
    }
}

/// Wraps another reader and rewrites what it returns.
///
/// The patch closure receives the package directory and the inner reader's
/// result, error included. It can adjust one package and pass every other
/// through, or substitute metadata for a directory the inner reader could
/// not load (no `package.json`, say).
pub struct PatchedMetaReader<R, F> {
    inner: R,
    patch: F,
}

impl<R, F> PatchedMetaReader<R, F>
where
    R: PackageMetaReader,
    F: Fn(&Path, Result<PackageMeta, MetaReadError>) -> Result<PackageMeta, MetaReadError>
        + Send
        + Sync,
{
    /// Delegate to `inner`, then apply `patch`.
    pub fn new(inner: R, patch: F) -> Self {
        Self { inner, patch }
    }
}

#[async_trait]
impl<R, F> PackageMetaReader for PatchedMetaReader<R, F>
where
    R: PackageMetaReader,
    F: Fn(&Path, Result<PackageMeta, MetaReadError>) -> Result<PackageMeta, MetaReadError>
        + Send
        + Sync,
{
    async fn read_meta(&self, package_dir: &Path) -> Result<PackageMeta, MetaReadError> {
        let result = self.inner.read_meta(package_dir).await;
        (self.patch)(package_dir, result)
    }
}
