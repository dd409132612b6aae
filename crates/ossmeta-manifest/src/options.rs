//! # Manifest Options
//!
//! Build-scoped configuration of the assembler: the resolver options, the
//! package filters, and the strategy objects that callers may replace.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use ossmeta_resolve::{DeclaredLicenseResolver, IdentifierResolver, LicenseOptions};

use crate::error::ManifestError;
use crate::reader::{FsPackageMetaReader, PackageMetaReader};
use crate::source::DEFAULT_REGISTRY;

/// Predicate over `(name, version)`. Returns `true` to leave the package
/// out of the manifest.
pub type PackagePredicate = Arc<dyn Fn(&str, &str) -> bool + Send + Sync>;

/// Supplies package directories that must appear in the manifest even if the
/// bundler did not report them.
#[async_trait]
pub trait PackageProvider: Send + Sync {
    /// Directories to add to the discovered set.
    async fn package_dirs(&self) -> Result<Vec<PathBuf>, ManifestError>;
}

/// A fixed list of package directories.
#[derive(Debug, Clone, Default)]
pub struct StaticPackages(pub Vec<PathBuf>);

#[async_trait]
impl PackageProvider for StaticPackages {
    async fn package_dirs(&self) -> Result<Vec<PathBuf>, ManifestError> {
        Ok(self.0.clone())
    }
}

/// Options for [`ManifestAssembler`](crate::ManifestAssembler).
#[derive(Clone)]
pub struct ManifestOptions {
    /// Options passed to identifier and text resolution.
    pub license: LicenseOptions,
    /// Packages to leave out.
    pub excluded_package_test: Option<PackagePredicate>,
    /// Extra packages to include.
    pub include_packages: Option<Arc<dyn PackageProvider>>,
    /// Registry used for `source` URLs.
    pub registry: String,
    /// Loads `package.json`; replace to adjust or synthesize metadata.
    pub meta_reader: Arc<dyn PackageMetaReader>,
    /// Chooses and validates each package's license identifier.
    pub identifier_resolver: Arc<dyn IdentifierResolver>,
}

impl ManifestOptions {
    /// Defaults around the given resolver options.
    pub fn new(license: LicenseOptions) -> Self {
        Self {
            license,
            excluded_package_test: None,
            include_packages: None,
            registry: DEFAULT_REGISTRY.to_string(),
            meta_reader: Arc::new(FsPackageMetaReader),
            identifier_resolver: Arc::new(DeclaredLicenseResolver),
        }
    }

    /// Install an exclusion predicate.
    pub fn with_excluded_package_test<F>(mut self, test: F) -> Self
    where
        F: Fn(&str, &str) -> bool + Send + Sync + 'static,
    {
        self.excluded_package_test = Some(Arc::new(test));
        self
    }

    /// Add the directories of `provider` to every assembly.
    pub fn with_include_packages(mut self, provider: Arc<dyn PackageProvider>) -> Self {
        self.include_packages = Some(provider);
        self
    }

    /// Replace the package metadata reader.
    pub fn with_meta_reader(mut self, reader: Arc<dyn PackageMetaReader>) -> Self {
        self.meta_reader = reader;
        self
    }

    /// Replace the identifier resolution policy.
    pub fn with_identifier_resolver(mut self, resolver: Arc<dyn IdentifierResolver>) -> Self {
        self.identifier_resolver = resolver;
        self
    }

    /// Whether the exclusion predicate drops `name@version`.
    pub fn is_excluded(&self, name: &str, version: &str) -> bool {
        self.excluded_package_test
            .as_ref()
            .is_some_and(|test| test(name, version))
    }
}

impl Default for ManifestOptions {
    fn default() -> Self {
        Self::new(LicenseOptions::default())
    }
}

impl fmt::Debug for ManifestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManifestOptions")
            .field("license", &self.license)
            .field(
                "excluded_package_test",
                &self.excluded_package_test.as_ref().map(|_| "<fn>"),
            )
            .field("include_packages", &self.include_packages.is_some())
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
