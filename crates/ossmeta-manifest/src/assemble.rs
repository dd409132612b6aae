//! # Manifest Assembly
//!
//! Runs the metadata reader and both resolvers over every package directory
//! of a build, one package at a time, in discovery order.
//!
//! ## Per-package Pipeline
//!
//! 1. Read `package.json`.
//! 2. Skip the package if the exclusion predicate matches.
//! 3. Resolve the license identifier.
//! 4. Resolve the license text.
//! 5. Derive the repository URL and the registry tarball URL.
//!
//! Any error stops the build. Directories added by the include-packages
//! provider are merged into the discovered set before processing, so a
//! package reported by both sources appears once.

use std::path::Path;

use ossmeta_core::LicenseManifestEntry;
use ossmeta_resolve::LicenseTextResolver;

use crate::dirs::PackageDirectorySet;
use crate::error::ManifestError;
use crate::options::ManifestOptions;
use crate::source::tarball_url_in;

/// Assembles the license manifest of one build.
#[derive(Clone)]
pub struct ManifestAssembler {
    options: ManifestOptions,
    text_resolver: LicenseTextResolver,
}

impl ManifestAssembler {
    /// Assembler over `options`, resolving texts with `text_resolver`.
    pub fn new(options: ManifestOptions, text_resolver: LicenseTextResolver) -> Self {
        Self {
            options,
            text_resolver,
        }
    }

    /// Options this assembler was built with.
    pub fn options(&self) -> &ManifestOptions {
        &self.options
    }

    /// The text resolver, and through it the shared default-text cache.
    pub fn text_resolver(&self) -> &LicenseTextResolver {
        &self.text_resolver
    }

    /// Build one entry per non-excluded package in `dirs` plus any
    /// include-packages directories, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns the first failure of any package, or of the include-packages
    /// provider. No partial manifest is produced.
    pub async fn assemble(
        &self,
        mut dirs: PackageDirectorySet,
    ) -> Result<Vec<LicenseManifestEntry>, ManifestError> {
        if let Some(provider) = &self.options.include_packages {
            let extra = provider.package_dirs().await?;
            tracing::debug!(count = extra.len(), "include-packages directories added");
            dirs.extend(extra);
        }

        let mut entries = Vec::with_capacity(dirs.len());
        let mut excluded = 0usize;

        for dir in &dirs {
            match self.assemble_package(dir).await? {
                Some(entry) => entries.push(entry),
                None => excluded += 1,
            }
        }

        tracing::info!(
            packages = entries.len(),
            excluded,
            "license manifest assembled"
        );
        Ok(entries)
    }

    /// Build the entry of a single package directory. Returns `Ok(None)`
    /// when the exclusion predicate drops it.
    pub async fn assemble_package(
        &self,
        package_dir: &Path,
    ) -> Result<Option<LicenseManifestEntry>, ManifestError> {
        let meta = self.options.meta_reader.read_meta(package_dir).await?;
        tracing::debug!(dir = %package_dir.display(), name = %meta.name, version = %meta.version, "package metadata read");

        if self.options.is_excluded(&meta.name, &meta.version) {
            tracing::debug!(name = %meta.name, version = %meta.version, "package excluded");
            return Ok(None);
        }

        let package_id = meta.id();
        let license = self.options.identifier_resolver.resolve_identifier(
            &package_id,
            &meta,
            &self.options.license,
        )?;

        let license_text = self
            .text_resolver
            .resolve_text(&package_id, &license, package_dir, &self.options.license)
            .await?;

        let repository = meta.repository_url().map(str::to_string);
        let source = tarball_url_in(&self.options.registry, &meta.name, &meta.version);

        Ok(Some(LicenseManifestEntry {
            name: meta.name,
            version: meta.version,
            author: meta.author,
            repository,
            source,
            license,
            license_text,
        }))
    }
}
