//! # Configuration File
//!
//! YAML configuration for `ossmeta`, with camelCase keys. Every key is
//! optional:
//!
//! ```yaml
//! licenseOverrides:
//!   "foo@1.2.3": Apache-2.0
//!   bar: MIT
//! preferredLicenses: [MIT, Apache-2.0]
//! unacceptableLicenses: [GPL-3.0-only, AGPL-3.0-only]
//! excludedPackages: [react, "left-pad@1.x"]
//! includePackages: [./node_modules/vite]
//! replenishDefaultLicenseTexts: true
//! registry: https://registry.npmjs.org
//! licenseTextBaseUrl: https://raw.githubusercontent.com/spdx/license-list-data/main/text
//! outputFilename: oss-licenses.json
//! ```
//!
//! `includePackages` entries are resolved relative to the directory of the
//! configuration file.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use ossmeta_core::{license_tokens, split_package_spec};
use ossmeta_manifest::{EmitOptions, ManifestOptions, StaticPackages};
use ossmeta_resolve::{LicenseOptions, LicenseOverrides, SpdxTextConfig};
use semver::{Version, VersionReq};
use serde::Deserialize;

use crate::resolve_path;

/// Contents of an `ossmeta` YAML configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub license_overrides: LicenseOverrides,
    #[serde(default)]
    pub preferred_licenses: Vec<String>,
    /// License ids that fail the build if any package resolves to an
    /// expression mentioning them.
    #[serde(default)]
    pub unacceptable_licenses: Vec<String>,
    /// Bare package names or `name@range` patterns.
    #[serde(default)]
    pub excluded_packages: Vec<String>,
    #[serde(default)]
    pub include_packages: Vec<PathBuf>,
    #[serde(default)]
    pub replenish_default_license_texts: bool,
    pub registry: Option<String>,
    pub license_text_base_url: Option<String>,
    pub output_filename: Option<String>,
}

/// Library options derived from a [`ConfigFile`].
#[derive(Debug, Clone)]
pub struct ToolOptions {
    pub manifest: ManifestOptions,
    pub spdx_text: SpdxTextConfig,
    pub emit: EmitOptions,
}

impl ConfigFile {
    /// Load a configuration file. Relative `includePackages` entries are
    /// rebased onto the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let mut config: ConfigFile = serde_yaml::from_str(&content)
            .with_context(|| format!("invalid YAML in {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.include_packages = config
            .include_packages
            .iter()
            .map(|dir| resolve_path(dir, base))
            .collect();

        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Convert into the options of the library crates.
    ///
    /// # Errors
    ///
    /// Fails when an `excludedPackages` entry carries an unparseable range.
    pub fn into_options(self) -> Result<ToolOptions> {
        let mut license = LicenseOptions {
            license_overrides: self.license_overrides,
            preferred_licenses: self.preferred_licenses,
            replenish_default_license_texts: self.replenish_default_license_texts,
            ..LicenseOptions::default()
        };

        if !self.unacceptable_licenses.is_empty() {
            let denied: BTreeSet<String> = self.unacceptable_licenses.into_iter().collect();
            license = license.with_unacceptable_license_test(move |expression| {
                license_tokens(expression).any(|id| denied.contains(id))
            });
        }

        let mut manifest = ManifestOptions::new(license);

        if !self.excluded_packages.is_empty() {
            let patterns = self
                .excluded_packages
                .iter()
                .map(|spec| PackagePattern::parse(spec))
                .collect::<Result<Vec<_>>>()?;
            manifest = manifest.with_excluded_package_test(move |name, version| {
                patterns.iter().any(|p| p.matches(name, version))
            });
        }

        if !self.include_packages.is_empty() {
            manifest = manifest.with_include_packages(Arc::new(StaticPackages(self.include_packages)));
        }

        if let Some(registry) = self.registry {
            manifest.registry = registry;
        }

        let spdx_text = match self.license_text_base_url {
            Some(base_url) => SpdxTextConfig::new(base_url),
            None => SpdxTextConfig::default(),
        };

        let mut emit = EmitOptions::default();
        if let Some(name) = self.output_filename {
            emit.output_filename = Some(name);
        }

        Ok(ToolOptions {
            manifest,
            spdx_text,
            emit,
        })
    }
}

/// An `excludedPackages` entry.
#[derive(Debug, Clone)]
struct PackagePattern {
    name: String,
    version: VersionPattern,
}

#[derive(Debug, Clone)]
enum VersionPattern {
    Any,
    Exact(String),
    Range(VersionReq),
}

impl PackagePattern {
    fn parse(spec: &str) -> Result<Self> {
        let (name, version) = split_package_spec(spec);
        let version = match version {
            None => VersionPattern::Any,
            Some(v) if Version::parse(v).is_ok() => VersionPattern::Exact(v.to_string()),
            Some(v) => VersionPattern::Range(
                VersionReq::parse(v)
                    .with_context(|| format!("invalid version range in excludedPackages entry '{spec}'"))?,
            ),
        };
        Ok(Self {
            name: name.to_string(),
            version,
        })
    }

    fn matches(&self, name: &str, version: &str) -> bool {
        if self.name != name {
            return false;
        }
        match &self.version {
            VersionPattern::Any => true,
            VersionPattern::Exact(v) => v == version,
            VersionPattern::Range(req) => Version::parse(version).is_ok_and(|v| req.matches(&v)),
        }
    }
}
