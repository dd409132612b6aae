//! # License Override Table
//!
//! Maps a package key to the SPDX identifier that must be used for it,
//! regardless of what the package declares.
//!
//! ## Key Forms and Precedence
//!
//! 1. Exact `name@version` (`foo@1.2.3`, `@scope/bar@1.2.3`).
//! 2. Range `name@range` (`foo@1.x`, `foo@^2.1.0`), matched with the
//!    `semver` crate against the package version. Keys are tried in
//!    lexicographic order; the first match wins.
//! 3. Bare `name` (`foo`, `@scope/bar`), any version.
//!
//! A key whose version part is itself a full version only ever matches
//! exactly: `foo@1.2.3` does not behave like the caret range `^1.2.3`.
//! A range that does not parse is logged and skipped.

use std::collections::BTreeMap;

use ossmeta_core::{split_package_spec, PackageId};
use semver::{Version, VersionReq};
use serde::{Deserialize, Serialize};

/// Caller-supplied license overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LicenseOverrides(BTreeMap<String, String>);

impl LicenseOverrides {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an override.
    pub fn insert(&mut self, key: impl Into<String>, license: impl Into<String>) {
        self.0.insert(key.into(), license.into());
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the table has no keys.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The override for `package_id`, following the key precedence above.
    ///
    /// Empty override values are treated as absent.
    pub fn lookup(&self, package_id: &PackageId) -> Option<&str> {
        self.exact(package_id)
            .or_else(|| self.range(package_id))
            .or_else(|| self.get(package_id.name()))
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(String::as_str)
            .filter(|license| !license.is_empty())
    }

    fn exact(&self, package_id: &PackageId) -> Option<&str> {
        self.get(&package_id.to_string())
    }

    fn range(&self, package_id: &PackageId) -> Option<&str> {
        let version = Version::parse(package_id.version()).ok()?;

        for (key, license) in &self.0 {
            let (name, Some(range)) = split_package_spec(key) else {
                continue;
            };
            if name != package_id.name() || license.is_empty() {
                continue;
            }
            if Version::parse(range).is_ok() {
                continue;
            }
            match VersionReq::parse(range) {
                Ok(req) if req.matches(&version) => {
                    tracing::debug!(%package_id, key = %key, "license override matched by version range");
                    return Some(license.as_str());
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(key = %key, "ignoring license override with unparseable version range: {e}");
                }
            }
        }

        None
    }
}

impl<K, V> FromIterator<(K, V)> for LicenseOverrides
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, license)| (key.into(), license.into()))
                .collect(),
        )
    }
}
