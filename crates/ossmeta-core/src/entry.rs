//! # License Manifest Entry
//!
//! One record of the license manifest a build emits. The JSON shape is
//! consumed by downstream tooling:
//!
//! ```json
//! {
//!   "name": "react",
//!   "version": "18.2.0",
//!   "author": "...",
//!   "repository": "https://github.com/facebook/react.git",
//!   "source": "https://registry.npmjs.org/react/-/react-18.2.0.tgz",
//!   "license": "MIT",
//!   "licenseText": "MIT License ..."
//! }
//! ```
//!
//! `author` is omitted when the package declares none; `repository` and
//! `licenseText` are always present and may be `null`.

use serde::{Deserialize, Serialize};

use crate::package::Author;

/// Resolved license metadata for one package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseManifestEntry {
    /// Package name.
    pub name: String,
    /// Package version.
    pub version: String,
    /// Author, carried through from the package manifest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    /// Repository URL, if declared.
    pub repository: Option<String>,
    /// Registry tarball URL.
    pub source: String,
    /// Validated SPDX expression.
    pub license: String,
    /// Full license text, if any was found.
    pub license_text: Option<String>,
}
