//! # Error Types — License Resolution Failures
//!
//! Every variant here is fatal to the build that produced it. Nothing in the
//! workspace catches and retries these; they propagate to the invoking build
//! process, which reports the message verbatim.
//!
//! ## Message Contract
//!
//! The `Display` output of the four license variants of [`ResolveError`] is
//! part of the public contract. Downstream tooling matches on it.

use std::path::PathBuf;

use thiserror::Error;

use crate::package::PackageId;

/// Failure while determining a package's license identifier or text.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// Neither an override nor any manifest field yielded a license.
    #[error("Could not find license info for {package_id}")]
    LicenseNotFound {
        /// Package whose manifest lacked license information.
        package_id: PackageId,
    },

    /// The caller's acceptability predicate rejected the license.
    #[error("Found unacceptable license \"{license}\" for {package_id}")]
    UnacceptableLicense {
        /// The rejected identifier.
        license: String,
        /// Package declaring it.
        package_id: PackageId,
    },

    /// The identifier is not a syntactically valid SPDX expression.
    #[error("License \"{license}\" for {package_id} is not a valid SPDX expression!")]
    InvalidSpdx {
        /// The malformed identifier.
        license: String,
        /// Package declaring it.
        package_id: PackageId,
    },

    /// A `SEE LICENSE IN <file>` pointer named a file that cannot be read.
    #[error("Could not find file specified in package.json license field of {package_id}")]
    MissingLicenseFile {
        /// Package whose pointer could not be followed.
        package_id: PackageId,
        /// The path that was attempted.
        path: PathBuf,
    },

    /// Fetching the canonical SPDX license text failed.
    #[error("failed to fetch default license text for \"{license}\": {reason}")]
    DefaultTextFetch {
        /// Identifier whose text was requested.
        license: String,
        /// Transport error or unexpected HTTP status.
        reason: String,
    },

    /// A discovered license file could not be read.
    #[error("failed to read license file {}: {source}", .path.display())]
    Io {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
}

/// Failure while loading a package's `package.json`.
#[derive(Error, Debug)]
pub enum MetaReadError {
    /// The manifest file could not be read.
    #[error("failed to read package manifest {}: {source}", .path.display())]
    Io {
        /// Path to the manifest.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The manifest is not valid JSON or does not have the expected shape.
    #[error("failed to parse package manifest {}: {source}", .path.display())]
    Parse {
        /// Path to the manifest.
        path: PathBuf,
        /// Underlying decode error.
        source: serde_json::Error,
    },
}
