//! # ossmeta-core — Foundational Types for License Manifests
//!
//! This crate defines the vocabulary shared by every other crate in the
//! workspace: what a package manifest looks like once decoded, how a package
//! is identified, what a license manifest entry contains, and which errors
//! abort a build. It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Closed variants for union-typed manifest fields.** `license` may be a
//!    string or a legacy `{type, url}` object; `licenses` may be an array or
//!    (in malformed manifests) a bare string. Both are decoded once into
//!    enums at the reading boundary so resolution logic matches exhaustively.
//!
//! 2. **`PackageId` newtype.** Every error message names a package as
//!    `name@version`. Scoped names (`@scope/name`) are split on the last `@`
//!    that is not the scope marker.
//!
//! 3. **Exact error wording.** `ResolveError` messages are consumed verbatim
//!    by build tooling and must not change.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `ossmeta-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod entry;
pub mod error;
pub mod expression;
pub mod package;

// Re-export primary types for ergonomic imports.
pub use entry::LicenseManifestEntry;
pub use error::{MetaReadError, ResolveError};
pub use expression::{
    is_valid_expression, license_file_pointer, license_tokens, SEE_LICENSE_IN_PREFIX,
};
pub use package::{
    split_package_spec, Author, DeclaredLicense, DeclaredLicenses, LegacyLicense, PackageId,
    PackageMeta, Person, Repository, RepositoryInfo,
};
