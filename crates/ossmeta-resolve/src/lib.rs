//! # ossmeta-resolve — License Resolution Engine
//!
//! Turns a package's declared metadata into one validated SPDX identifier,
//! and a package directory into the text of that license.
//!
//! - **Overrides** (`overrides.rs`): the caller's `name@version`,
//!   `name@range`, and bare `name` override table.
//!
//! - **Identifier resolution** (`identifier.rs`): override first, then the
//!   `license` field in both of its shapes, then the deprecated `licenses`
//!   field with preferred-license tie-breaking. Every result is checked
//!   against the caller's acceptability predicate and SPDX syntax.
//!
//! - **Text resolution** (`text.rs`): `SEE LICENSE IN <file>` pointers, an
//!   on-disk `LICENSE`/`LICENCE` scan, and an optional remote fallback.
//!
//! - **Default texts** (`default_text.rs`): HTTP client for the SPDX
//!   license-list text files and a single-flight cache keyed by identifier.
//!
//! ## Strategy Seams
//!
//! Identifier resolution, license file discovery, and license file reading
//! are traits with default implementations. Callers needing test doubles or
//! alternate policies supply their own; a custom strategy that only wants to
//! adjust the default behaviour wraps the default type and delegates to it.
//!
//! ## Crate Policy
//!
//! - Depends only on `ossmeta-core` internally.
//! - Every failure is fatal and returned as `ossmeta_core::ResolveError`.

pub mod default_text;
pub mod identifier;
pub mod options;
pub mod overrides;
pub mod text;

pub use default_text::{
    LicenseTextCache, SpdxTextClient, SpdxTextConfig, DEFAULT_LICENSE_TEXT_BASE_URL,
};
pub use identifier::{resolve_identifier, DeclaredLicenseResolver, IdentifierResolver};
pub use options::{LicenseOptions, LicensePredicate};
pub use overrides::LicenseOverrides;
pub use text::{
    DirectoryScan, FsLicenseFileReader, LicenseFileLocator, LicenseFileReader,
    LicenseTextResolver,
};
