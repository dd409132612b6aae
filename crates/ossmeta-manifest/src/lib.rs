//! # ossmeta-manifest — License Manifest Assembly
//!
//! Orchestrates the resolvers of `ossmeta-resolve` over every package a
//! build included and hands the result to the emitter.
//!
//! ## Modules
//!
//! - `reader` — loads `package.json` from a package directory.
//! - `dirs` — the deduplicated, insertion-ordered set of package directories,
//!   and the mapping from a bundled module path to its package directory.
//! - `source` — registry tarball URLs.
//! - `assemble` — per-package resolution in discovery order, fail-fast.
//! - `emit` — JSON manifest and derived artifacts.
//!
//! ## Ordering
//!
//! Manifest entries follow the insertion order of the directory set. Nothing
//! here sorts. Consumers may rely on discovery order being preserved.
//!
//! ## Failure Model
//!
//! The first failure of any package aborts assembly. There is no partial
//! manifest.

pub mod assemble;
pub mod dirs;
pub mod emit;
pub mod error;
pub mod options;
pub mod reader;
pub mod source;

pub use assemble::ManifestAssembler;
pub use dirs::{package_dir_for_module, PackageDirectorySet};
pub use emit::{
    render_artifacts, render_json, write_artifacts, Artifact, ArtifactRenderer, EmitOptions,
    NoticeRenderer, DEFAULT_OUTPUT_FILENAME,
};
pub use error::{EmitError, ManifestError};
pub use options::{ManifestOptions, PackagePredicate, PackageProvider, StaticPackages};
pub use reader::{FsPackageMetaReader, PackageMetaReader, PatchedMetaReader, PACKAGE_MANIFEST};
pub use source::{tarball_url, tarball_url_in, DEFAULT_REGISTRY};
