//! # ossmeta-cli — License Manifest CLI
//!
//! Provides the `ossmeta` command-line interface over the resolution and
//! assembly crates.
//!
//! ## Subcommands
//!
//! - `ossmeta generate` — resolve every package of a bundle and write the
//!   license manifest plus any derived artifacts.
//! - `ossmeta inspect` — resolve a single package directory and print its
//!   manifest entry.
//!
//! ```bash
//! ossmeta generate --modules-from dist/modules.txt --config ossmeta.yaml --out-dir dist
//! ossmeta generate node_modules/react node_modules/scheduler --notice NOTICE.txt
//! ossmeta inspect node_modules/@babel/runtime -vv
//! ```

pub mod config;
pub mod generate;
pub mod inspect;

use std::path::{Path, PathBuf};

/// Resolve a path that may be relative to `base`.
///
/// Absolute paths are returned unchanged.
pub fn resolve_path(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
