//! # Package Directory Discovery
//!
//! [`PackageDirectorySet`] holds the package directories a build pulled in,
//! deduplicated and in the order they were first seen. The manifest keeps
//! that order.
//!
//! [`package_dir_for_module`] maps the path of a bundled module to the
//! directory of the package that owns it:
//!
//! ```text
//! /app/node_modules/@scope/pkg/dist/index.js   ->  /app/node_modules/@scope/pkg
//! /app/node_modules/a/node_modules/b/lib/x.js  ->  /app/node_modules/a/node_modules/b
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

const NODE_MODULES: &str = "node_modules";

/// Directory of the package that owns `module_path`, or `None` when the
/// module does not live under `node_modules`.
///
/// A leading NUL (the bundler's virtual-module marker) and a trailing query
/// string are ignored. Backslashes are treated as separators.
pub fn package_dir_for_module(module_path: &str) -> Option<PathBuf> {
    let normalized = module_path
        .strip_prefix('\0')
        .unwrap_or(module_path)
        .replace('\\', "/");

    let idx = normalized.rfind(NODE_MODULES)?;
    let (prefix, rest) = normalized.split_at(idx + NODE_MODULES.len());
    let rest = rest.split('?').next().unwrap_or_default();

    let mut segments = rest.trim_start_matches('/').split('/');
    let first = segments.next().filter(|s| !s.is_empty())?;
    let name = if first.starts_with('@') {
        let scoped = segments.next().filter(|s| !s.is_empty())?;
        format!("{first}/{scoped}")
    } else {
        first.to_string()
    };

    Some(PathBuf::from(format!("{prefix}/{name}")))
}

/// Insertion-ordered set of package directories.
#[derive(Debug, Clone, Default)]
pub struct PackageDirectorySet {
    order: Vec<PathBuf>,
    seen: HashSet<PathBuf>,
}

impl PackageDirectorySet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `dir`. Returns `false` if it was already present.
    pub fn insert(&mut self, dir: impl Into<PathBuf>) -> bool {
        let dir = dir.into();
        if self.seen.contains(&dir) {
            return false;
        }
        self.seen.insert(dir.clone());
        self.order.push(dir);
        true
    }

    /// Add the package directory owning `module_path`, if any.
    ///
    /// Returns the directory when the module maps to a package, whether or
    /// not it was new.
    pub fn insert_module_path(&mut self, module_path: &str) -> Option<PathBuf> {
        let dir = package_dir_for_module(module_path)?;
        self.insert(dir.clone());
        Some(dir)
    }

    /// Whether `dir` has been inserted.
    pub fn contains(&self, dir: &Path) -> bool {
        self.seen.contains(dir)
    }

    /// Number of distinct directories.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no directory has been inserted.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Directories in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.order.iter()
    }
}

impl<P: Into<PathBuf>> Extend<P> for PackageDirectorySet {
    fn extend<I: IntoIterator<Item = P>>(&mut self, iter: I) {
        for dir in iter {
            self.insert(dir);
        }
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for PackageDirectorySet {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<'a> IntoIterator for &'a PackageDirectorySet {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
