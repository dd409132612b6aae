//! Registry tarball URLs.

/// The public npm registry.
pub const DEFAULT_REGISTRY: &str = "https://registry.npmjs.org";

/// Tarball URL of `name@version` on the public npm registry.
pub fn tarball_url(name: &str, version: &str) -> String {
    tarball_url_in(DEFAULT_REGISTRY, name, version)
}

/// Tarball URL of `name@version` on `registry`.
///
/// The scope is dropped from the file name only, and build metadata
/// (`+...`) is dropped from the version.
pub fn tarball_url_in(registry: &str, name: &str, version: &str) -> String {
    let registry = registry.trim_end_matches('/');
    let scopeless = match name.split_once('/') {
        Some((scope, rest)) if scope.starts_with('@') => rest,
        _ => name,
    };
    let version = version.split('+').next().unwrap_or(version);
    format!("{registry}/{name}/-/{scopeless}-{version}.tgz")
}
