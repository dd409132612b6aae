//! # License Identifier Resolution
//!
//! Determines the one SPDX identifier that describes a package.
//!
//! ## Priority
//!
//! First match wins:
//!
//! 1. An entry in the override table.
//! 2. Deprecated object-form `license`: its `type`.
//! 3. Non-empty string `license`.
//! 4. Non-empty deprecated `licenses` array: the first of the caller's
//!    preferred licenses that appears anywhere in the array, else the first
//!    array entry.
//! 5. Deprecated `licenses` given as a bare string.
//!
//! ## Post-checks
//!
//! The chosen identifier, overrides included, is rejected if the caller's
//! acceptability predicate matches it, and otherwise if it is not a valid
//! SPDX expression. A misconfigured override therefore fails the build
//! instead of reaching the manifest.

use ossmeta_core::{
    is_valid_expression, DeclaredLicense, DeclaredLicenses, LegacyLicense, PackageId,
    PackageMeta, ResolveError,
};

use crate::options::LicenseOptions;

/// Where a candidate identifier came from. Logged at `debug` level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LicenseOrigin {
    /// The caller's override table.
    Override,
    /// `license: {"type": ...}`.
    LegacyObject,
    /// `license: "..."`.
    Expression,
    /// `licenses: [...]`, chosen by preference or position.
    LicensesArray,
    /// `licenses: "..."`.
    LicensesString,
}

/// Strategy for turning package metadata into a validated identifier.
///
/// Implementations that only want to adjust the default policy can hold a
/// [`DeclaredLicenseResolver`] and delegate to it.
pub trait IdentifierResolver: Send + Sync {
    /// Resolve the identifier for `package_id`.
    fn resolve_identifier(
        &self,
        package_id: &PackageId,
        meta: &PackageMeta,
        options: &LicenseOptions,
    ) -> Result<String, ResolveError>;
}

/// The default identifier resolution policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredLicenseResolver;

impl IdentifierResolver for DeclaredLicenseResolver {
    fn resolve_identifier(
        &self,
        package_id: &PackageId,
        meta: &PackageMeta,
        options: &LicenseOptions,
    ) -> Result<String, ResolveError> {
        resolve_identifier(package_id, meta, options)
    }
}

/// Resolve and validate the license identifier of one package.
///
/// # Errors
///
/// - [`ResolveError::LicenseNotFound`] when no source yields an identifier.
/// - [`ResolveError::UnacceptableLicense`] when the predicate rejects it.
/// - [`ResolveError::InvalidSpdx`] when it is not a valid SPDX expression.
pub fn resolve_identifier(
    package_id: &PackageId,
    meta: &PackageMeta,
    options: &LicenseOptions,
) -> Result<String, ResolveError> {
    let candidate = options
        .license_overrides
        .lookup(package_id)
        .map(|license| (license, LicenseOrigin::Override))
        .or_else(|| declared_license(meta, &options.preferred_licenses));

    let (license, origin) = match candidate {
        Some((license, origin)) if !license.is_empty() => (license, origin),
        _ => {
            return Err(ResolveError::LicenseNotFound {
                package_id: package_id.clone(),
            })
        }
    };

    tracing::debug!(%package_id, license, ?origin, "license identifier determined");

    if options.is_unacceptable(license) {
        return Err(ResolveError::UnacceptableLicense {
            license: license.to_string(),
            package_id: package_id.clone(),
        });
    }

    if !is_valid_expression(license) {
        return Err(ResolveError::InvalidSpdx {
            license: license.to_string(),
            package_id: package_id.clone(),
        });
    }

    Ok(license.to_string())
}

/// The identifier declared by the manifest itself, ignoring overrides.
///
/// An object-form `license` is authoritative even when it lacks a `type`;
/// resolution then fails rather than consulting `licenses`.
fn declared_license<'a>(
    meta: &'a PackageMeta,
    preferred_licenses: &[String],
) -> Option<(&'a str, LicenseOrigin)> {
    match &meta.license {
        Some(DeclaredLicense::Legacy(legacy)) => {
            return legacy
                .kind
                .as_deref()
                .map(|kind| (kind, LicenseOrigin::LegacyObject));
        }
        Some(DeclaredLicense::Expression(expr)) if !expr.is_empty() => {
            return Some((expr.as_str(), LicenseOrigin::Expression));
        }
        _ => {}
    }

    match &meta.licenses {
        Some(DeclaredLicenses::List(list)) if !list.is_empty() => {
            preferred_or_first(list, preferred_licenses)
                .map(|kind| (kind, LicenseOrigin::LicensesArray))
        }
        Some(DeclaredLicenses::Single(license)) => {
            Some((license.as_str(), LicenseOrigin::LicensesString))
        }
        _ => None,
    }
}

fn preferred_or_first<'a>(list: &'a [LegacyLicense], preferred: &[String]) -> Option<&'a str> {
    let preferred_match = preferred.iter().find_map(|want| {
        list.iter()
            .filter_map(|entry| entry.kind.as_deref())
            .find(|kind| *kind == want.as_str())
    });

    preferred_match.or_else(|| list.first().and_then(|entry| entry.kind.as_deref()))
}
