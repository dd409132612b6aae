//! # Resolution Options
//!
//! The subset of build configuration the resolvers consult.

use std::fmt;
use std::sync::Arc;

use crate::overrides::LicenseOverrides;

/// Predicate over an SPDX identifier. Returns `true` to reject it.
pub type LicensePredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Options consulted by identifier and text resolution.
#[derive(Clone, Default)]
pub struct LicenseOptions {
    /// Identifiers forced for matching packages.
    pub license_overrides: LicenseOverrides,
    /// Rejects identifiers the build must not ship.
    pub unacceptable_license_test: Option<LicensePredicate>,
    /// Tie-break order for the deprecated `licenses` array.
    pub preferred_licenses: Vec<String>,
    /// Fetch canonical SPDX text when a package ships no license file.
    pub replenish_default_license_texts: bool,
}

impl LicenseOptions {
    /// Install an acceptability predicate.
    pub fn with_unacceptable_license_test<F>(mut self, test: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.unacceptable_license_test = Some(Arc::new(test));
        self
    }

    /// Whether the acceptability predicate rejects `license`.
    pub fn is_unacceptable(&self, license: &str) -> bool {
        self.unacceptable_license_test
            .as_ref()
            .is_some_and(|test| test(license))
    }
}

impl fmt::Debug for LicenseOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LicenseOptions")
            .field("license_overrides", &self.license_overrides)
            .field(
                "unacceptable_license_test",
                &self.unacceptable_license_test.as_ref().map(|_| "<fn>"),
            )
            .field("preferred_licenses", &self.preferred_licenses)
            .field(
                "replenish_default_license_texts",
                &self.replenish_default_license_texts,
            )
            .finish()
    }
}
