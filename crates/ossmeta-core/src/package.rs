//! # Package Manifest Types
//!
//! Decoded form of a package's own `package.json`, restricted to the fields
//! a license manifest needs. Fields that are union-typed in the wild are
//! decoded into closed enums:
//!
//! | Field | Shapes accepted |
//! |---|---|
//! | `license` | `"MIT"` or deprecated `{"type": "MIT", "url": ...}` |
//! | `licenses` | deprecated `[{"type", "url"}, ...]` or a bare string |
//! | `repository` | `"github:owner/repo"` or `{"type", "url", "directory"}` |
//! | `author` | `"Name <mail> (url)"` or `{"name", "email", "url"}` |
//!
//! JSON `null` in any optional field decodes as absent. Unknown fields are
//! ignored.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A package identified as `name@version`.
///
/// The `Display` form is the identifier used in every resolution error and
/// as the exact-match key of the license override table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageId {
    name: String,
    version: String,
}

impl PackageId {
    /// Create an identifier from its parts.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Parse `name@version`, honouring a leading scope marker.
    ///
    /// Returns `None` when the string carries no version separator.
    pub fn parse(id: &str) -> Option<Self> {
        match split_package_spec(id) {
            (name, Some(version)) => Some(Self::new(name, version)),
            (_, None) => None,
        }
    }

    /// The package name, including any `@scope/` prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The package version exactly as declared.
    pub fn version(&self) -> &str {
        &self.version
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

/// Split a package spec into its name and the part after the version
/// separator.
///
/// `foo@1.x` → `("foo", Some("1.x"))`, `@foo/bar@1.2.3` →
/// `("@foo/bar", Some("1.2.3"))`, `@foo/bar` → `("@foo/bar", None)`.
pub fn split_package_spec(spec: &str) -> (&str, Option<&str>) {
    match spec.rfind('@') {
        Some(idx) if idx > 0 => (&spec[..idx], Some(&spec[idx + 1..])),
        _ => (spec, None),
    }
}

/// Metadata read from a package's `package.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageMeta {
    /// Package name.
    pub name: String,
    /// Package version.
    pub version: String,
    /// Declared author.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    /// Source repository.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<Repository>,
    /// SPDX expression, or the deprecated object form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<DeclaredLicense>,
    /// Deprecated multi-license field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub licenses: Option<DeclaredLicenses>,
}

impl PackageMeta {
    /// Minimal metadata with no license, author, or repository.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            author: None,
            repository: None,
            license: None,
            licenses: None,
        }
    }

    /// The `name@version` identifier of this package.
    pub fn id(&self) -> PackageId {
        PackageId::new(&self.name, &self.version)
    }

    /// Repository URL: a structured `repository.url` when present and
    /// non-empty, else a plain string `repository`, else `None`.
    pub fn repository_url(&self) -> Option<&str> {
        match self.repository.as_ref()? {
            Repository::Detailed(info) => info.url.as_deref().filter(|url| !url.is_empty()),
            Repository::Url(url) => Some(url),
        }
    }
}

/// The `license` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeclaredLicense {
    /// Modern form: an SPDX expression (or a `SEE LICENSE IN` pointer).
    Expression(String),
    /// Deprecated `{type, url}` form.
    Legacy(LegacyLicense),
}

/// The deprecated `licenses` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeclaredLicenses {
    /// An array of `{type, url}` entries, in declaration order.
    List(Vec<LegacyLicense>),
    /// Malformed but common: a bare string instead of an array.
    Single(String),
}

/// A deprecated `{type, url}` license object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyLicense {
    /// License identifier.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Link to the license text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl LegacyLicense {
    /// Legacy object carrying only a type.
    pub fn of_type(kind: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            url: None,
        }
    }
}

/// The `repository` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Repository {
    /// Shorthand or URL string.
    Url(String),
    /// Structured form.
    Detailed(RepositoryInfo),
}

/// Structured `repository` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryInfo {
    /// VCS kind, usually `git`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Repository URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Subdirectory for monorepos.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
}

/// The `author` field, carried through to the manifest unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Author {
    /// `"Name <email> (url)"` shorthand.
    Name(String),
    /// Structured person object.
    Person(Person),
}

/// Structured person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Contact address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Homepage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: serde_json::Value) -> PackageMeta {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn package_id_display() {
        assert_eq!(PackageId::new("foo", "1.2.3").to_string(), "foo@1.2.3");
        assert_eq!(
            PackageId::new("@foo/bar", "1.2.3").to_string(),
            "@foo/bar@1.2.3"
        );
    }

    #[test]
    fn package_id_parse_scoped_and_unscoped() {
        let id = PackageId::parse("@foo/bar@1.2.3").unwrap();
        assert_eq!(id.name(), "@foo/bar");
        assert_eq!(id.version(), "1.2.3");

        let id = PackageId::parse("foo@1.2.3").unwrap();
        assert_eq!(id.name(), "foo");
        assert_eq!(id.version(), "1.2.3");

        assert!(PackageId::parse("foo").is_none());
        assert!(PackageId::parse("@foo/bar").is_none());
    }

    #[test]
    fn split_package_spec_variants() {
        assert_eq!(split_package_spec("foo"), ("foo", None));
        assert_eq!(split_package_spec("foo@1.x"), ("foo", Some("1.x")));
        assert_eq!(split_package_spec("@scope/x"), ("@scope/x", None));
        assert_eq!(
            split_package_spec("@scope/x@^2.0.0"),
            ("@scope/x", Some("^2.0.0"))
        );
    }

    #[test]
    fn decodes_string_license() {
        let meta = decode(json!({"name": "foo", "version": "1.2.3", "license": "MIT"}));
        assert_eq!(meta.license, Some(DeclaredLicense::Expression("MIT".into())));
        assert!(meta.licenses.is_none());
    }

    #[test]
    fn decodes_legacy_object_license() {
        let meta = decode(json!({
            "name": "foo",
            "version": "1.2.3",
            "license": {"type": "MIT", "url": "https://www.opensource.org/licenses/mit-license.php"}
        }));
        match meta.license {
            Some(DeclaredLicense::Legacy(legacy)) => {
                assert_eq!(legacy.kind.as_deref(), Some("MIT"));
                assert!(legacy.url.is_some());
            }
            other => panic!("expected legacy license, got {other:?}"),
        }
    }

    #[test]
    fn decodes_licenses_array_and_string() {
        let meta = decode(json!({
            "name": "foo",
            "version": "1.2.3",
            "licenses": [{"type": "MIT"}, {"type": "Apache-2.0", "url": "x"}]
        }));
        assert_eq!(
            meta.licenses,
            Some(DeclaredLicenses::List(vec![
                LegacyLicense::of_type("MIT"),
                LegacyLicense {
                    kind: Some("Apache-2.0".into()),
                    url: Some("x".into()),
                },
            ]))
        );

        let meta = decode(json!({"name": "foo", "version": "1.2.3", "licenses": "MIT"}));
        assert_eq!(meta.licenses, Some(DeclaredLicenses::Single("MIT".into())));
    }

    #[test]
    fn null_fields_decode_as_absent() {
        let meta = decode(json!({
            "name": "foo",
            "version": "1.2.3",
            "license": null,
            "repository": null,
            "author": null
        }));
        assert!(meta.license.is_none());
        assert!(meta.repository.is_none());
        assert!(meta.author.is_none());
    }

    #[test]
    fn ignores_unknown_fields() {
        let meta = decode(json!({
            "name": "foo",
            "version": "1.2.3",
            "main": "index.js",
            "dependencies": {"bar": "^1.0.0"}
        }));
        assert_eq!(meta, PackageMeta::new("foo", "1.2.3"));
    }

    #[test]
    fn missing_name_is_rejected() {
        let result: Result<PackageMeta, _> = serde_json::from_value(json!({"version": "1.0.0"}));
        assert!(result.is_err());
    }

    #[test]
    fn repository_url_prefers_structured_url() {
        let meta = decode(json!({
            "name": "react",
            "version": "18.2.0",
            "repository": {"type": "git", "url": "https://github.com/facebook/react.git", "directory": "packages/react"}
        }));
        assert_eq!(
            meta.repository_url(),
            Some("https://github.com/facebook/react.git")
        );
    }

    #[test]
    fn repository_url_accepts_plain_string() {
        let meta = decode(json!({"name": "a", "version": "1.0.0", "repository": "github:a/b"}));
        assert_eq!(meta.repository_url(), Some("github:a/b"));
    }

    #[test]
    fn repository_url_none_for_structured_without_url() {
        let meta = decode(json!({"name": "a", "version": "1.0.0", "repository": {"type": "git"}}));
        assert_eq!(meta.repository_url(), None);
        assert_eq!(PackageMeta::new("a", "1.0.0").repository_url(), None);
    }

    #[test]
    fn author_round_trips_both_shapes() {
        let meta = decode(json!({"name": "a", "version": "1.0.0", "author": "Jane <jane@example.com>"}));
        assert_eq!(meta.author, Some(Author::Name("Jane <jane@example.com>".into())));

        let meta = decode(json!({"name": "a", "version": "1.0.0", "author": {"name": "Jane"}}));
        let value = serde_json::to_value(&meta.author).unwrap();
        assert_eq!(value, json!({"name": "Jane"}));
    }
}
