//! # SPDX Expression Checks
//!
//! Syntactic validation of license expressions plus the two string
//! conventions the resolvers rely on: the `SEE LICENSE IN <file>` pointer and
//! splitting an expression into its license identifiers.
//!
//! Validation delegates to the `spdx` crate's strict parser, relaxed only to
//! accept the `+` suffix on GNU licenses (`GPL-2.0+`, `LGPL-2.1+`), which npm
//! manifests use widely. Identifiers must come from the SPDX license list or
//! use the `LicenseRef-` form; operators are `AND`, `OR`, `WITH`, and
//! parentheses. Normalization is out of scope: an expression that parses is
//! returned to the caller exactly as written.

use ::spdx::{Expression, ParseMode};

/// Prefix of the pointer form `SEE LICENSE IN <file>`.
pub const SEE_LICENSE_IN_PREFIX: &str = "SEE LICENSE IN ";

/// Whether `expression` parses as a valid SPDX license expression.
pub fn is_valid_expression(expression: &str) -> bool {
    const MODE: ParseMode = ParseMode {
        allow_postfix_plus_on_gpl: true,
        ..ParseMode::STRICT
    };
    Expression::parse_mode(expression, MODE).is_ok()
}

/// The file named by a `SEE LICENSE IN <file>` pointer.
///
/// The file name is the fourth space-separated token; anything after it is
/// ignored. Returns `None` if `license` is not a pointer.
pub fn license_file_pointer(license: &str) -> Option<&str> {
    if !license.starts_with(SEE_LICENSE_IN_PREFIX) {
        return None;
    }
    Some(license.split(' ').nth(3).unwrap_or(""))
}

/// License identifiers referenced by an expression, operators and
/// parentheses removed, `+` suffixes stripped.
///
/// `(MIT OR GPL-2.0+) AND Apache-2.0 WITH LLVM-exception` yields `MIT`,
/// `GPL-2.0`, `Apache-2.0`, `LLVM-exception`.
pub fn license_tokens(expression: &str) -> impl Iterator<Item = &str> {
    expression
        .split(|c: char| c.is_whitespace() || c == '(' || c == ')')
        .filter(|token| !token.is_empty())
        .filter(|token| !matches!(*token, "AND" | "OR" | "WITH"))
        .map(|token| token.trim_end_matches('+'))
}
