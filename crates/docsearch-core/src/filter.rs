//! Query filter expression builder.
//!
//! Turns category include/exclude selections and ad-hoc key/value pairs into a
//! single OData-style filter string understood by the search backend:
//!
//! ```text
//! category/any(c: search.in(c, 'a,b', ',')) and not category/any(c: search.in(c, 'x', ',')) and author eq 'O''Brien'
//! ```
//!
//! The builder is total: every input produces an expression, quotes in
//! literals are escaped rather than rejected, field names are reduced to
//! field-path characters, and no clauses yields the empty string.

use crate::types::FilterPair;

/// Conjunction used between clauses.
const AND: &str = " and ";

/// Double every single quote so the value stays a valid string literal.
pub fn escape_literal(value: &str) -> String {
    value.replace('\'', "''")
}

/// Reduce a field name to the characters a field path may contain
/// (alphanumerics, `_` and the `/` sub-field separator).
pub fn sanitize_field(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '/')
        .collect()
}

/// Build the filter expression.
///
/// Clause order is fixed: include, exclude, then `pairs` in the given order.
/// A pair whose key has no usable characters left is skipped.
pub fn build_filter(include_category: &str, exclude_category: &str, pairs: &[FilterPair]) -> String {
    let mut clauses: Vec<String> = Vec::with_capacity(pairs.len() + 2);

    if !include_category.is_empty() {
        clauses.push(format!(
            "category/any(c: search.in(c, '{}', ','))",
            escape_literal(include_category)
        ));
    }

    if !exclude_category.is_empty() {
        clauses.push(format!(
            "not category/any(c: search.in(c, '{}', ','))",
            escape_literal(exclude_category)
        ));
    }

    for pair in pairs {
        let field = sanitize_field(&pair.key);
        if field.is_empty() {
            tracing::debug!(key = %pair.key, "Skipping filter pair without a usable field name");
            continue;
        }
        clauses.push(format!("{} eq '{}'", field, escape_literal(&pair.value)));
    }

    clauses.join(AND)
}
