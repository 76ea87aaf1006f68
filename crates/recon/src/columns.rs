//! Identifier column resolution against the configured header variants.

use crate::config::MatchConfig;

/// Canonical form used for header comparison: lower-cased with `'.'` and
/// `' '` removed.
pub fn canonical(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| *c != '.' && *c != ' ')
        .collect()
}

/// Whether a header names the identifier column. Empty names never match.
pub fn is_identifier_column_name(name: &str, config: &MatchConfig) -> bool {
    if name.is_empty() {
        return false;
    }
    let canon = canonical(name);
    config
        .identifier_columns
        .iter()
        .any(|variant| canonical(variant) == canon)
}

/// Index of the first header matching a configured variant, scanning in file
/// order. When several headers qualify only the first is used.
pub fn find_identifier_column(headers: &[String], config: &MatchConfig) -> Option<usize> {
    headers
        .iter()
        .position(|h| is_identifier_column_name(h, config))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
