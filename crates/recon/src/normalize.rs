//! Identifier normalization and length validation.
//!
//! A normalized identifier contains only ASCII digits and `'X'` (the ISBN-10
//! check character). Validity is length-based only; no checksum is verified.

use crate::config::MatchConfig;

/// Strip a raw cell value down to its identifier characters: trim, ASCII
/// uppercase, drop everything outside `[0-9X]`.
pub fn normalize(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter_map(|c| {
            let up = c.to_ascii_uppercase();
            (up.is_ascii_digit() || up == 'X').then_some(up)
        })
        .collect()
}

/// `normalize` over an optional cell; a missing cell normalizes to `""`.
pub fn normalize_opt(raw: Option<&str>) -> String {
    raw.map(normalize).unwrap_or_default()
}

/// Length-based validity. `""` is never valid (min length is at least 1).
pub fn is_valid(normalized: &str, config: &MatchConfig) -> bool {
    (config.min_identifier_len..=config.max_identifier_len).contains(&normalized.len())
}

/// Bulk form of `normalize_opt` over a whole column. Must agree with the
/// scalar form element-wise.
pub fn normalize_column(values: &[Option<String>]) -> Vec<String> {
    values.iter().map(|v| normalize_opt(v.as_deref())).collect()
}

/// Bulk form of `is_valid` over a whole column.
pub fn validate_column(normalized: &[String], config: &MatchConfig) -> Vec<bool> {
    normalized.iter().map(|n| is_valid(n, config)).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
