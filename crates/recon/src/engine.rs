//! Pure pipeline steps: worklist construction, deduplication, membership
//! filtering. File loading and output writing live in `bibmatch-io`.

use std::collections::HashSet;

use crate::columns::find_identifier_column;
use crate::config::MatchConfig;
use crate::error::ReconError;
use crate::model::{Mode, Table};
use crate::normalize::{is_valid, normalize_opt};

/// An aggregated worklist with one normalized identifier per surviving row.
///
/// The identifiers ride alongside the table instead of inside it, so they can
/// never leak into the written output.
#[derive(Debug, Clone)]
pub struct Worklist {
    pub table: Table,
    pub identifiers: Vec<String>,
}

/// Resolve the identifier column on the aggregated table, normalize every
/// row's identifier and drop rows that fail the validity check.
///
/// `source` names the worklist file for error reporting.
pub fn build_worklist(
    table: Table,
    source: &str,
    config: &MatchConfig,
) -> Result<Worklist, ReconError> {
    let col = find_identifier_column(&table.columns, config).ok_or_else(|| {
        ReconError::NoIdentifierColumn {
            file: source.to_string(),
        }
    })?;

    let identifiers: Vec<String> = table
        .rows
        .iter()
        .map(|row| normalize_opt(row.get(col).and_then(|c| c.as_deref())))
        .collect();
    let keep: Vec<bool> = identifiers.iter().map(|id| is_valid(id, config)).collect();

    let mut table = table;
    table.retain_rows(&keep);
    let identifiers: Vec<String> = identifiers
        .into_iter()
        .zip(&keep)
        .filter_map(|(id, &kept)| kept.then_some(id))
        .collect();

    if identifiers.is_empty() {
        return Err(ReconError::NoValidIdentifiers);
    }
    Ok(Worklist { table, identifiers })
}

/// Drop rows repeating an identifier seen earlier; the first occurrence in
/// row order survives. Returns how many rows were removed.
pub fn dedup_first(worklist: &mut Worklist) -> usize {
    let mut seen = HashSet::with_capacity(worklist.identifiers.len());
    let keep: Vec<bool> = worklist
        .identifiers
        .iter()
        .map(|id| seen.insert(id.clone()))
        .collect();
    let removed = keep.iter().filter(|kept| !**kept).count();
    if removed > 0 {
        worklist.table.retain_rows(&keep);
        let identifiers = std::mem::take(&mut worklist.identifiers);
        worklist.identifiers = identifiers
            .into_iter()
            .zip(&keep)
            .filter_map(|(id, &kept)| kept.then_some(id))
            .collect();
    }
    removed
}

/// The distinct identifiers of a deduplicated worklist.
pub fn reference_set(worklist: &Worklist) -> HashSet<String> {
    worklist.identifiers.iter().cloned().collect()
}

/// Apply the run mode against the found set, consuming the worklist.
///
/// Match mode fails with `NoMatches` when nothing was found at all; non-match
/// mode fails with `AllMatched` when no row survives.
pub fn filter_by_mode(
    worklist: Worklist,
    found: &HashSet<String>,
    mode: Mode,
) -> Result<Table, ReconError> {
    let Worklist {
        mut table,
        identifiers,
    } = worklist;
    match mode {
        Mode::Match => {
            if found.is_empty() {
                return Err(ReconError::NoMatches);
            }
            let keep: Vec<bool> = identifiers.iter().map(|id| found.contains(id)).collect();
            table.retain_rows(&keep);
        }
        Mode::NonMatch => {
            let keep: Vec<bool> = identifiers.iter().map(|id| !found.contains(id)).collect();
            table.retain_rows(&keep);
            if table.rows.is_empty() {
                return Err(ReconError::AllMatched);
            }
        }
    }
    Ok(table)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
