//! Workbook import: multi-sheet worklist aggregation and the column-pruned
//! identifier scan.

use std::collections::HashSet;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};

use bibmatch_recon::columns::find_identifier_column;
use bibmatch_recon::config::MatchConfig;
use bibmatch_recon::normalize::{normalize_column, validate_column};
use bibmatch_recon::{ReconError, Table};

/// File name for error and log messages.
pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn open(path: &Path) -> Result<Sheets<std::io::BufReader<std::fs::File>>, ReconError> {
    open_workbook_auto(path).map_err(|e| ReconError::Read {
        file: display_name(path),
        message: e.to_string(),
    })
}

fn is_reserved_sheet(name: &str, config: &MatchConfig) -> bool {
    name.to_lowercase() == config.reserved_sheet.to_lowercase()
}

/// Lower a calamine cell to an optional string. Integer-valued floats render
/// without a trailing `.0` so numeric identifier cells keep their digit runs.
fn cell_to_string(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => {
            if s.is_empty() {
                None
            } else {
                Some(s.clone())
            }
        }
        Data::Float(n) => {
            if n.fract() == 0.0 && n.abs() < 1e15 {
                Some(format!("{}", *n as i64))
            } else {
                Some(format!("{n}"))
            }
        }
        Data::Int(n) => Some(format!("{n}")),
        Data::Bool(b) => Some(if *b { "TRUE".into() } else { "FALSE".into() }),
        Data::Error(e) => Some(format!("#{e:?}")),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            if serial.fract() == 0.0 && serial.abs() < 1e15 {
                Some(format!("{}", serial as i64))
            } else {
                Some(format!("{serial}"))
            }
        }
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
    }
}

/// Aggregate every non-reserved sheet with a resolvable identifier column
/// into one table, header-union merged. Sheets without a matching header are
/// skipped silently; zero aggregated rows is `NoIdentifierColumn`.
pub fn load_worklist(path: &Path, config: &MatchConfig) -> Result<Table, ReconError> {
    let mut workbook = open(path)?;
    let sheet_names = workbook.sheet_names().to_vec();

    let mut table = Table::new();
    for sheet_name in &sheet_names {
        if is_reserved_sheet(sheet_name, config) {
            continue;
        }
        let range = workbook
            .worksheet_range(sheet_name)
            .map_err(|e| ReconError::Read {
                file: display_name(path),
                message: format!("sheet '{sheet_name}': {e}"),
            })?;

        let mut rows = range.rows();
        let Some(header_row) = rows.next() else {
            continue;
        };
        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell_to_string(cell).unwrap_or_default())
            .collect();
        if find_identifier_column(&headers, config).is_none() {
            continue;
        }

        let data: Vec<Vec<Option<String>>> = rows
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect();
        table.append_sheet(&headers, data);
    }

    if table.is_empty() {
        return Err(ReconError::NoIdentifierColumn {
            file: display_name(path),
        });
    }
    Ok(table)
}

/// Scan a non-worklist file for reference identifiers.
///
/// Per qualifying sheet the identifier column is resolved from the header row
/// alone, then only that column is materialized (no per-row records for the
/// other columns), normalized and validated in bulk, and intersected with the
/// reference set. Returns the distinct found identifiers plus the occurrence
/// count of reference hits in this file.
pub fn scan_for_identifiers(
    path: &Path,
    config: &MatchConfig,
    reference: &HashSet<String>,
) -> Result<(HashSet<String>, usize), ReconError> {
    let mut workbook = open(path)?;
    let sheet_names = workbook.sheet_names().to_vec();

    let mut found = HashSet::new();
    let mut hits = 0usize;
    for sheet_name in &sheet_names {
        if is_reserved_sheet(sheet_name, config) {
            continue;
        }
        let range = workbook
            .worksheet_range(sheet_name)
            .map_err(|e| ReconError::Read {
                file: display_name(path),
                message: format!("sheet '{sheet_name}': {e}"),
            })?;

        let mut rows = range.rows();
        let Some(header_row) = rows.next() else {
            continue;
        };
        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell_to_string(cell).unwrap_or_default())
            .collect();
        let Some(col) = find_identifier_column(&headers, config) else {
            continue;
        };

        let column: Vec<Option<String>> = rows
            .map(|row| row.get(col).and_then(cell_to_string))
            .collect();
        let normalized = normalize_column(&column);
        let valid = validate_column(&normalized, config);
        for (identifier, ok) in normalized.into_iter().zip(valid) {
            if ok && reference.contains(&identifier) {
                hits += 1;
                found.insert(identifier);
            }
        }
    }
    Ok((found, hits))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
