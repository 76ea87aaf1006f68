use std::path::PathBuf;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Run mode
// ---------------------------------------------------------------------------

/// Which side of the membership test survives into the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Keep worklist rows whose identifier was found in another file.
    Match,
    /// Keep worklist rows whose identifier was found nowhere else.
    NonMatch,
}

impl Mode {
    /// Mode-derived part of the output file name.
    pub fn output_prefix(self) -> &'static str {
        match self {
            Self::Match => "confronto_isbn",
            Self::NonMatch => "non_match_isbn",
        }
    }

    pub fn result_label(self) -> &'static str {
        match self {
            Self::Match => "matches found",
            Self::NonMatch => "non-matches found",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Match => write!(f, "match"),
            Self::NonMatch => write!(f, "non_match"),
        }
    }
}

// ---------------------------------------------------------------------------
// Log sink levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warning,
    Success,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARNING"),
            Self::Success => write!(f, "SUCCESS"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// An in-memory sheet aggregate: ordered columns, rows of optional cells.
///
/// Sheets are merged by header name: appending a sheet whose headers are not
/// all known yet extends the column list in file order and pads existing rows
/// with `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Merge one sheet's rows in, header-union style. Cells beyond the
    /// sheet's own header count are dropped; cells for columns the sheet
    /// does not have stay `None`.
    pub fn append_sheet(&mut self, headers: &[String], rows: Vec<Vec<Option<String>>>) {
        let mut mapping = Vec::with_capacity(headers.len());
        for header in headers {
            let idx = match self.columns.iter().position(|c| c == header) {
                Some(idx) => idx,
                None => {
                    self.columns.push(header.clone());
                    for row in &mut self.rows {
                        row.push(None);
                    }
                    self.columns.len() - 1
                }
            };
            mapping.push(idx);
        }
        for row in rows {
            let mut merged = vec![None; self.columns.len()];
            for (cell, &target) in row.into_iter().zip(&mapping) {
                merged[target] = cell;
            }
            self.rows.push(merged);
        }
    }

    /// Keep rows whose mask entry is `true`, preserving order. Rows beyond
    /// the mask length are dropped.
    pub fn retain_rows(&mut self, keep: &[bool]) {
        let mut flags = keep.iter().copied();
        self.rows.retain(|_| flags.next().unwrap_or(false));
    }

    /// Trim surrounding whitespace from every cell value.
    pub fn trim(&mut self) {
        for row in &mut self.rows {
            for cell in row.iter_mut() {
                if let Some(value) = cell {
                    let trimmed = value.trim();
                    if trimmed.len() != value.len() {
                        *cell = Some(trimmed.to_string());
                    }
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Run summary
// ---------------------------------------------------------------------------

/// Statistics of one completed run, serializable for machine consumers.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub output_path: PathBuf,
    pub mode: Mode,
    /// Distinct valid identifiers in the worklist after deduplication.
    pub worklist_unique: usize,
    pub result_rows: usize,
    pub files_processed: usize,
    pub duplicates_removed: usize,
    pub engine_version: String,
    pub run_at: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
