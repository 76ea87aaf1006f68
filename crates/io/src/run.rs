//! The batch pipeline: load and deduplicate the worklist, scan the other
//! files, filter by mode, write the styled output.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use bibmatch_recon::config::MatchConfig;
use bibmatch_recon::engine;
use bibmatch_recon::{LogLevel, Mode, ReconError, RunSummary};

use crate::read::{self, display_name};
use crate::write;

/// Compare the worklist (`files[0]`) against every other file and write the
/// filtered rows next to `files[1]`.
///
/// Progress is reported as a monotone percentage (0 after start, 30 after the
/// worklist is deduplicated, 70 after scanning, 80 before the write, 100 at
/// the end). Both sinks are best-effort observers; the pipeline never depends
/// on them.
pub fn reconcile(
    files: &[PathBuf],
    mode: Mode,
    config: &MatchConfig,
    log: &mut dyn FnMut(&str, LogLevel),
    progress: &mut dyn FnMut(u32, u32),
) -> Result<RunSummary, ReconError> {
    match mode {
        Mode::Match => log("Mode: find matches", LogLevel::Info),
        Mode::NonMatch => log("Mode: find non-matches", LogLevel::Info),
    }
    log("Starting identifier comparison", LogLevel::Info);

    if files.len() < 2 {
        return Err(ReconError::InsufficientFiles {
            supplied: files.len(),
        });
    }
    let worklist_path = &files[0];
    let others = &files[1..];

    log(
        &format!("Worklist file: {}", display_name(worklist_path)),
        LogLevel::Info,
    );
    progress(0, 100);

    // Step 1-3: aggregate, validate, deduplicate the worklist
    let table = read::load_worklist(worklist_path, config)?;
    let mut worklist = engine::build_worklist(table, &display_name(worklist_path), config)?;

    let total_rows = worklist.identifiers.len();
    let duplicates_removed = engine::dedup_first(&mut worklist);
    let worklist_unique = worklist.identifiers.len();
    if duplicates_removed > 0 {
        log(
            &format!("Worklist: {total_rows} rows, {worklist_unique} unique identifiers"),
            LogLevel::Warning,
        );
        log(
            &format!("{duplicates_removed} duplicates detected (removed)"),
            LogLevel::Warning,
        );
    }
    log(
        &format!("Unique identifiers in worklist: {worklist_unique}"),
        LogLevel::Success,
    );
    progress(30, 100);

    // Step 4-5: reference set, then scan the other files
    let reference = engine::reference_set(&worklist);
    log(
        &format!("Reference set built ({} identifiers)", reference.len()),
        LogLevel::Info,
    );

    let mut found: HashSet<String> = HashSet::new();
    for (idx, file) in others.iter().enumerate() {
        log(&format!("Scanning: {}", display_name(file)), LogLevel::Info);
        progress(30 + 40 * idx as u32 / others.len() as u32, 100);

        let (file_found, hits) = read::scan_for_identifiers(file, config, &reference)?;
        if hits > 0 {
            log(
                &format!("Matches in {}: {hits}", display_name(file)),
                LogLevel::Success,
            );
        }
        found.extend(file_found);
    }
    progress(70, 100);

    // Step 6-7: filter by mode, trim, write
    let mut result = engine::filter_by_mode(worklist, &found, mode)?;
    result.trim();
    let result_rows = result.rows.len();

    let output_path = output_path(&others[0], mode, config);
    progress(80, 100);
    log("Applying workbook formatting...", LogLevel::Info);
    if let Err(e) = write::write_result(&result, &output_path, config) {
        log(&format!("Formatting failed: {e}"), LogLevel::Error);
        return Err(e);
    }
    progress(100, 100);
    log("Formatting complete", LogLevel::Success);

    log("Summary:", LogLevel::Info);
    log(
        &format!("  unique worklist identifiers: {worklist_unique}"),
        LogLevel::Info,
    );
    if duplicates_removed > 0 {
        log(
            &format!("  duplicates removed: {duplicates_removed}"),
            LogLevel::Warning,
        );
    }
    log(
        &format!("  {}: {result_rows}", mode.result_label()),
        LogLevel::Success,
    );

    Ok(RunSummary {
        output_path,
        mode,
        worklist_unique,
        result_rows,
        files_processed: files.len(),
        duplicates_removed,
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        run_at: chrono::Utc::now().to_rfc3339(),
    })
}

/// `<mode prefix><configured suffix>`, placed next to the first non-worklist
/// file.
fn output_path(beside: &Path, mode: Mode, config: &MatchConfig) -> PathBuf {
    let name = format!("{}{}", mode.output_prefix(), config.output_suffix);
    beside.parent().unwrap_or_else(|| Path::new(".")).join(name)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
