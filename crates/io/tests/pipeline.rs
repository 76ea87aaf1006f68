use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

use bibmatch_io::reconcile;
use bibmatch_recon::{LogLevel, MatchConfig, Mode, ReconError, RunSummary};

// Three valid 10-digit codes used throughout
const CODE_1: &str = "1111111111";
const CODE_2: &str = "2222222222";
const CODE_3: &str = "3333333333";

fn write_sheets(path: &Path, sheets: &[(&str, &[&[&str]])]) {
    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name).unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                worksheet.write_string(r as u32, c as u16, *cell).unwrap();
            }
        }
    }
    workbook.save(path).unwrap();
}

fn read_first_sheet(path: &Path) -> (Vec<String>, Vec<Vec<Option<String>>>) {
    let mut workbook = open_workbook_auto(path).unwrap();
    let names = workbook.sheet_names().to_vec();
    let range = workbook.worksheet_range(&names[0]).unwrap();
    let mut rows = range.rows();
    let headers = rows
        .next()
        .unwrap()
        .iter()
        .map(|c| c.to_string())
        .collect();
    let data = rows
        .map(|row| {
            row.iter()
                .map(|c| match c {
                    Data::Empty => None,
                    other => Some(other.to_string()),
                })
                .collect()
        })
        .collect();
    (headers, data)
}

#[derive(Debug)]
struct RunCapture {
    summary: RunSummary,
    logs: Vec<(String, LogLevel)>,
    progress: Vec<u32>,
}

fn run(files: &[PathBuf], mode: Mode, config: &MatchConfig) -> Result<RunCapture, ReconError> {
    let mut logs = Vec::new();
    let mut progress = Vec::new();
    let summary = {
        let mut log = |message: &str, level: LogLevel| logs.push((message.to_string(), level));
        let mut tick = |current: u32, _total: u32| progress.push(current);
        reconcile(files, mode, config, &mut log, &mut tick)?
    };
    Ok(RunCapture {
        summary,
        logs,
        progress,
    })
}

/// Worklist with one duplicate and a padded title, catalog containing two of
/// the three codes.
fn standard_fixture(dir: &Path) -> (PathBuf, PathBuf) {
    let worklist = dir.join("worklist.xlsx");
    let catalog = dir.join("catalog.xlsx");
    write_sheets(
        &worklist,
        &[(
            "Foglio1",
            &[
                &["ISBN", "Titolo"],
                &[CODE_1, "  Uno  "],
                &[CODE_2, "Due"],
                &[CODE_1, "Uno bis"],
                &[CODE_3, "Tre"],
            ],
        )],
    );
    write_sheets(
        &catalog,
        &[(
            "Catalogo",
            &[&["Cod. ISBN"], &[CODE_1], &[CODE_2]],
        )],
    );
    (worklist, catalog)
}

#[test]
fn match_mode_end_to_end() {
    let dir = TempDir::new().unwrap();
    let (worklist, catalog) = standard_fixture(dir.path());
    let config = MatchConfig::default();

    let capture = run(&[worklist, catalog], Mode::Match, &config).unwrap();
    let summary = &capture.summary;

    assert_eq!(summary.worklist_unique, 3);
    assert_eq!(summary.duplicates_removed, 1);
    assert_eq!(summary.result_rows, 2);
    assert_eq!(summary.files_processed, 2);
    assert_eq!(
        summary.output_path,
        dir.path().join("confronto_isbn_confronto_isbn.xlsx")
    );
    assert!(summary.output_path.exists());

    let (headers, rows) = read_first_sheet(&summary.output_path);
    // Original columns only - the internal normalized identifier never
    // appears, and the duplicate row lost to the first occurrence.
    assert_eq!(headers, vec!["ISBN", "Titolo"]);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][0].as_deref(), Some(CODE_1));
    assert_eq!(rows[0][1].as_deref(), Some("Uno"));
    assert_eq!(rows[1][0].as_deref(), Some(CODE_2));
    assert_eq!(rows[1][1].as_deref(), Some("Due"));

    // Duplicate diagnostics surfaced as warnings
    assert!(capture
        .logs
        .iter()
        .any(|(m, l)| *l == LogLevel::Warning && m.contains("1 duplicate")));

    // Progress is monotone from 0 to 100
    assert_eq!(capture.progress.first(), Some(&0));
    assert_eq!(capture.progress.last(), Some(&100));
    assert!(capture.progress.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn non_match_mode_keeps_the_unfound_row() {
    let dir = TempDir::new().unwrap();
    let (worklist, catalog) = standard_fixture(dir.path());
    let config = MatchConfig::default();

    let capture = run(&[worklist, catalog], Mode::NonMatch, &config).unwrap();
    assert_eq!(capture.summary.result_rows, 1);
    assert_eq!(
        capture.summary.output_path,
        dir.path().join("non_match_isbn_confronto_isbn.xlsx")
    );

    let (_, rows) = read_first_sheet(&capture.summary.output_path);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0].as_deref(), Some(CODE_3));
    assert_eq!(rows[0][1].as_deref(), Some("Tre"));
}

#[test]
fn match_mode_without_overlap_fails() {
    let dir = TempDir::new().unwrap();
    let worklist = dir.path().join("worklist.xlsx");
    let catalog = dir.path().join("catalog.xlsx");
    write_sheets(
        &worklist,
        &[("Foglio1", &[&["ISBN"], &[CODE_1], &[CODE_2]])],
    );
    write_sheets(&catalog, &[("Catalogo", &[&["ISBN"], &["9999999999"]])]);

    let err = run(
        &[worklist, catalog],
        Mode::Match,
        &MatchConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ReconError::NoMatches));
}

#[test]
fn non_match_mode_with_full_overlap_fails() {
    let dir = TempDir::new().unwrap();
    let worklist = dir.path().join("worklist.xlsx");
    let catalog = dir.path().join("catalog.xlsx");
    write_sheets(
        &worklist,
        &[("Foglio1", &[&["ISBN"], &[CODE_1], &[CODE_2]])],
    );
    write_sheets(
        &catalog,
        &[("Catalogo", &[&["ISBN"], &[CODE_1], &[CODE_2]])],
    );

    let err = run(
        &[worklist, catalog],
        Mode::NonMatch,
        &MatchConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ReconError::AllMatched));
}

#[test]
fn parametri_sheets_are_invisible_everywhere() {
    let dir = TempDir::new().unwrap();
    let worklist = dir.path().join("worklist.xlsx");
    let catalog = dir.path().join("catalog.xlsx");
    // Worklist: a Parametri sheet with an identifier column must not
    // contribute rows.
    write_sheets(
        &worklist,
        &[
            ("Parametri", &[&["ISBN"], &["9999999999"]]),
            ("Dati", &[&["ISBN"], &[CODE_1]]),
        ],
    );
    // Catalog: the only sheet holding the code is Parametri, so nothing is
    // ever found.
    write_sheets(&catalog, &[("PARAMETRI", &[&["ISBN"], &[CODE_1]])]);

    let err = run(
        &[worklist.clone(), catalog],
        Mode::Match,
        &MatchConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ReconError::NoMatches));

    // Same worklist in non-match mode: only CODE_1 survives, proving the
    // Parametri row never joined the worklist.
    let catalog_empty = dir.path().join("empty.xlsx");
    write_sheets(&catalog_empty, &[("Catalogo", &[&["ISBN"], &["8888888888"]])]);
    let capture = run(
        &[worklist, catalog_empty],
        Mode::NonMatch,
        &MatchConfig::default(),
    )
    .unwrap();
    assert_eq!(capture.summary.worklist_unique, 1);
    assert_eq!(capture.summary.result_rows, 1);
}

#[test]
fn worklist_without_identifier_column_fails() {
    let dir = TempDir::new().unwrap();
    let worklist = dir.path().join("worklist.xlsx");
    let catalog = dir.path().join("catalog.xlsx");
    write_sheets(&worklist, &[("Foglio1", &[&["Titolo"], &["Uno"]])]);
    write_sheets(&catalog, &[("Catalogo", &[&["ISBN"], &[CODE_1]])]);

    let err = run(
        &[worklist, catalog],
        Mode::Match,
        &MatchConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ReconError::NoIdentifierColumn { file } if file == "worklist.xlsx"));
}

#[test]
fn worklist_with_only_invalid_identifiers_fails() {
    let dir = TempDir::new().unwrap();
    let worklist = dir.path().join("worklist.xlsx");
    let catalog = dir.path().join("catalog.xlsx");
    write_sheets(
        &worklist,
        &[("Foglio1", &[&["ISBN"], &["abc"], &["123"]])],
    );
    write_sheets(&catalog, &[("Catalogo", &[&["ISBN"], &[CODE_1]])]);

    let err = run(
        &[worklist, catalog],
        Mode::Match,
        &MatchConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ReconError::NoValidIdentifiers));
}

#[test]
fn multi_sheet_worklist_merges_headers_by_union() {
    let dir = TempDir::new().unwrap();
    let worklist = dir.path().join("worklist.xlsx");
    let catalog = dir.path().join("catalog.xlsx");
    write_sheets(
        &worklist,
        &[
            ("Nord", &[&["ISBN", "Titolo"], &[CODE_1, "Uno"]]),
            ("Sud", &[&["ISBN", "Autore"], &[CODE_2, "Eco"]]),
        ],
    );
    write_sheets(
        &catalog,
        &[("Catalogo", &[&["ISBN"], &[CODE_1], &[CODE_2]])],
    );

    let capture = run(
        &[worklist, catalog],
        Mode::Match,
        &MatchConfig::default(),
    )
    .unwrap();
    let (headers, rows) = read_first_sheet(&capture.summary.output_path);
    assert_eq!(headers, vec!["ISBN", "Titolo", "Autore"]);
    assert_eq!(rows.len(), 2);
    // Union padding: the Sud row has no Titolo, the Nord row no Autore
    assert_eq!(rows[0][1].as_deref(), Some("Uno"));
    assert_eq!(rows[0][2], None);
    assert_eq!(rows[1][1], None);
    assert_eq!(rows[1][2].as_deref(), Some("Eco"));
}

#[test]
fn numeric_identifier_cells_match_text_codes() {
    let dir = TempDir::new().unwrap();
    let worklist = dir.path().join("worklist.xlsx");
    let catalog = dir.path().join("catalog.xlsx");
    write_sheets(
        &worklist,
        &[("Foglio1", &[&["ISBN", "Titolo"], &["9788812345678", "Romanzo"]])],
    );
    // Catalog stores the same code as a number, as Excel often does
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.write_string(0, 0, "EAN").unwrap();
    worksheet.write_number(1, 0, 9788812345678.0).unwrap();
    workbook.save(&catalog).unwrap();

    let capture = run(
        &[worklist, catalog],
        Mode::Match,
        &MatchConfig::default(),
    )
    .unwrap();
    assert_eq!(capture.summary.result_rows, 1);
}

#[test]
fn output_headers_are_abbreviated() {
    let dir = TempDir::new().unwrap();
    let worklist = dir.path().join("worklist.xlsx");
    let catalog = dir.path().join("catalog.xlsx");
    write_sheets(
        &worklist,
        &[("Foglio1", &[&["ISBN", "Sezione"], &[CODE_1, "Narrativa"]])],
    );
    write_sheets(&catalog, &[("Catalogo", &[&["ISBN"], &[CODE_1]])]);

    let capture = run(
        &[worklist, catalog],
        Mode::Match,
        &MatchConfig::default(),
    )
    .unwrap();
    let (headers, _) = read_first_sheet(&capture.summary.output_path);
    assert_eq!(headers, vec!["ISBN", "Sez"]);
}

#[test]
fn per_file_hit_counts_are_logged() {
    let dir = TempDir::new().unwrap();
    let (worklist, catalog) = standard_fixture(dir.path());

    let capture = run(
        &[worklist, catalog],
        Mode::Match,
        &MatchConfig::default(),
    )
    .unwrap();
    assert!(capture
        .logs
        .iter()
        .any(|(m, l)| *l == LogLevel::Success && m.contains("Matches in catalog.xlsx: 2")));
}
