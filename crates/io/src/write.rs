//! Styled output workbook writer.
//!
//! rust_xlsxwriter builds the workbook in memory and saves once, so styling
//! happens at write time; there is no post-hoc restyling pass over a saved
//! file.

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::Path;

use rust_xlsxwriter::{Workbook, XlsxError};

use bibmatch_recon::config::MatchConfig;
use bibmatch_recon::{ReconError, Table};

use crate::read::display_name;
use crate::styles;

fn formatting(err: XlsxError) -> ReconError {
    ReconError::FormattingFailed(err.to_string())
}

/// `PermissionDenied` on the output path means another process holds the
/// file open (typically Excel itself).
fn probe_writable(path: &Path) -> Result<(), ReconError> {
    match OpenOptions::new().write(true).create(true).open(path) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == ErrorKind::PermissionDenied => Err(ReconError::FileLocked {
            file: display_name(path),
        }),
        Err(e) => Err(ReconError::Io(e.to_string())),
    }
}

/// Write the result rows as a single-sheet workbook with the configured
/// styling: abbreviated bold headers on a solid fill, wrapped top-left cells,
/// per-header column widths, frozen header row, landscape A4, zoom.
pub fn write_result(table: &Table, path: &Path, config: &MatchConfig) -> Result<(), ReconError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let header_format = styles::header_format(&config.format);
    let data_format = styles::data_format();

    for (col, header) in table.columns.iter().enumerate() {
        let text = styles::abbreviated(header, &config.format).unwrap_or(header);
        worksheet
            .write_string_with_format(0, col as u16, text, &header_format)
            .map_err(formatting)?;
        worksheet
            .set_column_width(col as u16, styles::resolve_column_width(header, config))
            .map_err(formatting)?;
    }
    worksheet
        .set_row_height(0, config.format.header_row_height)
        .map_err(formatting)?;

    for (row, cells) in table.rows.iter().enumerate() {
        let row_idx = (row + 1) as u32;
        worksheet
            .set_row_height(row_idx, config.format.data_row_height)
            .map_err(formatting)?;
        for (col, cell) in cells.iter().enumerate() {
            if let Some(value) = cell {
                worksheet
                    .write_string_with_format(row_idx, col as u16, value, &data_format)
                    .map_err(formatting)?;
            }
        }
    }

    worksheet.set_landscape();
    worksheet.set_paper_size(styles::PAPER_A4);
    worksheet.set_freeze_panes(1, 0).map_err(formatting)?;
    worksheet.set_zoom(config.format.zoom);

    probe_writable(path)?;
    workbook.save(path).map_err(formatting)?;
    Ok(())
}
