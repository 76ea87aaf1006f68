//! Format construction and layout lookups for the output workbook.

use rust_xlsxwriter::{Color, Format, FormatAlign};

use bibmatch_recon::columns::is_identifier_column_name;
use bibmatch_recon::config::{FormatConfig, MatchConfig};

/// A4 in rust_xlsxwriter's paper size table.
pub const PAPER_A4: u8 = 9;

/// Parse an `RRGGBB` hex color. Config validation guarantees the format for
/// configured values.
pub fn parse_rgb(hex: &str) -> Option<u32> {
    if hex.len() != 6 {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}

fn rgb(hex: &str) -> Color {
    Color::RGB(parse_rgb(hex).unwrap_or(0x000000))
}

/// Header row style: solid fill, bold, wrap, top-left.
pub fn header_format(format: &FormatConfig) -> Format {
    Format::new()
        .set_bold()
        .set_font_color(rgb(&format.header_font_color))
        .set_background_color(rgb(&format.header_fill_color))
        .set_text_wrap()
        .set_align(FormatAlign::Left)
        .set_align(FormatAlign::Top)
}

/// Data row style: wrap, top-left.
pub fn data_format() -> Format {
    Format::new()
        .set_text_wrap()
        .set_align(FormatAlign::Left)
        .set_align(FormatAlign::Top)
}

/// Configured replacement for a header, if any. Lookup is by lower-cased,
/// trimmed header text.
pub fn abbreviated<'a>(header: &str, format: &'a FormatConfig) -> Option<&'a str> {
    format
        .header_abbreviations
        .get(&header.trim().to_lowercase())
        .map(String::as_str)
}

/// Column width for a header: identifier columns get the identifier width,
/// width-table hits their configured width, everything else the default.
/// The lookup always uses the pre-abbreviation header.
pub fn resolve_column_width(header: &str, config: &MatchConfig) -> f64 {
    if is_identifier_column_name(header, config) {
        return config.format.identifier_column_width;
    }
    config
        .format
        .column_widths
        .get(&header.trim().to_lowercase())
        .copied()
        .unwrap_or(config.format.default_column_width)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
