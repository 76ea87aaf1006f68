use std::collections::HashMap;

use serde::Deserialize;

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Immutable per-run configuration. Every knob has a default; a TOML file can
/// override any subset of them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Header names recognized as the identifier column. Matching ignores
    /// case, `'.'` and `' '`.
    pub identifier_columns: Vec<String>,
    /// Sheet name excluded from every workbook (case-insensitive).
    pub reserved_sheet: String,
    /// Appended to the mode-derived prefix to build the output file name.
    pub output_suffix: String,
    /// Shortest normalized identifier accepted as valid.
    pub min_identifier_len: usize,
    /// Longest normalized identifier accepted as valid.
    pub max_identifier_len: usize,
    pub format: FormatConfig,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            identifier_columns: [
                "isbn",
                "codice isbn",
                "cod isbn",
                "cod. isbn",
                "ean",
                "codice",
                "barcode",
                "codiceean",
                "codice ean",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            reserved_sheet: "parametri".into(),
            output_suffix: "_confronto_isbn.xlsx".into(),
            min_identifier_len: 10,
            max_identifier_len: 13,
            format: FormatConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Output styling
// ---------------------------------------------------------------------------

/// Styling applied to the output workbook. Width and abbreviation tables are
/// keyed by lower-cased header text.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Replacement text for long headers, applied to row 1 before styling.
    pub header_abbreviations: HashMap<String, String>,
    /// Per-header column widths, looked up by the pre-abbreviation header.
    pub column_widths: HashMap<String, f64>,
    pub default_column_width: f64,
    pub identifier_column_width: f64,
    /// Header fill, RRGGBB hex without a leading `#`.
    pub header_fill_color: String,
    pub header_font_color: String,
    pub header_row_height: f64,
    pub data_row_height: f64,
    /// Sheet view zoom percentage.
    pub zoom: u16,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            header_abbreviations: [
                ("sezione", "Sez"),
                ("specificazione", "Spec"),
                ("sequenza", "Seq"),
                ("legami con titoli superiori o supplementi", "Legami"),
                ("tipo provenienza", "Provenienza"),
            ]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
            column_widths: [
                ("descrizione isbd", 67.0),
                ("isbd", 67.0),
                ("titolo", 67.0),
                ("collocazione", 14.0),
                ("disponibilità", 12.0),
                ("data inv.", 13.0),
                ("inventario", 10.0),
                ("sequenza", 6.0),
                ("sezione", 6.0),
                ("id. sbn", 14.0),
                ("legami con titoli superiori o supplementi", 22.0),
                ("autore", 25.0),
                ("autore estratto", 25.0),
                ("anno pubblicazione", 12.0),
                ("sebinayou (morante)", 20.0),
                ("sebinayou (tutte)", 20.0),
                ("link sbn", 15.0),
            ]
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect(),
            default_column_width: 15.0,
            identifier_column_width: 18.0,
            header_fill_color: "8DBEE3".into(),
            header_font_color: "000000".into(),
            header_row_height: 19.0,
            data_row_height: 30.0,
            zoom: 110,
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl MatchConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: MatchConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.identifier_columns.is_empty() {
            return Err(ReconError::ConfigValidation(
                "at least one identifier column variant is required".into(),
            ));
        }
        if self
            .identifier_columns
            .iter()
            .any(|v| crate::columns::canonical(v).is_empty())
        {
            return Err(ReconError::ConfigValidation(
                "identifier column variants must contain letters or digits".into(),
            ));
        }
        if self.reserved_sheet.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "reserved_sheet must not be empty".into(),
            ));
        }
        if self.min_identifier_len == 0 {
            return Err(ReconError::ConfigValidation(
                "min_identifier_len must be at least 1".into(),
            ));
        }
        if self.min_identifier_len > self.max_identifier_len {
            return Err(ReconError::ConfigValidation(format!(
                "min_identifier_len {} exceeds max_identifier_len {}",
                self.min_identifier_len, self.max_identifier_len
            )));
        }
        self.format.validate()
    }
}

impl FormatConfig {
    fn validate(&self) -> Result<(), ReconError> {
        for (name, value) in [
            ("header_fill_color", &self.header_fill_color),
            ("header_font_color", &self.header_font_color),
        ] {
            if value.len() != 6 || !value.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(ReconError::ConfigValidation(format!(
                    "{name} must be 6 hex digits, got '{value}'"
                )));
            }
        }
        for (name, value) in [
            ("default_column_width", self.default_column_width),
            ("identifier_column_width", self.identifier_column_width),
            ("header_row_height", self.header_row_height),
            ("data_row_height", self.data_row_height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ReconError::ConfigValidation(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        // Excel's accepted zoom range
        if !(10..=400).contains(&self.zoom) {
            return Err(ReconError::ConfigValidation(format!(
                "zoom must be between 10 and 400, got {}",
                self.zoom
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
