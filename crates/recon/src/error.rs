use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// Fewer than two input files were supplied.
    InsufficientFiles { supplied: usize },
    /// No sheet of the named file yields a resolvable identifier column.
    NoIdentifierColumn { file: String },
    /// The worklist holds no rows with a valid identifier.
    NoValidIdentifiers,
    /// Match mode found no overlap between the worklist and the other files.
    NoMatches,
    /// Non-match mode found every worklist identifier elsewhere.
    AllMatched,
    /// The output file is held open by another process.
    FileLocked { file: String },
    /// Output styling or save failure other than a lock.
    FormattingFailed(String),
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (bad lengths, colors, variants).
    ConfigValidation(String),
    /// Workbook or sheet read error.
    Read { file: String, message: String },
    /// IO error (file write, etc.).
    Io(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientFiles { supplied } => {
                write!(f, "at least 2 files are required for a comparison, got {supplied}")
            }
            Self::NoIdentifierColumn { file } => {
                write!(f, "no identifier column found in '{file}'")
            }
            Self::NoValidIdentifiers => {
                write!(f, "the worklist contains no rows with a valid identifier")
            }
            Self::NoMatches => {
                write!(f, "no matches found between the worklist and the other files")
            }
            Self::AllMatched => {
                write!(f, "every worklist identifier was found in the other files")
            }
            Self::FileLocked { file } => {
                write!(f, "'{file}' is open in another program; close it and retry")
            }
            Self::FormattingFailed(msg) => write!(f, "output formatting failed: {msg}"),
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::Read { file, message } => write!(f, "cannot read '{file}': {message}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
