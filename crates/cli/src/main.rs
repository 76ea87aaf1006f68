// bibmatch CLI - headless worklist identifier comparison

mod exit_codes;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use bibmatch_recon::{LogLevel, MatchConfig, Mode};
use exit_codes::{exit_code_for, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "bibmatch")]
#[command(about = "Compare ISBN/EAN worklists across Excel files")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare a worklist against other spreadsheets
    #[command(after_help = "\
Examples:
  bibmatch run worklist.xlsx catalog.xlsx
  bibmatch run worklist.xlsx a.xlsx b.xlsx --mode non-match
  bibmatch run worklist.xlsx catalog.xlsx --config bibmatch.toml --json")]
    Run {
        /// Input files; the first is the reference worklist
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Keep worklist rows found elsewhere (match) or found nowhere (non-match)
        #[arg(long, value_enum, default_value = "match")]
        mode: ModeArg,

        /// TOML configuration file (defaults apply when omitted)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the run summary as JSON to stdout
        #[arg(long)]
        json: bool,

        /// Suppress log and progress output (errors still reported)
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Validate a configuration file without running
    #[command(after_help = "\
Examples:
  bibmatch validate bibmatch.toml")]
    Validate {
        /// Path to the TOML config file
        config: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Match,
    NonMatch,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Match => Mode::Match,
            ModeArg::NonMatch => Mode::NonMatch,
        }
    }
}

struct CliError {
    code: u8,
    message: String,
    hint: Option<String>,
}

fn cli_err(code: u8, message: impl Into<String>) -> CliError {
    CliError {
        code,
        message: message.into(),
        hint: None,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run {
            files,
            mode,
            config,
            json,
            quiet,
        } => cmd_run(files, mode.into(), config, json, quiet),
        Commands::Validate { config } => cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("error: {}", e.message);
            if let Some(hint) = e.hint {
                eprintln!("hint: {hint}");
            }
            ExitCode::from(e.code)
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<MatchConfig, CliError> {
    match path {
        None => Ok(MatchConfig::default()),
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .map_err(|e| cli_err(EXIT_ERROR, format!("cannot read config: {e}")))?;
            MatchConfig::from_toml(&raw).map_err(|e| cli_err(EXIT_USAGE, e.to_string()))
        }
    }
}

fn cmd_run(
    files: Vec<PathBuf>,
    mode: Mode,
    config_path: Option<PathBuf>,
    json: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let config = load_config(config_path.as_ref())?;

    let mut log = |message: &str, level: LogLevel| {
        if quiet {
            return;
        }
        match level {
            LogLevel::Warning => eprintln!("warning: {message}"),
            LogLevel::Error => eprintln!("error: {message}"),
            LogLevel::Info | LogLevel::Success => eprintln!("{message}"),
        }
    };

    // Percentage milestones only on an interactive stderr
    let render_progress = !quiet && atty::is(atty::Stream::Stderr);
    let mut last_pct = u32::MAX;
    let mut progress = |current: u32, total: u32| {
        if !render_progress {
            return;
        }
        let pct = if total == 0 { 100 } else { current * 100 / total };
        if pct != last_pct {
            eprintln!("[{pct:3}%]");
            last_pct = pct;
        }
    };

    let summary = bibmatch_io::reconcile(&files, mode, &config, &mut log, &mut progress)
        .map_err(|e| CliError {
            code: exit_code_for(&e),
            message: e.to_string(),
            hint: hint_for_code(exit_code_for(&e)),
        })?;

    if json {
        let rendered = serde_json::to_string_pretty(&summary)
            .map_err(|e| cli_err(EXIT_ERROR, format!("JSON serialization error: {e}")))?;
        println!("{rendered}");
    }

    eprintln!(
        "{} mode: {} of {} unique worklist identifiers -> {}",
        summary.mode,
        summary.result_rows,
        summary.worklist_unique,
        summary.output_path.display(),
    );
    Ok(())
}

fn hint_for_code(code: u8) -> Option<String> {
    match code {
        exit_codes::EXIT_INSUFFICIENT_FILES => {
            Some("pass the worklist first, then at least one file to compare against".into())
        }
        exit_codes::EXIT_FILE_LOCKED => {
            Some("close the output file in Excel and run again".into())
        }
        _ => None,
    }
}

fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let raw = std::fs::read_to_string(&config_path)
        .map_err(|e| cli_err(EXIT_ERROR, format!("cannot read config: {e}")))?;
    match MatchConfig::from_toml(&raw) {
        Ok(config) => {
            eprintln!(
                "valid: {} identifier column variant(s), lengths {}..={}, reserved sheet '{}'",
                config.identifier_columns.len(),
                config.min_identifier_len,
                config.max_identifier_len,
                config.reserved_sheet,
            );
            Ok(())
        }
        Err(e) => Err(cli_err(EXIT_USAGE, e.to_string())),
    }
}
