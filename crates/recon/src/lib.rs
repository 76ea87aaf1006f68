//! `bibmatch-recon`: identifier reconciliation engine for spreadsheet worklists.
//!
//! Pure engine crate: receives pre-loaded tables, returns filtered rows.
//! No CLI or IO dependencies.

pub mod columns;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod normalize;

pub use config::MatchConfig;
pub use engine::Worklist;
pub use error::ReconError;
pub use model::{LogLevel, Mode, RunSummary, Table};
