// File I/O and the batch pipeline - Excel import via calamine, styled
// export via rust_xlsxwriter.

pub mod read;
pub mod run;
pub mod styles;
pub mod write;

pub use run::reconcile;
