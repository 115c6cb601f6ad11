//! Output boundary
//!
//! The stable records handed to external report generation, and thin
//! writers for them:
//!
//! - [`RunContext`]: immutable run metadata, read only at this boundary
//!   and never by the numerical core
//! - [`EvaluationRecord`] / [`GateReport`]: per-configuration results with
//!   the verification ladder outcome, serializable as Markdown
//! - [`export`]: CSV writers for phase-atlas tables

pub mod export;
mod report;

pub use export::{export_atlas_csv, write_atlas_csv, CsvConfig};
pub use report::{EvaluationRecord, GateReport, RunContext};
