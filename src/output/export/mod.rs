//! Result export
//!
//! Flat-file writers for the data the core hands to external tooling.
//! Only the data contract is owned here; presentation belongs to the
//! consumers.

mod csv;

pub use csv::{export_atlas_csv, write_atlas_csv, CsvConfig};
