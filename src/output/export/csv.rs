//! CSV export of phase-atlas tables
//!
//! Writes the sweep result as one row per parameter point, compatible with
//! pandas, gnuplot and spreadsheet tools. The format is deliberately flat:
//! axis coordinates, status, bound-state count, gap margin, then the
//! lowest eigenvalues.
//!
//! # Example output
//!
//! ```csv
//! # atlas export
//! # run: pt-sweep
//! # target N_bound: 3
//! depth,width,status,n_bound,gap_margin,lambda_0,lambda_1,lambda_2,lambda_3
//! 1.000000,0.500000,off_target,1,0.862069,-0.304019,0.021663,0.049164,0.089210
//! ...
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::atlas::{AtlasResult, PointStatus};
use crate::output::report::RunContext;

// =================================================================================================
// Configuration
// =================================================================================================

/// Options for CSV export.
#[derive(Debug, Clone)]
pub struct CsvConfig {
    /// Column separator.
    pub delimiter: char,
    /// Decimal places for floating-point columns.
    pub precision: usize,
    /// Whether to emit the `#`-prefixed metadata header block.
    pub include_metadata: bool,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            precision: 6,
            include_metadata: true,
        }
    }
}

// =================================================================================================
// Writers
// =================================================================================================

/// Write an atlas table to any writer.
pub fn write_atlas_csv<W: Write>(
    result: &AtlasResult,
    context: Option<&RunContext>,
    writer: &mut W,
    config: Option<&CsvConfig>,
) -> io::Result<()> {
    let default_config = CsvConfig::default();
    let config = config.unwrap_or(&default_config);
    let sep = config.delimiter.to_string();

    if config.include_metadata {
        writeln!(writer, "# atlas export")?;
        if let Some(context) = context {
            writeln!(writer, "# run: {}", context.label)?;
            writeln!(writer, "# timestamp: {}", context.timestamp)?;
            writeln!(writer, "# code: {}", context.code_version)?;
        }
        writeln!(writer, "# target N_bound: {}", result.target)?;
        writeln!(writer, "# gap margin threshold: {}", result.gap_margin_min)?;
    }

    // Header row.
    let n_lambda = result
        .records
        .iter()
        .map(|r| r.eigenvalues.len())
        .max()
        .unwrap_or(0);
    let mut header: Vec<String> = result.axes.iter().map(|a| a.name.clone()).collect();
    header.push("status".to_string());
    header.push("n_bound".to_string());
    header.push("gap_margin".to_string());
    for n in 0..n_lambda {
        header.push(format!("lambda_{}", n));
    }
    writeln!(writer, "{}", header.join(sep.as_str()))?;

    // Data rows, row-major grid order.
    let precision = config.precision;
    for record in &result.records {
        let mut fields: Vec<String> = record
            .point
            .coords
            .iter()
            .map(|c| format!("{:.*}", precision, c))
            .collect();
        fields.push(record.status.name().to_string());
        fields.push(
            record
                .n_bound
                .map(|n| n.to_string())
                .unwrap_or_default(),
        );
        fields.push(
            record
                .gap_margin
                .map(|g| format!("{:.*}", precision, g))
                .unwrap_or_default(),
        );
        for n in 0..n_lambda {
            fields.push(
                record
                    .eigenvalues
                    .get(n)
                    .map(|v| format!("{:.*}", precision, v))
                    .unwrap_or_default(),
            );
        }
        writeln!(writer, "{}", fields.join(sep.as_str()))?;

        // Invalid points keep their diagnostic next to the row.
        if let PointStatus::Invalid { detail } = &record.status {
            writeln!(writer, "# invalid: {}", detail)?;
        }
    }
    Ok(())
}

/// Write an atlas table to a file path.
pub fn export_atlas_csv<P: AsRef<Path>>(
    result: &AtlasResult,
    context: Option<&RunContext>,
    path: P,
    config: Option<&CsvConfig>,
) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_atlas_csv(result, context, &mut writer, config)
}

// =================================================================================================
// Tests
// =================================================================================================
