//! Gate-report data contract
//!
//! # Design
//!
//! The numerical core hands the outside world a small set of stable,
//! well-typed records; everything about presentation (templates, figures,
//! document assembly) belongs to the consumer. The one piece of ambient
//! run information (label, timestamp, code identifier) travels as an
//! explicit immutable [`RunContext`] value that is *only* read here, at
//! the report boundary. The solvers never see it, which is what keeps
//! them pure and independently testable.

use std::io::{self, Write};

use crate::spectrum::{overlap_integral, ModeSet, SpectralSummary};
use crate::verification::LadderReport;

// =================================================================================================
// Run Context
// =================================================================================================

/// Immutable description of the run producing a report.
///
/// Constructed by the caller (who knows the wall clock and the build);
/// the numerical core neither reads nor produces any of these fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    /// Free-form run label.
    pub label: String,
    /// Timestamp string, caller-formatted.
    pub timestamp: String,
    /// Code identifier (version, revision, or build tag).
    pub code_version: String,
}

impl RunContext {
    /// Create a run context.
    pub fn new(
        label: impl Into<String>,
        timestamp: impl Into<String>,
        code_version: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            timestamp: timestamp.into(),
            code_version: code_version.into(),
        }
    }
}

// =================================================================================================
// Evaluation Record
// =================================================================================================

/// Per-configuration result record: the sole data handed to the external
/// report layer for a single solve.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationRecord {
    /// Eigenvalues, ascending.
    pub eigenvalues: Vec<f64>,
    /// Essential-spectrum threshold used for classification.
    pub threshold: f64,
    /// Bound-state count.
    pub n_bound: usize,
    /// Number of threshold-ambiguous modes (reported separately, counted
    /// in neither bin).
    pub n_ambiguous: usize,
    /// Overlap integrals ∫|ψ|⁴ per mode, where profiles were computed.
    pub overlap_i4: Vec<f64>,
    /// Pre-normalization residual per mode.
    pub normalization_residuals: Vec<f64>,
    /// Mode profiles sampled on the grid (empty for eigenvalues-only runs).
    pub profiles: Vec<Vec<f64>>,
}

impl EvaluationRecord {
    /// Build the record from a solved mode set and its classification.
    pub fn from_modes(modes: &ModeSet, summary: &SpectralSummary) -> Self {
        let overlap_i4 = modes
            .pairs
            .iter()
            .filter_map(|pair| {
                pair.profile
                    .as_ref()
                    .map(|profile| overlap_integral(profile, &modes.weights, 4))
            })
            .collect();
        let profiles = modes
            .pairs
            .iter()
            .filter_map(|pair| pair.profile.as_ref().map(|p| p.iter().cloned().collect()))
            .collect();
        Self {
            eigenvalues: modes.eigenvalues(),
            threshold: summary.threshold,
            n_bound: summary.n_bound,
            n_ambiguous: summary.n_ambiguous,
            overlap_i4,
            normalization_residuals: modes
                .pairs
                .iter()
                .map(|pair| pair.normalization_residual)
                .collect(),
            profiles,
        }
    }
}

// =================================================================================================
// Gate Report
// =================================================================================================

/// Everything the external report generator needs for one configuration:
/// the run context, the result record and the verification ladder outcome.
#[derive(Debug, Clone)]
pub struct GateReport {
    /// Who/when/what produced this.
    pub context: RunContext,
    /// Human-readable scenario description.
    pub scenario: String,
    /// The result record.
    pub record: EvaluationRecord,
    /// The ladder outcome with every sub-check.
    pub ladder: LadderReport,
}

impl GateReport {
    /// Gate verdict string.
    pub fn verdict(&self) -> &'static str {
        if self.ladder.passed() {
            "PASS"
        } else {
            "FAIL"
        }
    }

    /// Serialize the report as Markdown.
    pub fn write_markdown<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "# Gate report: {}", self.verdict())?;
        writeln!(writer)?;
        writeln!(writer, "- run: {}", self.context.label)?;
        writeln!(writer, "- timestamp: {}", self.context.timestamp)?;
        writeln!(writer, "- code: {}", self.context.code_version)?;
        writeln!(writer, "- scenario: {}", self.scenario)?;
        writeln!(writer)?;

        writeln!(writer, "## Spectrum")?;
        writeln!(writer)?;
        writeln!(
            writer,
            "- N_bound = {} (threshold {}, {} ambiguous)",
            self.record.n_bound, self.record.threshold, self.record.n_ambiguous
        )?;
        for (n, value) in self.record.eigenvalues.iter().enumerate() {
            if let Some(i4) = self.record.overlap_i4.get(n) {
                writeln!(writer, "- lambda_{} = {:.12e} (I4 = {:.6e})", n, value, i4)?;
            } else {
                writeln!(writer, "- lambda_{} = {:.12e}", n, value)?;
            }
        }
        writeln!(writer)?;

        writeln!(writer, "## Verification ladder: {}", self.ladder.state)?;
        writeln!(writer)?;
        for tier in &self.ladder.tiers {
            match &tier.skipped {
                Some(reason) => {
                    writeln!(writer, "### {} -- skipped ({})", tier.tier.name(), reason)?
                }
                None => writeln!(
                    writer,
                    "### {} -- {}",
                    tier.tier.name(),
                    if tier.passed() { "pass" } else { "FAIL" }
                )?,
            }
            for check in &tier.checks {
                writeln!(
                    writer,
                    "- [{}] {}: expected {:.6e}, observed {:.6e}, tol {:.1e}",
                    if check.passed { "ok" } else { "FAIL" },
                    check.name,
                    check.expected,
                    check.observed,
                    check.tolerance,
                )?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }
}

// =================================================================================================
// Tests
// =================================================================================================
