//! Error types for the eigenvalue engine
//!
//! All errors derive [`thiserror::Error`] and carry the numeric detail needed
//! to reproduce and diagnose a failure without re-running with extra logging:
//! which check, which tolerance, which observed values.
//!
//! # Taxonomy
//!
//! - [`ConfigurationError`]: malformed or out-of-range input. Surfaced
//!   immediately, never silently corrected.
//! - [`ConvergenceError`]: a solver failed to meet its tolerance or iteration
//!   budget. Surfaced per evaluation; a phase-atlas sweep records it on the
//!   affected point instead of aborting.
//! - [`VerificationFailure`]: a named Verification Ladder sub-check did not
//!   pass. Never downgraded to a warning.
//! - [`SolverError`]: umbrella over the above for `?`-composition at the
//!   pipeline seams.

use thiserror::Error;

// =================================================================================================
// Configuration Errors
// =================================================================================================

/// Malformed or out-of-range input.
///
/// Construction-time validation failures: the engine refuses to build a
/// degenerate discretization rather than producing numbers from one.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// Grid point count below the supported minimum.
    #[error("grid must have at least {minimum} points; got {n_points}")]
    GridTooCoarse { n_points: usize, minimum: usize },

    /// Domain with non-positive length.
    #[error("domain length must be positive; got [{x_min}, {x_max}]")]
    EmptyDomain { x_min: f64, x_max: f64 },

    /// Half-line cutoff shorter than the potential's decay scale allows.
    #[error(
        "half-line cutoff {x_max} is below the required margin {required} \
         for this potential's decay length"
    )]
    CutoffTooShort { x_max: f64, required: f64 },

    /// Robin parameter outside the κ ≥ 0 convention.
    #[error("Robin parameter must be non-negative and finite; got {kappa}")]
    InvalidRobinParameter { kappa: f64 },

    /// A potential parameter that must be strictly positive was not.
    #[error("potential parameter '{name}' must be positive; got {value}")]
    NonPositiveParameter { name: &'static str, value: f64 },

    /// More modes requested than the discretization can represent.
    #[error("requested {requested} modes but the discretization supports at most {available}")]
    TooManyModes { requested: usize, available: usize },

    /// A solve with zero requested modes is always a caller mistake.
    #[error("at least one mode must be requested")]
    NoModesRequested,

    /// The chosen method cannot operate on the chosen grid.
    #[error("the {method} method requires a uniform grid; got a {grid} grid")]
    UnsupportedGrid {
        method: &'static str,
        grid: &'static str,
    },

    /// A tolerance or budget entry that must be positive was not.
    #[error("'{name}' must be positive; got {value}")]
    NonPositiveTolerance { name: &'static str, value: f64 },

    /// A parameter axis with no sample values.
    #[error("parameter axis '{name}' has no values")]
    EmptyAxis { name: String },

    /// A sweep that could never observe its own target.
    #[error(
        "sweep target of {target} bound states needs at least {required} \
         computed modes; got {available}"
    )]
    TargetExceedsModes {
        target: usize,
        required: usize,
        available: usize,
    },
}

// =================================================================================================
// Convergence Errors
// =================================================================================================

/// A solver failed to meet its tolerance or iteration budget.
///
/// These are deterministic outcomes of a given configuration, not transient
/// failures; retrying without changing the configuration will fail the same
/// way.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvergenceError {
    /// The λ-scan found fewer sign changes than requested eigenvalues.
    #[error(
        "found {found} of {requested} eigenvalues in scan range \
         [{scan_min}, {scan_max}]"
    )]
    RootsExhausted {
        found: usize,
        requested: usize,
        scan_min: f64,
        scan_max: f64,
    },

    /// Bisection ran out of its iteration budget before reaching tolerance.
    #[error(
        "bisection budget of {budget} iterations exhausted near λ = {estimate} \
         (bracket width {width}, tolerance {tolerance})"
    )]
    BudgetExhausted {
        budget: usize,
        estimate: f64,
        width: f64,
        tolerance: f64,
    },
}

// =================================================================================================
// Verification Failures
// =================================================================================================

/// A named Verification Ladder sub-check that did not pass.
///
/// Carries the check name, expected vs. observed value and the tolerance in
/// force, so a gate report can show *which* invariant broke and by how much.
#[derive(Debug, Clone, PartialEq, Error)]
#[error(
    "verification check '{check}' failed: expected {expected}, \
     observed {observed} (tolerance {tolerance})"
)]
pub struct VerificationFailure {
    /// Dotted check identifier, e.g. `v0.analytic.lambda_1`.
    pub check: String,
    /// Reference value the check compared against.
    pub expected: f64,
    /// Value actually produced by the solve.
    pub observed: f64,
    /// Tolerance in force when the comparison was made.
    pub tolerance: f64,
}

// =================================================================================================
// Umbrella
// =================================================================================================

/// Any error the solver pipeline can produce.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    /// [`ConfigurationError`]
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// [`ConvergenceError`]
    #[error("convergence error: {0}")]
    Convergence(#[from] ConvergenceError),

    /// [`VerificationFailure`]
    #[error("verification failure: {0}")]
    Verification(#[from] VerificationFailure),
}

// =================================================================================================
// Tests
// =================================================================================================
