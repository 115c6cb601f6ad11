//! The verification ladder
//!
//! A tiered gate declaring pass/fail for one solver configuration:
//!
//! - **V0**: agreement with closed-form analytic spectra
//! - **V1**: agreement between the two independent discretization methods
//! - **V2**: stability under grid refinement and cutoff variation, plus
//!   operator symmetry, normalization and boundary residuals
//!
//! Tolerances are consolidated in [`ToleranceProfile`] and threaded through
//! every check; each sub-check is recorded as an individual
//! [`CheckRecord`] so reports can show exactly which invariant broke.

mod ladder;
mod tolerances;

pub use ladder::{
    CheckRecord, LadderReport, LadderState, Tier, TierReport, VerificationLadder,
};
pub use tolerances::ToleranceProfile;
