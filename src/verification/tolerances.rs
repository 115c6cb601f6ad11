//! Tolerance profile
//!
//! # Design
//!
//! Every tolerance the verification ladder consults lives in one struct,
//! threaded explicitly through the checks. Tests construct stricter or
//! looser profiles without touching solver internals, and a gate report
//! can state exactly which tolerance was in force for every check.

use crate::error::ConfigurationError;

/// All tolerances used by the verification ladder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToleranceProfile {
    /// V0: relative error against closed-form eigenvalues.
    pub analytic_relative: f64,
    /// V1: relative eigenvalue disagreement between the two methods.
    pub cross_method_relative: f64,
    /// Normalization defect `|‖ψ‖² - 1|` of retained modes.
    pub normalization: f64,
    /// Largest admissible `|⟨ψ_m, ψ_n⟩|` between distinct modes.
    pub orthogonality: f64,
    /// Operator symmetry residual `‖H - Hᵀ‖/‖H‖`.
    pub operator_symmetry: f64,
    /// Amplitude-normalized boundary-condition residual per endpoint.
    ///
    /// Limited by the discretization order of the endpoint derivative, not
    /// by the eigensolve itself, so it is orders looser than
    /// `normalization`.
    pub bc_residual: f64,
    /// V2a: relative eigenvalue drift when the grid is doubled.
    pub grid_drift_relative: f64,
    /// V2b: relative drift of bound eigenvalues when the cutoff moves.
    pub cutoff_drift_relative: f64,
    /// Half-width of the boundary-ambiguous band around λ_th.
    pub ambiguity_epsilon: f64,
    /// Relative spacing below which adjacent eigenvalues are flagged
    /// degenerate.
    pub degeneracy_relative: f64,
}

impl Default for ToleranceProfile {
    fn default() -> Self {
        Self {
            analytic_relative: 1e-3,
            cross_method_relative: 1e-4,
            normalization: 1e-6,
            orthogonality: 1e-6,
            operator_symmetry: 1e-12,
            bc_residual: 1e-3,
            grid_drift_relative: 1e-3,
            cutoff_drift_relative: 1e-3,
            ambiguity_epsilon: 1e-4,
            degeneracy_relative: 1e-8,
        }
    }
}

impl ToleranceProfile {
    /// The default profile.
    pub fn standard() -> Self {
        Self::default()
    }

    /// Every tolerance tightened by a factor of 10.
    pub fn strict() -> Self {
        Self::default().scaled(0.1)
    }

    /// Every tolerance loosened by a factor of 10.
    pub fn relaxed() -> Self {
        Self::default().scaled(10.0)
    }

    /// Uniformly rescale all tolerances.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            analytic_relative: self.analytic_relative * factor,
            cross_method_relative: self.cross_method_relative * factor,
            normalization: self.normalization * factor,
            orthogonality: self.orthogonality * factor,
            operator_symmetry: self.operator_symmetry * factor,
            bc_residual: self.bc_residual * factor,
            grid_drift_relative: self.grid_drift_relative * factor,
            cutoff_drift_relative: self.cutoff_drift_relative * factor,
            ambiguity_epsilon: self.ambiguity_epsilon * factor,
            degeneracy_relative: self.degeneracy_relative * factor,
        }
    }

    /// Validate that every tolerance is positive and finite.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let entries = [
            ("analytic_relative", self.analytic_relative),
            ("cross_method_relative", self.cross_method_relative),
            ("normalization", self.normalization),
            ("orthogonality", self.orthogonality),
            ("operator_symmetry", self.operator_symmetry),
            ("bc_residual", self.bc_residual),
            ("grid_drift_relative", self.grid_drift_relative),
            ("cutoff_drift_relative", self.cutoff_drift_relative),
            ("ambiguity_epsilon", self.ambiguity_epsilon),
            ("degeneracy_relative", self.degeneracy_relative),
        ];
        for (name, value) in entries {
            if !(value > 0.0) || !value.is_finite() {
                return Err(ConfigurationError::NonPositiveTolerance { name, value });
            }
        }
        Ok(())
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_is_valid() {
        assert!(ToleranceProfile::default().validate().is_ok());
    }

    #[test]
    fn test_strict_is_tighter() {
        let standard = ToleranceProfile::standard();
        let strict = ToleranceProfile::strict();
        assert!(strict.analytic_relative < standard.analytic_relative);
        assert!(strict.cross_method_relative < standard.cross_method_relative);
        assert!(strict.validate().is_ok());
    }

    #[test]
    fn test_zero_tolerance_rejected() {
        let mut profile = ToleranceProfile::default();
        profile.normalization = 0.0;
        assert!(matches!(
            profile.validate(),
            Err(ConfigurationError::NonPositiveTolerance {
                name: "normalization",
                ..
            })
        ));
    }
}
