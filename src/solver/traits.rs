//! Eigensolver traits and configuration
//!
//! # Design Philosophy
//!
//! The solver architecture separates concerns into three layers:
//!
//! 1. **Scenario** - WHAT to solve (potential + domain + boundaries)
//! 2. **[`EigenConfig`]** - HOW MUCH to solve (mode count, budgets, flags)
//! 3. **[`EigenSolver`] trait** - the numerical method
//!
//! The same scenario can be pushed through either method, which is exactly
//! what the V1 cross-method verification tier does.

use crate::error::{ConfigurationError, SolverError};
use crate::solver::scenario::Scenario;
use crate::spectrum::ModeSet;

// =================================================================================================
// Solver Method
// =================================================================================================

/// The two independent discretization methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverMethod {
    /// Second-order finite differences + symmetric tridiagonal
    /// eigendecomposition.
    FiniteDifference,
    /// Numerov integration + root-finding on the boundary mismatch.
    Shooting,
}

impl SolverMethod {
    /// Name identifier.
    pub fn name(&self) -> &'static str {
        match self {
            SolverMethod::FiniteDifference => "finite_difference",
            SolverMethod::Shooting => "shooting",
        }
    }

    /// The cross-check partner: the other method.
    pub fn partner(&self) -> SolverMethod {
        match self {
            SolverMethod::FiniteDifference => SolverMethod::Shooting,
            SolverMethod::Shooting => SolverMethod::FiniteDifference,
        }
    }
}

impl std::fmt::Display for SolverMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// =================================================================================================
// Solve Budget
// =================================================================================================

/// Iteration and scan budgets for the root-finding stages.
///
/// Budgets turn a pathological configuration into a per-evaluation
/// [`ConvergenceError`](crate::error::ConvergenceError) instead of a hang;
/// a phase-atlas sweep records the error on the affected point and moves on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveBudget {
    /// Number of λ samples in the shooting method's sign-change scan.
    pub max_scan_points: usize,
    /// Bisection iterations allowed per root.
    pub max_bisection_iters: usize,
    /// Relative bracket width at which a root is accepted.
    pub root_tolerance: f64,
}

impl Default for SolveBudget {
    fn default() -> Self {
        Self {
            max_scan_points: 2000,
            max_bisection_iters: 128,
            root_tolerance: 1e-10,
        }
    }
}

impl SolveBudget {
    /// Validate budget entries.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.max_scan_points < 2 {
            return Err(ConfigurationError::NonPositiveTolerance {
                name: "max_scan_points",
                value: self.max_scan_points as f64,
            });
        }
        if self.max_bisection_iters == 0 {
            return Err(ConfigurationError::NonPositiveTolerance {
                name: "max_bisection_iters",
                value: 0.0,
            });
        }
        if !(self.root_tolerance > 0.0) {
            return Err(ConfigurationError::NonPositiveTolerance {
                name: "root_tolerance",
                value: self.root_tolerance,
            });
        }
        Ok(())
    }
}

// =================================================================================================
// Eigensolver Configuration
// =================================================================================================

/// Configuration for one eigensolve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EigenConfig {
    /// Number of lowest eigenpairs to compute.
    pub n_modes: usize,
    /// Whether to compute mode profiles. Sweeps that only classify
    /// bound-state counts skip them.
    pub compute_profiles: bool,
    /// Relative spacing below which two adjacent eigenvalues are flagged
    /// as degenerate.
    pub degeneracy_tolerance: f64,
    /// Root-finding budgets.
    pub budget: SolveBudget,
}

impl EigenConfig {
    /// Compute `n_modes` eigenpairs with profiles.
    pub fn new(n_modes: usize) -> Self {
        Self {
            n_modes,
            compute_profiles: true,
            degeneracy_tolerance: 1e-8,
            budget: SolveBudget::default(),
        }
    }

    /// Compute eigenvalues only, skipping profiles.
    pub fn eigenvalues_only(n_modes: usize) -> Self {
        Self {
            compute_profiles: false,
            ..Self::new(n_modes)
        }
    }

    /// Override the root-finding budgets.
    pub fn with_budget(mut self, budget: SolveBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Validate mode count and budgets.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.n_modes == 0 {
            return Err(ConfigurationError::NoModesRequested);
        }
        if !(self.degeneracy_tolerance > 0.0) {
            return Err(ConfigurationError::NonPositiveTolerance {
                name: "degeneracy_tolerance",
                value: self.degeneracy_tolerance,
            });
        }
        self.budget.validate()
    }
}

// =================================================================================================
// Eigensolver Trait
// =================================================================================================

/// A numerical method computing the lowest eigenpairs of a scenario.
///
/// # Contract
///
/// - Eigenvalues are returned in ascending order.
/// - Profiles (when requested) are quadrature-normalized on the domain's
///   grid, with the pre-normalization residual recorded.
/// - Fewer eigenvalues than requested is an error
///   ([`ConvergenceError`](crate::error::ConvergenceError)), never a
///   silent truncation.
/// - `solve` is pure: no shared mutable state, safe to call from parallel
///   sweep workers.
pub trait EigenSolver: Send + Sync {
    /// Compute the `config.n_modes` lowest eigenpairs of `scenario`.
    fn solve(&self, scenario: &Scenario, config: &EigenConfig) -> Result<ModeSet, SolverError>;

    /// Which method this solver implements.
    fn method(&self) -> SolverMethod;

    /// Human-readable name (used in reports and logs).
    fn name(&self) -> &str;
}

/// Solver instance for a method tag.
pub fn solver_for(method: SolverMethod) -> Box<dyn EigenSolver> {
    match method {
        SolverMethod::FiniteDifference => {
            Box::new(crate::solver::methods::FiniteDifferenceSolver::new())
        }
        SolverMethod::Shooting => Box::new(crate::solver::methods::ShootingSolver::new()),
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_budget_is_valid() {
        assert!(SolveBudget::default().validate().is_ok());
    }

    #[test]
    fn test_zero_modes_rejected() {
        assert!(matches!(
            EigenConfig::new(0).validate(),
            Err(ConfigurationError::NoModesRequested)
        ));
        assert!(EigenConfig::new(3).validate().is_ok());
    }

    #[test]
    fn test_bad_budget_rejected() {
        let mut config = EigenConfig::new(3);
        config.budget.root_tolerance = 0.0;
        assert!(config.validate().is_err());

        let mut config = EigenConfig::new(3);
        config.budget.max_bisection_iters = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_method_partner_is_involutive() {
        assert_eq!(
            SolverMethod::FiniteDifference.partner(),
            SolverMethod::Shooting
        );
        assert_eq!(
            SolverMethod::Shooting.partner().partner(),
            SolverMethod::Shooting
        );
    }

    #[test]
    fn test_solver_factory_matches_method() {
        for method in [SolverMethod::FiniteDifference, SolverMethod::Shooting] {
            assert_eq!(solver_for(method).method(), method);
        }
    }
}
