//! Boundary conditions
//!
//! # Design
//!
//! A boundary condition is not a physical object of its own: it is an
//! operator-level modification of the discretized matrix (finite
//! difference) or of the shooting seed/matching condition. This module
//! only defines the value objects and the residual evaluation shared by
//! both methods.
//!
//! # Sign convention
//!
//! Robin conditions use the outward-normal form `dψ/dn + κψ = 0` with
//! κ ≥ 0 at both endpoints:
//!
//! ```text
//! left endpoint:   ψ'(x_min) = +κ_L ψ(x_min)
//! right endpoint:  ψ'(x_max) = -κ_R ψ(x_max)
//! ```
//!
//! This is symmetric under x → -x, reduces to Neumann at κ = 0, and keeps
//! the discretized operator positive semidefinite in κ. One convention,
//! applied uniformly in every solver.

use nalgebra::DVector;

use crate::error::ConfigurationError;

// =================================================================================================
// Boundary Condition
// =================================================================================================

/// Condition imposed at one domain endpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundaryCondition {
    /// ψ = 0.
    Dirichlet,
    /// ψ' = 0 (outward derivative vanishes).
    Neumann,
    /// dψ/dn + κψ = 0 with κ ≥ 0.
    Robin {
        /// Robin parameter κ.
        kappa: f64,
    },
}

impl BoundaryCondition {
    /// Create a Robin condition, enforcing the κ ≥ 0 convention.
    pub fn robin(kappa: f64) -> Result<Self, ConfigurationError> {
        let condition = BoundaryCondition::Robin { kappa };
        condition.validate()?;
        Ok(condition)
    }

    /// Whether this is a Dirichlet condition.
    pub fn is_dirichlet(&self) -> bool {
        matches!(self, BoundaryCondition::Dirichlet)
    }

    /// The outward-form coefficient κ, or `None` for Dirichlet (which
    /// constrains the value, not the derivative).
    pub fn kappa(&self) -> Option<f64> {
        match self {
            BoundaryCondition::Dirichlet => None,
            BoundaryCondition::Neumann => Some(0.0),
            BoundaryCondition::Robin { kappa } => Some(*kappa),
        }
    }

    /// Name identifier.
    pub fn name(&self) -> &'static str {
        match self {
            BoundaryCondition::Dirichlet => "dirichlet",
            BoundaryCondition::Neumann => "neumann",
            BoundaryCondition::Robin { .. } => "robin",
        }
    }

    /// Validate the κ ≥ 0 convention.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if let BoundaryCondition::Robin { kappa } = self {
            if !(*kappa >= 0.0) || !kappa.is_finite() {
                return Err(ConfigurationError::InvalidRobinParameter { kappa: *kappa });
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for BoundaryCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoundaryCondition::Robin { kappa } => write!(f, "robin(κ={})", kappa),
            other => write!(f, "{}", other.name()),
        }
    }
}

// =================================================================================================
// Boundary Pair
// =================================================================================================

/// Conditions at both domain endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryPair {
    /// Condition at `x_min`.
    pub left: BoundaryCondition,
    /// Condition at `x_max`.
    pub right: BoundaryCondition,
}

impl BoundaryPair {
    /// Arbitrary pair.
    pub fn new(left: BoundaryCondition, right: BoundaryCondition) -> Self {
        Self { left, right }
    }

    /// Dirichlet at both endpoints.
    pub fn dirichlet() -> Self {
        Self::new(BoundaryCondition::Dirichlet, BoundaryCondition::Dirichlet)
    }

    /// Neumann at both endpoints.
    pub fn neumann() -> Self {
        Self::new(BoundaryCondition::Neumann, BoundaryCondition::Neumann)
    }

    /// Robin at both endpoints.
    pub fn robin(kappa_left: f64, kappa_right: f64) -> Result<Self, ConfigurationError> {
        Ok(Self::new(
            BoundaryCondition::robin(kappa_left)?,
            BoundaryCondition::robin(kappa_right)?,
        ))
    }

    /// Validate both conditions.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.left.validate()?;
        self.right.validate()
    }
}

impl std::fmt::Display for BoundaryPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} | {}", self.left, self.right)
    }
}

// =================================================================================================
// Residual evaluation
// =================================================================================================

/// Amplitude-normalized boundary-condition residuals `(left, right)` of a
/// mode profile sampled on `nodes`.
///
/// Derivatives at the endpoints are taken with one-sided second-order
/// differences, so for a converged mode the residual is limited by the
/// discretization order, not by the solver.
pub fn boundary_residuals(
    pair: &BoundaryPair,
    nodes: &DVector<f64>,
    profile: &DVector<f64>,
) -> (f64, f64) {
    let n = profile.len();
    debug_assert!(n >= 3);
    let amplitude = profile.amax().max(f64::MIN_POSITIVE);

    let h_left = nodes[1] - nodes[0];
    let h_right = nodes[n - 1] - nodes[n - 2];
    let d_left = (-3.0 * profile[0] + 4.0 * profile[1] - profile[2]) / (2.0 * h_left);
    let d_right =
        (3.0 * profile[n - 1] - 4.0 * profile[n - 2] + profile[n - 3]) / (2.0 * h_right);

    let left = match pair.left.kappa() {
        None => profile[0].abs(),
        // outward normal at x_min points in -x: residual = |-ψ' + κψ|
        Some(kappa) => (-d_left + kappa * profile[0]).abs(),
    };
    let right = match pair.right.kappa() {
        None => profile[n - 1].abs(),
        Some(kappa) => (d_right + kappa * profile[n - 1]).abs(),
    };

    (left / amplitude, right / amplitude)
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_kappa_rejected() {
        assert!(matches!(
            BoundaryCondition::robin(-0.5),
            Err(ConfigurationError::InvalidRobinParameter { kappa }) if kappa == -0.5
        ));
        assert!(BoundaryCondition::robin(0.0).is_ok());
        assert!(BoundaryCondition::robin(2.5).is_ok());
    }

    #[test]
    fn test_neumann_is_robin_with_zero_kappa() {
        assert_eq!(BoundaryCondition::Neumann.kappa(), Some(0.0));
        assert_eq!(
            BoundaryCondition::Robin { kappa: 0.0 }.kappa(),
            Some(0.0)
        );
        assert_eq!(BoundaryCondition::Dirichlet.kappa(), None);
    }

    #[test]
    fn test_pair_factories() {
        let pair = BoundaryPair::dirichlet();
        assert!(pair.left.is_dirichlet() && pair.right.is_dirichlet());

        let pair = BoundaryPair::robin(1.0, 2.0).unwrap();
        assert_eq!(pair.left.kappa(), Some(1.0));
        assert_eq!(pair.right.kappa(), Some(2.0));

        assert!(BoundaryPair::robin(1.0, -1.0).is_err());
    }

    #[test]
    fn test_dirichlet_residual_is_endpoint_value() {
        let nodes = DVector::from_fn(5, |i, _| i as f64 * 0.25);
        // sin(πx) on [0,1]: zero at both ends.
        let profile = nodes.map(|x| (std::f64::consts::PI * x).sin());
        let (left, right) = boundary_residuals(&BoundaryPair::dirichlet(), &nodes, &profile);
        assert!(left < 1e-12);
        assert!(right < 1e-12);
    }

    #[test]
    fn test_robin_residual_vanishes_for_matching_profile() {
        // ψ(x) = e^{κx} satisfies ψ' = κψ, the left-endpoint Robin form.
        let kappa = 0.7;
        let n = 101;
        let nodes = DVector::from_fn(n, |i, _| i as f64 / (n as f64 - 1.0));
        let profile = nodes.map(|x| (kappa * x).exp());
        let pair = BoundaryPair::new(
            BoundaryCondition::Robin { kappa },
            BoundaryCondition::Dirichlet,
        );
        let (left, _) = boundary_residuals(&pair, &nodes, &profile);
        // One-sided second-order derivative: residual at truncation level.
        assert!(left < 1e-3, "left residual {} too large", left);
    }

    #[test]
    fn test_display() {
        assert_eq!(BoundaryPair::dirichlet().to_string(), "dirichlet | dirichlet");
        assert_eq!(
            BoundaryCondition::Robin { kappa: 1.5 }.to_string(),
            "robin(κ=1.5)"
        );
    }
}
