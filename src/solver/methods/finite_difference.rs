//! Finite-difference eigensolver
//!
//! # Mathematical Background
//!
//! The operator `-d²/dx² + V(x)` is discretized in weak form on the grid
//! nodes: the stiffness part couples neighbouring nodes with `1/h`
//! weights, the potential enters as `w_i·V(x_i)` on the diagonal, and the
//! lumped mass matrix is `M = diag(w_i)` built from the same quadrature
//! weights used everywhere else in the pipeline. Boundary conditions are
//! operator-level modifications:
//!
//! - **Dirichlet**: the endpoint row/column is eliminated (the unknown is
//!   constrained to zero).
//! - **Neumann/Robin**: the endpoint stays an unknown and the Robin
//!   parameter κ adds to the corner entry, the weak-form image of
//!   ghost-point elimination.
//!
//! The generalized problem `A u = λ M u` is reduced to a standard symmetric
//! tridiagonal one, `H = M^{-1/2} A M^{-1/2}`, by the diagonal similarity
//! `ṽ = M^{1/2} u`. On a uniform interior this reproduces the classical
//! second-order central-difference stencil exactly; on a Chebyshev grid it
//! stays symmetric, which a plain stencil would not.
//!
//! # Eigensolver
//!
//! The K algebraically smallest eigenvalues are found by bisection on the
//! Sturm sequence of the tridiagonal matrix (the negative-pivot count of
//! `H - λI` equals the number of eigenvalues below λ), then eigenvectors by
//! inverse iteration with a Thomas solve per sweep. Both stages are
//! iteration-bounded by the configured [`SolveBudget`]: a pathological
//! configuration produces a `ConvergenceError`, never a hang.

use nalgebra::{DMatrix, DVector};

use crate::error::{ConfigurationError, ConvergenceError, SolverError};
use crate::solver::boundary::boundary_residuals;
use crate::solver::scenario::Scenario;
use crate::solver::traits::{EigenConfig, EigenSolver, SolveBudget, SolverMethod};
use crate::spectrum::{normalize_profile, Eigenpair, ModeSet};

// =================================================================================================
// Tridiagonal Operator
// =================================================================================================

/// Symmetric tridiagonal discretization of `-d²/dx² + V` with boundary
/// conditions folded in.
#[derive(Debug, Clone)]
pub struct TridiagonalOperator {
    /// Main diagonal of H.
    diag: DVector<f64>,
    /// Sub/super-diagonal of H (symmetric, stored once).
    off: DVector<f64>,
    /// `sqrt(w_i)` over the active range, for the `u = M^{-1/2} ṽ`
    /// back-transform.
    scale: DVector<f64>,
    /// First active node index in the full grid.
    lo: usize,
    /// Full grid size.
    n_full: usize,
}

impl TridiagonalOperator {
    /// Assemble the operator for a scenario.
    pub fn assemble(scenario: &Scenario) -> Result<Self, ConfigurationError> {
        scenario.validate()?;

        let nodes = scenario.domain.nodes();
        let weights = scenario.domain.weights();
        let v = scenario.sampled_potential();
        let n = nodes.len();

        // Full-grid stiffness + potential, endpoints included.
        let mut a_diag = DVector::<f64>::zeros(n);
        let mut a_off = DVector::<f64>::zeros(n - 1);
        for i in 0..n - 1 {
            let inv_h = 1.0 / (nodes[i + 1] - nodes[i]);
            a_diag[i] += inv_h;
            a_diag[i + 1] += inv_h;
            a_off[i] = -inv_h;
        }
        for i in 0..n {
            a_diag[i] += weights[i] * v[i];
        }

        // Robin corner terms (κ = 0 reduces to plain Neumann).
        if let Some(kappa) = scenario.boundaries.left.kappa() {
            a_diag[0] += kappa;
        }
        if let Some(kappa) = scenario.boundaries.right.kappa() {
            a_diag[n - 1] += kappa;
        }

        // Dirichlet: eliminate the constrained endpoint unknowns.
        let lo = usize::from(scenario.boundaries.left.is_dirichlet());
        let hi = n - usize::from(scenario.boundaries.right.is_dirichlet());
        let m = hi - lo;

        let scale = DVector::from_fn(m, |i, _| weights[lo + i].sqrt());
        let diag = DVector::from_fn(m, |i, _| a_diag[lo + i] / weights[lo + i]);
        let off = DVector::from_fn(m - 1, |i, _| a_off[lo + i] / (scale[i] * scale[i + 1]));

        Ok(Self {
            diag,
            off,
            scale,
            lo,
            n_full: n,
        })
    }

    /// Number of unknowns (grid points minus Dirichlet constraints).
    pub fn dimension(&self) -> usize {
        self.diag.len()
    }

    /// Dense reconstruction, for inspection and the symmetry invariant.
    pub fn to_dense(&self) -> DMatrix<f64> {
        let m = self.dimension();
        let mut h = DMatrix::zeros(m, m);
        for i in 0..m {
            h[(i, i)] = self.diag[i];
            if i + 1 < m {
                h[(i, i + 1)] = self.off[i];
                h[(i + 1, i)] = self.off[i];
            }
        }
        h
    }

    /// Symmetry residual `‖H - Hᵀ‖ / ‖H‖` (Frobenius): a correctness
    /// invariant of the discretization, checked by the V2 tier.
    pub fn symmetry_residual(&self) -> f64 {
        let h = self.to_dense();
        let defect = (&h - h.transpose()).norm();
        let scale = h.norm().max(f64::MIN_POSITIVE);
        defect / scale
    }

    // ===================================== Sturm bisection =====================================

    /// Number of eigenvalues strictly below `x`, via the Sturm sequence of
    /// `H - xI` (count of negative pivots in its LDLᵀ factorization).
    fn count_below(&self, x: f64) -> usize {
        let m = self.dimension();
        let mut count = 0;
        let mut pivot = self.diag[0] - x;
        if pivot < 0.0 {
            count += 1;
        }
        for i in 1..m {
            if pivot == 0.0 {
                pivot = f64::MIN_POSITIVE;
            }
            pivot = (self.diag[i] - x) - self.off[i - 1] * self.off[i - 1] / pivot;
            if pivot < 0.0 {
                count += 1;
            }
        }
        count
    }

    /// Gershgorin enclosure of the whole spectrum.
    fn spectral_bounds(&self) -> (f64, f64) {
        let m = self.dimension();
        let mut lower = f64::INFINITY;
        let mut upper = f64::NEG_INFINITY;
        for i in 0..m {
            let mut radius = 0.0;
            if i > 0 {
                radius += self.off[i - 1].abs();
            }
            if i + 1 < m {
                radius += self.off[i].abs();
            }
            lower = lower.min(self.diag[i] - radius);
            upper = upper.max(self.diag[i] + radius);
        }
        (lower, upper)
    }

    /// The `k` algebraically smallest eigenvalues, ascending.
    pub fn smallest_eigenvalues(
        &self,
        k: usize,
        budget: &SolveBudget,
    ) -> Result<Vec<f64>, ConvergenceError> {
        let (lower, upper) = self.spectral_bounds();
        let mut eigenvalues = Vec::with_capacity(k);
        for j in 0..k {
            let mut a = lower;
            let mut b = upper;
            let mut converged = false;
            for _ in 0..budget.max_bisection_iters {
                let mid = 0.5 * (a + b);
                if self.count_below(mid) >= j + 1 {
                    b = mid;
                } else {
                    a = mid;
                }
                if (b - a) <= budget.root_tolerance * a.abs().max(b.abs()).max(1.0) {
                    converged = true;
                    break;
                }
            }
            if !converged {
                return Err(ConvergenceError::BudgetExhausted {
                    budget: budget.max_bisection_iters,
                    estimate: 0.5 * (a + b),
                    width: b - a,
                    tolerance: budget.root_tolerance,
                });
            }
            eigenvalues.push(0.5 * (a + b));
        }
        Ok(eigenvalues)
    }

    // ==================================== Inverse iteration ====================================

    /// Eigenvector of the eigenvalue nearest `lambda`, by inverse iteration
    /// with a slightly offset shift. Returns a unit 2-norm vector in the
    /// ṽ (mass-scaled) basis.
    fn inverse_iteration(&self, lambda: f64) -> DVector<f64> {
        let m = self.dimension();
        let shift = lambda + 1e-10 * lambda.abs().max(1.0);

        // Deterministic jittered start: breaks the symmetry a constant
        // vector has against antisymmetric modes.
        let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
        let mut v = DVector::from_fn(m, |_, _| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let unit = (state >> 11) as f64 / (1u64 << 53) as f64;
            1.0 + 0.5 * (unit - 0.5)
        });
        v /= v.norm();

        for _ in 0..4 {
            let u = self.thomas_solve(shift, &v);
            let norm = u.norm();
            if norm.is_finite() && norm > 0.0 {
                v = u / norm;
            }
        }
        v
    }

    /// Solve `(H - shift·I) u = rhs` by the Thomas algorithm with a
    /// tiny-pivot guard (the system is near-singular by construction).
    fn thomas_solve(&self, shift: f64, rhs: &DVector<f64>) -> DVector<f64> {
        let m = self.dimension();
        let mut c = DVector::zeros(m.saturating_sub(1));
        let mut d = DVector::zeros(m);

        let mut denom = self.diag[0] - shift;
        if denom.abs() < f64::MIN_POSITIVE {
            denom = f64::MIN_POSITIVE;
        }
        if m > 1 {
            c[0] = self.off[0] / denom;
        }
        d[0] = rhs[0] / denom;
        for i in 1..m {
            let mut pivot = (self.diag[i] - shift) - self.off[i - 1] * c[i - 1];
            if pivot.abs() < f64::MIN_POSITIVE {
                pivot = f64::MIN_POSITIVE;
            }
            if i + 1 < m {
                c[i] = self.off[i] / pivot;
            }
            d[i] = (rhs[i] - self.off[i - 1] * d[i - 1]) / pivot;
        }

        let mut u = DVector::zeros(m);
        u[m - 1] = d[m - 1];
        for i in (0..m - 1).rev() {
            u[i] = d[i] - c[i] * u[i + 1];
        }
        u
    }

    /// Embed an active-range ṽ vector into the full grid and undo the mass
    /// scaling, yielding the mode profile u on the grid nodes.
    fn embed(&self, v: &DVector<f64>) -> DVector<f64> {
        let mut full = DVector::zeros(self.n_full);
        for i in 0..self.dimension() {
            full[self.lo + i] = v[i] / self.scale[i];
        }
        full
    }
}

// =================================================================================================
// Finite-Difference Solver
// =================================================================================================

/// Finite-difference eigensolver; see the module docs for the scheme.
#[derive(Debug, Clone, Copy, Default)]
pub struct FiniteDifferenceSolver;

impl FiniteDifferenceSolver {
    /// Create a new solver.
    pub fn new() -> Self {
        Self
    }
}

impl EigenSolver for FiniteDifferenceSolver {
    fn solve(&self, scenario: &Scenario, config: &EigenConfig) -> Result<ModeSet, SolverError> {
        config.validate()?;

        let operator = TridiagonalOperator::assemble(scenario)?;
        if config.n_modes > operator.dimension() {
            return Err(ConfigurationError::TooManyModes {
                requested: config.n_modes,
                available: operator.dimension(),
            }
            .into());
        }

        let eigenvalues = operator.smallest_eigenvalues(config.n_modes, &config.budget)?;

        let nodes = scenario.domain.nodes();
        let weights = scenario.domain.weights();

        let mut pairs = Vec::with_capacity(config.n_modes);
        for (index, &value) in eigenvalues.iter().enumerate() {
            let (profile, normalization_residual, bc_residuals) = if config.compute_profiles {
                let v = operator.inverse_iteration(value);
                let mut full = operator.embed(&v);
                let residual = normalize_profile(&mut full, &weights);
                // Deterministic sign convention: peak positive.
                let peak = full.iter().cloned().fold(0.0_f64, |acc, t| {
                    if t.abs() > acc.abs() {
                        t
                    } else {
                        acc
                    }
                });
                if peak < 0.0 {
                    full = -full;
                }
                let residuals = boundary_residuals(&scenario.boundaries, &nodes, &full);
                (Some(full), residual, residuals)
            } else {
                (None, 0.0, (0.0, 0.0))
            };

            pairs.push(Eigenpair {
                index,
                value,
                profile,
                normalization_residual,
                bc_residuals,
                degenerate: false,
            });
        }

        let mut modes = ModeSet {
            method: SolverMethod::FiniteDifference,
            nodes,
            weights,
            pairs,
        };
        modes.flag_degeneracies(config.degeneracy_tolerance);
        Ok(modes)
    }

    fn method(&self) -> SolverMethod {
        SolverMethod::FiniteDifference
    }

    fn name(&self) -> &str {
        "Finite differences (Sturm bisection)"
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{Harmonic, PoschlTeller, Potential};
    use crate::solver::{BoundaryPair, Domain};

    fn box_scenario(n: usize) -> Scenario {
        Scenario::new(
            Potential::InfiniteBox,
            Domain::interval(0.0, 1.0, n).unwrap(),
            BoundaryPair::dirichlet(),
        )
    }

    #[test]
    fn test_box_spectrum_matches_closed_form() {
        let modes = FiniteDifferenceSolver::new()
            .solve(&box_scenario(400), &EigenConfig::new(3))
            .unwrap();
        let pi2 = std::f64::consts::PI.powi(2);
        for (n, pair) in modes.pairs.iter().enumerate() {
            let exact = ((n + 1) * (n + 1)) as f64 * pi2;
            let relative = (pair.value - exact).abs() / exact;
            assert!(
                relative < 1e-3,
                "mode {}: {} vs {} (rel {})",
                n,
                pair.value,
                exact,
                relative
            );
        }
    }

    #[test]
    fn test_eigenvalues_ascending() {
        let modes = FiniteDifferenceSolver::new()
            .solve(&box_scenario(200), &EigenConfig::new(5))
            .unwrap();
        let values = modes.eigenvalues();
        for i in 1..values.len() {
            assert!(values[i] > values[i - 1]);
        }
    }

    #[test]
    fn test_profiles_normalized_and_orthogonal() {
        let modes = FiniteDifferenceSolver::new()
            .solve(&box_scenario(300), &EigenConfig::new(3))
            .unwrap();
        for n in 0..3 {
            assert!(modes.norm_defect(n).unwrap() < 1e-10);
        }
        assert!(modes.max_cross_overlap() < 1e-8);
    }

    #[test]
    fn test_dirichlet_profiles_vanish_at_walls() {
        let modes = FiniteDifferenceSolver::new()
            .solve(&box_scenario(200), &EigenConfig::new(2))
            .unwrap();
        for pair in &modes.pairs {
            let profile = pair.profile.as_ref().unwrap();
            assert_eq!(profile[0], 0.0);
            assert_eq!(profile[profile.len() - 1], 0.0);
            assert!(pair.bc_residuals.0 < 1e-12);
            assert!(pair.bc_residuals.1 < 1e-12);
        }
    }

    #[test]
    fn test_neumann_box_has_constant_ground_state() {
        let scenario = Scenario::new(
            Potential::InfiniteBox,
            Domain::interval(0.0, 1.0, 300).unwrap(),
            BoundaryPair::neumann(),
        );
        let modes = FiniteDifferenceSolver::new()
            .solve(&scenario, &EigenConfig::new(2))
            .unwrap();
        // λ₀ = 0, λ₁ = π² for the Neumann box.
        assert!(modes.pairs[0].value.abs() < 1e-8);
        let pi2 = std::f64::consts::PI.powi(2);
        assert!((modes.pairs[1].value - pi2).abs() / pi2 < 1e-3);
        // Ground state is flat.
        let profile = modes.pairs[0].profile.as_ref().unwrap();
        let spread = profile.max() - profile.min();
        assert!(spread.abs() < 1e-6, "ground state spread {}", spread);
    }

    #[test]
    fn test_harmonic_spectrum() {
        let scenario = Scenario::new(
            Potential::Harmonic(Harmonic { omega: 1.0 }),
            Domain::interval(-10.0, 10.0, 600).unwrap(),
            BoundaryPair::dirichlet(),
        );
        let modes = FiniteDifferenceSolver::new()
            .solve(&scenario, &EigenConfig::new(3))
            .unwrap();
        for (n, pair) in modes.pairs.iter().enumerate() {
            let exact = 2.0 * n as f64 + 1.0;
            assert!((pair.value - exact).abs() / exact < 1e-3);
        }
    }

    #[test]
    fn test_poschl_teller_bound_states() {
        let scenario = Scenario::new(
            Potential::PoschlTeller(PoschlTeller {
                depth: 6.0,
                width: 1.0,
            }),
            Domain::interval(-10.0, 10.0, 400).unwrap(),
            BoundaryPair::dirichlet(),
        );
        let modes = FiniteDifferenceSolver::new()
            .solve(&scenario, &EigenConfig::eigenvalues_only(4))
            .unwrap();
        let values = modes.eigenvalues();
        assert!((values[0] + 4.0).abs() / 4.0 < 1e-3);
        assert!((values[1] + 1.0).abs() / 1.0 < 1e-3);
        // Only two bound states; the rest sit above threshold.
        assert!(values[2] > 0.0);
        assert!(modes.pairs[0].profile.is_none());
    }

    #[test]
    fn test_operator_symmetry_residual() {
        let scenario = Scenario::new(
            Potential::PoschlTeller(PoschlTeller {
                depth: 6.0,
                width: 1.0,
            }),
            Domain::interval(-10.0, 10.0, 200).unwrap(),
            BoundaryPair::robin(0.5, 1.5).unwrap(),
        );
        let operator = TridiagonalOperator::assemble(&scenario).unwrap();
        assert!(operator.symmetry_residual() < 1e-12);
    }

    #[test]
    fn test_too_many_modes_rejected() {
        let result = FiniteDifferenceSolver::new()
            .solve(&box_scenario(60), &EigenConfig::new(1000));
        assert!(matches!(
            result,
            Err(SolverError::Configuration(
                ConfigurationError::TooManyModes { .. }
            ))
        ));
    }

    #[test]
    fn test_dirichlet_reduces_dimension() {
        let operator = TridiagonalOperator::assemble(&box_scenario(100)).unwrap();
        assert_eq!(operator.dimension(), 98);

        let neumann = Scenario::new(
            Potential::InfiniteBox,
            Domain::interval(0.0, 1.0, 100).unwrap(),
            BoundaryPair::neumann(),
        );
        let operator = TridiagonalOperator::assemble(&neumann).unwrap();
        assert_eq!(operator.dimension(), 100);
    }
}
