//! Shooting eigensolver
//!
//! # Mathematical Background
//!
//! For a trial eigenvalue λ the solution is integrated from the left
//! endpoint with the left boundary condition built into the starting
//! values, using Numerov's fourth-order recurrence
//!
//! ```text
//! f_i = 1 + h²(λ - V_i)/12
//! ψ_{i+1} = ((12 - 10·f_i)·ψ_i - f_{i-1}·ψ_{i-1}) / f_{i+1}
//! ```
//!
//! The mismatch `m(λ)` is the right boundary condition's residual at the
//! far endpoint, normalized by the solution's amplitude so that it stays
//! O(1) even when the trial solution grows exponentially. `m(λ)` changes
//! sign exactly at the eigenvalues, so the solver scans an ascending λ
//! range for sign changes and refines each bracket by bisection.
//!
//! Everything is bounded by the configured [`SolveBudget`]: too few sign
//! changes or an unconverged bracket is a `ConvergenceError` carrying the
//! scan range and bracket state: reported, never silently truncated.

use nalgebra::DVector;

use crate::error::{ConfigurationError, ConvergenceError, SolverError};
use crate::solver::boundary::{boundary_residuals, BoundaryCondition, BoundaryPair};
use crate::solver::domain::GridType;
use crate::solver::scenario::Scenario;
use crate::solver::traits::{EigenConfig, EigenSolver, SolverMethod};
use crate::spectrum::{normalize_profile, Eigenpair, ModeSet};

/// Amplitude at which the trial solution is rescaled mid-integration to
/// avoid overflow in classically forbidden regions.
const RESCALE_THRESHOLD: f64 = 1e100;

// =================================================================================================
// Shooting Solver
// =================================================================================================

/// Numerov shooting eigensolver; see the module docs for the scheme.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShootingSolver;

impl ShootingSolver {
    /// Create a new solver.
    pub fn new() -> Self {
        Self
    }

    /// Integrate the trial solution at `lambda` across the grid, seeding
    /// the first two values from the left boundary condition.
    fn integrate(
        h: f64,
        v: &DVector<f64>,
        lambda: f64,
        left: &BoundaryCondition,
    ) -> DVector<f64> {
        let n = v.len();
        let f = |i: usize| 1.0 + h * h * (lambda - v[i]) / 12.0;

        let mut psi = DVector::zeros(n);
        match left.kappa() {
            // Dirichlet: ψ(x₀) = 0 with an arbitrary nonzero slope.
            None => {
                psi[0] = 0.0;
                psi[1] = h;
            }
            // Robin/Neumann: ψ'(x₀) = κψ(x₀); second-order Taylor step
            // using ψ'' = (V - λ)ψ.
            Some(kappa) => {
                psi[0] = 1.0;
                psi[1] = 1.0 + h * kappa + 0.5 * h * h * (v[0] - lambda);
            }
        }

        for i in 1..n - 1 {
            let mut denom = f(i + 1);
            if denom.abs() < f64::MIN_POSITIVE {
                denom = f64::MIN_POSITIVE;
            }
            psi[i + 1] = ((12.0 - 10.0 * f(i)) * psi[i] - f(i - 1) * psi[i - 1]) / denom;

            let magnitude = psi[i + 1].abs();
            if magnitude > RESCALE_THRESHOLD {
                let inv = 1.0 / magnitude;
                for value in psi.iter_mut().take(i + 2) {
                    *value *= inv;
                }
            }
        }
        psi
    }

    /// Amplitude-normalized mismatch of the right boundary condition.
    fn mismatch(
        h: f64,
        v: &DVector<f64>,
        lambda: f64,
        boundaries: &BoundaryPair,
    ) -> f64 {
        let psi = Self::integrate(h, v, lambda, &boundaries.left);
        let n = psi.len();
        let amplitude = psi.amax().max(f64::MIN_POSITIVE);
        match boundaries.right.kappa() {
            None => psi[n - 1] / amplitude,
            Some(kappa) => {
                let derivative =
                    (3.0 * psi[n - 1] - 4.0 * psi[n - 2] + psi[n - 3]) / (2.0 * h);
                (derivative + kappa * psi[n - 1]) / amplitude
            }
        }
    }

    /// Ascending λ scan range wide enough to hold the lowest `k`
    /// eigenvalues.
    fn scan_range(scenario: &Scenario, v: &DVector<f64>, k: usize) -> (f64, f64) {
        let v_min = v.min();
        let v_max = v.max();
        let scale = v_min.abs().max(v_max.abs()).max(1.0);
        let lower = v_min - 1e-6 * scale;

        // Eigenvalues above the well are box-like; a Weyl-style count on
        // the domain length bounds how far the scan must reach.
        let asymptote = scenario.potential.asymptotic_value();
        let ceiling = if asymptote.is_finite() {
            asymptote.min(v_max)
        } else {
            v_max
        };
        let length = scenario.domain.length();
        let upper =
            ceiling + ((k as f64 + 2.0) * std::f64::consts::PI / length).powi(2);
        (lower, upper)
    }

    /// Refine a sign-change bracket by bisection under the budget.
    fn bisect(
        h: f64,
        v: &DVector<f64>,
        boundaries: &BoundaryPair,
        mut a: f64,
        mut b: f64,
        mut m_a: f64,
        config: &EigenConfig,
    ) -> Result<f64, ConvergenceError> {
        let budget = &config.budget;
        for _ in 0..budget.max_bisection_iters {
            let mid = 0.5 * (a + b);
            let m_mid = Self::mismatch(h, v, mid, boundaries);
            if m_a * m_mid <= 0.0 {
                b = mid;
            } else {
                a = mid;
                m_a = m_mid;
            }
            if (b - a) <= budget.root_tolerance * a.abs().max(b.abs()).max(1.0) {
                return Ok(0.5 * (a + b));
            }
        }
        Err(ConvergenceError::BudgetExhausted {
            budget: budget.max_bisection_iters,
            estimate: 0.5 * (a + b),
            width: b - a,
            tolerance: budget.root_tolerance,
        })
    }
}

impl EigenSolver for ShootingSolver {
    fn solve(&self, scenario: &Scenario, config: &EigenConfig) -> Result<ModeSet, SolverError> {
        config.validate()?;
        scenario.validate()?;

        // Numerov's recurrence assumes even spacing.
        if scenario.domain.grid_type() != GridType::Uniform {
            return Err(ConfigurationError::UnsupportedGrid {
                method: "shooting",
                grid: scenario.domain.grid_type().name(),
            }
            .into());
        }
        let h = scenario
            .domain
            .spacing()
            .expect("uniform grid has a spacing");

        let v = scenario.sampled_potential();
        let boundaries = scenario.boundaries;
        let (scan_min, scan_max) = Self::scan_range(scenario, &v, config.n_modes);

        // ====== Sign-change scan ======

        let n_scan = config.budget.max_scan_points;
        let step = (scan_max - scan_min) / (n_scan as f64 - 1.0);
        let mut eigenvalues: Vec<f64> = Vec::with_capacity(config.n_modes);
        let mut previous = Self::mismatch(h, &v, scan_min, &boundaries);
        let mut previous_lambda = scan_min;
        for i in 1..n_scan {
            if eigenvalues.len() >= config.n_modes {
                break;
            }
            let lambda = scan_min + step * i as f64;
            let current = Self::mismatch(h, &v, lambda, &boundaries);
            if previous == 0.0 {
                eigenvalues.push(previous_lambda);
            } else if previous * current < 0.0 {
                let root = Self::bisect(
                    h,
                    &v,
                    &boundaries,
                    previous_lambda,
                    lambda,
                    previous,
                    config,
                )?;
                eigenvalues.push(root);
            }
            previous = current;
            previous_lambda = lambda;
        }

        if eigenvalues.len() < config.n_modes {
            return Err(ConvergenceError::RootsExhausted {
                found: eigenvalues.len(),
                requested: config.n_modes,
                scan_min,
                scan_max,
            }
            .into());
        }
        eigenvalues.truncate(config.n_modes);

        // ====== Profiles ======

        let nodes = scenario.domain.nodes();
        let weights = scenario.domain.weights();
        let mut pairs = Vec::with_capacity(config.n_modes);
        for (index, &value) in eigenvalues.iter().enumerate() {
            let (profile, normalization_residual, bc_residuals) = if config.compute_profiles {
                let mut psi = Self::integrate(h, &v, value, &boundaries.left);
                // Unit-amplitude scaling first, so the recorded residual
                // measures quadrature defect rather than seed scale.
                let amplitude = psi.amax().max(f64::MIN_POSITIVE);
                psi /= amplitude;
                let residual = normalize_profile(&mut psi, &weights);
                let peak = psi.iter().cloned().fold(0.0_f64, |acc, t| {
                    if t.abs() > acc.abs() {
                        t
                    } else {
                        acc
                    }
                });
                if peak < 0.0 {
                    psi = -psi;
                }
                let residuals = boundary_residuals(&boundaries, &nodes, &psi);
                (Some(psi), residual, residuals)
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
            method: SolverMethod::Shooting,
            nodes,
            weights,
            pairs,
        };
        modes.flag_degeneracies(config.degeneracy_tolerance);
        Ok(modes)
    }

    fn method(&self) -> SolverMethod {
        SolverMethod::Shooting
    }

    fn name(&self) -> &str {
        "Numerov shooting (bisection)"
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{PoschlTeller, Potential};
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
        let modes = ShootingSolver::new()
            .solve(&box_scenario(400), &EigenConfig::new(3))
            .unwrap();
        let pi2 = std::f64::consts::PI.powi(2);
        for (n, pair) in modes.pairs.iter().enumerate() {
            let exact = ((n + 1) * (n + 1)) as f64 * pi2;
            // Numerov is fourth-order: far tighter than the FD stencil.
            assert!(
                (pair.value - exact).abs() / exact < 1e-6,
                "mode {}: {} vs {}",
                n,
                pair.value,
                exact
            );
        }
    }

    #[test]
    fn test_poschl_teller_spectrum() {
        let scenario = Scenario::new(
            Potential::PoschlTeller(PoschlTeller {
                depth: 6.0,
                width: 1.0,
            }),
            Domain::interval(-10.0, 10.0, 600).unwrap(),
            BoundaryPair::dirichlet(),
        );
        let modes = ShootingSolver::new()
            .solve(&scenario, &EigenConfig::new(2))
            .unwrap();
        assert!((modes.pairs[0].value + 4.0).abs() < 1e-4);
        assert!((modes.pairs[1].value + 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_profiles_normalized() {
        let modes = ShootingSolver::new()
            .solve(&box_scenario(400), &EigenConfig::new(2))
            .unwrap();
        for n in 0..2 {
            assert!(modes.norm_defect(n).unwrap() < 1e-10);
        }
        assert!(modes.max_cross_overlap() < 1e-6);
    }

    #[test]
    fn test_neumann_box_ground_state_is_zero() {
        let scenario = Scenario::new(
            Potential::InfiniteBox,
            Domain::interval(0.0, 1.0, 300).unwrap(),
            BoundaryPair::neumann(),
        );
        let modes = ShootingSolver::new()
            .solve(&scenario, &EigenConfig::eigenvalues_only(2))
            .unwrap();
        assert!(modes.pairs[0].value.abs() < 1e-6);
        let pi2 = std::f64::consts::PI.powi(2);
        assert!((modes.pairs[1].value - pi2).abs() / pi2 < 1e-6);
    }

    #[test]
    fn test_too_many_roots_requested_is_reported() {
        // A scan range sized for 2 modes cannot hold 40; the solver must
        // say so rather than return fewer.
        let mut config = EigenConfig::eigenvalues_only(40);
        config.budget.max_scan_points = 200;
        let result = ShootingSolver::new().solve(&box_scenario(100), &config);
        match result {
            Err(SolverError::Convergence(ConvergenceError::RootsExhausted {
                found,
                requested,
                ..
            })) => {
                assert!(found < 40);
                assert_eq!(requested, 40);
            }
            other => panic!("expected RootsExhausted, got {:?}", other.map(|m| m.len())),
        }
    }

    #[test]
    fn test_chebyshev_grid_rejected() {
        let scenario = Scenario::new(
            Potential::InfiniteBox,
            Domain::interval(0.0, 1.0, 200)
                .unwrap()
                .with_grid_type(crate::solver::GridType::Chebyshev),
            BoundaryPair::dirichlet(),
        );
        let result = ShootingSolver::new().solve(&scenario, &EigenConfig::new(2));
        assert!(matches!(
            result,
            Err(SolverError::Configuration(
                ConfigurationError::UnsupportedGrid { .. }
            ))
        ));
    }
}
