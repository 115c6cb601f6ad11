//! Closed-form benchmark spectra
//!
//! Reference eigenvalues for the families that admit them, used by the V0
//! tier of the verification ladder. Everything here is a textbook formula;
//! the point is that the values come from a source *independent* of any
//! discretization.

use crate::physics::Potential;
use crate::solver::{BoundaryPair, Domain};

/// Closed-form eigenvalues for a benchmark configuration, lowest first.
///
/// Returns `None` when the family has no closed form, or when the boundary
/// conditions differ from the ones the formula assumes (all three benchmark
/// formulas assume Dirichlet walls: exact for the infinite box, and valid
/// for the harmonic and Pöschl-Teller wells whenever the domain extends far
/// past the region where the modes live).
///
/// May return fewer than `count` values: the Pöschl-Teller well holds only
/// finitely many bound states, and inventing values past the last one would
/// defeat the purpose of an analytic benchmark.
///
/// # Formulas
///
/// - Infinite box of length L: `λ_n = ((n+1)π/L)²`  (n = 0, 1, …)
/// - Harmonic `(ωx)²`:         `λ_n = (2n+1)·ω`
/// - Pöschl-Teller `-V₀ sech²(x/a)` with `η(η+1) = V₀a²`:
///   `λ_n = -(η-n)²/a²` for integer `n < η`
pub fn analytic_eigenvalues(
    potential: &Potential,
    domain: &Domain,
    boundaries: &BoundaryPair,
    count: usize,
) -> Option<Vec<f64>> {
    if !(boundaries.left.is_dirichlet() && boundaries.right.is_dirichlet()) {
        return None;
    }

    match potential {
        Potential::InfiniteBox => {
            let length = domain.length();
            Some(
                (0..count)
                    .map(|n| ((n as f64 + 1.0) * std::f64::consts::PI / length).powi(2))
                    .collect(),
            )
        }
        Potential::Harmonic(p) => {
            Some((0..count).map(|n| (2.0 * n as f64 + 1.0) * p.omega).collect())
        }
        Potential::PoschlTeller(p) => {
            let eta = poschl_teller_eta(p.depth, p.width);
            let mut values = Vec::new();
            let mut n = 0.0;
            while n < eta && values.len() < count {
                let kappa = (eta - n) / p.width;
                values.push(-kappa * kappa);
                n += 1.0;
            }
            Some(values)
        }
        _ => None,
    }
}

/// The Pöschl-Teller shape parameter η solving `η(η+1) = depth·width²`.
pub fn poschl_teller_eta(depth: f64, width: f64) -> f64 {
    (-1.0 + (1.0 + 4.0 * depth * width * width).sqrt()) / 2.0
}

/// Number of bound states of a Pöschl-Teller well: integers `n < η`.
pub fn poschl_teller_bound_count(depth: f64, width: f64) -> usize {
    let eta = poschl_teller_eta(depth, width);
    if eta <= 0.0 {
        0
    } else {
        eta.ceil() as usize
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{Harmonic, PoschlTeller};

    fn dirichlet_domain(x_min: f64, x_max: f64) -> Domain {
        Domain::interval(x_min, x_max, 100).unwrap()
    }

    #[test]
    fn test_infinite_box_spectrum() {
        let domain = dirichlet_domain(0.0, 1.0);
        let values = analytic_eigenvalues(
            &Potential::InfiniteBox,
            &domain,
            &BoundaryPair::dirichlet(),
            3,
        )
        .unwrap();
        let pi2 = std::f64::consts::PI.powi(2);
        assert!((values[0] - pi2).abs() < 1e-12);
        assert!((values[1] - 4.0 * pi2).abs() < 1e-12);
        assert!((values[2] - 9.0 * pi2).abs() < 1e-12);
    }

    #[test]
    fn test_harmonic_spectrum() {
        let domain = dirichlet_domain(-10.0, 10.0);
        let osc = Potential::Harmonic(Harmonic { omega: 1.0 });
        let values =
            analytic_eigenvalues(&osc, &domain, &BoundaryPair::dirichlet(), 3).unwrap();
        assert_eq!(values, vec![1.0, 3.0, 5.0]);
    }

    #[test]
    fn test_poschl_teller_integer_eta() {
        // depth 6, width 1 → η(η+1) = 6 → η = 2: two bound states -4, -1.
        let well = Potential::PoschlTeller(PoschlTeller {
            depth: 6.0,
            width: 1.0,
        });
        let domain = dirichlet_domain(-10.0, 10.0);
        let values =
            analytic_eigenvalues(&well, &domain, &BoundaryPair::dirichlet(), 5).unwrap();
        assert_eq!(values.len(), 2);
        assert!((values[0] + 4.0).abs() < 1e-12);
        assert!((values[1] + 1.0).abs() < 1e-12);
        assert_eq!(poschl_teller_bound_count(6.0, 1.0), 2);
    }

    #[test]
    fn test_poschl_teller_bound_count_deep_well() {
        // depth 10, width 1 → η ≈ 2.70 → three bound states.
        assert_eq!(poschl_teller_bound_count(10.0, 1.0), 3);
    }

    #[test]
    fn test_no_closed_form_for_volcano() {
        let volcano = Potential::Volcano(crate::physics::Volcano {
            depth: 4.0,
            barrier: 2.0,
            width: 1.0,
        });
        let domain = dirichlet_domain(-10.0, 10.0);
        assert!(
            analytic_eigenvalues(&volcano, &domain, &BoundaryPair::dirichlet(), 3).is_none()
        );
    }

    #[test]
    fn test_non_dirichlet_boundaries_have_no_benchmark() {
        let domain = dirichlet_domain(0.0, 1.0);
        assert!(analytic_eigenvalues(
            &Potential::InfiniteBox,
            &domain,
            &BoundaryPair::neumann(),
            3,
        )
        .is_none());
    }
}
