//! Helper functions for integration tests

use sturm_rs::physics::{Harmonic, PoschlTeller, Potential};
use sturm_rs::solver::{BoundaryPair, Domain, Scenario};

/// Compute relative error: |actual - expected| / |expected|
pub fn relative_error(actual: f64, expected: f64) -> f64 {
    if expected.abs() < 1e-10 {
        (actual - expected).abs()
    } else {
        (actual - expected).abs() / expected.abs()
    }
}

/// Assert that a slice is strictly ascending
pub fn assert_ascending(values: &[f64], message: &str) {
    for i in 1..values.len() {
        assert!(
            values[i] > values[i - 1],
            "{}: values[{}] = {} not above values[{}] = {}",
            message,
            i,
            values[i],
            i - 1,
            values[i - 1]
        );
    }
}

/// Infinite box of length 1 with Dirichlet walls
pub fn box_scenario(n_points: usize) -> Scenario {
    Scenario::new(
        Potential::InfiniteBox,
        Domain::interval(0.0, 1.0, n_points).unwrap(),
        BoundaryPair::dirichlet(),
    )
}

/// Unit harmonic oscillator on [-10, 10] with Dirichlet walls
pub fn harmonic_scenario(n_points: usize) -> Scenario {
    Scenario::new(
        Potential::Harmonic(Harmonic { omega: 1.0 }),
        Domain::interval(-10.0, 10.0, n_points).unwrap(),
        BoundaryPair::dirichlet(),
    )
}

/// Pöschl-Teller well on a symmetric interval with Dirichlet walls
pub fn poschl_teller_scenario(
    depth: f64,
    width: f64,
    x_half: f64,
    n_points: usize,
) -> Scenario {
    Scenario::new(
        Potential::PoschlTeller(PoschlTeller { depth, width }),
        Domain::interval(-x_half, x_half, n_points).unwrap(),
        BoundaryPair::dirichlet(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_error() {
        assert!((relative_error(1.0, 1.0) - 0.0).abs() < 1e-10);
        assert!((relative_error(1.1, 1.0) - 0.1).abs() < 1e-10);
        assert!((relative_error(0.9, 1.0) - 0.1).abs() < 1e-10);
    }
}
