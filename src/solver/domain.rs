//! Computational domain and grids
//!
//! # Design
//!
//! A [`Domain`] is an immutable value object: an interval `[x_min, x_max]`
//! or a half-line `[0, x_max)` truncated at a cutoff, together with a grid
//! type and a point count. It owns the two quantities every downstream
//! stage must agree on:
//!
//! - the grid **nodes**, and
//! - the quadrature **weights** used for every integral in the pipeline
//!   (normalization, orthogonality, overlap integrals).
//!
//! Using one weight vector everywhere is what makes "normalized to 1"
//! mean the same thing in the discretization, the postprocessor and the
//! verification ladder.

use nalgebra::DVector;

use crate::error::ConfigurationError;

/// Minimum number of grid points for a non-degenerate discretization.
pub const MIN_GRID_POINTS: usize = 50;

// =================================================================================================
// Grid Type
// =================================================================================================

/// Node placement strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridType {
    /// Evenly spaced nodes.
    Uniform,
    /// Chebyshev-Lobatto nodes, clustered toward the endpoints.
    Chebyshev,
}

impl GridType {
    /// Name identifier.
    pub fn name(&self) -> &'static str {
        match self {
            GridType::Uniform => "uniform",
            GridType::Chebyshev => "chebyshev",
        }
    }
}

impl std::fmt::Display for GridType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// =================================================================================================
// Domain
// =================================================================================================

/// An interval or truncated half-line with a grid on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    x_min: f64,
    x_max: f64,
    n_points: usize,
    grid_type: GridType,
    half_line: bool,
}

impl Domain {
    /// Create a finite-interval domain `[x_min, x_max]` with a uniform grid.
    pub fn interval(
        x_min: f64,
        x_max: f64,
        n_points: usize,
    ) -> Result<Self, ConfigurationError> {
        let domain = Self {
            x_min,
            x_max,
            n_points,
            grid_type: GridType::Uniform,
            half_line: false,
        };
        domain.validate()?;
        Ok(domain)
    }

    /// Create a half-line domain `[0, x_max)` truncated at `x_max`, with a
    /// uniform grid.
    pub fn half_line(x_max: f64, n_points: usize) -> Result<Self, ConfigurationError> {
        let domain = Self {
            x_min: 0.0,
            x_max,
            n_points,
            grid_type: GridType::Uniform,
            half_line: true,
        };
        domain.validate()?;
        Ok(domain)
    }

    /// Switch the node placement strategy.
    pub fn with_grid_type(mut self, grid_type: GridType) -> Self {
        self.grid_type = grid_type;
        self
    }

    // ====================================== Query methods ======================================

    /// Lower endpoint.
    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    /// Upper endpoint (the cutoff, for half-line domains).
    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    /// Domain length.
    pub fn length(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Number of grid points.
    pub fn n_points(&self) -> usize {
        self.n_points
    }

    /// Node placement strategy.
    pub fn grid_type(&self) -> GridType {
        self.grid_type
    }

    /// Whether this is a truncated half-line.
    pub fn is_half_line(&self) -> bool {
        self.half_line
    }

    /// Grid spacing, defined only for uniform grids.
    pub fn spacing(&self) -> Option<f64> {
        match self.grid_type {
            GridType::Uniform => Some(self.length() / (self.n_points as f64 - 1.0)),
            GridType::Chebyshev => None,
        }
    }

    // ======================================= Grid data =======================================

    /// Grid nodes, ascending, endpoints included.
    pub fn nodes(&self) -> DVector<f64> {
        let n = self.n_points;
        match self.grid_type {
            GridType::Uniform => {
                let h = self.length() / (n as f64 - 1.0);
                DVector::from_fn(n, |i, _| self.x_min + h * i as f64)
            }
            GridType::Chebyshev => {
                // Gauss-Lobatto nodes cos(πj/(n-1)), reordered ascending and
                // mapped onto [x_min, x_max].
                DVector::from_fn(n, |i, _| {
                    let theta = std::f64::consts::PI * (n - 1 - i) as f64 / (n as f64 - 1.0);
                    let t = theta.cos();
                    self.x_min + self.length() * (t + 1.0) / 2.0
                })
            }
        }
    }

    /// Trapezoidal quadrature weights on the grid nodes.
    ///
    /// On a uniform grid these are the classical trapezoid weights
    /// `h·(1/2, 1, …, 1, 1/2)`; on a Chebyshev grid they are the
    /// node-spacing generalization `w_i = (x_{i+1} - x_{i-1})/2`.
    pub fn weights(&self) -> DVector<f64> {
        let x = self.nodes();
        let n = x.len();
        DVector::from_fn(n, |i, _| {
            if i == 0 {
                (x[1] - x[0]) / 2.0
            } else if i == n - 1 {
                (x[n - 1] - x[n - 2]) / 2.0
            } else {
                (x[i + 1] - x[i - 1]) / 2.0
            }
        })
    }

    // ==================================== Derived domains ====================================

    /// Same domain with the point count scaled by `factor` (used by the
    /// grid-refinement stability check).
    pub fn refined(&self, factor: usize) -> Result<Self, ConfigurationError> {
        let mut refined = *self;
        refined.n_points = self.n_points * factor.max(1);
        refined.validate()?;
        Ok(refined)
    }

    /// Same domain with the point count divided by `factor`.
    pub fn coarsened(&self, factor: usize) -> Result<Self, ConfigurationError> {
        let mut coarse = *self;
        coarse.n_points = (self.n_points / factor.max(1)).max(MIN_GRID_POINTS);
        coarse.validate()?;
        Ok(coarse)
    }

    /// Expand the domain away from its center by `factor`, scaling the point
    /// count so the mean spacing is preserved (used by the domain-cutoff
    /// sensitivity check). Half-line domains keep the origin fixed and move
    /// only the cutoff.
    pub fn expanded(&self, factor: f64) -> Result<Self, ConfigurationError> {
        let mut expanded = *self;
        if self.half_line {
            expanded.x_max = self.x_max * factor;
        } else {
            let center = (self.x_min + self.x_max) / 2.0;
            let half = self.length() / 2.0 * factor;
            expanded.x_min = center - half;
            expanded.x_max = center + half;
        }
        let scaled = (self.n_points as f64 * factor).round() as usize;
        expanded.n_points = scaled.max(MIN_GRID_POINTS);
        expanded.validate()?;
        Ok(expanded)
    }

    // ====================================== Validation ======================================

    /// Validate point count and extent.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.n_points < MIN_GRID_POINTS {
            return Err(ConfigurationError::GridTooCoarse {
                n_points: self.n_points,
                minimum: MIN_GRID_POINTS,
            });
        }
        if !(self.x_max > self.x_min) || !self.x_min.is_finite() || !self.x_max.is_finite() {
            return Err(ConfigurationError::EmptyDomain {
                x_min: self.x_min,
                x_max: self.x_max,
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.half_line {
            write!(
                f,
                "[0, {}) ({} points, {})",
                self.x_max, self.n_points, self.grid_type
            )
        } else {
            write!(
                f,
                "[{}, {}] ({} points, {})",
                self.x_min, self.x_max, self.n_points, self.grid_type
            )
        }
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_nodes_and_spacing() {
        let domain = Domain::interval(0.0, 1.0, 101).unwrap();
        let x = domain.nodes();
        assert_eq!(x.len(), 101);
        assert_eq!(x[0], 0.0);
        assert!((x[100] - 1.0).abs() < 1e-15);
        assert!((domain.spacing().unwrap() - 0.01).abs() < 1e-15);
    }

    #[test]
    fn test_weights_sum_to_length() {
        let domain = Domain::interval(-3.0, 5.0, 200).unwrap();
        let total: f64 = domain.weights().iter().sum();
        assert!((total - 8.0).abs() < 1e-12);

        let cheb = domain.with_grid_type(GridType::Chebyshev);
        let total: f64 = cheb.weights().iter().sum();
        assert!((total - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_chebyshev_nodes_are_ascending_and_clustered() {
        let domain = Domain::interval(0.0, 1.0, 64)
            .unwrap()
            .with_grid_type(GridType::Chebyshev);
        let x = domain.nodes();
        for i in 1..x.len() {
            assert!(x[i] > x[i - 1]);
        }
        assert!((x[0] - 0.0).abs() < 1e-12);
        assert!((x[x.len() - 1] - 1.0).abs() < 1e-12);
        // Endpoint clustering: first gap smaller than central gap.
        let mid = x.len() / 2;
        assert!((x[1] - x[0]) < (x[mid + 1] - x[mid]));
        assert!(domain.spacing().is_none());
    }

    #[test]
    fn test_minimum_grid_size_enforced() {
        let result = Domain::interval(0.0, 1.0, 10);
        assert!(matches!(
            result,
            Err(ConfigurationError::GridTooCoarse { n_points: 10, .. })
        ));
    }

    #[test]
    fn test_empty_domain_rejected() {
        assert!(Domain::interval(1.0, 1.0, 100).is_err());
        assert!(Domain::interval(2.0, -2.0, 100).is_err());
        assert!(Domain::half_line(-4.0, 100).is_err());
    }

    #[test]
    fn test_half_line_starts_at_origin() {
        let domain = Domain::half_line(12.0, 300).unwrap();
        assert!(domain.is_half_line());
        assert_eq!(domain.x_min(), 0.0);
        assert_eq!(domain.nodes()[0], 0.0);
    }

    #[test]
    fn test_expanded_preserves_spacing() {
        let domain = Domain::interval(-10.0, 10.0, 400).unwrap();
        let expanded = domain.expanded(1.25).unwrap();
        assert!((expanded.x_min() + 12.5).abs() < 1e-12);
        assert!((expanded.x_max() - 12.5).abs() < 1e-12);
        let h0 = domain.spacing().unwrap();
        let h1 = expanded.spacing().unwrap();
        assert!((h0 - h1).abs() / h0 < 0.01);
    }

    #[test]
    fn test_expanded_half_line_keeps_origin() {
        let domain = Domain::half_line(10.0, 200).unwrap();
        let expanded = domain.expanded(1.5).unwrap();
        assert_eq!(expanded.x_min(), 0.0);
        assert!((expanded.x_max() - 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_refined_and_coarsened() {
        let domain = Domain::interval(0.0, 1.0, 100).unwrap();
        assert_eq!(domain.refined(2).unwrap().n_points(), 200);
        assert_eq!(domain.coarsened(2).unwrap().n_points(), 50);
    }
}
