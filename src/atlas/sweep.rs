//! Parameter-space sweeps
//!
//! # Design
//!
//! A sweep is a declarative Cartesian product over typed parameter axes,
//! fed through a pure per-point evaluation: caller-supplied code maps each
//! [`ParameterPoint`] to a [`Scenario`], the engine solves it and
//! classifies the bound-state count against the sweep target. Because the
//! per-point evaluation is side-effect-free and every point owns its own
//! inputs, the sweep parallelizes trivially: enable the `parallel` cargo
//! feature to fan the points out over rayon. Results are keyed and ordered
//! by grid index either way, so the execution order never affects the
//! final atlas.
//!
//! # Failure isolation
//!
//! A point whose solve fails (bad configuration, non-convergent shooting)
//! is recorded as [`PointStatus::Invalid`] with the error detail attached:
//! excluded from the robust region, reported separately, never silently
//! dropped, and never able to abort the rest of the sweep.

use crate::error::{ConfigurationError, SolverError};
use crate::solver::{solver_for, EigenConfig, Scenario, SolveBudget, SolverMethod};
use crate::spectrum::{gap_margin, SpectralSummary};

// =================================================================================================
// Parameter axes and grid
// =================================================================================================

/// One swept dimension: a name and its sample values.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterAxis {
    /// Axis name, e.g. `depth`.
    pub name: String,
    /// Sample values, in sweep order.
    pub values: Vec<f64>,
}

impl ParameterAxis {
    /// Evenly spaced axis over `[lo, hi]` with `n` samples.
    pub fn linspace(name: impl Into<String>, lo: f64, hi: f64, n: usize) -> Self {
        let values = if n <= 1 {
            vec![lo]
        } else {
            (0..n)
                .map(|i| lo + (hi - lo) * i as f64 / (n as f64 - 1.0))
                .collect()
        };
        Self {
            name: name.into(),
            values,
        }
    }

    /// Axis pinned to one value (a held-fixed parameter).
    pub fn fixed(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            values: vec![value],
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the axis has no samples.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Validate non-emptiness.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.is_empty() {
            return Err(ConfigurationError::EmptyAxis {
                name: self.name.clone(),
            });
        }
        Ok(())
    }
}

/// The Cartesian product of parameter axes.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterGrid {
    /// Axes, outermost first (the last axis varies fastest).
    pub axes: Vec<ParameterAxis>,
}

impl ParameterGrid {
    /// Grid over the given axes.
    pub fn new(axes: Vec<ParameterAxis>) -> Self {
        Self { axes }
    }

    /// Samples per axis.
    pub fn shape(&self) -> Vec<usize> {
        self.axes.iter().map(|a| a.len()).collect()
    }

    /// Total number of parameter points.
    pub fn len(&self) -> usize {
        self.axes.iter().map(|a| a.len()).product()
    }

    /// Whether the grid has no points.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validate every axis.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.axes.is_empty() {
            return Err(ConfigurationError::EmptyAxis {
                name: "(no axes)".to_string(),
            });
        }
        for axis in &self.axes {
            axis.validate()?;
        }
        Ok(())
    }

    /// Every point of the product, in row-major order (last axis fastest).
    pub fn points(&self) -> Vec<ParameterPoint> {
        let shape = self.shape();
        let total = self.len();
        let mut points = Vec::with_capacity(total);
        for flat in 0..total {
            let mut remainder = flat;
            let mut indices = vec![0usize; shape.len()];
            for d in (0..shape.len()).rev() {
                indices[d] = remainder % shape[d];
                remainder /= shape[d];
            }
            let coords = indices
                .iter()
                .enumerate()
                .map(|(d, &i)| self.axes[d].values[i])
                .collect();
            points.push(ParameterPoint { indices, coords });
        }
        points
    }

    /// Row-major flat index of a grid point.
    pub fn flat_index(&self, indices: &[usize]) -> Option<usize> {
        let shape = self.shape();
        if indices.len() != shape.len() {
            return None;
        }
        let mut flat = 0;
        for (&i, &extent) in indices.iter().zip(shape.iter()) {
            if i >= extent {
                return None;
            }
            flat = flat * extent + i;
        }
        Some(flat)
    }
}

/// One parameter combination θ: its grid indices and coordinate values.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterPoint {
    /// Per-axis sample indices.
    pub indices: Vec<usize>,
    /// Per-axis coordinate values.
    pub coords: Vec<f64>,
}

// =================================================================================================
// Sweep configuration
// =================================================================================================

/// What the sweep looks for and how each point is solved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepConfig {
    /// Target bound-state count defining the region of interest.
    pub target: usize,
    /// Modes computed per point; must exceed `target` so an overshoot is
    /// distinguishable from an exact match.
    pub n_modes: usize,
    /// Discretization method used for every point.
    pub method: SolverMethod,
    /// Root-finding budgets per point.
    pub budget: SolveBudget,
    /// Boundary-ambiguity half-width around λ_th.
    pub ambiguity_epsilon: f64,
    /// Gap margin a point must clear for the region to count as robust.
    pub gap_margin_min: f64,
}

impl SweepConfig {
    /// Defaults for a given target count.
    pub fn for_target(target: usize) -> Self {
        Self {
            target,
            n_modes: target + 1,
            method: SolverMethod::FiniteDifference,
            budget: SolveBudget::default(),
            ambiguity_epsilon: 1e-4,
            gap_margin_min: 0.05,
        }
    }

    /// Validate mode count against the target.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let required = self.target + 1;
        if self.n_modes < required {
            return Err(ConfigurationError::TargetExceedsModes {
                target: self.target,
                required,
                available: self.n_modes,
            });
        }
        self.budget.validate()
    }
}

// =================================================================================================
// Point records
// =================================================================================================

/// Classification of one parameter point.
#[derive(Debug, Clone, PartialEq)]
pub enum PointStatus {
    /// The bound-state count equals the sweep target.
    OnTarget,
    /// The bound-state count differs from the target.
    OffTarget,
    /// One or more eigenvalues sit inside the ambiguity band around λ_th:
    /// the count itself is uncertain. Reported as its own status, merged
    /// into neither the region nor the off-target set.
    BoundaryAmbiguous {
        /// Number of ambiguous modes.
        n_ambiguous: usize,
    },
    /// The underlying solve failed; the error detail is preserved.
    Invalid {
        /// Formatted error from the failed stage.
        detail: String,
    },
}

impl PointStatus {
    /// Name identifier (used in the atlas table).
    pub fn name(&self) -> &'static str {
        match self {
            PointStatus::OnTarget => "on_target",
            PointStatus::OffTarget => "off_target",
            PointStatus::BoundaryAmbiguous { .. } => "boundary_ambiguous",
            PointStatus::Invalid { .. } => "invalid",
        }
    }
}

/// Sweep output for one parameter point.
#[derive(Debug, Clone, PartialEq)]
pub struct PointRecord {
    /// The parameter combination.
    pub point: ParameterPoint,
    /// Computed eigenvalues (empty when the solve failed). The bound-state
    /// count is taken over these `n_modes` lowest modes.
    pub eigenvalues: Vec<f64>,
    /// Bound-state count among the computed modes; `None` when invalid.
    pub n_bound: Option<usize>,
    /// Relative spacing between the target-th and (target+1)-th
    /// eigenvalue, when both exist.
    pub gap_margin: Option<f64>,
    /// Classification.
    pub status: PointStatus,
}

impl PointRecord {
    /// Whether this point belongs to the target region.
    pub fn is_on_target(&self) -> bool {
        self.status == PointStatus::OnTarget
    }
}

// =================================================================================================
// Phase Atlas
// =================================================================================================

/// Drives a grid of scenarios through the solve → postprocess pipeline.
#[derive(Debug, Clone)]
pub struct PhaseAtlas {
    /// Parameter grid.
    pub grid: ParameterGrid,
    /// Sweep configuration.
    pub config: SweepConfig,
}

impl PhaseAtlas {
    /// Create a sweep over `grid` with `config`.
    pub fn new(grid: ParameterGrid, config: SweepConfig) -> Self {
        Self { grid, config }
    }

    /// Evaluate every parameter point.
    ///
    /// `build` maps a parameter point to the scenario it denotes; it must
    /// be pure. Failures inside a point are captured on that point's
    /// record. The returned records are in row-major grid order regardless
    /// of how (or in what order) the points were evaluated.
    pub fn sweep<F>(&self, build: F) -> Result<AtlasResult, ConfigurationError>
    where
        F: Fn(&ParameterPoint) -> Result<Scenario, ConfigurationError> + Sync,
    {
        self.grid.validate()?;
        self.config.validate()?;

        let points = self.grid.points();
        let records = self.evaluate_all(points, &build);

        Ok(AtlasResult {
            target: self.config.target,
            gap_margin_min: self.config.gap_margin_min,
            axes: self.grid.axes.clone(),
            shape: self.grid.shape(),
            records,
        })
    }

    #[cfg(feature = "parallel")]
    fn evaluate_all<F>(&self, points: Vec<ParameterPoint>, build: &F) -> Vec<PointRecord>
    where
        F: Fn(&ParameterPoint) -> Result<Scenario, ConfigurationError> + Sync,
    {
        use rayon::prelude::*;
        points
            .into_par_iter()
            .map(|point| self.evaluate_point(point, build))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn evaluate_all<F>(&self, points: Vec<ParameterPoint>, build: &F) -> Vec<PointRecord>
    where
        F: Fn(&ParameterPoint) -> Result<Scenario, ConfigurationError> + Sync,
    {
        points
            .into_iter()
            .map(|point| self.evaluate_point(point, build))
            .collect()
    }

    /// Evaluate one point, capturing any failure on its record.
    fn evaluate_point<F>(&self, point: ParameterPoint, build: &F) -> PointRecord
    where
        F: Fn(&ParameterPoint) -> Result<Scenario, ConfigurationError> + Sync,
    {
        match self.try_evaluate(&point, build) {
            Ok(record) => record,
            Err(error) => PointRecord {
                point,
                eigenvalues: Vec::new(),
                n_bound: None,
                gap_margin: None,
                status: PointStatus::Invalid {
                    detail: error.to_string(),
                },
            },
        }
    }

    fn try_evaluate<F>(
        &self,
        point: &ParameterPoint,
        build: &F,
    ) -> Result<PointRecord, SolverError>
    where
        F: Fn(&ParameterPoint) -> Result<Scenario, ConfigurationError> + Sync,
    {
        let scenario = build(point)?;
        scenario.validate()?;

        let config = EigenConfig::eigenvalues_only(self.config.n_modes)
            .with_budget(self.config.budget);
        let modes = solver_for(self.config.method).solve(&scenario, &config)?;
        let eigenvalues = modes.eigenvalues();

        let summary = SpectralSummary::classify(
            &scenario.potential,
            &eigenvalues,
            self.config.ambiguity_epsilon,
        );
        let margin = gap_margin(&eigenvalues, self.config.target);

        let status = if summary.n_ambiguous > 0 {
            PointStatus::BoundaryAmbiguous {
                n_ambiguous: summary.n_ambiguous,
            }
        } else if summary.n_bound == self.config.target {
            PointStatus::OnTarget
        } else {
            PointStatus::OffTarget
        };

        Ok(PointRecord {
            point: point.clone(),
            eigenvalues,
            n_bound: Some(summary.n_bound),
            gap_margin: margin,
            status,
        })
    }
}

// =================================================================================================
// Atlas Result
// =================================================================================================

/// The full sweep output: a table keyed by parameter point.
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasResult {
    /// The sweep's target bound-state count.
    pub target: usize,
    /// Gap margin required for robustness classification.
    pub gap_margin_min: f64,
    /// The swept axes.
    pub axes: Vec<ParameterAxis>,
    /// Samples per axis.
    pub shape: Vec<usize>,
    /// One record per point, row-major grid order.
    pub records: Vec<PointRecord>,
}

impl AtlasResult {
    /// Number of evaluated points.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the atlas is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record at a grid index.
    pub fn get(&self, indices: &[usize]) -> Option<&PointRecord> {
        let grid = ParameterGrid::new(self.axes.clone());
        self.records.get(grid.flat_index(indices)?)
    }

    /// Points whose bound-state count hit the target.
    pub fn on_target(&self) -> Vec<&PointRecord> {
        self.records.iter().filter(|r| r.is_on_target()).collect()
    }

    /// Points whose solve failed, with their error details.
    pub fn invalid(&self) -> Vec<&PointRecord> {
        self.records
            .iter()
            .filter(|r| matches!(r.status, PointStatus::Invalid { .. }))
            .collect()
    }

    /// Points with threshold-ambiguous modes.
    pub fn ambiguous(&self) -> Vec<&PointRecord> {
        self.records
            .iter()
            .filter(|r| matches!(r.status, PointStatus::BoundaryAmbiguous { .. }))
            .collect()
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace_axis() {
        let axis = ParameterAxis::linspace("depth", 1.0, 3.0, 5);
        assert_eq!(axis.values, vec![1.0, 1.5, 2.0, 2.5, 3.0]);
        assert_eq!(ParameterAxis::fixed("width", 1.0).len(), 1);
    }

    #[test]
    fn test_grid_cartesian_product_order() {
        let grid = ParameterGrid::new(vec![
            ParameterAxis::linspace("a", 0.0, 1.0, 2),
            ParameterAxis::linspace("b", 10.0, 30.0, 3),
        ]);
        assert_eq!(grid.len(), 6);
        let points = grid.points();
        // Last axis varies fastest.
        assert_eq!(points[0].indices, vec![0, 0]);
        assert_eq!(points[1].indices, vec![0, 1]);
        assert_eq!(points[3].indices, vec![1, 0]);
        assert_eq!(points[4].coords, vec![1.0, 20.0]);
        // Flat index agrees with enumeration order.
        for (flat, point) in points.iter().enumerate() {
            assert_eq!(grid.flat_index(&point.indices), Some(flat));
        }
    }

    #[test]
    fn test_flat_index_bounds() {
        let grid = ParameterGrid::new(vec![ParameterAxis::linspace("a", 0.0, 1.0, 4)]);
        assert_eq!(grid.flat_index(&[3]), Some(3));
        assert_eq!(grid.flat_index(&[4]), None);
        assert_eq!(grid.flat_index(&[0, 0]), None);
    }

    #[test]
    fn test_empty_axis_rejected() {
        let grid = ParameterGrid::new(vec![ParameterAxis {
            name: "a".to_string(),
            values: vec![],
        }]);
        assert!(matches!(
            grid.validate(),
            Err(ConfigurationError::EmptyAxis { .. })
        ));
        assert!(ParameterGrid::new(vec![]).validate().is_err());
    }

    #[test]
    fn test_sweep_config_mode_floor() {
        let mut config = SweepConfig::for_target(3);
        assert_eq!(config.n_modes, 4);
        assert!(config.validate().is_ok());

        config.n_modes = 3;
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::TargetExceedsModes {
                target: 3,
                required: 4,
                available: 3,
            })
        ));
    }

    #[test]
    fn test_invalid_point_captures_error_detail() {
        use crate::physics::Potential;
        use crate::solver::{BoundaryPair, Domain};

        let grid = ParameterGrid::new(vec![ParameterAxis::linspace("n", 40.0, 400.0, 2)]);
        let atlas = PhaseAtlas::new(grid, SweepConfig::for_target(1));
        // First point asks for a 40-point grid, below the minimum: that
        // point must come back Invalid while the second one solves.
        let result = atlas
            .sweep(|point| {
                Ok(Scenario::new(
                    Potential::InfiniteBox,
                    Domain::interval(0.0, 1.0, point.coords[0] as usize)?,
                    BoundaryPair::dirichlet(),
                ))
            })
            .unwrap();

        assert_eq!(result.len(), 2);
        let invalid = result.invalid();
        assert_eq!(invalid.len(), 1);
        match &invalid[0].status {
            PointStatus::Invalid { detail } => {
                assert!(detail.contains("at least 50"), "detail: {}", detail)
            }
            other => panic!("expected Invalid, got {:?}", other),
        }
        // The surviving point classified normally (all box states bound,
        // so n_bound = n_modes = 2, off the target of 1).
        let ok = result.get(&[1]).unwrap();
        assert_eq!(ok.n_bound, Some(2));
        assert_eq!(ok.status, PointStatus::OffTarget);
    }
}
