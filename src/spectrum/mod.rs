//! Eigenpairs and mode sets
//!
//! # Design
//!
//! A [`ModeSet`] is the common output of both discretization methods: the
//! grid it was computed on, the quadrature weights belonging to that grid,
//! and the eigenpairs in ascending order. Derived quantities (bound-state
//! counts, overlap integrals, mode classification) live in
//! [`postprocess`]; quality metrics that only make sense per mode
//! (normalization residual, boundary residuals, degeneracy flags) travel
//! with each [`Eigenpair`].

mod postprocess;

pub use postprocess::{
    bound_state_count, gap_margin, normalize_profile, overlap_integral, ModeClass,
    SpectralSummary,
};

use nalgebra::DVector;

use crate::solver::SolverMethod;

// =================================================================================================
// Eigenpair
// =================================================================================================

/// One eigenvalue with its (optional) mode profile and quality metrics.
#[derive(Debug, Clone)]
pub struct Eigenpair {
    /// Mode index, 0 = ground state.
    pub index: usize,
    /// Eigenvalue λ.
    pub value: f64,
    /// Quadrature-normalized profile on the grid nodes; `None` when the
    /// solve was configured eigenvalues-only.
    pub profile: Option<DVector<f64>>,
    /// `|‖ψ‖² - 1|` of the raw solver output before normalization: a
    /// quality metric, recorded rather than discarded.
    pub normalization_residual: f64,
    /// Amplitude-normalized boundary-condition residuals `(left, right)`.
    pub bc_residuals: (f64, f64),
    /// Set when this eigenvalue sits within the degeneracy tolerance of an
    /// adjacent one. Degenerate pairs are retained, never merged.
    pub degenerate: bool,
}

// =================================================================================================
// Mode Set
// =================================================================================================

/// The lowest-K eigenpairs of one scenario, with the grid they live on.
#[derive(Debug, Clone)]
pub struct ModeSet {
    /// Method that produced this set.
    pub method: SolverMethod,
    /// Grid nodes.
    pub nodes: DVector<f64>,
    /// Quadrature weights matching `nodes`.
    pub weights: DVector<f64>,
    /// Eigenpairs in ascending eigenvalue order.
    pub pairs: Vec<Eigenpair>,
}

impl ModeSet {
    /// Eigenvalues in ascending order.
    pub fn eigenvalues(&self) -> Vec<f64> {
        self.pairs.iter().map(|p| p.value).collect()
    }

    /// Number of modes.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Quadrature inner product `⟨ψ_m, ψ_n⟩`, when both profiles exist.
    pub fn overlap(&self, m: usize, n: usize) -> Option<f64> {
        let a = self.pairs.get(m)?.profile.as_ref()?;
        let b = self.pairs.get(n)?.profile.as_ref()?;
        Some(
            self.weights
                .iter()
                .zip(a.iter().zip(b.iter()))
                .map(|(w, (x, y))| w * x * y)
                .sum(),
        )
    }

    /// Largest `|⟨ψ_m, ψ_n⟩|` over all distinct pairs: the orthogonality
    /// defect of the whole set. Zero when fewer than two profiles exist.
    pub fn max_cross_overlap(&self) -> f64 {
        let mut worst: f64 = 0.0;
        for m in 0..self.len() {
            for n in (m + 1)..self.len() {
                if let Some(overlap) = self.overlap(m, n) {
                    worst = worst.max(overlap.abs());
                }
            }
        }
        worst
    }

    /// Quadrature norm defect `|‖ψ_n‖² - 1|` of a stored profile.
    pub fn norm_defect(&self, n: usize) -> Option<f64> {
        let overlap = self.overlap(n, n)?;
        Some((overlap - 1.0).abs())
    }

    /// Flag adjacent eigenvalues closer than `relative_tolerance` as
    /// degenerate. Both members of a flagged pair are retained.
    pub fn flag_degeneracies(&mut self, relative_tolerance: f64) {
        for i in 1..self.pairs.len() {
            let a = self.pairs[i - 1].value;
            let b = self.pairs[i].value;
            let scale = a.abs().max(b.abs());
            let degenerate = if scale == 0.0 {
                true
            } else {
                (b - a).abs() <= relative_tolerance * scale
            };
            if degenerate {
                self.pairs[i - 1].degenerate = true;
                self.pairs[i].degenerate = true;
            }
        }
    }
}

// =================================================================================================
// Tests
// =================================================================================================
