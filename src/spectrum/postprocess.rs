//! Derived spectral quantities
//!
//! Bound-state counts against the intrinsic essential-spectrum threshold,
//! overlap integrals, gap margins, and the boundary-ambiguity
//! classification. Everything here is a pure function of its inputs; in
//! particular the threshold λ_th is recomputed fresh from the potential on
//! every call; it is never cached across potentials.

use nalgebra::DVector;

use crate::physics::Potential;

// =================================================================================================
// Mode classification
// =================================================================================================

/// Classification of one eigenvalue against the essential-spectrum
/// threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeClass {
    /// λ < λ_th - ε: a bound state.
    Bound,
    /// λ > λ_th + ε: above the threshold.
    Unbound,
    /// |λ - λ_th| ≤ ε: too close to the threshold to call. Reported as its
    /// own status, merged into neither count.
    BoundaryAmbiguous,
}

impl std::fmt::Display for ModeClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ModeClass::Bound => "bound",
            ModeClass::Unbound => "unbound",
            ModeClass::BoundaryAmbiguous => "boundary_ambiguous",
        };
        write!(f, "{}", label)
    }
}

/// Per-spectrum classification summary.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralSummary {
    /// The threshold λ_th used, derived from the potential's asymptotics.
    pub threshold: f64,
    /// Per-mode classification, same order as the eigenvalues.
    pub classes: Vec<ModeClass>,
    /// Number of modes classified `Bound`.
    pub n_bound: usize,
    /// Number of modes classified `BoundaryAmbiguous`.
    pub n_ambiguous: usize,
}

impl SpectralSummary {
    /// Classify `eigenvalues` against the intrinsic threshold of
    /// `potential`. The threshold comes from
    /// [`Potential::asymptotic_value`] on this call, never from an
    /// external target, never from a cache.
    pub fn classify(
        potential: &Potential,
        eigenvalues: &[f64],
        ambiguity_epsilon: f64,
    ) -> Self {
        let threshold = potential.asymptotic_value();
        let classes: Vec<ModeClass> = eigenvalues
            .iter()
            .map(|&value| {
                if threshold.is_infinite() {
                    // No continuum: every finite eigenvalue is bound.
                    ModeClass::Bound
                } else if (value - threshold).abs() <= ambiguity_epsilon {
                    ModeClass::BoundaryAmbiguous
                } else if value < threshold {
                    ModeClass::Bound
                } else {
                    ModeClass::Unbound
                }
            })
            .collect();
        let n_bound = classes.iter().filter(|c| **c == ModeClass::Bound).count();
        let n_ambiguous = classes
            .iter()
            .filter(|c| **c == ModeClass::BoundaryAmbiguous)
            .count();
        Self {
            threshold,
            classes,
            n_bound,
            n_ambiguous,
        }
    }
}

/// Count eigenvalues strictly below `threshold - epsilon`.
///
/// A pure function of its arguments: calling it twice on the same slice
/// yields the same integer.
pub fn bound_state_count(eigenvalues: &[f64], threshold: f64, epsilon: f64) -> usize {
    if threshold.is_infinite() {
        return eigenvalues.len();
    }
    eigenvalues
        .iter()
        .filter(|&&value| value < threshold - epsilon)
        .count()
}

// =================================================================================================
// Quadrature quantities
// =================================================================================================

/// Rescale `profile` to unit quadrature norm, returning the
/// pre-normalization residual `|‖ψ‖² - 1|`.
///
/// The weights must be the same quadrature weights the discretization was
/// built with; mixing weight sets is how normalization checks go quietly
/// wrong.
pub fn normalize_profile(profile: &mut DVector<f64>, weights: &DVector<f64>) -> f64 {
    let norm_sq: f64 = weights
        .iter()
        .zip(profile.iter())
        .map(|(w, p)| w * p * p)
        .sum();
    let residual = (norm_sq - 1.0).abs();
    if norm_sq > 0.0 {
        *profile /= norm_sq.sqrt();
    }
    residual
}

/// Overlap integral `I_k = ∫ |ψ(x)|^k dx` by quadrature on the
/// discretization grid.
pub fn overlap_integral(
    profile: &DVector<f64>,
    weights: &DVector<f64>,
    exponent: u32,
) -> f64 {
    weights
        .iter()
        .zip(profile.iter())
        .map(|(w, p)| w * p.abs().powi(exponent as i32))
        .sum()
}

/// Relative spacing between the `target`-th and `(target+1)`-th eigenvalue
/// (0-indexed: between `eigenvalues[target-1]` and `eigenvalues[target]`).
///
/// `None` when fewer than `target + 1` eigenvalues are available. The gap
/// is measured relative to the larger of the two magnitudes, with a small
/// absolute floor so a gap around a zero crossing still reads as large.
pub fn gap_margin(eigenvalues: &[f64], target: usize) -> Option<f64> {
    if target == 0 || eigenvalues.len() <= target {
        return None;
    }
    let below = eigenvalues[target - 1];
    let above = eigenvalues[target];
    let scale = below.abs().max(above.abs()).max(f64::EPSILON);
    Some((above - below) / scale)
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{Harmonic, PoschlTeller};

    #[test]
    fn test_classification_against_intrinsic_threshold() {
        let well = Potential::PoschlTeller(PoschlTeller {
            depth: 6.0,
            width: 1.0,
        });
        let summary = SpectralSummary::classify(&well, &[-4.0, -1.0, 0.03, 0.14], 1e-4);
        assert_eq!(summary.threshold, 0.0);
        assert_eq!(summary.n_bound, 2);
        assert_eq!(summary.n_ambiguous, 0);
        assert_eq!(summary.classes[2], ModeClass::Unbound);
    }

    #[test]
    fn test_boundary_ambiguous_is_neither_bound_nor_unbound() {
        let well = Potential::PoschlTeller(PoschlTeller {
            depth: 6.0,
            width: 1.0,
        });
        let summary = SpectralSummary::classify(&well, &[-4.0, -5e-5, 0.3], 1e-4);
        assert_eq!(summary.n_bound, 1);
        assert_eq!(summary.n_ambiguous, 1);
        assert_eq!(summary.classes[1], ModeClass::BoundaryAmbiguous);
    }

    #[test]
    fn test_confined_potential_binds_everything() {
        let osc = Potential::Harmonic(Harmonic { omega: 1.0 });
        let summary = SpectralSummary::classify(&osc, &[1.0, 3.0, 5.0], 1e-4);
        assert_eq!(summary.n_bound, 3);
        assert!(summary.threshold.is_infinite());
    }

    #[test]
    fn test_bound_state_count_is_idempotent() {
        let eigenvalues = [-4.0, -1.0, 0.033, 0.135];
        let first = bound_state_count(&eigenvalues, 0.0, 1e-4);
        let second = bound_state_count(&eigenvalues, 0.0, 1e-4);
        assert_eq!(first, 2);
        assert_eq!(first, second);
    }

    #[test]
    fn test_normalize_profile_reports_residual() {
        let n = 101;
        let h = 1.0 / (n as f64 - 1.0);
        let weights = DVector::from_fn(n, |i, _| {
            if i == 0 || i == n - 1 {
                h / 2.0
            } else {
                h
            }
        });
        let mut profile = DVector::from_element(n, 2.0);
        // ∫ 4 dx = 4 on [0,1] → residual 3 before normalization.
        let residual = normalize_profile(&mut profile, &weights);
        assert!((residual - 3.0).abs() < 1e-12);
        let norm_sq: f64 = weights
            .iter()
            .zip(profile.iter())
            .map(|(w, p)| w * p * p)
            .sum();
        assert!((norm_sq - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_overlap_integral_of_constant_mode() {
        let n = 201;
        let h = 1.0 / (n as f64 - 1.0);
        let weights = DVector::from_fn(n, |i, _| {
            if i == 0 || i == n - 1 {
                h / 2.0
            } else {
                h
            }
        });
        // ψ ≡ 1 on [0,1]: I_4 = 1 exactly under any quadrature.
        let profile = DVector::from_element(n, 1.0);
        let i4 = overlap_integral(&profile, &weights, 4);
        assert!((i4 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_gap_margin() {
        // Target 3: margin between the 3rd (index 2) and 4th (index 3).
        let eigenvalues = [-5.2, -1.9, -0.22, 0.07];
        let margin = gap_margin(&eigenvalues, 3).unwrap();
        assert!((margin - (0.07 + 0.22) / 0.22).abs() < 1e-12);

        assert!(gap_margin(&eigenvalues, 4).is_none());
        assert!(gap_margin(&eigenvalues, 0).is_none());
    }
}
