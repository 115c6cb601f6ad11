//! Eigenproblem scenario definition
//!
//! A scenario combines a potential, a domain and boundary conditions.
//!
//! # Design
//!
//! The same scenario can be solved with different numerical methods: it is
//! the "WHAT to solve" (not "HOW to solve"). Scenarios are immutable value
//! objects, constructed fresh per evaluation; a sweep never mutates one.

use nalgebra::DVector;

use crate::error::ConfigurationError;
use crate::physics::Potential;
use crate::solver::boundary::BoundaryPair;
use crate::solver::domain::Domain;

/// Default multiple of the potential's decay length that a half-line cutoff
/// must exceed.
pub const DEFAULT_CUTOFF_MARGIN: f64 = 6.0;

/// One eigenproblem: potential + domain + boundary conditions.
///
/// # Example
///
/// ```rust
/// use sturm_rs::physics::{Potential, PoschlTeller};
/// use sturm_rs::solver::{BoundaryPair, Domain, Scenario};
///
/// let scenario = Scenario::new(
///     Potential::PoschlTeller(PoschlTeller { depth: 6.0, width: 1.0 }),
///     Domain::interval(-10.0, 10.0, 400).unwrap(),
///     BoundaryPair::dirichlet(),
/// );
/// assert!(scenario.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scenario {
    /// The potential (equations).
    pub potential: Potential,
    /// The computational domain and grid.
    pub domain: Domain,
    /// Boundary conditions at the two endpoints.
    pub boundaries: BoundaryPair,
    /// Half-line cutoff margin in units of the potential's decay length.
    cutoff_margin: f64,
}

impl Scenario {
    /// Create a scenario with the default cutoff margin.
    pub fn new(potential: Potential, domain: Domain, boundaries: BoundaryPair) -> Self {
        Self {
            potential,
            domain,
            boundaries,
            cutoff_margin: DEFAULT_CUTOFF_MARGIN,
        }
    }

    /// Override the half-line cutoff margin.
    pub fn with_cutoff_margin(mut self, margin: f64) -> Self {
        self.cutoff_margin = margin;
        self
    }

    /// Same problem on a different domain (used by the V2 stability checks).
    pub fn with_domain(&self, domain: Domain) -> Self {
        Self { domain, ..*self }
    }

    /// The potential sampled on the domain's grid nodes.
    pub fn sampled_potential(&self) -> DVector<f64> {
        self.domain.nodes().map(|x| self.potential.evaluate(x))
    }

    /// Validate the whole configuration: potential parameters, domain,
    /// boundary conditions, and the half-line cutoff margin.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.potential.validate()?;
        self.domain.validate()?;
        self.boundaries.validate()?;

        // A half-line cutoff must resolve the potential's tail, otherwise
        // "bound state" loses its meaning on the truncated problem.
        if self.domain.is_half_line() {
            if let Some(decay) = self.potential.characteristic_length() {
                let required = self.cutoff_margin * decay;
                if self.domain.x_max() < required {
                    return Err(ConfigurationError::CutoffTooShort {
                        x_max: self.domain.x_max(),
                        required,
                    });
                }
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} on {} with {}",
            self.potential, self.domain, self.boundaries
        )
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{ExponentialTail, PoschlTeller};

    #[test]
    fn test_scenario_validates_all_parts() {
        let scenario = Scenario::new(
            Potential::PoschlTeller(PoschlTeller {
                depth: 6.0,
                width: 1.0,
            }),
            Domain::interval(-10.0, 10.0, 400).unwrap(),
            BoundaryPair::dirichlet(),
        );
        assert!(scenario.validate().is_ok());
    }

    #[test]
    fn test_bad_potential_parameters_rejected() {
        let scenario = Scenario::new(
            Potential::PoschlTeller(PoschlTeller {
                depth: -6.0,
                width: 1.0,
            }),
            Domain::interval(-10.0, 10.0, 400).unwrap(),
            BoundaryPair::dirichlet(),
        );
        assert!(scenario.validate().is_err());
    }

    #[test]
    fn test_half_line_cutoff_margin() {
        // Decay length 2.0 with the default margin 6 needs x_max ≥ 12.
        let tail = Potential::ExponentialTail(ExponentialTail {
            depth: 8.0,
            decay: 2.0,
        });
        let short = Scenario::new(
            tail,
            Domain::half_line(5.0, 200).unwrap(),
            BoundaryPair::dirichlet(),
        );
        assert!(matches!(
            short.validate(),
            Err(ConfigurationError::CutoffTooShort { .. })
        ));

        let long = Scenario::new(
            tail,
            Domain::half_line(15.0, 200).unwrap(),
            BoundaryPair::dirichlet(),
        );
        assert!(long.validate().is_ok());

        // A looser margin admits the short cutoff.
        assert!(short.with_cutoff_margin(2.0).validate().is_ok());
    }

    #[test]
    fn test_sampled_potential_matches_nodes() {
        let scenario = Scenario::new(
            Potential::PoschlTeller(PoschlTeller {
                depth: 6.0,
                width: 1.0,
            }),
            Domain::interval(-10.0, 10.0, 401).unwrap(),
            BoundaryPair::dirichlet(),
        );
        let v = scenario.sampled_potential();
        assert_eq!(v.len(), 401);
        // Center node of the symmetric grid sits at the minimum.
        assert!((v[200] + 6.0).abs() < 1e-12);
    }
}
