//! Potential families
//!
//! # Design
//!
//! Every potential the engine knows about is one variant of the closed
//! [`Potential`] enum, carrying its own typed parameter struct. Dispatch is
//! by pattern matching, so adding a family means the compiler walks you
//! through every place that must handle it; there is no string lookup and
//! no "unknown potential type" runtime error.
//!
//! All families are pure functions of position: a `Potential` is an
//! immutable value object constructed once and never mutated.
//!
//! # Conventions
//!
//! The operator is `-d²/dx² + V(x)` in dimensionless units. Wells are
//! negative (`depth > 0` means the minimum sits at `-depth`), and the
//! essential-spectrum threshold is the potential's asymptotic value as
//! `|x| → ∞`, computed intrinsically by [`Potential::asymptotic_value`].

use crate::error::ConfigurationError;

// =================================================================================================
// Parameter structs
// =================================================================================================

/// Finite square well: `V(x) = -depth` for `|x| ≤ width/2`, `0` outside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SquareWell {
    /// Well depth V₀ (> 0).
    pub depth: f64,
    /// Full width of the well (> 0).
    pub width: f64,
}

/// Harmonic oscillator: `V(x) = (omega·x)²`.
///
/// Closed-form eigenvalues `(2n+1)·omega`; `omega = 1` is the unit
/// oscillator with spectrum 1, 3, 5, …
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Harmonic {
    /// Oscillator frequency (> 0).
    pub omega: f64,
}

/// Pöschl-Teller well: `V(x) = -depth · sech²(x/width)`.
///
/// With `eta(eta+1) = depth·width²`, the bound spectrum is
/// `-(eta - n)²/width²` for integer `n < eta`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoschlTeller {
    /// Well depth V₀ (> 0).
    pub depth: f64,
    /// Length scale a (> 0).
    pub width: f64,
}

/// Volcano profile: a local barrier rising out of a well, decaying to zero.
///
/// `V(x) = (barrier·(x/width)² - depth) · exp(-(x/width)²/2)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volcano {
    /// Central well depth (> 0).
    pub depth: f64,
    /// Rim height coefficient (≥ 0).
    pub barrier: f64,
    /// Length scale of the profile (> 0).
    pub width: f64,
}

/// Symmetric double well: `V(x) = barrier · ((x/separation)² - 1)²`.
///
/// Minima at `x = ±separation`, central barrier of height `barrier`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoubleWell {
    /// Barrier height at x = 0 (> 0).
    pub barrier: f64,
    /// Half-distance between the two minima (> 0).
    pub separation: f64,
}

/// Exponential tail well: `V(x) = -depth · exp(-|x|/decay)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialTail {
    /// Depth at the origin (> 0).
    pub depth: f64,
    /// Decay length of the tail (> 0).
    pub decay: f64,
}

/// Domain-wall profile: `V(x) = height · tanh²(x/width)`.
///
/// Interpolates between 0 at the wall core and `height` far away; the
/// essential spectrum starts at `height`, not at zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainWall {
    /// Asymptotic plateau height (> 0).
    pub height: f64,
    /// Wall thickness (> 0).
    pub width: f64,
}

// =================================================================================================
// Potential
// =================================================================================================

/// A closed set of potential families.
///
/// # Design
///
/// One variant per family, each with a typed parameter struct; see module
/// docs for the rationale. The [`InfiniteBox`](Potential::InfiniteBox)
/// variant has no parameters: the box *is* the domain together with
/// Dirichlet walls, and `V ≡ 0` inside.
///
/// # Example
///
/// ```rust
/// use sturm_rs::physics::{Potential, PoschlTeller};
///
/// let well = Potential::PoschlTeller(PoschlTeller { depth: 6.0, width: 1.0 });
/// assert_eq!(well.evaluate(0.0), -6.0);
/// assert_eq!(well.asymptotic_value(), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Potential {
    /// Finite square well.
    SquareWell(SquareWell),
    /// Harmonic oscillator.
    Harmonic(Harmonic),
    /// Pöschl-Teller well.
    PoschlTeller(PoschlTeller),
    /// Volcano profile.
    Volcano(Volcano),
    /// Symmetric double well.
    DoubleWell(DoubleWell),
    /// Exponential tail well.
    ExponentialTail(ExponentialTail),
    /// Domain wall.
    DomainWall(DomainWall),
    /// Infinite box: `V ≡ 0`, confinement supplied by Dirichlet walls.
    InfiniteBox,
}

impl Potential {
    /// Evaluate `V(x)`.
    pub fn evaluate(&self, x: f64) -> f64 {
        match self {
            Potential::SquareWell(p) => {
                if x.abs() <= p.width / 2.0 {
                    -p.depth
                } else {
                    0.0
                }
            }
            Potential::Harmonic(p) => (p.omega * x).powi(2),
            Potential::PoschlTeller(p) => {
                let s = 1.0 / (x / p.width).cosh();
                -p.depth * s * s
            }
            Potential::Volcano(p) => {
                let u = (x / p.width).powi(2);
                (p.barrier * u - p.depth) * (-u / 2.0).exp()
            }
            Potential::DoubleWell(p) => {
                let u = (x / p.separation).powi(2) - 1.0;
                p.barrier * u * u
            }
            Potential::ExponentialTail(p) => -p.depth * (-x.abs() / p.decay).exp(),
            Potential::DomainWall(p) => {
                let t = (x / p.width).tanh();
                p.height * t * t
            }
            Potential::InfiniteBox => 0.0,
        }
    }

    /// Asymptotic value `lim_{|x|→∞} V(x)`, the essential-spectrum
    /// threshold λ_th.
    ///
    /// Intrinsically confined families (harmonic, double well, infinite box)
    /// have no continuum; their threshold is `+∞` and every eigenvalue is a
    /// bound state.
    pub fn asymptotic_value(&self) -> f64 {
        match self {
            Potential::SquareWell(_)
            | Potential::PoschlTeller(_)
            | Potential::Volcano(_)
            | Potential::ExponentialTail(_) => 0.0,
            Potential::DomainWall(p) => p.height,
            Potential::Harmonic(_) | Potential::DoubleWell(_) | Potential::InfiniteBox => {
                f64::INFINITY
            }
        }
    }

    /// Characteristic decay length of the potential's tail, when it has one.
    ///
    /// `None` for intrinsically confined families: there is no tail to
    /// resolve, so half-line cutoff validation does not apply to them.
    pub fn characteristic_length(&self) -> Option<f64> {
        match self {
            Potential::SquareWell(p) => Some(p.width),
            Potential::PoschlTeller(p) => Some(p.width),
            Potential::Volcano(p) => Some(p.width),
            Potential::ExponentialTail(p) => Some(p.decay),
            Potential::DomainWall(p) => Some(p.width),
            Potential::Harmonic(_) | Potential::DoubleWell(_) | Potential::InfiniteBox => None,
        }
    }

    /// Family name, used in records and reports.
    pub fn name(&self) -> &'static str {
        match self {
            Potential::SquareWell(_) => "square_well",
            Potential::Harmonic(_) => "harmonic",
            Potential::PoschlTeller(_) => "poschl_teller",
            Potential::Volcano(_) => "volcano",
            Potential::DoubleWell(_) => "double_well",
            Potential::ExponentialTail(_) => "exponential_tail",
            Potential::DomainWall(_) => "domain_wall",
            Potential::InfiniteBox => "infinite_box",
        }
    }

    /// Named parameters for records and sweep keys.
    pub fn parameters(&self) -> Vec<(&'static str, f64)> {
        match self {
            Potential::SquareWell(p) => vec![("depth", p.depth), ("width", p.width)],
            Potential::Harmonic(p) => vec![("omega", p.omega)],
            Potential::PoschlTeller(p) => vec![("depth", p.depth), ("width", p.width)],
            Potential::Volcano(p) => vec![
                ("depth", p.depth),
                ("barrier", p.barrier),
                ("width", p.width),
            ],
            Potential::DoubleWell(p) => {
                vec![("barrier", p.barrier), ("separation", p.separation)]
            }
            Potential::ExponentialTail(p) => vec![("depth", p.depth), ("decay", p.decay)],
            Potential::DomainWall(p) => vec![("height", p.height), ("width", p.width)],
            Potential::InfiniteBox => vec![],
        }
    }

    /// Validate parameter ranges.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        fn positive(name: &'static str, value: f64) -> Result<(), ConfigurationError> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(ConfigurationError::NonPositiveParameter { name, value })
            }
        }

        match self {
            Potential::SquareWell(p) => {
                positive("depth", p.depth)?;
                positive("width", p.width)
            }
            Potential::Harmonic(p) => positive("omega", p.omega),
            Potential::PoschlTeller(p) => {
                positive("depth", p.depth)?;
                positive("width", p.width)
            }
            Potential::Volcano(p) => {
                positive("depth", p.depth)?;
                positive("width", p.width)?;
                if p.barrier >= 0.0 && p.barrier.is_finite() {
                    Ok(())
                } else {
                    Err(ConfigurationError::NonPositiveParameter {
                        name: "barrier",
                        value: p.barrier,
                    })
                }
            }
            Potential::DoubleWell(p) => {
                positive("barrier", p.barrier)?;
                positive("separation", p.separation)
            }
            Potential::ExponentialTail(p) => {
                positive("depth", p.depth)?;
                positive("decay", p.decay)
            }
            Potential::DomainWall(p) => {
                positive("height", p.height)?;
                positive("width", p.width)
            }
            Potential::InfiniteBox => Ok(()),
        }
    }
}

impl std::fmt::Display for Potential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())?;
        let params = self.parameters();
        if !params.is_empty() {
            write!(f, "(")?;
            for (i, (name, value)) in params.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}={}", name, value)?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

// =================================================================================================
// Tests
// =================================================================================================
