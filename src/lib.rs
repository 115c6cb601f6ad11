//! sturm-rs: 1-D Eigenvalue/BVP Verification Engine
//!
//! A reusable solver for mode spectra of the Sturm-Liouville operator
//! `-d²/dx² + V(x)` under mixed Dirichlet/Neumann/Robin boundary
//! conditions, with a tiered verification ladder and parameter-space
//! phase-atlas sweeps.
//!
//! # Architecture
//!
//! sturm-rs is built on two core principles:
//!
//! 1. **Separation of physics and numerics**
//!    - The potential library defines WHAT operator to diagonalize
//!    - Two independent numerical methods define HOW
//!
//! 2. **Verification as a first-class output**
//!    - Every claim a solve makes can be gated through V0 (analytic
//!      benchmarks), V1 (cross-method agreement) and V2 (stability)
//!    - Failures carry the check name, the numbers and the tolerance,
//!      so reports are auditable without re-running
//!
//! # Pipeline
//!
//! ```text
//! Potential ──► Scenario ──► EigenSolver ──► ModeSet ──► postprocess
//!                  │          (FD | shooting)   │         (N_bound, I₄)
//!                  │                            ▼
//!                  │                   Verification Ladder ──► GateReport
//!                  ▼
//!             Phase Atlas ──► RobustRegion (robust | fine-tuned)
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use sturm_rs::prelude::*;
//!
//! // 1. Define WHAT to solve
//! let scenario = Scenario::new(
//!     Potential::PoschlTeller(PoschlTeller { depth: 6.0, width: 1.0 }),
//!     Domain::interval(-10.0, 10.0, 1600).unwrap(),
//!     BoundaryPair::dirichlet(),
//! );
//!
//! // 2. Solve for the lowest modes
//! let modes = FiniteDifferenceSolver::new()
//!     .solve(&scenario, &EigenConfig::new(3))
//!     .unwrap();
//!
//! // 3. Classify against the intrinsic threshold
//! let summary = SpectralSummary::classify(
//!     &scenario.potential,
//!     &modes.eigenvalues(),
//!     1e-4,
//! );
//! assert_eq!(summary.n_bound, 2);
//!
//! // 4. Gate the result
//! let report = VerificationLadder::new()
//!     .run(&scenario, SolverMethod::FiniteDifference, &EigenConfig::new(2))
//!     .unwrap();
//! assert!(report.passed());
//! ```
//!
//! # Modules
//!
//! - [`physics`]: potential families and closed-form benchmark spectra
//! - [`solver`]: domains, boundary conditions, the two eigensolvers
//! - [`spectrum`]: eigenpairs, normalization, bound-state classification
//! - [`verification`]: the V0/V1/V2 ladder and its tolerance profile
//! - [`atlas`]: parameter-space sweeps and robust-region analysis
//! - [`output`]: the gate-report data contract and CSV/Markdown writers
//! - [`error`]: the error taxonomy
//!
//! # Features
//!
//! - `parallel`: evaluate phase-atlas points on a rayon pool. Results are
//!   identical to the sequential sweep; this is purely a speed option.

pub mod atlas;
pub mod error;
pub mod output;
pub mod physics;
pub mod solver;
pub mod spectrum;
pub mod verification;

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //! use sturm_rs::prelude::*;
    //! ```
    pub use crate::atlas::{
        ParameterAxis, ParameterGrid, PhaseAtlas, RegionClass, RobustRegion, SweepConfig,
    };
    pub use crate::error::{ConfigurationError, ConvergenceError, SolverError};
    pub use crate::output::{EvaluationRecord, GateReport, RunContext};
    pub use crate::physics::{Harmonic, PoschlTeller, Potential, SquareWell};
    pub use crate::solver::{
        BoundaryCondition, BoundaryPair, Domain, EigenConfig, EigenSolver,
        FiniteDifferenceSolver, GridType, Scenario, ShootingSolver, SolverMethod,
    };
    pub use crate::spectrum::{ModeSet, SpectralSummary};
    pub use crate::verification::{ToleranceProfile, VerificationLadder};
}
