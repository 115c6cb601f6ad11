//! Eigenvalue solvers
//!
//! # Core Concepts
//!
//! ## The Architecture (WHAT vs HOW)
//!
//! The solver architecture separates concerns into three layers:
//!
//! 1. **Scenario** ([`Scenario`]) - WHAT to solve
//!    - Potential (equations)
//!    - Domain and grid
//!    - Boundary conditions
//!
//! 2. **Configuration** ([`EigenConfig`]) - HOW MUCH to solve
//!    - Number of modes, profile computation flag
//!    - Root-finding budgets ([`SolveBudget`])
//!
//! 3. **Solver** ([`EigenSolver`] trait) - the numerical method
//!    - [`FiniteDifferenceSolver`] or [`ShootingSolver`]
//!    - Independent of the potential library
//!
//! This separation is what lets the V1 verification tier push one scenario
//! through both methods and demand agreement.
//!
//! # Module Organization
//!
//! - **`domain`**: grids and quadrature weights
//! - **`boundary`**: boundary conditions and residual evaluation
//! - **`scenario`**: problem definition and validation
//! - **`traits`**: the stable solver interface and configuration
//! - **`methods`**: the two concrete solvers
//!
//! # Workflow
//!
//! ```text
//! Potential ──┐
//! Domain    ──┼──► Scenario ──► EigenSolver ──► ModeSet ──► postprocess
//! Boundary  ──┘                 (FD | shoot)    (λ, ψ)      (N_bound, I₄)
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use sturm_rs::physics::{Potential, PoschlTeller};
//! use sturm_rs::solver::{
//!     BoundaryPair, Domain, EigenConfig, EigenSolver, FiniteDifferenceSolver, Scenario,
//! };
//!
//! let scenario = Scenario::new(
//!     Potential::PoschlTeller(PoschlTeller { depth: 6.0, width: 1.0 }),
//!     Domain::interval(-10.0, 10.0, 400).unwrap(),
//!     BoundaryPair::dirichlet(),
//! );
//! let modes = FiniteDifferenceSolver::new()
//!     .solve(&scenario, &EigenConfig::new(2))
//!     .unwrap();
//! assert!((modes.eigenvalues()[0] + 4.0).abs() < 0.01);
//! ```

mod boundary;
mod domain;
mod methods;
mod scenario;
mod traits;

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use boundary::{boundary_residuals, BoundaryCondition, BoundaryPair};
pub use domain::{Domain, GridType, MIN_GRID_POINTS};
pub use methods::{FiniteDifferenceSolver, ShootingSolver, TridiagonalOperator};
pub use scenario::{Scenario, DEFAULT_CUTOFF_MARGIN};
pub use traits::{solver_for, EigenConfig, EigenSolver, SolveBudget, SolverMethod};
