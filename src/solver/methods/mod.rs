//! Numerical methods for the eigenvalue problem
//!
//! Concrete implementations of the [`EigenSolver`](crate::solver::EigenSolver)
//! trait. The two methods are deliberately independent (they share no
//! discretization code) because their agreement is itself a verification
//! tier (V1): a bug common to both would have to be a coincidence across a
//! matrix eigensolver and an ODE integrator.
//!
//! - **[`FiniteDifferenceSolver`]**: weak-form tridiagonal discretization,
//!   Sturm-sequence bisection, inverse-iteration eigenvectors. Second-order
//!   in the grid spacing; works on uniform and Chebyshev grids.
//! - **[`ShootingSolver`]**: Numerov integration from the left boundary,
//!   bisection on the right-boundary mismatch. Fourth-order; uniform grids
//!   only.

mod finite_difference;
mod shooting;

pub use finite_difference::{FiniteDifferenceSolver, TridiagonalOperator};
pub use shooting::ShootingSolver;
