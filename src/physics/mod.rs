//! Potential library
//!
//! This module defines WHAT operator the engine diagonalizes:
//! - [`Potential`]: closed enum of potential families with typed parameters
//! - [`analytic_eigenvalues`]: closed-form benchmark spectra for the
//!   families that admit them (consumed by the V0 verification tier)
//!
//! Everything here is a pure function of position and parameters; the
//! discretization and solution machinery lives in [`crate::solver`].

mod analytic;
mod potential;

pub use analytic::{analytic_eigenvalues, poschl_teller_bound_count, poschl_teller_eta};
pub use potential::{
    DomainWall, DoubleWell, ExponentialTail, Harmonic, PoschlTeller, Potential, SquareWell,
    Volcano,
};
