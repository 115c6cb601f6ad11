//! Common utilities for integration tests

pub mod test_helpers;

// Re-export commonly used items
#[allow(unused_imports)]
pub use test_helpers::{
    assert_ascending, box_scenario, harmonic_scenario, poschl_teller_scenario, relative_error,
};
