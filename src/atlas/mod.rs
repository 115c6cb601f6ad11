//! Phase-atlas sweeps
//!
//! Maps out which parameter combinations of a potential family produce a
//! target bound-state count:
//!
//! - [`ParameterGrid`] / [`ParameterAxis`]: the declarative Cartesian
//!   product over typed parameter ranges
//! - [`PhaseAtlas`]: drives every point through the solve → postprocess
//!   pipeline, isolating per-point failures
//! - [`RobustRegion`]: the target region with its interior (ε-ball) and
//!   gap-margin robustness classification
//!
//! Enable the `parallel` cargo feature to evaluate points on a rayon pool;
//! results are identical to the sequential sweep.

mod region;
mod sweep;

pub use region::{RegionClass, RegionSummary, RobustRegion};
pub use sweep::{
    AtlasResult, ParameterAxis, ParameterGrid, ParameterPoint, PhaseAtlas, PointRecord,
    PointStatus, SweepConfig,
};
