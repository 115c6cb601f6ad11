//! Robust-region analysis
//!
//! # Design
//!
//! The robust region `R_target` is the set of grid points whose bound-state
//! count equals the sweep target. A physically meaningful region must have
//! a non-empty *interior* (an ε-ball, not an isolated point or a thin
//! curve), and its spectral gaps must be wide enough that the count is not
//! one near-degeneracy away from changing.
//!
//! On a discrete grid the open-ball criterion becomes: a member point is
//! **interior** when every ±1-step neighbour along every swept axis exists
//! and is also a member (axes holding a single fixed value are ignored).
//! The region is classified:
//!
//! - [`RegionClass::Robust`]: some interior point clears the gap-margin
//!   threshold together with all of its neighbours
//! - [`RegionClass::FineTuned`]: members exist but none satisfy the above
//! - [`RegionClass::Empty`]: no members at all

use std::collections::{HashMap, HashSet};

use crate::atlas::sweep::AtlasResult;

// =================================================================================================
// Region classification
// =================================================================================================

/// Robustness verdict for a target region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionClass {
    /// No parameter point produced the target count.
    Empty,
    /// Only isolated points or thin sets produced the target count.
    FineTuned,
    /// The region contains a grid ball with adequate gap margins.
    Robust,
}

impl std::fmt::Display for RegionClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RegionClass::Empty => "empty",
            RegionClass::FineTuned => "fine_tuned",
            RegionClass::Robust => "robust",
        };
        write!(f, "{}", label)
    }
}

/// Aggregate robustness metrics for a region.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionSummary {
    /// Classification verdict.
    pub class: RegionClass,
    /// Number of member points (the region's grid volume).
    pub volume: usize,
    /// Number of interior points.
    pub interior_count: usize,
    /// Erosion depth: how many grid steps the region extends inward from
    /// its boundary at the deepest point.
    pub boundary_distance: usize,
    /// Smallest gap margin over the interior points, when any exist.
    pub min_interior_gap_margin: Option<f64>,
}

// =================================================================================================
// Robust Region
// =================================================================================================

/// The target-count region of one sweep, with interior/robustness queries.
#[derive(Debug, Clone)]
pub struct RobustRegion {
    shape: Vec<usize>,
    members: HashSet<Vec<usize>>,
    gap_margins: HashMap<Vec<usize>, f64>,
    gap_margin_min: f64,
}

impl RobustRegion {
    /// Extract the region from a sweep result.
    pub fn from_result(result: &AtlasResult) -> Self {
        let mut members = HashSet::new();
        let mut gap_margins = HashMap::new();
        for record in &result.records {
            if record.is_on_target() {
                members.insert(record.point.indices.clone());
                gap_margins.insert(
                    record.point.indices.clone(),
                    record.gap_margin.unwrap_or(f64::INFINITY),
                );
            }
        }
        Self {
            shape: result.shape.clone(),
            members,
            gap_margins,
            gap_margin_min: result.gap_margin_min,
        }
    }

    /// Number of member points.
    pub fn volume(&self) -> usize {
        self.members.len()
    }

    /// Membership test.
    pub fn contains(&self, indices: &[usize]) -> bool {
        self.members.contains(indices)
    }

    /// Gap margin recorded at a member point.
    pub fn gap_margin(&self, indices: &[usize]) -> Option<f64> {
        self.gap_margins.get(indices).copied()
    }

    /// The ±1-step neighbours of a point along every swept (length > 1)
    /// axis, or `None` when the point touches the grid edge (such a point
    /// can never be interior).
    fn neighbours(&self, indices: &[usize]) -> Option<Vec<Vec<usize>>> {
        let mut result = Vec::new();
        for (d, &extent) in self.shape.iter().enumerate() {
            if extent <= 1 {
                continue;
            }
            let i = indices[d];
            if i == 0 || i + 1 >= extent {
                return None;
            }
            let mut lower = indices.to_vec();
            lower[d] = i - 1;
            let mut upper = indices.to_vec();
            upper[d] = i + 1;
            result.push(lower);
            result.push(upper);
        }
        Some(result)
    }

    /// Interior member points: every axis neighbour exists and is a member.
    ///
    /// A grid with no swept axis (every axis pinned to one value) has no
    /// interior; a single point cannot contain a ball.
    pub fn interior(&self) -> Vec<Vec<usize>> {
        if self.shape.iter().all(|&extent| extent <= 1) {
            return Vec::new();
        }
        let mut interior: Vec<Vec<usize>> = self
            .members
            .iter()
            .filter(|indices| match self.neighbours(indices) {
                Some(neighbours) => neighbours.iter().all(|n| self.members.contains(n)),
                None => false,
            })
            .cloned()
            .collect();
        interior.sort();
        interior
    }

    /// Classify the region; see the module docs for the criteria.
    pub fn classify(&self) -> RegionClass {
        if self.members.is_empty() {
            return RegionClass::Empty;
        }
        let clears = |indices: &[usize]| {
            self.gap_margins
                .get(indices)
                .is_some_and(|margin| *margin >= self.gap_margin_min)
        };
        let robust = self.interior().iter().any(|indices| {
            clears(indices)
                && self
                    .neighbours(indices)
                    .map(|neighbours| neighbours.iter().all(|n| clears(n)))
                    .unwrap_or(false)
        });
        if robust {
            RegionClass::Robust
        } else {
            RegionClass::FineTuned
        }
    }

    /// Erosion depth of the region: 0 for an empty region, 1 for a region
    /// with no interior, and generally one more than the depth of the
    /// region restricted to its interior.
    pub fn boundary_distance(&self) -> usize {
        let mut depth = 0;
        let mut current = self.clone();
        while !current.members.is_empty() {
            depth += 1;
            let interior: HashSet<Vec<usize>> = current.interior().into_iter().collect();
            if interior.len() == current.members.len() {
                // Fully interior can only happen on a degenerate shape;
                // avoid looping forever.
                break;
            }
            current.members = interior;
        }
        depth
    }

    /// Aggregate metrics.
    pub fn summary(&self) -> RegionSummary {
        let interior = self.interior();
        let min_gap = interior
            .iter()
            .filter_map(|indices| self.gap_margins.get(indices))
            .cloned()
            .fold(None, |acc: Option<f64>, margin| {
                Some(acc.map_or(margin, |a| a.min(margin)))
            });
        RegionSummary {
            class: self.classify(),
            volume: self.volume(),
            interior_count: interior.len(),
            boundary_distance: self.boundary_distance(),
            min_interior_gap_margin: min_gap,
        }
    }
}

impl AtlasResult {
    /// The robust region of this sweep.
    pub fn robust_region(&self) -> RobustRegion {
        RobustRegion::from_result(self)
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::sweep::{
        ParameterAxis, ParameterGrid, ParameterPoint, PointRecord, PointStatus,
    };

    /// Synthetic 2-D atlas where membership is decided by a predicate on
    /// the grid indices.
    fn synthetic_atlas(
        shape: (usize, usize),
        member: impl Fn(usize, usize) -> bool,
        gap: f64,
    ) -> AtlasResult {
        let axes = vec![
            ParameterAxis::linspace("a", 0.0, 1.0, shape.0),
            ParameterAxis::linspace("b", 0.0, 1.0, shape.1),
        ];
        let grid = ParameterGrid::new(axes.clone());
        let records = grid
            .points()
            .into_iter()
            .map(|point| {
                let on = member(point.indices[0], point.indices[1]);
                PointRecord {
                    point: ParameterPoint {
                        indices: point.indices.clone(),
                        coords: point.coords.clone(),
                    },
                    eigenvalues: vec![],
                    n_bound: Some(if on { 3 } else { 2 }),
                    gap_margin: Some(gap),
                    status: if on {
                        PointStatus::OnTarget
                    } else {
                        PointStatus::OffTarget
                    },
                }
            })
            .collect();
        AtlasResult {
            target: 3,
            gap_margin_min: 0.05,
            axes,
            shape: vec![shape.0, shape.1],
            records,
        }
    }

    #[test]
    fn test_empty_region() {
        let atlas = synthetic_atlas((5, 5), |_, _| false, 1.0);
        let region = atlas.robust_region();
        assert_eq!(region.volume(), 0);
        assert_eq!(region.classify(), RegionClass::Empty);
        assert_eq!(region.boundary_distance(), 0);
    }

    #[test]
    fn test_isolated_point_is_fine_tuned() {
        let atlas = synthetic_atlas((5, 5), |i, j| i == 2 && j == 2, 1.0);
        let region = atlas.robust_region();
        assert_eq!(region.volume(), 1);
        assert!(region.interior().is_empty());
        assert_eq!(region.classify(), RegionClass::FineTuned);
        assert_eq!(region.boundary_distance(), 1);
    }

    #[test]
    fn test_thin_curve_is_fine_tuned() {
        // A one-cell-wide line has no 2-D interior.
        let atlas = synthetic_atlas((7, 7), |i, _| i == 3, 1.0);
        let region = atlas.robust_region();
        assert_eq!(region.volume(), 7);
        assert!(region.interior().is_empty());
        assert_eq!(region.classify(), RegionClass::FineTuned);
    }

    #[test]
    fn test_filled_block_is_robust() {
        // A 3x3 block: its center is interior.
        let atlas =
            synthetic_atlas((7, 7), |i, j| (2..5).contains(&i) && (2..5).contains(&j), 1.0);
        let region = atlas.robust_region();
        assert_eq!(region.volume(), 9);
        let interior = region.interior();
        assert_eq!(interior, vec![vec![3, 3]]);
        assert_eq!(region.classify(), RegionClass::Robust);
        assert_eq!(region.boundary_distance(), 2);
    }

    #[test]
    fn test_weak_gap_margins_demote_to_fine_tuned() {
        // Same filled block, but gaps below the 0.05 threshold.
        let atlas =
            synthetic_atlas((7, 7), |i, j| (2..5).contains(&i) && (2..5).contains(&j), 0.01);
        let region = atlas.robust_region();
        assert_eq!(region.classify(), RegionClass::FineTuned);
        assert_eq!(region.summary().min_interior_gap_margin, Some(0.01));
    }

    #[test]
    fn test_pinned_axis_is_ignored_for_interior() {
        // 1 x 7 grid: the first axis is pinned, interior is judged along
        // the second axis alone.
        let axes = vec![
            ParameterAxis::fixed("a", 1.0),
            ParameterAxis::linspace("b", 0.0, 1.0, 7),
        ];
        let grid = ParameterGrid::new(axes.clone());
        let records = grid
            .points()
            .into_iter()
            .map(|point| {
                let on = (2..5).contains(&point.indices[1]);
                PointRecord {
                    point,
                    eigenvalues: vec![],
                    n_bound: Some(if on { 3 } else { 2 }),
                    gap_margin: Some(1.0),
                    status: if on {
                        PointStatus::OnTarget
                    } else {
                        PointStatus::OffTarget
                    },
                }
            })
            .collect();
        let atlas = AtlasResult {
            target: 3,
            gap_margin_min: 0.05,
            axes,
            shape: vec![1, 7],
            records,
        };
        let region = atlas.robust_region();
        assert_eq!(region.volume(), 3);
        assert_eq!(region.interior(), vec![vec![0, 3]]);
        assert_eq!(region.classify(), RegionClass::Robust);
    }
}
