//! Reduction of a full trajectory to its in-volume portion.

use crate::core::fiducial::FiducialVolume;
use crate::core::particle::{scale4, TrajectoryPoint, MOMENTUM_SCALE};
use std::collections::BTreeSet;

/// Indices of trajectory points to keep: every contained point plus one neighbour
/// on each side of the contained span, when that neighbour exists.
///
/// Returns `None` if no point lies inside `volume`.
pub fn path_indices(
    trajectory: &[TrajectoryPoint],
    volume: &FiducialVolume,
) -> Option<BTreeSet<usize>> {
    let mut keep: BTreeSet<usize> = trajectory
        .iter()
        .enumerate()
        .filter(|(_, p)| volume.contains(p.position[0], p.position[1], p.position[2]))
        .map(|(i, _)| i)
        .collect();

    let first = *keep.first()?;
    let last = *keep.last()?;
    if first > 0 {
        keep.insert(first - 1);
    }
    if last + 1 < trajectory.len() {
        keep.insert(last + 1);
    }
    Some(keep)
}

/// Reduced in-volume path with momenta rescaled from GeV to MeV.
///
/// Points come out in chronological order; positions are copied unchanged.
pub fn reduce_path(
    trajectory: &[TrajectoryPoint],
    volume: &FiducialVolume,
) -> Option<Vec<TrajectoryPoint>> {
    let keep = path_indices(trajectory, volume)?;
    Some(
        keep.into_iter()
            .map(|i| {
                let p = &trajectory[i];
                TrajectoryPoint::new(p.position, scale4(p.momentum, MOMENTUM_SCALE))
            })
            .collect(),
    )
}
