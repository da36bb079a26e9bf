//! Posture metrics derived from a single landmark frame.
//!
//! Every metric is an `Option<f64>`: `None` means at least one landmark the
//! formula needs was absent, and the metric was not computed.

/// Metrics for the front-facing pose
pub mod front;

/// Metrics for the side-facing pose
pub mod side;

pub use front::PostureMetrics;
pub use side::SidePostureMetrics;

use crate::landmark::{LandmarkFrame, LandmarkId};
use nalgebra::Point2;

/// Resolve several landmarks at once; `None` if any is missing
pub(crate) fn points<const N: usize>(frame: &LandmarkFrame, ids: [LandmarkId; N]) -> Option<[Point2<f64>; N]> {
    let mut out = [Point2::origin(); N];
    for (slot, id) in out.iter_mut().zip(ids) {
        *slot = frame.point(id)?;
    }
    Some(out)
}

/// Midpoint of the shoulders and of the hips, when all four are present
pub(crate) fn torso_midpoints(frame: &LandmarkFrame) -> Option<(Point2<f64>, Point2<f64>)> {
    let [ls, rs, lh, rh] = points(
        frame,
        [
            LandmarkId::LeftShoulder,
            LandmarkId::RightShoulder,
            LandmarkId::LeftHip,
            LandmarkId::RightHip,
        ],
    )?;
    Some((crate::geometry::midpoint(&ls, &rs), crate::geometry::midpoint(&lh, &rh)))
}

/// Tilt of the shoulder-mid to hip-mid line away from vertical, in degrees
pub(crate) fn spine_tilt(frame: &LandmarkFrame) -> Option<f64> {
    torso_midpoints(frame).map(|(shoulders, hips)| crate::geometry::angle_from_vertical(&shoulders, &hips))
}
