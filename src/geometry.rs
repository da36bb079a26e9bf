//! Angle and distance helpers on image-space points.
//!
//! All functions are pure and total. Coordinates follow the image
//! convention: x grows to the right, y grows downwards.

use nalgebra::Point2;

/// Angle in degrees at `mid` between the rays towards `first` and `last`.
///
/// Computed as the difference of two `atan2` headings and folded into
/// `[0, 180]`, so the result does not depend on the order of `first` and
/// `last`.
#[must_use]
pub fn angle_between(first: &Point2<f64>, mid: &Point2<f64>, last: &Point2<f64>) -> f64 {
    let to_last = heading_degrees(mid, last);
    let to_first = heading_degrees(mid, first);

    let angle = (to_last - to_first).abs();
    if angle > 180.0 {
        360.0 - angle
    } else {
        angle
    }
}

/// Heading in degrees of the vector `from -> to`, in `(-180, 180]`.
#[must_use]
pub fn heading_degrees(from: &Point2<f64>, to: &Point2<f64>) -> f64 {
    let delta = to - from;
    delta.y.atan2(delta.x).to_degrees()
}

/// Unsigned angle in degrees between the vector `top -> bottom` and the
/// downward vertical. Zero means `bottom` sits straight below `top`.
#[must_use]
pub fn angle_from_vertical(top: &Point2<f64>, bottom: &Point2<f64>) -> f64 {
    let delta = bottom - top;
    delta.x.atan2(delta.y).to_degrees().abs()
}

/// Midpoint of two points
#[must_use]
pub fn midpoint(a: &Point2<f64>, b: &Point2<f64>) -> Point2<f64> {
    nalgebra::center(a, b)
}

/// Absolute horizontal distance between two points
#[must_use]
pub fn horizontal_gap(a: &Point2<f64>, b: &Point2<f64>) -> f64 {
    (a.x - b.x).abs()
}

/// Absolute vertical distance between two points
#[must_use]
pub fn vertical_gap(a: &Point2<f64>, b: &Point2<f64>) -> f64 {
    (a.y - b.y).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2<f64> {
        Point2::new(x, y)
    }

    #[test]
    fn test_straight_line_is_180() {
        let angle = angle_between(&p(0.0, 0.0), &p(1.0, 0.0), &p(2.0, 0.0));
        assert!((angle - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_right_angle() {
        let angle = angle_between(&p(0.0, 0.0), &p(1.0, 0.0), &p(1.0, 1.0));
        assert!((angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_reflex_angle_is_folded() {
        // Raw heading difference is 270 degrees
        let angle = angle_between(&p(1.0, 0.0), &p(0.0, 0.0), &p(0.0, -1.0));
        assert!((angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_symmetric_under_swap() {
        let a = p(3.0, 7.5);
        let m = p(-2.0, 1.0);
        let b = p(10.0, -4.0);
        assert!((angle_between(&a, &m, &b) - angle_between(&b, &m, &a)).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_points_are_total() {
        let angle = angle_between(&p(1.0, 1.0), &p(1.0, 1.0), &p(1.0, 1.0));
        assert!((0.0..=180.0).contains(&angle));
    }

    #[test]
    fn test_angle_from_vertical() {
        assert!(angle_from_vertical(&p(0.0, 0.0), &p(0.0, 10.0)).abs() < 1e-9);
        assert!((angle_from_vertical(&p(0.0, 0.0), &p(10.0, 10.0)) - 45.0).abs() < 1e-9);
        assert!((angle_from_vertical(&p(0.0, 0.0), &p(-10.0, 10.0)) - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_midpoint_and_gaps() {
        let m = midpoint(&p(0.0, 0.0), &p(4.0, 2.0));
        assert_eq!(m, p(2.0, 1.0));
        assert_eq!(horizontal_gap(&p(1.0, 5.0), &p(4.0, 2.0)), 3.0);
        assert_eq!(vertical_gap(&p(1.0, 5.0), &p(4.0, 2.0)), 3.0);
    }
}
