//! Scene-space vector math.
//!
//! Coordinates follow the renderer's convention: pixels, x grows to the right
//! and y grows downward, so positive angles wind clockwise on screen.

use std::ops::{Add, Mul, Sub};

/// A point (or offset) in scene pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    #[cfg_attr(feature = "serde", serde(default))]
    pub x: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Same value on both axes.
    pub const fn splat(v: f64) -> Self {
        Self { x: v, y: v }
    }

    /// Point at `distance` pixels from `self` along `angle` radians.
    pub fn offset_polar(self, angle: f64, distance: f64) -> Self {
        Self {
            x: self.x + distance * angle.cos(),
            y: self.y + distance * angle.sin(),
        }
    }

    pub fn midpoint(self, other: Self) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// Distance and direction from one point to another.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Heading {
    /// Euclidean distance in pixels.
    pub distance: f64,
    /// Angle in radians, `atan2(dy, dx)`.
    pub angle: f64,
}

/// Returns the distance and angle from `from` to `to`.
pub fn distance_and_angle(from: Point, to: Point) -> Heading {
    let delta = to - from;
    Heading {
        distance: delta.x.hypot(delta.y),
        angle: delta.y.atan2(delta.x),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn heading_along_positive_x_has_zero_angle() {
        let heading = distance_and_angle(Point::ORIGIN, Point::new(100.0, 0.0));
        assert_eq!(heading.distance, 100.0);
        assert_eq!(heading.angle, 0.0);
    }

    #[test]
    fn heading_downward_is_quarter_turn() {
        let heading = distance_and_angle(Point::new(10.0, 10.0), Point::new(10.0, 40.0));
        assert_eq!(heading.distance, 30.0);
        assert!((heading.angle - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn heading_backwards_is_half_turn() {
        let heading = distance_and_angle(Point::ORIGIN, Point::new(-3.0, 0.0));
        assert_eq!(heading.distance, 3.0);
        assert!((heading.angle - PI).abs() < 1e-12);
    }

    #[test]
    fn coincident_points_have_zero_distance() {
        let p = Point::new(7.5, -2.0);
        assert_eq!(distance_and_angle(p, p), Heading::default());
    }

    #[test]
    fn offset_polar_round_trips_with_heading() {
        let from = Point::new(50.0, 50.0);
        let to = from.offset_polar(0.5, 80.0);
        let heading = distance_and_angle(from, to);
        assert!((heading.distance - 80.0).abs() < 1e-9);
        assert!((heading.angle - 0.5).abs() < 1e-9);
    }
}
