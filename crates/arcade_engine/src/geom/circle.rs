//! Circle primitive
//!
//! Stored as a centre and a diameter; the radius is cached alongside and
//! kept in sync by every mutator.

use crate::foundation::math::{utils, Point};
use super::Rectangle;

/// Circle defined by its centre and diameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    /// Centre x
    pub x: f32,
    /// Centre y
    pub y: f32,
    diameter: f32,
    radius: f32,
}

impl Default for Circle {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

impl Circle {
    /// Create a circle from its centre and diameter
    pub fn new(x: f32, y: f32, diameter: f32) -> Self {
        let mut circle = Self { x, y, diameter: 0.0, radius: 0.0 };
        circle.set_diameter(diameter);
        circle
    }

    /// Set centre and diameter
    pub fn set_to(&mut self, x: f32, y: f32, diameter: f32) -> &mut Self {
        self.x = x;
        self.y = y;
        self.set_diameter(diameter);
        self
    }

    /// Diameter
    pub fn diameter(&self) -> f32 {
        self.diameter
    }

    /// Radius
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Change the diameter; non-positive values are ignored
    pub fn set_diameter(&mut self, diameter: f32) {
        if diameter > 0.0 {
            self.diameter = diameter;
            self.radius = diameter * 0.5;
        }
    }

    /// Change the radius; non-positive values are ignored
    pub fn set_radius(&mut self, radius: f32) {
        self.set_diameter(radius * 2.0);
    }

    /// Centre as a point
    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Left-most x
    pub fn left(&self) -> f32 {
        self.x - self.radius
    }

    /// Right-most x
    pub fn right(&self) -> f32 {
        self.x + self.radius
    }

    /// Top-most y
    pub fn top(&self) -> f32 {
        self.y - self.radius
    }

    /// Bottom-most y
    pub fn bottom(&self) -> f32 {
        self.y + self.radius
    }

    /// Area
    pub fn area(&self) -> f32 {
        if self.radius > 0.0 {
            std::f32::consts::PI * self.radius * self.radius
        } else {
            0.0
        }
    }

    /// Circumference
    pub fn circumference(&self) -> f32 {
        2.0 * std::f32::consts::PI * self.radius
    }

    /// True when the diameter is zero
    pub fn is_empty(&self) -> bool {
        self.diameter <= 0.0
    }

    /// Check whether a point lies inside or on the circle
    pub fn contains(&self, x: f32, y: f32) -> bool {
        let dx = x - self.x;
        let dy = y - self.y;
        dx * dx + dy * dy <= self.radius * self.radius
    }

    /// Point form of [`Circle::contains`]
    pub fn contains_point(&self, point: Point) -> bool {
        self.contains(point.x, point.y)
    }

    /// Check whether two circles intersect (touching counts)
    pub fn intersects(&self, other: &Circle) -> bool {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let radii = self.radius + other.radius;
        radii * radii >= dx * dx + dy * dy
    }

    /// Check whether this circle intersects a rectangle
    ///
    /// Inflates the rectangle by the radius and tests the centre against it.
    pub fn intersects_rectangle(&self, rect: &Rectangle) -> bool {
        let mut inflated = *rect;
        inflated.inflate(self.radius, self.radius);
        inflated.contains(self.x, self.y)
    }

    /// Point on the circumference at `angle` (radians unless `as_degrees`)
    pub fn circumference_point(&self, angle: f32, as_degrees: bool) -> Point {
        let angle = if as_degrees { utils::deg_to_rad(angle) } else { angle };
        Point::new(
            self.x + self.radius * angle.cos(),
            self.y + self.radius * angle.sin(),
        )
    }

    /// Translate the centre
    pub fn offset(&mut self, dx: f32, dy: f32) -> &mut Self {
        if dx.is_finite() && dy.is_finite() {
            self.x += dx;
            self.y += dy;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_radius_follows_diameter() {
        let mut circle = Circle::new(0.0, 0.0, 10.0);
        assert_eq!(circle.radius(), 5.0);

        circle.set_radius(3.0);
        assert_eq!(circle.diameter(), 6.0);
        assert_eq!(circle.left(), -3.0);
        assert_eq!(circle.bottom(), 3.0);

        // Non-positive sizes are ignored
        circle.set_diameter(-1.0);
        assert_eq!(circle.diameter(), 6.0);
    }

    #[test]
    fn test_circle_intersection() {
        let a = Circle::new(0.0, 0.0, 10.0);
        let b = Circle::new(10.0, 0.0, 10.0);
        let c = Circle::new(10.1, 0.0, 10.0);

        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert!(a.contains(5.0, 0.0));
        assert!(!a.contains(5.0, 0.1));
    }

    #[test]
    fn test_circle_rectangle() {
        let rect = Rectangle::new(10.0, 10.0, 10.0, 10.0);
        assert!(Circle::new(5.0, 15.0, 10.0).intersects_rectangle(&rect));
        assert!(!Circle::new(4.0, 15.0, 10.0).intersects_rectangle(&rect));
    }

    #[test]
    fn test_circumference_point() {
        let circle = Circle::new(1.0, 1.0, 4.0);
        let p = circle.circumference_point(90.0, true);
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 3.0, epsilon = 1e-5);
        assert_relative_eq!(circle.area(), std::f32::consts::PI * 4.0);
    }
}
