//! Line segment primitive
//!
//! A line between two end points. The slope and y-intercept of the infinite
//! line through both points are cached on every mutation; vertical lines
//! carry an infinite slope and a NaN intercept.
//!
//! The same value can be read three ways: as an infinite line, as the
//! segment between its end points, or as a ray that starts at the first
//! point and passes through the second.

use crate::foundation::math::{self, Point};
use super::{Circle, Rectangle};

/// Tolerance used when deciding whether a point lies on a line
const ON_LINE_EPSILON: f32 = 1e-4;

/// Line defined by two end points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    slope: f32,
    y_intercept: f32,
}

impl Default for Line {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}

impl Line {
    /// Create a line from two end points
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        let mut line = Self { x1, y1, x2, y2, slope: 0.0, y_intercept: 0.0 };
        line.update_derived();
        line
    }

    fn update_derived(&mut self) {
        let run = self.x2 - self.x1;
        if run == 0.0 {
            self.slope = f32::INFINITY;
            self.y_intercept = f32::NAN;
        } else {
            self.slope = (self.y2 - self.y1) / run;
            self.y_intercept = self.y1 - self.slope * self.x1;
        }
    }

    /// Move both end points
    pub fn set_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> &mut Self {
        self.x1 = x1;
        self.y1 = y1;
        self.x2 = x2;
        self.y2 = y2;
        self.update_derived();
        self
    }

    /// First end point
    pub fn start(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    /// Second end point
    pub fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }

    /// Slope of the infinite line, infinite when vertical
    pub fn slope(&self) -> f32 {
        self.slope
    }

    /// Y value where the infinite line crosses x = 0, NaN when vertical
    pub fn y_intercept(&self) -> f32 {
        self.y_intercept
    }

    /// True when both end points share an x coordinate
    pub fn is_vertical(&self) -> bool {
        self.slope.is_infinite()
    }

    /// Length of the segment
    pub fn length(&self) -> f32 {
        (self.end() - self.start()).norm()
    }

    /// Bounding rectangle of the segment
    pub fn bounds(&self) -> Rectangle {
        Rectangle::from_edges(
            self.x1.min(self.x2),
            self.y1.min(self.y2),
            self.x1.max(self.x2),
            self.y1.max(self.y2),
        )
    }

    /// Intersection of the two infinite lines, `None` when parallel
    pub fn line_intersection(&self, other: &Line) -> Option<Point> {
        let (a1, b1, c1) = self.coefficients();
        let (a2, b2, c2) = other.coefficients();

        let denominator = a1 * b2 - a2 * b1;
        if denominator == 0.0 {
            return None;
        }

        Some(Point::new(
            (b2 * c1 - b1 * c2) / denominator,
            (a1 * c2 - a2 * c1) / denominator,
        ))
    }

    /// Intersection of the two segments, `None` when they do not meet
    pub fn segment_intersection(&self, other: &Line) -> Option<Point> {
        let point = self.line_intersection(other)?;

        if self.within_segment_bounds(point) && other.within_segment_bounds(point) {
            Some(point)
        } else {
            None
        }
    }

    /// Check whether the segment touches a rectangle
    ///
    /// True when either end point lies inside the rectangle or the segment
    /// crosses any of its four edges.
    pub fn intersects_rectangle(&self, rect: &Rectangle) -> bool {
        if rect.contains(self.x1, self.y1) || rect.contains(self.x2, self.y2) {
            return true;
        }

        rect_edges(rect).iter().any(|edge| self.segment_intersection(edge).is_some())
    }

    /// Check whether the infinite line passes through a circle
    pub fn intersects_circle(&self, circle: &Circle) -> bool {
        let closest = self.closest_point(circle.center(), f32::NEG_INFINITY, f32::INFINITY);
        circle.contains_point(closest)
    }

    /// Check whether the segment touches a circle
    ///
    /// Uses the point of the segment closest to the centre, so a segment
    /// lying fully inside the circle counts.
    pub fn segment_intersects_circle(&self, circle: &Circle) -> bool {
        let closest = self.closest_point(circle.center(), 0.0, 1.0);
        circle.contains_point(closest)
    }

    /// Where the ray crosses another segment
    ///
    /// The ray starts at the first end point and runs through the second
    /// without bound. `None` when parallel or when the crossing lies behind
    /// the origin or off the segment.
    pub fn ray_intersection(&self, segment: &Line) -> Option<Point> {
        let (r, s) = self.ray_parameters(segment)?;
        if r >= 0.0 && (0.0..=1.0).contains(&s) {
            Some(self.point_at(r))
        } else {
            None
        }
    }

    /// Where the ray crosses another infinite line
    pub fn ray_line_intersection(&self, line: &Line) -> Option<Point> {
        let (r, _) = self.ray_parameters(line)?;
        (r >= 0.0).then(|| self.point_at(r))
    }

    /// Check whether the ray touches a rectangle
    ///
    /// True when the origin lies inside or the ray crosses any edge.
    pub fn ray_intersects_rectangle(&self, rect: &Rectangle) -> bool {
        rect.contains(self.x1, self.y1)
            || rect_edges(rect).iter().any(|edge| self.ray_intersection(edge).is_some())
    }

    /// Nearest point of the ray to `(x, y)` along with its squared distance
    pub fn ray_closest_point(&self, x: f32, y: f32) -> (Point, f32) {
        let point = Point::new(x, y);
        let closest = self.closest_point(point, 0.0, f32::INFINITY);
        (closest, math::distance_squared(&closest, &point))
    }

    /// Check whether a point lies on the infinite line
    pub fn point_on_line(&self, x: f32, y: f32) -> bool {
        let cross = (x - self.x1) * (self.y2 - self.y1) - (self.x2 - self.x1) * (y - self.y1);
        cross.abs() <= ON_LINE_EPSILON * self.length().max(1.0)
    }

    /// Check whether a point lies on the segment
    pub fn point_on_segment(&self, x: f32, y: f32) -> bool {
        self.point_on_line(x, y) && self.within_segment_bounds(Point::new(x, y))
    }

    // Line in the form a*x + b*y = c
    fn coefficients(&self) -> (f32, f32, f32) {
        let a = self.y2 - self.y1;
        let b = self.x1 - self.x2;
        (a, b, a * self.x1 + b * self.y1)
    }

    fn point_at(&self, t: f32) -> Point {
        Point::new(self.x1 + t * (self.x2 - self.x1), self.y1 + t * (self.y2 - self.y1))
    }

    // Projection of `point` onto the line, with the parameter clamped to [min, max]
    fn closest_point(&self, point: Point, min: f32, max: f32) -> Point {
        let direction = self.end() - self.start();
        let length_squared = direction.norm_squared();
        if length_squared == 0.0 {
            return self.start();
        }
        let t = (point - self.start()).dot(&direction) / length_squared;
        self.point_at(t.clamp(min, max))
    }

    // Parameters along self (r) and other (s) where the two lines cross
    fn ray_parameters(&self, other: &Line) -> Option<(f32, f32)> {
        let d = (self.x2 - self.x1) * (other.y2 - other.y1) - (self.y2 - self.y1) * (other.x2 - other.x1);
        if d == 0.0 {
            return None;
        }
        let r = ((self.y1 - other.y1) * (other.x2 - other.x1) - (self.x1 - other.x1) * (other.y2 - other.y1)) / d;
        let s = ((self.y1 - other.y1) * (self.x2 - self.x1) - (self.x1 - other.x1) * (self.y2 - self.y1)) / d;
        Some((r, s))
    }

    fn within_segment_bounds(&self, point: Point) -> bool {
        let e = ON_LINE_EPSILON;
        point.x >= self.x1.min(self.x2) - e
            && point.x <= self.x1.max(self.x2) + e
            && point.y >= self.y1.min(self.y2) - e
            && point.y <= self.y1.max(self.y2) + e
    }
}

fn rect_edges(rect: &Rectangle) -> [Line; 4] {
    [
        Line::new(rect.left(), rect.top(), rect.right(), rect.top()),
        Line::new(rect.right(), rect.top(), rect.right(), rect.bottom()),
        Line::new(rect.left(), rect.bottom(), rect.right(), rect.bottom()),
        Line::new(rect.left(), rect.top(), rect.left(), rect.bottom()),
    ]
}
