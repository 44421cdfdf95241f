//! Axis-aligned rectangle with cached edges
//!
//! The rectangle keeps its derived geometry (half sizes, right/bottom edges
//! and centre) in sync with `x`, `y`, `width` and `height`. Every mutator
//! recomputes those fields before returning, so reads never observe a stale
//! edge.

use crate::foundation::math::Point;

/// Axis-aligned rectangle defined by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    x: f32,
    y: f32,
    width: f32,
    height: f32,

    // Derived, recomputed on every mutation
    half_width: f32,
    half_height: f32,
    right: f32,
    bottom: f32,
    center: Point,
}

impl Default for Rectangle {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}

impl Rectangle {
    /// Create a rectangle from its top-left corner and size
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        let mut rect = Self {
            x,
            y,
            width,
            height,
            half_width: 0.0,
            half_height: 0.0,
            right: 0.0,
            bottom: 0.0,
            center: Point::origin(),
        };
        rect.update_derived();
        rect
    }

    /// Create the smallest rectangle spanning the given edges
    pub fn from_edges(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    fn update_derived(&mut self) {
        self.half_width = self.width * 0.5;
        self.half_height = self.height * 0.5;
        self.right = self.x + self.width;
        self.bottom = self.y + self.height;
        self.center = Point::new(self.x + self.half_width, self.y + self.half_height);
    }

    /// Set position and size in one go
    pub fn set_to(&mut self, x: f32, y: f32, width: f32, height: f32) -> &mut Self {
        self.x = x;
        self.y = y;
        self.width = width;
        self.height = height;
        self.update_derived();
        self
    }

    /// Move the left edge, keeping the size
    pub fn set_x(&mut self, x: f32) {
        self.x = x;
        self.update_derived();
    }

    /// Move the top edge, keeping the size
    pub fn set_y(&mut self, y: f32) {
        self.y = y;
        self.update_derived();
    }

    /// Move the top-left corner, keeping the size
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
        self.update_derived();
    }

    /// Resize, keeping the top-left corner
    pub fn set_size(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.update_derived();
    }

    /// Translate by the given amounts
    pub fn offset(&mut self, dx: f32, dy: f32) -> &mut Self {
        if dx.is_finite() && dy.is_finite() {
            self.x += dx;
            self.y += dy;
            self.update_derived();
        }
        self
    }

    /// Grow the rectangle by `dx` on the left and right and `dy` on the top and bottom
    pub fn inflate(&mut self, dx: f32, dy: f32) -> &mut Self {
        if dx.is_finite() && dy.is_finite() {
            self.x -= dx;
            self.width += 2.0 * dx;
            self.y -= dy;
            self.height += 2.0 * dy;
            self.update_derived();
        }
        self
    }

    /// X position of the top-left corner
    pub fn x(&self) -> f32 {
        self.x
    }

    /// Y position of the top-left corner
    pub fn y(&self) -> f32 {
        self.y
    }

    /// Width
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Height
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Half of the width
    pub fn half_width(&self) -> f32 {
        self.half_width
    }

    /// Half of the height
    pub fn half_height(&self) -> f32 {
        self.half_height
    }

    /// Left edge (same as `x`)
    pub fn left(&self) -> f32 {
        self.x
    }

    /// Right edge
    pub fn right(&self) -> f32 {
        self.right
    }

    /// Top edge (same as `y`)
    pub fn top(&self) -> f32 {
        self.y
    }

    /// Bottom edge
    pub fn bottom(&self) -> f32 {
        self.bottom
    }

    /// Centre point
    pub fn center(&self) -> Point {
        self.center
    }

    /// Area of the rectangle
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// True when either side is shorter than one unit
    pub fn is_empty(&self) -> bool {
        self.width < 1.0 || self.height < 1.0
    }

    /// Check whether a point lies inside, edges included
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.right && y >= self.y && y <= self.bottom
    }

    /// Check whether a point lies inside, edges included
    pub fn contains_point(&self, point: Point) -> bool {
        self.contains(point.x, point.y)
    }

    /// Check whether another rectangle lies completely inside this one
    pub fn contains_rect(&self, other: &Rectangle) -> bool {
        if other.area() > self.area() {
            return false;
        }

        other.x >= self.x
            && other.y >= self.y
            && other.right <= self.right
            && other.bottom <= self.bottom
    }

    /// Check whether the rectangles intersect, edges included
    ///
    /// `tolerance` widens this rectangle on every side before the test.
    pub fn intersects(&self, other: &Rectangle, tolerance: f32) -> bool {
        !(other.left() > self.right + tolerance
            || other.right < self.left() - tolerance
            || other.top() > self.bottom + tolerance
            || other.bottom < self.top() - tolerance)
    }

    /// Check whether the open interiors overlap (touching edges do not count)
    pub fn overlaps(&self, other: &Rectangle) -> bool {
        other.x + other.width > self.x
            && other.x < self.x + self.width
            && other.y + other.height > self.y
            && other.y < self.y + self.height
    }

    /// Area shared by both rectangles, if any
    pub fn intersection(&self, other: &Rectangle) -> Option<Rectangle> {
        if !self.overlaps(other) {
            return None;
        }

        Some(Rectangle::from_edges(
            self.x.max(other.x),
            self.y.max(other.y),
            self.right.min(other.right),
            self.bottom.min(other.bottom),
        ))
    }

    /// Smallest rectangle covering both rectangles
    pub fn union(&self, other: &Rectangle) -> Rectangle {
        Rectangle::from_edges(
            self.x.min(other.x),
            self.y.min(other.y),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }

    /// Exact equality of position and size
    pub fn equals(&self, other: &Rectangle) -> bool {
        self.x == other.x
            && self.y == other.y
            && self.width == other.width
            && self.height == other.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn assert_consistent(r: &Rectangle) {
        assert_relative_eq!(r.left(), r.x());
        assert_relative_eq!(r.right(), r.x() + r.width(), epsilon = 1e-4);
        assert_relative_eq!(r.top(), r.y());
        assert_relative_eq!(r.bottom(), r.y() + r.height(), epsilon = 1e-4);
        assert_relative_eq!(r.center().x, r.x() + r.width() / 2.0, epsilon = 1e-4);
        assert_relative_eq!(r.center().y, r.y() + r.height() / 2.0, epsilon = 1e-4);
        assert_relative_eq!(r.half_width(), r.width() / 2.0, epsilon = 1e-4);
        assert_relative_eq!(r.half_height(), r.height() / 2.0, epsilon = 1e-4);
    }

    #[test]
    fn test_derived_fields_follow_every_mutation() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut rect = Rectangle::new(1.0, 2.0, 3.0, 4.0);
        assert_consistent(&rect);

        for step in 0..200 {
            let a: f32 = rng.gen_range(-500.0..500.0);
            let b: f32 = rng.gen_range(-500.0..500.0);
            let w: f32 = rng.gen_range(0.0..200.0);
            let h: f32 = rng.gen_range(0.0..200.0);

            match step % 6 {
                0 => {
                    rect.set_to(a, b, w, h);
                }
                1 => rect.set_x(a),
                2 => rect.set_y(b),
                3 => rect.set_position(a, b),
                4 => rect.set_size(w, h),
                _ => {
                    rect.offset(a * 0.01, b * 0.01);
                }
            }

            assert_consistent(&rect);
        }
    }

    #[test]
    fn test_intersects_is_symmetric() {
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..500 {
            let a = Rectangle::new(
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
                rng.gen_range(0.0..40.0),
                rng.gen_range(0.0..40.0),
            );
            let b = Rectangle::new(
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
                rng.gen_range(0.0..40.0),
                rng.gen_range(0.0..40.0),
            );

            assert_eq!(a.intersects(&b, 0.0), b.intersects(&a, 0.0));
            assert_eq!(a.intersects(&b, 2.5), b.intersects(&a, 2.5));
            assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }
    }

    #[test]
    fn test_touching_edges() {
        let a = Rectangle::new(0.0, 0.0, 10.0, 10.0);
        let b = Rectangle::new(10.0, 0.0, 10.0, 10.0);

        // Inclusive test counts shared edges, strict overlap does not
        assert!(a.intersects(&b, 0.0));
        assert!(!a.overlaps(&b));

        let c = Rectangle::new(12.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&c, 0.0));
        assert!(a.intersects(&c, 2.0));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let rect = Rectangle::new(0.0, 0.0, 10.0, 5.0);
        assert!(rect.contains(0.0, 0.0));
        assert!(rect.contains(10.0, 5.0));
        assert!(rect.contains(5.0, 2.5));
        assert!(!rect.contains(10.01, 2.0));
        assert!(!rect.contains(-0.01, 2.0));
    }

    #[test]
    fn test_union_and_intersection() {
        let a = Rectangle::new(0.0, 0.0, 10.0, 10.0);
        let b = Rectangle::new(5.0, 5.0, 10.0, 10.0);

        let u = a.union(&b);
        assert!(u.equals(&Rectangle::new(0.0, 0.0, 15.0, 15.0)));

        let i = a.intersection(&b).unwrap();
        assert!(i.equals(&Rectangle::new(5.0, 5.0, 5.0, 5.0)));

        let far = Rectangle::new(100.0, 100.0, 1.0, 1.0);
        assert!(a.intersection(&far).is_none());
    }

    #[test]
    fn test_inflate_and_contains_rect() {
        let mut rect = Rectangle::new(10.0, 10.0, 10.0, 10.0);
        rect.inflate(2.0, 3.0);
        assert!(rect.equals(&Rectangle::new(8.0, 7.0, 14.0, 16.0)));
        assert_consistent(&rect);

        assert!(rect.contains_rect(&Rectangle::new(9.0, 8.0, 2.0, 2.0)));
        assert!(!rect.contains_rect(&Rectangle::new(0.0, 0.0, 2.0, 2.0)));
    }
}
