//! Lightweight bounding quad carried by every body
//!
//! A stripped-down [`Rectangle`] holding only what the collision code reads
//! on its hot path: position, size, right/bottom edges and half sizes.

use super::Rectangle;

/// Axis-aligned bounding box of a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    right: f32,
    bottom: f32,
    half_width: f32,
    half_height: f32,
}

impl Default for Quad {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}

impl Quad {
    /// Create a quad from its top-left corner and size
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        let mut quad = Self {
            x,
            y,
            width,
            height,
            right: 0.0,
            bottom: 0.0,
            half_width: 0.0,
            half_height: 0.0,
        };
        quad.update_derived();
        quad
    }

    fn update_derived(&mut self) {
        self.right = self.x + self.width;
        self.bottom = self.y + self.height;
        self.half_width = self.width * 0.5;
        self.half_height = self.height * 0.5;
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

    /// Move the left edge
    pub fn set_x(&mut self, x: f32) {
        self.x = x;
        self.update_derived();
    }

    /// Move the top edge
    pub fn set_y(&mut self, y: f32) {
        self.y = y;
        self.update_derived();
    }

    /// Resize, keeping the top-left corner
    pub fn set_size(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.update_derived();
    }

    /// X position
    pub fn x(&self) -> f32 {
        self.x
    }

    /// Y position
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

    /// Left edge
    pub fn left(&self) -> f32 {
        self.x
    }

    /// Right edge
    pub fn right(&self) -> f32 {
        self.right
    }

    /// Top edge
    pub fn top(&self) -> f32 {
        self.y
    }

    /// Bottom edge
    pub fn bottom(&self) -> f32 {
        self.bottom
    }

    /// Half of the width
    pub fn half_width(&self) -> f32 {
        self.half_width
    }

    /// Half of the height
    pub fn half_height(&self) -> f32 {
        self.half_height
    }

    /// Inclusive point test
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.right && y >= self.y && y <= self.bottom
    }

    /// Inclusive intersection test with an optional tolerance
    pub fn intersects(&self, other: &Quad, tolerance: f32) -> bool {
        self.intersects_raw(other.left(), other.right, other.top(), other.bottom, tolerance)
    }

    /// Inclusive intersection test against raw edges
    pub fn intersects_raw(&self, left: f32, right: f32, top: f32, bottom: f32, tolerance: f32) -> bool {
        !(left > self.right + tolerance
            || right < self.x - tolerance
            || top > self.bottom + tolerance
            || bottom < self.y - tolerance)
    }

    /// Strict overlap of the open interiors
    pub fn overlaps(&self, other: &Quad) -> bool {
        self.right > other.x
            && self.x < other.right
            && self.bottom > other.y
            && self.y < other.bottom
    }

    /// Convert to a full rectangle
    pub fn to_rectangle(&self) -> Rectangle {
        Rectangle::new(self.x, self.y, self.width, self.height)
    }
}
