//! Geometry primitives
//!
//! Axis-aligned shapes with eagerly cached derived fields. Every mutator
//! recomputes edges and half sizes before returning.

pub mod circle;
pub mod line;
pub mod quad;
pub mod rectangle;

pub use circle::Circle;
pub use line::Line;
pub use quad::Quad;
pub use rectangle::Rectangle;

pub use crate::foundation::math::Point;
