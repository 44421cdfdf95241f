//! Math utilities and types
//!
//! Provides the 2D math types used by the collision core, plus the
//! motion helpers used when integrating body velocity.

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 2D point type
pub type Point = nalgebra::Point2<f32>;

/// Distance between two points
pub fn distance(a: &Point, b: &Point) -> f32 {
    nalgebra::distance(a, b)
}

/// Squared distance between two points, for comparisons without a root
pub fn distance_squared(a: &Point, b: &Point) -> f32 {
    nalgebra::distance_squared(a, b)
}

/// Velocity cap value that means "no cap"
pub const UNCAPPED_VELOCITY: f32 = 10_000.0;

/// Compute a new velocity component from acceleration, drag and a cap.
///
/// Acceleration takes priority over drag. Drag decays the velocity towards
/// zero without overshooting it. The result is clamped to `±max` unless
/// `max` is [`UNCAPPED_VELOCITY`].
///
/// # Arguments
/// * `velocity` - Current velocity component
/// * `acceleration` - Rate at which the velocity is changing
/// * `drag` - Deceleration applied when there is no acceleration
/// * `max` - Absolute cap for the velocity
/// * `elapsed` - Step length in seconds
pub fn compute_velocity(velocity: f32, acceleration: f32, drag: f32, max: f32, elapsed: f32) -> f32 {
    let mut velocity = velocity;

    if acceleration != 0.0 {
        velocity += acceleration * elapsed;
    } else if drag != 0.0 {
        let drag = drag * elapsed;

        if velocity - drag > 0.0 {
            velocity -= drag;
        } else if velocity + drag < 0.0 {
            velocity += drag;
        } else {
            velocity = 0.0;
        }
    }

    if velocity != 0.0 && max != UNCAPPED_VELOCITY {
        velocity = velocity.clamp(-max, max);
    }

    velocity
}

/// Snap a value down to the nearest multiple of `gap`
pub fn snap_to_floor(value: f32, gap: f32) -> f32 {
    if gap == 0.0 {
        return value;
    }

    (value / gap).floor() * gap
}

/// Snap a value up to the nearest multiple of `gap`
pub fn snap_to_ceil(value: f32, gap: f32) -> f32 {
    if gap == 0.0 {
        return value;
    }

    (value / gap).ceil() * gap
}

/// Replace a non-finite value with zero
pub fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Math utility functions
pub mod utils {
    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees.to_radians()
    }
}
