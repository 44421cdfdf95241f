//! Movable collision bodies
//!
//! A [`Body`] is the capability set the collision core needs from a game
//! object: its bounding quad, the position it had at the start of the step,
//! motion state, and the flags that gate participation. Bodies are owned by
//! a [`BodyStore`] and referenced everywhere else by [`BodyHandle`].

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::foundation::math::{self, Point, Vec2, UNCAPPED_VELOCITY};
use crate::geom::{Quad, Rectangle};

slotmap::new_key_type! {
    /// Stable handle to a body inside a [`BodyStore`]
    pub struct BodyHandle;
}

/// Storage for every body of a world
pub type BodyStore = SlotMap<BodyHandle, Body>;

bitflags::bitflags! {
    /// Sides of a body that can collide or are in contact
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct CollisionSides: u32 {
        /// Left side
        const LEFT = 0x0001;
        /// Right side
        const RIGHT = 0x0010;
        /// Top side
        const UP = 0x0100;
        /// Bottom side
        const DOWN = 0x1000;

        /// Left or right
        const WALL = Self::LEFT.bits() | Self::RIGHT.bits();
        /// Top
        const CEILING = Self::UP.bits();
        /// Bottom
        const FLOOR = Self::DOWN.bits();
        /// Every side
        const ANY = Self::LEFT.bits() | Self::RIGHT.bits() | Self::UP.bits() | Self::DOWN.bits();
    }
}

impl CollisionSides {
    /// No side
    pub const NONE: Self = Self::empty();
}

impl Default for CollisionSides {
    fn default() -> Self {
        Self::ANY
    }
}

/// A movable axis-aligned body
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Current bounds
    pub bounds: Quad,
    /// Top-left corner at the start of the current step
    pub last: Point,

    /// Velocity in units per second
    pub velocity: Vec2,
    /// Rate of change of velocity
    pub acceleration: Vec2,
    /// Deceleration applied while there is no acceleration
    pub drag: Vec2,
    /// Per-axis velocity cap, [`UNCAPPED_VELOCITY`] disables it
    pub max_velocity: Vec2,

    /// Mass used for velocity exchange
    pub mass: f32,
    /// Restitution in `[0, 1]`
    pub elasticity: f32,

    /// Never moved or slowed down by separation
    pub immovable: bool,
    /// Integrates its own velocity in [`Body::post_update`]
    pub moves: bool,

    /// Takes part in the world at all
    pub exists: bool,
    /// Updated every step
    pub active: bool,
    /// Not killed
    pub alive: bool,

    /// Sides that are allowed to register contact
    pub allow_collisions: CollisionSides,
    /// Sides in contact this step
    pub touching: CollisionSides,
    /// Sides that were in contact the previous step
    pub was_touching: CollisionSides,
}

impl Default for Body {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}

impl Body {
    /// Create a body at rest with default physical properties
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            bounds: Quad::new(x, y, width, height),
            last: Point::new(x, y),
            velocity: Vec2::zeros(),
            acceleration: Vec2::zeros(),
            drag: Vec2::zeros(),
            max_velocity: Vec2::new(UNCAPPED_VELOCITY, UNCAPPED_VELOCITY),
            mass: 1.0,
            elasticity: 0.0,
            immovable: false,
            moves: true,
            exists: true,
            active: true,
            alive: true,
            allow_collisions: CollisionSides::ANY,
            touching: CollisionSides::NONE,
            was_touching: CollisionSides::NONE,
        }
    }

    /// Builder: set velocity
    pub fn with_velocity(mut self, vx: f32, vy: f32) -> Self {
        self.velocity = Vec2::new(vx, vy);
        self
    }

    /// Builder: set mass
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    /// Builder: set elasticity
    pub fn with_elasticity(mut self, elasticity: f32) -> Self {
        self.elasticity = elasticity;
        self
    }

    /// Builder: make the body immovable
    pub fn immovable(mut self) -> Self {
        self.immovable = true;
        self
    }

    /// Builder: set the collidable sides
    pub fn with_allow_collisions(mut self, sides: CollisionSides) -> Self {
        self.allow_collisions = sides;
        self
    }

    /// Left edge
    pub fn x(&self) -> f32 {
        self.bounds.x()
    }

    /// Top edge
    pub fn y(&self) -> f32 {
        self.bounds.y()
    }

    /// Width
    pub fn width(&self) -> f32 {
        self.bounds.width()
    }

    /// Height
    pub fn height(&self) -> f32 {
        self.bounds.height()
    }

    /// Move horizontally without touching `last`
    pub fn set_x(&mut self, x: f32) {
        self.bounds.set_x(x);
    }

    /// Move vertically without touching `last`
    pub fn set_y(&mut self, y: f32) {
        self.bounds.set_y(y);
    }

    /// Move the body without touching `last`
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.bounds.set_x(x);
        self.bounds.set_y(y);
    }

    /// Displacement since the start of the step
    pub fn delta(&self) -> Vec2 {
        Vec2::new(self.x() - self.last.x, self.y() - self.last.y)
    }

    /// Centre of the current bounds
    pub fn midpoint(&self) -> Point {
        Point::new(
            self.x() + self.bounds.half_width(),
            self.y() + self.bounds.half_height(),
        )
    }

    /// Swept hull covering both the current and the previous position
    pub fn hull(&self) -> Rectangle {
        let delta = self.delta();
        Rectangle::new(
            self.x().min(self.last.x),
            self.y().min(self.last.y),
            self.width() + delta.x.abs(),
            self.height() + delta.y.abs(),
        )
    }

    /// Mass safe to divide by
    pub fn effective_mass(&self) -> f32 {
        if self.mass > 0.0 && self.mass.is_finite() {
            self.mass
        } else {
            log::debug!("Degenerate mass {} treated as 1.0", self.mass);
            1.0
        }
    }

    /// Elasticity clamped to `[0, 1]`, NaN treated as 0
    pub fn effective_elasticity(&self) -> f32 {
        if self.elasticity.is_nan() {
            0.0
        } else {
            self.elasticity.clamp(0.0, 1.0)
        }
    }

    /// True when the body may take part in collision at all
    pub fn is_collidable(&self) -> bool {
        self.exists && !self.allow_collisions.is_empty()
    }

    /// Whether any side can collide
    pub fn solid(&self) -> bool {
        self.allow_collisions.intersects(CollisionSides::ANY)
    }

    /// Enable every side or disable collision entirely
    pub fn set_solid(&mut self, solid: bool) {
        self.allow_collisions = if solid { CollisionSides::ANY } else { CollisionSides::NONE };
    }

    /// Whether any of `sides` is in contact this step
    pub fn is_touching(&self, sides: CollisionSides) -> bool {
        self.touching.intersects(sides)
    }

    /// Whether any of `sides` came into contact this step
    pub fn just_touched(&self, sides: CollisionSides) -> bool {
        self.touching.intersects(sides) && !self.was_touching.intersects(sides)
    }

    /// Start of step: remember where the body was
    pub fn pre_update(&mut self) {
        self.last = Point::new(self.x(), self.y());
    }

    /// End of step: integrate motion and roll the touching state over
    pub fn post_update(&mut self, elapsed: f32) {
        if self.moves {
            self.update_motion(elapsed);
        }

        self.was_touching = self.touching;
        self.touching = CollisionSides::NONE;
    }

    fn update_motion(&mut self, elapsed: f32) {
        let velocity_delta = (math::compute_velocity(
            self.velocity.x,
            self.acceleration.x,
            self.drag.x,
            self.max_velocity.x,
            elapsed,
        ) - self.velocity.x)
            * 0.5;
        self.velocity.x += velocity_delta;
        let dx = self.velocity.x * elapsed;
        self.velocity.x += velocity_delta;

        let velocity_delta = (math::compute_velocity(
            self.velocity.y,
            self.acceleration.y,
            self.drag.y,
            self.max_velocity.y,
            elapsed,
        ) - self.velocity.y)
            * 0.5;
        self.velocity.y += velocity_delta;
        let dy = self.velocity.y * elapsed;
        self.velocity.y += velocity_delta;

        self.velocity.x = math::finite_or_zero(self.velocity.x);
        self.velocity.y = math::finite_or_zero(self.velocity.y);

        if dx.is_finite() && dy.is_finite() {
            self.set_position(self.x() + dx, self.y() + dy);
        }
    }

    /// Bring the body back to life at a new position, at rest
    pub fn reset(&mut self, x: f32, y: f32) {
        self.revive();
        self.touching = CollisionSides::NONE;
        self.was_touching = CollisionSides::NONE;
        self.set_position(x, y);
        self.last = Point::new(x, y);
        self.velocity = Vec2::zeros();
    }

    /// Remove the body from play
    pub fn kill(&mut self) {
        self.alive = false;
        self.exists = false;
    }

    /// Return the body to play
    pub fn revive(&mut self) {
        self.alive = true;
        self.exists = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_side_constants() {
        assert_eq!(CollisionSides::LEFT.bits(), 0x0001);
        assert_eq!(CollisionSides::RIGHT.bits(), 0x0010);
        assert_eq!(CollisionSides::UP.bits(), 0x0100);
        assert_eq!(CollisionSides::DOWN.bits(), 0x1000);
        assert_eq!(CollisionSides::ANY.bits(), 0x1111);
        assert_eq!(CollisionSides::WALL, CollisionSides::LEFT | CollisionSides::RIGHT);
        assert_eq!(CollisionSides::FLOOR, CollisionSides::DOWN);
        assert_eq!(CollisionSides::CEILING, CollisionSides::UP);
        assert!(CollisionSides::NONE.is_empty());
    }

    #[test]
    fn test_touching_rolls_over_each_step() {
        let mut body = Body::new(0.0, 0.0, 8.0, 8.0);
        body.touching |= CollisionSides::DOWN;
        assert!(body.just_touched(CollisionSides::FLOOR));

        body.pre_update();
        body.post_update(1.0 / 60.0);
        assert_eq!(body.was_touching, CollisionSides::DOWN);
        assert_eq!(body.touching, CollisionSides::NONE);

        // Touching again the next step is no longer a fresh contact
        body.touching |= CollisionSides::DOWN;
        assert!(body.is_touching(CollisionSides::DOWN));
        assert!(!body.just_touched(CollisionSides::DOWN));
    }

    #[test]
    fn test_motion_integration() {
        let mut body = Body::new(0.0, 0.0, 4.0, 4.0).with_velocity(10.0, 0.0);
        body.acceleration = Vec2::new(0.0, 20.0);

        body.pre_update();
        body.post_update(0.5);

        assert_relative_eq!(body.x(), 5.0);
        // Half the velocity change applies before the move, half after
        assert_relative_eq!(body.y(), 2.5);
        assert_relative_eq!(body.velocity.y, 10.0);
        assert_eq!(body.last, Point::new(0.0, 0.0));
        assert_relative_eq!(body.delta().x, 5.0);
    }

    #[test]
    fn test_static_body_does_not_move() {
        let mut body = Body::new(3.0, 4.0, 4.0, 4.0).with_velocity(10.0, 10.0);
        body.moves = false;
        body.pre_update();
        body.post_update(1.0);
        assert_eq!(body.x(), 3.0);
        assert_eq!(body.y(), 4.0);
    }

    #[test]
    fn test_hull_covers_motion() {
        let mut body = Body::new(10.0, 10.0, 4.0, 4.0);
        body.last = Point::new(4.0, 12.0);

        let hull = body.hull();
        assert_relative_eq!(hull.x(), 4.0);
        assert_relative_eq!(hull.y(), 10.0);
        assert_relative_eq!(hull.right(), 14.0);
        assert_relative_eq!(hull.bottom(), 16.0);
    }

    #[test]
    fn test_degenerate_mass_and_elasticity() {
        let mut body = Body::default();
        body.mass = 0.0;
        assert_eq!(body.effective_mass(), 1.0);
        body.mass = f32::NAN;
        assert_eq!(body.effective_mass(), 1.0);
        body.mass = 3.0;
        assert_eq!(body.effective_mass(), 3.0);

        body.elasticity = 2.0;
        assert_eq!(body.effective_elasticity(), 1.0);
        body.elasticity = f32::NAN;
        assert_eq!(body.effective_elasticity(), 0.0);
    }

    #[test]
    fn test_reset_kill_revive() {
        let mut body = Body::new(0.0, 0.0, 2.0, 2.0).with_velocity(5.0, 5.0);
        body.touching = CollisionSides::ANY;
        body.kill();
        assert!(!body.exists);
        assert!(!body.is_collidable());

        body.reset(7.0, 9.0);
        assert!(body.exists && body.alive);
        assert_eq!(body.velocity, Vec2::zeros());
        assert_eq!(body.last, Point::new(7.0, 9.0));
        assert_eq!(body.touching, CollisionSides::NONE);

        body.set_solid(false);
        assert!(!body.solid());
        assert!(!body.is_collidable());
    }
}
