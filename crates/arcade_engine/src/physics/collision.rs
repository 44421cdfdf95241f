//! Narrow-phase separation
//!
//! Axis-aligned overlap resolution between two moving bodies, or between a
//! body and a static tile. Each axis is handled independently:
//!
//! 1. Bodies that did not move relative to each other this step are left
//!    alone, even if they overlap.
//! 2. The penetration depth is measured against the distance both bodies
//!    travelled plus [`Collision::OVERLAP_BIAS`]; anything deeper is treated
//!    as a brush past rather than a hit.
//! 3. Accepted hits set opposite `touching` sides on the two bodies, push
//!    the movable one(s) apart and exchange velocity weighted by mass and
//!    per-body elasticity.
//!
//! Nothing here fails. Every rejected case simply returns `false`.

use crate::foundation::math::finite_or_zero;
use crate::geom::Rectangle;

use super::body::{Body, CollisionSides};

/// A static tile as seen by the separation routines
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileBounds {
    /// Left edge in world units
    pub x: f32,
    /// Top edge in world units
    pub y: f32,
    /// Tile width
    pub width: f32,
    /// Tile height
    pub height: f32,
    /// Tile faces that can be hit
    pub allow_collisions: CollisionSides,
    /// Push bodies out horizontally, otherwise only report the contact
    pub separate_x: bool,
    /// Push bodies out vertically, otherwise only report the contact
    pub separate_y: bool,
}

impl TileBounds {
    /// Solid tile colliding on every face
    pub fn solid(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            allow_collisions: CollisionSides::ANY,
            separate_x: true,
            separate_y: true,
        }
    }

    fn rectangle(&self) -> Rectangle {
        Rectangle::new(self.x, self.y, self.width, self.height)
    }
}

/// One body's extent along the axis being separated
#[derive(Debug, Clone, Copy)]
struct Span {
    position: f32,
    size: f32,
    delta: f32,
}

/// An accepted penetration along one axis
#[derive(Debug, Clone, Copy)]
struct Contact {
    /// Signed distance the first body must move back along the axis
    overlap: f32,
    first_side: CollisionSides,
    second_side: CollisionSides,
}

/// Narrow-phase separation routines
pub struct Collision;

impl Collision {
    /// Extra penetration tolerated on top of the distance travelled
    pub const OVERLAP_BIAS: f32 = 4.0;

    /// Separate two bodies on both axes
    ///
    /// Both axes are always evaluated. Returns whether either produced a
    /// correction.
    pub fn separate(a: &mut Body, b: &mut Body) -> bool {
        let separated_x = Self::separate_x(a, b);
        let separated_y = Self::separate_y(a, b);
        separated_x || separated_y
    }

    /// Horizontal component of [`Collision::separate`]
    pub fn separate_x(a: &mut Body, b: &mut Body) -> bool {
        if a.immovable && b.immovable {
            return false;
        }

        let delta_a = a.x() - a.last.x;
        let delta_b = b.x() - b.last.x;
        if !moved_relative(delta_a, delta_b) {
            return false;
        }

        if !swept_x(a, delta_a).overlaps(&swept_x(b, delta_b)) {
            return false;
        }

        let contact = Self::axis_contact(
            Span { position: a.x(), size: a.width(), delta: delta_a },
            Span { position: b.x(), size: b.width(), delta: delta_b },
            CollisionSides::RIGHT,
            CollisionSides::LEFT,
            a.allow_collisions,
            b.allow_collisions,
        );
        let Some(contact) = contact else {
            return false;
        };

        a.touching |= contact.first_side;
        b.touching |= contact.second_side;

        let (va, vb) = (a.velocity.x, b.velocity.x);
        if !a.immovable && !b.immovable {
            let half = contact.overlap * 0.5;
            a.set_x(a.x() - half);
            b.set_x(b.x() + half);

            let (new_a, new_b) = exchange_velocity(a, va, b, vb);
            a.velocity.x = new_a;
            b.velocity.x = new_b;
        } else if !a.immovable {
            a.set_x(a.x() - contact.overlap);
            a.velocity.x = finite_or_zero(vb - va * a.effective_elasticity());
        } else {
            b.set_x(b.x() + contact.overlap);
            b.velocity.x = finite_or_zero(va - vb * b.effective_elasticity());
        }

        true
    }

    /// Vertical component of [`Collision::separate`]
    ///
    /// A body landing on a moving partner that is active and moves is
    /// carried along by the partner's horizontal displacement.
    pub fn separate_y(a: &mut Body, b: &mut Body) -> bool {
        if a.immovable && b.immovable {
            return false;
        }

        let delta_a = a.y() - a.last.y;
        let delta_b = b.y() - b.last.y;
        if !moved_relative(delta_a, delta_b) {
            return false;
        }

        if !swept_y(a, delta_a).overlaps(&swept_y(b, delta_b)) {
            return false;
        }

        let contact = Self::axis_contact(
            Span { position: a.y(), size: a.height(), delta: delta_a },
            Span { position: b.y(), size: b.height(), delta: delta_b },
            CollisionSides::DOWN,
            CollisionSides::UP,
            a.allow_collisions,
            b.allow_collisions,
        );
        let Some(contact) = contact else {
            return false;
        };

        a.touching |= contact.first_side;
        b.touching |= contact.second_side;

        let (va, vb) = (a.velocity.y, b.velocity.y);
        if !a.immovable && !b.immovable {
            let half = contact.overlap * 0.5;
            a.set_y(a.y() - half);
            b.set_y(b.y() + half);

            let (new_a, new_b) = exchange_velocity(a, va, b, vb);
            a.velocity.y = new_a;
            b.velocity.y = new_b;
        } else if !a.immovable {
            a.set_y(a.y() - contact.overlap);
            a.velocity.y = finite_or_zero(vb - va * a.effective_elasticity());

            if b.active && b.moves && delta_a > delta_b {
                let carry = b.x() - b.last.x;
                if carry.is_finite() {
                    a.set_x(a.x() + carry);
                }
            }
        } else {
            b.set_y(b.y() + contact.overlap);
            b.velocity.y = finite_or_zero(va - vb * b.effective_elasticity());

            if a.active && a.moves && delta_a < delta_b {
                let carry = a.x() - a.last.x;
                if carry.is_finite() {
                    b.set_x(b.x() + carry);
                }
            }
        }

        true
    }

    /// Separate a body from a static tile on both axes
    pub fn separate_tile(body: &mut Body, tile: &TileBounds) -> bool {
        let separated_x = Self::separate_tile_x(body, tile);
        let separated_y = Self::separate_tile_y(body, tile);
        separated_x || separated_y
    }

    /// Horizontal body-versus-tile separation
    ///
    /// The tile never moves, so its delta and velocity are zero. Returns
    /// `true` for an accepted contact even when the tile does not push the
    /// body out.
    pub fn separate_tile_x(body: &mut Body, tile: &TileBounds) -> bool {
        if body.immovable {
            return false;
        }

        let delta = body.x() - body.last.x;
        if !moved_relative(delta, 0.0) {
            return false;
        }

        if !swept_x(body, delta).overlaps(&tile.rectangle()) {
            return false;
        }

        let contact = Self::axis_contact(
            Span { position: body.x(), size: body.width(), delta },
            Span { position: tile.x, size: tile.width, delta: 0.0 },
            CollisionSides::RIGHT,
            CollisionSides::LEFT,
            body.allow_collisions,
            tile.allow_collisions,
        );
        let Some(contact) = contact else {
            return false;
        };

        body.touching |= contact.first_side;

        if tile.separate_x {
            body.set_x(body.x() - contact.overlap);
            body.velocity.x = finite_or_zero(-(body.velocity.x * body.effective_elasticity()));
        }

        true
    }

    /// Vertical body-versus-tile separation
    pub fn separate_tile_y(body: &mut Body, tile: &TileBounds) -> bool {
        if body.immovable {
            return false;
        }

        let delta = body.y() - body.last.y;
        if !moved_relative(delta, 0.0) {
            return false;
        }

        if !swept_y(body, delta).overlaps(&tile.rectangle()) {
            return false;
        }

        let contact = Self::axis_contact(
            Span { position: body.y(), size: body.height(), delta },
            Span { position: tile.y, size: tile.height, delta: 0.0 },
            CollisionSides::DOWN,
            CollisionSides::UP,
            body.allow_collisions,
            tile.allow_collisions,
        );
        let Some(contact) = contact else {
            return false;
        };

        body.touching |= contact.first_side;

        if tile.separate_y {
            body.set_y(body.y() - contact.overlap);
            body.velocity.y = finite_or_zero(-(body.velocity.y * body.effective_elasticity()));
        }

        true
    }

    /// Measure the penetration of `first` into `second` along one axis
    ///
    /// `forward` is the side facing the positive direction of the axis and
    /// `backward` its opposite. Returns `None` when the overlap is beyond
    /// the travelled distance plus bias, has the wrong sign for the
    /// direction of travel, or involves a side that may not collide.
    fn axis_contact(
        first: Span,
        second: Span,
        forward: CollisionSides,
        backward: CollisionSides,
        first_allowed: CollisionSides,
        second_allowed: CollisionSides,
    ) -> Option<Contact> {
        let max_overlap = first.delta.abs() + second.delta.abs() + Self::OVERLAP_BIAS;

        let contact = if first.delta > second.delta {
            let overlap = first.position + first.size - second.position;
            if overlap <= 0.0
                || overlap > max_overlap
                || !first_allowed.contains(forward)
                || !second_allowed.contains(backward)
            {
                return None;
            }
            Contact { overlap, first_side: forward, second_side: backward }
        } else {
            let overlap = first.position - second.size - second.position;
            if overlap >= 0.0
                || -overlap > max_overlap
                || !first_allowed.contains(backward)
                || !second_allowed.contains(forward)
            {
                return None;
            }
            Contact { overlap, first_side: backward, second_side: forward }
        };

        contact.overlap.is_finite().then_some(contact)
    }
}

fn moved_relative(delta_a: f32, delta_b: f32) -> bool {
    delta_a.is_finite() && delta_b.is_finite() && delta_a != delta_b
}

// Current box widened by the horizontal travel, at the previous height
fn swept_x(body: &Body, delta: f32) -> Rectangle {
    Rectangle::new(
        body.x() - delta.max(0.0),
        body.last.y,
        body.width() + delta.abs(),
        body.height(),
    )
}

// Current box stretched by the vertical travel
fn swept_y(body: &Body, delta: f32) -> Rectangle {
    Rectangle::new(
        body.x(),
        body.y() - delta.max(0.0),
        body.width(),
        body.height() + delta.abs(),
    )
}

fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// Mass-weighted exchange with per-body restitution
fn exchange_velocity(a: &Body, va: f32, b: &Body, vb: f32) -> (f32, f32) {
    let mass_a = a.effective_mass();
    let mass_b = b.effective_mass();

    let mut new_a = ((vb * vb * mass_b) / mass_a).sqrt() * sign(vb);
    let mut new_b = ((va * va * mass_a) / mass_b).sqrt() * sign(va);
    let average = (new_a + new_b) * 0.5;
    new_a -= average;
    new_b -= average;

    (
        finite_or_zero(average + new_a * a.effective_elasticity()),
        finite_or_zero(average + new_b * b.effective_elasticity()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Point;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    /// Body that moved from `from` to `to` during the step
    fn moving(from: (f32, f32), to: (f32, f32), size: (f32, f32)) -> Body {
        let mut body = Body::new(to.0, to.1, size.0, size.1);
        body.last = Point::new(from.0, from.1);
        body
    }

    #[test]
    fn test_stationary_overlap_is_not_separated() {
        let mut a = Body::new(0.0, 0.0, 16.0, 16.0);
        let mut b = Body::new(10.0, 0.0, 16.0, 16.0);
        let (before_a, before_b) = (a.clone(), b.clone());

        assert!(!Collision::separate(&mut a, &mut b));
        assert_eq!(a, before_a);
        assert_eq!(b, before_b);
    }

    #[test]
    fn test_body_into_immovable_block() {
        let mut a = moving((0.0, 0.0), (5.0, 0.0), (8.0, 8.0)).with_velocity(100.0, 0.0);
        let mut b = Body::new(10.0, 0.0, 16.0, 16.0).immovable();

        assert!(Collision::separate(&mut a, &mut b));

        assert!(a.is_touching(CollisionSides::RIGHT));
        assert!(b.is_touching(CollisionSides::LEFT));
        assert_relative_eq!(a.x(), 10.0 - a.width());
        assert_relative_eq!(a.velocity.x, 0.0);
        assert_relative_eq!(b.x(), 10.0);
    }

    #[test]
    fn test_disjoint_hulls_are_untouched() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut checked = 0;

        while checked < 300 {
            let mut a = moving(
                (rng.gen_range(0.0..200.0), rng.gen_range(0.0..200.0)),
                (rng.gen_range(0.0..200.0), rng.gen_range(0.0..200.0)),
                (rng.gen_range(1.0..20.0), rng.gen_range(1.0..20.0)),
            );
            let mut b = moving(
                (rng.gen_range(0.0..200.0), rng.gen_range(0.0..200.0)),
                (rng.gen_range(0.0..200.0), rng.gen_range(0.0..200.0)),
                (rng.gen_range(1.0..20.0), rng.gen_range(1.0..20.0)),
            );
            if a.hull().overlaps(&b.hull()) {
                continue;
            }
            checked += 1;

            let (before_a, before_b) = (a.clone(), b.clone());
            assert!(!Collision::separate(&mut a, &mut b));
            assert_eq!(a, before_a);
            assert_eq!(b, before_b);
        }
    }

    #[test]
    fn test_immovable_body_never_changes() {
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..500 {
            let mut a = moving(
                (rng.gen_range(0.0..40.0), rng.gen_range(0.0..40.0)),
                (rng.gen_range(0.0..40.0), rng.gen_range(0.0..40.0)),
                (rng.gen_range(1.0..16.0), rng.gen_range(1.0..16.0)),
            )
            .with_velocity(rng.gen_range(-50.0..50.0), rng.gen_range(-50.0..50.0));
            let mut wall = moving(
                (rng.gen_range(0.0..40.0), rng.gen_range(0.0..40.0)),
                (rng.gen_range(0.0..40.0), rng.gen_range(0.0..40.0)),
                (rng.gen_range(1.0..16.0), rng.gen_range(1.0..16.0)),
            )
            .with_velocity(rng.gen_range(-50.0..50.0), rng.gen_range(-50.0..50.0))
            .immovable();

            let (x, y, velocity) = (wall.x(), wall.y(), wall.velocity);
            Collision::separate(&mut a, &mut wall);
            Collision::separate(&mut wall, &mut a);

            assert_eq!(wall.x(), x);
            assert_eq!(wall.y(), y);
            assert_eq!(wall.velocity, velocity);
        }
    }

    #[test]
    fn test_elastic_head_on_bounce() {
        let mut a = moving((0.0, 0.0), (5.0, 0.0), (8.0, 8.0))
            .with_velocity(100.0, 0.0)
            .with_elasticity(1.0);
        let mut b = moving((16.0, 0.0), (11.0, 0.0), (8.0, 8.0))
            .with_velocity(-100.0, 0.0)
            .with_elasticity(1.0);

        assert!(Collision::separate_x(&mut a, &mut b));

        assert_relative_eq!(a.velocity.x, -100.0, epsilon = 1e-4);
        assert_relative_eq!(b.velocity.x, 100.0, epsilon = 1e-4);
        // The overlap of 2 is split evenly
        assert_relative_eq!(a.x(), 4.0);
        assert_relative_eq!(b.x(), 12.0);
    }

    #[test]
    fn test_touching_sides_come_in_pairs() {
        let mut a = moving((0.0, 0.0), (5.0, 0.0), (8.0, 8.0));
        let mut b = moving((20.0, 0.0), (10.0, 0.0), (8.0, 8.0));
        assert!(Collision::separate_x(&mut a, &mut b));
        assert_eq!(a.touching, CollisionSides::RIGHT);
        assert_eq!(b.touching, CollisionSides::LEFT);

        // Same collision seen from the other body
        let mut a = moving((0.0, 0.0), (5.0, 0.0), (8.0, 8.0));
        let mut b = moving((20.0, 0.0), (10.0, 0.0), (8.0, 8.0));
        assert!(Collision::separate_x(&mut b, &mut a));
        assert_eq!(b.touching, CollisionSides::LEFT);
        assert_eq!(a.touching, CollisionSides::RIGHT);

        let mut top = moving((0.0, 0.0), (0.0, 6.0), (8.0, 8.0));
        let mut bottom = Body::new(0.0, 12.0, 8.0, 8.0).immovable();
        assert!(Collision::separate_y(&mut top, &mut bottom));
        assert_eq!(top.touching, CollisionSides::DOWN);
        assert_eq!(bottom.touching, CollisionSides::UP);
    }

    #[test]
    fn test_overlap_beyond_bias_is_ignored() {
        let mut a = moving((0.0, 0.0), (1.0, 0.0), (16.0, 16.0));
        let mut b = Body::new(2.0, 0.0, 16.0, 16.0);

        assert!(!Collision::separate_x(&mut a, &mut b));
        assert_eq!(a.touching, CollisionSides::NONE);
        assert_relative_eq!(a.x(), 1.0);
    }

    #[test]
    fn test_forbidden_side_is_ignored() {
        let mut a = moving((0.0, 0.0), (5.0, 0.0), (8.0, 8.0)).with_velocity(100.0, 0.0);
        let mut b = Body::new(10.0, 0.0, 16.0, 16.0)
            .immovable()
            .with_allow_collisions(CollisionSides::RIGHT | CollisionSides::UP | CollisionSides::DOWN);

        assert!(!Collision::separate(&mut a, &mut b));
        assert_eq!(a.touching, CollisionSides::NONE);
        assert_relative_eq!(a.x(), 5.0);
        assert_relative_eq!(a.velocity.x, 100.0);
    }

    #[test]
    fn test_two_immovable_bodies() {
        let mut a = moving((0.0, 0.0), (5.0, 0.0), (8.0, 8.0)).immovable();
        let mut b = Body::new(10.0, 0.0, 16.0, 16.0).immovable();
        assert!(!Collision::separate(&mut a, &mut b));
    }

    #[test]
    fn test_rider_is_carried_by_platform() {
        let mut rider = moving((0.0, 0.0), (0.0, 5.0), (8.0, 8.0)).with_velocity(0.0, 60.0);
        let mut platform = moving((0.0, 12.0), (3.0, 12.0), (32.0, 4.0)).immovable();

        assert!(!Collision::separate_x(&mut rider, &mut platform));
        assert!(Collision::separate_y(&mut rider, &mut platform));

        assert_relative_eq!(rider.y(), 4.0);
        assert_relative_eq!(rider.x(), 3.0);
        assert_relative_eq!(rider.velocity.y, 0.0);
        assert!(rider.is_touching(CollisionSides::FLOOR));
    }

    #[test]
    fn test_degenerate_mass_does_not_poison_velocity() {
        let mut a = moving((0.0, 0.0), (5.0, 0.0), (8.0, 8.0))
            .with_velocity(100.0, 0.0)
            .with_mass(0.0);
        let mut b = moving((16.0, 0.0), (11.0, 0.0), (8.0, 8.0))
            .with_velocity(-100.0, 0.0)
            .with_mass(-3.0);

        assert!(Collision::separate_x(&mut a, &mut b));
        assert!(a.velocity.x.is_finite());
        assert!(b.velocity.x.is_finite());
    }

    #[test]
    fn test_tile_stops_falling_body() {
        let mut body = moving((0.0, 0.0), (0.0, 6.0), (8.0, 8.0))
            .with_velocity(0.0, 120.0)
            .with_elasticity(0.5);
        let tile = TileBounds::solid(0.0, 12.0, 16.0, 16.0);

        assert!(Collision::separate_tile(&mut body, &tile));
        assert_relative_eq!(body.y(), 4.0);
        assert_relative_eq!(body.velocity.y, -60.0);
        assert_eq!(body.touching, CollisionSides::DOWN);
    }

    #[test]
    fn test_tile_without_separation_still_reports() {
        let mut body = moving((0.0, 0.0), (0.0, 6.0), (8.0, 8.0)).with_velocity(0.0, 120.0);
        let tile = TileBounds {
            separate_y: false,
            ..TileBounds::solid(0.0, 12.0, 16.0, 16.0)
        };

        assert!(Collision::separate_tile_y(&mut body, &tile));
        assert!(body.is_touching(CollisionSides::DOWN));
        assert_relative_eq!(body.y(), 6.0);
        assert_relative_eq!(body.velocity.y, 120.0);
    }

    #[test]
    fn test_tile_face_filtering() {
        // Moving left into a tile whose right face does not collide
        let mut body = moving((20.0, 0.0), (14.0, 0.0), (8.0, 8.0));
        let tile = TileBounds {
            allow_collisions: CollisionSides::LEFT | CollisionSides::UP,
            ..TileBounds::solid(0.0, 0.0, 16.0, 16.0)
        };
        assert!(!Collision::separate_tile_x(&mut body, &tile));

        let tile = TileBounds::solid(0.0, 0.0, 16.0, 16.0);
        assert!(Collision::separate_tile_x(&mut body, &tile));
        assert_relative_eq!(body.x(), 16.0);
        assert_eq!(body.touching, CollisionSides::LEFT);
    }
}
