//! Collision entry points
//!
//! The system owns every body and the world group they are spawned into.
//! Each overlap check runs both phases in one call: a fresh [`QuadTree`]
//! over the world bounds gathers candidate pairs (broad phase), then the
//! callbacks decide what happens to pairs whose hulls really overlap
//! (narrow phase). Nothing survives between calls.

use crate::config::{ConfigError, PhysicsConfig, WorldBounds};
use crate::spatial::QuadTree;

use super::body::{Body, BodyHandle, BodyStore};
use super::collision::Collision;
use super::group::{Collidable, Group};
use super::tilemap::{TileCallback, TileLayer};

/// Two bodies whose swept hulls overlap
///
/// `first` and `second` keep the order the pair was found in: in cross mode
/// `first` always comes from the first collidable.
pub struct OverlapPair<'b> {
    /// Handle of `a`
    pub first: BodyHandle,
    /// Handle of `b`
    pub second: BodyHandle,
    /// First body
    pub a: &'b mut Body,
    /// Second body
    pub b: &'b mut Body,
}

/// Called for every accepted pair
pub type NotifyCallback<'a> = &'a mut dyn FnMut(&mut OverlapPair<'_>);

/// Decides whether a pair is accepted; absent means every pair is
///
/// The callback may change the bodies, which is how [`PhysicsCollisionSystem::collide`]
/// separates them before deciding.
pub type ProcessCallback<'a> = &'a mut dyn FnMut(&mut OverlapPair<'_>) -> bool;

/// Owner of the bodies and the overlap/collide entry points
pub struct PhysicsCollisionSystem {
    bodies: BodyStore,
    world: Collidable,
    world_bounds: WorldBounds,
    world_divisions: u32,
}

impl PhysicsCollisionSystem {
    /// Create an empty world from a validated configuration
    pub fn new(config: PhysicsConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        log::debug!(
            "Physics world {:?} with {} divisions",
            config.world_bounds,
            config.world_divisions
        );

        Ok(Self {
            bodies: BodyStore::with_key(),
            world: Collidable::Group(Group::new()),
            world_bounds: config.world_bounds,
            world_divisions: config.world_divisions,
        })
    }

    /// Add a body to the store and the world group
    pub fn spawn(&mut self, body: Body) -> BodyHandle {
        let handle = self.bodies.insert(body);
        if let Collidable::Group(world) = &mut self.world {
            world.push(handle);
        }
        handle
    }

    /// Remove a body from the store and the world group
    pub fn despawn(&mut self, handle: BodyHandle) -> Option<Body> {
        if let Collidable::Group(world) = &mut self.world {
            world.remove(handle);
        }
        self.bodies.remove(handle)
    }

    /// Look up a body
    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle)
    }

    /// Look up a body mutably
    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.bodies.get_mut(handle)
    }

    /// All bodies
    pub fn bodies(&self) -> &BodyStore {
        &self.bodies
    }

    /// All bodies, mutably
    pub fn bodies_mut(&mut self) -> &mut BodyStore {
        &mut self.bodies
    }

    /// Group holding every spawned body
    pub fn world_group(&self) -> &Collidable {
        &self.world
    }

    /// Current world bounds
    pub fn world_bounds(&self) -> WorldBounds {
        self.world_bounds
    }

    /// Current quadtree granularity
    pub fn world_divisions(&self) -> u32 {
        self.world_divisions
    }

    /// Replace the world bounds; invalid bounds leave the old ones in place
    pub fn set_world_bounds(&mut self, bounds: WorldBounds) -> Result<(), ConfigError> {
        bounds.validate()?;
        self.world_bounds = bounds;
        Ok(())
    }

    /// Replace the quadtree granularity; zero is rejected
    pub fn set_world_divisions(&mut self, divisions: u32) -> Result<(), ConfigError> {
        if divisions == 0 {
            return Err(ConfigError::Invalid(
                "world_divisions must be at least 1".to_string(),
            ));
        }
        self.world_divisions = divisions;
        Ok(())
    }

    /// Step every existing, active body
    pub fn update(&mut self, elapsed: f32) {
        for (_, body) in self.bodies.iter_mut() {
            if body.exists && body.active {
                body.pre_update();
                body.post_update(elapsed);
            }
        }
    }

    /// Find overlapping pairs
    ///
    /// `a = None` stands for the world group. When `b` is `None` or equal
    /// to `a`, members of `a` are tested against each other; otherwise only
    /// pairs with one body from each side are reported. Returns whether any
    /// pair was accepted.
    pub fn overlap(
        &mut self,
        a: Option<&Collidable>,
        b: Option<&Collidable>,
        notify: Option<NotifyCallback<'_>>,
        process: Option<ProcessCallback<'_>>,
    ) -> bool {
        let first = a.unwrap_or(&self.world);

        let mut tree = QuadTree::new(self.world_bounds.to_rectangle(), self.world_divisions);
        tree.load(&self.bodies, first, b);
        let result = tree.execute(&mut self.bodies, notify, process);
        tree.destroy();

        result
    }

    /// Find overlapping pairs and push them apart
    ///
    /// Only pairs that [`Collision::separate`] actually corrected count:
    /// they are the ones passed to `notify` and the return value says
    /// whether there was any.
    pub fn collide(
        &mut self,
        a: Option<&Collidable>,
        b: Option<&Collidable>,
        notify: Option<NotifyCallback<'_>>,
    ) -> bool {
        self.overlap(
            a,
            b,
            notify,
            Some(&mut |pair: &mut OverlapPair<'_>| Collision::separate(pair.a, pair.b)),
        )
    }

    /// Resolve bodies against a tile layer
    pub fn collide_tiles(
        &mut self,
        layer: &TileLayer,
        collidable: Option<&Collidable>,
        callback: Option<TileCallback<'_>>,
    ) -> bool {
        let collidable = collidable.unwrap_or(&self.world);
        layer.collide(&mut self.bodies, collidable, callback)
    }
}
