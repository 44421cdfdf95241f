//! Physics module for 2D arcade collision detection and response
//!
//! Bodies are axis-aligned boxes stored in a [`BodyStore`]. Overlap checks
//! use a quadtree broad phase over swept hulls followed by axis-by-axis
//! separation; tile layers are checked directly against their grid.

pub mod body;
pub mod collision;
pub mod collision_system;
pub mod group;
pub mod tilemap;

#[cfg(test)]
mod tests;

pub use body::{Body, BodyHandle, BodyStore, CollisionSides};
pub use collision::{Collision, TileBounds};
pub use collision_system::{
    NotifyCallback, OverlapPair, PhysicsCollisionSystem, ProcessCallback,
};
pub use group::{Collidable, Group};
pub use tilemap::{Tile, TileCallback, TileHit, TileLayer};
