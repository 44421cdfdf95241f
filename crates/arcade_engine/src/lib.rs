//! # Arcade Engine
//!
//! The collision core of a 2D arcade game engine.
//!
//! ## Features
//!
//! - **Quadtree broad phase**: rebuilt for every query over the world bounds,
//!   with separate lists for self and cross-group collision
//! - **Swept hulls**: bodies are tested over the area they covered during the
//!   step, so fast movers do not tunnel through thin walls
//! - **Axis-aligned separation**: overlap bias, directional touching flags,
//!   mass and elasticity weighted velocity exchange
//! - **Tile layers**: static grids resolved cell by cell without the quadtree
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use arcade_engine::prelude::*;
//!
//! fn main() -> Result<(), ConfigError> {
//!     let mut physics = PhysicsCollisionSystem::new(PhysicsConfig::default())?;
//!
//!     let ball = physics.spawn(Body::new(100.0, 100.0, 16.0, 16.0).with_velocity(120.0, 0.0));
//!     physics.spawn(Body::new(140.0, 90.0, 8.0, 40.0).immovable());
//!
//!     for _ in 0..60 {
//!         physics.update(1.0 / 60.0);
//!         physics.collide(None, None, None);
//!     }
//!
//!     if let Some(ball) = physics.body(ball) {
//!         println!("ball at {}, {}", ball.x(), ball.y());
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod geom;
pub mod physics;
pub mod spatial;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, PhysicsConfig, WorldBounds},
        foundation::math::{Point, Vec2},
        geom::{Circle, Line, Quad, Rectangle},
        physics::{
            Body, BodyHandle, BodyStore, Collidable, Collision, CollisionSides, Group,
            OverlapPair, PhysicsCollisionSystem, TileHit, TileLayer,
        },
        spatial::{CollisionMode, QuadTree},
    };
}
