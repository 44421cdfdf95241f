//! Spatial partitioning data structures
//!
//! Provides the per-query quadtree used as the collision broad phase and
//! the linked registry lists its nodes are built from.

pub mod linked_list;
pub mod quadtree;

pub use linked_list::{Cursor, LinkedList};
pub use quadtree::{CollisionMode, ListId, QuadNode, QuadTree, Quadrant};
