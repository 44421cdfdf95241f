//! Tile layer collision
//!
//! A static grid of tile indices. Each index refers to a shared [`Tile`]
//! describing which faces collide and whether hits push bodies out. Bodies
//! are resolved against the cells under their swept hull with the tile
//! variants of [`Collision`]; no quadtree is involved.

use crate::foundation::math::snap_to_floor;
use crate::geom::Rectangle;

use super::body::{Body, BodyHandle, BodyStore, CollisionSides};
use super::collision::{Collision, TileBounds};
use super::group::Collidable;

/// Called once per body that hit at least one tile
pub type TileCallback<'a> = &'a mut dyn FnMut(BodyHandle, &mut Body, &[TileHit]);

/// Collision settings shared by every cell using the same index
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    /// Faces that can be hit
    pub allow_collisions: CollisionSides,
    /// Push bodies out horizontally
    pub separate_x: bool,
    /// Push bodies out vertically
    pub separate_y: bool,
}

impl Default for Tile {
    fn default() -> Self {
        Self {
            allow_collisions: CollisionSides::NONE,
            separate_x: true,
            separate_y: true,
        }
    }
}

impl Tile {
    /// Enable collision on `sides`, optionally clearing the previous faces first
    pub fn set_collision(&mut self, sides: CollisionSides, reset: bool, separate_x: bool, separate_y: bool) {
        if reset {
            self.allow_collisions = CollisionSides::NONE;
        }
        self.allow_collisions |= sides;
        self.separate_x = separate_x;
        self.separate_y = separate_y;
    }
}

/// A grid cell that collided with a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileHit {
    /// Column of the cell
    pub tile_x: usize,
    /// Row of the cell
    pub tile_y: usize,
    /// Tile index stored in the cell
    pub index: usize,
    /// World-space bounds and settings of the cell
    pub bounds: TileBounds,
}

/// One layer of a tile map
#[derive(Debug, Clone)]
pub struct TileLayer {
    tile_width: f32,
    tile_height: f32,
    width_in_tiles: usize,
    height_in_tiles: usize,
    cells: Vec<Option<usize>>,
    tiles: Vec<Tile>,
}

impl TileLayer {
    /// Create an empty layer with `tile_count` tile kinds, none of them colliding
    pub fn new(
        tile_width: f32,
        tile_height: f32,
        width_in_tiles: usize,
        height_in_tiles: usize,
        tile_count: usize,
    ) -> Self {
        Self {
            tile_width,
            tile_height,
            width_in_tiles,
            height_in_tiles,
            cells: vec![None; width_in_tiles * height_in_tiles],
            tiles: vec![Tile::default(); tile_count],
        }
    }

    /// Width in tiles
    pub fn width_in_tiles(&self) -> usize {
        self.width_in_tiles
    }

    /// Height in tiles
    pub fn height_in_tiles(&self) -> usize {
        self.height_in_tiles
    }

    /// Width in world units
    pub fn width_in_pixels(&self) -> f32 {
        self.width_in_tiles as f32 * self.tile_width
    }

    /// Height in world units
    pub fn height_in_pixels(&self) -> f32 {
        self.height_in_tiles as f32 * self.tile_height
    }

    /// Tile settings for an index
    pub fn tile(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    /// Mutable tile settings for an index
    pub fn tile_mut(&mut self, index: usize) -> Option<&mut Tile> {
        self.tiles.get_mut(index)
    }

    fn cell(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width_in_tiles && y < self.height_in_tiles).then(|| y * self.width_in_tiles + x)
    }

    /// Store a tile index in a cell; returns `false` when out of range
    pub fn put_tile(&mut self, x: usize, y: usize, index: usize) -> bool {
        match self.cell(x, y) {
            Some(cell) if index < self.tiles.len() => {
                self.cells[cell] = Some(index);
                true
            }
            _ => false,
        }
    }

    /// Empty a cell
    pub fn clear_tile(&mut self, x: usize, y: usize) {
        if let Some(cell) = self.cell(x, y) {
            self.cells[cell] = None;
        }
    }

    /// Fill every cell of a rectangular block with one index
    pub fn fill(&mut self, index: usize, x: usize, y: usize, width: usize, height: usize) {
        for ty in y..y.saturating_add(height) {
            for tx in x..x.saturating_add(width) {
                self.put_tile(tx, ty, index);
            }
        }
    }

    /// Tile index stored at a grid position
    pub fn tile_index(&self, x: usize, y: usize) -> Option<usize> {
        self.cell(x, y).and_then(|cell| self.cells[cell])
    }

    /// Tile index under a world-space point
    pub fn tile_at_world_xy(&self, x: f32, y: f32) -> Option<usize> {
        let column = snap_to_floor(x, self.tile_width) / self.tile_width;
        let row = snap_to_floor(y, self.tile_height) / self.tile_height;

        if !(column >= 0.0 && row >= 0.0) {
            return None;
        }
        self.tile_index(column as usize, row as usize)
    }

    /// Configure tile indices `start..end`
    pub fn set_collision_range(
        &mut self,
        start: usize,
        end: usize,
        sides: CollisionSides,
        reset: bool,
        separate_x: bool,
        separate_y: bool,
    ) {
        let end = end.min(self.tiles.len());
        for tile in self.tiles.iter_mut().take(end).skip(start) {
            tile.set_collision(sides, reset, separate_x, separate_y);
        }
    }

    /// Configure a list of tile indices; unknown indices are ignored
    pub fn set_collision_by_index(
        &mut self,
        indices: &[usize],
        sides: CollisionSides,
        reset: bool,
        separate_x: bool,
        separate_y: bool,
    ) {
        for &index in indices {
            if let Some(tile) = self.tiles.get_mut(index) {
                tile.set_collision(sides, reset, separate_x, separate_y);
            }
        }
    }

    /// Colliding cells under a world-space rectangle, clamped to the layer
    pub fn overlapping_cells(&self, area: &Rectangle) -> Vec<TileHit> {
        let mut hits = Vec::new();

        let Some((x0, x1)) = Self::cell_range(area.left(), area.right(), self.tile_width, self.width_in_tiles) else {
            return hits;
        };
        let Some((y0, y1)) = Self::cell_range(area.top(), area.bottom(), self.tile_height, self.height_in_tiles) else {
            return hits;
        };

        for ty in y0..y1 {
            for tx in x0..x1 {
                let Some(index) = self.tile_index(tx, ty) else {
                    continue;
                };
                let Some(tile) = self.tiles.get(index) else {
                    continue;
                };
                if tile.allow_collisions.is_empty() {
                    continue;
                }

                hits.push(TileHit {
                    tile_x: tx,
                    tile_y: ty,
                    index,
                    bounds: TileBounds {
                        x: tx as f32 * self.tile_width,
                        y: ty as f32 * self.tile_height,
                        width: self.tile_width,
                        height: self.tile_height,
                        allow_collisions: tile.allow_collisions,
                        separate_x: tile.separate_x,
                        separate_y: tile.separate_y,
                    },
                });
            }
        }

        hits
    }

    // Half-open range of cells spanned by [start, end] along one axis
    fn cell_range(start: f32, end: f32, size: f32, count: usize) -> Option<(usize, usize)> {
        if !(start.is_finite() && end.is_finite()) || size <= 0.0 {
            return None;
        }

        let first = (start / size).floor().max(0.0);
        let last = ((end / size).floor() + 1.0).min(count as f32);
        if first >= last {
            return None;
        }

        Some((first as usize, last as usize))
    }

    /// Resolve every body in `collidable` against the layer
    ///
    /// Only bodies that exist, are alive, can collide and are not immovable
    /// are tested. `callback` runs once for each body that hit at least one
    /// cell. Returns whether any cell was hit.
    pub fn collide(
        &self,
        bodies: &mut BodyStore,
        collidable: &Collidable,
        mut callback: Option<TileCallback<'_>>,
    ) -> bool {
        let mut any_hit = false;

        for handle in collidable.leaves() {
            let Some(body) = bodies.get_mut(handle) else {
                continue;
            };
            if !body.is_collidable() || !body.alive || body.immovable {
                continue;
            }

            let hits: Vec<TileHit> = self
                .overlapping_cells(&body.hull())
                .into_iter()
                .filter(|cell| Collision::separate_tile(body, &cell.bounds))
                .collect();

            if hits.is_empty() {
                continue;
            }
            any_hit = true;

            if let Some(callback) = callback.as_mut() {
                callback(handle, body, &hits);
            }
        }

        any_hit
    }
}
