//! Quadtree Collision Demo
//!
//! Headless simulation of the arcade collision core:
//! - A seeded field of bouncing balls falling under gravity
//! - Immovable walls on the sides and ceiling
//! - A tile floor with a few raised platforms
//! - Per-frame statistics logged through `log`
//!
//! Run with `RUST_LOG=debug` to also see the quadtree build statistics.

use arcade_engine::foundation::logging;
use arcade_engine::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const CONFIG_PATH: &str = "config/physics.toml";

// Scene setup
const NUM_BALLS: usize = 200;
const BALL_MIN_SIZE: f32 = 4.0;
const BALL_MAX_SIZE: f32 = 12.0;
const BALL_MAX_SPEED: f32 = 150.0;
const GRAVITY: f32 = 300.0;
const WALL_THICKNESS: f32 = 10.0;
const TILE_SIZE: f32 = 20.0;
const SEED: u64 = 0x5EED;

// Simulation
const FRAMES: u32 = 600;
const FRAME_TIME: f32 = 1.0 / 60.0;
const REPORT_EVERY: u32 = 60;

const FLOOR_TILE: usize = 1;
const PLATFORM_TILE: usize = 2;

#[derive(Debug, Default)]
struct FrameStats {
    ball_pairs: usize,
    wall_hits: usize,
    tile_hits: usize,
}

pub struct QuadtreeDemoApp {
    physics: PhysicsCollisionSystem,
    balls: Collidable,
    walls: Collidable,
    layer: TileLayer,
    totals: FrameStats,
}

impl QuadtreeDemoApp {
    pub fn new(config: PhysicsConfig) -> Result<Self, ConfigError> {
        let bounds = config.world_bounds;
        let physics = PhysicsCollisionSystem::new(config)?;
        let layer = Self::create_tile_floor(bounds);

        Ok(Self {
            physics,
            balls: Collidable::Group(Group::new()),
            walls: Collidable::Group(Group::new()),
            layer,
            totals: FrameStats::default(),
        })
    }

    /// Floor along the bottom row plus two one-way platforms
    fn create_tile_floor(bounds: WorldBounds) -> TileLayer {
        let columns = (bounds.width / TILE_SIZE).ceil() as usize;
        let rows = (bounds.height / TILE_SIZE).ceil() as usize;

        let mut layer = TileLayer::new(TILE_SIZE, TILE_SIZE, columns, rows, 3);
        layer.set_collision_by_index(&[FLOOR_TILE], CollisionSides::ANY, true, true, true);
        layer.set_collision_by_index(&[PLATFORM_TILE], CollisionSides::UP, true, true, true);

        layer.fill(FLOOR_TILE, 0, rows.saturating_sub(1), columns, 1);
        layer.fill(PLATFORM_TILE, columns / 8, rows * 2 / 3, columns / 4, 1);
        layer.fill(PLATFORM_TILE, columns * 5 / 8, rows / 2, columns / 4, 1);

        log::info!(
            "Tile floor {}x{} tiles ({}x{} px)",
            layer.width_in_tiles(),
            layer.height_in_tiles(),
            layer.width_in_pixels(),
            layer.height_in_pixels()
        );
        layer
    }

    pub fn initialize(&mut self) {
        let bounds = self.physics.world_bounds();
        let mut rng = StdRng::seed_from_u64(SEED);

        let mut walls = Group::new();
        walls.add(self.physics.spawn(
            Body::new(bounds.x, bounds.y, WALL_THICKNESS, bounds.height).immovable(),
        ));
        walls.add(self.physics.spawn(
            Body::new(bounds.x + bounds.width - WALL_THICKNESS, bounds.y, WALL_THICKNESS, bounds.height)
                .immovable(),
        ));
        walls.add(self.physics.spawn(
            Body::new(bounds.x, bounds.y, bounds.width, WALL_THICKNESS).immovable(),
        ));

        let mut balls = Group::new();
        for _ in 0..NUM_BALLS {
            let size = rng.gen_range(BALL_MIN_SIZE..BALL_MAX_SIZE);
            let x = rng.gen_range(bounds.x + WALL_THICKNESS..bounds.x + bounds.width - WALL_THICKNESS - size);
            let y = rng.gen_range(bounds.y + WALL_THICKNESS..bounds.y + bounds.height / 2.0);

            let mut ball = Body::new(x, y, size, size)
                .with_velocity(
                    rng.gen_range(-BALL_MAX_SPEED..BALL_MAX_SPEED),
                    rng.gen_range(-BALL_MAX_SPEED..BALL_MAX_SPEED),
                )
                .with_mass(size * size)
                .with_elasticity(rng.gen_range(0.2..0.9));
            ball.acceleration.y = GRAVITY;
            ball.max_velocity = Vec2::new(400.0, 400.0);

            balls.add(self.physics.spawn(ball));
        }

        log::info!(
            "Spawned {} balls and {} walls in {:?}",
            balls.len(),
            walls.len(),
            bounds
        );

        self.balls = Collidable::Group(balls);
        self.walls = Collidable::Group(walls);
    }

    pub fn update(&mut self, delta_time: f32) -> FrameStats {
        let mut stats = FrameStats::default();

        self.physics.update(delta_time);

        self.physics.collide(
            Some(&self.balls),
            None,
            Some(&mut |_: &mut OverlapPair<'_>| stats.ball_pairs += 1),
        );

        self.physics.collide(
            Some(&self.balls),
            Some(&self.walls),
            Some(&mut |_: &mut OverlapPair<'_>| stats.wall_hits += 1),
        );

        self.physics.collide_tiles(
            &self.layer,
            Some(&self.balls),
            Some(&mut |_: BodyHandle, _: &mut Body, hits: &[TileHit]| stats.tile_hits += hits.len()),
        );

        self.cull_escaped();
        stats
    }

    /// Kill balls that left the world entirely
    fn cull_escaped(&mut self) {
        let bounds = self.physics.world_bounds().to_rectangle();
        for handle in self.balls.leaves() {
            if let Some(ball) = self.physics.body_mut(handle) {
                if ball.alive && !ball.hull().overlaps(&bounds) {
                    log::warn!("Ball escaped at {}, {}", ball.x(), ball.y());
                    ball.kill();
                }
            }
        }
    }

    fn resting_count(&self) -> usize {
        self.balls
            .leaves()
            .into_iter()
            .filter_map(|handle| self.physics.body(handle))
            .filter(|ball| ball.alive && ball.is_touching(CollisionSides::FLOOR))
            .count()
    }

    pub fn run(mut self) {
        self.initialize();

        for frame in 1..=FRAMES {
            let stats = self.update(FRAME_TIME);
            self.totals.ball_pairs += stats.ball_pairs;
            self.totals.wall_hits += stats.wall_hits;
            self.totals.tile_hits += stats.tile_hits;

            if frame % REPORT_EVERY == 0 {
                log::info!(
                    "Frame {}: {} ball pairs, {} wall hits, {} tile hits, {} resting",
                    frame,
                    stats.ball_pairs,
                    stats.wall_hits,
                    stats.tile_hits,
                    self.resting_count()
                );
            }
        }

        let dead = match &self.balls {
            Collidable::Group(group) => group.count_dead(self.physics.bodies()),
            Collidable::Body(_) => 0,
        };
        log::info!(
            "Finished {} frames: {:?}, {} balls lost",
            FRAMES,
            self.totals,
            dead
        );
    }
}

fn load_config() -> PhysicsConfig {
    if !std::path::Path::new(CONFIG_PATH).exists() {
        log::info!("{} not found, using default physics configuration", CONFIG_PATH);
        return PhysicsConfig::default();
    }

    match PhysicsConfig::load_from_file(CONFIG_PATH) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Failed to load {}: {}, using defaults", CONFIG_PATH, e);
            PhysicsConfig::default()
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    println!("=== Quadtree Collision Demo ===");
    println!("{} balls, {} frames at 60 Hz", NUM_BALLS, FRAMES);
    println!();

    let app = QuadtreeDemoApp::new(load_config())?;
    app.run();
    Ok(())
}
