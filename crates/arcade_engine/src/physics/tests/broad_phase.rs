//! Quadtree results compared against a brute-force scan

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::PhysicsConfig;
use crate::physics::{
    Body, BodyHandle, BodyStore, Collidable, CollisionSides, Group, OverlapPair,
    PhysicsCollisionSystem,
};

fn random_body(rng: &mut StdRng) -> Body {
    let size = rng.gen_range(2.0..30.0);
    let x = rng.gen_range(12.0..750.0);
    let y = rng.gen_range(12.0..550.0);

    let mut body = Body::new(x, y, size, rng.gen_range(2.0..30.0));
    body.last.x = x - rng.gen_range(-10.0..10.0);
    body.last.y = y - rng.gen_range(-10.0..10.0);

    match rng.gen_range(0..20) {
        0 => body.exists = false,
        1 => body.allow_collisions = CollisionSides::NONE,
        _ => {}
    }
    body
}

fn populate(system: &mut PhysicsCollisionSystem, seed: u64, count: usize) -> Vec<BodyHandle> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count).map(|_| system.spawn(random_body(&mut rng))).collect()
}

fn hulls_overlap(bodies: &BodyStore, a: BodyHandle, b: BodyHandle) -> bool {
    let (a, b) = (&bodies[a], &bodies[b]);
    a.is_collidable() && b.is_collidable() && a.hull().overlaps(&b.hull())
}

/// Run an overlap query and record every notified pair in order
fn collect_pairs(
    system: &mut PhysicsCollisionSystem,
    a: Option<&Collidable>,
    b: Option<&Collidable>,
) -> Vec<(BodyHandle, BodyHandle)> {
    let mut pairs = Vec::new();
    system.overlap(
        a,
        b,
        Some(&mut |pair: &mut OverlapPair<'_>| pairs.push((pair.first, pair.second))),
        None,
    );
    pairs
}

#[test]
fn test_self_collision_matches_brute_force() {
    for seed in 0..8 {
        let mut system = PhysicsCollisionSystem::new(PhysicsConfig::default()).unwrap();
        let handles = populate(&mut system, seed, 150);

        let mut expected = HashSet::new();
        for (i, &a) in handles.iter().enumerate() {
            for &b in &handles[i + 1..] {
                if hulls_overlap(system.bodies(), a, b) {
                    expected.insert((a.min(b), a.max(b)));
                }
            }
        }

        let pairs = collect_pairs(&mut system, None, None);
        let found: HashSet<_> = pairs.iter().map(|&(a, b)| (a.min(b), a.max(b))).collect();

        assert_eq!(pairs.len(), found.len(), "duplicate notification with seed {}", seed);
        assert_eq!(found, expected, "seed {}", seed);
    }
}

#[test]
fn test_cross_collision_matches_brute_force() {
    for seed in 100..106 {
        let mut system = PhysicsCollisionSystem::new(PhysicsConfig::default()).unwrap();
        let handles = populate(&mut system, seed, 160);
        let (left, right) = handles.split_at(80);

        let mut expected = HashSet::new();
        for &a in left {
            for &b in right {
                if hulls_overlap(system.bodies(), a, b) {
                    expected.insert((a, b));
                }
            }
        }

        let first = Collidable::Group(Group::from_handles(left.iter().copied()));
        let second = Collidable::Group(Group::from_handles(right.iter().copied()));
        let pairs = collect_pairs(&mut system, Some(&first), Some(&second));
        let found: HashSet<_> = pairs.iter().copied().collect();

        assert_eq!(pairs.len(), found.len(), "duplicate notification with seed {}", seed);
        assert_eq!(found, expected, "seed {}", seed);
    }
}

#[test]
fn test_same_collidable_twice_is_self_collision() {
    let mut system = PhysicsCollisionSystem::new(PhysicsConfig::default()).unwrap();
    let a = system.spawn(Body::new(100.0, 100.0, 20.0, 20.0));
    let b = system.spawn(Body::new(110.0, 110.0, 20.0, 20.0));

    let group = Collidable::Group(Group::from_handles([a, b]));
    let pairs = collect_pairs(&mut system, Some(&group), Some(&group));
    assert_eq!(pairs.len(), 1);
}

#[test]
fn test_straddling_bodies_are_notified_once() {
    let mut system = PhysicsCollisionSystem::new(PhysicsConfig::default()).unwrap();

    // Both cross the vertical and horizontal midlines of the world
    let a = system.spawn(Body::new(380.0, 280.0, 40.0, 40.0));
    let b = system.spawn(Body::new(390.0, 290.0, 40.0, 40.0));

    let mut tree = crate::spatial::QuadTree::new(
        system.world_bounds().to_rectangle(),
        system.world_divisions(),
    );
    tree.load(system.bodies(), system.world_group(), None);
    assert!(tree.registration_count(a) > 1);
    assert!(tree.registration_count(b) > 1);

    let pairs = collect_pairs(&mut system, None, None);
    assert_eq!(pairs.len(), 1);
    let (x, y) = pairs[0];
    assert_eq!((x.min(y), x.max(y)), (a.min(b), a.max(b)));
}

#[test]
fn test_swept_hull_catches_tunnelling_body() {
    let mut system = PhysicsCollisionSystem::new(PhysicsConfig::default()).unwrap();

    // Jumped clean over the wall in one step
    let mut bullet = Body::new(300.0, 100.0, 4.0, 4.0).with_velocity(6000.0, 0.0);
    bullet.last.x = 200.0;
    let bullet = system.spawn(bullet);
    let wall = system.spawn(Body::new(250.0, 80.0, 8.0, 40.0).immovable());

    let pairs = collect_pairs(&mut system, None, None);
    assert_eq!(pairs.len(), 1);
    assert!(pairs[0] == (bullet, wall) || pairs[0] == (wall, bullet));
}
