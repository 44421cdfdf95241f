//! QuadTree broad phase
//!
//! A tree built fresh for every overlap query. Bodies are loaded into one
//! or two registries (the A and B lists), placed recursively into the
//! quadrants their swept hull falls in, and then every node walks its A
//! list against either the rest of the A list (self collision) or its B
//! list (cross collision).
//!
//! Children are created lazily. A child starts with a copy of its parent's
//! lists at the moment it is created, and anything stored at a node later
//! is propagated into the children that already exist. Together this makes
//! every body stored high in the tree visible to every body placed below
//! it.

use std::collections::HashSet;

use crate::geom::Rectangle;
use crate::physics::body::{BodyHandle, BodyStore};
use crate::physics::collision_system::{NotifyCallback, OverlapPair, ProcessCallback};
use crate::physics::group::Collidable;

use super::linked_list::LinkedList;

/// Whether the tree tests one set against itself or two sets against each other
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionMode {
    /// Every pair within the A list
    SelfCollision,
    /// Every A entry against every B entry
    CrossCollision,
}

/// Which registry a body is added to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListId {
    /// First collidable
    A,
    /// Second collidable
    B,
}

/// Child slot of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    /// Top left
    NorthWest = 0,
    /// Top right
    NorthEast = 1,
    /// Bottom right
    SouthEast = 2,
    /// Bottom left
    SouthWest = 3,
}

impl Quadrant {
    /// Every quadrant in visiting order
    pub const ALL: [Quadrant; 4] = [
        Quadrant::NorthWest,
        Quadrant::NorthEast,
        Quadrant::SouthEast,
        Quadrant::SouthWest,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Body being placed, with its edges computed once per add
#[derive(Debug, Clone, Copy)]
struct Placement {
    handle: BodyHandle,
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
    list: ListId,
}

/// State shared by one execute pass
struct ExecuteContext<'a, 'n, 'p> {
    bodies: &'a mut BodyStore,
    mode: CollisionMode,
    notify: Option<NotifyCallback<'n>>,
    process: Option<ProcessCallback<'p>>,
    visited: HashSet<(BodyHandle, BodyHandle)>,
}

impl ExecuteContext<'_, '_, '_> {
    /// Offer one candidate pair to the callbacks, returning whether it was processed
    fn check_pair(&mut self, first: BodyHandle, second: BodyHandle) -> bool {
        if first == second {
            return false;
        }

        let Some([a, b]) = self.bodies.get_disjoint_mut([first, second]) else {
            return false;
        };
        if !a.is_collidable() || !b.is_collidable() {
            return false;
        }
        if !a.hull().overlaps(&b.hull()) {
            return false;
        }

        let key = match self.mode {
            CollisionMode::CrossCollision => (first, second),
            CollisionMode::SelfCollision => (first.min(second), first.max(second)),
        };
        if !self.visited.insert(key) {
            return false;
        }

        let mut pair = OverlapPair { first, second, a, b };

        let accepted = match self.process.as_mut() {
            Some(process) => process(&mut pair),
            None => true,
        };
        if !accepted {
            return false;
        }

        if let Some(notify) = self.notify.as_mut() {
            notify(&mut pair);
        }

        true
    }
}

/// One node of a [`QuadTree`]
#[derive(Debug)]
pub struct QuadNode {
    bounds: Rectangle,
    mid_x: f32,
    mid_y: f32,
    can_subdivide: bool,
    a_list: LinkedList<BodyHandle>,
    b_list: LinkedList<BodyHandle>,
    children: [Option<Box<QuadNode>>; 4],
}

impl QuadNode {
    fn new(bounds: Rectangle, min_size: f32, parent: Option<&QuadNode>) -> Self {
        let mut a_list = LinkedList::new();
        let mut b_list = LinkedList::new();

        if let Some(parent) = parent {
            a_list.extend_from(&parent.a_list);
            b_list.extend_from(&parent.b_list);
        }

        Self {
            mid_x: bounds.left() + bounds.half_width(),
            mid_y: bounds.top() + bounds.half_height(),
            can_subdivide: bounds.width() > min_size || bounds.height() > min_size,
            bounds,
            a_list,
            b_list,
            children: [None, None, None, None],
        }
    }

    /// Area covered by this node
    pub fn bounds(&self) -> &Rectangle {
        &self.bounds
    }

    /// Whether this node may create children
    pub fn can_subdivide(&self) -> bool {
        self.can_subdivide
    }

    /// Bodies registered from the first collidable
    pub fn a_list(&self) -> &LinkedList<BodyHandle> {
        &self.a_list
    }

    /// Bodies registered from the second collidable
    pub fn b_list(&self) -> &LinkedList<BodyHandle> {
        &self.b_list
    }

    /// Child in the given quadrant, if it was ever needed
    pub fn child(&self, quadrant: Quadrant) -> Option<&QuadNode> {
        self.children[quadrant.index()].as_deref()
    }

    fn children(&self) -> impl Iterator<Item = &QuadNode> {
        self.children.iter().flatten().map(|child| &**child)
    }

    fn quadrant_bounds(&self, quadrant: Quadrant) -> Rectangle {
        let half_width = self.bounds.half_width();
        let half_height = self.bounds.half_height();
        let (x, y) = match quadrant {
            Quadrant::NorthWest => (self.bounds.left(), self.bounds.top()),
            Quadrant::NorthEast => (self.mid_x, self.bounds.top()),
            Quadrant::SouthEast => (self.mid_x, self.mid_y),
            Quadrant::SouthWest => (self.bounds.left(), self.mid_y),
        };
        Rectangle::new(x, y, half_width, half_height)
    }

    fn child_mut(&mut self, quadrant: Quadrant, min_size: f32) -> &mut QuadNode {
        let index = quadrant.index();
        let child = match self.children[index].take() {
            Some(child) => child,
            None => Box::new(QuadNode::new(self.quadrant_bounds(quadrant), min_size, Some(self))),
        };
        self.children[index].insert(child)
    }

    /// The single quadrant strictly containing the placement, if any
    fn containing_quadrant(&self, p: &Placement) -> Option<Quadrant> {
        let b = &self.bounds;
        let west = p.left > b.left() && p.right < self.mid_x;
        let east = p.left > self.mid_x && p.right < b.right();
        let north = p.top > b.top() && p.bottom < self.mid_y;
        let south = p.top > self.mid_y && p.bottom < b.bottom();

        match (west, east, north, south) {
            (true, _, true, _) => Some(Quadrant::NorthWest),
            (true, _, _, true) => Some(Quadrant::SouthWest),
            (_, true, true, _) => Some(Quadrant::NorthEast),
            (_, true, _, true) => Some(Quadrant::SouthEast),
            _ => None,
        }
    }

    /// Whether the placement strictly overlaps the given quadrant
    fn overlaps_quadrant(&self, p: &Placement, quadrant: Quadrant) -> bool {
        let b = &self.bounds;
        let west = p.right > b.left() && p.left < self.mid_x;
        let east = p.right > self.mid_x && p.left < b.right();
        let north = p.bottom > b.top() && p.top < self.mid_y;
        let south = p.bottom > self.mid_y && p.top < b.bottom();

        match quadrant {
            Quadrant::NorthWest => west && north,
            Quadrant::NorthEast => east && north,
            Quadrant::SouthEast => east && south,
            Quadrant::SouthWest => west && south,
        }
    }

    fn is_covered_by(&self, p: &Placement) -> bool {
        self.bounds.left() >= p.left
            && self.bounds.right() <= p.right
            && self.bounds.top() >= p.top
            && self.bounds.bottom() <= p.bottom
    }

    fn add_object(&mut self, p: &Placement, min_size: f32) {
        if !self.can_subdivide || self.is_covered_by(p) {
            self.add_to_list(p);
            return;
        }

        if let Some(quadrant) = self.containing_quadrant(p) {
            self.child_mut(quadrant, min_size).add_object(p, min_size);
            return;
        }

        let mut placed = false;
        for quadrant in Quadrant::ALL {
            if self.overlaps_quadrant(p, quadrant) {
                self.child_mut(quadrant, min_size).add_object(p, min_size);
                placed = true;
            }
        }

        if !placed {
            log::trace!(
                "Body {:?} matches no quadrant of {:?}, storing at this node",
                p.handle,
                self.bounds
            );
            self.add_to_list(p);
        }
    }

    fn add_to_list(&mut self, p: &Placement) {
        match p.list {
            ListId::A => self.a_list.push(p.handle),
            ListId::B => self.b_list.push(p.handle),
        };

        if !self.can_subdivide {
            return;
        }

        for child in self.children.iter_mut().flatten() {
            child.add_to_list(p);
        }
    }

    fn execute(&self, ctx: &mut ExecuteContext<'_, '_, '_>) -> bool {
        let mut processed = false;

        for (cursor, handle) in self.a_list.iter() {
            match ctx.bodies.get(handle) {
                Some(body) if body.is_collidable() => {}
                _ => continue,
            }

            match ctx.mode {
                CollisionMode::CrossCollision => {
                    for (_, other) in self.b_list.iter() {
                        processed |= ctx.check_pair(handle, other);
                    }
                }
                CollisionMode::SelfCollision => {
                    for (_, other) in self.a_list.iter_after(cursor) {
                        processed |= ctx.check_pair(handle, other);
                    }
                }
            }
        }

        for child in self.children.iter().flatten() {
            processed |= child.execute(ctx);
        }

        processed
    }

    fn destroy(&mut self) {
        self.a_list.clear();
        self.b_list.clear();

        for slot in &mut self.children {
            if let Some(mut child) = slot.take() {
                child.destroy();
            }
        }
    }

    fn count_nodes(&self) -> usize {
        1 + self.children().map(QuadNode::count_nodes).sum::<usize>()
    }

    fn max_depth(&self) -> usize {
        1 + self.children().map(QuadNode::max_depth).max().unwrap_or(0)
    }

    fn count_registrations(&self, handle: BodyHandle) -> usize {
        let here = self
            .a_list
            .iter()
            .chain(self.b_list.iter())
            .filter(|(_, h)| *h == handle)
            .count();
        here + self
            .children()
            .map(|child| child.count_registrations(handle))
            .sum::<usize>()
    }
}

/// Per-query spatial partition over the world bounds
#[derive(Debug)]
pub struct QuadTree {
    root: QuadNode,
    min_size: f32,
    mode: CollisionMode,
}

impl QuadTree {
    /// Build an empty tree over `bounds`
    ///
    /// Nodes stop subdividing once both sides are no longer larger than
    /// `(width + height) / (2 * divisions)` of the root.
    pub fn new(bounds: Rectangle, divisions: u32) -> Self {
        let divisions = divisions.max(1);
        let min_size = (bounds.width() + bounds.height()) / (2.0 * divisions as f32);

        Self {
            root: QuadNode::new(bounds, min_size, None),
            min_size,
            mode: CollisionMode::SelfCollision,
        }
    }

    /// Load the collidables to test
    ///
    /// `first` goes into the A list. A distinct `second` goes into the B
    /// list and switches the tree to cross collision; otherwise every pair
    /// within `first` is tested.
    pub fn load(&mut self, bodies: &BodyStore, first: &Collidable, second: Option<&Collidable>) {
        self.add(bodies, first, ListId::A);

        self.mode = match second {
            Some(second) if second != first => {
                self.add(bodies, second, ListId::B);
                CollisionMode::CrossCollision
            }
            _ => CollisionMode::SelfCollision,
        };

        log::debug!(
            "Quadtree loaded in {:?} mode: {} nodes, depth {}",
            self.mode,
            self.node_count(),
            self.depth()
        );
    }

    /// Register every collidable body reachable from `collidable`
    ///
    /// Bodies that do not exist, cannot collide on any side, or whose
    /// handle is stale are skipped.
    pub fn add(&mut self, bodies: &BodyStore, collidable: &Collidable, list: ListId) {
        let min_size = self.min_size;
        let root = &mut self.root;

        collidable.for_each_leaf(&mut |handle| {
            let Some(body) = bodies.get(handle) else {
                return;
            };
            if !body.is_collidable() {
                return;
            }

            let hull = body.hull();
            let placement = Placement {
                handle,
                left: hull.left(),
                top: hull.top(),
                right: hull.right(),
                bottom: hull.bottom(),
                list,
            };
            root.add_object(&placement, min_size);
        });
    }

    /// Walk every node and offer overlapping pairs to the callbacks
    ///
    /// Each pair is offered at most once per call, even when the bodies
    /// share several nodes. `process` decides whether a pair counts (absent
    /// means always); accepted pairs are passed to `notify`. Returns whether
    /// any pair was accepted.
    pub fn execute(
        &self,
        bodies: &mut BodyStore,
        notify: Option<NotifyCallback<'_>>,
        process: Option<ProcessCallback<'_>>,
    ) -> bool {
        let mut ctx = ExecuteContext {
            bodies,
            mode: self.mode,
            notify,
            process,
            visited: HashSet::new(),
        };

        self.root.execute(&mut ctx)
    }

    /// Drop every registry entry and child node
    pub fn destroy(&mut self) {
        self.root.destroy();
    }

    /// Root node
    pub fn root(&self) -> &QuadNode {
        &self.root
    }

    /// Size below which nodes stop subdividing
    pub fn min_size(&self) -> f32 {
        self.min_size
    }

    /// Mode chosen by the last [`QuadTree::load`]
    pub fn mode(&self) -> CollisionMode {
        self.mode
    }

    /// Number of nodes including the root
    pub fn node_count(&self) -> usize {
        self.root.count_nodes()
    }

    /// Number of levels including the root
    pub fn depth(&self) -> usize {
        self.root.max_depth()
    }

    /// How many registry entries refer to `handle` across the whole tree
    pub fn registration_count(&self, handle: BodyHandle) -> usize {
        self.root.count_registrations(handle)
    }
}
