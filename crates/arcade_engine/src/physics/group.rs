//! Groups of bodies
//!
//! Anything that can be handed to the collision entry points is a
//! [`Collidable`]: either a single body or a [`Group`] of further
//! collidables. Every traversal goes through the same flatten, which skips
//! groups that no longer exist and yields the body handles at the leaves.

use super::body::{Body, BodyHandle, BodyStore};

/// A single body or a group of collidables
#[derive(Debug, Clone, PartialEq)]
pub enum Collidable {
    /// One body
    Body(BodyHandle),
    /// A nested group
    Group(Group),
}

impl Collidable {
    /// Visit every body handle reachable from this collidable
    pub fn for_each_leaf<F: FnMut(BodyHandle)>(&self, f: &mut F) {
        match self {
            Collidable::Body(handle) => f(*handle),
            Collidable::Group(group) => group.for_each_leaf(f),
        }
    }

    /// Every reachable body handle, in traversal order
    pub fn leaves(&self) -> Vec<BodyHandle> {
        let mut leaves = Vec::new();
        self.for_each_leaf(&mut |handle| leaves.push(handle));
        leaves
    }
}

impl From<BodyHandle> for Collidable {
    fn from(handle: BodyHandle) -> Self {
        Collidable::Body(handle)
    }
}

impl From<Group> for Collidable {
    fn from(group: Group) -> Self {
        Collidable::Group(group)
    }
}

/// Ordered collection of collidables
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// Non-existing groups are skipped by every traversal
    pub exists: bool,
    members: Vec<Collidable>,
}

impl Default for Group {
    fn default() -> Self {
        Self::new()
    }
}

impl Group {
    /// Create an empty group
    pub fn new() -> Self {
        Self {
            exists: true,
            members: Vec::new(),
        }
    }

    /// Create a group holding the given bodies
    pub fn from_handles<I: IntoIterator<Item = BodyHandle>>(handles: I) -> Self {
        let mut group = Self::new();
        for handle in handles {
            group.add(handle);
        }
        group
    }

    /// Add a member; a body already directly in the group is not added twice
    pub fn add(&mut self, member: impl Into<Collidable>) {
        let member = member.into();
        if matches!(member, Collidable::Body(_)) && self.members.contains(&member) {
            return;
        }
        self.members.push(member);
    }

    /// Append a body known not to be a member yet, skipping the duplicate scan
    pub(crate) fn push(&mut self, handle: BodyHandle) {
        self.members.push(Collidable::Body(handle));
    }

    /// Remove a body that is a direct member, returning whether it was found
    pub fn remove(&mut self, handle: BodyHandle) -> bool {
        let before = self.members.len();
        self.members.retain(|member| *member != Collidable::Body(handle));
        self.members.len() != before
    }

    /// Number of direct members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True when the group has no direct members
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Direct members
    pub fn members(&self) -> &[Collidable] {
        &self.members
    }

    /// Visit every body handle in this group and its existing sub-groups
    pub fn for_each_leaf<F: FnMut(BodyHandle)>(&self, f: &mut F) {
        if !self.exists {
            return;
        }

        for member in &self.members {
            member.for_each_leaf(f);
        }
    }

    /// Every reachable body handle, in traversal order
    pub fn leaves(&self) -> Vec<BodyHandle> {
        let mut leaves = Vec::new();
        self.for_each_leaf(&mut |handle| leaves.push(handle));
        leaves
    }

    /// Visit every live body reachable from this group
    pub fn for_each<F: FnMut(BodyHandle, &Body)>(&self, bodies: &BodyStore, mut f: F) {
        self.for_each_leaf(&mut |handle| {
            if let Some(body) = bodies.get(handle) {
                f(handle, body);
            }
        });
    }

    /// Mutate every body reachable from this group
    pub fn for_each_mut<F: FnMut(&mut Body)>(&self, bodies: &mut BodyStore, mut f: F) {
        self.for_each_leaf(&mut |handle| {
            if let Some(body) = bodies.get_mut(handle) {
                f(body);
            }
        });
    }

    /// Number of reachable bodies that exist and are alive
    pub fn count_living(&self, bodies: &BodyStore) -> usize {
        let mut count = 0;
        self.for_each(bodies, |_, body| {
            if body.exists && body.alive {
                count += 1;
            }
        });
        count
    }

    /// Number of reachable bodies that are dead
    pub fn count_dead(&self, bodies: &BodyStore) -> usize {
        let mut count = 0;
        self.for_each(bodies, |_, body| {
            if !body.alive {
                count += 1;
            }
        });
        count
    }
}
