//! Group (string) records.
//!
//! A group is stored in a fixed slot of the position's group table. Member
//! stones are threaded through the position's `next_stone` array; the group
//! itself holds its liberties (indexed by point) and the ids of adjacent
//! enemy groups (indexed by group id).

use crate::constants::PASS;
use crate::geometry::Point;
use crate::linked::LinkedSet;
use crate::stone::Color;

/// Index of a slot in the group table.
pub type GroupId = usize;

/// Scalar part of a group record, restored as a unit by undo.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct GroupHead {
    pub active: bool,
    pub color: Color,
    pub size: usize,
    /// Smallest member point; the list traversal starts here.
    pub origin: Point,
}

impl Default for GroupHead {
    fn default() -> Self {
        GroupHead {
            active: false,
            color: Color::Black,
            size: 0,
            origin: PASS,
        }
    }
}

#[derive(Debug)]
pub struct Group {
    pub(crate) head: GroupHead,
    pub(crate) libs: LinkedSet,
    pub(crate) neighbors: LinkedSet,
}

impl Clone for Group {
    fn clone(&self) -> Self {
        Group {
            head: self.head,
            libs: self.libs.clone(),
            neighbors: self.neighbors.clone(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.head = source.head;
        self.libs.clone_from(&source.libs);
        self.neighbors.clone_from(&source.neighbors);
    }
}

impl Group {
    pub(crate) fn new(board_max: usize, max_groups: usize) -> Self {
        Group {
            head: GroupHead::default(),
            libs: LinkedSet::with_capacity(board_max),
            neighbors: LinkedSet::with_capacity(max_groups),
        }
    }

    pub(crate) fn reset(&mut self) {
        while let Some(p) = self.libs.first() {
            self.libs.remove(p);
        }
        while let Some(id) = self.neighbors.first() {
            self.neighbors.remove(id);
        }
        self.head = GroupHead::default();
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.head.active
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.head.color
    }

    /// Number of stones.
    #[inline]
    pub fn size(&self) -> usize {
        self.head.size
    }

    #[inline]
    pub fn origin(&self) -> Point {
        self.head.origin
    }

    #[inline]
    pub fn liberty_count(&self) -> usize {
        self.libs.len()
    }

    #[inline]
    pub fn has_liberty(&self, pos: Point) -> bool {
        self.libs.contains(pos)
    }

    /// Liberties in list order.
    pub fn liberties(&self) -> impl Iterator<Item = Point> + '_ {
        self.libs.iter()
    }

    #[inline]
    pub fn first_liberty(&self) -> Option<Point> {
        self.libs.first()
    }

    /// The liberty after `pos` in list order. `pos` must be a liberty.
    #[inline]
    pub fn next_liberty(&self, pos: Point) -> Option<Point> {
        self.libs.next_of(pos)
    }

    #[inline]
    pub fn neighbor_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Ids of adjacent enemy groups.
    pub fn neighbors(&self) -> impl Iterator<Item = GroupId> + '_ {
        self.neighbors.iter()
    }

    #[inline]
    pub fn first_neighbor(&self) -> Option<GroupId> {
        self.neighbors.first()
    }

    #[inline]
    pub fn next_neighbor(&self, id: GroupId) -> Option<GroupId> {
        self.neighbors.next_of(id)
    }
}
