//! Inverse-operation log for taking back moves on a search board.
//!
//! Every primitive mutation of a journaled position is recorded with enough
//! information to reverse it. A move opens a mark holding the scalar state;
//! undo replays the changes above the mark in reverse and restores the
//! scalars.

use crate::geometry::Point;
use crate::group::{GroupHead, GroupId};
use crate::position::MoveState;
use crate::stone::Stone;

#[derive(Copy, Clone, Debug)]
pub(crate) enum Change {
    Cell { pos: Point, prev: Stone },
    GroupId { pos: Point, prev: u16 },
    NextStone { pos: Point, prev: u16 },
    LibertyAdded { id: GroupId, pos: Point },
    /// `after` is the liberty (or list head) that preceded `pos`.
    LibertyRemoved { id: GroupId, pos: Point, after: usize },
    NeighborAdded { id: GroupId, other: GroupId },
    NeighborRemoved { id: GroupId, other: GroupId, after: usize },
    Head { id: GroupId, prev: GroupHead },
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct Mark {
    pub changes: usize,
    pub state: MoveState,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Journal {
    changes: Vec<Change>,
    marks: Vec<Mark>,
}

impl Journal {
    pub fn with_capacity(moves: usize) -> Self {
        Journal {
            changes: Vec::with_capacity(moves * 16),
            marks: Vec::with_capacity(moves),
        }
    }

    #[inline]
    pub fn begin(&mut self, state: MoveState) {
        self.marks.push(Mark {
            changes: self.changes.len(),
            state,
        });
    }

    #[inline]
    pub fn record(&mut self, change: Change) {
        self.changes.push(change);
    }

    pub fn pop_mark(&mut self) -> Option<Mark> {
        self.marks.pop()
    }

    /// Pop the newest change if it was recorded after `mark`.
    #[inline]
    pub fn pop_change(&mut self, mark: &Mark) -> Option<Change> {
        if self.changes.len() > mark.changes {
            self.changes.pop()
        } else {
            None
        }
    }

    pub fn depth(&self) -> usize {
        self.marks.len()
    }

    pub fn clear(&mut self) {
        self.changes.clear();
        self.marks.clear();
    }
}
