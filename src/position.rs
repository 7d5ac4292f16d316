//! Go position representation and move execution.
//!
//! This module provides the core game logic, including:
//! - Board state on a padded 1D array (see [`crate::geometry`])
//! - Incremental group tracking: member lists, liberties, adjacent enemies
//! - Captures, ko, optional positional superko
//! - Zobrist hashes and move history
//! - Area scoring and eye detection for playouts
//!
//! Groups are never rebuilt from scratch. Placing a stone creates, extends
//! or merges groups and removes captured ones, touching only the stones and
//! liberties involved. A position with a journal attached (see
//! [`crate::search_board`]) records every such change so the move can be
//! taken back exactly.

use std::fmt;
use std::sync::Arc;

use arrayvec::ArrayVec;
use log::trace;

use crate::constants::{DEFAULT_KOMI, PASS};
use crate::error::{BoardError, MoveError};
use crate::geometry::{Geometry, Point};
use crate::group::{Group, GroupHead, GroupId};
use crate::journal::{Change, Journal};
use crate::stone::{Color, Stone};

/// Link value for points with no group or no next stone.
const NO_LINK: u16 = u16::MAX;

/// One entry of the move history.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub color: Color,
    pub pos: Point,
    /// Position-only hash after the move.
    pub hash: u64,
}

/// Per-move scalar state, saved whole by the journal.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct MoveState {
    /// Point the next player may not recapture at, or [`PASS`].
    pub ko_pos: Point,
    /// Record index of the most recent ko capture.
    pub ko_move: Option<usize>,
    /// Stones captured by each color.
    pub prisoners: [usize; 2],
    /// Stones, side to move and ko point.
    pub hash: u64,
    /// Stones only.
    pub positional_hash: u64,
    /// Order-sensitive hash of the move sequence.
    pub move_hash: u64,
    /// Consecutive passes at the end of the history.
    pub pass_count: usize,
}

impl Default for MoveState {
    fn default() -> Self {
        MoveState {
            ko_pos: PASS,
            ko_move: None,
            prisoners: [0, 0],
            hash: 0,
            positional_hash: 0,
            move_hash: 0,
            pass_count: 0,
        }
    }
}

/// A Go position (board state plus group table and history).
pub struct GameInfo {
    geometry: Arc<Geometry>,
    /// Cell contents, margin included.
    board: Vec<Stone>,
    /// Group slot of every stone.
    group_id: Vec<u16>,
    /// Circular member lists: the next stone of the same group.
    next_stone: Vec<u16>,
    groups: Vec<Group>,
    records: Vec<Record>,
    state: MoveState,
    komi: f64,
    superko: bool,
    journal: Option<Journal>,
}

impl Clone for GameInfo {
    fn clone(&self) -> Self {
        GameInfo {
            geometry: Arc::clone(&self.geometry),
            board: self.board.clone(),
            group_id: self.group_id.clone(),
            next_stone: self.next_stone.clone(),
            groups: self.groups.clone(),
            records: self.records.clone(),
            state: self.state,
            komi: self.komi,
            superko: self.superko,
            journal: self.journal.clone(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.copy_position(source);
        self.journal.clone_from(&source.journal);
    }
}

impl GameInfo {
    pub fn new(geometry: Arc<Geometry>) -> Self {
        let board_max = geometry.board_max();
        let max_groups = geometry.max_groups();
        let mut game = GameInfo {
            board: vec![Stone::OutOfBounds; board_max],
            group_id: vec![NO_LINK; board_max],
            next_stone: vec![NO_LINK; board_max],
            groups: (0..max_groups)
                .map(|_| Group::new(board_max, max_groups))
                .collect(),
            records: Vec::with_capacity(geometry.max_records()),
            state: MoveState::default(),
            komi: DEFAULT_KOMI,
            superko: false,
            journal: None,
            geometry,
        };
        game.clear();
        game
    }

    /// Reset to the empty board. Komi and the superko setting are kept.
    pub fn clear(&mut self) {
        self.board.fill(Stone::OutOfBounds);
        for &p in self.geometry.onboard() {
            self.board[p] = Stone::Empty;
        }
        self.group_id.fill(NO_LINK);
        self.next_stone.fill(NO_LINK);
        self.groups.iter_mut().for_each(Group::reset);
        self.records.clear();
        self.state = MoveState::default();
        if let Some(journal) = self.journal.as_mut() {
            journal.clear();
        }
        trace!("cleared {}x{} board", self.size(), self.size());
    }

    // =========================================================================
    // Settings
    // =========================================================================

    pub fn set_komi(&mut self, komi: f64) {
        self.komi = komi;
    }

    pub fn komi(&self) -> f64 {
        self.komi
    }

    /// Enable or disable the positional superko check in [`GameInfo::is_legal`].
    pub fn set_superko(&mut self, enabled: bool) {
        self.superko = enabled;
    }

    pub fn superko(&self) -> bool {
        self.superko
    }

    // =========================================================================
    // Read access
    // =========================================================================

    #[inline]
    pub fn geometry(&self) -> &Arc<Geometry> {
        &self.geometry
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.geometry.size()
    }

    #[inline]
    pub fn stone(&self, pos: Point) -> Stone {
        self.board[pos]
    }

    /// The whole padded board.
    #[inline]
    pub fn cells(&self) -> &[Stone] {
        &self.board
    }

    /// Group slot of the stone at `pos`. Only meaningful for occupied points.
    #[inline]
    pub fn group_id(&self, pos: Point) -> GroupId {
        debug_assert!(self.board[pos].color().is_some(), "no stone at {pos}");
        self.group_id[pos] as GroupId
    }

    #[inline]
    pub fn group(&self, id: GroupId) -> &Group {
        &self.groups[id]
    }

    /// The group containing the stone at `pos`.
    #[inline]
    pub fn group_at(&self, pos: Point) -> &Group {
        &self.groups[self.group_id(pos)]
    }

    /// Active groups with their ids.
    pub fn groups(&self) -> impl Iterator<Item = (GroupId, &Group)> + '_ {
        self.groups.iter().enumerate().filter(|(_, g)| g.is_active())
    }

    /// Member stones of group `id`, starting at its origin.
    pub fn stones(&self, id: GroupId) -> Stones<'_> {
        let group = &self.groups[id];
        Stones {
            next: &self.next_stone,
            origin: group.origin(),
            cur: group.is_active().then_some(group.origin()),
        }
    }

    /// Liberties of group `id` in list order.
    pub fn liberties(&self, id: GroupId) -> impl Iterator<Item = Point> + '_ {
        self.groups[id].liberties()
    }

    #[inline]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of moves played, passes included.
    #[inline]
    pub fn moves(&self) -> usize {
        self.records.len()
    }

    /// The record `back` plies ago (1 = the last move).
    pub fn previous(&self, back: usize) -> Option<&Record> {
        self.records.len().checked_sub(back).map(|i| &self.records[i])
    }

    /// The last move played, or [`PASS`] at the start of the game.
    pub fn last_move(&self) -> Point {
        self.previous(1).map_or(PASS, |r| r.pos)
    }

    /// Color to play next: Black at the start, then the opponent of the last mover.
    pub fn to_move(&self) -> Color {
        self.previous(1).map_or(Color::Black, |r| r.color.opponent())
    }

    pub fn prisoners(&self, color: Color) -> usize {
        self.state.prisoners[color.index()]
    }

    /// The point the player to move may not recapture at, or [`PASS`].
    pub fn ko_pos(&self) -> Point {
        self.state.ko_pos
    }

    /// Record index of the most recent ko capture.
    pub fn ko_move(&self) -> Option<usize> {
        self.state.ko_move
    }

    pub fn hash(&self) -> u64 {
        self.state.hash
    }

    pub fn positional_hash(&self) -> u64 {
        self.state.positional_hash
    }

    pub fn move_hash(&self) -> u64 {
        self.state.move_hash
    }

    pub fn pass_count(&self) -> usize {
        self.state.pass_count
    }

    /// Number of empty orthogonal neighbours.
    pub fn empty_neighbor_count(&self, pos: Point) -> usize {
        self.geometry
            .neighbors(pos)
            .iter()
            .filter(|&&n| self.board[n] == Stone::Empty)
            .count()
    }

    // =========================================================================
    // Legality
    // =========================================================================

    /// Whether `color` may play at `pos`. Passing is always legal.
    pub fn is_legal(&self, pos: Point, color: Color) -> bool {
        self.check_move(pos, color).is_ok()
    }

    /// Like [`GameInfo::is_legal`], but says why a move is rejected.
    pub fn check_move(&self, pos: Point, color: Color) -> Result<(), MoveError> {
        if pos == PASS {
            return Ok(());
        }
        if self.board[pos] != Stone::Empty {
            return Err(MoveError::Occupied);
        }
        if self.is_ko_recapture(pos, color) {
            return Err(MoveError::Ko);
        }
        if self.is_suicide(pos, color) {
            return Err(MoveError::Suicide);
        }
        if self.superko && self.repeats_position(pos, color) {
            return Err(MoveError::Superko);
        }
        Ok(())
    }

    /// Legality without the superko history scan, for reading ahead.
    pub(crate) fn is_legal_for_search(&self, pos: Point, color: Color) -> bool {
        pos == PASS
            || (self.board[pos] == Stone::Empty
                && !self.is_ko_recapture(pos, color)
                && !self.is_suicide(pos, color))
    }

    fn is_ko_recapture(&self, pos: Point, color: Color) -> bool {
        self.state.ko_pos == pos && self.previous(1).is_some_and(|r| r.color != color)
    }

    /// Whether a stone at the empty point `pos` would have no liberties and
    /// capture nothing.
    pub fn is_suicide(&self, pos: Point, color: Color) -> bool {
        for n in self.geometry.neighbors(pos) {
            match self.board[n] {
                Stone::Empty => return false,
                Stone::OutOfBounds => {}
                s => {
                    let libs = self.group_at(n).liberty_count();
                    if s.is(color) {
                        if libs > 1 {
                            return false;
                        }
                    } else if libs == 1 {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Whether the position after `color` plays `pos` already occurred with
    /// the same player having just moved.
    fn repeats_position(&self, pos: Point, color: Color) -> bool {
        let zobrist = self.geometry.zobrist();
        let other = color.opponent();
        let mut hash = self.state.positional_hash ^ zobrist.stone(pos, color);
        let mut captured: ArrayVec<GroupId, 4> = ArrayVec::new();
        for n in self.geometry.neighbors(pos) {
            if !self.board[n].is(other) {
                continue;
            }
            let id = self.group_id(n);
            if self.groups[id].liberty_count() == 1 && !captured.contains(&id) {
                captured.push(id);
                for s in self.stones(id) {
                    hash ^= zobrist.stone(s, other);
                }
            }
        }
        self.records.iter().any(|r| r.color == color && r.hash == hash)
    }

    /// Legal, and not filling one of `color`'s own true eyes while every
    /// surrounding group has a liberty to spare.
    pub fn is_legal_not_eye(&self, pos: Point, color: Color) -> bool {
        if !self.is_legal(pos, color) {
            return false;
        }
        if pos == PASS || !self.is_true_eye(pos, color) {
            return true;
        }
        self.geometry
            .neighbors(pos)
            .iter()
            .any(|&n| self.board[n].is(color) && self.group_at(n).liberty_count() == 1)
    }

    /// Check if an empty point is a true eye of `color`.
    ///
    /// Every orthogonal neighbour must be `color` or off the board, and
    /// opponent diagonals plus one for touching the edge must stay below two.
    pub fn is_true_eye(&self, pos: Point, color: Color) -> bool {
        if self.board[pos] != Stone::Empty {
            return false;
        }
        let walled = self
            .geometry
            .neighbors(pos)
            .iter()
            .all(|&n| matches!(self.board[n], Stone::OutOfBounds) || self.board[n].is(color));
        if !walled {
            return false;
        }
        let mut bad = 0;
        let mut at_edge = false;
        for d in self.geometry.diagonals(pos) {
            match self.board[d] {
                Stone::OutOfBounds => at_edge = true,
                s if s.is(color.opponent()) => bad += 1,
                _ => {}
            }
        }
        if at_edge {
            bad += 1;
        }
        bad < 2
    }

    // =========================================================================
    // Playing moves
    // =========================================================================

    /// Checked move: validates legality, then plays.
    pub fn play(&mut self, pos: Point, color: Color) -> Result<(), MoveError> {
        self.check_move(pos, color)?;
        self.put_stone(pos, color);
        Ok(())
    }

    /// Place a stone (or pass) without checking legality.
    ///
    /// The point must be empty and the move must not be suicide; both are
    /// caller obligations checked only by debug assertions. Captures, ko,
    /// hashes and the move record are updated in the same step.
    pub fn put_stone(&mut self, pos: Point, color: Color) {
        if let Some(journal) = self.journal.as_mut() {
            journal.begin(self.state);
        }
        let old_ko = self.state.ko_pos;
        self.state.ko_pos = PASS;

        if pos == PASS {
            self.state.pass_count += 1;
            self.finish_move(PASS, color, old_ko);
            return;
        }
        debug_assert_eq!(self.board[pos], Stone::Empty, "stone placed on occupied point {pos}");
        self.state.pass_count = 0;

        self.set_cell(pos, color.into());
        self.xor_stone(pos, color);

        let mut friends: ArrayVec<GroupId, 4> = ArrayVec::new();
        let mut enemies: ArrayVec<GroupId, 4> = ArrayVec::new();
        for n in self.geometry.neighbors(pos) {
            let Some(c) = self.board[n].color() else {
                continue;
            };
            let id = self.group_id[n] as GroupId;
            let list = if c == color { &mut friends } else { &mut enemies };
            if !list.contains(&id) {
                list.push(id);
            }
        }

        for &e in &enemies {
            self.remove_liberty(e, pos);
        }

        let id = match friends.iter().min() {
            None => self.make_group(pos, color),
            Some(&target) => {
                self.add_stone(target, pos);
                for &f in &friends {
                    if f != target {
                        self.merge_groups(target, f);
                    }
                }
                target
            }
        };
        for &e in &enemies {
            self.add_neighbor(id, e);
        }

        let mut captured = 0;
        let mut captured_at = PASS;
        for &e in &enemies {
            if self.groups[e].libs.is_empty() {
                captured += self.groups[e].size();
                captured_at = self.groups[e].origin();
                self.remove_group(e);
            }
        }
        self.state.prisoners[color.index()] += captured;

        let group = &self.groups[id];
        debug_assert!(group.liberty_count() > 0, "suicide at {pos}");
        if captured == 1 && group.size() == 1 && group.liberty_count() == 1 {
            self.state.ko_pos = captured_at;
            self.state.ko_move = Some(self.records.len());
        }
        self.finish_move(pos, color, old_ko);
    }

    fn finish_move(&mut self, pos: Point, color: Color, old_ko: Point) {
        let zobrist = self.geometry.zobrist();
        self.state.hash ^= zobrist.side();
        if old_ko != PASS {
            self.state.hash ^= zobrist.ko(old_ko);
        }
        if self.state.ko_pos != PASS {
            self.state.hash ^= zobrist.ko(self.state.ko_pos);
        }
        let key = if pos == PASS {
            zobrist.side()
        } else {
            zobrist.stone(pos, color)
        };
        self.state.move_hash = self.state.move_hash.rotate_left(7) ^ key;
        debug_assert!(
            self.records.len() < self.geometry.max_records(),
            "move history full"
        );
        self.records.push(Record {
            color,
            pos,
            hash: self.state.positional_hash,
        });
    }

    /// New single-stone group at `pos`.
    fn make_group(&mut self, pos: Point, color: Color) -> GroupId {
        let Some(id) = self.groups.iter().position(|g| !g.is_active()) else {
            panic!("group table full ({} slots)", self.groups.len());
        };
        self.set_head(
            id,
            GroupHead {
                active: true,
                color,
                size: 1,
                origin: pos,
            },
        );
        self.set_group_id(pos, id as u16);
        self.set_next_stone(pos, pos as u16);
        for n in self.geometry.neighbors(pos) {
            if self.board[n] == Stone::Empty {
                self.add_liberty(id, n);
            }
        }
        id
    }

    /// Add the stone at `pos` to the adjacent group `id`.
    fn add_stone(&mut self, id: GroupId, pos: Point) {
        let head = self.groups[id].head;
        self.set_group_id(pos, id as u16);
        let after = self.next_stone[head.origin];
        self.set_next_stone(head.origin, pos as u16);
        self.set_next_stone(pos, after);
        self.set_head(
            id,
            GroupHead {
                size: head.size + 1,
                origin: head.origin.min(pos),
                ..head
            },
        );
        self.remove_liberty(id, pos);
        for n in self.geometry.neighbors(pos) {
            if self.board[n] == Stone::Empty {
                self.add_liberty(id, n);
            }
        }
    }

    /// Fold group `src` into `dst`: splice the member lists and move the
    /// liberties and enemy links across.
    fn merge_groups(&mut self, dst: GroupId, src: GroupId) {
        let src_head = self.groups[src].head;
        let dst_head = self.groups[dst].head;
        let start = src_head.origin;
        let mut s = start;
        let last = loop {
            self.set_group_id(s, dst as u16);
            let n = self.next_stone[s] as Point;
            if n == start {
                break s;
            }
            s = n;
        };
        let after = self.next_stone[dst_head.origin];
        self.set_next_stone(dst_head.origin, start as u16);
        self.set_next_stone(last, after);

        let mut lib = self.groups[src].libs.first();
        while let Some(p) = lib {
            lib = self.groups[src].libs.next_of(p);
            self.remove_liberty(src, p);
            // the joining stone was a liberty of both
            if self.board[p] == Stone::Empty {
                self.add_liberty(dst, p);
            }
        }
        let mut nb = self.groups[src].neighbors.first();
        while let Some(e) = nb {
            nb = self.groups[src].neighbors.next_of(e);
            self.remove_neighbor(src, e);
            self.add_neighbor(dst, e);
        }

        self.set_head(
            dst,
            GroupHead {
                size: dst_head.size + src_head.size,
                origin: dst_head.origin.min(src_head.origin),
                ..dst_head
            },
        );
        self.set_head(
            src,
            GroupHead {
                active: false,
                size: 0,
                ..src_head
            },
        );
    }

    /// Take a captured group off the board. Its points become liberties of
    /// the groups around it.
    fn remove_group(&mut self, id: GroupId) {
        let head = self.groups[id].head;
        let start = head.origin;
        let mut s = start;
        loop {
            let n = self.next_stone[s] as Point;
            self.set_cell(s, Stone::Empty);
            self.xor_stone(s, head.color);
            self.set_group_id(s, NO_LINK);
            self.set_next_stone(s, NO_LINK);
            for nb in self.geometry.neighbors(s) {
                if self.board[nb].color().is_some() {
                    let other = self.group_id[nb] as GroupId;
                    if other != id {
                        self.add_liberty(other, s);
                    }
                }
            }
            if n == start {
                break;
            }
            s = n;
        }
        let mut nb = self.groups[id].neighbors.first();
        while let Some(e) = nb {
            nb = self.groups[id].neighbors.next_of(e);
            self.remove_neighbor(id, e);
        }
        self.set_head(
            id,
            GroupHead {
                active: false,
                size: 0,
                ..head
            },
        );
    }

    // =========================================================================
    // Journaled primitives
    // =========================================================================

    #[inline]
    fn log(&mut self, change: Change) {
        if let Some(journal) = self.journal.as_mut() {
            journal.record(change);
        }
    }

    fn xor_stone(&mut self, pos: Point, color: Color) {
        let key = self.geometry.zobrist().stone(pos, color);
        self.state.hash ^= key;
        self.state.positional_hash ^= key;
    }

    fn set_cell(&mut self, pos: Point, stone: Stone) {
        let prev = std::mem::replace(&mut self.board[pos], stone);
        self.log(Change::Cell { pos, prev });
    }

    fn set_group_id(&mut self, pos: Point, id: u16) {
        let prev = std::mem::replace(&mut self.group_id[pos], id);
        self.log(Change::GroupId { pos, prev });
    }

    fn set_next_stone(&mut self, pos: Point, next: u16) {
        let prev = std::mem::replace(&mut self.next_stone[pos], next);
        self.log(Change::NextStone { pos, prev });
    }

    fn set_head(&mut self, id: GroupId, head: GroupHead) {
        let prev = std::mem::replace(&mut self.groups[id].head, head);
        self.log(Change::Head { id, prev });
    }

    fn add_liberty(&mut self, id: GroupId, pos: Point) {
        if !self.groups[id].libs.contains(pos) {
            self.groups[id].libs.push_back(pos);
            self.log(Change::LibertyAdded { id, pos });
        }
    }

    fn remove_liberty(&mut self, id: GroupId, pos: Point) {
        if self.groups[id].libs.contains(pos) {
            let after = self.groups[id].libs.remove(pos);
            self.log(Change::LibertyRemoved { id, pos, after });
        }
    }

    /// Link two enemy groups in both directions.
    fn add_neighbor(&mut self, a: GroupId, b: GroupId) {
        for (id, other) in [(a, b), (b, a)] {
            if !self.groups[id].neighbors.contains(other) {
                self.groups[id].neighbors.push_back(other);
                self.log(Change::NeighborAdded { id, other });
            }
        }
    }

    fn remove_neighbor(&mut self, a: GroupId, b: GroupId) {
        for (id, other) in [(a, b), (b, a)] {
            if self.groups[id].neighbors.contains(other) {
                let after = self.groups[id].neighbors.remove(other);
                self.log(Change::NeighborRemoved { id, other, after });
            }
        }
    }

    // =========================================================================
    // Undo (journaled boards only)
    // =========================================================================

    /// Overwrite this position with `source`, reusing the existing buffers.
    /// A journal, if attached, is kept but emptied.
    pub(crate) fn copy_position(&mut self, source: &GameInfo) {
        self.geometry.clone_from(&source.geometry);
        self.board.clone_from(&source.board);
        self.group_id.clone_from(&source.group_id);
        self.next_stone.clone_from(&source.next_stone);
        self.groups.clone_from(&source.groups);
        self.records.clone_from(&source.records);
        self.state = source.state;
        self.komi = source.komi;
        self.superko = source.superko;
        if let Some(journal) = self.journal.as_mut() {
            journal.clear();
        }
    }

    pub(crate) fn enable_journal(&mut self) {
        if self.journal.is_none() {
            self.journal = Some(Journal::with_capacity(self.geometry.max_records()));
        }
    }

    /// Number of moves that can currently be taken back.
    pub(crate) fn undo_depth(&self) -> usize {
        self.journal.as_ref().map_or(0, Journal::depth)
    }

    /// Take back the last move recorded by the journal.
    pub(crate) fn undo(&mut self) {
        let Some(mut journal) = self.journal.take() else {
            panic!("undo on a board without a journal");
        };
        let Some(mark) = journal.pop_mark() else {
            panic!("undo with no move to take back");
        };
        while let Some(change) = journal.pop_change(&mark) {
            self.revert(change);
        }
        self.state = mark.state;
        self.records.pop();
        self.journal = Some(journal);
    }

    fn revert(&mut self, change: Change) {
        match change {
            Change::Cell { pos, prev } => self.board[pos] = prev,
            Change::GroupId { pos, prev } => self.group_id[pos] = prev,
            Change::NextStone { pos, prev } => self.next_stone[pos] = prev,
            Change::LibertyAdded { id, pos } => {
                self.groups[id].libs.remove(pos);
            }
            Change::LibertyRemoved { id, pos, after } => {
                self.groups[id].libs.insert_after(after, pos);
            }
            Change::NeighborAdded { id, other } => {
                self.groups[id].neighbors.remove(other);
            }
            Change::NeighborRemoved { id, other, after } => {
                self.groups[id].neighbors.insert_after(after, other);
            }
            Change::Head { id, prev } => self.groups[id].head = prev,
        }
    }

    // =========================================================================
    // Scoring
    // =========================================================================

    /// Area score, Black minus White, without komi.
    ///
    /// Stones count for their owner; an empty point counts for a color when
    /// all its on-board neighbours are stones of that color.
    pub fn area_score(&self) -> i32 {
        let mut score = 0;
        for &p in self.geometry.onboard() {
            let owner = match self.board[p] {
                Stone::Empty => self.surrounding_color(p),
                s => s.color(),
            };
            match owner {
                Some(Color::Black) => score += 1,
                Some(Color::White) => score -= 1,
                None => {}
            }
        }
        score
    }

    /// Area score minus komi (positive means Black wins).
    pub fn final_score(&self) -> f64 {
        self.area_score() as f64 - self.komi
    }

    fn surrounding_color(&self, pos: Point) -> Option<Color> {
        let mut owner = None;
        for n in self.geometry.neighbors(pos) {
            match self.board[n] {
                Stone::OutOfBounds => {}
                Stone::Empty => return None,
                s => match owner {
                    None => owner = s.color(),
                    Some(c) if !s.is(c) => return None,
                    Some(_) => {}
                },
            }
        }
        owner
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    /// Check every structural invariant against a from-scratch recount.
    pub fn verify_integrity(&self) -> Result<(), BoardError> {
        let fail = |msg: String| Err(BoardError::Integrity(msg));
        let geo = &self.geometry;
        let mut owner = vec![None; geo.board_max()];
        let mut positional = 0u64;

        for (id, group) in self.groups() {
            let mut count = 0;
            for s in self.stones(id) {
                count += 1;
                if count > group.size() {
                    return fail(format!("group {id} member list does not close"));
                }
                if !self.board[s].is(group.color()) || self.group_id[s] as GroupId != id {
                    return fail(format!("group {id} lists foreign point {}", geo.format_coord(s)));
                }
                owner[s] = Some(id);
            }
            if count != group.size() {
                return fail(format!("group {id} has {count} members, size {}", group.size()));
            }
            if group.liberty_count() == 0 {
                return fail(format!("group {id} has no liberties"));
            }
        }

        for &p in geo.onboard() {
            let Some(color) = self.board[p].color() else {
                continue;
            };
            positional ^= geo.zobrist().stone(p, color);
            if owner[p].is_none() {
                return fail(format!("stone at {} belongs to no group", geo.format_coord(p)));
            }
        }
        if positional != self.state.positional_hash {
            return fail("positional hash drifted".into());
        }

        for (id, group) in self.groups() {
            let mut libs: Vec<Point> = Vec::new();
            let mut enemies: Vec<GroupId> = Vec::new();
            for s in self.stones(id) {
                for n in geo.neighbors(s) {
                    match self.board[n] {
                        Stone::Empty if !libs.contains(&n) => libs.push(n),
                        c if c.is(group.color().opponent()) => {
                            let e = self.group_id[n] as GroupId;
                            if !enemies.contains(&e) {
                                enemies.push(e);
                            }
                        }
                        _ => {}
                    }
                }
            }
            if libs.len() != group.liberty_count() || libs.iter().any(|&l| !group.has_liberty(l)) {
                return fail(format!(
                    "group {id} stores {} liberties, counted {}",
                    group.liberty_count(),
                    libs.len()
                ));
            }
            if enemies.len() != group.neighbor_count()
                || enemies.iter().any(|&e| !group.neighbors.contains(e))
            {
                return fail(format!("group {id} enemy list out of date"));
            }
        }

        for (id, group) in self.groups.iter().enumerate() {
            if !group.is_active() && (!group.libs.is_empty() || !group.neighbors.is_empty()) {
                return fail(format!("free slot {id} still has links"));
            }
        }
        Ok(())
    }
}

/// Iterator over the member stones of a group.
pub struct Stones<'a> {
    next: &'a [u16],
    origin: Point,
    cur: Option<Point>,
}

impl Iterator for Stones<'_> {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        let cur = self.cur?;
        let n = self.next[cur] as Point;
        self.cur = (n != self.origin).then_some(n);
        Some(cur)
    }
}

impl fmt::Display for GameInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let geo = &self.geometry;
        let size = geo.size();
        let columns: String = (0..size)
            .map(|x| format!(" {}", geo.format_coord(geo.point(x, 0)).chars().next().unwrap_or('?')))
            .collect();
        writeln!(f, "   {columns}")?;
        for y in 0..size {
            write!(f, "{:>2} ", size - y)?;
            for x in 0..size {
                let p = geo.point(x, y);
                let ch = if p == self.state.ko_pos { '*' } else { self.board[p].symbol() };
                write!(f, " {ch}")?;
            }
            writeln!(f)?;
        }
        writeln!(
            f,
            "prisoners: black {} white {}, move {}",
            self.prisoners(Color::Black),
            self.prisoners(Color::White),
            self.moves()
        )
    }
}

impl fmt::Debug for GameInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")?;
        for (id, group) in self.groups() {
            let stones: Vec<String> = self.stones(id).map(|p| self.geometry.format_coord(p)).collect();
            let libs: Vec<String> = group.liberties().map(|p| self.geometry.format_coord(p)).collect();
            writeln!(
                f,
                "group {id} {} size {}: [{}] libs [{}] enemies {:?}",
                group.color(),
                group.size(),
                stones.join(" "),
                libs.join(" "),
                group.neighbors().collect::<Vec<_>>()
            )?;
        }
        Ok(())
    }
}
