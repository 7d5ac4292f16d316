//! Ladder (chain capture) reading.
//!
//! Two forms of the same search live here:
//!
//! - [`is_ladder_captured`]: one recursive predicate that alternates the
//!   escaping and capturing side on a group with at most two liberties.
//!   Used by the rating pass.
//! - [`ladder_capture`] / [`ladder_escape`]: a mutually recursive pair that
//!   also reports how deep the reading went, so callers can tell a proven
//!   result from one cut short. Used by [`ladder_hint`].
//!
//! Both work on a [`SearchBoard`]: every candidate move is played, searched
//! and taken back before the next sibling is tried.

use arrayvec::ArrayVec;
use log::trace;

use crate::constants::{LADDER_DEPTH_MAX, LADDER_OK_DEPTH};
use crate::geometry::Point;
use crate::group::GroupId;
use crate::position::GameInfo;
use crate::search_board::SearchBoard;
use crate::stone::{Color, Stone};

/// Outcome of [`is_ladder_captured`] for the chased group.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LadderVerdict {
    Alive,
    Dead,
}

/// Classification of a candidate move by [`ladder_hint`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum LadderHint {
    #[default]
    NoLadder,
    /// Running out at this point is a ladder that fails.
    CannotEscape,
}

/// No room left in the move history for another ply.
#[inline]
fn history_full(board: &SearchBoard) -> bool {
    board.moves() + 1 >= board.geometry().max_records()
}

// =============================================================================
// Combined predicate
// =============================================================================

/// Decide whether the group at `ren` dies in a ladder with `turn` to play.
///
/// Readings longer than [`LADDER_DEPTH_MAX`] plies, or that would overflow
/// the move history, count as [`LadderVerdict::Alive`]. On a dead result
/// `max_size` is raised to the largest chased group seen on the losing line.
pub fn is_ladder_captured(
    depth: usize,
    board: &mut SearchBoard,
    ren: Point,
    turn: Color,
    max_size: &mut usize,
) -> LadderVerdict {
    if depth >= LADDER_DEPTH_MAX || history_full(board) {
        return LadderVerdict::Alive;
    }
    let Some(escape_color) = board.stone(ren).color() else {
        return LadderVerdict::Dead;
    };
    let id = board.group_id(ren);
    if board.group(id).liberty_count() >= 3 {
        return LadderVerdict::Alive;
    }
    let capture_color = escape_color.opponent();

    if turn == escape_color {
        let mut local_max = *max_size;

        // capturing a chaser comes before running
        let mut cursor = board.group(id).first_neighbor();
        while let Some(enemy) = cursor {
            let group = board.group(enemy);
            if group.liberty_count() == 1 {
                if let Some(lib) = group.first_liberty() {
                    if board.is_legal(lib, escape_color) {
                        board.put_stone(lib, escape_color);
                        let result =
                            is_ladder_captured(depth + 1, board, ren, capture_color, &mut local_max);
                        board.undo();
                        if result == LadderVerdict::Alive {
                            return LadderVerdict::Alive;
                        }
                    }
                }
            }
            cursor = board.group(id).next_neighbor(enemy);
        }

        let mut cursor = board.group(id).first_liberty();
        while let Some(lib) = cursor {
            if board.is_legal(lib, escape_color) {
                board.put_stone(lib, escape_color);
                let result = is_ladder_captured(depth + 1, board, ren, capture_color, &mut local_max);
                board.undo();
                if result == LadderVerdict::Alive {
                    return LadderVerdict::Alive;
                }
            }
            cursor = board.group(id).next_liberty(lib);
        }

        *max_size = (*max_size).max(local_max);
        LadderVerdict::Dead
    } else {
        let group = board.group(id);
        if group.liberty_count() == 1 {
            *max_size = (*max_size).max(group.size());
            return LadderVerdict::Dead;
        }

        let mut cursor = group.first_liberty();
        while let Some(lib) = cursor {
            if board.is_legal(lib, capture_color) {
                board.put_stone(lib, capture_color);
                let result = is_ladder_captured(depth + 1, board, ren, escape_color, max_size);
                board.undo();
                if result == LadderVerdict::Dead {
                    return LadderVerdict::Dead;
                }
            }
            cursor = board.group(id).next_liberty(lib);
        }
        LadderVerdict::Alive
    }
}

// =============================================================================
// Capture / escape pair
// =============================================================================

#[inline]
fn reached(searched: &mut usize, depth: usize) {
    if depth > *searched {
        *searched = depth;
    }
}

/// Neighbouring groups of `color` with exactly `libs` liberties, one stone
/// per group.
fn adjacent_groups(board: &GameInfo, vertex: Point, color: Color, libs: usize) -> ArrayVec<Point, 4> {
    let mut seen: ArrayVec<GroupId, 4> = ArrayVec::new();
    let mut found = ArrayVec::new();
    for n in board.geometry().neighbors(vertex) {
        if !board.stone(n).is(color) {
            continue;
        }
        let id = board.group_id(n);
        if board.group(id).liberty_count() == libs && !seen.contains(&id) {
            seen.push(id);
            found.push(n);
        }
    }
    found
}

/// Whether `color` playing `vertex` captures a two-liberty group in a ladder.
///
/// `group` names a stone of the chased group, which must have exactly two
/// liberties or nothing is read; with `None` every adjacent opponent group
/// with two liberties is tried. Readings that reach
/// [`LADDER_DEPTH_MAX`] count as captured. `searched` records the deepest
/// ply visited.
pub fn ladder_capture(
    board: &mut SearchBoard,
    vertex: Point,
    color: Color,
    group: Option<Point>,
    depth: usize,
    searched: &mut usize,
) -> bool {
    if !board.is_legal(vertex, color) {
        reached(searched, depth);
        return false;
    }
    if depth >= LADDER_DEPTH_MAX || history_full(board) {
        reached(searched, depth);
        return true;
    }
    let escape_color = color.opponent();
    let targets = match group {
        Some(g) => ArrayVec::from_iter([g]),
        None => adjacent_groups(board, vertex, escape_color, 2),
    };

    for target in targets {
        // a group already in atari would be taken off the board below
        if !board.stone(target).is(escape_color) || board.group_at(target).liberty_count() != 2 {
            continue;
        }
        board.put_stone(vertex, color);

        let mut rescue = false;
        let mut escape = None;
        for s in board.stones(board.group_id(target)) {
            for n in board.geometry().neighbors(s) {
                match board.stone(n) {
                    Stone::Empty => escape = Some(n),
                    c if c.is(color) && board.group_at(n).liberty_count() == 1 => rescue = true,
                    _ => {}
                }
            }
        }
        if rescue {
            board.undo();
            reached(searched, depth);
            return false;
        }

        let escaped = escape.is_some_and(|e| {
            ladder_escape(board, e, escape_color, Some(target), depth + 1, searched)
        });
        board.undo();
        if !escaped {
            return true;
        }
    }

    reached(searched, depth);
    false
}

/// Whether `color` playing `vertex` rescues a group in atari.
///
/// `group` names a point of the running group (it may be `vertex` itself);
/// with `None` the first adjacent own group in atari is used. Readings that
/// reach [`LADDER_DEPTH_MAX`] count as failed escapes.
pub fn ladder_escape(
    board: &mut SearchBoard,
    vertex: Point,
    color: Color,
    group: Option<Point>,
    depth: usize,
    searched: &mut usize,
) -> bool {
    if !board.is_legal(vertex, color) || depth >= LADDER_DEPTH_MAX || history_full(board) {
        reached(searched, depth);
        return false;
    }
    let target = match group {
        Some(g) => Some(g),
        None => adjacent_groups(board, vertex, color, 1).first().copied(),
    };
    let Some(target) = target else {
        reached(searched, depth);
        return false;
    };

    board.put_stone(vertex, color);
    let id = board.group_id(target);
    let escaped = match board.group(id).liberty_count() {
        0 | 1 => false,
        2 => {
            let libs: ArrayVec<Point, 2> = board.liberties(id).collect();
            !libs.into_iter().any(|lib| {
                ladder_capture(board, lib, color.opponent(), Some(target), depth + 1, searched)
            })
        }
        _ => true,
    };
    board.undo();
    reached(searched, depth);
    escaped
}

// =============================================================================
// Position-level queries
// =============================================================================

/// Whether the side to move playing `vertex` runs into a ladder it provably
/// loses.
///
/// Two shapes are read: extending a group in atari, and stepping next to a
/// group with two or three liberties where the new stone itself would be
/// chased. Either counts only when the escape fails and the reading went at
/// least [`LADDER_OK_DEPTH`] plies deep.
pub fn ladder_hint(game: &GameInfo, vertex: Point) -> LadderHint {
    let color = game.to_move();
    if !game.is_legal(vertex, color) {
        return LadderHint::NoLadder;
    }
    let mut board: Option<SearchBoard> = None;
    let mut read = |group: Option<Point>| {
        let board = board.get_or_insert_with(|| SearchBoard::new(game));
        let mut searched = 0;
        let escaped = ladder_escape(board, vertex, color, group, 0, &mut searched);
        !escaped && searched >= LADDER_OK_DEPTH
    };

    if let Some(empties) = own_groups_near(game, vertex, color, |libs| libs == 1) {
        if empties <= 2 && read(None) {
            return LadderHint::CannotEscape;
        }
    }
    if let Some(empties) = own_groups_near(game, vertex, color, |libs| libs != 1) {
        if empties <= 2 && read(Some(vertex)) {
            return LadderHint::CannotEscape;
        }
    }
    LadderHint::NoLadder
}

/// Count the empty neighbours of `vertex` if some adjacent own group has a
/// liberty count accepted by `wanted` and none has four or more.
fn own_groups_near(
    game: &GameInfo,
    vertex: Point,
    color: Color,
    wanted: impl Fn(usize) -> bool,
) -> Option<usize> {
    let mut empties = 0;
    let mut found = false;
    for n in game.geometry().neighbors(vertex) {
        match game.stone(n) {
            Stone::Empty => empties += 1,
            s if s.is(color) => {
                let libs = game.group_at(n).liberty_count();
                if libs >= 4 {
                    return None;
                }
                found |= wanted(libs);
            }
            _ => {}
        }
    }
    found.then_some(empties)
}

/// [`ladder_hint`] for every playable point, indexed by point.
pub fn ladder_hint_map(game: &GameInfo) -> Vec<LadderHint> {
    let mut hints = vec![LadderHint::NoLadder; game.geometry().board_max()];
    for &pos in game.geometry().onboard() {
        hints[pos] = ladder_hint(game, pos);
    }
    hints
}

/// Moves that try to save a group of `color` in atari but still die in the
/// ladder.
///
/// Only groups of two or more stones are read. The result is indexed by
/// point; a non-zero entry is the size of the largest group lost on the
/// reading.
pub fn ladder_extension(game: &GameInfo, color: Color) -> Vec<usize> {
    let geo = game.geometry();
    let mut marks = vec![0; geo.board_max()];
    let mut checked = vec![false; geo.board_max()];
    let mut board: Option<SearchBoard> = None;

    for (id, group) in game.groups() {
        if group.color() != color || group.size() < 2 || group.liberty_count() != 1 {
            continue;
        }
        let Some(ladder) = group.first_liberty() else {
            continue;
        };
        if checked[ladder] {
            continue;
        }
        let board = board.get_or_insert_with(|| SearchBoard::new(game));

        let mut saved = false;
        for enemy in group.neighbors() {
            if saved {
                break;
            }
            let enemy = game.group(enemy);
            let Some(lib) = enemy.first_liberty().filter(|_| enemy.liberty_count() == 1) else {
                continue;
            };
            if !game.is_legal(lib, color) {
                continue;
            }
            board.put_stone(lib, color);
            let mut max_size = group.size();
            match is_ladder_captured(0, board, group.origin(), color.opponent(), &mut max_size) {
                LadderVerdict::Dead => marks[lib] = max_size,
                LadderVerdict::Alive => saved = true,
            }
            board.undo();
        }

        if !saved && game.is_legal(ladder, color) {
            board.put_stone(ladder, color);
            let mut max_size = group.size();
            if is_ladder_captured(0, board, ladder, color.opponent(), &mut max_size) == LadderVerdict::Dead {
                marks[ladder] = max_size;
            }
            board.undo();
        }
        checked[ladder] = true;
        trace!("ladder extension check for group {id} at {}", geo.format_coord(ladder));
    }
    marks
}

/// Whether running out with the group of `color` at `pos` (which must be in
/// atari) still loses the ladder.
pub fn check_ladder_extension(game: &GameInfo, color: Color, pos: Point) -> bool {
    if !game.stone(pos).is(color) {
        return false;
    }
    let group = game.group_at(pos);
    let Some(ladder) = group.first_liberty() else {
        return false;
    };
    if group.liberty_count() != 1 || !game.is_legal(ladder, color) {
        return false;
    }
    let mut board = SearchBoard::new(game);
    board.put_stone(ladder, color);
    let mut max_size = group.size();
    is_ladder_captured(0, &mut board, ladder, color.opponent(), &mut max_size) == LadderVerdict::Dead
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Geometry;

    fn setpos(moves: &[(&str, Color)]) -> GameInfo {
        let mut game = GameInfo::new(Geometry::new(9).unwrap());
        for &(s, c) in moves {
            let pos = game.geometry().parse_coord(s).unwrap();
            game.put_stone(pos, c);
        }
        game
    }

    #[test]
    fn test_three_liberties_is_alive() {
        let game = setpos(&[("E5", Color::Black)]);
        let e5 = game.geometry().parse_coord("E5").unwrap();
        let mut board = SearchBoard::new(&game);
        let mut max_size = 1;
        let verdict = is_ladder_captured(0, &mut board, e5, Color::White, &mut max_size);
        assert_eq!(verdict, LadderVerdict::Alive);
        assert_eq!(max_size, 1, "alive readings leave max_size alone");
    }

    #[test]
    fn test_empty_point_is_dead() {
        let game = setpos(&[]);
        let e5 = game.geometry().parse_coord("E5").unwrap();
        let mut board = SearchBoard::new(&game);
        let mut max_size = 0;
        assert_eq!(
            is_ladder_captured(0, &mut board, e5, Color::White, &mut max_size),
            LadderVerdict::Dead
        );
    }

    #[test]
    fn test_depth_bound_defaults() {
        let game = setpos(&[("E5", Color::Black), ("E6", Color::White), ("D5", Color::White)]);
        let geo = game.geometry().clone();
        let e5 = geo.parse_coord("E5").unwrap();
        let mut board = SearchBoard::new(&game);
        let mut max_size = 1;
        // the capturer would win at once, but the bound has the last word
        assert_eq!(
            is_ladder_captured(LADDER_DEPTH_MAX, &mut board, e5, Color::White, &mut max_size),
            LadderVerdict::Alive
        );
        let mut searched = 0;
        assert!(ladder_capture(
            &mut board,
            geo.parse_coord("F5").unwrap(),
            Color::White,
            None,
            LADDER_DEPTH_MAX,
            &mut searched
        ));
        assert_eq!(searched, LADDER_DEPTH_MAX);
    }

    #[test]
    fn test_search_leaves_board_unchanged() {
        let game = setpos(&[("E5", Color::Black), ("E6", Color::White), ("D5", Color::White)]);
        let e5 = game.geometry().parse_coord("E5").unwrap();
        let mut board = SearchBoard::new(&game);
        let mut max_size = 1;
        is_ladder_captured(0, &mut board, e5, Color::White, &mut max_size);
        assert_eq!(board.hash(), game.hash());
        assert_eq!(board.depth(), 0);
        board.verify_integrity().unwrap();
    }
}
