//! Capture-race helpers for playout policies.
//!
//! [`semeai_moves`] looks at the groups touching the previous move and
//! names the points a playout should favour: capturing the stone that holds
//! an own group in atari, taking an attacker before it runs, and ataris that
//! win a two-liberty group outright.

use arrayvec::ArrayVec;

use crate::constants::PASS;
use crate::geometry::Point;
use crate::group::GroupId;
use crate::position::GameInfo;
use crate::rating::is_self_atari;
use crate::search_board::SearchBoard;
use crate::stone::Color;

/// Why [`semeai_moves`] suggested a point.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SemeaiMove {
    /// Captures the lone stone that holds an own group in atari.
    Rescue,
    /// Captures a group in atari that would get out by extending.
    Capture,
    /// Ataris a two-liberty group that cannot escape.
    Atari,
}

impl SemeaiMove {
    pub const ALL: [SemeaiMove; 3] = [SemeaiMove::Rescue, SemeaiMove::Capture, SemeaiMove::Atari];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// The point that captures the only one-stone group in atari touching
/// group `id`.
///
/// Returns `None` if no adjacent group is in atari, if more than one is, or
/// if one of them has two or more stones.
pub fn capturable_candidate(game: &GameInfo, id: GroupId) -> Option<Point> {
    let mut candidate = None;
    for enemy in game.group(id).neighbors() {
        let enemy = game.group(enemy);
        if enemy.liberty_count() != 1 {
            continue;
        }
        if enemy.size() >= 2 || candidate.is_some() {
            return None;
        }
        candidate = enemy.first_liberty();
    }
    candidate
}

/// Whether the opponent group `id`, in atari, stays in atari (or commits
/// suicide) by extending at its last liberty. `color` is the attacker.
pub fn is_deadly_extension(game: &GameInfo, color: Color, id: GroupId) -> bool {
    let other = color.opponent();
    let Some(pos) = game.group(id).first_liberty() else {
        return true;
    };
    if game.empty_neighbor_count(pos) == 0 && game.is_suicide(pos, other) {
        return true;
    }
    let mut board = SearchBoard::new(game);
    board.put_stone(pos, other);
    board.group_at(pos).liberty_count() == 1
}

/// Whether `color` playing atari at `pos` against the two-liberty group
/// containing `opponent_pos` wins it: the group cannot escape through its
/// other liberty.
pub fn is_capturable_atari(game: &GameInfo, pos: Point, color: Color, opponent_pos: Point) -> bool {
    let geo = game.geometry();
    let other = color.opponent();
    if !game.stone(opponent_pos).is(other) {
        return false;
    }
    let id = game.group_id(opponent_pos);
    let Some(lib) = game.liberties(id).find(|&l| l != pos) else {
        return false;
    };

    let empty = game.empty_neighbor_count(lib);
    // after the atari, `pos` is no longer an empty neighbour of `lib`
    let adjacent = geo.neighbors(pos).contains(&lib);
    if empty == 3 || (adjacent && empty >= 3) || (!adjacent && empty >= 2) {
        return false;
    }

    let mut connect_libs = 0;
    for n in geo.neighbors(lib) {
        if !game.stone(n).is(other) || game.group_id(n) == id {
            continue;
        }
        let libs = game.group_at(n).liberty_count();
        if libs > 2 {
            return false;
        }
        connect_libs += libs - 1;
    }
    if adjacent { connect_libs < 2 } else { connect_libs < 1 }
}

/// Whether `color` playing `pos`, the last liberty `lib` of an own group,
/// takes only a single stone and leaves the capturing group in atari.
pub fn is_self_atari_capture(game: &GameInfo, pos: Point, color: Color, lib: Point) -> bool {
    if lib != pos || game.empty_neighbor_count(pos) != 0 {
        return false;
    }
    let other = color.opponent();
    let mut size = 0;
    for n in game.geometry().neighbors(pos) {
        let stone = game.stone(n);
        if stone.is(color) {
            if game.group_at(n).liberty_count() > 1 {
                return false;
            }
        } else if stone.is(other) {
            size += game.group_at(n).size();
            if size > 1 {
                return false;
            }
        }
    }
    true
}

/// Whether group `id` has already lost the race against the groups in
/// `racers`.
///
/// A group in atari has. A group with two liberties has when each liberty
/// touches a racer not already counted for the other one and every racer
/// touches one of them.
pub fn is_already_captured(game: &GameInfo, id: GroupId, racers: &[GroupId]) -> bool {
    let group = game.group(id);
    match group.liberty_count() {
        1 => true,
        2 => {
            let mut used: ArrayVec<bool, 8> = racers.iter().map(|_| false).take(8).collect();
            for lib in group.liberties() {
                let mut touched: ArrayVec<usize, 8> = ArrayVec::new();
                for n in game.geometry().neighbors(lib) {
                    if game.stone(n).color().is_none() {
                        continue;
                    }
                    let owner = game.group_id(n);
                    for (i, &racer) in racers.iter().enumerate().take(used.len()) {
                        if racer == owner && !used[i] && !touched.contains(&i) {
                            touched.push(i);
                        }
                    }
                }
                if touched.is_empty() {
                    return false;
                }
                for i in touched {
                    used[i] = true;
                }
            }
            racers.len() == used.len() && used.iter().all(|&u| u)
        }
        _ => false,
    }
}

/// Capture-race moves for `color` around the opponent's previous move.
///
/// A point can be listed once per reason. Legality is left to the caller.
pub fn semeai_moves(game: &GameInfo, color: Color) -> ArrayVec<(Point, SemeaiMove), 8> {
    let mut found = ArrayVec::new();
    let last = game.last_move();
    let other = color.opponent();
    if last == PASS || !game.stone(last).is(other) {
        return found;
    }

    let mut racers: ArrayVec<GroupId, 4> = ArrayVec::new();
    for n in game.geometry().neighbors(last) {
        if !game.stone(n).is(color) {
            continue;
        }
        let id = game.group_id(n);
        if racers.contains(&id) {
            continue;
        }
        racers.push(id);
        let group = game.group(id);
        if group.liberty_count() != 1 {
            continue;
        }
        if let (Some(pos), Some(lib)) = (capturable_candidate(game, id), group.first_liberty()) {
            if !is_self_atari_capture(game, pos, color, lib) {
                found.push((pos, SemeaiMove::Rescue));
            }
        }
    }

    let id = game.group_id(last);
    let group = game.group(id);
    match group.liberty_count() {
        1 => {
            if let Some(lib) = group.first_liberty() {
                if !is_deadly_extension(game, color, id) {
                    found.push((lib, SemeaiMove::Capture));
                }
            }
        }
        2 if !is_already_captured(game, id, &racers) => {
            for lib in group.liberties() {
                if !is_self_atari(game, color, lib) && is_capturable_atari(game, lib, color, last) {
                    found.push((lib, SemeaiMove::Atari));
                }
            }
        }
        _ => {}
    }
    found
}
