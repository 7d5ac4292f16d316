//! Disposable position for read-ahead.
//!
//! A [`SearchBoard`] is a deep copy of a [`GameInfo`] with the undo journal
//! switched on. Searches play a move, recurse, and take it back, so one
//! copy serves a whole top-level query.

use std::ops::Deref;

use crate::geometry::Point;
use crate::position::GameInfo;
use crate::stone::Color;

#[derive(Clone)]
pub struct SearchBoard {
    game: GameInfo,
}

impl SearchBoard {
    pub fn new(game: &GameInfo) -> Self {
        let mut game = game.clone();
        game.enable_journal();
        SearchBoard { game }
    }

    /// Make this board a fresh copy of `game`, reusing its buffers. Any
    /// moves not yet taken back are discarded.
    pub fn reset(&mut self, game: &GameInfo) {
        self.game.copy_position(game);
    }

    /// Play without a legality check. See [`GameInfo::put_stone`].
    #[inline]
    pub fn put_stone(&mut self, pos: Point, color: Color) {
        self.game.put_stone(pos, color);
    }

    /// Take back the most recent move made through this board.
    ///
    /// # Panics
    ///
    /// If no move has been played since the board was created.
    #[inline]
    pub fn undo(&mut self) {
        self.game.undo();
    }

    /// Legality without the superko history scan.
    #[inline]
    pub fn is_legal(&self, pos: Point, color: Color) -> bool {
        self.game.is_legal_for_search(pos, color)
    }

    /// Moves played since the copy that can still be taken back.
    pub fn depth(&self) -> usize {
        self.game.undo_depth()
    }
}

impl Deref for SearchBoard {
    type Target = GameInfo;

    fn deref(&self) -> &GameInfo {
        &self.game
    }
}
