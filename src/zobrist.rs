//! Zobrist key tables.
//!
//! Keys are drawn from a seeded `fastrand` generator so that hashes are the
//! same across runs and across boards of the same size.

use crate::stone::Color;

/// Random keys for one board size.
#[derive(Debug, Clone)]
pub struct Zobrist {
    /// `stones[point * 2 + color]`
    stones: Vec<u64>,
    /// XORed into the full hash at the active ko point.
    ko: Vec<u64>,
    /// XORed into the full hash when White is to move.
    side: u64,
}

impl Zobrist {
    pub fn new(board_max: usize, seed: u64) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed);
        let stones = (0..board_max * 2).map(|_| rng.u64(..)).collect();
        let ko = (0..board_max).map(|_| rng.u64(..)).collect();
        let side = rng.u64(..);
        Zobrist { stones, ko, side }
    }

    #[inline]
    pub fn stone(&self, pos: usize, color: Color) -> u64 {
        self.stones[pos * 2 + color.index()]
    }

    #[inline]
    pub fn ko(&self, pos: usize) -> u64 {
        self.ko[pos]
    }

    #[inline]
    pub fn side(&self) -> u64 {
        self.side
    }
}
