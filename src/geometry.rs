//! Board-size-dependent layout and lookup tables.
//!
//! The board is a 1D array with an [`OB_SIZE`]-wide margin of out-of-bounds
//! cells on every side, so neighbour lookups from any playable point never
//! leave the array. A [`Geometry`] is built once per board size and shared
//! (via `Arc`) by every position of that size; it owns the neighbour offsets,
//! the Zobrist keys, and the seki and nakade tables.

use std::sync::Arc;

use log::debug;

use crate::constants::{MAX_BOARD_SIZE, MIN_BOARD_SIZE, OB_SIZE, PASS, RECORD_FACTOR, ZOBRIST_SEED};
use crate::error::{BoardError, Result};
use crate::nakade::NakadeTable;
use crate::patterns::{MD2_OFFSETS, SekiTable, md2_code};
use crate::stone::Stone;
use crate::zobrist::Zobrist;

/// A point on the board, represented as an index into the 1D board array.
pub type Point = usize;

/// Column letters used by coordinates (no 'I').
const COLUMNS: &[u8] = b"ABCDEFGHJKLMNOPQRSTUVWXYZ";

#[derive(Debug)]
pub struct Geometry {
    /// Playable board size (NxN).
    size: usize,
    /// Row width including both margins.
    stride: usize,
    /// Total array length.
    board_max: usize,
    /// Playable points in row-major order from the top-left.
    onboard: Vec<Point>,
    /// Group table capacity.
    max_groups: usize,
    /// Move history capacity.
    max_records: usize,
    /// Offsets in the order North, West, East, South.
    neighbor_delta: [isize; 4],
    /// Offsets in the order NW, NE, SW, SE.
    diagonal_delta: [isize; 4],
    md2_delta: [isize; 12],
    zobrist: Zobrist,
    seki: SekiTable,
    nakade: NakadeTable,
}

impl Geometry {
    pub fn new(size: usize) -> Result<Arc<Geometry>> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
            return Err(BoardError::UnsupportedSize(size));
        }
        let stride = size + 2 * OB_SIZE;
        let board_max = stride * stride;
        let w = stride as isize;
        let onboard = (0..size)
            .flat_map(|y| (0..size).map(move |x| (y + OB_SIZE) * stride + x + OB_SIZE))
            .collect();
        let pure_max = size * size;
        let geometry = Geometry {
            size,
            stride,
            board_max,
            onboard,
            // No legal position has more groups than 4/5 of the board area;
            // one more slot covers the stone being placed.
            max_groups: pure_max * 4 / 5 + 1,
            max_records: pure_max * RECORD_FACTOR,
            neighbor_delta: [-w, -1, 1, w],
            diagonal_delta: [-w - 1, -w + 1, w - 1, w + 1],
            md2_delta: MD2_OFFSETS.map(|(dr, dc)| dr * w + dc),
            zobrist: Zobrist::new(board_max, ZOBRIST_SEED),
            seki: SekiTable::new(),
            nakade: NakadeTable::new(),
        };
        debug!(
            "geometry {size}x{size}: {board_max} cells, {} group slots, {} seki codes",
            geometry.max_groups,
            geometry.seki.len(crate::stone::Color::Black)
        );
        Ok(Arc::new(geometry))
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn board_max(&self) -> usize {
        self.board_max
    }

    #[inline]
    pub fn max_groups(&self) -> usize {
        self.max_groups
    }

    #[inline]
    pub fn max_records(&self) -> usize {
        self.max_records
    }

    /// Playable points in row-major order.
    #[inline]
    pub fn onboard(&self) -> &[Point] {
        &self.onboard
    }

    #[inline]
    pub fn zobrist(&self) -> &Zobrist {
        &self.zobrist
    }

    #[inline]
    pub fn seki(&self) -> &SekiTable {
        &self.seki
    }

    #[inline]
    pub fn nakade(&self) -> &NakadeTable {
        &self.nakade
    }

    /// The point at column `x`, row `y`, both 0-based from the top-left.
    #[inline]
    pub fn point(&self, x: usize, y: usize) -> Point {
        debug_assert!(x < self.size && y < self.size);
        (y + OB_SIZE) * self.stride + x + OB_SIZE
    }

    /// 0-based column of a playable point.
    #[inline]
    pub fn x(&self, pos: Point) -> usize {
        pos % self.stride - OB_SIZE
    }

    /// 0-based row (from the top) of a playable point.
    #[inline]
    pub fn y(&self, pos: Point) -> usize {
        pos / self.stride - OB_SIZE
    }

    pub fn is_onboard(&self, pos: Point) -> bool {
        let (r, c) = (pos / self.stride, pos % self.stride);
        pos < self.board_max
            && (OB_SIZE..OB_SIZE + self.size).contains(&r)
            && (OB_SIZE..OB_SIZE + self.size).contains(&c)
    }

    /// Orthogonal neighbours in the order North, West, East, South.
    #[inline]
    pub fn neighbors(&self, pos: Point) -> [Point; 4] {
        self.neighbor_delta.map(|d| (pos as isize + d) as usize)
    }

    /// Diagonal neighbours in the order NW, NE, SW, SE.
    #[inline]
    pub fn diagonals(&self, pos: Point) -> [Point; 4] {
        self.diagonal_delta.map(|d| (pos as isize + d) as usize)
    }

    /// MD2 pattern code of the neighbourhood of `pos`.
    pub fn md2_code(&self, board: &[Stone], pos: Point) -> u32 {
        md2_code(self.md2_delta.map(|d| board[(pos as isize + d) as usize]))
    }

    /// The 2-2 point of the corner that `pos` lies in, if `pos` is on the
    /// first or second line from two edges.
    pub fn corner_22(&self, pos: Point) -> Option<Point> {
        let near = |v: usize| {
            if v <= 1 {
                Some(1)
            } else if v + 2 >= self.size {
                Some(self.size - 2)
            } else {
                None
            }
        };
        let x = near(self.x(pos))?;
        let y = near(self.y(pos))?;
        Some(self.point(x, y))
    }

    /// Parse a coordinate string (e.g., "D4", "pass") into a Point.
    ///
    /// Columns use letters A-Z skipping I, rows count from 1 at the bottom.
    pub fn parse_coord(&self, s: &str) -> Result<Point> {
        if s.eq_ignore_ascii_case("pass") {
            return Ok(PASS);
        }
        let invalid = || BoardError::InvalidCoordinate(s.to_string());
        let bytes = s.as_bytes();
        let (&col_char, row_digits) = bytes.split_first().ok_or_else(invalid)?;
        let x = COLUMNS[..self.size]
            .iter()
            .position(|&c| c == col_char.to_ascii_uppercase())
            .ok_or_else(invalid)?;
        let row: usize = std::str::from_utf8(row_digits)
            .ok()
            .and_then(|r| r.parse().ok())
            .ok_or_else(invalid)?;
        if row == 0 || row > self.size {
            return Err(invalid());
        }
        Ok(self.point(x, self.size - row))
    }

    /// Convert a Point to a coordinate string (e.g., "D4").
    ///
    /// Returns "pass" for [`PASS`].
    pub fn format_coord(&self, pos: Point) -> String {
        if pos == PASS {
            return "pass".into();
        }
        let col = COLUMNS[self.x(pos)] as char;
        format!("{col}{}", self.size - self.y(pos))
    }
}
