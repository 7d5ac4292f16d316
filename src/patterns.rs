//! Manhattan-distance-2 pattern codes and the corner seki table.
//!
//! A point's MD2 neighbourhood is the twelve points within Manhattan
//! distance two of it (the point itself excluded). Each neighbour contributes
//! two bits (see [`Stone::code`]), so a neighbourhood packs into 24 bits.
//!
//! The seki table lists the 2-2 point neighbourhoods of a corner where two
//! diagonal stones and two empty points are enclosed by the opponent. Filling
//! either empty point looks like a two-stone self-atari but destroys a seki,
//! so the self-atari check consults this table before flagging the move.
//!
//! Sources are drawn once and expanded over every rotation, reflection,
//! wildcard and colour, in the same way the 3x3 playout patterns used to be.

use crate::stone::{Color, Stone};

/// Row/column offsets of the MD2 neighbourhood, in bit order.
pub const MD2_OFFSETS: [(isize, isize); 12] = [
    (-2, 0),  // NN
    (-1, -1), // NW
    (-1, 0),  // N
    (-1, 1),  // NE
    (0, -2),  // WW
    (0, -1),  // W
    (0, 1),   // E
    (0, 2),   // EE
    (1, -1),  // SW
    (1, 0),   // S
    (1, 1),   // SE
    (2, 0),   // SS
];

/// The 2-2 corner seki, drawn for the lower-left corner with the 2-2 point
/// at the centre. Blank cells are outside the neighbourhood.
/// - X: the colour being checked
/// - O: opponent
/// - .: empty
/// - #: edge of board (out of bounds)
/// - ?: X, O or empty
const SEKI_22_SRC: [&str; 5] = [
    "  ?  ", //
    " OOO ", //
    "#X*O?", //
    " .XO ", //
    "  #  ", //
];

type Grid = [[u8; 5]; 5];

/// Pack twelve neighbour cells into an MD2 code.
pub fn md2_code(cells: [Stone; 12]) -> u32 {
    cells
        .iter()
        .enumerate()
        .fold(0, |code, (i, s)| code | (s.code() << (2 * i)))
}

/// Codes of every corner seki neighbourhood, split by the colour at risk.
#[derive(Debug, Clone)]
pub struct SekiTable {
    codes: [Vec<u32>; 2],
}

impl SekiTable {
    pub fn new() -> Self {
        let grid = parse_grid(&SEKI_22_SRC);
        let mut codes = [Vec::new(), Vec::new()];
        for color in [Color::Black, Color::White] {
            let set = &mut codes[color.index()];
            for sym in symmetries(&grid) {
                wildexp(&sym, 0, color, set);
            }
            set.sort_unstable();
            set.dedup();
        }
        SekiTable { codes }
    }

    /// Whether `code` is a seki neighbourhood around the 2-2 point for `color`.
    #[inline]
    pub fn contains(&self, color: Color, code: u32) -> bool {
        self.codes[color.index()].binary_search(&code).is_ok()
    }

    pub fn len(&self, color: Color) -> usize {
        self.codes[color.index()].len()
    }
}

impl Default for SekiTable {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_grid(src: &[&str; 5]) -> Grid {
    let mut grid = [[b' '; 5]; 5];
    for (r, row) in src.iter().enumerate() {
        for (c, ch) in row.bytes().enumerate().take(5) {
            grid[r][c] = ch;
        }
    }
    grid
}

/// All eight rotations and reflections of a grid.
fn symmetries(grid: &Grid) -> Vec<Grid> {
    let mut out = Vec::with_capacity(8);
    let mut g = *grid;
    for _ in 0..4 {
        out.push(g);
        out.push(transpose(&g));
        g = rot90(&g);
    }
    out
}

fn rot90(g: &Grid) -> Grid {
    let mut out = [[b' '; 5]; 5];
    for (r, row) in out.iter_mut().enumerate() {
        for (c, cell) in row.iter_mut().enumerate() {
            *cell = g[4 - c][r];
        }
    }
    out
}

fn transpose(g: &Grid) -> Grid {
    let mut out = [[b' '; 5]; 5];
    for (r, row) in out.iter_mut().enumerate() {
        for (c, cell) in row.iter_mut().enumerate() {
            *cell = g[c][r];
        }
    }
    out
}

/// Expand `?` wildcards from neighbour `i` onward and collect the codes.
fn wildexp(grid: &Grid, i: usize, color: Color, out: &mut Vec<u32>) {
    if i == MD2_OFFSETS.len() {
        out.push(grid_code(grid, color));
        return;
    }
    let (r, c) = grid_cell(i);
    if grid[r][c] == b'?' {
        for ch in [b'X', b'O', b'.'] {
            let mut g = *grid;
            g[r][c] = ch;
            wildexp(&g, i + 1, color, out);
        }
    } else {
        wildexp(grid, i + 1, color, out);
    }
}

fn grid_cell(i: usize) -> (usize, usize) {
    let (dr, dc) = MD2_OFFSETS[i];
    ((2 + dr) as usize, (2 + dc) as usize)
}

fn grid_code(grid: &Grid, color: Color) -> u32 {
    let cells = std::array::from_fn(|i| {
        let (r, c) = grid_cell(i);
        match grid[r][c] {
            b'X' => Stone::from(color),
            b'O' => Stone::from(color.opponent()),
            b'#' => Stone::OutOfBounds,
            _ => Stone::Empty,
        }
    });
    md2_code(cells)
}
