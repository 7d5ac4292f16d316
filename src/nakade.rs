//! Nakade shapes.
//!
//! A self-atari of three to five stones is still a useful move when the
//! stones, once captured, leave an eye space the capturer cannot split into
//! two eyes. Shapes are compared in a canonical form: translated to the
//! origin and minimised over the eight board symmetries.

/// Killing shapes as `(x, y)` cells.
const NAKADE_SRC: &[&[(isize, isize)]] = &[
    // straight three
    &[(0, 0), (1, 0), (2, 0)],
    // bent three
    &[(0, 0), (1, 0), (0, 1)],
    // squared four
    &[(0, 0), (1, 0), (0, 1), (1, 1)],
    // pyramid four
    &[(0, 0), (1, 0), (2, 0), (1, 1)],
    // bulky five
    &[(0, 0), (1, 0), (2, 0), (0, 1), (1, 1)],
    // crossed five
    &[(1, 0), (0, 1), (1, 1), (2, 1), (1, 2)],
];

/// Largest shape the table can describe.
pub const NAKADE_MAX_STONES: usize = 5;

#[derive(Debug, Clone)]
pub struct NakadeTable {
    shapes: Vec<u32>,
}

impl NakadeTable {
    pub fn new() -> Self {
        let mut shapes: Vec<u32> = NAKADE_SRC.iter().filter_map(|s| canonical(s)).collect();
        shapes.sort_unstable();
        shapes.dedup();
        NakadeTable { shapes }
    }

    /// Whether the cells form one of the nakade shapes.
    pub fn is_nakade(&self, cells: &[(isize, isize)]) -> bool {
        canonical(cells).is_some_and(|code| self.shapes.binary_search(&code).is_ok())
    }
}

impl Default for NakadeTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Canonical bitmask of a shape, or `None` if it is empty or does not fit in
/// a 5x5 box.
fn canonical(cells: &[(isize, isize)]) -> Option<u32> {
    if cells.is_empty() || cells.len() > NAKADE_MAX_STONES {
        return None;
    }
    (0..8).filter_map(|sym| mask(cells, sym)).min()
}

fn mask(cells: &[(isize, isize)], sym: usize) -> Option<u32> {
    let moved = cells.iter().map(|&(x, y)| transform(x, y, sym));
    let min_x = moved.clone().map(|p| p.0).min()?;
    let min_y = moved.clone().map(|p| p.1).min()?;
    let mut bits = 0u32;
    for (x, y) in moved {
        let (x, y) = (x - min_x, y - min_y);
        if x >= 5 || y >= 5 {
            return None;
        }
        bits |= 1 << (y * 5 + x);
    }
    Some(bits)
}

fn transform(x: isize, y: isize, sym: usize) -> (isize, isize) {
    let (x, y) = if sym & 4 != 0 { (y, x) } else { (x, y) };
    let x = if sym & 1 != 0 { -x } else { x };
    let y = if sym & 2 != 0 { -y } else { y };
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognises_rotated_shapes() {
        let table = NakadeTable::new();
        // vertical straight three
        assert!(table.is_nakade(&[(3, 3), (3, 4), (3, 5)]));
        // bent three pointing the other way
        assert!(table.is_nakade(&[(7, 7), (6, 7), (7, 6)]));
        // upside-down pyramid
        assert!(table.is_nakade(&[(0, 1), (1, 1), (2, 1), (1, 0)]));
    }

    #[test]
    fn test_rejects_living_shapes() {
        let table = NakadeTable::new();
        // straight four gives two eyes
        assert!(!table.is_nakade(&[(0, 0), (1, 0), (2, 0), (3, 0)]));
        // bent four in the shape of an L
        assert!(!table.is_nakade(&[(0, 0), (0, 1), (0, 2), (1, 2)]));
        // two stones are too small to matter
        assert!(!table.is_nakade(&[(0, 0), (1, 0)]));
    }

    #[test]
    fn test_too_large_shapes() {
        let table = NakadeTable::new();
        let six: Vec<_> = (0..6).map(|x| (x, 0)).collect();
        assert!(!table.is_nakade(&six));
    }
}
