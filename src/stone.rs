//! Stone colors and board cell contents.

use std::fmt;

/// A player color.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    /// The other player.
    #[inline]
    pub fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Index for per-color tables (Black = 0, White = 1).
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Color::Black => 0,
            Color::White => 1,
        }
    }

    /// Parse "b", "black", "w" or "white" (case-insensitive).
    pub fn parse(s: &str) -> Option<Color> {
        match s.to_ascii_lowercase().as_str() {
            "b" | "black" => Some(Color::Black),
            "w" | "white" => Some(Color::White),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "Black"),
            Color::White => write!(f, "White"),
        }
    }
}

/// Content of one cell of the padded board array.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Stone {
    Empty,
    Black,
    White,
    /// Margin cell outside the playable area. Never changes.
    OutOfBounds,
}

impl Stone {
    /// The color of the stone, if this cell holds one.
    #[inline]
    pub fn color(self) -> Option<Color> {
        match self {
            Stone::Black => Some(Color::Black),
            Stone::White => Some(Color::White),
            _ => None,
        }
    }

    #[inline]
    pub fn is(self, color: Color) -> bool {
        self == Stone::from(color)
    }

    /// Two-bit code used by the pattern tables.
    #[inline]
    pub fn code(self) -> u32 {
        match self {
            Stone::Empty => 0,
            Stone::Black => 1,
            Stone::White => 2,
            Stone::OutOfBounds => 3,
        }
    }

    /// Character used in board dumps.
    pub fn symbol(self) -> char {
        match self {
            Stone::Empty => '.',
            Stone::Black => 'X',
            Stone::White => 'O',
            Stone::OutOfBounds => '#',
        }
    }
}

impl From<Color> for Stone {
    #[inline]
    fn from(color: Color) -> Stone {
        match color {
            Color::Black => Stone::Black,
            Color::White => Stone::White,
        }
    }
}
