use thiserror::Error;

use crate::constants::{MAX_BOARD_SIZE, MIN_BOARD_SIZE};

/// Errors raised while building boards or reading coordinates.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("unsupported board size {0} (expected {MIN_BOARD_SIZE}..={MAX_BOARD_SIZE})")]
    UnsupportedSize(usize),

    #[error("invalid coordinate '{0}'")]
    InvalidCoordinate(String),

    #[error("board integrity check failed: {0}")]
    Integrity(String),
}

/// Reasons a checked move is rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("Illegal move: point not EMPTY")]
    Occupied,

    #[error("Illegal move: retakes ko")]
    Ko,

    #[error("Illegal move: suicide")]
    Suicide,

    #[error("Illegal move: repeats an earlier position")]
    Superko,
}

pub type Result<T> = std::result::Result<T, BoardError>;
