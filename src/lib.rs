//! Ray-Rust: Go board core with ladder reading and tactical move ratings.
//!
//! This crate provides the position engine of a Monte Carlo Go program:
//! incremental group tracking with Zobrist hashing and ko/superko rules,
//! ladder search on an undoable board, and the tactical features a playout
//! policy uses to weight candidate moves.
//!
//! ## Modules
//!
//! - [`constants`] - Board dimensions and engine parameters
//! - [`geometry`] - Padded board layout shared by every position of one size
//! - [`position`] - Game state: stones, groups, captures, ko, hashing
//! - [`search_board`] - Position copy with move undo for reading
//! - [`ladder`] - Ladder search and ladder hints
//! - [`semeai`] - Capturing races next to groups in atari
//! - [`rating`] - Tactical features, ladder cache, self-atari classes
//! - [`playout`] - Policy-weighted game simulation
//! - [`config`] - Engine configuration and feature weights
//!
//! ## Example
//!
//! ```
//! use ray_rust::geometry::Geometry;
//! use ray_rust::position::GameInfo;
//! use ray_rust::stone::{Color, Stone};
//!
//! let mut game = GameInfo::new(Geometry::new(9)?);
//! let at = |game: &GameInfo, s: &str| game.geometry().parse_coord(s);
//!
//! // Surround a black stone and take it
//! game.play(at(&game, "E5")?, Color::Black)?;
//! for coord in ["E6", "D5", "F5", "E4"] {
//!     game.play(at(&game, coord)?, Color::White)?;
//! }
//! assert_eq!(game.stone(at(&game, "E5")?), Stone::Empty);
//! assert_eq!(game.prisoners(Color::White), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod group;
mod journal;
pub mod ladder;
pub mod linked;
pub mod nakade;
pub mod patterns;
pub mod playout;
pub mod position;
pub mod rating;
pub mod search_board;
pub mod semeai;
pub mod stone;
pub mod zobrist;
