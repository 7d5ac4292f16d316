//! Constants for board layout, search bounds, and engine defaults.
//!
//! Board dimensions are chosen at runtime (see [`crate::geometry::Geometry`]),
//! so this module only holds values that do not depend on the board size.

// =============================================================================
// Board Geometry
// =============================================================================

/// Width of the out-of-bounds margin around the playable area.
///
/// Two rows are enough for every Manhattan-distance-2 lookup made from an
/// on-board point to stay inside the array.
pub const OB_SIZE: usize = 2;

/// Smallest supported board size.
pub const MIN_BOARD_SIZE: usize = 5;

/// Largest supported board size.
pub const MAX_BOARD_SIZE: usize = 25;

/// Default board size for new configurations.
pub const DEFAULT_BOARD_SIZE: usize = 9;

/// Move history capacity as a multiple of the board area.
pub const RECORD_FACTOR: usize = 3;

// =============================================================================
// Special Move Values
// =============================================================================

/// Pass move marker (index 0 lies in the margin, so it is never a real point).
pub const PASS: usize = 0;

// =============================================================================
// Game Parameters
// =============================================================================

/// Default komi (compensation points for White).
pub const DEFAULT_KOMI: f64 = 7.5;

/// Seed for the Zobrist key generator. Fixed so hashes are reproducible.
pub const ZOBRIST_SEED: u64 = 0x5eed_0f_2a_9e37_79b9;

// =============================================================================
// Ladder Search
// =============================================================================

/// Depth at which a ladder reading gives up and returns its default verdict.
pub const LADDER_DEPTH_MAX: usize = 100;

/// Minimum depth a decomposed ladder reading must reach before its
/// verdict is trusted.
pub const LADDER_OK_DEPTH: usize = 7;
