//! Engine configuration.
//!
//! [`EngineConfig`] gathers everything needed to set up a game: board size,
//! komi, the superko rule, the playout seed and the feature weights used by
//! the playout policy.

use crate::constants::{DEFAULT_BOARD_SIZE, DEFAULT_KOMI};
use crate::error::Result;
use crate::geometry::Geometry;
use crate::position::GameInfo;
use crate::rating::{Feature1, Feature2};
use crate::semeai::SemeaiMove;

/// Multiplicative weights (gammas) for each tactical feature.
///
/// A point's playout weight is the product of the gammas of every feature
/// set on it; a point with no features weighs 1. Capture-race moves around
/// the previous move are further scaled by their `semeai` gamma.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureWeights {
    pub set1: [f64; 12],
    pub set2: [f64; 12],
    pub semeai: [f64; 3],
}

impl FeatureWeights {
    /// Every gamma set to 1, which makes playouts uniformly random.
    pub fn uniform() -> Self {
        FeatureWeights {
            set1: [1.0; 12],
            set2: [1.0; 12],
            semeai: [1.0; 3],
        }
    }

    /// Set the gamma of one first-set feature
    pub fn with_gamma1(mut self, feature: Feature1, gamma: f64) -> Self {
        self.set1[feature.index()] = gamma.max(0.0);
        self
    }

    /// Set the gamma of one second-set feature
    pub fn with_gamma2(mut self, feature: Feature2, gamma: f64) -> Self {
        self.set2[feature.index()] = gamma.max(0.0);
        self
    }

    /// Set the gamma of one kind of capture-race move
    pub fn with_semeai_gamma(mut self, kind: SemeaiMove, gamma: f64) -> Self {
        self.semeai[kind.index()] = gamma.max(0.0);
        self
    }

    #[inline]
    pub fn semeai_gamma(&self, kind: SemeaiMove) -> f64 {
        self.semeai[kind.index()]
    }

    /// Weight of a point with the given feature masks.
    pub fn weight(&self, set1: u32, set2: u32) -> f64 {
        let mut w = 1.0;
        for (i, gamma) in self.set1.iter().enumerate() {
            if set1 & (1 << i) != 0 {
                w *= gamma;
            }
        }
        for (i, gamma) in self.set2.iter().enumerate() {
            if set2 & (1 << i) != 0 {
                w *= gamma;
            }
        }
        w
    }
}

impl Default for FeatureWeights {
    fn default() -> Self {
        Self {
            // CAPTURE1..4, SAVE, SAVE_CAPTURE, 2POINT_CAPTURE, 3POINT_CAPTURE,
            // CAPTURE_AFTER_KO, SAVE_EXTENSION_SAFELY, SAVE_EXTENSION, CAPTURE_ESCAPABLE
            set1: [3.0, 5.0, 8.0, 12.0, 4.0, 6.0, 5.0, 3.0, 6.0, 8.0, 0.5, 0.7],
            // SELF_ATARI_SMALL, _NAKADE, _LARGE, ATARI, 2POINT_ATARI, 2POINT_C_ATARI,
            // 3POINT_ATARI, 3POINT_C_ATARI, 2POINT_EXTENSION_SAFELY, 2POINT_EXTENSION,
            // 3POINT_EXTENSION_SAFELY, 3POINT_EXTENSION
            set2: [0.5, 1.5, 0.05, 1.5, 2.0, 4.0, 1.2, 2.0, 2.0, 0.7, 1.2, 0.9],
            // RESCUE, CAPTURE, ATARI
            semeai: [6.0, 4.0, 3.0],
        }
    }
}

/// Configuration for a game and its playouts
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Board size (NxN)
    pub board_size: usize,

    /// Points added to White's score
    pub komi: f64,

    /// Whether whole-board repetition is illegal
    pub superko: bool,

    /// Seed for the playout random number generator
    pub seed: u64,

    /// Playout policy weights
    pub weights: FeatureWeights,
}

impl EngineConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set board size
    pub fn with_board_size(mut self, size: usize) -> Self {
        self.board_size = size;
        self
    }

    /// Set komi
    pub fn with_komi(mut self, komi: f64) -> Self {
        self.komi = komi;
        self
    }

    /// Enable or disable positional superko
    pub fn with_superko(mut self, enabled: bool) -> Self {
        self.superko = enabled;
        self
    }

    /// Set playout seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set playout feature weights
    pub fn with_weights(mut self, weights: FeatureWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Empty board set up with this configuration.
    ///
    /// Fails if the board size is outside the supported range.
    pub fn new_game(&self) -> Result<GameInfo> {
        let mut game = GameInfo::new(Geometry::new(self.board_size)?);
        game.set_komi(self.komi);
        game.set_superko(self.superko);
        Ok(game)
    }

    /// Random number generator seeded from this configuration.
    pub fn rng(&self) -> fastrand::Rng {
        fastrand::Rng::with_seed(self.seed)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            komi: DEFAULT_KOMI,
            superko: false,
            seed: 1,
            weights: FeatureWeights::default(),
        }
    }
}
