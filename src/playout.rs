//! Monte Carlo playouts (policy-weighted game simulation).
//!
//! A playout rates the position for the side to move, draws a move with
//! probability proportional to its feature weight, and repeats until both
//! sides pass or the move history is nearly full. Capture-race answers to
//! the previous move get an extra gamma. Moves that fill an own eye, break
//! a corner seki or put a large group in atari are never chosen.

use log::debug;

use crate::config::FeatureWeights;
use crate::constants::PASS;
use crate::geometry::Point;
use crate::position::GameInfo;
use crate::rating::{RatingScratch, analyze_po_rating_with};
use crate::semeai::semeai_moves;
use crate::stone::Color;

/// Play `game` out to the end.
///
/// Returns the final area score (komi included) from the perspective of the
/// player to move at the start:
/// - Positive score = starting player wins
/// - Negative score = starting player loses
pub fn playout(game: &mut GameInfo, rng: &mut fastrand::Rng, weights: &FeatureWeights) -> f64 {
    let start = game.to_move();
    let start_moves = game.moves();
    // one ply of headroom for the ladder readings of the rating pass
    let limit = game.geometry().max_records().saturating_sub(2);
    let mut scratch = RatingScratch::default();

    while game.pass_count() < 2 && game.moves() < limit {
        let color = game.to_move();
        let pos = choose_move_with(game, color, rng, weights, &mut scratch);
        game.put_stone(pos, color);
    }

    let score = game.final_score();
    debug!(
        "playout from move {start_moves} ended after {} moves, score {score:+.1} for Black",
        game.moves() - start_moves
    );
    match start {
        Color::Black => score,
        Color::White => -score,
    }
}

/// Draw a move for `color`, or [`PASS`] if nothing is worth playing.
pub fn choose_move(
    game: &GameInfo,
    color: Color,
    rng: &mut fastrand::Rng,
    weights: &FeatureWeights,
) -> Point {
    choose_move_with(game, color, rng, weights, &mut RatingScratch::default())
}

/// [`choose_move`] with rating buffers carried over from the previous move.
pub fn choose_move_with(
    game: &GameInfo,
    color: Color,
    rng: &mut fastrand::Rng,
    weights: &FeatureWeights,
    scratch: &mut RatingScratch,
) -> Point {
    let analysis = analyze_po_rating_with(game, color, scratch);
    let race = semeai_moves(game, color);
    let mut candidates: Vec<(Point, f64)> = Vec::with_capacity(game.geometry().onboard().len());
    let mut total = 0.0;

    for &pos in game.geometry().onboard() {
        if !analysis.legal[pos]
            || !analysis.self_atari[pos].is_acceptable()
            || !game.is_legal_not_eye(pos, color)
        {
            continue;
        }
        let mut w = weights.weight(analysis.features.set1(pos), analysis.features.set2(pos));
        for &(p, kind) in &race {
            if p == pos {
                w *= weights.semeai_gamma(kind);
            }
        }
        if w > 0.0 {
            total += w;
            candidates.push((pos, w));
        }
    }

    if candidates.is_empty() {
        return PASS;
    }
    let mut r = rng.f64() * total;
    for &(pos, w) in &candidates {
        if r < w {
            return pos;
        }
        r -= w;
    }
    // rounding left a sliver past the last weight
    candidates[candidates.len() - 1].0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Geometry;
    use crate::rating::analyze_po_rating;
    use crate::semeai::SemeaiMove;
    use crate::stone::Stone;

    fn small_game() -> GameInfo {
        GameInfo::new(Geometry::new(5).unwrap())
    }

    #[test]
    fn test_playout_terminates() {
        let mut game = small_game();
        let mut rng = fastrand::Rng::with_seed(1);
        let score = playout(&mut game, &mut rng, &FeatureWeights::default());
        assert!(game.pass_count() >= 2 || game.moves() >= game.geometry().max_records() - 2);
        assert!(score.abs() <= 25.0 + game.komi(), "score {score} out of range");
        game.verify_integrity().unwrap();
    }

    #[test]
    fn test_playout_is_reproducible() {
        let mut a = small_game();
        let mut b = small_game();
        let sa = playout(&mut a, &mut fastrand::Rng::with_seed(9), &FeatureWeights::default());
        let sb = playout(&mut b, &mut fastrand::Rng::with_seed(9), &FeatureWeights::default());
        assert_eq!(sa, sb);
        assert_eq!(a.move_hash(), b.move_hash());
    }

    #[test]
    fn test_playout_never_fills_own_eye() {
        let mut game = small_game();
        let mut rng = fastrand::Rng::with_seed(3);
        playout(&mut game, &mut rng, &FeatureWeights::uniform());
        if game.pass_count() < 2 {
            // stopped by the history limit, not by the players
            return;
        }
        // the last pass was made with no ko pending, in this very position
        let color = game.previous(1).expect("a finished playout has moves").color;
        let analysis = analyze_po_rating(&game, color);
        for &p in game.geometry().onboard() {
            if game.stone(p) == Stone::Empty {
                assert!(
                    !game.is_legal_not_eye(p, color) || !analysis.self_atari[p].is_acceptable(),
                    "{} was still playable when the playout stopped",
                    game.geometry().format_coord(p)
                );
            }
        }
    }

    #[test]
    fn test_choose_move_passes_without_candidates() {
        let mut game = small_game();
        let geo = game.geometry().clone();
        // fill the board except for two black eyes
        for &p in geo.onboard() {
            let (x, y) = (geo.x(p), geo.y(p));
            if (x, y) != (0, 0) && (x, y) != (2, 0) {
                game.put_stone(p, Color::Black);
            }
        }
        let mut rng = fastrand::Rng::with_seed(5);
        assert_eq!(choose_move(&game, Color::Black, &mut rng, &FeatureWeights::default()), PASS);
    }

    fn setpos(black: &[&str], white: &[&str]) -> GameInfo {
        let mut game = GameInfo::new(Geometry::new(9).unwrap());
        let geo = game.geometry().clone();
        for s in black {
            game.put_stone(geo.parse_coord(s).unwrap(), Color::Black);
        }
        for s in white {
            game.put_stone(geo.parse_coord(s).unwrap(), Color::White);
        }
        game
    }

    #[test]
    fn test_choose_move_never_breaks_corner_seki() {
        let game = setpos(&["A2", "B1"], &["A3", "B3", "C3", "C2", "C1"]);
        let geo = game.geometry().clone();
        let seki = [geo.parse_coord("B2").unwrap(), geo.parse_coord("A1").unwrap()];
        let mut rng = fastrand::Rng::with_seed(11);
        let mut scratch = RatingScratch::default();
        for _ in 0..2000 {
            let pos = choose_move_with(&game, Color::Black, &mut rng, &FeatureWeights::default(), &mut scratch);
            assert!(!seki.contains(&pos), "{} breaks the seki", geo.format_coord(pos));
        }
    }

    #[test]
    fn test_semeai_gamma_steers_the_draw() {
        // white E4 holds black E5 in atari and can itself be taken at E3
        let game = setpos(&["E5", "D4", "F4"], &["E6", "D5", "E4"]);
        let e3 = game.geometry().parse_coord("E3").unwrap();
        let weights = FeatureWeights::uniform().with_semeai_gamma(SemeaiMove::Rescue, 1e9);
        let mut rng = fastrand::Rng::with_seed(4);
        for _ in 0..50 {
            assert_eq!(choose_move(&game, Color::Black, &mut rng, &weights), e3);
        }

        let weights = FeatureWeights::uniform()
            .with_semeai_gamma(SemeaiMove::Rescue, 0.0)
            .with_semeai_gamma(SemeaiMove::Capture, 0.0);
        for _ in 0..200 {
            assert_ne!(choose_move(&game, Color::Black, &mut rng, &weights), e3);
        }
    }

    #[test]
    fn test_scratch_does_not_change_the_draws() {
        let mut game = small_game();
        let mut plain = fastrand::Rng::with_seed(21);
        let mut reused = fastrand::Rng::with_seed(21);
        let mut scratch = RatingScratch::default();
        for _ in 0..30 {
            let color = game.to_move();
            let a = choose_move(&game, color, &mut plain, &FeatureWeights::default());
            let b = choose_move_with(&game, color, &mut reused, &FeatureWeights::default(), &mut scratch);
            assert_eq!(a, b);
            game.put_stone(a, color);
        }
    }
}
