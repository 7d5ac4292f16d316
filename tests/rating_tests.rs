//! Tactical feature and self-atari tests

use ray_rust::config::FeatureWeights;
use ray_rust::constants::PASS;
use ray_rust::geometry::Geometry;
use ray_rust::playout::choose_move;
use ray_rust::position::GameInfo;
use ray_rust::rating::{
    Feature1, Feature2, LadderState, RatingContext, RatingScratch, SelfAtari, TacticalFeatures,
    analyze_po_rating, analyze_po_rating_with, check_self_atari, is_self_atari,
};
use ray_rust::semeai::{capturable_candidate, is_capturable_atari};
use ray_rust::stone::{Color, Stone};

fn setpos(black: &[&str], white: &[&str]) -> GameInfo {
    let mut game = GameInfo::new(Geometry::new(9).unwrap());
    for i in 0..black.len().max(white.len()) {
        for (list, color) in [(black, Color::Black), (white, Color::White)] {
            let coord = list.get(i).copied().unwrap_or("pass");
            let pt = game.geometry().parse_coord(coord).unwrap();
            game.play(pt, color)
                .unwrap_or_else(|e| panic!("{coord} by {color}: {e}"));
        }
    }
    game
}

fn at(game: &GameInfo, coord: &str) -> usize {
    game.geometry().parse_coord(coord).unwrap()
}

fn second_line(extra_white: &[&'static str]) -> GameInfo {
    let mut white = vec!["A2", "B3", "C3", "D3", "E3", "B1", "C1", "D1", "E1"];
    white.extend_from_slice(extra_white);
    setpos(&["B2", "C2", "D2", "E2"], &white)
}

fn seki_corner(with_c3: bool) -> GameInfo {
    let white: &[&str] = if with_c3 {
        &["A3", "B3", "C3", "C2", "C1"]
    } else {
        &["A3", "B3", "C2", "C1"]
    };
    setpos(&["A2", "B1"], white)
}

// =============================================================================
// Group features
// =============================================================================

#[test]
fn test_capture_and_save_features() {
    let game = setpos(&["E5"], &["E6", "D5", "F5"]);
    let e4 = at(&game, "E4");

    let white = analyze_po_rating(&game, Color::White);
    assert!(white.features.has1(e4, Feature1::Capture1), "{:?}", white.features.names(e4));

    let black = analyze_po_rating(&game, Color::Black);
    assert!(black.features.has1(e4, Feature1::Save));
    assert!(black.features.has1(e4, Feature1::SaveExtensionSafely));
    assert!(!black.features.has1(e4, Feature1::SaveExtension));
}

#[test]
fn test_save_extension_into_dead_ladder() {
    let game = second_line(&["F3"]);
    let f2 = at(&game, "F2");
    let mut ctx = RatingContext::new(&game);
    let analysis = ctx.analyze(Color::Black);
    assert!(analysis.features.has1(f2, Feature1::Save));
    assert!(analysis.features.has1(f2, Feature1::SaveExtension));
    assert!(!analysis.features.has1(f2, Feature1::SaveExtensionSafely));
    assert_eq!(ctx.searches(), 1, "one group, one liberty, one reading");

    // A3 and F1 each take one of two liberties from a white group
    assert!(analysis.features.has2(at(&game, "A3"), Feature2::Atari));
    assert!(analysis.features.has2(at(&game, "F1"), Feature2::Atari));

    let open = second_line(&[]);
    let analysis = analyze_po_rating(&open, Color::Black);
    assert!(analysis.features.has1(f2, Feature1::SaveExtensionSafely));
    assert!(!analysis.features.has1(f2, Feature1::SaveExtension));
}

#[test]
fn test_ladder_cache_reuses_readings() {
    let game = second_line(&["F3"]);
    let f2 = at(&game, "F2");
    let id = game.group_id(at(&game, "B2"));
    let mut ctx = RatingContext::new(&game);
    assert_eq!(ctx.ladder_state(id, f2, Color::Black), LadderState::Dead);
    assert_eq!(ctx.ladder_state(id, f2, Color::Black), LadderState::Dead);
    assert_eq!(ctx.searches(), 1);

    // an occupied point is cached as illegal without a search
    let c3 = at(&game, "C3");
    assert_eq!(ctx.ladder_state(id, c3, Color::Black), LadderState::Illegal);
    assert_eq!(ctx.searches(), 1);
}

#[test]
fn test_scratch_from_an_earlier_position() {
    let mut scratch = RatingScratch::default();
    let open = second_line(&[]);
    analyze_po_rating_with(&open, Color::Black, &mut scratch);

    // the search copy must follow the new wall at F3
    let walled = second_line(&["F3"]);
    let f2 = at(&walled, "F2");
    let reused = analyze_po_rating_with(&walled, Color::Black, &mut scratch);
    let fresh = analyze_po_rating(&walled, Color::Black);
    assert!(reused.features.has1(f2, Feature1::SaveExtension));
    for &p in walled.geometry().onboard() {
        assert_eq!(reused.features.set1(p), fresh.features.set1(p));
        assert_eq!(reused.features.set2(p), fresh.features.set2(p));
        assert_eq!(reused.self_atari[p], fresh.self_atari[p]);
    }

    let ctx = RatingContext::with_scratch(&walled, scratch);
    assert_eq!(ctx.searches(), 0, "counts start over with every context");
}

#[test]
fn test_two_liberty_extensions() {
    let game = setpos(&["C3"], &["B3", "C4", "D2"]);
    let analysis = analyze_po_rating(&game, Color::Black);
    for coord in ["D3", "C2"] {
        assert!(
            analysis.features.has2(at(&game, coord), Feature2::TwoPointExtensionSafely),
            "{coord}: {:?}",
            analysis.features.names(at(&game, coord))
        );
    }
}

#[test]
fn test_capture_after_ko() {
    let mut game = setpos(&["C5", "D6", "D4", "E7"], &["E6", "E4", "F5", "D5"]);
    game.play(at(&game, "E5"), Color::Black).unwrap();
    assert_eq!(game.ko_pos(), at(&game, "D5"));
    game.play(at(&game, "H8"), Color::White).unwrap();

    let analysis = analyze_po_rating(&game, Color::Black);
    let f6 = at(&game, "F6");
    assert!(analysis.features.has1(f6, Feature1::CaptureAfterKo));
    assert!(analysis.features.has1(f6, Feature1::Capture1));
    assert!(!analysis.features.has1(at(&game, "E3"), Feature1::CaptureAfterKo));

    // one move later the window has passed
    game.play(at(&game, "J1"), Color::Black).unwrap();
    game.play(at(&game, "H1"), Color::White).unwrap();
    let analysis = analyze_po_rating(&game, Color::Black);
    assert!(!analysis.features.has1(f6, Feature1::CaptureAfterKo));
}

#[test]
fn test_legal_map_matches_position() {
    let game = second_line(&["F3"]);
    for color in [Color::Black, Color::White] {
        let analysis = analyze_po_rating(&game, color);
        for &p in game.geometry().onboard() {
            assert_eq!(analysis.legal[p], game.is_legal(p, color), "{}", game.geometry().format_coord(p));
        }
    }
}

// =============================================================================
// Self-atari
// =============================================================================

#[test]
fn test_corner_seki_is_kept() {
    let game = seki_corner(true);
    let mut features = TacticalFeatures::new(game.geometry().board_max());
    let analysis = analyze_po_rating(&game, Color::Black);
    for coord in ["B2", "A1"] {
        let pos = at(&game, coord);
        assert!(is_self_atari(&game, Color::Black, pos), "{coord} leaves one liberty");
        assert_eq!(check_self_atari(&game, &mut features, Color::Black, pos), SelfAtari::Seki, "{coord}");
        assert!(!features.any(pos), "{coord} carries no self-atari feature");
        assert!(analysis.legal[pos]);
        assert_eq!(analysis.self_atari[pos], SelfAtari::Seki);
        assert!(!analysis.self_atari[pos].is_acceptable(), "{coord} would break the seki");
    }
}

#[test]
fn test_corner_seki_is_never_drawn() {
    let game = seki_corner(true);
    let seki = [at(&game, "B2"), at(&game, "A1")];
    let mut rng = fastrand::Rng::with_seed(5);
    let weights = FeatureWeights::default();
    let hits = (0..2000)
        .filter(|_| seki.contains(&choose_move(&game, Color::Black, &mut rng, &weights)))
        .count();
    assert_eq!(hits, 0);
}

#[test]
fn test_nakade_self_atari() {
    let game = seki_corner(false);
    let mut features = TacticalFeatures::new(game.geometry().board_max());
    let b2 = at(&game, "B2");
    assert_eq!(check_self_atari(&game, &mut features, Color::Black, b2), SelfAtari::Nakade);
    assert!(features.has2(b2, Feature2::SelfAtariNakade));
}

#[test]
fn test_small_and_large_self_atari() {
    let game = setpos(&[], &["A2"]);
    let mut features = TacticalFeatures::new(game.geometry().board_max());
    let a1 = at(&game, "A1");
    assert_eq!(check_self_atari(&game, &mut features, Color::Black, a1), SelfAtari::Small);
    assert!(features.has2(a1, Feature2::SelfAtariSmall));
    assert_eq!(
        check_self_atari(&game, &mut features, Color::Black, at(&game, "E5")),
        SelfAtari::Safe
    );

    let game = second_line(&["F3", "G2"]);
    let f2 = at(&game, "F2");
    let verdict = check_self_atari(&game, &mut features, Color::Black, f2);
    assert_eq!(verdict, SelfAtari::Large, "five in a row is no nakade");
    assert!(!verdict.is_acceptable());
    assert!(!analyze_po_rating(&game, Color::Black).self_atari[f2].is_acceptable());
}

#[test]
fn test_self_atari_agrees_with_playing_the_move() {
    let mut game = GameInfo::new(Geometry::new(9).unwrap());
    let mut rng = fastrand::Rng::with_seed(17);
    let points = game.geometry().onboard().to_vec();
    for moves in 0..120 {
        let color = game.to_move();
        if moves % 20 == 19 {
            for &pos in &points {
                if !game.is_legal(pos, color) {
                    continue;
                }
                let mut after = game.clone();
                after.play(pos, color).unwrap();
                let libs = after.group_at(pos).liberty_count();
                let captured = after.prisoners(color) > game.prisoners(color);
                let name = game.geometry().format_coord(pos);
                if is_self_atari(&game, color, pos) {
                    assert!(libs == 1 && !captured, "{name} flagged but has {libs} liberties");
                } else {
                    assert!(libs >= 2 || captured, "{name} missed with {libs} liberty");
                }
            }
        }
        let candidates: Vec<usize> = points
            .iter()
            .copied()
            .filter(|&p| game.is_legal_not_eye(p, color))
            .collect();
        let pos = if candidates.is_empty() {
            PASS
        } else {
            candidates[rng.usize(..candidates.len())]
        };
        game.play(pos, color).unwrap();
    }
}

// =============================================================================
// Semeai
// =============================================================================

#[test]
fn test_semeai_helpers() {
    // neither black stone in the seki corner is in atari
    let game = seki_corner(true);
    let wall = game.group_id(at(&game, "C3"));
    assert_eq!(capturable_candidate(&game, wall), None);

    let game = setpos(&["A2"], &["A3", "B2"]);
    let b2 = game.group_id(at(&game, "B2"));
    assert_eq!(capturable_candidate(&game, b2), Some(at(&game, "A1")));
    assert_eq!(game.stone(at(&game, "A1")), Stone::Empty);

    // atari from B2 leaves A2 to run along the edge into another atari
    let game = setpos(&["A2"], &["A3"]);
    let a2 = at(&game, "A2");
    assert!(is_capturable_atari(&game, at(&game, "B2"), Color::White, a2));
    assert!(!is_capturable_atari(&game, at(&game, "A1"), Color::White, a2), "B2 has room");
}
