//! Ladder reading tests
//!
//! Positions are built the way a GTP "setpos" would: black and white stones
//! alternate, with passes filling the shorter list.

use ray_rust::geometry::Geometry;
use ray_rust::ladder::{
    LadderHint, LadderVerdict, check_ladder_extension, is_ladder_captured, ladder_capture,
    ladder_escape, ladder_extension, ladder_hint, ladder_hint_map,
};
use ray_rust::position::GameInfo;
use ray_rust::search_board::SearchBoard;
use ray_rust::stone::Color;

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

/// Four black stones on the second line, walled in by White, with one
/// liberty at F2.
fn second_line(with_f3: bool) -> GameInfo {
    let mut white = vec!["A2", "B3", "C3", "D3", "E3", "B1", "C1", "D1", "E1"];
    if with_f3 {
        white.push("F3");
    }
    setpos(&["B2", "C2", "D2", "E2"], &white)
}

/// A lone black stone at C3 in atari; running at D3 starts a ladder toward
/// the upper right corner of an otherwise empty board.
fn open_ladder() -> GameInfo {
    setpos(&["C3"], &["B3", "C4", "C2", "D2"])
}

// =============================================================================
// is_ladder_captured
// =============================================================================

#[test]
fn test_group_in_atari_dies_with_capturer_to_move() {
    let game = second_line(false);
    let mut board = SearchBoard::new(&game);
    let mut max_size = 0;
    let verdict = is_ladder_captured(0, &mut board, at(&game, "B2"), Color::White, &mut max_size);
    assert_eq!(verdict, LadderVerdict::Dead);
    assert_eq!(max_size, 4);
}

#[test]
fn test_running_along_open_second_line_lives() {
    let game = second_line(false);
    let mut board = SearchBoard::new(&game);
    let mut max_size = 0;
    let verdict = is_ladder_captured(0, &mut board, at(&game, "B2"), Color::Black, &mut max_size);
    assert_eq!(verdict, LadderVerdict::Alive, "F2 gives three liberties");
    assert_eq!(max_size, 0, "a living group reports no size");
}

#[test]
fn test_running_into_wall_dies() {
    let game = second_line(true);
    let mut board = SearchBoard::new(&game);
    let mut max_size = 0;
    let verdict = is_ladder_captured(0, &mut board, at(&game, "B2"), Color::Black, &mut max_size);
    assert_eq!(verdict, LadderVerdict::Dead);
    assert_eq!(max_size, 6, "the chain grows to F2 and F1 before it is taken");
    assert_eq!(board.depth(), 0, "every reading move was taken back");
    assert_eq!(board.hash(), game.hash());
}

#[test]
fn test_open_ladder_is_read_to_the_corner() {
    let game = open_ladder();
    let mut board = SearchBoard::new(&game);
    let mut max_size = 0;
    let verdict = is_ladder_captured(0, &mut board, at(&game, "C3"), Color::Black, &mut max_size);
    assert_eq!(verdict, LadderVerdict::Dead);
    assert!(max_size > 10, "the chased chain should reach the corner, got {max_size}");
}

#[test]
fn test_ladder_breaker_saves_the_stone() {
    let mut game = open_ladder();
    // a black stone on the ladder's path
    game.play(at(&game, "G7"), Color::Black).unwrap();
    game.play(at(&game, "A9"), Color::White).unwrap();
    let mut board = SearchBoard::new(&game);
    let mut max_size = 0;
    let verdict = is_ladder_captured(0, &mut board, at(&game, "C3"), Color::Black, &mut max_size);
    assert_eq!(verdict, LadderVerdict::Alive);
}

// =============================================================================
// ladder_capture / ladder_escape
// =============================================================================

#[test]
fn test_escape_into_wall_fails_quickly() {
    let game = second_line(true);
    let mut board = SearchBoard::new(&game);
    let mut searched = 0;
    let escaped = ladder_escape(&mut board, at(&game, "F2"), Color::Black, None, 0, &mut searched);
    assert!(!escaped);
    assert_eq!(searched, 2);
    assert_eq!(board.depth(), 0);
}

#[test]
fn test_escape_without_group_in_atari() {
    let game = open_ladder();
    let mut board = SearchBoard::new(&game);
    let mut searched = 0;
    assert!(!ladder_escape(&mut board, at(&game, "H8"), Color::Black, None, 0, &mut searched));
    assert_eq!(searched, 0);
}

#[test]
fn test_capture_by_ladder() {
    let game = setpos(&["C3", "A9"], &["B3", "C4", "D2"]);
    let mut board = SearchBoard::new(&game);
    let mut searched = 0;
    // C3 has two liberties; White C2 starts the ladder
    assert!(ladder_capture(&mut board, at(&game, "C2"), Color::White, None, 0, &mut searched));
    assert!(searched >= 7, "only read {searched} plies");
    assert_eq!(board.depth(), 0);

    let mut searched = 0;
    // atari from D3 drives the stone onto the first line instead
    assert!(ladder_capture(
        &mut board,
        at(&game, "D3"),
        Color::White,
        Some(at(&game, "C3")),
        0,
        &mut searched
    ));
}

#[test]
fn test_capture_of_group_already_in_atari_is_not_read() {
    // C3 has only D3 left; taking it there is a capture, not a ladder
    let game = open_ladder();
    let mut board = SearchBoard::new(&game);
    let mut searched = 0;
    let c3 = at(&game, "C3");
    assert!(!ladder_capture(&mut board, at(&game, "D3"), Color::White, Some(c3), 0, &mut searched));
    assert_eq!(board.depth(), 0);
    assert_eq!(board.hash(), game.hash());

    // a group with three liberties is not chased either
    let game = setpos(&["E5"], &["E6"]);
    let mut board = SearchBoard::new(&game);
    let e5 = at(&game, "E5");
    assert!(!ladder_capture(&mut board, at(&game, "D5"), Color::White, Some(e5), 0, &mut searched));
    assert_eq!(board.depth(), 0);
}

#[test]
fn test_capture_on_illegal_point_fails() {
    let game = open_ladder();
    let mut board = SearchBoard::new(&game);
    let mut searched = 0;
    assert!(!ladder_capture(&mut board, at(&game, "C3"), Color::White, None, 0, &mut searched));
}

#[test]
fn test_both_searches_agree() {
    let mut breaker = open_ladder();
    breaker.play(at(&breaker, "G7"), Color::Black).unwrap();
    breaker.play(at(&breaker, "A9"), Color::White).unwrap();
    let cases = [
        (second_line(false), "B2", "F2"),
        (second_line(true), "B2", "F2"),
        (open_ladder(), "C3", "D3"),
        (breaker, "C3", "D3"),
    ];
    for (game, group, escape) in cases {
        let mut board = SearchBoard::new(&game);
        let mut first = 0;
        let verdict = is_ladder_captured(0, &mut board, at(&game, group), Color::Black, &mut first);
        let mut again = 0;
        let repeat = is_ladder_captured(0, &mut board, at(&game, group), Color::Black, &mut again);
        assert_eq!((verdict, first), (repeat, again), "{group}: readings differ between runs");

        let mut searched = 0;
        let escaped = ladder_escape(&mut board, at(&game, escape), Color::Black, None, 0, &mut searched);
        assert_eq!(
            escaped,
            verdict == LadderVerdict::Alive,
            "{group} escaping at {escape}: searched {searched} plies"
        );
    }
}

// =============================================================================
// Hints and extensions
// =============================================================================

#[test]
fn test_hint_marks_failing_escape() {
    let game = open_ladder();
    assert_eq!(game.to_move(), Color::Black);
    assert_eq!(ladder_hint(&game, at(&game, "D3")), LadderHint::CannotEscape);
    assert_eq!(ladder_hint(&game, at(&game, "G5")), LadderHint::NoLadder);

    let map = ladder_hint_map(&game);
    let marked: Vec<String> = game
        .geometry()
        .onboard()
        .iter()
        .filter(|&&p| map[p] == LadderHint::CannotEscape)
        .map(|&p| game.geometry().format_coord(p))
        .collect();
    assert!(marked.contains(&"D3".to_string()), "marked: {marked:?}");
}

#[test]
fn test_hint_ignores_short_readings() {
    // the escape at F2 fails, but after only two plies
    let game = second_line(true);
    assert_eq!(game.to_move(), Color::Black);
    assert_eq!(ladder_hint(&game, at(&game, "F2")), LadderHint::NoLadder);
}

#[test]
fn test_ladder_extension_marks_dead_run() {
    let game = second_line(true);
    let marks = ladder_extension(&game, Color::Black);
    assert_eq!(marks[at(&game, "F2")], 6);
    assert_eq!(marks.iter().filter(|&&m| m > 0).count(), 1);

    let open = second_line(false);
    let marks = ladder_extension(&open, Color::Black);
    assert!(marks.iter().all(|&m| m == 0), "F2 escapes on the open line");

    assert!(ladder_extension(&game, Color::White).iter().all(|&m| m == 0));
}

#[test]
fn test_check_ladder_extension() {
    let game = second_line(true);
    assert!(check_ladder_extension(&game, Color::Black, at(&game, "C2")));
    assert!(!check_ladder_extension(&second_line(false), Color::Black, at(&game, "C2")));
    assert!(!check_ladder_extension(&game, Color::White, at(&game, "C2")), "wrong colour");
    assert!(!check_ladder_extension(&game, Color::White, at(&game, "C3")), "not in atari");

    let ladder = open_ladder();
    assert!(check_ladder_extension(&ladder, Color::Black, at(&ladder, "C3")));
}
