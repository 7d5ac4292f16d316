//! Tactical features for the playout policy.
//!
//! A rating pass looks at a position from one colour's side and tags every
//! candidate point with two feature bitmasks: captures, saving moves,
//! extensions and self-ataris in the first set and in the second. Ladder
//! readings needed along the way go through a per-pass cache in
//! [`RatingContext`], keyed by group and liberty.

use std::fmt;

use arrayvec::ArrayVec;
use log::{trace, warn};

use crate::constants::PASS;
use crate::geometry::Point;
use crate::group::GroupId;
use crate::ladder::{LadderVerdict, is_ladder_captured};
use crate::position::GameInfo;
use crate::search_board::SearchBoard;
use crate::stone::{Color, Stone};

// =============================================================================
// Features
// =============================================================================

/// First feature set: captures and moves that save a group.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Feature1 {
    Capture1,
    Capture2,
    Capture3,
    Capture4,
    Save,
    SaveCapture,
    TwoPointCapture,
    ThreePointCapture,
    CaptureAfterKo,
    SaveExtensionSafely,
    SaveExtension,
    CaptureEscapable,
}

/// Second feature set: self-ataris, ataris and extensions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Feature2 {
    SelfAtariSmall,
    SelfAtariNakade,
    SelfAtariLarge,
    Atari,
    TwoPointAtari,
    TwoPointCAtari,
    ThreePointAtari,
    ThreePointCAtari,
    TwoPointExtensionSafely,
    TwoPointExtension,
    ThreePointExtensionSafely,
    ThreePointExtension,
}

impl Feature1 {
    pub const ALL: [Feature1; 12] = [
        Feature1::Capture1,
        Feature1::Capture2,
        Feature1::Capture3,
        Feature1::Capture4,
        Feature1::Save,
        Feature1::SaveCapture,
        Feature1::TwoPointCapture,
        Feature1::ThreePointCapture,
        Feature1::CaptureAfterKo,
        Feature1::SaveExtensionSafely,
        Feature1::SaveExtension,
        Feature1::CaptureEscapable,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn mask(self) -> u32 {
        1 << self.index()
    }

    pub fn name(self) -> &'static str {
        match self {
            Feature1::Capture1 => "CAPTURE1",
            Feature1::Capture2 => "CAPTURE2",
            Feature1::Capture3 => "CAPTURE3",
            Feature1::Capture4 => "CAPTURE4",
            Feature1::Save => "SAVE",
            Feature1::SaveCapture => "SAVE_CAPTURE",
            Feature1::TwoPointCapture => "2POINT_CAPTURE",
            Feature1::ThreePointCapture => "3POINT_CAPTURE",
            Feature1::CaptureAfterKo => "CAPTURE_AFTER_KO",
            Feature1::SaveExtensionSafely => "SAVE_EXTENSION_SAFELY",
            Feature1::SaveExtension => "SAVE_EXTENSION",
            Feature1::CaptureEscapable => "CAPTURE_ESCAPABLE",
        }
    }
}

impl Feature2 {
    pub const ALL: [Feature2; 12] = [
        Feature2::SelfAtariSmall,
        Feature2::SelfAtariNakade,
        Feature2::SelfAtariLarge,
        Feature2::Atari,
        Feature2::TwoPointAtari,
        Feature2::TwoPointCAtari,
        Feature2::ThreePointAtari,
        Feature2::ThreePointCAtari,
        Feature2::TwoPointExtensionSafely,
        Feature2::TwoPointExtension,
        Feature2::ThreePointExtensionSafely,
        Feature2::ThreePointExtension,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn mask(self) -> u32 {
        1 << self.index()
    }

    pub fn name(self) -> &'static str {
        match self {
            Feature2::SelfAtariSmall => "SELF_ATARI_SMALL",
            Feature2::SelfAtariNakade => "SELF_ATARI_NAKADE",
            Feature2::SelfAtariLarge => "SELF_ATARI_LARGE",
            Feature2::Atari => "ATARI",
            Feature2::TwoPointAtari => "2POINT_ATARI",
            Feature2::TwoPointCAtari => "2POINT_C_ATARI",
            Feature2::ThreePointAtari => "3POINT_ATARI",
            Feature2::ThreePointCAtari => "3POINT_C_ATARI",
            Feature2::TwoPointExtensionSafely => "2POINT_EXTENSION_SAFELY",
            Feature2::TwoPointExtension => "2POINT_EXTENSION",
            Feature2::ThreePointExtensionSafely => "3POINT_EXTENSION_SAFELY",
            Feature2::ThreePointExtension => "3POINT_EXTENSION",
        }
    }
}

impl fmt::Display for Feature1 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Feature2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-point feature bitmasks, indexed by board point.
#[derive(Clone, Debug)]
pub struct TacticalFeatures {
    set1: Vec<u32>,
    set2: Vec<u32>,
}

impl TacticalFeatures {
    pub fn new(board_max: usize) -> Self {
        TacticalFeatures {
            set1: vec![0; board_max],
            set2: vec![0; board_max],
        }
    }

    pub fn clear(&mut self) {
        self.set1.fill(0);
        self.set2.fill(0);
    }

    #[inline]
    pub fn tag1(&mut self, pos: Point, feature: Feature1) {
        self.set1[pos] |= feature.mask();
    }

    #[inline]
    pub fn tag2(&mut self, pos: Point, feature: Feature2) {
        self.set2[pos] |= feature.mask();
    }

    #[inline]
    pub fn set1(&self, pos: Point) -> u32 {
        self.set1[pos]
    }

    #[inline]
    pub fn set2(&self, pos: Point) -> u32 {
        self.set2[pos]
    }

    pub fn has1(&self, pos: Point, feature: Feature1) -> bool {
        self.set1[pos] & feature.mask() != 0
    }

    pub fn has2(&self, pos: Point, feature: Feature2) -> bool {
        self.set2[pos] & feature.mask() != 0
    }

    /// Whether any feature is set at `pos`.
    pub fn any(&self, pos: Point) -> bool {
        self.set1[pos] != 0 || self.set2[pos] != 0
    }

    /// Names of the features set at `pos`, first set then second.
    pub fn names(&self, pos: Point) -> Vec<&'static str> {
        let first = Feature1::ALL.iter().filter(|f| self.has1(pos, **f)).map(|f| f.name());
        let second = Feature2::ALL.iter().filter(|f| self.has2(pos, **f)).map(|f| f.name());
        first.chain(second).collect()
    }
}

/// How bad it is to play a point that leaves the new group in atari.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum SelfAtari {
    /// Not a self-atari.
    #[default]
    Safe,
    /// A two-stone self-atari inside a known corner seki shape. Playing it
    /// breaks the seki, so it is never chosen, but it carries no feature.
    Seki,
    /// At most two stones are put in atari.
    Small,
    /// Three to five stones forming a shape that kills once captured.
    Nakade,
    Large,
}

impl SelfAtari {
    /// Whether a playout may still choose the move.
    pub fn is_acceptable(self) -> bool {
        !matches!(self, SelfAtari::Seki | SelfAtari::Large)
    }

    fn feature(self) -> Option<Feature2> {
        match self {
            SelfAtari::Safe | SelfAtari::Seki => None,
            SelfAtari::Small => Some(Feature2::SelfAtariSmall),
            SelfAtari::Nakade => Some(Feature2::SelfAtariNakade),
            SelfAtari::Large => Some(Feature2::SelfAtariLarge),
        }
    }
}

// =============================================================================
// Ladder cache
// =============================================================================

/// Cached ladder reading for one group and liberty.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum LadderState {
    #[default]
    Unchecked,
    Illegal,
    Dead,
    Alive,
}

/// Buffers one rating pass can hand on to the next: the search copy of the
/// position and the ladder cache slots.
#[derive(Clone, Default)]
pub struct RatingScratch {
    search: Option<SearchBoard>,
    captured_pos: Vec<Point>,
    captured: Vec<LadderState>,
}

/// State of one rating pass: the position, a search copy of it, and the
/// ladder cache (two liberty slots per group).
///
/// The search copy is only made once a ladder reading is needed, and is
/// refreshed in place when the buffers come from an earlier pass.
pub struct RatingContext<'a> {
    game: &'a GameInfo,
    scratch: RatingScratch,
    synced: bool,
    searches: usize,
}

impl<'a> RatingContext<'a> {
    pub fn new(game: &'a GameInfo) -> Self {
        Self::with_scratch(game, RatingScratch::default())
    }

    /// A context for `game` that reuses the buffers of an earlier pass.
    pub fn with_scratch(game: &'a GameInfo, mut scratch: RatingScratch) -> Self {
        let slots = game.geometry().max_groups() * 2;
        scratch.captured_pos.clear();
        scratch.captured_pos.resize(slots, PASS);
        scratch.captured.clear();
        scratch.captured.resize(slots, LadderState::Unchecked);
        RatingContext {
            game,
            scratch,
            synced: false,
            searches: 0,
        }
    }

    /// Give back the buffers for the next pass.
    pub fn into_scratch(self) -> RatingScratch {
        self.scratch
    }

    pub fn game(&self) -> &'a GameInfo {
        self.game
    }

    /// The search copy, brought in line with the position on first use.
    fn search(&mut self) -> &mut SearchBoard {
        let game = self.game;
        if self.scratch.search.is_none() {
            self.scratch.search = Some(SearchBoard::new(game));
            self.synced = true;
        }
        let board = self.scratch.search.get_or_insert_with(|| SearchBoard::new(game));
        if !self.synced {
            board.reset(game);
            self.synced = true;
        }
        board
    }

    /// Forget every cached reading.
    pub fn clear(&mut self) {
        self.scratch.captured_pos.fill(PASS);
        self.scratch.captured.fill(LadderState::Unchecked);
    }

    /// Ladder readings actually run so far (cache hits excluded).
    pub fn searches(&self) -> usize {
        self.searches
    }

    /// Outcome of `color` playing liberty `lib` of group `id`, then the
    /// other side trying to capture the group in a ladder.
    ///
    /// The reading is cached per liberty. A group only ever has its two
    /// slots asked about; a third liberty means the cache is out of step
    /// with the position, which is logged and answered with
    /// [`LadderState::Illegal`].
    pub fn ladder_state(&mut self, id: GroupId, lib: Point, color: Color) -> LadderState {
        let game = self.game;
        let base = id * 2;
        let cache = &mut self.scratch;
        let slot = if cache.captured_pos[base] == lib {
            base
        } else if cache.captured_pos[base + 1] == lib {
            base + 1
        } else if cache.captured_pos[base] == PASS {
            base
        } else if cache.captured_pos[base + 1] == PASS {
            base + 1
        } else {
            let geo = game.geometry();
            warn!(
                "broken ladder cache: lib {} group {} slots {} {}",
                geo.format_coord(lib),
                geo.format_coord(game.group(id).origin()),
                geo.format_coord(cache.captured_pos[base]),
                geo.format_coord(cache.captured_pos[base + 1])
            );
            return LadderState::Illegal;
        };
        if cache.captured[slot] != LadderState::Unchecked {
            return cache.captured[slot];
        }

        let state = if game.is_legal_for_search(lib, color) {
            let group = game.group(id);
            let mut max_size = group.size();
            self.searches += 1;
            let search = self.search();
            search.put_stone(lib, color);
            let verdict =
                is_ladder_captured(0, search, group.origin(), color.opponent(), &mut max_size);
            search.undo();
            match verdict {
                LadderVerdict::Dead => LadderState::Dead,
                LadderVerdict::Alive => LadderState::Alive,
            }
        } else {
            LadderState::Illegal
        };
        self.scratch.captured[slot] = state;
        self.scratch.captured_pos[slot] = lib;
        state
    }

    // =========================================================================
    // Group checks
    // =========================================================================

    /// Features around own group `id`, chosen by its liberty count.
    fn check_group(&mut self, features: &mut TacticalFeatures, color: Color, id: GroupId) {
        match self.game.group(id).liberty_count() {
            1 => self.check_lib1(features, color, id),
            2 => self.check_lib2(features, color, id),
            3 => self.check_lib3(features, color, id),
            _ => {}
        }
    }

    /// A group in atari: running out, and capturing an attacker in atari.
    fn check_lib1(&mut self, features: &mut TacticalFeatures, color: Color, id: GroupId) {
        let game = self.game;
        let group = game.group(id);
        let Some(lib) = group.first_liberty() else {
            return;
        };
        match self.ladder_state(id, lib, color) {
            LadderState::Dead => features.tag1(lib, Feature1::SaveExtension),
            LadderState::Alive => features.tag1(lib, Feature1::SaveExtensionSafely),
            _ => {}
        }
        features.tag1(lib, Feature1::Save);

        for enemy in group.neighbors() {
            let enemy = game.group(enemy);
            if enemy.liberty_count() == 1 {
                if let Some(lib) = enemy.first_liberty() {
                    features.tag1(lib, Feature1::SaveCapture);
                }
            }
        }
    }

    /// A group with two liberties: extensions, and captures or ataris on
    /// the weak groups around it.
    fn check_lib2(&mut self, features: &mut TacticalFeatures, color: Color, id: GroupId) {
        let game = self.game;
        let group = game.group(id);
        let mut libs = group.liberties();
        let (Some(lib1), Some(lib2)) = (libs.next(), libs.next()) else {
            return;
        };

        let state1 = self.ladder_state(id, lib1, color);
        let state2 = self.ladder_state(id, lib2, color);
        for (lib, state) in [(lib1, state1), (lib2, state2)] {
            match state {
                LadderState::Dead => features.tag2(lib, Feature2::TwoPointExtension),
                LadderState::Alive => features.tag2(lib, Feature2::TwoPointExtensionSafely),
                _ => {}
            }
        }
        let both_dead = state1 == LadderState::Dead && state2 == LadderState::Dead;

        for enemy_id in group.neighbors() {
            let enemy = game.group(enemy_id);
            match enemy.liberty_count() {
                1 => {
                    if let Some(lib) = enemy.first_liberty() {
                        features.tag1(lib, Feature1::TwoPointCapture);
                    }
                }
                2 => {
                    for lib in enemy.liberties() {
                        match self.ladder_state(enemy_id, lib, color) {
                            LadderState::Dead if both_dead => {
                                features.tag2(lib, Feature2::TwoPointCAtari)
                            }
                            LadderState::Dead | LadderState::Alive => {
                                features.tag2(lib, Feature2::TwoPointAtari)
                            }
                            _ => {}
                        }
                    }
                }
                _ => {}
            }
        }
    }

    /// A group with three liberties: how safe each extension is, and
    /// captures or ataris on the weak groups around it.
    fn check_lib3(&mut self, features: &mut TacticalFeatures, color: Color, id: GroupId) {
        let game = self.game;
        let group = game.group(id);
        for lib in group.liberties() {
            if game.empty_neighbor_count(lib) == 3 || connects_to_strong(game, lib, color, id) {
                features.tag2(lib, Feature2::ThreePointExtensionSafely);
            } else {
                features.tag2(lib, Feature2::ThreePointExtension);
            }
        }

        for enemy_id in group.neighbors() {
            let enemy = game.group(enemy_id);
            match enemy.liberty_count() {
                1 => {
                    if let Some(lib) = enemy.first_liberty() {
                        features.tag1(lib, Feature1::ThreePointCapture);
                    }
                }
                2 => {
                    for lib in enemy.liberties() {
                        match self.ladder_state(enemy_id, lib, color) {
                            LadderState::Dead => features.tag2(lib, Feature2::ThreePointCAtari),
                            LadderState::Alive => features.tag2(lib, Feature2::ThreePointAtari),
                            _ => {}
                        }
                    }
                }
                _ => {}
            }
        }
    }

    /// Run the group checks for own groups touching the previous move.
    pub fn check_features(&mut self, features: &mut TacticalFeatures, color: Color, previous: Point) {
        if previous == PASS {
            return;
        }
        let game = self.game;
        let mut checked: ArrayVec<GroupId, 4> = ArrayVec::new();
        for n in game.geometry().neighbors(previous) {
            if !game.stone(n).is(color) {
                continue;
            }
            let id = game.group_id(n);
            if !checked.contains(&id) {
                checked.push(id);
                self.check_group(features, color, id);
            }
        }
    }

    /// Capture and atari features for `color` playing `pos`.
    pub fn check_capture_and_atari(&mut self, features: &mut TacticalFeatures, color: Color, pos: Point) {
        let game = self.game;
        let other = color.opponent();
        let mut checked: ArrayVec<GroupId, 4> = ArrayVec::new();
        for n in game.geometry().neighbors(pos) {
            if !game.stone(n).is(other) {
                continue;
            }
            let id = game.group_id(n);
            if checked.contains(&id) {
                continue;
            }
            checked.push(id);
            let group = game.group(id);
            match group.liberty_count() {
                1 => {
                    let feature = match group.size() {
                        1 => Feature1::Capture1,
                        2 => Feature1::Capture2,
                        3 => Feature1::Capture3,
                        _ => Feature1::Capture4,
                    };
                    features.tag1(pos, feature);
                    if group.size() > 2 {
                        let mut max_size = group.size();
                        self.searches += 1;
                        let verdict =
                            is_ladder_captured(0, self.search(), group.origin(), other, &mut max_size);
                        if verdict == LadderVerdict::Alive {
                            features.tag1(pos, Feature1::CaptureEscapable);
                        }
                    }
                }
                2 => {
                    if game.is_legal_for_search(pos, color) {
                        features.tag2(pos, Feature2::Atari);
                    }
                }
                _ => {}
            }
        }
    }

    /// Full rating pass for `color` over the whole board.
    pub fn analyze(&mut self, color: Color) -> RatingAnalysis {
        let game = self.game;
        let geo = game.geometry();
        let mut features = TacticalFeatures::new(geo.board_max());
        self.clear();
        let searches_before = self.searches;

        self.check_features(&mut features, color, game.last_move());
        let moves = game.moves();
        if moves >= 2 && game.ko_move() == Some(moves - 2) {
            check_capture_after_ko(game, &mut features, color);
        }
        for (id, group) in game.groups() {
            if group.color() == color {
                self.check_group(&mut features, color, id);
            }
        }

        let mut legal = vec![false; geo.board_max()];
        let mut self_atari = vec![SelfAtari::Safe; geo.board_max()];
        for &pos in geo.onboard() {
            if !game.is_legal(pos, color) {
                continue;
            }
            legal[pos] = true;
            self_atari[pos] = check_self_atari(game, &mut features, color, pos);
            self.check_capture_and_atari(&mut features, color, pos);
        }

        trace!(
            "rating pass for {color} at move {moves}: {} legal points, {} ladder searches",
            legal.iter().filter(|&&l| l).count(),
            self.searches - searches_before
        );
        RatingAnalysis {
            features,
            legal,
            self_atari,
        }
    }
}

/// Result of [`analyze_po_rating`], indexed by board point.
#[derive(Clone, Debug)]
pub struct RatingAnalysis {
    pub features: TacticalFeatures,
    pub legal: Vec<bool>,
    pub self_atari: Vec<SelfAtari>,
}

/// Rate every point of `game` for `color` with a fresh context.
pub fn analyze_po_rating(game: &GameInfo, color: Color) -> RatingAnalysis {
    RatingContext::new(game).analyze(color)
}

/// Like [`analyze_po_rating`], but with the buffers left in `scratch` by an
/// earlier pass, which get the buffers of this one in return.
pub fn analyze_po_rating_with(game: &GameInfo, color: Color, scratch: &mut RatingScratch) -> RatingAnalysis {
    let mut ctx = RatingContext::with_scratch(game, std::mem::take(scratch));
    let analysis = ctx.analyze(color);
    *scratch = ctx.into_scratch();
    analysis
}

/// Whether `lib` touches another own group with three or more liberties.
fn connects_to_strong(game: &GameInfo, lib: Point, color: Color, id: GroupId) -> bool {
    game.geometry().neighbors(lib).iter().any(|&n| {
        game.stone(n).is(color) && game.group_id(n) != id && game.group_at(n).liberty_count() >= 3
    })
}

/// Tag the recapture of attackers in atari around the move two plies back,
/// for use right after `color` took a ko.
pub fn check_capture_after_ko(game: &GameInfo, features: &mut TacticalFeatures, color: Color) {
    let Some(record) = game.previous(2) else {
        return;
    };
    if record.pos == PASS {
        return;
    }
    let other = color.opponent();
    let mut checked: ArrayVec<GroupId, 4> = ArrayVec::new();
    for n in game.geometry().neighbors(record.pos) {
        if !game.stone(n).is(other) {
            continue;
        }
        let id = game.group_id(n);
        if checked.contains(&id) {
            continue;
        }
        checked.push(id);
        let group = game.group(id);
        if group.liberty_count() == 1 {
            if let Some(lib) = group.first_liberty() {
                features.tag1(lib, Feature1::CaptureAfterKo);
            }
        }
    }
}

// =============================================================================
// Self-atari
// =============================================================================

/// Own groups that a stone at `pos` would join, and their total size, when
/// the result is left with a single liberty. `None` if the new group keeps
/// two or more liberties or captures something.
fn self_atari_shape(game: &GameInfo, color: Color, pos: Point) -> Option<(usize, ArrayVec<GroupId, 4>)> {
    let neighbors = game.geometry().neighbors(pos);
    let mut libs: ArrayVec<Point, 8> = neighbors
        .iter()
        .copied()
        .filter(|&n| game.stone(n) == Stone::Empty)
        .collect();
    if libs.len() >= 2 {
        return None;
    }

    let mut size = 0;
    let mut joined: ArrayVec<GroupId, 4> = ArrayVec::new();
    for n in neighbors {
        match game.stone(n) {
            s if s.is(color) => {
                let id = game.group_id(n);
                if joined.contains(&id) {
                    continue;
                }
                let group = game.group(id);
                if group.liberty_count() > 2 {
                    return None;
                }
                for lib in group.liberties() {
                    if lib != pos && !libs.contains(&lib) {
                        libs.push(lib);
                    }
                }
                size += group.size();
                joined.push(id);
                if libs.len() >= 2 {
                    return None;
                }
            }
            s if s.is(color.opponent()) => {
                if game.group_at(n).liberty_count() == 1 {
                    return None;
                }
            }
            _ => {}
        }
    }
    Some((size, joined))
}

/// Whether playing `pos` leaves `color`'s new group in atari.
pub fn is_self_atari(game: &GameInfo, color: Color, pos: Point) -> bool {
    self_atari_shape(game, color, pos).is_some()
}

/// Classify `color` playing `pos` as a self-atari and tag the matching
/// feature.
///
/// Joining two stones in a corner where the 2-2 neighbourhood is a known
/// seki shape is [`SelfAtari::Seki`], with no feature tagged. Otherwise the class follows the
/// number of existing stones joined: fewer than two is small, two to four
/// is nakade if the resulting shape kills once captured, anything else is
/// large.
pub fn check_self_atari(
    game: &GameInfo,
    features: &mut TacticalFeatures,
    color: Color,
    pos: Point,
) -> SelfAtari {
    let Some((size, joined)) = self_atari_shape(game, color, pos) else {
        return SelfAtari::Safe;
    };
    let geo = game.geometry();

    if size == 2 {
        if let Some(p22) = geo.corner_22(pos) {
            if geo.seki().contains(color, geo.md2_code(game.cells(), p22)) {
                return SelfAtari::Seki;
            }
        }
    }

    let class = match size {
        0 | 1 => SelfAtari::Small,
        2..=4 if is_nakade_shape(game, pos, &joined) => SelfAtari::Nakade,
        _ => SelfAtari::Large,
    };
    if let Some(feature) = class.feature() {
        features.tag2(pos, feature);
    }
    class
}

fn is_nakade_shape(game: &GameInfo, pos: Point, joined: &[GroupId]) -> bool {
    let geo = game.geometry();
    let cell = |p: Point| (geo.x(p) as isize, geo.y(p) as isize);
    let mut cells = vec![cell(pos)];
    for &id in joined {
        cells.extend(game.stones(id).map(cell));
    }
    geo.nakade().is_nakade(&cells)
}
