//! Iterative-deepening principal-variation search.
//!
//! [`SearchState`] holds everything that survives between searches: the
//! transposition table and the history tables. One search is driven by
//! [`iterative::iterative_deepening`], which spins up a [`pvs::Searcher`]
//! holding the per-search stacks (killers, principal variations, the
//! repetition history).

mod clock;
mod iterative;
mod ordering;
mod params;
mod pv;
mod pvs;
mod quiescence;

pub use clock::{Clock, ClockMode};
pub use iterative::{iterative_deepening, InfoCallback, IterationInfo, SearchReport};
pub use params::SearchParams;
pub use pv::PrincipalVariation;

use crate::board::{Color, Move, Piece, Square};
use crate::tt::TranspositionTable;

/// Piece-to-square history of quiet-move cutoffs.
pub(crate) struct HistoryTable {
    scores: [[u32; 64]; 6],
}

impl HistoryTable {
    pub(crate) fn new() -> Self {
        HistoryTable {
            scores: [[0; 64]; 6],
        }
    }

    #[inline]
    pub(crate) fn get(&self, piece: Piece, to: Square) -> u32 {
        self.scores[piece.index()][to.index()]
    }

    pub(crate) fn add(&mut self, piece: Piece, to: Square, depth: i32) {
        let bonus = (depth * depth) as u32;
        let slot = &mut self.scores[piece.index()][to.index()];
        *slot = slot.saturating_add(bonus).min(1 << 20);
    }

    /// Decay between searches so stale preferences fade.
    pub(crate) fn age(&mut self) {
        for piece in &mut self.scores {
            for score in piece.iter_mut() {
                *score >>= 2;
            }
        }
    }
}

/// From-square-to-square history of moves that proved a mate, kept per
/// colour.
pub(crate) struct MateHistoryTable {
    scores: [Box<[[u32; 64]; 64]>; 2],
}

impl MateHistoryTable {
    pub(crate) fn new() -> Self {
        MateHistoryTable {
            scores: [Box::new([[0; 64]; 64]), Box::new([[0; 64]; 64])],
        }
    }

    #[inline]
    pub(crate) fn get(&self, color: Color, from: Square, to: Square) -> u32 {
        self.scores[color.index()][from.index()][to.index()]
    }

    pub(crate) fn add(&mut self, color: Color, from: Square, to: Square, depth: i32) {
        let slot = &mut self.scores[color.index()][from.index()][to.index()];
        *slot = slot.saturating_add(depth.max(1) as u32).min(1 << 16);
    }

    pub(crate) fn age(&mut self) {
        for color in &mut self.scores {
            for from in color.iter_mut() {
                for score in from.iter_mut() {
                    *score >>= 2;
                }
            }
        }
    }
}

/// Two quiet-cutoff slots per ply, newest first.
#[derive(Clone, Copy)]
pub(crate) struct KillerSlots {
    pub(crate) slots: [Move; 2],
}

impl KillerSlots {
    pub(crate) const EMPTY: KillerSlots = KillerSlots {
        slots: [Move::NULL; 2],
    };

    pub(crate) fn update(&mut self, mv: Move) {
        if self.slots[0] != mv {
            self.slots[1] = self.slots[0];
            self.slots[0] = mv;
        }
    }

    #[inline]
    pub(crate) fn contains(&self, mv: Move) -> bool {
        !mv.is_null() && (self.slots[0] == mv || self.slots[1] == mv)
    }
}

/// State that persists across searches: the transposition table plus the
/// history heuristics, aged rather than cleared between searches.
pub struct SearchState {
    pub tt: TranspositionTable,
    pub(crate) history: HistoryTable,
    pub(crate) mate_history: MateHistoryTable,
}

impl SearchState {
    #[must_use]
    pub fn new(tt_mb: usize) -> Self {
        SearchState {
            tt: TranspositionTable::new(tt_mb),
            history: HistoryTable::new(),
            mate_history: MateHistoryTable::new(),
        }
    }

    /// Prepare for the next search.
    pub fn new_search(&mut self) {
        self.tt.new_generation();
        self.history.age();
        self.mate_history.age();
    }

    /// Drop all cached knowledge (the `new` command).
    pub fn reset(&mut self) {
        self.tt.clear();
        self.history = HistoryTable::new();
        self.mate_history = MateHistoryTable::new();
    }
}

impl Default for SearchState {
    fn default() -> Self {
        SearchState::new(crate::tt::DEFAULT_TT_MB)
    }
}
