//! Transposition table: a fixed-size, always-overwrite hash of search
//! results with packed 16-byte entries.

use crate::board::{is_loss_score, is_win_score, Move, Piece, Score, Square, NO_SCORE};

/// What the stored score proves about the node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    None,
    Exact,
    Lower,
    Upper,
}

impl Bound {
    const fn to_u8(self) -> u8 {
        self as u8
    }

    const fn from_u8(value: u8) -> Bound {
        match value {
            1 => Bound::Exact,
            2 => Bound::Lower,
            3 => Bound::Upper,
            _ => Bound::None,
        }
    }
}

/// One packed table entry. The layout is fixed at sixteen bytes so four
/// entries share a cache line.
#[derive(Clone, Copy)]
#[repr(C)]
struct Entry {
    hash: u64,
    score: i16,
    depth: i8,
    age: u8,
    bound: u8,
    from: u8,
    to: u8,
    /// Piece index plus one; zero means no promotion.
    promotion: u8,
}

const EMPTY_ENTRY: Entry = Entry {
    hash: 0,
    score: 0,
    depth: 0,
    age: 0,
    bound: Bound::None.to_u8(),
    from: 0,
    to: 0,
    promotion: 0,
};

/// A probe result with the score already unscaled back to the probing ply.
#[derive(Clone, Copy, Debug)]
pub struct Probe {
    pub score: Score,
    pub depth: i32,
    pub bound: Bound,
    /// Best-move triplet reconstructed from the entry; not validated
    /// against the position, callers match it against generated moves.
    pub best_move: Option<Move>,
}

/// Default table size in megabytes.
pub const DEFAULT_TT_MB: usize = 64;

pub struct TranspositionTable {
    entries: Vec<Entry>,
    mask: usize,
    generation: u8,
}

impl TranspositionTable {
    /// Create a table of at most `size_mb` megabytes, rounded down to a
    /// power-of-two entry count.
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        let bytes = size_mb.max(1) * 1024 * 1024;
        let mut count = bytes / std::mem::size_of::<Entry>();
        count = count.next_power_of_two();
        if count * std::mem::size_of::<Entry>() > bytes {
            count /= 2;
        }
        let count = count.max(1024);

        TranspositionTable {
            entries: vec![EMPTY_ENTRY; count],
            mask: count - 1,
            generation: 0,
        }
    }

    /// Forget everything but keep the allocation.
    pub fn clear(&mut self) {
        self.entries.fill(EMPTY_ENTRY);
        self.generation = 0;
    }

    /// Advance the generation counter; called once per search.
    pub fn new_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    #[inline]
    fn index(&self, hash: u64) -> usize {
        hash as usize & self.mask
    }

    /// Look up a position. Mate scores come back adjusted to the probing
    /// ply so a mate found deeper in the tree keeps its distance honest.
    #[must_use]
    pub fn probe(&self, hash: u64, ply: i32) -> Option<Probe> {
        let entry = &self.entries[self.index(hash)];
        if entry.hash != hash || entry.bound == Bound::None.to_u8() {
            return None;
        }

        let mut score = Score::from(entry.score);
        if score != NO_SCORE {
            if is_win_score(score) {
                score -= ply;
            } else if is_loss_score(score) {
                score += ply;
            }
        }

        let best_move = if entry.from == entry.to {
            None
        } else {
            let promotion = if entry.promotion == 0 {
                None
            } else {
                Some(Piece::from_index(entry.promotion as usize - 1))
            };
            let from = Square::from_index(entry.from as usize);
            let to = Square::from_index(entry.to as usize);
            Some(match promotion {
                Some(piece) => Move::promotion(from, to, piece, None),
                None => Move::new(from, to),
            })
        };

        Some(Probe {
            score,
            depth: i32::from(entry.depth),
            bound: Bound::from_u8(entry.bound),
            best_move,
        })
    }

    /// Store a result, unconditionally replacing whatever lives in the
    /// slot. Mate scores are scaled to be relative to this node before
    /// packing.
    pub fn store(
        &mut self,
        hash: u64,
        depth: i32,
        mut score: Score,
        bound: Bound,
        best_move: Option<Move>,
        ply: i32,
    ) {
        if score != NO_SCORE {
            if is_win_score(score) {
                score += ply;
            } else if is_loss_score(score) {
                score -= ply;
            }
        }
        debug_assert!(
            (i32::from(i16::MIN)..=i32::from(i16::MAX)).contains(&score),
            "score {score} does not fit the packed entry"
        );

        let (from, to, promotion) = match best_move {
            Some(mv) => (
                mv.from().index() as u8,
                mv.to().index() as u8,
                mv.promoted_to().map_or(0, |p| p.index() as u8 + 1),
            ),
            None => (0, 0, 0),
        };

        let index = self.index(hash);
        self.entries[index] = Entry {
            hash,
            score: score as i16,
            depth: depth.clamp(0, i32::from(i8::MAX)) as i8,
            age: self.generation,
            bound: bound.to_u8(),
            from,
            to,
            promotion,
        };
    }

    /// Current-generation occupancy estimate in parts per thousand,
    /// sampled from the front of the table.
    #[must_use]
    pub fn hashfull_per_mille(&self) -> u32 {
        let sample = self.entries.len().min(1000);
        let used = self.entries[..sample]
            .iter()
            .filter(|e| e.bound != Bound::None.to_u8() && e.age == self.generation)
            .count();
        (used * 1000 / sample) as u32
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        TranspositionTable::new(DEFAULT_TT_MB)
    }
}

// the whole point of the packed layout
const _: () = assert!(std::mem::size_of::<Entry>() == 16);
