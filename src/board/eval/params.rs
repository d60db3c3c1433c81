//! Evaluation parameter tables.
//!
//! The large tables are generated from compact seeds: piece-square tables
//! from per-file and per-rank bases plus a centrality term, and the
//! mobility and tropism curves from quadratic constructs. Scalar weights
//! live in [`EvalParams`] so the parameter-override surface can reach
//! them.

use once_cell::sync::Lazy;

use super::super::types::{t, Color, Piece, Score, Square, TaperedScore};

pub(crate) const MATERIAL: [TaperedScore; 6] = [
    t(100, 128), // pawn
    t(325, 305), // knight
    t(325, 333), // bishop
    t(500, 540), // rook
    t(975, 940), // queen
    t(0, 0),     // king
];

#[inline]
pub(crate) fn material_value(piece: Piece) -> TaperedScore {
    MATERIAL[piece.index()]
}

/// A three-coefficient curve evaluated over a small integer domain;
/// the source of every mobility and tropism table.
pub(crate) struct QuadraticConstruct {
    pub quadratic: TaperedScore,
    pub slope: TaperedScore,
    pub intercept: TaperedScore,
}

impl QuadraticConstruct {
    fn at(&self, x: i32) -> TaperedScore {
        let term = |q: Score, s: Score, c: Score| q * x * x / 64 + s * x / 4 + c;
        t(
            term(self.quadratic.mg, self.slope.mg, self.intercept.mg),
            term(self.quadratic.eg, self.slope.eg, self.intercept.eg),
        )
    }

    fn table<const N: usize>(&self) -> [TaperedScore; N] {
        let mut out = [TaperedScore::ZERO; N];
        for (x, slot) in out.iter_mut().enumerate() {
            *slot = self.at(x as i32);
        }
        out
    }
}

// ========================================================================
// Piece-square tables
// ========================================================================

struct PstSeed {
    file: [TaperedScore; 8],
    /// Indexed by relative rank, 0 = own back rank.
    rank: [TaperedScore; 8],
    /// Multiplied by the square's centre ring (0 edge .. 3 centre).
    center: TaperedScore,
}

const PST_SEEDS: [PstSeed; 6] = [
    // pawn: central files matter in the middlegame, advancement in the
    // endgame
    PstSeed {
        file: [
            t(-4, 2),
            t(-2, 2),
            t(0, 1),
            t(6, 0),
            t(6, 0),
            t(0, 1),
            t(-2, 2),
            t(-4, 2),
        ],
        rank: [
            t(0, 0),
            t(0, -2),
            t(2, -2),
            t(5, 2),
            t(10, 10),
            t(18, 28),
            t(28, 55),
            t(0, 0),
        ],
        center: t(2, 0),
    },
    // knight
    PstSeed {
        file: [
            t(-16, -8),
            t(-6, -2),
            t(0, 0),
            t(4, 2),
            t(4, 2),
            t(0, 0),
            t(-6, -2),
            t(-16, -8),
        ],
        rank: [
            t(-14, -10),
            t(-4, -4),
            t(2, 0),
            t(8, 4),
            t(12, 6),
            t(10, 4),
            t(2, 0),
            t(-6, -4),
        ],
        center: t(6, 4),
    },
    // bishop
    PstSeed {
        file: [
            t(-8, -4),
            t(0, 0),
            t(2, 0),
            t(4, 2),
            t(4, 2),
            t(2, 0),
            t(0, 0),
            t(-8, -4),
        ],
        rank: [
            t(-6, -4),
            t(2, 0),
            t(4, 2),
            t(6, 2),
            t(6, 2),
            t(4, 2),
            t(2, 0),
            t(-4, -2),
        ],
        center: t(3, 2),
    },
    // rook: the seventh rank and the centre files
    PstSeed {
        file: [
            t(-2, 0),
            t(0, 0),
            t(2, 0),
            t(6, 0),
            t(6, 0),
            t(2, 0),
            t(0, 0),
            t(-2, 0),
        ],
        rank: [
            t(0, 0),
            t(-2, 0),
            t(-2, 0),
            t(0, 0),
            t(2, 2),
            t(4, 4),
            t(16, 10),
            t(8, 6),
        ],
        center: t(0, 0),
    },
    // queen
    PstSeed {
        file: [
            t(-4, -4),
            t(0, 0),
            t(1, 1),
            t(2, 2),
            t(2, 2),
            t(1, 1),
            t(0, 0),
            t(-4, -4),
        ],
        rank: [
            t(-4, -6),
            t(0, -2),
            t(2, 0),
            t(2, 2),
            t(2, 2),
            t(2, 2),
            t(2, 0),
            t(0, -2),
        ],
        center: t(1, 2),
    },
    // king: shelter in the middlegame, activity in the endgame
    PstSeed {
        file: [
            t(18, -12),
            t(24, -4),
            t(4, 0),
            t(-12, 4),
            t(-12, 4),
            t(4, 0),
            t(24, -4),
            t(18, -12),
        ],
        rank: [
            t(16, -16),
            t(4, -6),
            t(-10, 0),
            t(-20, 6),
            t(-28, 10),
            t(-28, 10),
            t(-28, 6),
            t(-28, -2),
        ],
        center: t(-4, 8),
    },
];

/// Distance ring from the board centre: 3 for the four centre squares,
/// 0 for the rim.
fn center_ring(sq: Square) -> Score {
    let file = sq.file() as i32;
    let rank = sq.rank() as i32;
    let file_edge = file.min(7 - file);
    let rank_edge = rank.min(7 - rank);
    file_edge.min(rank_edge)
}

/// Piece-square tables from White's point of view, indexed by square.
static PST: Lazy<[[TaperedScore; 64]; 6]> = Lazy::new(|| {
    let mut tables = [[TaperedScore::ZERO; 64]; 6];
    for (piece, seed) in PST_SEEDS.iter().enumerate() {
        for idx in 0..64 {
            let sq = Square::from_index(idx);
            let rel_rank = sq.relative_rank(Color::White);
            tables[piece][idx] =
                seed.file[sq.file()] + seed.rank[rel_rank] + seed.center * center_ring(sq);
        }
    }
    tables
});

/// Piece-square value for one man; Black reads the mirrored square.
#[inline]
pub(crate) fn pst_value(color: Color, piece: Piece, sq: Square) -> TaperedScore {
    let lookup = match color {
        Color::White => sq,
        Color::Black => sq.flip_vertical(),
    };
    PST[piece.index()][lookup.index()]
}

// ========================================================================
// Mobility and tropism curves
// ========================================================================

const MOBILITY_CURVES: [QuadraticConstruct; 6] = [
    // pawns do not use the mobility table
    QuadraticConstruct {
        quadratic: TaperedScore::ZERO,
        slope: TaperedScore::ZERO,
        intercept: TaperedScore::ZERO,
    },
    QuadraticConstruct {
        quadratic: t(-8, -8),
        slope: t(26, 24),
        intercept: t(-30, -28),
    },
    QuadraticConstruct {
        quadratic: t(-4, -4),
        slope: t(20, 20),
        intercept: t(-24, -26),
    },
    QuadraticConstruct {
        quadratic: t(-2, -4),
        slope: t(10, 18),
        intercept: t(-20, -28),
    },
    QuadraticConstruct {
        quadratic: t(-1, -2),
        slope: t(6, 12),
        intercept: t(-12, -20),
    },
    // king "mobility" is a liability in the middlegame
    QuadraticConstruct {
        quadratic: TaperedScore::ZERO,
        slope: t(-2, 4),
        intercept: t(0, -4),
    },
];

/// `MOBILITY[piece][reachable squares]`, clamped at 27.
pub(crate) static MOBILITY: Lazy<[[TaperedScore; 28]; 6]> = Lazy::new(|| {
    let mut tables = [[TaperedScore::ZERO; 28]; 6];
    for (piece, curve) in MOBILITY_CURVES.iter().enumerate() {
        tables[piece] = curve.table();
    }
    tables
});

const TROPISM_CURVES: [QuadraticConstruct; 6] = [
    QuadraticConstruct {
        quadratic: TaperedScore::ZERO,
        slope: TaperedScore::ZERO,
        intercept: TaperedScore::ZERO,
    },
    QuadraticConstruct {
        quadratic: t(2, 0),
        slope: t(-16, -6),
        intercept: t(28, 10),
    },
    QuadraticConstruct {
        quadratic: t(1, 0),
        slope: t(-10, -4),
        intercept: t(18, 8),
    },
    QuadraticConstruct {
        quadratic: t(1, 1),
        slope: t(-12, -10),
        intercept: t(22, 18),
    },
    QuadraticConstruct {
        quadratic: t(2, 2),
        slope: t(-22, -18),
        intercept: t(40, 34),
    },
    QuadraticConstruct {
        quadratic: TaperedScore::ZERO,
        slope: TaperedScore::ZERO,
        intercept: TaperedScore::ZERO,
    },
];

/// `TROPISM[piece][chebyshev distance to the enemy king]`.
pub(crate) static TROPISM: Lazy<[[TaperedScore; 8]; 6]> = Lazy::new(|| {
    let mut tables = [[TaperedScore::ZERO; 8]; 6];
    for (piece, curve) in TROPISM_CURVES.iter().enumerate() {
        tables[piece] = curve.table();
        // distance zero never occurs; keep the slot harmless
        tables[piece][0] = TaperedScore::ZERO;
    }
    tables
});

/// `ATTACKS[attacker][victim]`: a piece bearing on an enemy piece. The
/// king column stays zero; king proximity is priced by tropism instead.
pub(crate) const ATTACKS: [[TaperedScore; 6]; 6] = [
    // pawn attacks (threats against non-pawns are priced highest)
    [
        t(4, 8),
        t(38, 30),
        t(38, 32),
        t(44, 38),
        t(50, 40),
        t(0, 0),
    ],
    [
        t(3, 8),
        t(4, 6),
        t(14, 14),
        t(26, 20),
        t(30, 24),
        t(0, 0),
    ],
    [
        t(3, 8),
        t(14, 12),
        t(4, 6),
        t(24, 20),
        t(30, 24),
        t(0, 0),
    ],
    [
        t(2, 8),
        t(10, 10),
        t(10, 10),
        t(4, 6),
        t(24, 20),
        t(0, 0),
    ],
    [
        t(2, 6),
        t(6, 8),
        t(6, 8),
        t(8, 8),
        t(2, 4),
        t(0, 0),
    ],
    [t(2, 6), t(4, 6), t(4, 6), t(4, 8), t(0, 0), t(0, 0)],
];

// ========================================================================
// Pawn-structure tables (rank-indexed, relative ranks)
// ========================================================================

pub(crate) const PAWN_CHAIN_FRONT: TaperedScore = t(6, 4);
pub(crate) const PAWN_CHAIN_FRONT_PER_RANK: TaperedScore = t(2, 2);
pub(crate) const PAWN_CHAIN_BACK: TaperedScore = t(3, 2);
pub(crate) const PAWN_CHAIN_BACK_PER_RANK: TaperedScore = t(1, 1);

pub(crate) const PAWN_PHALANX_BY_RANK: [TaperedScore; 8] = [
    t(0, 0),
    t(2, 1),
    t(4, 3),
    t(8, 6),
    t(14, 12),
    t(24, 22),
    t(40, 36),
    t(0, 0),
];

pub(crate) const PAWN_DOUBLED_BY_RANK: [TaperedScore; 8] = [
    t(0, 0),
    t(-8, -14),
    t(-9, -15),
    t(-10, -16),
    t(-10, -18),
    t(-12, -20),
    t(-12, -22),
    t(0, 0),
];

pub(crate) const PAWN_PASSED_BY_RANK: [TaperedScore; 8] = [
    t(0, 0),
    t(2, 6),
    t(4, 10),
    t(10, 22),
    t(22, 44),
    t(44, 80),
    t(72, 130),
    t(0, 0),
];
