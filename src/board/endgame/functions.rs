//! Endgame recognizer scoring functions.
//!
//! Every function receives the position and the strong side (fixed at
//! registration time) and returns a score from White's point of view, or
//! `None` to fall through to the normal evaluator.

use super::super::attack_tables::squares_in_front;
use super::super::state::Board;
use super::super::types::{Bitboard, Color, Piece, Score, Square, DRAW_SCORE};

/// A recognizer: the position and the strong side, to a White-point-of-view
/// score, or `None` to fall through to the normal evaluator.
pub(crate) type EndgameFn = fn(&Board, Color) -> Option<Score>;

/// Base score of a recognized won ending: decisively ahead of any
/// positional evaluation, far below the mate range.
pub(crate) const WINNING_BASE: Score = 2_500;

/// Drive the weak king toward the board edge; highest in the corners.
const EDGE_DRIVE: [Score; 64] = {
    let mut table = [0; 64];
    let mut sq = 0;
    while sq < 64 {
        let rank = (sq / 8) as i32;
        let file = (sq % 8) as i32;
        let rank_edge = if rank < 7 - rank { rank } else { 7 - rank };
        let file_edge = if file < 7 - file { file } else { 7 - file };
        let ring = if rank_edge < file_edge {
            rank_edge
        } else {
            file_edge
        };
        table[sq as usize] = (3 - ring) * 30 + (rank_edge - 3).abs() * 5 + (file_edge - 3).abs() * 5;
        sq += 1;
    }
    table
};

/// Bonus for bringing the kings together, indexed by Chebyshev distance.
const KING_PROXIMITY: [Score; 8] = [0, 70, 60, 45, 30, 20, 10, 0];

fn signed_for(strong: Color, score: Score) -> Score {
    match strong {
        Color::White => score,
        Color::Black => -score,
    }
}

fn kings_proximity(board: &Board) -> Score {
    let dist = board
        .king_square(Color::White)
        .distance(board.king_square(Color::Black));
    KING_PROXIMITY[dist.min(7)]
}

/// Bare kings.
pub(crate) fn kk(_board: &Board, _strong: Color) -> Option<Score> {
    Some(DRAW_SCORE)
}

/// A lone minor piece cannot mate.
pub(crate) fn minor_draw(_board: &Board, _strong: Color) -> Option<Score> {
    Some(DRAW_SCORE)
}

/// Two knights cannot force mate.
pub(crate) fn knnk(_board: &Board, _strong: Color) -> Option<Score> {
    Some(DRAW_SCORE)
}

/// Generic won ending: drive the weak king to the edge, bring the strong
/// king up, and keep the material difference on top.
pub(crate) fn generic_mate(board: &Board, strong: Color) -> Option<Score> {
    let weak_king = board.king_square(strong.opponent());
    let material_edge = board.material.value(board.phase()).abs();
    let score =
        WINNING_BASE + EDGE_DRIVE[weak_king.index()] + kings_proximity(board) + material_edge;
    Some(signed_for(strong, score))
}

/// Generic drawish ending (minor-versus-minor families, rook-versus-minor,
/// and the other book draws the material map sends here): keep a small
/// material-biased score so the engine still prefers the better side of
/// the draw.
pub(crate) fn drawish(board: &Board, _strong: Color) -> Option<Score> {
    Some(board.material.value(board.phase()) / 8)
}

/// King, bishop, and knight: mate happens in a corner of the bishop's
/// colour, so the drive table targets those two corners.
pub(crate) fn kbnk(board: &Board, strong: Color) -> Option<Score> {
    let bishop = board.pieces_of(strong, Piece::Bishop).lowest_set();
    let weak_king = board.king_square(strong.opponent());

    // a8 and h1 are light; a1 and h8 are dark
    let (corner_a, corner_b) = if bishop.is_light() {
        (Square::from_index(0), Square::from_index(63))
    } else {
        (Square::from_index(56), Square::from_index(7))
    };
    let corner_dist = weak_king
        .distance(corner_a)
        .min(weak_king.distance(corner_b)) as Score;

    let score = WINNING_BASE + (7 - corner_dist) * 40 + kings_proximity(board)
        + EDGE_DRIVE[weak_king.index()] / 2;
    Some(signed_for(strong, score))
}

/// Two bishops mate unless they stand on the same colour.
pub(crate) fn kbbk(board: &Board, strong: Color) -> Option<Score> {
    let bishops = board.pieces_of(strong, Piece::Bishop);
    let same_color = (bishops & Bitboard::LIGHT_SQUARES).is_empty()
        || (bishops & Bitboard::DARK_SQUARES).is_empty();
    if same_color {
        Some(DRAW_SCORE)
    } else {
        generic_mate(board, strong)
    }
}

/// King and pawn versus king: drawn when the defender holds the path in
/// front of the pawn (always, for a rook pawn with the defender in the
/// corner); otherwise a near-decisive edge that grows with advancement.
pub(crate) fn kpk(board: &Board, strong: Color) -> Option<Score> {
    let pawn = board.pieces_of(strong, Piece::Pawn).lowest_set();
    let weak_king = board.king_square(strong.opponent());
    let strong_king = board.king_square(strong);
    let rel_rank = pawn.relative_rank(strong) as Score;

    let path = match strong {
        Color::White => squares_in_front(pawn),
        Color::Black => squares_in_front(pawn.flip_vertical()).swap_bytes(),
    };

    let rook_pawn = pawn.file() == 0 || pawn.file() == 7;
    let corner_file = pawn.file();
    let promotion_corner = match strong {
        Color::White => Square::new(0, corner_file),
        Color::Black => Square::new(7, corner_file),
    };

    let held = path.contains(weak_king)
        || (rook_pawn && weak_king.distance(promotion_corner) <= 1);

    let score = if held {
        // draw-biased, but keep a sliver so the stronger side plays on
        8 + rel_rank
    } else {
        900 + rel_rank * 40 + (7 - strong_king.distance(pawn) as Score) * 5
    };
    Some(signed_for(strong, score))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_drive_prefers_corners() {
        let a8: Square = "a8".parse().unwrap();
        let e4: Square = "e4".parse().unwrap();
        assert!(EDGE_DRIVE[a8.index()] > EDGE_DRIVE[e4.index()]);
    }

    #[test]
    fn test_generic_mate_is_decisive() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1");
        let score = generic_mate(&board, Color::White).unwrap();
        assert!(score >= WINNING_BASE);
    }

    #[test]
    fn test_generic_mate_signs_for_black() {
        let board = Board::from_fen("4k2r/8/8/8/8/8/8/4K3 w k - 0 1");
        let score = generic_mate(&board, Color::Black).unwrap();
        assert!(score <= -WINNING_BASE);
    }

    #[test]
    fn test_kbnk_targets_bishop_corner() {
        // dark-squared bishop: the a1/h8 corners are the mating corners
        let near_corner = Board::from_fen("8/8/8/8/8/1k6/2KN4/2B5 w - - 0 1");
        let c1: Square = "c1".parse().unwrap();
        assert!(!c1.is_light());
        let score = kbnk(&near_corner, Color::White).unwrap();
        assert!(score > WINNING_BASE);
    }

    #[test]
    fn test_kpk_front_block_is_drawish() {
        let board = Board::from_fen("8/8/8/8/8/4k3/4P3/4K3 w - - 0 1");
        let score = kpk(&board, Color::White).unwrap();
        assert!(score > 0, "strong side keeps a sliver");
        assert!(score < 50, "but the score is draw-biased");
    }

    #[test]
    fn test_kpk_free_pawn_wins() {
        let board = Board::from_fen("8/8/4k3/8/8/8/P7/K7 w - - 0 1");
        // black king is far from the a-file promotion corner
        let score = kpk(&board, Color::White).unwrap();
        assert!(score > 800);
    }

    #[test]
    fn test_kbbk_same_colour_draw() {
        let same = Board::from_fen("4k3/8/8/8/8/8/8/1B1B1K2 w - - 0 1");
        let b1: Square = "b1".parse().unwrap();
        let d1: Square = "d1".parse().unwrap();
        assert_eq!(b1.is_light(), d1.is_light());
        assert_eq!(kbbk(&same, Color::White), Some(DRAW_SCORE));

        let mixed = Board::from_fen("4k3/8/8/8/8/8/8/1BB2K2 w - - 0 1");
        assert!(kbbk(&mixed, Color::White).unwrap() >= WINNING_BASE);
    }
}
