//! Material-hash endgame recognizer table.
//!
//! At start-up a list of prototype FENs is compiled into a map from
//! material hash to scoring function. The hash depends only on the piece
//! counts of each colour, so any placement in the prototype works; each
//! prototype is registered for both colour orientations by case-swapping
//! the placement field.

mod functions;

use std::collections::HashMap;

use once_cell::sync::Lazy;

use self::functions::{drawish, generic_mate, kbbk, kbnk, kk, knnk, kpk, minor_draw, EndgameFn};

use super::state::Board;
use super::types::{Color, Piece, Score};

type Recognizer = (EndgameFn, Color);

/// Prototype positions and their recognizers, strong side White. The
/// drawish families intentionally share the generic function; specialised
/// versions would be more accurate but the mapping mirrors long-standing
/// behaviour.
const PROTOTYPES: &[(&str, EndgameFn)] = &[
    ("4k3/8/8/8/8/8/8/4K3 w - - 0 1", kk),
    // lone minor
    ("4k3/8/8/8/8/8/8/3NK3 w - - 0 1", minor_draw),
    ("4k3/8/8/8/8/8/8/3BK3 w - - 0 1", minor_draw),
    ("4k3/8/8/8/8/8/8/2NNK3 w - - 0 1", knnk),
    // basic wins
    ("4k3/8/8/8/8/8/8/3QK3 w - - 0 1", generic_mate),
    ("4k3/8/8/8/8/8/8/3RK3 w - - 0 1", generic_mate),
    ("4k3/8/8/8/8/8/8/2BNK3 w - - 0 1", kbnk),
    ("4k3/8/8/8/8/8/8/2BBK3 w - - 0 1", kbbk),
    ("4k3/8/8/8/8/8/8/3PK3 w - - 0 1", kpk),
    // queen or rook plus a helper stays a generic win
    ("4k3/8/8/8/8/8/8/2QPK3 w - - 0 1", generic_mate),
    ("4k3/8/8/8/8/8/8/2QNK3 w - - 0 1", generic_mate),
    ("4k3/8/8/8/8/8/8/2QBK3 w - - 0 1", generic_mate),
    ("4k3/8/8/8/8/8/8/2QRK3 w - - 0 1", generic_mate),
    ("4k3/8/8/8/8/8/8/2QQK3 w - - 0 1", generic_mate),
    ("4k3/8/8/8/8/8/8/2RPK3 w - - 0 1", generic_mate),
    ("4k3/8/8/8/8/8/8/2RNK3 w - - 0 1", generic_mate),
    ("4k3/8/8/8/8/8/8/2RBK3 w - - 0 1", generic_mate),
    ("4k3/8/8/8/8/8/8/2RRK3 w - - 0 1", generic_mate),
    ("4k3/8/8/8/8/8/8/2NPK3 w - - 0 1", generic_mate),
    ("4k3/8/8/8/8/8/8/2BPK3 w - - 0 1", generic_mate),
    // queen against a defender: still winning
    ("3qk3/8/8/8/8/8/8/2QQK3 w - - 0 1", generic_mate),
    ("2q1k3/8/8/8/8/8/8/3QK3 w - - 0 1", drawish),
    ("3rk3/8/8/8/8/8/8/3QK3 w - - 0 1", generic_mate),
    ("3bk3/8/8/8/8/8/8/3QK3 w - - 0 1", generic_mate),
    ("3nk3/8/8/8/8/8/8/3QK3 w - - 0 1", generic_mate),
    ("3pk3/8/8/8/8/8/8/3QK3 w - - 0 1", generic_mate),
    // rook against a defender: book draws, kept drawish
    ("3rk3/8/8/8/8/8/8/3RK3 w - - 0 1", drawish),
    ("3bk3/8/8/8/8/8/8/3RK3 w - - 0 1", drawish),
    ("3nk3/8/8/8/8/8/8/3RK3 w - - 0 1", drawish),
    ("3pk3/8/8/8/8/8/8/3RK3 w - - 0 1", drawish),
    // rook and pawn against rook is famously drawish; preserved as-is
    ("3rk3/8/8/8/8/8/8/2RPK3 w - - 0 1", drawish),
    // minor against pawn or minor
    ("3pk3/8/8/8/8/8/8/3NK3 w - - 0 1", drawish),
    ("3pk3/8/8/8/8/8/8/3BK3 w - - 0 1", drawish),
    ("3nk3/8/8/8/8/8/8/3NK3 w - - 0 1", drawish),
    ("3nk3/8/8/8/8/8/8/3BK3 w - - 0 1", drawish),
    ("3bk3/8/8/8/8/8/8/3BK3 w - - 0 1", drawish),
    // two knights against a pawn: the defender usually holds
    ("3pk3/8/8/8/8/8/8/2NNK3 w - - 0 1", drawish),
];

/// Swap the case of the placement field, turning a White-strong prototype
/// into its Black-strong mirror.
fn mirror_fen(fen: &str) -> String {
    let mut parts = fen.splitn(2, ' ');
    let placement = parts.next().unwrap_or_default();
    let rest = parts.next().unwrap_or_default();
    let swapped: String = placement
        .chars()
        .map(|c| {
            if c.is_ascii_uppercase() {
                c.to_ascii_lowercase()
            } else if c.is_ascii_lowercase() {
                c.to_ascii_uppercase()
            } else {
                c
            }
        })
        .collect();
    format!("{swapped} {rest}")
}

static ENDGAMES: Lazy<HashMap<u64, Recognizer>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for &(fen, func) in PROTOTYPES {
        if let Ok(board) = Board::try_from_fen(fen) {
            map.insert(board.material_hash, (func, Color::White));
        }
        if let Ok(board) = Board::try_from_fen(&mirror_fen(fen)) {
            map.entry(board.material_hash)
                .or_insert((func, Color::Black));
        }
    }
    map
});

/// Score the position if its material signature has a recognizer.
/// White's point of view.
pub(crate) fn probe(board: &Board) -> Option<Score> {
    let (func, strong) = ENDGAMES.get(&board.material_hash)?;
    func(board, *strong)
}

/// Fallback for unregistered material where one side has a bare king and
/// the other holds mating material: the generic drive-to-the-edge scorer.
pub(crate) fn lone_king(board: &Board) -> Option<Score> {
    for strong in [Color::White, Color::Black] {
        let weak = strong.opponent();
        let weak_is_bare = board.occupied_by(weak).is_single();
        if !weak_is_bare {
            continue;
        }
        let can_mate = !board.pieces_of(strong, Piece::Queen).is_empty()
            || !board.pieces_of(strong, Piece::Rook).is_empty()
            || !board.pieces_of(strong, Piece::Pawn).is_empty()
            || board.occupied_by(strong).popcount() >= 4;
        if can_mate {
            return generic_mate(board, strong);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::super::types::{DRAW_SCORE, WIN_SCORE};
    use super::functions::WINNING_BASE;
    use super::*;

    #[test]
    fn test_bare_kings_recognized_as_draw() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1");
        assert_eq!(probe(&board), Some(DRAW_SCORE));
    }

    #[test]
    fn test_krk_recognized_for_both_colours() {
        let white_strong = Board::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1");
        let score = probe(&white_strong).expect("KRK registered");
        assert!(score >= WINNING_BASE && score < WIN_SCORE);

        let black_strong = Board::from_fen("4k2r/8/8/8/8/8/8/4K3 w k - 0 1");
        let score = probe(&black_strong).expect("KRk registered");
        assert!(score <= -WINNING_BASE);
    }

    #[test]
    fn test_placement_does_not_matter() {
        // same material, wildly different placement: same recognizer
        let a = Board::from_fen("4k3/8/8/8/8/8/8/4K2R w - - 0 1");
        let b = Board::from_fen("k7/8/8/4R3/8/8/8/7K w - - 0 1");
        assert_eq!(a.material_hash, b.material_hash);
        assert!(probe(&b).is_some());
    }

    #[test]
    fn test_kbnk_is_decisive() {
        let board = Board::from_fen("4k3/8/8/8/3B4/3N4/8/3K4 w - - 0 1");
        let score = probe(&board).expect("KBNK registered");
        assert!(score >= WINNING_BASE);
    }

    #[test]
    fn test_minor_endings_draw() {
        assert_eq!(
            probe(&Board::from_fen("4k3/8/8/8/8/8/8/3NK3 w - - 0 1")),
            Some(DRAW_SCORE)
        );
        assert_eq!(
            probe(&Board::from_fen("4k3/8/8/8/8/8/8/2NNK3 w - - 0 1")),
            Some(DRAW_SCORE)
        );
    }

    #[test]
    fn test_unknown_material_falls_through() {
        // queen against two rooks is not in the table
        let board = Board::from_fen("3rr1k1/8/8/8/8/8/8/3Q2K1 w - - 0 1");
        assert_eq!(probe(&board), None);
    }

    #[test]
    fn test_lone_king_generic() {
        // three minors are not registered but still mate a bare king
        let board = Board::from_fen("4k3/8/8/8/8/2NNB3/8/4K3 w - - 0 1");
        assert!(probe(&board).is_none());
        let score = lone_king(&board).expect("generic lone-king scorer");
        assert!(score >= WINNING_BASE);
    }
}
