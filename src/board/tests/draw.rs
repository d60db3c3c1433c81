//! Draw-rule detection.

use crate::board::Board;

#[test]
fn test_fifty_move_rule() {
    let fresh = Board::from_fen("4k3/8/8/8/8/8/8/4K2R w - - 99 80");
    assert!(!fresh.is_draw_by_fifty());

    let drawn = Board::from_fen("4k3/8/8/8/8/8/8/4K2R w - - 100 80");
    assert!(drawn.is_draw_by_fifty());
}

#[test]
fn test_insufficient_material() {
    assert!(Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").is_insufficient_material());
    assert!(Board::from_fen("4k3/8/8/8/8/8/8/3NK3 w - - 0 1").is_insufficient_material());
    assert!(Board::from_fen("4k3/8/8/8/8/8/8/3BK3 w - - 0 1").is_insufficient_material());

    // same-coloured bishops cannot mate; opposite-coloured ones can
    let same = Board::from_fen("2b1k3/8/8/8/8/8/8/4KB2 w - - 0 1");
    assert!(same.is_insufficient_material());
    let opposite = Board::from_fen("2b1k3/8/8/8/8/8/8/2B1K3 w - - 0 1");
    assert!(!opposite.is_insufficient_material());
}

#[test]
fn test_sufficient_material() {
    assert!(!Board::from_fen("4k3/8/8/8/8/8/8/4K2R w - - 0 1").is_insufficient_material());
    assert!(!Board::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").is_insufficient_material());
    assert!(!Board::from_fen("4k3/8/8/8/8/8/8/2NNK3 w - - 0 1").is_insufficient_material(),
        "two knights still count as mating material for the draw rule");
}

#[test]
fn test_repeated_position_has_same_hash() {
    let mut board = Board::starting_position();
    let start_hash = board.hash;

    for text in ["g1f3", "g8f6", "f3g1", "f6g8"] {
        board = board.make(board.parse_move(text).unwrap());
    }

    assert_eq!(board.hash, start_hash, "shuffling back must transpose");
}

#[test]
fn test_en_passant_rights_split_the_hash() {
    // same piece placement, but only one position may capture en passant
    let with_ep =
        Board::from_fen("rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 2");
    let without_ep =
        Board::from_fen("rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 2");
    assert_ne!(with_ep.hash, without_ep.hash);
}

#[test]
fn test_castling_rights_split_the_hash() {
    let both = Board::from_fen("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1");
    let kingside_only = Board::from_fen("4k3/8/8/8/8/8/8/R3K2R w K - 0 1");
    assert_ne!(both.hash, kingside_only.hash);
}
