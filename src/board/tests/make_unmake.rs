//! Incremental-state consistency through random games.

use rand::prelude::*;

use crate::board::Board;

fn assert_derived_consistent(board: &Board, context: &str) {
    assert_eq!(board.hash, board.compute_hash(), "hash: {context}");
    assert_eq!(
        board.pawn_hash,
        board.compute_pawn_hash(),
        "pawn hash: {context}"
    );
    assert_eq!(
        board.material_hash,
        board.compute_material_hash(),
        "material hash: {context}"
    );
    let (material, pst) = board.compute_material_pst();
    assert_eq!(board.material, material, "material accumulator: {context}");
    assert_eq!(board.pst, pst, "pst accumulator: {context}");
}

#[test]
fn test_random_games_keep_derived_state_consistent() {
    let mut rng = StdRng::seed_from_u64(20_240_207);

    for game in 0..50 {
        let mut board = Board::starting_position();
        for ply in 0..60 {
            let moves = board.generate_moves();
            if moves.is_empty() {
                break;
            }
            let mv = moves[rng.gen_range(0..moves.len())];
            board = board.make(mv);
            assert_derived_consistent(&board, &format!("game {game} ply {ply} move {mv}"));
        }
    }
}

#[test]
fn test_fen_roundtrip_through_random_play() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..25 {
        let mut board = Board::starting_position();
        for _ in 0..30 {
            let moves = board.generate_moves();
            if moves.is_empty() {
                break;
            }
            board = board.make(moves[rng.gen_range(0..moves.len())]);
        }

        let fen = board.to_fen();
        let reloaded = Board::from_fen(&fen);
        assert_eq!(reloaded.hash, board.hash, "hash through {fen}");
        assert_eq!(reloaded.to_fen(), fen);
    }
}

#[test]
fn test_make_does_not_disturb_parent() {
    let board =
        Board::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
    let fen_before = board.to_fen();
    let hash_before = board.hash;

    for mv in &board.generate_moves() {
        let _child = board.make(*mv);
        assert_eq!(board.to_fen(), fen_before);
        assert_eq!(board.hash, hash_before);
    }
}

#[test]
fn test_side_not_to_move_never_in_check() {
    let mut rng = StdRng::seed_from_u64(99);

    let mut board = Board::starting_position();
    for _ in 0..200 {
        let moves = board.generate_moves();
        if moves.is_empty() {
            break;
        }
        board = board.make(moves[rng.gen_range(0..moves.len())]);
        let mover = board.side_to_move().opponent();
        assert!(
            !board.is_in_check(mover),
            "side that just moved is in check: {}",
            board.to_fen()
        );
    }
}
