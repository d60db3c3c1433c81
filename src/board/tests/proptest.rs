//! Property-based tests over randomly played games.

use proptest::prelude::*;
use rand::prelude::*;
use rand::Rng;

use crate::board::{piece_value, Board, INVALID_SCORE};

fn play_random(seed: u64, plies: usize) -> Board {
    let mut board = Board::starting_position();
    let mut rng = StdRng::seed_from_u64(seed);
    for _ in 0..plies {
        let moves = board.generate_moves();
        if moves.is_empty() {
            break;
        }
        board = board.make(moves[rng.gen_range(0..moves.len())]);
    }
    board
}

proptest! {
    /// Incremental hashes and accumulators always equal a from-scratch
    /// recomputation.
    #[test]
    fn prop_derived_state_consistent(seed in any::<u64>(), plies in 1..40usize) {
        let board = play_random(seed, plies);
        prop_assert_eq!(board.hash, board.compute_hash());
        prop_assert_eq!(board.pawn_hash, board.compute_pawn_hash());
        prop_assert_eq!(board.material_hash, board.compute_material_hash());
        let (material, pst) = board.compute_material_pst();
        prop_assert_eq!(board.material, material);
        prop_assert_eq!(board.pst, pst);
    }

    /// FEN round-trips reproduce the exact position.
    #[test]
    fn prop_fen_roundtrip(seed in any::<u64>(), plies in 1..40usize) {
        let board = play_random(seed, plies);
        let reloaded = Board::from_fen(&board.to_fen());
        prop_assert_eq!(reloaded.hash, board.hash);
        prop_assert_eq!(reloaded.to_fen(), board.to_fen());
    }

    /// No generated move ever leaves its own king in check.
    #[test]
    fn prop_generated_moves_are_legal(seed in any::<u64>(), plies in 0..30usize) {
        let board = play_random(seed, plies);
        let mover = board.side_to_move();
        for mv in &board.generate_moves() {
            let child = board.make(*mv);
            prop_assert!(!child.is_in_check(mover), "{} from {}", mv, board.to_fen());
        }
    }

    /// The capture generator emits exactly the tactical subset of the
    /// full generator when not in check.
    #[test]
    fn prop_tactical_subset(seed in any::<u64>(), plies in 0..30usize) {
        let board = play_random(seed, plies);
        if board.is_in_check(board.side_to_move()) {
            return Ok(());
        }
        let all = board.generate_moves();
        let tactical = board.generate_tactical_moves();
        for mv in &tactical {
            prop_assert!(all.contains(*mv));
            prop_assert!(mv.is_capture() || mv.promoted_to().is_some());
        }
        for mv in &all {
            if mv.is_capture() || mv.promoted_to().is_some() {
                prop_assert!(tactical.contains(*mv), "{} missing", mv);
            }
        }
    }

    /// SEE is always a real score, never above the victim's value, and
    /// respects the optimistic fast-path bound.
    #[test]
    fn prop_see_bounds(seed in any::<u64>(), plies in 0..30usize) {
        let board = play_random(seed, plies);
        for mv in &board.generate_moves() {
            let see = board.see(*mv);
            prop_assert_ne!(see, INVALID_SCORE);
            if let Some(victim) = mv.captured() {
                prop_assert!(see <= piece_value(victim), "{}", mv);
                if let Some(mover) = board.piece_at(mv.from()) {
                    if piece_value(victim) > piece_value(mover) {
                        prop_assert!(
                            see >= piece_value(victim) - piece_value(mover),
                            "{}", mv
                        );
                    }
                }
            }
        }
    }
}
