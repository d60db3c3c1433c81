//! Search scenarios: mates, tactical shots, and endgame conversion.

use jing_wei::board::{is_win_score, win_in};
use jing_wei::engine::Engine;

fn best_move_at_depth(fen: &str, depth: i32) -> (String, i32) {
    let mut engine = Engine::new();
    engine.set_position(fen).unwrap();
    engine.clock_mut().set_fixed_depth(depth);
    let report = engine.best_move(None);
    (
        report
            .best_move
            .map(|m| m.to_string())
            .unwrap_or_default(),
        report.score,
    )
}

#[test]
fn test_mate_in_one() {
    let (best, score) = best_move_at_depth("6k1/5ppp/8/8/8/8/8/4R1K1 w - - 0 1", 4);
    assert_eq!(best, "e1e8");
    assert_eq!(score, win_in(1));
}

#[test]
fn test_mate_in_two() {
    // classic queen sacrifice into a back-rank mate is out of scope at
    // this size; a forced two-mover: queen closes in, king is cornered
    let (best, score) = best_move_at_depth("7k/8/5N1K/8/8/8/8/6Q1 w - - 0 1", 6);
    assert!(is_win_score(score), "score {score} after {best}");
}

#[test]
fn test_wins_material_with_a_fork() {
    // the e6 knight forks king and rook from c7; with the h1 rook still
    // on the board the extra piece converts
    let (best, score) = best_move_at_depth("r3k3/8/4N3/8/8/8/8/4K2R w K - 0 1", 5);
    assert_eq!(best, "e6c7");
    assert!(score > 300, "score {score}");
}

#[test]
fn test_kr_vs_k_makes_progress() {
    // the engine must not shuffle: at depth 8 the chosen move keeps a
    // decisively winning score
    let (_, score) = best_move_at_depth("4k3/8/8/8/8/8/8/4K2R w K - 0 1", 8);
    assert!(score > 2_000, "KRK score {score}");
}

#[test]
fn test_kbn_vs_k_is_decisive() {
    let (_, score) = best_move_at_depth("4k3/8/3K4/3N4/3B4/8/8/8 w - - 0 1", 12);
    assert!(score > 2_000, "KBNK score {score}");
}

#[test]
fn test_avoids_stalemate_trap() {
    // KQ vs K with the king in the corner: several queen moves stalemate
    // on the spot (Qg6 among them); the search must keep the win alive
    let mut engine = Engine::new();
    engine
        .set_position("7k/5Q2/8/8/8/8/8/4K3 w - - 0 1")
        .unwrap();
    engine.clock_mut().set_fixed_depth(6);
    let report = engine.best_move(None);
    let best = report.best_move.expect("a move exists");
    assert_ne!(best.to_string(), "f7g6", "Qg6 is stalemate");
    assert!(report.score > 1_000, "score {}", report.score);
}

#[test]
fn test_repetition_shuffle_keeps_a_winning_score() {
    let mut engine = Engine::new();
    engine
        .set_position("4k3/8/8/8/8/8/8/4K2R w K - 0 1")
        .unwrap();
    // shuffle once so the position stands on its second occurrence
    for mv in ["h1h2", "e8d8", "h2h1", "d8e8"] {
        engine.apply_move(mv).unwrap();
    }
    engine.clock_mut().set_fixed_depth(8);
    let report = engine.best_move(None);
    assert!(report.best_move.is_some());

    // any line that shuffles back a third time now scores as a draw
    // inside the search, so the reported score must still be a win
    assert!(report.score > 1_000, "score {}", report.score);
}
