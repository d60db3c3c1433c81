//! Iterative deepening with aspiration windows, and per-iteration
//! reporting.

use crate::board::{
    distance_to_mate, is_loss_score, is_mate_score, is_win_score, Board, Move, Score,
    INFINITE_SCORE, MAX_PLY, WIN_SCORE,
};
use crate::board::eval::EvalParams;

use super::clock::Clock;
use super::params::SearchParams;
use super::pvs::{NodeKind, Searcher};
use super::SearchState;

/// The outcome of one `go`: the move to play, the line behind it, and the
/// score of the last fully completed iteration.
#[derive(Debug, Clone)]
pub struct SearchReport {
    pub best_move: Option<Move>,
    pub pv: Vec<Move>,
    pub score: Score,
    pub depth: i32,
    pub nodes: u64,
}

/// One line of thinking output: depth, score, elapsed centiseconds, node
/// count, and the principal variation.
#[derive(Debug, Clone)]
pub struct IterationInfo {
    pub depth: i32,
    pub score: Score,
    /// Moves until mate, signed, when the score is a mate score.
    pub mate_in: Option<i32>,
    pub elapsed_cs: u64,
    pub nodes: u64,
    pub pv: String,
}

pub type InfoCallback<'a> = &'a mut dyn FnMut(&IterationInfo);

fn mate_in_moves(score: Score) -> Option<i32> {
    if is_win_score(score) {
        Some((distance_to_mate(score) + 1) / 2)
    } else if is_loss_score(score) {
        Some(-((-distance_to_mate(score) + 1) / 2))
    } else {
        None
    }
}

/// Run the iterative-deepening loop from `board`.
///
/// `game_history` carries `(hash, irreversible)` pairs for every position
/// played so far, the current position last; repetition detection inside
/// the search walks this tail. The callback fires after every completed
/// iteration. The report always reflects the last iteration that finished,
/// never a partial one.
pub fn iterative_deepening(
    board: &Board,
    game_history: &[(u64, bool)],
    state: &mut SearchState,
    search_params: &SearchParams,
    eval_params: &EvalParams,
    clock: &mut Clock,
    mut callback: Option<InfoCallback<'_>>,
) -> SearchReport {
    state.new_search();
    clock.start_clock();

    let mut searcher = Searcher::new(state, search_params, eval_params, clock, game_history);

    let mut report = SearchReport {
        best_move: None,
        pv: Vec::new(),
        score: 0,
        depth: 0,
        nodes: 0,
    };

    let mut previous_score = 0;
    let mut depth = 2;

    while depth < MAX_PLY as i32 && searcher.clock.should_continue(depth, searcher.nodes) {
        searcher.root_depth = depth;

        // aspiration: a pawn-wide window around the previous score,
        // doubling on failure; mate scores collapse to a one-sided window
        let mut delta = search_params.aspiration_delta;
        let (mut alpha, mut beta) = if depth < 3 {
            (-INFINITE_SCORE, INFINITE_SCORE)
        } else if is_win_score(previous_score) {
            (WIN_SCORE - MAX_PLY as Score, INFINITE_SCORE)
        } else if is_loss_score(previous_score) {
            (-INFINITE_SCORE, -WIN_SCORE + MAX_PLY as Score)
        } else {
            (previous_score - delta, previous_score + delta)
        };

        let score = loop {
            let score = searcher.search(board, depth, alpha, beta, 0, NodeKind::Pv);
            if searcher.aborted {
                break None;
            }
            if score <= alpha {
                alpha = (score - delta).max(-INFINITE_SCORE);
                delta *= 2;
            } else if score >= beta {
                beta = (score + delta).min(INFINITE_SCORE);
                delta *= 2;
            } else {
                break Some(score);
            }
        };

        let Some(score) = score else {
            break;
        };

        previous_score = score;
        let pv = &searcher.pv_stack[0];
        report = SearchReport {
            best_move: pv.first(),
            pv: pv.as_slice().to_vec(),
            score,
            depth,
            nodes: searcher.nodes,
        };

        if let Some(callback) = callback.as_mut() {
            callback(&IterationInfo {
                depth,
                score,
                mate_in: mate_in_moves(score),
                elapsed_cs: searcher.clock.elapsed_ms(searcher.nodes) / 10,
                nodes: searcher.nodes,
                pv: pv.to_string(),
            });
        }

        // a proven mate searched well past its distance will not change
        if is_mate_score(score) && depth > 2 * distance_to_mate(score).abs() {
            break;
        }

        depth += 1;
    }

    report
}
