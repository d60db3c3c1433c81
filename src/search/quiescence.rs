//! Quiescence search: resolve captures (and check evasions) past the
//! main horizon before trusting the static evaluation.

use crate::board::{lost_in, piece_value, Board, Move, Score, INFINITE_SCORE, MAX_PLY};

use super::pvs::Searcher;

impl Searcher<'_> {
    /// Stand pat on the static evaluation unless in check, then run the
    /// tactical moves: delta-pruned, losing exchanges skipped, depth
    /// bounded at twice the root depth.
    pub(crate) fn quiesce(
        &mut self,
        board: &Board,
        mut alpha: Score,
        beta: Score,
        ply: usize,
        qdepth: i32,
    ) -> Score {
        self.nodes += 1;
        if self.poll_abort() {
            return alpha;
        }
        if ply >= MAX_PLY - 1 {
            return board.evaluate(alpha, beta, self.eval_params);
        }

        let in_check = board.is_in_check(board.side_to_move());
        let stand_pat = if in_check {
            -INFINITE_SCORE
        } else {
            board.evaluate(alpha, beta, self.eval_params)
        };

        if !in_check {
            if qdepth >= 2 * self.root_depth.max(1) {
                return stand_pat;
            }
            if stand_pat >= beta {
                return stand_pat;
            }
            if stand_pat > alpha {
                alpha = stand_pat;
            }
        }

        // in check this is every evasion, otherwise captures and promotions
        let mut moves = board.generate_tactical_moves();
        if moves.is_empty() {
            return if in_check {
                lost_in(ply as i32)
            } else {
                stand_pat
            };
        }

        let hash_move = self
            .state
            .tt
            .probe(board.hash(), ply as i32)
            .and_then(|probe| probe.best_move)
            .unwrap_or(Move::NULL);
        self.order_quiescence_moves(board, &mut moves, hash_move);

        let mut best_score = stand_pat;
        for mv in &moves {
            if !in_check {
                if let Some(victim) = mv.captured() {
                    // delta: even winning the piece plus a margin cannot
                    // reach alpha
                    if stand_pat
                        + piece_value(victim)
                        + self.search_params.qsearch_delta_margin
                        < alpha
                    {
                        continue;
                    }
                }
                if board.see(*mv) < 0 {
                    continue;
                }
            }

            let child = board.make(*mv);
            let score = -self.quiesce(&child, -beta, -alpha, ply + 1, qdepth + 1);

            if self.aborted {
                return best_score;
            }

            if score > best_score {
                best_score = score;
                if score > alpha {
                    alpha = score;
                    if score >= beta {
                        return score;
                    }
                }
            }
        }

        best_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SearchState;

    fn quiesce_position(fen: &str) -> Score {
        let board = Board::from_fen(fen);
        let mut state = SearchState::new(1);
        let mut searcher = Searcher::for_tests(&mut state);
        searcher.root_depth = 4;
        searcher.quiesce(&board, -INFINITE_SCORE, INFINITE_SCORE, 0, 0)
    }

    fn static_eval(fen: &str) -> Score {
        let board = Board::from_fen(fen);
        board.evaluate_full(&crate::board::eval::EvalParams::default())
    }

    #[test]
    fn test_quiet_position_stands_pat() {
        // no captures available: quiescence equals the static evaluation
        let fen = "4k3/pppp4/8/8/8/8/PPPP4/4K3 w - - 0 1";
        assert_eq!(quiesce_position(fen), static_eval(fen));
    }

    #[test]
    fn test_wins_a_hanging_piece() {
        // white queen takes the undefended rook
        let fen = "4k3/8/8/3r4/8/3Q4/8/4K3 w - - 0 1";
        let score = quiesce_position(fen);
        assert!(score > static_eval(fen), "capturing must beat standing pat");
    }

    #[test]
    fn test_declines_a_poisoned_capture() {
        // the pawn is defended: QxP loses the queen, so stand pat
        let fen = "4k3/2p5/3p4/8/8/3Q4/8/4K3 w - - 0 1";
        assert_eq!(quiesce_position(fen), static_eval(fen));
    }
}
