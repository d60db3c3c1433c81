//! The principal-variation search node procedure.

use once_cell::sync::Lazy;

use crate::board::{
    is_mate_score, is_win_score, lost_in, win_in, Board, Move, Piece, Score, DRAW_SCORE,
    INFINITE_SCORE, INVALID_SCORE, MAX_PLY,
};
use crate::tt::Bound;

use super::clock::{Clock, ClockMode};
use super::params::SearchParams;
use super::pv::PrincipalVariation;
use super::{KillerSlots, SearchState};
use crate::board::eval::EvalParams;

/// Node classification: the root and left-most children are PV nodes,
/// their siblings expect to fail high (CUT), and CUT children expect to
/// fail low (ALL).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum NodeKind {
    Pv,
    Cut,
    All,
}

impl NodeKind {
    fn first_child(self) -> NodeKind {
        match self {
            NodeKind::Pv => NodeKind::Pv,
            NodeKind::Cut => NodeKind::All,
            NodeKind::All => NodeKind::Cut,
        }
    }

    fn later_child(self) -> NodeKind {
        match self {
            NodeKind::Pv | NodeKind::All => NodeKind::Cut,
            NodeKind::Cut => NodeKind::All,
        }
    }
}

/// Late-move reduction schedule by remaining depth and move index.
static LMR_TABLE: Lazy<[[i32; 64]; 64]> = Lazy::new(|| {
    let mut table = [[0i32; 64]; 64];
    for (depth, row) in table.iter_mut().enumerate().skip(1) {
        for (index, slot) in row.iter_mut().enumerate().skip(1) {
            let value = 0.4 + (depth as f64).ln() * (index as f64).ln() / 2.25;
            *slot = (value.floor() as i32).clamp(0, 4);
        }
    }
    table
});

/// Per-search state: the stacks the recursion reads and writes by ply.
pub(crate) struct Searcher<'a> {
    pub(crate) state: &'a mut SearchState,
    pub(crate) search_params: &'a SearchParams,
    pub(crate) eval_params: &'a EvalParams,
    pub(crate) clock: &'a mut Clock,
    pub(crate) killers: Box<[KillerSlots; MAX_PLY]>,
    pub(crate) mate_killers: Box<[KillerSlots; MAX_PLY]>,
    pub(crate) pv_stack: Vec<PrincipalVariation>,
    /// `(hash, reached by an irreversible move)` for every position from
    /// the game history through the current line.
    pub(crate) history_stack: Vec<(u64, bool)>,
    pub(crate) current_moves: [Move; MAX_PLY],
    pub(crate) nodes: u64,
    pub(crate) aborted: bool,
    pub(crate) root_depth: i32,
}

impl<'a> Searcher<'a> {
    pub(crate) fn new(
        state: &'a mut SearchState,
        search_params: &'a SearchParams,
        eval_params: &'a EvalParams,
        clock: &'a mut Clock,
        game_history: &[(u64, bool)],
    ) -> Self {
        Searcher {
            state,
            search_params,
            eval_params,
            clock,
            killers: Box::new([KillerSlots::EMPTY; MAX_PLY]),
            mate_killers: Box::new([KillerSlots::EMPTY; MAX_PLY]),
            pv_stack: vec![PrincipalVariation::new(); MAX_PLY + 1],
            history_stack: game_history.to_vec(),
            current_moves: [Move::NULL; MAX_PLY],
            nodes: 0,
            aborted: false,
            root_depth: 0,
        }
    }

    /// Poll the cooperative stop signal. Only time and node budgets can
    /// interrupt a running iteration; depth limits act between iterations.
    pub(crate) fn poll_abort(&mut self) -> bool {
        if self.aborted {
            return true;
        }
        if self.nodes & 1023 == 0 {
            let timed = matches!(
                self.clock.mode(),
                ClockMode::FixedTime(_) | ClockMode::FixedNodes(_) | ClockMode::Tournament { .. }
            );
            if timed && !self.clock.should_continue(self.root_depth, self.nodes) {
                self.aborted = true;
            }
        }
        self.aborted
    }

    /// Count how often this position already occurred, walking back to the
    /// last irreversible move. PV nodes demand a real second repetition;
    /// elsewhere one prior occurrence scores as a draw.
    fn is_repetition(&self, hash: u64, pv_node: bool) -> bool {
        let needed = if pv_node { 2 } else { 1 };
        let mut found = 0;

        let stack = &self.history_stack;
        let Some((_, top_irreversible)) = stack.last() else {
            return false;
        };
        if *top_irreversible {
            return false;
        }

        for &(entry_hash, irreversible) in stack[..stack.len() - 1].iter().rev() {
            if entry_hash == hash {
                found += 1;
                if found >= needed {
                    return true;
                }
            }
            if irreversible {
                break;
            }
        }
        false
    }

    /// The node procedure.
    pub(crate) fn search(
        &mut self,
        board: &Board,
        depth: i32,
        mut alpha: Score,
        mut beta: Score,
        ply: usize,
        node: NodeKind,
    ) -> Score {
        self.pv_stack[ply].clear();

        if self.poll_abort() {
            return DRAW_SCORE;
        }
        if ply >= MAX_PLY - 1 {
            return board.evaluate(alpha, beta, self.eval_params);
        }

        let is_root = ply == 0;
        let us = board.side_to_move();
        let in_check = board.is_in_check(us);

        if !is_root {
            if board.is_draw_by_fifty() || board.is_insufficient_material() {
                return DRAW_SCORE;
            }
            if self.is_repetition(board.hash(), node == NodeKind::Pv) {
                return DRAW_SCORE;
            }

            // mate-distance pruning
            alpha = alpha.max(lost_in(ply as i32));
            beta = beta.min(win_in(ply as i32 + 1));
            if alpha >= beta {
                return alpha;
            }
        }

        if depth <= 0 {
            return self.quiesce(board, alpha, beta, ply, 0);
        }

        self.nodes += 1;

        // transposition probe: cutoffs outside the PV, the hash move always
        let mut hash_move = Move::NULL;
        if let Some(probe) = self.state.tt.probe(board.hash(), ply as i32) {
            if let Some(mv) = probe.best_move {
                hash_move = mv;
            }
            if !is_root && node != NodeKind::Pv && probe.depth >= depth {
                let cutoff = match probe.bound {
                    Bound::Exact => true,
                    Bound::Lower => probe.score >= beta,
                    Bound::Upper => probe.score <= alpha,
                    Bound::None => false,
                };
                if cutoff {
                    return probe.score;
                }
            }
        }

        let static_eval = if in_check {
            -INFINITE_SCORE
        } else {
            board.evaluate(alpha, beta, self.eval_params)
        };

        // node-level pruning, never in the PV, never when a mate is on
        // either bound, never without real material
        if node != NodeKind::Pv
            && !in_check
            && !is_mate_score(alpha)
            && !is_mate_score(beta)
            && board.has_non_pawn_material(us)
        {
            if let Some(score) = self.prune_node(board, depth, alpha, beta, static_eval, ply) {
                return score;
            }
        }

        let mut moves = board.generate_moves();
        if moves.is_empty() {
            return if in_check {
                lost_in(ply as i32)
            } else {
                DRAW_SCORE
            };
        }

        if node != NodeKind::Pv && !in_check && depth >= 3 && !is_mate_score(beta) {
            if let Some(score) = self.probcut(board, &moves, depth, beta, ply) {
                return score;
            }
        }

        self.order_moves(board, &mut moves, hash_move, ply);

        let original_alpha = alpha;
        let mut best_score = -INFINITE_SCORE;
        let mut best_move = Move::NULL;
        let mut searched = 0usize;

        for index in 0..moves.len() {
            let mv = moves[index];
            let is_quiet = !mv.is_capture() && mv.promoted_to().is_none();

            // futility: late quiet moves that cannot lift a hopeless eval
            if node != NodeKind::Pv
                && !in_check
                && is_quiet
                && searched > 0
                && depth < 8
                && static_eval
                    + self.search_params.futility_base
                    + self.search_params.futility_per_depth * depth
                    < alpha
                && board.see(mv) < 0
            {
                continue;
            }

            let child = board.make(mv);
            let gives_check = child.is_in_check(child.side_to_move());

            let extension = self.extension_for(board, &child, mv, depth, ply, gives_check);
            let reduction = if extension == 0 {
                self.reduction_for(mv, depth, index, searched, in_check, gives_check, node)
            } else {
                0
            };

            self.current_moves[ply] = mv;
            self.history_stack
                .push((child.hash(), board.move_is_irreversible(mv)));

            let new_depth = depth - 1 + extension;
            let mut score;
            if searched == 0 {
                score = -self.search(
                    &child,
                    new_depth,
                    -beta,
                    -alpha,
                    ply + 1,
                    node.first_child(),
                );
            } else {
                score = -self.search(
                    &child,
                    new_depth - reduction,
                    -alpha - 1,
                    -alpha,
                    ply + 1,
                    node.later_child(),
                );
                if score > alpha && reduction > 0 {
                    // the reduced search refuted the reduction
                    score = -self.search(
                        &child,
                        new_depth,
                        -alpha - 1,
                        -alpha,
                        ply + 1,
                        node.later_child(),
                    );
                }
                if score > alpha && score < beta {
                    score = -self.search(&child, new_depth, -beta, -alpha, ply + 1, NodeKind::Pv);
                }
            }

            self.history_stack.pop();
            searched += 1;

            if self.aborted {
                return best_score.max(DRAW_SCORE);
            }

            if score > best_score {
                best_score = score;
                best_move = mv;
                if score > alpha {
                    alpha = score;
                    let (head, tail) = self.pv_stack.split_at_mut(ply + 1);
                    head[ply].assign(mv, &tail[0]);
                    if score >= beta {
                        self.record_cutoff(board, mv, ply, depth, score);
                        break;
                    }
                }
            }
        }

        if !self.aborted {
            let bound = if best_score >= beta {
                Bound::Lower
            } else if best_score > original_alpha {
                Bound::Exact
            } else {
                Bound::Upper
            };
            let stored_move = if best_move.is_null() {
                None
            } else {
                Some(best_move)
            };
            self.state
                .tt
                .store(board.hash(), depth, best_score, bound, stored_move, ply as i32);
        }

        best_score
    }

    /// Reverse futility, razoring, and null move. Any hit prunes the node.
    fn prune_node(
        &mut self,
        board: &Board,
        depth: i32,
        alpha: Score,
        beta: Score,
        static_eval: Score,
        ply: usize,
    ) -> Option<Score> {
        let params = self.search_params;

        if depth < 4 && static_eval - params.rfp_margin * depth >= beta {
            return Some(static_eval);
        }

        if depth < 4 && static_eval + params.razor_base + params.razor_per_depth * depth < alpha {
            let score = self.quiesce(board, alpha, beta, ply, 0);
            if score < alpha {
                return Some(score);
            }
        }

        if board.phase() as i32 > params.null_min_phase
            && !board.made_null_move
            && static_eval >= beta + params.null_move_margin
        {
            let reduction = 2 + depth / 4 + i32::from(board.phase() >= 24);
            let child = board.make_null();
            self.history_stack.push((child.hash(), true));
            let score = -self.search(
                &child,
                depth - 1 - reduction,
                -beta,
                -beta + 1,
                ply + 1,
                NodeKind::Cut,
            );
            self.history_stack.pop();

            if !self.aborted && score >= beta && !is_win_score(score) {
                return Some(score);
            }
        }

        None
    }

    /// ProbCut: a tactical move whose quiescence already clears an
    /// inflated beta, confirmed by a reduced search, prunes the node.
    fn probcut(
        &mut self,
        board: &Board,
        moves: &crate::board::MoveList,
        depth: i32,
        beta: Score,
        ply: usize,
    ) -> Option<Score> {
        let probcut_beta = beta + self.search_params.probcut_margin;
        let reduced_depth = (depth - 4).max(1);

        for mv in moves {
            if !mv.is_capture() && mv.promoted_to().is_none() {
                continue;
            }
            if board.see(*mv) < 0 {
                continue;
            }

            let child = board.make(*mv);
            self.history_stack
                .push((child.hash(), board.move_is_irreversible(*mv)));
            let quick = -self.quiesce(&child, -probcut_beta, -probcut_beta + 1, ply + 1, 0);
            let verified = if quick >= probcut_beta {
                -self.search(
                    &child,
                    reduced_depth,
                    -probcut_beta,
                    -probcut_beta + 1,
                    ply + 1,
                    NodeKind::Cut,
                )
            } else {
                -INFINITE_SCORE
            };
            self.history_stack.pop();

            if self.aborted {
                return None;
            }
            if verified >= probcut_beta {
                return Some(verified);
            }
        }
        None
    }

    /// Per-move extensions: castling, shallow recaptures, far passed-pawn
    /// pushes, a bishop hitting the enemy queen, and safe checks.
    fn extension_for(
        &self,
        board: &Board,
        child: &Board,
        mv: Move,
        depth: i32,
        ply: usize,
        gives_check: bool,
    ) -> i32 {
        let us = board.side_to_move();
        let mover = board.piece_at(mv.from());

        if mover == Some(Piece::King) && mv.from().file_distance(mv.to()) == 2 {
            return 1;
        }

        if depth < 5 && mv.is_capture() && ply > 0 {
            let previous = self.current_moves[ply - 1];
            if !previous.is_null() && previous.is_capture() && previous.to() == mv.to() {
                return 1;
            }
        }

        if mover == Some(Piece::Pawn)
            && mv.to().relative_rank(us) >= 5
            && !mv.is_capture()
            && child.is_passed_pawn(us, mv.to())
        {
            return 1;
        }

        if mover == Some(Piece::Bishop) {
            let queens = child.pieces_of(us.opponent(), Piece::Queen);
            if crate::board::attack_tables::bishop_attacks(mv.to(), child.all_occupied)
                .intersects(queens)
            {
                return 1;
            }
        }

        if gives_check && board.see(mv) >= 0 {
            return 1;
        }

        0
    }

    /// Late-move reduction for quiet moves past the first few.
    #[allow(clippy::too_many_arguments)]
    fn reduction_for(
        &self,
        mv: Move,
        depth: i32,
        index: usize,
        searched: usize,
        in_check: bool,
        gives_check: bool,
        node: NodeKind,
    ) -> i32 {
        let is_quiet = !mv.is_capture() && mv.promoted_to().is_none();
        if !is_quiet
            || searched < 3
            || depth < 3
            || in_check
            || gives_check
            || node == NodeKind::Pv
        {
            return 0;
        }

        let mut reduction = LMR_TABLE[(depth as usize).min(63)][index.min(63)];
        if mv.see_score != INVALID_SCORE
            && mv.see_score < self.search_params.see_reduction_threshold
        {
            reduction += 1;
        }
        reduction.min(depth - 2)
    }

    /// Bookkeeping on a fail-high: killers and history for quiet moves,
    /// the mate variants when the score proves a mate.
    fn record_cutoff(&mut self, board: &Board, mv: Move, ply: usize, depth: i32, score: Score) {
        let is_quiet = !mv.is_capture() && mv.promoted_to().is_none();
        if is_quiet {
            self.killers[ply].update(mv);
            if let Some(piece) = board.piece_at(mv.from()) {
                self.state.history.add(piece, mv.to(), depth);
            }
        }
        if is_win_score(score) {
            self.mate_killers[ply].update(mv);
            self.state
                .mate_history
                .add(board.side_to_move(), mv.from(), mv.to(), depth);
        }
    }

    #[cfg(test)]
    pub(crate) fn for_tests(state: &'a mut SearchState) -> Searcher<'a> {
        use std::sync::OnceLock;
        static SEARCH_PARAMS: OnceLock<SearchParams> = OnceLock::new();
        static EVAL_PARAMS: OnceLock<EvalParams> = OnceLock::new();

        // leaking one clock per test searcher keeps the constructor simple
        let clock = Box::leak(Box::new(Clock::new()));
        Searcher::new(
            state,
            SEARCH_PARAMS.get_or_init(SearchParams::default),
            EVAL_PARAMS.get_or_init(EvalParams::default),
            clock,
            &[],
        )
    }
}
