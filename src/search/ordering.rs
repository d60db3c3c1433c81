//! Move ordering.
//!
//! Every generated move is assigned an ordering key and the list is
//! stable-sorted descending. The bucket order: hash/PV move, winning and
//! equal captures, promotions, killers, mate killers, then quiet moves by
//! mate-history and history counts. Quiet moves that land a non-pawn on a
//! pawn-covered square, and quiet moves with a losing exchange score, sink
//! to the bottom; losing captures sit just above them.

use crate::board::{Board, Move, MoveList, Piece, INVALID_SCORE};

use super::pvs::Searcher;

const HASH_MOVE: i32 = 1 << 26;
const GOOD_CAPTURE: i32 = 1 << 24;
const EQUAL_CAPTURE: i32 = 1 << 23;
const QUEEN_PROMOTION: i32 = 1 << 22;
const OTHER_PROMOTION: i32 = 1 << 21;
const KILLER_1: i32 = (1 << 20) + 3;
const KILLER_2: i32 = (1 << 20) + 2;
const MATE_KILLER_1: i32 = (1 << 20) + 1;
const MATE_KILLER_2: i32 = 1 << 20;
const MATE_HISTORY: i32 = 1 << 18;
const HISTORY: i32 = 0;
const UNCLASSIFIED: i32 = -1;
const BAD_CAPTURE: i32 = -(1 << 20);
const UNSAFE: i32 = -(1 << 24);

impl Searcher<'_> {
    /// Assign ordering keys for the main search and sort.
    pub(crate) fn order_moves(
        &mut self,
        board: &Board,
        moves: &mut MoveList,
        hash_move: Move,
        ply: usize,
    ) {
        let us = board.side_to_move();
        let unsafe_squares = board.pawn_attack_squares(us.opponent());
        let killers = self.killers[ply];
        let mate_killers = self.mate_killers[ply];

        for mv in moves.as_mut_slice() {
            let Some(mover) = board.piece_at(mv.from()) else {
                continue;
            };
            mv.see_score = INVALID_SCORE;

            mv.ordering_key = if !hash_move.is_null() && *mv == hash_move {
                HASH_MOVE
            } else if mover != Piece::Pawn && unsafe_squares.contains(mv.to()) {
                UNSAFE
            } else if mv.is_capture() {
                let see = board.see_squares(mv.from(), mv.to());
                mv.see_score = see;
                if see > 0 {
                    GOOD_CAPTURE + see
                } else if see == 0 {
                    EQUAL_CAPTURE
                } else {
                    BAD_CAPTURE + see
                }
            } else if let Some(promoted) = mv.promoted_to() {
                if promoted == Piece::Queen {
                    QUEEN_PROMOTION
                } else {
                    OTHER_PROMOTION
                }
            } else if killers.slots[0] == *mv {
                KILLER_1
            } else if killers.slots[1] == *mv {
                KILLER_2
            } else if mate_killers.slots[0] == *mv {
                MATE_KILLER_1
            } else if mate_killers.slots[1] == *mv {
                MATE_KILLER_2
            } else {
                let see = board.see_squares(mv.from(), mv.to());
                mv.see_score = see;
                if see < 0 {
                    UNSAFE + see
                } else {
                    let mate = self.state.mate_history.get(us, mv.from(), mv.to());
                    if mate > 0 {
                        MATE_HISTORY + mate as i32
                    } else {
                        let history = self.state.history.get(mover, mv.to());
                        if history > 0 {
                            HISTORY + history.min(1 << 17) as i32
                        } else {
                            UNCLASSIFIED
                        }
                    }
                }
            };
        }

        moves.sort_by_ordering_key();
    }

    /// Quiescence ordering: hash move, then exchange-score buckets with a
    /// victim-value tiebreak for the even trades.
    pub(crate) fn order_quiescence_moves(
        &mut self,
        board: &Board,
        moves: &mut MoveList,
        hash_move: Move,
    ) {
        let us = board.side_to_move();
        let unsafe_squares = board.pawn_attack_squares(us.opponent());
        let phase = board.phase();

        for mv in moves.as_mut_slice() {
            let Some(mover) = board.piece_at(mv.from()) else {
                continue;
            };
            mv.see_score = INVALID_SCORE;

            mv.ordering_key = if !hash_move.is_null() && *mv == hash_move {
                HASH_MOVE
            } else if mover != Piece::Pawn
                && mv.captured() != Some(mover)
                && unsafe_squares.contains(mv.from())
            {
                // the piece is en prise where it stands: running the
                // exchange first usually beats retreating the attacker
                UNSAFE
            } else {
                let see = board.see_squares(mv.from(), mv.to());
                mv.see_score = see;
                if see < 0 {
                    BAD_CAPTURE + see
                } else if see > 0 {
                    GOOD_CAPTURE + see
                } else {
                    let victim_value = mv
                        .captured()
                        .map_or(0, |victim| {
                            crate::board::eval::material_value(victim).value(phase)
                        });
                    EQUAL_CAPTURE + victim_value
                }
            };
        }

        moves.sort_by_ordering_key();
    }
}
