//! Pawn-structure evaluation: chains, phalanxes, doubled and passed pawns.

use super::super::attack_tables::{passed_pawn_mask, pawn_attacks, squares_in_front};
use super::super::state::Board;
use super::super::types::{Bitboard, Color, Piece, Square, TaperedScore};
use super::params::{
    PAWN_CHAIN_BACK, PAWN_CHAIN_BACK_PER_RANK, PAWN_CHAIN_FRONT, PAWN_CHAIN_FRONT_PER_RANK,
    PAWN_DOUBLED_BY_RANK, PAWN_PASSED_BY_RANK, PAWN_PHALANX_BY_RANK,
};
use super::EvalParams;

impl Board {
    /// Pawn structure for both colours, as a White-minus-Black tapered
    /// total. Rank-indexed tables read the pawn's relative rank; the
    /// in-front masks are defined from White's perspective, so Black's
    /// pawns are mirrored with a byte swap before masking.
    pub(crate) fn evaluate_pawn_structure(&self, params: &EvalParams) -> TaperedScore {
        let mut total = TaperedScore::ZERO;
        total += self.pawn_structure_for(Color::White, params);
        total -= self.pawn_structure_for(Color::Black, params);
        total
    }

    fn pawn_structure_for(&self, color: Color, params: &EvalParams) -> TaperedScore {
        let them = color.opponent();
        let own_pawns = self.pieces_of(color, Piece::Pawn);
        let enemy_pawns = self.pieces_of(them, Piece::Pawn);

        let mirrored_own = match color {
            Color::White => own_pawns,
            Color::Black => own_pawns.swap_bytes(),
        };
        let mirrored_enemy = match color {
            Color::White => enemy_pawns,
            Color::Black => enemy_pawns.swap_bytes(),
        };

        let mut result = TaperedScore::ZERO;

        for sq in own_pawns {
            let rel_rank = sq.relative_rank(color);
            let rel_rank_i = rel_rank as i32;
            let mirrored_sq = match color {
                Color::White => sq,
                Color::Black => sq.flip_vertical(),
            };

            // a defended pawn scores the chain from both ends
            let defenders = pawn_attacks(them, sq) & own_pawns;
            let is_defended = !defenders.is_empty();
            if is_defended {
                result += PAWN_CHAIN_FRONT + PAWN_CHAIN_FRONT_PER_RANK * rel_rank_i;
                for _ in defenders {
                    result += PAWN_CHAIN_BACK + PAWN_CHAIN_BACK_PER_RANK * rel_rank_i;
                }
            }

            if sq.file() < 7 {
                let east = Square::from_index(sq.index() + 1);
                if own_pawns.contains(east) {
                    result += PAWN_PHALANX_BY_RANK[rel_rank];
                }
            }

            if !(squares_in_front(mirrored_sq) & mirrored_own).is_empty() {
                result += PAWN_DOUBLED_BY_RANK[rel_rank];
            }

            if (passed_pawn_mask(mirrored_sq) & mirrored_enemy).is_empty() {
                result += PAWN_PASSED_BY_RANK[rel_rank];
                if is_defended {
                    result += params.passed_pawn_defended;
                }
            }
        }

        result
    }

    /// True if `color`'s pawn on `sq` has no enemy pawn ahead on its own
    /// or an adjacent file.
    pub(crate) fn is_passed_pawn(&self, color: Color, sq: Square) -> bool {
        let enemy_pawns = self.pieces_of(color.opponent(), Piece::Pawn);
        let (mirrored_sq, mirrored_enemy): (Square, Bitboard) = match color {
            Color::White => (sq, enemy_pawns),
            Color::Black => (sq.flip_vertical(), enemy_pawns.swap_bytes()),
        };
        (passed_pawn_mask(mirrored_sq) & mirrored_enemy).is_empty()
    }
}
