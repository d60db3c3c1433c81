//! Per-piece evaluation terms: pairs, outposts, files, mobility, tropism,
//! threats, and king-zone pressure.

use super::super::attack_tables::{
    bishop_attacks, pawn_attacks, queen_attacks, rook_attacks, KING_ATTACKS, KNIGHT_ATTACKS,
};
use super::super::state::Board;
use super::super::types::{Bitboard, Color, Piece, Square, TaperedScore};
use super::params::{ATTACKS, MOBILITY, TROPISM};
use super::EvalParams;

impl Board {
    /// All piece terms for one colour, from that colour's point of view.
    pub(crate) fn evaluate_pieces(&self, color: Color, params: &EvalParams) -> TaperedScore {
        let them = color.opponent();
        let own = self.occupied_by(color);
        let enemy = self.occupied_by(them);
        let own_pawns = self.pieces_of(color, Piece::Pawn);
        let enemy_pawns = self.pieces_of(them, Piece::Pawn);
        let enemy_king = self.king_square(them);
        let enemy_pawn_attacks = self.pawn_attack_squares(them);
        let king_zone = KING_ATTACKS[enemy_king.index()] | Bitboard::from_square(enemy_king);

        let mut result = TaperedScore::ZERO;

        // pair bonuses
        if self.pieces_of(color, Piece::Knight).popcount() >= 2 {
            result += params.knight_pair;
        }
        if self.pieces_of(color, Piece::Bishop).popcount() >= 2 {
            result += params.bishop_pair;
        }
        if self.pieces_of(color, Piece::Rook).popcount() >= 2 {
            result += params.rook_pair;
        }
        if self.pieces_of(color, Piece::Queen).popcount() >= 2 {
            result += params.queen_pair;
        }

        // threats by pawns against pieces
        for target in self.pawn_attack_squares(color) & enemy & !enemy_pawns {
            if let Some(victim) = self.piece_at(target) {
                if victim != Piece::King {
                    result += ATTACKS[Piece::Pawn.index()][victim.index()];
                }
            }
        }

        for piece in [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen] {
            for sq in self.pieces_of(color, piece) {
                let attacks = match piece {
                    Piece::Knight => KNIGHT_ATTACKS[sq.index()],
                    Piece::Bishop => bishop_attacks(sq, self.all_occupied),
                    Piece::Rook => rook_attacks(sq, self.all_occupied),
                    _ => queen_attacks(sq, self.all_occupied),
                };

                // reachable squares excluding our own men and anything an
                // enemy pawn covers
                let mobility = (attacks & !own & !enemy_pawn_attacks).popcount() as usize;
                result += MOBILITY[piece.index()][mobility.min(27)];

                result += TROPISM[piece.index()][sq.distance(enemy_king).min(7)];

                for target in attacks & enemy {
                    if let Some(victim) = self.piece_at(target) {
                        if victim != Piece::King {
                            result += ATTACKS[piece.index()][victim.index()];
                        }
                    }
                }

                let zone_hits = (attacks & king_zone).popcount() as i32;
                result += params.king_zone_attack * zone_hits;

                match piece {
                    Piece::Knight | Piece::Bishop => {
                        result += self.outpost_bonus(color, piece, sq, params);
                    }
                    Piece::Rook => {
                        result += self.rook_file_bonus(color, sq, params);
                    }
                    _ => {}
                }

                if piece == Piece::Bishop {
                    let same_color_mask = if sq.is_light() {
                        Bitboard::LIGHT_SQUARES
                    } else {
                        Bitboard::DARK_SQUARES
                    };
                    let blockers = (own_pawns & same_color_mask).popcount() as i32;
                    result += params.bishop_pawn_color * blockers;
                }
            }
        }

        result += self.king_shield_bonus(color, params);

        result
    }

    /// A minor piece on a pawn-defended square in the opponent's half that
    /// no enemy pawn contests.
    fn outpost_bonus(
        &self,
        color: Color,
        piece: Piece,
        sq: Square,
        params: &EvalParams,
    ) -> TaperedScore {
        let rel_rank = sq.relative_rank(color);
        if !(3..=5).contains(&rel_rank) {
            return TaperedScore::ZERO;
        }
        let defended =
            !(pawn_attacks(color.opponent(), sq) & self.pieces_of(color, Piece::Pawn)).is_empty();
        let contested = self.pawn_attack_squares(color.opponent()).contains(sq);
        if defended && !contested {
            match piece {
                Piece::Knight => params.knight_outpost,
                _ => params.bishop_outpost,
            }
        } else {
            TaperedScore::ZERO
        }
    }

    /// Open and half-open files, and rooks doubled on a file.
    fn rook_file_bonus(&self, color: Color, sq: Square, params: &EvalParams) -> TaperedScore {
        let file = Bitboard::file_mask(sq.file());
        let own_pawns = self.pieces_of(color, Piece::Pawn);
        let enemy_pawns = self.pieces_of(color.opponent(), Piece::Pawn);

        let mut result = TaperedScore::ZERO;
        if (file & own_pawns).is_empty() {
            if (file & enemy_pawns).is_empty() {
                result += params.rook_open_file;
            } else {
                result += params.rook_semi_open_file;
            }
        }

        // counted from one end of the file, so a doubled pair scores once
        let own_rooks = self.pieces_of(color, Piece::Rook) & file;
        if own_rooks.popcount() >= 2 && own_rooks.lowest_set() == sq {
            result += params.doubled_rooks;
        }

        result
    }

    /// Pawns sheltering the king: own pawns on the first two relative
    /// ranks in front of it, within one file.
    fn king_shield_bonus(&self, color: Color, params: &EvalParams) -> TaperedScore {
        let king = self.king_square(color);
        let mut shield = 0;
        for pawn in self.pieces_of(color, Piece::Pawn) {
            if pawn.file_distance(king) <= 1
                && matches!(pawn.relative_rank(color), 1 | 2)
                && pawn.relative_rank(color) > king.relative_rank(color)
            {
                shield += 1;
            }
        }
        params.king_shield * shield
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rook_open_file() {
        let params = EvalParams::default();
        let open = Board::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1");
        let closed = Board::from_fen("4k3/8/8/8/8/8/P7/R3K3 w - - 0 1");
        let open_score = open.evaluate_pieces(Color::White, &params);
        let closed_score = closed.evaluate_pieces(Color::White, &params);
        assert!(open_score.mg > closed_score.mg);
    }

    #[test]
    fn test_bishop_pair_bonus() {
        let params = EvalParams::default();
        let pair = Board::from_fen("4k3/8/8/8/8/8/8/2B1KB2 w - - 0 1");
        let single = Board::from_fen("4k3/8/8/8/8/8/8/2B1K3 w - - 0 1");
        let diff = pair.evaluate_pieces(Color::White, &params)
            - single.evaluate_pieces(Color::White, &params);
        assert!(diff.mg >= params.bishop_pair.mg);
    }

    #[test]
    fn test_knight_outpost() {
        let params = EvalParams::default();
        // knight on d5 defended by the c4 pawn, no black pawn to chase it
        let outpost = Board::from_fen("4k3/8/8/3N4/2P5/8/8/4K3 w - - 0 1");
        let bonus = outpost.outpost_bonus(
            Color::White,
            Piece::Knight,
            "d5".parse().unwrap(),
            &params,
        );
        assert_eq!(bonus, params.knight_outpost);

        // an e7 pawn could never attack d5... but an e6 pawn covers it now
        let contested = Board::from_fen("4k3/8/4p3/3N4/2P5/8/8/4K3 w - - 0 1");
        let none = contested.outpost_bonus(
            Color::White,
            Piece::Knight,
            "d5".parse().unwrap(),
            &params,
        );
        assert_eq!(none, TaperedScore::ZERO);
    }

    #[test]
    fn test_king_shield() {
        let params = EvalParams::default();
        let sheltered = Board::from_fen("4k3/8/8/8/8/8/5PPP/6K1 w - - 0 1");
        let bare = Board::from_fen("4k3/8/8/8/8/8/8/6K1 w - - 0 1");
        let diff = sheltered.king_shield_bonus(Color::White, &params)
            - bare.king_shield_bonus(Color::White, &params);
        assert_eq!(diff, params.king_shield * 3);
    }
}
