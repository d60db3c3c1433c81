//! Legal move generation.
//!
//! Generation is fully legal rather than pseudo-legal: pinned pieces are
//! restricted to their pin ray, king moves are tested against an occupancy
//! with the king removed (so sliders attack through it), and a dedicated
//! evasion routine runs when the side to move is in check. En passant gets
//! a from-scratch slider check because removing two pawns at once can open
//! a rank or diagonal no pin ray describes.

use super::attack_tables::{
    bishop_attacks, pawn_attacks, queen_attacks, rook_attacks, KING_ATTACKS, KNIGHT_ATTACKS,
};
use super::attacks::AttackInfo;
use super::state::Board;
use super::types::{Bitboard, Color, Move, MoveList, Piece, Square, PROMOTION_PIECES};

#[derive(Clone, Copy, PartialEq, Eq)]
enum GenMode {
    All,
    /// Captures and promotions only; evasions override this when in check.
    Tactical,
}

impl Board {
    /// All legal moves for the side to move.
    #[must_use]
    pub fn generate_moves(&self) -> MoveList {
        self.generate(GenMode::All)
    }

    /// Captures and promotions only, except that in check every evasion is
    /// generated. This is the quiescence-search move set.
    #[must_use]
    pub fn generate_tactical_moves(&self) -> MoveList {
        self.generate(GenMode::Tactical)
    }

    fn generate(&self, mode: GenMode) -> MoveList {
        let info = self.attack_info(self.side_to_move);
        let mut moves = MoveList::new();
        if info.in_check() {
            self.generate_evasions(&info, &mut moves);
        } else {
            self.generate_regular(&info, mode, &mut moves);
        }
        moves
    }

    /// Leaf count of the move-generation tree; the standard correctness
    /// diagnostic.
    #[must_use]
    pub fn perft(&self, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves = self.generate_moves();
        if depth == 1 {
            return moves.len() as u64;
        }
        let mut nodes = 0;
        for mv in &moves {
            nodes += self.make(*mv).perft(depth - 1);
        }
        nodes
    }

    /// Per-root-move leaf counts, for debugging generator discrepancies.
    #[must_use]
    pub fn perft_divide(&self, depth: u32) -> Vec<(Move, u64)> {
        let moves = self.generate_moves();
        let mut results = Vec::with_capacity(moves.len());
        for mv in &moves {
            let nodes = if depth <= 1 {
                1
            } else {
                self.make(*mv).perft(depth - 1)
            };
            results.push((*mv, nodes));
        }
        results
    }

    // =====================================================================
    // Not-in-check generation
    // =====================================================================

    fn generate_regular(&self, info: &AttackInfo, mode: GenMode, moves: &mut MoveList) {
        let us = self.side_to_move;
        let them = us.opponent();
        let own = self.occupied_by(us);
        let enemy = self.occupied_by(them);
        let targets = match mode {
            GenMode::All => !own,
            GenMode::Tactical => enemy,
        };

        // a pinned knight can never stay on its ray
        for from in self.pieces_of(us, Piece::Knight) & !info.pinned {
            self.push_piece_moves(moves, from, KNIGHT_ATTACKS[from.index()] & targets);
        }

        for from in self.pieces_of(us, Piece::Bishop) {
            let mut attacks = bishop_attacks(from, self.all_occupied) & targets;
            if info.pinned.contains(from) {
                attacks &= info.pin_ray(from);
            }
            self.push_piece_moves(moves, from, attacks);
        }

        for from in self.pieces_of(us, Piece::Rook) {
            let mut attacks = rook_attacks(from, self.all_occupied) & targets;
            if info.pinned.contains(from) {
                attacks &= info.pin_ray(from);
            }
            self.push_piece_moves(moves, from, attacks);
        }

        for from in self.pieces_of(us, Piece::Queen) {
            let mut attacks = queen_attacks(from, self.all_occupied) & targets;
            if info.pinned.contains(from) {
                attacks &= info.pin_ray(from);
            }
            self.push_piece_moves(moves, from, attacks);
        }

        self.generate_pawn_moves(info, mode, moves);
        self.generate_king_moves(mode, moves);

        if mode == GenMode::All {
            self.generate_castling(moves);
        }
    }

    fn generate_pawn_moves(&self, info: &AttackInfo, mode: GenMode, moves: &mut MoveList) {
        let us = self.side_to_move;
        let them = us.opponent();
        let enemy = self.occupied_by(them);

        for from in self.pieces_of(us, Piece::Pawn) {
            let allowed = if info.pinned.contains(from) {
                info.pin_ray(from)
            } else {
                Bitboard::ALL
            };

            for to in pawn_attacks(us, from) & enemy & allowed {
                let victim = match self.piece_at(to) {
                    Some(piece) => piece,
                    None => continue,
                };
                self.push_pawn_move(moves, from, to, Some(victim));
            }

            if let Some(ep) = self.en_passant {
                if pawn_attacks(us, from).contains(ep) && self.en_passant_is_legal(from, ep) {
                    moves.push(Move::capture(from, ep, Piece::Pawn));
                }
            }

            let Some(single) = from.forward(us) else {
                continue;
            };
            if self.piece_at(single).is_some() {
                continue;
            }

            let promoting = single.relative_rank(us) == 7;
            if promoting {
                if allowed.contains(single) {
                    self.push_pawn_move(moves, from, single, None);
                }
                continue;
            }

            if mode == GenMode::All {
                if allowed.contains(single) {
                    moves.push(Move::new(from, single));
                }
                if from.relative_rank(us) == 1 {
                    if let Some(double) = single.forward(us) {
                        if self.piece_at(double).is_none() && allowed.contains(double) {
                            moves.push(Move::new(from, double));
                        }
                    }
                }
            }
        }
    }

    fn generate_king_moves(&self, mode: GenMode, moves: &mut MoveList) {
        let us = self.side_to_move;
        let them = us.opponent();
        let king = self.king_square(us);
        let targets = match mode {
            GenMode::All => !self.occupied_by(us),
            GenMode::Tactical => self.occupied_by(them),
        };
        let occ_without_king = self.all_occupied & !Bitboard::from_square(king);

        for to in KING_ATTACKS[king.index()] & targets {
            if !self.is_square_attacked(to, them, occ_without_king) {
                self.push_move(moves, king, to);
            }
        }
    }

    /// Castling: the right must be present, the squares between king and
    /// rook empty, and the king may not start in, pass through, or land on
    /// an attacked square. Being here means the king is not in check.
    fn generate_castling(&self, moves: &mut MoveList) {
        let us = self.side_to_move;
        let them = us.opponent();
        let back = match us {
            Color::White => 7,
            Color::Black => 0,
        };
        let king = Square::new(back, 4);

        if self.castling_rights.has(us, true) {
            let f_sq = Square::new(back, 5);
            let g_sq = Square::new(back, 6);
            if self.piece_at(f_sq).is_none()
                && self.piece_at(g_sq).is_none()
                && !self.is_square_attacked(f_sq, them, self.all_occupied)
                && !self.is_square_attacked(g_sq, them, self.all_occupied)
            {
                moves.push(Move::new(king, g_sq));
            }
        }

        if self.castling_rights.has(us, false) {
            let b_sq = Square::new(back, 1);
            let c_sq = Square::new(back, 2);
            let d_sq = Square::new(back, 3);
            if self.piece_at(b_sq).is_none()
                && self.piece_at(c_sq).is_none()
                && self.piece_at(d_sq).is_none()
                && !self.is_square_attacked(c_sq, them, self.all_occupied)
                && !self.is_square_attacked(d_sq, them, self.all_occupied)
            {
                moves.push(Move::new(king, c_sq));
            }
        }
    }

    // =====================================================================
    // Check evasions
    // =====================================================================

    fn generate_evasions(&self, info: &AttackInfo, moves: &mut MoveList) {
        let us = self.side_to_move;
        let them = us.opponent();
        let king = self.king_square(us);
        let own = self.occupied_by(us);
        let occ_without_king = self.all_occupied & !Bitboard::from_square(king);

        // king steps, tested with the king out of the occupancy so a
        // checking slider still covers the squares behind it
        for to in KING_ATTACKS[king.index()] & !own {
            if !self.is_square_attacked(to, them, occ_without_king) {
                self.push_move(moves, king, to);
            }
        }

        if info.double_check() {
            return;
        }

        let checker_sq = info.checkers.lowest_set();

        // captures of the checker by non-king pieces
        let defenders =
            self.attackers_to(checker_sq, self.all_occupied) & own & !Bitboard::from_square(king);
        for from in defenders {
            if info.pinned.contains(from) && !info.pin_ray(from).contains(checker_sq) {
                continue;
            }
            if self.piece_at(from) == Some(Piece::Pawn) {
                let victim = self.piece_at(checker_sq);
                self.push_pawn_move(moves, from, checker_sq, victim);
            } else {
                self.push_move(moves, from, checker_sq);
            }
        }

        // a checking double-pushed pawn can also be removed en passant
        if let Some(ep) = self.en_passant {
            if self.piece_at(checker_sq) == Some(Piece::Pawn)
                && checker_sq.forward(us) == Some(ep)
            {
                for from in pawn_attacks(them, ep) & self.pieces_of(us, Piece::Pawn) {
                    if info.pinned.contains(from) {
                        continue;
                    }
                    if self.en_passant_is_legal(from, ep) {
                        moves.push(Move::capture(from, ep, Piece::Pawn));
                    }
                }
            }
        }

        // interpositions on the checking ray; pinned pieces can never help
        for block in info.check_blocks {
            let blockers = KNIGHT_ATTACKS[block.index()] & self.pieces_of(us, Piece::Knight);
            for from in blockers & !info.pinned {
                moves.push(Move::new(from, block));
            }

            let diag = self.pieces_of(us, Piece::Bishop) | self.pieces_of(us, Piece::Queen);
            for from in bishop_attacks(block, self.all_occupied) & diag & !info.pinned {
                moves.push(Move::new(from, block));
            }

            let straight = self.pieces_of(us, Piece::Rook) | self.pieces_of(us, Piece::Queen);
            for from in rook_attacks(block, self.all_occupied) & straight & !info.pinned {
                moves.push(Move::new(from, block));
            }

            self.generate_pawn_blocks(info, block, moves);
        }
    }

    /// Pawn pushes (single and double) landing on one blocking square.
    fn generate_pawn_blocks(&self, info: &AttackInfo, block: Square, moves: &mut MoveList) {
        let us = self.side_to_move;
        let them = us.opponent();

        if let Some(single_src) = block.forward(them) {
            if self.piece_at(single_src) == Some(Piece::Pawn)
                && self.color_at(single_src) == Some(us)
            {
                if !info.pinned.contains(single_src) {
                    self.push_pawn_move(moves, single_src, block, None);
                }
            } else if self.piece_at(single_src).is_none() && block.relative_rank(us) == 3 {
                if let Some(double_src) = single_src.forward(them) {
                    if self.piece_at(double_src) == Some(Piece::Pawn)
                        && self.color_at(double_src) == Some(us)
                        && !info.pinned.contains(double_src)
                    {
                        moves.push(Move::new(double_src, block));
                    }
                }
            }
        }
    }

    // =====================================================================
    // Helpers
    // =====================================================================

    /// Push every destination in `attacks`, classifying captures.
    fn push_piece_moves(&self, moves: &mut MoveList, from: Square, attacks: Bitboard) {
        for to in attacks {
            self.push_move(moves, from, to);
        }
    }

    fn push_move(&self, moves: &mut MoveList, from: Square, to: Square) {
        match self.piece_at(to) {
            Some(victim) => moves.push(Move::capture(from, to, victim)),
            None => moves.push(Move::new(from, to)),
        }
    }

    /// Push a pawn move, expanding promotions on the last rank.
    fn push_pawn_move(
        &self,
        moves: &mut MoveList,
        from: Square,
        to: Square,
        victim: Option<Piece>,
    ) {
        if to.relative_rank(self.side_to_move) == 7 {
            for promoted in PROMOTION_PIECES {
                moves.push(Move::promotion(from, to, promoted, victim));
            }
        } else {
            match victim {
                Some(piece) => moves.push(Move::capture(from, to, piece)),
                None => moves.push(Move::new(from, to)),
            }
        }
    }

    /// Full slider re-check for en passant: removing the capturing and the
    /// captured pawn in one move can expose the king along a shared rank
    /// (the hidden pin) or a diagonal, which pin rays do not cover.
    fn en_passant_is_legal(&self, from: Square, ep: Square) -> bool {
        let us = self.side_to_move;
        let them = us.opponent();
        let Some(captured_sq) = ep.forward(them) else {
            return false;
        };

        let occupancy = (self.all_occupied
            & !Bitboard::from_square(from)
            & !Bitboard::from_square(captured_sq))
            | Bitboard::from_square(ep);

        let king = self.king_square(us);
        let diag = self.pieces_of(them, Piece::Bishop) | self.pieces_of(them, Piece::Queen);
        if !(bishop_attacks(king, occupancy) & diag).is_empty() {
            return false;
        }
        let straight = self.pieces_of(them, Piece::Rook) | self.pieces_of(them, Piece::Queen);
        (rook_attacks(king, occupancy) & straight).is_empty()
    }
}
