//! Check, pin, and attacked-square detection.

use super::attack_tables::{
    bishop_attacks, in_between, pawn_attacks, rook_attacks, KING_ATTACKS, KNIGHT_ATTACKS,
};
use super::state::Board;
use super::types::{Bitboard, Color, Piece, Square};

/// Everything the move generator needs to know about attacks on one side's
/// king: who is giving check, which own pieces are pinned and along which
/// ray, which enemy sliders are one blocker away, and where a sliding check
/// can be blocked.
pub(crate) struct AttackInfo {
    pub(crate) checkers: Bitboard,
    pub(crate) pinned: Bitboard,
    /// Enemy sliders aimed at the king through exactly one of our pieces.
    pub(crate) blocked_attackers: Bitboard,
    /// Union of the between-squares of all sliding checkers.
    pub(crate) check_blocks: Bitboard,
    /// Per-square movement mask for pinned pieces: the pin ray including
    /// the pinning piece.
    pin_rays: [Bitboard; 64],
}

impl AttackInfo {
    #[inline]
    pub(crate) fn in_check(&self) -> bool {
        !self.checkers.is_empty()
    }

    #[inline]
    pub(crate) fn double_check(&self) -> bool {
        self.checkers.popcount() > 1
    }

    /// The squares a pinned piece may still move to. Meaningless for
    /// unpinned squares; callers test `pinned` first.
    #[inline]
    pub(crate) fn pin_ray(&self, sq: Square) -> Bitboard {
        self.pin_rays[sq.index()]
    }
}

impl Board {
    /// Compute checkers, pins, and blocked attackers relative to `color`'s
    /// king.
    ///
    /// Non-sliders are found with a reverse attack lookup from the king
    /// square. For each enemy slider whose empty-board rays reach the king,
    /// the occupied squares strictly between decide the classification:
    /// none means check, and exactly one of ours means the blocker is
    /// pinned to its ray.
    pub(crate) fn attack_info(&self, color: Color) -> AttackInfo {
        let king = self.king_square(color);
        let them = color.opponent();
        let own = self.occupied_by(color);

        let mut info = AttackInfo {
            checkers: Bitboard::EMPTY,
            pinned: Bitboard::EMPTY,
            blocked_attackers: Bitboard::EMPTY,
            check_blocks: Bitboard::EMPTY,
            pin_rays: [Bitboard::EMPTY; 64],
        };

        info.checkers |= pawn_attacks(color, king) & self.pieces_of(them, Piece::Pawn);
        info.checkers |= KNIGHT_ATTACKS[king.index()] & self.pieces_of(them, Piece::Knight);

        let diag_sliders =
            self.pieces_of(them, Piece::Bishop) | self.pieces_of(them, Piece::Queen);
        let straight_sliders =
            self.pieces_of(them, Piece::Rook) | self.pieces_of(them, Piece::Queen);
        let candidates = (bishop_attacks(king, Bitboard::EMPTY) & diag_sliders)
            | (rook_attacks(king, Bitboard::EMPTY) & straight_sliders);

        for slider in candidates {
            let between = in_between(king, slider);
            let blockers = between & self.all_occupied;
            if blockers.is_empty() {
                info.checkers |= Bitboard::from_square(slider);
                info.check_blocks |= between;
            } else if blockers.is_single() && !(blockers & own).is_empty() {
                let pinned_sq = blockers.lowest_set();
                info.pinned |= blockers;
                info.blocked_attackers |= Bitboard::from_square(slider);
                info.pin_rays[pinned_sq.index()] = between | Bitboard::from_square(slider);
            }
        }

        info
    }

    /// True if `by` attacks `sq` under the given occupancy. Passing a
    /// reduced occupancy lets king-move legality see through the king
    /// itself.
    pub(crate) fn is_square_attacked(
        &self,
        sq: Square,
        by: Color,
        occupancy: Bitboard,
    ) -> bool {
        if !(pawn_attacks(by.opponent(), sq) & self.pieces_of(by, Piece::Pawn)).is_empty() {
            return true;
        }
        if !(KNIGHT_ATTACKS[sq.index()] & self.pieces_of(by, Piece::Knight)).is_empty() {
            return true;
        }
        if !(KING_ATTACKS[sq.index()] & self.pieces_of(by, Piece::King)).is_empty() {
            return true;
        }
        let diag = self.pieces_of(by, Piece::Bishop) | self.pieces_of(by, Piece::Queen);
        if !(bishop_attacks(sq, occupancy) & diag).is_empty() {
            return true;
        }
        let straight = self.pieces_of(by, Piece::Rook) | self.pieces_of(by, Piece::Queen);
        !(rook_attacks(sq, occupancy) & straight).is_empty()
    }

    /// All pieces of both colours attacking `sq` under the given occupancy.
    pub(crate) fn attackers_to(&self, sq: Square, occupancy: Bitboard) -> Bitboard {
        let mut attackers = Bitboard::EMPTY;

        attackers |= pawn_attacks(Color::Black, sq) & self.pieces_of(Color::White, Piece::Pawn);
        attackers |= pawn_attacks(Color::White, sq) & self.pieces_of(Color::Black, Piece::Pawn);
        attackers |= KNIGHT_ATTACKS[sq.index()]
            & (self.pieces_of(Color::White, Piece::Knight)
                | self.pieces_of(Color::Black, Piece::Knight));
        attackers |= KING_ATTACKS[sq.index()]
            & (self.pieces_of(Color::White, Piece::King)
                | self.pieces_of(Color::Black, Piece::King));
        attackers |= bishop_attacks(sq, occupancy) & self.diagonal_sliders();
        attackers |= rook_attacks(sq, occupancy) & self.straight_sliders();

        attackers & occupancy
    }

    /// True if `color`'s king is attacked.
    #[must_use]
    pub fn is_in_check(&self, color: Color) -> bool {
        self.is_square_attacked(self.king_square(color), color.opponent(), self.all_occupied)
    }

    /// Squares attacked by `color`'s pawns.
    #[inline]
    pub(crate) fn pawn_attack_squares(&self, color: Color) -> Bitboard {
        let pawns = self.pieces_of(color, Piece::Pawn);
        match color {
            Color::White => {
                pawns.shift_forward_white().shift_east()
                    | pawns.shift_forward_white().shift_west()
            }
            Color::Black => {
                pawns.shift_forward_black().shift_east()
                    | pawns.shift_forward_black().shift_west()
            }
        }
    }
}
