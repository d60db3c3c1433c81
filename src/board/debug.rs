//! Debug-build consistency audits. Release builds never call these.

use super::state::Board;
use super::types::{Bitboard, Color, Piece, ALL_PIECES};

impl Board {
    /// Assert that every incrementally maintained field matches a
    /// from-scratch recomputation and that the mailbox agrees with the
    /// bitboards. Runs after every make in debug builds.
    pub(crate) fn audit(&self) {
        // mailbox and bitboards agree square by square
        for idx in 0..64 {
            let sq = super::types::Square::from_index(idx);
            let bit = Bitboard::from_square(sq);
            match self.mailbox[idx] {
                Some(piece) => {
                    let color = self
                        .color_at(sq)
                        .expect("mailbox occupied but no colour bit");
                    debug_assert!(
                        self.pieces_of(color, piece).intersects(bit),
                        "mailbox/bitboard disagree on {sq}"
                    );
                }
                None => {
                    debug_assert!(
                        !self.all_occupied.intersects(bit),
                        "bitboard occupied but mailbox empty on {sq}"
                    );
                }
            }
        }

        // per-colour unions and the global union
        for color in [Color::White, Color::Black] {
            let mut union = Bitboard::EMPTY;
            for piece in ALL_PIECES {
                union |= self.pieces_of(color, piece);
            }
            debug_assert_eq!(
                union,
                self.occupied_by(color),
                "occupancy union mismatch for {color}"
            );
            debug_assert!(
                self.pieces_of(color, Piece::King).is_single(),
                "{color} must have exactly one king"
            );
        }
        debug_assert_eq!(
            self.occupied_by(Color::White) | self.occupied_by(Color::Black),
            self.all_occupied
        );

        debug_assert_eq!(self.hash, self.compute_hash(), "main hash drifted");
        debug_assert_eq!(
            self.pawn_hash,
            self.compute_pawn_hash(),
            "pawn hash drifted"
        );
        debug_assert_eq!(
            self.material_hash,
            self.compute_material_hash(),
            "material hash drifted"
        );

        let (material, pst) = self.compute_material_pst();
        debug_assert_eq!(self.material, material, "material accumulator drifted");
        debug_assert_eq!(self.pst, pst, "piece-square accumulator drifted");
    }
}
