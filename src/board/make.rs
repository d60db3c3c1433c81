//! Applying moves: a pure function from a position and a move to the
//! derived position.

use crate::zobrist::ZOBRIST;

use super::attack_tables::pawn_attacks;
use super::eval::{material_value, pst_value};
use super::state::Board;
use super::types::{Color, Move, Piece, Square};

impl Board {
    /// Add a piece to the White-minus-Black accumulators.
    #[inline]
    fn accumulate_add(&mut self, color: Color, piece: Piece, sq: Square) {
        match color {
            Color::White => {
                self.material += material_value(piece);
                self.pst += pst_value(color, piece, sq);
            }
            Color::Black => {
                self.material -= material_value(piece);
                self.pst -= pst_value(color, piece, sq);
            }
        }
    }

    #[inline]
    fn accumulate_remove(&mut self, color: Color, piece: Piece, sq: Square) {
        match color {
            Color::White => {
                self.material -= material_value(piece);
                self.pst -= pst_value(color, piece, sq);
            }
            Color::Black => {
                self.material += material_value(piece);
                self.pst += pst_value(color, piece, sq);
            }
        }
    }

    /// Fold a piece-count change of one colour/piece into the material
    /// hash. Called before the bitboards change.
    #[inline]
    fn material_hash_step(&mut self, color: Color, piece: Piece, delta: i32) {
        let keys = &*ZOBRIST;
        let old = self.pieces_of(color, piece).popcount() as i32;
        let new = old + delta;
        self.material_hash ^= keys.material[color.index()][piece.index()][old as usize];
        self.material_hash ^= keys.material[color.index()][piece.index()][new as usize];
    }

    /// Remove one piece from the board, updating every hash and
    /// accumulator.
    fn lift_piece(&mut self, color: Color, piece: Piece, sq: Square) {
        let keys = &*ZOBRIST;
        self.material_hash_step(color, piece, -1);
        self.remove_piece(sq, color, piece);
        self.hash ^= keys.pieces[color.index()][piece.index()][sq.index()];
        if piece == Piece::Pawn {
            self.pawn_hash ^= keys.pawns[color.index()][sq.index()];
        }
        self.accumulate_remove(color, piece, sq);
    }

    /// Place one piece on the board, updating every hash and accumulator.
    fn drop_piece(&mut self, color: Color, piece: Piece, sq: Square) {
        let keys = &*ZOBRIST;
        self.material_hash_step(color, piece, 1);
        self.set_piece(sq, color, piece);
        self.hash ^= keys.pieces[color.index()][piece.index()][sq.index()];
        if piece == Piece::Pawn {
            self.pawn_hash ^= keys.pawns[color.index()][sq.index()];
        }
        self.accumulate_add(color, piece, sq);
    }

    /// Apply a legal move and return the resulting position. The parent
    /// position is untouched.
    ///
    /// Castling is recognised by a two-file king move and en passant by a
    /// pawn capture onto an empty square, so the move needs no flag bits.
    ///
    /// # Panics
    /// Panics if the from-square is empty; callers must pass moves from
    /// this position's generator.
    #[must_use]
    pub fn make(&self, mv: Move) -> Board {
        let keys = &*ZOBRIST;
        let mut board = *self;
        let us = board.side_to_move;
        let them = us.opponent();
        let from = mv.from();
        let to = mv.to();

        let mover = board
            .piece_at(from)
            .expect("make: from-square is empty");

        // the previous en-passant window closes no matter what follows
        if let Some(ep) = board.en_passant.take() {
            board.hash ^= keys.en_passant_file[ep.file()];
        }

        let is_castle = mover == Piece::King && from.file_distance(to) == 2;
        let is_en_passant =
            mover == Piece::Pawn && mv.is_capture() && board.piece_at(to).is_none();

        if let Some(victim) = mv.captured() {
            let capture_sq = if is_en_passant {
                // the captured pawn sits one step behind the landing square
                match to.forward(them) {
                    Some(sq) => sq,
                    None => unreachable!("en passant capture on a back rank"),
                }
            } else {
                to
            };
            board.lift_piece(them, victim, capture_sq);
        }

        board.lift_piece(us, mover, from);
        board.drop_piece(us, mv.promoted_to().unwrap_or(mover), to);

        if is_castle {
            let (rook_from_file, rook_to_file) = if to.file() == 6 { (7, 5) } else { (0, 3) };
            let rook_from = Square::new(from.rank(), rook_from_file);
            let rook_to = Square::new(from.rank(), rook_to_file);
            board.lift_piece(us, Piece::Rook, rook_from);
            board.drop_piece(us, Piece::Rook, rook_to);
        }

        board.update_castling_rights(from, to);

        // a double push opens an en-passant window only when an enemy pawn
        // stands ready to use it
        if mover == Piece::Pawn && from.rank().abs_diff(to.rank()) == 2 {
            let ep_sq = Square::new(usize::midpoint(from.rank(), to.rank()), from.file());
            let capturers = pawn_attacks(us, ep_sq) & board.pieces_of(them, Piece::Pawn);
            if !capturers.is_empty() {
                board.en_passant = Some(ep_sq);
                board.hash ^= keys.en_passant_file[ep_sq.file()];
            }
        }

        if mover == Piece::Pawn || mv.is_capture() {
            board.halfmove_clock = 0;
        } else {
            board.halfmove_clock = board.halfmove_clock.saturating_add(1);
        }
        if us == Color::Black {
            board.fullmove_number = board.fullmove_number.saturating_add(1);
        }

        board.side_to_move = them;
        board.hash ^= keys.side_to_move;
        board.made_null_move = false;

        #[cfg(debug_assertions)]
        board.audit();

        board
    }

    /// Pass the move: flip the side to move and close any en-passant
    /// window. Used by null-move pruning.
    #[must_use]
    pub fn make_null(&self) -> Board {
        let keys = &*ZOBRIST;
        let mut board = *self;
        if let Some(ep) = board.en_passant.take() {
            board.hash ^= keys.en_passant_file[ep.file()];
        }
        board.side_to_move = board.side_to_move.opponent();
        board.hash ^= keys.side_to_move;
        board.made_null_move = true;
        board
    }

    /// Clear castling rights whose king or rook home square was vacated or
    /// captured onto, folding the change into the hash.
    fn update_castling_rights(&mut self, from: Square, to: Square) {
        const WHITE_ROOK_Q: Square = Square::from_index(56); // a1
        const WHITE_ROOK_K: Square = Square::from_index(63); // h1
        const WHITE_KING: Square = Square::from_index(60); // e1
        const BLACK_ROOK_Q: Square = Square::from_index(0); // a8
        const BLACK_ROOK_K: Square = Square::from_index(7); // h8
        const BLACK_KING: Square = Square::from_index(4); // e8

        let old_mask = self.castling_rights.as_u8();
        for sq in [from, to] {
            match sq {
                WHITE_ROOK_Q => self.castling_rights.remove(Color::White, false),
                WHITE_ROOK_K => self.castling_rights.remove(Color::White, true),
                BLACK_ROOK_Q => self.castling_rights.remove(Color::Black, false),
                BLACK_ROOK_K => self.castling_rights.remove(Color::Black, true),
                WHITE_KING => {
                    self.castling_rights.remove(Color::White, true);
                    self.castling_rights.remove(Color::White, false);
                }
                BLACK_KING => {
                    self.castling_rights.remove(Color::Black, true);
                    self.castling_rights.remove(Color::Black, false);
                }
                _ => {}
            }
        }
        let changed = old_mask ^ self.castling_rights.as_u8();
        if changed != 0 {
            self.hash ^= ZOBRIST.castling_keys(changed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_make_is_pure() {
        let board = Board::starting_position();
        let mv = board.parse_move("e2e4").unwrap();
        let child = board.make(mv);

        assert_eq!(board.piece_at(sq("e2")), Some(Piece::Pawn));
        assert_eq!(child.piece_at(sq("e2")), None);
        assert_eq!(child.piece_at(sq("e4")), Some(Piece::Pawn));
        assert_ne!(board.hash, child.hash);
    }

    #[test]
    fn test_incremental_matches_rebuild() {
        let mut board = Board::starting_position();
        for text in ["e2e4", "d7d5", "e4d5", "d8d5", "b1c3", "d5a5", "g1f3"] {
            let mv = board.parse_move(text).unwrap();
            board = board.make(mv);
            assert_eq!(board.hash, board.compute_hash(), "after {text}");
            assert_eq!(board.pawn_hash, board.compute_pawn_hash(), "after {text}");
            assert_eq!(
                board.material_hash,
                board.compute_material_hash(),
                "after {text}"
            );
            let (material, pst) = board.compute_material_pst();
            assert_eq!(board.material, material, "after {text}");
            assert_eq!(board.pst, pst, "after {text}");
        }
    }

    #[test]
    fn test_castling_moves_the_rook() {
        let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let kingside = board.make(board.parse_move("e1g1").unwrap());
        assert_eq!(kingside.piece_at(sq("g1")), Some(Piece::King));
        assert_eq!(kingside.piece_at(sq("f1")), Some(Piece::Rook));
        assert_eq!(kingside.piece_at(sq("h1")), None);
        assert!(!kingside.castling_rights.has_any(Color::White));
        assert!(kingside.castling_rights.has_any(Color::Black));

        let queenside = board.make(board.parse_move("e1c1").unwrap());
        assert_eq!(queenside.piece_at(sq("c1")), Some(Piece::King));
        assert_eq!(queenside.piece_at(sq("d1")), Some(Piece::Rook));
        assert_eq!(queenside.piece_at(sq("a1")), None);
    }

    #[test]
    fn test_rook_capture_clears_rights() {
        let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let after = board.make(board.parse_move("a1a8").unwrap());
        assert!(!after.castling_rights.has(Color::Black, false));
        assert!(after.castling_rights.has(Color::Black, true));
        assert!(!after.castling_rights.has(Color::White, false));
        assert!(after.castling_rights.has(Color::White, true));
    }

    #[test]
    fn test_en_passant_capture() {
        let board = Board::from_fen(
            "rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 2",
        );
        let mv = board.parse_move("d4e3").unwrap();
        assert!(mv.is_capture());
        let after = board.make(mv);
        assert_eq!(after.piece_at(sq("e3")), Some(Piece::Pawn));
        assert_eq!(after.piece_at(sq("e4")), None, "captured pawn removed");
        assert_eq!(after.hash, after.compute_hash());
    }

    #[test]
    fn test_promotion_updates_material() {
        let board = Board::from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1");
        let after = board.make(board.parse_move("a7a8q").unwrap());
        assert_eq!(after.piece_at(sq("a8")), Some(Piece::Queen));
        assert!(after.pieces_of(Color::White, Piece::Pawn).is_empty());
        assert_eq!(after.material_hash, after.compute_material_hash());
        assert_eq!(after.pawn_hash, after.compute_pawn_hash());
    }

    #[test]
    fn test_ep_window_needs_a_capturer() {
        let board = Board::starting_position();
        let after = board.make(board.parse_move("e2e4").unwrap());
        // no black pawn on d4 or f4
        assert_eq!(after.en_passant, None);

        let board = Board::from_fen(
            "rnbqkbnr/ppp1pppp/8/8/3p4/8/PPPPPPPP/RNBQKBNR w KQkq - 0 2",
        );
        let after = board.make(board.parse_move("e2e4").unwrap());
        assert_eq!(after.en_passant, Some(sq("e3")));
    }

    #[test]
    fn test_clocks() {
        let board = Board::starting_position();
        let after = board.make(board.parse_move("g1f3").unwrap());
        assert_eq!(after.halfmove_clock(), 1);
        assert_eq!(after.fullmove_number(), 1);

        let after2 = after.make(after.parse_move("g8f6").unwrap());
        assert_eq!(after2.halfmove_clock(), 2);
        assert_eq!(after2.fullmove_number(), 2);

        let after3 = after2.make(after2.parse_move("e2e4").unwrap());
        assert_eq!(after3.halfmove_clock(), 0, "pawn move resets the clock");
    }

    #[test]
    fn test_null_move() {
        let board = Board::from_fen(
            "rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 2",
        );
        let after = board.make_null();
        assert_eq!(after.side_to_move(), Color::White);
        assert_eq!(after.en_passant, None);
        assert!(after.made_null_move);
        assert_eq!(after.hash, after.compute_hash());

        // flipping twice without the ep square restores the original hash
        let board_no_ep = Board::starting_position();
        let twice = board_no_ep.make_null().make_null();
        assert_eq!(twice.hash, board_no_ep.hash);
    }
}
