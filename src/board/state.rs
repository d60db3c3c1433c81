//! The position value type.

use crate::zobrist::ZOBRIST;

use super::eval::{material_value, pst_value};
use super::types::{
    Bitboard, CastlingRights, Color, Piece, Square, TaperedScore, ALL_PIECES,
};

/// A chess position. `Board` is a plain value: [`Board::make`] returns a
/// derived position, and the search keeps its stack of boards by value.
///
/// The mailbox and the per-colour bitboards are kept in lockstep, and the
/// three Zobrist hashes plus the tapered material/piece-square accumulators
/// are maintained incrementally. `debug_assertions` builds audit all of the
/// derived fields against a from-scratch recomputation after every make.
#[derive(Clone, Copy)]
pub struct Board {
    pub(crate) mailbox: [Option<Piece>; 64],
    /// `pieces[colour][piece]`.
    pub(crate) pieces: [[Bitboard; 6]; 2],
    /// Union of one colour's piece bitboards.
    pub(crate) occupied: [Bitboard; 2],
    pub(crate) all_occupied: Bitboard,
    pub(crate) side_to_move: Color,
    pub(crate) castling_rights: CastlingRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u16,
    pub(crate) fullmove_number: u16,
    pub(crate) hash: u64,
    pub(crate) pawn_hash: u64,
    pub(crate) material_hash: u64,
    /// Material balance, White minus Black.
    pub(crate) material: TaperedScore,
    /// Piece-square balance, White minus Black.
    pub(crate) pst: TaperedScore,
    pub(crate) made_null_move: bool,
}

impl Board {
    pub(crate) fn empty() -> Self {
        Board {
            mailbox: [None; 64],
            pieces: [[Bitboard::EMPTY; 6]; 2],
            occupied: [Bitboard::EMPTY; 2],
            all_occupied: Bitboard::EMPTY,
            side_to_move: Color::White,
            castling_rights: CastlingRights::none(),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            hash: 0,
            pawn_hash: 0,
            material_hash: 0,
            material: TaperedScore::ZERO,
            pst: TaperedScore::ZERO,
            made_null_move: false,
        }
    }

    /// The standard starting position.
    #[must_use]
    pub fn starting_position() -> Self {
        Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
    }

    #[inline]
    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    #[must_use]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    #[inline]
    #[must_use]
    pub fn halfmove_clock(&self) -> u32 {
        u32::from(self.halfmove_clock)
    }

    #[inline]
    #[must_use]
    pub fn fullmove_number(&self) -> u32 {
        u32::from(self.fullmove_number)
    }

    /// The piece on a square, if any.
    #[inline]
    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.mailbox[sq.index()]
    }

    /// The colour of the piece on a square, if any.
    #[inline]
    #[must_use]
    pub fn color_at(&self, sq: Square) -> Option<Color> {
        let bit = Bitboard::from_square(sq);
        if self.occupied[Color::White.index()].intersects(bit) {
            Some(Color::White)
        } else if self.occupied[Color::Black.index()].intersects(bit) {
            Some(Color::Black)
        } else {
            None
        }
    }

    #[inline]
    pub(crate) fn pieces_of(&self, color: Color, piece: Piece) -> Bitboard {
        self.pieces[color.index()][piece.index()]
    }

    #[inline]
    pub(crate) fn occupied_by(&self, color: Color) -> Bitboard {
        self.occupied[color.index()]
    }

    /// The side's king square. Every legal position has exactly one king
    /// per side.
    #[inline]
    pub(crate) fn king_square(&self, color: Color) -> Square {
        self.pieces_of(color, Piece::King).lowest_set()
    }

    /// Game phase: the number of men on the board, 32 at the start.
    #[inline]
    pub(crate) fn phase(&self) -> u32 {
        self.all_occupied.popcount()
    }

    #[inline]
    pub(crate) fn piece_count(&self) -> u32 {
        self.all_occupied.popcount()
    }

    /// True if the side owns anything beyond king and pawns.
    #[inline]
    pub(crate) fn has_non_pawn_material(&self, color: Color) -> bool {
        let c = color.index();
        !(self.pieces[c][Piece::Knight.index()]
            | self.pieces[c][Piece::Bishop.index()]
            | self.pieces[c][Piece::Rook.index()]
            | self.pieces[c][Piece::Queen.index()])
        .is_empty()
    }

    /// Bishops and queens of both colours.
    #[inline]
    pub(crate) fn diagonal_sliders(&self) -> Bitboard {
        self.pieces_of(Color::White, Piece::Bishop)
            | self.pieces_of(Color::Black, Piece::Bishop)
            | self.pieces_of(Color::White, Piece::Queen)
            | self.pieces_of(Color::Black, Piece::Queen)
    }

    /// Rooks and queens of both colours.
    #[inline]
    pub(crate) fn straight_sliders(&self) -> Bitboard {
        self.pieces_of(Color::White, Piece::Rook)
            | self.pieces_of(Color::Black, Piece::Rook)
            | self.pieces_of(Color::White, Piece::Queen)
            | self.pieces_of(Color::Black, Piece::Queen)
    }

    pub(crate) fn set_piece(&mut self, sq: Square, color: Color, piece: Piece) {
        let bit = Bitboard::from_square(sq);
        self.mailbox[sq.index()] = Some(piece);
        self.pieces[color.index()][piece.index()] |= bit;
        self.occupied[color.index()] |= bit;
        self.all_occupied |= bit;
    }

    pub(crate) fn remove_piece(&mut self, sq: Square, color: Color, piece: Piece) {
        let bit = Bitboard::from_square(sq);
        self.mailbox[sq.index()] = None;
        self.pieces[color.index()][piece.index()] &= !bit;
        self.occupied[color.index()] &= !bit;
        self.all_occupied &= !bit;
    }

    // =====================================================================
    // Derived state
    // =====================================================================

    /// Recompute every hash and accumulator from the mailbox. The FEN
    /// loader calls this once; everything else updates incrementally.
    pub(crate) fn rebuild_derived(&mut self) {
        self.hash = self.compute_hash();
        self.pawn_hash = self.compute_pawn_hash();
        self.material_hash = self.compute_material_hash();
        let (material, pst) = self.compute_material_pst();
        self.material = material;
        self.pst = pst;
    }

    pub(crate) fn compute_hash(&self) -> u64 {
        let keys = &*ZOBRIST;
        let mut hash = 0u64;

        for color in [Color::White, Color::Black] {
            for piece in ALL_PIECES {
                for sq in self.pieces_of(color, piece) {
                    hash ^= keys.pieces[color.index()][piece.index()][sq.index()];
                }
            }
        }

        if self.side_to_move == Color::Black {
            hash ^= keys.side_to_move;
        }
        hash ^= keys.castling_keys(self.castling_rights.as_u8());
        if let Some(ep) = self.en_passant {
            hash ^= keys.en_passant_file[ep.file()];
        }

        hash
    }

    pub(crate) fn compute_pawn_hash(&self) -> u64 {
        let keys = &*ZOBRIST;
        let mut hash = 0u64;
        for color in [Color::White, Color::Black] {
            for sq in self.pieces_of(color, Piece::Pawn) {
                hash ^= keys.pawns[color.index()][sq.index()];
            }
        }
        hash
    }

    pub(crate) fn compute_material_hash(&self) -> u64 {
        let keys = &*ZOBRIST;
        let mut hash = 0u64;
        for color in [Color::White, Color::Black] {
            for piece in ALL_PIECES {
                let count = self.pieces_of(color, piece).popcount() as usize;
                hash ^= keys.material[color.index()][piece.index()][count];
            }
        }
        hash
    }

    pub(crate) fn compute_material_pst(&self) -> (TaperedScore, TaperedScore) {
        let mut material = TaperedScore::ZERO;
        let mut pst = TaperedScore::ZERO;
        for color in [Color::White, Color::Black] {
            for piece in ALL_PIECES {
                for sq in self.pieces_of(color, piece) {
                    match color {
                        Color::White => {
                            material += material_value(piece);
                            pst += pst_value(color, piece, sq);
                        }
                        Color::Black => {
                            material -= material_value(piece);
                            pst -= pst_value(color, piece, sq);
                        }
                    }
                }
            }
        }
        (material, pst)
    }

    // =====================================================================
    // Draw rules
    // =====================================================================

    /// Fifty-move rule: one hundred reversible half-moves.
    #[inline]
    #[must_use]
    pub fn is_draw_by_fifty(&self) -> bool {
        self.halfmove_clock >= 100
    }

    /// Neither side can possibly deliver mate: bare kings, a single minor
    /// piece, or same-coloured bishops only.
    #[must_use]
    pub fn is_insufficient_material(&self) -> bool {
        let pawns = self.pieces_of(Color::White, Piece::Pawn)
            | self.pieces_of(Color::Black, Piece::Pawn);
        let majors = self.straight_sliders();
        if !(pawns | majors).is_empty() {
            return false;
        }

        let knights = self.pieces_of(Color::White, Piece::Knight)
            | self.pieces_of(Color::Black, Piece::Knight);
        let bishops = self.pieces_of(Color::White, Piece::Bishop)
            | self.pieces_of(Color::Black, Piece::Bishop);
        let minors = knights.popcount() + bishops.popcount();

        if minors <= 1 {
            return true;
        }

        if knights.is_empty() && bishops.popcount() == 2 {
            return (bishops & Bitboard::LIGHT_SQUARES).is_empty()
                || (bishops & Bitboard::DARK_SQUARES).is_empty();
        }

        false
    }

    /// A move resets the halfmove clock (and the repetition horizon) when
    /// it moves a pawn or captures.
    #[inline]
    pub(crate) fn move_is_irreversible(&self, mv: super::types::Move) -> bool {
        mv.is_capture() || self.piece_at(mv.from()) == Some(Piece::Pawn)
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::starting_position()
    }
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Board {{")?;
        for rank in 0..8 {
            write!(f, "  ")?;
            for file in 0..8 {
                let sq = Square::new(rank, file);
                let c = match (self.piece_at(sq), self.color_at(sq)) {
                    (Some(piece), Some(color)) => piece.to_fen_char(color),
                    _ => '.',
                };
                write!(f, "{c} ")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "  {} to move, hash {:016x}", self.side_to_move, self.hash)?;
        write!(f, "}}")
    }
}
