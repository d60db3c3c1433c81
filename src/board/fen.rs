//! FEN parsing and emission, plus long-algebraic move parsing.

use std::str::FromStr;

use super::attack_tables::pawn_attacks;
use super::error::{FenError, MoveParseError};
use super::state::Board;
use super::types::{CastlingRights, Color, Move, Piece, Square};

impl Board {
    /// Parse a FEN string. The halfmove clock and fullmove number are
    /// optional and default to `0 1`.
    pub fn try_from_fen(fen: &str) -> Result<Self, FenError> {
        let mut board = Board::empty();
        let parts: Vec<&str> = fen.split_whitespace().collect();

        if parts.len() < 4 {
            return Err(FenError::TooFewParts { found: parts.len() });
        }

        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidPlacement);
        }
        for (rank, rank_str) in ranks.iter().enumerate() {
            let mut file = 0usize;
            for c in rank_str.chars() {
                if let Some(run) = c.to_digit(10) {
                    file += run as usize;
                } else {
                    let color = if c.is_ascii_uppercase() {
                        Color::White
                    } else {
                        Color::Black
                    };
                    let piece = Piece::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                    if file >= 8 {
                        return Err(FenError::InvalidPlacement);
                    }
                    board.set_piece(Square::new(rank, file), color, piece);
                    file += 1;
                }
            }
            if file > 8 {
                return Err(FenError::InvalidPlacement);
            }
        }

        for color in [Color::White, Color::Black] {
            if !board.pieces_of(color, Piece::King).is_single() {
                return Err(FenError::BadKingCount);
            }
        }

        board.side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        let mut rights = CastlingRights::none();
        for c in parts[2].chars() {
            match c {
                'K' => rights.set(Color::White, true),
                'Q' => rights.set(Color::White, false),
                'k' => rights.set(Color::Black, true),
                'q' => rights.set(Color::Black, false),
                '-' => {}
                _ => return Err(FenError::InvalidCastling { char: c }),
            }
        }
        // rights are only meaningful while king and rook sit on their
        // home squares
        for (color, back) in [(Color::White, 7usize), (Color::Black, 0usize)] {
            let king_home = board.piece_at(Square::new(back, 4)) == Some(Piece::King)
                && board.color_at(Square::new(back, 4)) == Some(color);
            for (kingside, rook_file) in [(true, 7usize), (false, 0usize)] {
                let rook_home = board.piece_at(Square::new(back, rook_file)) == Some(Piece::Rook)
                    && board.color_at(Square::new(back, rook_file)) == Some(color);
                if !(king_home && rook_home) {
                    rights.remove(color, kingside);
                }
            }
        }
        board.castling_rights = rights;

        board.en_passant = if parts[3] == "-" {
            None
        } else {
            let sq: Square = parts[3].parse().map_err(|()| FenError::InvalidEnPassant {
                found: parts[3].to_string(),
            })?;
            Some(sq)
        };
        // the en passant target only persists when a capturer is actually
        // in place, keeping hashes of transposed positions identical
        if let Some(ep) = board.en_passant {
            let capturers =
                pawn_attacks(board.side_to_move.opponent(), ep)
                    & board.pieces_of(board.side_to_move, Piece::Pawn);
            if capturers.is_empty() {
                board.en_passant = None;
            }
        }

        if parts.len() >= 5 {
            board.halfmove_clock = parts[4].parse().map_err(|_| FenError::InvalidCounter {
                found: parts[4].to_string(),
            })?;
        }
        if parts.len() >= 6 {
            board.fullmove_number = parts[5].parse().map_err(|_| FenError::InvalidCounter {
                found: parts[5].to_string(),
            })?;
            board.fullmove_number = board.fullmove_number.max(1);
        }

        board.rebuild_derived();
        Ok(board)
    }

    /// Parse a FEN string.
    ///
    /// # Panics
    /// Panics on malformed FEN; use [`Board::try_from_fen`] to handle
    /// errors.
    #[must_use]
    pub fn from_fen(fen: &str) -> Self {
        match Self::try_from_fen(fen) {
            Ok(board) => board,
            Err(err) => panic!("invalid FEN '{fen}': {err}"),
        }
    }

    /// Emit the position as a FEN string.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut placement = String::new();
        for rank in 0..8 {
            let mut empty = 0;
            for file in 0..8 {
                let sq = Square::new(rank, file);
                match (self.piece_at(sq), self.color_at(sq)) {
                    (Some(piece), Some(color)) => {
                        if empty > 0 {
                            placement.push_str(&empty.to_string());
                            empty = 0;
                        }
                        placement.push(piece.to_fen_char(color));
                    }
                    _ => empty += 1,
                }
            }
            if empty > 0 {
                placement.push_str(&empty.to_string());
            }
            if rank < 7 {
                placement.push('/');
            }
        }

        let side = match self.side_to_move {
            Color::White => "w",
            Color::Black => "b",
        };

        let mut castling = String::new();
        if self.castling_rights.has(Color::White, true) {
            castling.push('K');
        }
        if self.castling_rights.has(Color::White, false) {
            castling.push('Q');
        }
        if self.castling_rights.has(Color::Black, true) {
            castling.push('k');
        }
        if self.castling_rights.has(Color::Black, false) {
            castling.push('q');
        }
        if castling.is_empty() {
            castling.push('-');
        }

        let ep = self
            .en_passant
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());

        format!(
            "{placement} {side} {castling} {ep} {} {}",
            self.halfmove_clock, self.fullmove_number
        )
    }

    /// Parse a move in long algebraic notation (`e2e4`, `e7e8q`) against
    /// the legal moves of this position.
    pub fn parse_move(&self, text: &str) -> Result<Move, MoveParseError> {
        if !text.is_ascii() || text.len() < 4 || text.len() > 5 {
            return Err(MoveParseError::InvalidLength { len: text.len() });
        }

        let from: Square = text[0..2]
            .parse()
            .map_err(|()| MoveParseError::InvalidSquare {
                notation: text.to_string(),
            })?;
        let to: Square = text[2..4]
            .parse()
            .map_err(|()| MoveParseError::InvalidSquare {
                notation: text.to_string(),
            })?;

        let promotion = match text.chars().nth(4) {
            None => None,
            Some(c) => {
                let piece =
                    Piece::from_char(c).ok_or(MoveParseError::InvalidPromotion { char: c })?;
                if matches!(piece, Piece::Pawn | Piece::King) {
                    return Err(MoveParseError::InvalidPromotion { char: c });
                }
                Some(piece)
            }
        };

        let legal = self.generate_moves();
        for mv in &legal {
            if mv.from() == from && mv.to() == to && mv.promoted_to() == promotion {
                return Ok(*mv);
            }
        }

        Err(MoveParseError::IllegalMove {
            notation: text.to_string(),
        })
    }
}

impl FromStr for Board {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::try_from_fen(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starting_position_roundtrip() {
        let board = Board::starting_position();
        assert_eq!(
            board.to_fen(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
        );
    }

    #[test]
    fn test_kiwipete_roundtrip() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
        let board = Board::from_fen(fen);
        assert_eq!(board.to_fen(), fen);
    }

    #[test]
    fn test_en_passant_target_requires_capturer() {
        // no black pawn can take on e3, so the target is dropped
        let board = Board::from_fen(
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
        );
        assert_eq!(board.en_passant, None);

        // with a black pawn on d4 the target is kept
        let board = Board::from_fen(
            "rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 2",
        );
        assert_eq!(board.en_passant, Some("e3".parse().unwrap()));
    }

    #[test]
    fn test_rejects_malformed_fens() {
        assert!(matches!(
            Board::try_from_fen("8/8/8/8 w"),
            Err(FenError::TooFewParts { .. })
        ));
        assert!(Board::try_from_fen("9/8/8/8/8/8/8/8 w - - 0 1").is_err());
        assert!(matches!(
            Board::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1"),
            Err(FenError::InvalidSideToMove { .. })
        ));
        assert!(matches!(
            Board::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQxq - 0 1"),
            Err(FenError::InvalidCastling { .. })
        ));
        assert!(matches!(
            Board::try_from_fen("8/8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::BadKingCount)
        ));
    }

    #[test]
    fn test_counters_parsed() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 37 81");
        assert_eq!(board.halfmove_clock(), 37);
        assert_eq!(board.fullmove_number(), 81);
    }

    #[test]
    fn test_parse_move() {
        let board = Board::starting_position();
        let mv = board.parse_move("e2e4").unwrap();
        assert_eq!(mv.to_string(), "e2e4");

        assert!(matches!(
            board.parse_move("e2e5"),
            Err(MoveParseError::IllegalMove { .. })
        ));
        assert!(matches!(
            board.parse_move("e2"),
            Err(MoveParseError::InvalidLength { .. })
        ));
        assert!(matches!(
            board.parse_move("z2e4"),
            Err(MoveParseError::InvalidSquare { .. })
        ));
    }

    #[test]
    fn test_parse_promotion_move() {
        let board = Board::from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1");
        let mv = board.parse_move("a7a8q").unwrap();
        assert_eq!(mv.promoted_to(), Some(Piece::Queen));
        assert!(matches!(
            board.parse_move("a7a8k"),
            Err(MoveParseError::InvalidPromotion { .. })
        ));
    }
}
