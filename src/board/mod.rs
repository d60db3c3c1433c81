//! Chess board representation and game rules.
//!
//! Positions are immutable values: [`Board::make`] returns a derived
//! position and never mutates the parent. Bitboards use the A8 = 0 ..
//! H1 = 63 square layout (rank-major from the top-left), so "forward" for
//! White is a shift toward lower indices.
//!
//! # Example
//! ```
//! use jing_wei::board::Board;
//!
//! let board = Board::starting_position();
//! let moves = board.generate_moves();
//! assert_eq!(moves.len(), 20);
//! ```

pub(crate) mod attack_tables;
mod attacks;
#[cfg(debug_assertions)]
mod debug;
pub(crate) mod endgame;
mod error;
pub(crate) mod eval;
mod fen;
mod make;
mod movegen;
mod see;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use error::{FenError, MoveParseError, PersonalityError};
pub use eval::EvalParams;
pub use state::Board;
pub use types::{
    distance_to_mate, is_loss_score, is_mate_score, is_win_score, lost_in, win_in, Bitboard,
    CastlingRights, Color, Move, MoveList, Piece, Score, Square, TaperedScore, DRAW_SCORE,
    INFINITE_SCORE, INVALID_SCORE, MAX_PLY, NO_SCORE, PAWN_SCORE, WIN_SCORE,
};

pub(crate) use see::piece_value;
