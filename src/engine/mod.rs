//! The engine facade: position stack, clock, search state, and the
//! operations the protocol layer calls.

mod params;

pub use params::EngineParams;

use std::path::Path;

use crate::board::{Board, FenError, Move, MoveParseError, PersonalityError, Score};
use crate::search::{
    iterative_deepening, Clock, InfoCallback, SearchReport, SearchState,
};
use crate::tt::DEFAULT_TT_MB;

/// A running engine: the game history as a stack of positions (undo pops),
/// the search clock, and the state that persists across searches.
pub struct Engine {
    boards: Vec<Board>,
    /// `irreversible[i]`: the move that produced `boards[i]` reset the
    /// repetition horizon. The seed position is always a horizon.
    irreversible: Vec<bool>,
    state: SearchState,
    clock: Clock,
    params: EngineParams,
}

impl Engine {
    #[must_use]
    pub fn new() -> Self {
        Engine {
            boards: vec![Board::starting_position()],
            irreversible: vec![true],
            state: SearchState::new(DEFAULT_TT_MB),
            clock: Clock::new(),
            params: EngineParams::default(),
        }
    }

    /// Reset to the starting position and forget all cached search state.
    pub fn new_game(&mut self) {
        self.boards = vec![Board::starting_position()];
        self.irreversible = vec![true];
        self.state.reset();
    }

    /// Load a position; the game history restarts from it.
    pub fn set_position(&mut self, fen: &str) -> Result<(), FenError> {
        let board = Board::try_from_fen(fen)?;
        self.boards = vec![board];
        self.irreversible = vec![true];
        Ok(())
    }

    /// The position on top of the stack.
    #[must_use]
    pub fn current(&self) -> &Board {
        &self.boards[self.boards.len() - 1]
    }

    /// Parse and play a move in long algebraic notation.
    pub fn apply_move(&mut self, text: &str) -> Result<Move, MoveParseError> {
        let board = self.boards[self.boards.len() - 1];
        let mv = board.parse_move(text)?;
        self.push_move(mv);
        Ok(mv)
    }

    /// Play an already-validated move.
    pub fn push_move(&mut self, mv: Move) {
        let board = self.boards[self.boards.len() - 1];
        self.irreversible.push(board.move_is_irreversible(mv));
        self.boards.push(board.make(mv));
    }

    /// Pop the last move; false when already at the stack bottom.
    pub fn undo(&mut self) -> bool {
        if self.boards.len() > 1 {
            self.boards.pop();
            self.irreversible.pop();
            true
        } else {
            false
        }
    }

    /// Search the current position under the configured clock and return
    /// the best move, line, and score of the last completed iteration.
    pub fn best_move(&mut self, callback: Option<InfoCallback<'_>>) -> SearchReport {
        let board = self.boards[self.boards.len() - 1];
        let history: Vec<(u64, bool)> = self
            .boards
            .iter()
            .map(Board::hash)
            .zip(self.irreversible.iter().copied())
            .collect();

        let report = iterative_deepening(
            &board,
            &history,
            &mut self.state,
            &self.params.search,
            &self.params.eval,
            &mut self.clock,
            callback,
        );
        self.clock.decrement_moves_left();
        report
    }

    /// Static evaluation of the current position, side to move's view.
    #[must_use]
    pub fn static_eval(&self) -> Score {
        self.current().evaluate_full(&self.params.eval)
    }

    /// Leaf count at `depth` from the current position.
    #[must_use]
    pub fn perft(&self, depth: u32) -> u64 {
        self.current().perft(depth)
    }

    /// Per-root-move leaf counts.
    #[must_use]
    pub fn perft_divide(&self, depth: u32) -> Vec<(Move, u64)> {
        self.current().perft_divide(depth)
    }

    /// Current position as FEN.
    #[must_use]
    pub fn to_fen(&self) -> String {
        self.current().to_fen()
    }

    /// Override one named parameter.
    pub fn set_parameter(&mut self, name: &str, value: Score) -> Result<(), PersonalityError> {
        self.params.set(name, value)
    }

    /// Apply a personality file of `name value` overrides.
    pub fn load_personality(&mut self, path: &Path) -> Result<usize, PersonalityError> {
        self.params.load_personality(path)
    }

    /// The search clock, for the protocol layer's time commands.
    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    /// True when the current position is already drawn by rule: fifty
    /// moves, bare material, or threefold repetition of the game history.
    #[must_use]
    pub fn is_drawn(&self) -> bool {
        let current = self.current();
        if current.is_draw_by_fifty() || current.is_insufficient_material() {
            return true;
        }
        let occurrences = self
            .boards
            .iter()
            .filter(|b| b.hash() == current.hash())
            .count();
        occurrences >= 3
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}
