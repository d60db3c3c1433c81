//! Zobrist key sets for the position, pawn-structure, and material hashes.
//!
//! Keys are drawn from a fixed-seed generator so hashes are reproducible
//! across runs, which the endgame recognizer table and the test suite both
//! rely on.

use once_cell::sync::Lazy;
use rand::prelude::*;

/// Upper bound on same-type piece count per side: two originals plus eight
/// promotions for knights, nine queens, and so on all fit below eleven.
pub(crate) const MAX_PIECE_COUNT: usize = 11;

pub(crate) struct ZobristKeys {
    /// `pieces[colour][piece][square]`
    pub(crate) pieces: [[[u64; 64]; 6]; 2],
    pub(crate) side_to_move: u64,
    /// One key per castling-right bit.
    pub(crate) castling: [u64; 4],
    /// Only the file of the en-passant target matters.
    pub(crate) en_passant_file: [u64; 8],
    /// `pawns[colour][square]`, a separate key set for the pawn hash.
    pub(crate) pawns: [[u64; 64]; 2],
    /// `material[colour][piece][count]`; the hash folds in one key per
    /// (colour, piece) at the current count, so it depends only on the
    /// material signature and not on piece placement.
    pub(crate) material: [[[u64; MAX_PIECE_COUNT]; 6]; 2],
}

impl ZobristKeys {
    fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(0x4a69_6e67_5765_6921);

        let mut pieces = [[[0u64; 64]; 6]; 2];
        for color in &mut pieces {
            for piece in color.iter_mut() {
                for key in piece.iter_mut() {
                    *key = rng.gen();
                }
            }
        }

        let side_to_move = rng.gen();

        let mut castling = [0u64; 4];
        for key in &mut castling {
            *key = rng.gen();
        }

        let mut en_passant_file = [0u64; 8];
        for key in &mut en_passant_file {
            *key = rng.gen();
        }

        let mut pawns = [[0u64; 64]; 2];
        for color in &mut pawns {
            for key in color.iter_mut() {
                *key = rng.gen();
            }
        }

        let mut material = [[[0u64; MAX_PIECE_COUNT]; 6]; 2];
        for color in &mut material {
            for piece in color.iter_mut() {
                for key in piece.iter_mut() {
                    *key = rng.gen();
                }
            }
        }

        ZobristKeys {
            pieces,
            side_to_move,
            castling,
            en_passant_file,
            pawns,
            material,
        }
    }

    /// XOR of the castling keys for every set bit of the rights mask.
    #[inline]
    pub(crate) fn castling_keys(&self, rights_mask: u8) -> u64 {
        let mut hash = 0;
        for (bit, key) in self.castling.iter().enumerate() {
            if rights_mask & (1 << bit) != 0 {
                hash ^= key;
            }
        }
        hash
    }
}

pub(crate) static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(ZobristKeys::new);
