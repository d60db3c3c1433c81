//! The named-parameter surface: `setvalue` overrides and personality
//! files.

use std::fs;
use std::path::Path;

use crate::board::eval::EvalParams;
use crate::board::{PersonalityError, Score};
use crate::search::SearchParams;

/// Every tunable knob of the engine, addressable by name. Tapered weights
/// expose `_mg` and `_eg` names for their two halves.
#[derive(Clone, Debug, Default)]
pub struct EngineParams {
    pub eval: EvalParams,
    pub search: SearchParams,
}

impl EngineParams {
    /// Apply one named override.
    pub fn set(&mut self, name: &str, value: Score) -> Result<(), PersonalityError> {
        match name {
            "tempo" => self.eval.tempo = value,
            "lazy_margin" => self.eval.lazy_margin = value,
            "knight_pair_mg" => self.eval.knight_pair.mg = value,
            "knight_pair_eg" => self.eval.knight_pair.eg = value,
            "bishop_pair_mg" => self.eval.bishop_pair.mg = value,
            "bishop_pair_eg" => self.eval.bishop_pair.eg = value,
            "rook_pair_mg" => self.eval.rook_pair.mg = value,
            "rook_pair_eg" => self.eval.rook_pair.eg = value,
            "queen_pair_mg" => self.eval.queen_pair.mg = value,
            "queen_pair_eg" => self.eval.queen_pair.eg = value,
            "knight_outpost_mg" => self.eval.knight_outpost.mg = value,
            "knight_outpost_eg" => self.eval.knight_outpost.eg = value,
            "bishop_outpost_mg" => self.eval.bishop_outpost.mg = value,
            "bishop_outpost_eg" => self.eval.bishop_outpost.eg = value,
            "bishop_pawn_color_mg" => self.eval.bishop_pawn_color.mg = value,
            "bishop_pawn_color_eg" => self.eval.bishop_pawn_color.eg = value,
            "rook_open_file_mg" => self.eval.rook_open_file.mg = value,
            "rook_open_file_eg" => self.eval.rook_open_file.eg = value,
            "rook_semi_open_file_mg" => self.eval.rook_semi_open_file.mg = value,
            "rook_semi_open_file_eg" => self.eval.rook_semi_open_file.eg = value,
            "doubled_rooks_mg" => self.eval.doubled_rooks.mg = value,
            "doubled_rooks_eg" => self.eval.doubled_rooks.eg = value,
            "king_shield_mg" => self.eval.king_shield.mg = value,
            "king_shield_eg" => self.eval.king_shield.eg = value,
            "king_zone_attack_mg" => self.eval.king_zone_attack.mg = value,
            "king_zone_attack_eg" => self.eval.king_zone_attack.eg = value,
            "passed_pawn_defended_mg" => self.eval.passed_pawn_defended.mg = value,
            "passed_pawn_defended_eg" => self.eval.passed_pawn_defended.eg = value,
            "aspiration_delta" => self.search.aspiration_delta = value,
            "rfp_margin" => self.search.rfp_margin = value,
            "razor_base" => self.search.razor_base = value,
            "razor_per_depth" => self.search.razor_per_depth = value,
            "null_move_margin" => self.search.null_move_margin = value,
            "null_min_phase" => self.search.null_min_phase = value,
            "probcut_margin" => self.search.probcut_margin = value,
            "futility_base" => self.search.futility_base = value,
            "futility_per_depth" => self.search.futility_per_depth = value,
            "see_reduction_threshold" => self.search.see_reduction_threshold = value,
            "qsearch_delta_margin" => self.search.qsearch_delta_margin = value,
            _ => {
                return Err(PersonalityError::UnknownParameter {
                    name: name.to_string(),
                })
            }
        }
        Ok(())
    }

    /// Load `name value` lines from a personality file. Blank lines and
    /// `#` comments are skipped; unknown names are reported to stderr and
    /// skipped rather than aborting the load. Returns the number of
    /// overrides applied.
    pub fn load_personality(&mut self, path: &Path) -> Result<usize, PersonalityError> {
        let contents = fs::read_to_string(path)?;
        let mut applied = 0;

        for (line_number, raw_line) in contents.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut tokens = line.split_whitespace();
            let (Some(name), Some(value_text), None) =
                (tokens.next(), tokens.next(), tokens.next())
            else {
                return Err(PersonalityError::MalformedLine {
                    line_number: line_number + 1,
                    line: line.to_string(),
                });
            };
            let value: Score =
                value_text
                    .parse()
                    .map_err(|_| PersonalityError::MalformedLine {
                        line_number: line_number + 1,
                        line: line.to_string(),
                    })?;

            match self.set(name, value) {
                Ok(()) => applied += 1,
                Err(err) => eprintln!("personality: {err}"),
            }
        }

        Ok(applied)
    }
}
