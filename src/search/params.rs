//! Search tuning parameters, reachable through the engine's named
//! parameter surface.

use crate::board::Score;

#[derive(Clone, Debug)]
pub struct SearchParams {
    /// Initial aspiration half-window, doubled on every failure.
    pub aspiration_delta: Score,
    /// Reverse-futility margin per remaining depth.
    pub rfp_margin: Score,
    pub razor_base: Score,
    pub razor_per_depth: Score,
    /// Static eval must clear beta by this much before a null move is
    /// tried.
    pub null_move_margin: Score,
    /// Minimum game phase (men on the board) for null-move pruning.
    pub null_min_phase: i32,
    pub probcut_margin: Score,
    pub futility_base: Score,
    pub futility_per_depth: Score,
    /// Quiet moves with an exchange score below this are reduced further.
    pub see_reduction_threshold: Score,
    /// Quiescence delta-pruning safety margin.
    pub qsearch_delta_margin: Score,
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            aspiration_delta: 100,
            rfp_margin: 90,
            razor_base: 300,
            razor_per_depth: 60,
            null_move_margin: 0,
            null_min_phase: 9,
            probcut_margin: 200,
            futility_base: 100,
            futility_per_depth: 50,
            see_reduction_threshold: -100,
            qsearch_delta_margin: 200,
        }
    }
}
