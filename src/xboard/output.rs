//! XBoard output formatting.

use crate::board::{Move, Score};
use crate::search::IterationInfo;

/// The feature set announced on `xboard`.
#[must_use]
pub fn format_features() -> String {
    "feature setboard=1 usermove=1 time=1 analyze=0 myname=\"Jing Wei\" nps=1 done=1".to_string()
}

#[must_use]
pub fn format_move(mv: Move) -> String {
    format!("move {mv}")
}

#[must_use]
pub fn format_pong(n: u32) -> String {
    format!("pong {n}")
}

/// Mate scores use the conventional XBoard encoding: `100000 + moves`
/// from the winner's side.
#[must_use]
fn protocol_score(score: Score, mate_in: Option<i32>) -> Score {
    match mate_in {
        Some(moves) if moves > 0 => 100_000 + moves,
        Some(moves) => -100_000 + moves,
        None => score,
    }
}

/// A thinking line: `<depth> <score> <centiseconds> <nodes> <pv>`.
#[must_use]
pub fn format_thinking(info: &IterationInfo) -> String {
    format!(
        "{} {} {} {} {}",
        info.depth,
        protocol_score(info.score, info.mate_in),
        info.elapsed_cs,
        info.nodes,
        info.pv
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_line() {
        let features = format_features();
        assert!(features.starts_with("feature "));
        assert!(features.contains("setboard=1"));
        assert!(features.contains("usermove=1"));
        assert!(features.contains("nps=1"));
        assert!(features.contains("analyze=0"));
        assert!(features.ends_with("done=1"));
    }

    #[test]
    fn test_thinking_line() {
        let info = IterationInfo {
            depth: 8,
            score: 35,
            mate_in: None,
            elapsed_cs: 123,
            nodes: 45678,
            pv: "e2e4 e7e5".to_string(),
        };
        assert_eq!(format_thinking(&info), "8 35 123 45678 e2e4 e7e5");
    }

    #[test]
    fn test_mate_score_encoding() {
        assert_eq!(protocol_score(31_999, Some(1)), 100_001);
        assert_eq!(protocol_score(-31_998, Some(-1)), -100_001);
        assert_eq!(protocol_score(250, None), 250);
    }

    #[test]
    fn test_move_and_pong() {
        let mv = Move::new("e2".parse().unwrap(), "e4".parse().unwrap());
        assert_eq!(format_move(mv), "move e2e4");
        assert_eq!(format_pong(3), "pong 3");
    }
}
