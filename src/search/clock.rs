//! Time management: per-move budgets and the cooperative stop signal.

use std::time::Instant;

use crate::board::MAX_PLY;

/// How the current search is limited.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockMode {
    /// No limit set: run the minimum two iterations and stop.
    None,
    /// Fixed milliseconds per move.
    FixedTime(u64),
    /// Fixed iteration depth.
    FixedDepth(i32),
    /// Fixed node budget.
    FixedNodes(u64),
    /// Conventional-clock play: moves per session, base time, increment.
    Tournament {
        moves_per_session: u32,
        base_ms: u64,
        increment_ms: u64,
    },
}

/// Search clock. With a fake nodes-per-second rate set, the node counter
/// stands in for wall time everywhere, which makes timed searches
/// deterministic for testing.
pub struct Clock {
    mode: ClockMode,
    engine_time_left_ms: u64,
    opponent_time_left_ms: u64,
    moves_left: u32,
    fake_nps: u64,
    start: Instant,
    minimum_depth_reached: bool,
}

/// Keep a little slack against protocol and I/O latency.
const SAFETY_MARGIN_MS: u64 = 20;

impl Clock {
    #[must_use]
    pub fn new() -> Self {
        Clock {
            mode: ClockMode::None,
            engine_time_left_ms: 0,
            opponent_time_left_ms: 0,
            moves_left: 0,
            fake_nps: 0,
            start: Instant::now(),
            minimum_depth_reached: false,
        }
    }

    #[must_use]
    pub fn mode(&self) -> ClockMode {
        self.mode
    }

    pub fn set_fixed_time(&mut self, ms: u64) {
        self.mode = ClockMode::FixedTime(ms);
    }

    pub fn set_fixed_depth(&mut self, depth: i32) {
        self.mode = ClockMode::FixedDepth(depth);
    }

    pub fn set_fixed_nodes(&mut self, nodes: u64) {
        self.mode = ClockMode::FixedNodes(nodes);
    }

    pub fn set_tournament(&mut self, moves_per_session: u32, base_ms: u64, increment_ms: u64) {
        self.mode = ClockMode::Tournament {
            moves_per_session,
            base_ms,
            increment_ms,
        };
        self.moves_left = moves_per_session;
        self.engine_time_left_ms = base_ms;
    }

    pub fn set_engine_time_left(&mut self, ms: u64) {
        self.engine_time_left_ms = ms;
    }

    pub fn set_opponent_time_left(&mut self, ms: u64) {
        self.opponent_time_left_ms = ms;
    }

    #[must_use]
    pub fn opponent_time_left(&self) -> u64 {
        self.opponent_time_left_ms
    }

    pub fn set_moves_left(&mut self, moves: u32) {
        self.moves_left = moves;
    }

    pub fn decrement_moves_left(&mut self) {
        if self.moves_left > 1 {
            self.moves_left -= 1;
        } else if let ClockMode::Tournament {
            moves_per_session, ..
        } = self.mode
        {
            // the session rolls over
            self.moves_left = moves_per_session.max(1);
        }
    }

    /// Treat `nodes / nps` as elapsed time instead of the wall clock.
    pub fn set_fake_nps(&mut self, nps: u64) {
        self.fake_nps = nps;
    }

    /// Restart the clock for a new search.
    pub fn start_clock(&mut self) {
        self.start = Instant::now();
        self.minimum_depth_reached = false;
    }

    /// Elapsed milliseconds, or the node-derived fake when an nps rate is
    /// set.
    #[must_use]
    pub fn elapsed_ms(&self, nodes: u64) -> u64 {
        if self.fake_nps > 0 {
            nodes.saturating_mul(1000) / self.fake_nps
        } else {
            self.start.elapsed().as_millis() as u64
        }
    }

    /// The per-move budget under tournament control.
    fn tournament_budget_ms(&self, increment_ms: u64, moves_per_session: u32) -> u64 {
        if moves_per_session == 0 {
            self.engine_time_left_ms / 30 + increment_ms
        } else if self.moves_left <= 1 {
            self.engine_time_left_ms
        } else {
            self.engine_time_left_ms / u64::from(self.moves_left) + increment_ms
        }
    }

    /// The cooperative stop check. Depth 2 always completes before any
    /// time limit is honoured, and tournament time is only inspected every
    /// 1024 nodes.
    pub fn should_continue(&mut self, depth: i32, nodes: u64) -> bool {
        if depth >= MAX_PLY as i32 {
            return false;
        }

        if !matches!(self.mode, ClockMode::FixedDepth(_)) && !self.minimum_depth_reached {
            if depth > 2 {
                self.minimum_depth_reached = true;
            } else {
                return true;
            }
        }

        match self.mode {
            ClockMode::None => false,
            ClockMode::FixedTime(max_ms) => self.elapsed_ms(nodes) < max_ms,
            ClockMode::FixedDepth(max_depth) => depth < max_depth,
            ClockMode::FixedNodes(max_nodes) => nodes < max_nodes,
            ClockMode::Tournament {
                moves_per_session,
                increment_ms,
                ..
            } => {
                if nodes % 1024 != 0 {
                    return true;
                }
                let budget = self.tournament_budget_ms(increment_ms, moves_per_session);
                self.elapsed_ms(nodes) < budget.saturating_sub(SAFETY_MARGIN_MS).max(1)
            }
        }
    }
}

impl Default for Clock {
    fn default() -> Self {
        Clock::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_clock_stops_after_minimum_depth() {
        let mut clock = Clock::new();
        clock.start_clock();
        assert!(clock.should_continue(2, 0), "depth 2 always runs");
        assert!(!clock.should_continue(3, 0), "no clock set: stop at 3");
    }

    #[test]
    fn test_fixed_depth() {
        let mut clock = Clock::new();
        clock.set_fixed_depth(5);
        clock.start_clock();
        assert!(clock.should_continue(4, 0));
        assert!(!clock.should_continue(5, 0));
    }

    #[test]
    fn test_fixed_nodes() {
        let mut clock = Clock::new();
        clock.set_fixed_nodes(1000);
        clock.start_clock();
        assert!(clock.should_continue(3, 999));
        assert!(!clock.should_continue(3, 1000));
    }

    #[test]
    fn test_fake_nps_makes_time_deterministic() {
        let mut clock = Clock::new();
        clock.set_fixed_time(100);
        clock.set_fake_nps(1000); // 1000 nodes = one second
        clock.start_clock();
        assert_eq!(clock.elapsed_ms(500), 500);
        assert!(clock.should_continue(3, 50));
        assert!(!clock.should_continue(3, 200));
    }

    #[test]
    fn test_minimum_depth_beats_time_limit() {
        let mut clock = Clock::new();
        clock.set_fixed_time(0);
        clock.set_fake_nps(1);
        clock.start_clock();
        // even with an exhausted budget, the minimum depth must complete
        assert!(clock.should_continue(2, 1_000_000));
        assert!(!clock.should_continue(3, 1_000_000));
    }

    #[test]
    fn test_tournament_budget() {
        let mut clock = Clock::new();
        clock.set_tournament(40, 60_000, 0);
        clock.set_fake_nps(1000);
        clock.start_clock();
        // 60s / 40 moves = 1.5s per move; 1000 fake nodes = 1s elapsed
        assert!(clock.should_continue(3, 1024));
        // 2048 fake nodes = ~2s: past budget
        assert!(!clock.should_continue(3, 2048));
        // off the 1024-node cadence the check is skipped
        assert!(clock.should_continue(3, 2049));
    }

    #[test]
    fn test_max_depth_cap() {
        let mut clock = Clock::new();
        clock.set_fixed_depth(500);
        assert!(!clock.should_continue(MAX_PLY as i32, 0));
    }
}
