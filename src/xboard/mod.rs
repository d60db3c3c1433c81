//! The XBoard protocol loop.
//!
//! A thin, single-threaded line loop: each command maps to one engine
//! facade call. Thinking output follows the classic
//! `<depth> <score> <centiseconds> <nodes> <pv>` shape on every completed
//! iteration.

pub mod command;
pub mod output;

use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::engine::Engine;
use crate::search::IterationInfo;

use command::{parse_command, Command};
use output::{format_features, format_move, format_pong, format_thinking};

#[cfg(feature = "logging")]
use log::warn;

/// Protocol handler state: the engine plus force mode.
pub struct XBoardHandler {
    engine: Engine,
    /// In force mode the engine plays no replies of its own.
    force_mode: bool,
}

impl XBoardHandler {
    #[must_use]
    pub fn new() -> Self {
        XBoardHandler {
            engine: Engine::new(),
            force_mode: false,
        }
    }

    /// Run the blocking stdin loop until `quit` or end of input.
    pub fn run(&mut self) {
        let stdin = io::stdin();
        let mut stdout = io::stdout();

        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let Some(command) = parse_command(&line) else {
                continue;
            };
            let quit = command == Command::Quit;

            for reply in self.handle_command(command) {
                writeln!(stdout, "{reply}").ok();
            }
            stdout.flush().ok();

            if quit {
                break;
            }
        }
    }

    /// Dispatch one command; returned lines go to stdout in order.
    pub fn handle_command(&mut self, command: Command) -> Vec<String> {
        match command {
            Command::XBoard => vec![format_features()],
            Command::Protover(_) => vec![format_features()],
            Command::New => {
                self.engine.new_game();
                self.force_mode = false;
                Vec::new()
            }
            Command::SetBoard(fen) => match self.engine.set_position(&fen) {
                Ok(()) => Vec::new(),
                Err(err) => vec![format!("tellusererror Illegal position: {err}")],
            },
            Command::UserMove(text) => self.handle_user_move(&text),
            Command::Go => {
                self.force_mode = false;
                self.reply_with_move()
            }
            Command::Force => {
                self.force_mode = true;
                Vec::new()
            }
            Command::Undo => {
                self.engine.undo();
                Vec::new()
            }
            Command::SetDepth(depth) => {
                self.engine.clock_mut().set_fixed_depth(depth);
                Vec::new()
            }
            Command::SetTime(ms) => {
                self.engine.clock_mut().set_fixed_time(ms);
                Vec::new()
            }
            Command::SetNodes(nodes) => {
                self.engine.clock_mut().set_fixed_nodes(nodes);
                Vec::new()
            }
            Command::Level {
                moves_per_session,
                base_ms,
                increment_ms,
            } => {
                self.engine
                    .clock_mut()
                    .set_tournament(moves_per_session, base_ms, increment_ms);
                Vec::new()
            }
            Command::Time(ms) => {
                self.engine.clock_mut().set_engine_time_left(ms);
                Vec::new()
            }
            Command::OTime(ms) => {
                self.engine.clock_mut().set_opponent_time_left(ms);
                Vec::new()
            }
            Command::Nps(nps) => {
                self.engine.clock_mut().set_fake_nps(nps);
                Vec::new()
            }
            Command::Perft(depth) => {
                vec![format!("perft {} = {}", depth, self.engine.perft(depth))]
            }
            Command::Eval => vec![format!("eval {}", self.engine.static_eval())],
            Command::Fen => vec![self.engine.to_fen()],
            Command::SetValue { name, value } => {
                match self.engine.set_parameter(&name, value) {
                    Ok(()) => Vec::new(),
                    Err(err) => {
                        report_error(&err.to_string());
                        Vec::new()
                    }
                }
            }
            Command::Personality(path) => {
                match self.engine.load_personality(Path::new(&path)) {
                    Ok(_) => Vec::new(),
                    Err(err) => {
                        report_error(&err.to_string());
                        Vec::new()
                    }
                }
            }
            Command::Result(_) => {
                // the game is over; stop replying until a new game starts
                self.force_mode = true;
                Vec::new()
            }
            Command::Ping(n) => vec![format_pong(n)],
            Command::Quit => Vec::new(),
            Command::Unknown(text) => {
                report_error(&format!("unknown command '{text}'"));
                Vec::new()
            }
        }
    }

    fn handle_user_move(&mut self, text: &str) -> Vec<String> {
        match self.engine.apply_move(text) {
            Ok(_) => {
                if self.force_mode {
                    Vec::new()
                } else {
                    self.reply_with_move()
                }
            }
            Err(_) => vec![format!("Illegal move: {text}")],
        }
    }

    /// Search, print thinking lines and the chosen move, and play it.
    fn reply_with_move(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        let report = {
            let mut on_iteration = |info: &IterationInfo| {
                lines.push(format_thinking(info));
            };
            self.engine.best_move(Some(&mut on_iteration))
        };

        match report.best_move {
            Some(mv) => {
                self.engine.push_move(mv);
                lines.push(format_move(mv));
            }
            None => {
                // mated or stalemated: nothing to play
                if self.engine.is_drawn() {
                    lines.push("1/2-1/2 {Draw}".to_string());
                }
            }
        }
        lines
    }
}

impl Default for XBoardHandler {
    fn default() -> Self {
        XBoardHandler::new()
    }
}

/// Protocol-breaking diagnostics go to stderr, never stdout.
fn report_error(message: &str) {
    #[cfg(feature = "logging")]
    warn!("{message}");
    eprintln!("jing-wei: {message}");
}

/// Entry point for the binary.
pub fn run_xboard() {
    let mut handler = XBoardHandler::new();
    handler.run();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(handler: &mut XBoardHandler, line: &str) -> Vec<String> {
        handler.handle_command(parse_command(line).expect("parseable command"))
    }

    #[test]
    fn test_xboard_announces_features() {
        let mut handler = XBoardHandler::new();
        let replies = cmd(&mut handler, "xboard");
        assert_eq!(replies.len(), 1);
        assert!(replies[0].contains("setboard=1"));
    }

    #[test]
    fn test_ping_pong() {
        let mut handler = XBoardHandler::new();
        assert_eq!(cmd(&mut handler, "ping 42"), vec!["pong 42".to_string()]);
    }

    #[test]
    fn test_force_mode_suppresses_replies() {
        let mut handler = XBoardHandler::new();
        cmd(&mut handler, "force");
        let replies = cmd(&mut handler, "usermove e2e4");
        assert!(replies.is_empty());
    }

    #[test]
    fn test_usermove_triggers_reply() {
        let mut handler = XBoardHandler::new();
        cmd(&mut handler, "sd 2");
        let replies = cmd(&mut handler, "usermove e2e4");
        let move_line = replies.last().expect("engine must reply");
        assert!(move_line.starts_with("move "), "got {move_line}");
    }

    #[test]
    fn test_thinking_lines_have_five_fields() {
        let mut handler = XBoardHandler::new();
        cmd(&mut handler, "sd 3");
        let replies = cmd(&mut handler, "go");
        assert!(replies.len() >= 2, "thinking lines plus the move");
        let thinking = &replies[0];
        assert!(thinking.split_whitespace().count() >= 5, "got {thinking}");
    }

    #[test]
    fn test_fen_and_eval() {
        let mut handler = XBoardHandler::new();
        cmd(&mut handler, "force");
        let fen_out = cmd(&mut handler, "fen");
        assert_eq!(
            fen_out,
            vec!["rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1".to_string()]
        );
        let eval_out = cmd(&mut handler, "eval");
        assert!(eval_out[0].starts_with("eval "));
    }

    #[test]
    fn test_perft_command() {
        let mut handler = XBoardHandler::new();
        let out = cmd(&mut handler, "perft 3");
        assert_eq!(out, vec!["perft 3 = 8902".to_string()]);
    }

    #[test]
    fn test_setboard_and_undo() {
        let mut handler = XBoardHandler::new();
        cmd(&mut handler, "force");
        let fen = "4k3/8/8/8/8/8/8/4K2R w K - 0 1";
        assert!(cmd(&mut handler, &format!("setboard {fen}")).is_empty());
        cmd(&mut handler, "usermove h1h8");
        cmd(&mut handler, "undo");
        assert_eq!(cmd(&mut handler, "fen"), vec![fen.to_string()]);
    }

    #[test]
    fn test_illegal_setboard_reports() {
        let mut handler = XBoardHandler::new();
        let replies = cmd(&mut handler, "setboard banana");
        assert!(replies[0].contains("Illegal position"));
    }

    #[test]
    fn test_result_enters_force_mode() {
        let mut handler = XBoardHandler::new();
        cmd(&mut handler, "result 1-0 {mate}");
        assert!(handler.force_mode);
    }

    #[test]
    fn test_setvalue() {
        let mut handler = XBoardHandler::new();
        assert!(cmd(&mut handler, "setvalue tempo 30").is_empty());
        // unknown names are logged, not echoed to stdout
        assert!(cmd(&mut handler, "setvalue bogus 1").is_empty());
    }
}
