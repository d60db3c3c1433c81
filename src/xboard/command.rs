//! XBoard command parsing.

/// The command surface the engine answers to. Anything else is reported
/// as [`Command::Unknown`] and otherwise ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    XBoard,
    Protover(u32),
    New,
    SetBoard(String),
    UserMove(String),
    Go,
    Force,
    Undo,
    /// `sd <n>`: fixed depth.
    SetDepth(i32),
    /// `st <seconds>`: fixed time per move.
    SetTime(u64),
    /// `sn <n>`: fixed nodes.
    SetNodes(u64),
    /// `level <moves> <base> <increment-seconds>`.
    Level {
        moves_per_session: u32,
        base_ms: u64,
        increment_ms: u64,
    },
    /// `time <centiseconds>`: engine clock.
    Time(u64),
    /// `otim <centiseconds>`: opponent clock.
    OTime(u64),
    /// `nps <n>`: fake nodes-per-second timing.
    Nps(u64),
    Perft(u32),
    Eval,
    Fen,
    SetValue {
        name: String,
        value: i32,
    },
    Personality(String),
    Result(String),
    Ping(u32),
    Quit,
    Unknown(String),
}

/// Parse a `level` base field: minutes, or `minutes:seconds`.
fn parse_base_ms(text: &str) -> Option<u64> {
    match text.split_once(':') {
        Some((minutes, seconds)) => {
            let minutes: u64 = minutes.parse().ok()?;
            let seconds: u64 = seconds.parse().ok()?;
            Some((minutes * 60 + seconds) * 1000)
        }
        None => {
            let minutes: u64 = text.parse().ok()?;
            Some(minutes * 60 * 1000)
        }
    }
}

/// Parse one input line into a command. Returns `None` for blank lines.
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let mut tokens = line.split_whitespace();
    let keyword = tokens.next()?;
    let rest = || line[keyword.len()..].trim().to_string();

    let command = match keyword {
        "xboard" => Command::XBoard,
        "protover" => match tokens.next().and_then(|t| t.parse().ok()) {
            Some(version) => Command::Protover(version),
            None => Command::Unknown(line.to_string()),
        },
        "new" => Command::New,
        "setboard" => Command::SetBoard(rest()),
        "usermove" => match tokens.next() {
            Some(mv) => Command::UserMove(mv.to_string()),
            None => Command::Unknown(line.to_string()),
        },
        "go" => Command::Go,
        "force" => Command::Force,
        "undo" => Command::Undo,
        "sd" => match tokens.next().and_then(|t| t.parse().ok()) {
            Some(depth) => Command::SetDepth(depth),
            None => Command::Unknown(line.to_string()),
        },
        "st" => match tokens.next().and_then(|t| t.parse::<u64>().ok()) {
            Some(seconds) => Command::SetTime(seconds * 1000),
            None => Command::Unknown(line.to_string()),
        },
        "sn" => match tokens.next().and_then(|t| t.parse().ok()) {
            Some(nodes) => Command::SetNodes(nodes),
            None => Command::Unknown(line.to_string()),
        },
        "level" => {
            let moves = tokens.next().and_then(|t| t.parse().ok());
            let base = tokens.next().and_then(parse_base_ms);
            let increment = tokens.next().and_then(|t| t.parse::<u64>().ok());
            match (moves, base, increment) {
                (Some(moves_per_session), Some(base_ms), Some(increment_s)) => Command::Level {
                    moves_per_session,
                    base_ms,
                    increment_ms: increment_s * 1000,
                },
                _ => Command::Unknown(line.to_string()),
            }
        }
        "time" => match tokens.next().and_then(|t| t.parse::<u64>().ok()) {
            Some(cs) => Command::Time(cs * 10),
            None => Command::Unknown(line.to_string()),
        },
        "otim" => match tokens.next().and_then(|t| t.parse::<u64>().ok()) {
            Some(cs) => Command::OTime(cs * 10),
            None => Command::Unknown(line.to_string()),
        },
        "nps" => match tokens.next().and_then(|t| t.parse().ok()) {
            Some(nps) => Command::Nps(nps),
            None => Command::Unknown(line.to_string()),
        },
        "perft" => match tokens.next().and_then(|t| t.parse().ok()) {
            Some(depth) => Command::Perft(depth),
            None => Command::Unknown(line.to_string()),
        },
        "eval" => Command::Eval,
        "fen" => Command::Fen,
        "setvalue" => {
            let name = tokens.next();
            let value = tokens.next().and_then(|t| t.parse().ok());
            match (name, value) {
                (Some(name), Some(value)) => Command::SetValue {
                    name: name.to_string(),
                    value,
                },
                _ => Command::Unknown(line.to_string()),
            }
        }
        "personality" => match tokens.next() {
            Some(path) => Command::Personality(path.to_string()),
            None => Command::Unknown(line.to_string()),
        },
        "result" => Command::Result(rest()),
        "ping" => match tokens.next().and_then(|t| t.parse().ok()) {
            Some(n) => Command::Ping(n),
            None => Command::Unknown(line.to_string()),
        },
        "quit" | "exit" => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    };

    Some(command)
}
