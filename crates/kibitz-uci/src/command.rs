//! Commands sent to the engine.

use std::fmt;
use std::time::Duration;

/// Limits for the `go` command.
///
/// All fields are optional; a bare `go` leaves the limits to the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoParams {
    /// White's remaining time.
    pub wtime: Option<Duration>,
    /// Black's remaining time.
    pub btime: Option<Duration>,
    /// White's increment per move.
    pub winc: Option<Duration>,
    /// Black's increment per move.
    pub binc: Option<Duration>,
    /// Moves until next time control.
    pub movestogo: Option<u32>,
    /// Search to this depth only.
    pub depth: Option<u32>,
    /// Search for exactly this duration.
    pub movetime: Option<Duration>,
    /// Search this many nodes only.
    pub nodes: Option<u64>,
    /// Search until `stop` (no time limit).
    pub infinite: bool,
}

impl GoParams {
    pub fn movetime(movetime: Duration) -> GoParams {
        GoParams {
            movetime: Some(movetime),
            ..GoParams::default()
        }
    }

    pub fn depth(depth: u32) -> GoParams {
        GoParams {
            depth: Some(depth),
            ..GoParams::default()
        }
    }

    pub fn infinite() -> GoParams {
        GoParams {
            infinite: true,
            ..GoParams::default()
        }
    }
}

impl fmt::Display for GoParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("go")?;
        let millis = [
            ("wtime", self.wtime),
            ("btime", self.btime),
            ("winc", self.winc),
            ("binc", self.binc),
        ];
        for (name, value) in millis {
            if let Some(value) = value {
                write!(f, " {name} {}", value.as_millis())?;
            }
        }
        if let Some(movestogo) = self.movestogo {
            write!(f, " movestogo {movestogo}")?;
        }
        if let Some(depth) = self.depth {
            write!(f, " depth {depth}")?;
        }
        if let Some(nodes) = self.nodes {
            write!(f, " nodes {nodes}")?;
        }
        if let Some(movetime) = self.movetime {
            write!(f, " movetime {}", movetime.as_millis())?;
        }
        if self.infinite {
            f.write_str(" infinite")?;
        }
        Ok(())
    }
}

/// A line of UCI input for the engine.
///
/// `Display` renders the exact text to send, without the newline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    /// `uci` -- ask the engine to identify itself.
    Uci,
    /// `isready` -- synchronization ping.
    IsReady,
    /// `ucinewgame` -- the next position is from a different game.
    UciNewGame,
    /// `position fen <fen> [moves ...]`
    Position { fen: String, moves: Vec<String> },
    /// `setoption name <name> [value <value>]`
    SetOption { name: String, value: Option<String> },
    /// `go ...`
    Go(GoParams),
    /// `stop` -- end the current search.
    Stop,
    /// `quit` -- exit the engine.
    Quit,
}

impl EngineCommand {
    pub fn position(fen: impl Into<String>) -> EngineCommand {
        EngineCommand::Position {
            fen: fen.into(),
            moves: Vec::new(),
        }
    }

    pub fn set_option(name: impl Into<String>, value: impl ToString) -> EngineCommand {
        EngineCommand::SetOption {
            name: name.into(),
            value: Some(value.to_string()),
        }
    }
}

impl fmt::Display for EngineCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineCommand::Uci => f.write_str("uci"),
            EngineCommand::IsReady => f.write_str("isready"),
            EngineCommand::UciNewGame => f.write_str("ucinewgame"),
            EngineCommand::Position { fen, moves } => {
                write!(f, "position fen {fen}")?;
                if !moves.is_empty() {
                    write!(f, " moves {}", moves.join(" "))?;
                }
                Ok(())
            }
            EngineCommand::SetOption { name, value } => {
                write!(f, "setoption name {name}")?;
                if let Some(value) = value {
                    write!(f, " value {value}")?;
                }
                Ok(())
            }
            EngineCommand::Go(params) => params.fmt(f),
            EngineCommand::Stop => f.write_str("stop"),
            EngineCommand::Quit => f.write_str("quit"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn render_simple_commands() {
        assert_eq!(EngineCommand::Uci.to_string(), "uci");
        assert_eq!(EngineCommand::IsReady.to_string(), "isready");
        assert_eq!(EngineCommand::UciNewGame.to_string(), "ucinewgame");
        assert_eq!(EngineCommand::Stop.to_string(), "stop");
        assert_eq!(EngineCommand::Quit.to_string(), "quit");
    }

    #[test]
    fn render_position() {
        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1";
        assert_eq!(
            EngineCommand::position(fen).to_string(),
            format!("position fen {fen}")
        );
        let with_moves = EngineCommand::Position {
            fen: fen.to_string(),
            moves: vec!["e7e5".to_string(), "g1f3".to_string()],
        };
        assert_eq!(
            with_moves.to_string(),
            format!("position fen {fen} moves e7e5 g1f3")
        );
    }

    #[test]
    fn render_setoption() {
        assert_eq!(
            EngineCommand::set_option("MultiPV", 3).to_string(),
            "setoption name MultiPV value 3"
        );
        let button = EngineCommand::SetOption {
            name: "Clear Hash".to_string(),
            value: None,
        };
        assert_eq!(button.to_string(), "setoption name Clear Hash");
    }

    #[test]
    fn render_go() {
        assert_eq!(GoParams::default().to_string(), "go");
        assert_eq!(
            EngineCommand::Go(GoParams::movetime(Duration::from_millis(1500))).to_string(),
            "go movetime 1500"
        );
        assert_eq!(GoParams::depth(18).to_string(), "go depth 18");
        assert_eq!(GoParams::infinite().to_string(), "go infinite");
        let clock = GoParams {
            wtime: Some(Duration::from_secs(300)),
            btime: Some(Duration::from_secs(300)),
            winc: Some(Duration::from_secs(2)),
            binc: Some(Duration::from_secs(2)),
            movestogo: Some(20),
            ..GoParams::default()
        };
        assert_eq!(
            clock.to_string(),
            "go wtime 300000 btime 300000 winc 2000 binc 2000 movestogo 20"
        );
    }
}
