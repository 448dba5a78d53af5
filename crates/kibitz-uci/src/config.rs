//! Analysis settings.

use std::path::PathBuf;
use std::time::Duration;

use crate::command::{EngineCommand, GoParams};

/// How to run the engine and how long to let it think.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Executable to spawn; looked up on `PATH` when not a path.
    pub engine_path: PathBuf,
    pub engine_args: Vec<String>,
    /// Number of principal variations to request.
    pub multipv: u32,
    /// Thinking time per position.
    pub movetime: Duration,
    /// Optional depth cap, sent alongside the time limit.
    pub depth: Option<u32>,
    /// Number of search threads.
    pub threads: u16,
    /// Transposition table size in megabytes.
    pub hash_mb: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            engine_path: PathBuf::from("stockfish"),
            engine_args: Vec::new(),
            multipv: 3,
            movetime: Duration::from_millis(1000),
            depth: None,
            threads: 1,
            hash_mb: 16,
        }
    }
}

impl AnalysisConfig {
    /// `setoption` commands applied once after the handshake.
    pub fn engine_options(&self) -> Vec<EngineCommand> {
        vec![
            EngineCommand::set_option("Threads", self.threads),
            EngineCommand::set_option("Hash", self.hash_mb),
            EngineCommand::set_option("MultiPV", self.multipv),
        ]
    }

    pub fn go_params(&self) -> GoParams {
        GoParams {
            depth: self.depth,
            ..GoParams::movetime(self.movetime)
        }
    }
}
