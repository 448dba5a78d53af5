//! Talking to an external UCI engine: commands, output parsing, analysis.

pub mod analysis;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod info;

pub use analysis::{Analysis, Arrow, PvLine};
pub use command::{EngineCommand, GoParams};
pub use config::AnalysisConfig;
pub use engine::EngineProcess;
pub use error::UciError;
pub use info::{BestMove, EngineLine, InfoLine, Score, ScoreBound, parse_engine_line};
