//! UCI boundary errors.

use kibitz_core::FenError;

/// Errors that can occur while driving or reading an engine.
#[derive(Debug, thiserror::Error)]
pub enum UciError {
    /// A keyword in an engine line was not followed by its value.
    #[error("missing value for {param}")]
    MissingValue {
        /// The keyword whose value is missing.
        param: String,
    },

    /// A keyword's value could not be parsed.
    #[error("invalid value for {param}: {value}")]
    InvalidValue {
        /// The keyword whose value is malformed.
        param: String,
        /// The raw value.
        value: String,
    },

    /// The position to analyse is not a valid FEN.
    #[error("invalid FEN {fen}: {source}")]
    InvalidFen {
        /// The FEN string that failed to parse.
        fen: String,
        /// The rule the string broke.
        #[source]
        source: FenError,
    },

    /// The engine executable could not be started.
    #[error("failed to start engine {engine}: {source}")]
    Spawn {
        /// Path of the executable.
        engine: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The engine closed its output.
    #[error("engine exited")]
    EngineExited,

    /// The engine did not answer in time.
    #[error("timed out waiting for {waiting_for}")]
    Timeout {
        /// The reply that never came.
        waiting_for: &'static str,
    },

    /// An I/O error occurred while talking to the engine.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
