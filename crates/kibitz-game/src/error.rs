//! Error types for PGN reading.

use kibitz_core::FenError;

/// Errors from lexing, parsing or replaying a PGN game.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PgnError {
    /// A `{` comment runs to the end of the input.
    #[error("line {line}: unterminated comment")]
    UnterminatedComment {
        /// Line the comment starts on.
        line: usize,
    },
    /// A tag value string runs to the end of the input.
    #[error("line {line}: unterminated string")]
    UnterminatedString {
        /// Line the string starts on.
        line: usize,
    },
    /// A character that cannot start any PGN token.
    #[error("line {line}: unexpected character '{character}'")]
    UnexpectedChar {
        line: usize,
        character: char,
    },
    /// A tag pair is not `[Name "value"]`.
    #[error("line {line}: malformed tag pair")]
    MalformedTag {
        line: usize,
    },
    /// A `(` without its `)`, a stray `)`, or a variation with no move to branch from.
    #[error("line {line}: unbalanced variation")]
    UnbalancedVariation {
        line: usize,
    },
    /// Strict mode: a `FEN` tag without `SetUp "1"`.
    #[error("FEN tag present without SetUp \"1\"")]
    FenWithoutSetUp,
    /// Strict mode: `SetUp "1"` without a `FEN` tag.
    #[error("SetUp \"1\" present without a FEN tag")]
    SetUpWithoutFen,
    /// The `FEN` tag does not hold a valid position.
    #[error("invalid FEN tag: {0}")]
    InvalidFen(#[from] FenError),
    /// A main-line move is not legal in the position it is played from.
    #[error("invalid move in PGN at ply {ply}: {san}")]
    IllegalMove {
        /// The move as written.
        san: String,
        /// One-based ply number along the main line.
        ply: usize,
    },
}
