//! Error types for FEN validation and move requests.

use crate::color::Color;
use crate::square::Square;

/// Errors that occur when validating or loading a FEN string.
///
/// Each variant names the first rule the string broke; rules are checked in
/// declaration order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FenError {
    /// The FEN string does not have exactly 6 space-separated fields.
    #[error("expected 6 FEN fields, found {found}")]
    WrongFieldCount {
        /// Number of fields found after padding.
        found: usize,
    },
    /// The fullmove number is not a positive integer.
    #[error("move number must be a positive integer, found \"{found}\"")]
    InvalidFullmove {
        /// The invalid string.
        found: String,
    },
    /// The halfmove clock is not a non-negative integer.
    #[error("half move counter must be a non-negative integer, found \"{found}\"")]
    InvalidHalfmove {
        /// The invalid string.
        found: String,
    },
    /// The en passant field is not `-` or a square on rank 3 or 6.
    #[error("invalid en passant square: \"{found}\"")]
    InvalidEnPassant {
        /// The invalid string.
        found: String,
    },
    /// The castling field contains something other than `KQkq-`.
    #[error("invalid castling availability: \"{found}\"")]
    InvalidCastling {
        /// The invalid string.
        found: String,
    },
    /// The side-to-move field is not `w` or `b`.
    #[error("side to move must be 'w' or 'b', found \"{found}\"")]
    InvalidTurn {
        /// The invalid string.
        found: String,
    },
    /// The piece placement does not have exactly 8 rows.
    #[error("piece placement must have 8 rows, found {found}")]
    WrongRowCount {
        /// Number of rows found.
        found: usize,
    },
    /// A row holds two digits in a row.
    #[error("row {row} of the piece placement has consecutive digits")]
    ConsecutiveDigits {
        /// One-based row number counted from the top (rank 8).
        row: usize,
    },
    /// An unrecognized character appeared in the piece placement.
    #[error("invalid piece character: '{character}'")]
    InvalidPieceChar {
        /// The invalid character.
        character: char,
    },
    /// A row describes more or fewer than 8 squares.
    #[error("row {row} of the piece placement describes {length} squares, expected 8")]
    BadRowLength {
        /// One-based row number counted from the top (rank 8).
        row: usize,
        /// Number of squares described.
        length: usize,
    },
    /// The en passant square lies on the wrong side of the board for the side to move.
    #[error("en passant square {square} is inconsistent with {turn} to move")]
    EnPassantTurnMismatch {
        /// The en passant square.
        square: Square,
        /// Side to move.
        turn: &'static str,
    },
    /// A side has no king.
    #[error("missing {color} king")]
    MissingKing {
        /// Which side lacks a king.
        color: &'static str,
    },
    /// A side has more than one king.
    #[error("too many {color} kings")]
    TooManyKings {
        /// Which side has extra kings.
        color: &'static str,
    },
    /// A pawn sits on the first or eighth rank.
    #[error("pawns found on the first or eighth rank")]
    PawnsOnBackRank,
}

impl FenError {
    pub(crate) fn missing_king(color: Color) -> FenError {
        FenError::MissingKing {
            color: color.name(),
        }
    }

    pub(crate) fn too_many_kings(color: Color) -> FenError {
        FenError::TooManyKings {
            color: color.name(),
        }
    }
}

/// Errors from requesting a move that cannot be played.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    /// No legal move matches the request.
    #[error("invalid move: {input}")]
    IllegalMove {
        /// The request as the caller wrote it.
        input: String,
    },
    /// The request matches several legal moves.
    #[error("ambiguous move: {input} (candidates: {})", candidates.join(", "))]
    AmbiguousMove {
        /// The request as the caller wrote it.
        input: String,
        /// SAN of every matching legal move.
        candidates: Vec<String>,
    },
    /// A null move was requested while the side to move is in check.
    #[error("null move not allowed when in check")]
    NullMoveWhileInCheck,
}

#[cfg(test)]
mod tests {
    use super::{FenError, MoveError};
    use crate::color::Color;
    use crate::square::Square;

    #[test]
    fn fen_error_display() {
        let err = FenError::WrongFieldCount { found: 4 };
        assert_eq!(format!("{err}"), "expected 6 FEN fields, found 4");
        assert_eq!(
            FenError::missing_king(Color::Black).to_string(),
            "missing black king"
        );
        let err = FenError::EnPassantTurnMismatch {
            square: Square::E3,
            turn: Color::White.name(),
        };
        assert_eq!(
            err.to_string(),
            "en passant square e3 is inconsistent with white to move"
        );
    }

    #[test]
    fn move_error_display() {
        let err = MoveError::AmbiguousMove {
            input: "Nd2".to_string(),
            candidates: vec!["Nbd2".to_string(), "Nfd2".to_string()],
        };
        assert_eq!(err.to_string(), "ambiguous move: Nd2 (candidates: Nbd2, Nfd2)");
        assert_eq!(
            MoveError::IllegalMove {
                input: "e5".to_string()
            }
            .to_string(),
            "invalid move: e5"
        );
    }
}
