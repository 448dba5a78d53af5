//! Chess rules on a 0x88 board: position model, legal move generation,
//! make/unmake, FEN and SAN codecs, and draw detection.

mod attacks;
mod board;
mod castle_rights;
mod chess_move;
mod color;
mod error;
mod fen;
mod file;
mod make_move;
mod movegen;
mod piece;
mod piece_kind;
mod position;
mod rank;
mod san;
mod square;
mod status;
mod zobrist;

pub mod perft;

pub use board::{Board, PrettyBoard};
pub use castle_rights::{CastleRights, CastleSide};
pub use chess_move::{Move, MoveFlags};
pub use color::Color;
pub use error::{FenError, MoveError};
pub use fen::{EnPassantField, LoadOptions, STARTING_FEN, validate_fen};
pub use file::File;
pub use movegen::MoveFilter;
pub use piece::Piece;
pub use piece_kind::PieceKind;
pub use position::{Position, Undo};
pub use rank::Rank;
pub use san::{NULL_MOVE_SAN, SanMatch, SanMode, stripped_san};
pub use square::Square;
pub use status::{FIFTY_MOVE_PLIES, RepetitionTable};
