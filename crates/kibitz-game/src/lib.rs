//! Game record on top of `kibitz-core`: move history with repetition
//! tracking, PGN headers and comments, and PGN reading and writing.

mod comments;
mod error;
mod game;
mod headers;
mod record;

pub mod pgn;

pub use comments::Comments;
pub use error::PgnError;
pub use game::{ClearOptions, Game, GameLoadOptions, MoveRequest};
pub use headers::Headers;
pub use pgn::{PgnNode, PgnOptions, PgnWriteOptions};
pub use record::MoveRecord;
