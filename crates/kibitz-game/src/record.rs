//! Verbose history entries.

use kibitz_core::{Color, Move, MoveFlags, PieceKind, Square};

/// One played move with its notations and surrounding positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub color: Color,
    pub from: Square,
    pub to: Square,
    pub piece: PieceKind,
    pub captured: Option<PieceKind>,
    pub promotion: Option<PieceKind>,
    pub flags: MoveFlags,
    pub san: String,
    /// Coordinate form, e.g. `e7e8q`.
    pub lan: String,
    /// FEN before the move.
    pub before: String,
    /// FEN after the move.
    pub after: String,
}

impl MoveRecord {
    pub(crate) fn new(mv: Move, san: String, before: String, after: String) -> MoveRecord {
        MoveRecord {
            color: mv.color,
            from: mv.from,
            to: mv.to,
            piece: mv.piece,
            captured: mv.captured,
            promotion: mv.promotion,
            flags: mv.flags,
            san,
            lan: mv.to_uci(),
            before,
            after,
        }
    }

    /// The move this record describes.
    pub fn to_move(&self) -> Move {
        Move {
            color: self.color,
            from: self.from,
            to: self.to,
            piece: self.piece,
            captured: self.captured,
            promotion: self.promotion,
            flags: self.flags,
        }
    }

    pub fn is_capture(&self) -> bool {
        self.to_move().is_capture()
    }
}
