//! Move records as produced by the generator and stored in the undo stack.

use std::fmt;

use crate::castle_rights::CastleSide;
use crate::color::Color;
use crate::piece_kind::PieceKind;
use crate::square::Square;

/// Closed set of move flags. A move may carry several (capture + promotion).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MoveFlags(u8);

impl MoveFlags {
    pub const NORMAL: MoveFlags = MoveFlags(0x01);
    pub const CAPTURE: MoveFlags = MoveFlags(0x02);
    /// Two-square pawn push.
    pub const BIG_PAWN: MoveFlags = MoveFlags(0x04);
    pub const EN_PASSANT: MoveFlags = MoveFlags(0x08);
    pub const PROMOTION: MoveFlags = MoveFlags(0x10);
    pub const KINGSIDE_CASTLE: MoveFlags = MoveFlags(0x20);
    pub const QUEENSIDE_CASTLE: MoveFlags = MoveFlags(0x40);
    pub const NULL_MOVE: MoveFlags = MoveFlags(0x80);

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Return `true` if any bit of `other` is set.
    #[inline]
    pub const fn intersects(self, other: MoveFlags) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub const fn union(self, other: MoveFlags) -> MoveFlags {
        MoveFlags(self.0 | other.0)
    }
}

impl fmt::Display for MoveFlags {
    /// One letter per flag: `n` normal, `c` capture, `b` big pawn, `e` en
    /// passant, `p` promotion, `k`/`q` castling, `-` null move.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const LETTERS: [(MoveFlags, char); 8] = [
            (MoveFlags::NORMAL, 'n'),
            (MoveFlags::CAPTURE, 'c'),
            (MoveFlags::BIG_PAWN, 'b'),
            (MoveFlags::EN_PASSANT, 'e'),
            (MoveFlags::PROMOTION, 'p'),
            (MoveFlags::KINGSIDE_CASTLE, 'k'),
            (MoveFlags::QUEENSIDE_CASTLE, 'q'),
            (MoveFlags::NULL_MOVE, '-'),
        ];
        for (flag, c) in LETTERS {
            if self.intersects(flag) {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for MoveFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MoveFlags({self})")
    }
}

/// A fully described move.
///
/// Moves are only meaningful in the position they were generated for;
/// [`Position::make_move`](crate::Position::make_move) trusts every field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub color: Color,
    pub from: Square,
    pub to: Square,
    pub piece: PieceKind,
    pub captured: Option<PieceKind>,
    pub promotion: Option<PieceKind>,
    pub flags: MoveFlags,
}

impl Move {
    /// The null move for `color`: passes the turn without touching the board.
    pub const fn null(color: Color) -> Move {
        Move {
            color,
            from: Square::A1,
            to: Square::A1,
            piece: PieceKind::King,
            captured: None,
            promotion: None,
            flags: MoveFlags::NULL_MOVE,
        }
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        self.flags.intersects(MoveFlags::NULL_MOVE)
    }

    /// Return `true` for captures, en passant included.
    #[inline]
    pub const fn is_capture(&self) -> bool {
        self.flags.intersects(MoveFlags(MoveFlags::CAPTURE.0 | MoveFlags::EN_PASSANT.0))
    }

    #[inline]
    pub const fn is_en_passant(&self) -> bool {
        self.flags.intersects(MoveFlags::EN_PASSANT)
    }

    #[inline]
    pub const fn is_big_pawn(&self) -> bool {
        self.flags.intersects(MoveFlags::BIG_PAWN)
    }

    #[inline]
    pub const fn is_promotion(&self) -> bool {
        self.flags.intersects(MoveFlags::PROMOTION)
    }

    /// The wing castled toward, if this is a castling move.
    #[inline]
    pub const fn castle_side(&self) -> Option<CastleSide> {
        if self.flags.intersects(MoveFlags::KINGSIDE_CASTLE) {
            Some(CastleSide::KingSide)
        } else if self.flags.intersects(MoveFlags::QUEENSIDE_CASTLE) {
            Some(CastleSide::QueenSide)
        } else {
            None
        }
    }

    /// Coordinate notation (`e2e4`, `e7e8q`, `0000` for the null move).
    pub fn to_uci(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return write!(f, "0000");
        }
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{promotion}")?;
        }
        Ok(())
    }
}
