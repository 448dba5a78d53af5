//! Piece offsets and the 0x88 difference tables used for attack detection.
//!
//! For an attacker on `from` and a target on `to`, `to - from + 119` indexes
//! a 239-entry table. [`ATTACKS`] holds a mask of the piece types that can
//! reach such a difference in one move on an empty board, and [`RAYS`] holds
//! the unit step a slider takes along it.

use crate::board::Board;
use crate::color::Color;
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::square::Square;

pub(crate) const KNIGHT_OFFSETS: [i16; 8] = [-18, -33, -31, -14, 18, 33, 31, 14];
pub(crate) const BISHOP_OFFSETS: [i16; 4] = [-17, -15, 17, 15];
pub(crate) const ROOK_OFFSETS: [i16; 4] = [-16, 1, 16, -1];
pub(crate) const KING_OFFSETS: [i16; 8] = [-17, -16, -15, 1, 17, 16, 15, -1];

/// Capture steps of a pawn of each color.
pub(crate) const fn pawn_captures(color: Color) -> [i16; 2] {
    match color {
        Color::White => [15, 17],
        Color::Black => [-15, -17],
    }
}

/// Move offsets for every non-pawn piece kind.
pub(crate) const fn piece_offsets(kind: PieceKind) -> &'static [i16] {
    match kind {
        PieceKind::Pawn => &[],
        PieceKind::Knight => &KNIGHT_OFFSETS,
        PieceKind::Bishop => &BISHOP_OFFSETS,
        PieceKind::Rook => &ROOK_OFFSETS,
        PieceKind::Queen | PieceKind::King => &KING_OFFSETS,
    }
}

const WHITE_PAWN: u8 = 1 << 0;
const BLACK_PAWN: u8 = 1 << 1;
const KNIGHT: u8 = 1 << 2;
const BISHOP: u8 = 1 << 3;
const ROOK: u8 = 1 << 4;
const QUEEN: u8 = 1 << 5;
const KING: u8 = 1 << 6;

const DIFF_OFFSET: i16 = 119;
const TABLE_SIZE: usize = 239;

static ATTACKS: [u8; TABLE_SIZE] = build_attacks();
static RAYS: [i16; TABLE_SIZE] = build_rays();

const fn slot(diff: i16) -> usize {
    (diff + DIFF_OFFSET) as usize
}

const fn build_attacks() -> [u8; TABLE_SIZE] {
    let mut table = [0u8; TABLE_SIZE];
    table[slot(15)] |= WHITE_PAWN;
    table[slot(17)] |= WHITE_PAWN;
    table[slot(-15)] |= BLACK_PAWN;
    table[slot(-17)] |= BLACK_PAWN;

    let mut i = 0;
    while i < 8 {
        table[slot(KNIGHT_OFFSETS[i])] |= KNIGHT;
        table[slot(KING_OFFSETS[i])] |= KING;
        i += 1;
    }

    i = 0;
    while i < 4 {
        let mut dist = 1;
        while dist <= 7 {
            table[slot(BISHOP_OFFSETS[i] * dist)] |= BISHOP | QUEEN;
            table[slot(ROOK_OFFSETS[i] * dist)] |= ROOK | QUEEN;
            dist += 1;
        }
        i += 1;
    }
    table
}

const fn build_rays() -> [i16; TABLE_SIZE] {
    let mut table = [0i16; TABLE_SIZE];
    let mut i = 0;
    while i < 8 {
        let step = KING_OFFSETS[i];
        let mut dist = 1;
        while dist <= 7 {
            table[slot(step * dist)] = step;
            dist += 1;
        }
        i += 1;
    }
    table
}

const fn mask(piece: Piece) -> u8 {
    match piece.kind {
        PieceKind::Pawn => match piece.color {
            Color::White => WHITE_PAWN,
            Color::Black => BLACK_PAWN,
        },
        PieceKind::Knight => KNIGHT,
        PieceKind::Bishop => BISHOP,
        PieceKind::Rook => ROOK,
        PieceKind::Queen => QUEEN,
        PieceKind::King => KING,
    }
}

impl Board {
    /// Return `true` if `piece` standing on `from` attacks `target`.
    fn piece_attacks(&self, piece: Piece, from: Square, target: Square) -> bool {
        let diff = target.index() as i16 - from.index() as i16;
        if diff == 0 || ATTACKS[slot(diff)] & mask(piece) == 0 {
            return false;
        }
        if !piece.kind.is_slider() {
            return true;
        }

        let step = RAYS[slot(diff)];
        let mut sq = from;
        loop {
            sq = match sq.offset(step) {
                Some(next) => next,
                None => return false,
            };
            if sq == target {
                return true;
            }
            if !self.is_empty(sq) {
                return false;
            }
        }
    }

    /// Return `true` if any piece of color `by` attacks `sq`.
    pub fn is_attacked(&self, sq: Square, by: Color) -> bool {
        self.pieces()
            .any(|(from, piece)| piece.color == by && self.piece_attacks(piece, from, sq))
    }

    /// Squares of every piece of color `by` that attacks `sq`.
    pub fn attackers(&self, sq: Square, by: Color) -> Vec<Square> {
        self.pieces()
            .filter(|&(from, piece)| piece.color == by && self.piece_attacks(piece, from, sq))
            .map(|(from, _)| from)
            .collect()
    }

    /// Return `true` if `color`'s king is attacked. A missing king is never attacked.
    pub fn is_king_attacked(&self, color: Color) -> bool {
        self.king(color)
            .is_some_and(|king| self.is_attacked(king, !color))
    }
}
