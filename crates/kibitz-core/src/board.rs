//! 0x88 mailbox board: piece placement plus the king-location cache.

use std::fmt;

use crate::color::Color;
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::rank::Rank;
use crate::file::File;
use crate::square::Square;

/// Piece placement on a 128-cell 0x88 array.
///
/// Only the on-board half of `cells` is ever written. The king cache always
/// points at the square holding that color's king, or is `None` when the
/// color has no king on the board.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    cells: [Option<Piece>; Square::CELLS],
    kings: [Option<Square>; Color::COUNT],
}

impl Board {
    /// A board with no pieces.
    pub const fn empty() -> Board {
        Board {
            cells: [None; Square::CELLS],
            kings: [None; Color::COUNT],
        }
    }

    /// Return the piece on `sq`, if any.
    #[inline]
    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.cells[sq.index()]
    }

    /// Return `true` if `sq` holds no piece.
    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.cells[sq.index()].is_none()
    }

    /// Return `true` if `sq` holds exactly `piece`.
    #[inline]
    pub fn holds(&self, sq: Square, piece: Piece) -> bool {
        self.cells[sq.index()] == Some(piece)
    }

    /// Square of `color`'s king.
    #[inline]
    pub fn king(&self, color: Color) -> Option<Square> {
        self.kings[color.index()]
    }

    #[inline]
    pub(crate) fn kings(&self) -> [Option<Square>; Color::COUNT] {
        self.kings
    }

    #[inline]
    pub(crate) fn restore_kings(&mut self, kings: [Option<Square>; Color::COUNT]) {
        self.kings = kings;
    }

    /// Write `piece` to `sq`, overwriting whatever was there.
    pub(crate) fn set(&mut self, sq: Square, piece: Piece) {
        self.clear(sq);
        if piece.kind == PieceKind::King {
            self.kings[piece.color.index()] = Some(sq);
        }
        self.cells[sq.index()] = Some(piece);
    }

    /// Empty `sq`, returning the piece that stood there.
    pub(crate) fn clear(&mut self, sq: Square) -> Option<Piece> {
        let piece = self.cells[sq.index()].take()?;
        if piece.kind == PieceKind::King && self.kings[piece.color.index()] == Some(sq) {
            self.kings[piece.color.index()] = None;
        }
        Some(piece)
    }

    /// Iterate over occupied squares from `a1` to `h8`.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(|sq| self.get(sq).map(|piece| (sq, piece)))
    }

    /// Return the FEN piece-placement field.
    pub fn placement(&self) -> String {
        let mut out = String::with_capacity(64);
        for rank in Rank::ALL.iter().rev() {
            let mut empty = 0;
            for file in File::ALL {
                match self.get(Square::new(file, *rank)) {
                    Some(piece) => {
                        if empty > 0 {
                            out.push(char::from(b'0' + empty));
                            empty = 0;
                        }
                        out.push(piece.fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push(char::from(b'0' + empty));
            }
            if *rank != Rank::First {
                out.push('/');
            }
        }
        out
    }

    /// Return a wrapper for pretty-printing the board as an 8x8 grid.
    pub fn pretty(&self) -> PrettyBoard<'_> {
        PrettyBoard(self)
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::empty()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.placement())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board(\"{}\")", self)
    }
}

/// Wrapper for pretty-printing a board as a framed 8x8 grid, White at the bottom.
pub struct PrettyBoard<'a>(&'a Board);

impl fmt::Display for PrettyBoard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let board = self.0;
        writeln!(f, "   +------------------------+")?;
        for rank in Rank::ALL.iter().rev() {
            write!(f, " {} |", rank)?;
            for file in File::ALL {
                let c = board
                    .get(Square::new(file, *rank))
                    .map_or('.', Piece::fen_char);
                write!(f, " {c} ")?;
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "   +------------------------+")?;
        write!(f, "     a  b  c  d  e  f  g  h")
    }
}
