//! Board squares in 0x88 layout.

use std::fmt;

use crate::file::File;
use crate::rank::Rank;

/// A square, stored as its 0x88 index `rank * 16 + file`.
///
/// The high nibble is the rank and the low nibble the file, so an index
/// produced by adding an offset is off the board exactly when
/// `index & 0x88 != 0`. Only on-board indices are ever wrapped.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square(u8);

impl Square {
    /// Number of on-board squares.
    pub const COUNT: usize = 64;

    /// Size of the 0x88 cell array, including the off-board half.
    pub const CELLS: usize = 128;

    /// Create a square from a file and a rank.
    #[inline]
    pub const fn new(file: File, rank: Rank) -> Square {
        Square(((rank as u8) << 4) | file as u8)
    }

    /// Wrap a raw 0x88 index, returning `None` for off-board indices.
    #[inline]
    pub const fn from_index(index: u8) -> Option<Square> {
        if index & 0x88 == 0 {
            Some(Square(index))
        } else {
            None
        }
    }

    /// Parse a lowercase algebraic square such as `e4`.
    pub fn from_algebraic(s: &str) -> Option<Square> {
        let mut chars = s.chars();
        let file = File::from_char(chars.next()?)?;
        let rank = Rank::from_char(chars.next()?)?;
        if chars.next().is_some() {
            return None;
        }
        Some(Square::new(file, rank))
    }

    /// Return the raw 0x88 index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Return the file of this square.
    #[inline]
    pub const fn file(self) -> File {
        File::ALL[(self.0 & 0x0f) as usize]
    }

    /// Return the rank of this square.
    #[inline]
    pub const fn rank(self) -> Rank {
        Rank::ALL[(self.0 >> 4) as usize]
    }

    /// Step by a 0x88 delta, returning `None` when the step leaves the board.
    #[inline]
    pub const fn offset(self, delta: i16) -> Option<Square> {
        let target = self.0 as i16 + delta;
        if target < 0 || target > 0x77 || target & 0x88 != 0 {
            None
        } else {
            Some(Square(target as u8))
        }
    }

    /// Return `true` for light squares (`a1` is dark).
    #[inline]
    pub const fn is_light(self) -> bool {
        ((self.0 >> 4) + (self.0 & 0x0f)) % 2 == 1
    }

    /// Iterate over the 64 on-board squares, `a1`, `b1`, ..., `h8`.
    pub fn all() -> impl Iterator<Item = Square> {
        (0u8..0x78).filter(|i| i & 0x88 == 0).map(Square)
    }

    pub const A1: Square = Square(0x00);
    pub const B1: Square = Square(0x01);
    pub const C1: Square = Square(0x02);
    pub const D1: Square = Square(0x03);
    pub const E1: Square = Square(0x04);
    pub const F1: Square = Square(0x05);
    pub const G1: Square = Square(0x06);
    pub const H1: Square = Square(0x07);
    pub const A2: Square = Square(0x10);
    pub const B2: Square = Square(0x11);
    pub const C2: Square = Square(0x12);
    pub const D2: Square = Square(0x13);
    pub const E2: Square = Square(0x14);
    pub const F2: Square = Square(0x15);
    pub const G2: Square = Square(0x16);
    pub const H2: Square = Square(0x17);
    pub const A3: Square = Square(0x20);
    pub const B3: Square = Square(0x21);
    pub const C3: Square = Square(0x22);
    pub const D3: Square = Square(0x23);
    pub const E3: Square = Square(0x24);
    pub const F3: Square = Square(0x25);
    pub const G3: Square = Square(0x26);
    pub const H3: Square = Square(0x27);
    pub const A4: Square = Square(0x30);
    pub const B4: Square = Square(0x31);
    pub const C4: Square = Square(0x32);
    pub const D4: Square = Square(0x33);
    pub const E4: Square = Square(0x34);
    pub const F4: Square = Square(0x35);
    pub const G4: Square = Square(0x36);
    pub const H4: Square = Square(0x37);
    pub const A5: Square = Square(0x40);
    pub const B5: Square = Square(0x41);
    pub const C5: Square = Square(0x42);
    pub const D5: Square = Square(0x43);
    pub const E5: Square = Square(0x44);
    pub const F5: Square = Square(0x45);
    pub const G5: Square = Square(0x46);
    pub const H5: Square = Square(0x47);
    pub const A6: Square = Square(0x50);
    pub const B6: Square = Square(0x51);
    pub const C6: Square = Square(0x52);
    pub const D6: Square = Square(0x53);
    pub const E6: Square = Square(0x54);
    pub const F6: Square = Square(0x55);
    pub const G6: Square = Square(0x56);
    pub const H6: Square = Square(0x57);
    pub const A7: Square = Square(0x60);
    pub const B7: Square = Square(0x61);
    pub const C7: Square = Square(0x62);
    pub const D7: Square = Square(0x63);
    pub const E7: Square = Square(0x64);
    pub const F7: Square = Square(0x65);
    pub const G7: Square = Square(0x66);
    pub const H7: Square = Square(0x67);
    pub const A8: Square = Square(0x70);
    pub const B8: Square = Square(0x71);
    pub const C8: Square = Square(0x72);
    pub const D8: Square = Square(0x73);
    pub const E8: Square = Square(0x74);
    pub const F8: Square = Square(0x75);
    pub const G8: Square = Square(0x76);
    pub const H8: Square = Square(0x77);
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::Square;
    use crate::file::File;
    use crate::rank::Rank;

    #[test]
    fn layout() {
        assert_eq!(Square::A1.index(), 0x00);
        assert_eq!(Square::H1.index(), 0x07);
        assert_eq!(Square::A2.index(), 0x10);
        assert_eq!(Square::H8.index(), 0x77);
        assert_eq!(Square::new(File::E, Rank::Fourth), Square::E4);
    }

    #[test]
    fn off_board_indices_rejected() {
        assert!(Square::from_index(0x08).is_none());
        assert!(Square::from_index(0x78).is_none());
        assert!(Square::from_index(0x80).is_none());
        assert_eq!(Square::from_index(0x34), Some(Square::E4));
    }

    #[test]
    fn offset_detects_edges() {
        assert_eq!(Square::H1.offset(1), None);
        assert_eq!(Square::A1.offset(-1), None);
        assert_eq!(Square::A8.offset(16), None);
        assert_eq!(Square::E2.offset(32), Some(Square::E4));
        assert_eq!(Square::B1.offset(31), Some(Square::A3));
    }

    #[test]
    fn algebraic() {
        assert_eq!(Square::from_algebraic("e4"), Some(Square::E4));
        assert_eq!(Square::from_algebraic("h8"), Some(Square::H8));
        assert_eq!(Square::from_algebraic("i1"), None);
        assert_eq!(Square::from_algebraic("a9"), None);
        assert_eq!(Square::from_algebraic("a1b"), None);
        assert_eq!(Square::from_algebraic(""), None);
        assert_eq!(Square::C6.to_string(), "c6");
        assert_eq!(format!("{:?}", Square::E4), "Square(e4)");
    }

    #[test]
    fn square_colors() {
        assert!(!Square::A1.is_light());
        assert!(Square::H1.is_light());
        assert!(Square::D1.is_light());
        assert!(!Square::D8.is_light());
    }

    #[test]
    fn all_squares() {
        let squares: Vec<Square> = Square::all().collect();
        assert_eq!(squares.len(), Square::COUNT);
        assert_eq!(squares[0], Square::A1);
        assert_eq!(squares[63], Square::H8);
        for sq in squares {
            assert_eq!(Square::new(sq.file(), sq.rank()), sq);
        }
    }
}
