//! FEN validation, loading and serialization for [`Position`].

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::castle_rights::CastleRights;
use crate::color::Color;
use crate::error::FenError;
use crate::file::File;
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::position::Position;
use crate::rank::Rank;
use crate::square::Square;

/// The FEN string for the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Defaults appended to FENs that stop after 2 to 5 fields.
const FIELD_DEFAULTS: [&str; 4] = ["-", "-", "0", "1"];

/// Options for [`Position::load`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Only check the syntax needed to build a position, not chess sanity
    /// (king counts, row sums, en passant consistency, pawn ranks).
    pub skip_validation: bool,
}

/// How [`Position::fen_with`] writes the en passant field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EnPassantField {
    /// Only when a pawn of the side to move can legally capture there.
    #[default]
    Legal,
    /// The stored square, whether or not a capture is possible.
    Forced,
}

/// Split a FEN into fields, padding 2 to 5 fields with the defaults.
fn split_fields(fen: &str) -> Vec<&str> {
    let mut fields: Vec<&str> = fen.split_whitespace().collect();
    if (2..6).contains(&fields.len()) {
        let missing = 6 - fields.len();
        fields.extend_from_slice(&FIELD_DEFAULTS[FIELD_DEFAULTS.len() - missing..]);
    }
    fields
}

/// Check a FEN against every structural rule.
///
/// Rules are checked in a fixed order and the first failure is reported.
/// Short FENs are padded before checking.
pub fn validate_fen(fen: &str) -> Result<(), FenError> {
    validate_fields(&split_fields(fen))
}

fn validate_fields(fields: &[&str]) -> Result<(), FenError> {
    if fields.len() != 6 {
        return Err(FenError::WrongFieldCount {
            found: fields.len(),
        });
    }
    let [placement, turn, castling, en_passant, halfmove, fullmove] = [
        fields[0], fields[1], fields[2], fields[3], fields[4], fields[5],
    ];

    if !fullmove.parse::<u32>().is_ok_and(|n| n > 0) {
        return Err(FenError::InvalidFullmove {
            found: fullmove.to_string(),
        });
    }
    parse_halfmove(halfmove)?;

    let ep = parse_en_passant(en_passant)?;
    if ep.is_some_and(|sq| sq.rank() != Rank::Third && sq.rank() != Rank::Sixth) {
        return Err(FenError::InvalidEnPassant {
            found: en_passant.to_string(),
        });
    }

    CastleRights::from_fen(castling)?;
    let turn = parse_turn(turn)?;

    let rows: Vec<&str> = placement.split('/').collect();
    if rows.len() != 8 {
        return Err(FenError::WrongRowCount { found: rows.len() });
    }
    for (i, row) in rows.iter().enumerate() {
        let mut length = 0;
        let mut previous_was_digit = false;
        for c in row.chars() {
            if let Some(digit) = c.to_digit(10) {
                if previous_was_digit {
                    return Err(FenError::ConsecutiveDigits { row: i + 1 });
                }
                length += digit as usize;
                previous_was_digit = true;
            } else {
                if Piece::from_fen_char(c).is_none() {
                    return Err(FenError::InvalidPieceChar { character: c });
                }
                length += 1;
                previous_was_digit = false;
            }
        }
        if length != 8 {
            return Err(FenError::BadRowLength { row: i + 1, length });
        }
    }

    if let Some(sq) = ep {
        let expected = match turn {
            Color::White => Rank::Sixth,
            Color::Black => Rank::Third,
        };
        if sq.rank() != expected {
            return Err(FenError::EnPassantTurnMismatch {
                square: sq,
                turn: turn.name(),
            });
        }
    }

    for color in Color::ALL {
        let king = Piece::new(color, PieceKind::King).fen_char();
        match placement.chars().filter(|&c| c == king).count() {
            0 => return Err(FenError::missing_king(color)),
            1 => {}
            _ => return Err(FenError::too_many_kings(color)),
        }
    }

    if rows[0].chars().chain(rows[7].chars()).any(|c| c.eq_ignore_ascii_case(&'p')) {
        return Err(FenError::PawnsOnBackRank);
    }

    Ok(())
}

fn parse_turn(field: &str) -> Result<Color, FenError> {
    Color::from_fen(field).ok_or_else(|| FenError::InvalidTurn {
        found: field.to_string(),
    })
}

fn parse_halfmove(field: &str) -> Result<u32, FenError> {
    field.parse().map_err(|_| FenError::InvalidHalfmove {
        found: field.to_string(),
    })
}

fn parse_en_passant(field: &str) -> Result<Option<Square>, FenError> {
    if field == "-" {
        return Ok(None);
    }
    Square::from_algebraic(field)
        .map(Some)
        .ok_or_else(|| FenError::InvalidEnPassant {
            found: field.to_string(),
        })
}

impl Position {
    /// Build a position from a FEN string.
    ///
    /// Castling and en passant are taken from the string as written.
    /// Pieces go through the same rules as [`put`](Position::put), so a
    /// second king of one color is dropped when validation is skipped.
    pub fn load(fen: &str, options: LoadOptions) -> Result<Position, FenError> {
        let fields = split_fields(fen);
        if !options.skip_validation {
            validate_fields(&fields)?;
        } else if fields.len() != 6 {
            return Err(FenError::WrongFieldCount {
                found: fields.len(),
            });
        }

        let turn = parse_turn(fields[1])?;
        let castling = CastleRights::from_fen(fields[2])?;
        let en_passant = parse_en_passant(fields[3])?;
        let halfmove_clock = parse_halfmove(fields[4])?;
        let fullmove_number = fields[5].parse().map_err(|_| FenError::InvalidFullmove {
            found: fields[5].to_string(),
        })?;

        let mut pos = Position::empty();
        pos.load_placement(fields[0])?;
        if turn == Color::Black {
            pos.flip_turn();
        }
        pos.set_castling(castling);
        pos.set_en_passant(en_passant);
        pos.halfmove_clock = halfmove_clock;
        pos.fullmove_number = fullmove_number;
        Ok(pos)
    }

    fn load_placement(&mut self, placement: &str) -> Result<(), FenError> {
        let rows: Vec<&str> = placement.split('/').collect();
        if rows.len() > 8 {
            return Err(FenError::WrongRowCount { found: rows.len() });
        }
        for (i, row) in rows.iter().enumerate() {
            let rank = Rank::ALL[7 - i];
            let mut file = 0usize;
            for c in row.chars() {
                if let Some(digit) = c.to_digit(10) {
                    file += digit as usize;
                    continue;
                }
                let piece = Piece::from_fen_char(c).ok_or(FenError::InvalidPieceChar { character: c })?;
                let Some(&file_of) = File::ALL.get(file) else {
                    return Err(FenError::BadRowLength {
                        row: i + 1,
                        length: file + 1,
                    });
                };
                let sq = Square::new(file_of, rank);
                if !self.put_raw(piece, sq) {
                    debug!(%piece, square = %sq, "dropped extra king while loading");
                }
                file += 1;
            }
        }
        Ok(())
    }

    /// Serialize to FEN, writing en passant only when it is capturable.
    pub fn fen(&self) -> String {
        self.fen_with(EnPassantField::Legal)
    }

    /// Serialize to FEN with explicit en passant handling.
    pub fn fen_with(&self, en_passant: EnPassantField) -> String {
        let ep = match en_passant {
            EnPassantField::Forced => self.en_passant,
            EnPassantField::Legal => self.en_passant.filter(|&ep| self.en_passant_legal(ep)),
        };
        format!(
            "{} {} {} {} {} {}",
            self.board.placement(),
            self.turn,
            self.castling,
            ep.map_or_else(|| "-".to_string(), |sq| sq.to_string()),
            self.halfmove_clock,
            self.fullmove_number,
        )
    }

    /// Return `true` if a pawn of the side to move can capture on `ep`
    /// without exposing its own king.
    fn en_passant_legal(&self, ep: Square) -> bool {
        let us = self.turn;
        let Some(pushed) = ep.offset(-us.pawn_push()) else {
            return false;
        };
        let pawn = Piece::new(us, PieceKind::Pawn);
        [1, -1].into_iter().any(|side| {
            let Some(from) = pushed.offset(side) else {
                return false;
            };
            if !self.board.holds(from, pawn) {
                return false;
            }
            let mut probe = self.board.clone();
            probe.clear(from);
            probe.clear(pushed);
            probe.set(ep, pawn);
            !probe.is_king_attacked(us)
        })
    }
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(fen: &str) -> Result<Position, FenError> {
        Position::load(fen, LoadOptions::default())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fen())
    }
}

#[cfg(test)]
mod tests {
    use super::{EnPassantField, LoadOptions, STARTING_FEN, validate_fen};
    use crate::color::Color;
    use crate::error::FenError;
    use crate::position::Position;
    use crate::square::Square;

    #[test]
    fn starting_fen_roundtrip() {
        let pos: Position = STARTING_FEN.parse().unwrap();
        assert_eq!(pos.fen(), STARTING_FEN);
        assert_eq!(pos, Position::starting());
    }

    #[test]
    fn various_roundtrips() {
        for fen in [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
            "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
            "4k3/8/8/8/8/8/8/4K3 b - - 57 90",
        ] {
            let pos: Position = fen.parse().unwrap();
            assert_eq!(pos.fen(), fen);
            assert_eq!(pos.hash(), pos.compute_hash());
        }
    }

    #[test]
    fn short_fens_are_padded() {
        let pos: Position = "4k3/8/8/8/8/8/8/4K3 b".parse().unwrap();
        assert_eq!(pos.fen(), "4k3/8/8/8/8/8/8/4K3 b - - 0 1");
        let pos: Position = "4k3/8/8/8/8/8/8/4K3 w - - 12".parse().unwrap();
        assert_eq!(pos.halfmove_clock(), 12);
        assert_eq!(pos.fullmove_number(), 1);
        assert_eq!(
            validate_fen("4k3/8/8/8/8/8/8/4K3"),
            Err(FenError::WrongFieldCount { found: 1 })
        );
    }

    #[test]
    fn rules_checked_in_order() {
        let cases: [(&str, fn(&FenError) -> bool); 13] = [
            ("8/8/8/8/8/8/8/8 w - - 0 1 x", |e| matches!(e, FenError::WrongFieldCount { found: 7 })),
            ("4k3/8/8/8/8/8/8/4K3 w - - 0 0", |e| matches!(e, FenError::InvalidFullmove { .. })),
            ("4k3/8/8/8/8/8/8/4K3 w - - -1 1", |e| matches!(e, FenError::InvalidHalfmove { .. })),
            ("4k3/8/8/8/8/8/8/4K3 w - e4 0 1", |e| matches!(e, FenError::InvalidEnPassant { .. })),
            ("4k3/8/8/8/8/8/8/4K3 w KX - 0 1", |e| matches!(e, FenError::InvalidCastling { .. })),
            ("4k3/8/8/8/8/8/8/4K3 x - - 0 1", |e| matches!(e, FenError::InvalidTurn { .. })),
            ("4k3/8/8/8/8/8/4K3 w - - 0 1", |e| matches!(e, FenError::WrongRowCount { found: 7 })),
            ("4k3/8/8/44/8/8/8/4K3 w - - 0 1", |e| matches!(e, FenError::ConsecutiveDigits { row: 4 })),
            ("4k3/8/8/8/8/8/8/4X3 w - - 0 1", |e| matches!(e, FenError::InvalidPieceChar { character: 'X' })),
            ("4k3/8/8/8/9/8/8/4K3 w - - 0 1", |e| matches!(e, FenError::BadRowLength { row: 5, length: 9 })),
            ("4k3/8/8/8/4P3/8/8/4K3 w - e3 0 1", |e| matches!(e, FenError::EnPassantTurnMismatch { .. })),
            ("8/8/8/8/8/8/8/4K3 w - - 0 1", |e| matches!(e, FenError::MissingKing { color: "black" })),
            ("4k3/8/8/8/8/8/8/4K2P w - - 0 1", |e| matches!(e, FenError::PawnsOnBackRank)),
        ];
        for (fen, check) in cases {
            let err = validate_fen(fen).unwrap_err();
            assert!(check(&err), "{fen}: unexpected {err:?}");
            assert!(Position::load(fen, LoadOptions::default()).is_err());
        }
        assert_eq!(
            validate_fen("4k3/8/8/8/8/8/8/K3K3 w - - 0 1"),
            Err(FenError::TooManyKings { color: "white" })
        );
        assert_eq!(validate_fen(STARTING_FEN), Ok(()));
    }

    #[test]
    fn skip_validation_keeps_one_king() {
        let fen = "4k3/8/8/8/8/8/8/K3K3 w - - 0 1";
        let pos = Position::load(fen, LoadOptions { skip_validation: true }).unwrap();
        assert_eq!(pos.king_square(Color::White), Some(Square::A1));
        assert_eq!(pos.get(Square::E1), None);

        let pos = Position::load("8/8/8/8/8/8/8/8 w - - 0 1", LoadOptions { skip_validation: true })
            .unwrap();
        assert_eq!(pos.board().pieces().count(), 0);
        assert!(
            Position::load("8/8/8/8/8/8/8/8 x - - 0 1", LoadOptions { skip_validation: true })
                .is_err()
        );
    }

    #[test]
    fn en_passant_written_only_when_capturable() {
        // No black pawn next to e4.
        let pos: Position = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
            .parse()
            .unwrap();
        assert_eq!(
            pos.fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"
        );
        assert_eq!(pos.fen_with(EnPassantField::Forced).split(' ').nth(3), Some("e3"));

        // Capturing would expose the white king along the fifth rank.
        let pos: Position = "8/8/8/KPp4r/8/8/8/4k3 w - c6 0 2".parse().unwrap();
        assert_eq!(pos.fen(), "8/8/8/KPp4r/8/8/8/4k3 w - - 0 2");
        assert_eq!(pos.en_passant(), Some(Square::C6));

        let pos: Position = "4k3/8/8/1Pp5/8/8/8/4K3 w - c6 0 2".parse().unwrap();
        assert_eq!(pos.fen(), "4k3/8/8/1Pp5/8/8/8/4K3 w - c6 0 2");
    }
}
