//! Standard Algebraic Notation: rendering moves and resolving SAN text.

use std::sync::LazyLock;

use regex::Regex;

use crate::castle_rights::CastleSide;
use crate::chess_move::Move;
use crate::movegen::MoveFilter;
use crate::piece_kind::PieceKind;
use crate::position::Position;
use crate::square::Square;

/// SAN of the null move.
pub const NULL_MOVE_SAN: &str = "--";

/// How strictly [`Position::parse_san`] reads its input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SanMode {
    /// Only text that renders back to the same SAN is accepted.
    #[default]
    Strict,
    /// Also accept coordinate forms (`e2e4`, `Nb1c3`, `e7-e8q`), a missing
    /// `x`, `0-0` castling and over-disambiguated origins.
    Permissive,
}

/// Outcome of resolving SAN text against a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SanMatch {
    Exact(Move),
    /// Nothing matched exactly, but several legal moves of the named piece
    /// reach the named square.
    Ambiguous(Vec<Move>),
    NoMatch,
}

/// Two-coordinate form, origin required.
static COORDINATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([pnbrqkPNBRQK])?([a-h][1-8])x?-?([a-h][1-8])([qrbnQRBN])?")
        .expect("coordinate move regex")
});

/// Destination with an optional partial origin.
static PARTIAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([pnbrqkPNBRQK])?([a-h]?[1-8]?)x?-?([a-h][1-8])([qrbnQRBN])?")
        .expect("partial move regex")
});

static TWO_SQUARES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-h]\d.*[a-h]\d").expect("two squares regex"));

static TRAILER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[+#]?[?!]*$").expect("san trailer regex"));

static DESTINATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-h][1-8]").expect("destination regex"));

/// Remove the first `=`, then any trailing check mark and annotation glyphs.
pub fn stripped_san(san: &str) -> String {
    let without_eq = san.replacen('=', "", 1);
    TRAILER_RE.replace(&without_eq, "").into_owned()
}

/// Piece kind named by SAN text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NamedPiece {
    /// Two coordinates were given; any piece may be meant.
    Any,
    Kind(PieceKind),
    /// The leading letter names nothing.
    Unknown,
}

impl NamedPiece {
    fn infer(san: &str) -> NamedPiece {
        let Some(first) = san.chars().next() else {
            return NamedPiece::Unknown;
        };
        if ('a'..='h').contains(&first) {
            return if TWO_SQUARES_RE.is_match(san) {
                NamedPiece::Any
            } else {
                NamedPiece::Kind(PieceKind::Pawn)
            };
        }
        if first.eq_ignore_ascii_case(&'o') {
            return NamedPiece::Kind(PieceKind::King);
        }
        PieceKind::from_char(first).map_or(NamedPiece::Unknown, NamedPiece::Kind)
    }

    fn filter(self) -> Option<MoveFilter> {
        match self {
            NamedPiece::Any => Some(MoveFilter::default()),
            NamedPiece::Kind(kind) => Some(MoveFilter::for_piece(kind)),
            NamedPiece::Unknown => None,
        }
    }
}

fn piece_letter(text: Option<&str>) -> Option<PieceKind> {
    text.and_then(|s| s.chars().next()).and_then(PieceKind::from_char)
}

/// File or rank letters of `from`'s name that distinguish it from the other
/// legal moves in `moves` of the same piece kind to the same square.
fn disambiguator(mv: &Move, moves: &[Move]) -> String {
    let mut ambiguities = 0;
    let mut same_rank = 0;
    let mut same_file = 0;
    for other in moves {
        if other.piece == mv.piece && other.from != mv.from && other.to == mv.to {
            ambiguities += 1;
            if other.from.rank() == mv.from.rank() {
                same_rank += 1;
            }
            if other.from.file() == mv.from.file() {
                same_file += 1;
            }
        }
    }

    if ambiguities == 0 {
        String::new()
    } else if same_rank > 0 && same_file > 0 {
        mv.from.to_string()
    } else if same_file > 0 {
        mv.from.rank().to_string()
    } else {
        mv.from.file().to_string()
    }
}

impl Position {
    /// Render `mv` in SAN.
    ///
    /// `mv` must be legal here; the check suffix is found by playing it.
    pub fn move_to_san(&mut self, mv: Move) -> String {
        let moves = self.legal_moves();
        self.san_in(mv, &moves)
    }

    /// SAN of every legal move, in generation order.
    pub fn legal_moves_san(&mut self) -> Vec<String> {
        let moves = self.legal_moves();
        moves.iter().map(|&mv| self.san_in(mv, &moves)).collect()
    }

    /// Render `mv` in SAN against an already generated legal move list.
    fn san_in(&mut self, mv: Move, moves: &[Move]) -> String {
        if mv.is_null() {
            return NULL_MOVE_SAN.to_string();
        }

        let mut out = String::new();
        match mv.castle_side() {
            Some(CastleSide::KingSide) => out.push_str("O-O"),
            Some(CastleSide::QueenSide) => out.push_str("O-O-O"),
            None => {
                if mv.piece != PieceKind::Pawn {
                    out.push(mv.piece.san_char());
                    out.push_str(&disambiguator(&mv, moves));
                }
                if mv.is_capture() {
                    if mv.piece == PieceKind::Pawn {
                        out.push(mv.from.file().to_char());
                    }
                    out.push('x');
                }
                out.push_str(&mv.to.to_string());
                if let Some(promotion) = mv.promotion {
                    out.push('=');
                    out.push(promotion.san_char());
                }
            }
        }

        self.make_move(mv);
        if self.is_check() {
            out.push(if self.is_checkmate() { '#' } else { '+' });
        }
        self.undo_move();
        out
    }

    /// Resolve SAN text to a legal move.
    pub fn parse_san(&mut self, san: &str, mode: SanMode) -> SanMatch {
        let mut clean = stripped_san(san);
        if mode == SanMode::Permissive {
            if clean == "0-0" {
                clean = "O-O".to_string();
            } else if clean == "0-0-0" {
                clean = "O-O-O".to_string();
            }
        }

        if clean == NULL_MOVE_SAN {
            if self.is_check() {
                return SanMatch::NoMatch;
            }
            return SanMatch::Exact(Move::null(self.turn));
        }

        let named = NamedPiece::infer(&clean);
        if let Some(filter) = named.filter() {
            let moves = self.generate_moves(filter);
            for &mv in &moves {
                if stripped_san(&self.san_in(mv, &moves)) == clean {
                    return SanMatch::Exact(mv);
                }
            }
        }

        if mode == SanMode::Permissive
            && let Some(mv) = self.parse_loose(&clean, named)
        {
            return SanMatch::Exact(mv);
        }

        self.ambiguity(&clean, named)
    }

    fn parse_loose(&mut self, clean: &str, named: NamedPiece) -> Option<Move> {
        let (caps, overly_disambiguated) = match COORDINATE_RE.captures(clean) {
            Some(caps) => (caps, false),
            None => {
                let caps = PARTIAL_RE.captures(clean)?;
                let short = caps.get(2).is_some_and(|m| m.as_str().len() == 1);
                (caps, short)
            }
        };
        let piece = piece_letter(caps.get(1).map(|m| m.as_str()));
        let from = caps.get(2).map(|m| m.as_str()).filter(|s| !s.is_empty());
        let to = Square::from_algebraic(caps.get(3)?.as_str())?;
        let promotion = piece_letter(caps.get(4).map(|m| m.as_str()));

        let filter = match piece {
            Some(kind) => MoveFilter::for_piece(kind),
            None => named.filter()?,
        };
        let moves = self.generate_moves(filter);
        let matches_rest = |mv: &Move| {
            piece.is_none_or(|kind| kind == mv.piece)
                && mv.to == to
                && promotion.is_none_or(|kind| Some(kind) == mv.promotion)
        };

        for &mv in &moves {
            match from {
                None => {
                    if stripped_san(&self.san_in(mv, &moves)).replace('x', "") == clean {
                        return Some(mv);
                    }
                }
                Some(origin) if overly_disambiguated => {
                    let square = mv.from.to_string();
                    if matches_rest(&mv) && square.contains(origin) {
                        return Some(mv);
                    }
                }
                Some(origin) => {
                    if matches_rest(&mv) && Square::from_algebraic(origin) == Some(mv.from) {
                        return Some(mv);
                    }
                }
            }
        }
        None
    }

    fn ambiguity(&mut self, clean: &str, named: NamedPiece) -> SanMatch {
        let NamedPiece::Kind(kind) = named else {
            return SanMatch::NoMatch;
        };
        let Some(to) = DESTINATION_RE
            .find_iter(clean)
            .last()
            .and_then(|m| Square::from_algebraic(m.as_str()))
        else {
            return SanMatch::NoMatch;
        };
        let candidates: Vec<Move> = self
            .generate_moves(MoveFilter::for_piece(kind))
            .into_iter()
            .filter(|mv| mv.to == to)
            .collect();
        if candidates.len() > 1 {
            SanMatch::Ambiguous(candidates)
        } else {
            SanMatch::NoMatch
        }
    }

    /// Resolve a coordinate move such as `e2e4` or `e7e8q`.
    ///
    /// `0000` yields the null move for the side to move, unless it is in
    /// check.
    pub fn move_from_uci(&mut self, uci: &str) -> Option<Move> {
        if uci == "0000" {
            return (!self.is_check()).then(|| Move::null(self.turn));
        }
        let from = Square::from_algebraic(uci.get(0..2)?)?;
        let to = Square::from_algebraic(uci.get(2..4)?)?;
        let promotion = match uci.get(4..)? {
            "" => None,
            letter if letter.len() == 1 => Some(piece_letter(Some(letter))?),
            _ => return None,
        };
        self.generate_moves(MoveFilter::from_square(from))
            .into_iter()
            .find(|mv| mv.to == to && mv.promotion == promotion)
    }
}
