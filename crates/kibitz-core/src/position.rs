//! Full game state: board, side to move, castling, en passant, clocks, hash
//! and the undo stack.

use tracing::debug;

use crate::board::Board;
use crate::castle_rights::{CastleRights, CastleSide, king_home};
use crate::chess_move::Move;
use crate::color::Color;
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::square::Square;
use crate::zobrist;

/// State needed to take back one move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Undo {
    pub(crate) mv: Move,
    pub(crate) kings: [Option<Square>; Color::COUNT],
    pub(crate) turn: Color,
    pub(crate) castling: CastleRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
}

impl Undo {
    /// The move this entry takes back.
    #[inline]
    pub fn mv(&self) -> Move {
        self.mv
    }
}

/// A chess position together with the moves that led to it.
///
/// `hash` always equals the Zobrist hash recomputed from scratch. It is only
/// ever changed through [`place`](Position::place), [`lift`](Position::lift),
/// [`set_castling`](Position::set_castling),
/// [`set_en_passant`](Position::set_en_passant) and
/// [`flip_turn`](Position::flip_turn).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub(crate) board: Board,
    pub(crate) turn: Color,
    pub(crate) castling: CastleRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
    pub(crate) hash: u64,
    pub(crate) history: Vec<Undo>,
}

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

impl Position {
    /// An empty board, White to move, no rights, clocks at `0 1`.
    pub fn empty() -> Position {
        let mut pos = Position {
            board: Board::empty(),
            turn: Color::White,
            castling: CastleRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            hash: 0,
            history: Vec::new(),
        };
        pos.hash = pos.compute_hash();
        pos
    }

    /// The standard starting position.
    pub fn starting() -> Position {
        let mut pos = Position::empty();
        for color in Color::ALL {
            let back = match color {
                Color::White => Square::A1,
                Color::Black => Square::A8,
            };
            let pawns = match color {
                Color::White => Square::A2,
                Color::Black => Square::A7,
            };
            for (i, kind) in BACK_RANK.into_iter().enumerate() {
                if let Some(sq) = back.offset(i as i16) {
                    pos.place(Piece::new(color, kind), sq);
                }
                if let Some(sq) = pawns.offset(i as i16) {
                    pos.place(Piece::new(color, PieceKind::Pawn), sq);
                }
            }
        }
        pos.set_castling(CastleRights::ALL);
        pos
    }

    // ── hash-maintaining primitives ────────────────────────────────────

    /// Put `piece` on an empty `sq`.
    pub(crate) fn place(&mut self, piece: Piece, sq: Square) {
        debug_assert!(self.board.is_empty(sq), "place on occupied {sq}");
        self.board.set(sq, piece);
        self.hash ^= zobrist::piece_key(piece, sq);
    }

    /// Take whatever stands on `sq` off the board.
    pub(crate) fn lift(&mut self, sq: Square) -> Option<Piece> {
        let piece = self.board.clear(sq)?;
        self.hash ^= zobrist::piece_key(piece, sq);
        Some(piece)
    }

    pub(crate) fn set_castling(&mut self, rights: CastleRights) {
        self.hash ^= zobrist::castling_key(self.castling) ^ zobrist::castling_key(rights);
        self.castling = rights;
    }

    pub(crate) fn set_en_passant(&mut self, square: Option<Square>) {
        if let Some(old) = self.en_passant {
            self.hash ^= zobrist::en_passant_key(old.file());
        }
        if let Some(new) = square {
            self.hash ^= zobrist::en_passant_key(new.file());
        }
        self.en_passant = square;
    }

    pub(crate) fn flip_turn(&mut self) {
        self.turn = !self.turn;
        self.hash ^= zobrist::side_key();
    }

    /// Recompute the Zobrist hash from the board and state fields.
    pub fn compute_hash(&self) -> u64 {
        let mut hash = self
            .board
            .pieces()
            .fold(0u64, |h, (sq, piece)| h ^ zobrist::piece_key(piece, sq));
        if self.turn == Color::Black {
            hash ^= zobrist::side_key();
        }
        hash ^= zobrist::castling_key(self.castling);
        if let Some(ep) = self.en_passant {
            hash ^= zobrist::en_passant_key(ep.file());
        }
        hash
    }

    // ── accessors ──────────────────────────────────────────────────────

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn turn(&self) -> Color {
        self.turn
    }

    #[inline]
    pub fn castling(&self) -> CastleRights {
        self.castling
    }

    /// The raw en passant square, as stored; see [`fen`](Position::fen) for
    /// the filtered form.
    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.board.king(color)
    }

    /// Undo entries, oldest first.
    #[inline]
    pub fn history(&self) -> &[Undo] {
        &self.history
    }

    /// Moves played since the position was loaded, oldest first.
    pub fn moves_played(&self) -> impl Iterator<Item = Move> + '_ {
        self.history.iter().map(Undo::mv)
    }

    #[inline]
    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.board.get(sq)
    }

    /// Every square holding `piece`, `a1` to `h8`.
    pub fn find_piece(&self, piece: Piece) -> Vec<Square> {
        self.board
            .pieces()
            .filter(|&(_, p)| p == piece)
            .map(|(sq, _)| sq)
            .collect()
    }

    /// Framed 8x8 diagram of the board.
    pub fn ascii(&self) -> String {
        self.board.pretty().to_string()
    }

    // ── editing ────────────────────────────────────────────────────────

    /// Place `piece` on `sq`, replacing any occupant.
    ///
    /// Returns `false` and leaves the position unchanged when `piece` is a
    /// king and its color already has a king elsewhere. Castling rights whose
    /// king or rook is no longer home are dropped, as is an en passant square
    /// that can no longer be captured.
    pub fn put(&mut self, piece: Piece, sq: Square) -> bool {
        if !self.put_raw(piece, sq) {
            debug!(%piece, square = %sq, "rejected second king");
            return false;
        }
        self.update_castling_rights();
        self.update_en_passant();
        true
    }

    /// [`put`](Position::put) without the castling and en passant follow-up.
    pub(crate) fn put_raw(&mut self, piece: Piece, sq: Square) -> bool {
        if piece.kind == PieceKind::King
            && matches!(self.board.king(piece.color), Some(king) if king != sq)
        {
            return false;
        }
        self.lift(sq);
        self.place(piece, sq);
        true
    }

    /// Remove and return the piece on `sq`, then drop stale castling and en
    /// passant state as [`put`](Position::put) does.
    pub fn remove(&mut self, sq: Square) -> Option<Piece> {
        let piece = self.lift(sq)?;
        self.update_castling_rights();
        self.update_en_passant();
        Some(piece)
    }

    /// Reset to an empty board with White to move and clocks at `0 1`.
    pub fn clear(&mut self) {
        *self = Position::empty();
    }

    /// Rights of `color` only.
    pub fn castling_rights(&self, color: Color) -> CastleRights {
        self.castling.for_color(color)
    }

    /// Grant or revoke `color`'s rights to match `rights`.
    ///
    /// Rights whose king and rook are not home are never granted. Returns
    /// `true` when `color`'s resulting rights equal the requested ones.
    pub fn set_castling_rights(&mut self, color: Color, rights: CastleRights) -> bool {
        let mut updated = self.castling;
        for side in CastleSide::ALL {
            let flag = CastleRights::flag(color, side);
            updated = if rights.contains(flag) {
                updated.insert(flag)
            } else {
                updated.remove(flag)
            };
        }
        self.set_castling(updated);
        self.update_castling_rights();
        self.castling.for_color(color) == rights.for_color(color)
    }

    fn update_castling_rights(&mut self) {
        let mut rights = self.castling;
        for color in Color::ALL {
            if !self
                .board
                .holds(king_home(color), Piece::new(color, PieceKind::King))
            {
                rights = rights.remove(CastleRights::both(color));
                continue;
            }
            for side in CastleSide::ALL {
                if !self
                    .board
                    .holds(side.rook_home(color), Piece::new(color, PieceKind::Rook))
                {
                    rights = rights.remove(CastleRights::flag(color, side));
                }
            }
        }
        if rights != self.castling {
            self.set_castling(rights);
        }
    }

    fn update_en_passant(&mut self) {
        let Some(ep) = self.en_passant else {
            return;
        };
        if !self.en_passant_capturable(ep) {
            self.set_en_passant(None);
        }
    }

    /// Return `true` if `ep` still looks like the skipped square of an enemy
    /// double push that a pawn of the side to move stands ready to capture.
    fn en_passant_capturable(&self, ep: Square) -> bool {
        let us = self.turn;
        let push = us.pawn_push();
        let (Some(start), Some(current)) = (ep.offset(push), ep.offset(-push)) else {
            return false;
        };
        if !self.board.is_empty(start)
            || !self.board.is_empty(ep)
            || !self.board.holds(current, Piece::new(!us, PieceKind::Pawn))
        {
            return false;
        }
        [1, -1].into_iter().any(|side| {
            current
                .offset(side)
                .is_some_and(|sq| self.board.holds(sq, Piece::new(us, PieceKind::Pawn)))
        })
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::starting()
    }
}

#[cfg(test)]
mod tests {
    use super::Position;
    use crate::castle_rights::CastleRights;
    use crate::color::Color;
    use crate::piece::Piece;
    use crate::piece_kind::PieceKind;
    use crate::square::Square;

    fn piece(color: Color, kind: PieceKind) -> Piece {
        Piece::new(color, kind)
    }

    #[test]
    fn starting_position_layout() {
        let pos = Position::starting();
        assert_eq!(pos.get(Square::E1), Some(piece(Color::White, PieceKind::King)));
        assert_eq!(pos.get(Square::D8), Some(piece(Color::Black, PieceKind::Queen)));
        assert_eq!(pos.get(Square::H7), Some(piece(Color::Black, PieceKind::Pawn)));
        assert_eq!(pos.get(Square::E4), None);
        assert_eq!(pos.castling(), CastleRights::ALL);
        assert_eq!(pos.king_square(Color::Black), Some(Square::E8));
        assert_eq!(pos.hash(), pos.compute_hash());
    }

    #[test]
    fn put_rejects_second_king() {
        let mut pos = Position::starting();
        let before = pos.clone();
        assert!(!pos.put(piece(Color::White, PieceKind::King), Square::E4));
        assert_eq!(pos, before);
        // Re-placing the king on its own square is allowed.
        assert!(pos.put(piece(Color::White, PieceKind::King), Square::E1));
    }

    #[test]
    fn put_and_remove_keep_hash_in_sync() {
        let mut pos = Position::starting();
        assert!(pos.put(piece(Color::Black, PieceKind::Knight), Square::E4));
        assert_eq!(pos.hash(), pos.compute_hash());
        assert_eq!(pos.remove(Square::E4), Some(piece(Color::Black, PieceKind::Knight)));
        assert_eq!(pos.remove(Square::E4), None);
        assert_eq!(pos.hash(), Position::starting().hash());
    }

    #[test]
    fn removing_a_rook_drops_its_right() {
        let mut pos = Position::starting();
        pos.remove(Square::H1);
        assert_eq!(pos.castling().to_fen(), "Qkq");
        pos.remove(Square::E8);
        assert_eq!(pos.castling().to_fen(), "Q");
        assert_eq!(pos.king_square(Color::Black), None);
        assert_eq!(pos.hash(), pos.compute_hash());
    }

    #[test]
    fn removing_the_capturer_clears_en_passant() {
        let mut pos: Position = "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1".parse().unwrap();
        assert_eq!(pos.en_passant(), Some(Square::D6));

        // Unrelated edits keep the square.
        assert!(pos.put(piece(Color::White, PieceKind::Knight), Square::A1));
        assert_eq!(pos.en_passant(), Some(Square::D6));

        assert_eq!(pos.remove(Square::E5), Some(piece(Color::White, PieceKind::Pawn)));
        assert_eq!(pos.en_passant(), None);
        assert_eq!(pos.hash(), pos.compute_hash());
    }

    #[test]
    fn filling_the_en_passant_square_clears_it() {
        let mut pos: Position = "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1".parse().unwrap();
        assert!(pos.put(piece(Color::Black, PieceKind::Bishop), Square::D6));
        assert_eq!(pos.en_passant(), None);
        assert_eq!(pos.hash(), pos.compute_hash());
    }

    #[test]
    fn set_castling_rights_only_grants_home_pieces() {
        let mut pos = Position::starting();
        pos.remove(Square::A8);
        assert!(pos.set_castling_rights(Color::White, CastleRights::WHITE_KING));
        assert_eq!(pos.castling_rights(Color::White), CastleRights::WHITE_KING);
        assert!(!pos.set_castling_rights(Color::Black, CastleRights::both(Color::Black)));
        assert_eq!(pos.castling_rights(Color::Black), CastleRights::BLACK_KING);
    }

    #[test]
    fn find_piece_lists_squares() {
        let pos = Position::starting();
        assert_eq!(
            pos.find_piece(piece(Color::White, PieceKind::Bishop)),
            vec![Square::C1, Square::F1]
        );
        assert!(pos.find_piece(piece(Color::White, PieceKind::King)).len() == 1);
    }

    #[test]
    fn clear_empties_everything() {
        let mut pos = Position::starting();
        pos.clear();
        assert_eq!(pos, Position::empty());
        assert_eq!(pos.board().pieces().count(), 0);
    }
}
