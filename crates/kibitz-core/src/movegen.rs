//! Pseudo-legal and legal move generation.

use crate::attacks::{pawn_captures, piece_offsets};
use crate::castle_rights::{CastleRights, CastleSide};
use crate::chess_move::{Move, MoveFlags};
use crate::color::Color;
use crate::piece_kind::PieceKind;
use crate::position::Position;
use crate::square::Square;

/// Restricts which moves [`Position::generate_moves`] returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveFilter {
    /// Only moves starting on this square.
    pub square: Option<Square>,
    /// Only moves of this piece kind.
    pub piece: Option<PieceKind>,
    /// Drop moves that leave the mover's king attacked.
    pub legal: bool,
}

impl Default for MoveFilter {
    fn default() -> Self {
        MoveFilter {
            square: None,
            piece: None,
            legal: true,
        }
    }
}

impl MoveFilter {
    /// Legal moves starting on `square`.
    pub fn from_square(square: Square) -> MoveFilter {
        MoveFilter {
            square: Some(square),
            ..MoveFilter::default()
        }
    }

    /// Legal moves of `piece` kind.
    pub fn for_piece(piece: PieceKind) -> MoveFilter {
        MoveFilter {
            piece: Some(piece),
            ..MoveFilter::default()
        }
    }
}

fn push_move(
    moves: &mut Vec<Move>,
    color: Color,
    from: Square,
    to: Square,
    piece: PieceKind,
    captured: Option<PieceKind>,
    flags: MoveFlags,
) {
    let base = Move {
        color,
        from,
        to,
        piece,
        captured,
        promotion: None,
        flags,
    };
    if piece == PieceKind::Pawn && to.rank() == color.promotion_rank() {
        moves.extend(PieceKind::PROMOTIONS.into_iter().map(|promotion| Move {
            promotion: Some(promotion),
            flags: flags.union(MoveFlags::PROMOTION),
            ..base
        }));
    } else {
        moves.push(base);
    }
}

impl Position {
    /// Legal moves for the side to move.
    pub fn legal_moves(&mut self) -> Vec<Move> {
        self.generate_moves(MoveFilter::default())
    }

    /// Moves for the side to move that obey piece movement rules, ignoring
    /// whether they leave the king attacked.
    pub fn pseudo_legal_moves(&self) -> Vec<Move> {
        self.pseudo_legal(None, None)
    }

    /// Generate moves matching `filter`.
    ///
    /// Legal filtering plays each candidate, tests the mover's king and takes
    /// the move back. Without a king of the side to move, every pseudo-legal
    /// move is returned.
    pub fn generate_moves(&mut self, filter: MoveFilter) -> Vec<Move> {
        let moves = self.pseudo_legal(filter.square, filter.piece);
        let us = self.turn;
        if !filter.legal || self.board.king(us).is_none() {
            return moves;
        }

        moves
            .into_iter()
            .filter(|&mv| {
                self.make_move(mv);
                let legal = !self.board.is_king_attacked(us);
                self.undo_move();
                legal
            })
            .collect()
    }

    fn pseudo_legal(&self, only_square: Option<Square>, only_piece: Option<PieceKind>) -> Vec<Move> {
        let us = self.turn;
        let them = !us;
        let mut moves = Vec::with_capacity(48);

        let sources: Vec<Square> = match only_square {
            Some(sq) => vec![sq],
            None => Square::all().collect(),
        };

        for from in sources {
            let Some(piece) = self.board.get(from) else {
                continue;
            };
            if piece.color != us || only_piece.is_some_and(|kind| kind != piece.kind) {
                continue;
            }

            if piece.kind == PieceKind::Pawn {
                self.pawn_moves(&mut moves, from);
                continue;
            }

            for &offset in piece_offsets(piece.kind) {
                let mut to = from;
                while let Some(next) = to.offset(offset) {
                    to = next;
                    match self.board.get(to) {
                        None => push_move(&mut moves, us, from, to, piece.kind, None, MoveFlags::NORMAL),
                        Some(target) => {
                            if target.color == them {
                                push_move(
                                    &mut moves,
                                    us,
                                    from,
                                    to,
                                    piece.kind,
                                    Some(target.kind),
                                    MoveFlags::CAPTURE,
                                );
                            }
                            break;
                        }
                    }
                    if !piece.kind.is_slider() {
                        break;
                    }
                }
            }
        }

        let king = self.board.king(us);
        let wants_king = only_piece.is_none_or(|kind| kind == PieceKind::King);
        if let Some(king) = king
            && wants_king
            && only_square.is_none_or(|sq| sq == king)
        {
            self.castling_moves(&mut moves, king);
        }

        moves
    }

    fn pawn_moves(&self, moves: &mut Vec<Move>, from: Square) {
        let us = self.turn;
        let them = !us;
        let push = us.pawn_push();

        if let Some(single) = from.offset(push)
            && self.board.is_empty(single)
        {
            push_move(moves, us, from, single, PieceKind::Pawn, None, MoveFlags::NORMAL);
            if from.rank() == us.pawn_rank()
                && let Some(double) = single.offset(push)
                && self.board.is_empty(double)
            {
                push_move(moves, us, from, double, PieceKind::Pawn, None, MoveFlags::BIG_PAWN);
            }
        }

        for step in pawn_captures(us) {
            let Some(to) = from.offset(step) else {
                continue;
            };
            match self.board.get(to) {
                Some(target) if target.color == them => push_move(
                    moves,
                    us,
                    from,
                    to,
                    PieceKind::Pawn,
                    Some(target.kind),
                    MoveFlags::CAPTURE,
                ),
                None if self.en_passant == Some(to) => push_move(
                    moves,
                    us,
                    from,
                    to,
                    PieceKind::Pawn,
                    Some(PieceKind::Pawn),
                    MoveFlags::EN_PASSANT,
                ),
                _ => {}
            }
        }
    }

    fn castling_moves(&self, moves: &mut Vec<Move>, king: Square) {
        let us = self.turn;
        let them = !us;
        let board = &self.board;

        for side in CastleSide::ALL {
            if !self.castling.contains(CastleRights::flag(us, side)) {
                continue;
            }
            let step = side.king_step() / 2;
            let (Some(transit), Some(to)) = (king.offset(step), king.offset(2 * step)) else {
                continue;
            };
            let path_clear = board.is_empty(transit)
                && board.is_empty(to)
                && match side {
                    CastleSide::KingSide => true,
                    CastleSide::QueenSide => king.offset(3 * step).is_some_and(|sq| board.is_empty(sq)),
                };
            if path_clear
                && !board.is_attacked(king, them)
                && !board.is_attacked(transit, them)
                && !board.is_attacked(to, them)
            {
                let flags = match side {
                    CastleSide::KingSide => MoveFlags::KINGSIDE_CASTLE,
                    CastleSide::QueenSide => MoveFlags::QUEENSIDE_CASTLE,
                };
                push_move(moves, us, king, to, PieceKind::King, None, flags);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MoveFilter;
    use crate::chess_move::MoveFlags;
    use crate::piece_kind::PieceKind;
    use crate::fen::LoadOptions;
    use crate::position::Position;
    use crate::square::Square;

    fn position(fen: &str) -> Position {
        Position::load(fen, LoadOptions::default()).unwrap()
    }

    #[test]
    fn starting_position_has_twenty_moves() {
        let mut pos = Position::starting();
        assert_eq!(pos.legal_moves().len(), 20);
        assert_eq!(pos.pseudo_legal_moves().len(), 20);
    }

    #[test]
    fn square_and_piece_filters() {
        let mut pos = Position::starting();
        let knight = pos.generate_moves(MoveFilter::from_square(Square::G1));
        assert_eq!(knight.len(), 2);
        assert!(knight.iter().all(|mv| mv.piece == PieceKind::Knight));

        let pawns = pos.generate_moves(MoveFilter::for_piece(PieceKind::Pawn));
        assert_eq!(pawns.len(), 16);
        assert_eq!(pawns.iter().filter(|mv| mv.is_big_pawn()).count(), 8);

        assert!(pos.generate_moves(MoveFilter::from_square(Square::E4)).is_empty());
        assert!(pos.generate_moves(MoveFilter::from_square(Square::E7)).is_empty());
    }

    #[test]
    fn promotions_expand_in_order() {
        let mut pos = position("1r2k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        let moves = pos.generate_moves(MoveFilter::from_square(Square::A7));
        let promos: Vec<_> = moves.iter().map(|mv| (mv.to, mv.promotion.unwrap())).collect();
        assert_eq!(
            promos,
            vec![
                (Square::A8, PieceKind::Knight),
                (Square::A8, PieceKind::Bishop),
                (Square::A8, PieceKind::Rook),
                (Square::A8, PieceKind::Queen),
                (Square::B8, PieceKind::Knight),
                (Square::B8, PieceKind::Bishop),
                (Square::B8, PieceKind::Rook),
                (Square::B8, PieceKind::Queen),
            ]
        );
        assert_eq!(moves[0].flags, MoveFlags::NORMAL.union(MoveFlags::PROMOTION));
        assert_eq!(moves[4].flags, MoveFlags::CAPTURE.union(MoveFlags::PROMOTION));
        assert_eq!(moves[4].captured, Some(PieceKind::Rook));
    }

    #[test]
    fn en_passant_capture_generated() {
        let mut pos = position("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3");
        let ep: Vec<_> = pos
            .legal_moves()
            .into_iter()
            .filter(|mv| mv.is_en_passant())
            .collect();
        assert_eq!(ep.len(), 1);
        assert_eq!(ep[0].from, Square::E5);
        assert_eq!(ep[0].to, Square::F6);
        assert_eq!(ep[0].captured, Some(PieceKind::Pawn));
    }

    #[test]
    fn castling_requires_safe_empty_path() {
        let mut pos = position("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let castles = pos
            .legal_moves()
            .into_iter()
            .filter(|mv| mv.castle_side().is_some())
            .count();
        assert_eq!(castles, 2);

        // Rook on f8 covers f1: no king-side castling.
        let mut pos = position("r3kr2/8/8/8/8/8/8/R3K2R w KQq - 0 1");
        let targets: Vec<_> = pos
            .legal_moves()
            .into_iter()
            .filter(|mv| mv.castle_side().is_some())
            .map(|mv| mv.to)
            .collect();
        assert_eq!(targets, vec![Square::C1]);

        // b1 occupied blocks queen-side castling even though the king never crosses it.
        let mut pos = position("4k3/8/8/8/8/8/8/RN2K2R w KQ - 0 1");
        let targets: Vec<_> = pos
            .legal_moves()
            .into_iter()
            .filter(|mv| mv.castle_side().is_some())
            .map(|mv| mv.to)
            .collect();
        assert_eq!(targets, vec![Square::G1]);
    }

    #[test]
    fn pinned_piece_cannot_move() {
        let mut pos = position("4k3/4r3/8/8/8/8/4N3/4K3 w - - 0 1");
        assert!(pos.generate_moves(MoveFilter::from_square(Square::E2)).is_empty());
        let pseudo = pos.generate_moves(MoveFilter {
            legal: false,
            ..MoveFilter::from_square(Square::E2)
        });
        assert_eq!(pseudo.len(), 6);
    }

    #[test]
    fn no_king_returns_pseudo_legal() {
        let mut pos =
            Position::load("8/8/8/8/8/8/8/R7 w - - 0 1", LoadOptions { skip_validation: true })
                .unwrap();
        assert_eq!(pos.legal_moves().len(), 14);
    }
}
