//! Applying and taking back moves on a [`Position`].

use crate::castle_rights::{CastleRights, CastleSide};
use crate::chess_move::Move;
use crate::color::Color;
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::position::{Position, Undo};

impl Position {
    /// Play `mv`, pushing an undo entry.
    ///
    /// The move is trusted: it must come from the generator for this exact
    /// position (or be [`Move::null`] for the side to move).
    ///
    /// # Panics
    ///
    /// Panics if `mv` is not a null move and its source square is empty.
    pub fn make_move(&mut self, mv: Move) {
        let us = self.turn;
        let them = !us;

        self.history.push(Undo {
            mv,
            kings: self.board.kings(),
            turn: us,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        });

        if mv.is_null() {
            if us == Color::Black {
                self.fullmove_number += 1;
            }
            self.halfmove_clock += 1;
            self.set_en_passant(None);
            self.flip_turn();
            return;
        }

        let moving = self
            .lift(mv.from)
            .unwrap_or_else(|| panic!("make_move: no piece on {} for {mv}", mv.from));

        if mv.is_en_passant() {
            if let Some(victim) = mv.to.offset(-us.pawn_push()) {
                self.lift(victim);
            }
        } else {
            self.lift(mv.to);
        }

        let landed = match mv.promotion {
            Some(kind) => Piece::new(us, kind),
            None => moving,
        };
        self.place(landed, mv.to);

        let mut rights = self.castling;
        if moving.kind == PieceKind::King {
            if let Some(side) = mv.castle_side()
                && let Some(rook) = self.lift(side.rook_home(us))
            {
                self.place(rook, side.rook_target(us));
            }
            rights = rights.remove(CastleRights::both(us));
        }
        for side in CastleSide::ALL {
            if mv.from == side.rook_home(us) {
                rights = rights.remove(CastleRights::flag(us, side));
            }
            if mv.to == side.rook_home(them) {
                rights = rights.remove(CastleRights::flag(them, side));
            }
        }
        if rights != self.castling {
            self.set_castling(rights);
        }

        let en_passant = if mv.is_big_pawn() {
            let enemy_pawn = Piece::new(them, PieceKind::Pawn);
            let adjacent_enemy = [1, -1].into_iter().any(|side| {
                mv.to
                    .offset(side)
                    .is_some_and(|sq| self.board.holds(sq, enemy_pawn))
            });
            if adjacent_enemy {
                mv.to.offset(-us.pawn_push())
            } else {
                None
            }
        } else {
            None
        };
        self.set_en_passant(en_passant);

        if mv.piece == PieceKind::Pawn || mv.is_capture() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if us == Color::Black {
            self.fullmove_number += 1;
        }
        self.flip_turn();
    }

    /// Take back the last move, returning it, or `None` if nothing was played.
    pub fn undo_move(&mut self) -> Option<Move> {
        let undo = self.history.pop()?;
        let mv = undo.mv;
        let us = undo.turn;

        self.set_castling(undo.castling);
        self.set_en_passant(undo.en_passant);
        if self.turn != us {
            self.flip_turn();
        }
        self.halfmove_clock = undo.halfmove_clock;
        self.fullmove_number = undo.fullmove_number;

        if !mv.is_null() {
            self.lift(mv.to);
            self.place(Piece::new(us, mv.piece), mv.from);

            if let Some(captured) = mv.captured {
                let victim = if mv.is_en_passant() {
                    mv.to.offset(-us.pawn_push())
                } else {
                    Some(mv.to)
                };
                if let Some(sq) = victim {
                    self.place(Piece::new(!us, captured), sq);
                }
            }

            if let Some(side) = mv.castle_side()
                && let Some(rook) = self.lift(side.rook_target(us))
            {
                self.place(rook, side.rook_home(us));
            }
        }

        self.board.restore_kings(undo.kings);
        Some(mv)
    }

    /// Undo every move, returning them oldest first.
    pub fn rewind(&mut self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(self.history.len());
        while let Some(mv) = self.undo_move() {
            moves.push(mv);
        }
        moves.reverse();
        moves
    }
}
