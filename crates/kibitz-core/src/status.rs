//! Check, mate and draw predicates, and the repetition table.

use std::collections::HashMap;

use crate::piece_kind::PieceKind;
use crate::position::Position;

/// Halfmove clock value at which the fifty-move rule applies.
pub const FIFTY_MOVE_PLIES: u32 = 100;

impl Position {
    /// Return `true` if the side to move is in check.
    pub fn is_check(&self) -> bool {
        self.board.is_king_attacked(self.turn)
    }

    pub fn is_checkmate(&mut self) -> bool {
        self.is_check() && self.legal_moves().is_empty()
    }

    pub fn is_stalemate(&mut self) -> bool {
        !self.is_check() && self.legal_moves().is_empty()
    }

    /// Return `true` for K v K, K and one minor piece v K, and positions
    /// where every piece besides the kings is a bishop, all on one square color.
    pub fn is_insufficient_material(&self) -> bool {
        let mut total = 0;
        let mut knights = 0;
        let mut bishops_on_light = 0;
        let mut bishops = 0;
        for (sq, piece) in self.board.pieces() {
            total += 1;
            match piece.kind {
                PieceKind::Knight => knights += 1,
                PieceKind::Bishop => {
                    bishops += 1;
                    if sq.is_light() {
                        bishops_on_light += 1;
                    }
                }
                _ => {}
            }
        }

        match total {
            2 => true,
            3 if bishops == 1 || knights == 1 => true,
            _ => total == bishops + 2 && (bishops_on_light == 0 || bishops_on_light == bishops),
        }
    }

    pub fn is_draw_by_fifty_moves(&self) -> bool {
        self.halfmove_clock >= FIFTY_MOVE_PLIES
    }
}

/// Occurrence count of every position reached in a game, keyed by Zobrist hash.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepetitionTable {
    counts: HashMap<u64, u32>,
}

impl RepetitionTable {
    pub fn new() -> RepetitionTable {
        RepetitionTable::default()
    }

    /// Count one more occurrence of `hash`.
    pub fn record(&mut self, hash: u64) {
        *self.counts.entry(hash).or_insert(0) += 1;
    }

    /// Forget one occurrence of `hash`, dropping the entry at zero.
    pub fn release(&mut self, hash: u64) {
        if let Some(count) = self.counts.get_mut(&hash) {
            *count -= 1;
            if *count == 0 {
                self.counts.remove(&hash);
            }
        }
    }

    pub fn count(&self, hash: u64) -> u32 {
        self.counts.get(&hash).copied().unwrap_or(0)
    }

    /// Return `true` once `hash` has occurred three or more times.
    pub fn is_threefold(&self, hash: u64) -> bool {
        self.count(hash) >= 3
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }

    /// Number of distinct positions recorded.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
