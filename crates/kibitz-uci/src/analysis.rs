//! Aggregating engine output for one analysed position.

use std::collections::BTreeMap;

use kibitz_core::{Color, Move, Position, Square};

use crate::error::UciError;
use crate::info::{BestMove, InfoLine, Score, ScoreBound};

/// A from/to pair to draw over the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arrow {
    pub from: Square,
    pub to: Square,
}

/// The latest report for one principal variation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PvLine {
    pub multipv: u32,
    pub depth: Option<u32>,
    /// As reported: from the side to move's point of view.
    pub score: Option<Score>,
    pub bound: ScoreBound,
    /// The legal prefix of the reported variation.
    pub moves: Vec<Move>,
    pub san: Vec<String>,
    side: Color,
    fullmove_number: u32,
}

impl PvLine {
    /// Score from White's point of view.
    pub fn white_score(&self) -> Option<Score> {
        self.score.map(|score| score.for_white(self.side))
    }

    pub fn arrow(&self) -> Option<Arrow> {
        self.moves
            .first()
            .filter(|mv| !mv.is_null())
            .map(|mv| Arrow {
                from: mv.from,
                to: mv.to,
            })
    }

    /// The variation with move numbers, e.g. `12... Kd7 13. Ke2`.
    pub fn numbered(&self) -> String {
        let mut out = Vec::with_capacity(self.san.len() * 2);
        let mut number = self.fullmove_number;
        let mut side = self.side;
        for (ply, san) in self.san.iter().enumerate() {
            match side {
                Color::White => out.push(format!("{number}.")),
                Color::Black if ply == 0 => out.push(format!("{number}...")),
                Color::Black => {}
            }
            out.push(san.clone());
            if side == Color::Black {
                number += 1;
            }
            side = !side;
        }
        out.join(" ")
    }
}

/// Engine findings for a single position.
///
/// Only the most recent report per `multipv` index is kept. Variations are
/// replayed on the analysed position and cut at the first move that is not
/// legal there.
#[derive(Debug, Clone)]
pub struct Analysis {
    position: Position,
    lines: BTreeMap<u32, PvLine>,
    best_move: Option<BestMove>,
}

impl Analysis {
    pub fn new(fen: &str) -> Result<Analysis, UciError> {
        let position: Position = fen.parse().map_err(|source| UciError::InvalidFen {
            fen: fen.to_string(),
            source,
        })?;
        Ok(Analysis::from_position(position))
    }

    pub fn from_position(position: Position) -> Analysis {
        Analysis {
            position,
            lines: BTreeMap::new(),
            best_move: None,
        }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Record an `info` line. Lines without a variation are ignored.
    pub fn update(&mut self, info: InfoLine) {
        if info.pv.is_empty() {
            return;
        }
        let mut replay = self.position.clone();
        let mut moves = Vec::new();
        let mut san = Vec::new();
        for uci in &info.pv {
            let Some(mv) = replay.move_from_uci(uci) else {
                break;
            };
            san.push(replay.move_to_san(mv));
            replay.make_move(mv);
            moves.push(mv);
        }

        let multipv = info.multipv.unwrap_or(1);
        self.lines.insert(
            multipv,
            PvLine {
                multipv,
                depth: info.depth,
                score: info.score,
                bound: info.bound,
                moves,
                san,
                side: self.position.turn(),
                fullmove_number: self.position.fullmove_number(),
            },
        );
    }

    /// Record the final `bestmove`.
    pub fn finish(&mut self, best: BestMove) {
        self.best_move = Some(best);
    }

    pub fn is_finished(&self) -> bool {
        self.best_move.is_some()
    }

    /// The engine's chosen move in coordinate notation.
    pub fn best_move(&self) -> Option<&str> {
        self.best_move.as_ref().and_then(|best| best.mv.as_deref())
    }

    pub fn ponder_move(&self) -> Option<&str> {
        self.best_move.as_ref().and_then(|best| best.ponder.as_deref())
    }

    /// Lines ordered by `multipv` index.
    pub fn lines(&self) -> impl Iterator<Item = &PvLine> {
        self.lines.values()
    }

    pub fn line(&self, multipv: u32) -> Option<&PvLine> {
        self.lines.get(&multipv)
    }

    /// First move of each line, best line first.
    pub fn arrows(&self) -> Vec<Arrow> {
        self.lines.values().filter_map(PvLine::arrow).collect()
    }
}
