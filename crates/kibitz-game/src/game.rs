//! The [`Game`] façade: a position plus everything a game record carries.

use std::fmt;

use kibitz_core::{
    Color, FenError, LoadOptions, Move, MoveError, MoveFilter, Piece, PieceKind, Position,
    RepetitionTable, STARTING_FEN, SanMatch, SanMode, Square,
};
use tracing::{debug, info};

use crate::comments::Comments;
use crate::error::PgnError;
use crate::headers::Headers;
use crate::pgn::{self, PgnOptions, PgnWriteOptions, writer};
use crate::record::MoveRecord;

/// Options for [`Game::load`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameLoadOptions {
    /// Skip the chess sanity checks on the FEN.
    pub skip_validation: bool,
    /// Keep the current headers instead of clearing them.
    pub preserve_headers: bool,
}

/// Options for [`Game::clear`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearOptions {
    /// Keep the current headers, apart from `SetUp` and `FEN`.
    pub preserve_headers: bool,
}

/// A move given by its squares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRequest {
    pub from: Square,
    pub to: Square,
    /// Required for pawn moves to the last rank; must be `None` otherwise.
    pub promotion: Option<PieceKind>,
}

impl MoveRequest {
    pub fn new(from: Square, to: Square) -> MoveRequest {
        MoveRequest {
            from,
            to,
            promotion: None,
        }
    }

    pub fn promoting(self, kind: PieceKind) -> MoveRequest {
        MoveRequest {
            promotion: Some(kind),
            ..self
        }
    }
}

impl fmt::Display for MoveRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind.to_char())?;
        }
        Ok(())
    }
}

/// A chess game: position and move stack, repetition counts, PGN headers
/// and comments.
///
/// Every `play_*` method either commits a legal move or returns an error
/// with the game unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    position: Position,
    repetitions: RepetitionTable,
    headers: Headers,
    comments: Comments,
}

impl Default for Game {
    fn default() -> Game {
        Game::new()
    }
}

impl Game {
    /// A game from the standard starting position.
    pub fn new() -> Game {
        Game::starting_from(Position::starting())
    }

    /// A game from a validated FEN.
    pub fn from_fen(fen: &str) -> Result<Game, FenError> {
        Ok(Game::starting_from(Position::load(fen, LoadOptions::default())?))
    }

    fn starting_from(position: Position) -> Game {
        let mut game = Game {
            position,
            repetitions: RepetitionTable::new(),
            headers: Headers::new(),
            comments: Comments::new(),
        };
        game.repetitions.record(game.position.hash());
        game.update_setup();
        game
    }

    /// Replace the game with the position in `fen`.
    ///
    /// On error the game is left as it was.
    pub fn load(&mut self, fen: &str, options: GameLoadOptions) -> Result<(), FenError> {
        let position = Position::load(
            fen,
            LoadOptions {
                skip_validation: options.skip_validation,
            },
        )?;
        self.install(position, options.preserve_headers);
        Ok(())
    }

    fn install(&mut self, position: Position, preserve_headers: bool) {
        self.clear_with(preserve_headers);
        self.position = position;
        self.repetitions.record(self.position.hash());
        self.update_setup();
    }

    /// Back to the standard starting position with no headers.
    pub fn reset(&mut self) {
        self.install(Position::starting(), false);
    }

    /// Empty board with no history or comments.
    ///
    /// Headers are dropped unless `options.preserve_headers` is set; `SetUp`
    /// and `FEN` always go.
    pub fn clear(&mut self, options: ClearOptions) {
        self.clear_with(options.preserve_headers);
    }

    fn clear_with(&mut self, preserve_headers: bool) {
        self.position.clear();
        self.repetitions.clear();
        self.comments.clear();
        if !preserve_headers {
            self.headers.clear();
        }
        self.headers.remove("SetUp");
        self.headers.remove("FEN");
    }

    /// While no move has been played, keep `SetUp`/`FEN` in step with the
    /// position.
    fn update_setup(&mut self) {
        if !self.position.history().is_empty() {
            return;
        }
        let fen = self.position.fen();
        if fen == STARTING_FEN {
            self.headers.remove("SetUp");
            self.headers.remove("FEN");
        } else {
            self.headers.set("SetUp", "1");
            self.headers.set("FEN", fen);
        }
    }

    // ── position ───────────────────────────────────────────────────────

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn fen(&self) -> String {
        self.position.fen()
    }

    pub fn ascii(&self) -> String {
        self.position.ascii()
    }

    pub fn turn(&self) -> Color {
        self.position.turn()
    }

    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.position.get(sq)
    }

    /// Place a piece; `false` if it would be a second king of its color.
    pub fn put(&mut self, piece: Piece, sq: Square) -> bool {
        let placed = self.position.put(piece, sq);
        if placed {
            self.update_setup();
        }
        placed
    }

    pub fn remove(&mut self, sq: Square) -> Option<Piece> {
        let removed = self.position.remove(sq);
        if removed.is_some() {
            self.update_setup();
        }
        removed
    }

    // ── moves ──────────────────────────────────────────────────────────

    pub fn moves(&mut self) -> Vec<Move> {
        self.position.legal_moves()
    }

    pub fn moves_san(&mut self) -> Vec<String> {
        self.position.legal_moves_san()
    }

    pub fn moves_filtered(&mut self, filter: MoveFilter) -> Vec<Move> {
        self.position.generate_moves(filter)
    }

    /// Play a move given in SAN.
    pub fn play_san(&mut self, san: &str, mode: SanMode) -> Result<Move, MoveError> {
        match self.position.parse_san(san, mode) {
            SanMatch::Exact(mv) => self.commit(mv),
            SanMatch::Ambiguous(moves) => {
                let candidates: Vec<String> = moves
                    .into_iter()
                    .map(|mv| self.position.move_to_san(mv))
                    .collect();
                debug!(san, ?candidates, fen = %self.position, "ambiguous move");
                Err(MoveError::AmbiguousMove {
                    input: san.to_string(),
                    candidates,
                })
            }
            SanMatch::NoMatch => {
                debug!(san, fen = %self.position, "rejected move");
                Err(MoveError::IllegalMove {
                    input: san.to_string(),
                })
            }
        }
    }

    /// Play a move in coordinate form (`e2e4`, `e7e8q`, `0000`).
    pub fn play_uci(&mut self, uci: &str) -> Result<Move, MoveError> {
        match self.position.move_from_uci(uci) {
            Some(mv) => self.commit(mv),
            None => {
                debug!(uci, fen = %self.position, "rejected move");
                Err(MoveError::IllegalMove {
                    input: uci.to_string(),
                })
            }
        }
    }

    pub fn play_move(&mut self, request: MoveRequest) -> Result<Move, MoveError> {
        let found = self
            .position
            .generate_moves(MoveFilter::from_square(request.from))
            .into_iter()
            .find(|mv| mv.to == request.to && mv.promotion == request.promotion);
        match found {
            Some(mv) => self.commit(mv),
            None => {
                debug!(%request, fen = %self.position, "rejected move");
                Err(MoveError::IllegalMove {
                    input: request.to_string(),
                })
            }
        }
    }

    /// Pass the turn. Not allowed while in check.
    pub fn play_null(&mut self) -> Result<Move, MoveError> {
        self.commit(Move::null(self.position.turn()))
    }

    fn commit(&mut self, mv: Move) -> Result<Move, MoveError> {
        if mv.is_null() && self.position.is_check() {
            return Err(MoveError::NullMoveWhileInCheck);
        }
        self.apply(mv);
        Ok(mv)
    }

    fn apply(&mut self, mv: Move) {
        self.position.make_move(mv);
        self.repetitions.record(self.position.hash());
    }

    /// Take back the last move.
    pub fn undo(&mut self) -> Option<Move> {
        let hash = self.position.hash();
        let mv = self.position.undo_move()?;
        self.repetitions.release(hash);
        Some(mv)
    }

    /// Starting position of the move stack, and the moves played from it.
    fn timeline(&self) -> (Position, Vec<Move>) {
        let mut start = self.position.clone();
        let moves = start.rewind();
        (start, moves)
    }

    /// Moves played so far, in SAN.
    pub fn history(&self) -> Vec<String> {
        let (mut position, moves) = self.timeline();
        moves
            .into_iter()
            .map(|mv| {
                let san = position.move_to_san(mv);
                position.make_move(mv);
                san
            })
            .collect()
    }

    pub fn history_verbose(&self) -> Vec<MoveRecord> {
        let (mut position, moves) = self.timeline();
        moves
            .into_iter()
            .map(|mv| {
                let before = position.fen();
                let san = position.move_to_san(mv);
                position.make_move(mv);
                MoveRecord::new(mv, san, before, position.fen())
            })
            .collect()
    }

    pub fn move_number(&self) -> u32 {
        self.position.fullmove_number()
    }

    // ── status ─────────────────────────────────────────────────────────

    pub fn is_check(&self) -> bool {
        self.position.is_check()
    }

    pub fn is_checkmate(&mut self) -> bool {
        self.position.is_checkmate()
    }

    pub fn is_stalemate(&mut self) -> bool {
        self.position.is_stalemate()
    }

    pub fn is_insufficient_material(&self) -> bool {
        self.position.is_insufficient_material()
    }

    /// The current position has occurred at least three times.
    pub fn is_threefold_repetition(&self) -> bool {
        self.repetitions.is_threefold(self.position.hash())
    }

    pub fn is_draw_by_fifty_moves(&self) -> bool {
        self.position.is_draw_by_fifty_moves()
    }

    pub fn is_draw(&mut self) -> bool {
        self.is_draw_by_fifty_moves()
            || self.is_stalemate()
            || self.is_insufficient_material()
            || self.is_threefold_repetition()
    }

    pub fn is_game_over(&mut self) -> bool {
        self.is_checkmate() || self.is_draw()
    }

    // ── headers ────────────────────────────────────────────────────────

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.set(name, value);
    }

    pub fn remove_header(&mut self, name: &str) -> Option<String> {
        self.headers.remove(name)
    }

    // ── comments ───────────────────────────────────────────────────────

    /// Comment on the current position.
    pub fn comment(&self) -> Option<&str> {
        self.comments.get(&self.position.fen())
    }

    pub fn set_comment(&mut self, text: impl Into<String>) {
        self.comments.set(self.position.fen(), text);
    }

    pub fn remove_comment(&mut self) -> Option<String> {
        self.comments.remove(&self.position.fen())
    }

    /// Every comment on a position along the move stack, as `(fen, text)`.
    ///
    /// Comments on positions no longer reachable are discarded first.
    pub fn comments(&mut self) -> Vec<(String, String)> {
        self.prune_comments();
        self.comments
            .iter()
            .map(|(fen, text)| (fen.to_string(), text.to_string()))
            .collect()
    }

    /// Remove and return every reachable comment.
    pub fn remove_comments(&mut self) -> Vec<(String, String)> {
        self.prune_comments();
        self.comments.take_all()
    }

    fn prune_comments(&mut self) {
        let (mut position, moves) = self.timeline();
        let mut reachable = vec![position.fen()];
        for mv in moves {
            position.make_move(mv);
            reachable.push(position.fen());
        }
        self.comments.prune(reachable.iter().map(String::as_str));
    }

    // ── PGN ────────────────────────────────────────────────────────────

    /// Replace the game with the main line of a PGN game.
    ///
    /// Headers are taken as given. A `FEN` tag sets the starting position
    /// (in strict mode only together with `SetUp "1"`), moves are read as SAN
    /// with the same strictness, comments are attached to the positions they
    /// follow, and the `Result` tag is set from the termination marker. On
    /// error the game is left as it was.
    pub fn load_pgn(&mut self, text: &str, options: PgnOptions) -> Result<(), PgnError> {
        let parsed = pgn::parse(text)?;

        let start_fen = match (parsed.headers.get("SetUp"), parsed.headers.get("FEN")) {
            (Some("1"), Some(fen)) => Some(fen.to_string()),
            (Some("1"), None) if options.strict => return Err(PgnError::SetUpWithoutFen),
            (_, Some(_)) if options.strict => return Err(PgnError::FenWithoutSetUp),
            (_, fen) => fen.map(str::to_string),
        };

        let mut game = Game::new();
        game.headers = parsed.headers;
        if let Some(fen) = start_fen {
            game.load(
                &fen,
                GameLoadOptions {
                    skip_validation: false,
                    preserve_headers: true,
                },
            )?;
        }

        if let Some(comment) = &parsed.root.comment {
            game.set_comment(comment.clone());
        }

        let mode = if options.strict {
            SanMode::Strict
        } else {
            SanMode::Permissive
        };
        for (ply, node) in parsed.root.mainline().enumerate() {
            let san = node.san.as_deref().unwrap_or_default();
            let illegal = || PgnError::IllegalMove {
                san: san.to_string(),
                ply: ply + 1,
            };
            let SanMatch::Exact(mv) = game.position.parse_san(san, mode) else {
                debug!(san, ply = ply + 1, fen = %game.position, "unplayable PGN move");
                return Err(illegal());
            };
            game.commit(mv).map_err(|_| illegal())?;
            if let Some(comment) = &node.comment {
                game.set_comment(comment.clone());
            }
        }

        if let Some(result) = parsed.result
            && !game.headers.is_empty()
            && game.headers.get("Result") != Some(result.as_str())
        {
            game.headers.set("Result", result);
        }

        info!(
            plies = game.position.history().len(),
            headers = game.headers.len(),
            "loaded PGN"
        );
        *self = game;
        Ok(())
    }

    /// Export the game as PGN.
    pub fn pgn(&self, options: &PgnWriteOptions) -> String {
        let (start, moves) = self.timeline();
        writer::write(&self.headers, start, &moves, &self.comments, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(game: &mut Game, moves: &[&str]) {
        for san in moves {
            game.play_san(san, SanMode::Strict)
                .unwrap_or_else(|e| panic!("{san}: {e}"));
        }
    }

    #[test]
    fn illegal_moves_leave_game_unchanged() {
        let mut game = Game::new();
        let before = game.clone();
        assert_eq!(
            game.play_san("e5", SanMode::Strict),
            Err(MoveError::IllegalMove {
                input: "e5".to_string()
            })
        );
        assert!(game.play_uci("e2e5").is_err());
        assert!(game.play_move(MoveRequest::new(Square::E1, Square::E2)).is_err());
        assert_eq!(game, before);
    }

    #[test]
    fn ambiguous_move_lists_candidates() {
        let mut game = Game::from_fen("4k3/8/8/8/8/8/4K3/R6R w - - 0 1").unwrap();
        let err = game.play_san("Rd1", SanMode::Strict).unwrap_err();
        assert_eq!(
            err,
            MoveError::AmbiguousMove {
                input: "Rd1".to_string(),
                candidates: vec!["Rad1".to_string(), "Rhd1".to_string()],
            }
        );
    }

    #[test]
    fn promotion_requires_piece() {
        let mut game = Game::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(game.play_move(MoveRequest::new(Square::A7, Square::A8)).is_err());
        let mv = game
            .play_move(MoveRequest::new(Square::A7, Square::A8).promoting(PieceKind::Knight))
            .unwrap();
        assert_eq!(mv.promotion, Some(PieceKind::Knight));
        assert_eq!(game.history(), ["a8=N"]);
    }

    #[test]
    fn null_move_refused_in_check() {
        let mut game = Game::from_fen("4k3/8/8/8/8/8/8/4K2r w - - 0 1").unwrap();
        assert_eq!(game.play_null(), Err(MoveError::NullMoveWhileInCheck));
        let mut game = Game::new();
        game.play_null().unwrap();
        assert_eq!(game.turn(), Color::Black);
        assert_eq!(game.history(), ["--"]);
    }

    #[test]
    fn setup_headers_follow_board_edits() {
        let mut game = Game::new();
        assert!(!game.headers().contains("FEN"));
        game.remove(Square::A1);
        assert_eq!(game.headers().get("SetUp"), Some("1"));
        assert_eq!(game.headers().get("FEN"), Some(game.fen().as_str()));

        game.put(Piece::new(Color::White, PieceKind::Rook), Square::A1);
        // Castling rights lost with the rook stay lost.
        assert!(game.headers().contains("FEN"));

        game.reset();
        assert!(game.headers().is_empty());
        play(&mut game, &["e4"]);
        game.remove(Square::H8);
        assert!(!game.headers().contains("FEN"));
    }

    #[test]
    fn clear_keeps_no_setup() {
        let mut game = Game::new();
        game.set_header("White", "Kasparov");
        game.clear(ClearOptions::default());
        assert!(game.headers().is_empty());
        assert_eq!(game.fen(), "8/8/8/8/8/8/8/8 w - - 0 1");
        assert!(game.put(Piece::new(Color::White, PieceKind::King), Square::E1));
        assert!(!game.put(Piece::new(Color::White, PieceKind::King), Square::E2));
        assert_eq!(game.headers().get("FEN"), Some("8/8/8/8/8/8/8/4K3 w - - 0 1"));
    }

    #[test]
    fn clear_preserving_headers() {
        let mut game = Game::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        game.set_header("White", "Kasparov");
        assert_eq!(game.headers().get("SetUp"), Some("1"));
        game.play_san("Kd2", SanMode::Strict).unwrap();
        game.set_comment("centralising");

        game.clear(ClearOptions {
            preserve_headers: true,
        });
        assert_eq!(game.headers().get("White"), Some("Kasparov"));
        assert!(!game.headers().contains("SetUp"));
        assert!(!game.headers().contains("FEN"));
        assert!(game.history().is_empty());
        assert!(game.comments().is_empty());
        assert_eq!(game.fen(), "8/8/8/8/8/8/8/8 w - - 0 1");
    }

    #[test]
    fn load_preserving_headers() {
        let mut game = Game::new();
        game.set_header("Event", "Club night");
        game.load(
            "4k3/8/8/8/8/8/8/4K3 w - - 0 1",
            GameLoadOptions {
                preserve_headers: true,
                ..GameLoadOptions::default()
            },
        )
        .unwrap();
        assert_eq!(game.headers().get("Event"), Some("Club night"));
        assert_eq!(game.headers().get("SetUp"), Some("1"));

        assert!(game.load("not a fen", GameLoadOptions::default()).is_err());
        assert_eq!(game.fen(), "4k3/8/8/8/8/8/8/4K3 w - - 0 1");
    }

    #[test]
    fn undo_rolls_back_repetition_counts() {
        let mut game = Game::new();
        let shuffle = ["Nf3", "Nf6", "Ng1", "Ng8"];
        play(&mut game, &shuffle);
        play(&mut game, &shuffle);
        assert!(game.is_threefold_repetition());
        assert!(game.is_draw());
        game.undo();
        game.play_san("Ng8", SanMode::Strict).unwrap();
        assert!(game.is_threefold_repetition());
        game.undo();
        game.undo();
        assert!(!game.is_threefold_repetition());
        play(&mut game, &["Ng1", "Ng8"]);
        assert!(game.is_threefold_repetition());
    }

    #[test]
    fn verbose_history() {
        let mut game = Game::new();
        play(&mut game, &["e4", "d5", "exd5"]);
        let records = game.history_verbose();
        assert_eq!(records.len(), 3);
        assert_eq!(records[2].san, "exd5");
        assert_eq!(records[2].lan, "e4d5");
        assert_eq!(records[2].captured, Some(PieceKind::Pawn));
        assert_eq!(records[0].before, STARTING_FEN);
        assert_eq!(records[2].after, game.fen());
        assert_eq!(records[1].after, records[2].before);
        assert!(records[2].is_capture());
        assert_eq!(game.move_number(), 2);
    }

    #[test]
    fn comments_are_pruned_to_reachable_positions() {
        let mut game = Game::new();
        game.set_comment("start");
        play(&mut game, &["e4"]);
        game.set_comment("king's pawn");
        play(&mut game, &["e5"]);
        game.set_comment("symmetrical");
        game.undo();
        assert_eq!(game.comment(), Some("king's pawn"));
        let comments = game.comments();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0], (STARTING_FEN.to_string(), "start".to_string()));

        assert_eq!(game.remove_comment(), Some("king's pawn".to_string()));
        assert_eq!(game.remove_comments().len(), 1);
        assert!(game.comments().is_empty());
    }
}
