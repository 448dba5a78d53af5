//! PGN loading and export through the `Game` façade.

use kibitz_game::{Game, PgnError, PgnOptions, PgnWriteOptions};

const IMMORTAL: &str = r#"[Event "London casual game"]
[Site "London"]
[Date "1851.06.21"]
[Round "?"]
[White "Adolf Anderssen"]
[Black "Lionel Kieseritzky"]
[Result "1-0"]
[ECO "C33"]

1. e4 e5 2. f4 exf4 3. Bc4 Qh4+ 4. Kf1 b5 5. Bxb5 Nf6 6. Nf3 Qh6 7. d3 Nh5
8. Nh4 Qg5 9. Nf5 c6 10. g4 Nf6 11. Rg1 cxb5 12. h4 Qg6 13. h5 Qg5 14. Qf3 Ng8
15. Bxf4 Qf6 16. Nc3 Bc5 17. Nd5 Qxb2 18. Bd6 Bxg1 19. e5 Qxa1+ 20. Ke2 Na6
21. Nxg7+ Kd8 22. Qf6+ Nxf6 23. Be7# 1-0"#;

const IMMORTAL_FINAL: &str = "r1bk3r/p2pBpNp/n4n2/1p1NP2P/6P1/3P4/P1P1K3/q5b1 b - - 1 23";

fn load(text: &str, strict: bool) -> Result<Game, PgnError> {
    let mut game = Game::new();
    game.load_pgn(text, PgnOptions { strict })?;
    Ok(game)
}

// ── Replay ──────────────────────────────────────────────────────────────

#[test]
fn immortal_game_replays_to_mate() {
    for strict in [false, true] {
        let mut game = load(IMMORTAL, strict).unwrap();
        assert_eq!(game.fen(), IMMORTAL_FINAL);
        assert!(game.is_checkmate());
        assert!(game.is_game_over());
        let history = game.history();
        assert_eq!(history.len(), 45);
        assert_eq!(history.last().map(String::as_str), Some("Be7#"));
        assert_eq!(game.headers().get("White"), Some("Adolf Anderssen"));
    }
}

#[test]
fn immortal_game_round_trips() {
    let game = load(IMMORTAL, true).unwrap();
    let text = game.pgn(&PgnWriteOptions::default());
    assert!(text.starts_with("[Event \"London casual game\"]\n"));
    assert!(text.contains("\n\n1. e4 e5 2. f4 exf4 3. Bc4 Qh4+ 4. Kf1"));
    assert!(text.ends_with("22. Qf6+ Nxf6 23. Be7# 1-0"));

    let reloaded = load(&text, true).unwrap();
    assert_eq!(reloaded.fen(), IMMORTAL_FINAL);
    assert_eq!(reloaded.history(), game.history());
    assert_eq!(reloaded.headers(), game.headers());
}

#[test]
fn wrapped_export_respects_width() {
    let game = load(IMMORTAL, false).unwrap();
    let text = game.pgn(&PgnWriteOptions {
        newline: "\n".to_string(),
        max_width: 40,
    });
    let movetext = text.split("\n\n").nth(1).unwrap();
    assert!(movetext.lines().count() > 1);
    for line in movetext.lines() {
        assert!(line.len() <= 40, "{line:?}");
    }
    assert_eq!(load(&text, true).unwrap().fen(), IMMORTAL_FINAL);
}

#[test]
fn sidelines_and_annotations_do_not_disturb_main_line() {
    let text = "1. e4! (1. d4 d5 (1... Nf6) 2. c4) 1... e5 $1 {solid} 2. Nf3?! *";
    let game = load(text, true).unwrap();
    assert_eq!(game.history(), ["e4", "e5", "Nf3"]);
}

#[test]
fn permissive_moves_need_lenient_mode() {
    let text = "1. e2e4 e7-e5 2. Ng1f3 *";
    let game = load(text, false).unwrap();
    assert_eq!(game.history(), ["e4", "e5", "Nf3"]);
    assert_eq!(
        load(text, true).unwrap_err(),
        PgnError::IllegalMove {
            san: "e2e4".to_string(),
            ply: 1
        }
    );
}

#[test]
fn null_moves() {
    let game = load("1. e4 -- 2. d4 *", true).unwrap();
    assert_eq!(game.history(), ["e4", "--", "d4"]);
}

// ── Errors ──────────────────────────────────────────────────────────────

#[test]
fn failed_load_keeps_previous_game() {
    let mut game = load("1. d4 d5", false).unwrap();
    let before = game.clone();
    let err = game
        .load_pgn("1. e4 e5 2. Ke3", PgnOptions::default())
        .unwrap_err();
    assert_eq!(
        err,
        PgnError::IllegalMove {
            san: "Ke3".to_string(),
            ply: 3
        }
    );
    assert_eq!(game, before);

    assert!(matches!(
        game.load_pgn("1. e4 {oops", PgnOptions::default()),
        Err(PgnError::UnterminatedComment { line: 1 })
    ));
    assert_eq!(game, before);
}

#[test]
fn strict_setup_and_fen_go_together() {
    let fen_only = "[FEN \"4k3/8/8/8/8/8/8/4K3 w - - 0 1\"]\n\n1. Kd2 *";
    assert_eq!(load(fen_only, true).unwrap_err(), PgnError::FenWithoutSetUp);
    let game = load(fen_only, false).unwrap();
    assert_eq!(game.fen(), "4k3/8/8/8/8/8/3K4/8 b - - 1 1");

    let setup_only = "[SetUp \"1\"]\n\n1. e4 *";
    assert_eq!(load(setup_only, true).unwrap_err(), PgnError::SetUpWithoutFen);
    assert_eq!(load(setup_only, false).unwrap().history(), ["e4"]);

    let bad_fen = "[SetUp \"1\"]\n[FEN \"4k3/8/8/8/8/8/8/4K3 w - - 0 x\"]\n\n*";
    assert!(matches!(load(bad_fen, false), Err(PgnError::InvalidFen(_))));
}

// ── Export details ──────────────────────────────────────────────────────

#[test]
fn black_to_move_setup_exports_ellipsis() {
    let text = "[SetUp \"1\"]\n[FEN \"4k3/8/8/8/8/8/8/4K3 b - - 0 7\"]\n\n7... Kd7 8. Ke2 *";
    let game = load(text, true).unwrap();
    assert_eq!(
        game.pgn(&PgnWriteOptions::default()),
        "[SetUp \"1\"]\n[FEN \"4k3/8/8/8/8/8/8/4K3 b - - 0 7\"]\n\n7. ... Kd7 8. Ke2"
    );
}

#[test]
fn comments_are_exported_in_place() {
    let game = load("{Opening} 1. e4 {best by test} e5", true).unwrap();
    assert_eq!(
        game.pgn(&PgnWriteOptions::default()),
        "{Opening} 1. e4 {best by test} e5"
    );
}

#[test]
fn result_header_follows_termination_marker() {
    let game = load("[Event \"x\"]\n[Result \"*\"]\n\n1. e4 0-1", true).unwrap();
    assert_eq!(game.headers().get("Result"), Some("0-1"));
    let game = load("1. e4 0-1", true).unwrap();
    assert!(game.headers().is_empty());
}

#[test]
fn headers_written_in_roster_order() {
    let mut game = Game::new();
    game.set_header("Annotator", "kibitz");
    game.set_header("White", "A");
    game.set_header("Black", "B");
    game.play_san("e4", Default::default()).unwrap();
    assert_eq!(
        game.pgn(&PgnWriteOptions::default()),
        "[White \"A\"]\n[Black \"B\"]\n[Annotator \"kibitz\"]\n\n1. e4"
    );
}
