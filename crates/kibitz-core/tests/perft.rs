//! Perft node counts for the standard test positions.
//!
//! Shallow depths run by default; deeper ones are `#[ignore]`d because
//! legality is checked by playing every candidate move.

use kibitz_core::Position;
use kibitz_core::perft::{divide, perft};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
const POSITION_4: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
const POSITION_5: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";

fn count(fen: &str, depth: usize) -> u64 {
    let mut pos: Position = fen.parse().unwrap();
    let before = pos.clone();
    let nodes = perft(&mut pos, depth);
    assert_eq!(pos, before, "perft left the position modified");
    nodes
}

// ── Starting position ─────────────────────────────────────────────────────────

#[test]
fn startpos_depth_3() {
    let mut pos = Position::starting();
    assert_eq!(perft(&mut pos, 3), 8_902);
}

#[test]
#[ignore] // slow
fn startpos_depth_4() {
    let mut pos = Position::starting();
    assert_eq!(perft(&mut pos, 4), 197_281);
}

// ── Kiwipete ─────────────────────────────────────────────────────────────────

#[test]
fn kiwipete_depth_2() {
    assert_eq!(count(KIWIPETE, 1), 48);
    assert_eq!(count(KIWIPETE, 2), 2_039);
}

#[test]
#[ignore] // slow
fn kiwipete_depth_3() {
    assert_eq!(count(KIWIPETE, 3), 97_862);
}

// ── Position 3: en passant and rook endgame ───────────────────────────────────

#[test]
fn position3_depth_3() {
    assert_eq!(count(POSITION_3, 1), 14);
    assert_eq!(count(POSITION_3, 2), 191);
    assert_eq!(count(POSITION_3, 3), 2_812);
}

#[test]
#[ignore] // slow
fn position3_depth_4() {
    assert_eq!(count(POSITION_3, 4), 43_238);
}

// ── Position 4: promotions and castling under fire ───────────────────────────

#[test]
fn position4_depth_2() {
    assert_eq!(count(POSITION_4, 1), 6);
    assert_eq!(count(POSITION_4, 2), 264);
}

#[test]
#[ignore] // slow
fn position4_depth_3() {
    assert_eq!(count(POSITION_4, 3), 9_467);
}

// ── Position 5 ───────────────────────────────────────────────────────────────

#[test]
fn position5_depth_2() {
    assert_eq!(count(POSITION_5, 1), 44);
    assert_eq!(count(POSITION_5, 2), 1_486);
}

#[test]
#[ignore] // slow
fn position5_depth_3() {
    assert_eq!(count(POSITION_5, 3), 62_379);
}

// ── divide ───────────────────────────────────────────────────────────────────

#[test]
fn divide_kiwipete_matches_perft() {
    let mut pos: Position = KIWIPETE.parse().unwrap();
    let split = divide(&mut pos, 2);
    assert_eq!(split.len(), 48);
    assert_eq!(split.iter().map(|(_, n)| n).sum::<u64>(), 2_039);
    assert!(split.iter().any(|(mv, _)| mv == "e1g1"));
    assert!(split.iter().any(|(mv, _)| mv == "e1c1"));
}
