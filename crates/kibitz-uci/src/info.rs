//! Parsing engine output lines.

use std::fmt;
use std::time::Duration;

use kibitz_core::Color;

use crate::error::UciError;

/// An evaluation, from the point of view of the side it is reported for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    Centipawns(i32),
    /// Mate in this many moves; negative when being mated.
    Mate(i32),
}

impl Score {
    /// The same evaluation from the other side's point of view.
    pub fn flip(self) -> Score {
        match self {
            Score::Centipawns(cp) => Score::Centipawns(-cp),
            Score::Mate(moves) => Score::Mate(-moves),
        }
    }

    /// Convert a score reported for `side` to White's point of view.
    pub fn for_white(self, side: Color) -> Score {
        match side {
            Color::White => self,
            Color::Black => self.flip(),
        }
    }
}

/// Pawns with a sign (`+0.35`), or `#3` / `#-3` for mates.
impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Centipawns(cp) => write!(f, "{:+.2}", f64::from(*cp) / 100.0),
            Score::Mate(moves) => write!(f, "#{moves}"),
        }
    }
}

/// Whether a score is exact or only a bound from an aspiration window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScoreBound {
    #[default]
    Exact,
    Lower,
    Upper,
}

/// Fields of an `info` line. Absent keywords stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfoLine {
    pub depth: Option<u32>,
    pub seldepth: Option<u32>,
    /// 1-based index of the principal variation.
    pub multipv: Option<u32>,
    pub score: Option<Score>,
    pub bound: ScoreBound,
    pub nodes: Option<u64>,
    pub nps: Option<u64>,
    pub time: Option<Duration>,
    /// Principal variation in coordinate notation.
    pub pv: Vec<String>,
}

/// `bestmove <move> [ponder <move>]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BestMove {
    /// `None` when the engine reports `(none)` or `0000`.
    pub mv: Option<String>,
    pub ponder: Option<String>,
}

/// A classified line of engine output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineLine {
    /// `id name ...` or `id author ...`.
    Id { key: String, value: String },
    UciOk,
    ReadyOk,
    BestMove(BestMove),
    Info(InfoLine),
    /// `option ...` declaration, kept as text.
    Option(String),
    /// Anything else.
    Other(String),
}

/// Classify a single line of engine output.
pub fn parse_engine_line(line: &str) -> Result<EngineLine, UciError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some(&keyword) = tokens.first() else {
        return Ok(EngineLine::Other(String::new()));
    };

    match keyword {
        "id" => {
            let key = tokens.get(1).ok_or_else(|| UciError::MissingValue {
                param: "id".to_string(),
            })?;
            Ok(EngineLine::Id {
                key: key.to_string(),
                value: tokens[2..].join(" "),
            })
        }
        "uciok" => Ok(EngineLine::UciOk),
        "readyok" => Ok(EngineLine::ReadyOk),
        "bestmove" => parse_bestmove(&tokens[1..]),
        "info" => parse_info(&tokens[1..]),
        "option" => Ok(EngineLine::Option(tokens[1..].join(" "))),
        _ => Ok(EngineLine::Other(line.trim().to_string())),
    }
}

fn parse_bestmove(tokens: &[&str]) -> Result<EngineLine, UciError> {
    let first = tokens.first().ok_or_else(|| UciError::MissingValue {
        param: "bestmove".to_string(),
    })?;
    let mv = match *first {
        "(none)" | "0000" => None,
        mv => Some(mv.to_string()),
    };
    let ponder = match tokens.get(1) {
        Some(&"ponder") => Some(
            tokens
                .get(2)
                .ok_or_else(|| UciError::MissingValue {
                    param: "ponder".to_string(),
                })?
                .to_string(),
        ),
        _ => None,
    };
    Ok(EngineLine::BestMove(BestMove { mv, ponder }))
}

/// Parse the `info` arguments.
///
/// Unknown keywords are skipped one token at a time; `pv` and `string` take
/// the rest of the line.
fn parse_info(tokens: &[&str]) -> Result<EngineLine, UciError> {
    let mut info = InfoLine::default();

    let mut i = 0;
    while i < tokens.len() {
        match tokens[i] {
            "depth" => {
                info.depth = Some(parse_int(tokens.get(i + 1), "depth")?);
                i += 2;
            }
            "seldepth" => {
                info.seldepth = Some(parse_int(tokens.get(i + 1), "seldepth")?);
                i += 2;
            }
            "multipv" => {
                info.multipv = Some(parse_int(tokens.get(i + 1), "multipv")?);
                i += 2;
            }
            "nodes" => {
                info.nodes = Some(parse_int(tokens.get(i + 1), "nodes")?);
                i += 2;
            }
            "nps" => {
                info.nps = Some(parse_int(tokens.get(i + 1), "nps")?);
                i += 2;
            }
            "time" => {
                info.time = Some(Duration::from_millis(parse_int(tokens.get(i + 1), "time")?));
                i += 2;
            }
            "score" => {
                let kind = tokens.get(i + 1).ok_or_else(|| UciError::MissingValue {
                    param: "score".to_string(),
                })?;
                let value = parse_int(tokens.get(i + 2), "score")?;
                info.score = Some(match *kind {
                    "cp" => Score::Centipawns(value),
                    "mate" => Score::Mate(value),
                    other => {
                        return Err(UciError::InvalidValue {
                            param: "score".to_string(),
                            value: other.to_string(),
                        });
                    }
                });
                i += 3;
                while let Some(&bound) = tokens.get(i) {
                    info.bound = match bound {
                        "lowerbound" => ScoreBound::Lower,
                        "upperbound" => ScoreBound::Upper,
                        _ => break,
                    };
                    i += 1;
                }
            }
            "pv" => {
                info.pv = tokens[i + 1..].iter().map(|t| t.to_string()).collect();
                break;
            }
            "string" => break,
            _ => {
                // currmove, hashfull, tbhits and friends
                i += 1;
            }
        }
    }

    Ok(EngineLine::Info(info))
}

/// Parse an integer value from a token.
fn parse_int<T: std::str::FromStr>(token: Option<&&str>, param: &str) -> Result<T, UciError> {
    let value = token.ok_or_else(|| UciError::MissingValue {
        param: param.to_string(),
    })?;
    value.parse().map_err(|_| UciError::InvalidValue {
        param: param.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn info(line: &str) -> InfoLine {
        match parse_engine_line(line).unwrap() {
            EngineLine::Info(info) => info,
            other => panic!("expected Info, got {other:?}"),
        }
    }

    #[test]
    fn parse_handshake_lines() {
        assert_eq!(
            parse_engine_line("id name Stockfish 16.1").unwrap(),
            EngineLine::Id {
                key: "name".to_string(),
                value: "Stockfish 16.1".to_string()
            }
        );
        assert_eq!(parse_engine_line("uciok").unwrap(), EngineLine::UciOk);
        assert_eq!(parse_engine_line("readyok").unwrap(), EngineLine::ReadyOk);
        assert!(matches!(
            parse_engine_line("option name Hash type spin default 16 min 1 max 33554432").unwrap(),
            EngineLine::Option(_)
        ));
    }

    #[test]
    fn parse_full_info() {
        let info = info(
            "info depth 20 seldepth 28 multipv 2 score cp -35 upperbound nodes 1234567 \
             nps 1500000 hashfull 300 tbhits 0 time 823 pv e7e5 g1f3 b8c6",
        );
        assert_eq!(info.depth, Some(20));
        assert_eq!(info.seldepth, Some(28));
        assert_eq!(info.multipv, Some(2));
        assert_eq!(info.score, Some(Score::Centipawns(-35)));
        assert_eq!(info.bound, ScoreBound::Upper);
        assert_eq!(info.nodes, Some(1_234_567));
        assert_eq!(info.nps, Some(1_500_000));
        assert_eq!(info.time, Some(Duration::from_millis(823)));
        assert_eq!(info.pv, ["e7e5", "g1f3", "b8c6"]);
    }

    #[test]
    fn parse_mate_score() {
        let info = info("info depth 12 score mate -3 lowerbound pv h7h8");
        assert_eq!(info.score, Some(Score::Mate(-3)));
        assert_eq!(info.bound, ScoreBound::Lower);
    }

    #[test]
    fn parse_info_string_and_currmove() {
        let info1 = info("info string NNUE evaluation using nn-b1a57edbea57.nnue depth 3");
        assert_eq!(info1, InfoLine::default());
        let info2 = info("info depth 9 currmove e2e4 currmovenumber 1");
        assert_eq!(info2.depth, Some(9));
        assert!(info2.pv.is_empty());
    }

    #[test]
    fn parse_bestmove() {
        assert_eq!(
            parse_engine_line("bestmove e2e4 ponder e7e5").unwrap(),
            EngineLine::BestMove(BestMove {
                mv: Some("e2e4".to_string()),
                ponder: Some("e7e5".to_string()),
            })
        );
        assert_eq!(
            parse_engine_line("bestmove (none)").unwrap(),
            EngineLine::BestMove(BestMove::default())
        );
    }

    #[test]
    fn parse_errors() {
        assert!(parse_engine_line("bestmove").is_err());
        assert!(parse_engine_line("bestmove e2e4 ponder").is_err());
        assert!(parse_engine_line("info depth").is_err());
        assert!(parse_engine_line("info depth x").is_err());
        assert!(parse_engine_line("info score wdl 1 2 3").is_err());
    }

    #[test]
    fn other_lines() {
        assert_eq!(
            parse_engine_line("Stockfish 16 by the Stockfish developers").unwrap(),
            EngineLine::Other("Stockfish 16 by the Stockfish developers".to_string())
        );
        assert_eq!(parse_engine_line("   ").unwrap(), EngineLine::Other(String::new()));
    }

    #[test]
    fn score_points_of_view() {
        assert_eq!(Score::Centipawns(35).for_white(Color::Black), Score::Centipawns(-35));
        assert_eq!(Score::Mate(2).for_white(Color::White), Score::Mate(2));
        assert_eq!(Score::Centipawns(35).to_string(), "+0.35");
        assert_eq!(Score::Centipawns(-120).to_string(), "-1.20");
        assert_eq!(Score::Mate(-3).to_string(), "#-3");
    }
}
