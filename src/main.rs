use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use kibitz_core::perft::{divide, perft};
use kibitz_core::{LoadOptions, Position};
use kibitz_game::{Game, PgnOptions, PgnWriteOptions};
use kibitz_uci::{AnalysisConfig, EngineProcess};

#[derive(Parser)]
#[command(name = "kibitz", version, about = "Chess rules, notation and engine analysis")]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Print the board, FEN and game status.
    Show {
        #[arg(long)]
        fen: Option<String>,
    },
    /// List the legal moves in SAN.
    Moves {
        #[arg(long)]
        fen: Option<String>,
    },
    /// Load a PGN file, report on it and write it back out.
    Pgn {
        file: PathBuf,
        /// Require strict SAN and SetUp/FEN tags.
        #[arg(long)]
        strict: bool,
        /// Wrap movetext at this column (0 for one line).
        #[arg(long, default_value_t = 80)]
        width: usize,
    },
    /// Count leaf nodes of the legal move tree.
    Perft {
        depth: usize,
        #[arg(long)]
        fen: Option<String>,
        /// Break the count down by first move.
        #[arg(long)]
        divide: bool,
    },
    /// Ask a UCI engine for its best lines.
    Analyse {
        #[arg(long, conflicts_with = "pgn")]
        fen: Option<String>,
        /// Analyse the final position of this game.
        #[arg(long)]
        pgn: Option<PathBuf>,
        #[arg(long)]
        engine: Option<PathBuf>,
        #[arg(long)]
        multipv: Option<u32>,
        /// Thinking time in milliseconds.
        #[arg(long)]
        movetime: Option<u64>,
        #[arg(long)]
        depth: Option<u32>,
        #[arg(long)]
        threads: Option<u16>,
        /// Hash size in megabytes.
        #[arg(long)]
        hash: Option<u32>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Cmd::Show { fen } => {
            let mut game = game_from(fen.as_deref())?;
            println!("{}", game.ascii());
            println!("FEN: {}", game.fen());
            println!("Status: {}", status(&mut game));
        }
        Cmd::Moves { fen } => {
            let mut game = game_from(fen.as_deref())?;
            println!("{}", game.moves_san().join(" "));
        }
        Cmd::Pgn { file, strict, width } => {
            let game = load_pgn(&file, strict)?;
            report(game, width);
        }
        Cmd::Perft { depth, fen, divide: split } => {
            let fen = fen.as_deref().unwrap_or(kibitz_core::STARTING_FEN);
            let mut position = Position::load(fen, LoadOptions::default())
                .with_context(|| format!("invalid FEN: {fen}"))?;
            run_perft(&mut position, depth, split);
        }
        Cmd::Analyse {
            fen,
            pgn,
            engine,
            multipv,
            movetime,
            depth,
            threads,
            hash,
        } => {
            let defaults = AnalysisConfig::default();
            let config = AnalysisConfig {
                engine_path: engine.unwrap_or(defaults.engine_path),
                multipv: multipv.unwrap_or(defaults.multipv),
                movetime: movetime.map_or(defaults.movetime, Duration::from_millis),
                depth,
                threads: threads.unwrap_or(defaults.threads),
                hash_mb: hash.unwrap_or(defaults.hash_mb),
                engine_args: defaults.engine_args,
            };
            let game = match pgn {
                Some(file) => load_pgn(&file, false)?,
                None => game_from(fen.as_deref())?,
            };
            analyse(&game.fen(), &config)?;
        }
    }
    Ok(())
}

fn game_from(fen: Option<&str>) -> Result<Game> {
    match fen {
        Some(fen) => Game::from_fen(fen).with_context(|| format!("invalid FEN: {fen}")),
        None => Ok(Game::new()),
    }
}

fn load_pgn(file: &Path, strict: bool) -> Result<Game> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let mut game = Game::new();
    game.load_pgn(&text, PgnOptions { strict })
        .with_context(|| format!("failed to load {}", file.display()))?;
    Ok(game)
}

fn status(game: &mut Game) -> String {
    let turn = game.turn().name();
    if game.is_checkmate() {
        format!("checkmate, {turn} is mated")
    } else if game.is_stalemate() {
        "draw by stalemate".to_string()
    } else if game.is_insufficient_material() {
        "draw by insufficient material".to_string()
    } else if game.is_threefold_repetition() {
        "draw by threefold repetition".to_string()
    } else if game.is_draw_by_fifty_moves() {
        "draw by the fifty-move rule".to_string()
    } else if game.is_check() {
        format!("{turn} to move, in check")
    } else {
        format!("{turn} to move")
    }
}

fn report(mut game: Game, width: usize) {
    for (name, value) in game.headers().iter() {
        println!("{name}: {value}");
    }
    println!("Plies: {}", game.history().len());
    println!("{}", game.ascii());
    println!("FEN: {}", game.fen());
    println!("Status: {}", status(&mut game));
    println!();
    let options = PgnWriteOptions {
        max_width: width,
        ..PgnWriteOptions::default()
    };
    println!("{}", game.pgn(&options));
}

fn run_perft(position: &mut Position, depth: usize, split: bool) {
    let start = Instant::now();
    let nodes = if split {
        let results = divide(position, depth);
        for (mv, count) in &results {
            println!("{mv}: {count}");
        }
        results.iter().map(|(_, count)| count).sum()
    } else {
        perft(position, depth)
    };
    let elapsed = start.elapsed();
    let nps = (nodes as f64 / elapsed.as_secs_f64().max(1e-9)) as u64;
    info!(depth, nodes, elapsed_ms = elapsed.as_millis() as u64, nps, "perft finished");
    println!("Nodes: {nodes}");
    println!("Time: {} ms ({nps} nps)", elapsed.as_millis());
}

fn analyse(fen: &str, config: &AnalysisConfig) -> Result<()> {
    let mut engine = EngineProcess::from_config(config).with_context(|| {
        format!("failed to start engine {}", config.engine_path.display())
    })?;
    let analysis = engine.analyse(fen, config).context("analysis failed")?;

    println!("Engine: {}", engine.name().unwrap_or("unknown"));
    println!("FEN: {fen}");
    for line in analysis.lines() {
        let score = line
            .white_score()
            .map_or_else(|| "?".to_string(), |score| score.to_string());
        let depth = line.depth.map_or_else(|| "?".to_string(), |d| d.to_string());
        println!("{}. [{score}] depth {depth}: {}", line.multipv, line.numbered());
    }
    if let Some(best) = analysis.best_move() {
        println!("Best move: {best}");
    }
    Ok(())
}
