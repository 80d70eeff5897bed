#[cfg(test)]
mod test;
use crate::board::*;
use crate::config::*;
use crate::heuristic::*;
use anyhow::{Context, Result};
use clap::ArgMatches;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::time::Instant;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Position {
    pub board: Board,
    pub side_to_move: Option<Player>,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board.to_line())?;
        if let Some(side) = self.side_to_move {
            write!(f, " {}", side)?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, PartialEq, Debug, Serialize)]
pub struct EvalRecord {
    pub index: usize,
    pub player: Player,
    pub player_tokens: u32,
    pub opponent_tokens: u32,
    pub score: f32,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Summary {
    pub wins: usize,
    pub losses: usize,
    pub ties: usize,
}

/// Reads one position per line. Blank lines and `#` comments are skipped.
pub fn load_positions<R: BufRead>(reader: R) -> Result<Vec<Position>> {
    let mut positions = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", idx + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let (board, side_to_move) =
            Board::from_line(trimmed).with_context(|| format!("invalid board at line {}", idx + 1))?;
        positions.push(Position {
            board,
            side_to_move,
        });
    }
    Ok(positions)
}

/// Scores every position in parallel; the result keeps the input order.
pub fn evaluate_all(
    evaluator: &dyn Evaluator,
    positions: &[Position],
    perspective: Perspective,
) -> Vec<EvalRecord> {
    positions
        .par_iter()
        .enumerate()
        .map(|(idx, position)| {
            let player = perspective.player(position.side_to_move);
            EvalRecord {
                index: idx + 1,
                player,
                player_tokens: count_tokens(player, &position.board),
                opponent_tokens: count_tokens(player.opponent(), &position.board),
                score: evaluator.evaluate(player, &position.board),
            }
        })
        .collect()
}

/// Like `evaluate_all`, on a dedicated pool when `threads` is non-zero.
pub fn evaluate_with_threads(
    evaluator: &dyn Evaluator,
    positions: &[Position],
    perspective: Perspective,
    threads: usize,
) -> Result<Vec<EvalRecord>> {
    if threads == 0 {
        return Ok(evaluate_all(evaluator, positions, perspective));
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .context("failed to build thread pool")?;
    Ok(pool.install(|| evaluate_all(evaluator, positions, perspective)))
}

pub fn summarize(records: &[EvalRecord]) -> Summary {
    let mut summary = Summary::default();
    for record in records {
        if record.score > 0.0 {
            summary.wins += 1;
        } else if record.score < 0.0 {
            summary.losses += 1;
        } else {
            summary.ties += 1;
        }
    }
    summary
}

pub fn write_table<W: Write>(writer: &mut W, records: &[EvalRecord]) -> Result<()> {
    writeln!(writer, "|No.|player|tokens|opponent|score|")?;
    writeln!(writer, "|---:|:--:|---:|---:|---:|")?;
    for record in records {
        writeln!(
            writer,
            "|{:3}|{}|{:2}|{:2}|{:+.1}|",
            record.index, record.player, record.player_tokens, record.opponent_tokens, record.score
        )?;
    }
    Ok(())
}

pub fn write_json<W: Write>(writer: &mut W, records: &[EvalRecord]) -> Result<()> {
    for record in records {
        serde_json::to_writer(&mut *writer, record)?;
        writeln!(writer)?;
    }
    Ok(())
}

/// Random, not necessarily reachable, positions.
pub fn random_positions<R: Rng>(rng: &mut R, count: usize) -> Vec<Position> {
    (0..count)
        .map(|_| {
            let density = rng.random_range(0.0..=1.0);
            let mut board = Board::empty_board();
            for square in Square::all() {
                if rng.random_bool(density) {
                    let token = if rng.random_bool(0.5) {
                        Token::Black
                    } else {
                        Token::White
                    };
                    board = board.with_token(square, token);
                }
            }
            let side_to_move = if rng.random_bool(0.5) {
                Player::Black
            } else {
                Player::White
            };
            Position {
                board,
                side_to_move: Some(side_to_move),
            }
        })
        .collect()
}

pub fn eval_positions(matches: &ArgMatches) -> Result<()> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => EvalConfig::from_file(Path::new(path))
            .with_context(|| format!("failed to load config {}", path))?,
        None => EvalConfig::default(),
    };
    if let Some(heuristic) = matches.get_one::<String>("heuristic") {
        config.heuristic = heuristic.parse()?;
    }
    if let Some(perspective) = matches.get_one::<String>("perspective") {
        config.perspective = perspective.parse()?;
    }
    if matches.get_flag("json") {
        config.output = OutputFormat::Json;
    }
    if let Some(&threads) = matches.get_one::<usize>("threads") {
        config.threads = threads;
    }

    let input_path = matches
        .get_one::<String>("INPUT")
        .context("input file is required")?;
    let in_f = File::open(input_path).with_context(|| format!("failed to open {}", input_path))?;
    let positions = load_positions(BufReader::new(in_f))?;

    let evaluator = config.heuristic.build();
    let start = Instant::now();
    let records = evaluate_with_threads(
        evaluator.as_ref(),
        &positions,
        config.perspective,
        config.threads,
    )?;
    let elapsed = start.elapsed();

    let mut writer = BufWriter::new(io::stdout().lock());
    match config.output {
        OutputFormat::Table => write_table(&mut writer, &records)?,
        OutputFormat::Json => write_json(&mut writer, &records)?,
    }
    writer.flush()?;

    let summary = summarize(&records);
    eprintln!(
        "[{}] positions: {}, wins: {}, losses: {}, ties: {}, elapsed: {}us",
        evaluator.name(),
        records.len(),
        summary.wins,
        summary.losses,
        summary.ties,
        elapsed.as_micros()
    );
    Ok(())
}

pub fn gen_boards(matches: &ArgMatches) -> Result<()> {
    let count = *matches.get_one::<usize>("COUNT").context("count is required")?;
    let seed = match matches.get_one::<u64>("seed") {
        Some(&seed) => seed,
        None => rand::random(),
    };
    eprintln!("seed: {}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);
    let positions = random_positions(&mut rng, count);

    let mut writer: Box<dyn Write> = match matches.get_one::<String>("OUTPUT") {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("failed to create {}", path))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    for position in &positions {
        writeln!(writer, "{}", position)?;
    }
    writer.flush()?;
    Ok(())
}
