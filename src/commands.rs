//! Subcommand handlers
//!
//! Results go to stdout, one line per fact, so the output can be piped.
//! Diagnostics go through `tracing` to stderr.

use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use chess_engine::rules::{self, STARTING_FEN};
use chess_engine::shakmaty::{Color, Position};
use chess_engine::{
    adaptive_depth, ChessAgent, Difficulty, EngineConfig, EngineMove, GameSession, TimeManager,
};
use tracing::{info, warn};

use crate::cli::{Command, PositionArgs};

/// Legal-move count treated as an average middlegame for time allocation
const TYPICAL_BRANCHING: f64 = 30.0;

pub fn run(command: Command, mut config: EngineConfig) -> Result<()> {
    match command {
        Command::Eval { position } => eval(&position, config),
        Command::Bestmove {
            position,
            depth,
            difficulty,
            adaptive,
            movetime,
        } => {
            let session = build_session(&position)?;
            let mut depth = resolve_depth(depth, difficulty, &config);
            if adaptive {
                depth = adaptive_depth(session.position(), depth);
            }
            config.search.depth = depth;
            bestmove(session, config, movetime.map(Duration::from_millis))
        }
        Command::Selfplay {
            plies,
            clock,
            increment,
            max_depth,
        } => selfplay(
            config,
            plies,
            TimeManager::new(Duration::from_secs(clock), Duration::from_secs(increment)),
            max_depth,
        ),
        Command::Play { color, depth } => {
            if let Some(depth) = depth {
                config.search.depth = depth;
            }
            play(config, color.into())
        }
        Command::Config { write } => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            if let Some(path) = write {
                config.save(&path)?;
                info!("[SETTINGS] Wrote {}", path.display());
            }
            Ok(())
        }
    }
}

/// `--depth` wins, then `--difficulty`, then the configured depth
pub fn resolve_depth(
    depth: Option<u32>,
    difficulty: Option<Difficulty>,
    config: &EngineConfig,
) -> u32 {
    depth
        .or_else(|| difficulty.map(Difficulty::depth))
        .unwrap_or(config.search.depth)
        .max(1)
}

/// Session for `--fen` followed by `--moves`.
///
/// Games that do not begin at the standard start never use the book.
pub fn build_session(args: &PositionArgs) -> Result<GameSession> {
    let mut session = match args.fen.as_deref() {
        Some(fen) => GameSession::from_fen(fen)?,
        None => GameSession::new(),
    };
    if rules::repetition_key(session.position()) != rules::repetition_key_from_fen(STARTING_FEN) {
        session.leave_book();
    }
    for uci in &args.moves {
        session
            .play(uci)
            .with_context(|| format!("replaying move list at {uci}"))?;
    }
    Ok(session)
}

fn eval(args: &PositionArgs, config: EngineConfig) -> Result<()> {
    let session = build_session(args)?;
    let agent = ChessAgent::new(config);
    println!("fen {}", session.fen());
    println!("status {}", session.status());
    println!("phase {:?}", chess_engine::game_phase(session.position()));
    println!("material {}", chess_engine::evaluate_material(session.position()));
    println!("eval {}", agent.evaluate(session.position()));
    Ok(())
}

fn bestmove(mut session: GameSession, config: EngineConfig, movetime: Option<Duration>) -> Result<()> {
    let status = session.status();
    if status.is_over() {
        println!("status {status}");
        println!("bestmove (none)");
        return Ok(());
    }

    let depth = config.search.depth;
    let mut agent = ChessAgent::new(config);
    let choice = match movetime {
        Some(budget) => agent.select_move_timed(&mut session, depth, budget),
        None => agent.select_move(&mut session),
    };
    match choice {
        Some(choice) => print_choice(&choice),
        None => println!("bestmove (none)"),
    }
    Ok(())
}

fn print_choice(choice: &EngineMove) {
    let mut line = format!("bestmove {} source {:?}", choice.uci, choice.source);
    if let Some(evaluation) = choice.evaluation {
        line.push_str(&format!(" eval {evaluation}"));
    }
    if let Some(depth) = choice.depth {
        line.push_str(&format!(" depth {depth}"));
    }
    println!("{line}");
}

fn selfplay(config: EngineConfig, plies: usize, mut clock: TimeManager, max_depth: u32) -> Result<()> {
    let mut agent = ChessAgent::new(config);
    let mut session = GameSession::new();

    while session.moves().len() < plies && !session.status().is_over() {
        let side = session.turn();
        let legal = session.position().legal_moves().len() as f64;
        let complexity = (legal / TYPICAL_BRANCHING).clamp(0.5, 2.0);
        let budget = clock.allocate(side, session.moves().len() / 2, complexity);

        let started = Instant::now();
        let Some(choice) = agent.select_move_timed(&mut session, max_depth, budget) else {
            break;
        };
        clock.update(side, started.elapsed());
        session.play(&choice.uci)?;

        println!(
            "{:>3}. {:<5} {} {:?} ({:.1}s left)",
            session.moves().len(),
            side_name(side),
            choice.uci,
            choice.source,
            clock.remaining(side).as_secs_f64()
        );
        if clock.is_flagged(side) {
            warn!("[AGENT] {} ran out of time", side_name(side));
            println!("result {} flagged", side_name(side));
            return Ok(());
        }
    }

    println!("result {}", session.status());
    println!("moves {}", session.moves().join(" "));
    let stats = agent.cache().stats();
    info!(
        "[CACHE] {} entries, hit rate {:.1}%",
        agent.cache().len(),
        stats.hit_rate() * 100.0
    );
    Ok(())
}

fn play(config: EngineConfig, human: Color) -> Result<()> {
    let mut agent = ChessAgent::new(config);
    let mut session = GameSession::new();
    let stdin = io::stdin();
    let mut input = stdin.lock().lines();

    println!("commands: <uci move>, undo, eval, fen, moves, quit");
    loop {
        let status = session.status();
        if status.is_over() {
            println!("result {status}");
            return Ok(());
        }

        if session.turn() != human {
            let Some(choice) = agent.select_move(&mut session) else {
                bail!("engine found no move in an unfinished game");
            };
            session.play(&choice.uci)?;
            print_choice(&choice);
            continue;
        }

        print!("{}> ", side_name(human));
        io::stdout().flush()?;
        let Some(line) = input.next() else {
            return Ok(());
        };
        let line = line?;
        match line.trim() {
            "" => {}
            "quit" | "exit" => return Ok(()),
            "fen" => println!("{}", session.fen()),
            "moves" => println!("{}", session.moves().join(" ")),
            "eval" => println!("eval {}", agent.evaluate(session.position())),
            "undo" => undo_pair(&mut agent, &mut session),
            uci => {
                if let Err(err) = session.play(uci) {
                    println!("{err}");
                }
            }
        }
    }
}

/// Take back the engine's reply and the human move before it
fn undo_pair(agent: &mut ChessAgent, session: &mut GameSession) {
    for _ in 0..2 {
        match agent.undo(session) {
            Ok(uci) => println!("took back {uci}"),
            Err(err) => {
                println!("{err}");
                break;
            }
        }
    }
}

fn side_name(color: Color) -> &'static str {
    if color.is_white() {
        "white"
    } else {
        "black"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_resolution_order() {
        let config = EngineConfig::default();
        assert_eq!(resolve_depth(Some(5), Some(Difficulty::Easy), &config), 5);
        assert_eq!(resolve_depth(None, Some(Difficulty::Hard), &config), 6);
        assert_eq!(resolve_depth(None, None, &config), config.search.depth);
        assert_eq!(resolve_depth(Some(0), None, &config), 1);
    }

    #[test]
    fn test_build_session_replays_moves() {
        let args = PositionArgs {
            fen: None,
            moves: vec!["e2e4".into(), "e7e5".into()],
        };
        let session = build_session(&args).unwrap();
        assert_eq!(session.moves().len(), 2);
        assert!(session.in_book());
    }

    #[test]
    fn test_build_session_off_start_leaves_book() {
        let args = PositionArgs {
            fen: Some("4k3/8/8/8/8/8/8/4K2R w K - 0 1".into()),
            moves: Vec::new(),
        };
        let session = build_session(&args).unwrap();
        assert!(!session.in_book());
    }

    #[test]
    fn test_build_session_rejects_illegal_move() {
        let args = PositionArgs {
            fen: None,
            moves: vec!["e2e5".into()],
        };
        assert!(build_session(&args).is_err());
    }
}
