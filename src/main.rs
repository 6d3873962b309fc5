use std::{error::Error, path::PathBuf, time::SystemTime};

use clap::{Parser, Subcommand};
use log::{LevelFilter, info};

use network_engine::{
    bench::{DEFAULT_BENCH_DEPTH, bench},
    board::Board,
    moves::{Move, parse_move_list},
    piece::Color,
    player::MachinePlayer,
    search::DEFAULT_SEARCH_DEPTH,
};

build_info::build_info!(fn build_info);

#[derive(Parser)]
#[command(version, about = "Engine for the Network board game")]
struct Cli {
    #[arg(long, global = true, default_value = "info")]
    log_level: LevelFilter,

    /// Also append log output to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search a fixed set of positions and report the speed
    Bench {
        #[arg(long, default_value_t = DEFAULT_BENCH_DEPTH)]
        depth: u8,
    },
    /// Count the positions reachable from a position
    Perft {
        #[arg(long)]
        depth: u8,
        /// Comma separated moves played from the empty board, white first
        #[arg(long, default_value = "")]
        moves: String,
        /// Side to move. Defaults to whoever is next after the moves.
        #[arg(long)]
        color: Option<Color>,
        /// Print the count below each first move
        #[arg(long)]
        divide: bool,
    },
    /// Replay a game and print the move the engine picks
    Choose {
        #[arg(long, default_value = "white")]
        color: Color,
        #[arg(long, default_value_t = DEFAULT_SEARCH_DEPTH)]
        depth: u8,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value = "")]
        moves: String,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    setup_logger(cli.log_level, cli.log_file)?;
    log_panics::init();

    let info = build_info();
    info!(
        "{} {} built {}",
        info.crate_info.name,
        info.crate_info.version,
        info.timestamp
    );

    match cli.command {
        Command::Bench { depth } => bench(depth),
        Command::Perft {
            depth,
            moves,
            color,
            divide,
        } => {
            let mut board = Board::new();
            let next = board.play_moves(&parse_move_list(&moves)?)?;
            let stats = board.perft(color.unwrap_or(next), depth, divide);
            if divide {
                for (m, nodes) in &stats.divide {
                    println!("{} {nodes}", m.to_compact_notation());
                }
                println!("\n{}", stats.nodes);
            }
        }
        Command::Choose {
            color,
            depth,
            seed,
            moves,
        } => {
            let mut player = match seed {
                Some(seed) => MachinePlayer::with_seed(color, depth, seed),
                None => MachinePlayer::with_search_depth(color, depth),
            };

            let next = replay(&mut player, &parse_move_list(&moves)?)?;
            if next != color {
                return Err(format!("It is {next}'s turn, not {color}'s").into());
            }

            match player.choose_move() {
                Some(m) => println!("{m}"),
                None => println!("none"),
            }
        }
    }

    Ok(())
}

/// Feeds moves to the player alternating colors, white first. Returns the side to move after them.
fn replay(player: &mut MachinePlayer, moves: &[Move]) -> Result<Color, String> {
    let mut side = Color::White;
    for m in moves {
        let accepted = if side == player.color() {
            player.force_move(m)
        } else {
            player.opponent_move(m)
        };
        if !accepted {
            return Err(format!("Move {m} is not legal for {side}. Board: {:?}", player.board()));
        }
        side = side.opponent();
    }

    Ok(side)
}

fn setup_logger(level: LevelFilter, log_file: Option<PathBuf>) -> Result<(), fern::InitError> {
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                humantime::format_rfc3339(SystemTime::now()),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr());

    if let Some(path) = log_file {
        dispatch = dispatch.chain(fern::log_file(path)?);
    }

    dispatch.apply()?;
    Ok(())
}
