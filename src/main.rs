//! Konane command line.
//!
//! ## Usage
//!
//! - `konane` / `konane play` - Play a match (random vs random by default)
//! - `konane play -1 M -2 H -r 8 -c 8` - Minimax as X against a human as O
//! - `konane turn -p o -t M -r 4 -c 4 .oxooxoxxoxooxox` - Answer one turn,
//!   as an external agent would

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use signal_hook::consts::{SIGABRT, TERM_SIGNALS};
use signal_hook::flag;
use tracing_subscriber::EnvFilter;

use konane::agent::{AgentKind, AgentOptions, EvalKind, Formulation, make_agent};
use konane::board::{Board, Symbol};
use konane::constants::{DEFAULT_COLS, DEFAULT_DEPTH, DEFAULT_EXTERNAL_TYPE, DEFAULT_ROWS, DEFAULT_TIMEOUT};
use konane::game::{CancelToken, GameManager, GameState};
use konane::protocol::single_turn;

/// Konane: play matches between human, random, minimax and external agents
#[derive(Parser)]
#[command(name = "konane")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    play: PlayArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one or more games between two agents
    Play(PlayArgs),
    /// Compute a single turn and print the move (external agent mode)
    Turn(TurnArgs),
}

#[derive(Args)]
struct SearchArgs {
    /// Search depth in plies for minimax agents
    #[arg(long, default_value_t = DEFAULT_DEPTH, value_parser = clap::value_parser!(u32).range(1..))]
    depth: u32,

    /// Leaf evaluation for minimax agents
    #[arg(long, value_enum, default_value_t = EvalKind::Placeholder)]
    eval: EvalKind,

    /// Search formulation for minimax agents
    #[arg(long, value_enum, default_value_t = Formulation::Negamax)]
    formulation: Formulation,

    /// Seed for random choices
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args)]
struct PlayArgs {
    /// Number of rows on the board
    #[arg(short, long, default_value_t = DEFAULT_ROWS, value_parser = positive)]
    rows: usize,

    /// Number of columns on the board
    #[arg(short, long, default_value_t = DEFAULT_COLS, value_parser = positive)]
    cols: usize,

    /// Player 1 (X): [H]uman, [R]andom, [M]inimax, or a path to an agent program
    #[arg(short = '1', long = "p1", default_value = "R")]
    p1: String,

    /// Player 2 (O): same choices as player 1
    #[arg(short = '2', long = "p2", default_value = "R")]
    p2: String,

    /// Number of games to play
    #[arg(short, long, default_value_t = 1)]
    iterations: usize,

    /// Print the board after every move
    #[arg(short, long)]
    verbose: bool,

    /// Milliseconds an external agent gets per turn
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_millis() as u64)]
    timeout_ms: u64,

    /// Player type passed to external agents with -t
    #[arg(long, default_value = DEFAULT_EXTERNAL_TYPE)]
    external_type: String,

    #[command(flatten)]
    search: SearchArgs,
}

#[derive(Args)]
struct TurnArgs {
    /// Which player to move for (x or o)
    #[arg(short)]
    player: Symbol,

    /// Player type: [H]uman, [R]andom or [M]inimax
    #[arg(short = 't', default_value = "M")]
    kind: String,

    /// Number of rows of the board
    #[arg(short)]
    rows: usize,

    /// Number of columns of the board
    #[arg(short)]
    cols: usize,

    /// Row-major board string of 'x', 'o' and '.'
    board: String,

    #[command(flatten)]
    search: SearchArgs,
}

impl SearchArgs {
    fn options(&self) -> AgentOptions {
        AgentOptions {
            depth: self.depth,
            eval: self.eval,
            formulation: self.formulation,
            seed: self.seed,
            ..AgentOptions::default()
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let verbose = match &cli.command {
        Some(Commands::Play(args)) => args.verbose,
        Some(Commands::Turn(_)) => false,
        None => cli.play.verbose,
    };
    let default_level = if verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Play(args)) => run_play(args),
        Some(Commands::Turn(args)) => run_turn(args),
        None => run_play(cli.play),
    }
}

fn positive(s: &str) -> std::result::Result<usize, String> {
    match s.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("expected a positive integer, got '{s}'")),
    }
}

/// Route SIGINT, SIGTERM, SIGQUIT and SIGABRT to `cancel`. The match stops at
/// the next turn boundary; a second signal before then exits at once.
fn install_interrupts(cancel: &CancelToken) -> std::io::Result<()> {
    for &signal in TERM_SIGNALS.iter().chain(&[SIGABRT]) {
        flag::register_conditional_shutdown(signal, 1, cancel.flag())?;
        flag::register(signal, cancel.flag())?;
    }
    Ok(())
}

fn run_play(args: PlayArgs) -> Result<()> {
    let options = AgentOptions {
        timeout: Duration::from_millis(args.timeout_ms),
        external_type: args.external_type.clone(),
        ..args.search.options()
    };
    let p1 = AgentKind::parse(&args.p1, Symbol::X).context("invalid player 1")?;
    let p2 = AgentKind::parse(&args.p2, Symbol::O).context("invalid player 2")?;

    let cancel = CancelToken::new();
    install_interrupts(&cancel).context("failed to install interrupt handlers")?;

    Board::cell_count(args.rows, args.cols).context("invalid board size")?;
    let mut gm = GameManager::new(
        args.rows,
        args.cols,
        make_agent(&p1, Symbol::X, &options),
        make_agent(&p2, Symbol::O, &options),
    )
    .verbose(args.verbose);

    if args.iterations == 1 {
        gm.reset();
        match gm.play(&cancel).context("game aborted")? {
            GameState::XVictory => println!("X Wins!!"),
            GameState::OVictory => println!("O Wins!!"),
            _ => println!("Game interrupted.\n{}", gm.board()),
        }
    } else {
        let tally = gm.play_many(args.iterations, &cancel).context("series aborted")?;
        println!("X wins: {}", tally.x_wins);
        println!("O wins: {}", tally.o_wins);
        if tally.unfinished > 0 || cancel.is_cancelled() {
            println!("Interrupted after {} games.", tally.x_wins + tally.o_wins);
        }
    }
    Ok(())
}

fn run_turn(args: TurnArgs) -> Result<()> {
    let board = Board::delinearize(&args.board, args.rows, args.cols).context("invalid board")?;
    let kind = AgentKind::parse(&args.kind, args.player).context("invalid player type")?;
    let mut agent = make_agent(&kind, args.player, &args.search.options());
    let reply = single_turn(agent.as_mut(), &board).context("could not choose a move")?;
    println!("{reply}");
    Ok(())
}
