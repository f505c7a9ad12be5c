//! Cathedral-AI command line.
//!
//! ## Usage
//!
//! - `cathedral-ai` - Show a demo
//! - `cathedral-ai protocol` - Serve the text protocol on stdin/stdout
//! - `cathedral-ai selfplay` - Play one engine-vs-engine game
//! - `cathedral-ai demo` - Search a few moves and print the board
//!
//! Logs go to stderr; set `RUST_LOG` (e.g. `RUST_LOG=debug`) for detail.

use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cathedral_ai::agent::{Agent, Policy};
use cathedral_ai::building::Color;
use cathedral_ai::constants::{DEFAULT_DEPTH, DEFAULT_NODE_LIMIT, DEFAULT_SEED, N_ROLLOUTS};
use cathedral_ai::game::Game;
use cathedral_ai::playout::RolloutConfig;
use cathedral_ai::protocol::Engine;
use cathedral_ai::rules::GameRules;
use cathedral_ai::search::{LogTracer, SearchConfig};

/// Cathedral-AI: a minimax engine for the Cathedral board game
#[derive(Parser)]
#[command(name = "cathedral-ai")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Engine settings shared by the subcommands.
#[derive(clap::Args, Clone, Debug)]
struct EngineArgs {
    /// Minimax depth in plies, counting the root ply
    #[arg(long, default_value_t = DEFAULT_DEPTH)]
    depth: u32,
    /// Candidates considered below the root (0 = all)
    #[arg(long, default_value_t = DEFAULT_NODE_LIMIT)]
    node_limit: usize,
    /// Rollouts per candidate for the largest-piece policy
    #[arg(long, default_value_t = N_ROLLOUTS)]
    rollouts: usize,
    /// Seed for rollouts
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
    /// Per-move time hint in milliseconds
    #[arg(long)]
    budget_ms: Option<u64>,
    /// Log every search node (needs RUST_LOG=trace)
    #[arg(long)]
    trace_nodes: bool,
}

impl EngineArgs {
    fn agent(&self, policy: Policy) -> Agent {
        let search = SearchConfig {
            depth: self.depth,
            node_limit: (self.node_limit > 0).then_some(self.node_limit),
            ..SearchConfig::default()
        };
        let rollouts = RolloutConfig {
            rollouts: self.rollouts,
            seed: self.seed,
            ..RolloutConfig::default()
        };
        let mut agent = Agent::new(policy, search, rollouts);
        if self.trace_nodes {
            agent.searcher_mut().set_tracer(Box::new(LogTracer));
        }
        agent
    }

    fn budget(&self) -> Option<Duration> {
        self.budget_ms.map(Duration::from_millis)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the line-based text protocol on stdin/stdout
    Protocol {
        /// Move policy for genmove
        #[arg(long, default_value_t = Policy::Minimax)]
        policy: Policy,
        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Play a full game between two policies
    Selfplay {
        /// Policy for black
        #[arg(long, default_value_t = Policy::Minimax)]
        black: Policy,
        /// Policy for white
        #[arg(long, default_value_t = Policy::LargestPiece)]
        white: Policy,
        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Run a short demo of the engine
    Demo,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Protocol { policy, engine }) => {
            let mut server = Engine::new(engine.agent(policy));
            let stdin = io::stdin();
            server.run(stdin.lock(), io::stdout())
        }
        Some(Commands::Selfplay {
            black,
            white,
            engine,
        }) => run_selfplay(black, white, &engine),
        Some(Commands::Demo) | None => run_demo(),
    }
}

fn run_selfplay(black: Policy, white: Policy, args: &EngineArgs) -> Result<()> {
    let mut game = Game::new();
    let mut agents = [args.agent(black), args.agent(white)];
    // The cathedral opening is handled by whichever agent is asked.
    let started = Instant::now();

    while !game.is_finished() {
        let color = game.current_player();
        let agent = match color {
            Color::White => &mut agents[1],
            _ => &mut agents[0],
        };
        let clock = Instant::now();
        let Some(placement) = agent.choose_move(&mut game, color, args.budget()) else {
            // The bundled rules never hand the turn to a side without moves.
            info!(%color, "no placement, stopping");
            break;
        };
        game.try_place(&placement)
            .with_context(|| format!("{color} chose an illegal placement {placement}"))?;
        info!(
            turn = game.turn(),
            %color,
            %placement,
            elapsed_ms = clock.elapsed().as_millis() as u64,
            "move"
        );
    }

    let (b, w) = (game.score(Color::Black), game.score(Color::White));
    println!("{}", game.board());
    println!("black ({black}) unplaced value: {b}");
    println!("white ({white}) unplaced value: {w}");
    let verdict = match b.cmp(&w) {
        std::cmp::Ordering::Less => "black wins",
        std::cmp::Ordering::Greater => "white wins",
        std::cmp::Ordering::Equal => "draw",
    };
    println!("{verdict}");
    info!(
        turns = game.turn(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        verdict,
        "game over"
    );
    Ok(())
}

fn run_demo() -> Result<()> {
    println!("Cathedral-AI: Minimax Cathedral Engine\n");

    let mut game = Game::new();
    let mut agent = Agent::default();

    println!("=== Opening and first replies (depth {DEFAULT_DEPTH}) ===");
    for _ in 0..3 {
        let color = game.current_player();
        let placement = agent
            .choose_move(&mut game, color, None)
            .context("side to move has no placement")?;
        game.try_place(&placement)
            .with_context(|| format!("illegal placement {placement}"))?;
        let stats = agent.searcher().stats();
        println!(
            "{color}: {placement} ({} nodes, {} cutoffs)",
            stats.nodes, stats.cutoffs
        );
    }
    println!("\n{}", game.board());
    Ok(())
}
