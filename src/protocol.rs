//! Line-based text protocol in the style of GTP.
//!
//! Each request is one line, optionally prefixed by a numeric id. Replies are
//! `=<id> <message>` on success or `?<id> <message>` on failure, each
//! followed by a blank line. Placements are written as
//! `<building> <x> <y> <direction>`, for example `black_tower 3 4 90`.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`
//! - `list_commands`, `known_command <cmd>`
//! - `quit`
//! - `clear_board` - start a new game
//! - `play <building> <x> <y> <dir>` - place a building for the side to move
//! - `genmove [color]` - choose and play a placement (`pass` if none)
//! - `undo` - take back the last placement
//! - `showboard` - print the board
//! - `score` - unplaced value per player (lower is better)
//! - `policy <minimax|largest|lookahead>` - switch the move policy
//! - `depth <n>` - set the minimax depth

use std::io::{BufRead, Write};

use anyhow::{Context, Result, anyhow, bail};
use tracing::{debug, info};

use crate::agent::{Agent, Policy};
use crate::board::Placement;
use crate::building::Color;
use crate::game::Game;
use crate::search::SearchConfig;

const KNOWN_COMMANDS: &[&str] = &[
    "clear_board",
    "depth",
    "genmove",
    "known_command",
    "list_commands",
    "name",
    "play",
    "policy",
    "protocol_version",
    "quit",
    "score",
    "showboard",
    "undo",
    "version",
];

/// Protocol session: one game plus the agent answering `genmove`.
pub struct Engine {
    game: Game,
    agent: Agent,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Agent::default())
    }
}

impl Engine {
    /// Create a session with a new game, answering `genmove` with `agent`.
    pub fn new(agent: Agent) -> Self {
        Self {
            game: Game::new(),
            agent,
        }
    }

    /// The game being played.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Serve requests from `input` until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        for line in input.lines() {
            let line = line.context("failed to read command")?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let mut parts = command_line.split_whitespace();
            let Some(command) = parts.next() else {
                continue;
            };
            let command = command.to_lowercase();
            let args: Vec<&str> = parts.collect();

            let (prefix, message) = match self.execute(&command, &args) {
                Ok(message) => ('=', message),
                Err(err) => {
                    debug!(%command, error = %err, "command failed");
                    ('?', err.to_string())
                }
            };
            let id = id.map(|i| i.to_string()).unwrap_or_default();
            writeln!(output, "{prefix}{id} {message}\n").context("failed to write reply")?;
            output.flush().context("failed to flush reply")?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Split an optional numeric id off the front of a line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        match trimmed[..end].parse::<u32>() {
            Ok(id) => (Some(id), trimmed[end..].trim()),
            Err(_) => (None, trimmed),
        }
    }

    /// Execute one command and return the reply text.
    pub fn execute(&mut self, command: &str, args: &[&str]) -> Result<String> {
        match command {
            "name" => Ok(env!("CARGO_PKG_NAME").to_string()),

            "version" => Ok(env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => Ok("1".to_string()),

            "list_commands" => Ok(KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let cmd = args.first().context("missing argument")?;
                Ok(KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str()).to_string())
            }

            "quit" => Ok(String::new()),

            "clear_board" => {
                self.game = Game::new();
                Ok(String::new())
            }

            "play" => {
                let placement: Placement = args.join(" ").parse()?;
                let mover = placement.building.color();
                if mover != self.game.to_move() {
                    bail!("it is {}'s turn", self.game.to_move());
                }
                self.game.try_place(&placement)?;
                info!(%placement, "play");
                Ok(String::new())
            }

            "genmove" => {
                let color = match args.first() {
                    Some(c) => c.parse::<Color>()?,
                    None => self.game.to_move(),
                };
                if self.game.finished() {
                    return Ok("pass".to_string());
                }
                if color != self.game.to_move() {
                    bail!("it is {}'s turn", self.game.to_move());
                }
                let Some(placement) = self.agent.choose_move(&mut self.game, color, None) else {
                    return Ok("pass".to_string());
                };
                self.game
                    .try_place(&placement)
                    .with_context(|| format!("engine chose an illegal placement {placement}"))?;
                info!(%placement, policy = %self.agent.policy(), "genmove");
                Ok(placement.to_string())
            }

            "undo" => {
                if self.game.last_placement().is_none() {
                    bail!("nothing to undo");
                }
                self.game.undo();
                Ok(String::new())
            }

            "showboard" => Ok(format!("\n{}", self.game.board())),

            "score" => Ok(format!(
                "black {} white {}",
                self.game.score(Color::Black),
                self.game.score(Color::White)
            )),

            "policy" => {
                let policy: Policy = args.first().context("missing argument")?.parse()?;
                self.agent.set_policy(policy);
                Ok(String::new())
            }

            "depth" => {
                let depth: u32 = args
                    .first()
                    .context("missing argument")?
                    .parse()
                    .map_err(|_| anyhow!("invalid depth"))?;
                let searcher = self.agent.searcher_mut();
                let config = SearchConfig {
                    depth,
                    ..*searcher.config()
                };
                searcher.set_config(config);
                Ok(String::new())
            }

            _ => Err(anyhow!("unknown command: {command}")),
        }
    }
}
