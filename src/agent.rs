//! Move selection front end.
//!
//! An [`Agent`] owns one engine per [`Policy`] and routes each request to the
//! selected one. Every policy opens with the cathedral in the center.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use tracing::debug;

use crate::board::Placement;
use crate::building::{Color, ParseError};
use crate::constants::FALLBACK_BUDGET_MS;
use crate::playout::RolloutConfig;
use crate::policy::{LargestPiece, LookAhead};
use crate::rules::GameRules;
use crate::search::{SearchConfig, Searcher, opening};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Policy {
    #[default]
    Minimax,
    LargestPiece,
    LookAhead,
}

impl Policy {
    pub const ALL: [Policy; 3] = [Policy::Minimax, Policy::LargestPiece, Policy::LookAhead];
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Policy::Minimax => "minimax",
            Policy::LargestPiece => "largest",
            Policy::LookAhead => "lookahead",
        };
        f.write_str(name)
    }
}

impl FromStr for Policy {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "minimax" | "alphabeta" => Ok(Policy::Minimax),
            "largest" | "largest-piece" => Ok(Policy::LargestPiece),
            "lookahead" => Ok(Policy::LookAhead),
            _ => Err(ParseError::UnknownPolicy(s.to_string())),
        }
    }
}

pub struct Agent {
    policy: Policy,
    searcher: Searcher,
    largest: LargestPiece,
    lookahead: LookAhead,
}

impl Default for Agent {
    fn default() -> Self {
        Self::new(Policy::default(), SearchConfig::default(), RolloutConfig::default())
    }
}

impl Agent {
    /// Create an agent using `policy`, with settings for every engine.
    pub fn new(policy: Policy, search: SearchConfig, rollouts: RolloutConfig) -> Self {
        Self {
            policy,
            searcher: Searcher::new(search),
            largest: LargestPiece::new(rollouts),
            lookahead: LookAhead,
        }
    }

    /// The policy used by [`Agent::choose_move`].
    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Switch policy; engine settings are kept.
    pub fn set_policy(&mut self, policy: Policy) {
        self.policy = policy;
    }

    /// The minimax engine, e.g. to read its last statistics.
    pub fn searcher(&self) -> &Searcher {
        &self.searcher
    }

    /// Mutable access to the minimax engine for reconfiguration.
    pub fn searcher_mut(&mut self) -> &mut Searcher {
        &mut self.searcher
    }

    /// Pick a placement for `color` with the current policy.
    ///
    /// `state` is only borrowed mutably for the search and is unchanged when
    /// this returns.
    pub fn choose_move<G: GameRules>(
        &mut self,
        state: &mut G,
        color: Color,
        budget: Option<Duration>,
    ) -> Option<Placement> {
        if state.turn_number() == 0 {
            return Some(opening());
        }
        match self.policy {
            Policy::Minimax if budget.is_some_and(|b| b.as_millis() < FALLBACK_BUDGET_MS as u128) => {
                debug!(?budget, "budget too small for minimax");
                self.quick_move(state, color)
            }
            Policy::Minimax => self.searcher.choose_move(state, color, budget),
            Policy::LargestPiece => self.largest.choose_move(state, color),
            Policy::LookAhead => self.quick_move(state, color),
        }
    }

    /// Lookahead, falling back to the largest piece when nothing gains territory.
    fn quick_move<G: GameRules>(&mut self, state: &G, color: Color) -> Option<Placement> {
        self.lookahead
            .choose_move(state, color)
            .or_else(|| self.largest.choose_move(state, color))
    }
}
