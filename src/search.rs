//! Depth-bounded minimax with alpha-beta pruning.
//!
//! The search runs on the caller's live state. Each lookahead goes through an
//! [`Applied`] guard, so every apply is undone before its frame returns, also
//! when a cutoff breaks out of the sibling loop. The state handed to
//! [`Searcher::search`] is therefore unchanged when the search completes.
//!
//! Depth counts plies including the root ply: at depth 1 the engine applies
//! each root candidate and evaluates the result; at depth 2 it also considers
//! every reply, and so on. Roles alternate each ply. A side without candidates
//! passes while the game is still running.
//!
//! Node entry and exit are reported to a [`SearchTracer`]; the default tracer
//! does nothing and [`LogTracer`] forwards to `tracing` at TRACE level.

use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::board::Placement;
use crate::building::{Building, Color, Direction};
use crate::constants::{
    CENTER, DEFAULT_DEPTH, DEFAULT_NODE_LIMIT, INF, MEDIUM_BUDGET_MS, SHALLOW_BUDGET_MS,
    SHALLOW_NODE_LIMIT,
};
use crate::eval::{Scoring, Tally, tally};
use crate::movegen::generate;
use crate::rules::GameRules;
use crate::txn::Applied;

/// Search limits and leaf scoring.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SearchConfig {
    /// Plies to search, counting the root ply.
    pub depth: u32,
    /// Candidate budget at the root (`None` = all).
    pub root_limit: Option<usize>,
    /// Candidate budget below the root.
    pub node_limit: Option<usize>,
    pub scoring: Scoring,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            root_limit: None,
            node_limit: Some(DEFAULT_NODE_LIMIT),
            scoring: Scoring::Differential,
        }
    }
}

impl SearchConfig {
    /// Default limits with a different depth.
    pub fn with_depth(depth: u32) -> Self {
        Self {
            depth,
            ..Self::default()
        }
    }

    /// Tighten the limits to fit a time hint. Never searches deeper or wider
    /// than `self`; `None` keeps `self` as is.
    pub fn for_budget(&self, budget: Option<Duration>) -> SearchConfig {
        let Some(budget) = budget else {
            return *self;
        };
        let ms = budget.as_millis();
        let (depth, limit) = if ms < SHALLOW_BUDGET_MS as u128 {
            (1, SHALLOW_NODE_LIMIT)
        } else if ms < MEDIUM_BUDGET_MS as u128 {
            (2, DEFAULT_NODE_LIMIT)
        } else {
            return *self;
        };
        SearchConfig {
            depth: self.depth.min(depth),
            node_limit: Some(self.node_limit.map_or(limit, |n| n.min(limit))),
            ..*self
        }
    }
}

/// Counters for one search.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes visited below the root.
    pub nodes: u64,
    /// Nodes scored by the evaluator.
    pub leaves: u64,
    /// Sibling loops cut short by alpha-beta.
    pub cutoffs: u64,
    /// Generated candidates the rules rejected.
    pub rejected: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult {
    /// Best placement, or `None` when the side has no move.
    pub best: Option<Placement>,
    pub score: i32,
    pub stats: SearchStats,
}

/// A search node as seen by a tracer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NodeInfo {
    /// Distance from the root in plies.
    pub ply: u32,
    /// Remaining depth.
    pub depth: u32,
    pub alpha: i32,
    pub beta: i32,
    pub perspective: Color,
    pub maximizing: bool,
}

/// Observer for node entry and exit.
pub trait SearchTracer {
    fn enter(&mut self, _node: &NodeInfo) {}

    fn exit(&mut self, _node: &NodeInfo, _score: i32) {}
}

#[derive(Debug, Default)]
pub struct NoopTracer;

impl SearchTracer for NoopTracer {}

/// Logs every node at TRACE level.
#[derive(Debug, Default)]
pub struct LogTracer;

impl SearchTracer for LogTracer {
    fn enter(&mut self, node: &NodeInfo) {
        trace!(
            ply = node.ply,
            depth = node.depth,
            alpha = node.alpha,
            beta = node.beta,
            maximizing = node.maximizing,
            "enter"
        );
    }

    fn exit(&mut self, node: &NodeInfo, score: i32) {
        trace!(ply = node.ply, depth = node.depth, score, "exit");
    }
}

/// The placement played on turn 0: the cathedral in the middle of the board.
pub fn opening() -> Placement {
    Placement::new(
        CENTER as i32,
        CENTER as i32,
        Direction::default(),
        Building::CATHEDRAL,
    )
}

pub struct Searcher {
    config: SearchConfig,
    tracer: Box<dyn SearchTracer>,
    stats: SearchStats,
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl Searcher {
    /// Create a searcher that traces nothing.
    pub fn new(config: SearchConfig) -> Self {
        Self::with_tracer(config, Box::new(NoopTracer))
    }

    /// Create a searcher reporting nodes to `tracer`.
    pub fn with_tracer(config: SearchConfig, tracer: Box<dyn SearchTracer>) -> Self {
        Self {
            config,
            tracer,
            stats: SearchStats::default(),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Replace the limits used by later searches.
    pub fn set_config(&mut self, config: SearchConfig) {
        self.config = config;
    }

    /// Replace the node observer.
    pub fn set_tracer(&mut self, tracer: Box<dyn SearchTracer>) {
        self.tracer = tracer;
    }

    /// Statistics of the most recent search.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Pick a placement for `color`, fitting the search to `budget`.
    ///
    /// The budget is only a hint: it bounds depth and width up front and
    /// never interrupts a running search.
    pub fn choose_move<G: GameRules>(
        &mut self,
        state: &mut G,
        color: Color,
        budget: Option<Duration>,
    ) -> Option<Placement> {
        let config = self.config.for_budget(budget);
        self.run(state, color, &config, true).best
    }

    /// Alpha-beta search with the configured limits.
    pub fn search<G: GameRules>(&mut self, state: &mut G, color: Color) -> SearchResult {
        let config = self.config;
        self.run(state, color, &config, true)
    }

    /// Plain minimax over the same tree, without pruning.
    pub fn exhaustive<G: GameRules>(&mut self, state: &mut G, color: Color) -> SearchResult {
        let config = self.config;
        self.run(state, color, &config, false)
    }

    fn run<G: GameRules>(
        &mut self,
        state: &mut G,
        color: Color,
        config: &SearchConfig,
        prune: bool,
    ) -> SearchResult {
        self.stats = SearchStats::default();

        if state.turn_number() == 0 {
            let best = opening();
            debug!(placement = %best, "opening");
            return SearchResult {
                best: Some(best),
                score: 0,
                stats: self.stats,
            };
        }

        let candidates = generate(state, color, config.root_limit);
        debug!(%color, candidates = candidates.len(), depth = config.depth, "search root");

        let root = tally(state, color);
        let mut best = None;
        let mut best_score = -INF;
        for p in &candidates {
            let Some(mut child) = Applied::try_new(state, p) else {
                self.reject(p);
                continue;
            };
            let alpha = if prune { best_score } else { -INF };
            let score = self.minimax(
                &mut *child,
                config.depth.saturating_sub(1),
                alpha,
                INF,
                false,
                color,
                root,
                1,
                config,
                prune,
            );
            if best.is_none() || score > best_score {
                best_score = score;
                best = Some(*p);
            }
        }

        debug!(
            best = ?best.map(|p| p.to_string()),
            score = best_score,
            nodes = self.stats.nodes,
            cutoffs = self.stats.cutoffs,
            "search done"
        );
        SearchResult {
            best,
            score: if best.is_some() { best_score } else { 0 },
            stats: self.stats,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn minimax<G: GameRules>(
        &mut self,
        state: &mut G,
        depth: u32,
        alpha: i32,
        beta: i32,
        maximizing: bool,
        perspective: Color,
        parent: Tally,
        ply: u32,
        config: &SearchConfig,
        prune: bool,
    ) -> i32 {
        let info = NodeInfo {
            ply,
            depth,
            alpha,
            beta,
            perspective,
            maximizing,
        };
        self.tracer.enter(&info);
        let score = self.node(state, &info, parent, config, prune);
        self.tracer.exit(&info, score);
        score
    }

    fn node<G: GameRules>(
        &mut self,
        state: &mut G,
        info: &NodeInfo,
        parent: Tally,
        config: &SearchConfig,
        prune: bool,
    ) -> i32 {
        self.stats.nodes += 1;
        let &NodeInfo {
            ply,
            depth,
            mut alpha,
            mut beta,
            perspective,
            maximizing,
        } = info;

        if depth == 0 || state.is_finished() {
            self.stats.leaves += 1;
            return config.scoring.score(parent, tally(state, perspective));
        }

        let mover = if maximizing {
            perspective
        } else {
            perspective.opponent()
        };
        let candidates = generate(state, mover, config.node_limit);
        if candidates.is_empty() {
            // Pass: the other side moves on the same position.
            return self.minimax(
                state,
                depth - 1,
                alpha,
                beta,
                !maximizing,
                perspective,
                parent,
                ply + 1,
                config,
                prune,
            );
        }

        let here = tally(state, perspective);
        for p in &candidates {
            let Some(mut child) = Applied::try_new(state, p) else {
                self.reject(p);
                continue;
            };
            let (a, b) = if prune { (alpha, beta) } else { (-INF, INF) };
            let score = self.minimax(
                &mut *child,
                depth - 1,
                a,
                b,
                !maximizing,
                perspective,
                here,
                ply + 1,
                config,
                prune,
            );
            drop(child);

            if maximizing {
                alpha = alpha.max(score);
            } else {
                beta = beta.min(score);
            }
            if prune && beta <= alpha {
                self.stats.cutoffs += 1;
                break;
            }
        }
        if maximizing { alpha } else { beta }
    }

    fn reject(&mut self, p: &Placement) {
        self.stats.rejected += 1;
        warn!(placement = %p, "rules rejected a generated placement, skipping");
    }
}
