//! Non-adversarial decision policies.
//!
//! - [`LargestPiece`] commits the most valuable building it can place, using
//!   rollouts to choose where.
//! - [`LookAhead`] tries every placement one ply deep and keeps the one that
//!   claims the most new territory.
//!
//! Both work on duplicates and never mutate the caller's state.

use tracing::debug;

use crate::board::Placement;
use crate::building::{Building, Color};
use crate::eval::territory;
use crate::movegen::legal_placements;
use crate::playout::{RolloutConfig, average};
use crate::rules::GameRules;
use crate::txn::after;

/// Distinct unplaced buildings of `color`, in hand order.
fn distinct_unplaced<G: GameRules>(state: &G, color: Color) -> Vec<Building> {
    let mut out: Vec<Building> = Vec::new();
    for b in state.unplaced_buildings(color) {
        if !out.contains(&b) {
            out.push(b);
        }
    }
    out
}

pub struct LargestPiece {
    config: RolloutConfig,
    rng: fastrand::Rng,
}

impl Default for LargestPiece {
    fn default() -> Self {
        Self::new(RolloutConfig::default())
    }
}

impl LargestPiece {
    /// Create the policy with a rollout RNG seeded from `config`.
    pub fn new(config: RolloutConfig) -> Self {
        Self {
            config,
            rng: fastrand::Rng::with_seed(config.seed),
        }
    }

    /// Placeable buildings of `color` sharing the highest value.
    ///
    /// A building counts as placeable when it has at least one legal placement.
    pub fn candidate_buildings<G: GameRules>(state: &G, color: Color) -> Vec<Building> {
        let placeable: Vec<Building> = distinct_unplaced(state, color)
            .into_iter()
            .filter(|&b| !legal_placements(state, b).is_empty())
            .collect();
        let Some(max) = placeable.iter().map(|b| b.score()).max() else {
            return Vec::new();
        };
        placeable.into_iter().filter(|b| b.score() == max).collect()
    }

    /// Best placement of a largest building by average rollout score.
    pub fn choose_move<G: GameRules>(&mut self, state: &G, color: Color) -> Option<Placement> {
        let buildings = Self::candidate_buildings(state, color);
        debug!(%color, buildings = buildings.len(), "largest-piece candidates");

        let mut best = None;
        let mut best_score = i32::MIN;
        for building in buildings {
            for p in legal_placements(state, building) {
                let Some(score) = average(state, &p, color, &self.config, &mut self.rng) else {
                    continue;
                };
                if best.is_none() || score > best_score {
                    best_score = score;
                    best = Some(p);
                }
            }
        }
        best
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LookAhead;

impl LookAhead {
    /// The placement with the largest positive territory gain for `color`.
    ///
    /// Returns `None` when no placement claims new territory.
    pub fn choose_move<G: GameRules>(&self, state: &G, color: Color) -> Option<Placement> {
        let current = territory(state, color);
        let mut best = None;
        let mut best_gain = 0;
        for building in distinct_unplaced(state, color) {
            for p in legal_placements(state, building) {
                let Some(next) = after(state, &p) else {
                    continue;
                };
                let gain = territory(&next, color) - current;
                if gain > best_gain {
                    best_gain = gain;
                    best = Some(p);
                }
            }
        }
        debug!(%color, gain = best_gain, found = best.is_some(), "lookahead");
        best
    }
}
