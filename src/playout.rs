//! Random rollouts (short simulated continuations).
//!
//! A rollout copies the state, applies a candidate, then plays a few random
//! legal placements for whichever side is to move. The resulting position is
//! scored with the differential evaluator. Averaging several rollouts gives a
//! noisy estimate of how a candidate holds up.

use crate::board::Placement;
use crate::building::Color;
use crate::constants::{DEFAULT_SEED, N_ROLLOUTS, ROLLOUT_DEPTH};
use crate::eval::evaluate;
use crate::movegen::generate;
use crate::rules::GameRules;
use crate::txn::after;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RolloutConfig {
    /// Rollouts averaged per candidate.
    pub rollouts: usize,
    /// Random plies played after the candidate.
    pub depth: usize,
    pub seed: u64,
}

impl Default for RolloutConfig {
    fn default() -> Self {
        Self {
            rollouts: N_ROLLOUTS,
            depth: ROLLOUT_DEPTH,
            seed: DEFAULT_SEED,
        }
    }
}

/// Play one rollout after `placement` and score it for `perspective`.
///
/// Returns `None` if the placement is rejected.
pub fn rollout<G: GameRules>(
    state: &G,
    placement: &Placement,
    perspective: Color,
    depth: usize,
    rng: &mut fastrand::Rng,
) -> Option<i32> {
    let mut sim = after(state, placement)?;
    for _ in 0..depth {
        if sim.is_finished() {
            break;
        }
        let moves = generate(&sim, sim.current_player(), None);
        if moves.is_empty() {
            break;
        }
        let pick = moves[rng.usize(..moves.len())];
        if !sim.apply(&pick) {
            break;
        }
    }
    Some(evaluate(&sim, perspective))
}

/// Mean score over `config.rollouts` rollouts (at least one), rounded toward zero.
pub fn average<G: GameRules>(
    state: &G,
    placement: &Placement,
    perspective: Color,
    config: &RolloutConfig,
    rng: &mut fastrand::Rng,
) -> Option<i32> {
    let n = config.rollouts.max(1);
    let mut total: i64 = 0;
    for _ in 0..n {
        total += rollout(state, placement, perspective, config.depth, rng)? as i64;
    }
    Some((total / n as i64) as i32)
}
