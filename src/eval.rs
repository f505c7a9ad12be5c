//! Position evaluation.
//!
//! Both formulas work from a [`Tally`] of one full board scan: cells covered
//! by the perspective color, territory it owns, and cells held by the enemy
//! (covered or owned). There is no separate win/loss signal; a finished game
//! is scored with the same counts.

use crate::board::CellState;
use crate::building::Color;
use crate::constants::{ENEMY_WEIGHT, OWNED_WEIGHT, OWN_WEIGHT};
use crate::rules::GameRules;

/// Board counts from one color's perspective.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct Tally {
    /// Cells covered by own buildings.
    pub own: i32,
    /// Own territory cells.
    pub owned: i32,
    /// Cells covered or owned by the opponent.
    pub enemy: i32,
}

impl Tally {
    /// Differential score: own cells plus own territory minus enemy cells.
    pub fn differential(&self) -> i32 {
        self.own + self.owned - self.enemy
    }
}

/// Count cells from `perspective` in one board scan.
pub fn tally<G: GameRules>(state: &G, perspective: Color) -> Tally {
    let enemy = perspective.opponent();
    let mut t = Tally::default();
    for y in 0..state.height() {
        for x in 0..state.width() {
            match state.cell_state(x, y) {
                CellState::Occupied(c) if c == perspective => t.own += 1,
                CellState::Owned(c) if c == perspective => t.owned += 1,
                CellState::Occupied(c) | CellState::Owned(c) if c == enemy => t.enemy += 1,
                _ => {}
            }
        }
    }
    t
}

/// Differential evaluation; higher is better for `perspective`.
pub fn evaluate<G: GameRules>(state: &G, perspective: Color) -> i32 {
    tally(state, perspective).differential()
}

/// Number of territory cells owned by `color`.
pub fn territory<G: GameRules>(state: &G, color: Color) -> i32 {
    let mut n = 0;
    for y in 0..state.height() {
        for x in 0..state.width() {
            if state.cell_state(x, y) == CellState::Owned(color) {
                n += 1;
            }
        }
    }
    n
}

/// Weights of the delta formula.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Weights {
    pub own: f32,
    pub owned: f32,
    pub enemy: f32,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            own: OWN_WEIGHT,
            owned: OWNED_WEIGHT,
            enemy: ENEMY_WEIGHT,
        }
    }
}

/// Weighted change between two tallies. Each term truncates toward zero.
pub fn delta(before: Tally, after: Tally, weights: Weights) -> i32 {
    let term = |w: f32, d: i32| (w * d as f32) as i32;
    term(weights.own, after.own - before.own) + term(weights.owned, after.owned - before.owned)
        - term(weights.enemy, after.enemy - before.enemy)
}

/// Which formula the search applies at its leaves.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub enum Scoring {
    #[default]
    Differential,
    /// Reward the change against the state one ply earlier.
    Delta(Weights),
}

impl Scoring {
    /// Score a leaf whose parent had tally `parent`.
    pub fn score(&self, parent: Tally, leaf: Tally) -> i32 {
        match self {
            Scoring::Differential => leaf.differential(),
            Scoring::Delta(weights) => delta(parent, leaf, *weights),
        }
    }
}
