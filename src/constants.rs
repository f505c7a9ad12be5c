//! Constants for board geometry, search parameters, and evaluation weights.
//!
//! The board is a fixed 10x10 grid addressed as `(x, y)` with the origin in
//! the top-left corner. Runtime knobs live in [`crate::search::SearchConfig`]
//! and [`crate::playout::RolloutConfig`]; the values here are their defaults.

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size (NxN).
pub const N: usize = 10;

/// Total number of cells on the board.
pub const CELLS: usize = N * N;

/// Center cell used by the fixed opening.
pub const CENTER: usize = (N - 1) / 2;

// =============================================================================
// Search Parameters
// =============================================================================

/// Default minimax depth in plies, counting the root ply.
pub const DEFAULT_DEPTH: u32 = 2;

/// Default candidate budget for interior search nodes.
pub const DEFAULT_NODE_LIMIT: usize = 24;

/// Score bound used as the initial alpha-beta window.
pub const INF: i32 = i32::MAX;

/// Budget hints below this run a one-ply search.
pub const SHALLOW_BUDGET_MS: u64 = 200;

/// Budget hints below this (and above [`SHALLOW_BUDGET_MS`]) run two plies.
pub const MEDIUM_BUDGET_MS: u64 = 2_000;

/// Candidate budget used when the time hint forces a shallow search.
pub const SHALLOW_NODE_LIMIT: usize = 16;

/// Budget hints below this skip minimax and use the fast policies.
pub const FALLBACK_BUDGET_MS: u64 = 20;

// =============================================================================
// Evaluation Weights (delta formula)
// =============================================================================

/// Weight of the change in own occupied cells.
pub const OWN_WEIGHT: f32 = 1.0;

/// Weight of the change in own territory cells.
pub const OWNED_WEIGHT: f32 = 1.0;

/// Weight of the change in enemy cells.
pub const ENEMY_WEIGHT: f32 = 0.5;

// =============================================================================
// Rollout Parameters
// =============================================================================

/// Rollouts averaged per candidate by the largest-piece policy.
pub const N_ROLLOUTS: usize = 8;

/// Random plies played after the candidate in each rollout.
pub const ROLLOUT_DEPTH: usize = 2;

/// Default seed for rollouts and self-play.
pub const DEFAULT_SEED: u64 = 0x00ca_7ed2;
