//! The rules-oracle contract consumed by the search core.
//!
//! Move generation, evaluation, search, and the heuristic policies are written
//! against [`GameRules`] only. [`crate::game::Game`] is the reference
//! implementation; any other rules engine can plug in by implementing it.

use crate::board::{CellState, Placement};
use crate::building::{Building, Color};

pub trait GameRules: Clone {
    /// Whether `placement` could be applied right now. Must not mutate.
    fn is_legal(&self, placement: &Placement) -> bool;

    /// Apply a placement in place. Returns `false` and leaves the state
    /// untouched when the placement is illegal.
    fn apply(&mut self, placement: &Placement) -> bool;

    /// Reverse the most recent successful [`apply`](GameRules::apply).
    ///
    /// # Panics
    ///
    /// When no applied placement is outstanding.
    fn undo(&mut self);

    /// An independent deep copy.
    fn duplicate(&self) -> Self {
        self.clone()
    }

    /// Buildings of `color` not yet on the board, in catalog order.
    fn unplaced_buildings(&self, color: Color) -> Vec<Building>;

    fn cell_state(&self, x: usize, y: usize) -> CellState;

    fn width(&self) -> usize;

    fn height(&self) -> usize;

    /// True once neither side can place anything.
    fn is_finished(&self) -> bool;

    /// Number of placements made so far; 0 before the opening.
    fn turn_number(&self) -> usize;

    fn current_player(&self) -> Color;
}
