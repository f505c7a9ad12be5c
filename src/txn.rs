//! Transactional access to the live game state.
//!
//! Search mutates one shared state in place. [`Applied`] ties every successful
//! apply to exactly one undo: the guard derefs to the state for the duration
//! of a lookahead and undoes the placement when dropped, on every exit path.
//! Callers that want to keep the result instead work on a [`duplicate`].

use std::ops::{Deref, DerefMut};

use crate::board::Placement;
use crate::rules::GameRules;

/// A placement applied to a borrowed state, undone on drop.
pub struct Applied<'a, G: GameRules> {
    state: &'a mut G,
}

impl<'a, G: GameRules> Applied<'a, G> {
    /// Apply `placement`. Returns `None` (state untouched) if it is rejected.
    pub fn try_new(state: &'a mut G, placement: &Placement) -> Option<Self> {
        if state.apply(placement) {
            Some(Self { state })
        } else {
            None
        }
    }
}

impl<G: GameRules> Deref for Applied<'_, G> {
    type Target = G;

    fn deref(&self) -> &G {
        self.state
    }
}

impl<G: GameRules> DerefMut for Applied<'_, G> {
    fn deref_mut(&mut self) -> &mut G {
        self.state
    }
}

impl<G: GameRules> Drop for Applied<'_, G> {
    fn drop(&mut self) {
        self.state.undo();
    }
}

/// Independent copy of `state` for what-if analysis.
pub fn duplicate<G: GameRules>(state: &G) -> G {
    state.duplicate()
}

/// Duplicate `state` and apply `placement` to the copy.
///
/// Returns `None` when the placement is rejected. `state` is never touched.
pub fn after<G: GameRules>(state: &G, placement: &Placement) -> Option<G> {
    let mut copy = duplicate(state);
    copy.apply(placement).then_some(copy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::building::{Building, Color, Direction, Kind};
    use crate::game::Game;

    fn opened() -> Game {
        let mut game = Game::new();
        game.try_place(&Placement::new(4, 4, Direction::Deg0, Building::CATHEDRAL))
            .unwrap();
        game
    }

    #[test]
    fn test_guard_undoes_on_drop() {
        let mut game = opened();
        let before = game.clone();
        let inn = Building::new(Kind::Inn, Color::Black).unwrap();
        {
            let applied = Applied::try_new(&mut game, &Placement::new(1, 1, Direction::Deg0, inn));
            let applied = applied.expect("inn fits in the corner");
            assert_eq!(applied.turn_number(), 2);
            assert_eq!(applied.current_player(), Color::White);
        }
        assert_eq!(game, before);
    }

    #[test]
    fn test_nested_guards_unwind_in_order() {
        let mut game = opened();
        let before = game.clone();
        let black = Building::new(Kind::Tavern, Color::Black).unwrap();
        let white = Building::new(Kind::Tavern, Color::White).unwrap();
        {
            let mut first = Applied::try_new(&mut game, &Placement::new(0, 0, Direction::Deg0, black)).unwrap();
            let second = Applied::try_new(&mut *first, &Placement::new(9, 9, Direction::Deg0, white)).unwrap();
            assert_eq!(second.turn_number(), 3);
        }
        assert_eq!(game, before);
    }

    #[test]
    fn test_rejected_apply_yields_no_guard() {
        let mut game = opened();
        let before = game.clone();
        let tavern = Building::new(Kind::Tavern, Color::Black).unwrap();
        assert!(Applied::try_new(&mut game, &Placement::new(4, 4, Direction::Deg0, tavern)).is_none());
        assert_eq!(game, before);
    }

    #[test]
    fn test_duplicate_is_independent() {
        let game = opened();
        let tavern = Building::new(Kind::Tavern, Color::Black).unwrap();
        let copy = after(&game, &Placement::new(0, 0, Direction::Deg0, tavern)).unwrap();
        assert_eq!(copy.turn_number(), 2);
        assert_eq!(game.turn_number(), 1);
        assert!(after(&game, &Placement::new(4, 4, Direction::Deg0, tavern)).is_none());
    }
}
