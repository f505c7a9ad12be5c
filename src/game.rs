//! Reference rules engine: the full game state and its apply/undo history.
//!
//! A [`Game`] bundles the board, every side's unplaced buildings, the side to
//! move, and a turn counter. Each successful placement pushes the previous
//! state onto the history so that [`Game::undo`] restores it exactly.
//!
//! Turn order: the neutral side opens with the cathedral, then black and white
//! alternate. A side with nothing left to place is skipped; once neither side
//! can place, the game is finished.

use crate::board::{Board, CellState, PlaceError, Placement};
use crate::building::{Building, Color, catalog};
use crate::constants::N;
use crate::movegen::has_any_placement;
use crate::rules::GameRules;

#[derive(Clone, Debug, PartialEq, Eq)]
struct Frame {
    board: Board,
    /// Unplaced buildings, indexed by [`slot`].
    hands: [Vec<Building>; 3],
    to_move: Color,
    turn: usize,
    finished: bool,
}

#[inline]
fn slot(color: Color) -> usize {
    match color {
        Color::Neutral => 0,
        Color::Black => 1,
        Color::White => 2,
    }
}

/// A game of Cathedral.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Game {
    frame: Frame,
    /// Applied placements with the state they replaced.
    history: Vec<(Placement, Frame)>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Empty board, full hands, neutral side to open.
    pub fn new() -> Self {
        Self {
            frame: Frame {
                board: Board::new(),
                hands: [
                    catalog(Color::Neutral),
                    catalog(Color::Black),
                    catalog(Color::White),
                ],
                to_move: Color::Neutral,
                turn: 0,
                finished: false,
            },
            history: Vec::new(),
        }
    }

    /// Build a mid-game position directly, without history.
    ///
    /// The cathedral is considered already handled: the neutral hand is empty.
    /// `turn` must be positive for the position to count as past the opening.
    pub fn from_parts(
        board: Board,
        black: Vec<Building>,
        white: Vec<Building>,
        to_move: Color,
        turn: usize,
    ) -> Self {
        let mut game = Self {
            frame: Frame {
                board,
                hands: [Vec::new(), black, white],
                to_move,
                turn,
                finished: false,
            },
            history: Vec::new(),
        };
        game.frame.finished =
            turn > 0 && !Color::PLAYERS.iter().any(|&c| game.can_place(c));
        game
    }

    /// The current board.
    pub fn board(&self) -> &Board {
        &self.frame.board
    }

    /// Buildings `color` has not placed yet, in catalog order.
    pub fn hand(&self, color: Color) -> &[Building] {
        &self.frame.hands[slot(color)]
    }

    /// Side whose turn it is.
    pub fn to_move(&self) -> Color {
        self.frame.to_move
    }

    /// Placements made so far, the opening included.
    pub fn turn(&self) -> usize {
        self.frame.turn
    }

    /// True once neither side can place anything.
    pub fn finished(&self) -> bool {
        self.frame.finished
    }

    /// Placements applied since this game (or position) was created.
    pub fn history(&self) -> impl Iterator<Item = &Placement> {
        self.history.iter().map(|(p, _)| p)
    }

    /// Most recent placement still on the history.
    pub fn last_placement(&self) -> Option<&Placement> {
        self.history.last().map(|(p, _)| p)
    }

    /// Total value of the buildings `color` still holds. Lower is better.
    pub fn score(&self, color: Color) -> u32 {
        self.hand(color).iter().map(|b| b.score()).sum()
    }

    /// Check a placement against the rules without changing anything.
    pub fn check(&self, placement: &Placement) -> Result<(), PlaceError> {
        if self.frame.finished {
            return Err(PlaceError::GameOver);
        }
        let building = placement.building;
        if self.frame.turn == 0 && building != Building::CATHEDRAL {
            return Err(PlaceError::CathedralFirst);
        }
        if !self.hand(building.color()).contains(&building) {
            return Err(PlaceError::NotInHand(building));
        }
        self.frame.board.check_footprint(placement)
    }

    /// Place a building, resolve territory, and pass the turn.
    ///
    /// # Errors
    ///
    /// Returns the rule that forbids the placement; the game is unchanged.
    pub fn try_place(&mut self, placement: &Placement) -> Result<(), PlaceError> {
        self.check(placement)?;
        let before = self.frame.clone();

        let mover = placement.building.color();
        let hand = &mut self.frame.hands[slot(mover)];
        if let Some(k) = hand.iter().position(|&b| b == placement.building) {
            hand.remove(k);
        }
        self.frame.board.place(*placement);

        if mover.is_player() {
            for lost in self.frame.board.resolve_territory(mover) {
                // The cathedral leaves play; player buildings go back to hand.
                if lost.color().is_player() {
                    let hand = &mut self.frame.hands[slot(lost.color())];
                    hand.push(lost);
                    hand.sort_by_key(|b| b.kind());
                }
            }
        }

        self.frame.turn += 1;
        self.advance(mover);
        self.history.push((*placement, before));
        Ok(())
    }

    /// Reverse the most recent placement.
    ///
    /// # Panics
    ///
    /// When there is nothing to undo.
    pub fn undo(&mut self) {
        let Some((_, before)) = self.history.pop() else {
            panic!("undo called without a matching apply");
        };
        self.frame = before;
    }

    fn advance(&mut self, mover: Color) {
        let next = match mover {
            Color::Neutral => Color::Black,
            c => c.opponent(),
        };
        if self.can_place(next) {
            self.frame.to_move = next;
        } else if mover.is_player() && self.can_place(mover) {
            self.frame.to_move = mover;
        } else {
            self.frame.to_move = next;
            self.frame.finished = true;
        }
    }

    /// Whether `color` has at least one legal placement, ignoring whose turn it is.
    fn can_place(&self, color: Color) -> bool {
        has_any_placement(self, color)
    }
}

impl GameRules for Game {
    fn is_legal(&self, placement: &Placement) -> bool {
        self.check(placement).is_ok()
    }

    fn apply(&mut self, placement: &Placement) -> bool {
        self.try_place(placement).is_ok()
    }

    fn undo(&mut self) {
        Game::undo(self);
    }

    fn unplaced_buildings(&self, color: Color) -> Vec<Building> {
        self.hand(color).to_vec()
    }

    fn cell_state(&self, x: usize, y: usize) -> CellState {
        self.frame.board.get(x, y)
    }

    fn width(&self) -> usize {
        N
    }

    fn height(&self) -> usize {
        N
    }

    fn is_finished(&self) -> bool {
        self.frame.finished
    }

    fn turn_number(&self) -> usize {
        self.frame.turn
    }

    fn current_player(&self) -> Color {
        self.frame.to_move
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::building::{Direction, Kind};

    fn building(kind: Kind, color: Color) -> Building {
        Building::new(kind, color).unwrap()
    }

    fn opened() -> Game {
        let mut game = Game::new();
        let opening = Placement::new(4, 4, Direction::Deg0, Building::CATHEDRAL);
        game.try_place(&opening).unwrap();
        game
    }

    #[test]
    fn test_new_game() {
        let game = Game::new();
        assert_eq!(game.turn(), 0);
        assert_eq!(game.to_move(), Color::Neutral);
        assert!(!game.finished());
        assert_eq!(game.score(Color::Black), 47);
        assert_eq!(game.score(Color::White), 47);
    }

    #[test]
    fn test_cathedral_first() {
        let mut game = Game::new();
        let tavern = Placement::new(0, 0, Direction::Deg0, building(Kind::Tavern, Color::Black));
        assert_eq!(game.try_place(&tavern), Err(PlaceError::CathedralFirst));
        assert_eq!(game, Game::new());

        let game = opened();
        assert_eq!(game.turn(), 1);
        assert_eq!(game.to_move(), Color::Black);
        assert_eq!(game.board().count(CellState::Occupied(Color::Neutral)), 6);
        assert!(game.hand(Color::Neutral).is_empty());
    }

    #[test]
    fn test_apply_then_undo_restores_everything() {
        let mut game = opened();
        let before = game.clone();
        let tower = Placement::new(1, 1, Direction::Deg0, building(Kind::Tower, Color::Black));
        assert!(GameRules::apply(&mut game, &tower));
        assert_eq!(game.to_move(), Color::White);
        assert_eq!(game.hand(Color::Black).len(), 13);
        assert_eq!(game.last_placement(), Some(&tower));
        GameRules::undo(&mut game);
        assert_eq!(game, before);
    }

    #[test]
    fn test_rejected_apply_leaves_state_unchanged() {
        let mut game = opened();
        let before = game.clone();
        // Overlaps the cathedral.
        let bad = Placement::new(4, 4, Direction::Deg0, building(Kind::Tavern, Color::Black));
        assert!(!GameRules::apply(&mut game, &bad));
        assert_eq!(game, before);
        assert_eq!(game.check(&bad), Err(PlaceError::Blocked(4, 4)));
    }

    #[test]
    #[should_panic(expected = "undo called without a matching apply")]
    fn test_undo_without_apply_panics() {
        let mut game = Game::new();
        game.undo();
    }

    #[test]
    fn test_not_in_hand() {
        let mut board = Board::new();
        board.set(9, 9, CellState::Occupied(Color::Neutral));
        let game = Game::from_parts(board, vec![], vec![building(Kind::Tavern, Color::White)], Color::White, 5);
        let p = Placement::new(0, 0, Direction::Deg0, building(Kind::Tavern, Color::Black));
        assert_eq!(game.check(&p), Err(PlaceError::NotInHand(p.building)));
    }

    #[test]
    fn test_mover_continues_when_opponent_is_stuck() {
        let tavern = building(Kind::Tavern, Color::Black);
        let mut game = Game::from_parts(Board::new(), vec![tavern, tavern], vec![], Color::Black, 3);
        assert!(game.try_place(&Placement::new(5, 5, Direction::Deg0, tavern)).is_ok());
        assert_eq!(game.to_move(), Color::Black);
        assert!(!game.finished());
        assert!(game.try_place(&Placement::new(6, 5, Direction::Deg0, tavern)).is_ok());
        assert!(game.finished());
        assert_eq!(game.check(&Placement::new(7, 5, Direction::Deg0, tavern)), Err(PlaceError::GameOver));
    }

    #[test]
    fn test_capture_returns_building_to_hand() {
        let mut game = opened();
        let white_tavern = building(Kind::Tavern, Color::White);
        let stable = building(Kind::Stable, Color::Black);
        let moves = [
            Placement::new(1, 0, Direction::Deg0, stable),
            Placement::new(0, 0, Direction::Deg0, white_tavern),
            Placement::new(0, 1, Direction::Deg0, stable),
        ];
        for p in &moves {
            game.try_place(p).unwrap();
        }
        assert_eq!(game.board().get(0, 0), CellState::Owned(Color::Black));
        assert_eq!(game.hand(Color::White).len(), 14);
        assert_eq!(game.hand(Color::White)[0], white_tavern);
        // White can no longer build on black territory.
        let retry = Placement::new(0, 0, Direction::Deg0, white_tavern);
        assert_eq!(game.check(&retry), Err(PlaceError::Blocked(0, 0)));
    }
}
