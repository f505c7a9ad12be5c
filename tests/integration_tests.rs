//! Integration tests for cathedral-ai
//!
//! End-to-end scenarios through the public API: the fixed opening, positions
//! without moves, the territory-seeking policies, and complete games between
//! engines.

use cathedral_ai::agent::{Agent, Policy};
use cathedral_ai::board::{Board, CellState, Placement};
use cathedral_ai::building::{Building, Color, Direction, Kind, catalog};
use cathedral_ai::eval::territory;
use cathedral_ai::game::Game;
use cathedral_ai::movegen::{generate, legal_placements};
use cathedral_ai::playout::RolloutConfig;
use cathedral_ai::policy::{LargestPiece, LookAhead};
use cathedral_ai::rules::GameRules;
use cathedral_ai::search::{SearchConfig, Searcher, opening};
use cathedral_ai::txn::after;

// =============================================================================
// Helper functions for setting up test positions
// =============================================================================

fn building(kind: Kind, color: Color) -> Building {
    Building::new(kind, color).unwrap()
}

/// Game after the cathedral has been placed in the center.
fn opened() -> Game {
    let mut game = Game::new();
    game.try_place(&opening()).unwrap();
    game
}

/// Black walls at (2,0) and (0,2) with one tavern left in hand. A tavern at
/// (1,1) closes off the three corner cells; no other placement claims any.
fn corner_trap() -> Game {
    let tavern = building(Kind::Tavern, Color::Black);
    let mut board = Board::new();
    board.place(Placement::new(2, 0, Direction::Deg0, tavern));
    board.place(Placement::new(0, 2, Direction::Deg0, tavern));
    Game::from_parts(board, vec![tavern], vec![], Color::Black, 5)
}

/// Two traps for one black tavern. At (0,1) it closes off the single cell
/// (0,0); at (1,8), generated later, it closes off three cells around (0,9).
fn small_and_large_trap() -> Game {
    let tavern = building(Kind::Tavern, Color::Black);
    let mut board = Board::new();
    board.place(Placement::new(1, 0, Direction::Deg0, tavern));
    board.place(Placement::new(2, 9, Direction::Deg0, tavern));
    board.place(Placement::new(0, 7, Direction::Deg0, tavern));
    Game::from_parts(board, vec![tavern], vec![], Color::Black, 7)
}

fn quick_rollouts() -> RolloutConfig {
    RolloutConfig {
        rollouts: 1,
        depth: 0,
        seed: 11,
    }
}

/// Play until the game ends, with a generous turn cap.
fn play_out(game: &mut Game, black: &mut Agent, white: &mut Agent) {
    for _ in 0..200 {
        if game.is_finished() {
            return;
        }
        let color = game.current_player();
        let agent = if color == Color::White { &mut *white } else { &mut *black };
        let placement = agent
            .choose_move(game, color, None)
            .expect("side to move has a placement");
        game.try_place(&placement).unwrap();
    }
    panic!("game did not finish within 200 turns");
}

// =============================================================================
// Opening
// =============================================================================

#[test]
fn test_opening_at_any_depth() {
    for depth in 0..=3 {
        let mut game = Game::new();
        let mut searcher = Searcher::new(SearchConfig::with_depth(depth));
        let result = searcher.search(&mut game, Color::Neutral);
        assert_eq!(result.best, Some(opening()));
        assert_eq!(result.stats.nodes, 0);
        assert_eq!(game, Game::new());
    }
}

#[test]
fn test_opening_is_center_cathedral() {
    let p = opening();
    assert_eq!((p.x, p.y), (4, 4));
    assert_eq!(p.direction, Direction::Deg0);
    assert_eq!(p.building, Building::CATHEDRAL);
    assert!(Game::new().is_legal(&p));
}

// =============================================================================
// No legal moves
// =============================================================================

#[test]
fn test_empty_hand_has_no_move() {
    let white = vec![building(Kind::Tavern, Color::White)];
    let mut game = Game::from_parts(Board::new(), vec![], white, Color::Black, 4);
    let mut searcher = Searcher::default();
    assert_eq!(searcher.search(&mut game, Color::Black).best, None);
    assert_eq!(LargestPiece::default().choose_move(&game, Color::Black), None);
    assert_eq!(LookAhead.choose_move(&game, Color::Black), None);
}

#[test]
fn test_full_board_has_no_move() {
    let mut board = Board::new();
    for y in 0..10 {
        for x in 0..10 {
            board.set(x, y, CellState::Occupied(Color::White));
        }
    }
    let mut game = Game::from_parts(board, catalog(Color::Black), vec![], Color::Black, 30);
    assert!(game.is_finished());
    assert!(generate(&game, Color::Black, None).is_empty());
    let mut agent = Agent::default();
    assert_eq!(agent.choose_move(&mut game, Color::Black, None), None);
}

// =============================================================================
// Territory-seeking policies
// =============================================================================

#[test]
fn test_lookahead_takes_the_corner() {
    let game = corner_trap();
    let tavern = building(Kind::Tavern, Color::Black);
    let expected = Placement::new(1, 1, Direction::Deg0, tavern);
    assert_eq!(LookAhead.choose_move(&game, Color::Black), Some(expected));
}

#[test]
fn test_lookahead_prefers_largest_gain() {
    let game = small_and_large_trap();
    let tavern = building(Kind::Tavern, Color::Black);
    let small = Placement::new(0, 1, Direction::Deg0, tavern);
    let large = Placement::new(1, 8, Direction::Deg0, tavern);

    let gain = |p: &Placement| territory(&after(&game, p).unwrap(), Color::Black);
    assert_eq!(gain(&small), 1);
    assert_eq!(gain(&large), 3);
    let order = legal_placements(&game, tavern);
    let position = |p: &Placement| order.iter().position(|q| q == p).unwrap();
    assert!(position(&small) < position(&large));
    for p in order.iter().filter(|&&p| p != small && p != large) {
        assert!(gain(p) <= 1, "{p} gains {}", gain(p));
    }

    assert_eq!(LookAhead.choose_move(&game, Color::Black), Some(large));
}

#[test]
fn test_one_ply_search_takes_the_corner() {
    let mut game = corner_trap();
    let mut searcher = Searcher::new(SearchConfig::with_depth(1));
    let result = searcher.search(&mut game, Color::Black);
    let tavern = building(Kind::Tavern, Color::Black);
    assert_eq!(result.best, Some(Placement::new(1, 1, Direction::Deg0, tavern)));
    // Three walls plus three claimed cells.
    assert_eq!(result.score, 6);
}

#[test]
fn test_largest_piece_considers_every_max_value_building() {
    let black = vec![
        building(Kind::Tavern, Color::Black),
        building(Kind::Tower, Color::Black),
        building(Kind::Castle, Color::Black),
    ];
    let game = opened_with(black);
    let candidates = LargestPiece::candidate_buildings(&game, Color::Black);
    assert_eq!(
        candidates,
        vec![building(Kind::Tower, Color::Black), building(Kind::Castle, Color::Black)]
    );

    let mut policy = LargestPiece::new(quick_rollouts());
    let p = policy.choose_move(&game, Color::Black).unwrap();
    assert!(candidates.contains(&p.building));
    assert!(game.is_legal(&p));
}

fn opened_with(black: Vec<Building>) -> Game {
    let mut board = Board::new();
    board.place(opening());
    Game::from_parts(board, black, catalog(Color::White), Color::Black, 1)
}

// =============================================================================
// Full games
// =============================================================================

#[test]
fn test_lookahead_vs_largest_finishes() {
    let mut game = Game::new();
    let mut black = Agent::new(Policy::LookAhead, SearchConfig::default(), quick_rollouts());
    let mut white = Agent::new(Policy::LargestPiece, SearchConfig::default(), quick_rollouts());
    play_out(&mut game, &mut black, &mut white);

    assert!(game.is_finished());
    assert_eq!(game.history().count(), game.turn());
    assert!(generate(&game, Color::Black, None).is_empty());
    assert!(generate(&game, Color::White, None).is_empty());
}

#[test]
fn test_shallow_minimax_game_finishes() {
    let search = SearchConfig {
        depth: 1,
        root_limit: Some(40),
        ..SearchConfig::default()
    };
    let mut game = Game::new();
    let mut black = Agent::new(Policy::Minimax, search, quick_rollouts());
    let mut white = Agent::new(Policy::LookAhead, search, quick_rollouts());
    play_out(&mut game, &mut black, &mut white);
    assert!(game.is_finished());
}

#[test]
fn test_undo_returns_to_start() {
    let mut game = opened();
    let mut agent = Agent::new(Policy::LookAhead, SearchConfig::default(), quick_rollouts());
    let mut snapshots = vec![game.clone()];
    for _ in 0..8 {
        if game.is_finished() {
            break;
        }
        let color = game.current_player();
        let p = agent.choose_move(&mut game, color, None).unwrap();
        game.try_place(&p).unwrap();
        snapshots.push(game.clone());
    }
    snapshots.pop();
    while let Some(expected) = snapshots.pop() {
        game.undo();
        assert_eq!(game, expected);
    }
    assert_eq!(game.turn(), 1);
}

#[test]
fn test_search_leaves_live_game_untouched() {
    let mut game = opened();
    let before = game.clone();
    let mut searcher = Searcher::new(SearchConfig {
        depth: 2,
        root_limit: Some(10),
        node_limit: Some(6),
        ..SearchConfig::default()
    });
    let result = searcher.search(&mut game, Color::Black);
    assert!(result.best.is_some());
    assert!(result.stats.nodes > 0);
    assert_eq!(game, before);
}
