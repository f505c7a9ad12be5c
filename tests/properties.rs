//! Property-based tests for the engine.
//!
//! Positions are reached by random legal play from a new game, so every
//! generated state is one the rules can actually produce.

use cathedral_ai::building::Color;
use cathedral_ai::eval::{evaluate, tally};
use cathedral_ai::game::Game;
use cathedral_ai::movegen::generate;
use cathedral_ai::rules::GameRules;
use cathedral_ai::search::{SearchConfig, Searcher};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// Play the given move indices from a new game, stopping early if it ends.
fn play_indices(indices: &[usize]) -> Game {
    let mut game = Game::new();
    for &idx in indices {
        let moves = generate(&game, game.current_player(), None);
        if moves.is_empty() {
            break;
        }
        let mv = moves[idx % moves.len()];
        assert!(game.apply(&mv), "generated placement {mv} rejected");
    }
    game
}

/// A position a few placements into a game.
fn arb_position() -> impl Strategy<Value = Game> {
    proptest::collection::vec(any::<usize>(), 1..12).prop_map(|indices| play_indices(&indices))
}

fn arb_player() -> impl Strategy<Value = Color> {
    prop_oneof![Just(Color::Black), Just(Color::White)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Undoing every apply restores each earlier state exactly.
    #[test]
    fn prop_apply_undo_roundtrip(indices in proptest::collection::vec(any::<usize>(), 1..16)) {
        let mut game = Game::new();
        let mut snapshots = Vec::new();
        for &idx in &indices {
            let moves = generate(&game, game.current_player(), None);
            if moves.is_empty() {
                break;
            }
            snapshots.push(game.clone());
            prop_assert!(game.apply(&moves[idx % moves.len()]));
        }
        while let Some(expected) = snapshots.pop() {
            game.undo();
            prop_assert_eq!(&game, &expected);
        }
        prop_assert_eq!(game, Game::new());
    }

    /// Every generated placement is legal, and limits only cut the tail.
    #[test]
    fn prop_generator_legal_and_bounded(game in arb_position(), color in arb_player(), k in 0usize..30) {
        let all = generate(&game, color, None);
        for p in &all {
            prop_assert!(game.is_legal(p), "illegal placement {}", p);
        }
        let limited = generate(&game, color, Some(k));
        prop_assert!(limited.len() <= k);
        prop_assert_eq!(&limited[..], &all[..limited.len()]);
    }

    /// Each side scores the same on the color-swapped board as its
    /// opponent did on the unswapped board.
    #[test]
    fn prop_evaluation_color_symmetry(game in arb_position()) {
        let mut swapped = game.board().clone();
        swapped.swap_colors();
        let mirror = Game::from_parts(swapped, vec![], vec![], Color::White, game.turn().max(1));
        prop_assert_eq!(evaluate(&game, Color::Black), evaluate(&mirror, Color::White));
        prop_assert_eq!(evaluate(&game, Color::White), evaluate(&mirror, Color::Black));
        prop_assert_eq!(tally(&game, Color::Black).own, tally(&mirror, Color::White).own);
    }

    /// Pruning never changes the chosen placement or its score.
    #[test]
    fn prop_alpha_beta_matches_exhaustive(game in arb_position(), depth in 1u32..=3) {
        let config = SearchConfig {
            depth,
            root_limit: Some(6),
            node_limit: Some(4),
            ..SearchConfig::default()
        };
        let color = game.current_player();
        let mut live = game.clone();
        let mut searcher = Searcher::new(config);
        let pruned = searcher.search(&mut live, color);
        prop_assert_eq!(&live, &game);
        let full = searcher.exhaustive(&mut live, color);
        prop_assert_eq!(&live, &game);
        prop_assert_eq!(pruned.best, full.best);
        prop_assert_eq!(pruned.score, full.score);
        prop_assert!(pruned.stats.nodes <= full.stats.nodes);
    }
}
