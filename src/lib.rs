//! Cathedral-AI: a minimax engine for the Cathedral board game.
//!
//! Players take turns putting polyomino buildings on a 10x10 board. Walling
//! off a region with your own buildings claims it as territory; the player
//! left holding the least building value wins.
//!
//! The engine is generic over the rules through the [`rules::GameRules`]
//! trait; [`game::Game`] is the bundled implementation.
//!
//! ## Modules
//!
//! - [`constants`] - Board size, search defaults and evaluation weights
//! - [`building`] - Colors, directions and the building catalog
//! - [`board`] - Cells, placements and territory resolution
//! - [`game`] - Reference rules with apply/undo history
//! - [`rules`] - The rules trait the engine works against
//! - [`txn`] - Apply-undo guards and what-if duplicates
//! - [`movegen`] - Candidate generation and ordering
//! - [`eval`] - Position evaluation
//! - [`search`] - Alpha-beta minimax
//! - [`playout`] - Random rollouts
//! - [`policy`] - Largest-piece and lookahead policies
//! - [`agent`] - Policy selection and fallbacks
//! - [`protocol`] - Text protocol front end
//!
//! ## Example
//!
//! ```
//! use cathedral_ai::agent::Agent;
//! use cathedral_ai::game::Game;
//! use cathedral_ai::rules::GameRules;
//!
//! let mut game = Game::new();
//! let mut agent = Agent::default();
//!
//! // The opening is fixed; later moves come from the search.
//! for _ in 0..3 {
//!     let color = game.current_player();
//!     let placement = agent.choose_move(&mut game, color, None).unwrap();
//!     game.try_place(&placement).unwrap();
//! }
//! assert_eq!(game.turn(), 3);
//! ```

pub mod agent;
pub mod board;
pub mod building;
pub mod constants;
pub mod eval;
pub mod game;
pub mod movegen;
pub mod playout;
pub mod policy;
pub mod protocol;
pub mod rules;
pub mod search;
pub mod txn;
