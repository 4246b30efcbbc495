//! agent-2048: a 2048 move-simulation engine + Expectimax policy
//!
//! This crate provides:
//! - A [`grid::Grid`] of optional tiles with snapshot (de)serialization
//! - A simulation engine ([`engine::BoardState`]) with real and "ghost"
//!   (exploratory) moves
//! - A fixed-depth Expectimax AI ([`expectimax::Expectimax`]) that picks
//!   one of the four directions for a given board
//!
//! The crate never renders or reads input: collaborators hand it a
//! [`grid::GridSnapshot`] and apply the returned direction code themselves.
//!
//! Quick start:
//! ```
//! use agent_2048::engine::{BoardState, Move};
//! use agent_2048::expectimax::{Expectimax, ExpectimaxConfig};
//! use agent_2048::grid::Grid;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // Deterministic game setup with a seeded RNG
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut game = BoardState::from_grid(&Grid::new());
//! game.add_random_tile(&mut rng);
//! game.add_random_tile(&mut rng);
//!
//! let agent = Expectimax::with_config(ExpectimaxConfig { depth: 2 });
//! let direction = agent.best_move(&game.grid().serialize()).unwrap();
//! assert!(game.make_move(direction, &mut rng));
//! ```
//!
//! Note: the search itself is deterministic; randomness only occurs when
//! applying real moves with [`engine::BoardState::make_move`].

pub mod engine;
pub mod expectimax;
pub mod grid;
