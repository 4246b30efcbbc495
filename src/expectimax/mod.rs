//! Expectimax search policy for 2048.
//!
//! [`Expectimax`] explores the game tree to a fixed depth, alternating MAX
//! layers (the player picks the best direction) with CHANCE layers (the
//! environment drops a 2 with probability 0.9 or a 4 with probability 0.1
//! into every empty cell, each cell equally likely), and scores leaves with
//! the static [`evaluate`] heuristic.
//!
//! The search is fully deterministic: instead of sampling spawns it
//! enumerates both outcomes for every empty cell and takes the exact
//! expectation. Randomness exists only in [`BoardState::make_move`], which
//! the search never calls.
//!
//! Quick start
//! ```
//! use agent_2048::engine::{BoardState, Move};
//! use agent_2048::expectimax::{Expectimax, ExpectimaxConfig};
//! use agent_2048::grid::{Cell, Grid, Tile};
//!
//! let mut grid = Grid::new();
//! grid.insert_tile(Tile::new(Cell::new(0, 0), 2));
//! grid.insert_tile(Tile::new(Cell::new(1, 0), 2));
//!
//! let agent = Expectimax::with_config(ExpectimaxConfig { depth: 2 });
//! let state = BoardState::from_grid(&grid);
//! let direction = agent.select_move(&state);
//! assert!(Move::ALL.contains(&direction));
//! ```

use crate::engine::{BoardState, Move};
use crate::grid::{GridSnapshot, SnapshotError, Tile};

mod heuristic;

pub use heuristic::evaluate;

/// Spawn value distribution used by the chance layers.
const SPAWN_TWO_PROBABILITY: f64 = 0.9;
const SPAWN_FOUR_PROBABILITY: f64 = 0.1;

enum Node {
    Max,
    Chance,
}

/// Configurable knobs for the search. Defaults preserve the classic
/// depth-4 policy.
#[derive(Debug, Clone, Copy)]
pub struct ExpectimaxConfig {
    /// Search depth: the number of layers (counting both kinds) explored
    /// below each root direction before leaves are evaluated.
    pub depth: u64,
}

impl Default for ExpectimaxConfig {
    fn default() -> Self {
        Self { depth: 4 }
    }
}

/// Fixed-depth expectimax move policy.
pub struct Expectimax {
    cfg: ExpectimaxConfig,
}

impl Expectimax {
    pub fn new() -> Self {
        Self::with_config(ExpectimaxConfig::default())
    }

    pub fn with_config(cfg: ExpectimaxConfig) -> Self {
        Expectimax { cfg }
    }

    #[inline]
    pub fn depth(&self) -> u64 {
        self.cfg.depth
    }

    /// Decide a move for a collaborator-supplied grid snapshot.
    ///
    /// The returned [`Move`]'s [`index`](Move::index) is the wire code
    /// (0=up, 1=right, 2=down, 3=left) the caller applies to the live game.
    pub fn best_move(&self, snapshot: &GridSnapshot) -> Result<Move, SnapshotError> {
        let state = BoardState::from_snapshot(snapshot)?;
        Ok(self.select_move(&state))
    }

    /// Pick the best direction from `state`'s current position.
    ///
    /// The trials run on a fresh snapshot of `state`'s current grid (not
    /// its stored reset snapshot, which may be older), so `state` itself is
    /// never mutated. Each direction is tried as a ghost move and scored by
    /// a chance layer at the configured depth, with a reset between trials.
    /// Ties at the root resolve toward the later direction (the comparison
    /// is `>=`), unlike interior MAX layers. If no direction is legal the
    /// position is terminal and the fallback is [`Move::Up`] (code 0).
    pub fn select_move(&self, state: &BoardState) -> Move {
        let mut brain = BoardState::from_grid(state.grid());
        let mut best: Option<(Move, f64)> = None;
        for direction in Move::ALL {
            if brain.ghost_move(direction) {
                let score = self.value(&mut brain, self.cfg.depth, Node::Chance);
                if best.map_or(true, |(_, incumbent)| score >= incumbent) {
                    best = Some((direction, score));
                }
                brain.reset();
            }
        }
        best.map_or(Move::Up, |(direction, _)| direction)
    }

    fn value(&self, state: &mut BoardState, depth: u64, node: Node) -> f64 {
        if depth == 0 {
            return evaluate(state.grid());
        }
        match node {
            Node::Chance => self.chance_value(state, depth),
            // A MAX node with no legal move is a dead branch; it
            // contributes the minimum possible heuristic value.
            Node::Max => self.max_value(state, depth).unwrap_or(0.0),
        }
    }

    /// Exact expectation over which empty cell receives the next spawn
    /// (each equally likely) crossed with the 0.9/0.1 value distribution.
    /// Hypothetical tiles are removed after each branch so siblings see the
    /// same position.
    fn chance_value(&self, state: &mut BoardState, depth: u64) -> f64 {
        let cells = state.grid().available_cells();
        if cells.is_empty() {
            // Full board: no spawn can happen, so the node is a leaf.
            return evaluate(state.grid());
        }
        let mut total = 0.0;
        for &cell in &cells {
            for (value, probability) in
                [(2, SPAWN_TWO_PROBABILITY), (4, SPAWN_FOUR_PROBABILITY)]
            {
                let tile = Tile::new(cell, value);
                state.grid_mut().insert_tile(tile);
                total += probability * self.value(state, depth - 1, Node::Max);
                state.grid_mut().remove_tile(&tile);
            }
        }
        total / cells.len() as f64
    }

    /// Best continuation over the four directions, or `None` when the
    /// position has no legal move. Works on a fresh state rebased onto the
    /// current grid so ghost trials reset cleanly.
    fn max_value(&self, state: &BoardState, depth: u64) -> Option<f64> {
        let mut brain = BoardState::from_grid(state.grid());
        let mut best: Option<f64> = None;
        for direction in Move::ALL {
            if brain.ghost_move(direction) {
                let score = self.value(&mut brain, depth - 1, Node::Chance);
                // Interior tie-break is strict: the earliest direction
                // with an equal score wins.
                if best.map_or(true, |incumbent| score > incumbent) {
                    best = Some(score);
                }
                brain.reset();
            }
        }
        best
    }
}

impl Default for Expectimax {
    fn default() -> Self {
        Self::new()
    }
}
