use rand::Rng;
use std::fmt;

use crate::grid::{Cell, Grid, GridSnapshot, SnapshotError, Tile};

/// A direction to move/merge tiles.
///
/// Discriminants are the wire codes exchanged with collaborators:
/// 0 = up, 1 = right, 2 = down, 3 = left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Move {
    /// All directions, in wire-code order. Search and legality probes
    /// iterate in this order, which fixes tie-break outcomes.
    pub const ALL: [Move; 4] = [Move::Up, Move::Right, Move::Down, Move::Left];

    #[inline]
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Move> {
        match index {
            0 => Some(Move::Up),
            1 => Some(Move::Right),
            2 => Some(Move::Down),
            3 => Some(Move::Left),
            _ => None,
        }
    }

    /// Unit vector of tile travel for this direction.
    #[inline]
    fn vector(self) -> (i32, i32) {
        match self {
            Move::Up => (0, -1),
            Move::Right => (1, 0),
            Move::Down => (0, 1),
            Move::Left => (-1, 0),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Move::Up => "up",
            Move::Right => "right",
            Move::Down => "down",
            Move::Left => "left",
        };
        write!(f, "{}", name)
    }
}

/// Traversal order over both axes: cells farthest along the move direction
/// come first, so a tile pushed earlier in the pass is never re-pushed.
fn traversals(vector: (i32, i32)) -> ([i32; 4], [i32; 4]) {
    let mut xs = [0, 1, 2, 3];
    let mut ys = [0, 1, 2, 3];
    if vector.0 == 1 {
        xs.reverse();
    }
    if vector.1 == 1 {
        ys.reverse();
    }
    (xs, ys)
}

/// The simulation engine: an owned [`Grid`] plus the score accumulated by
/// real moves, resettable to the snapshot it was created from.
///
/// Two move entry points share one protocol:
/// - [`make_move`](Self::make_move) is a real move: it accrues score and
///   spawns a random tile when anything moved.
/// - [`ghost_move`](Self::ghost_move) is the exploratory primitive used by
///   the search: identical sliding and merging, but it never spawns and
///   never touches the score. The search enumerates both spawn outcomes
///   itself instead of sampling.
///
/// ```
/// use agent_2048::engine::{BoardState, Move};
/// use agent_2048::grid::{Cell, Grid, Tile};
///
/// let mut grid = Grid::new();
/// grid.insert_tile(Tile::new(Cell::new(0, 0), 2));
/// let mut state = BoardState::from_grid(&grid);
/// assert!(state.ghost_move(Move::Right));
/// assert_eq!(state.score(), 0);
/// state.reset();
/// assert_eq!(state.grid(), &grid);
/// ```
#[derive(Debug, Clone)]
pub struct BoardState {
    grid: Grid,
    score: u64,
    previous: GridSnapshot,
}

impl BoardState {
    /// Snapshot `grid` into a fresh state with zero score.
    pub fn from_grid(grid: &Grid) -> Self {
        BoardState { grid: grid.clone(), score: 0, previous: grid.serialize() }
    }

    /// Build a state from a collaborator-supplied snapshot, validating it.
    pub fn from_snapshot(snapshot: &GridSnapshot) -> Result<Self, SnapshotError> {
        let grid = Grid::from_snapshot(snapshot)?;
        Ok(BoardState { grid, score: 0, previous: snapshot.clone() })
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable grid access for the search's hypothetical spawns.
    #[inline]
    pub(crate) fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Score accumulated by real moves since construction or last reset.
    #[inline]
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Restore the grid from the snapshot this state was created from and
    /// zero the score. Callable repeatedly; sibling search branches rely on
    /// every trial starting from identical contents.
    pub fn reset(&mut self) {
        self.score = 0;
        self.grid = Grid::restore(&self.previous);
    }

    /// Spawn a 2 (probability 0.9) or 4 (probability 0.1) at a uniformly
    /// random free cell. No-op on a full board.
    pub fn add_random_tile<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if let Some(cell) = self.grid.random_available_cell(rng) {
            let value = if rng.gen_range(0..10) < 9 { 2 } else { 4 };
            self.grid.insert_tile(Tile::new(cell, value));
        }
    }

    /// Apply a real move: slide/merge, accrue merge values into the score,
    /// and spawn a random tile if anything moved. Returns whether any tile
    /// changed position.
    pub fn make_move<R: Rng + ?Sized>(&mut self, direction: Move, rng: &mut R) -> bool {
        let moved = self.slide(direction, true);
        if moved {
            self.add_random_tile(rng);
        }
        moved
    }

    /// Apply an exploratory move: same sliding and merging as
    /// [`make_move`](Self::make_move), but no spawn and no score change.
    pub fn ghost_move(&mut self, direction: Move) -> bool {
        self.slide(direction, false)
    }

    /// True iff some direction would move at least one tile.
    pub fn has_legal_move(&self) -> bool {
        let mut scratch = BoardState::from_grid(&self.grid);
        Move::ALL.iter().any(|&direction| scratch.ghost_move(direction))
    }

    fn slide(&mut self, direction: Move, real: bool) -> bool {
        let vector = direction.vector();
        let (xs, ys) = traversals(vector);
        // Destinations already produced by a merge this pass; at most one
        // merge may consume a given destination tile per pass.
        let mut merged_into: Vec<Cell> = Vec::with_capacity(4);
        let mut moved = false;

        for &x in &xs {
            for &y in &ys {
                let cell = Cell::new(x, y);
                let tile = match self.grid.cell_content(cell) {
                    Some(tile) => tile,
                    None => continue,
                };
                let (farthest, next) = self.farthest_position(cell, vector);
                match self.grid.cell_content(next) {
                    Some(target) if target.value == tile.value && !merged_into.contains(&next) => {
                        self.grid.remove_tile(&tile);
                        let merged = Tile::new(next, tile.value * 2);
                        self.grid.insert_tile(merged);
                        merged_into.push(next);
                        if real {
                            self.score += u64::from(merged.value);
                        }
                        // `next` always differs from `cell`, so a merge
                        // counts as movement.
                        moved = true;
                    }
                    _ => {
                        if farthest != cell {
                            self.grid.remove_tile(&tile);
                            self.grid.insert_tile(Tile::new(farthest, tile.value));
                            moved = true;
                        }
                    }
                }
            }
        }
        moved
    }

    /// Walk from `start` along `vector` while the next cell is free.
    /// Returns the farthest free cell and the first blocked cell beyond it
    /// (the merge candidate, possibly out of bounds).
    fn farthest_position(&self, start: Cell, vector: (i32, i32)) -> (Cell, Cell) {
        let mut previous = start;
        let mut cell = start.step(vector);
        while self.grid.within_bounds(cell) && self.grid.cell_available(cell) {
            previous = cell;
            cell = cell.step(vector);
        }
        (previous, cell)
    }
}
