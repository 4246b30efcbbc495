use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Board dimension. The engine only supports the classic 4x4 game.
pub const GRID_SIZE: i32 = 4;

/// A board coordinate: `x` is the column, `y` is the row, both in `[0, 4)`.
///
/// Fields are signed so that stepping one cell past the edge stays
/// representable and can be rejected by [`Grid::within_bounds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    /// The cell one step away along `vector`.
    #[inline]
    pub(crate) fn step(self, vector: (i32, i32)) -> Self {
        Cell { x: self.x + vector.0, y: self.y + vector.1 }
    }
}

/// A tile on the board: a position and a power-of-two value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub position: Cell,
    pub value: u32,
}

impl Tile {
    #[inline]
    pub fn new(position: Cell, value: u32) -> Self {
        Tile { position, value }
    }
}

/// Serialized form of a single occupied cell. Merge provenance is never
/// part of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSnapshot {
    pub value: u32,
}

/// Serialized grid state: the boundary type between this core and its
/// collaborators (game loop, renderer). `cells[x][y]` holds the tile value
/// at column `x`, row `y`, or `None` for an empty cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub size: usize,
    pub cells: Vec<Vec<Option<TileSnapshot>>>,
}

impl GridSnapshot {
    /// Encode as JSON, the format the reference collaborator speaks.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from JSON. Shape/value validation happens in
    /// [`Grid::from_snapshot`], not here.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SnapshotError {
    #[error("unsupported grid size {0}, only 4 is supported")]
    UnsupportedSize(usize),
    #[error("ragged snapshot: expected {expected} entries, got {got}")]
    RaggedCells { expected: usize, got: usize },
    #[error("invalid tile value {value} at ({x}, {y})")]
    InvalidTileValue { value: u32, x: usize, y: usize },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A 4x4 grid of optional tiles, indexed `[x][y]` (column, then row).
///
/// At most one tile occupies a coordinate, and a tile's recorded position
/// always matches the slot it sits in. The grid is a plain value: search
/// branches clone it rather than share it.
///
/// ```
/// use agent_2048::grid::{Cell, Grid, Tile};
///
/// let mut grid = Grid::new();
/// grid.insert_tile(Tile::new(Cell::new(0, 0), 2));
/// assert!(grid.cell_available(Cell::new(1, 0)));
/// assert_eq!(grid.available_cells().len(), 15);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Grid {
    cells: [[Option<Tile>; GRID_SIZE as usize]; GRID_SIZE as usize],
}

impl Grid {
    /// An empty grid.
    pub fn new() -> Self {
        Grid::default()
    }

    /// Rebuild a grid from a snapshot, validating shape and tile values.
    pub fn from_snapshot(snapshot: &GridSnapshot) -> Result<Self, SnapshotError> {
        if snapshot.size != GRID_SIZE as usize {
            return Err(SnapshotError::UnsupportedSize(snapshot.size));
        }
        if snapshot.cells.len() != snapshot.size {
            return Err(SnapshotError::RaggedCells {
                expected: snapshot.size,
                got: snapshot.cells.len(),
            });
        }
        for (x, column) in snapshot.cells.iter().enumerate() {
            if column.len() != snapshot.size {
                return Err(SnapshotError::RaggedCells {
                    expected: snapshot.size,
                    got: column.len(),
                });
            }
            for (y, slot) in column.iter().enumerate() {
                if let Some(tile) = slot {
                    if tile.value < 2 || !tile.value.is_power_of_two() {
                        return Err(SnapshotError::InvalidTileValue { value: tile.value, x, y });
                    }
                }
            }
        }
        Ok(Self::restore(snapshot))
    }

    /// Rebuild without validation. Only for snapshots this crate produced
    /// itself (e.g. a `BoardState` restoring its own previous state).
    pub(crate) fn restore(snapshot: &GridSnapshot) -> Self {
        let mut grid = Grid::new();
        for (x, column) in snapshot.cells.iter().take(GRID_SIZE as usize).enumerate() {
            for (y, slot) in column.iter().take(GRID_SIZE as usize).enumerate() {
                if let Some(tile) = slot {
                    let position = Cell::new(x as i32, y as i32);
                    grid.cells[x][y] = Some(Tile::new(position, tile.value));
                }
            }
        }
        grid
    }

    /// Snapshot the grid contents: tile positions and values only.
    pub fn serialize(&self) -> GridSnapshot {
        let cells = self
            .cells
            .iter()
            .map(|column| {
                column
                    .iter()
                    .map(|slot| slot.map(|tile| TileSnapshot { value: tile.value }))
                    .collect()
            })
            .collect();
        GridSnapshot { size: GRID_SIZE as usize, cells }
    }

    #[inline]
    pub fn within_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < GRID_SIZE && cell.y >= 0 && cell.y < GRID_SIZE
    }

    /// The tile at `cell`, or `None` if the cell is empty or out of bounds.
    #[inline]
    pub fn cell_content(&self, cell: Cell) -> Option<Tile> {
        if self.within_bounds(cell) {
            self.cells[cell.x as usize][cell.y as usize]
        } else {
            None
        }
    }

    /// True iff `cell` is in bounds and unoccupied.
    #[inline]
    pub fn cell_available(&self, cell: Cell) -> bool {
        self.within_bounds(cell) && self.cell_content(cell).is_none()
    }

    /// All unoccupied cells, in a fixed column-outer scan order.
    ///
    /// The order is load-bearing: the chance layer of the search sums
    /// branch scores in this order, so it must be stable for results to be
    /// reproducible.
    pub fn available_cells(&self) -> Vec<Cell> {
        let mut available = Vec::new();
        for x in 0..GRID_SIZE {
            for y in 0..GRID_SIZE {
                let cell = Cell::new(x, y);
                if self.cell_content(cell).is_none() {
                    available.push(cell);
                }
            }
        }
        available
    }

    #[inline]
    pub fn cells_available(&self) -> bool {
        self.cells.iter().any(|column| column.iter().any(|slot| slot.is_none()))
    }

    /// Uniform pick among available cells, or `None` on a full board.
    pub fn random_available_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Cell> {
        let available = self.available_cells();
        if available.is_empty() {
            None
        } else {
            Some(available[rng.gen_range(0..available.len())])
        }
    }

    /// Place `tile` at its recorded position, replacing any occupant.
    #[inline]
    pub fn insert_tile(&mut self, tile: Tile) {
        debug_assert!(self.within_bounds(tile.position));
        self.cells[tile.position.x as usize][tile.position.y as usize] = Some(tile);
    }

    /// Clear the slot at `tile`'s recorded position.
    #[inline]
    pub fn remove_tile(&mut self, tile: &Tile) {
        debug_assert!(self.within_bounds(tile.position));
        self.cells[tile.position.x as usize][tile.position.y as usize] = None;
    }

    /// Iterate over all tiles currently on the board.
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        self.cells.iter().flatten().filter_map(|slot| *slot)
    }

    /// The largest tile value on the board, or 0 for an empty board.
    pub fn highest_tile(&self) -> u32 {
        self.tiles().map(|tile| tile.value).max().unwrap_or(0)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..GRID_SIZE {
            if y > 0 {
                writeln!(f, "--------------------------------")?;
            }
            let row: Vec<String> = (0..GRID_SIZE)
                .map(|x| match self.cell_content(Cell::new(x, y)) {
                    Some(tile) => format!("{:^7}", tile.value),
                    None => "       ".to_string(),
                })
                .collect();
            writeln!(f, "{}", row.join("|"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn it_inserts_and_removes() {
        let mut grid = Grid::new();
        let tile = Tile::new(Cell::new(2, 3), 8);
        grid.insert_tile(tile);
        assert_eq!(grid.cell_content(Cell::new(2, 3)), Some(tile));
        assert!(!grid.cell_available(Cell::new(2, 3)));
        grid.remove_tile(&tile);
        assert_eq!(grid.cell_content(Cell::new(2, 3)), None);
        assert!(grid.cell_available(Cell::new(2, 3)));
    }

    #[test]
    fn cell_content_out_of_bounds_is_none() {
        let mut grid = Grid::new();
        grid.insert_tile(Tile::new(Cell::new(0, 0), 2));
        assert_eq!(grid.cell_content(Cell::new(-1, 0)), None);
        assert_eq!(grid.cell_content(Cell::new(0, 4)), None);
        assert!(!grid.cell_available(Cell::new(4, 0)));
    }

    #[test]
    fn available_cells_scan_order_is_stable() {
        let mut grid = Grid::new();
        grid.insert_tile(Tile::new(Cell::new(0, 0), 2));
        grid.insert_tile(Tile::new(Cell::new(1, 2), 4));
        let available = grid.available_cells();
        assert_eq!(available.len(), 14);
        // Column-outer order: (0,1) comes first, and (1,2) is skipped.
        assert_eq!(available[0], Cell::new(0, 1));
        assert_eq!(available[1], Cell::new(0, 2));
        assert!(!available.contains(&Cell::new(1, 2)));
        assert_eq!(available, grid.available_cells());
    }

    #[test]
    fn random_available_cell_respects_occupancy() {
        let mut grid = Grid::new();
        for x in 0..GRID_SIZE {
            for y in 0..GRID_SIZE {
                if (x, y) != (3, 1) {
                    grid.insert_tile(Tile::new(Cell::new(x, y), 2));
                }
            }
        }
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(grid.random_available_cell(&mut rng), Some(Cell::new(3, 1)));
        grid.insert_tile(Tile::new(Cell::new(3, 1), 2));
        assert_eq!(grid.random_available_cell(&mut rng), None);
        assert!(!grid.cells_available());
    }

    #[test]
    fn snapshot_round_trip() {
        let mut grid = Grid::new();
        grid.insert_tile(Tile::new(Cell::new(0, 0), 2));
        grid.insert_tile(Tile::new(Cell::new(3, 2), 1024));
        let snapshot = grid.serialize();
        assert_eq!(snapshot.size, 4);
        assert_eq!(snapshot.cells[3][2], Some(TileSnapshot { value: 1024 }));
        let restored = Grid::from_snapshot(&snapshot).unwrap();
        assert_eq!(restored, grid);
    }

    #[test]
    fn json_round_trip() {
        let mut grid = Grid::new();
        grid.insert_tile(Tile::new(Cell::new(1, 1), 16));
        let json = grid.serialize().to_json().unwrap();
        let snapshot = GridSnapshot::from_json(&json).unwrap();
        assert_eq!(Grid::from_snapshot(&snapshot).unwrap(), grid);
    }

    #[test]
    fn from_snapshot_rejects_bad_input() {
        let mut snapshot = Grid::new().serialize();
        snapshot.size = 5;
        assert!(matches!(
            Grid::from_snapshot(&snapshot),
            Err(SnapshotError::UnsupportedSize(5))
        ));

        let mut ragged = Grid::new().serialize();
        ragged.cells[2].pop();
        assert!(matches!(
            Grid::from_snapshot(&ragged),
            Err(SnapshotError::RaggedCells { expected: 4, got: 3 })
        ));

        let mut bad_value = Grid::new().serialize();
        bad_value.cells[0][0] = Some(TileSnapshot { value: 3 });
        assert!(matches!(
            Grid::from_snapshot(&bad_value),
            Err(SnapshotError::InvalidTileValue { value: 3, x: 0, y: 0 })
        ));
    }

    #[test]
    fn it_highest_tile() {
        let mut grid = Grid::new();
        assert_eq!(grid.highest_tile(), 0);
        grid.insert_tile(Tile::new(Cell::new(0, 0), 4));
        grid.insert_tile(Tile::new(Cell::new(2, 2), 64));
        assert_eq!(grid.highest_tile(), 64);
        assert_eq!(grid.tiles().map(|t| t.value).sum::<u32>(), 68);
    }
}
