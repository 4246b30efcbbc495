use crate::grid::{Cell, Grid, GRID_SIZE};

/// Positional weights, indexed `[x][y]` like the grid itself. Weights
/// decrease monotonically away from the (0, 0) corner, biasing the search
/// toward parking large tiles there and keeping small tiles away.
///
/// Constants from https://codemyroad.wordpress.com/2014/05/14/2048-ai-the-intelligent-bot/
const GRID_WEIGHTS: [[f64; 4]; 4] = [
    [0.135759, 0.121925, 0.102812, 0.099937],
    [0.0997992, 0.08884805, 0.076711, 0.0724143],
    [0.060654, 0.0562579, 0.037116, 0.0161889],
    [0.0125498, 0.00992495, 0.00575871, 0.00335193],
];

const SMOOTHNESS_BONUS: f64 = 0.25;

/// Static evaluation of a position: positional weight score plus a
/// smoothness bonus for merge-ready neighbors.
///
/// ```
/// use agent_2048::expectimax::evaluate;
/// use agent_2048::grid::Grid;
///
/// assert_eq!(evaluate(&Grid::new()), 0.0);
/// ```
pub fn evaluate(grid: &Grid) -> f64 {
    weight_score(grid) + smoothness_score(grid)
}

/// Sum of `tile value * positional weight` over all occupied cells.
fn weight_score(grid: &Grid) -> f64 {
    grid.tiles()
        .map(|tile| {
            f64::from(tile.value) * GRID_WEIGHTS[tile.position.x as usize][tile.position.y as usize]
        })
        .sum()
}

/// `0.25 * neighbor value` for every up/left neighbor holding an
/// equal-valued tile. Each adjacent pair is counted once; near-equal
/// (half/double) adjacency is deliberately not rewarded.
fn smoothness_score(grid: &Grid) -> f64 {
    let mut score = 0.0;
    for x in 0..GRID_SIZE {
        for y in 0..GRID_SIZE {
            let tile = match grid.cell_content(Cell::new(x, y)) {
                Some(tile) => tile,
                None => continue,
            };
            for neighbor_cell in [Cell::new(x - 1, y), Cell::new(x, y - 1)] {
                if let Some(neighbor) = grid.cell_content(neighbor_cell) {
                    if neighbor.value == tile.value {
                        score += SMOOTHNESS_BONUS * f64::from(neighbor.value);
                    }
                }
            }
        }
    }
    score
}
