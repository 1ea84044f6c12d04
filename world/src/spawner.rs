//! Target placement on unoccupied cells.

use joyful_snake_core::CellCoord;
use rand::{seq::SliceRandom, Rng};

use crate::grid::Grid;

/// Chooses a uniformly random cell that no body segment occupies.
///
/// Draws are rejected while they land on the body. After as many rejected
/// draws as the grid has cells the remaining free cells are enumerated and
/// one is drawn directly, so a nearly full grid still resolves quickly.
/// Returns `None` only when the body covers the entire grid.
pub fn spawn<'a, B, R>(grid: &Grid, body: B, rng: &mut R) -> Option<CellCoord>
where
    B: IntoIterator<Item = &'a CellCoord> + Copy,
    R: Rng + ?Sized,
{
    let side = grid.side();
    if side == 0 {
        return None;
    }

    for _ in 0..grid.cell_count() {
        let cell = CellCoord::new(rng.gen_range(0..side), rng.gen_range(0..side));
        if !grid.is_occupied(body, cell) {
            return Some(cell);
        }
    }

    let free: Vec<CellCoord> = grid
        .cells()
        .filter(|cell| !grid.is_occupied(body, *cell))
        .collect();
    free.choose(rng).copied()
}
