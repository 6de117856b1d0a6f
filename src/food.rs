use log::trace;
use rand::Rng;

use crate::config::{FoodPlacement, GridSize};
use crate::snake::{Cell, Snake};

/// Random draws per grid cell before sampling gives up and scans.
const SAMPLE_ATTEMPTS_PER_CELL: usize = 4;

/// Picks a free cell with the given strategy, or `None` when the snake fills the grid.
#[must_use]
pub fn place_food<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: GridSize,
    snake: &Snake,
    placement: FoodPlacement,
) -> Option<Cell> {
    match placement {
        FoodPlacement::Sample => sample_position(rng, bounds, snake),
        FoodPlacement::Scan => scan_position(rng, bounds, snake),
    }
}

/// Rejection sampling over the whole grid.
///
/// Falls back to [`scan_position`] once the attempt budget is spent, so a
/// crowded board still terminates.
#[must_use]
pub fn sample_position<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: GridSize,
    snake: &Snake,
) -> Option<Cell> {
    if snake.len() >= bounds.total_cells() {
        return None;
    }

    let attempts = bounds.total_cells().saturating_mul(SAMPLE_ATTEMPTS_PER_CELL);
    for _ in 0..attempts {
        let candidate = Cell::new(
            rng.gen_range(0..i32::from(bounds.width)),
            rng.gen_range(0..i32::from(bounds.height)),
        );
        if !snake.occupies(candidate) {
            return Some(candidate);
        }
    }

    trace!("food sampling exhausted {attempts} attempts, scanning free cells");
    scan_position(rng, bounds, snake)
}

/// Enumerates every free cell and picks one uniformly.
#[must_use]
pub fn scan_position<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: GridSize,
    snake: &Snake,
) -> Option<Cell> {
    let candidates = free_cells(bounds, snake);
    if candidates.is_empty() {
        return None;
    }

    let index = rng.gen_range(0..candidates.len());
    Some(candidates[index])
}

/// Every in-grid cell not covered by the snake, row by row.
#[must_use]
pub fn free_cells(bounds: GridSize, snake: &Snake) -> Vec<Cell> {
    let mut cells = Vec::with_capacity(bounds.total_cells().saturating_sub(snake.len()));

    for y in 0..i32::from(bounds.height) {
        for x in 0..i32::from(bounds.width) {
            let cell = Cell::new(x, y);
            if !snake.occupies(cell) {
                cells.push(cell);
            }
        }
    }

    cells
}
