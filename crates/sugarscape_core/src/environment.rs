use rand::Rng;
use serde::{Deserialize, Serialize};
use sugarscape_data::Coord;

use crate::cell::Cell;
use crate::error::{Result, SimError};
use crate::rules::CellRule;

/// Contributions below this fraction of a distribution's peak are truncated
/// when a Gaussian capacity distribution is accumulated.
const GAUSSIAN_MIN_FRACTION: f64 = 1e-3;

/// A square toroidal grid of sugar-bearing cells.
///
/// The grid is fixed for the lifetime of a run: size and the global
/// capacity ceiling come from configuration, cells are stored row-major,
/// and every coordinate read or write wraps onto the torus, so
/// `(x, y)` and `(x + size, y)` name the same cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Environment {
    size: usize,
    max_capacity: f64,
    cells: Vec<Cell>,
}

impl Environment {
    pub fn new(size: usize, max_capacity: f64) -> Result<Self> {
        if size == 0 {
            return Err(SimError::invariant("environment size must be positive"));
        }
        if max_capacity < 0.0 {
            return Err(SimError::invariant(
                "environment max capacity cannot be negative",
            ));
        }
        Ok(Self {
            size,
            max_capacity,
            cells: vec![Cell::default(); size * size],
        })
    }

    /// Cells per side. The grid holds `size * size` cells in total.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// The capacity ceiling no cell may exceed.
    #[must_use]
    pub fn max_capacity(&self) -> f64 {
        self.max_capacity
    }

    /// Wraps an arbitrary coordinate onto the torus.
    #[must_use]
    pub fn wrap(&self, coord: Coord) -> Coord {
        let sz = self.size as i64;
        Coord::new(coord.x.rem_euclid(sz), coord.y.rem_euclid(sz))
    }

    fn index(&self, coord: Coord) -> usize {
        let wrapped = self.wrap(coord);
        wrapped.y as usize * self.size + wrapped.x as usize
    }

    /// The cell at `(x mod size, y mod size)`. Always succeeds.
    #[must_use]
    pub fn cell_at(&self, coord: Coord) -> &Cell {
        &self.cells[self.index(coord)]
    }

    pub fn cell_at_mut(&mut self, coord: Coord) -> &mut Cell {
        let idx = self.index(coord);
        &mut self.cells[idx]
    }

    /// Row-major enumeration of every coordinate on the grid.
    pub fn coordinates(&self) -> impl Iterator<Item = Coord> + '_ {
        let sz = self.size as i64;
        (0..sz).flat_map(move |y| (0..sz).map(move |x| Coord::new(x, y)))
    }

    /// Row-major enumeration of every cell.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Uniform rejection sampling until an unoccupied cell turns up.
    ///
    /// Returns `None` when every cell is occupied; callers skip placement
    /// in that case instead of spinning forever.
    pub fn random_unoccupied_coordinate<R: Rng>(&self, rng: &mut R) -> Option<Coord> {
        if self.cells.iter().all(Cell::is_occupied) {
            return None;
        }
        loop {
            let coord = Coord::new(
                rng.gen_range(0..self.size as i64),
                rng.gen_range(0..self.size as i64),
            );
            if !self.cell_at(coord).is_occupied() {
                return Some(coord);
            }
        }
    }

    /// Applies a cell rule to every cell, in enumeration order. Rule
    /// authors must not rely on cross-cell ordering.
    pub fn apply_rule_to_all_cells(&mut self, rule: CellRule) -> Result<()> {
        for cell in &mut self.cells {
            rule.apply(cell)?;
        }
        Ok(())
    }

    /// Reorders the coordinates by descending sugar level, stable on ties.
    pub fn sort_by_descending_level(&self, coords: &mut [Coord]) {
        coords.sort_by(|a, b| {
            let level_a = self.cell_at(*a).level();
            let level_b = self.cell_at(*b).level();
            level_b
                .partial_cmp(&level_a)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }

    /// The coordinate with the highest sugar level; the first seen wins on
    /// ties. `None` for an empty list.
    #[must_use]
    pub fn max_level_among(&self, coords: &[Coord]) -> Option<Coord> {
        let mut best: Option<(Coord, f64)> = None;
        for &coord in coords {
            let level = self.cell_at(coord).level();
            match best {
                Some((_, best_level)) if level <= best_level => {}
                _ => best = Some((coord, level)),
            }
        }
        best.map(|(coord, _)| coord)
    }

    /// Accumulates a Gaussian capacity distribution centered on `center`.
    ///
    /// The peak is `max_capacity * peak_factor`; every cell within the
    /// truncation radius receives `peak * exp(-0.5 * (d / dispersion)^2)`,
    /// where `d` is the straight-line distance to the center. The window
    /// wraps toroidally, so one source can contribute to a cell several
    /// times on a small grid. Multiple distributions are additive; each
    /// increment is clamped per cell against the environment ceiling.
    pub fn add_capacity_gaussian(&mut self, peak_factor: f64, center: Coord, dispersion: f64) {
        let peak = self.max_capacity * peak_factor;
        if peak <= 0.0 || dispersion <= 0.0 {
            return;
        }
        // Radius beyond which contributions drop under 0.1% of the peak.
        let max_dist = (dispersion * (-2.0 * GAUSSIAN_MIN_FRACTION.ln()).sqrt()).ceil() as i64;
        let max_capacity = self.max_capacity;
        for x in (center.x - max_dist)..=(center.x + max_dist) {
            for y in (center.y - max_dist)..=(center.y + max_dist) {
                let source = Coord::new(x, y);
                let d = source.distance(center);
                let contribution = peak * (-0.5 * (d / dispersion).powi(2)).exp();
                self.cell_at_mut(source).add_capacity(contribution, max_capacity);
            }
        }
    }

    /// Raises every cell's level to its capacity. Experiment setup runs
    /// this once after the distributions, otherwise the whole population
    /// starves on the first cycle.
    pub fn set_all_levels_to_capacity(&mut self) -> Result<()> {
        for cell in &mut self.cells {
            let capacity = cell.capacity();
            cell.set_level(capacity)?;
        }
        Ok(())
    }
}
