// --- File: world.rs ---
use crate::config::LightSpot;
use crate::error::{Result, SimError};
use crate::geometry::{Coordinate, circle_boundary, filled_circle};
use rand::Rng;
use rayon::prelude::*;
use std::collections::HashSet;

/// Per-cell classification handed to the renderer.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CellState {
    /// Dish wall, or anywhere outside the dish.
    Outside = 0,
    Open = 1,
    Lit = 2,
    Occupied = 3,
    Food = 4,
}

/// The dish: geometry, light, food and the population-wide running totals.
///
/// `total_food_credit` and `total_light_exposure` mirror the sums of the
/// live worms' `food` and `time_in_light`; every change to a worm's counter
/// goes through here with the same delta.
#[derive(Debug, Clone)]
pub struct World {
    side_cells: usize,
    cell_size: i32,
    // Row-major: index = row * side_cells + column.
    grid: Vec<CellState>,
    boundary: HashSet<Coordinate>,
    interior: HashSet<Coordinate>,
    // Sorted copy of `interior`, so uniform picks do not depend on hash order.
    interior_cells: Vec<Coordinate>,
    light_zones: HashSet<Coordinate>,
    food_items: HashSet<Coordinate>,
    pub population_count: usize,
    pub total_food_credit: u64,
    pub total_light_exposure: u64,
}

impl World {
    pub fn new(side_length: u32, cell_size: u32) -> Result<Self> {
        if cell_size == 0 || side_length == 0 {
            return Err(SimError::InvalidConfiguration(format!(
                "side_length {} and cell_size {} must both be positive",
                side_length, cell_size
            )));
        }
        if side_length % cell_size != 0 {
            return Err(SimError::InvalidConfiguration(format!(
                "side_length {} is not divisible by cell_size {}",
                side_length, cell_size
            )));
        }
        let boundary = circle_boundary(side_length, cell_size, 0, 0);
        let interior: HashSet<Coordinate> = filled_circle(side_length, cell_size, 0, 0)
            .difference(&boundary)
            .copied()
            .collect();
        let side_cells = (side_length / cell_size) as usize;
        log::info!(
            "Dish built: {}x{} cells, {} wall cells, {} open cells",
            side_cells,
            side_cells,
            boundary.len(),
            interior.len()
        );
        Ok(Self::from_parts(side_cells, cell_size as i32, boundary, interior))
    }

    /// World over hand-made geometry. Interior cells that are also in the
    /// boundary are dropped.
    pub fn from_parts(
        side_cells: usize,
        cell_size: i32,
        boundary: HashSet<Coordinate>,
        interior: HashSet<Coordinate>,
    ) -> Self {
        let interior: HashSet<Coordinate> = interior.difference(&boundary).copied().collect();
        let mut interior_cells: Vec<Coordinate> = interior.iter().copied().collect();
        interior_cells.sort_unstable();
        Self {
            side_cells,
            cell_size,
            grid: vec![CellState::Outside; side_cells * side_cells],
            boundary,
            interior,
            interior_cells,
            light_zones: HashSet::new(),
            food_items: HashSet::new(),
            population_count: 0,
            total_food_credit: 0,
            total_light_exposure: 0,
        }
    }

    #[inline]
    pub fn side_cells(&self) -> usize {
        self.side_cells
    }

    #[inline]
    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    #[inline]
    pub fn grid(&self) -> &[CellState] {
        &self.grid
    }

    pub fn boundary(&self) -> &HashSet<Coordinate> {
        &self.boundary
    }

    pub fn interior(&self) -> &HashSet<Coordinate> {
        &self.interior
    }

    /// Interior in ascending coordinate order.
    pub fn interior_cells(&self) -> &[Coordinate] {
        &self.interior_cells
    }

    pub fn light_zones(&self) -> &HashSet<Coordinate> {
        &self.light_zones
    }

    pub fn food_items(&self) -> &HashSet<Coordinate> {
        &self.food_items
    }

    #[inline]
    pub fn is_wall(&self, position: Coordinate) -> bool {
        self.boundary.contains(&position)
    }

    #[inline]
    pub fn is_interior(&self, position: Coordinate) -> bool {
        self.interior.contains(&position)
    }

    #[inline]
    pub fn is_lit(&self, position: Coordinate) -> bool {
        self.light_zones.contains(&position)
    }

    #[inline]
    pub fn has_food(&self, position: Coordinate) -> bool {
        self.food_items.contains(&position)
    }

    /// Uniform pick from the interior.
    pub fn random_interior<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Coordinate> {
        if self.interior_cells.is_empty() {
            return Err(SimError::InvalidConfiguration(
                "the dish has no interior to place anything in".into(),
            ));
        }
        Ok(self.interior_cells[rng.gen_range(0..self.interior_cells.len())])
    }

    /// Drop `count` food items on uniformly chosen interior cells, with
    /// replacement. A cell holds at most one item, so repeats collapse.
    pub fn scatter_food<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) -> Result<()> {
        for _ in 0..count {
            let spot = self.random_interior(rng)?;
            self.food_items.insert(spot);
        }
        Ok(())
    }

    pub fn place_food(&mut self, position: Coordinate) {
        if self.interior.contains(&position) {
            self.food_items.insert(position);
        }
    }

    /// Remove the food item at `position`, reporting whether there was one.
    pub fn take_food(&mut self, position: Coordinate) -> bool {
        self.food_items.remove(&position)
    }

    /// Replace the light zones with the given spots, clipped to the interior.
    ///
    /// Offsets are expected to be non-negative; see `SimulationConfig::validate`.
    pub fn set_light_spots(&mut self, spots: &[LightSpot]) {
        self.light_zones.clear();
        let cell_size = self.cell_size.max(1) as u32;
        for spot in spots {
            let lit = spot.cells(cell_size);
            self.light_zones
                .extend(lit.into_iter().filter(|c| self.interior.contains(c)));
        }
    }

    pub fn set_light_zones(&mut self, cells: impl IntoIterator<Item = Coordinate>) {
        self.light_zones = cells
            .into_iter()
            .filter(|c| self.interior.contains(c))
            .collect();
    }

    /// Grid index of a scaled coordinate, if it falls on the grid.
    pub fn grid_index(&self, position: Coordinate) -> Option<usize> {
        let step = self.cell_size.max(1);
        let (x, y) = position;
        if x < 0 || y < 0 || x % step != 0 || y % step != 0 {
            return None;
        }
        let (column, row) = ((x / step) as usize, (y / step) as usize);
        if column >= self.side_cells || row >= self.side_cells {
            return None;
        }
        Some(row * self.side_cells + column)
    }

    /// Classification of the cell at `(column, row)`.
    pub fn cell(&self, column: usize, row: usize) -> CellState {
        self.grid[row * self.side_cells + column]
    }

    pub fn mark_occupied(&mut self, position: Coordinate) {
        if let Some(index) = self.grid_index(position) {
            self.grid[index] = CellState::Occupied;
        }
    }

    /// Rebuild every grid cell from the sets: wall, then light, then food,
    /// then open. Occupancy is re-marked by the worms as they move.
    pub fn refresh_grid(&mut self) {
        let Self {
            side_cells,
            cell_size,
            grid,
            boundary,
            interior,
            light_zones,
            food_items,
            ..
        } = self;
        let (side_cells, step) = (*side_cells, (*cell_size).max(1));
        if side_cells == 0 {
            return;
        }
        grid.par_chunks_mut(side_cells)
            .enumerate()
            .for_each(|(row, cells)| {
                let y = row as i32 * step;
                for (column, cell) in cells.iter_mut().enumerate() {
                    let position = (column as i32 * step, y);
                    *cell = if boundary.contains(&position) || !interior.contains(&position) {
                        CellState::Outside
                    } else if light_zones.contains(&position) {
                        CellState::Lit
                    } else if food_items.contains(&position) {
                        CellState::Food
                    } else {
                        CellState::Open
                    };
                }
            });
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    /// Five-cell dish: a 12-cell ring around a 3x3 interior, two lit cells
    /// on the left column and food in the middle.
    pub(crate) fn small_world() -> World {
        let mut world = World::new(5, 1).unwrap();
        world.set_light_zones([(1, 1), (1, 2)]);
        world.place_food((2, 2));
        world.place_food((3, 2));
        world
    }

    #[test]
    fn new_world_splits_boundary_and_interior() {
        let world = World::new(5, 1).unwrap();
        assert_eq!(world.boundary().len(), 12);
        let mut interior = world.interior_cells().to_vec();
        interior.sort_unstable();
        assert_eq!(
            interior,
            vec![(1, 1), (1, 2), (1, 3), (2, 1), (2, 2), (2, 3), (3, 1), (3, 2), (3, 3)]
        );
        assert!(world.light_zones().is_empty());
        assert!(world.food_items().is_empty());
        assert_eq!(world.population_count, 0);
        assert_eq!(world.total_food_credit, 0);
        assert_eq!(world.total_light_exposure, 0);
        assert_eq!(world.grid().len(), 25);
    }

    #[test]
    fn new_world_rejects_bad_sizes() {
        assert!(matches!(World::new(10, 3), Err(SimError::InvalidConfiguration(_))));
        assert!(World::new(10, 0).is_err());
    }

    #[test]
    fn grid_refresh_priorities() {
        let mut world = small_world();
        // Food under light shows as light.
        world.place_food((1, 1));
        world.refresh_grid();
        assert_eq!(world.cell(0, 0), CellState::Outside);
        assert_eq!(world.cell(2, 0), CellState::Outside);
        assert_eq!(world.cell(1, 1), CellState::Lit);
        assert_eq!(world.cell(1, 2), CellState::Lit);
        assert_eq!(world.cell(2, 2), CellState::Food);
        assert_eq!(world.cell(3, 2), CellState::Food);
        assert_eq!(world.cell(3, 3), CellState::Open);

        world.mark_occupied((3, 3));
        assert_eq!(world.cell(3, 3), CellState::Occupied);
        world.refresh_grid();
        assert_eq!(world.cell(3, 3), CellState::Open);
    }

    #[test]
    fn scatter_food_stays_inside() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut world = World::new(30, 1).unwrap();
        world.scatter_food(50, &mut rng).unwrap();
        assert!(!world.food_items().is_empty());
        assert!(world.food_items().len() <= 50);
        assert!(world.food_items().is_subset(world.interior()));
    }

    #[test]
    fn scatter_food_collapses_repeats() {
        let mut rng = StdRng::seed_from_u64(1);
        let boundary = World::new(3, 1).unwrap().boundary().clone();
        let mut world = World::from_parts(3, 1, boundary, HashSet::from([(1, 1)]));
        world.scatter_food(10, &mut rng).unwrap();
        assert_eq!(world.food_items().len(), 1);
    }

    #[test]
    fn light_spots_are_clipped_to_interior() {
        let mut world = World::new(100, 1).unwrap();
        world.set_light_spots(&[LightSpot {
            diameter: 10,
            x_offset: 20,
            y_offset: 20,
        }]);
        assert!(world.is_lit((24, 24)));
        assert!(world.light_zones().is_subset(world.interior()));

        // A spot straddling the wall keeps only its inside part.
        world.set_light_spots(&[LightSpot {
            diameter: 10,
            x_offset: 0,
            y_offset: 45,
        }]);
        assert!(world.is_wall((0, 49)));
        assert!(!world.is_lit((0, 49)));
        assert!(world.is_lit((3, 49)));
        assert!(world.light_zones().is_subset(world.interior()));
    }

    #[test]
    fn grid_index_respects_cell_size() {
        let world = World::new(50, 10).unwrap();
        assert_eq!(world.side_cells(), 5);
        assert_eq!(world.grid_index((20, 10)), Some(7));
        assert_eq!(world.grid_index((25, 10)), None);
        assert_eq!(world.grid_index((-10, 0)), None);
        assert_eq!(world.grid_index((50, 0)), None);
    }
}
