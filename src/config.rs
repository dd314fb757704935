// --- File: config.rs ---
use crate::constants::*;
use crate::error::{Result, SimError};
use crate::geometry::{Coordinate, circle_boundary, filled_circle};
use std::collections::HashSet;

/// A disc of light, rasterized the same way as the dish and clipped to it.
///
/// All three fields are in the same length units as `side_length`; the
/// offsets are truncated to whole cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightSpot {
    /// Span of the spot's bounding box.
    pub diameter: u32,
    /// Top-left corner of the spot's bounding box.
    pub x_offset: i32,
    pub y_offset: i32,
}

impl LightSpot {
    /// Every scaled coordinate the spot covers, before clipping to a dish.
    pub fn cells(&self, cell_size: u32) -> HashSet<Coordinate> {
        let step = cell_size.max(1);
        let cell_offset = |offset: i32| offset / step as i32;
        filled_circle(
            self.diameter,
            step,
            cell_offset(self.x_offset),
            cell_offset(self.y_offset),
        )
    }
}

impl Default for LightSpot {
    fn default() -> Self {
        Self {
            diameter: DEFAULT_LIGHT_DIAMETER,
            x_offset: DEFAULT_LIGHT_OFFSET.0,
            y_offset: DEFAULT_LIGHT_OFFSET.1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub side_length: u32,
    pub cell_size: u32,
    pub initial_population: usize,
    pub food_per_tick: usize,
    // Base chance a fed worm with average suntan breeds in a tick.
    pub breeding_chance: f64,
    pub light_spots: Vec<LightSpot>,
    // None seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            side_length: DEFAULT_SIDE_LENGTH,
            cell_size: DEFAULT_CELL_SIZE,
            initial_population: DEFAULT_POPULATION,
            food_per_tick: DEFAULT_FOOD_PER_TICK,
            breeding_chance: DEFAULT_BREEDING_CHANCE,
            light_spots: vec![LightSpot::default()],
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn new(side_length: u32, cell_size: u32, initial_population: usize) -> Self {
        Self {
            side_length,
            cell_size,
            initial_population,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.cell_size == 0 {
            return Err(SimError::InvalidConfiguration(
                "cell_size must be greater than zero".into(),
            ));
        }
        if self.side_length == 0 {
            return Err(SimError::InvalidConfiguration(
                "side_length must be greater than zero".into(),
            ));
        }
        if self.side_length % self.cell_size != 0 {
            return Err(SimError::InvalidConfiguration(format!(
                "side_length {} is not divisible by cell_size {}",
                self.side_length, self.cell_size
            )));
        }
        if self.initial_population == 0 {
            return Err(SimError::InvalidConfiguration(
                "initial_population must be at least 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.breeding_chance) {
            return Err(SimError::InvalidConfiguration(format!(
                "breeding_chance {} is outside [0, 1]",
                self.breeding_chance
            )));
        }
        if let Some(spot) = self
            .light_spots
            .iter()
            .find(|s| s.x_offset < 0 || s.y_offset < 0)
        {
            return Err(SimError::InvalidConfiguration(format!(
                "light spot offset ({}, {}) must not be negative",
                spot.x_offset, spot.y_offset
            )));
        }
        if let Some(spot) = self.light_spots.iter().find(|s| s.diameter < self.cell_size) {
            return Err(SimError::InvalidConfiguration(format!(
                "light spot diameter {} is smaller than one cell ({})",
                spot.diameter, self.cell_size
            )));
        }
        if !self.light_spots.is_empty() {
            let boundary = circle_boundary(self.side_length, self.cell_size, 0, 0);
            let dish = filled_circle(self.side_length, self.cell_size, 0, 0);
            for spot in &self.light_spots {
                let lit_inside = spot
                    .cells(self.cell_size)
                    .iter()
                    .any(|c| dish.contains(c) && !boundary.contains(c));
                if !lit_inside {
                    return Err(SimError::InvalidConfiguration(format!(
                        "light spot at ({}, {}) with diameter {} lights no cell inside the dish",
                        spot.x_offset, spot.y_offset, spot.diameter
                    )));
                }
            }
        }
        Ok(())
    }
}
