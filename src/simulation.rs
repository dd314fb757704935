// --- File: simulation.rs ---
use crate::config::SimulationConfig;
use crate::error::{Result, SimError};
use crate::genome::Genome;
use crate::sampling::{poisson, weighted_sample_indices};
use crate::world::World;
use crate::worm::Worm;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub type SimRng = StdRng;

/// What happened during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    pub births: usize,
    pub deaths: usize,
    pub capacity: u64,
}

/// Population-wide counters for the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub population: usize,
    pub total_food_credit: u64,
    pub total_light_exposure: u64,
    pub food_items: usize,
}

pub struct SimulationState {
    pub world: World,
    pub worms: Vec<Worm>,
    pub config: SimulationConfig,
    rng: SimRng,
    tick: u64,
    // Reused between ticks
    new_worm_buffer: Vec<Worm>,
    removal_indices_buffer: Vec<usize>,
}

impl SimulationState {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => SimRng::seed_from_u64(seed),
            None => SimRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    pub fn with_rng(config: SimulationConfig, rng: SimRng) -> Result<Self> {
        config.validate()?;
        let world = World::new(config.side_length, config.cell_size)?;
        let mut state = Self {
            world,
            worms: Vec::with_capacity(config.initial_population * 2),
            config,
            rng,
            tick: 0,
            new_worm_buffer: Vec::new(),
            removal_indices_buffer: Vec::new(),
        };
        state.initialize_worms()?;
        Ok(state)
    }

    fn initialize_worms(&mut self) -> Result<()> {
        for _ in 0..self.config.initial_population {
            let genome = Genome::random(&mut self.rng);
            let worm = Worm::spawn(&mut self.world, genome, &mut self.rng)?;
            self.worms.push(worm);
        }
        log::info!(
            "Spawned {} worms in a {}x{} dish",
            self.worms.len(),
            self.world.side_cells(),
            self.world.side_cells()
        );
        Ok(())
    }

    #[inline]
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn stats(&self) -> Stats {
        Stats {
            population: self.world.population_count,
            total_food_credit: self.world.total_food_credit,
            total_light_exposure: self.world.total_light_exposure,
            food_items: self.world.food_items().len(),
        }
    }

    /// Advance the whole population by one tick.
    pub fn update(&mut self) -> Result<TickReport> {
        self.tick += 1;

        self.refresh_environment()?;
        self.step_population()?;

        let births = self.breed()?;

        let capacity = poisson(&mut self.rng, self.config.initial_population as f64);
        let excess = self.worms.len().saturating_sub(capacity as usize);
        let deaths = self.cull(excess)?;

        let report = TickReport {
            tick: self.tick,
            births,
            deaths,
            capacity,
        };
        log::debug!("{:?}", report);
        Ok(report)
    }

    /// Re-apply the light spots, drop this tick's food and rebuild the grid.
    fn refresh_environment(&mut self) -> Result<()> {
        self.world.set_light_spots(&self.config.light_spots);
        self.world
            .scatter_food(self.config.food_per_tick, &mut self.rng)?;
        self.world.refresh_grid();
        Ok(())
    }

    /// Every worm takes its step, youngest first. Later worms see the food
    /// and occupancy left behind by earlier ones.
    pub fn step_population(&mut self) -> Result<()> {
        // Stable, so equal ages keep their order.
        self.worms.sort_by_key(|worm| worm.age);
        for worm in self.worms.iter_mut() {
            worm.step(&mut self.world, &mut self.rng)?;
        }
        Ok(())
    }

    /// Fed worms breed with a chance scaled by their suntan relative to the
    /// population average; mates are drawn weighted by suntan. Offspring
    /// join once every worm has had its turn. Returns the number born.
    pub fn breed(&mut self) -> Result<usize> {
        self.new_worm_buffer.clear();
        let count = self.worms.len();
        if count < 2 || self.world.population_count == 0 || self.config.breeding_chance <= 0.0 {
            return Ok(0);
        }
        let mean_exposure =
            self.world.total_light_exposure as f64 / self.world.population_count as f64;

        for i in 0..count {
            let worm = &self.worms[i];
            if worm.food == 0 {
                continue;
            }
            let chance = (self.config.breeding_chance * worm.time_in_light as f64
                / mean_exposure.max(1.0))
            .clamp(0.0, 1.0);
            if !self.rng.gen_bool(chance) {
                continue;
            }

            let candidates: Vec<usize> = (0..count).filter(|&j| j != i).collect();
            let weights: Vec<f64> = candidates
                .iter()
                .map(|&j| self.worms[j].time_in_light as f64)
                .collect();
            let pick = weighted_sample_indices(&mut self.rng, &weights, 1, true)?;
            let mate = &self.worms[candidates[pick[0]]];

            let child = worm.breed(mate, &mut self.world, &mut self.rng)?;
            self.new_worm_buffer.push(child);
        }

        let births = self.new_worm_buffer.len();
        self.worms.append(&mut self.new_worm_buffer);
        Ok(births)
    }

    /// Remove `count` worms (capped at the population), weighted toward the
    /// old and the hungry. Returns the number removed.
    pub fn cull(&mut self, count: usize) -> Result<usize> {
        let count = count.min(self.worms.len());
        if count == 0 {
            return Ok(0);
        }
        let weights: Vec<f64> = self
            .worms
            .iter()
            .map(|worm| (worm.age + 1) as f64 / (worm.food + 1) as f64)
            .collect();
        let victims = weighted_sample_indices(&mut self.rng, &weights, count, false)?;
        self.remove_worms(victims)
    }

    /// Remove the worms at `indices` and take their counters off the totals.
    pub fn remove_worms(&mut self, indices: Vec<usize>) -> Result<usize> {
        self.removal_indices_buffer = indices;
        // Sort descending so swap_remove never moves a pending index.
        self.removal_indices_buffer.sort_unstable_by(|a, b| b.cmp(a));
        self.removal_indices_buffer.dedup();

        let mut removed = 0;
        for &index in &self.removal_indices_buffer {
            if index >= self.worms.len() {
                return Err(SimError::InvalidArgument(format!(
                    "no worm at index {} (population {})",
                    index,
                    self.worms.len()
                )));
            }
            let worm = self.worms.swap_remove(index);
            self.world.population_count -= 1;
            self.world.total_food_credit -= worm.food;
            self.world.total_light_exposure -= worm.time_in_light;
            removed += 1;
        }
        self.removal_indices_buffer.clear();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config(population: usize) -> SimulationConfig {
        let mut config = SimulationConfig::new(40, 1, population).with_seed(17);
        config.light_spots[0].x_offset = 10;
        config.light_spots[0].y_offset = 10;
        config
    }

    #[test]
    fn new_rejects_invalid_config() {
        let config = SimulationConfig::new(40, 3, 10);
        assert!(matches!(
            SimulationState::new(config),
            Err(SimError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn new_registers_every_worm() {
        let state = SimulationState::new(small_config(25)).unwrap();
        assert_eq!(state.worms.len(), 25);
        let stats = state.stats();
        assert_eq!(stats.population, 25);
        assert_eq!(stats.total_light_exposure, 25);
        assert_eq!(stats.total_food_credit, 0);
    }

    #[test]
    fn same_seed_same_history() {
        let mut a = SimulationState::new(small_config(30)).unwrap();
        let mut b = SimulationState::new(small_config(30)).unwrap();
        for _ in 0..20 {
            assert_eq!(a.update().unwrap(), b.update().unwrap());
        }
        let positions_a: Vec<_> = a.worms.iter().map(|w| w.position).collect();
        let positions_b: Vec<_> = b.worms.iter().map(|w| w.position).collect();
        assert_eq!(positions_a, positions_b);
        assert_eq!(a.stats(), b.stats());
    }

    #[test]
    fn worms_act_youngest_first() {
        let mut state = SimulationState::new(small_config(5)).unwrap();
        for (age, worm) in [4, 0, 3, 1, 2].into_iter().zip(state.worms.iter_mut()) {
            worm.age = age;
        }
        state.step_population().unwrap();
        let ages: Vec<u64> = state.worms.iter().map(|w| w.age).collect();
        assert_eq!(ages, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn cull_never_exceeds_population() {
        let mut state = SimulationState::new(small_config(10)).unwrap();
        let removed = state.cull(50).unwrap();
        assert_eq!(removed, 10);
        assert!(state.worms.is_empty());
        assert_eq!(state.world.population_count, 0);
        assert_eq!(state.world.total_light_exposure, 0);
        assert_eq!(state.world.total_food_credit, 0);
    }

    #[test]
    fn remove_rejects_unknown_index() {
        let mut state = SimulationState::new(small_config(3)).unwrap();
        assert!(state.remove_worms(vec![7]).is_err());
    }

    #[test]
    fn breeding_needs_food() {
        let mut state = SimulationState::new(small_config(10)).unwrap();
        state.config.breeding_chance = 1.0;
        assert_eq!(state.breed().unwrap(), 0);

        state.worms[0].food = 5;
        state.world.total_food_credit += 5;
        let births = state.breed().unwrap();
        assert_eq!(births, 1);
        assert_eq!(state.worms.len(), 11);
        assert_eq!(state.world.population_count, 11);
    }
}
