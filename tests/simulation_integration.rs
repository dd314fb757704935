use phototaxis::config::SimulationConfig;
use phototaxis::constants::FOOD_CREDIT_PER_ITEM;
use phototaxis::genome::{BehaviorState, Genome, MatrixKind, TransitionMatrix};
use phototaxis::simulation::SimulationState;
use phototaxis::world::CellState;
use phototaxis::worm::{Direction, Worm};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn seeded_state(population: usize, seed: u64) -> SimulationState {
    let config = SimulationConfig::new(100, 1, population).with_seed(seed);
    SimulationState::new(config).unwrap()
}

fn assert_totals_match(state: &SimulationState) {
    let light: u64 = state.worms.iter().map(|w| w.time_in_light).sum();
    let food: u64 = state.worms.iter().map(|w| w.food).sum();
    assert_eq!(state.world.total_light_exposure, light);
    assert_eq!(state.world.total_food_credit, food);
    assert_eq!(state.world.population_count, state.worms.len());
}

/// Empty the dish of its random starting worms.
fn clear_population(state: &mut SimulationState) {
    let all: Vec<usize> = (0..state.worms.len()).collect();
    state.remove_worms(all).unwrap();
}

#[test]
fn totals_track_worms_across_full_ticks() {
    let mut state = seeded_state(200, 42);
    state.config.food_per_tick = 60;
    state.config.breeding_chance = 0.3;
    let mut births = 0;
    let mut deaths = 0;
    for _ in 0..150 {
        let before = state.worms.len();
        let report = state.update().unwrap();
        births += report.births;
        deaths += report.deaths;
        assert!(report.deaths <= before + report.births);
        assert_eq!(state.worms.len(), before + report.births - report.deaths);
        assert_totals_match(&state);
    }
    // Both sides of the population bookkeeping got exercised.
    assert!(births > 0);
    assert!(deaths > 0);
}

#[test]
fn totals_track_worms_without_births_or_deaths() {
    let mut state = seeded_state(120, 7);
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..100 {
        state.world.scatter_food(20, &mut rng).unwrap();
        state.world.refresh_grid();
        state.step_population().unwrap();
        assert_eq!(state.worms.len(), 120);
        assert_totals_match(&state);
    }
}

#[test]
fn culling_removes_exactly_the_requested_count() {
    let mut state = seeded_state(80, 3);
    for _ in 0..10 {
        state.update().unwrap();
    }
    let before = state.world.population_count;
    let removed = state.cull(before / 2).unwrap();
    assert_eq!(removed, before / 2);
    assert_eq!(state.world.population_count, before - removed);
    assert_totals_match(&state);
}

#[test]
fn child_genome_is_a_mosaic_of_its_parents() {
    let base = TransitionMatrix::always(BehaviorState::Stop);
    let tweaked = base
        .clone()
        .with_entry(BehaviorState::Forward, BehaviorState::Stop, 0.25)
        .with_entry(BehaviorState::Forward, BehaviorState::Reverse, 0.75);
    let mother_genome = Genome::uniform(base.clone());
    let father_genome = Genome::new(base.clone(), tweaked, base.clone(), base);

    let breed_with_seed = |seed: u64| {
        let mut state = seeded_state(1, seed);
        clear_population(&mut state);
        let mut rng = StdRng::seed_from_u64(seed);
        let mother = Worm::place(
            &mut state.world,
            (50, 50),
            Direction::Up,
            BehaviorState::Stop,
            mother_genome.clone(),
        );
        let father = Worm::place(
            &mut state.world,
            (60, 60),
            Direction::Up,
            BehaviorState::Stop,
            father_genome.clone(),
        );
        mother.breed(&father, &mut state.world, &mut rng).unwrap()
    };

    let mut inherited = [false, false];
    for seed in 0..32 {
        let child = breed_with_seed(seed);
        let light = child.genome.matrix(MatrixKind::Light);
        let pair = (
            light.get(BehaviorState::Forward, BehaviorState::Stop),
            light.get(BehaviorState::Forward, BehaviorState::Reverse),
        );
        // Each cell comes whole from one parent.
        assert!(pair.0 == 1.0 || pair.0 == 0.25);
        assert!(pair.1 == 0.0 || pair.1 == 0.75);
        if pair.0 == 0.25 {
            inherited[1] = true;
        } else {
            inherited[0] = true;
        }
        assert_eq!(child.genome, breed_with_seed(seed).genome);

        for kind in [MatrixKind::Dark, MatrixKind::DarkWall, MatrixKind::LightWall] {
            assert_eq!(child.genome.matrix(kind), mother_genome.matrix(kind));
        }
    }
    assert_eq!(inherited, [true, true]);
}

#[test]
fn forward_into_wall_retries_then_stays_put() {
    let mut state = seeded_state(1, 11);
    clear_population(&mut state);
    state.world.refresh_grid();
    let mut rng = StdRng::seed_from_u64(11);

    // Walk straight up until the wall stops us.
    let mut worm = Worm::place(
        &mut state.world,
        (50, 50),
        Direction::Up,
        BehaviorState::Forward,
        Genome::uniform(TransitionMatrix::always(BehaviorState::Forward)),
    );
    let mut last = worm.position;
    for _ in 0..200 {
        worm.move_once(&mut state.world, &mut rng).unwrap();
        if worm.position == last {
            break;
        }
        last = worm.position;
    }
    assert!(state.world.is_interior(worm.position));
    assert!(state.world.is_wall((worm.position.0, worm.position.1 - 1)));
    assert_eq!(worm.state, BehaviorState::Forward);
    assert_eq!(
        state.world.cell(worm.position.0 as usize, worm.position.1 as usize),
        CellState::Occupied
    );
}

#[test]
fn younger_worm_eats_shared_food_first() {
    let mut state = seeded_state(1, 5);
    clear_population(&mut state);
    let stop = Genome::uniform(TransitionMatrix::always(BehaviorState::Stop));
    let mut elder = Worm::place(
        &mut state.world,
        (50, 50),
        Direction::Up,
        BehaviorState::Stop,
        stop.clone(),
    );
    elder.age = 9;
    let youngster = Worm::place(
        &mut state.world,
        (50, 50),
        Direction::Up,
        BehaviorState::Stop,
        stop,
    );
    state.worms.push(elder);
    state.worms.push(youngster);
    state.world.place_food((50, 50));

    state.step_population().unwrap();
    assert_eq!(state.worms[0].age, 1);
    assert_eq!(state.worms[0].food, FOOD_CREDIT_PER_ITEM - 1);
    assert_eq!(state.worms[1].age, 10);
    assert_eq!(state.worms[1].food, 0);
    assert!(!state.world.has_food((50, 50)));
    assert_totals_match(&state);
}

#[test]
fn grid_reflects_dish_and_worms_after_a_tick() {
    let mut state = seeded_state(60, 21);
    state.update().unwrap();
    let world = &state.world;
    for &(x, y) in world.boundary() {
        assert_eq!(world.cell(x as usize, y as usize), CellState::Outside);
    }
    assert_eq!(world.cell(0, 0), CellState::Outside);
    for worm in &state.worms {
        let (x, y) = worm.position;
        assert_eq!(world.cell(x as usize, y as usize), CellState::Occupied);
    }
    let lit = world
        .grid()
        .iter()
        .filter(|&&c| c == CellState::Lit)
        .count();
    assert!(lit <= world.light_zones().len());
    assert!(!world.light_zones().is_empty());
}

#[test]
fn coarse_cells_keep_worms_on_the_grid() {
    let config = SimulationConfig::new(100, 5, 40).with_seed(8);
    let mut state = SimulationState::new(config).unwrap();
    for _ in 0..30 {
        state.update().unwrap();
        for worm in &state.worms {
            let (x, y) = worm.position;
            assert_eq!(x % 5, 0);
            assert_eq!(y % 5, 0);
            assert!(state.world.is_interior(worm.position));
        }
        assert_totals_match(&state);
    }
}

#[test]
fn light_stays_in_the_dish_at_coarse_cell_sizes() {
    for cell_size in [5, 10] {
        let config = SimulationConfig::new(100, cell_size, 10).with_seed(2);
        let mut state = SimulationState::new(config).unwrap();
        state.update().unwrap();
        let world = &state.world;
        assert!(!world.light_zones().is_empty(), "cell_size {}", cell_size);
        assert!(world.light_zones().is_subset(world.interior()));
        for &(x, y) in world.light_zones() {
            assert_eq!(x % cell_size as i32, 0);
            assert_eq!(y % cell_size as i32, 0);
        }
    }
}
