// --- File: worm.rs ---
use crate::constants::FOOD_CREDIT_PER_ITEM;
use crate::error::Result;
use crate::genome::{BehaviorState, Genome, MatrixKind};
use crate::geometry::Coordinate;
use crate::world::World;
use rand::Rng;

/// Facing. Screen coordinates: up is -y.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Quarter-turn counter-clockwise.
    pub fn turned_left(self) -> Self {
        match self {
            Direction::Up => Direction::Left,
            Direction::Right => Direction::Up,
            Direction::Down => Direction::Right,
            Direction::Left => Direction::Down,
        }
    }

    /// Quarter-turn clockwise.
    pub fn turned_right(self) -> Self {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }

    /// Unit offset of one step forward.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Worm {
    pub position: Coordinate,
    pub direction: Direction,
    pub state: BehaviorState,
    pub age: u64,
    pub food: u64,
    pub time_in_light: u64,
    pub genome: Genome,
}

impl Worm {
    /// A new worm at a random interior cell with random facing and state.
    ///
    /// Registers itself with the world's population count and light total
    /// right away.
    pub fn spawn<R: Rng + ?Sized>(world: &mut World, genome: Genome, rng: &mut R) -> Result<Self> {
        let position = world.random_interior(rng)?;
        let direction = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
        let state = BehaviorState::ALL[rng.gen_range(0..BehaviorState::ALL.len())];
        Ok(Self::place(world, position, direction, state, genome))
    }

    /// A new worm at a chosen spot, registered like [`Worm::spawn`].
    pub fn place(
        world: &mut World,
        position: Coordinate,
        direction: Direction,
        state: BehaviorState,
        genome: Genome,
    ) -> Self {
        world.population_count += 1;
        world.total_light_exposure += 1;
        Self {
            position,
            direction,
            state,
            age: 0,
            food: 0,
            time_in_light: 1,
            genome,
        }
    }

    /// One tick: suntan, eating, ageing, digestion, then a move.
    pub fn step<R: Rng + ?Sized>(&mut self, world: &mut World, rng: &mut R) -> Result<()> {
        if world.is_lit(self.position) {
            self.time_in_light += 1;
            world.total_light_exposure += 1;
        } else if self.time_in_light > 1 {
            self.time_in_light -= 1;
            world.total_light_exposure -= 1;
        }

        if world.take_food(self.position) {
            self.food += FOOD_CREDIT_PER_ITEM;
            world.total_food_credit += FOOD_CREDIT_PER_ITEM;
        }

        self.age += 1;

        if self.food > 0 {
            self.food -= 1;
            world.total_food_credit -= 1;
        }

        self.move_once(world, rng)?;
        Ok(())
    }

    /// Pick and perform an action from the genome.
    ///
    /// A translation into the wall is retried once with the wall tables. If
    /// the retry also hits the wall the worm stays put, but still takes on
    /// the retried action as its state. Returns the action taken.
    pub fn move_once<R: Rng + ?Sized>(
        &mut self,
        world: &mut World,
        rng: &mut R,
    ) -> Result<BehaviorState> {
        let mut wall = false;
        let mut action = self.state;
        for attempt in 0..2 {
            let kind = MatrixKind::select(world.is_lit(self.position), wall);
            action = self.genome.matrix(kind).next_state(self.state, rng)?;
            wall = match action {
                BehaviorState::Forward => self.move_forward(world),
                BehaviorState::Reverse => self.move_backward(world),
                BehaviorState::TurnLeft => {
                    self.direction = self.direction.turned_left();
                    false
                }
                BehaviorState::TurnRight => {
                    self.direction = self.direction.turned_right();
                    false
                }
                BehaviorState::Stop => false,
            };
            if !wall {
                break;
            }
            if attempt == 0 {
                log::trace!("worm at {:?} bumped the wall, retrying", self.position);
            }
        }
        self.state = action;
        world.mark_occupied(self.position);
        Ok(action)
    }

    /// Step one cell ahead. Returns `true` (and stays put) on a wall.
    pub fn move_forward(&mut self, world: &World) -> bool {
        let (dx, dy) = self.direction.delta();
        self.try_step(world, dx, dy)
    }

    /// Step one cell back. Returns `true` (and stays put) on a wall.
    pub fn move_backward(&mut self, world: &World) -> bool {
        let (dx, dy) = self.direction.delta();
        self.try_step(world, -dx, -dy)
    }

    fn try_step(&mut self, world: &World, dx: i32, dy: i32) -> bool {
        let stride = world.cell_size();
        let target = (self.position.0 + dx * stride, self.position.1 + dy * stride);
        if world.is_wall(target) {
            return true;
        }
        self.position = target;
        false
    }

    /// The 3x3 block around the worm, itself included, limited to the interior.
    pub fn adjacent_spaces(&self, world: &World) -> Vec<Coordinate> {
        let stride = world.cell_size();
        let mut spaces = Vec::with_capacity(9);
        for dx in -1..=1 {
            for dy in -1..=1 {
                let spot = (self.position.0 + dx * stride, self.position.1 + dy * stride);
                if world.is_interior(spot) {
                    spaces.push(spot);
                }
            }
        }
        spaces
    }

    /// Offspring of `self` and `mate`: a mosaic genome, placed next to `self`.
    pub fn breed<R: Rng + ?Sized>(
        &self,
        mate: &Worm,
        world: &mut World,
        rng: &mut R,
    ) -> Result<Worm> {
        let genome = Genome::crossover(&self.genome, &mate.genome, rng);
        let mut child = Worm::spawn(world, genome, rng)?;
        let spaces = self.adjacent_spaces(world);
        child.position = if spaces.is_empty() {
            self.position
        } else {
            spaces[rng.gen_range(0..spaces.len())]
        };
        world.mark_occupied(child.position);
        Ok(child)
    }
}
