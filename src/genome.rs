// --- File: genome.rs ---
use crate::constants::{TRANSITION_WEIGHT_MAX, TRANSITION_WEIGHT_MIN};
use crate::error::Result;
use crate::sampling::weighted_sample;
use rand::Rng;

pub const STATE_COUNT: usize = 5;

/// What a worm did on its last move; also the row key of every matrix.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BehaviorState {
    Forward,
    Reverse,
    TurnLeft,
    TurnRight,
    Stop,
}

impl BehaviorState {
    pub const ALL: [BehaviorState; STATE_COUNT] = [
        BehaviorState::Forward,
        BehaviorState::Reverse,
        BehaviorState::TurnLeft,
        BehaviorState::TurnRight,
        BehaviorState::Stop,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Row-stochastic table: `rows[from][to]` is the chance of `to` following `from`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionMatrix {
    rows: [[f64; STATE_COUNT]; STATE_COUNT],
}

impl TransitionMatrix {
    pub fn from_rows(rows: [[f64; STATE_COUNT]; STATE_COUNT]) -> Self {
        Self { rows }
    }

    /// Every row puts all of its mass on `action`.
    pub fn always(action: BehaviorState) -> Self {
        let mut row = [0.0; STATE_COUNT];
        row[action.index()] = 1.0;
        Self {
            rows: [row; STATE_COUNT],
        }
    }

    #[inline]
    pub fn get(&self, from: BehaviorState, to: BehaviorState) -> f64 {
        self.rows[from.index()][to.index()]
    }

    #[inline]
    pub fn row(&self, from: BehaviorState) -> &[f64; STATE_COUNT] {
        &self.rows[from.index()]
    }

    pub fn with_entry(mut self, from: BehaviorState, to: BehaviorState, value: f64) -> Self {
        self.rows[from.index()][to.index()] = value;
        self
    }

    /// One weighted draw of the state that follows `from`.
    pub fn next_state<R: Rng + ?Sized>(
        &self,
        from: BehaviorState,
        rng: &mut R,
    ) -> Result<BehaviorState> {
        let picked = weighted_sample(rng, &BehaviorState::ALL, self.row(from), 1, true)?;
        Ok(picked[0])
    }
}

/// Random row-stochastic matrix over [`BehaviorState::ALL`].
///
/// Each entry starts as an integer in `[1, 100]` and every row is divided
/// by its sum. Draws run row by row, column by column, in state order.
pub fn random_transition_matrix<R: Rng + ?Sized>(rng: &mut R) -> TransitionMatrix {
    let mut rows = [[0.0; STATE_COUNT]; STATE_COUNT];
    for row in rows.iter_mut() {
        let mut sum = 0u32;
        for entry in row.iter_mut() {
            let weight = rng.gen_range(TRANSITION_WEIGHT_MIN..=TRANSITION_WEIGHT_MAX);
            sum += weight;
            *entry = f64::from(weight);
        }
        for entry in row.iter_mut() {
            *entry /= f64::from(sum);
        }
    }
    TransitionMatrix::from_rows(rows)
}

/// Which of the four tables a move consults.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MatrixKind {
    Dark,
    Light,
    DarkWall,
    LightWall,
}

impl MatrixKind {
    pub const ALL: [MatrixKind; 4] = [
        MatrixKind::Dark,
        MatrixKind::Light,
        MatrixKind::DarkWall,
        MatrixKind::LightWall,
    ];

    pub fn select(in_light: bool, after_wall: bool) -> Self {
        match (in_light, after_wall) {
            (false, false) => MatrixKind::Dark,
            (true, false) => MatrixKind::Light,
            (false, true) => MatrixKind::DarkWall,
            (true, true) => MatrixKind::LightWall,
        }
    }
}

/// The four behavior tables of one worm. Never changed once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Genome {
    dark: TransitionMatrix,
    light: TransitionMatrix,
    dark_wall: TransitionMatrix,
    light_wall: TransitionMatrix,
}

impl Genome {
    pub fn new(
        dark: TransitionMatrix,
        light: TransitionMatrix,
        dark_wall: TransitionMatrix,
        light_wall: TransitionMatrix,
    ) -> Self {
        Self {
            dark,
            light,
            dark_wall,
            light_wall,
        }
    }

    /// Four independently randomized tables.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let dark = random_transition_matrix(rng);
        let light = random_transition_matrix(rng);
        let dark_wall = random_transition_matrix(rng);
        let light_wall = random_transition_matrix(rng);
        Self::new(dark, light, dark_wall, light_wall)
    }

    /// Same table everywhere; mostly useful for scripted scenarios.
    pub fn uniform(matrix: TransitionMatrix) -> Self {
        Self::new(matrix.clone(), matrix.clone(), matrix.clone(), matrix)
    }

    pub fn matrix(&self, kind: MatrixKind) -> &TransitionMatrix {
        match kind {
            MatrixKind::Dark => &self.dark,
            MatrixKind::Light => &self.light,
            MatrixKind::DarkWall => &self.dark_wall,
            MatrixKind::LightWall => &self.light_wall,
        }
    }

    /// Mosaic offspring: every cell of every table comes whole from one
    /// parent, chosen by a fair coin per cell.
    pub fn crossover<R: Rng + ?Sized>(a: &Genome, b: &Genome, rng: &mut R) -> Genome {
        let mut child = a.clone();
        for kind in MatrixKind::ALL {
            let other = b.matrix(kind);
            let target = match kind {
                MatrixKind::Dark => &mut child.dark,
                MatrixKind::Light => &mut child.light,
                MatrixKind::DarkWall => &mut child.dark_wall,
                MatrixKind::LightWall => &mut child.light_wall,
            };
            for (row, other_row) in target.rows.iter_mut().zip(other.rows.iter()) {
                for (cell, other_cell) in row.iter_mut().zip(other_row.iter()) {
                    if rng.gen_bool(0.5) {
                        *cell = *other_cell;
                    }
                }
            }
        }
        child
    }
}
