// --- Global Simulation Constants ---
pub const BACKGROUND_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};
pub const WINDOW_WIDTH: u32 = 1000;
pub const WINDOW_HEIGHT: u32 = 1000;

// Startup defaults. Side length must be a multiple of the cell size.
pub const DEFAULT_SIDE_LENGTH: u32 = 100;
pub const DEFAULT_CELL_SIZE: u32 = 1;
pub const DEFAULT_POPULATION: usize = 1000;
pub const DEFAULT_FOOD_PER_TICK: usize = 5;
pub const DEFAULT_BREEDING_CHANCE: f64 = 0.05;
pub const DEFAULT_TICKS_PER_SECOND: f64 = 30.0;

// Light spot placed inside the dish at startup.
pub const DEFAULT_LIGHT_DIAMETER: u32 = 10;
pub const DEFAULT_LIGHT_OFFSET: (i32, i32) = (20, 20);

/// Credit a worm receives for eating one food item.
pub const FOOD_CREDIT_PER_ITEM: u64 = 10;
/// Inclusive range of the raw integer weights in a fresh transition row.
pub const TRANSITION_WEIGHT_MIN: u32 = 1;
pub const TRANSITION_WEIGHT_MAX: u32 = 100;

// Above this mean the Poisson draw switches to a normal approximation.
pub const POISSON_NORMAL_THRESHOLD: f64 = 30.0;

pub const STATUS_LOG_INTERVAL_SECS: f64 = 4.0;
