pub mod config;
pub mod constants;
pub mod error;
pub mod genome;
pub mod geometry;
pub mod renderer;
pub mod sampling;
pub mod simulation;
pub mod utils;
pub mod world;
pub mod worm;
