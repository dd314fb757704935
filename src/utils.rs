use crate::world::CellState;
use glam::Vec4;

// --- Helper Functions ---

/// Display color of a grid cell.
pub fn cell_color(state: CellState) -> Vec4 {
    match state {
        CellState::Outside => Vec4::new(0.0, 0.0, 0.0, 1.0), // black
        CellState::Open => Vec4::new(1.0, 1.0, 1.0, 1.0),    // white
        CellState::Lit => Vec4::new(0.0, 0.5, 1.0, 1.0),     // blue
        CellState::Occupied => Vec4::new(1.0, 0.39, 0.0, 1.0), // orange
        CellState::Food => Vec4::new(0.1, 0.7, 0.1, 1.0),   // green
    }
}
