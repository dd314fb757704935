// --- File: geometry.rs ---
// Circle rasterization and flood fill on the integer grid.
use std::collections::HashSet;

/// Grid coordinate in scaled units (multiples of the cell size).
pub type Coordinate = (i32, i32);

/// Midpoint-circle rasterization in unscaled cell space, offsets applied.
///
/// Returns the de-duplicated ring together with the truncated centre, which
/// is where a fill of the ring has to start.
fn rasterize_cells(
    side_length: u32,
    cell_size: u32,
    x_offset: i32,
    y_offset: i32,
) -> (HashSet<Coordinate>, Coordinate) {
    let cells_per_side = f64::from(side_length / cell_size.max(1)) - 1.0;
    let radius = cells_per_side / 2.0;

    let mut f = 1.0 - radius;
    let mut ddf_x = 1.0;
    let mut ddf_y = -2.0 * radius;
    let mut x = 0.0;
    let mut y = radius;

    let mut raw: Vec<(f64, f64)> = vec![
        (radius, radius * 2.0),
        (radius, 0.0),
        (radius * 2.0, radius),
        (0.0, radius),
    ];
    while x < y {
        if f >= 0.0 {
            y -= 1.0;
            ddf_y += 2.0;
            f += ddf_y;
        }
        x += 1.0;
        ddf_x += 2.0;
        f += ddf_x;
        raw.extend_from_slice(&[
            (radius + x, radius + y),
            (radius - x, radius + y),
            (radius + x, radius - y),
            (radius - x, radius - y),
            (radius + y, radius + x),
            (radius - y, radius + x),
            (radius + y, radius - x),
            (radius - y, radius - x),
        ]);
    }

    let (dx, dy) = (f64::from(x_offset), f64::from(y_offset));
    // `as i32` truncates toward zero, matching the grid's integer indexing.
    let ring = raw
        .into_iter()
        .map(|(px, py)| ((px + dx) as i32, (py + dy) as i32))
        .collect();
    let centre = ((radius + dx) as i32, (radius + dy) as i32);
    (ring, centre)
}

fn scale(cells: HashSet<Coordinate>, cell_size: u32) -> HashSet<Coordinate> {
    let cell_size = cell_size as i32;
    cells
        .into_iter()
        .map(|(x, y)| (x * cell_size, y * cell_size))
        .collect()
}

/// The closed ring of a circle inscribed in a `side_length` square.
///
/// `cells_per_side = side_length / cell_size - 1`, the radius is half of
/// that, and every emitted point becomes
/// `(trunc(raw_x + x_offset) * cell_size, trunc(raw_y + y_offset) * cell_size)`.
pub fn circle_boundary(
    side_length: u32,
    cell_size: u32,
    x_offset: i32,
    y_offset: i32,
) -> HashSet<Coordinate> {
    let (ring, _) = rasterize_cells(side_length, cell_size, x_offset, y_offset);
    scale(ring, cell_size)
}

/// The ring of [`circle_boundary`] plus everything it encloses.
///
/// This is boundary ∪ interior, not the interior alone; subtract
/// [`circle_boundary`] to get the cells strictly inside.
pub fn filled_circle(
    side_length: u32,
    cell_size: u32,
    x_offset: i32,
    y_offset: i32,
) -> HashSet<Coordinate> {
    let (mut cells, (cx, cy)) = rasterize_cells(side_length, cell_size, x_offset, y_offset);
    // The fill runs on the unit lattice, where the ring is 8-connected and
    // therefore closed for a 4-connected walk; scaling happens afterwards.
    flood_fill(cx, cy, &mut cells);
    scale(cells, cell_size)
}

/// Stack-based 4-connected fill from `(x0, y0)`.
///
/// Anything already in `frontier` is a wall. Every visited coordinate is
/// inserted into `frontier`, and the number of newly visited coordinates is
/// returned. The frontier must enclose the start point: an open curve makes
/// this loop forever.
pub fn flood_fill(x0: i32, y0: i32, frontier: &mut HashSet<Coordinate>) -> usize {
    let mut stack = vec![(x0, y0)];
    let mut visited = 0;
    while let Some((x, y)) = stack.pop() {
        if !frontier.insert((x, y)) {
            continue;
        }
        visited += 1;
        stack.push((x + 1, y)); // right
        stack.push((x - 1, y)); // left
        stack.push((x, y + 1)); // down
        stack.push((x, y - 1)); // up
    }
    visited
}
