//! Schematic campus map.
//!
//! Lot positions live on a 100×100 plane; the plane is scaled onto a fixed
//! character grid with two dashed roads crossing at the centre.

use lotsync_core::{LotRecord, LotTable, OccupancyBucket, Thresholds};

const GRID_WIDTH: usize = 41;
const GRID_HEIGHT: usize = 21;

fn glyph(bucket: Option<OccupancyBucket>) -> char {
    match bucket {
        Some(OccupancyBucket::Open) => 'o',
        Some(OccupancyBucket::Busy) => '*',
        Some(OccupancyBucket::Full) => '#',
        None => '?',
    }
}

fn scale(coord: u8, cells: usize) -> usize {
    usize::from(coord.min(100)) * (cells - 1) / 100
}

/// Renders the map for the lots in `lots` that have a position.
///
/// Lots missing from `records` are drawn as `?`.
pub(crate) fn render_map(records: &[LotRecord], lots: &LotTable, thresholds: &Thresholds) -> String {
    let mut grid = vec![vec![' '; GRID_WIDTH]; GRID_HEIGHT];

    let mid_row = scale(50, GRID_HEIGHT);
    let mid_col = scale(50, GRID_WIDTH);
    for (col, cell) in grid[mid_row].iter_mut().enumerate() {
        if col % 2 == 0 {
            *cell = '-';
        }
    }
    for (row, line) in grid.iter_mut().enumerate() {
        if row % 2 == 0 {
            line[mid_col] = ':';
        }
    }

    let mut key = Vec::new();
    for (spec, pos) in lots.map_markers() {
        let record = records.iter().find(|r| r.lot_id == spec.id);
        let bucket = record.map(|r| thresholds.bucket(r.occupancy_pct));

        let row = scale(pos.y, GRID_HEIGHT);
        let col = scale(pos.x, GRID_WIDTH);
        let label: Vec<char> = std::iter::once(glyph(bucket)).chain(spec.id.chars()).collect();
        // Shift left so long ids stay inside the frame.
        let start = col.min(GRID_WIDTH.saturating_sub(label.len()));
        for (offset, ch) in label.into_iter().enumerate() {
            if let Some(cell) = grid[row].get_mut(start + offset) {
                *cell = ch;
            }
        }

        key.push(match record {
            Some(r) => format!("{} {}%", spec.id, r.occupancy_pct),
            None => format!("{} no data", spec.id),
        });
    }

    let border = format!("+{}+", "-".repeat(GRID_WIDTH));
    let mut out = String::new();
    out.push_str("Campus Map\n");
    out.push_str(&border);
    out.push('\n');
    for line in grid {
        out.push('|');
        out.extend(line);
        out.push_str("|\n");
    }
    out.push_str(&border);
    out.push('\n');
    out.push_str("o open  * busy  # full  ? no data\n");
    if !key.is_empty() {
        out.push_str(&key.join("  "));
        out.push('\n');
    }
    out
}
