use crate::collage::config::SlotCount;
use crate::foundation::core::Rect;

/// Placement of one slot inside the collage grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct GridCell {
    /// Top row, 0-based.
    pub row: u32,
    /// Left column, 0-based.
    pub col: u32,
    /// Rows covered.
    pub row_span: u32,
    /// Columns covered.
    pub col_span: u32,
}

/// Grid shape of a collage; `cells[i]` belongs to slot `i`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct GridLayout {
    /// Row count.
    pub rows: u32,
    /// Column count.
    pub cols: u32,
    /// One cell per slot, in slot order.
    pub cells: Vec<GridCell>,
}

impl GridLayout {
    /// Pixel rectangle of slot `index` inside `bounds`, with `gap` pixels between tracks.
    ///
    /// Returns `None` for an unknown slot.
    pub fn cell_rect(&self, index: usize, bounds: Rect, gap: f64) -> Option<Rect> {
        let cell = self.cells.get(index)?;
        let gap = gap.max(0.0);
        let track_w = (bounds.width() - gap * f64::from(self.cols - 1)) / f64::from(self.cols);
        let track_h = (bounds.height() - gap * f64::from(self.rows - 1)) / f64::from(self.rows);

        let x0 = bounds.x0 + f64::from(cell.col) * (track_w + gap);
        let y0 = bounds.y0 + f64::from(cell.row) * (track_h + gap);
        let w = track_w * f64::from(cell.col_span) + gap * f64::from(cell.col_span - 1);
        let h = track_h * f64::from(cell.row_span) + gap * f64::from(cell.row_span - 1);
        Some(Rect::new(x0, y0, x0 + w, y0 + h))
    }
}

fn cell(row: u32, col: u32) -> GridCell {
    GridCell {
        row,
        col,
        row_span: 1,
        col_span: 1,
    }
}

/// Grid shape for a slot count.
///
/// Three slots use a 2x2 grid whose first slot spans both columns; four use 2x2; six use three
/// columns over two rows.
pub fn layout_for(slot_count: SlotCount) -> GridLayout {
    match slot_count {
        SlotCount::Three => GridLayout {
            rows: 2,
            cols: 2,
            cells: vec![
                GridCell {
                    col_span: 2,
                    ..cell(0, 0)
                },
                cell(1, 0),
                cell(1, 1),
            ],
        },
        SlotCount::Four => GridLayout {
            rows: 2,
            cols: 2,
            cells: vec![cell(0, 0), cell(0, 1), cell(1, 0), cell(1, 1)],
        },
        SlotCount::Six => GridLayout {
            rows: 2,
            cols: 3,
            cells: (0..6).map(|i| cell(i / 3, i % 3)).collect(),
        },
    }
}

#[cfg(test)]
#[path = "../../tests/unit/collage/layout.rs"]
mod tests;
