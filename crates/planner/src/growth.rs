//! Row/column growth needed before values can be written.
//!
//! Inserting rows or columns shifts every later cell offset by an amount only
//! the service knows, so growth is always its own batch followed by a fresh
//! fetch. It is never mixed with content edits.

use crate::ops::EditOp;
use crate::snapshot::Grid;
use crate::values::Assignment;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthSpec {
    pub target_rows: usize,
    pub target_columns: usize,
}

/// Size the grid must reach to hold every assignment, or `None` when the
/// current grid already fits.
pub fn required_growth(grid: &Grid, assignments: &[Assignment]) -> Option<GrowthSpec> {
    let needed_rows = assignments.iter().map(|a| a.row + 1).max().unwrap_or(0);
    let needed_columns = assignments.iter().map(|a| a.col + 1).max().unwrap_or(0);

    let spec = GrowthSpec {
        target_rows: needed_rows.max(grid.rows()),
        target_columns: needed_columns.max(grid.columns()),
    };

    if spec.target_rows > grid.rows() || spec.target_columns > grid.columns() {
        Some(spec)
    } else {
        None
    }
}

/// One insertion per missing row (below the last row) and per missing column
/// (right of the last column). Successive insertions reference the row or
/// column added by the previous one, so the batch needs no feedback.
pub fn growth_ops(grid: &Grid, spec: GrowthSpec) -> Vec<EditOp> {
    let table_start = grid.table_start();
    let rows = grid.rows();
    let columns = grid.columns();

    let row_ops = (0..spec.target_rows.saturating_sub(rows)).map(|k| EditOp::InsertTableRow {
        table_start,
        row: rows - 1 + k,
        below: true,
    });
    let column_ops =
        (0..spec.target_columns.saturating_sub(columns)).map(|k| EditOp::InsertTableColumn {
            table_start,
            column: columns - 1 + k,
            right: true,
        });

    row_ops.chain(column_ops).collect()
}
