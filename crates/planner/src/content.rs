//! Content edit batches for existing cells.
//!
//! Ops are emitted for cells in descending order of their effective start
//! offset. An edit at a lower offset shifts everything after it, so working
//! from the end of the document backwards leaves every pending op's offsets
//! untouched when the service reaches it.

use crate::error::{Axis, PlanError};
use crate::ops::EditOp;
use crate::snapshot::{Grid, OffsetRange};
use crate::values::Assignment;

/// Build the delete/insert batch writing `assignments` into `grid`.
///
/// Assignments are checked in (row, col) order so the first out-of-bounds
/// error is deterministic; ops come out sorted by descending cell offset.
pub fn build_content_ops(grid: &Grid, assignments: &[Assignment]) -> Result<Vec<EditOp>, PlanError> {
    let mut ordered: Vec<&Assignment> = assignments.iter().collect();
    ordered.sort_by_key(|a| a.address());

    let mut targets: Vec<(OffsetRange, &str)> = Vec::with_capacity(ordered.len());
    for assignment in ordered {
        let cell = grid
            .cell(assignment.row, assignment.col)
            .ok_or_else(|| out_of_bounds(grid, assignment))?;
        targets.push((cell.range(), assignment.value.as_str()));
    }

    targets.sort_by(|a, b| b.0.start.cmp(&a.0.start));

    let mut ops = Vec::with_capacity(targets.len() * 2);
    for (range, value) in targets {
        if !range.is_empty() {
            ops.push(EditOp::DeleteRange { start: range.start, end: range.end });
        }
        if !value.is_empty() {
            ops.push(EditOp::InsertText { index: range.start, text: value.to_string() });
        }
    }
    Ok(ops)
}

fn out_of_bounds(grid: &Grid, assignment: &Assignment) -> PlanError {
    if assignment.row >= grid.rows() {
        PlanError::IndexOutOfBounds { axis: Axis::Row, index: assignment.row, bound: grid.rows() }
    } else {
        PlanError::IndexOutOfBounds {
            axis: Axis::Column,
            index: assignment.col,
            bound: grid.columns(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{blank_grid, grid_from};

    #[test]
    fn two_by_two_scenario_runs_back_to_front() {
        let grid = grid_from(1, &[vec!["old", "x"], vec!["y", "old"]]);
        let c00 = grid.cell(0, 0).unwrap().range();
        let c11 = grid.cell(1, 1).unwrap().range();
        assert!(c11.start > c00.start);

        let assignments = vec![Assignment::new(0, 0, "a"), Assignment::new(1, 1, "b")];
        let ops = build_content_ops(&grid, &assignments).unwrap();
        assert_eq!(
            ops,
            vec![
                EditOp::DeleteRange { start: c11.start, end: c11.end },
                EditOp::InsertText { index: c11.start, text: "b".into() },
                EditOp::DeleteRange { start: c00.start, end: c00.end },
                EditOp::InsertText { index: c00.start, text: "a".into() },
            ]
        );
    }

    #[test]
    fn pristine_cells_get_inserts_only() {
        let grid = blank_grid(2, 2, 1);
        let assignments = vec![Assignment::new(0, 0, "a"), Assignment::new(1, 1, "b")];
        let ops = build_content_ops(&grid, &assignments).unwrap();
        let c00 = grid.cell(0, 0).unwrap().range().start;
        let c11 = grid.cell(1, 1).unwrap().range().start;
        assert_eq!(
            ops,
            vec![
                EditOp::InsertText { index: c11, text: "b".into() },
                EditOp::InsertText { index: c00, text: "a".into() },
            ]
        );
    }

    #[test]
    fn empty_value_clears_without_insert() {
        let grid = grid_from(1, &[vec!["keep", "drop"]]);
        let range = grid.cell(0, 1).unwrap().range();
        let ops = build_content_ops(&grid, &[Assignment::new(0, 1, "")]).unwrap();
        assert_eq!(ops, vec![EditOp::DeleteRange { start: range.start, end: range.end }]);
    }

    #[test]
    fn emission_ignores_input_order() {
        let grid = blank_grid(3, 1, 1);
        let forward = vec![
            Assignment::new(0, 0, "a"),
            Assignment::new(1, 0, "b"),
            Assignment::new(2, 0, "c"),
        ];
        let mut backward = forward.clone();
        backward.reverse();
        assert_eq!(
            build_content_ops(&grid, &forward).unwrap(),
            build_content_ops(&grid, &backward).unwrap()
        );
    }

    #[test]
    fn assignment_outside_grid_is_rejected() {
        let grid = blank_grid(2, 2, 1);
        match build_content_ops(&grid, &[Assignment::new(0, 5, "x"), Assignment::new(4, 0, "y")]) {
            Err(PlanError::IndexOutOfBounds { axis, index, bound }) => {
                assert_eq!((axis, index, bound), (Axis::Column, 5, 2));
            }
            other => panic!("expected IndexOutOfBounds, got {other:?}"),
        }
    }
}
