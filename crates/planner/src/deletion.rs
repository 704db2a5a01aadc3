//! Row/column and whole-table deletion.

use serde::{Deserialize, Serialize};

use crate::error::{Axis, PlanError};
use crate::ops::EditOp;
use crate::snapshot::Grid;

/// Rows and columns to remove, 0-based against the current grid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionRequest {
    #[serde(rename = "deleteRows", default)]
    pub rows: Vec<usize>,
    #[serde(rename = "deleteColumns", default)]
    pub columns: Vec<usize>,
}

impl DeletionRequest {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.columns.is_empty()
    }
}

/// Plan deletions: rows from the highest index down, then columns likewise,
/// so no pending index moves before it is used. Repeated indices collapse.
pub fn plan_deletion(grid: &Grid, request: &DeletionRequest) -> Result<Vec<EditOp>, PlanError> {
    if request.is_empty() {
        return Err(PlanError::EmptyDeletionRequest);
    }

    let rows = descending_within(&request.rows, Axis::Row, grid.rows())?;
    let columns = descending_within(&request.columns, Axis::Column, grid.columns())?;
    let table_start = grid.table_start();

    let row_ops = rows.into_iter().map(|row| EditOp::DeleteTableRow { table_start, row });
    let column_ops = columns
        .into_iter()
        .map(|column| EditOp::DeleteTableColumn { table_start, column });
    Ok(row_ops.chain(column_ops).collect())
}

fn descending_within(indices: &[usize], axis: Axis, bound: usize) -> Result<Vec<usize>, PlanError> {
    if let Some(&index) = indices.iter().find(|&&i| i >= bound) {
        return Err(PlanError::IndexOutOfBounds { axis, index, bound });
    }
    let mut sorted = indices.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted.dedup();
    Ok(sorted)
}

/// Remove the whole table element.
pub fn plan_table_deletion(grid: &Grid) -> EditOp {
    let range = grid.table_range();
    EditOp::DeleteRange { start: range.start, end: range.end }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::blank_grid;

    fn request(rows: &[usize], columns: &[usize]) -> DeletionRequest {
        DeletionRequest { rows: rows.to_vec(), columns: columns.to_vec() }
    }

    #[test]
    fn rows_are_deleted_highest_first() {
        let grid = blank_grid(3, 2, 5);
        let ops = plan_deletion(&grid, &request(&[0, 2], &[])).unwrap();
        assert_eq!(
            ops,
            vec![
                EditOp::DeleteTableRow { table_start: 5, row: 2 },
                EditOp::DeleteTableRow { table_start: 5, row: 0 },
            ]
        );
    }

    #[test]
    fn columns_follow_rows_in_descending_order() {
        let grid = blank_grid(3, 3, 1);
        let ops = plan_deletion(&grid, &request(&[1], &[0, 2, 2])).unwrap();
        assert_eq!(
            ops,
            vec![
                EditOp::DeleteTableRow { table_start: 1, row: 1 },
                EditOp::DeleteTableColumn { table_start: 1, column: 2 },
                EditOp::DeleteTableColumn { table_start: 1, column: 0 },
            ]
        );
    }

    #[test]
    fn columns_only_request_is_valid() {
        let grid = blank_grid(2, 2, 1);
        let ops = plan_deletion(&grid, &request(&[], &[1])).unwrap();
        assert_eq!(ops, vec![EditOp::DeleteTableColumn { table_start: 1, column: 1 }]);
    }

    #[test]
    fn row_equal_to_count_is_out_of_bounds() {
        let grid = blank_grid(3, 2, 1);
        match plan_deletion(&grid, &request(&[3], &[])) {
            Err(PlanError::IndexOutOfBounds { axis, index, bound }) => {
                assert_eq!((axis, index, bound), (Axis::Row, 3, 3));
            }
            other => panic!("expected IndexOutOfBounds, got {other:?}"),
        }
    }

    #[test]
    fn empty_request_is_rejected() {
        let grid = blank_grid(1, 1, 1);
        assert!(matches!(
            plan_deletion(&grid, &DeletionRequest::default()),
            Err(PlanError::EmptyDeletionRequest)
        ));
    }

    #[test]
    fn table_deletion_covers_the_element() {
        let grid = blank_grid(1, 1, 4);
        let range = grid.table_range();
        assert_eq!(plan_table_deletion(&grid), EditOp::DeleteRange { start: 4, end: range.end });
    }
}
