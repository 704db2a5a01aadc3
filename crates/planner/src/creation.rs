//! New-table creation with initial values.
//!
//! A table that was just inserted and not yet edited has a fixed layout: a
//! four-unit header, two units per (empty) cell and one unit per row
//! boundary. Initial values can therefore be placed without parsing a
//! snapshot of the new table.

use crate::error::{CellAddress, PlanError};
use crate::ops::{EditOp, Placement};
use crate::values::{resolve, Assignment, ValueBlock};

const TABLE_HEADER_UNITS: i64 = 4;
const EMPTY_CELL_UNITS: i64 = 2;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateTableRequest {
    pub rows: usize,
    pub columns: usize,
    /// `None` when the caller gave neither an index nor append.
    pub placement: Option<Placement>,
    pub values: Vec<ValueBlock>,
}

/// Validated creation: the insertion op plus the values to write afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct CreationPlan {
    pub rows: usize,
    pub columns: usize,
    pub placement: Placement,
    assignments: Vec<Assignment>,
    ignored: Vec<CellAddress>,
}

impl CreationPlan {
    pub fn insert_table(&self) -> EditOp {
        EditOp::InsertTable { rows: self.rows, columns: self.columns, placement: self.placement }
    }

    pub fn has_values(&self) -> bool {
        !self.assignments.is_empty()
    }

    /// Addresses given a value that lie outside the new table.
    pub fn ignored(&self) -> &[CellAddress] {
        &self.ignored
    }

    /// Value inserts for a fresh table whose layout starts at `base_index`,
    /// highest offset first.
    pub fn value_ops(&self, base_index: i64) -> Vec<EditOp> {
        let mut placed: Vec<(i64, &str)> = self
            .assignments
            .iter()
            .map(|a| (cell_insertion_index(base_index, self.columns, a.row, a.col), a.value.as_str()))
            .collect();
        placed.sort_by(|a, b| b.0.cmp(&a.0));
        placed
            .into_iter()
            .map(|(index, text)| EditOp::InsertText { index, text: text.to_string() })
            .collect()
    }
}

/// Insertion point of cell (row, col) in a freshly created table.
pub fn cell_insertion_index(base_index: i64, columns: usize, row: usize, col: usize) -> i64 {
    let row_units = columns as i64 * EMPTY_CELL_UNITS + 1;
    base_index + TABLE_HEADER_UNITS + row as i64 * row_units + col as i64 * EMPTY_CELL_UNITS
}

/// Base index of a table appended at the end of the body, given the start
/// offset the service reports for it.
pub fn appended_base_index(table_start: i64) -> i64 {
    table_start - 1
}

pub fn plan_creation(request: &CreateTableRequest) -> Result<CreationPlan, PlanError> {
    if request.rows == 0 || request.columns == 0 {
        return Err(PlanError::InvalidTableCreationParameters(
            "rows and columns must both be greater than zero".into(),
        ));
    }
    let placement = match request.placement {
        Some(Placement::AtIndex(index)) if index <= 0 => {
            return Err(PlanError::InvalidTableCreationParameters(format!(
                "insertion index must be positive, got {index}"
            )))
        }
        Some(placement) => placement,
        None => {
            return Err(PlanError::InvalidTableCreationParameters(
                "set either a positive index or append".into(),
            ))
        }
    };

    let mut assignments = Vec::new();
    let mut ignored = Vec::new();
    for assignment in resolve(&request.values)? {
        if assignment.row >= request.rows || assignment.col >= request.columns {
            ignored.push(assignment.address());
        } else if !assignment.value.is_empty() {
            assignments.push(assignment);
        }
    }

    Ok(CreationPlan { rows: request.rows, columns: request.columns, placement, assignments, ignored })
}
