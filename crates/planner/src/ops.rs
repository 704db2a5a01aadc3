//! Primitive edit operations and their wire encoding.

use gdoctable_protocol::{
    DeleteContentRangeRequest, DeleteTableColumnRequest, DeleteTableRowRequest,
    EndOfSegmentLocation, InsertInlineImageRequest, InsertTableColumnRequest,
    InsertTableRequest, InsertTableRowRequest, InsertTextRequest, Location, Range, Request,
    Size, TableCellLocation,
};

/// Where a new table goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// End of the document body.
    Append,
    /// Explicit offset.
    AtIndex(i64),
}

/// A primitive instruction against one snapshot's offset space.
///
/// Content ops address absolute offsets; structural ops address a table by
/// its start offset plus a row/column index.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOp {
    DeleteRange { start: i64, end: i64 },
    InsertText { index: i64, text: String },
    InsertInlineImage { index: i64, uri: String, width: f64, height: f64 },
    InsertTableRow { table_start: i64, row: usize, below: bool },
    InsertTableColumn { table_start: i64, column: usize, right: bool },
    DeleteTableRow { table_start: i64, row: usize },
    DeleteTableColumn { table_start: i64, column: usize },
    InsertTable { rows: usize, columns: usize, placement: Placement },
}

impl EditOp {
    pub fn to_request(&self) -> Request {
        match self {
            EditOp::DeleteRange { start, end } => {
                Request::DeleteContentRange(DeleteContentRangeRequest {
                    range: Range { start_index: *start, end_index: *end },
                })
            }
            EditOp::InsertText { index, text } => Request::InsertText(InsertTextRequest {
                location: Location::at(*index),
                text: text.clone(),
            }),
            EditOp::InsertInlineImage { index, uri, width, height } => {
                Request::InsertInlineImage(InsertInlineImageRequest {
                    uri: uri.clone(),
                    location: Location::at(*index),
                    object_size: Some(Size::points(*width, *height)),
                })
            }
            EditOp::InsertTableRow { table_start, row, below } => {
                Request::InsertTableRow(InsertTableRowRequest {
                    table_cell_location: cell_location(*table_start, *row, 0),
                    insert_below: *below,
                })
            }
            EditOp::InsertTableColumn { table_start, column, right } => {
                Request::InsertTableColumn(InsertTableColumnRequest {
                    table_cell_location: cell_location(*table_start, 0, *column),
                    insert_right: *right,
                })
            }
            EditOp::DeleteTableRow { table_start, row } => {
                Request::DeleteTableRow(DeleteTableRowRequest {
                    table_cell_location: cell_location(*table_start, *row, 0),
                })
            }
            EditOp::DeleteTableColumn { table_start, column } => {
                Request::DeleteTableColumn(DeleteTableColumnRequest {
                    table_cell_location: cell_location(*table_start, 0, *column),
                })
            }
            EditOp::InsertTable { rows, columns, placement } => {
                let (location, end_of_segment_location) = match placement {
                    Placement::Append => (None, Some(EndOfSegmentLocation::default())),
                    Placement::AtIndex(index) => (Some(Location::at(*index)), None),
                };
                Request::InsertTable(InsertTableRequest {
                    rows: *rows as i64,
                    columns: *columns as i64,
                    location,
                    end_of_segment_location,
                })
            }
        }
    }
}

fn cell_location(table_start: i64, row: usize, column: usize) -> TableCellLocation {
    TableCellLocation {
        table_start_location: Location::at(table_start),
        row_index: row as i64,
        column_index: column as i64,
    }
}

/// Encode a batch, preserving order.
pub fn to_requests(ops: &[EditOp]) -> Vec<Request> {
    ops.iter().map(EditOp::to_request).collect()
}
