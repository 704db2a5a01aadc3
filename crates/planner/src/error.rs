use std::fmt;

use crate::service::ServiceError;

/// A (row, col) position inside a table, both 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellAddress {
    pub row: usize,
    pub col: usize,
}

impl CellAddress {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Column,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Row => write!(f, "row"),
            Axis::Column => write!(f, "column"),
        }
    }
}

#[derive(Debug)]
pub enum PlanError {
    /// The fetched table tree cannot be turned into a grid.
    MalformedSnapshot(String),
    /// Every address that received more than one value, in (row, col) order.
    DuplicateAddress(Vec<CellAddress>),
    /// A value that is not an integer, float, or string.
    UnsupportedValueType { address: CellAddress, found: String },
    /// Row/column deletion with nothing to delete.
    EmptyDeletionRequest,
    /// Index outside the current grid.
    IndexOutOfBounds { axis: Axis, index: usize, bound: usize },
    InvalidTableCreationParameters(String),
    /// Empty marker/URI or non-positive image size.
    InvalidImageReplacement(String),
    /// No table at the requested index.
    TableNotFound { index: usize },
    /// Append-row called without values.
    EmptyValues,
    /// A session was asked to run a second operation.
    SessionReused,
    /// Failure reported by the document service. Not interpreted.
    Service(ServiceError),
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedSnapshot(msg) => write!(f, "malformed snapshot: {msg}"),
            Self::DuplicateAddress(addresses) => {
                let list: Vec<String> = addresses.iter().map(|a| a.to_string()).collect();
                write!(f, "duplicate values for cell(s) {}", list.join(", "))
            }
            Self::UnsupportedValueType { address, found } => {
                write!(f, "cell {address}: unsupported value type {found} (expected integer, number or string)")
            }
            Self::EmptyDeletionRequest => write!(f, "no rows or columns given for deletion"),
            Self::IndexOutOfBounds { axis, index, bound } => {
                write!(f, "{axis} index {index} is outside the table ({bound} {axis}s)")
            }
            Self::InvalidTableCreationParameters(msg) => {
                write!(f, "invalid table creation parameters: {msg}")
            }
            Self::InvalidImageReplacement(msg) => write!(f, "invalid image replacement: {msg}"),
            Self::TableNotFound { index } => write!(f, "table of index {index} was not found"),
            Self::EmptyValues => write!(f, "no values given to append"),
            Self::SessionReused => write!(f, "edit session already ran an operation"),
            Self::Service(err) => write!(f, "document service error: {err}"),
        }
    }
}

impl std::error::Error for PlanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Service(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ServiceError> for PlanError {
    fn from(err: ServiceError) -> Self {
        Self::Service(err)
    }
}
