//! `gdoctable-planner`: offset-safe edit planning for document tables.
//!
//! Parses a fetched table into a grid, resolves value blocks into absolute
//! cell writes, and emits batches ordered so that no edit shifts an offset
//! a later edit in the same batch still relies on. Transport lives behind
//! [`DocumentService`]; this crate does no IO of its own.

pub mod content;
pub mod creation;
pub mod deletion;
pub mod error;
pub mod growth;
pub mod images;
pub mod ops;
pub mod service;
pub mod session;
pub mod snapshot;
pub mod values;

#[cfg(test)]
mod test_support;

pub use creation::CreateTableRequest;
pub use deletion::DeletionRequest;
pub use error::{Axis, CellAddress, PlanError};
pub use images::{ImageReplacement, ReplaceScope};
pub use ops::{EditOp, Placement};
pub use service::{fetch_all_tables, fetch_document, fetch_table, DocumentService, ServiceError};
pub use session::{EditSession, Operation, Outcome, SessionOptions, SessionState, TableInfo, LIBRARY_VERSION};
pub use snapshot::{parse_table, Grid};
pub use values::{resolve, Assignment, ValueBlock};
