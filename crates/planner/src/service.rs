//! The document service the planner talks to.
//!
//! Implementations own transport and auth. The planner only needs a
//! snapshot of the document body and a way to apply one ordered batch.

use std::fmt;

use gdoctable_protocol::{Document, Request, StructuralElement};
use serde::Deserialize;

use crate::error::PlanError;

/// Opaque failure reported by the service. Never interpreted by the planner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceError {
    /// HTTP status when the service answered at all.
    pub status: Option<u16>,
    pub message: String,
}

impl ServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { status: None, message: message.into() }
    }

    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self { status: Some(status), message: message.into() }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "HTTP {}: {}", status, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ServiceError {}

pub trait DocumentService {
    /// Fetch the document as the service sent it.
    fn get_document(&mut self, document_id: &str) -> Result<serde_json::Value, ServiceError>;

    /// Apply one batch in order. Returns the raw service response.
    fn batch_update(
        &mut self,
        document_id: &str,
        requests: Vec<Request>,
    ) -> Result<serde_json::Value, ServiceError>;
}

/// Fetch and decode a document. The raw body is returned alongside so
/// callers can pass it on untouched.
pub fn fetch_document<S: DocumentService + ?Sized>(
    service: &mut S,
    document_id: &str,
) -> Result<(Document, serde_json::Value), PlanError> {
    let raw = service.get_document(document_id)?;
    let document = Document::deserialize(&raw)
        .map_err(|e| PlanError::MalformedSnapshot(format!("unreadable document {document_id}: {e}")))?;
    Ok((document, raw))
}

/// The `table_index`-th table of a freshly fetched document.
pub fn fetch_table<S: DocumentService + ?Sized>(
    service: &mut S,
    document_id: &str,
    table_index: usize,
) -> Result<StructuralElement, PlanError> {
    let (document, _) = fetch_document(service, document_id)?;
    find_table(&document, table_index).cloned()
}

/// Every table of a freshly fetched document, in body order.
pub fn fetch_all_tables<S: DocumentService + ?Sized>(
    service: &mut S,
    document_id: &str,
) -> Result<Vec<StructuralElement>, PlanError> {
    let (document, _) = fetch_document(service, document_id)?;
    Ok(tables(&document).into_iter().cloned().collect())
}

/// Table-typed elements of the body, in document order.
pub fn tables(document: &Document) -> Vec<&StructuralElement> {
    document.content().iter().filter(|e| e.is_table()).collect()
}

/// The `index`-th table of the body.
pub fn find_table(document: &Document, index: usize) -> Result<&StructuralElement, PlanError> {
    document
        .content()
        .iter()
        .filter(|e| e.is_table())
        .nth(index)
        .ok_or(PlanError::TableNotFound { index })
}

/// The table closest to the end of the body (a freshly appended table).
pub fn last_table(document: &Document) -> Option<&StructuralElement> {
    document.content().iter().rev().find(|e| e.is_table())
}
