//! Document Service Wire Format
//!
//! Serde types for the subset of the Google Docs v1 REST contract that the
//! table planner reads and writes. Field names are `camelCase` on the wire.
//!
//! # Reading
//!
//! A fetched [`Document`] carries `body.content`: an ordered list of
//! [`StructuralElement`]s, each spanning `[startIndex, endIndex)` in the
//! document's single offset space. The service omits `startIndex` when it
//! is zero (the first element of the body), so every index defaults to 0.
//!
//! # Writing
//!
//! A batch update is a [`BatchUpdateDocumentRequest`] holding [`Request`]s.
//! `Request` is externally tagged, so each variant serializes as the
//! one-of object the service expects:
//!
//! ```ignore
//! use gdoctable_protocol::{Request, InsertTextRequest, Location};
//!
//! let req = Request::InsertText(InsertTextRequest {
//!     location: Location::at(14),
//!     text: "a".into(),
//! });
//! // {"insertText":{"location":{"index":14},"text":"a"}}
//! let json = serde_json::to_string(&req)?;
//! ```

use serde::{Deserialize, Serialize};

/// Field mask used when fetching a document for table work.
pub const DOCUMENT_FIELDS: &str = "body(content(startIndex,endIndex,paragraph,table))";

// =============================================================================
// Document (service → client)
// =============================================================================

/// A fetched document. Only the body is requested.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    #[serde(default)]
    pub body: Body,
}

impl Document {
    /// Top-level structural elements in document order.
    pub fn content(&self) -> &[StructuralElement] {
        &self.body.content
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Body {
    #[serde(default)]
    pub content: Vec<StructuralElement>,
}

/// One block of document content: a paragraph, a table, or something the
/// planner does not interpret (section break, table of contents).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralElement {
    #[serde(default)]
    pub start_index: i64,
    #[serde(default)]
    pub end_index: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph: Option<Paragraph>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<Table>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_break: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_of_contents: Option<serde_json::Value>,
}

impl StructuralElement {
    pub fn is_table(&self) -> bool {
        self.table.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    #[serde(default)]
    pub elements: Vec<ParagraphElement>,
}

/// A run inside a paragraph. At most one of the content fields is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphElement {
    #[serde(default)]
    pub start_index: i64,
    #[serde(default)]
    pub end_index: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_run: Option<TextRun>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_object_element: Option<InlineObjectElement>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineObjectElement {
    #[serde(default)]
    pub inline_object_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    #[serde(default)]
    pub rows: i64,
    #[serde(default)]
    pub columns: i64,
    #[serde(default)]
    pub table_rows: Vec<TableRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    #[serde(default)]
    pub start_index: i64,
    #[serde(default)]
    pub end_index: i64,
    #[serde(default)]
    pub table_cells: Vec<TableCell>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCell {
    #[serde(default)]
    pub start_index: i64,
    #[serde(default)]
    pub end_index: i64,
    #[serde(default)]
    pub content: Vec<StructuralElement>,
}

// =============================================================================
// Batch update (client → service)
// =============================================================================

/// Body of `documents/{id}:batchUpdate`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchUpdateDocumentRequest {
    pub requests: Vec<Request>,
}

/// A single primitive edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Request {
    DeleteContentRange(DeleteContentRangeRequest),
    InsertText(InsertTextRequest),
    InsertTableRow(InsertTableRowRequest),
    InsertTableColumn(InsertTableColumnRequest),
    DeleteTableRow(DeleteTableRowRequest),
    DeleteTableColumn(DeleteTableColumnRequest),
    InsertTable(InsertTableRequest),
    InsertInlineImage(InsertInlineImageRequest),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Range {
    pub start_index: i64,
    pub end_index: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub index: i64,
}

impl Location {
    pub fn at(index: i64) -> Self {
        Self { index }
    }
}

/// End of the body segment (segment id empty).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndOfSegmentLocation {
    #[serde(default)]
    pub segment_id: String,
}

/// Addresses a row/column of a table by the table's start offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCellLocation {
    pub table_start_location: Location,
    #[serde(default)]
    pub row_index: i64,
    #[serde(default)]
    pub column_index: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteContentRangeRequest {
    pub range: Range,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertTextRequest {
    pub location: Location,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertTableRowRequest {
    pub table_cell_location: TableCellLocation,
    pub insert_below: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertTableColumnRequest {
    pub table_cell_location: TableCellLocation,
    pub insert_right: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTableRowRequest {
    pub table_cell_location: TableCellLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTableColumnRequest {
    pub table_cell_location: TableCellLocation,
}

/// Inserts an empty `rows × columns` table. Exactly one of `location` and
/// `end_of_segment_location` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertTableRequest {
    pub rows: i64,
    pub columns: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_of_segment_location: Option<EndOfSegmentLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertInlineImageRequest {
    pub uri: String,
    pub location: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_size: Option<Size>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub height: Dimension,
    pub width: Dimension,
}

impl Size {
    /// Size in points.
    pub fn points(width: f64, height: f64) -> Self {
        Self {
            width: Dimension { magnitude: width, unit: DimensionUnit::Pt },
            height: Dimension { magnitude: height, unit: DimensionUnit::Pt },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub magnitude: f64,
    pub unit: DimensionUnit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DimensionUnit {
    Pt,
}
