//! Parsing of one table element into a [`Grid`] of cell ranges.
//!
//! A grid is a read-only view of a single fetched snapshot. Any structural
//! edit makes it stale; callers re-fetch and re-parse instead of patching it.

use gdoctable_protocol::{StructuralElement, TableCell};

use crate::error::PlanError;

pub const INLINE_OBJECT_PLACEHOLDER: &str = "[INLINE OBJECT]";
pub const TABLE_PLACEHOLDER: &str = "[TABLE]";
pub const UNSUPPORTED_PLACEHOLDER: &str = "[UNSUPPORTED CONTENT]";

/// Half-open offset range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetRange {
    pub start: i64,
    pub end: i64,
}

impl OffsetRange {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContentKind {
    Text(String),
    InlineImage,
    NestedTable,
    Unsupported,
}

/// One run of cell content with its own offsets.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentItem {
    pub range: OffsetRange,
    pub kind: ContentKind,
}

impl ContentItem {
    /// Literal text, or the placeholder marker for non-text content.
    pub fn text(&self) -> &str {
        match &self.kind {
            ContentKind::Text(s) => s,
            ContentKind::InlineImage => INLINE_OBJECT_PLACEHOLDER,
            ContentKind::NestedTable => TABLE_PLACEHOLDER,
            ContentKind::Unsupported => UNSUPPORTED_PLACEHOLDER,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    items: Vec<ContentItem>,
    range: OffsetRange,
}

impl Cell {
    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    /// Effective range replaced on write. Excludes the newline that closes
    /// the cell's last paragraph, so a pristine cell has an empty range.
    pub fn range(&self) -> OffsetRange {
        self.range
    }

    /// Cell content as one string: newlines stripped from every item, items
    /// joined with `\n`.
    pub fn text(&self) -> String {
        self.items
            .iter()
            .map(|item| item.text().replace('\n', ""))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: usize,
    columns: usize,
    table_range: OffsetRange,
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Offsets of the table element itself.
    pub fn table_range(&self) -> OffsetRange {
        self.table_range
    }

    pub fn table_start(&self) -> i64 {
        self.table_range.start
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.cells.get(row).and_then(|r| r.get(col))
    }

    /// Cells in document order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().flatten()
    }

    /// Flattened text of every cell, row by row.
    pub fn values(&self) -> Vec<Vec<String>> {
        self.cells
            .iter()
            .map(|row| row.iter().map(Cell::text).collect())
            .collect()
    }
}

/// Parse a table structural element into a grid.
pub fn parse_table(element: &StructuralElement) -> Result<Grid, PlanError> {
    let table = element.table.as_ref().ok_or_else(|| {
        PlanError::MalformedSnapshot(format!(
            "element at offset {} is not a table",
            element.start_index
        ))
    })?;

    if table.table_rows.is_empty() {
        return Err(PlanError::MalformedSnapshot(format!(
            "table at offset {} has no rows",
            element.start_index
        )));
    }

    let mut cells = Vec::with_capacity(table.table_rows.len());
    let mut previous = OffsetRange::new(element.start_index, element.start_index);
    for (r, table_row) in table.table_rows.iter().enumerate() {
        if table_row.table_cells.is_empty() {
            return Err(PlanError::MalformedSnapshot(format!("row {r} has no cells")));
        }
        let row = table_row
            .table_cells
            .iter()
            .enumerate()
            .map(|(c, cell)| parse_cell(r, c, cell))
            .collect::<Result<Vec<_>, _>>()?;
        for cell in &row {
            // Cells follow the table start and each other without overlap.
            if cell.range.start <= previous.start || cell.range.start < previous.end {
                return Err(PlanError::MalformedSnapshot(format!(
                    "cell ({}, {}) at {}..{} overlaps the content before it (ends at {})",
                    cell.row, cell.col, cell.range.start, cell.range.end, previous.end
                )));
            }
            previous = cell.range;
        }
        cells.push(row);
    }

    let widest = cells.iter().map(Vec::len).max().unwrap_or(0);
    let columns = usize::try_from(table.columns).unwrap_or(0).max(widest);

    Ok(Grid {
        rows: cells.len(),
        columns,
        table_range: OffsetRange::new(element.start_index, element.end_index),
        cells,
    })
}

fn parse_cell(row: usize, col: usize, cell: &TableCell) -> Result<Cell, PlanError> {
    let mut items = Vec::new();
    let mut closes_paragraph = false;

    for content in &cell.content {
        if let Some(paragraph) = &content.paragraph {
            for element in &paragraph.elements {
                let kind = if let Some(run) = &element.text_run {
                    ContentKind::Text(run.content.clone())
                } else if element.inline_object_element.is_some() {
                    ContentKind::InlineImage
                } else {
                    ContentKind::Unsupported
                };
                items.push(ContentItem {
                    range: OffsetRange::new(element.start_index, element.end_index),
                    kind,
                });
            }
            closes_paragraph = !paragraph.elements.is_empty();
        } else {
            let kind = if content.table.is_some() {
                ContentKind::NestedTable
            } else {
                ContentKind::Unsupported
            };
            items.push(ContentItem {
                range: OffsetRange::new(content.start_index, content.end_index),
                kind,
            });
            closes_paragraph = false;
        }
    }

    let (first, last) = match (items.first(), items.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => {
            return Err(PlanError::MalformedSnapshot(format!(
                "cell ({row}, {col}) has no content"
            )))
        }
    };

    let start = first.range.start;
    let end = if closes_paragraph { last.range.end - 1 } else { last.range.end };
    if end < start {
        return Err(PlanError::MalformedSnapshot(format!(
            "cell ({row}, {col}) ends before it starts ({start}..{end})"
        )));
    }

    Ok(Cell { row, col, range: OffsetRange::new(start, end), items })
}
