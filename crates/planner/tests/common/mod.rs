//! In-memory document service for integration tests.
//!
//! Holds the body as blocks, renders it with the service's offset layout
//! and applies every request of a batch against the document as it stands
//! after the previous request. Requests that address offsets the service
//! would reject fail with HTTP 400, and a failed batch leaves nothing applied.

#![allow(dead_code)]

use gdoctable_planner::{DocumentService, ServiceError};
use gdoctable_protocol::{
    Body, Document, InlineObjectElement, Paragraph, ParagraphElement, Request,
    StructuralElement, Table, TableCell, TableRow, TextRun,
};
use serde_json::{json, Value};

pub const DOC_ID: &str = "doc-1";

/// Inline images are stored as U+FFFC inside cell text, one unit wide.
pub const IMAGE: char = '\u{FFFC}';

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(String),
    Table(Vec<Vec<String>>),
}

#[derive(Debug, Default)]
pub struct FakeDocs {
    pub blocks: Vec<Block>,
    pub batches: Vec<Vec<Request>>,
    pub fetches: usize,
    /// Zero-based number of the batch that fails with HTTP 500.
    pub fail_on_batch: Option<usize>,
}

impl FakeDocs {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks, ..Default::default() }
    }

    /// An intro paragraph followed by one table.
    pub fn with_table(values: &[&[&str]]) -> Self {
        Self::new(vec![
            Block::Paragraph("Intro".into()),
            table(values),
            Block::Paragraph(String::new()),
        ])
    }

    /// The `index`-th table's cell text.
    pub fn table(&self, index: usize) -> Vec<Vec<String>> {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                Block::Table(rows) => Some(rows.clone()),
                Block::Paragraph(_) => None,
            })
            .nth(index)
            .unwrap_or_else(|| panic!("no table {index}"))
    }

    pub fn table_count(&self) -> usize {
        self.blocks.iter().filter(|b| matches!(b, Block::Table(_))).count()
    }

    pub fn document(&self) -> Document {
        render(&self.blocks).0
    }

    pub fn request_count(&self) -> usize {
        self.batches.iter().map(Vec::len).sum()
    }
}

pub fn table(values: &[&[&str]]) -> Block {
    Block::Table(
        values
            .iter()
            .map(|row| row.iter().map(|s| s.to_string()).collect())
            .collect(),
    )
}

impl DocumentService for FakeDocs {
    fn get_document(&mut self, document_id: &str) -> Result<Value, ServiceError> {
        if document_id != DOC_ID {
            return Err(ServiceError::with_status(404, "Requested entity was not found."));
        }
        self.fetches += 1;
        let mut raw = serde_json::to_value(self.document()).map_err(|e| ServiceError::new(e.to_string()))?;
        raw["revisionId"] = json!(format!("rev-{}", self.batches.len()));
        Ok(raw)
    }

    fn batch_update(&mut self, document_id: &str, requests: Vec<Request>) -> Result<Value, ServiceError> {
        if document_id != DOC_ID {
            return Err(ServiceError::with_status(404, "Requested entity was not found."));
        }
        if self.fail_on_batch == Some(self.batches.len()) {
            return Err(ServiceError::with_status(500, "Internal error encountered."));
        }
        let mut next = self.blocks.clone();
        for request in &requests {
            apply(&mut next, request)?;
        }
        self.blocks = next;
        let replies = vec![json!({}); requests.len()];
        self.batches.push(requests);
        Ok(json!({ "documentId": document_id, "replies": replies }))
    }
}

// ── Rendering ───────────────────────────────────────────────────────

#[derive(Debug)]
enum Layout {
    Paragraph { start: i64, end: i64 },
    /// `cells[r][c]` is the cell's text range, final newline excluded.
    Table { start: i64, end: i64, cells: Vec<Vec<(i64, i64)>> },
}

fn units(s: &str) -> i64 {
    s.encode_utf16().count() as i64
}

fn render(blocks: &[Block]) -> (Document, Vec<Layout>) {
    let mut content = vec![StructuralElement {
        start_index: 0,
        end_index: 1,
        section_break: Some(json!({})),
        ..Default::default()
    }];
    let mut layout = Vec::new();
    let mut offset = 1;

    for block in blocks {
        match block {
            Block::Paragraph(text) => {
                let element = paragraph(offset, text);
                layout.push(Layout::Paragraph { start: offset, end: element.end_index });
                offset = element.end_index;
                content.push(element);
            }
            Block::Table(rows) => {
                let start = offset;
                offset += 1;
                let columns = rows.first().map_or(0, Vec::len);
                let mut table_rows = Vec::new();
                let mut ranges = Vec::new();
                for row in rows {
                    let row_start = offset;
                    offset += 1;
                    let mut table_cells = Vec::new();
                    let mut row_ranges = Vec::new();
                    for text in row {
                        let cell_start = offset;
                        offset += 1;
                        row_ranges.push((offset, offset + units(text)));
                        let mut cell_content = Vec::new();
                        for line in text.split('\n') {
                            let element = paragraph(offset, line);
                            offset = element.end_index;
                            cell_content.push(element);
                        }
                        table_cells.push(TableCell {
                            start_index: cell_start,
                            end_index: offset,
                            content: cell_content,
                        });
                    }
                    table_rows.push(TableRow { start_index: row_start, end_index: offset, table_cells });
                    ranges.push(row_ranges);
                }
                offset += 1;
                content.push(StructuralElement {
                    start_index: start,
                    end_index: offset,
                    table: Some(Table {
                        rows: rows.len() as i64,
                        columns: columns as i64,
                        table_rows,
                    }),
                    ..Default::default()
                });
                layout.push(Layout::Table { start, end: offset, cells: ranges });
            }
        }
    }

    let document = Document { document_id: Some(DOC_ID.into()), body: Body { content } };
    (document, layout)
}

/// One paragraph of `text` plus its closing newline. Images become inline
/// object elements, everything else text runs.
fn paragraph(start: i64, text: &str) -> StructuralElement {
    let mut elements = Vec::new();
    let mut offset = start;
    let segments: Vec<&str> = text.split(IMAGE).collect();
    for (i, segment) in segments.iter().enumerate() {
        let last = i + 1 == segments.len();
        let run = if last { format!("{segment}\n") } else { segment.to_string() };
        if !run.is_empty() {
            let end = offset + units(&run);
            elements.push(ParagraphElement {
                start_index: offset,
                end_index: end,
                text_run: Some(TextRun { content: run }),
                ..Default::default()
            });
            offset = end;
        }
        if !last {
            elements.push(ParagraphElement {
                start_index: offset,
                end_index: offset + 1,
                inline_object_element: Some(InlineObjectElement {
                    inline_object_id: format!("kix.{offset}"),
                }),
                ..Default::default()
            });
            offset += 1;
        }
    }
    StructuralElement {
        start_index: start,
        end_index: offset,
        paragraph: Some(Paragraph { elements }),
        ..Default::default()
    }
}

// ── Applying requests ───────────────────────────────────────────────

fn rejected(message: String) -> ServiceError {
    ServiceError::with_status(400, message)
}

/// (block, row, col, text start) of the cell whose text range holds `[start, end]`.
fn locate_cell(layout: &[Layout], start: i64, end: i64) -> Result<(usize, usize, usize, i64), ServiceError> {
    for (b, block) in layout.iter().enumerate() {
        let Layout::Table { cells, .. } = block else {
            continue;
        };
        for (r, row) in cells.iter().enumerate() {
            for (c, &(text_start, text_end)) in row.iter().enumerate() {
                if text_start <= start && end <= text_end {
                    return Ok((b, r, c, text_start));
                }
            }
        }
    }
    Err(rejected(format!("Invalid requests: no editable text at {start}..{end}")))
}

fn locate_table(layout: &[Layout], table_start: i64) -> Result<usize, ServiceError> {
    layout
        .iter()
        .position(|l| matches!(l, Layout::Table { start, .. } if *start == table_start))
        .ok_or_else(|| rejected(format!("Invalid requests: no table starts at {table_start}")))
}

fn cell_text(blocks: &mut [Block], b: usize, r: usize, c: usize) -> &mut String {
    match &mut blocks[b] {
        Block::Table(rows) => &mut rows[r][c],
        Block::Paragraph(_) => unreachable!("layout and blocks disagree"),
    }
}

fn table_rows(blocks: &mut [Block], b: usize) -> &mut Vec<Vec<String>> {
    match &mut blocks[b] {
        Block::Table(rows) => rows,
        Block::Paragraph(_) => unreachable!("layout and blocks disagree"),
    }
}

fn splice(text: &mut String, from: usize, to: usize, insert: &str) {
    let mut buf: Vec<u16> = text.encode_utf16().collect();
    buf.splice(from..to, insert.encode_utf16());
    *text = String::from_utf16(&buf).expect("edit split a surrogate pair");
}

fn apply(blocks: &mut Vec<Block>, request: &Request) -> Result<(), ServiceError> {
    let (_, layout) = render(blocks);

    match request {
        Request::DeleteContentRange(req) => {
            let (start, end) = (req.range.start_index, req.range.end_index);
            if start >= end {
                return Err(rejected(format!("Invalid requests: empty range {start}..{end}")));
            }
            let whole_table = layout
                .iter()
                .position(|l| matches!(l, Layout::Table { start: s, end: e, .. } if *s == start && *e == end));
            if let Some(b) = whole_table {
                blocks.remove(b);
                return Ok(());
            }
            let (b, r, c, text_start) = locate_cell(&layout, start, end)?;
            splice(cell_text(blocks, b, r, c), (start - text_start) as usize, (end - text_start) as usize, "");
        }
        Request::InsertText(req) => {
            let index = req.location.index;
            let (b, r, c, text_start) = locate_cell(&layout, index, index)?;
            let at = (index - text_start) as usize;
            splice(cell_text(blocks, b, r, c), at, at, &req.text);
        }
        Request::InsertInlineImage(req) => {
            let index = req.location.index;
            let (b, r, c, text_start) = locate_cell(&layout, index, index)?;
            let at = (index - text_start) as usize;
            splice(cell_text(blocks, b, r, c), at, at, &IMAGE.to_string());
        }
        Request::InsertTableRow(req) => {
            let loc = &req.table_cell_location;
            let b = locate_table(&layout, loc.table_start_location.index)?;
            let rows = table_rows(blocks, b);
            let row = loc.row_index as usize;
            if row >= rows.len() {
                return Err(rejected(format!("Invalid requests: row {row} out of range")));
            }
            let width = rows[0].len();
            let at = if req.insert_below { row + 1 } else { row };
            rows.insert(at, vec![String::new(); width]);
        }
        Request::InsertTableColumn(req) => {
            let loc = &req.table_cell_location;
            let b = locate_table(&layout, loc.table_start_location.index)?;
            let rows = table_rows(blocks, b);
            let column = loc.column_index as usize;
            if column >= rows[0].len() {
                return Err(rejected(format!("Invalid requests: column {column} out of range")));
            }
            let at = if req.insert_right { column + 1 } else { column };
            for row in rows.iter_mut() {
                row.insert(at, String::new());
            }
        }
        Request::DeleteTableRow(req) => {
            let loc = &req.table_cell_location;
            let b = locate_table(&layout, loc.table_start_location.index)?;
            let rows = table_rows(blocks, b);
            let row = loc.row_index as usize;
            if row >= rows.len() {
                return Err(rejected(format!("Invalid requests: row {row} out of range")));
            }
            rows.remove(row);
            if rows.is_empty() {
                blocks.remove(b);
            }
        }
        Request::DeleteTableColumn(req) => {
            let loc = &req.table_cell_location;
            let b = locate_table(&layout, loc.table_start_location.index)?;
            let rows = table_rows(blocks, b);
            let column = loc.column_index as usize;
            if column >= rows[0].len() {
                return Err(rejected(format!("Invalid requests: column {column} out of range")));
            }
            for row in rows.iter_mut() {
                row.remove(column);
            }
            if rows[0].is_empty() {
                blocks.remove(b);
            }
        }
        Request::InsertTable(req) => {
            let empty = Block::Table(vec![vec![String::new(); req.columns as usize]; req.rows as usize]);
            match (&req.location, &req.end_of_segment_location) {
                (Some(location), None) => {
                    let index = location.index;
                    let b = layout
                        .iter()
                        .position(|l| matches!(l, Layout::Paragraph { start, end } if *start <= index && index < *end))
                        .ok_or_else(|| rejected(format!("Invalid requests: cannot insert a table at {index}")))?;
                    let Layout::Paragraph { start, .. } = layout[b] else {
                        unreachable!("position matched a paragraph");
                    };
                    let Block::Paragraph(text) = blocks[b].clone() else {
                        unreachable!("layout and blocks disagree");
                    };
                    let mut before = text.clone();
                    splice(&mut before, (index - start) as usize, text.encode_utf16().count(), "");
                    let mut after = text;
                    splice(&mut after, 0, (index - start) as usize, "");
                    blocks.splice(b..=b, [Block::Paragraph(before), empty, Block::Paragraph(after)]);
                }
                (None, Some(_)) => {
                    blocks.push(empty);
                    blocks.push(Block::Paragraph(String::new()));
                }
                _ => return Err(rejected("Invalid requests: set exactly one table location".into())),
            }
        }
    }
    Ok(())
}
