//! Snapshot builders for unit tests. Layout follows the service: one unit
//! for the row marker, one for the cell marker, then the cell's paragraph.

use gdoctable_protocol::{
    Paragraph, ParagraphElement, StructuralElement, Table, TableCell, TableRow, TextRun,
};

use crate::snapshot::{parse_table, Grid};

pub fn table_element(start: i64, values: &[Vec<&str>]) -> StructuralElement {
    let mut offset = start + 1;
    let mut table_rows = Vec::new();
    for row in values {
        let row_start = offset;
        offset += 1;
        let mut table_cells = Vec::new();
        for text in row {
            let cell_start = offset;
            offset += 1;
            let content = format!("{text}\n");
            let end = offset + content.encode_utf16().count() as i64;
            let paragraph = StructuralElement {
                start_index: offset,
                end_index: end,
                paragraph: Some(Paragraph {
                    elements: vec![ParagraphElement {
                        start_index: offset,
                        end_index: end,
                        text_run: Some(TextRun { content }),
                        ..Default::default()
                    }],
                }),
                ..Default::default()
            };
            table_cells.push(TableCell { start_index: cell_start, end_index: end, content: vec![paragraph] });
            offset = end;
        }
        table_rows.push(TableRow { start_index: row_start, end_index: offset, table_cells });
    }
    StructuralElement {
        start_index: start,
        end_index: offset + 1,
        table: Some(Table {
            rows: values.len() as i64,
            columns: values.first().map_or(0, |r| r.len()) as i64,
            table_rows,
        }),
        ..Default::default()
    }
}

pub fn grid_from(start: i64, values: &[Vec<&str>]) -> Grid {
    parse_table(&table_element(start, values)).unwrap()
}

pub fn blank_grid(rows: usize, columns: usize, start: i64) -> Grid {
    let values = vec![vec![""; columns]; rows];
    grid_from(start, &values)
}
