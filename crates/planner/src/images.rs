//! Replacement of marker text inside table cells by inline images.

use crate::error::PlanError;
use crate::ops::EditOp;
use crate::snapshot::{ContentKind, Grid, OffsetRange};

/// Which tables are searched for the marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReplaceScope {
    /// Only the table selected by index.
    #[default]
    Table,
    AllTables,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageReplacement {
    pub marker: String,
    pub image_uri: String,
    /// Points.
    pub width: f64,
    /// Points.
    pub height: f64,
    pub scope: ReplaceScope,
}

impl ImageReplacement {
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.marker.is_empty() {
            return Err(PlanError::InvalidImageReplacement("marker text is empty".into()));
        }
        if self.image_uri.trim().is_empty() {
            return Err(PlanError::InvalidImageReplacement("image URI is empty".into()));
        }
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(PlanError::InvalidImageReplacement(format!(
                "image size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Every occurrence of `marker` inside text runs of `grid`, in document order.
///
/// Offsets are in UTF-16 code units, the service's index unit. Matches never
/// span two runs.
pub fn find_markers(grid: &Grid, marker: &str) -> Vec<OffsetRange> {
    if marker.is_empty() {
        return Vec::new();
    }
    let marker_units = utf16_len(marker);
    let mut found = Vec::new();
    for cell in grid.cells() {
        for item in cell.items() {
            let ContentKind::Text(text) = &item.kind else {
                continue;
            };
            for (byte_offset, _) in text.match_indices(marker) {
                let start = item.range.start + utf16_len(&text[..byte_offset]);
                found.push(OffsetRange::new(start, start + marker_units));
            }
        }
    }
    found
}

/// Delete each marker and insert the image at its start, last marker first.
pub fn plan_image_replacement(grids: &[Grid], replacement: &ImageReplacement) -> Result<Vec<EditOp>, PlanError> {
    replacement.validate()?;

    let mut matches: Vec<OffsetRange> = grids
        .iter()
        .flat_map(|grid| find_markers(grid, &replacement.marker))
        .collect();
    matches.sort_by(|a, b| b.start.cmp(&a.start));

    let mut ops = Vec::with_capacity(matches.len() * 2);
    for range in matches {
        ops.push(EditOp::DeleteRange { start: range.start, end: range.end });
        ops.push(EditOp::InsertInlineImage {
            index: range.start,
            uri: replacement.image_uri.clone(),
            width: replacement.width,
            height: replacement.height,
        });
    }
    Ok(ops)
}

fn utf16_len(s: &str) -> i64 {
    s.encode_utf16().count() as i64
}
