//! Caller-supplied values and their resolution into conflict-free assignments.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CellAddress, PlanError};

/// A scalar cell value, resolved once from caller input.
#[derive(Debug, Clone, PartialEq)]
pub enum CellInput {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl CellInput {
    /// Classify a raw JSON value. Anything but a number or string is rejected.
    pub fn from_json(value: &Value, address: CellAddress) -> Result<Self, PlanError> {
        match value {
            Value::String(s) => Ok(Self::Text(s.clone())),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Self::Integer(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Self::Float(f))
                } else {
                    Err(unsupported(address, value))
                }
            }
            other => Err(unsupported(address, other)),
        }
    }

    /// Text written into the cell. Empty text clears the cell.
    pub fn into_text(self) -> String {
        match self {
            Self::Integer(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => s,
        }
    }
}

fn unsupported(address: CellAddress, value: &Value) -> PlanError {
    let found = match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    PlanError::UnsupportedValueType { address, found: found.to_string() }
}

/// Top-left corner a block of values is written at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockOrigin {
    #[serde(rename = "startRowIndex", default)]
    pub row: usize,
    #[serde(rename = "startColumnIndex", default)]
    pub col: usize,
}

/// A rectangular-ish block of values anchored at `range`. Rows may be ragged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueBlock {
    #[serde(default)]
    pub range: BlockOrigin,
    #[serde(default)]
    pub values: Vec<Vec<Value>>,
}

impl ValueBlock {
    pub fn at(row: usize, col: usize, values: Vec<Vec<Value>>) -> Self {
        Self { range: BlockOrigin { row, col }, values }
    }

    /// A 2-D array written from the top-left cell.
    pub fn from_array(values: Vec<Vec<Value>>) -> Self {
        Self::at(0, 0, values)
    }
}

/// One resolved absolute write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub row: usize,
    pub col: usize,
    pub value: String,
}

impl Assignment {
    pub fn new(row: usize, col: usize, value: impl Into<String>) -> Self {
        Self { row, col, value: value.into() }
    }

    pub fn address(&self) -> CellAddress {
        CellAddress::new(self.row, self.col)
    }
}

/// Flatten blocks into assignments sorted by (row, col).
///
/// Blocks are walked in order, then rows, then columns. The second value for
/// an address makes it a duplicate even when both values are equal; all
/// duplicates are collected before failing.
pub fn resolve(blocks: &[ValueBlock]) -> Result<Vec<Assignment>, PlanError> {
    let mut resolved: BTreeMap<CellAddress, String> = BTreeMap::new();
    let mut duplicates: BTreeSet<CellAddress> = BTreeSet::new();

    for block in blocks {
        for (r, row) in block.values.iter().enumerate() {
            for (c, raw) in row.iter().enumerate() {
                let address = CellAddress::new(block.range.row + r, block.range.col + c);
                let text = CellInput::from_json(raw, address)?.into_text();
                if resolved.contains_key(&address) {
                    duplicates.insert(address);
                } else {
                    resolved.insert(address, text);
                }
            }
        }
    }

    if !duplicates.is_empty() {
        return Err(PlanError::DuplicateAddress(duplicates.into_iter().collect()));
    }

    Ok(resolved
        .into_iter()
        .map(|(address, value)| Assignment::new(address.row, address.col, value))
        .collect())
}
