//! JSON arguments: inline text, `@path` for a file, or `-` for stdin.

use std::io::Read;

use gdoctable_planner::ValueBlock;
use serde_json::Value;

/// Read a JSON argument.
pub fn read_json_arg(arg: &str) -> Result<Value, String> {
    let text = if arg == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("cannot read stdin: {}", e))?;
        buf
    } else if let Some(path) = arg.strip_prefix('@') {
        std::fs::read_to_string(path).map_err(|e| format!("cannot read {}: {}", path, e))?
    } else {
        arg.to_string()
    };
    serde_json::from_str(&text).map_err(|e| format!("invalid JSON: {}", e))
}

/// A 2-D array of cell values.
pub fn parse_values(value: Value) -> Result<Vec<Vec<Value>>, String> {
    let Value::Array(rows) = value else {
        return Err("values must be a JSON array of rows".into());
    };
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| match row {
            Value::Array(cells) => Ok(cells),
            other => Err(format!("row {} must be an array, got {}", i, other)),
        })
        .collect()
}

/// Value blocks: an array of `{"range": {...}, "values": [[...]]}` objects,
/// or a single such object.
pub fn parse_blocks(value: Value) -> Result<Vec<ValueBlock>, String> {
    let value = match value {
        Value::Object(_) => Value::Array(vec![value]),
        other => other,
    };
    serde_json::from_value(value).map_err(|e| format!("invalid value blocks: {}", e))
}
