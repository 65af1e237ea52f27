//! Parser for JSON-Lines snapshot files.
//!
//! Each collection is exported as one document per line, e.g.
//! `products.jsonl`, `orders.jsonl`, `users.jsonl`, `categories.jsonl`.
//! Blank lines are ignored; any other line that fails to decode aborts the
//! load with the file name and line number.

use crate::error::{CatalogError, Result};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::warn;

/// Decode every non-blank line of `reader` as a `T`.
///
/// `file` is only used for error messages.
pub fn parse_jsonl<T, R>(reader: R, file: &str) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: BufRead,
{
    let mut documents = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }

        let document = serde_json::from_str(line_trimmed).map_err(|e| CatalogError::ParseError {
            file: file.to_string(),
            line: line_no,
            reason: e.to_string(),
        })?;
        documents.push(document);
    }

    Ok(documents)
}

/// Read a collection that must be present in the snapshot.
pub fn read_collection<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path).map_err(|_| CatalogError::FileNotFound {
        path: path.display().to_string(),
    })?;
    parse_jsonl(BufReader::new(file), &file_name(path))
}

/// Read a collection that may be absent; a missing file yields no documents.
pub fn read_optional_collection<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        warn!("{} not found, treating collection as empty", path.display());
        return Ok(Vec::new());
    }
    read_collection(path)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
