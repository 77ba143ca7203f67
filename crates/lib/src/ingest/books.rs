//! # Book Catalog Reader
//!
//! Streams `BookRecord`s out of a catalog CSV with `Title`, `Authors`,
//! `Description`, and `Category` columns. Rows with a blank title or
//! description are dropped here, at the iteration source, so the rest of the
//! pipeline only ever sees valid records.

use crate::ingest::{BookRecord, IngestError};
use csv::StringRecord;
use std::fs::File;
use std::path::Path;
use tracing::warn;

const COL_TITLE: &str = "Title";
const COL_AUTHORS: &str = "Authors";
const COL_DESCRIPTION: &str = "Description";
const COL_CATEGORY: &str = "Category";

/// Opens the catalog CSV and returns a lazy iterator of valid records.
///
/// The file is streamed row by row; it is never loaded into memory as a
/// whole, so the input size is unbounded. Rows that fail to parse are logged
/// and skipped.
pub fn read_books(path: &Path) -> Result<impl Iterator<Item = BookRecord>, IngestError> {
    let file = File::open(path)
        .map_err(|e| IngestError::SourceNotFound(format!("{}: {e}", path.display())))?;
    let mut reader = csv::Reader::from_reader(file);
    let headers = reader.headers()?.clone();

    let title_idx = column_index(&headers, COL_TITLE)?;
    let authors_idx = column_index(&headers, COL_AUTHORS).ok();
    let description_idx = column_index(&headers, COL_DESCRIPTION)?;
    let category_idx = column_index(&headers, COL_CATEGORY).ok();

    Ok(reader.into_records().filter_map(move |row| {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warn!("Skipping unreadable CSV row: {e}");
                return None;
            }
        };

        let title = field(&row, Some(title_idx)).trim().to_string();
        let summary = field(&row, Some(description_idx)).trim().to_string();
        if title.is_empty() || summary.is_empty() {
            return None;
        }

        Some(BookRecord {
            title,
            authors: split_list(field(&row, authors_idx)),
            summary,
            categories: split_list(field(&row, category_idx)),
        })
    }))
}

fn column_index(headers: &StringRecord, name: &str) -> Result<usize, IngestError> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| IngestError::SourceNotFound(format!("Missing CSV column '{name}'")))
}

fn field<'a>(row: &'a StringRecord, idx: Option<usize>) -> &'a str {
    idx.and_then(|i| row.get(i)).unwrap_or("")
}

/// Splits a comma-separated cell into trimmed, non-empty elements.
fn split_list(cell: &str) -> Vec<String> {
    cell.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
