use csv::{QuoteStyle, ReaderBuilder, Terminator, WriterBuilder};
use flat2sql_common::{Flat2SqlError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::column::{ColumnAccumulator, ColumnProfile};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileProfile {
    pub total_rows: u64,
    pub columns: Vec<ColumnProfile>,
}

/// Profile a delimited file without writing a cleaned copy.
pub fn scan_file(path: &Path, delimiter: u8) -> Result<FileProfile> {
    scan_inner(path, delimiter, None, "")
}

/// Profile a delimited file and write a cleaned copy alongside: every row
/// echoed byte-for-byte except empty data fields, which are replaced by
/// `sentinel`. The header row is echoed unchanged; the generated import
/// statements skip it.
pub fn scan_with_cleaned(
    path: &Path,
    delimiter: u8,
    cleaned_path: &Path,
    sentinel: &str,
) -> Result<FileProfile> {
    scan_inner(path, delimiter, Some(cleaned_path), sentinel)
}

fn scan_inner(
    path: &Path,
    delimiter: u8,
    cleaned_path: Option<&Path>,
    sentinel: &str,
) -> Result<FileProfile> {
    let file = std::fs::File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .quoting(false) // raw split semantics, quotes are ordinary bytes
        .flexible(true) // field-count mismatches are our error, not csv's
        .from_reader(std::io::BufReader::new(file));

    let mut writer = match cleaned_path {
        Some(p) => Some(
            WriterBuilder::new()
                .delimiter(delimiter)
                .quote_style(QuoteStyle::Never)
                .terminator(Terminator::Any(b'\n'))
                .from_path(p)?,
        ),
        None => None,
    };

    let mut records = reader.records();
    let header = match records.next() {
        Some(r) => r?,
        None => {
            return Err(Flat2SqlError::Other(format!(
                "{}: empty file, no header row",
                path.display()
            )))
        }
    };
    let ncols = header.len();
    let mut accs: Vec<ColumnAccumulator> = header
        .iter()
        .enumerate()
        .map(|(i, name)| ColumnAccumulator::new(i, name))
        .collect();
    if let Some(w) = writer.as_mut() {
        w.write_record(&header)?;
    }

    let mut total_rows = 0u64;
    for (row_idx, record) in records.enumerate() {
        let record = record?;
        if record.len() != ncols {
            // abort rather than skip: a silently dropped row would desync
            // the cleaned file from the counts backing the DDL
            return Err(Flat2SqlError::Format {
                row: row_idx as u64 + 2, // header is row 1
                expected: ncols,
                found: record.len(),
            });
        }
        total_rows += 1;
        let mut cleaned_row: Vec<&str> = Vec::with_capacity(ncols);
        for (i, field) in record.iter().enumerate() {
            if field.is_empty() {
                accs[i].add_empty();
                cleaned_row.push(sentinel);
            } else {
                accs[i].add_value(field);
                cleaned_row.push(field);
            }
        }
        if let Some(w) = writer.as_mut() {
            w.write_record(&cleaned_row)?;
        }
    }
    if let Some(w) = writer.as_mut() {
        w.flush()?;
    }

    let columns: Vec<ColumnProfile> = accs.into_iter().map(ColumnAccumulator::finish).collect();
    tracing::debug!(
        rows = total_rows,
        cols = ncols,
        path = %path.display(),
        "scan complete"
    );
    Ok(FileProfile {
        total_rows,
        columns,
    })
}
