use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// A missing file and a corrupt file are different failures; callers need to
/// tell them apart.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("file not found: {0}")]
    NotFound(String),
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("io error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("csv error on {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

fn io_err(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.display().to_string(),
        source,
    }
}

pub fn read_json_file(path: &Path) -> Result<Value, StorageError> {
    if !path.exists() {
        return Err(StorageError::NotFound(path.display().to_string()));
    }

    let file = File::open(path).map_err(|e| io_err(path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| StorageError::Parse {
        path: path.display().to_string(),
        source: e,
    })
}

/// Pretty-printed with a four-space indent, UTF-8, non-ASCII left as-is.
pub fn write_json_file<T: Serialize>(path: &Path, data: &T) -> Result<(), StorageError> {
    let file = File::create(path).map_err(|e| io_err(path, e))?;
    let mut writer = BufWriter::new(file);

    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut writer, formatter);
    data.serialize(&mut ser).map_err(|e| StorageError::Parse {
        path: path.display().to_string(),
        source: e,
    })?;

    writer.flush().map_err(|e| io_err(path, e))
}

#[derive(Debug)]
pub struct CsvTable {
    pub header: Option<Vec<String>>,
    pub rows: Vec<Vec<String>>,
}

/// Read a whole CSV file into memory. Rows are consumed while the reader
/// still holds the file open. With `has_header` the first row is split off;
/// with `strip_trail` every field is whitespace-trimmed.
pub fn read_csv_to_list(
    path: &Path,
    has_header: bool,
    strip_trail: bool,
) -> Result<CsvTable, StorageError> {
    let file = File::open(path).map_err(|e| io_err(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| StorageError::Csv {
            path: path.display().to_string(),
            source: e,
        })?;
        let row = record
            .iter()
            .map(|field| {
                if strip_trail {
                    field.trim().to_string()
                } else {
                    field.to_string()
                }
            })
            .collect();
        rows.push(row);
    }

    if has_header && !rows.is_empty() {
        let header = rows.remove(0);
        Ok(CsvTable {
            header: Some(header),
            rows,
        })
    } else {
        Ok(CsvTable { header: None, rows })
    }
}
