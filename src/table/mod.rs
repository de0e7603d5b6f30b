// src/table/mod.rs
use crate::error::{AppError, Result};
use std::{borrow::Cow, fs, io::ErrorKind, path::Path};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    /// Column names, from the first line of the CSV file.
    pub headers: Vec<String>,
    /// Every following line, as a Vec of Strings (one per field).
    /// Rows may be shorter or longer than `headers`.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Parse CSV text with a bare comma split: no quoting, no trimming.
    /// Returns `None` when the text has no lines at all.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        // lines end in \n, \r\n or a lone \r (classic Mac exports)
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        let mut lines = text.lines();
        let headers = split_line(lines.next()?);
        let rows = lines.map(split_line).collect();
        Some(RawTable { headers, rows })
    }

    /// Fail on the first data row whose cell count differs from the header.
    pub fn check_arity(&self) -> Result<()> {
        let expected = self.headers.len();
        for (idx, row) in self.rows.iter().enumerate() {
            if row.len() != expected {
                return Err(AppError::RaggedRow {
                    // header is line 1
                    line: idx + 2,
                    expected,
                    found: row.len(),
                });
            }
        }
        Ok(())
    }
}

fn split_line(line: &str) -> Vec<String> {
    line.split(',').map(str::to_string).collect()
}

/// Read the CSV file at `path` into headers and rows.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_table<P: AsRef<Path>>(path: P) -> Result<RawTable> {
    let path = path.as_ref();
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(AppError::DataFileNotFound {
                path: path.to_path_buf(),
            })
        }
        Err(e) => return Err(e.into()),
    };

    // a file saved in a legacy code page still yields its layout;
    // undecodable bytes become U+FFFD
    let text = String::from_utf8_lossy(&bytes);
    if let Cow::Owned(_) = text {
        warn!("data file is not valid UTF-8, undecodable bytes replaced");
    }
    let table = RawTable::parse(&text).ok_or_else(|| AppError::EmptyDataFile {
        path: path.to_path_buf(),
    })?;
    debug!(headers = ?table.headers, "parsed header line");
    info!(columns = table.headers.len(), rows = table.rows.len(), "loaded CSV");
    Ok(table)
}
