pub mod types;

pub use types::{Config, Employee};

use crate::error::{AppError, Result};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tracing::debug;

/// Read and deserialize the JSON configuration at `path`.
#[tracing::instrument(level = "debug", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    // bytes, so text that is not UTF-8 surfaces as a parse error
    let raw = match fs::read(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(AppError::ConfigNotFound {
                path: path.to_path_buf(),
            })
        }
        Err(e) => return Err(e.into()),
    };

    // a UTF-8 BOM is common in files saved by Windows editors
    let raw = raw.strip_prefix(b"\xef\xbb\xbf").unwrap_or(&raw);
    let config: Config = serde_json::from_slice(raw).map_err(|source| AppError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(title = %config.document_title, csv = %config.csv_file_path, "config loaded");
    Ok(config)
}

impl Config {
    /// Location of the CSV file; relative paths are taken from `root`.
    pub fn data_path(&self, root: &Path) -> PathBuf {
        let p = Path::new(&self.csv_file_path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            root.join(p)
        }
    }
}
