use crate::error::{AppError, Result};
use std::{fs, io::Write, path::Path};
use tempfile::NamedTempFile;

/// Write `bytes` to a temp file next to `path`, then rename it over `path`.
/// Either the old content or the complete new content is visible, never a
/// partial write.
pub fn replace_contents(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| AppError::write(dir, e))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| AppError::write(dir, e))?;
    tmp.write_all(bytes)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| AppError::write(tmp.path(), e))?;
    tmp.persist(path)
        .map_err(|e| AppError::write(path, e.error))?;
    Ok(())
}
