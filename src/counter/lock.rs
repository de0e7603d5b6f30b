use crate::error::{AppError, Result};
use std::{
    fs::{File, OpenOptions, TryLockError},
    io::{Seek, SeekFrom, Write},
    path::{Path, PathBuf},
    thread,
    time::{Duration, Instant},
};
use tracing::debug;

const RETRY_EVERY: Duration = Duration::from_millis(50);

/// Exclusive OS lock on a sibling `<file>.lock`.
///
/// The lock lives on the open handle, not on the file's existence: it is
/// released when the handle closes, including when the holding process dies,
/// so a leftover `.lock` file never blocks a later run. Only cooperating
/// runs honour it.
#[derive(Debug)]
pub struct LockFile {
    path: PathBuf,
    _file: File,
}

impl LockFile {
    /// Lock path for `target`: the same file name with `.lock` appended.
    pub fn path_for(target: &Path) -> PathBuf {
        let mut name = target.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    /// Lock `target`, waiting up to `timeout` for a concurrent holder to
    /// release it.
    pub fn acquire(target: &Path, timeout: Duration) -> Result<Self> {
        let path = Self::path_for(target);
        let mut file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(|e| AppError::write(&path, e))?;

        let start = Instant::now();
        loop {
            match file.try_lock() {
                Ok(()) => break,
                Err(TryLockError::WouldBlock) => {
                    if start.elapsed() >= timeout {
                        return Err(AppError::CounterLocked {
                            path: target.to_path_buf(),
                        });
                    }
                    thread::sleep(RETRY_EVERY);
                }
                Err(TryLockError::Error(e)) => return Err(AppError::write(&path, e)),
            }
        }

        // pid is informational only
        let _ = file
            .set_len(0)
            .and_then(|_| file.seek(SeekFrom::Start(0)))
            .and_then(|_| write!(file, "{}", std::process::id()));
        debug!(lock = %path.display(), "acquired");
        Ok(LockFile { path, _file: file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
