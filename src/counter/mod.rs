// src/counter/mod.rs

pub mod lock;

use crate::error::{AppError, Result};
use crate::utils::replace_contents;
use lock::LockFile;
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{debug, info, warn};

/// Value issued when the counter file is missing or unreadable.
pub const FIRST_NUMBER: u64 = 1;

/// Persistent "next document number" stored as plain text in a single file.
///
/// The file holds the number the *next* run will issue. Reading and writing
/// happen under an OS lock on a sibling `.lock` file, and the new value
/// replaces the old one by rename, so a reader never observes a half-written
/// number.
pub struct DocumentCounter {
    path: PathBuf,
    lock_timeout: Duration,
}

/// A number taken from the counter but not yet consumed.
///
/// Holds the lock until dropped. `commit` advances the counter; dropping
/// without committing leaves the counter file as it was.
#[derive(Debug)]
pub struct Reservation {
    number: u64,
    next: u64,
    path: PathBuf,
    _lock: LockFile,
}

impl DocumentCounter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Lock the counter and read the number to issue.
    ///
    /// Fails before anything is written when the number has no successor.
    #[tracing::instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    pub fn reserve(&self) -> Result<Reservation> {
        let lock = LockFile::acquire(&self.path, self.lock_timeout)?;
        let number = read_current(&self.path)?;
        let next = number
            .checked_add(1)
            .ok_or_else(|| AppError::Unexpected(format!("counter overflow at {}", number)))?;
        debug!(number, "reserved");
        Ok(Reservation {
            number,
            next,
            path: self.path.clone(),
            _lock: lock,
        })
    }

    /// Read the current number, persist its successor, return the current one.
    pub fn issue(&self) -> Result<u64> {
        let reservation = self.reserve()?;
        let number = reservation.number();
        reservation.commit()?;
        Ok(number)
    }
}

impl Reservation {
    pub fn number(&self) -> u64 {
        self.number
    }

    /// Persist `number + 1` and release the lock.
    pub fn commit(self) -> Result<()> {
        replace_contents(&self.path, self.next.to_string().as_bytes())?;
        info!(issued = self.number, next = self.next, "counter advanced");
        Ok(())
    }
}

fn read_current(path: &Path) -> Result<u64> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("no counter file, starting at {}", FIRST_NUMBER);
            return Ok(FIRST_NUMBER);
        }
        Err(e) => return Err(e.into()),
    };
    match raw.trim().parse::<u64>() {
        Ok(n) => Ok(n),
        Err(e) => {
            warn!(content = %raw.trim(), "unparsable counter ({}), starting at {}", e, FIRST_NUMBER);
            Ok(FIRST_NUMBER)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_issues_one() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("counter.txt");
        let counter = DocumentCounter::new(&path);

        assert_eq!(counter.issue()?, 1);
        assert_eq!(fs::read_to_string(&path)?, "2");
        Ok(())
    }

    #[test]
    fn test_round_trip() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("counter.txt");
        fs::write(&path, "41")?;
        let counter = DocumentCounter::new(&path);

        assert_eq!(counter.issue()?, 41);
        assert_eq!(fs::read_to_string(&path)?, "42");
        assert_eq!(counter.issue()?, 42);
        assert_eq!(fs::read_to_string(&path)?, "43");
        Ok(())
    }

    #[test]
    fn test_whitespace_is_ignored() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("counter.txt");
        fs::write(&path, " 7\r\n")?;
        assert_eq!(DocumentCounter::new(&path).issue()?, 7);
        assert_eq!(fs::read_to_string(&path)?, "8");
        Ok(())
    }

    #[test]
    fn test_corrupt_file_restarts_at_one() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("counter.txt");
        for junk in ["abc", "", "-5", "3.5"] {
            fs::write(&path, junk)?;
            assert_eq!(DocumentCounter::new(&path).issue()?, 1, "content {:?}", junk);
            assert_eq!(fs::read_to_string(&path)?, "2");
        }
        Ok(())
    }

    #[test]
    fn test_dropped_reservation_leaves_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("counter.txt");
        fs::write(&path, "10")?;
        let counter = DocumentCounter::new(&path);

        {
            let r = counter.reserve()?;
            assert_eq!(r.number(), 10);
        }
        assert_eq!(fs::read_to_string(&path)?, "10");

        // lock was released, so the next reservation succeeds
        assert_eq!(counter.issue()?, 10);
        Ok(())
    }

    #[test]
    fn test_concurrent_reserve_times_out() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("counter.txt");
        let counter = DocumentCounter::new(&path).with_lock_timeout(Duration::from_millis(100));

        let held = counter.reserve()?;
        let err = counter.reserve().unwrap_err();
        assert!(matches!(err, AppError::CounterLocked { .. }));
        held.commit()?;
        assert_eq!(counter.issue()?, 2);
        Ok(())
    }

    #[test]
    fn test_abandoned_lock_file_does_not_block() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("counter.txt");
        fs::write(&path, "4")?;
        // a killed run leaves its lock file behind, but not its lock
        fs::write(LockFile::path_for(&path), "12345")?;

        let counter = DocumentCounter::new(&path).with_lock_timeout(Duration::from_millis(100));
        assert_eq!(counter.issue()?, 4);
        assert_eq!(fs::read_to_string(&path)?, "5");
        Ok(())
    }

    #[test]
    fn test_overflow_rejected_at_reserve() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("counter.txt");
        fs::write(&path, u64::MAX.to_string())?;

        let err = DocumentCounter::new(&path).reserve().unwrap_err();
        assert!(matches!(err, AppError::Unexpected(_)));
        assert_eq!(fs::read_to_string(&path)?, u64::MAX.to_string());
        Ok(())
    }
}
