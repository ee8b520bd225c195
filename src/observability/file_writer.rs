//! Line-oriented trace file with size-based rotation.
//!
//! When a write would take the file past the size limit, the file is shifted
//! to `<path>.1`, older backups move up by one (`.1` → `.2`, ...), and the
//! oldest beyond the retention count is deleted.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Default size limit of the active trace file (5 MiB).
pub const DEFAULT_MAX_BYTES: u64 = 5 * 1024 * 1024;

/// Default number of rotated backups kept next to the active file.
pub const DEFAULT_BACKUPS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    pub max_bytes: u64,
    pub backups: usize,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            backups: DEFAULT_BACKUPS,
        }
    }
}

struct OpenFile {
    file: File,
    written: u64,
}

/// Appends lines to a file, rotating it by size. Safe to share across threads.
pub struct FileWriter {
    path: PathBuf,
    policy: RotationPolicy,
    current: Mutex<Option<OpenFile>>,
}

impl FileWriter {
    /// Creates a writer. The file is opened on the first write.
    #[must_use]
    pub const fn new(path: PathBuf, policy: RotationPolicy) -> Self {
        Self {
            path,
            policy,
            current: Mutex::new(None),
        }
    }

    /// Appends `line` and a newline, rotating first if the line would not fit.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be rotated, opened or written.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        let needed = line.len() as u64 + 1;

        if let Some(open) = current.as_ref() {
            if open.written > 0 && open.written + needed > self.policy.max_bytes {
                *current = None;
                self.rotate()?;
            }
        }

        if current.is_none() {
            *current = Some(self.open()?);
        }
        let Some(open) = current.as_mut() else {
            return Err(io::Error::new(io::ErrorKind::Other, "trace file unavailable"));
        };

        writeln!(open.file, "{line}")?;
        open.file.flush()?;
        open.written += needed;
        Ok(())
    }

    fn open(&self) -> io::Result<OpenFile> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let written = file.metadata()?.len();
        Ok(OpenFile { file, written })
    }

    fn rotate(&self) -> io::Result<()> {
        if self.policy.backups == 0 {
            return fs::remove_file(&self.path).or_else(ignore_missing);
        }

        fs::remove_file(self.backup_path(self.policy.backups)).or_else(ignore_missing)?;
        for index in (1..self.policy.backups).rev() {
            let from = self.backup_path(index);
            if from.exists() {
                fs::rename(&from, self.backup_path(index + 1))?;
            }
        }
        fs::rename(&self.path, self.backup_path(1)).or_else(ignore_missing)
    }

    /// Path of the `index`-th backup, `1` being the newest.
    #[must_use]
    pub fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".{index}"));
        PathBuf::from(name)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn ignore_missing(e: io::Error) -> io::Result<()> {
    if e.kind() == io::ErrorKind::NotFound {
        Ok(())
    } else {
        Err(e)
    }
}

impl std::fmt::Debug for FileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWriter")
            .field("path", &self.path)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
