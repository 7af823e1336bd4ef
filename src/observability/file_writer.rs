//! Rotating log file writer with size-based rotation and backup retention.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

/// Maximum file size before rotation (10 MB).
const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Number of backup files to retain after rotation.
const MAX_BACKUP_FILES: usize = 3;

/// Thread-safe rotating file writer.
///
/// Before each write the current file's size is checked; past the threshold
/// it is renamed to `<name>.<unix_millis>` and a fresh file is started. Only
/// the newest backups are kept.
///
/// `&RotatingFileWriter` implements [`io::Write`], so an
/// `Arc<RotatingFileWriter>` can be handed straight to a
/// `tracing_subscriber::fmt` layer.
pub struct RotatingFileWriter {
    file_path: PathBuf,
    max_bytes: u64,
    max_backups: usize,
    /// Opened lazily on first write.
    file: Mutex<Option<File>>,
}

impl RotatingFileWriter {
    #[must_use]
    pub const fn new(file_path: PathBuf) -> Self {
        Self {
            file_path,
            max_bytes: MAX_FILE_SIZE_BYTES,
            max_backups: MAX_BACKUP_FILES,
            file: Mutex::new(None),
        }
    }

    /// Overrides the rotation threshold and retention count.
    #[must_use]
    pub fn with_limits(mut self, max_bytes: u64, max_backups: usize) -> Self {
        self.max_bytes = max_bytes;
        self.max_backups = max_backups;
        self
    }

    fn lock(&self) -> io::Result<MutexGuard<'_, Option<File>>> {
        self.file
            .lock()
            .map_err(|e| io::Error::other(format!("log writer poisoned: {e}")))
    }

    fn write_bytes(&self, buf: &[u8]) -> io::Result<()> {
        let mut file = self.lock()?;

        if fs::metadata(&self.file_path).is_ok_and(|m| m.len() > self.max_bytes) {
            *file = None;
            self.rotate()?;
        }

        if file.is_none() {
            *file = Some(
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&self.file_path)?,
            );
        }

        match file.as_mut() {
            Some(f) => f.write_all(buf),
            None => Err(io::Error::other("log file unavailable")),
        }
    }

    fn rotate(&self) -> io::Result<()> {
        let millis = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();

        let mut backup = self.file_path.clone().into_os_string();
        backup.push(format!(".{millis}"));
        fs::rename(&self.file_path, PathBuf::from(backup))?;

        self.cleanup_old_backups()
    }

    fn cleanup_old_backups(&self) -> io::Result<()> {
        let parent_dir = self
            .file_path
            .parent()
            .ok_or_else(|| io::Error::other("log file has no parent directory"))?;
        let prefix = self
            .file_path
            .file_name()
            .and_then(|s| s.to_str())
            .map(|name| format!("{name}."))
            .ok_or_else(|| io::Error::other("invalid log file name"))?;

        let mut backups: Vec<PathBuf> = fs::read_dir(parent_dir)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with(&prefix))
            })
            .collect();

        // Newest first; the suffix is a millisecond timestamp.
        backups.sort_by(|a, b| b.file_name().cmp(&a.file_name()));

        for old_backup in backups.iter().skip(self.max_backups) {
            let _ = fs::remove_file(old_backup);
        }

        Ok(())
    }
}

impl Write for &RotatingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_bytes(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lock()?.as_mut().map_or(Ok(()), Write::flush)
    }
}

impl std::fmt::Debug for RotatingFileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingFileWriter")
            .field("file_path", &self.file_path)
            .field("max_bytes", &self.max_bytes)
            .finish_non_exhaustive()
    }
}
