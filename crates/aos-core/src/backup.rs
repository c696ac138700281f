//! Backups of customized files
//!
//! Before a forced overwrite, the existing destination is copied to a
//! sibling `<name>.backup.<YYYYmmddHHMMSS>` file. Existing backups are never
//! replaced; a `-<n>` suffix is appended until the name is free.

use aos_fs::{NormalizedPath, io};
use chrono::{DateTime, Utc};

use crate::{Error, Result};

/// Infix between the original file name and the timestamp
pub const BACKUP_INFIX: &str = ".backup.";

const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Upper bound on collision suffixes tried for one file
const MAX_ATTEMPTS: u32 = 1000;

/// Whether `file_name` looks like a backup written by [`BackupManager`].
pub fn is_backup_name(file_name: &str) -> bool {
    let Some(idx) = file_name.rfind(BACKUP_INFIX) else {
        return false;
    };
    let suffix = &file_name[idx + BACKUP_INFIX.len()..];
    let (stamp, counter) = suffix.split_once('-').unwrap_or((suffix, "1"));
    stamp.len() == 14
        && stamp.bytes().all(|b| b.is_ascii_digit())
        && !counter.is_empty()
        && counter.bytes().all(|b| b.is_ascii_digit())
}

/// Creates timestamped sibling backups
#[derive(Debug, Clone)]
pub struct BackupManager {
    /// Timestamp shared by every backup of one run
    timestamp: DateTime<Utc>,
}

impl Default for BackupManager {
    fn default() -> Self {
        Self::new()
    }
}

impl BackupManager {
    /// Create a new BackupManager stamped with the current time
    pub fn new() -> Self {
        Self::with_timestamp(Utc::now())
    }

    pub fn with_timestamp(timestamp: DateTime<Utc>) -> Self {
        Self { timestamp }
    }

    /// Backup path for `destination`, with collision suffix `attempt` when non-zero.
    pub fn backup_path(&self, destination: &NormalizedPath, attempt: u32) -> Result<NormalizedPath> {
        let parent = destination.parent().ok_or_else(|| Error::InvalidPath {
            message: format!("{} has no parent directory", destination),
        })?;
        let name = destination.file_name().ok_or_else(|| Error::InvalidPath {
            message: format!("{} has no file name", destination),
        })?;

        let stamp = self.timestamp.format(TIMESTAMP_FORMAT);
        let backup_name = if attempt == 0 {
            format!("{}{}{}", name, BACKUP_INFIX, stamp)
        } else {
            format!("{}{}{}-{}", name, BACKUP_INFIX, stamp, attempt)
        };
        Ok(parent.join(&backup_name))
    }

    /// Copy `destination` to a free backup path and return that path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or no backup can be created.
    pub fn backup(&self, destination: &NormalizedPath) -> Result<NormalizedPath> {
        for attempt in 0..MAX_ATTEMPTS {
            let candidate = self.backup_path(destination, attempt)?;
            match io::copy_new(destination, &candidate) {
                Ok(()) => {
                    tracing::info!(from = %destination, to = %candidate, "Backed up customized file");
                    return Ok(candidate);
                }
                Err(e) if e.io_kind() == Some(std::io::ErrorKind::AlreadyExists) => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(Error::InvalidPath {
            message: format!("no free backup name for {}", destination),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::fs;
    use tempfile::TempDir;

    fn fixed() -> BackupManager {
        BackupManager::with_timestamp(Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap())
    }

    #[test]
    fn backup_path_is_a_timestamped_sibling() {
        let path = fixed()
            .backup_path(&NormalizedPath::new("/target/standards/code-style.md"), 0)
            .unwrap();
        assert_eq!(
            path.as_str(),
            "/target/standards/code-style.md.backup.20240309140507"
        );
    }

    #[test]
    fn backup_copies_content() {
        let temp = TempDir::new().unwrap();
        let file = NormalizedPath::new(temp.path().join("a.md"));
        fs::write(file.to_native(), "edited").unwrap();

        let backup = fixed().backup(&file).unwrap();

        assert_eq!(fs::read_to_string(backup.to_native()).unwrap(), "edited");
        assert_eq!(fs::read_to_string(file.to_native()).unwrap(), "edited");
    }

    #[test]
    fn backup_never_replaces_an_existing_backup() {
        let temp = TempDir::new().unwrap();
        let file = NormalizedPath::new(temp.path().join("a.md"));
        fs::write(file.to_native(), "first").unwrap();

        let manager = fixed();
        let first = manager.backup(&file).unwrap();
        fs::write(file.to_native(), "second").unwrap();
        let second = manager.backup(&file).unwrap();

        assert_ne!(first, second);
        assert!(second.as_str().ends_with("-1"));
        assert_eq!(fs::read_to_string(first.to_native()).unwrap(), "first");
        assert_eq!(fs::read_to_string(second.to_native()).unwrap(), "second");
    }

    #[test]
    fn recognizes_backup_names() {
        assert!(is_backup_name("code-style.md.backup.20240309140507"));
        assert!(is_backup_name("code-style.md.backup.20240309140507-2"));
        assert!(!is_backup_name("code-style.md"));
        assert!(!is_backup_name("notes.backup.md"));
        assert!(!is_backup_name("a.md.backup.2024"));
    }

    #[test]
    fn backup_of_missing_file_fails() {
        let temp = TempDir::new().unwrap();
        let file = NormalizedPath::new(temp.path().join("missing.md"));
        assert!(fixed().backup(&file).is_err());
    }
}
