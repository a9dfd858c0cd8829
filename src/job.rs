use crate::BackupError;
use crate::constants::{ARCHIVE_EXTENSION, FILE_EXTENSION};
use clap::ValueEnum;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Where backups of an invocation are written.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DestinationMode {
    /// Next to the source, in its parent directory.
    #[default]
    SameDir,
    /// In the process working directory.
    CurrentDir,
    /// In an existing directory chosen by the user.
    ExplicitDir(PathBuf),
}

/// One source to back up, sharing the invocation's destination mode.
#[derive(Debug, Clone, Copy)]
pub struct BackupRequest<'a> {
    pub source: &'a Path,
    pub mode: &'a DestinationMode,
}

/// What a source turned out to be when probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    File,
    Directory,
}

impl Kind {
    /// Extension appended after the timestamp.
    pub fn extension(self) -> &'static str {
        match self {
            Kind::File => FILE_EXTENSION,
            Kind::Directory => ARCHIVE_EXTENSION,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::File => f.write_str("file"),
            Kind::Directory => f.write_str("directory"),
        }
    }
}

/// A source paired with the path its backup will be written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBackup {
    pub source: PathBuf,
    pub backup_path: PathBuf,
    pub kind: Kind,
}

/// Result of producing one backup.
#[derive(Debug)]
pub struct BackupOutcome {
    pub resolved: ResolvedBackup,
    pub error: Option<BackupError>,
}

impl BackupOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Running count of successes and failures over an invocation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub succeeded: usize,
    pub failed: usize,
}

impl Tally {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Supported gzip compression levels for directory archives.
#[derive(ValueEnum, Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Fastest,
    Faster,
    #[default]
    Default,
    Better,
    Best,
}

impl From<Level> for Compression {
    fn from(level: Level) -> Self {
        match level {
            Level::Fastest => Compression::fast(),
            Level::Faster => Compression::new(3),
            Level::Default => Compression::default(),
            Level::Better => Compression::new(8),
            Level::Best => Compression::best(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_extension() {
        assert_eq!(Kind::File.extension(), "backup");
        assert_eq!(Kind::Directory.extension(), "tar.gz");
        assert_eq!(Kind::Directory.to_string(), "directory");
    }

    #[test]
    fn test_tally() {
        let tally = Tally {
            succeeded: 2,
            failed: 1,
        };
        assert_eq!(tally.total(), 3);
        assert!(!tally.all_succeeded());
        assert!(Tally::default().all_succeeded());
    }

    #[test]
    fn test_level_to_compression() {
        assert_eq!(Compression::from(Level::Fastest).level(), 1);
        assert_eq!(Compression::from(Level::Default).level(), 6);
        assert_eq!(Compression::from(Level::Best).level(), 9);
    }
}
