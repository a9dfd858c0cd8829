//! Error taxonomy for resolving and producing backups.

use crate::sysexits;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while backing up a single source or setting up a run.
///
/// Resolution errors tied to the destination mode ([`BackupError::is_mode_wide`]) abort
/// the whole run; every other variant only fails the source it belongs to.
#[derive(Debug, Error)]
pub enum BackupError {
    /// The source path does not exist.
    #[error("'{}' does not exist", .0.display())]
    SourceNotFound(PathBuf),

    /// The source has no final component to name the backup after, even once canonicalized.
    #[error("'{}' has no name to derive a backup name from", .0.display())]
    InvalidSourceName(PathBuf),

    /// The explicit target directory is absent or is not a directory.
    #[error("target directory '{}' does not exist", .0.display())]
    TargetDirectoryMissing(PathBuf),

    /// The process working directory could not be determined.
    #[error("could not get current directory: {0}")]
    WorkingDirectoryUnavailable(io::Error),

    /// Reading the source (metadata or contents) failed.
    #[error("could not read '{}': {error}", .path.display())]
    SourceUnreadable { path: PathBuf, error: io::Error },

    /// Creating or writing the backup file failed. The backup may be left truncated.
    #[error("could not write '{}': {error}", .path.display())]
    DestinationUnwritable { path: PathBuf, error: io::Error },

    /// The copy succeeded but the source's permission bits could not be applied.
    #[error("could not set permissions on '{}': {error}", .path.display())]
    PermissionPropagationFailed { path: PathBuf, error: io::Error },

    /// Building the archive failed; `diagnostic` holds the archiver's own message.
    #[error("could not create archive '{}': {diagnostic}", .path.display())]
    ArchiveCreationFailed { path: PathBuf, diagnostic: String },
}

impl BackupError {
    /// Returns true for failures caused by the destination mode rather than a source.
    pub fn is_mode_wide(&self) -> bool {
        matches!(
            self,
            BackupError::TargetDirectoryMissing(_) | BackupError::WorkingDirectoryUnavailable(_)
        )
    }

    /// Maps the error onto a sysexits status code.
    pub fn exit_code(&self) -> i32 {
        match self {
            BackupError::SourceNotFound(_) | BackupError::TargetDirectoryMissing(_) => {
                sysexits::EX_NOINPUT
            }
            BackupError::SourceUnreadable { .. } => sysexits::EX_NOINPUT,
            BackupError::InvalidSourceName(_) => sysexits::EX_DATAERR,
            BackupError::WorkingDirectoryUnavailable(_) => sysexits::EX_OSERR,
            BackupError::DestinationUnwritable { .. } => sysexits::EX_CANTCREAT,
            BackupError::PermissionPropagationFailed { .. } => sysexits::EX_NOPERM,
            BackupError::ArchiveCreationFailed { .. } => sysexits::EX_IOERR,
        }
    }
}
