//! gbckp: timestamped backups of files and directories.
//!
//! The crate splits a backup into two steps. [`path_util`] decides where the backup
//! lands and what it is called, [`file_util`] writes it. [`commands`] drives both over
//! every source given on the command line.

pub mod cli;
pub mod clock;
pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod file_util;
pub mod job;
pub mod path_util;
pub mod sysexits;

pub use error::BackupError;

/// Unified result type for all fallible backup operations.
pub type Result<T> = std::result::Result<T, BackupError>;
