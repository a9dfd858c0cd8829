//! Command-line interface definition for gbckp.
//!
//! Sources come first, followed by an optional mode: `.` backs up into the current
//! directory, `to <dir>` into an existing directory, nothing backs up next to each source.

use crate::job::{BackupRequest, DestinationMode, Level};
use clap::{ArgAction, Parser};
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;
use thiserror::Error;

const MODES_HELP: &str = "\
MODES:
    gbckp /path/to/file.txt              /path/to/file.txt.YYYYMMDD-HHMMSS.backup
    gbckp /path/to/mydir                 /path/to/mydir.YYYYMMDD-HHMMSS.tar.gz
    gbckp /path/to/file.txt .            ./file.txt.YYYYMMDD-HHMMSS.backup
    gbckp /path/to/mydir to /backups     /backups/mydir.YYYYMMDD-HHMMSS.tar.gz

EXAMPLES:
    gbckp document.txt
    gbckp /etc/config.conf .
    gbckp file1.txt file2.txt file3.txt
    gbckp config.txt logs/ data/ to /backups/
    gbckp -- -notes.txt                  sources starting with '-' go after '--'

Files keep their permission bits. Directories are archived with permissions and
ownership, nested under their own name.";

/// Command-line interface definition for gbckp.
#[derive(Parser, Debug)]
#[command(
    version = concat!("version ", env!("CARGO_PKG_VERSION")),
    about = "Create timestamped backups of files and directories",
    long_about = None,
    disable_version_flag = true,
    after_help = MODES_HELP
)]
pub struct Cli {
    /// Files or directories to back up, optionally followed by `.` or `to <DIR>`.
    #[arg(
        value_name = "SOURCE",
        required = true,
        num_args = 1..,
        value_parser = clap::value_parser!(OsString)
    )]
    pub args: Vec<OsString>,

    /// Gzip level for directory archives (overrides the config file).
    #[arg(short, long, value_enum)]
    pub level: Option<Level>,

    /// Print version.
    #[arg(short = 'v', long, action = ArgAction::Version)]
    #[allow(dead_code)]
    version: Option<bool>,
}

/// Problems with the positional arguments that clap cannot catch on its own.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("no source files specified")]
    NoSources,
    #[error("target directory required after 'to'")]
    MissingTarget,
    #[error("unexpected argument '{0}' after '.'")]
    TrailingArgument(String),
}

/// Sources and the shared destination mode of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub sources: Vec<PathBuf>,
    pub mode: DestinationMode,
}

impl Invocation {
    /// Splits raw positional arguments into sources and a destination mode.
    ///
    /// The first `.` or `to` ends the source list. Everything after `to` is joined with
    /// spaces, so `to My Backups` names the directory `My Backups`.
    /// Arguments are taken as raw OS strings, so names that are not valid UTF-8 work.
    pub fn parse<S: AsRef<OsStr>>(args: &[S]) -> Result<Self, UsageError> {
        let args: Vec<&OsStr> = args.iter().map(AsRef::as_ref).collect();
        let dot = OsStr::new(".");
        let to = OsStr::new("to");
        let split = args.iter().position(|a| *a == dot || *a == to);

        let (sources, mode) = match split {
            None => (&args[..], DestinationMode::SameDir),
            Some(i) if args[i] == dot => {
                if let Some(extra) = args.get(i + 1) {
                    return Err(UsageError::TrailingArgument(
                        extra.to_string_lossy().into_owned(),
                    ));
                }
                (&args[..i], DestinationMode::CurrentDir)
            }
            Some(i) => {
                let mut target = OsString::new();
                for (n, word) in args[i + 1..].iter().enumerate() {
                    if n > 0 {
                        target.push(" ");
                    }
                    target.push(word);
                }
                if target.is_empty() {
                    return Err(UsageError::MissingTarget);
                }
                (&args[..i], DestinationMode::ExplicitDir(PathBuf::from(target)))
            }
        };

        if sources.is_empty() {
            return Err(UsageError::NoSources);
        }
        Ok(Self {
            sources: sources.iter().map(PathBuf::from).collect(),
            mode,
        })
    }

    /// One request per source, all sharing this invocation's mode.
    pub fn requests(&self) -> impl Iterator<Item = BackupRequest<'_>> {
        self.sources.iter().map(|source| BackupRequest {
            source,
            mode: &self.mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_same_dir_by_default() {
        let inv = Invocation::parse(&["a.txt", "logs/"]).unwrap();
        assert_eq!(inv.mode, DestinationMode::SameDir);
        assert_eq!(inv.sources, vec![PathBuf::from("a.txt"), PathBuf::from("logs/")]);
    }

    #[test]
    fn test_dot_means_current_dir() {
        let inv = Invocation::parse(&["/etc/config.conf", "."]).unwrap();
        assert_eq!(inv.mode, DestinationMode::CurrentDir);
        assert_eq!(inv.sources, vec![PathBuf::from("/etc/config.conf")]);
    }

    #[test]
    fn test_to_joins_target_words() {
        let inv = Invocation::parse(&["a.txt", "b.txt", "to", "My", "Backups"]).unwrap();
        assert_eq!(inv.mode, DestinationMode::ExplicitDir(PathBuf::from("My Backups")));
        assert_eq!(inv.sources.len(), 2);
    }

    #[test]
    fn test_usage_errors() {
        assert_eq!(Invocation::parse(&["a.txt", "to"]), Err(UsageError::MissingTarget));
        assert_eq!(Invocation::parse(&["to", "/backups"]), Err(UsageError::NoSources));
        assert_eq!(Invocation::parse(&["."]), Err(UsageError::NoSources));
        assert_eq!(
            Invocation::parse(&["a.txt", ".", "b.txt"]),
            Err(UsageError::TrailingArgument("b.txt".into()))
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_arguments() {
        use std::os::unix::ffi::OsStrExt;

        let name = OsStr::from_bytes(b"caf\xe9.txt");
        let dir = OsStr::from_bytes(b"b\xe4ck");
        let inv = Invocation::parse(&[name, OsStr::new("to"), dir, OsStr::new("ups")]).unwrap();
        assert_eq!(inv.sources, vec![PathBuf::from(name)]);

        let mut expected = dir.to_os_string();
        expected.push(" ups");
        assert_eq!(inv.mode, DestinationMode::ExplicitDir(PathBuf::from(expected)));
    }

    #[test]
    fn test_requests_share_mode() {
        let inv = Invocation::parse(&["a", "b", "to", "/tmp"]).unwrap();
        let requests: Vec<_> = inv.requests().collect();
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|r| std::ptr::eq(r.mode, &inv.mode)));
        assert_eq!(requests[1].source, PathBuf::from("b"));
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from(["gbckp", "a.txt", "to", "/b", "--level", "best"]).unwrap();
        assert_eq!(cli.args, vec!["a.txt", "to", "/b"]);

        let cli = Cli::try_parse_from(["gbckp", "--", "-notes.txt"]).unwrap();
        assert_eq!(cli.args, vec!["-notes.txt"]);
        assert_eq!(cli.level, Some(Level::Best));

        let err = Cli::try_parse_from(["gbckp", "-v"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
        assert!(err.to_string().contains("gbckp version "));

        let err = Cli::try_parse_from(["gbckp"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }
}
