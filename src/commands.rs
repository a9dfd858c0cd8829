//! Running a backup invocation.
//!
//! Each source is probed, resolved and produced before the next one starts. Results are
//! printed as they happen: `Backup created: <path>` on stdout, `Error: ...` on stderr.

use crate::cli::Invocation;
use crate::clock::Clock;
use crate::config::Settings;
use crate::job::{BackupOutcome, BackupRequest, Kind, Tally};
use crate::{BackupError, Result, file_util, path_util};
use std::path::Path;
use std::{fs, io, thread};

/// Backs up every source of `invocation` in order and returns the tally.
///
/// A failing source is reported and counted, then the next one is attempted.
///
/// # Errors
/// Returns the mode-wide error (`TargetDirectoryMissing`, `WorkingDirectoryUnavailable`)
/// that stops the run. When the mode is already invalid nothing is written at all.
pub fn run(invocation: &Invocation, settings: &Settings, clock: &dyn Clock) -> Result<Tally> {
    invocation.mode.check()?;
    tracing::debug!(mode = ?invocation.mode, sources = invocation.sources.len(), "starting run");

    let mut tally = Tally::default();
    let total = invocation.sources.len();
    for (index, request) in invocation.requests().enumerate() {
        let attempted = match backup_one(request, settings, clock) {
            Ok(outcome) => {
                report(&outcome, &mut tally);
                true
            }
            Err(e) if e.is_mode_wide() => return Err(e),
            Err(e) => {
                eprintln!("{}", skip_message(&e));
                tally.failed += 1;
                false
            }
        };
        if attempted && index + 1 < total {
            thread::sleep(settings.pause());
        }
    }

    if total > 1 {
        println!(
            "\nSummary: {} successful, {} failed",
            tally.succeeded, tally.failed
        );
    }
    Ok(tally)
}

/// Probes, resolves and produces a single source.
///
/// `Err` means nothing was written: the source was missing, unreadable or unnameable,
/// or the destination mode stopped being valid.
pub fn backup_one(
    request: BackupRequest<'_>,
    settings: &Settings,
    clock: &dyn Clock,
) -> Result<BackupOutcome> {
    let kind = probe(request.source)?;
    let resolved = path_util::resolve(request, kind, clock.now())?;
    Ok(file_util::produce(resolved, settings.level))
}

/// Decides whether `source` is backed up as a file or a directory. Symlinks are followed.
pub fn probe(source: &Path) -> Result<Kind> {
    match fs::metadata(source) {
        Ok(meta) if meta.is_dir() => Ok(Kind::Directory),
        Ok(_) => Ok(Kind::File),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(BackupError::SourceNotFound(source.to_path_buf()))
        }
        Err(error) => Err(BackupError::SourceUnreadable {
            path: source.to_path_buf(),
            error,
        }),
    }
}

fn report(outcome: &BackupOutcome, tally: &mut Tally) {
    let resolved = &outcome.resolved;
    match &outcome.error {
        None => {
            println!("Backup created: {}", resolved.backup_path.display());
            tally.succeeded += 1;
        }
        Some(e) => {
            eprintln!(
                "Error: failed to backup {} '{}': {e}",
                resolved.kind,
                resolved.source.display()
            );
            tally.failed += 1;
        }
    }
}

/// The error already names the source, so it is printed as-is.
fn skip_message(err: &BackupError) -> String {
    format!("Error: {err} - skipping")
}
