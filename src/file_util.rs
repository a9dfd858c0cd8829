//! Producing backup artifacts: permission-preserving copies and tar.gz archives.
//!
//! Neither path rolls back on failure. A copy that fails halfway leaves a truncated
//! backup behind, and an archive that fails halfway leaves a partial `.tar.gz`.

use crate::job::{BackupOutcome, Kind, Level, ResolvedBackup};
use crate::{BackupError, Result};
use flate2::write::GzEncoder;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tar::HeaderMode;
use walkdir::WalkDir;

const BUFFER_SIZE: usize = 64 * 1024;

/// Writes the backup described by `resolved` and reports how it went.
pub fn produce(resolved: ResolvedBackup, level: Level) -> BackupOutcome {
    let result = match resolved.kind {
        Kind::File => copy_file(&resolved.source, &resolved.backup_path),
        Kind::Directory => archive_dir(&resolved.source, &resolved.backup_path, level),
    };
    BackupOutcome {
        resolved,
        error: result.err(),
    }
}

/// Copies `src` to `dest` byte for byte, then gives `dest` the permissions `src` had
/// before the copy started.
///
/// # Errors
/// `SourceUnreadable`, `DestinationUnwritable` or `PermissionPropagationFailed`,
/// depending on the phase that failed.
pub fn copy_file(src: &Path, dest: &Path) -> Result<()> {
    let unreadable = |error| BackupError::SourceUnreadable {
        path: src.to_path_buf(),
        error,
    };
    let unwritable = |error| BackupError::DestinationUnwritable {
        path: dest.to_path_buf(),
        error,
    };

    let permissions = fs::metadata(src).map_err(unreadable)?.permissions();
    let mut reader = BufReader::new(File::open(src).map_err(unreadable)?);
    let mut writer = BufWriter::new(File::create(dest).map_err(unwritable)?);

    let mut buf = vec![0; BUFFER_SIZE];
    let mut copied = 0u64;
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(unreadable(e)),
        };
        writer.write_all(&buf[..n]).map_err(unwritable)?;
        copied += n as u64;
    }
    let file = writer.into_inner().map_err(|e| unwritable(e.into_error()))?;
    file.sync_all().map_err(unwritable)?;
    drop(file);
    tracing::debug!(bytes = copied, dest = %dest.display(), "copied file");

    propagate_permissions(dest, permissions)
}

fn propagate_permissions(dest: &Path, permissions: fs::Permissions) -> Result<()> {
    fs::set_permissions(dest, permissions).map_err(|error| {
        BackupError::PermissionPropagationFailed {
            path: dest.to_path_buf(),
            error,
        }
    })
}

/// Packs the directory `src` into a gzip-compressed tar at `dest`.
///
/// Entries are stored under the directory's own name, so `logs/a.txt` is archived as
/// `logs/a.txt` whatever path `src` was given as. Symlinks are kept as links.
///
/// # Errors
/// `ArchiveCreationFailed` carrying the underlying error text.
pub fn archive_dir(src: &Path, dest: &Path, level: Level) -> Result<()> {
    write_archive(src, dest, level).map_err(|e| BackupError::ArchiveCreationFailed {
        path: dest.to_path_buf(),
        diagnostic: format!("{e:#}"),
    })
}

fn write_archive(src: &Path, dest: &Path, level: Level) -> anyhow::Result<()> {
    use anyhow::Context;

    let root =
        fs::canonicalize(src).with_context(|| format!("cannot open '{}'", src.display()))?;
    // Prefer the name the source was given as, so a symlinked directory keeps its link name.
    let base = src
        .file_name()
        .or_else(|| root.file_name())
        .map(PathBuf::from)
        .with_context(|| format!("'{}' has no directory name", src.display()))?;

    let tar_gz =
        File::create(dest).with_context(|| format!("cannot create '{}'", dest.display()))?;
    // The archive may sit inside the tree it is archiving; never pack it into itself.
    let own_path = fs::canonicalize(dest).ok();

    let encoder = GzEncoder::new(BufWriter::new(tar_gz), level.into());
    let mut builder = tar::Builder::new(encoder);
    builder.mode(HeaderMode::Complete);
    builder.follow_symlinks(false);

    let mut entries = 0usize;
    for entry in WalkDir::new(&root).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if own_path.as_deref() == Some(path) {
            continue;
        }
        if is_socket(&entry) {
            tracing::warn!(path = %path.display(), "socket ignored");
            continue;
        }
        let rel = path.strip_prefix(&root)?;
        let name = base.join(rel);
        builder
            .append_path_with_name(path, &name)
            .with_context(|| format!("cannot archive '{}'", path.display()))?;
        entries += 1;
    }

    let mut writer = builder.into_inner()?.finish()?;
    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| e.into_error())?
        .sync_all()?;
    tracing::debug!(entries, dest = %dest.display(), "wrote archive");
    Ok(())
}

#[cfg(unix)]
fn is_socket(entry: &walkdir::DirEntry) -> bool {
    use std::os::unix::fs::FileTypeExt;
    entry.file_type().is_socket()
}

#[cfg(not(unix))]
fn is_socket(_entry: &walkdir::DirEntry) -> bool {
    false
}
