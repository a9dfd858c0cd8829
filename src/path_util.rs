//! Backup path resolution.
//!
//! Nothing here writes to the filesystem. The only filesystem access is reading the
//! working directory, checking that an explicit target directory exists, and
//! canonicalizing sources that have no final component (`.` or `..`).

use crate::constants::TIMESTAMP_FORMAT;
use crate::job::{BackupRequest, DestinationMode, Kind, ResolvedBackup};
use crate::{BackupError, Result};
use chrono::NaiveDateTime;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::{env, fs, io};

impl DestinationMode {
    /// Validates the mode once, before any source is processed.
    ///
    /// # Errors
    /// `WorkingDirectoryUnavailable` for [`DestinationMode::CurrentDir`] when the working
    /// directory cannot be read, `TargetDirectoryMissing` for
    /// [`DestinationMode::ExplicitDir`] when the directory is absent.
    pub fn check(&self) -> Result<()> {
        match self {
            DestinationMode::SameDir => Ok(()),
            DestinationMode::CurrentDir => current_dir().map(|_| ()),
            DestinationMode::ExplicitDir(dir) => existing_dir(dir).map(|_| ()),
        }
    }

    /// Returns the directory a backup of `source` lands in.
    ///
    /// `source` is expected to have a parent already, see [`named_source`].
    fn destination_dir(&self, source: &Path) -> Result<PathBuf> {
        match self {
            DestinationMode::SameDir => Ok(source
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default()),
            DestinationMode::CurrentDir => current_dir(),
            DestinationMode::ExplicitDir(dir) => existing_dir(dir),
        }
    }
}

/// Formats `now` as `YYYYMMDD-HHMMSS`.
pub fn timestamp(now: NaiveDateTime) -> String {
    now.format(TIMESTAMP_FORMAT).to_string()
}

/// Builds `<base>.<timestamp>.<extension>` for the given kind.
pub fn backup_name(base: &OsStr, kind: Kind, now: NaiveDateTime) -> OsString {
    let mut name = base.to_os_string();
    name.push(".");
    name.push(timestamp(now));
    name.push(".");
    name.push(kind.extension());
    name
}

/// Computes where the backup of `request.source` goes and what it is called.
///
/// # Errors
/// `InvalidSourceName` when the source has no name (the filesystem root), plus the
/// mode errors documented on [`DestinationMode::check`].
pub fn resolve(
    request: BackupRequest<'_>,
    kind: Kind,
    now: NaiveDateTime,
) -> Result<ResolvedBackup> {
    let (named, base) = named_source(request.source)?;
    let dir = request.mode.destination_dir(&named)?;
    let backup_path = dir.join(backup_name(&base, kind, now));
    tracing::debug!(
        source = %request.source.display(),
        backup = %backup_path.display(),
        "resolved backup path"
    );

    Ok(ResolvedBackup {
        source: request.source.to_path_buf(),
        backup_path,
        kind,
    })
}

/// Returns a path to the source that ends in a real name, and that name.
///
/// `notes.txt` and `logs/` are returned as-is. `.` and `..` are canonicalized so the
/// backup is named after the directory they point at.
fn named_source(source: &Path) -> Result<(PathBuf, OsString)> {
    if let Some(name) = source.file_name() {
        return Ok((source.to_path_buf(), name.to_os_string()));
    }
    let canonical = fs::canonicalize(source).map_err(|error| match error.kind() {
        io::ErrorKind::NotFound => BackupError::SourceNotFound(source.to_path_buf()),
        _ => BackupError::SourceUnreadable {
            path: source.to_path_buf(),
            error,
        },
    })?;
    let name = canonical
        .file_name()
        .map(OsStr::to_os_string)
        .ok_or_else(|| BackupError::InvalidSourceName(source.to_path_buf()))?;
    Ok((canonical, name))
}

fn current_dir() -> Result<PathBuf> {
    env::current_dir().map_err(BackupError::WorkingDirectoryUnavailable)
}

fn existing_dir(dir: &Path) -> Result<PathBuf> {
    if dir.is_dir() {
        Ok(dir.to_path_buf())
    } else {
        Err(BackupError::TargetDirectoryMissing(dir.to_path_buf()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(7, 8, 9)
            .unwrap()
    }

    fn request<'a>(source: &'a Path, mode: &'a DestinationMode) -> BackupRequest<'a> {
        BackupRequest { source, mode }
    }

    #[test]
    fn test_timestamp_is_fixed_width() {
        assert_eq!(timestamp(at()), "20240305-070809");
    }

    #[test]
    fn test_backup_name_by_kind() {
        let file = backup_name(OsStr::new("notes.txt"), Kind::File, at());
        assert_eq!(file, OsString::from("notes.txt.20240305-070809.backup"));

        let dir = backup_name(OsStr::new("logs"), Kind::Directory, at());
        assert_eq!(dir, OsString::from("logs.20240305-070809.tar.gz"));
    }

    #[test]
    fn test_same_dir_uses_parent() {
        let mode = DestinationMode::SameDir;
        let source = Path::new("/etc/nginx/nginx.conf");
        let resolved = resolve(request(source, &mode), Kind::File, at()).unwrap();
        assert_eq!(
            resolved.backup_path,
            PathBuf::from("/etc/nginx/nginx.conf.20240305-070809.backup")
        );
        assert_eq!(resolved.source, source);
        assert_eq!(resolved.kind, Kind::File);
    }

    #[test]
    fn test_same_dir_directory_lands_beside_it() {
        let mode = DestinationMode::SameDir;
        let source = Path::new("/var/www/");
        let resolved = resolve(request(source, &mode), Kind::Directory, at()).unwrap();
        assert_eq!(
            resolved.backup_path,
            PathBuf::from("/var/www.20240305-070809.tar.gz")
        );
    }

    #[test]
    fn test_same_dir_bare_name_stays_relative() {
        let mode = DestinationMode::SameDir;
        let resolved = resolve(request(Path::new("notes.txt"), &mode), Kind::File, at()).unwrap();
        assert_eq!(
            resolved.backup_path,
            PathBuf::from("notes.txt.20240305-070809.backup")
        );
        assert_ne!(resolved.backup_path, resolved.source);
    }

    #[test]
    fn test_current_dir_mode() {
        let mode = DestinationMode::CurrentDir;
        let source = Path::new("/srv/data/a.db");
        let resolved = resolve(request(source, &mode), Kind::File, at()).unwrap();
        let cwd = env::current_dir().unwrap();
        assert_eq!(resolved.backup_path, cwd.join("a.db.20240305-070809.backup"));
    }

    #[test]
    fn test_explicit_dir_mode() {
        let target = tempdir().unwrap();
        let mode = DestinationMode::ExplicitDir(target.path().to_path_buf());
        let source = Path::new("/var/log/logs");
        let resolved = resolve(request(source, &mode), Kind::Directory, at()).unwrap();
        assert_eq!(
            resolved.backup_path,
            target.path().join("logs.20240305-070809.tar.gz")
        );
    }

    #[test]
    fn test_explicit_dir_must_exist() {
        let target = tempdir().unwrap().path().join("missing");
        let mode = DestinationMode::ExplicitDir(target.clone());
        let err = resolve(request(Path::new("a.txt"), &mode), Kind::File, at()).unwrap_err();
        assert!(matches!(err, BackupError::TargetDirectoryMissing(ref p) if *p == target));
        assert!(mode.check().is_err());
        assert!(!target.exists());
    }

    #[test]
    fn test_explicit_dir_rejects_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mode = DestinationMode::ExplicitDir(file.path().to_path_buf());
        assert!(matches!(
            mode.check(),
            Err(BackupError::TargetDirectoryMissing(_))
        ));
    }

    #[test]
    fn test_check_accepts_same_and_current() {
        assert!(DestinationMode::SameDir.check().is_ok());
        assert!(DestinationMode::CurrentDir.check().is_ok());
    }

    #[test]
    fn test_dot_source_is_named_after_real_directory() {
        let parent = tempdir().unwrap();
        let dir = parent.path().join("project");
        fs::create_dir(&dir).unwrap();
        let mode = DestinationMode::SameDir;
        let dotted = dir.join("sub").join("..");
        fs::create_dir(dir.join("sub")).unwrap();

        let resolved = resolve(request(&dotted, &mode), Kind::Directory, at()).unwrap();
        let expected = fs::canonicalize(parent.path())
            .unwrap()
            .join("project.20240305-070809.tar.gz");
        assert_eq!(resolved.backup_path, expected);
        assert_eq!(resolved.source, dotted);
    }

    #[test]
    fn test_root_has_no_name() {
        let mode = DestinationMode::SameDir;
        let err = resolve(request(Path::new("/"), &mode), Kind::Directory, at()).unwrap_err();
        assert!(matches!(err, BackupError::InvalidSourceName(_)));
    }
}
