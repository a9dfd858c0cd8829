//! legacy exit status codes for system programs.
//! reference: [SYSEXITS](https://man.freebsd.org/cgi/man.cgi?query=sysexits&apropos=0&sektion=0&manpath=FreeBSD+11.2-stable&arch=default&format=html)

/// value: 64 <br>
/// Wrong number of arguments or a malformed mode token (`to` without a directory).
pub const EX_USAGE: i32 = 64;

/// value: 65 <br>
/// A source has no usable name, e.g. the filesystem root.
pub const EX_DATAERR: i32 = 65;

/// value: 66 <br>
/// A source or the explicit target directory does not exist or cannot be read.
pub const EX_NOINPUT: i32 = 66;

/// value: 71 <br>
/// The operating system refused something unrelated to the user's files, such as
/// reporting the current working directory.
pub const EX_OSERR: i32 = 71;

/// value: 73 <br>
/// A backup file or archive cannot be created.
pub const EX_CANTCREAT: i32 = 73;

/// value: 74 <br>
/// An I/O error happened while copying or archiving. Also used as the overall status
/// when at least one source failed.
pub const EX_IOERR: i32 = 74;

/// value: 77 <br>
/// The copied file's permission bits could not be applied to the backup.
pub const EX_NOPERM: i32 = 77;

/// value: 78 <br>
/// The configuration file exists but cannot be read or parsed.
pub const EX_CONFIG: i32 = 78;
