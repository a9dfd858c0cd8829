/// Package name.
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
/// Default configuration file name.
pub const CONFIG_NAME: &str = "config.toml";
/// chrono pattern for the timestamp embedded in every backup name.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";
/// Extension appended to file backups.
pub const FILE_EXTENSION: &str = "backup";
/// Extension appended to directory archives.
pub const ARCHIVE_EXTENSION: &str = "tar.gz";
/// Shortest pause allowed between two sources.
pub const MIN_PAUSE_SECS: u64 = 1;
