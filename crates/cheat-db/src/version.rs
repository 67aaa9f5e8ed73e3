//! Database version markers and source freshness checks.

use std::io::ErrorKind;
use std::path::Path;

use chrono::NaiveDate;

use crate::types::{CheatDbError, CheatDbResult};

/// File written next to the distribution archives.
pub const VERSION_FILE: &str = "VERSION";

/// Version assumed when no usable marker exists; older than any source.
pub fn epoch_version() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Today's date in local time.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Write `<dir>/VERSION` containing the ISO date.
pub fn write_version_file(dir: &Path, date: NaiveDate) -> CheatDbResult<()> {
    std::fs::create_dir_all(dir)?;
    std::fs::write(dir.join(VERSION_FILE), date.format("%Y-%m-%d").to_string())?;
    tracing::info!("Wrote {} = {date}", dir.join(VERSION_FILE).display());
    Ok(())
}

/// Parse the contents of a version marker.
///
/// Returns `None` for anything that is not a bare ISO date, including the
/// HTML page some hosts serve in place of a missing file.
pub fn parse_database_version(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.starts_with('<') {
        return None;
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

/// Read `<dir>/VERSION`, falling back to [`epoch_version`].
pub fn read_version_file(dir: &Path) -> CheatDbResult<NaiveDate> {
    let path = dir.join(VERSION_FILE);
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound || e.kind() == ErrorKind::InvalidData => {
            tracing::info!("No version marker at {}, forcing refresh", path.display());
            return Ok(epoch_version());
        }
        Err(e) => return Err(e.into()),
    };

    Ok(parse_database_version(&text).unwrap_or_else(|| {
        tracing::warn!("Unrecognized version marker in {}", path.display());
        epoch_version()
    }))
}

/// Parse a forum archive version string of the form `MMDDYYYY`.
pub fn parse_source_version(version: &str) -> CheatDbResult<NaiveDate> {
    let version = version.trim();
    let invalid = || CheatDbError::InvalidVersion(version.to_string());

    if version.len() != 8 || !version.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let month: u32 = version[0..2].parse().map_err(|_| invalid())?;
    let day: u32 = version[2..4].parse().map_err(|_| invalid())?;
    let year: i32 = version[4..8].parse().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// A source has new cheats when it is strictly newer than the database.
pub fn has_new_cheats(source: NaiveDate, database: NaiveDate) -> bool {
    source > database
}
