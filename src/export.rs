use crate::models::ExportFormat;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// `flashcards_export_<ISO-8601 timestamp, ':' replaced by '-'>.<ext>`
pub fn export_filename(format: ExportFormat, at: DateTime<Utc>) -> String {
    let stamp = at
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace(':', "-");
    format!("flashcards_export_{}.{}", stamp, format.extension())
}

/// Writes an export payload into `dir` and returns the file's path.
pub fn save_export(
    dir: &Path,
    format: ExportFormat,
    payload: &[u8],
    at: DateTime<Utc>,
) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(export_filename(format, at));
    fs::write(&path, payload)?;
    Ok(path)
}
