//! Configuration snapshots written to disk

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};
use serde_json::Value;

use fczone_core::Result;

/// Timestamped default file name for a snapshot, e.g. `defined-20240131-142501.json`
pub fn default_snapshot_path(label: &str) -> PathBuf {
    snapshot_path_at(label, &Local::now())
}

fn snapshot_path_at<Tz: TimeZone>(label: &str, at: &DateTime<Tz>) -> PathBuf
where
    Tz::Offset: std::fmt::Display,
{
    PathBuf::from(format!("{}-{}.json", label, at.format("%Y%m%d-%H%M%S")))
}

/// Write an unwrapped configuration document as JSON
pub fn write_snapshot<P: AsRef<Path>>(path: P, document: &Value) -> Result<()> {
    let path = path.as_ref();
    let data = serde_json::to_string_pretty(document)?;
    fs::write(path, data)?;
    log::info!("Wrote configuration snapshot {}", path.display());
    Ok(())
}
