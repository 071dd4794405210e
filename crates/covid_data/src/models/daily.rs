use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::date_utils::{format_iso_date, parse_iso_date};
use crate::errors::DataResult;

/// Daily snapshot file names: `prefs2020-04-19.json`
pub static DAILY_FILE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^prefs(?P<date>\d{4}-\d{2}-\d{2})\.json$")
        .expect("Invalid regex pattern for daily snapshot files")
});

/// Counts for one prefecture on one publication date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord {
    pub pref: String,
    pub patients: u32,
    pub hospitalizations: u32,
    pub discharges: u32,
    pub mortality: u32,
    pub severe: u32,
    pub pcr: u32,
}

/// Cross-section of every prefecture for one publication date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySnapshot {
    pub date: NaiveDate,
    pub prefs: Vec<DailyRecord>,
}

impl DailySnapshot {
    pub fn new(date: NaiveDate, prefs: Vec<DailyRecord>) -> Self {
        Self { date, prefs }
    }

    pub fn record(&self, pref: &str) -> Option<&DailyRecord> {
        self.prefs.iter().find(|record| record.pref == pref)
    }
}

pub fn file_name(date: NaiveDate) -> String {
    format!("prefs{}.json", format_iso_date(date))
}

/// Extracts the date from a daily snapshot file name.
pub fn parse_file_name(name: &str) -> Option<NaiveDate> {
    let captures = DAILY_FILE_PATTERN.captures(name)?;
    parse_iso_date(&captures["date"]).ok()
}

pub fn path_for<P: AsRef<Path>>(dir: P, date: NaiveDate) -> PathBuf {
    dir.as_ref().join(file_name(date))
}

/// Dates of the daily snapshots present in `dir`, oldest first.
/// A missing directory yields an empty set.
pub fn list_dates<P: AsRef<Path>>(dir: P) -> DataResult<BTreeSet<NaiveDate>> {
    let dir = dir.as_ref();
    if !dir.exists() {
        log::debug!("Snapshot directory {} does not exist", dir.display());
        return Ok(BTreeSet::new());
    }

    let mut dates = BTreeSet::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if let Some(date) = entry.file_name().to_str().and_then(parse_file_name) {
            dates.insert(date);
        }
    }
    Ok(dates)
}

pub fn read<P: AsRef<Path>>(dir: P, date: NaiveDate) -> DataResult<DailySnapshot> {
    let text = std::fs::read_to_string(path_for(dir, date))?;
    Ok(serde_json::from_str(&text)?)
}

pub fn write<P: AsRef<Path>>(dir: P, snapshot: &DailySnapshot) -> DataResult<PathBuf> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;
    let path = path_for(dir, snapshot.date);
    std::fs::write(&path, serde_json::to_string_pretty(snapshot)?)?;
    log::info!("Wrote daily snapshot {}", path.display());
    Ok(path)
}

/// Async version of read
pub async fn read_async(dir: &Path, date: NaiveDate) -> DataResult<DailySnapshot> {
    let text = tokio::fs::read_to_string(path_for(dir, date)).await?;
    Ok(serde_json::from_str(&text)?)
}

/// Loads every daily snapshot in `dir` concurrently, oldest first.
pub async fn read_all_async(dir: &Path) -> DataResult<Vec<DailySnapshot>> {
    let dates = list_dates(dir)?;
    log::info!("Loading {} daily snapshots from {}", dates.len(), dir.display());
    futures::future::try_join_all(dates.into_iter().map(|date| read_async(dir, date))).await
}
