//! Import of the MHLW open-data tables from local CSV files.
//!
//! Rows look like `2020/4/18,Tokyo,2988`; the first line is a header.
//! Figures for a publication date are read from the previous day's rows.

use chrono::NaiveDate;
use csv::StringRecord;
use std::collections::HashMap;
use std::path::Path;

use super::daily::{DailyRecord, DailySnapshot};
use super::date_utils::{format_mhlw_date, parse_mhlw_date};
use super::prefectures::PREFECTURES;
use super::text_utils::{strip_space, zen_digit_to_han};
use crate::errors::{DataError, DataResult};

/// The MHLW tables this crate reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    ConfirmedCasesCumulativeDaily,
    /// Column 0: requiring inpatient care, column 1: discharged
    RequiringInpatientCareEtcDaily,
    DeathsCumulativeDaily,
    SevereCasesDaily,
}

impl Table {
    pub const ALL: [Table; 4] = [
        Table::ConfirmedCasesCumulativeDaily,
        Table::RequiringInpatientCareEtcDaily,
        Table::DeathsCumulativeDaily,
        Table::SevereCasesDaily,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Table::ConfirmedCasesCumulativeDaily => "confirmed_cases_cumulative_daily",
            Table::RequiringInpatientCareEtcDaily => "requiring_inpatient_care_etc_daily",
            Table::DeathsCumulativeDaily => "deaths_cumulative_daily",
            Table::SevereCasesDaily => "severe_cases_daily",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.csv", self.name())
    }

    /// Whether a snapshot can be built without this table.
    pub fn is_required(&self) -> bool {
        matches!(self, Table::ConfirmedCasesCumulativeDaily | Table::DeathsCumulativeDaily)
    }
}

/// Raw text of each table.
#[derive(Debug, Clone, Default)]
pub struct CsvSources {
    tables: HashMap<Table, String>,
}

impl CsvSources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, table: Table, text: impl Into<String>) -> Self {
        self.tables.insert(table, text.into());
        self
    }

    pub fn get(&self, table: Table) -> Option<&str> {
        self.tables.get(&table).map(String::as_str)
    }

    /// Reads `<table>.csv` for every table found in `dir`.
    /// Required tables must exist; optional ones are skipped with a warning.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> DataResult<Self> {
        let dir = dir.as_ref();
        let mut sources = Self::new();
        for table in Table::ALL {
            let path = dir.join(table.file_name());
            if !path.exists() && !table.is_required() {
                log::warn!("Optional table {} not found, counts default to 0", path.display());
                continue;
            }
            let text = std::fs::read_to_string(&path)
                .map_err(|e| DataError::csv(format!("{}: {}", path.display(), e)))?;
            sources.tables.insert(table, text);
        }
        Ok(sources)
    }
}

/// Reads one value column for `target_date`, keyed by the romaji
/// prefecture name. `column` counts from the first value after the name.
pub fn read_column(text: &str, target_date: NaiveDate, column: usize) -> DataResult<HashMap<String, u32>> {
    let mut result = HashMap::new();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.trim_start_matches('\u{feff}').as_bytes());

    for row in reader.records() {
        let record: StringRecord = row.map_err(|e| DataError::csv(e.to_string()))?;
        let line = record.position().map(|position| position.line()).unwrap_or_default();

        let date = parse_mhlw_date(record.get(0).unwrap_or_default())
            .map_err(|e| DataError::csv(format!("line {line}: {e}")))?;
        if date != target_date {
            continue;
        }

        let pref = record
            .get(1)
            .map(strip_space)
            .ok_or_else(|| DataError::csv(format!("line {line}: missing prefecture")))?;
        let raw = record
            .get(column + 2)
            .ok_or_else(|| DataError::csv(format!("line {line}: missing value column {column}")))?;
        let value: u32 = zen_digit_to_han(raw)
            .trim()
            .parse()
            .map_err(|_| DataError::csv(format!("line {line}: invalid count '{raw}'")))?;

        result.insert(pref, value);
    }

    if result.is_empty() {
        log::warn!("No rows for {} (column {})", format_mhlw_date(target_date), column);
    }
    Ok(result)
}

fn read_optional(
    sources: &CsvSources,
    table: Table,
    target_date: NaiveDate,
    column: usize,
) -> DataResult<HashMap<String, u32>> {
    match sources.get(table) {
        Some(text) => read_column(text, target_date, column),
        None => Ok(HashMap::new()),
    }
}

fn read_required(
    sources: &CsvSources,
    table: Table,
    target_date: NaiveDate,
) -> DataResult<HashMap<String, u32>> {
    let text = sources
        .get(table)
        .ok_or_else(|| DataError::csv(format!("table {} not loaded", table.name())))?;
    read_column(text, target_date, 0)
}

/// Builds the daily snapshot published on `date` from the previous day's rows.
pub fn daily_snapshot(date: NaiveDate, sources: &CsvSources) -> DataResult<DailySnapshot> {
    let target_date = date
        .pred_opt()
        .ok_or_else(|| DataError::csv(format!("no day before {date}")))?;

    let patients = read_required(sources, Table::ConfirmedCasesCumulativeDaily, target_date)?;
    let mortality = read_required(sources, Table::DeathsCumulativeDaily, target_date)?;
    let hospitalizations = read_optional(sources, Table::RequiringInpatientCareEtcDaily, target_date, 0)?;
    let discharges = read_optional(sources, Table::RequiringInpatientCareEtcDaily, target_date, 1)?;
    let severe = read_optional(sources, Table::SevereCasesDaily, target_date, 0)?;

    let optional = |map: &HashMap<String, u32>, table: Table, romaji: &str| -> u32 {
        map.get(romaji).copied().unwrap_or_else(|| {
            log::warn!("{} missing from {} on {}", romaji, table.name(), target_date);
            0
        })
    };

    let mut records = Vec::with_capacity(PREFECTURES.len());
    for pref in PREFECTURES {
        let missing = || DataError::MissingRegion {
            region: pref.romaji.to_string(),
            date: target_date,
        };

        records.push(DailyRecord {
            pref: pref.kanji.to_string(),
            patients: *patients.get(pref.romaji).ok_or_else(missing)?,
            hospitalizations: optional(&hospitalizations, Table::RequiringInpatientCareEtcDaily, pref.romaji),
            discharges: optional(&discharges, Table::RequiringInpatientCareEtcDaily, pref.romaji),
            mortality: *mortality.get(pref.romaji).ok_or_else(missing)?,
            severe: optional(&severe, Table::SevereCasesDaily, pref.romaji),
            // No local source for test counts
            pcr: 0,
        });
    }

    log::debug!("Built daily snapshot for {} from rows of {}", date, target_date);
    Ok(DailySnapshot::new(date, records))
}
