use chrono::{Datelike, NaiveDate};
use std::collections::HashSet;

pub const ISO_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeFormatError {
    pub format: String,
    pub value: String,
    pub message: String,
}

impl TimeFormatError {
    pub fn new(format: &str, value: &str, message: &str) -> Self {
        Self {
            format: format.to_string(),
            value: value.to_string(),
            message: message.to_string(),
        }
    }
}

impl std::fmt::Display for TimeFormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: expected format '{}', got '{}'", self.message, self.format, self.value)
    }
}

impl std::error::Error for TimeFormatError {}

/// Parses an ISO 8601 calendar date such as `2020-04-19`.
///
/// # Example
/// ```rust
/// use covid_data::models::date_utils::parse_iso_date;
///
/// let date = parse_iso_date("2020-04-19").unwrap();
/// assert_eq!(date.to_string(), "2020-04-19");
/// ```
pub fn parse_iso_date(value: &str) -> Result<NaiveDate, TimeFormatError> {
    NaiveDate::parse_from_str(value.trim(), ISO_FORMAT)
        .map_err(|_| TimeFormatError::new("YYYY-MM-DD", value, "Invalid ISO date"))
}

pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_FORMAT).to_string()
}

/// Parses the date column of the MHLW open-data tables.
///
/// Month and day are not zero padded there (`2020/4/9`), but padded
/// values are accepted too.
pub fn parse_mhlw_date(value: &str) -> Result<NaiveDate, TimeFormatError> {
    let value = value.trim();
    let parts: Vec<&str> = value.split('/').collect();
    if parts.len() != 3 {
        return Err(TimeFormatError::new("yyyy/M/d", value, "Date must have three parts"));
    }

    if !parts
        .iter()
        .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
    {
        return Err(TimeFormatError::new("yyyy/M/d", value, "Date parts must be digits"));
    }

    let year: i32 = parts[0]
        .parse()
        .map_err(|_| TimeFormatError::new("yyyy/M/d", value, "Invalid year"))?;
    let month: u32 = parts[1]
        .parse()
        .map_err(|_| TimeFormatError::new("yyyy/M/d", value, "Invalid month"))?;
    let day: u32 = parts[2]
        .parse()
        .map_err(|_| TimeFormatError::new("yyyy/M/d", value, "Invalid day"))?;

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| TimeFormatError::new("yyyy/M/d", value, "Date out of range"))
}

/// Formats a date the way the MHLW tables write it: `2020/4/9`.
pub fn format_mhlw_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.year(), date.month(), date.day())
}

/// Formats a date label in Japanese, e.g. `2020年4月19日`.
pub fn format_date_label(date: NaiveDate) -> String {
    format!("{}年{}月{}日", date.year(), date.month(), date.day())
}

/// True when `next` is exactly one calendar day after `previous`.
pub fn is_next_day(previous: NaiveDate, next: NaiveDate) -> bool {
    previous.succ_opt() == Some(next)
}

/// Lists dates from `today` backwards until a date already in `existing`
/// is reached, newest first. `floor` bounds the walk when nothing exists yet.
pub fn days_back_until(
    today: NaiveDate,
    existing: &HashSet<NaiveDate>,
    floor: NaiveDate,
) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut date = today;
    while date >= floor && !existing.contains(&date) {
        dates.push(date);
        match date.pred_opt() {
            Some(previous) => date = previous,
            None => break,
        }
    }
    dates
}
