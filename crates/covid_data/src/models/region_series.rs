use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Full time history of cumulative counts for one prefecture.
///
/// `patients`, `mortality` and `dates` are aligned by index. The wire
/// names (`pref`, `motarity`) are the ones used by the published artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionSeries {
    pub code: u8,
    #[serde(rename = "pref")]
    pub name: String,
    pub patients: Vec<u32>,
    #[serde(rename = "motarity")]
    pub mortality: Vec<u32>,
    pub dates: Vec<NaiveDate>,
}

/// One day of a region series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub patients: u32,
    pub mortality: u32,
}

impl RegionSeries {
    pub fn new(code: u8, name: &str) -> Self {
        Self {
            code,
            name: name.to_string(),
            patients: Vec::new(),
            mortality: Vec::new(),
            dates: Vec::new(),
        }
    }

    /// Appends one day. Invariants are not enforced here; see `validate`.
    pub fn push(&mut self, date: NaiveDate, patients: u32, mortality: u32) {
        self.dates.push(date);
        self.patients.push(patients);
        self.mortality.push(mortality);
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// True when the three sequences have the same length.
    pub fn is_aligned(&self) -> bool {
        self.patients.len() == self.dates.len() && self.mortality.len() == self.dates.len()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    pub fn point(&self, index: usize) -> Option<SeriesPoint> {
        Some(SeriesPoint {
            date: *self.dates.get(index)?,
            patients: *self.patients.get(index)?,
            mortality: *self.mortality.get(index)?,
        })
    }

    /// The most recent point, when the series is non-empty and aligned at its end.
    pub fn latest(&self) -> Option<SeriesPoint> {
        Some(SeriesPoint {
            date: *self.dates.last()?,
            patients: *self.patients.last()?,
            mortality: *self.mortality.last()?,
        })
    }

    pub fn points(&self) -> impl Iterator<Item = SeriesPoint> + '_ {
        self.dates
            .iter()
            .zip(&self.patients)
            .zip(&self.mortality)
            .map(|((date, patients), mortality)| SeriesPoint {
                date: *date,
                patients: *patients,
                mortality: *mortality,
            })
    }

    /// Point recorded on `date`. Dates are not assumed sorted.
    pub fn point_on(&self, date: NaiveDate) -> Option<SeriesPoint> {
        let index = self.dates.iter().position(|day| *day == date)?;
        self.point(index)
    }

    /// Per-day new patients. A downward revision shows up as a negative value.
    pub fn daily_new_patients(&self) -> Vec<i64> {
        increments(&self.patients)
    }

    pub fn daily_new_mortality(&self) -> Vec<i64> {
        increments(&self.mortality)
    }
}

fn increments(cumulative: &[u32]) -> Vec<i64> {
    let mut previous = 0i64;
    cumulative
        .iter()
        .map(|value| {
            let value = i64::from(*value);
            let delta = value - previous;
            previous = value;
            delta
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> RegionSeries {
        let mut series = RegionSeries::new(13, "東京都");
        series.push(ymd(2020, 4, 17), 2595, 50);
        series.push(ymd(2020, 4, 18), 2794, 58);
        series.push(ymd(2020, 4, 19), 2988, 68);
        series
    }

    #[test]
    fn test_push_and_accessors() {
        let series = sample();
        assert_eq!(series.len(), 3);
        assert!(!series.is_empty());
        assert!(series.is_aligned());
        assert_eq!(series.first_date(), Some(ymd(2020, 4, 17)));
        assert_eq!(series.last_date(), Some(ymd(2020, 4, 19)));

        let latest = series.latest().unwrap();
        assert_eq!(latest.patients, 2988);
        assert_eq!(latest.mortality, 68);

        assert_eq!(series.point(1).unwrap().patients, 2794);
        assert!(series.point(3).is_none());
        assert_eq!(series.point_on(ymd(2020, 4, 18)).unwrap().mortality, 58);
        assert!(series.point_on(ymd(2020, 4, 20)).is_none());
    }

    #[test]
    fn test_point_on_unsorted_dates() {
        let mut series = RegionSeries::new(13, "東京都");
        series.push(ymd(2020, 4, 19), 2988, 68);
        series.push(ymd(2020, 4, 17), 2595, 50);
        series.push(ymd(2020, 4, 18), 2794, 58);

        assert_eq!(series.point_on(ymd(2020, 4, 17)).unwrap().patients, 2595);
        assert_eq!(series.point_on(ymd(2020, 4, 19)).unwrap().mortality, 68);
        assert!(series.point_on(ymd(2020, 4, 16)).is_none());
    }

    #[test]
    fn test_empty_series() {
        let series = RegionSeries::new(3, "岩手県");
        assert!(series.is_empty());
        assert!(series.latest().is_none());
        assert_eq!(series.points().count(), 0);
        assert!(series.daily_new_patients().is_empty());
    }

    #[test]
    fn test_increments() {
        let series = sample();
        assert_eq!(series.daily_new_patients(), vec![2595, 199, 194]);
        assert_eq!(series.daily_new_mortality(), vec![50, 8, 10]);

        let mut revised = RegionSeries::new(1, "北海道");
        revised.push(ymd(2020, 3, 20), 156, 7);
        revised.push(ymd(2020, 3, 21), 157, 6);
        assert_eq!(revised.daily_new_mortality(), vec![7, -1]);
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(json.starts_with(r#"{"code":13,"pref":"東京都","patients":[2595,2794,2988],"motarity":[50,58,68]"#));
        assert!(json.ends_with(r#""dates":["2020-04-17","2020-04-18","2020-04-19"]}"#));

        let back: RegionSeries = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample());
    }
}
