use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::latest::LatestSnapshot;
use super::region_series::RegionSeries;

/// The per-region collection published as `data` in the artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(rename = "lastUpdate")]
    pub last_update: NaiveDate,
    pub prefs: Vec<RegionSeries>,
}

/// Sum over all regions reporting a given date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    pub regions: usize,
    pub patients: u64,
    pub mortality: u64,
}

impl Dataset {
    pub fn new(last_update: NaiveDate, prefs: Vec<RegionSeries>) -> Self {
        Self { last_update, prefs }
    }

    pub fn region_by_code(&self, code: u8) -> Option<&RegionSeries> {
        self.prefs.iter().find(|series| series.code == code)
    }

    pub fn region_by_name(&self, name: &str) -> Option<&RegionSeries> {
        self.prefs.iter().find(|series| series.name == name)
    }

    /// Earliest first date and latest last date over all non-empty regions.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.prefs.iter().filter_map(RegionSeries::first_date).min()?;
        let last = self.prefs.iter().filter_map(RegionSeries::last_date).max()?;
        Some((first, last))
    }

    pub fn totals_on(&self, date: NaiveDate) -> Totals {
        self.prefs
            .iter()
            .filter_map(|series| series.point_on(date))
            .fold(Totals::default(), |acc, point| Totals {
                regions: acc.regions + 1,
                patients: acc.patients + u64::from(point.patients),
                mortality: acc.mortality + u64::from(point.mortality),
            })
    }

    pub fn latest_snapshot(&self) -> LatestSnapshot {
        LatestSnapshot::from_dataset(self)
    }
}
