//! Invariant checks for region series, datasets and latest snapshots.
//!
//! Violations are collected, never raised: historic source tables contain
//! downward revisions, so a published artifact can legitimately fail some
//! checks and still be loaded.

use chrono::NaiveDate;
use rayon::prelude::*;
use std::collections::HashSet;
use thiserror::Error;

use super::dataset::Dataset;
use super::date_utils::is_next_day;
use super::latest::LatestSnapshot;
use super::region_series::RegionSeries;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("{region}: sequence lengths differ (patients {patients}, mortality {mortality}, dates {dates})")]
    LengthMismatch {
        region: String,
        patients: usize,
        mortality: usize,
        dates: usize,
    },

    #[error("{region}: date {current} at index {index} does not follow {previous}")]
    NonConsecutiveDates {
        region: String,
        index: usize,
        previous: NaiveDate,
        current: NaiveDate,
    },

    #[error("{region}: patients decrease at index {index} ({previous} -> {current})")]
    PatientsDecreased {
        region: String,
        index: usize,
        previous: u32,
        current: u32,
    },

    #[error("{region}: mortality decreases at index {index} ({previous} -> {current})")]
    MortalityDecreased {
        region: String,
        index: usize,
        previous: u32,
        current: u32,
    },

    #[error("{region}: mortality {mortality} exceeds patients {patients} at index {index}")]
    MortalityExceedsPatients {
        region: String,
        index: usize,
        patients: u32,
        mortality: u32,
    },

    #[error("duplicate region code {code}")]
    DuplicateCode { code: u8 },

    #[error("lastUpdate {last_update} is older than the newest series date {newest}")]
    StaleLastUpdate {
        last_update: NaiveDate,
        newest: NaiveDate,
    },

    #[error("latest arrays differ in length (prefs {prefs}, patients {patients}, mortality {mortality})")]
    LatestLengthMismatch {
        prefs: usize,
        patients: usize,
        mortality: usize,
    },

    #[error("latest patients not sorted at index {index} ({previous} < {current})")]
    LatestNotSorted {
        index: usize,
        previous: u32,
        current: u32,
    },

    #[error("{region}: latest patients {latest} but series ends with {series}")]
    LatestPatientsMismatch {
        region: String,
        latest: u32,
        series: u32,
    },

    #[error("{region}: latest mortality {latest} but series ends with {series}")]
    LatestMortalityMismatch {
        region: String,
        latest: u32,
        series: u32,
    },

    #[error("{region}: missing from latest")]
    MissingFromLatest { region: String },

    #[error("{region}: in latest but not in the region collection")]
    UnknownInLatest { region: String },

    #[error("{region}: listed more than once in latest")]
    DuplicateInLatest { region: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter()
    }

    /// Violations that concern a given region.
    pub fn for_region<'a>(&'a self, region: &'a str) -> impl Iterator<Item = &'a Violation> + 'a {
        self.violations
            .iter()
            .filter(move |violation| violation.region() == Some(region))
    }
}

impl Violation {
    pub fn region(&self) -> Option<&str> {
        match self {
            Violation::LengthMismatch { region, .. }
            | Violation::NonConsecutiveDates { region, .. }
            | Violation::PatientsDecreased { region, .. }
            | Violation::MortalityDecreased { region, .. }
            | Violation::MortalityExceedsPatients { region, .. }
            | Violation::LatestPatientsMismatch { region, .. }
            | Violation::LatestMortalityMismatch { region, .. }
            | Violation::MissingFromLatest { region }
            | Violation::UnknownInLatest { region }
            | Violation::DuplicateInLatest { region } => Some(region),
            Violation::DuplicateCode { .. }
            | Violation::StaleLastUpdate { .. }
            | Violation::LatestLengthMismatch { .. }
            | Violation::LatestNotSorted { .. } => None,
        }
    }
}

/// Checks one region series, in index order.
pub fn validate_series(series: &RegionSeries) -> Vec<Violation> {
    let mut violations = Vec::new();
    let region = &series.name;

    if !series.is_aligned() {
        violations.push(Violation::LengthMismatch {
            region: region.clone(),
            patients: series.patients.len(),
            mortality: series.mortality.len(),
            dates: series.dates.len(),
        });
    }

    for (index, pair) in series.dates.windows(2).enumerate() {
        if !is_next_day(pair[0], pair[1]) {
            violations.push(Violation::NonConsecutiveDates {
                region: region.clone(),
                index: index + 1,
                previous: pair[0],
                current: pair[1],
            });
        }
    }

    for (index, pair) in series.patients.windows(2).enumerate() {
        if pair[1] < pair[0] {
            violations.push(Violation::PatientsDecreased {
                region: region.clone(),
                index: index + 1,
                previous: pair[0],
                current: pair[1],
            });
        }
    }

    for (index, pair) in series.mortality.windows(2).enumerate() {
        if pair[1] < pair[0] {
            violations.push(Violation::MortalityDecreased {
                region: region.clone(),
                index: index + 1,
                previous: pair[0],
                current: pair[1],
            });
        }
    }

    for (index, (patients, mortality)) in series.patients.iter().zip(&series.mortality).enumerate() {
        if mortality > patients {
            violations.push(Violation::MortalityExceedsPatients {
                region: region.clone(),
                index,
                patients: *patients,
                mortality: *mortality,
            });
        }
    }

    violations
}

/// Checks every region (in parallel) plus dataset-level properties.
pub fn validate_dataset(dataset: &Dataset) -> ValidationReport {
    let per_region: Vec<Vec<Violation>> = dataset.prefs.par_iter().map(validate_series).collect();
    let mut violations: Vec<Violation> = per_region.into_iter().flatten().collect();

    let mut seen = HashSet::new();
    for series in &dataset.prefs {
        if !seen.insert(series.code) {
            violations.push(Violation::DuplicateCode { code: series.code });
        }
    }

    if let Some((_, newest)) = dataset.date_span() {
        if dataset.last_update < newest {
            violations.push(Violation::StaleLastUpdate {
                last_update: dataset.last_update,
                newest,
            });
        }
    }

    log::debug!(
        "Validated {} regions: {} violations",
        dataset.prefs.len(),
        violations.len()
    );

    ValidationReport { violations }
}

/// Checks a dataset together with the latest snapshot published beside it.
pub fn validate_artifact(dataset: &Dataset, latest: &LatestSnapshot) -> ValidationReport {
    let mut report = validate_dataset(dataset);
    report.violations.extend(latest.check_shape());
    report.violations.extend(latest.check_against(dataset));
    report
}
