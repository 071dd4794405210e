use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::dataset::Dataset;
use super::validate::Violation;

/// Cross-section of every region at its most recent date, ranked by
/// descending patient count.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LatestSnapshot {
    pub prefs: Vec<String>,
    pub patients: Vec<u32>,
    #[serde(rename = "motarity")]
    pub mortality: Vec<u32>,
}

impl LatestSnapshot {
    /// Projects a dataset: last patients/mortality element of each region,
    /// sorted descending by patients. Ties keep collection order; regions
    /// with an empty series are left out.
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let mut rows: Vec<(&str, u32, u32)> = dataset
            .prefs
            .iter()
            .filter_map(|series| {
                let patients = *series.patients.last()?;
                let mortality = *series.mortality.last()?;
                Some((series.name.as_str(), patients, mortality))
            })
            .collect();

        rows.sort_by(|a, b| b.1.cmp(&a.1));

        let mut snapshot = Self::default();
        for (name, patients, mortality) in rows {
            snapshot.prefs.push(name.to_string());
            snapshot.patients.push(patients);
            snapshot.mortality.push(mortality);
        }
        snapshot
    }

    pub fn len(&self) -> usize {
        self.prefs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefs.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, u32, u32)> + '_ {
        self.prefs
            .iter()
            .zip(&self.patients)
            .zip(&self.mortality)
            .map(|((name, patients), mortality)| (name.as_str(), *patients, *mortality))
    }

    /// Zero-based rank of a region, if present.
    pub fn rank_of(&self, name: &str) -> Option<usize> {
        self.prefs.iter().position(|pref| pref == name)
    }

    /// Checks the snapshot's own shape: equal lengths, distinct regions and
    /// non-increasing patients.
    pub fn check_shape(&self) -> Vec<Violation> {
        let mut violations = Vec::new();

        if self.patients.len() != self.prefs.len() || self.mortality.len() != self.prefs.len() {
            violations.push(Violation::LatestLengthMismatch {
                prefs: self.prefs.len(),
                patients: self.patients.len(),
                mortality: self.mortality.len(),
            });
        }

        let mut seen = HashSet::new();
        for name in &self.prefs {
            if !seen.insert(name.as_str()) {
                violations.push(Violation::DuplicateInLatest { region: name.clone() });
            }
        }

        for (index, pair) in self.patients.windows(2).enumerate() {
            if pair[1] > pair[0] {
                violations.push(Violation::LatestNotSorted {
                    index: index + 1,
                    previous: pair[0],
                    current: pair[1],
                });
            }
        }

        violations
    }

    /// Compares the snapshot with the projection of `dataset`.
    pub fn check_against(&self, dataset: &Dataset) -> Vec<Violation> {
        let mut violations = Vec::new();

        for series in &dataset.prefs {
            let Some(latest) = series.latest() else {
                continue;
            };
            let Some(rank) = self.rank_of(&series.name) else {
                violations.push(Violation::MissingFromLatest {
                    region: series.name.clone(),
                });
                continue;
            };

            if let Some(&patients) = self.patients.get(rank) {
                if patients != latest.patients {
                    violations.push(Violation::LatestPatientsMismatch {
                        region: series.name.clone(),
                        latest: patients,
                        series: latest.patients,
                    });
                }
            }
            if let Some(&mortality) = self.mortality.get(rank) {
                if mortality != latest.mortality {
                    violations.push(Violation::LatestMortalityMismatch {
                        region: series.name.clone(),
                        latest: mortality,
                        series: latest.mortality,
                    });
                }
            }
        }

        let known: HashSet<&str> = dataset.prefs.iter().map(|series| series.name.as_str()).collect();
        for name in &self.prefs {
            if !known.contains(name.as_str()) {
                violations.push(Violation::UnknownInLatest {
                    region: name.clone(),
                });
            }
        }

        violations
    }
}
