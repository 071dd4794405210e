use super::daily::DailySnapshot;
use super::dataset::Dataset;
use super::date_utils::is_next_day;
use super::prefectures::{by_kanji, PREFECTURES};
use super::region_series::RegionSeries;
use crate::errors::{DataError, DataResult};

/// Folds daily cross-sections into one series per prefecture.
///
/// Snapshots are sorted by date and must be one day apart. Every snapshot
/// must carry every prefecture; series come out in prefecture code order
/// and `lastUpdate` is the newest snapshot date.
pub fn assemble(mut snapshots: Vec<DailySnapshot>) -> DataResult<Dataset> {
    snapshots.sort_by_key(|snapshot| snapshot.date);

    for pair in snapshots.windows(2) {
        if !is_next_day(pair[0].date, pair[1].date) {
            return Err(DataError::DateGap {
                previous: pair[0].date,
                next: pair[1].date,
            });
        }
    }

    let last_update = snapshots.last().ok_or(DataError::NoSnapshots)?.date;

    let mut prefs: Vec<RegionSeries> = PREFECTURES
        .iter()
        .map(|pref| RegionSeries::new(pref.code, pref.kanji))
        .collect();

    for snapshot in &snapshots {
        for series in prefs.iter_mut() {
            let record = snapshot.record(&series.name).ok_or_else(|| DataError::MissingRegion {
                region: series.name.clone(),
                date: snapshot.date,
            })?;
            series.push(snapshot.date, record.patients, record.mortality);
        }

        for record in &snapshot.prefs {
            if by_kanji(&record.pref).is_err() {
                return Err(DataError::UnknownRegion(record.pref.clone()));
            }
        }
    }

    log::info!(
        "Assembled {} daily snapshots into {} region series (last update {})",
        snapshots.len(),
        prefs.len(),
        last_update
    );

    Ok(Dataset::new(last_update, prefs))
}
