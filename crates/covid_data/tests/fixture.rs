//! Checks against the artifact published on 2020-04-19.

use chrono::NaiveDate;
use covid_data::models::prefs_js;
use covid_data::models::validate::{validate_artifact, validate_dataset, Violation};
use covid_data::{Artifact, LatestSnapshot, PREFECTURES};

const FIXTURE: &str = include_str!("fixtures/prefs.js");

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn artifact() -> Artifact {
    prefs_js::parse(FIXTURE).expect("fixture parses")
}

#[test]
fn test_fixture_shape() {
    let artifact = artifact();
    assert_eq!(artifact.data.last_update, ymd(2020, 4, 19));
    assert_eq!(artifact.data.prefs.len(), 47);
    assert_eq!(artifact.latest.len(), 47);

    for (series, pref) in artifact.data.prefs.iter().zip(PREFECTURES) {
        assert_eq!(series.code, pref.code);
        assert_eq!(series.name, pref.kanji);
        assert_eq!(series.len(), 43);
        assert_eq!(series.first_date(), Some(ymd(2020, 3, 8)));
        assert_eq!(series.last_date(), Some(ymd(2020, 4, 19)));
    }
}

#[test]
fn test_tokyo_leads_latest() {
    let artifact = artifact();
    let tokyo = artifact.data.region_by_code(13).unwrap();
    assert_eq!(tokyo.name, "東京都");
    let latest = tokyo.latest().unwrap();
    assert_eq!(latest.patients, 2988);
    assert_eq!(latest.date, ymd(2020, 4, 19));

    assert_eq!(artifact.latest.patients[0], 2988);
    assert_eq!(artifact.latest.prefs[0], "東京都");
    assert_eq!(artifact.latest.mortality[0], 68);
}

#[test]
fn test_published_latest_matches_projection() {
    let artifact = artifact();
    assert_eq!(LatestSnapshot::from_dataset(&artifact.data), artifact.latest);
    assert!(artifact.latest.check_shape().is_empty());
    assert!(artifact.latest.check_against(&artifact.data).is_empty());
}

#[test]
fn test_structural_properties_hold() {
    let report = validate_dataset(&artifact().data);
    assert!(!report.iter().any(|violation| matches!(
        violation,
        Violation::LengthMismatch { .. }
            | Violation::NonConsecutiveDates { .. }
            | Violation::MortalityExceedsPatients { .. }
            | Violation::DuplicateCode { .. }
            | Violation::StaleLastUpdate { .. }
    )));
}

#[test]
fn test_downward_revisions_are_reported() {
    let artifact = artifact();
    let report = validate_artifact(&artifact.data, &artifact.latest);

    assert_eq!(report.len(), 10);
    assert_eq!(
        report.violations[0],
        Violation::MortalityDecreased {
            region: "北海道".to_string(),
            index: 13,
            previous: 7,
            current: 6,
        }
    );
    assert_eq!(
        report.violations[1],
        Violation::PatientsDecreased {
            region: "埼玉県".to_string(),
            index: 8,
            previous: 27,
            current: 26,
        }
    );
    assert_eq!(report.for_region("神奈川県").count(), 2);
    assert_eq!(report.for_region("愛知県").count(), 2);
    assert_eq!(report.for_region("東京都").count(), 0);
}

#[test]
fn test_render_reproduces_fixture() {
    let artifact = artifact();
    assert_eq!(prefs_js::render(&artifact).unwrap(), FIXTURE);
}

#[test]
fn test_national_totals() {
    let totals = artifact().data.totals_on(ymd(2020, 4, 19));
    assert_eq!(totals.regions, 47);
    assert_eq!(totals.patients, 10219);
    assert_eq!(totals.mortality, 210);
}
