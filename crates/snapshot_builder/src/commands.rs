use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use covid_data::models::config::EARLIEST_DATE;
use covid_data::models::date_utils::{days_back_until, format_date_label, parse_iso_date};
use covid_data::models::mhlw_csv::{daily_snapshot, CsvSources};
use covid_data::models::validate::{validate_artifact, ValidationReport};
use covid_data::models::{arrow_export, daily, prefs_js};
use covid_data::{assemble, Artifact, Config, DataError, LatestSnapshot};

/// Builds and checks the per-prefecture `prefs.js` artifact.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(
    name = "snapshot_builder",
    version,
    about,
    after_help = "environment: COVID19_DATA_DIR, COVID19_DOCS_DIR, COVID19_SOURCE_DIR, RUST_LOG"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Build daily snapshots from the local MHLW tables, then publish.
    Import {
        /// Publication dates (YYYY-MM-DD); defaults to every missing date up to today.
        #[arg(value_parser = parse_iso_date)]
        dates: Vec<NaiveDate>,
    },
    /// Assemble daily snapshots into prefs.js.
    Build {
        /// Output path; defaults to <docs_dir>/prefs.js.
        out: Option<PathBuf>,
    },
    /// Validate a prefs.js artifact.
    Check { path: Option<PathBuf> },
    /// Print the latest ranking.
    Latest { path: Option<PathBuf> },
    /// Write the series as an Arrow IPC file.
    ExportArrow { input: PathBuf, output: PathBuf },
}

/// Writes daily snapshots for `dates`, or, when empty, for the dates
/// between the newest snapshot on disk and `today`.
///
/// The automatic walk runs oldest first and stops at the first date without
/// source rows so the snapshots on disk stay consecutive. Leading dates are
/// skipped only while no snapshot exists yet (tables starting later than
/// the walk floor).
pub fn import(config: &Config, dates: &[NaiveDate], today: NaiveDate) -> Result<Vec<PathBuf>> {
    let sources = CsvSources::load_dir(&config.source_dir)
        .with_context(|| format!("loading MHLW tables from {}", config.source_dir.display()))?;

    let explicit = !dates.is_empty();
    let existing: HashSet<NaiveDate> = daily::list_dates(&config.data_dir)?.into_iter().collect();
    let dates = if explicit {
        dates.to_vec()
    } else {
        let mut missing = days_back_until(today, &existing, EARLIEST_DATE);
        missing.reverse();
        missing
    };
    log::info!("Importing {} dates", dates.len());

    let mut written = Vec::new();
    for date in dates {
        match daily_snapshot(date, &sources) {
            Ok(snapshot) => written.push(daily::write(&config.data_dir, &snapshot)?),
            Err(DataError::MissingRegion { region, date: row_date }) if !explicit => {
                if existing.is_empty() && written.is_empty() {
                    log::debug!("Skipping {date}: no rows for {region} on {row_date}");
                    continue;
                }
                log::warn!("Stopping at {date}: no rows for {region} on {row_date}");
                break;
            }
            Err(e) => return Err(e).with_context(|| format!("building snapshot for {date}")),
        }
    }
    Ok(written)
}

/// Assembles every daily snapshot and publishes the artifact.
pub async fn build(config: &Config, output: Option<&Path>) -> Result<PathBuf> {
    let snapshots = daily::read_all_async(&config.data_dir)
        .await
        .with_context(|| format!("reading daily snapshots from {}", config.data_dir.display()))?;
    let artifact = Artifact::from_dataset(assemble(snapshots)?);

    let path = output.map(Path::to_path_buf).unwrap_or_else(|| config.artifact_path());
    prefs_js::write(&path, &artifact)?;
    Ok(path)
}

async fn load(config: &Config, path: Option<&Path>) -> Result<Artifact> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(|| config.artifact_path());
    prefs_js::read_async(&path)
        .await
        .with_context(|| format!("reading artifact {}", path.display()))
}

pub async fn check(config: &Config, path: Option<&Path>) -> Result<ValidationReport> {
    let artifact = load(config, path).await?;
    let report = validate_artifact(&artifact.data, &artifact.latest);
    for violation in report.iter() {
        log::warn!("{violation}");
    }
    Ok(report)
}

/// Renders the ranking recomputed from the series.
pub fn format_ranking(latest: &LatestSnapshot, date: NaiveDate) -> String {
    let mut out = format!("{} 時点\n", format_date_label(date));
    out.push_str(&format!("{:>4}  {:<8}{:>10}{:>10}\n", "rank", "pref", "patients", "mortality"));
    for (rank, (name, patients, mortality)) in latest.entries().enumerate() {
        out.push_str(&format!("{:>4}  {:<8}{:>10}{:>10}\n", rank + 1, name, patients, mortality));
    }
    out
}

pub async fn latest(config: &Config, path: Option<&Path>) -> Result<String> {
    let artifact = load(config, path).await?;
    Ok(format_ranking(&artifact.data.latest_snapshot(), artifact.data.last_update))
}

pub async fn export_arrow(config: &Config, input: &Path, output: &Path) -> Result<usize> {
    let artifact = load(config, Some(input)).await?;
    Ok(arrow_export::write_ipc_file(output, &artifact.data)?)
}

/// Runs a command and returns the process exit code.
pub async fn run(command: Command, config: &Config, today: NaiveDate) -> Result<i32> {
    match command {
        Command::Import { dates } => {
            let written = import(config, &dates, today)?;
            println!("Wrote {} daily snapshots", written.len());
            if !written.is_empty() {
                let path = build(config, None).await?;
                println!("Published {}", path.display());
            }
        }
        Command::Build { out } => {
            let path = build(config, out.as_deref()).await?;
            println!("Published {}", path.display());
        }
        Command::Check { path } => {
            let report = check(config, path.as_deref()).await?;
            if report.is_clean() {
                println!("OK: no violations");
            } else {
                println!("{} violations", report.len());
                return Ok(1);
            }
        }
        Command::Latest { path } => print!("{}", latest(config, path.as_deref()).await?),
        Command::ExportArrow { input, output } => {
            let rows = export_arrow(config, &input, &output).await?;
            println!("Wrote {rows} rows to {}", output.display());
        }
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use covid_data::models::mhlw_csv::Table;
    use covid_data::PREFECTURES;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Writes cases and deaths tables covering `days` (MHLW row dates).
    fn write_sources(dir: &Path, days: &[NaiveDate]) {
        std::fs::create_dir_all(dir).unwrap();
        let mut cases = String::from("Date,Prefecture,Cases\n");
        let mut deaths = String::from("Date,Prefecture,Deaths\n");
        for (offset, day) in days.iter().enumerate() {
            let date = covid_data::models::date_utils::format_mhlw_date(*day);
            for pref in PREFECTURES {
                let base = u32::from(pref.code) * 10 + offset as u32;
                cases.push_str(&format!("{date},{},{}\n", pref.romaji, base));
                deaths.push_str(&format!("{date},{},{}\n", pref.romaji, offset));
            }
        }
        std::fs::write(dir.join(Table::ConfirmedCasesCumulativeDaily.file_name()), cases).unwrap();
        std::fs::write(dir.join(Table::DeathsCumulativeDaily.file_name()), deaths).unwrap();
    }

    fn config(root: &Path) -> Config {
        Config::new(root.join("data"), root.join("docs"), root.join("source"))
    }

    fn parse(values: &[&str]) -> Result<Command, clap::Error> {
        Cli::try_parse_from(std::iter::once("snapshot_builder").chain(values.iter().copied()))
            .map(|cli| cli.command)
    }

    #[test]
    fn test_parse_args() {
        assert_eq!(
            parse(&["import", "2020-04-18", "2020-04-19"]).unwrap(),
            Command::Import {
                dates: vec![ymd(2020, 4, 18), ymd(2020, 4, 19)]
            }
        );
        assert_eq!(parse(&["import"]).unwrap(), Command::Import { dates: vec![] });
        assert_eq!(parse(&["build"]).unwrap(), Command::Build { out: None });
        assert_eq!(
            parse(&["check", "docs/prefs.js"]).unwrap(),
            Command::Check {
                path: Some(PathBuf::from("docs/prefs.js"))
            }
        );
        assert_eq!(
            parse(&["export-arrow", "a.js", "b.arrow"]).unwrap(),
            Command::ExportArrow {
                input: PathBuf::from("a.js"),
                output: PathBuf::from("b.arrow"),
            }
        );

        assert!(parse(&[]).is_err());
        assert!(parse(&["import", "2020/04/19"]).is_err());
        assert!(parse(&["latest", "a", "b"]).is_err());
        assert!(parse(&["export-arrow", "a"]).is_err());
        assert!(parse(&["serve"]).is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_format_ranking() {
        let latest = LatestSnapshot {
            prefs: vec!["東京都".to_string(), "大阪府".to_string()],
            patients: vec![2988, 1164],
            mortality: vec![68, 10],
        };
        let text = format_ranking(&latest, ymd(2020, 4, 19));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "2020年4月19日 時点");
        assert!(lines[2].starts_with("   1  東京都"));
        assert!(lines[2].ends_with("2988        68"));
    }

    #[tokio::test]
    async fn test_import_build_check_pipeline() {
        let root = tempfile::tempdir().unwrap();
        let config = config(root.path());
        write_sources(&config.source_dir, &[ymd(2020, 4, 16), ymd(2020, 4, 17), ymd(2020, 4, 18)]);

        // Nothing on disk yet: leading dates without rows are skipped, the walk stops at 04-20
        let written = import(&config, &[], ymd(2020, 4, 20)).unwrap();
        assert_eq!(written.len(), 3);
        assert_eq!(written[0], daily::path_for(&config.data_dir, ymd(2020, 4, 17)));
        assert_eq!(written[2], daily::path_for(&config.data_dir, ymd(2020, 4, 19)));

        let path = build(&config, None).await.unwrap();
        assert_eq!(path, config.artifact_path());

        let report = check(&config, None).await.unwrap();
        assert!(report.is_clean(), "{:?}", report);

        let text = latest(&config, None).await.unwrap();
        assert!(text.starts_with("2020年4月19日 時点\n"));
        assert!(text.lines().nth(2).unwrap().contains("沖縄県"));

        let rows = export_arrow(&config, &path, &root.path().join("prefs.arrow")).await.unwrap();
        assert_eq!(rows, 47 * 3);
    }

    #[test]
    fn test_import_walks_back_to_existing() {
        let root = tempfile::tempdir().unwrap();
        let config = config(root.path());
        write_sources(&config.source_dir, &[ymd(2020, 4, 17), ymd(2020, 4, 18), ymd(2020, 4, 19)]);

        import(&config, &[ymd(2020, 4, 18)], ymd(2020, 4, 18)).unwrap();
        let written = import(&config, &[], ymd(2020, 4, 20)).unwrap();
        assert_eq!(written.len(), 2);

        let dates: Vec<NaiveDate> = daily::list_dates(&config.data_dir).unwrap().into_iter().collect();
        assert_eq!(dates, vec![ymd(2020, 4, 18), ymd(2020, 4, 19), ymd(2020, 4, 20)]);
    }

    #[tokio::test]
    async fn test_import_stops_at_first_hole() {
        let root = tempfile::tempdir().unwrap();
        let config = config(root.path());
        // Rows for 04-16 and 04-18 only: the 04-18 publication (04-17 rows) is a hole
        write_sources(&config.source_dir, &[ymd(2020, 4, 16), ymd(2020, 4, 18)]);

        let written = import(&config, &[], ymd(2020, 4, 20)).unwrap();
        assert_eq!(written, vec![daily::path_for(&config.data_dir, ymd(2020, 4, 17))]);

        let path = build(&config, None).await.unwrap();
        assert!(prefs_js::read(&path).is_ok());

        // With a snapshot on disk, a hole right after it stops the walk at once
        let written = import(&config, &[], ymd(2020, 4, 20)).unwrap();
        assert!(written.is_empty());
        let dates: Vec<NaiveDate> = daily::list_dates(&config.data_dir).unwrap().into_iter().collect();
        assert_eq!(dates, vec![ymd(2020, 4, 17)]);
    }

    #[test]
    fn test_import_explicit_date_without_rows_fails() {
        let root = tempfile::tempdir().unwrap();
        let config = config(root.path());
        write_sources(&config.source_dir, &[ymd(2020, 4, 17)]);

        assert!(import(&config, &[ymd(2020, 5, 1)], ymd(2020, 5, 1)).is_err());
    }

    #[tokio::test]
    async fn test_check_reports_violations() {
        let root = tempfile::tempdir().unwrap();
        let config = config(root.path());
        let path = root.path().join("broken.js");
        std::fs::write(
            &path,
            "let data = {\"lastUpdate\":\"2020-04-19\",\"prefs\":[{\"code\":13,\"pref\":\"東京都\",\"patients\":[5,4],\"motarity\":[0,0],\"dates\":[\"2020-04-18\",\"2020-04-19\"]}]};\nlet latest = {prefs: [\"東京都\"], patients: [4], motarity: [0]};\n",
        )
        .unwrap();

        let report = check(&config, Some(&path)).await.unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(run(Command::Check { path: Some(path) }, &config, ymd(2020, 4, 20)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_missing_artifact_is_an_error() {
        let root = tempfile::tempdir().unwrap();
        let config = config(root.path());
        assert!(check(&config, None).await.is_err());
    }
}
