use chrono::NaiveDate;
use lazy_static::lazy_static;
use std::env;
use std::path::{Path, PathBuf};

pub const DATA_DIR_ENV: &str = "COVID19_DATA_DIR";
pub const DOCS_DIR_ENV: &str = "COVID19_DOCS_DIR";
pub const SOURCE_DIR_ENV: &str = "COVID19_SOURCE_DIR";

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_DOCS_DIR: &str = "docs";
pub const DEFAULT_SOURCE_DIR: &str = "source";

/// Name of the artifact inside the docs directory.
pub const ARTIFACT_FILE: &str = "prefs.js";

/// First publication date of the MHLW tables; import never walks back further.
pub const EARLIEST_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2020, 1, 16) {
    Some(date) => date,
    None => panic!("invalid earliest date"),
};

lazy_static! {
    /// Directory holding the daily `prefsYYYY-MM-DD.json` snapshots
    pub static ref DATA_DIR: PathBuf = dir_from_env(DATA_DIR_ENV, DEFAULT_DATA_DIR);

    /// Directory the `prefs.js` artifact is published to
    pub static ref DOCS_DIR: PathBuf = dir_from_env(DOCS_DIR_ENV, DEFAULT_DOCS_DIR);

    /// Directory holding the downloaded MHLW CSV tables
    pub static ref SOURCE_DIR: PathBuf = dir_from_env(SOURCE_DIR_ENV, DEFAULT_SOURCE_DIR);
}

fn dir_from_env(var: &str, default: &str) -> PathBuf {
    env::var(var)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}

/// Resolved locations used by the snapshot pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub docs_dir: PathBuf,
    pub source_dir: PathBuf,
}

impl Config {
    pub fn new<P: AsRef<Path>>(data_dir: P, docs_dir: P, source_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            docs_dir: docs_dir.as_ref().to_path_buf(),
            source_dir: source_dir.as_ref().to_path_buf(),
        }
    }

    /// Configuration read once from the environment.
    pub fn from_env() -> Self {
        Self {
            data_dir: DATA_DIR.clone(),
            docs_dir: DOCS_DIR.clone(),
            source_dir: SOURCE_DIR.clone(),
        }
    }

    pub fn artifact_path(&self) -> PathBuf {
        self.docs_dir.join(ARTIFACT_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dir_from_env_default() {
        assert_eq!(
            dir_from_env("COVID19_TEST_UNSET_VARIABLE", DEFAULT_DATA_DIR),
            PathBuf::from("data")
        );
    }

    #[test]
    fn test_artifact_path() {
        let config = Config::new("d", "out", "src");
        assert_eq!(config.artifact_path(), PathBuf::from("out").join("prefs.js"));
        assert_eq!(config.data_dir, PathBuf::from("d"));
    }

    #[test]
    fn test_earliest_date() {
        assert_eq!(EARLIEST_DATE.to_string(), "2020-01-16");
    }
}
