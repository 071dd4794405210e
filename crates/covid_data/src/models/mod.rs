pub mod arrow_export;
pub mod assemble;
pub mod config;
pub mod daily;
pub mod dataset;
pub mod date_utils;
pub mod latest;
pub mod mhlw_csv;
pub mod prefectures;
pub mod prefs_js;
pub mod region_series;
pub mod text_utils;
pub mod validate;

pub use arrow_export::{dataset_to_record_batch, write_ipc_file};
pub use assemble::assemble;
pub use config::Config;
pub use daily::{DailyRecord, DailySnapshot};
pub use dataset::Dataset;
pub use latest::LatestSnapshot;
pub use prefectures::{Prefecture, PREFECTURES};
pub use prefs_js::Artifact;
pub use region_series::RegionSeries;
pub use validate::{ValidationReport, Violation};
