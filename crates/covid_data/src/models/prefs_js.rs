//! Reader and writer for the `prefs.js` artifact consumed by the charts.
//!
//! The file holds two bindings:
//!
//! ```text
//! let data = {"lastUpdate":"2020-04-19","prefs":[...]};
//! let latest = {prefs: [...], patients: [...], motarity: [...]};
//! ```
//!
//! `data` is strict JSON. `latest` is a JavaScript object literal with bare
//! keys, which are quoted before decoding.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use super::dataset::Dataset;
use super::latest::LatestSnapshot;
use crate::errors::{DataError, DataResult};

static BINDING_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\b(?:let|const|var)\s+(?P<name>[A-Za-z_$][A-Za-z0-9_$]*)\s*=\s*(?P<value>\{.*?\})\s*;")
        .expect("Invalid regex pattern for artifact bindings")
});

pub const DATA_BINDING: &str = "data";
pub const LATEST_BINDING: &str = "latest";

/// Both structures of a published artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub data: Dataset,
    pub latest: LatestSnapshot,
}

impl Artifact {
    /// Builds an artifact whose latest snapshot is projected from `data`.
    pub fn from_dataset(data: Dataset) -> Self {
        let latest = LatestSnapshot::from_dataset(&data);
        Self { data, latest }
    }
}

fn binding<'a>(text: &'a str, name: &str) -> DataResult<&'a str> {
    BINDING_PATTERN
        .captures_iter(text)
        .find(|captures| &captures["name"] == name)
        .and_then(|captures| captures.name("value"))
        .map(|value| value.as_str())
        .ok_or_else(|| DataError::MissingBinding(name.to_string()))
}

/// Quotes bare object keys of a JavaScript object literal so that the
/// result is valid JSON. String literals are copied untouched.
pub fn quote_bare_keys(literal: &str) -> String {
    let chars: Vec<char> = literal.chars().collect();
    let mut out = String::with_capacity(literal.len() + 16);
    let mut in_string = false;
    let mut escaped = false;
    let mut last_significant = None;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
                last_significant = Some('"');
            }
            i += 1;
            continue;
        }

        if c == '"' {
            in_string = true;
            out.push(c);
            i += 1;
            continue;
        }

        let starts_ident = c.is_ascii_alphabetic() || c == '_' || c == '$';
        if starts_ident && matches!(last_significant, Some('{') | Some(',')) {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_' || chars[i] == '$') {
                i += 1;
            }
            let ident: String = chars[start..i].iter().collect();

            let mut lookahead = i;
            while lookahead < chars.len() && chars[lookahead].is_whitespace() {
                lookahead += 1;
            }

            if chars.get(lookahead) == Some(&':') {
                out.push('"');
                out.push_str(&ident);
                out.push('"');
            } else {
                out.push_str(&ident);
            }
            last_significant = ident.chars().last();
            continue;
        }

        if !c.is_whitespace() {
            last_significant = Some(c);
        }
        out.push(c);
        i += 1;
    }

    out
}

/// Parses the text of a `prefs.js` artifact.
pub fn parse(text: &str) -> DataResult<Artifact> {
    let data: Dataset = serde_json::from_str(binding(text, DATA_BINDING)?)?;
    let latest: LatestSnapshot =
        serde_json::from_str(&quote_bare_keys(binding(text, LATEST_BINDING)?))?;

    log::debug!(
        "Parsed artifact: {} regions, {} latest entries, last update {}",
        data.prefs.len(),
        latest.len(),
        data.last_update
    );

    Ok(Artifact { data, latest })
}

/// Renders an artifact in the same two-binding layout it is read from.
pub fn render(artifact: &Artifact) -> DataResult<String> {
    let latest = &artifact.latest;
    Ok(format!(
        "let {DATA_BINDING} = {};\nlet {LATEST_BINDING} = {{prefs: {}, patients: {}, motarity: {}}};\n",
        serde_json::to_string(&artifact.data)?,
        serde_json::to_string(&latest.prefs)?,
        serde_json::to_string(&latest.patients)?,
        serde_json::to_string(&latest.mortality)?,
    ))
}

pub fn read<P: AsRef<Path>>(path: P) -> DataResult<Artifact> {
    let text = std::fs::read_to_string(path.as_ref())?;
    parse(&text)
}

pub fn write<P: AsRef<Path>>(path: P, artifact: &Artifact) -> DataResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, render(artifact)?)?;
    log::info!("Wrote {}", path.display());
    Ok(())
}

/// Async version of read
pub async fn read_async<P: AsRef<Path>>(path: P) -> DataResult<Artifact> {
    let text = tokio::fs::read_to_string(path.as_ref()).await?;
    parse(&text)
}
