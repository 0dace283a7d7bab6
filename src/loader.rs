use crate::error::{DemoForgeError, DfResult};
use crate::model::Distribution;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One county as read from disk, before registry construction.
#[derive(Debug, Clone, PartialEq)]
pub struct CountyRecord {
    pub name: String,
    pub region: String,
    pub population: u64,
    pub demographics: Distribution,
}

#[derive(Debug, Deserialize)]
struct RawCounty {
    name: String,
    state: String,
    population: u64,
    demographics: Value,
}

/// Walks `<root>/<region>/counties/` and reads every county file.
///
/// County files are JSON documents named by a numeric FIPS-style prefix
/// (`01001.json`); anything else in the directory is ignored. Entries are
/// visited in sorted order so the record sequence is stable across platforms.
/// A record with a non-numeric demographic leaf is skipped with a warning;
/// structural problems (missing fields, malformed JSON, unreadable files)
/// abort the load.
pub fn load_counties(root: &Path) -> DfResult<Vec<CountyRecord>> {
    let mut records = Vec::new();

    for region_dir in sorted_entries(root)? {
        if !region_dir.is_dir() {
            continue;
        }
        let counties_dir = region_dir.join("counties");
        if !counties_dir.is_dir() {
            continue;
        }

        for file in sorted_entries(&counties_dir)? {
            if !is_county_file(&file) {
                continue;
            }
            match read_county(&file) {
                Ok(record) => {
                    debug!("loaded {} ({})", record.name, file.display());
                    records.push(record);
                }
                Err(e @ DemoForgeError::UnsupportedType(_)) => {
                    warn!("⚠️  Skipping {}: {}", file.display(), e);
                }
                Err(e) => return Err(e),
            }
        }
    }

    Ok(records)
}

fn sorted_entries(dir: &Path) -> DfResult<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|entry| entry.path())
        .collect();
    entries.sort();
    Ok(entries)
}

// County files carry an all-digits FIPS stem, e.g. `01001.json`.
fn is_county_file(path: &Path) -> bool {
    if path.extension().and_then(|e| e.to_str()) != Some("json") {
        return false;
    }
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name,
        None => return false,
    };
    let stem = name.split('.').next().unwrap_or("");
    !stem.is_empty() && stem.bytes().all(|b| b.is_ascii_digit())
}

fn read_county(path: &Path) -> DfResult<CountyRecord> {
    let text = fs::read_to_string(path)?;
    let raw: RawCounty = match serde_json::from_str(&text) {
        Ok(raw) => raw,
        Err(e) if e.classify() == serde_json::error::Category::Data => {
            return Err(DemoForgeError::Validation(format!(
                "{}: {}",
                path.display(),
                e
            )));
        }
        Err(e) => return Err(e.into()),
    };

    let mut demographics = Distribution::new();
    flatten_json(&raw.demographics, "", &mut demographics)?;

    Ok(CountyRecord {
        name: raw.name,
        region: raw.state,
        population: raw.population,
        demographics,
    })
}

/// Flattens a nested numeric JSON object into `->`-joined category keys:
/// `{"age": {"0-18": 12}}` becomes `age->0-18`. A leaf that is neither an
/// object nor a number fails with `UnsupportedType` naming the flattened key.
pub fn flatten_json(value: &Value, prefix: &str, out: &mut Distribution) -> DfResult<()> {
    if let Value::Object(entries) = value {
        for (key, child) in entries {
            let flat_key = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}->{key}")
            };
            match child {
                Value::Object(_) => flatten_json(child, &flat_key, out)?,
                Value::Number(n) => out.set(&flat_key, n.as_f64().unwrap_or(0.0) as f32),
                _ => return Err(DemoForgeError::UnsupportedType(flat_key)),
            }
        }
    }
    Ok(())
}
