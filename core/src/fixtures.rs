//! Test-data fixtures stored as JSON or YAML files.

use std::{fs::File, io::BufReader, path::Path};

use serde_json::Value;

use crate::error::FixtureError;

/// Load `filename` from `dir`, picking the decoder from the file suffix.
pub fn load_test_data(dir: &Path, filename: &str) -> Result<Value, FixtureError> {
    let path = dir.join(filename);
    let suffix = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match suffix.as_str() {
        "json" => {
            let reader = BufReader::new(File::open(&path)?);
            Ok(serde_json::from_reader(reader)?)
        }
        "yaml" | "yml" => {
            let reader = BufReader::new(File::open(&path)?);
            Ok(serde_yaml::from_reader(reader)?)
        }
        _ => Err(FixtureError::UnsupportedFormat(suffix)),
    }
}
