//! Artifact file layout and JSON readers

use crate::error::{PricingError, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

pub const BRAND_LIST_FILE: &str = "marque_list.json";
pub const BRAND_MODELS_FILE: &str = "brand_model_dict.json";
pub const GEARBOX_LIST_FILE: &str = "boite_list.json";
pub const CONDITION_LIST_FILE: &str = "etat_list.json";
pub const LOCATION_LIST_FILE: &str = "localisation_list.json";
pub const BRAND_FREQ_FILE: &str = "marque_freq.json";
pub const MODEL_FREQ_FILE: &str = "modele_freq.json";
pub const LOCATION_MAPPING_FILE: &str = "localisation_mapping.json";
pub const MODEL_FILE: &str = "best_car_price_model.json";

/// Read and deserialize a required artifact.
pub fn read_json<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<T> {
    let path = dir.join(file);
    let raw = std::fs::read_to_string(&path).map_err(|e| PricingError::ArtifactError {
        path: path.clone(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&raw).map_err(|e| PricingError::ArtifactError {
        path,
        reason: e.to_string(),
    })
}

/// Read an artifact that may legitimately be absent.
///
/// A missing file yields `None`; a present but malformed file is still an error.
pub fn read_optional_json<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<Option<T>> {
    if !dir.join(file).exists() {
        return Ok(None);
    }
    read_json(dir, file).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_read_json_missing_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_json::<Vec<String>>(dir.path(), BRAND_LIST_FILE).unwrap_err();
        match err {
            PricingError::ArtifactError { path, .. } => {
                assert!(path.ends_with(BRAND_LIST_FILE));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_optional_json_absent() {
        let dir = tempfile::tempdir().unwrap();
        let mapping: Option<HashMap<String, i64>> =
            read_optional_json(dir.path(), LOCATION_MAPPING_FILE).unwrap();
        assert!(mapping.is_none());
    }

    #[test]
    fn test_read_optional_json_malformed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(LOCATION_MAPPING_FILE), "{not json").unwrap();
        let result: Result<Option<HashMap<String, i64>>> =
            read_optional_json(dir.path(), LOCATION_MAPPING_FILE);
        assert!(matches!(result, Err(PricingError::ArtifactError { .. })));
    }
}
