//! Static lookup tables
//!
//! The catalog holds everything the form offers and everything the encoder
//! looks up at request time:
//! - brand, gearbox, condition and city option lists
//! - the brand → models dictionary
//! - brand and model frequency encodings
//! - an optional city → integer mapping
//!
//! Tables are read once from an artifacts directory and never mutated.

mod loader;

pub use loader::{
    read_json, read_optional_json, BRAND_FREQ_FILE, BRAND_LIST_FILE, BRAND_MODELS_FILE,
    CONDITION_LIST_FILE, GEARBOX_LIST_FILE, LOCATION_LIST_FILE, LOCATION_MAPPING_FILE,
    MODEL_FILE, MODEL_FREQ_FILE,
};

use crate::error::Result;
use crate::features::{FuelType, Origin};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Door counts offered by the form.
pub const DOOR_CHOICES: [u8; 3] = [3, 4, 5];

/// Lookup tables loaded from the artifacts directory
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub brands: Vec<String>,
    pub brand_models: HashMap<String, Vec<String>>,
    pub gearboxes: Vec<String>,
    pub conditions: Vec<String>,
    pub locations: Vec<String>,
    pub brand_freq: HashMap<String, f64>,
    pub model_freq: HashMap<String, f64>,
    pub location_mapping: Option<HashMap<String, i64>>,
}

/// Every dropdown the form needs, in display order
#[derive(Debug, Clone, Serialize)]
pub struct CatalogOptions {
    pub brands: Vec<String>,
    pub gearboxes: Vec<String>,
    pub fuel_types: Vec<&'static str>,
    pub origins: Vec<&'static str>,
    pub conditions: Vec<String>,
    pub locations: Vec<String>,
    pub doors: Vec<u8>,
    pub bounds: crate::features::InputBounds,
}

impl Catalog {
    /// Load all tables from `dir`.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        debug!(dir = %dir.display(), "Loading lookup tables");

        let catalog = Self {
            brands: read_json(dir, BRAND_LIST_FILE)?,
            brand_models: read_json(dir, BRAND_MODELS_FILE)?,
            gearboxes: read_json(dir, GEARBOX_LIST_FILE)?,
            conditions: read_json(dir, CONDITION_LIST_FILE)?,
            locations: read_json(dir, LOCATION_LIST_FILE)?,
            brand_freq: read_json(dir, BRAND_FREQ_FILE)?,
            model_freq: read_json(dir, MODEL_FREQ_FILE)?,
            location_mapping: read_optional_json(dir, LOCATION_MAPPING_FILE)?,
        };

        info!(
            brands = catalog.brands.len(),
            models = catalog.model_freq.len(),
            locations = catalog.locations.len(),
            location_mapping = catalog.location_mapping.is_some(),
            "Lookup tables loaded"
        );
        Ok(catalog)
    }

    pub fn brands(&self) -> &[String] {
        &self.brands
    }

    pub fn gearboxes(&self) -> &[String] {
        &self.gearboxes
    }

    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }

    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    /// Fuel types offered by the form, including ones the model never saw.
    pub fn fuel_types(&self) -> Vec<&'static str> {
        FuelType::OFFERED.iter().map(|f| f.label()).collect()
    }

    /// Origins offered by the form, including ones the model never saw.
    pub fn origins(&self) -> Vec<&'static str> {
        Origin::OFFERED.iter().map(|o| o.label()).collect()
    }

    pub fn door_choices(&self) -> &'static [u8] {
        &DOOR_CHOICES
    }

    /// Sorted models of `brand`; empty for an unknown brand.
    pub fn models_for(&self, brand: &str) -> Vec<String> {
        let mut models = self.brand_models.get(brand).cloned().unwrap_or_default();
        models.sort();
        models
    }

    /// Frequency encoding of a brand (0 when unseen in training).
    pub fn brand_frequency(&self, brand: &str) -> f64 {
        self.brand_freq.get(brand).copied().unwrap_or(0.0)
    }

    /// Frequency encoding of a model (0 when unseen in training).
    pub fn model_frequency(&self, model: &str) -> f64 {
        self.model_freq.get(model).copied().unwrap_or(0.0)
    }

    /// Resolve a city to the integer code the model was trained on.
    ///
    /// Resolution order: a numeric value is taken as-is, then the explicit
    /// mapping, then the city's position in the location list.
    pub fn location_index(&self, city: &str) -> Option<f64> {
        if let Ok(v) = city.trim().parse::<f64>() {
            if v.is_finite() {
                return Some(v);
            }
        }

        if let Some(code) = self
            .location_mapping
            .as_ref()
            .and_then(|mapping| mapping.get(city))
        {
            return Some(*code as f64);
        }

        self.locations
            .iter()
            .position(|l| l == city)
            .map(|idx| idx as f64)
    }

    /// Snapshot of all dropdown options.
    pub fn options(&self) -> CatalogOptions {
        CatalogOptions {
            brands: self.brands.clone(),
            gearboxes: self.gearboxes.clone(),
            fuel_types: self.fuel_types(),
            origins: self.origins(),
            conditions: self.conditions.clone(),
            locations: self.locations.clone(),
            doors: DOOR_CHOICES.to_vec(),
            bounds: crate::features::InputBounds::default(),
        }
    }
}

#[cfg(test)]
pub(crate) fn fixture() -> Catalog {
    let mut brand_models = HashMap::new();
    brand_models.insert(
        "Dacia".to_string(),
        vec!["Sandero".to_string(), "Logan".to_string(), "Duster".to_string()],
    );
    brand_models.insert("Renault".to_string(), vec!["Clio".to_string()]);

    let brand_freq = [("Dacia", 1840.0), ("Renault", 1630.0)]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    let model_freq = [("Logan", 720.0), ("Sandero", 610.0), ("Duster", 510.0), ("Clio", 800.0)]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

    Catalog {
        brands: vec!["Dacia".to_string(), "Renault".to_string()],
        brand_models,
        gearboxes: vec!["Automatique".to_string(), "Manuelle".to_string()],
        conditions: vec!["Correct".to_string(), "Excellent".to_string(), "Très bon".to_string()],
        locations: vec!["Agadir".to_string(), "Casablanca".to_string(), "Rabat".to_string()],
        brand_freq,
        model_freq,
        location_mapping: None,
    }
}
