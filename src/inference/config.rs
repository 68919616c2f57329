//! Estimator configuration

use serde::{Deserialize, Serialize};

/// Configuration for price estimation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Year against which vehicle age is computed
    pub reference_year: i32,

    /// Currency suffix of formatted prices
    pub currency: String,

    /// Brands reported as highly popular in the price factors
    pub popular_brands: Vec<String>,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            reference_year: 2025,
            currency: "MAD".to_string(),
            popular_brands: vec![
                "Dacia".to_string(),
                "Renault".to_string(),
                "Volkswagen".to_string(),
            ],
        }
    }
}

impl EstimatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the reference year
    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.reference_year = year;
        self
    }

    /// Builder method to set the currency suffix
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Builder method to replace the popular brand list
    pub fn with_popular_brands(mut self, brands: Vec<String>) -> Self {
        self.popular_brands = brands;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EstimatorConfig::default();
        assert_eq!(config.reference_year, 2025);
        assert_eq!(config.currency, "MAD");
        assert_eq!(config.popular_brands.len(), 3);
    }

    #[test]
    fn test_builder_pattern() {
        let config = EstimatorConfig::new()
            .with_reference_year(2026)
            .with_currency("EUR")
            .with_popular_brands(vec!["Toyota".to_string()]);
        assert_eq!(config.reference_year, 2026);
        assert_eq!(config.currency, "EUR");
        assert_eq!(config.popular_brands, vec!["Toyota"]);
    }
}
