//! Price estimator
//!
//! Validates a listing, encodes it, runs the model and dresses the result up
//! for display: formatted price and the key factors behind it.

use super::EstimatorConfig;
use crate::catalog::{Catalog, MODEL_FILE};
use crate::error::{PricingError, Result};
use crate::features::{CarListing, FeatureEncoder, FeatureVector};
use crate::model::RegressionModel;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Qualitative effect of a factor on the price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Impact {
    #[serde(rename = "Low negative impact")]
    Low,
    #[serde(rename = "Medium negative impact")]
    Medium,
    #[serde(rename = "High negative impact")]
    High,
}

impl Impact {
    pub fn of_age(age_years: i32) -> Self {
        if age_years > 10 {
            Impact::High
        } else if age_years > 5 {
            Impact::Medium
        } else {
            Impact::Low
        }
    }

    pub fn of_mileage(km: i64) -> Self {
        if km > 200_000 {
            Impact::High
        } else if km > 100_000 {
            Impact::Medium
        } else {
            Impact::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Impact::Low => "Low negative impact",
            Impact::Medium => "Medium negative impact",
            Impact::High => "High negative impact",
        }
    }
}

/// Brand popularity bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Popularity {
    High,
    Medium,
}

/// Key factors shown next to the estimate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceFactors {
    pub age_years: i32,
    pub age_impact: Impact,
    pub mileage_km: i64,
    pub mileage_impact: Impact,
    pub brand_popularity: Popularity,
    pub condition: String,
    pub origin: String,
    pub first_owner: bool,
}

/// A price estimate ready for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceEstimate {
    pub price: f64,
    pub formatted: String,
    pub currency: String,
    pub factors: PriceFactors,
}

/// Estimator counters snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EstimatorStats {
    pub total_estimates: u64,
    pub error_count: u64,
    pub avg_latency_ms: f64,
}

/// Format a price with space-grouped thousands, truncating any fraction.
///
/// `123456.78` with currency `MAD` becomes `"123 456 MAD"`.
pub fn format_price(price: f64, currency: &str) -> String {
    let whole = price.trunc();
    // Not limited to the i64 range
    let digits = format!("{:.0}", whole.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if whole < 0.0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }

    if currency.is_empty() {
        grouped
    } else {
        format!("{} {}", grouped, currency)
    }
}

/// Encodes listings and prices them with the loaded model
pub struct PriceEstimator {
    config: EstimatorConfig,
    encoder: FeatureEncoder,
    model: Arc<RegressionModel>,
    estimates: AtomicU64,
    errors: AtomicU64,
    total_latency_us: AtomicU64,
}

impl std::fmt::Debug for PriceEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriceEstimator")
            .field("config", &self.config)
            .field("model_kind", &self.model.kind())
            .finish()
    }
}

impl PriceEstimator {
    pub fn new(config: EstimatorConfig, catalog: Arc<Catalog>, model: RegressionModel) -> Self {
        Self {
            config,
            encoder: FeatureEncoder::new(catalog),
            model: Arc::new(model),
            estimates: AtomicU64::new(0),
            errors: AtomicU64::new(0),
            total_latency_us: AtomicU64::new(0),
        }
    }

    /// Load lookup tables and model from an artifacts directory.
    pub fn load(artifacts_dir: impl AsRef<Path>, config: EstimatorConfig) -> Result<Self> {
        let dir = artifacts_dir.as_ref();
        let catalog = Catalog::load(dir)?;
        let model = RegressionModel::load(dir.join(MODEL_FILE))?;
        Ok(Self::new(config, Arc::new(catalog), model))
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        self.encoder.catalog()
    }

    pub fn model(&self) -> &RegressionModel {
        &self.model
    }

    /// Validate and encode a listing without pricing it.
    pub fn encode(&self, listing: &CarListing) -> Result<FeatureVector> {
        listing.validate()?;
        self.encoder.encode(listing)
    }

    /// Price one listing.
    pub fn estimate(&self, listing: &CarListing) -> Result<PriceEstimate> {
        let start = Instant::now();
        let result = self.estimate_inner(listing);
        let elapsed_us = start.elapsed().as_micros() as u64;

        match &result {
            Ok(estimate) => {
                self.estimates.fetch_add(1, Ordering::Relaxed);
                self.total_latency_us.fetch_add(elapsed_us, Ordering::Relaxed);
                debug!(
                    marque = %listing.marque,
                    modele = %listing.modele,
                    price = estimate.price,
                    latency_us = elapsed_us,
                    "Price estimated"
                );
            }
            Err(e) => {
                self.errors.fetch_add(1, Ordering::Relaxed);
                warn!(error = %e, marque = %listing.marque, "Price estimation failed");
            }
        }
        result
    }

    /// Price many listings in parallel; one result per listing, in order.
    pub fn estimate_batch(&self, listings: &[CarListing]) -> Vec<Result<PriceEstimate>> {
        listings.par_iter().map(|l| self.estimate(l)).collect()
    }

    fn estimate_inner(&self, listing: &CarListing) -> Result<PriceEstimate> {
        let features = self.encode(listing)?;
        let price = self.model.predict(features.as_slice())?;
        if !price.is_finite() {
            return Err(PricingError::InferenceError(format!(
                "model returned a non-finite price: {}",
                price
            )));
        }

        Ok(PriceEstimate {
            price,
            formatted: format_price(price, &self.config.currency),
            currency: self.config.currency.clone(),
            factors: self.factors(listing),
        })
    }

    /// Key price factors for a listing.
    pub fn factors(&self, listing: &CarListing) -> PriceFactors {
        let age_years = self.config.reference_year - listing.annee_modele;
        let brand_popularity = if self.config.popular_brands.iter().any(|b| *b == listing.marque) {
            Popularity::High
        } else {
            Popularity::Medium
        };

        PriceFactors {
            age_years,
            age_impact: Impact::of_age(age_years),
            mileage_km: listing.kilometrage,
            mileage_impact: Impact::of_mileage(listing.kilometrage),
            brand_popularity,
            condition: listing.etat_du_vehicule.clone(),
            origin: listing.origine.clone(),
            first_owner: listing.is_first_owner(),
        }
    }

    pub fn stats(&self) -> EstimatorStats {
        let total = self.estimates.load(Ordering::Relaxed);
        let latency_us = self.total_latency_us.load(Ordering::Relaxed);
        EstimatorStats {
            total_estimates: total,
            error_count: self.errors.load(Ordering::Relaxed),
            avg_latency_ms: if total == 0 {
                0.0
            } else {
                latency_us as f64 / total as f64 / 1000.0
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixture;
    use crate::features::{sample_listing, N_FEATURES};
    use crate::model::Estimator;

    fn estimator() -> PriceEstimator {
        let mut coefficients = vec![0.0; N_FEATURES];
        coefficients[0] = 1000.0;
        coefficients[1] = -0.1;
        let model = RegressionModel::new(Estimator::Linear {
            coefficients,
            intercept: -1_900_000.0,
        })
        .unwrap();
        PriceEstimator::new(EstimatorConfig::default(), Arc::new(fixture()), model)
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(123_456.78, "MAD"), "123 456 MAD");
        assert_eq!(format_price(999.9, "MAD"), "999 MAD");
        assert_eq!(format_price(1_000.0, "MAD"), "1 000 MAD");
        assert_eq!(format_price(1_234_567.0, ""), "1 234 567");
        assert_eq!(format_price(0.4, "MAD"), "0 MAD");
        assert_eq!(format_price(-12_345.9, "MAD"), "-12 345 MAD");
    }

    #[test]
    fn test_format_price_beyond_i64() {
        assert_eq!(format_price(1e19, "MAD"), "10 000 000 000 000 000 000 MAD");
        assert_eq!(format_price(-0.4, "MAD"), "0 MAD");
    }

    #[test]
    fn test_impact_thresholds() {
        assert_eq!(Impact::of_age(5), Impact::Low);
        assert_eq!(Impact::of_age(6), Impact::Medium);
        assert_eq!(Impact::of_age(10), Impact::Medium);
        assert_eq!(Impact::of_age(11), Impact::High);
        assert_eq!(Impact::of_mileage(100_000), Impact::Low);
        assert_eq!(Impact::of_mileage(100_001), Impact::Medium);
        assert_eq!(Impact::of_mileage(200_001), Impact::High);
    }

    #[test]
    fn test_estimate() {
        let est = estimator().estimate(&sample_listing()).unwrap();
        assert!((est.price - 105_000.0).abs() < 1e-6);
        assert_eq!(est.formatted, "105 000 MAD");
        assert_eq!(est.factors.age_years, 10);
        assert_eq!(est.factors.age_impact, Impact::Medium);
        assert_eq!(est.factors.mileage_impact, Impact::Low);
        assert_eq!(est.factors.brand_popularity, Popularity::High);
        assert!(est.factors.first_owner);
    }

    #[test]
    fn test_estimate_rejects_invalid_listing() {
        let est = estimator();
        let listing = CarListing { puissance_fiscale: 42, ..sample_listing() };
        assert!(est.estimate(&listing).unwrap_err().is_client_error());
        assert_eq!(est.stats().error_count, 1);
        assert_eq!(est.stats().total_estimates, 0);
    }

    #[test]
    fn test_estimate_batch_preserves_order() {
        let est = estimator();
        let listings = vec![
            sample_listing(),
            CarListing { localisation: "Atlantis".to_string(), ..sample_listing() },
            CarListing { annee_modele: 2020, ..sample_listing() },
        ];
        let results = est.estimate_batch(&listings);
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(PricingError::UnknownLocation(_))));
        assert!((results[2].as_ref().unwrap().price - 110_000.0).abs() < 1e-6);
        assert_eq!(est.stats().total_estimates, 2);
    }

    #[test]
    fn test_medium_popularity_for_other_brands() {
        let listing = CarListing { marque: "Peugeot".to_string(), ..sample_listing() };
        assert_eq!(estimator().factors(&listing).brand_popularity, Popularity::Medium);
    }

    #[test]
    fn test_impact_serializes_as_label() {
        let json = serde_json::to_string(&Impact::High).unwrap();
        assert_eq!(json, format!("\"{}\"", Impact::High.label()));
    }
}
