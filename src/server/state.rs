//! Application state management

use std::sync::Arc;

use crate::error::Result;
use crate::inference::{EstimatorConfig, PriceEstimator};

use super::ServerConfig;

/// Application state shared across handlers
///
/// Everything is loaded once at startup and read-only afterwards.
pub struct AppState {
    pub config: ServerConfig,
    pub estimator: Arc<PriceEstimator>,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    /// Load the estimator from the configured artifacts directory.
    pub fn new(config: ServerConfig) -> Result<Self> {
        let estimator_config = EstimatorConfig::new().with_reference_year(config.reference_year);
        let estimator = PriceEstimator::load(&config.artifacts_dir, estimator_config)?;
        Ok(Self::with_estimator(config, estimator))
    }

    pub fn with_estimator(config: ServerConfig, estimator: PriceEstimator) -> Self {
        Self {
            config,
            estimator: Arc::new(estimator),
            started_at: chrono::Utc::now(),
        }
    }

    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }
}
