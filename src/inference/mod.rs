//! Price estimation
//!
//! Ties the feature encoder to the regression model:
//! - input validation and encoding
//! - single and parallel batch estimation
//! - price formatting and key price factors
//! - estimate counters and latency

mod config;
mod engine;

pub use config::EstimatorConfig;
pub use engine::{
    format_price, EstimatorStats, Impact, Popularity, PriceEstimate, PriceEstimator, PriceFactors,
};
