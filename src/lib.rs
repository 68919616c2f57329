//! carprice - Used-car price estimation
//!
//! Collects car attributes, maps them onto the feature layout a pre-trained
//! regression model expects, and returns a price estimate in MAD.
//!
//! # Modules
//!
//! - [`catalog`] - Static lookup tables (options, frequency encodings, locations)
//! - [`features`] - Input record and feature transformation
//! - [`model`] - Serialized regression model and prediction
//! - [`inference`] - Price estimator, formatting and price factors
//! - [`insights`] - Static market chart data and model card
//! - [`server`] - HTTP server with REST API and web UI
//! - [`cli`] - Command-line interface

pub mod error;

pub mod catalog;
pub mod features;
pub mod model;
pub mod inference;
pub mod insights;

pub mod server;
pub mod cli;

pub use error::{PricingError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{PricingError, Result};
    pub use crate::catalog::Catalog;
    pub use crate::features::{CarListing, FeatureEncoder, FeatureVector, FEATURE_COLUMNS, N_FEATURES};
    pub use crate::model::{Estimator, RegressionModel, TreeNode};
    pub use crate::inference::{EstimatorConfig, PriceEstimate, PriceEstimator};
}
