//! Feature transformation
//!
//! Turns a [`CarListing`] into the fixed 22-column layout the regression
//! model was trained on:
//! - numeric fields copied as-is
//! - brand and model frequency encoding
//! - one-hot gearbox, fuel, origin and condition columns with fallbacks
//! - location resolved to an integer code

mod encoder;
mod listing;
mod schema;

pub use encoder::{stack, FeatureEncoder, FeatureVector, NamedFeatures};
pub use listing::{CarListing, InputBounds};
pub use schema::{column_index, Condition, FuelType, Origin, FEATURE_COLUMNS, N_FEATURES};

#[cfg(test)]
pub(crate) use listing::sample_listing;
