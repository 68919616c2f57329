//! Listing → feature vector

use super::listing::CarListing;
use super::schema::*;
use crate::catalog::Catalog;
use crate::error::{PricingError, Result};
use ndarray::Array2;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// A fully encoded row in model column order
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: [f64; N_FEATURES],
}

/// Named view of a feature vector, for display and the API
#[derive(Debug, Clone, Serialize)]
pub struct NamedFeatures {
    pub columns: Vec<&'static str>,
    pub values: Vec<f64>,
}

impl FeatureVector {
    fn zeros() -> Self {
        Self { values: [0.0; N_FEATURES] }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        column_index(column).map(|idx| self.values[idx])
    }

    /// `(column, value)` pairs in model order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_COLUMNS.iter().copied().zip(self.values.iter().copied())
    }

    pub fn named(&self) -> NamedFeatures {
        NamedFeatures {
            columns: FEATURE_COLUMNS.to_vec(),
            values: self.values.to_vec(),
        }
    }

    fn set_flag(&mut self, column: usize) {
        self.values[column] = 1.0;
    }
}

/// Stack feature vectors into an `(n, N_FEATURES)` matrix.
pub fn stack(rows: &[FeatureVector]) -> Result<Array2<f64>> {
    let flat: Vec<f64> = rows.iter().flat_map(|r| r.values.iter().copied()).collect();
    Ok(Array2::from_shape_vec((rows.len(), N_FEATURES), flat)?)
}

/// Maps listings onto the training-time schema
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    catalog: Arc<Catalog>,
}

impl FeatureEncoder {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Encode one listing.
    ///
    /// Fails only when the location cannot be resolved; every other unknown
    /// category goes through a fallback.
    pub fn encode(&self, listing: &CarListing) -> Result<FeatureVector> {
        let mut fv = FeatureVector::zeros();

        fv.values[COL_YEAR] = f64::from(listing.annee_modele);
        fv.values[COL_MILEAGE] = listing.kilometrage as f64;
        fv.values[COL_DOORS] = f64::from(listing.nombre_de_portes);
        fv.values[COL_FIRST_OWNER] = f64::from(listing.premiere_main);
        fv.values[COL_FISCAL_POWER] = f64::from(listing.puissance_fiscale);

        fv.values[COL_MODEL_FREQ] = self.catalog.model_frequency(&listing.modele);
        fv.values[COL_BRAND_FREQ] = self.catalog.brand_frequency(&listing.marque);

        if listing.boite_vitesses == MANUAL_GEARBOX {
            fv.set_flag(COL_MANUAL_GEARBOX);
        }

        match FuelType::parse(&listing.type_de_carburant) {
            Some(fuel) => fv.set_flag(fuel.column()),
            None => debug!(fuel = %listing.type_de_carburant, "Unknown fuel type, no fuel column set"),
        }

        match Origin::parse(&listing.origine) {
            Some(origin) => fv.set_flag(origin.column()),
            None => debug!(origin = %listing.origine, "Unknown origin, no origin column set"),
        }

        fv.set_flag(Condition::parse_or_default(&listing.etat_du_vehicule).column());

        fv.values[COL_LOCATION] = self
            .catalog
            .location_index(&listing.localisation)
            .ok_or_else(|| PricingError::UnknownLocation(listing.localisation.clone()))?;

        Ok(fv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixture;
    use crate::features::listing::sample_listing;

    fn encoder() -> FeatureEncoder {
        FeatureEncoder::new(Arc::new(fixture()))
    }

    fn count_set(fv: &FeatureVector, prefix: &str) -> usize {
        fv.iter().filter(|(c, v)| c.starts_with(prefix) && *v == 1.0).count()
    }

    #[test]
    fn test_encode_sample() {
        let fv = encoder().encode(&sample_listing()).unwrap();
        assert_eq!(fv.as_slice().len(), N_FEATURES);
        assert_eq!(fv.get("annee_modele"), Some(2015.0));
        assert_eq!(fv.get("kilometrage"), Some(100_000.0));
        assert_eq!(fv.get("nombre_de_portes"), Some(5.0));
        assert_eq!(fv.get("premiere_main"), Some(1.0));
        assert_eq!(fv.get("puissance_fiscale"), Some(6.0));
        assert_eq!(fv.get("localisation"), Some(1.0));
        assert_eq!(fv.get("modele_freq"), Some(720.0));
        assert_eq!(fv.get("marque_freq"), Some(1840.0));
        assert_eq!(fv.get("boite_vitesses_Manuelle"), Some(1.0));
        assert_eq!(fv.get("origine_WW au Maroc"), Some(1.0));
        assert_eq!(fv.get("etat_Très bon"), Some(1.0));
    }

    #[test]
    fn test_diesel_encoded_as_essence() {
        let fv = encoder().encode(&sample_listing()).unwrap();
        assert_eq!(fv.get("type_carburant_Essence"), Some(1.0));
        assert_eq!(count_set(&fv, "type_carburant_"), 1);
    }

    #[test]
    fn test_unknown_fuel_sets_nothing() {
        let listing = CarListing { type_de_carburant: "Hydrogène".to_string(), ..sample_listing() };
        let fv = encoder().encode(&listing).unwrap();
        assert_eq!(count_set(&fv, "type_carburant_"), 0);
    }

    #[test]
    fn test_dedouanee_encoded_as_ww() {
        let listing = CarListing { origine: "Dédouanée".to_string(), ..sample_listing() };
        let fv = encoder().encode(&listing).unwrap();
        assert_eq!(fv.get("origine_WW au Maroc"), Some(1.0));
        assert_eq!(count_set(&fv, "origine_"), 1);
    }

    #[test]
    fn test_unknown_origin_sets_nothing() {
        let listing = CarListing { origine: "Inconnue".to_string(), ..sample_listing() };
        let fv = encoder().encode(&listing).unwrap();
        assert_eq!(count_set(&fv, "origine_"), 0);
    }

    #[test]
    fn test_unknown_condition_falls_back_to_correct() {
        let listing = CarListing { etat_du_vehicule: "Bon".to_string(), ..sample_listing() };
        let fv = encoder().encode(&listing).unwrap();
        assert_eq!(fv.get("etat_Correct"), Some(1.0));
        assert_eq!(count_set(&fv, "etat_"), 1);
    }

    #[test]
    fn test_automatic_gearbox_clears_manual_flag() {
        let listing = CarListing { boite_vitesses: "Automatique".to_string(), ..sample_listing() };
        let fv = encoder().encode(&listing).unwrap();
        assert_eq!(fv.get("boite_vitesses_Manuelle"), Some(0.0));
    }

    #[test]
    fn test_unseen_brand_and_model_have_zero_frequency() {
        let listing = CarListing {
            marque: "Lada".to_string(),
            modele: "Niva".to_string(),
            ..sample_listing()
        };
        let fv = encoder().encode(&listing).unwrap();
        assert_eq!(fv.get("marque_freq"), Some(0.0));
        assert_eq!(fv.get("modele_freq"), Some(0.0));
    }

    #[test]
    fn test_numeric_location_passthrough() {
        let listing = CarListing { localisation: "12".to_string(), ..sample_listing() };
        let fv = encoder().encode(&listing).unwrap();
        assert_eq!(fv.get("localisation"), Some(12.0));
    }

    #[test]
    fn test_unknown_location_is_error() {
        let listing = CarListing { localisation: "Atlantis".to_string(), ..sample_listing() };
        let err = encoder().encode(&listing).unwrap_err();
        assert!(matches!(err, PricingError::UnknownLocation(ref c) if c == "Atlantis"));
    }

    #[test]
    fn test_stack_shape() {
        let enc = encoder();
        let rows = vec![
            enc.encode(&sample_listing()).unwrap(),
            enc.encode(&CarListing { annee_modele: 2020, ..sample_listing() }).unwrap(),
        ];
        let x = stack(&rows).unwrap();
        assert_eq!(x.dim(), (2, N_FEATURES));
        assert_eq!(x[[1, COL_YEAR]], 2020.0);
    }
}
