//! The input record collected by the form

use crate::error::{PricingError, Result};
use serde::{Deserialize, Serialize};

/// One car as described by the user.
///
/// Field names follow the form and the training data, so a listing can be
/// posted as JSON without any renaming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarListing {
    pub marque: String,
    pub modele: String,
    pub annee_modele: i32,
    pub kilometrage: i64,
    pub nombre_de_portes: i32,
    pub puissance_fiscale: i32,
    pub premiere_main: i32,
    pub boite_vitesses: String,
    pub type_de_carburant: String,
    pub origine: String,
    pub etat_du_vehicule: String,
    pub localisation: String,
}

/// Accepted ranges for the numeric fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputBounds {
    pub year_min: i32,
    pub year_max: i32,
    pub year_default: i32,
    pub mileage_max: i64,
    pub mileage_step: i64,
    pub mileage_default: i64,
    pub fiscal_power_min: i32,
    pub fiscal_power_max: i32,
    pub fiscal_power_default: i32,
}

impl Default for InputBounds {
    fn default() -> Self {
        Self {
            year_min: 1990,
            year_max: 2024,
            year_default: 2015,
            mileage_max: 500_000,
            mileage_step: 5_000,
            mileage_default: 100_000,
            fiscal_power_min: 1,
            fiscal_power_max: 20,
            fiscal_power_default: 6,
        }
    }
}

impl CarListing {
    /// Check the numeric fields against the form's bounds.
    ///
    /// Categorical fields are not checked here; unknown categories are handled
    /// by the encoder's fallbacks.
    pub fn validate(&self) -> Result<()> {
        let bounds = InputBounds::default();

        if !(bounds.year_min..=bounds.year_max).contains(&self.annee_modele) {
            return Err(PricingError::invalid_input(
                "annee_modele",
                self.annee_modele,
                format!("must be between {} and {}", bounds.year_min, bounds.year_max),
            ));
        }
        if !(0..=bounds.mileage_max).contains(&self.kilometrage) {
            return Err(PricingError::invalid_input(
                "kilometrage",
                self.kilometrage,
                format!("must be between 0 and {}", bounds.mileage_max),
            ));
        }
        if !(bounds.fiscal_power_min..=bounds.fiscal_power_max).contains(&self.puissance_fiscale) {
            return Err(PricingError::invalid_input(
                "puissance_fiscale",
                self.puissance_fiscale,
                format!(
                    "must be between {} and {}",
                    bounds.fiscal_power_min, bounds.fiscal_power_max
                ),
            ));
        }
        if !crate::catalog::DOOR_CHOICES
            .iter()
            .any(|&d| i32::from(d) == self.nombre_de_portes)
        {
            return Err(PricingError::invalid_input(
                "nombre_de_portes",
                self.nombre_de_portes,
                "must be 3, 4 or 5",
            ));
        }
        if self.premiere_main != 0 && self.premiere_main != 1 {
            return Err(PricingError::invalid_input(
                "premiere_main",
                self.premiere_main,
                "must be 0 or 1",
            ));
        }
        Ok(())
    }

    pub fn is_first_owner(&self) -> bool {
        self.premiere_main == 1
    }
}

#[cfg(test)]
pub(crate) fn sample_listing() -> CarListing {
    CarListing {
        marque: "Dacia".to_string(),
        modele: "Logan".to_string(),
        annee_modele: 2015,
        kilometrage: 100_000,
        nombre_de_portes: 5,
        puissance_fiscale: 6,
        premiere_main: 1,
        boite_vitesses: "Manuelle".to_string(),
        type_de_carburant: "Diesel".to_string(),
        origine: "WW au Maroc".to_string(),
        etat_du_vehicule: "Très bon".to_string(),
        localisation: "Casablanca".to_string(),
    }
}
