//! Training-time feature schema
//!
//! The model was fitted on exactly these columns in exactly this order. The
//! categorical enums below know which one-hot column they light up, including
//! the fallbacks for categories that were absent from the training data.

use serde::{Deserialize, Serialize};

/// Number of columns the model expects.
pub const N_FEATURES: usize = 22;

/// Column names in model order.
pub const FEATURE_COLUMNS: [&str; N_FEATURES] = [
    "annee_modele",
    "kilometrage",
    "nombre_de_portes",
    "premiere_main",
    "puissance_fiscale",
    "localisation",
    "modele_freq",
    "marque_freq",
    "boite_vitesses_Manuelle",
    "type_carburant_Electrique",
    "type_carburant_Essence",
    "type_carburant_Hybride",
    "type_carburant_LPG",
    "origine_Importée neuve",
    "origine_Pas encore dédouanée",
    "origine_WW au Maroc",
    "etat_Correct",
    "etat_Endommagé",
    "etat_Excellent",
    "etat_Neuf",
    "etat_Pour Pièces",
    "etat_Très bon",
];

pub const COL_YEAR: usize = 0;
pub const COL_MILEAGE: usize = 1;
pub const COL_DOORS: usize = 2;
pub const COL_FIRST_OWNER: usize = 3;
pub const COL_FISCAL_POWER: usize = 4;
pub const COL_LOCATION: usize = 5;
pub const COL_MODEL_FREQ: usize = 6;
pub const COL_BRAND_FREQ: usize = 7;
pub const COL_MANUAL_GEARBOX: usize = 8;

/// Gearbox label that sets the manual flag.
pub const MANUAL_GEARBOX: &str = "Manuelle";

/// Index of a column by name.
pub fn column_index(name: &str) -> Option<usize> {
    FEATURE_COLUMNS.iter().position(|c| *c == name)
}

/// Fuel type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FuelType {
    Essence,
    Diesel,
    Electrique,
    Hybride,
    #[serde(rename = "LPG")]
    Lpg,
}

impl FuelType {
    /// Order in which the form offers fuel types.
    pub const OFFERED: [FuelType; 5] = [
        FuelType::Essence,
        FuelType::Diesel,
        FuelType::Electrique,
        FuelType::Hybride,
        FuelType::Lpg,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        Self::OFFERED.into_iter().find(|f| f.label() == s)
    }

    pub fn label(self) -> &'static str {
        match self {
            FuelType::Essence => "Essence",
            FuelType::Diesel => "Diesel",
            FuelType::Electrique => "Electrique",
            FuelType::Hybride => "Hybride",
            FuelType::Lpg => "LPG",
        }
    }

    /// One-hot column set by this fuel type.
    ///
    /// The model has no Diesel column; Diesel is encoded as Essence.
    pub fn column(self) -> usize {
        match self {
            FuelType::Electrique => 9,
            FuelType::Essence | FuelType::Diesel => 10,
            FuelType::Hybride => 11,
            FuelType::Lpg => 12,
        }
    }
}

/// Customs origin of the vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Origin {
    #[serde(rename = "Dédouanée")]
    Dedouanee,
    #[serde(rename = "Importée neuve")]
    ImporteeNeuve,
    #[serde(rename = "Pas encore dédouanée")]
    PasEncoreDedouanee,
    #[serde(rename = "WW au Maroc")]
    WwAuMaroc,
}

impl Origin {
    pub const OFFERED: [Origin; 4] = [
        Origin::Dedouanee,
        Origin::ImporteeNeuve,
        Origin::PasEncoreDedouanee,
        Origin::WwAuMaroc,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        Self::OFFERED.into_iter().find(|o| o.label() == s)
    }

    pub fn label(self) -> &'static str {
        match self {
            Origin::Dedouanee => "Dédouanée",
            Origin::ImporteeNeuve => "Importée neuve",
            Origin::PasEncoreDedouanee => "Pas encore dédouanée",
            Origin::WwAuMaroc => "WW au Maroc",
        }
    }

    /// One-hot column set by this origin.
    ///
    /// The model has no Dédouanée column; it is encoded as WW au Maroc.
    pub fn column(self) -> usize {
        match self {
            Origin::ImporteeNeuve => 13,
            Origin::PasEncoreDedouanee => 14,
            Origin::WwAuMaroc | Origin::Dedouanee => 15,
        }
    }
}

/// Vehicle condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    Correct,
    #[serde(rename = "Endommagé")]
    Endommage,
    Excellent,
    Neuf,
    #[serde(rename = "Pour Pièces")]
    PourPieces,
    #[serde(rename = "Très bon")]
    TresBon,
}

impl Condition {
    pub const ALL: [Condition; 6] = [
        Condition::Correct,
        Condition::Endommage,
        Condition::Excellent,
        Condition::Neuf,
        Condition::PourPieces,
        Condition::TresBon,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == s)
    }

    /// Parse, falling back to `Correct` for anything the model does not know.
    pub fn parse_or_default(s: &str) -> Self {
        Self::parse(s).unwrap_or(Condition::Correct)
    }

    pub fn label(self) -> &'static str {
        match self {
            Condition::Correct => "Correct",
            Condition::Endommage => "Endommagé",
            Condition::Excellent => "Excellent",
            Condition::Neuf => "Neuf",
            Condition::PourPieces => "Pour Pièces",
            Condition::TresBon => "Très bon",
        }
    }

    pub fn column(self) -> usize {
        match self {
            Condition::Correct => 16,
            Condition::Endommage => 17,
            Condition::Excellent => 18,
            Condition::Neuf => 19,
            Condition::PourPieces => 20,
            Condition::TresBon => 21,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_match_labels() {
        for fuel in [FuelType::Electrique, FuelType::Essence, FuelType::Hybride, FuelType::Lpg] {
            assert_eq!(FEATURE_COLUMNS[fuel.column()], format!("type_carburant_{}", fuel.label()));
        }
        for origin in [Origin::ImporteeNeuve, Origin::PasEncoreDedouanee, Origin::WwAuMaroc] {
            assert_eq!(FEATURE_COLUMNS[origin.column()], format!("origine_{}", origin.label()));
        }
        for condition in Condition::ALL {
            assert_eq!(FEATURE_COLUMNS[condition.column()], format!("etat_{}", condition.label()));
        }
    }

    #[test]
    fn test_fallback_columns() {
        assert_eq!(FuelType::Diesel.column(), FuelType::Essence.column());
        assert_eq!(Origin::Dedouanee.column(), Origin::WwAuMaroc.column());
        assert_eq!(Condition::parse_or_default("Comme neuf"), Condition::Correct);
    }

    #[test]
    fn test_column_index() {
        assert_eq!(column_index("localisation"), Some(COL_LOCATION));
        assert_eq!(column_index("boite_vitesses_Manuelle"), Some(COL_MANUAL_GEARBOX));
        assert_eq!(column_index("prix"), None);
    }

    #[test]
    fn test_parse_is_exact() {
        assert_eq!(FuelType::parse("LPG"), Some(FuelType::Lpg));
        assert_eq!(FuelType::parse("essence"), None);
        assert_eq!(Origin::parse("WW au Maroc"), Some(Origin::WwAuMaroc));
    }
}
