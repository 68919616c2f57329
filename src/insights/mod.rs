//! Market insights and model card
//!
//! Fixed figures describing the Moroccan used-car market, served as chart
//! data next to the estimator. Nothing here is computed.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct BrandShare {
    pub brand: &'static str,
    pub share_percent: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgeBucket {
    pub range: &'static str,
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DepreciationPoint {
    pub age_years: u32,
    pub value_retained_percent: f64,
}

/// All chart data for the insights view
#[derive(Debug, Clone, Serialize)]
pub struct MarketInsights {
    pub popular_brands: Vec<BrandShare>,
    pub age_distribution: Vec<AgeBucket>,
    pub depreciation: Vec<DepreciationPoint>,
    pub notes: Vec<&'static str>,
}

/// Reported quality of the shipped model
#[derive(Debug, Clone, Serialize)]
pub struct ModelCard {
    pub r2: f64,
    pub mae: f64,
    pub rmse: f64,
    pub currency: &'static str,
    pub key_predictors: Vec<&'static str>,
}

const BRAND_SHARES: [(&str, f64); 10] = [
    ("Dacia", 18.0),
    ("Renault", 16.0),
    ("Volkswagen", 12.0),
    ("Peugeot", 10.0),
    ("Hyundai", 9.0),
    ("Citroen", 8.0),
    ("Ford", 7.0),
    ("Toyota", 7.0),
    ("Mercedes", 7.0),
    ("BMW", 6.0),
];

const AGE_DISTRIBUTION: [(&str, f64); 5] = [
    ("< 3 years", 15.0),
    ("3-5 years", 22.0),
    ("6-10 years", 35.0),
    ("11-15 years", 18.0),
    ("> 15 years", 10.0),
];

const VALUE_RETAINED: [f64; 16] = [
    100.0, 85.0, 75.0, 67.0, 60.0, 54.0, 49.0, 45.0, 41.0, 38.0, 35.0, 32.0, 29.0, 27.0, 25.0, 23.0,
];

const MARKET_NOTES: [&str; 5] = [
    "The Moroccan used car market is dominated by affordable brands like Dacia and Renault",
    "Most sold used cars are 6-10 years old",
    "Diesel vehicles still represent over 60% of the market",
    "Automatic transmissions are gaining popularity but remain less common",
    "Popular cities for car sales: Casablanca, Rabat, Marrakech, Tangier",
];

pub fn market_insights() -> MarketInsights {
    MarketInsights {
        popular_brands: BRAND_SHARES
            .iter()
            .map(|&(brand, share_percent)| BrandShare { brand, share_percent })
            .collect(),
        age_distribution: AGE_DISTRIBUTION
            .iter()
            .map(|&(range, percent)| AgeBucket { range, percent })
            .collect(),
        depreciation: VALUE_RETAINED
            .iter()
            .enumerate()
            .map(|(age, &pct)| DepreciationPoint {
                age_years: age as u32,
                value_retained_percent: pct,
            })
            .collect(),
        notes: MARKET_NOTES.to_vec(),
    }
}

pub fn model_card() -> ModelCard {
    ModelCard {
        r2: 0.84,
        mae: 12_500.0,
        rmse: 18_200.0,
        currency: "MAD",
        key_predictors: vec![
            "Vehicle age (years)",
            "Mileage",
            "Brand and model popularity",
            "Fuel type",
            "Transmission type",
            "Vehicle condition",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_distribution_sums_to_100() {
        let total: f64 = market_insights().age_distribution.iter().map(|b| b.percent).sum();
        assert_eq!(total, 100.0);
    }

    #[test]
    fn test_depreciation_is_monotonic() {
        let curve = market_insights().depreciation;
        assert_eq!(curve.len(), 16);
        assert_eq!(curve[0].value_retained_percent, 100.0);
        assert!(curve.windows(2).all(|w| w[1].value_retained_percent < w[0].value_retained_percent));
        assert_eq!(curve.last().map(|p| p.age_years), Some(15));
    }

    #[test]
    fn test_brands_ordered_by_share() {
        let brands = market_insights().popular_brands;
        assert_eq!(brands[0].brand, "Dacia");
        assert!(brands.windows(2).all(|w| w[0].share_percent >= w[1].share_percent));
    }
}
