use geo::{Point, Polygon};

use crate::geometry;

pub mod countries;

use countries::COUNTRY_BOUNDS;

pub const DEFAULT_COUNTRY_CODE: &str = "DEFAULT";
pub const MIN_PRICE_PER_KM2: f64 = 0.1;
pub const MAX_PRICE_PER_KM2: f64 = 1.0;

pub struct PricingRule {
    pub country_code: &'static str,
    pub price_per_km2: f64,
}

/// Price per km² by country. Anything without an entry uses `DEFAULT`.
pub static PRICING_RULES: [PricingRule; 6] = [
    PricingRule {
        country_code: "US",
        price_per_km2: 0.8,
    },
    PricingRule {
        country_code: "DE",
        price_per_km2: 1.0,
    },
    PricingRule {
        country_code: "BR",
        price_per_km2: 0.3,
    },
    PricingRule {
        country_code: "AU",
        price_per_km2: 0.4,
    },
    PricingRule {
        country_code: "IN",
        price_per_km2: 0.35,
    },
    PricingRule {
        country_code: DEFAULT_COUNTRY_CODE,
        price_per_km2: 0.5,
    },
];

#[derive(Debug, Clone, PartialEq)]
pub struct PricingResult {
    pub country_code: String,
    pub price_per_km2: f64,
    pub total_price: f64,
}

/// Keeps any rate inside [0.1, 1.0], NaN included
pub fn clamp_price(price: f64) -> f64 {
    price.max(MIN_PRICE_PER_KM2).min(MAX_PRICE_PER_KM2)
}

pub fn rule_for(country_code: &str) -> &'static PricingRule {
    PRICING_RULES
        .iter()
        .find(|rule| rule.country_code == country_code)
        .or_else(|| {
            PRICING_RULES
                .iter()
                .find(|rule| rule.country_code == DEFAULT_COUNTRY_CODE)
        })
        .unwrap_or(&PRICING_RULES[PRICING_RULES.len() - 1])
}

pub fn lookup_country_code_at(point: Point<f64>) -> &'static str {
    COUNTRY_BOUNDS
        .iter()
        .find(|bounds| bounds.contains(point))
        .map(|bounds| bounds.code)
        .unwrap_or(DEFAULT_COUNTRY_CODE)
}

/// Approximate country of the polygon, by its centroid against rectangular bounds
pub fn lookup_country_code(polygon: &Polygon<f64>) -> &'static str {
    match geometry::centroid(polygon) {
        Some(center) => lookup_country_code_at(center),
        None => DEFAULT_COUNTRY_CODE,
    }
}

pub fn price_for_area(country_code: &str, area_km2: f64) -> PricingResult {
    let price_per_km2 = clamp_price(rule_for(country_code).price_per_km2);

    PricingResult {
        country_code: country_code.to_string(),
        price_per_km2,
        total_price: (area_km2 * price_per_km2).max(0.0),
    }
}

/// Price a polygon. The area is computed from the polygon when not given.
pub fn compute_pricing(polygon: &Polygon<f64>, area_km2: Option<f64>) -> PricingResult {
    let area_km2 = area_km2.unwrap_or_else(|| geometry::area_km2(polygon));
    price_for_area(lookup_country_code(polygon), area_km2)
}
