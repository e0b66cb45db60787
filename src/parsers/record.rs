use crate::parsers::ListingFragment;
use crate::results::ListingRecord;
use regex::Regex;
use thiserror::Error;

/// Why a fragment did not produce a record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("no {currency} amount in price text")]
    MissingPrice { currency: String },

    #[error("price {0:?} is not a finite number")]
    InvalidPrice(String),

    #[error("price must be positive")]
    NonPositivePrice,

    #[error("no area figure in feature text")]
    MissingArea,

    #[error("area {0:?} is zero or not a finite number")]
    InvalidArea(String),
}

/// Turns raw listing fragments into validated records
#[derive(Debug, Clone)]
pub struct RecordExtractor {
    currency: String,
    price_regex: Regex,
    area_regex: Regex,
}

impl RecordExtractor {
    /// Build an extractor for prices tagged with `currency` and areas followed by `area_unit`
    pub fn new(currency: &str, area_unit: &str) -> Result<Self, regex::Error> {
        let price_regex = Regex::new(&format!(r"{}\s*([\d,.]+)", regex::escape(currency)))?;
        let area_regex = Regex::new(&format!(r"(\d+)\s*{}", regex::escape(area_unit)))?;

        Ok(Self {
            currency: currency.to_string(),
            price_regex,
            area_regex,
        })
    }

    /// Extract one record from a fragment
    pub fn extract(&self, fragment: &ListingFragment) -> Result<ListingRecord, RejectReason> {
        let price = self.parse_price(&fragment.price_text)?;
        let area = self.parse_area(&fragment.feature_text)?;

        let id = match fragment.explicit_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => {
                let fallback = fallback_id(price, area);
                ::log::warn!("Listing has no explicit id, using fallback: {}", fallback);
                fallback
            }
        };

        // Both values were validated above
        ListingRecord::new(id, price, area).ok_or(RejectReason::NonPositivePrice)
    }

    /// Extract every valid record from a batch, skipping rejected fragments
    pub fn extract_all(&self, fragments: &[ListingFragment]) -> Vec<ListingRecord> {
        let mut records = Vec::with_capacity(fragments.len());
        for (index, fragment) in fragments.iter().enumerate() {
            match self.extract(fragment) {
                Ok(record) => records.push(record),
                Err(reason) => {
                    ::log::debug!("Skipping listing {}: {}", index, reason);
                }
            }
        }
        ::log::debug!(
            "Extracted {} records from {} fragments",
            records.len(),
            fragments.len()
        );
        records
    }

    /// Finds the currency-tagged amount and drops every `.` and `,` before parsing
    fn parse_price(&self, text: &str) -> Result<f64, RejectReason> {
        let captures = self.price_regex.captures(text.trim()).ok_or_else(|| {
            RejectReason::MissingPrice {
                currency: self.currency.clone(),
            }
        })?;
        let raw = &captures[1];
        let digits = raw.replace(['.', ','], "");

        let price = digits
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite())
            .ok_or_else(|| RejectReason::InvalidPrice(raw.to_string()))?;

        if price <= 0.0 {
            return Err(RejectReason::NonPositivePrice);
        }
        Ok(price)
    }

    fn parse_area(&self, text: &str) -> Result<f64, RejectReason> {
        let captures = self
            .area_regex
            .captures(text)
            .ok_or(RejectReason::MissingArea)?;
        let raw = &captures[1];

        raw.parse::<f64>()
            .ok()
            .filter(|a| a.is_finite() && *a > 0.0)
            .ok_or_else(|| RejectReason::InvalidArea(raw.to_string()))
    }
}

/// Synthesized identifier for listings without one. Distinct listings with the
/// same price and area collide.
pub fn fallback_id(price: f64, area: f64) -> String {
    format!("fallback_{}_{}", price, area)
}
