use crate::parsers::ListingFragment;
use serde::{Deserialize, Serialize};

/// One validated listing. Price and area are always positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "StoredRecord", try_from = "StoredRecord")]
pub struct ListingRecord {
    id: String,
    price: f64,
    area: f64,
}

impl ListingRecord {
    /// Build a record, returning `None` unless both price and area are positive and finite
    pub fn new(id: impl Into<String>, price: f64, area: f64) -> Option<Self> {
        if !(price.is_finite() && area.is_finite() && price > 0.0 && area > 0.0) {
            return None;
        }
        Some(Self {
            id: id.into(),
            price,
            area,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    /// Price per unit of area, derived from price and area on every call
    pub fn price_per_area(&self) -> f64 {
        self.price / self.area
    }
}

/// Shape of a record inside the persisted session blob
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRecord {
    id: String,
    price: f64,
    sqm: f64,
    #[serde(default)]
    price_per_sqm: Option<f64>,
}

impl From<ListingRecord> for StoredRecord {
    fn from(record: ListingRecord) -> Self {
        let price_per_sqm = Some(record.price_per_area());
        Self {
            id: record.id,
            price: record.price,
            sqm: record.area,
            price_per_sqm,
        }
    }
}

impl TryFrom<StoredRecord> for ListingRecord {
    type Error = String;

    // The stored pricePerSqm is ignored; it is always recomputed.
    fn try_from(stored: StoredRecord) -> Result<Self, Self::Error> {
        ListingRecord::new(stored.id.clone(), stored.price, stored.sqm).ok_or_else(|| {
            format!(
                "record {} has non-positive price or area ({} / {})",
                stored.id, stored.price, stored.sqm
            )
        })
    }
}

/// Everything read from the current page in one extraction
#[derive(Debug, Clone, Default)]
pub struct PageSnapshot {
    /// Path + query of the page the snapshot was taken from
    pub page_id: String,

    /// Category label shown on the page, if any
    pub category: Option<String>,

    /// Raw listing fragments in page order
    pub fragments: Vec<ListingFragment>,
}

impl PageSnapshot {
    pub fn new(page_id: String, category: Option<String>, fragments: Vec<ListingFragment>) -> Self {
        Self {
            page_id,
            category,
            fragments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_positive_values() {
        assert!(ListingRecord::new("a", 0.0, 50.0).is_none());
        assert!(ListingRecord::new("a", 1000.0, 0.0).is_none());
        assert!(ListingRecord::new("a", -5.0, 50.0).is_none());
        assert!(ListingRecord::new("a", f64::NAN, 50.0).is_none());
        assert!(ListingRecord::new("a", f64::INFINITY, 50.0).is_none());
    }

    #[test]
    fn test_price_per_area() {
        let record = ListingRecord::new("a", 90000.0, 50.0).unwrap();
        assert_eq!(record.price_per_area(), 1800.0);
    }

    #[test]
    fn test_serializes_in_session_blob_shape() {
        let record = ListingRecord::new("123", 90000.0, 50.0).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "123", "price": 90000.0, "sqm": 50.0, "pricePerSqm": 1800.0})
        );

        let back: ListingRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_stored_price_per_sqm_is_recomputed() {
        let json = r#"{"id": "x", "price": 100000, "sqm": 50, "pricePerSqm": 1}"#;
        let record: ListingRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.price_per_area(), 2000.0);
    }

    #[test]
    fn test_invalid_stored_record_fails() {
        let json = r#"{"id": "x", "price": 100000, "sqm": 0}"#;
        assert!(serde_json::from_str::<ListingRecord>(json).is_err());
    }
}
