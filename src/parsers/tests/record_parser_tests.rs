use crate::parsers::ListingFragment;
use crate::parsers::record::{RecordExtractor, RejectReason, fallback_id};

#[cfg(test)]
mod unit_tests {
    use super::*;

    fn extractor() -> RecordExtractor {
        RecordExtractor::new("USD", "m²").unwrap()
    }

    #[test]
    fn test_extract_with_explicit_id() {
        let fragment = ListingFragment::new(Some("4711"), "USD 90.000", "50 m² tot. 2 amb.");
        let record = extractor().extract(&fragment).unwrap();
        assert_eq!(record.id(), "4711");
        assert_eq!(record.price(), 90000.0);
        assert_eq!(record.area(), 50.0);
        assert_eq!(record.price_per_area(), 1800.0);
    }

    #[test]
    fn test_grouping_and_decimal_separators_are_dropped() {
        let ex = extractor();

        let fragment = ListingFragment::new(Some("a"), "USD 1,250,000", "100 m²");
        assert_eq!(ex.extract(&fragment).unwrap().price(), 1250000.0);

        // Fractional digits are folded into the integer on purpose
        let fragment = ListingFragment::new(Some("b"), "USD 120.000,50", "100 m²");
        assert_eq!(ex.extract(&fragment).unwrap().price(), 12000050.0);

        // No whitespace after the currency code
        let fragment = ListingFragment::new(Some("c"), "USD95.000", "100 m²");
        assert_eq!(ex.extract(&fragment).unwrap().price(), 95000.0);
    }

    #[test]
    fn test_fallback_id_when_missing_or_blank() {
        let ex = extractor();

        let fragment = ListingFragment::new(None, "USD 90.000", "50 m²");
        assert_eq!(ex.extract(&fragment).unwrap().id(), "fallback_90000_50");

        let fragment = ListingFragment::new(Some("   "), "USD 90.000", "50 m²");
        assert_eq!(ex.extract(&fragment).unwrap().id(), "fallback_90000_50");

        assert_eq!(fallback_id(120000.0, 60.0), "fallback_120000_60");
    }

    #[test]
    fn test_price_rejections() {
        let ex = extractor();

        let fragment = ListingFragment::new(Some("a"), "Consultar precio", "50 m²");
        assert!(matches!(
            ex.extract(&fragment),
            Err(RejectReason::MissingPrice { .. })
        ));

        // Other currencies are not the target currency
        let fragment = ListingFragment::new(Some("a"), "$ 90.000.000", "50 m²");
        assert!(matches!(
            ex.extract(&fragment),
            Err(RejectReason::MissingPrice { .. })
        ));

        let fragment = ListingFragment::new(Some("a"), "USD .,.", "50 m²");
        assert_eq!(
            ex.extract(&fragment),
            Err(RejectReason::InvalidPrice(".,.".to_string()))
        );

        let fragment = ListingFragment::new(Some("a"), "USD 0", "50 m²");
        assert_eq!(ex.extract(&fragment), Err(RejectReason::NonPositivePrice));
    }

    #[test]
    fn test_area_rejections() {
        let ex = extractor();

        let fragment = ListingFragment::new(Some("a"), "USD 90.000", "3 ambientes");
        assert_eq!(ex.extract(&fragment), Err(RejectReason::MissingArea));

        let fragment = ListingFragment::new(Some("a"), "USD 90.000", "");
        assert_eq!(ex.extract(&fragment), Err(RejectReason::MissingArea));

        let fragment = ListingFragment::new(Some("a"), "USD 90.000", "0 m² tot.");
        assert_eq!(
            ex.extract(&fragment),
            Err(RejectReason::InvalidArea("0".to_string()))
        );
    }

    #[test]
    fn test_first_area_match_wins() {
        let fragment = ListingFragment::new(Some("a"), "USD 100.000", "80 m² tot. 50 m² cub.");
        let record = extractor().extract(&fragment).unwrap();
        assert_eq!(record.area(), 80.0);
    }

    #[test]
    fn test_extract_all_skips_rejections() {
        let fragments = vec![
            ListingFragment::new(Some("1"), "USD 90.000", "50 m²"),
            ListingFragment::new(Some("2"), "Consultar", "50 m²"),
            ListingFragment::new(Some("3"), "USD 120.000", "60 m²"),
            ListingFragment::new(Some("4"), "USD 100.000", "sin datos"),
        ];
        let records = extractor().extract_all(&fragments);
        let ids: Vec<&str> = records.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_custom_currency_and_unit() {
        let ex = RecordExtractor::new("EUR", "sqft").unwrap();
        let fragment = ListingFragment::new(Some("x"), "EUR 300.000", "1500 sqft");
        let record = ex.extract(&fragment).unwrap();
        assert_eq!(record.price_per_area(), 200.0);
    }
}
