use crate::config::{AnalyzerConfig, SelectorConfig};
use crate::parsers::{ListingFragment, Parser, ParserError};

const LISTINGS_PAGE: &str = r#"
<html><body>
  <h1>  Departamentos en venta en Palermo  </h1>
  <div data-qa="posting PROPERTY" data-id="101">
    <div data-qa="POSTING_CARD_PRICE">USD 90.000</div>
    <h3 data-qa="POSTING_CARD_FEATURES"><span>50 m²</span> <span>tot.</span> <span>2 amb.</span></h3>
  </div>
  <div data-qa="posting PROPERTY" data-id="102">
    <div data-qa="POSTING_CARD_PRICE">USD <b>120.000</b></div>
    <h3 data-qa="POSTING_CARD_FEATURES">60 m² tot.</h3>
  </div>
  <div data-qa="posting PROPERTY">
    <div data-qa="POSTING_CARD_PRICE">USD 100.000</div>
    <h3 data-qa="POSTING_CARD_FEATURES">50 m²</h3>
  </div>
  <div data-qa="posting PROPERTY" data-id="104">
    <h3 data-qa="POSTING_CARD_FEATURES">70 m²</h3>
  </div>
</body></html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> Parser {
        Parser::new(&AnalyzerConfig::default()).unwrap()
    }

    #[test]
    fn test_parse_page_fragments() {
        let snapshot = parser().parse_page(LISTINGS_PAGE, "/departamentos-venta-palermo.html");
        assert_eq!(snapshot.page_id, "/departamentos-venta-palermo.html");
        assert_eq!(snapshot.fragments.len(), 4);

        assert_eq!(
            snapshot.fragments[0],
            ListingFragment::new(Some("101"), "USD 90.000", "50 m² tot. 2 amb.")
        );
        assert_eq!(snapshot.fragments[1].price_text, "USD 120.000");
        assert_eq!(snapshot.fragments[2].explicit_id, None);

        // Card without a price element still yields a fragment, with empty price text
        assert_eq!(snapshot.fragments[3].price_text, "");
    }

    #[test]
    fn test_category_is_trimmed() {
        let snapshot = parser().parse_page(LISTINGS_PAGE, "/");
        assert_eq!(
            snapshot.category.as_deref(),
            Some("Departamentos en venta en Palermo")
        );
    }

    #[test]
    fn test_missing_category() {
        let snapshot = parser().parse_page("<html><body><p>nothing</p></body></html>", "/");
        assert_eq!(snapshot.category, None);
        assert!(snapshot.fragments.is_empty());
    }

    #[test]
    fn test_empty_category_element() {
        let snapshot = parser().parse_page("<html><body><h1>  </h1></body></html>", "/");
        assert_eq!(snapshot.category.as_deref(), Some(""));
    }

    #[test]
    fn test_extract_records_end_to_end() {
        let p = parser();
        let snapshot = p.parse_page(LISTINGS_PAGE, "/");
        let records = p.extract_records(&snapshot);

        let summary: Vec<(&str, f64)> = records
            .iter()
            .map(|r| (r.id(), r.price_per_area()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("101", 1800.0),
                ("102", 2000.0),
                ("fallback_100000_50", 2000.0),
            ]
        );
    }

    #[test]
    fn test_custom_selectors() {
        let config = AnalyzerConfig {
            selectors: SelectorConfig {
                card: "li.listing".to_string(),
                price: ".price".to_string(),
                features: ".size".to_string(),
                id_attribute: "data-listing".to_string(),
                category: "h2".to_string(),
            },
            ..AnalyzerConfig::default()
        };
        let html = r#"<ul><li class="listing" data-listing="z9">
            <span class="price">USD 50.000</span><span class="size">25 m²</span></li></ul>"#;

        let p = Parser::new(&config).unwrap();
        let snapshot = p.parse_page(html, "/");
        let records = p.extract_records(&snapshot);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id(), "z9");
        assert_eq!(records[0].price_per_area(), 2000.0);
    }

    #[test]
    fn test_invalid_selector() {
        let config = AnalyzerConfig {
            selectors: SelectorConfig {
                card: "[[[".to_string(),
                ..SelectorConfig::default()
            },
            ..AnalyzerConfig::default()
        };
        assert!(matches!(
            Parser::new(&config),
            Err(ParserError::InvalidSelector { .. })
        ));
    }
}
