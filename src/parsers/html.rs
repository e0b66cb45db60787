use crate::config::SelectorConfig;
use crate::parsers::{ListingFragment, ParserError};
use scraper::{ElementRef, Html, Selector};

/// Compiled selectors for locating listing cards and their fields
#[derive(Debug, Clone)]
pub struct ListingSelectors {
    card: Selector,
    price: Selector,
    features: Selector,
    category: Selector,
    id_attribute: String,
}

impl ListingSelectors {
    pub fn new(config: &SelectorConfig) -> Result<Self, ParserError> {
        Ok(Self {
            card: compile(&config.card)?,
            price: compile(&config.price)?,
            features: compile(&config.features)?,
            category: compile(&config.category)?,
            id_attribute: config.id_attribute.clone(),
        })
    }
}

fn compile(selector: &str) -> Result<Selector, ParserError> {
    Selector::parse(selector).map_err(|e| ParserError::InvalidSelector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Parses an HTML document and returns its category label (if any) and fragments
pub fn parse_document(
    html: &str,
    selectors: &ListingSelectors,
) -> (Option<String>, Vec<ListingFragment>) {
    let doc = Html::parse_document(html);
    let category = category_in(&doc, selectors);
    let fragments = fragments_in(&doc, selectors);

    ::log::debug!(
        "HTML parser found {} listing cards, category {:?}",
        fragments.len(),
        category
    );
    (category, fragments)
}

fn fragments_in(doc: &Html, selectors: &ListingSelectors) -> Vec<ListingFragment> {
    doc.select(&selectors.card)
        .map(|card| ListingFragment {
            explicit_id: card
                .value()
                .attr(&selectors.id_attribute)
                .map(|s| s.to_string()),
            price_text: first_text(card, &selectors.price).unwrap_or_default(),
            feature_text: first_text(card, &selectors.features).unwrap_or_default(),
        })
        .collect()
}

/// Text of the first category element. An empty element gives `Some("")`, which
/// leaves a previously stored label in place.
fn category_in(doc: &Html, selectors: &ListingSelectors) -> Option<String> {
    doc.select(&selectors.category).next().map(element_text)
}

fn first_text(card: ElementRef<'_>, selector: &Selector) -> Option<String> {
    card.select(selector).next().map(element_text)
}

/// Text content of an element with whitespace runs collapsed
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
