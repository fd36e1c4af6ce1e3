//! Per-field extraction strategies
//!
//! Each strategy is a plain function from a page document to an optional
//! string; the engine evaluates a field's strategies in order and keeps the
//! first non-empty result. Selectors target markup observed on listing
//! detail pages across two generations of page structure, which is why most
//! fields carry a `data-testid` strategy and an older `ds-*` class fallback.

use crate::crawler::PageDocument;
use crate::ExtractError;

/// An extraction strategy: pure function from document to optional value
pub type Strategy = fn(&PageDocument) -> Result<Option<String>, ExtractError>;

/// Ordered chain for the address field
pub const ADDRESS_STRATEGIES: &[(&str, Strategy)] = &[
    ("h1-first", address_h1),
    ("ds-address-container", address_ds_container),
];

/// Ordered chain for the price field
pub const PRICE_STRATEGIES: &[(&str, Strategy)] = &[
    ("price-testid", price_testid),
    ("ds-value", price_ds_value),
];

/// Ordered chain for the beds field
pub const BEDS_STRATEGIES: &[(&str, Strategy)] = &[
    ("bed-bath-testid", beds_testid),
    ("ds-bed-bath-living-area", beds_ds_span),
];

/// Ordered chain for the area field
pub const AREA_STRATEGIES: &[(&str, Strategy)] = &[("ds-home-fact-sqft", area_home_fact)];

fn address_h1(document: &PageDocument) -> Result<Option<String>, ExtractError> {
    document.query_text("h1")
}

fn address_ds_container(document: &PageDocument) -> Result<Option<String>, ExtractError> {
    document.query_text("h1.ds-address-container")
}

fn price_testid(document: &PageDocument) -> Result<Option<String>, ExtractError> {
    document.query_text(r#"[data-testid="price"]"#)
}

fn price_ds_value(document: &PageDocument) -> Result<Option<String>, ExtractError> {
    document.query_text("span.ds-value")
}

fn beds_testid(document: &PageDocument) -> Result<Option<String>, ExtractError> {
    document.query_text(r#"[data-testid="bed-bath-beyond"] li"#)
}

fn beds_ds_span(document: &PageDocument) -> Result<Option<String>, ExtractError> {
    document.query_text("span.ds-bed-bath-living-area")
}

/// Picks the home-fact value that mentions square footage
fn area_home_fact(document: &PageDocument) -> Result<Option<String>, ExtractError> {
    let facts = document.query_all_text("span.ds-home-fact-value")?;
    Ok(facts.into_iter().find(|text| text.contains("sqft")))
}
