//! Compiled-in default portfolio content.
//!
//! The default document is bundled at build time and is the fallback for
//! every load failure, so it must always decode and validate.

use crate::model::document::PortfolioDocument;
use once_cell::sync::Lazy;
use serde_json::Value;

const DEFAULT_PORTFOLIO_JSON: &str = include_str!("../data/default_portfolio.json");

static DEFAULT_DOCUMENT: Lazy<PortfolioDocument> = Lazy::new(|| {
    serde_json::from_str(DEFAULT_PORTFOLIO_JSON).expect("bundled default portfolio must decode")
});

/// Returns a copy of the compiled-in default document.
pub fn default_document() -> PortfolioDocument {
    DEFAULT_DOCUMENT.clone()
}

/// Returns the compiled-in default document as a JSON tree.
///
/// Built from the typed document so the overlay only ever carries keys the
/// model knows about.
pub fn default_document_value() -> Value {
    serde_json::to_value(&*DEFAULT_DOCUMENT).unwrap_or(Value::Null)
}
