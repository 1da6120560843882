//! Canonical output document types.
//!
//! Every field is optional and skipped when absent: the output schema is
//! sparse, never emitting nulls, empty strings, empty sequences, or empty
//! objects. [`crate::normalize`] is the only producer.

use serde::{Deserialize, Serialize};

/// Untyped per-page extraction result: whatever was found, keyed by the
/// source field names. May be incomplete or carry conflicting values from
/// different extraction strategies; the normalizer resolves those.
pub type RawFieldMap = serde_json::Map<String, serde_json::Value>;

/// A product document normalized into the canonical sparse schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedProduct {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Always stringified, even when the source carried a number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gtin13: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<Brand>,
    #[serde(rename = "aggregateRating", skip_serializing_if = "Option::is_none")]
    pub aggregate_rating: Option<AggregateRating>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offers: Option<OfferSummary>,
    /// Ordered, deduplicated gallery image URLs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brand {
    pub name: String,
}

/// Rating summary; either half may be absent, never both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateRating {
    #[serde(rename = "ratingValue", skip_serializing_if = "Option::is_none")]
    pub rating_value: Option<String>,
    #[serde(rename = "reviewCount", skip_serializing_if = "Option::is_none")]
    pub review_count: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seller {
    pub name: String,
}

/// Offer roll-up for one product.
///
/// When `offers` contains at least one line with a parseable price,
/// `low_price`/`high_price`/`offercount` are derived from exactly those
/// line prices — the concrete lines are the source of truth, overriding
/// whatever bounds the page declared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferSummary {
    #[serde(rename = "priceCurrency")]
    pub price_currency: String,
    pub seller: Seller,
    /// Fixed two-decimal string, e.g. `"199.99"`.
    #[serde(rename = "lowPrice", skip_serializing_if = "Option::is_none")]
    pub low_price: Option<String>,
    #[serde(rename = "highPrice", skip_serializing_if = "Option::is_none")]
    pub high_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offercount: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offers: Option<Vec<OfferLine>>,
}

/// One concrete purchasable offer (condition, price, seller terms).
///
/// Bundled plans appear as one further level of nested `offers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferLine {
    #[serde(rename = "priceCurrency")]
    pub price_currency: String,
    /// Fixed two-decimal string; absent when the source price didn't parse.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,
    #[serde(rename = "itemCondition", skip_serializing_if = "Option::is_none")]
    pub item_condition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offers: Option<Vec<OfferLine>>,
}

impl OfferSummary {
    /// Returns the number of offer lines carrying a parseable price.
    #[must_use]
    pub fn priced_line_count(&self) -> usize {
        self.offers
            .as_deref()
            .map(|lines| lines.iter().filter(|l| l.price.is_some()).count())
            .unwrap_or(0)
    }
}
