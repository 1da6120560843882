//! Normalization from raw extracted field maps to [`NormalizedProduct`].
//!
//! Pure and total: malformed or missing sub-fields degrade to absence, never
//! to an error. Value coercion is delegated to [`crate::coerce`]; this module
//! focuses on structural conversion and field-alias resolution.

use bbyscrape_core::SiteProfile;
use serde_json::Value;

use crate::coerce::{as_float, as_nonempty_string, format_price};
use crate::types::{
    AggregateRating, Brand, NormalizedProduct, OfferLine, OfferSummary, RawFieldMap, Seller,
};

/// Maps a raw product field map into the canonical sparse schema.
///
/// Deterministic, no I/O. Fields that are null, empty, or of an unusable
/// shape are simply omitted from the result.
#[must_use]
pub fn normalize_product(raw: &RawFieldMap, site: &SiteProfile) -> NormalizedProduct {
    let brand = norm_brand(raw.get("brand"));
    let aggregate_rating = norm_rating(raw.get("aggregateRating"));
    let offers = norm_offers(raw.get("offers"), site);

    let name = string_field(raw, &["name"]);
    let url = string_field(raw, &["url"]);
    let description = string_field(raw, &["description"]);
    let image = string_field(raw, &["image"]);

    // Identifiers resolve from the first present alias and are always
    // stringified, never left as native numbers.
    let sku = string_field(raw, &["sku", "skuId"]);
    let gtin13 = string_field(raw, &["gtin13", "gtin", "gtin_13"]);
    let model = string_field(raw, &["model", "modelNumber"]);
    let color = string_field(raw, &["color"]);

    let images = norm_images(raw.get("images"), image.as_deref());

    NormalizedProduct {
        name,
        image,
        url,
        description,
        sku,
        gtin13,
        model,
        color,
        brand,
        aggregate_rating,
        offers,
        images,
    }
}

/// Resolves the first alias present with a non-empty string/number value.
fn string_field(raw: &RawFieldMap, aliases: &[&str]) -> Option<String> {
    aliases
        .iter()
        .find_map(|key| raw.get(*key).and_then(as_nonempty_string))
}

/// Accepts a name-bearing object or a plain string; anything else is no brand.
fn norm_brand(value: Option<&Value>) -> Option<Brand> {
    match value? {
        Value::Object(obj) => ["name", "brand"]
            .iter()
            .find_map(|key| obj.get(*key).and_then(as_nonempty_string))
            .map(|name| Brand { name }),
        Value::String(s) if !s.is_empty() => Some(Brand { name: s.clone() }),
        _ => None,
    }
}

/// Builds a rating from the accepted alias spellings; both halves absent
/// means no rating at all.
fn norm_rating(value: Option<&Value>) -> Option<AggregateRating> {
    let obj = value?.as_object()?;
    let rating_value = ["ratingValue", "ratingvalue", "rating"]
        .iter()
        .find_map(|key| obj.get(*key).and_then(as_nonempty_string));
    let review_count = ["reviewCount", "ratingCount", "reviewcount"]
        .iter()
        .find_map(|key| obj.get(*key).and_then(as_nonempty_string));
    if rating_value.is_none() && review_count.is_none() {
        return None;
    }
    Some(AggregateRating {
        rating_value,
        review_count,
    })
}

/// Normalizes the offers field. Accepts the object form (an aggregate with
/// optional line items), the sequence form (bare line items), or nothing.
fn norm_offers(value: Option<&Value>, site: &SiteProfile) -> Option<OfferSummary> {
    match value? {
        Value::Object(obj) if !obj.is_empty() => Some(norm_offer_object(obj, site)),
        Value::Array(items) => norm_offer_sequence(items, site),
        _ => None,
    }
}

fn norm_offer_object(obj: &RawFieldMap, site: &SiteProfile) -> OfferSummary {
    let price_currency = ["priceCurrency", "pricecurrency"]
        .iter()
        .find_map(|key| obj.get(*key).and_then(as_nonempty_string))
        .unwrap_or_else(|| site.currency.clone());
    let seller = norm_seller(obj.get("seller"), site);

    let mut low_price = ["lowPrice", "lowprice", "price"]
        .iter()
        .find_map(|key| obj.get(*key).and_then(as_float))
        .map(format_price);
    let mut high_price = ["highPrice", "highprice", "price"]
        .iter()
        .find_map(|key| obj.get(*key).and_then(as_float))
        .map(format_price);

    let raw_items: Vec<&Value> = match obj.get("offers").or_else(|| obj.get("items")) {
        // A single object counts as a one-element sequence.
        Some(item @ Value::Object(_)) => vec![item],
        Some(Value::Array(items)) => items.iter().collect(),
        _ => Vec::new(),
    };
    let lines: Vec<OfferLine> = raw_items
        .iter()
        .filter_map(|v| v.as_object())
        .map(|item| offer_line(item, &price_currency, true))
        .collect();

    let mut offercount = None;
    let mut offers = None;
    if !lines.is_empty() {
        offercount = Some(lines.len());
        // Line items with parseable prices are the source of truth: the
        // summary bounds and count are recomputed from exactly those.
        let prices = parsed_line_prices(&lines);
        if !prices.is_empty() {
            low_price = Some(format_price(fold_min(&prices)));
            high_price = Some(format_price(fold_max(&prices)));
            offercount = Some(prices.len());
        }
        offers = Some(lines);
    }

    OfferSummary {
        price_currency,
        seller,
        low_price,
        high_price,
        offercount,
        offers,
    }
}

/// Sequence form: each element becomes a top-level line directly, with no
/// nesting support. Yields nothing when no usable line is present.
fn norm_offer_sequence(items: &[Value], site: &SiteProfile) -> Option<OfferSummary> {
    let lines: Vec<OfferLine> = items
        .iter()
        .filter_map(|v| v.as_object())
        .map(|item| offer_line(item, &site.currency, false))
        .collect();
    if lines.is_empty() {
        return None;
    }

    let prices = parsed_line_prices(&lines);
    let (low_price, high_price, offercount) = if prices.is_empty() {
        (None, None, None)
    } else {
        (
            Some(format_price(fold_min(&prices))),
            Some(format_price(fold_max(&prices))),
            Some(prices.len()),
        )
    };

    Some(OfferSummary {
        price_currency: site.currency.clone(),
        seller: Seller {
            name: site.default_seller.clone(),
        },
        low_price,
        high_price,
        offercount,
        offers: Some(lines),
    })
}

fn offer_line(item: &RawFieldMap, default_currency: &str, allow_nested: bool) -> OfferLine {
    let price_currency = item
        .get("priceCurrency")
        .and_then(as_nonempty_string)
        .unwrap_or_else(|| default_currency.to_owned());
    let price = item.get("price").and_then(as_float).map(format_price);
    let availability = ["availability", "availabilityStatus"]
        .iter()
        .find_map(|key| item.get(*key).and_then(as_nonempty_string));
    let item_condition = item.get("itemCondition").and_then(as_nonempty_string);
    let description = ["description", "name"]
        .iter()
        .find_map(|key| item.get(*key).and_then(as_nonempty_string));

    // One level of nested sub-offers (bundled carrier/plan breakdowns).
    let offers = if allow_nested {
        match item.get("offers") {
            Some(Value::Array(nested)) => {
                let nested_lines: Vec<OfferLine> = nested
                    .iter()
                    .filter_map(|v| v.as_object())
                    .map(|n| offer_line(n, default_currency, false))
                    .collect();
                if nested_lines.is_empty() {
                    None
                } else {
                    Some(nested_lines)
                }
            }
            _ => None,
        }
    } else {
        None
    };

    OfferLine {
        price_currency,
        price,
        availability,
        item_condition,
        description,
        offers,
    }
}

fn norm_seller(value: Option<&Value>, site: &SiteProfile) -> Seller {
    let name = match value {
        Some(Value::Object(obj)) => obj.get("name").and_then(as_nonempty_string),
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    };
    Seller {
        name: name.unwrap_or_else(|| site.default_seller.clone()),
    }
}

/// Explicit image list wins (strings only, deduplicated in order);
/// otherwise the primary image becomes a one-element gallery.
fn norm_images(value: Option<&Value>, primary: Option<&str>) -> Option<Vec<String>> {
    if let Some(Value::Array(items)) = value {
        let mut out: Vec<String> = Vec::new();
        for item in items {
            if let Some(src) = as_nonempty_string(item) {
                if !out.contains(&src) {
                    out.push(src);
                }
            }
        }
        if !out.is_empty() {
            return Some(out);
        }
    }
    primary.map(|p| vec![p.to_owned()])
}

fn parsed_line_prices(lines: &[OfferLine]) -> Vec<f64> {
    lines
        .iter()
        .filter_map(|l| l.price.as_deref())
        .filter_map(|p| p.parse::<f64>().ok())
        .collect()
}

fn fold_min(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

fn fold_max(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}
