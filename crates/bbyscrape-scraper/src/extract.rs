//! Best-effort product extraction from product-detail page HTML.
//!
//! Embedded JSON-LD is the highest-precedence source; DOM heuristics only
//! fill the gaps it leaves. The extractor never fails — missing data simply
//! leaves fields absent from the returned map.

pub(crate) mod jsonld;

use std::sync::LazyLock;

use bbyscrape_core::SiteProfile;
use regex::Regex;
use scraper::{Html, Selector};
use serde_json::{json, Map, Value};

use crate::selectors::detail;
use crate::types::RawFieldMap;

/// Dollars-and-cents pattern: digits with exactly two decimals, applied
/// after stripping thousands separators.
static PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+\.[0-9]{2})").expect("valid regex"));

/// A SKU is the first run of six or more digits in a SKU-bearing element.
static SKU_DIGITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{6,})").expect("valid regex"));

/// Parses raw product details from one product-detail page.
///
/// Returns whatever could be found; the caller feeds the result to
/// [`crate::normalize::normalize_product`].
#[must_use]
pub fn extract_product(html: &str, url: &str, site: &SiteProfile) -> RawFieldMap {
    let doc = Html::parse_document(html);
    let mut data = Map::new();
    if !url.is_empty() {
        data.insert("url".to_owned(), Value::String(url.to_owned()));
    }

    if let Some(block) = jsonld::product_block(&doc) {
        for (key, value) in block {
            data.insert(key, value);
        }
    }

    if !is_present(&data, "name") {
        if let Some(name) = first_text(&doc, &detail::NAME) {
            data.insert("name".to_owned(), Value::String(name));
        }
    }

    fill_sku(&doc, url, site, &mut data);
    fill_images(&doc, site, &mut data);
    fill_rating(&doc, &mut data);
    fill_offers(&doc, site, &mut data);
    fill_description(&doc, &mut data);

    data
}

/// Step 3: SKU from the URL's query parameter, else from known DOM spots.
fn fill_sku(doc: &Html, url: &str, site: &SiteProfile, data: &mut RawFieldMap) {
    if is_present(data, "sku") {
        return;
    }
    if let Some(sku) = sku_from_url(url, &site.sku_query_key) {
        data.insert("sku".to_owned(), Value::String(sku));
        return;
    }
    if let Some(text) = first_text(doc, &detail::SKU) {
        if let Some(m) = SKU_DIGITS_RE.captures(&text) {
            data.insert("sku".to_owned(), Value::String(m[1].to_owned()));
        }
    }
}

fn sku_from_url(url: &str, sku_query_key: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let value = parsed
        .query_pairs()
        .find(|(key, _)| key == sku_query_key)
        .map(|(_, value)| value.into_owned())?;
    let digits: String = value.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        None
    } else {
        Some(digits)
    }
}

/// Steps 4 and 5: primary image fallback, then the full CDN-hosted gallery.
fn fill_images(doc: &Html, site: &SiteProfile, data: &mut RawFieldMap) {
    if !is_present(data, "image") {
        if let Some(src) = primary_image(doc, site) {
            data.insert("image".to_owned(), Value::String(src));
        }
    }

    let mut gallery: Vec<String> = Vec::new();
    for element in doc.select(&detail::ANY_IMAGE) {
        if let Some(src) = element.value().attr("src") {
            if src.contains(&site.image_cdn_host) && !gallery.iter().any(|seen| seen == src) {
                gallery.push(src.to_owned());
            }
        }
    }
    if !gallery.is_empty() {
        if let Some(Value::String(primary)) = data.get("image") {
            if !gallery.contains(primary) {
                gallery.push(primary.clone());
            }
        }
        data.insert(
            "images".to_owned(),
            Value::Array(gallery.into_iter().map(Value::String).collect()),
        );
    }
}

/// First element matching a primary-image marker or pointing at the image
/// CDN, taken in document order.
fn primary_image(doc: &Html, site: &SiteProfile) -> Option<String> {
    let css = format!(
        r#"img.primary-image, img#main-image, img[src*="{}"]"#,
        site.image_cdn_host
    );
    let selector = Selector::parse(&css).ok()?;
    doc.select(&selector)
        .next()
        .and_then(|element| element.value().attr("src"))
        .map(str::to_owned)
}

/// Step 6: rating from known DOM spots; a missing half stays null rather
/// than being fabricated.
fn fill_rating(doc: &Html, data: &mut RawFieldMap) {
    if is_present(data, "aggregateRating") {
        return;
    }
    let rating_value = first_text(doc, &detail::RATING_VALUE);
    let review_count = first_text(doc, &detail::REVIEW_COUNT);
    if rating_value.is_none() && review_count.is_none() {
        return;
    }
    let mut rating = Map::new();
    rating.insert(
        "ratingValue".to_owned(),
        rating_value.map_or(Value::Null, Value::String),
    );
    rating.insert(
        "reviewCount".to_owned(),
        review_count.map_or(Value::Null, Value::String),
    );
    data.insert("aggregateRating".to_owned(), Value::Object(rating));
}

/// Step 7: displayed/regular prices from the pricing blocks. Attached only
/// when at least one qualifying price was found.
fn fill_offers(doc: &Html, site: &SiteProfile, data: &mut RawFieldMap) {
    if is_present(data, "offers") {
        return;
    }
    let price = first_text(doc, &detail::DISPLAYED_PRICE)
        .as_deref()
        .and_then(parse_price);
    let regular = first_text(doc, &detail::REGULAR_PRICE)
        .as_deref()
        .and_then(parse_price);
    if price.is_none() && regular.is_none() {
        return;
    }

    let mut offers = Map::new();
    offers.insert(
        "priceCurrency".to_owned(),
        Value::String(site.currency.clone()),
    );
    offers.insert("seller".to_owned(), json!({ "name": site.default_seller }));
    if let Some(price) = &price {
        offers.insert("lowPrice".to_owned(), Value::String(price.clone()));
        offers.insert("highPrice".to_owned(), Value::String(price.clone()));
    }
    if let Some(regular) = &regular {
        offers.insert(
            "offers".to_owned(),
            json!([{
                "priceCurrency": site.currency,
                "price": regular,
                "itemCondition": "NewCondition",
                "description": "Original",
            }]),
        );
    }
    data.insert("offers".to_owned(), Value::Object(offers));
}

/// Step 8: meta description, else the description container's text.
fn fill_description(doc: &Html, data: &mut RawFieldMap) {
    if is_present(data, "description") {
        return;
    }
    let description = doc
        .select(&detail::META_DESCRIPTION)
        .next()
        .and_then(|element| element.value().attr("content"))
        .map(str::trim)
        .filter(|content| !content.is_empty())
        .map(str::to_owned)
        .or_else(|| first_text(doc, &detail::DESCRIPTION_BLOCK));
    if let Some(description) = description {
        data.insert("description".to_owned(), Value::String(description));
    }
}

fn parse_price(text: &str) -> Option<String> {
    let stripped = text.replace(',', "");
    PRICE_RE.captures(&stripped).map(|m| m[1].to_owned())
}

/// A field counts as present when it holds genuine content: not missing,
/// null, empty string, empty collection, zero, or false.
fn is_present(data: &RawFieldMap, key: &str) -> bool {
    match data.get(key) {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
        Some(Value::Number(n)) => n.as_f64() != Some(0.0),
        Some(Value::Bool(b)) => *b,
    }
}

/// Stripped text of the first element matching `selector`, if non-empty.
fn first_text(doc: &Html, selector: &Selector) -> Option<String> {
    doc.select(selector).next().and_then(|element| {
        let text: String = element.text().collect();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_owned())
        }
    })
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
