//! Embedded schema.org JSON-LD block extraction.

use scraper::Html;
use serde_json::{Map, Value};

use crate::selectors::LD_JSON_SCRIPT;

const PRODUCT: &str = "Product";
const ACCEPTED_TYPES: &[&str] = &["Product", "AggregateOffer"];

/// Returns the most relevant product block from the page's
/// `<script type="application/ld+json">` payloads, if any.
///
/// Accepts top-level objects, arrays of objects, and `@graph` containers.
/// An exact `Product` block is preferred over other accepted types; ties go
/// to the first block found. Malformed JSON is skipped silently.
pub(crate) fn product_block(doc: &Html) -> Option<Map<String, Value>> {
    let mut candidates: Vec<Map<String, Value>> = Vec::new();

    for script in doc.select(&LD_JSON_SCRIPT) {
        let text: String = script.text().collect();
        let Ok(value) = serde_json::from_str::<Value>(text.trim()) else {
            continue;
        };

        match value {
            Value::Array(items) => {
                for item in items {
                    if let Value::Object(obj) = item {
                        if type_matches(&obj, ACCEPTED_TYPES) {
                            candidates.push(obj);
                        }
                    }
                }
            }
            Value::Object(obj) => {
                if type_matches(&obj, ACCEPTED_TYPES) {
                    candidates.push(obj);
                } else if let Some(Value::Array(graph)) = obj.get("@graph") {
                    // Many sites wrap their structured data in a graph; only
                    // Product nodes are interesting there.
                    for node in graph {
                        if let Value::Object(node) = node {
                            if type_matches(node, &[PRODUCT]) {
                                candidates.push(node.clone());
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }

    if let Some(idx) = candidates
        .iter()
        .position(|candidate| type_matches(candidate, &[PRODUCT]))
    {
        return Some(candidates.swap_remove(idx));
    }
    candidates.into_iter().next()
}

/// `@type` may be a plain string or an array of strings; the block matches
/// when any declared type is in `accepted`.
fn type_matches(obj: &Map<String, Value>, accepted: &[&str]) -> bool {
    match obj.get("@type") {
        Some(Value::String(s)) => accepted.contains(&s.as_str()),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .any(|s| accepted.contains(&s)),
        _ => false,
    }
}
