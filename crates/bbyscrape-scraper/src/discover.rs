//! Product-link discovery across a paginated category listing.
//!
//! Walks `page=1, 2, …` of one listing URL, yielding product-detail URLs in
//! first-seen order. A URL is never yielded twice within one crawl; the
//! discoverer owns the seen-set and the page counter.

use std::collections::HashSet;

use bbyscrape_core::SiteProfile;
use regex::Regex;
use scraper::Html;
use serde_json::Value;
use url::Url;

use crate::client::PageClient;
use crate::error::ScraperError;
use crate::selectors::{listing, LD_JSON_SCRIPT};

/// Maximum number of listing pages to walk before returning an error.
/// Prevents infinite loops on a listing that always renders a pager.
const MAX_PAGES: usize = 200;

/// Lazy iterator over the product-detail URLs of one category listing.
pub struct LinkDiscoverer<'a> {
    client: &'a PageClient,
    listing_url: String,
    detail_url_re: Regex,
    page: usize,
    seen: HashSet<String>,
    exhausted: bool,
}

impl<'a> LinkDiscoverer<'a> {
    #[must_use]
    pub fn new(client: &'a PageClient, listing_url: &str, site: &SiteProfile) -> Self {
        // PDP links look like `/site/<slug>/<id>.p?skuId=<digits>`.
        let detail_url_re = Regex::new(&format!(
            r"/site/.*\.p\?{}=\d+",
            regex::escape(&site.sku_query_key)
        ))
        .expect("valid regex");
        Self {
            client,
            listing_url: listing_url.to_owned(),
            detail_url_re,
            page: 0,
            seen: HashSet::new(),
            exhausted: false,
        }
    }

    /// Fetches the next listing page and returns the product URLs first seen
    /// there, or `None` once the listing is exhausted.
    ///
    /// A page with extracted-but-already-seen URLs returns an empty batch;
    /// only a page with no extractable product links at all ends the crawl.
    ///
    /// # Errors
    ///
    /// Propagates fetch failures for the listing page itself, an unparseable
    /// listing URL, or [`ScraperError::PaginationLimit`] past [`MAX_PAGES`].
    pub async fn next_batch(&mut self) -> Result<Option<Vec<String>>, ScraperError> {
        if self.exhausted {
            return Ok(None);
        }
        self.page += 1;
        if self.page > MAX_PAGES {
            return Err(ScraperError::PaginationLimit {
                listing_url: self.listing_url.clone(),
                max_pages: MAX_PAGES,
            });
        }

        let page_url = with_page(&self.listing_url, self.page)?;
        tracing::debug!(page = self.page, url = %page_url, "fetching listing page");
        let fetched = self.client.fetch_page(&page_url).await?;
        let scan = scan_listing(&fetched.body, &fetched.final_url, &self.detail_url_re);

        if scan.product_urls.is_empty() {
            if self.page == 1 {
                tracing::warn!(
                    url = %page_url,
                    "no products found on the first listing page — check the listing URL"
                );
            } else {
                tracing::info!(page = self.page, "no more product URLs; stopping");
            }
            self.exhausted = true;
            return Ok(None);
        }

        let fresh: Vec<String> = scan
            .product_urls
            .into_iter()
            .filter(|url| self.seen.insert(url.clone()))
            .collect();

        if !scan.has_pager {
            // Conservative stop: without a visible pagination control, do not
            // guess at further pages.
            tracing::debug!(page = self.page, "no pagination control; stopping after this page");
            self.exhausted = true;
        }

        Ok(Some(fresh))
    }
}

struct ListingScan {
    product_urls: Vec<String>,
    has_pager: bool,
}

/// Extracts candidate product URLs (anchors first, JSON-LD item lists as a
/// fallback), deduplicated in first-seen order, plus the pager presence.
fn scan_listing(html: &str, base_url: &str, detail_url_re: &Regex) -> ListingScan {
    let doc = Html::parse_document(html);
    let base = Url::parse(base_url).ok();

    let mut urls: Vec<String> = Vec::new();
    for anchor in doc.select(&listing::PRODUCT_ANCHOR) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some(abs) = resolve(base.as_ref(), href) else {
            continue;
        };
        if detail_url_re.is_match(&abs) {
            urls.push(abs);
        }
    }

    if urls.is_empty() {
        urls = item_list_urls(&doc, base.as_ref());
    }

    let mut seen = HashSet::new();
    urls.retain(|url| seen.insert(url.clone()));

    let has_pager = doc.select(&listing::PAGER).next().is_some();
    ListingScan {
        product_urls: urls,
        has_pager,
    }
}

/// Item URLs from embedded `ItemList`/`CollectionPage` structured data.
fn item_list_urls(doc: &Html, base: Option<&Url>) -> Vec<String> {
    let mut urls = Vec::new();
    for script in doc.select(&LD_JSON_SCRIPT) {
        let text: String = script.text().collect();
        let Ok(value) = serde_json::from_str::<Value>(text.trim()) else {
            continue;
        };
        let Some(obj) = value.as_object() else {
            continue;
        };
        if !matches!(
            obj.get("@type").and_then(Value::as_str),
            Some("ItemList" | "CollectionPage")
        ) {
            continue;
        }
        let Some(items) = obj.get("itemListElement").and_then(Value::as_array) else {
            continue;
        };
        for item in items {
            let url = item
                .get("url")
                .and_then(Value::as_str)
                .or_else(|| {
                    item.get("item")
                        .and_then(|inner| inner.get("url"))
                        .and_then(Value::as_str)
                });
            if let Some(url) = url {
                if let Some(abs) = resolve(base, url) {
                    urls.push(abs);
                }
            }
        }
    }
    urls
}

fn resolve(base: Option<&Url>, href: &str) -> Option<String> {
    match base {
        Some(base) => base.join(href).ok().map(Into::into),
        None => Url::parse(href).ok().map(Into::into),
    }
}

/// Sets or overwrites the `page` query parameter, preserving everything else.
fn with_page(listing_url: &str, page: usize) -> Result<String, ScraperError> {
    let mut url = Url::parse(listing_url).map_err(|e| ScraperError::InvalidUrl {
        url: listing_url.to_owned(),
        reason: e.to_string(),
    })?;
    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "page")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(retained)
        .append_pair("page", &page.to_string());
    Ok(url.to_string())
}
