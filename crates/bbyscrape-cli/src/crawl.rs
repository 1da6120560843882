//! The crawl driver: discover → fetch → extract → normalize → emit.
//!
//! Failures are isolated per product page — logged and skipped, never ending
//! the run. Only a listing-page failure ends the crawl, after flushing
//! everything already written.

use std::time::Duration;

use bbyscrape_core::{AppConfig, SiteProfile};
use bbyscrape_scraper::{
    extract_product, normalize_product, LinkDiscoverer, NormalizedProduct, PageClient,
};

use crate::sink::JsonlWriter;

/// End-of-run totals for the summary line.
#[derive(Debug, Default)]
pub struct CrawlTotals {
    pub written: usize,
    pub skipped: usize,
}

/// Crawls one category listing to completion or the configured item cap.
///
/// # Errors
///
/// Returns an error when the HTTP client cannot be built, the output sink
/// fails, or a listing page cannot be fetched.
pub async fn run(
    config: &AppConfig,
    site: &SiteProfile,
    listing_url: &str,
) -> anyhow::Result<CrawlTotals> {
    let client = PageClient::new(
        config.request_timeout_secs,
        &config.user_agent,
        config.max_retries,
        config.retry_backoff_base_secs,
    )?;
    let mut discoverer = LinkDiscoverer::new(&client, listing_url, site);
    let mut writer = JsonlWriter::create(&config.output_path)?;

    let mut totals = CrawlTotals::default();
    let outcome = drive(config, site, &client, &mut discoverer, &mut writer, &mut totals).await;
    writer.finish()?;
    outcome.map(|()| totals)
}

async fn drive(
    config: &AppConfig,
    site: &SiteProfile,
    client: &PageClient,
    discoverer: &mut LinkDiscoverer<'_>,
    writer: &mut JsonlWriter,
    totals: &mut CrawlTotals,
) -> anyhow::Result<()> {
    let mut attempted = 0usize;

    'crawl: while let Some(batch) = discoverer.next_batch().await? {
        for url in batch {
            if let Some(max) = config.max_items {
                if attempted >= max {
                    tracing::info!(max, "item cap reached");
                    break 'crawl;
                }
            }
            if attempted > 0 && config.inter_request_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(config.inter_request_delay_ms)).await;
            }
            attempted += 1;

            match scrape_one(client, &url, site).await {
                Ok(product) => {
                    writer.write(&product)?;
                    totals.written += 1;
                    tracing::debug!(url = %url, "wrote product");
                }
                Err(e) => {
                    totals.skipped += 1;
                    tracing::warn!(url = %url, error = %e, "skipping product page");
                }
            }
        }
    }

    Ok(())
}

async fn scrape_one(
    client: &PageClient,
    url: &str,
    site: &SiteProfile,
) -> anyhow::Result<NormalizedProduct> {
    let page = client.fetch_page(url).await?;
    let raw = extract_product(&page.body, &page.final_url, site);
    Ok(normalize_product(&raw, site))
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const LISTING_PATH: &str = "/site/all-cell-phones/cat.c";

    fn test_config(output: &Path) -> AppConfig {
        AppConfig {
            listing_url: None,
            output_path: output.to_path_buf(),
            max_items: None,
            log_level: "info".to_owned(),
            request_timeout_secs: 5,
            user_agent: "bbyscrape-test/0.1".to_owned(),
            max_retries: 0,
            retry_backoff_base_secs: 0,
            inter_request_delay_ms: 0,
        }
    }

    async fn mount_listing(server: &MockServer, body: &str) {
        Mock::given(method("GET"))
            .and(path(LISTING_PATH))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body.to_owned()))
            .mount(server)
            .await;
    }

    async fn mount_pdp(server: &MockServer, pdp_path: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(pdp_path))
            .respond_with(ResponseTemplate::new(200).set_body_string(body.to_owned()))
            .mount(server)
            .await;
    }

    const LISTING: &str = r#"<html><body>
        <a class="sku-header" href="/site/acme-phone-x/1111111.p?skuId=1111111">Acme Phone X</a>
        <a class="sku-header" href="/site/acme-tab/2222222.p?skuId=2222222">Acme Tab</a>
        <a class="sku-header" href="/site/ghost/3333333.p?skuId=3333333">Ghost</a>
    </body></html>"#;

    const PDP_JSON_LD: &str = r#"<html><head>
        <script type="application/ld+json">
        {"@type": "Product", "name": "Acme Phone X", "sku": "1111111",
         "brand": {"name": "Acme"},
         "offers": {"priceCurrency": "USD", "lowPrice": "199.99", "highPrice": "199.99"}}
        </script>
    </head><body></body></html>"#;

    const PDP_DOM_ONLY: &str = r#"<html><body>
        <div class="sku-title"><h1>Acme Tab</h1></div>
        <div class="priceView-hero-price"><span>$329.99</span></div>
    </body></html>"#;

    #[tokio::test]
    async fn crawl_writes_one_line_per_product_and_skips_failures() {
        let server = MockServer::start().await;
        mount_listing(&server, LISTING).await;
        mount_pdp(&server, "/site/acme-phone-x/1111111.p", PDP_JSON_LD).await;
        mount_pdp(&server, "/site/acme-tab/2222222.p", PDP_DOM_ONLY).await;
        // The third PDP is not mounted: it 404s and must be skipped.

        let dir = tempfile::tempdir().expect("tempdir");
        let output = dir.path().join("products.jsonl");
        let config = test_config(&output);
        let site = SiteProfile::bestbuy_us();
        let listing_url = format!("{}{}", server.uri(), LISTING_PATH);

        let totals = run(&config, &site, &listing_url).await.expect("crawl runs");
        assert_eq!(totals.written, 2);
        assert_eq!(totals.skipped, 1);

        let contents = fs::read_to_string(&output).expect("read output");
        let lines: Vec<serde_json::Value> = contents
            .lines()
            .map(|line| serde_json::from_str(line).expect("each line is JSON"))
            .collect();
        assert_eq!(lines.len(), 2);

        // Discovery order is preserved in the output.
        assert_eq!(lines[0]["name"], "Acme Phone X");
        assert_eq!(lines[0]["sku"], "1111111");
        assert_eq!(lines[0]["brand"]["name"], "Acme");

        assert_eq!(lines[1]["name"], "Acme Tab");
        assert_eq!(lines[1]["offers"]["lowPrice"], "329.99");
        assert_eq!(lines[1]["offers"]["seller"]["name"], "Best Buy");
        // The DOM-only page still resolves its SKU from the product URL.
        assert_eq!(lines[1]["sku"], "2222222");
    }

    #[tokio::test]
    async fn crawl_honors_the_item_cap() {
        let server = MockServer::start().await;
        mount_listing(&server, LISTING).await;
        mount_pdp(&server, "/site/acme-phone-x/1111111.p", PDP_JSON_LD).await;

        let dir = tempfile::tempdir().expect("tempdir");
        let output = dir.path().join("products.jsonl");
        let mut config = test_config(&output);
        config.max_items = Some(1);
        let site = SiteProfile::bestbuy_us();
        let listing_url = format!("{}{}", server.uri(), LISTING_PATH);

        let totals = run(&config, &site, &listing_url).await.expect("crawl runs");
        assert_eq!(totals.written, 1);
        assert_eq!(totals.skipped, 0);
    }

    #[tokio::test]
    async fn empty_listing_produces_an_empty_output_file() {
        let server = MockServer::start().await;
        mount_listing(&server, "<html><body>nothing for sale</body></html>").await;

        let dir = tempfile::tempdir().expect("tempdir");
        let output = dir.path().join("products.jsonl");
        let config = test_config(&output);
        let site = SiteProfile::bestbuy_us();
        let listing_url = format!("{}{}", server.uri(), LISTING_PATH);

        let totals = run(&config, &site, &listing_url).await.expect("crawl runs");
        assert_eq!(totals.written, 0);
        assert_eq!(totals.skipped, 0);
        assert_eq!(fs::read_to_string(&output).expect("read output"), "");
    }
}
