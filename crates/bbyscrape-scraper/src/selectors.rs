//! Compiled CSS selectors for listing and product-detail pages.
//!
//! All DOM knowledge about the storefront lives here. When the site ships a
//! new page layout, update these selectors and the corresponding fixtures.

use std::sync::LazyLock;

use scraper::Selector;

fn sel(css: &str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

/// Selectors for category/listing pages.
pub(crate) mod listing {
    use super::{sel, LazyLock, Selector};

    /// Product-card anchors. Cards carry a numeric SKU attribute or link
    /// straight to a product-detail URL.
    pub(crate) static PRODUCT_ANCHOR: LazyLock<Selector> = LazyLock::new(|| {
        sel(r#"a.sku-header, a[data-sku-id], div.sku-title a, a[href*=".p?skuId="]"#)
    });

    /// Pagination affordance; its absence means the listing has a single page.
    pub(crate) static PAGER: LazyLock<Selector> =
        LazyLock::new(|| sel(r#"nav.pagination, div.pagination, a[aria-label="Next Page"]"#));
}

/// Selectors for product-detail pages.
pub(crate) mod detail {
    use super::{sel, LazyLock, Selector};

    pub(crate) static NAME: LazyLock<Selector> =
        LazyLock::new(|| sel("h1, h1.sku-title, div.sku-title h1"));

    pub(crate) static SKU: LazyLock<Selector> =
        LazyLock::new(|| sel("[data-sku-id], .sku.product-data, .sku-value"));

    /// Primary-image markers; the CDN-host alternative is appended at runtime
    /// from the site profile.
    pub(crate) static PRIMARY_IMAGE: LazyLock<Selector> =
        LazyLock::new(|| sel("img.primary-image, img#main-image"));

    pub(crate) static ANY_IMAGE: LazyLock<Selector> = LazyLock::new(|| sel("img[src]"));

    pub(crate) static RATING_VALUE: LazyLock<Selector> =
        LazyLock::new(|| sel(r#"[itemprop="ratingValue"], .c-reviews-v4 .average-rating"#));

    pub(crate) static REVIEW_COUNT: LazyLock<Selector> =
        LazyLock::new(|| sel(r#"[itemprop="reviewCount"], .c-reviews-v4 .count"#));

    pub(crate) static DISPLAYED_PRICE: LazyLock<Selector> = LazyLock::new(|| {
        sel(r#".priceView-hero-price span, .priceView-customer-price span, [itemprop="price"]"#)
    });

    pub(crate) static REGULAR_PRICE: LazyLock<Selector> = LazyLock::new(|| {
        sel(".pricing-price__regular-price, .priceView-hero-price__regular-price")
    });

    pub(crate) static META_DESCRIPTION: LazyLock<Selector> =
        LazyLock::new(|| sel(r#"meta[name="description"]"#));

    pub(crate) static DESCRIPTION_BLOCK: LazyLock<Selector> =
        LazyLock::new(|| sel("div.shop-product-description"));
}

/// Embedded structured-data blocks.
pub(crate) static LD_JSON_SCRIPT: LazyLock<Selector> =
    LazyLock::new(|| sel(r#"script[type="application/ld+json"]"#));
