use serde::{Deserialize, Serialize};

/// Per-site constants injected into extraction and normalization.
///
/// Keeping these out of the algorithms makes the extractor and normalizer
/// testable with synthetic values and portable to sibling storefronts that
/// share the same page structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteProfile {
    /// ISO 4217 currency used when a page doesn't declare one.
    pub currency: String,
    /// Seller name used when offers carry no explicit seller.
    pub default_seller: String,
    /// Host substring identifying the site's product-image CDN.
    pub image_cdn_host: String,
    /// Query parameter carrying the numeric SKU on product-detail URLs.
    pub sku_query_key: String,
}

impl SiteProfile {
    /// Profile for the US Best Buy storefront.
    #[must_use]
    pub fn bestbuy_us() -> Self {
        Self {
            currency: "USD".to_string(),
            default_seller: "Best Buy".to_string(),
            image_cdn_host: "bbystatic.com".to_string(),
            sku_query_key: "skuId".to_string(),
        }
    }
}

impl Default for SiteProfile {
    fn default() -> Self {
        Self::bestbuy_us()
    }
}
