//! Category-listing crawler internals: product-link discovery, structured-data
//! extraction, and schema normalization for product detail pages.
//!
//! The pipeline is `discover` → fetch ([`client`]) → [`extract`] → [`normalize`];
//! the CLI crate drives it and owns the output sink.

pub mod client;
pub(crate) mod coerce;
pub mod discover;
pub mod error;
pub mod extract;
pub mod normalize;
mod rate_limit;
mod selectors;
pub mod types;

pub use client::{FetchedPage, PageClient};
pub use discover::LinkDiscoverer;
pub use error::ScraperError;
pub use extract::extract_product;
pub use normalize::normalize_product;
pub use types::{
    AggregateRating, Brand, NormalizedProduct, OfferLine, OfferSummary, RawFieldMap, Seller,
};
