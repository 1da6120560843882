use std::path::PathBuf;

/// Process-wide configuration resolved from the environment.
///
/// The listing URL is the only required input for a crawl. It is optional
/// here because the CLI may supply it as a flag instead; resolution (and the
/// fatal-if-missing decision) happens at the binary boundary.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Category listing URL to crawl, if set via `BBYSCRAPE_LISTING_URL`.
    pub listing_url: Option<String>,
    /// Destination for the normalized JSONL records.
    pub output_path: PathBuf,
    /// Stop after this many product pages, if set.
    pub max_items: Option<usize>,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Additional attempts after the first failure for retriable errors.
    pub max_retries: u32,
    /// Base delay for exponential backoff: `base * 2^attempt` seconds.
    pub retry_backoff_base_secs: u64,
    /// Delay between product-page requests.
    pub inter_request_delay_ms: u64,
}
