mod crawl;
mod sink;

use std::path::PathBuf;

use clap::Parser;

/// Exit status for unusable configuration, distinct from the generic
/// failure status runtime errors produce.
const EXIT_CONFIG: i32 = 2;

#[derive(Debug, Parser)]
#[command(name = "bbyscrape")]
#[command(about = "Category listing scraper producing normalized product JSONL")]
struct Cli {
    /// Category listing URL to crawl (falls back to BBYSCRAPE_LISTING_URL)
    #[arg(long)]
    listing_url: Option<String>,

    /// Output JSONL path (overrides BBYSCRAPE_OUTPUT_PATH)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Stop after this many products
    #[arg(long)]
    max: Option<usize>,

    /// Delay between page requests, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Enable debug logs
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = bbyscrape_core::load_app_config()?;
    if let Some(output) = cli.output {
        config.output_path = output;
    }
    if let Some(max) = cli.max {
        config.max_items = Some(max);
    }
    if let Some(delay_ms) = cli.delay_ms {
        config.inter_request_delay_ms = delay_ms;
    }

    let default_filter = if cli.verbose {
        "debug".to_string()
    } else {
        config.log_level.clone()
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();

    let Some(listing_url) = cli.listing_url.or_else(|| config.listing_url.clone()) else {
        tracing::error!("listing URL missing: pass --listing-url or set BBYSCRAPE_LISTING_URL");
        std::process::exit(EXIT_CONFIG);
    };

    let site = bbyscrape_core::SiteProfile::default();
    let totals = crawl::run(&config, &site, &listing_url).await?;

    println!(
        "Done: {} products written to {} ({} skipped).",
        totals.written,
        config.output_path.display(),
        totals.skipped
    );
    Ok(())
}
