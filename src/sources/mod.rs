//! Ingestion of the two player feeds.
//!
//! Each feed body can come from three places, in priority order: a local
//! file given on the command line, the on-disk payload cache (unless
//! `--force`), or an HTTP fetch. The two feeds are independent and are
//! loaded concurrently.

pub mod cache;
pub mod csv;
pub mod fantasy;
pub mod http_client;
pub mod market;

use futures::future;
use reqwest::Client;
use tokio::fs;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::AppError;
use crate::roster::PlayerRecord;

use http_client::{check_status, create_http_client};

/// How the feed bodies should be obtained for this run.
#[derive(Debug, Clone, Default)]
pub struct FeedOptions {
    /// Bypass the payload cache and fetch fresh data.
    pub force_refresh: bool,
    /// Local file to read the valuation feed from instead of fetching.
    pub market_file: Option<String>,
    /// Local file to read the fantasy feed from instead of fetching.
    pub fantasy_file: Option<String>,
}

#[derive(Debug, Clone, Copy)]
enum FeedKind {
    Market,
    Fantasy,
}

impl FeedKind {
    fn name(&self) -> &'static str {
        match self {
            FeedKind::Market => "market",
            FeedKind::Fantasy => "fantasy",
        }
    }
}

/// Fetches a raw feed body over HTTP with typed status handling.
pub async fn fetch_payload(client: &Client, url: &str) -> Result<String, AppError> {
    debug!("Fetching {url}");
    let response = client.get(url).send().await?;
    let response = check_status(response, url).await?;
    Ok(response.text().await?)
}

/// Loads both feeds and parses them into partial player records.
///
/// # Returns
/// `(valuations, available)` - the valuation-feed records and the
/// fantasy-feed records, in feed order.
pub async fn load_player_data(
    config: &Config,
    options: &FeedOptions,
) -> Result<(Vec<PlayerRecord>, Vec<PlayerRecord>), AppError> {
    let client = create_http_client(config.http_timeout_seconds)?;

    let ((market_body, market_label), (fantasy_body, fantasy_label)) = future::try_join(
        feed_body(FeedKind::Market, &client, config, options),
        feed_body(FeedKind::Fantasy, &client, config, options),
    )
    .await?;

    let valuations = market::parse_market_payload(&market_body, &market_label)?;
    let available = fantasy::parse_fantasy_payload(&fantasy_body).map_err(|e| match e {
        AppError::CsvShape { message } => {
            AppError::csv_shape(format!("{message} (source: {fantasy_label})"))
        }
        other => other,
    })?;

    info!(
        "Loaded {} valuation records and {} fantasy records",
        valuations.len(),
        available.len()
    );
    Ok((valuations, available))
}

/// Resolves one feed body: local file, then cache, then HTTP.
/// Returns the body together with a label describing where it came from.
async fn feed_body(
    kind: FeedKind,
    client: &Client,
    config: &Config,
    options: &FeedOptions,
) -> Result<(String, String), AppError> {
    let (file, url) = match kind {
        FeedKind::Market => (&options.market_file, &config.market_url),
        FeedKind::Fantasy => (&options.fantasy_file, &config.fantasy_url),
    };

    if let Some(path) = file {
        info!("Reading {} feed from {path}", kind.name());
        let body = fs::read_to_string(path).await?;
        return Ok((body, path.clone()));
    }

    let Some(url) = url.as_deref() else {
        return Err(AppError::config_error(format!(
            "no {} feed URL configured",
            kind.name()
        )));
    };

    if !options.force_refresh
        && let Some((body, written)) = cache::read_payload(kind.name()).await
    {
        info!("Using {} feed payload cached at {written}", kind.name());
        return Ok((body, url.to_string()));
    }

    let body = fetch_payload(client, url).await?;
    cache::write_payload(kind.name(), &body).await;
    Ok((body, url.to_string()))
}
