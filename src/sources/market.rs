//! Market-valuation feed: fetching and parsing.
//!
//! The feed is a JSON array of player entries carrying the real-world
//! market value and the club, which doubles as the grouping attribute for
//! the per-group quota constraints.

use serde::Deserialize;
use tracing::warn;

use crate::error::AppError;
use crate::roster::PlayerRecord;

/// One entry of the valuation feed.
#[derive(Debug, Deserialize)]
struct MarketEntry {
    name: String,
    #[serde(default)]
    club: Option<String>,
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    market_value: Option<u64>,
}

/// Parses the feed body into partial player records.
///
/// Entries without a name are skipped with a warning; a missing market
/// value is kept as unknown (the entity can still be selected, it just
/// contributes nothing to the objective).
pub fn parse_market_payload(body: &str, url: &str) -> Result<Vec<PlayerRecord>, AppError> {
    let entries: Vec<MarketEntry> = serde_json::from_str(body).map_err(|e| {
        AppError::feed_unexpected_structure(format!("expected a JSON array of players: {e}"), url)
    })?;

    let mut records = Vec::with_capacity(entries.len());
    for entry in entries {
        let name = entry.name.trim();
        if name.is_empty() {
            warn!("Skipping valuation entry without a name");
            continue;
        }
        records.push(PlayerRecord {
            name: name.to_string(),
            group: entry.club,
            external_id: entry.id,
            market_value: entry.market_value,
            position: None,
            ingame_cost: None,
        });
    }
    Ok(records)
}
