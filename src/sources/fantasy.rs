//! Fantasy-cost feed: fetching and parsing.
//!
//! The feed publishes a semicolon-separated CSV with a header naming at
//! least the `name`, `position` and `cost` columns. Cost is the in-game
//! price in euros; position is either the canonical name or a numeric code.

use tracing::warn;

use crate::error::AppError;
use crate::roster::{PlayerRecord, Position};

use super::csv::{column_index, parse_rows};

/// Column separator used by the feed.
const SEPARATOR: char = ';';

/// Parses the feed body into partial player records.
///
/// A missing required column is a hard error; an individual row that fails
/// to parse is skipped with a warning, matching how sparse and noisy these
/// feeds are in practice.
pub fn parse_fantasy_payload(body: &str) -> Result<Vec<PlayerRecord>, AppError> {
    let mut rows = parse_rows(body, SEPARATOR);
    if rows.is_empty() {
        return Err(AppError::csv_shape("feed is empty"));
    }
    let header = rows.remove(0);
    let name_col = column_index(&header, "name")?;
    let position_col = column_index(&header, "position")?;
    let cost_col = column_index(&header, "cost")?;
    let width = name_col.max(position_col).max(cost_col);

    let mut records = Vec::with_capacity(rows.len());
    for (line, row) in rows.iter().enumerate() {
        if row.len() <= width {
            warn!("Skipping short row {}: {row:?}", line + 2);
            continue;
        }

        let name = row[name_col].trim();
        if name.is_empty() {
            warn!("Skipping row {} without a name", line + 2);
            continue;
        }

        let position = match row[position_col].parse::<Position>() {
            Ok(position) => position,
            Err(reason) => {
                warn!("Skipping \"{name}\": {reason}");
                continue;
            }
        };

        let cost = match row[cost_col].trim().parse::<u64>() {
            Ok(cost) => cost,
            Err(_) => {
                warn!(
                    "Skipping \"{name}\": invalid cost \"{}\"",
                    row[cost_col]
                );
                continue;
            }
        };

        records.push(PlayerRecord {
            name: name.to_string(),
            group: None,
            external_id: None,
            market_value: None,
            position: Some(position),
            ingame_cost: Some(cost),
        });
    }
    Ok(records)
}
