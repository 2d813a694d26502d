//! Data model for player records and the canonical roster.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::names::NameParts;

/// Playing position of a fantasy player.
///
/// The ordering (goalkeeper first, forward last) is the display order of the
/// final report and the constraint order of the selection problem.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

impl Position {
    /// All positions in display/constraint order.
    pub const ALL: [Position; 4] = [
        Position::Goalkeeper,
        Position::Defender,
        Position::Midfielder,
        Position::Forward,
    ];

    /// Short label used in the report table.
    pub fn label(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "Goalkeeper",
            Position::Defender => "Defender",
            Position::Midfielder => "Midfielder",
            Position::Forward => "Forward",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Position {
    type Err = String;

    /// Parses a position from a feed value.
    ///
    /// Accepts the canonical names (case-insensitive) and the numeric codes
    /// 0-3 some feeds use instead.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GOALKEEPER" | "0" => Ok(Position::Goalkeeper),
            "DEFENDER" | "1" => Ok(Position::Defender),
            "MIDFIELDER" | "2" => Ok(Position::Midfielder),
            "FORWARD" | "3" => Ok(Position::Forward),
            other => Err(format!("unknown position: {other}")),
        }
    }
}

/// A (possibly partial) player record from one of the two feeds.
///
/// The valuation feed populates `group`, `external_id` and `market_value`;
/// the fantasy feed populates `position` and `ingame_cost`. A record with
/// all fields populated is canonical (produced by a merge).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Raw display name, the matching key.
    pub name: String,
    /// Grouping attribute (club or national team), used for group quotas.
    pub group: Option<String>,
    /// Identifier of the player on the valuation site.
    pub external_id: Option<u64>,
    /// Real-world market value in euros.
    pub market_value: Option<u64>,
    /// Playing position in the fantasy game.
    pub position: Option<Position>,
    /// In-game cost in euros.
    pub ingame_cost: Option<u64>,
}

impl PlayerRecord {
    /// Creates a record carrying only a name. Useful as a starting point in
    /// tests and feed parsers.
    pub fn named(name: impl Into<String>) -> Self {
        PlayerRecord {
            name: name.into(),
            group: None,
            external_id: None,
            market_value: None,
            position: None,
            ingame_cost: None,
        }
    }

    /// Derives both matching variants of the name components.
    pub fn name_parts(&self) -> NameParts {
        NameParts::of(&self.name)
    }

    /// Whether the record carries everything the selection problem needs.
    /// Entities missing cost or position stay in the roster but get no
    /// decision variable.
    pub fn is_selectable(&self) -> bool {
        self.ingame_cost.is_some() && self.position.is_some()
    }

    /// Field-wise union of two records under the no-overlap invariant.
    ///
    /// `self` is the valuation-side record and its name becomes the
    /// canonical name. For every other field at most one side may carry a
    /// value; both sides being populated means two different people were
    /// matched, which is a hard error for this pair.
    pub fn merged_with(&self, other: &PlayerRecord) -> Result<PlayerRecord, MergeConflict> {
        Ok(PlayerRecord {
            name: self.name.clone(),
            group: merge_field("group", self, other, |r| r.group.clone())?,
            external_id: merge_field("external_id", self, other, |r| r.external_id)?,
            market_value: merge_field("market_value", self, other, |r| r.market_value)?,
            position: merge_field("position", self, other, |r| r.position)?,
            ingame_cost: merge_field("ingame_cost", self, other, |r| r.ingame_cost)?,
        })
    }
}

/// Takes the populated side of one optional field, or reports a conflict
/// when both sides are populated.
fn merge_field<T, F>(
    field: &'static str,
    left: &PlayerRecord,
    right: &PlayerRecord,
    get: F,
) -> Result<Option<T>, MergeConflict>
where
    F: Fn(&PlayerRecord) -> Option<T>,
{
    match (get(left), get(right)) {
        (Some(_), Some(_)) => Err(MergeConflict {
            field,
            left_name: left.name.clone(),
            right_name: right.name.clone(),
        }),
        (Some(v), None) | (None, Some(v)) => Ok(Some(v)),
        (None, None) => Ok(None),
    }
}

/// Two matched records both populate the same field.
///
/// Recovered locally by the merger: the pair is logged and excluded from the
/// roster, the run continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot merge \"{left_name}\" with \"{right_name}\": both sides populate {field}")]
pub struct MergeConflict {
    /// Name of the overlapping field.
    pub field: &'static str,
    /// Display name of the valuation-side record.
    pub left_name: String,
    /// Display name of the fantasy-side record.
    pub right_name: String,
}

/// The reconciled roster: merged records, unique by name, immutable.
///
/// Produced once per run by the merger and consumed once by the model
/// builder.
#[derive(Debug, Clone, Default)]
pub struct CanonicalRoster {
    records: Vec<PlayerRecord>,
}

impl CanonicalRoster {
    /// Builds a roster from merged records. Callers guarantee name
    /// uniqueness; the merger's consume-once pool makes it structural.
    pub(crate) fn from_records(records: Vec<PlayerRecord>) -> Self {
        CanonicalRoster { records }
    }

    pub fn records(&self) -> &[PlayerRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns a new roster without the given names (exact match on the
    /// canonical name). Used for the `--exclude-list` flag.
    pub fn without_names(&self, excluded: &[String]) -> CanonicalRoster {
        let records = self
            .records
            .iter()
            .filter(|r| !excluded.iter().any(|name| name == &r.name))
            .cloned()
            .collect();
        CanonicalRoster { records }
    }
}
