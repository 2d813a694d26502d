//! Cross-feed entity resolution.
//!
//! Matches each record of the fantasy feed (the smaller, "available" set)
//! against the valuation feed by family name, resolves ambiguity via the
//! first-name initial, and merges matched pairs field-wise. Valuation
//! records are consumed at most once: the candidate pool shrinks as matches
//! land, so one valuation record can never silently merge into two fantasy
//! records.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use super::models::{CanonicalRoster, PlayerRecord};
use super::names::NameParts;

/// Counters describing one merge run. Diagnostic only, never control flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Pairs merged into the roster.
    pub matched: usize,
    /// Fantasy records with multiple candidates left after disambiguation.
    pub ambiguous: usize,
    /// Fantasy records with no candidate at all.
    pub unmatched: usize,
    /// Pairs dropped because both sides populated the same field.
    pub conflicts: usize,
}

/// Everything one merge run produces.
#[derive(Debug)]
pub struct MergeOutcome {
    /// Deduplicated, conflict-checked canonical entities.
    pub roster: CanonicalRoster,
    /// Fantasy records that found no unambiguous match. Reported, never
    /// fed to the optimizer.
    pub missing: Vec<PlayerRecord>,
    pub report: MergeReport,
}

/// The shrinking pool of valuation records still available for matching.
struct MatchPool {
    records: Vec<PlayerRecord>,
    parts: Vec<NameParts>,
    live: Vec<bool>,
}

impl MatchPool {
    fn new(records: Vec<PlayerRecord>) -> Self {
        let parts = records.iter().map(|r| r.name_parts()).collect();
        let live = vec![true; records.len()];
        MatchPool {
            records,
            parts,
            live,
        }
    }

    /// Indices of live records whose family name equals `family`.
    /// `folded` selects which variant of the pool records to compare.
    fn by_family(&self, family: &str, folded: bool) -> Vec<usize> {
        self.parts
            .iter()
            .enumerate()
            .filter(|(i, parts)| {
                let pool_family = if folded {
                    &parts.family_folded
                } else {
                    &parts.family
                };
                self.live[*i] && pool_family == family
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// Index of the live record with exactly this raw display name.
    fn by_raw_name(&self, raw_name: &str) -> Option<usize> {
        self.records
            .iter()
            .enumerate()
            .find(|(i, r)| self.live[*i] && r.name == raw_name)
            .map(|(i, _)| i)
    }

    /// Consumes a record: it no longer participates in later matches.
    fn take(&mut self, index: usize) -> &PlayerRecord {
        self.live[index] = false;
        &self.records[index]
    }

    fn get(&self, index: usize) -> &PlayerRecord {
        &self.records[index]
    }
}

/// Merges the two feeds into a canonical roster.
///
/// For each record of `available` (the fantasy feed), candidates from
/// `valuations` are collected by exact family-name match, then by folded
/// family-name match if that found nothing. An entry in `overrides` mapping
/// the fantasy display name to a valuation display name takes precedence
/// over both and short-circuits ambiguity when it resolves to a live pool
/// record. Multiple candidates are narrowed by the first-name initial in
/// either form; anything still ambiguous is reported missing rather than
/// guessed.
///
/// # Arguments
/// * `valuations` - records from the market-valuation feed
/// * `available` - records from the fantasy-cost feed
/// * `overrides` - raw fantasy name → raw valuation name, for known
///   normalization failures
pub fn merge_sources(
    valuations: Vec<PlayerRecord>,
    available: Vec<PlayerRecord>,
    overrides: &HashMap<String, String>,
) -> MergeOutcome {
    let mut pool = MatchPool::new(valuations);
    let mut merged = Vec::new();
    let mut missing = Vec::new();
    let mut report = MergeReport::default();

    for record in available {
        debug!("Looking up \"{}\"", record.name);
        let target = record.name_parts();

        let mut candidates = pool.by_family(&target.family, false);
        if candidates.is_empty() {
            candidates = pool.by_family(&target.family_folded, true);
            if !candidates.is_empty() {
                debug!("Found via folded family name");
            }
        }

        // Known normalization failures map straight to a valuation name and
        // win over whatever the family lookup produced.
        if let Some(canonical_name) = overrides.get(&record.name)
            && let Some(index) = pool.by_raw_name(canonical_name)
        {
            debug!("Override maps \"{}\" to \"{canonical_name}\"", record.name);
            candidates = vec![index];
        }

        let resolved = match candidates.len() {
            0 => {
                debug!("No candidate for \"{}\"", record.name);
                report.unmatched += 1;
                None
            }
            1 => Some(candidates[0]),
            _ => {
                debug!(
                    "{} family-name candidates for \"{}\", disambiguating by initial",
                    candidates.len(),
                    record.name
                );
                match disambiguate_by_initial(&pool, &candidates, &target) {
                    Some(index) => Some(index),
                    None => {
                        debug!("Still ambiguous, skipping \"{}\"", record.name);
                        report.ambiguous += 1;
                        None
                    }
                }
            }
        };

        let Some(index) = resolved else {
            missing.push(record);
            continue;
        };

        // The pool record is spent either way: a conflicting pair must not
        // come back as a candidate for later records.
        match pool.get(index).merged_with(&record) {
            Ok(canonical) => {
                pool.take(index);
                report.matched += 1;
                merged.push(canonical);
            }
            Err(conflict) => {
                pool.take(index);
                report.conflicts += 1;
                warn!("Dropping conflicting pair: {conflict}");
            }
        }
    }

    info!(
        matched = report.matched,
        ambiguous = report.ambiguous,
        unmatched = report.unmatched,
        conflicts = report.conflicts,
        "Merge complete"
    );
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|r| r.name.as_str()).collect();
        info!(
            "Missing players ({}): {names:?}. Possible reasons: duplicated name, injury or dismissal.",
            missing.len()
        );
    }

    MergeOutcome {
        roster: CanonicalRoster::from_records(merged),
        missing,
        report,
    }
}

/// Keeps candidates whose first-name initial matches the target's, in
/// either the accented or the folded form. Returns the surviving index only
/// when exactly one remains; zero or several is a refusal to guess.
fn disambiguate_by_initial(pool: &MatchPool, candidates: &[usize], target: &NameParts) -> Option<usize> {
    let (Some(target_initial), Some(target_initial_folded)) =
        (target.initial(), target.initial_folded())
    else {
        // A single-word fantasy name offers nothing to disambiguate with.
        return None;
    };

    let refined: Vec<usize> = candidates
        .iter()
        .copied()
        .filter(|&i| {
            let parts = &pool.parts[i];
            parts.initial() == Some(target_initial)
                || parts.initial_folded() == Some(target_initial_folded)
        })
        .collect();

    match refined.as_slice() {
        [single] => Some(*single),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::models::Position;

    fn valuation(name: &str, market_value: u64) -> PlayerRecord {
        PlayerRecord {
            name: name.to_string(),
            group: Some("fc-example".to_string()),
            external_id: None,
            market_value: Some(market_value),
            position: None,
            ingame_cost: None,
        }
    }

    fn fantasy(name: &str) -> PlayerRecord {
        PlayerRecord {
            name: name.to_string(),
            group: None,
            external_id: None,
            market_value: None,
            position: Some(Position::Midfielder),
            ingame_cost: Some(4_000_000),
        }
    }

    fn no_overrides() -> HashMap<String, String> {
        HashMap::new()
    }

    #[test]
    fn test_unique_family_match_merges() {
        let outcome = merge_sources(
            vec![valuation("Thomas Müller", 30_000_000)],
            vec![fantasy("T. Müller")],
            &no_overrides(),
        );

        assert_eq!(outcome.roster.len(), 1);
        assert!(outcome.missing.is_empty());
        let merged = &outcome.roster.records()[0];
        assert_eq!(merged.name, "Thomas Müller");
        assert_eq!(merged.market_value, Some(30_000_000));
        assert_eq!(merged.ingame_cost, Some(4_000_000));
        assert_eq!(
            outcome.report,
            MergeReport {
                matched: 1,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_folded_family_match() {
        // Valuation feed spells the umlaut, fantasy feed transliterates it.
        let outcome = merge_sources(
            vec![valuation("Thomas Müller", 30_000_000)],
            vec![fantasy("Thomas Mueller")],
            &no_overrides(),
        );

        assert_eq!(outcome.roster.len(), 1);
        assert!(outcome.missing.is_empty());
    }

    #[test]
    fn test_no_candidate_goes_missing() {
        let outcome = merge_sources(
            vec![valuation("Manuel Neuer", 5_000_000)],
            vec![fantasy("Erling Haaland")],
            &no_overrides(),
        );

        assert!(outcome.roster.is_empty());
        assert_eq!(outcome.missing.len(), 1);
        assert_eq!(outcome.missing[0].name, "Erling Haaland");
        assert_eq!(outcome.report.unmatched, 1);
    }

    #[test]
    fn test_initial_disambiguation_selects_unique() {
        let outcome = merge_sources(
            vec![
                valuation("Sven Bender", 9_000_000),
                valuation("Lars Bender", 8_000_000),
            ],
            vec![fantasy("L. Bender")],
            &no_overrides(),
        );

        assert_eq!(outcome.roster.len(), 1);
        assert_eq!(outcome.roster.records()[0].name, "Lars Bender");
        assert!(outcome.missing.is_empty());
    }

    #[test]
    fn test_initial_matching_both_is_ambiguous() {
        let outcome = merge_sources(
            vec![
                valuation("Lars Bender", 9_000_000),
                valuation("Leon Bender", 8_000_000),
            ],
            vec![fantasy("L. Bender")],
            &no_overrides(),
        );

        assert!(outcome.roster.is_empty());
        assert_eq!(outcome.missing.len(), 1);
        assert_eq!(outcome.report.ambiguous, 1);
    }

    #[test]
    fn test_initial_matching_neither_is_ambiguous() {
        let outcome = merge_sources(
            vec![
                valuation("Sven Bender", 9_000_000),
                valuation("Lars Bender", 8_000_000),
            ],
            vec![fantasy("K. Bender")],
            &no_overrides(),
        );

        assert!(outcome.roster.is_empty());
        assert_eq!(outcome.report.ambiguous, 1);
    }

    #[test]
    fn test_folded_initial_disambiguates() {
        let outcome = merge_sources(
            vec![
                valuation("Ömer Toprak", 9_000_000),
                valuation("Harun Toprak", 2_000_000),
            ],
            vec![fantasy("Oemer Toprak")],
            &no_overrides(),
        );

        assert_eq!(outcome.roster.len(), 1);
        assert_eq!(outcome.roster.records()[0].name, "Ömer Toprak");
    }

    #[test]
    fn test_override_resolves_unmatched_name() {
        let mut overrides = HashMap::new();
        overrides.insert(
            "T. Alcántara".to_string(),
            "Thiago".to_string(),
        );

        let outcome = merge_sources(
            vec![valuation("Thiago", 40_000_000)],
            vec![fantasy("T. Alcántara")],
            &overrides,
        );

        assert_eq!(outcome.roster.len(), 1);
        assert_eq!(outcome.roster.records()[0].name, "Thiago");
    }

    #[test]
    fn test_override_short_circuits_ambiguity() {
        let mut overrides = HashMap::new();
        overrides.insert("L. Bender".to_string(), "Lars Bender".to_string());

        let outcome = merge_sources(
            vec![
                valuation("Lars Bender", 9_000_000),
                valuation("Leon Bender", 8_000_000),
            ],
            vec![fantasy("L. Bender")],
            &overrides,
        );

        assert_eq!(outcome.roster.len(), 1);
        assert_eq!(outcome.roster.records()[0].name, "Lars Bender");
        assert_eq!(outcome.report.ambiguous, 0);
    }

    #[test]
    fn test_matched_record_is_consumed_once() {
        // Two fantasy records share a family name with one valuation record.
        // The second lookup must not reuse the spent record.
        let outcome = merge_sources(
            vec![valuation("Thomas Müller", 30_000_000)],
            vec![fantasy("Thomas Müller"), fantasy("Tim Müller")],
            &no_overrides(),
        );

        assert_eq!(outcome.roster.len(), 1);
        assert_eq!(outcome.missing.len(), 1);
        assert_eq!(outcome.missing[0].name, "Tim Müller");
        assert_eq!(outcome.report.matched, 1);
        assert_eq!(outcome.report.unmatched, 1);
    }

    #[test]
    fn test_conflicting_pair_excluded_run_continues() {
        let mut conflicting = valuation("Thomas Müller", 30_000_000);
        conflicting.ingame_cost = Some(1); // overlaps with the fantasy side

        let outcome = merge_sources(
            vec![conflicting, valuation("Manuel Neuer", 18_000_000)],
            vec![fantasy("Thomas Müller"), fantasy("Manuel Neuer")],
            &no_overrides(),
        );

        // The conflicting pair is gone entirely, the clean pair merged.
        assert_eq!(outcome.roster.len(), 1);
        assert_eq!(outcome.roster.records()[0].name, "Manuel Neuer");
        assert_eq!(outcome.report.conflicts, 1);
        assert_eq!(outcome.report.matched, 1);
        // Conflicting records are not "missing" - they matched, then failed.
        assert!(outcome.missing.is_empty());
    }

    #[test]
    fn test_single_word_target_cannot_disambiguate() {
        let outcome = merge_sources(
            vec![
                valuation("Sven Bender", 9_000_000),
                valuation("Lars Bender", 8_000_000),
            ],
            vec![fantasy("Bender")],
            &no_overrides(),
        );

        assert!(outcome.roster.is_empty());
        assert_eq!(outcome.report.ambiguous, 1);
    }
}
