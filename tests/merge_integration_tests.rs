//! Integration tests for cross-feed entity resolution through the public API.

use std::collections::HashMap;

use squad_optimizer::roster::{PlayerRecord, Position, merge_sources};

fn valuation(name: &str, group: &str, market_value: u64) -> PlayerRecord {
    PlayerRecord {
        name: name.to_string(),
        group: Some(group.to_string()),
        external_id: None,
        market_value: Some(market_value),
        position: None,
        ingame_cost: None,
    }
}

fn fantasy(name: &str, position: Position, cost: u64) -> PlayerRecord {
    PlayerRecord {
        name: name.to_string(),
        group: None,
        external_id: None,
        market_value: None,
        position: Some(position),
        ingame_cost: Some(cost),
    }
}

#[test]
fn merges_a_realistic_pair_of_feeds() {
    let valuations = vec![
        valuation("Manuel Neuer", "fc-bayern", 18_000_000),
        valuation("Thomas Müller", "fc-bayern", 30_000_000),
        valuation("Mats Hummels", "bvb", 25_000_000),
        valuation("Marco Reus", "bvb", 45_000_000),
    ];
    let available = vec![
        fantasy("M. Neuer", Position::Goalkeeper, 6_500_000),
        fantasy("Thomas Mueller", Position::Midfielder, 9_000_000), // folded umlaut
        fantasy("M. Hummels", Position::Defender, 7_500_000),
        fantasy("M. Reus", Position::Midfielder, 10_000_000),
    ];

    let outcome = merge_sources(valuations, available, &HashMap::new());

    assert_eq!(outcome.roster.len(), 4);
    assert!(outcome.missing.is_empty());
    assert_eq!(outcome.report.matched, 4);

    // Canonical names come from the valuation feed; merged records carry
    // fields from both sides.
    let mueller = outcome
        .roster
        .records()
        .iter()
        .find(|r| r.name == "Thomas Müller")
        .expect("Müller should be in the roster");
    assert_eq!(mueller.group.as_deref(), Some("fc-bayern"));
    assert_eq!(mueller.market_value, Some(30_000_000));
    assert_eq!(mueller.position, Some(Position::Midfielder));
    assert_eq!(mueller.ingame_cost, Some(9_000_000));
}

#[test]
fn same_family_name_resolved_by_initial_across_clubs() {
    let valuations = vec![
        valuation("Sven Bender", "bvb", 9_000_000),
        valuation("Lars Bender", "leverkusen", 8_000_000),
    ];
    let available = vec![
        fantasy("Sven Bender", Position::Midfielder, 4_000_000),
        fantasy("Lars Bender", Position::Defender, 4_500_000),
    ];

    let outcome = merge_sources(valuations, available, &HashMap::new());

    assert_eq!(outcome.roster.len(), 2);
    let lars = outcome
        .roster
        .records()
        .iter()
        .find(|r| r.name == "Lars Bender")
        .unwrap();
    assert_eq!(lars.group.as_deref(), Some("leverkusen"));
    assert_eq!(lars.position, Some(Position::Defender));
}

#[test]
fn ambiguous_records_are_reported_not_guessed() {
    let valuations = vec![
        valuation("Lars Bender", "leverkusen", 8_000_000),
        valuation("Leon Bender", "schalke", 2_000_000),
    ];
    let available = vec![fantasy("L. Bender", Position::Defender, 4_500_000)];

    let outcome = merge_sources(valuations, available, &HashMap::new());

    assert!(outcome.roster.is_empty());
    assert_eq!(outcome.missing.len(), 1);
    assert_eq!(outcome.missing[0].name, "L. Bender");
    assert_eq!(outcome.report.ambiguous, 1);
}

#[test]
fn override_table_rescues_known_mismatches() {
    let mut overrides = HashMap::new();
    overrides.insert("T. Alcántara".to_string(), "Thiago".to_string());
    overrides.insert("E. Bardi".to_string(), "Enis Bardhi".to_string());

    let valuations = vec![
        valuation("Thiago", "fc-bayern", 40_000_000),
        valuation("Enis Bardhi", "levante", 12_000_000),
    ];
    let available = vec![
        fantasy("T. Alcántara", Position::Midfielder, 8_500_000),
        fantasy("E. Bardi", Position::Midfielder, 5_500_000),
    ];

    let outcome = merge_sources(valuations, available, &overrides);

    assert_eq!(outcome.roster.len(), 2);
    assert!(outcome.missing.is_empty());
    let names: Vec<&str> = outcome
        .roster
        .records()
        .iter()
        .map(|r| r.name.as_str())
        .collect();
    assert!(names.contains(&"Thiago"));
    assert!(names.contains(&"Enis Bardhi"));
}

#[test]
fn partial_feed_coverage_reports_the_difference() {
    // Fantasy feed lists a player the valuation feed has never heard of.
    let valuations = vec![valuation("Manuel Neuer", "fc-bayern", 18_000_000)];
    let available = vec![
        fantasy("M. Neuer", Position::Goalkeeper, 6_500_000),
        fantasy("Total Unknown", Position::Forward, 1_000_000),
    ];

    let outcome = merge_sources(valuations, available, &HashMap::new());

    assert_eq!(outcome.roster.len(), 1);
    assert_eq!(outcome.missing.len(), 1);
    assert_eq!(outcome.missing[0].name, "Total Unknown");
    assert_eq!(outcome.report.matched, 1);
    assert_eq!(outcome.report.unmatched, 1);
}
