//! Report formatting for the selected squad.
//!
//! Renders the chosen players grouped by position with per-player and
//! aggregate cost/value figures. Monetary columns are displayed in millions
//! of euros; the headline figure is the ratio of total market value to
//! total in-game cost.

use crossterm::style::Stylize;

use crate::roster::{CanonicalRoster, PlayerRecord, Position};
use crate::selection::{Selection, SelectionProblem};

/// One row of the squad table.
#[derive(Debug, Clone, PartialEq)]
pub struct SquadRow {
    pub position: Position,
    pub name: String,
    /// In-game cost in euros.
    pub ingame_cost: u64,
    /// Market value in euros; unknown values count as zero, consistent with
    /// the objective.
    pub market_value: u64,
}

impl SquadRow {
    /// Market value per in-game euro. None when the cost is zero.
    pub fn ratio(&self) -> Option<f64> {
        if self.ingame_cost == 0 {
            None
        } else {
            Some(self.market_value as f64 / self.ingame_cost as f64)
        }
    }
}

/// The rendered outcome of a run: selected players plus totals.
#[derive(Debug, Clone)]
pub struct SquadReport {
    rows: Vec<SquadRow>,
    total_cost: u64,
    total_market_value: u64,
}

impl SquadReport {
    /// Collects the selected entities from the roster, ordered by position
    /// and name.
    pub fn build(
        roster: &CanonicalRoster,
        problem: &SelectionProblem,
        selection: &Selection,
    ) -> Self {
        let mut rows = Vec::new();
        for index in selection.chosen_indices() {
            let name = &problem.candidates[index];
            let Some(record) = find_record(roster, name) else {
                continue;
            };
            let (Some(position), Some(ingame_cost)) = (record.position, record.ingame_cost) else {
                continue;
            };
            rows.push(SquadRow {
                position,
                name: record.name.clone(),
                ingame_cost,
                market_value: record.market_value.unwrap_or(0),
            });
        }
        rows.sort_by(|a, b| (a.position, &a.name).cmp(&(b.position, &b.name)));

        let total_cost = rows.iter().map(|r| r.ingame_cost).sum();
        let total_market_value = rows.iter().map(|r| r.market_value).sum();
        SquadReport {
            rows,
            total_cost,
            total_market_value,
        }
    }

    pub fn rows(&self) -> &[SquadRow] {
        &self.rows
    }

    pub fn total_cost(&self) -> u64 {
        self.total_cost
    }

    pub fn total_market_value(&self) -> u64 {
        self.total_market_value
    }

    /// Total market value per total in-game euro, computed from the
    /// selected entities only. None for an empty or free squad.
    pub fn total_ratio(&self) -> Option<f64> {
        if self.total_cost == 0 {
            None
        } else {
            Some(self.total_market_value as f64 / self.total_cost as f64)
        }
    }

    /// Renders the squad as a bordered plain-text table, totals row last.
    pub fn render(&self) -> String {
        let header = [
            "Position".to_string(),
            "Name".to_string(),
            "Cost [Mio. €]".to_string(),
            "Value [Mio. €]".to_string(),
            "Ratio".to_string(),
        ];

        let mut body: Vec<[String; 5]> = self
            .rows
            .iter()
            .map(|row| {
                [
                    row.position.to_string(),
                    row.name.clone(),
                    format_millions(row.ingame_cost),
                    format_millions(row.market_value),
                    format_ratio(row.ratio()),
                ]
            })
            .collect();
        body.push([
            "-".to_string(),
            "Total".to_string(),
            format_millions(self.total_cost),
            format_millions(self.total_market_value),
            format_ratio(self.total_ratio()),
        ]);

        render_table(&header, &body)
    }

    /// Prints the report to stdout with a styled title.
    pub fn print(&self) {
        println!("{}", "Optimal squad".bold());
        println!("{}", self.render());
    }
}

/// One entry of the top-ratio listing.
#[derive(Debug, Clone, PartialEq)]
pub struct RatioEntry {
    pub ratio: f64,
    pub market_value: u64,
    pub ingame_cost: u64,
    pub position: Position,
    pub name: String,
}

/// The `count` roster entities with the best market/cost ratio.
///
/// Entities without a market value, cost or position are skipped; they have
/// no meaningful ratio.
pub fn top_ratios(roster: &CanonicalRoster, count: usize) -> Vec<RatioEntry> {
    let mut entries: Vec<RatioEntry> = roster
        .records()
        .iter()
        .filter_map(|record| {
            let market_value = record.market_value?;
            let ingame_cost = record.ingame_cost?;
            let position = record.position?;
            if ingame_cost == 0 {
                return None;
            }
            Some(RatioEntry {
                ratio: market_value as f64 / ingame_cost as f64,
                market_value,
                ingame_cost,
                position,
                name: record.name.clone(),
            })
        })
        .collect();

    entries.sort_by(|a, b| {
        b.ratio
            .total_cmp(&a.ratio)
            .then_with(|| a.name.cmp(&b.name))
    });
    entries.truncate(count);
    entries
}

/// Renders the top-ratio listing as a table.
pub fn render_top_ratios(entries: &[RatioEntry]) -> String {
    let header = [
        "Ratio".to_string(),
        "Value [Mio. €]".to_string(),
        "Cost [Mio. €]".to_string(),
        "Position".to_string(),
        "Name".to_string(),
    ];
    let body: Vec<[String; 5]> = entries
        .iter()
        .map(|entry| {
            [
                format!("{:.2}", entry.ratio),
                format_millions(entry.market_value),
                format_millions(entry.ingame_cost),
                entry.position.to_string(),
                entry.name.clone(),
            ]
        })
        .collect();
    render_table(&header, &body)
}

/// Prints the top-ratio listing with a styled title.
pub fn print_top_ratios(roster: &CanonicalRoster, count: usize) {
    println!("{}", "Best value for money".bold());
    println!("{}", render_top_ratios(&top_ratios(roster, count)));
}

fn find_record<'a>(roster: &'a CanonicalRoster, name: &str) -> Option<&'a PlayerRecord> {
    roster.records().iter().find(|r| r.name == name)
}

fn format_millions(euros: u64) -> String {
    format!("{:.2}", euros as f64 / 1_000_000.0)
}

fn format_ratio(ratio: Option<f64>) -> String {
    match ratio {
        Some(value) => format!("{value:.2}"),
        None => "-".to_string(),
    }
}

/// Draws a bordered table. The two leftmost columns are left-aligned, the
/// numeric rest right-aligned.
fn render_table(header: &[String; 5], body: &[[String; 5]]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|cell| cell.chars().count()).collect();
    for row in body {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let separator = {
        let mut line = String::from("+");
        for width in &widths {
            line.push_str(&"-".repeat(width + 2));
            line.push('+');
        }
        line
    };

    let format_row = |cells: &[String]| {
        let mut line = String::from("|");
        for (i, (cell, width)) in cells.iter().zip(&widths).enumerate() {
            let padding = width - cell.chars().count();
            if i < 2 {
                line.push_str(&format!(" {cell}{} |", " ".repeat(padding)));
            } else {
                line.push_str(&format!(" {}{cell} |", " ".repeat(padding)));
            }
        }
        line
    };

    let mut out = String::new();
    out.push_str(&separator);
    out.push('\n');
    out.push_str(&format_row(header));
    out.push('\n');
    out.push_str(&separator);
    out.push('\n');
    for row in body {
        out.push_str(&format_row(row));
        out.push('\n');
    }
    out.push_str(&separator);
    out
}
