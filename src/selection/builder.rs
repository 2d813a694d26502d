//! Squad model builder: canonical roster + rules in, selection problem out.
//!
//! Construction is deterministic end to end - candidates in stable name
//! order, constraints in a fixed order (budget, positions, total size,
//! groups) - so identical inputs produce bit-identical problems.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::roster::{CanonicalRoster, PlayerRecord, Position};

use super::problem::{Bounds, LinearConstraint, SelectionProblem};

/// Inclusive per-group selection window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupLimit {
    pub min: u32,
    pub max: u32,
}

/// The quota configuration the selection problem is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct SquadRules {
    /// Total number of players to select. Must equal the quota sum.
    pub squad_size: u32,
    /// Upper bound on total in-game cost, in euros.
    pub budget_cap: f64,
    /// Exact required count per position.
    pub position_quotas: BTreeMap<Position, u32>,
    /// Explicit per-group windows, keyed by group value.
    pub group_quotas: BTreeMap<String, GroupLimit>,
    /// Window applied to observed groups not listed in `group_quotas`.
    /// None means unconstrained, i.e. (0, squad_size).
    pub default_group_limit: Option<GroupLimit>,
}

impl SquadRules {
    /// Checks internal consistency. Every violation is a configuration
    /// error raised before any decision variable exists; nothing is ever
    /// silently clamped.
    pub fn validate(&self) -> Result<(), AppError> {
        let quota_sum: u32 = self.position_quotas.values().sum();
        if quota_sum != self.squad_size {
            return Err(AppError::config_error(format!(
                "position quotas sum to {quota_sum} but squad size is {}",
                self.squad_size
            )));
        }

        if !self.budget_cap.is_finite() || self.budget_cap < 0.0 {
            return Err(AppError::config_error(format!(
                "budget cap must be non-negative, got {}",
                self.budget_cap
            )));
        }

        for (group, limit) in &self.group_quotas {
            if limit.min > limit.max {
                return Err(AppError::config_error(format!(
                    "group \"{group}\": min {} exceeds max {}",
                    limit.min, limit.max
                )));
            }
        }
        if let Some(limit) = self.default_group_limit
            && limit.min > limit.max
        {
            return Err(AppError::config_error(format!(
                "default group limit: min {} exceeds max {}",
                limit.min, limit.max
            )));
        }

        Ok(())
    }

    /// The window for one group value: explicit entry, then the default
    /// limit, then fully open (0, squad_size).
    fn limit_for(&self, group: &str) -> GroupLimit {
        if let Some(limit) = self.group_quotas.get(group) {
            return *limit;
        }
        self.default_group_limit.unwrap_or(GroupLimit {
            min: 0,
            max: self.squad_size,
        })
    }
}

/// Builds the selection problem for a roster under the given rules.
///
/// One binary decision variable per roster entity that carries both an
/// in-game cost and a position; entities missing either are left out of the
/// problem (but stay in the roster). Unknown market value contributes zero
/// to the objective without making the entity ineligible.
///
/// Constraint order: budget cap, one equality per quota'd position in
/// position order, the total-size equality, one range per observed group in
/// lexicographic order.
pub fn build_selection_problem(
    roster: &CanonicalRoster,
    rules: &SquadRules,
) -> Result<SelectionProblem, AppError> {
    rules.validate()?;

    let mut eligible: Vec<&PlayerRecord> =
        roster.records().iter().filter(|r| r.is_selectable()).collect();
    eligible.sort_by(|a, b| a.name.cmp(&b.name));

    let candidates: Vec<String> = eligible.iter().map(|r| r.name.clone()).collect();
    let objective: Vec<f64> = eligible
        .iter()
        .map(|r| r.market_value.unwrap_or(0) as f64)
        .collect();

    let mut constraints = Vec::new();

    constraints.push(LinearConstraint {
        label: "total_cost".to_string(),
        coefficients: eligible
            .iter()
            .map(|r| r.ingame_cost.unwrap_or(0) as f64)
            .collect(),
        bounds: Bounds::AtMost(rules.budget_cap),
    });

    for position in Position::ALL {
        let Some(&count) = rules.position_quotas.get(&position) else {
            continue;
        };
        constraints.push(LinearConstraint {
            label: format!("position_{position}").to_lowercase(),
            coefficients: eligible
                .iter()
                .map(|r| indicator(r.position == Some(position)))
                .collect(),
            bounds: Bounds::Equal(count as f64),
        });
    }

    constraints.push(LinearConstraint {
        label: "squad_size".to_string(),
        coefficients: vec![1.0; eligible.len()],
        bounds: Bounds::Equal(rules.squad_size as f64),
    });

    for group in observed_groups(&eligible) {
        let limit = rules.limit_for(&group);
        constraints.push(LinearConstraint {
            label: format!("group_{group}"),
            coefficients: eligible
                .iter()
                .map(|r| indicator(r.group.as_deref() == Some(group.as_str())))
                .collect(),
            bounds: Bounds::Range(limit.min as f64, limit.max as f64),
        });
    }

    Ok(SelectionProblem {
        candidates,
        objective,
        constraints,
    })
}

fn indicator(condition: bool) -> f64 {
    if condition { 1.0 } else { 0.0 }
}

/// Distinct group values of the eligible entities, sorted.
fn observed_groups(eligible: &[&PlayerRecord]) -> Vec<String> {
    let mut groups: Vec<String> = eligible
        .iter()
        .filter_map(|r| r.group.clone())
        .collect();
    groups.sort();
    groups.dedup();
    groups
}
