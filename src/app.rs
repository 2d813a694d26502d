//! Pipeline orchestration: ingest both feeds, merge, build the selection
//! problem, solve, and render the report.

use std::time::Duration;

use tokio::fs;
use tracing::{info, warn};

use crate::cli::Args;
use crate::config::Config;
use crate::constants;
use crate::error::AppError;
use crate::report::{self, SquadReport};
use crate::roster;
use crate::selection::{BranchBoundSolver, SolveOutcome, SquadSolver, build_selection_problem};
use crate::sources::{self, FeedOptions};

/// Runs one full optimization pass.
///
/// The steps mirror the data flow: feeds → merger → canonical roster →
/// model builder → solver → report. Merge-level problems are recovered
/// locally inside the merger; configuration problems abort before solving;
/// solver outcomes are reported, never raised.
pub async fn run(args: &Args, config: Config) -> Result<(), AppError> {
    let options = FeedOptions {
        force_refresh: args.force,
        market_file: args.market_file.clone(),
        fantasy_file: args.fantasy_file.clone(),
    };
    let (valuations, available) = sources::load_player_data(&config, &options).await?;

    let merge = roster::merge_sources(valuations, available, &config.name_overrides);
    let mut roster = merge.roster;
    info!(
        "Roster has {} canonical players ({} fantasy records unmatched)",
        roster.len(),
        merge.missing.len()
    );

    if let Some(path) = &args.exclude_list {
        let excluded = read_exclude_list(path).await?;
        let before = roster.len();
        roster = roster.without_names(&excluded);
        info!(
            "Excluded {} of {before} players via {path}",
            before - roster.len()
        );
    }

    if args.show_top_ratios {
        report::print_top_ratios(&roster, constants::TOP_RATIO_COUNT);
        println!();
    }

    let rules = config.squad.to_rules();
    let problem = build_selection_problem(&roster, &rules)?;
    info!(
        "Built selection problem: {} candidates, {} constraints",
        problem.num_candidates(),
        problem.constraints.len()
    );

    let timeout = Duration::from_secs(config.solver_timeout_seconds);
    let solver_problem = problem.clone();
    let outcome =
        tokio::task::spawn_blocking(move || BranchBoundSolver.solve(&solver_problem, timeout))
            .await
            .map_err(|e| AppError::Solver(format!("solver task failed: {e}")))?;

    match outcome {
        SolveOutcome::Optimal(selection) => {
            info!(
                "Optimal squad found: {} players, objective {:.0}",
                selection.chosen_count(),
                selection.objective
            );
            SquadReport::build(&roster, &problem, &selection).print();
        }
        SolveOutcome::Infeasible => {
            warn!("Selection problem is infeasible");
            println!("No feasible squad exists under the configured rules.");
            println!("Consider raising the budget cap or relaxing the quotas.");
        }
        SolveOutcome::TimedOut => {
            warn!(
                "Solver hit the {}s timeout before proving optimality",
                config.solver_timeout_seconds
            );
            println!(
                "The solver did not finish within {}s. This is not proof that no squad exists.",
                config.solver_timeout_seconds
            );
            println!("Consider raising solver_timeout_seconds in the configuration.");
        }
    }

    Ok(())
}

/// Reads an exclude-list file: one canonical player name per line, blank
/// lines ignored.
async fn read_exclude_list(path: &str) -> Result<Vec<String>, AppError> {
    let content = fs::read_to_string(path).await?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_read_exclude_list_trims_and_skips_blanks() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Thomas Müller\n\n  Manuel Neuer  \n").unwrap();

        let names = read_exclude_list(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(names, vec!["Thomas Müller", "Manuel Neuer"]);
    }

    #[tokio::test]
    async fn test_read_exclude_list_missing_file() {
        let result = read_exclude_list("/no/such/file").await;
        assert!(matches!(result, Err(AppError::Io(_))));
    }
}
