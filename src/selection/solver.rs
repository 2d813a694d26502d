//! Solver adapter and the default exact solver.
//!
//! The pipeline only depends on the `SquadSolver` trait; the shipped
//! implementation is a depth-first branch-and-bound over the binary
//! variables. Any correct 0/1 solver honoring the constraint semantics can
//! be swapped in without touching the merger or the builder.

use std::time::{Duration, Instant};

use super::problem::{EPS, Selection, SelectionProblem};

/// Result of one solver invocation. Infeasibility and timeout are normal,
/// reportable outcomes - never errors, so callers can branch on the exact
/// cause.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
    /// A provably optimal assignment.
    Optimal(Selection),
    /// No assignment satisfies every constraint.
    Infeasible,
    /// The deadline expired before optimality was proven.
    TimedOut,
}

impl SolveOutcome {
    pub fn is_optimal(&self) -> bool {
        matches!(self, SolveOutcome::Optimal(_))
    }
}

/// The narrow contract between the pipeline and any solver implementation.
pub trait SquadSolver {
    /// Solves the problem within the given wall-clock budget.
    fn solve(&self, problem: &SelectionProblem, timeout: Duration) -> SolveOutcome;
}

/// Exact depth-first branch-and-bound solver.
///
/// Variables are explored in descending objective order. Each node is
/// pruned against the admissible interval of every constraint (reachable
/// minimum/maximum of the left-hand side) and against an objective upper
/// bound derived from the remaining pick budget of the total-size row.
#[derive(Debug, Clone, Copy, Default)]
pub struct BranchBoundSolver;

impl SquadSolver for BranchBoundSolver {
    fn solve(&self, problem: &SelectionProblem, timeout: Duration) -> SolveOutcome {
        let mut search = Search::new(problem, timeout);
        search.run(0);

        if search.timed_out {
            return SolveOutcome::TimedOut;
        }
        match search.best {
            Some((objective, assignment)) => {
                // Map the assignment back from search order to candidate order.
                let mut values = vec![false; problem.num_candidates()];
                for (pos, &original) in search.order.iter().enumerate() {
                    values[original] = assignment[pos];
                }
                SolveOutcome::Optimal(Selection { values, objective })
            }
            None => SolveOutcome::Infeasible,
        }
    }
}

/// Per-constraint search state: reordered coefficients, admissible interval
/// and reachability suffixes.
struct ConstraintState {
    coefficients: Vec<f64>,
    lo: f64,
    hi: f64,
    /// Left-hand side contributed by decided variables.
    partial: f64,
    /// suffix_max[d]: largest additional contribution variables d.. can make.
    suffix_max: Vec<f64>,
    /// suffix_min[d]: smallest additional contribution variables d.. can make.
    suffix_min: Vec<f64>,
}

struct Search {
    /// Search position → original candidate index, objective-descending.
    order: Vec<usize>,
    /// Prefix sums of the reordered objective, for the upper bound.
    objective_prefix: Vec<f64>,
    /// First search position with a non-positive objective coefficient.
    first_nonpositive: usize,
    constraints: Vec<ConstraintState>,
    /// Position of the all-ones equality row (total squad size), if any.
    size_row: Option<usize>,
    current: Vec<bool>,
    current_objective: f64,
    best: Option<(f64, Vec<bool>)>,
    deadline: Instant,
    nodes: u64,
    timed_out: bool,
}

/// How often (in nodes) the deadline is polled.
const DEADLINE_CHECK_MASK: u64 = 1023;

impl Search {
    fn new(problem: &SelectionProblem, timeout: Duration) -> Self {
        let n = problem.num_candidates();

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| problem.objective[b].total_cmp(&problem.objective[a]));

        let reordered_objective: Vec<f64> =
            order.iter().map(|&i| problem.objective[i]).collect();
        let mut objective_prefix = vec![0.0; n + 1];
        for (i, value) in reordered_objective.iter().enumerate() {
            objective_prefix[i + 1] = objective_prefix[i] + value;
        }
        let first_nonpositive = reordered_objective
            .iter()
            .position(|&v| v <= 0.0)
            .unwrap_or(n);

        let constraints: Vec<ConstraintState> = problem
            .constraints
            .iter()
            .map(|c| {
                let coefficients: Vec<f64> = order.iter().map(|&i| c.coefficients[i]).collect();
                let mut suffix_max = vec![0.0; n + 1];
                let mut suffix_min = vec![0.0; n + 1];
                for d in (0..n).rev() {
                    suffix_max[d] = suffix_max[d + 1] + coefficients[d].max(0.0);
                    suffix_min[d] = suffix_min[d + 1] + coefficients[d].min(0.0);
                }
                let (lo, hi) = c.bounds.interval();
                ConstraintState {
                    coefficients,
                    lo,
                    hi,
                    partial: 0.0,
                    suffix_max,
                    suffix_min,
                }
            })
            .collect();

        let size_row = problem.constraints.iter().position(|c| {
            c.coefficients.iter().all(|&v| v == 1.0) && {
                let (lo, hi) = c.bounds.interval();
                lo == hi
            }
        });

        Search {
            order,
            objective_prefix,
            first_nonpositive,
            constraints,
            size_row,
            current: vec![false; n],
            current_objective: 0.0,
            best: None,
            deadline: Instant::now() + timeout,
            nodes: 0,
            timed_out: false,
        }
    }

    fn run(&mut self, depth: usize) {
        if self.timed_out {
            return;
        }
        self.nodes += 1;
        if self.nodes & DEADLINE_CHECK_MASK == 1 && Instant::now() >= self.deadline {
            self.timed_out = true;
            return;
        }

        // Interval pruning: every constraint must still be able to reach its
        // admissible interval with the undecided variables.
        for state in &self.constraints {
            let reachable_min = state.partial + state.suffix_min[depth];
            let reachable_max = state.partial + state.suffix_max[depth];
            if reachable_min > state.hi + EPS || reachable_max < state.lo - EPS {
                return;
            }
        }

        let n = self.order.len();
        if depth == n {
            // The interval checks above degenerate to exact feasibility here.
            let improves = match &self.best {
                Some((best_objective, _)) => self.current_objective > *best_objective,
                None => true,
            };
            if improves {
                self.best = Some((self.current_objective, self.current.clone()));
            }
            return;
        }

        if let Some((best_objective, _)) = &self.best
            && self.upper_bound(depth) <= *best_objective + EPS
        {
            return;
        }

        // Include-first: with objective-descending order this finds strong
        // incumbents early, which tightens all later bound pruning.
        self.current[depth] = true;
        self.current_objective += self.objective_prefix[depth + 1] - self.objective_prefix[depth];
        for state in &mut self.constraints {
            state.partial += state.coefficients[depth];
        }
        self.run(depth + 1);
        for state in &mut self.constraints {
            state.partial -= state.coefficients[depth];
        }
        self.current_objective -= self.objective_prefix[depth + 1] - self.objective_prefix[depth];
        self.current[depth] = false;

        self.run(depth + 1);
    }

    /// Optimistic objective for the subtree at `depth`: the value collected
    /// so far plus the best positive coefficients still selectable within
    /// the remaining pick budget.
    fn upper_bound(&self, depth: usize) -> f64 {
        let n = self.order.len();
        let remaining_picks = match self.size_row {
            Some(row) => {
                let state = &self.constraints[row];
                // Coefficients are all ones, so the partial is the count of
                // chosen variables; the interval check already ruled out
                // negative remainders.
                (state.hi - state.partial).max(0.0) as usize
            }
            None => n - depth,
        };
        let take_until = (depth + remaining_picks)
            .min(n)
            .min(self.first_nonpositive.max(depth));
        self.current_objective + self.objective_prefix[take_until] - self.objective_prefix[depth]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::problem::{Bounds, LinearConstraint};

    fn problem(
        objective: Vec<f64>,
        constraints: Vec<LinearConstraint>,
    ) -> SelectionProblem {
        let candidates = (0..objective.len()).map(|i| format!("p{i}")).collect();
        SelectionProblem {
            candidates,
            objective,
            constraints,
        }
    }

    fn count_eq(n: usize, value: f64) -> LinearConstraint {
        LinearConstraint {
            label: "squad_size".to_string(),
            coefficients: vec![1.0; n],
            bounds: Bounds::Equal(value),
        }
    }

    fn solve(problem: &SelectionProblem) -> SolveOutcome {
        BranchBoundSolver.solve(problem, Duration::from_secs(10))
    }

    #[test]
    fn test_picks_highest_value_subset() {
        let p = problem(
            vec![10.0, 30.0, 20.0, 5.0],
            vec![
                LinearConstraint {
                    label: "total_cost".to_string(),
                    coefficients: vec![1.0, 1.0, 1.0, 1.0],
                    bounds: Bounds::AtMost(2.0),
                },
                count_eq(4, 2.0),
            ],
        );

        let SolveOutcome::Optimal(selection) = solve(&p) else {
            panic!("expected optimal outcome");
        };
        assert_eq!(selection.objective, 50.0);
        assert_eq!(selection.values, vec![false, true, true, false]);
    }

    #[test]
    fn test_budget_forces_cheaper_pick() {
        // The two most valuable players together bust the budget.
        let p = problem(
            vec![30.0, 20.0, 10.0],
            vec![
                LinearConstraint {
                    label: "total_cost".to_string(),
                    coefficients: vec![3.0, 3.0, 1.0],
                    bounds: Bounds::AtMost(4.0),
                },
                count_eq(3, 2.0),
            ],
        );

        let SolveOutcome::Optimal(selection) = solve(&p) else {
            panic!("expected optimal outcome");
        };
        assert_eq!(selection.objective, 40.0);
        assert_eq!(selection.values, vec![true, false, true]);
    }

    #[test]
    fn test_zero_budget_is_infeasible() {
        let p = problem(
            vec![10.0, 20.0],
            vec![
                LinearConstraint {
                    label: "total_cost".to_string(),
                    coefficients: vec![1.0, 1.0],
                    bounds: Bounds::AtMost(0.0),
                },
                count_eq(2, 1.0),
            ],
        );
        assert_eq!(solve(&p), SolveOutcome::Infeasible);
    }

    #[test]
    fn test_zero_budget_zero_size_is_feasible() {
        let p = problem(
            vec![10.0, 20.0],
            vec![
                LinearConstraint {
                    label: "total_cost".to_string(),
                    coefficients: vec![1.0, 1.0],
                    bounds: Bounds::AtMost(0.0),
                },
                count_eq(2, 0.0),
            ],
        );

        let SolveOutcome::Optimal(selection) = solve(&p) else {
            panic!("expected optimal outcome");
        };
        assert_eq!(selection.chosen_count(), 0);
        assert_eq!(selection.objective, 0.0);
    }

    #[test]
    fn test_select_all_when_everything_fits() {
        let p = problem(
            vec![1.0, 2.0, 3.0],
            vec![
                LinearConstraint {
                    label: "total_cost".to_string(),
                    coefficients: vec![1.0, 1.0, 1.0],
                    bounds: Bounds::AtMost(10.0),
                },
                count_eq(3, 3.0),
            ],
        );

        let SolveOutcome::Optimal(selection) = solve(&p) else {
            panic!("expected optimal outcome");
        };
        assert_eq!(selection.values, vec![true, true, true]);
        assert_eq!(selection.objective, 6.0);
    }

    #[test]
    fn test_range_constraint_spreads_selection() {
        // Both high-value players share a group capped at one pick.
        let p = problem(
            vec![30.0, 25.0, 5.0],
            vec![
                count_eq(3, 2.0),
                LinearConstraint {
                    label: "group_a".to_string(),
                    coefficients: vec![1.0, 1.0, 0.0],
                    bounds: Bounds::Range(0.0, 1.0),
                },
            ],
        );

        let SolveOutcome::Optimal(selection) = solve(&p) else {
            panic!("expected optimal outcome");
        };
        assert_eq!(selection.values, vec![true, false, true]);
        assert_eq!(selection.objective, 35.0);
    }

    #[test]
    fn test_group_minimum_is_enforced() {
        // The low-value player must be taken to satisfy the group minimum.
        let p = problem(
            vec![30.0, 25.0, 1.0],
            vec![
                count_eq(3, 2.0),
                LinearConstraint {
                    label: "group_b".to_string(),
                    coefficients: vec![0.0, 0.0, 1.0],
                    bounds: Bounds::Range(1.0, 1.0),
                },
            ],
        );

        let SolveOutcome::Optimal(selection) = solve(&p) else {
            panic!("expected optimal outcome");
        };
        assert_eq!(selection.values, vec![true, false, true]);
        assert_eq!(selection.objective, 31.0);
    }

    #[test]
    fn test_zero_timeout_reports_timed_out() {
        let p = problem(vec![1.0, 2.0], vec![count_eq(2, 1.0)]);
        let outcome = BranchBoundSolver.solve(&p, Duration::ZERO);
        assert_eq!(outcome, SolveOutcome::TimedOut);
    }

    #[test]
    fn test_empty_problem_with_zero_size() {
        let p = problem(vec![], vec![count_eq(0, 0.0)]);
        let SolveOutcome::Optimal(selection) = solve(&p) else {
            panic!("expected optimal outcome");
        };
        assert!(selection.values.is_empty());
    }

    #[test]
    fn test_empty_problem_with_positive_size_is_infeasible() {
        let p = problem(vec![], vec![count_eq(0, 2.0)]);
        assert_eq!(solve(&p), SolveOutcome::Infeasible);
    }
}
