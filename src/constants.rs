//! Application-wide constants and default configuration values
//!
//! This module centralizes magic numbers and default rule values so that the
//! rest of the codebase stays free of inline literals.

#![allow(dead_code)]

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

/// Maximum number of connections per host in the HTTP client pool
pub const HTTP_POOL_MAX_IDLE_PER_HOST: usize = 100;

/// Default wall-clock budget for the squad solver in seconds.
/// Expiry is reported as a timeout, distinct from infeasibility.
pub const DEFAULT_SOLVER_TIMEOUT_SECONDS: u64 = 60;

/// Number of players shown by `--show-top-ratios`
pub const TOP_RATIO_COUNT: usize = 20;

/// Default squad rules. These mirror a classic fantasy ruleset:
/// 15 players (2 goalkeepers, 4 defenders, 6 midfielders, 3 forwards),
/// a 30 million budget and at most 3 players per club.
pub mod squad {
    /// Total number of players in the squad
    pub const SQUAD_SIZE: u32 = 15;

    /// Required number of goalkeepers
    pub const GOALKEEPERS: u32 = 2;

    /// Required number of defenders
    pub const DEFENDERS: u32 = 4;

    /// Required number of midfielders
    pub const MIDFIELDERS: u32 = 6;

    /// Required number of forwards
    pub const FORWARDS: u32 = 3;

    /// Budget cap on total in-game cost, in euros
    pub const BUDGET_CAP: f64 = 30_000_000.0;

    /// Default per-group (club/nation) selection window
    pub const GROUP_MIN: u32 = 0;
    pub const GROUP_MAX: u32 = 3;
}

/// Environment variable names
pub mod env_vars {
    /// Environment variable for the market-valuation feed URL override
    pub const MARKET_URL: &str = "SQUAD_MARKET_URL";

    /// Environment variable for the fantasy-cost feed URL override
    pub const FANTASY_URL: &str = "SQUAD_FANTASY_URL";

    /// Environment variable for log file path override
    pub const LOG_FILE: &str = "SQUAD_LOG_FILE";

    /// Environment variable for HTTP timeout in seconds
    pub const HTTP_TIMEOUT: &str = "SQUAD_HTTP_TIMEOUT";
}
