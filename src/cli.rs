use clap::Parser;
use clap::builder::styling::{AnsiColor, Effects, Styles};

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

/// Fantasy Squad Optimizer
///
/// Merges real-world market valuations with in-game fantasy costs into a
/// single player roster, then picks the squad with the highest total market
/// value that satisfies the budget cap, the per-position quotas and the
/// per-club limits.
///
/// Feed payloads are cached on disk between runs; use --force to refetch.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(styles = get_styles())]
pub struct Args {
    /// Force refreshing of the cached feed payloads.
    #[arg(short, long)]
    pub force: bool,

    /// Also print the players with the best ratio (market value / in-game
    /// cost) before the squad table.
    #[arg(long = "show-top-ratios", help_heading = "Display Options")]
    pub show_top_ratios: bool,

    /// File with player names to exclude from the squad, one per line.
    /// Names are matched against the canonical (valuation-feed) spelling.
    #[arg(long = "exclude-list", value_name = "FILE", help_heading = "Input")]
    pub exclude_list: Option<String>,

    /// Read the market-valuation feed from a local JSON file instead of
    /// fetching it.
    #[arg(long = "market-file", value_name = "FILE", help_heading = "Input")]
    pub market_file: Option<String>,

    /// Read the fantasy-cost feed from a local CSV file instead of
    /// fetching it.
    #[arg(long = "fantasy-file", value_name = "FILE", help_heading = "Input")]
    pub fantasy_file: Option<String>,

    /// List current configuration settings
    #[arg(long = "list-config", short = 'l', help_heading = "Configuration")]
    pub list_config: bool,

    /// Update log file path in config. This sets a persistent custom log
    /// file location.
    #[arg(long = "set-log-file", help_heading = "Configuration")]
    pub new_log_file_path: Option<String>,

    /// Clear the custom log file path from config. This reverts to using
    /// the default log location.
    #[arg(long = "clear-log-file", help_heading = "Configuration")]
    pub clear_log_file_path: bool,

    /// Specify a custom log file path for this run only.
    #[arg(long = "log-file", help_heading = "Debug")]
    pub log_file: Option<String>,

    /// Enable debug mode: log output is echoed to the terminal in addition
    /// to the log file.
    #[arg(long = "debug", help_heading = "Debug")]
    pub debug: bool,
}
