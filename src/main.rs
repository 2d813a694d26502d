// src/main.rs
use clap::Parser;

use squad_optimizer::app;
use squad_optimizer::cli::Args;
use squad_optimizer::config::Config;
use squad_optimizer::error::AppError;
use squad_optimizer::logging;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();

    let (log_file_path, _guard) = logging::setup_logging(&args).await?;
    tracing::info!("Logs are being written to: {log_file_path}");

    // Handle configuration operations before touching any feed
    if args.list_config {
        Config::display().await?;
        return Ok(());
    }

    if args.new_log_file_path.is_some() || args.clear_log_file_path {
        let mut config = Config::load().await.unwrap_or_default();

        if let Some(new_log_path) = args.new_log_file_path.clone() {
            config.log_file_path = Some(new_log_path);
        } else if args.clear_log_file_path {
            config.log_file_path = None;
            println!("Custom log file path cleared. Using default location.");
        }

        config.save().await?;
        println!("Config updated successfully!");
        return Ok(());
    }

    // Load config first to fail early if there's an issue
    let config = Config::load().await?;

    app::run(&args, config).await
}
