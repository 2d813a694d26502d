use crate::error::AppError;
use std::path::Path;

/// Validates feed URLs and the optional log file path.
///
/// # Validation Rules
/// - A configured feed URL must look like a URL or domain name
/// - If a log file path is provided, it cannot be empty and its parent
///   directory must exist or be creatable
pub fn validate_config(
    market_url: &Option<String>,
    fantasy_url: &Option<String>,
    log_file_path: &Option<String>,
) -> Result<(), AppError> {
    if let Some(url) = market_url {
        validate_feed_url("market_url", url)?;
    }
    if let Some(url) = fantasy_url {
        validate_feed_url("fantasy_url", url)?;
    }

    if let Some(log_path) = log_file_path {
        if log_path.is_empty() {
            return Err(AppError::config_error("Log file path cannot be empty"));
        }

        // Check if parent directory exists or can be created
        if let Some(parent) = Path::new(log_path).parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::config_error(format!(
                    "Cannot create log directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}

fn validate_feed_url(field: &str, url: &str) -> Result<(), AppError> {
    if url.is_empty() {
        return Err(AppError::config_error(format!("{field} cannot be empty")));
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        // Without a protocol it should at least look like a domain
        if !url.contains('.') && !url.starts_with("localhost") {
            return Err(AppError::config_error(format!(
                "{field} must be a valid URL or domain name"
            )));
        }
    }

    Ok(())
}
