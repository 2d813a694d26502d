//! On-disk cache for raw feed payloads.
//!
//! Feeds change daily at most, so a fetched body is written next to the
//! platform cache directory and reused on later runs until `--force`
//! bypasses it. Only raw payloads are cached; everything derived from them
//! is recomputed per run.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tokio::fs;
use tracing::{debug, warn};

use crate::error::AppError;

/// Returns the platform-specific cache directory for feed payloads.
///
/// Falls back to the current directory if no cache directory is available.
pub fn cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| Path::new(".").to_path_buf())
        .join("squad_optimizer")
}

fn payload_path(key: &str) -> PathBuf {
    cache_dir().join(format!("{key}.payload"))
}

/// Reads a cached payload, together with a human-readable timestamp of when
/// it was written. Returns None when there is no usable cache entry.
pub async fn read_payload(key: &str) -> Option<(String, String)> {
    let path = payload_path(key);
    let body = match fs::read_to_string(&path).await {
        Ok(body) => body,
        Err(e) => {
            debug!("No cached payload for {key}: {e}");
            return None;
        }
    };

    let written = match fs::metadata(&path).await.and_then(|m| m.modified()) {
        Ok(modified) => {
            let local: DateTime<Local> = modified.into();
            local.format("%Y-%m-%d %H:%M").to_string()
        }
        Err(_) => "unknown time".to_string(),
    };

    Some((body, written))
}

/// Writes a fetched payload to the cache. Failures are logged and swallowed:
/// a broken cache must never fail the run that just fetched fresh data.
pub async fn write_payload(key: &str, body: &str) {
    if let Err(e) = try_write_payload(key, body).await {
        warn!("Failed to cache payload for {key}: {e}");
    }
}

async fn try_write_payload(key: &str, body: &str) -> Result<(), AppError> {
    let dir = cache_dir();
    if !dir.exists() {
        fs::create_dir_all(&dir).await?;
    }
    fs::write(payload_path(key), body).await?;
    Ok(())
}
