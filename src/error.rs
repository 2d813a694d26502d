use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to fetch data from feed: {0}")]
    FeedFetch(#[from] reqwest::Error),

    #[error("Failed to parse feed response: {0}")]
    FeedParse(#[from] serde_json::Error),

    // Specific HTTP status code errors
    #[error("Feed not found (404): {url}")]
    FeedNotFound { url: String },

    #[error("Feed server error ({status}): {message} (URL: {url})")]
    FeedServerError {
        status: u16,
        message: String,
        url: String,
    },

    #[error("Feed client error ({status}): {message} (URL: {url})")]
    FeedClientError {
        status: u16,
        message: String,
        url: String,
    },

    // Data shape errors
    #[error("Feed returned malformed CSV: {message}")]
    CsvShape { message: String },

    #[error("Feed returned unexpected data: {message} (URL: {url})")]
    FeedUnexpectedStructure { message: String, url: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Solver execution error: {0}")]
    Solver(String),

    #[error("Log setup error: {0}")]
    LogSetup(String),
}

impl AppError {
    /// Create a configuration error with context
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a log setup error with context
    pub fn log_setup_error(msg: impl Into<String>) -> Self {
        Self::LogSetup(msg.into())
    }

    /// Create a feed not found error
    pub fn feed_not_found(url: impl Into<String>) -> Self {
        Self::FeedNotFound { url: url.into() }
    }

    /// Create a feed server error (5xx status codes)
    pub fn feed_server_error(
        status: u16,
        message: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::FeedServerError {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create a feed client error (4xx status codes except 404)
    pub fn feed_client_error(
        status: u16,
        message: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::FeedClientError {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create a malformed CSV error
    pub fn csv_shape(message: impl Into<String>) -> Self {
        Self::CsvShape {
            message: message.into(),
        }
    }

    /// Create an unexpected data structure error
    pub fn feed_unexpected_structure(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::FeedUnexpectedStructure {
            message: message.into(),
            url: url.into(),
        }
    }

    /// Check if error is retryable (network issues, server errors)
    #[allow(dead_code)]
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::FeedServerError { .. } => true,
            AppError::FeedFetch(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}
