//! Error types for season statistics and rating persistence.
//!
//! All errors implement the `std::error::Error` trait and carry structured
//! context for the caller to decide between degradation strategies.
//!
//! ## Error Categories
//!
//! - **Rate Limit Errors**: the provider refused due to request volume.
//!   Callers may serve stale cache, show a retryable banner, or omit the
//!   dependent dataset while rendering the rest.
//! - **Fetch Errors**: any other transport or server failure (timeout, 5xx,
//!   connection reset). Default policy is to log and degrade to an empty
//!   dataset.
//! - **Parse Errors**: the provider returned a document the schema layer
//!   could not interpret.
//! - **Storage Errors**: the local key-value backend is unavailable or full.
//!   Persistence operations log these and act as no-ops.
//! - **Import Errors**: a user-supplied ratings document failed validation.
//!   Surfaced as a user-visible message; stored state is never partially
//!   mutated.
//!
//! ## Classification
//!
//! ```rust
//! use gridbook::StatsError;
//!
//! let error = StatsError::rate_limited("2024/results.json", 3);
//! assert!(error.is_rate_limited());
//! assert!(error.is_retryable());
//! ```

use thiserror::Error;

/// Result type alias for statistics operations.
pub type Result<T, E = StatsError> = std::result::Result<T, E>;

/// Main error type for season statistics and rating operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StatsError {
    #[error("Rate limited by provider on {endpoint} after {attempts} attempts")]
    RateLimited { endpoint: String, attempts: u32 },

    #[error("Fetch failed for {endpoint}: {reason}")]
    Fetch {
        endpoint: String,
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Parse error in {context}: {details}")]
    Parse { context: String, details: String },

    #[error("Storage error during {operation}: {cause}")]
    Storage { operation: String, cause: anyhow::Error },

    #[error("Import rejected: {reason}")]
    Import { reason: String },
}

impl StatsError {
    /// Returns whether this error is potentially recoverable through retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            StatsError::RateLimited { .. } => true,
            StatsError::Fetch { .. } => true,
            StatsError::Parse { .. } => false,
            StatsError::Storage { .. } => false,
            StatsError::Import { .. } => false,
        }
    }

    /// Returns whether this is the distinguishable rate-limit kind.
    ///
    /// Callers use this to choose between serving a stale cache entry and
    /// surfacing a retry affordance, versus treating the dataset as absent.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, StatsError::RateLimited { .. })
    }

    /// Helper constructor for rate-limit errors.
    pub fn rate_limited(endpoint: impl Into<String>, attempts: u32) -> Self {
        StatsError::RateLimited { endpoint: endpoint.into(), attempts }
    }

    /// Helper constructor for generic fetch errors.
    pub fn fetch_failed(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        StatsError::Fetch { endpoint: endpoint.into(), reason: reason.into(), source: None }
    }

    /// Helper constructor for fetch errors with an underlying transport error.
    pub fn fetch_failed_with_source(
        endpoint: impl Into<String>,
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        StatsError::Fetch { endpoint: endpoint.into(), reason: reason.into(), source: Some(source) }
    }

    /// Helper constructor for parse errors.
    pub fn parse_error(context: impl Into<String>, details: impl Into<String>) -> Self {
        StatsError::Parse { context: context.into(), details: details.into() }
    }

    /// Helper constructor for storage errors. The backend failure is kept as
    /// an opaque `anyhow::Error` since storage backends vary per embedder.
    pub fn storage(operation: impl Into<String>, cause: anyhow::Error) -> Self {
        StatsError::Storage { operation: operation.into(), cause }
    }

    /// Helper constructor for import validation errors.
    pub fn import_rejected(reason: impl Into<String>) -> Self {
        StatsError::Import { reason: reason.into() }
    }
}

impl From<serde_json::Error> for StatsError {
    fn from(err: serde_json::Error) -> Self {
        StatsError::Parse { context: "JSON deserialization".to_string(), details: err.to_string() }
    }
}

impl From<reqwest::Error> for StatsError {
    fn from(err: reqwest::Error) -> Self {
        let endpoint = err.url().map(|u| u.to_string()).unwrap_or_else(|| "<unknown>".to_string());
        let reason = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_connect() {
            "connection failed".to_string()
        } else {
            err.to_string()
        };
        StatsError::Fetch { endpoint, reason, source: Some(Box::new(err)) }
    }
}
