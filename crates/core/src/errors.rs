use thiserror::Error;
use uuid::Uuid;

/// Unified error type for the entire dip-planner-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input validation ────────────────────────────────────────────
    #[error("Invalid holding: {0}")]
    InvalidHolding(String),

    #[error("Invalid price data for {ticker}: {message}")]
    InvalidPriceData { ticker: String, message: String },

    #[error("Invalid allocation input: {0}")]
    InvalidAllocationInput(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),

    // ── Market data ─────────────────────────────────────────────────
    #[error("Price unavailable for {ticker}: {message}")]
    PriceUnavailable { ticker: String, message: String },

    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("No market data provider registered")]
    NoProvider,

    // ── Portfolio store ─────────────────────────────────────────────
    #[error("Portfolio not found: {0}")]
    PortfolioNotFound(Uuid),

    // ── Serialization ───────────────────────────────────────────────
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl CoreError {
    /// True for failures scoped to a single ticker. These drop the ticker
    /// from a computation instead of aborting it.
    #[must_use]
    pub fn is_ticker_scoped(&self) -> bool {
        matches!(
            self,
            CoreError::PriceUnavailable { .. }
                | CoreError::InvalidPriceData { .. }
                | CoreError::Api { .. }
                | CoreError::Network(_)
        )
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors carry the full URL, and FMP puts the API key in the query.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
