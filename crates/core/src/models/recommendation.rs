use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::allocation::ProjectedPortfolio;
use super::signal::Timeframe;
use crate::errors::CoreError;

/// A suggested purchase, with the dip that justified it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub ticker: String,
    pub shares_to_buy: u64,
    pub investment_amount: Decimal,
    pub current_price: Decimal,
    pub timeframe: Timeframe,
    pub dip_percent: Decimal,
}

/// A ticker left out of the computation and the reason why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcludedTicker {
    pub ticker: String,
    pub reason: String,
}

/// Result of one recommendation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationReport {
    /// In rank order (strongest dip first)
    pub recommendations: Vec<Recommendation>,

    pub remaining_cash: Decimal,

    pub projected_portfolio: ProjectedPortfolio,

    /// Tickers that had usable price data
    pub scored_count: usize,

    /// Tickers the request asked about
    pub requested_count: usize,

    /// Tickers dropped because their market data failed
    pub excluded: Vec<ExcludedTicker>,
}

impl RecommendationReport {
    /// Human-readable coverage line, e.g. "2 of 3 tickers scored".
    #[must_use]
    pub fn coverage(&self) -> String {
        format!(
            "{} of {} tickers scored",
            self.scored_count, self.requested_count
        )
    }

    #[must_use]
    pub fn total_invested(&self) -> Decimal {
        self.recommendations.iter().map(|r| r.investment_amount).sum()
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize report: {e}")))
    }
}
