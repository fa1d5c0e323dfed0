use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Valuation of a single holding.
///
/// The derived fields are `None` when no live price was available; callers
/// must render them as "N/A", never as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingValuation {
    pub ticker: String,

    pub shares: Decimal,

    pub average_price: Decimal,

    pub current_price: Option<Decimal>,

    /// shares × current_price
    pub value: Option<Decimal>,

    /// shares × (current_price − average_price)
    pub pl_dollar: Option<Decimal>,

    /// (current_price − average_price) / average_price × 100
    pub pl_percent: Option<Decimal>,
}

impl HoldingValuation {
    #[must_use]
    pub fn is_priced(&self) -> bool {
        self.current_price.is_some()
    }
}

/// Valuation of a whole portfolio, recomputed on every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioValuation {
    pub holdings: Vec<HoldingValuation>,

    /// Σ value over priced holdings
    pub total_value: Decimal,

    /// Σ pl_dollar over priced holdings
    pub total_pl: Decimal,

    /// total_pl / Σ cost basis of priced holdings × 100 (0 when that basis is 0)
    pub total_pl_percent: Decimal,

    /// Holdings that had a live price
    pub priced_count: usize,
}

impl PortfolioValuation {
    #[must_use]
    pub fn holding_count(&self) -> usize {
        self.holdings.len()
    }

    /// True when at least one holding could not be priced.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.priced_count < self.holdings.len()
    }

    /// Condense the totals into a dated record for a history store.
    #[must_use]
    pub fn snapshot(&self, date: NaiveDate) -> ValuationSnapshot {
        ValuationSnapshot {
            date,
            total_value: self.total_value,
            total_pl: self.total_pl,
            total_pl_percent: self.total_pl_percent,
        }
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize valuation: {e}")))
    }
}

/// Portfolio totals on a given day, used for timeline charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationSnapshot {
    pub date: NaiveDate,
    pub total_value: Decimal,
    pub total_pl: Decimal,
    pub total_pl_percent: Decimal,
}
