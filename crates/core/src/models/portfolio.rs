use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::holding::{normalize_ticker, Holding};
use crate::errors::CoreError;

/// A named set of holdings, at most one per ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub id: Uuid,

    pub name: String,

    pub holdings: Vec<Holding>,
}

impl Portfolio {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            holdings: Vec::new(),
        }
    }

    /// Record a purchase. An existing position in the same ticker is merged
    /// at weighted average cost; otherwise a new holding is appended.
    pub fn add_holding(
        &mut self,
        ticker: &str,
        shares: Decimal,
        average_price: Decimal,
    ) -> Result<&Holding, CoreError> {
        let ticker = normalize_ticker(ticker)?;
        if shares <= Decimal::ZERO {
            return Err(CoreError::InvalidHolding(format!(
                "{ticker}: number of shares must be positive"
            )));
        }

        match self.holdings.iter().position(|h| h.ticker == ticker) {
            Some(idx) => {
                self.holdings[idx].merge_purchase(shares, average_price)?;
                Ok(&self.holdings[idx])
            }
            None => {
                let holding = Holding::new(&ticker, shares, average_price)?;
                self.holdings.push(holding);
                Ok(&self.holdings[self.holdings.len() - 1])
            }
        }
    }

    /// Remove a holding by ticker (case-insensitive). Returns the removed holding.
    pub fn remove_holding(&mut self, ticker: &str) -> Option<Holding> {
        let upper = ticker.trim().to_uppercase();
        let idx = self.holdings.iter().position(|h| h.ticker == upper)?;
        Some(self.holdings.remove(idx))
    }

    #[must_use]
    pub fn get_holding(&self, ticker: &str) -> Option<&Holding> {
        let upper = ticker.trim().to_uppercase();
        self.holdings.iter().find(|h| h.ticker == upper)
    }

    /// Tickers of all holdings, in insertion order.
    #[must_use]
    pub fn tickers(&self) -> Vec<String> {
        self.holdings.iter().map(|h| h.ticker.clone()).collect()
    }
}
