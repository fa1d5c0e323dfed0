use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Maximum ticker length accepted by the store (e.g., "GOOGL").
pub const MAX_TICKER_LEN: usize = 5;

/// Uppercase and validate a ticker symbol: 1–5 ASCII alphanumerics.
pub fn normalize_ticker(ticker: &str) -> Result<String, CoreError> {
    let upper = ticker.trim().to_uppercase();
    if upper.is_empty() || upper.len() > MAX_TICKER_LEN {
        return Err(CoreError::InvalidHolding(format!(
            "Ticker '{ticker}' must be 1-{MAX_TICKER_LEN} characters"
        )));
    }
    if !upper.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(CoreError::InvalidHolding(format!(
            "Ticker '{ticker}' must contain only letters and digits"
        )));
    }
    Ok(upper)
}

/// A position in a portfolio.
///
/// Only `shares` and `average_price` are stored. Value and P/L are always
/// derived on demand by the valuation engine, never kept alongside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Ticker symbol, uppercased (e.g., "AAPL")
    pub ticker: String,

    /// Number of shares held (fractional shares allowed)
    pub shares: Decimal,

    /// Cost basis per share
    pub average_price: Decimal,

    /// Live price, attached at request time. `None` when the quote failed.
    #[serde(default)]
    pub current_price: Option<Decimal>,
}

impl Holding {
    /// Build a validated holding with no live price attached.
    pub fn new(
        ticker: impl AsRef<str>,
        shares: Decimal,
        average_price: Decimal,
    ) -> Result<Self, CoreError> {
        let ticker = normalize_ticker(ticker.as_ref())?;
        let holding = Self {
            ticker,
            shares,
            average_price,
            current_price: None,
        };
        holding.validate()?;
        Ok(holding)
    }

    /// Return a copy with the given live price attached.
    #[must_use]
    pub fn with_price(mut self, current_price: Option<Decimal>) -> Self {
        self.current_price = current_price;
        self
    }

    /// Total amount paid for the position: `shares * average_price`.
    #[must_use]
    pub fn cost_basis(&self) -> Decimal {
        self.shares * self.average_price
    }

    /// Check the invariants the valuation engine relies on.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.average_price <= Decimal::ZERO {
            return Err(CoreError::InvalidHolding(format!(
                "{}: average price must be positive, got {}",
                self.ticker, self.average_price
            )));
        }
        if self.shares < Decimal::ZERO {
            return Err(CoreError::InvalidHolding(format!(
                "{}: shares must not be negative, got {}",
                self.ticker, self.shares
            )));
        }
        if let Some(price) = self.current_price {
            if price < Decimal::ZERO {
                return Err(CoreError::InvalidHolding(format!(
                    "{}: current price must not be negative, got {price}",
                    self.ticker
                )));
            }
        }
        Ok(())
    }

    /// Fold an additional purchase into this position.
    ///
    /// The new cost basis is the share-weighted average of the existing
    /// position and the purchase.
    pub fn merge_purchase(&mut self, shares: Decimal, price: Decimal) -> Result<(), CoreError> {
        if shares <= Decimal::ZERO {
            return Err(CoreError::InvalidHolding(format!(
                "{}: purchased shares must be positive, got {shares}",
                self.ticker
            )));
        }
        if price <= Decimal::ZERO {
            return Err(CoreError::InvalidHolding(format!(
                "{}: purchase price must be positive, got {price}",
                self.ticker
            )));
        }

        let total_cost = self.cost_basis() + shares * price;
        let total_shares = self.shares + shares;
        self.shares = total_shares;
        self.average_price = total_cost / total_shares;
        Ok(())
    }
}
