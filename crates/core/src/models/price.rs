use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::settings::LookbackWindows;
use crate::errors::CoreError;

/// One day of price history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub high: Decimal,
    pub close: Decimal,
}

/// Current price and recent highs for one ticker, as supplied by a market
/// data provider. Read-only to the scoring pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceProfile {
    pub current_price: Decimal,
    pub weekly_high: Decimal,
    pub monthly_high: Decimal,
    pub yearly_high: Decimal,
}

impl PriceProfile {
    pub fn new(
        current_price: Decimal,
        weekly_high: Decimal,
        monthly_high: Decimal,
        yearly_high: Decimal,
    ) -> Self {
        Self {
            current_price,
            weekly_high,
            monthly_high,
            yearly_high,
        }
    }

    /// Derive the three highs from daily bars.
    ///
    /// Each high is the maximum `high` of the bars dated on or after
    /// `as_of - N days` (and not after `as_of`). A window with no bars falls
    /// back to `current_price`, which scores as a zero dip.
    pub fn from_history(
        current_price: Decimal,
        bars: &[PriceBar],
        as_of: NaiveDate,
        lookback: &LookbackWindows,
    ) -> Self {
        let window_high = |days: u32| -> Decimal {
            let cutoff = as_of
                .checked_sub_signed(Duration::days(i64::from(days)))
                .unwrap_or(NaiveDate::MIN);
            bars.iter()
                .filter(|b| b.date >= cutoff && b.date <= as_of)
                .map(|b| b.high)
                .max()
                .unwrap_or(current_price)
        };

        Self {
            current_price,
            weekly_high: window_high(lookback.weekly_days),
            monthly_high: window_high(lookback.monthly_days),
            yearly_high: window_high(lookback.yearly_days),
        }
    }

    /// Every field must be strictly positive.
    pub fn validate(&self, ticker: &str) -> Result<(), CoreError> {
        let fields = [
            ("current price", self.current_price),
            ("weekly high", self.weekly_high),
            ("monthly high", self.monthly_high),
            ("yearly high", self.yearly_high),
        ];
        for (label, value) in fields {
            if value <= Decimal::ZERO {
                return Err(CoreError::InvalidPriceData {
                    ticker: ticker.to_string(),
                    message: format!("{label} must be positive, got {value}"),
                });
            }
        }
        Ok(())
    }
}
