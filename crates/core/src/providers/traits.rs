use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;

use crate::errors::CoreError;
use crate::models::price::{PriceBar, PriceProfile};
use crate::models::settings::LookbackWindows;

/// Trait abstraction for all market data sources.
///
/// Each upstream API (Yahoo Finance, Financial Modeling Prep) implements
/// this trait; the scoring pipeline only ever sees `PriceProfile`s.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Latest traded price of a ticker.
    async fn get_current_price(&self, ticker: &str) -> Result<Decimal, CoreError>;

    /// Daily bars between `from` and `to` (inclusive), sorted by date.
    async fn get_daily_history(
        &self,
        ticker: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PriceBar>, CoreError>;

    /// Current price plus weekly/monthly/yearly highs as of `as_of`.
    async fn get_price_profile(
        &self,
        ticker: &str,
        as_of: NaiveDate,
        lookback: &LookbackWindows,
    ) -> Result<PriceProfile, CoreError> {
        let current = self.get_current_price(ticker).await?;
        let longest = lookback
            .yearly_days
            .max(lookback.monthly_days)
            .max(lookback.weekly_days);
        let from = as_of
            .checked_sub_signed(Duration::days(i64::from(longest)))
            .ok_or_else(|| {
                CoreError::ValidationError(format!(
                    "Lookback of {longest} days before {as_of} is out of range"
                ))
            })?;
        let bars = self.get_daily_history(ticker, from, as_of).await?;
        Ok(PriceProfile::from_history(current, &bars, as_of, lookback))
    }
}

/// Convert an upstream float price into a `Decimal`, rejecting NaN/inf.
pub(crate) fn to_decimal(provider: &str, ticker: &str, value: f64) -> Result<Decimal, CoreError> {
    if !value.is_finite() {
        return Err(CoreError::Api {
            provider: provider.to_string(),
            message: format!("Non-finite price returned for {ticker}: {value}"),
        });
    }
    Decimal::try_from(value).map_err(|e| CoreError::Api {
        provider: provider.to_string(),
        message: format!("Unrepresentable price for {ticker}: {value} ({e})"),
    })
}
