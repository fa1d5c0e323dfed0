use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use time::OffsetDateTime;

use super::traits::{to_decimal, MarketDataProvider};
use crate::errors::CoreError;
use crate::models::price::PriceBar;

const PROVIDER_NAME: &str = "Yahoo Finance";

/// Yahoo Finance provider for stock quotes and daily history.
///
/// - **Free**: No API key required.
/// - **Coverage**: Global equities, ETFs, indices.
///
/// Uses the `yahoo_finance_api` crate which wraps Yahoo Finance's
/// public endpoints.
///
/// **Note**: Not WASM-compatible (uses native reqwest/tokio).
pub struct YahooFinanceProvider {
    connector: yahoo_finance_api::YahooConnector,
}

impl YahooFinanceProvider {
    pub fn new() -> Result<Self, CoreError> {
        let connector = yahoo_finance_api::YahooConnector::new().map_err(|e| CoreError::Api {
            provider: PROVIDER_NAME.into(),
            message: format!("Failed to create connector: {e}"),
        })?;
        Ok(Self { connector })
    }

    /// Convert a `chrono::NaiveDate` to `time::OffsetDateTime` (midnight UTC).
    fn to_offset_datetime(date: NaiveDate) -> Result<OffsetDateTime, CoreError> {
        let invalid = |e: String| CoreError::Api {
            provider: PROVIDER_NAME.into(),
            message: format!("Invalid date {date}: {e}"),
        };

        let month = time::Month::try_from(date.month() as u8).map_err(|e| invalid(e.to_string()))?;
        let odt = time::Date::from_calendar_date(date.year(), month, date.day() as u8)
            .map_err(|e| invalid(e.to_string()))?
            .with_hms(0, 0, 0)
            .map_err(|e| invalid(e.to_string()))?
            .assume_utc();
        Ok(odt)
    }

    /// Convert a unix timestamp (seconds) to `chrono::NaiveDate`.
    fn timestamp_to_naive_date(ts: i64) -> Option<NaiveDate> {
        chrono::DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive())
    }
}

#[async_trait]
impl MarketDataProvider for YahooFinanceProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn get_current_price(&self, ticker: &str) -> Result<Decimal, CoreError> {
        let resp = self
            .connector
            .get_latest_quotes(ticker, "1d")
            .await
            .map_err(|e| CoreError::PriceUnavailable {
                ticker: ticker.to_string(),
                message: format!("{PROVIDER_NAME}: failed to fetch latest quote: {e}"),
            })?;

        let quote = resp.last_quote().map_err(|e| CoreError::PriceUnavailable {
            ticker: ticker.to_string(),
            message: format!("{PROVIDER_NAME}: no quote data: {e}"),
        })?;

        to_decimal(PROVIDER_NAME, ticker, quote.close)
    }

    async fn get_daily_history(
        &self,
        ticker: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PriceBar>, CoreError> {
        let start = Self::to_offset_datetime(from)?;
        let end = Self::to_offset_datetime(to.succ_opt().unwrap_or(to))?; // inclusive end

        let resp = self
            .connector
            .get_quote_history(ticker, start, end)
            .await
            .map_err(|e| CoreError::Api {
                provider: PROVIDER_NAME.into(),
                message: format!("Failed to fetch history for {ticker}: {e}"),
            })?;

        let quotes = resp.quotes().map_err(|e| CoreError::Api {
            provider: PROVIDER_NAME.into(),
            message: format!("Failed to parse quotes for {ticker}: {e}"),
        })?;

        let mut bars = Vec::with_capacity(quotes.len());
        for q in &quotes {
            let Some(date) = Self::timestamp_to_naive_date(q.timestamp) else {
                continue;
            };
            if date < from || date > to {
                continue;
            }
            bars.push(PriceBar {
                date,
                high: to_decimal(PROVIDER_NAME, ticker, q.high)?,
                close: to_decimal(PROVIDER_NAME, ticker, q.close)?,
            });
        }
        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}
