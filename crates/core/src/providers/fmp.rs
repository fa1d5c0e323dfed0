use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use super::traits::{to_decimal, MarketDataProvider};
use crate::errors::CoreError;
use crate::models::price::PriceBar;

const BASE_URL: &str = "https://financialmodelingprep.com/api/v3";
const PROVIDER_NAME: &str = "Financial Modeling Prep";

/// Financial Modeling Prep provider for quotes and daily history.
///
/// - **Requires**: API key (set via settings as "fmp").
/// - **Endpoints**: `/quote/{ticker}` and `/historical-price-full/{ticker}`.
/// - Rate-limit and bad-key responses come back as HTTP 200 with an
///   `"Error Message"` or `"Note"` body, so bodies are inspected before use.
pub struct FmpProvider {
    client: Client,
    api_key: String,
}

impl FmpProvider {
    pub fn new(api_key: String, timeout_secs: u64) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(timeout_secs));
        #[cfg(target_arch = "wasm32")]
        let _ = timeout_secs;
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            api_key,
        }
    }

    /// Extract the price for `ticker` from a `/quote` response body.
    pub fn parse_quote(ticker: &str, body: &str) -> Result<Decimal, CoreError> {
        let resp: QuoteResponse = serde_json::from_str(body).map_err(|e| CoreError::Api {
            provider: PROVIDER_NAME.into(),
            message: format!("Failed to parse quote for {ticker}: {e}"),
        })?;

        match resp {
            QuoteResponse::Quotes(quotes) => {
                let quote = quotes
                    .into_iter()
                    .find(|q| q.symbol.eq_ignore_ascii_case(ticker))
                    .ok_or_else(|| CoreError::PriceUnavailable {
                        ticker: ticker.to_string(),
                        message: "no quote returned; symbol may be invalid".into(),
                    })?;
                let price = quote.price.ok_or_else(|| CoreError::PriceUnavailable {
                    ticker: ticker.to_string(),
                    message: "quote has no price".into(),
                })?;
                to_decimal(PROVIDER_NAME, ticker, price)
            }
            QuoteResponse::Error(body) => Err(body.into_error(ticker)),
        }
    }

    /// Extract daily bars within `[from, to]` from a `/historical-price-full`
    /// response body. Days without a `high` are skipped. An empty object
    /// (no history for the symbol) yields no bars.
    pub fn parse_history(
        ticker: &str,
        body: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PriceBar>, CoreError> {
        let resp: HistoryResponse = serde_json::from_str(body).map_err(|e| CoreError::Api {
            provider: PROVIDER_NAME.into(),
            message: format!("Failed to parse history for {ticker}: {e}"),
        })?;

        let days = match resp {
            HistoryResponse::History(history) => history.historical,
            HistoryResponse::Error(body) if body.is_empty() => return Ok(Vec::new()),
            HistoryResponse::Error(body) => return Err(body.into_error(ticker)),
        };

        let mut bars = Vec::with_capacity(days.len());
        for day in days {
            let Ok(date) = NaiveDate::parse_from_str(&day.date, "%Y-%m-%d") else {
                continue;
            };
            if date < from || date > to {
                continue;
            }
            let Some(high) = day.high else {
                continue;
            };
            let high = to_decimal(PROVIDER_NAME, ticker, high)?;
            let close = match day.close {
                Some(close) => to_decimal(PROVIDER_NAME, ticker, close)?,
                None => high,
            };
            bars.push(PriceBar { date, high, close });
        }
        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    async fn get_body(&self, url: &str, extra: &[(&str, String)]) -> Result<String, CoreError> {
        let mut query: Vec<(&str, String)> = vec![("apikey", self.api_key.clone())];
        query.extend(extra.iter().cloned());

        let resp = self.client.get(url).query(&query).send().await?;
        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(CoreError::Api {
                provider: PROVIDER_NAME.into(),
                message: "API rate limit reached".into(),
            });
        }
        if !status.is_success() {
            return Err(CoreError::Api {
                provider: PROVIDER_NAME.into(),
                message: format!("Unexpected HTTP status {status}"),
            });
        }
        Ok(resp.text().await?)
    }
}

// ── FMP API response types ──────────────────────────────────────────

#[derive(Deserialize)]
#[serde(untagged)]
enum QuoteResponse {
    Quotes(Vec<FmpQuote>),
    Error(FmpErrorBody),
}

#[derive(Deserialize)]
struct FmpQuote {
    symbol: String,
    price: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum HistoryResponse {
    History(FmpHistory),
    Error(FmpErrorBody),
}

#[derive(Deserialize)]
struct FmpHistory {
    historical: Vec<FmpDay>,
}

#[derive(Deserialize)]
struct FmpDay {
    date: String,
    high: Option<f64>,
    close: Option<f64>,
}

#[derive(Deserialize)]
struct FmpErrorBody {
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
}

impl FmpErrorBody {
    fn is_empty(&self) -> bool {
        self.error_message.is_none() && self.note.is_none()
    }

    fn into_error(self, ticker: &str) -> CoreError {
        match self.error_message.or(self.note) {
            Some(message) => CoreError::Api {
                provider: PROVIDER_NAME.into(),
                message,
            },
            None => CoreError::PriceUnavailable {
                ticker: ticker.to_string(),
                message: "empty response".into(),
            },
        }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl MarketDataProvider for FmpProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn get_current_price(&self, ticker: &str) -> Result<Decimal, CoreError> {
        let url = format!("{BASE_URL}/quote/{}", ticker.to_uppercase());
        let body = self.get_body(&url, &[]).await?;
        Self::parse_quote(ticker, &body)
    }

    async fn get_daily_history(
        &self,
        ticker: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PriceBar>, CoreError> {
        let url = format!("{BASE_URL}/historical-price-full/{}", ticker.to_uppercase());
        let days = (to - from).num_days().max(1);
        let body = self
            .get_body(&url, &[("timeseries", days.to_string())])
            .await?;
        Self::parse_history(ticker, &body, from, to)
    }
}
