use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::errors::CoreError;
use crate::models::price::PriceProfile;
use crate::models::settings::LookbackWindows;
use crate::providers::registry::MarketDataRegistry;

/// Fetches prices and price profiles from the registered providers.
///
/// Providers are tried in registration order; the first valid answer wins.
/// Nothing is cached: every request sees fresh data. Batch fetches return
/// one result per ticker so a single failure never sinks the batch.
pub struct PriceService {
    registry: MarketDataRegistry,
}

impl PriceService {
    pub fn new(registry: MarketDataRegistry) -> Self {
        Self { registry }
    }

    /// Check if at least one provider is registered.
    #[must_use]
    pub fn has_provider(&self) -> bool {
        !self.registry.is_empty()
    }

    /// Names of the registered providers, in priority order.
    #[must_use]
    pub fn provider_names(&self) -> Vec<String> {
        self.registry.provider_names()
    }

    /// Latest price of a ticker. Prices must be non-negative.
    pub async fn get_current_price(&self, ticker: &str) -> Result<Decimal, CoreError> {
        let providers = self.registry.providers();
        if providers.is_empty() {
            return Err(CoreError::NoProvider);
        }

        let mut last_error = None;
        for provider in &providers {
            match provider.get_current_price(ticker).await {
                Ok(price) if price < Decimal::ZERO => {
                    last_error = Some(CoreError::InvalidPriceData {
                        ticker: ticker.to_string(),
                        message: format!("{} returned negative price {price}", provider.name()),
                    });
                }
                Ok(price) => return Ok(price),
                Err(e) => {
                    log::debug!("{}: {ticker} quote failed: {e}", provider.name());
                    last_error = Some(e);
                }
            }
        }

        Err(Self::unavailable(ticker, last_error))
    }

    /// Current price and highs for a ticker. Every field must be positive.
    pub async fn get_price_profile(
        &self,
        ticker: &str,
        as_of: NaiveDate,
        lookback: &LookbackWindows,
    ) -> Result<PriceProfile, CoreError> {
        let providers = self.registry.providers();
        if providers.is_empty() {
            return Err(CoreError::NoProvider);
        }

        let mut last_error = None;
        for provider in &providers {
            match provider.get_price_profile(ticker, as_of, lookback).await {
                Ok(profile) => match profile.validate(ticker) {
                    Ok(()) => return Ok(profile),
                    Err(e) => last_error = Some(e),
                },
                Err(e) => {
                    log::debug!("{}: {ticker} profile failed: {e}", provider.name());
                    last_error = Some(e);
                }
            }
        }

        Err(Self::unavailable(ticker, last_error))
    }

    /// Current prices for many tickers, one result each, in input order.
    pub async fn fetch_current_prices(
        &self,
        tickers: &[String],
    ) -> Vec<(String, Result<Decimal, CoreError>)> {
        let mut results = Vec::with_capacity(tickers.len());
        for ticker in tickers {
            let result = self.get_current_price(ticker).await;
            if let Err(e) = &result {
                log::warn!("No current price for {ticker}: {e}");
            }
            results.push((ticker.clone(), result));
        }
        results
    }

    /// Price profiles for many tickers, one result each, in input order.
    pub async fn fetch_profiles(
        &self,
        tickers: &[String],
        as_of: NaiveDate,
        lookback: &LookbackWindows,
    ) -> Vec<(String, Result<PriceProfile, CoreError>)> {
        let mut results = Vec::with_capacity(tickers.len());
        for ticker in tickers {
            let result = self.get_price_profile(ticker, as_of, lookback).await;
            if let Err(e) = &result {
                log::warn!("No price profile for {ticker}: {e}");
            }
            results.push((ticker.clone(), result));
        }
        results
    }

    /// Invalid data stays `InvalidPriceData`; anything else becomes
    /// `PriceUnavailable` for the ticker.
    fn unavailable(ticker: &str, last_error: Option<CoreError>) -> CoreError {
        match last_error {
            Some(e @ CoreError::InvalidPriceData { .. }) => e,
            Some(CoreError::PriceUnavailable { message, .. }) => CoreError::PriceUnavailable {
                ticker: ticker.to_string(),
                message,
            },
            Some(e) => CoreError::PriceUnavailable {
                ticker: ticker.to_string(),
                message: e.to_string(),
            },
            None => CoreError::NoProvider,
        }
    }
}
