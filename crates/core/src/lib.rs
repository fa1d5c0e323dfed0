pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use chrono::NaiveDate;
use models::{
    recommendation::RecommendationReport, settings::Settings, valuation::PortfolioValuation,
};
use providers::registry::MarketDataRegistry;
use rust_decimal::Decimal;
use services::{
    price_service::PriceService, recommendation_service::RecommendationService,
    valuation_service::ValuationService,
};
use std::collections::HashSet;
use storage::traits::PortfolioStore;
use uuid::Uuid;

use errors::CoreError;

/// Main entry point for the Dip Planner core library.
///
/// Reads portfolios from a `PortfolioStore`, prices them through the
/// registered market data providers, and answers the two request types:
/// valuation and cash-deployment recommendation. Every call recomputes
/// from scratch; no price data survives between requests.
#[must_use]
pub struct DipPlanner {
    store: Box<dyn PortfolioStore>,
    settings: Settings,
    price_service: PriceService,
    valuation_service: ValuationService,
    recommendation_service: RecommendationService,
}

impl std::fmt::Debug for DipPlanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DipPlanner")
            .field("portfolios", &self.store.list_portfolio_ids().len())
            .field("providers", &self.price_service.provider_names())
            .field("thresholds", &self.settings.thresholds)
            .field("weights", &self.settings.weights)
            .finish()
    }
}

impl DipPlanner {
    /// Create a planner with the default providers for the given settings.
    pub fn new(store: Box<dyn PortfolioStore>, settings: Settings) -> Result<Self, CoreError> {
        let registry = MarketDataRegistry::new_with_defaults(&settings);
        Self::with_registry(store, settings, registry)
    }

    /// Create a planner with an explicit provider registry.
    pub fn with_registry(
        store: Box<dyn PortfolioStore>,
        settings: Settings,
        registry: MarketDataRegistry,
    ) -> Result<Self, CoreError> {
        settings.validate()?;
        Ok(Self {
            store,
            recommendation_service: RecommendationService::new(&settings),
            settings,
            price_service: PriceService::new(registry),
            valuation_service: ValuationService::new(),
        })
    }

    // ── Valuation ───────────────────────────────────────────────────

    /// Value every holding of a portfolio at live prices.
    ///
    /// A ticker whose quote fails keeps `current_price = None` and is
    /// left out of the totals. Without any provider the request fails.
    pub async fn valuation(&self, portfolio_id: Uuid) -> Result<PortfolioValuation, CoreError> {
        let portfolio = self.store.get_portfolio(portfolio_id)?;
        let tickers = portfolio.tickers();

        let prices = self.price_service.fetch_current_prices(&tickers).await;
        let mut holdings = Vec::with_capacity(portfolio.holdings.len());
        for (holding, (_, price)) in portfolio.holdings.into_iter().zip(prices) {
            let price = match price {
                Ok(price) => Some(price),
                Err(e) if e.is_ticker_scoped() => None,
                Err(e) => return Err(e),
            };
            holdings.push(holding.with_price(price));
        }

        let valuation = self.valuation_service.aggregate(&holdings)?;
        log::info!(
            "Valued portfolio {portfolio_id}: {} of {} holdings priced, total {}",
            valuation.priced_count,
            valuation.holding_count(),
            valuation.total_value
        );
        Ok(valuation)
    }

    // ── Recommendations ─────────────────────────────────────────────

    /// Recommend how to deploy `available_cash` across the portfolio's
    /// tickers, using highs as of today.
    pub async fn recommend(
        &self,
        portfolio_id: Uuid,
        available_cash: Decimal,
    ) -> Result<RecommendationReport, CoreError> {
        let today = chrono::Utc::now().date_naive();
        self.recommend_as_of(portfolio_id, available_cash, today).await
    }

    /// Same as `recommend`, with highs measured back from `as_of`.
    pub async fn recommend_as_of(
        &self,
        portfolio_id: Uuid,
        available_cash: Decimal,
        as_of: NaiveDate,
    ) -> Result<RecommendationReport, CoreError> {
        if available_cash < Decimal::ZERO {
            return Err(CoreError::InvalidAllocationInput(format!(
                "available cash must not be negative, got {available_cash}"
            )));
        }

        let portfolio = self.store.get_portfolio(portfolio_id)?;
        let mut seen = HashSet::new();
        let mut tickers = portfolio.tickers();
        tickers.retain(|t| seen.insert(t.clone()));

        let profiles = self
            .price_service
            .fetch_profiles(&tickers, as_of, &self.settings.lookback)
            .await;

        self.recommendation_service
            .recommend_from_profiles(available_cash, profiles)
    }

    // ── Settings ────────────────────────────────────────────────────

    #[must_use]
    pub fn get_settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace scoring settings. Providers are left as they are.
    pub fn set_settings(&mut self, settings: Settings) -> Result<(), CoreError> {
        settings.validate()?;
        self.recommendation_service = RecommendationService::new(&settings);
        self.settings = settings;
        Ok(())
    }

    /// Set an API key for a provider (e.g., "fmp").
    /// Rebuilds the default provider registry so the new key takes effect immediately.
    pub fn set_api_key(&mut self, provider: String, key: String) {
        self.settings.api_keys.insert(provider, key);
        let registry = MarketDataRegistry::new_with_defaults(&self.settings);
        self.price_service = PriceService::new(registry);
    }

    /// Remove an API key for a provider.
    /// Rebuilds the default provider registry so the removal takes effect immediately.
    pub fn remove_api_key(&mut self, provider: &str) -> bool {
        let removed = self.settings.api_keys.remove(provider).is_some();
        if removed {
            let registry = MarketDataRegistry::new_with_defaults(&self.settings);
            self.price_service = PriceService::new(registry);
        }
        removed
    }

    // ── Provider Availability ───────────────────────────────────────

    #[must_use]
    pub fn is_provider_available(&self) -> bool {
        self.price_service.has_provider()
    }

    #[must_use]
    pub fn get_provider_names(&self) -> Vec<String> {
        self.price_service.provider_names()
    }

    #[must_use]
    pub fn store(&self) -> &dyn PortfolioStore {
        self.store.as_ref()
    }
}
