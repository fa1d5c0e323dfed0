use super::fmp::FmpProvider;
use super::traits::MarketDataProvider;
#[cfg(not(target_arch = "wasm32"))]
use super::yahoo_finance::YahooFinanceProvider;
use crate::models::settings::Settings;

/// Ordered list of market data providers.
///
/// The first registered provider is the primary; later ones are fallbacks
/// tried in registration order when an earlier one fails.
pub struct MarketDataRegistry {
    providers: Vec<Box<dyn MarketDataProvider>>,
}

impl MarketDataRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Create a registry with all default providers pre-configured.
    pub fn new_with_defaults(settings: &Settings) -> Self {
        let mut registry = Self::new();

        // Yahoo Finance: no API key needed, primary.
        // Not available on WASM (uses native reqwest/tokio connectors)
        #[cfg(not(target_arch = "wasm32"))]
        {
            match YahooFinanceProvider::new() {
                Ok(yahoo) => registry.register(Box::new(yahoo)),
                Err(e) => log::warn!("Yahoo Finance provider unavailable: {e}"),
            }
        }

        // Financial Modeling Prep: needs an API key, fallback.
        if let Some(key) = settings.api_keys.get("fmp") {
            registry.register(Box::new(FmpProvider::new(
                key.clone(),
                settings.request_timeout_secs,
            )));
        }

        registry
    }

    /// Register a provider at the lowest priority.
    pub fn register(&mut self, provider: Box<dyn MarketDataProvider>) {
        log::debug!("Registered market data provider: {}", provider.name());
        self.providers.push(provider);
    }

    /// All providers in priority order.
    pub fn providers(&self) -> Vec<&dyn MarketDataProvider> {
        self.providers.iter().map(|p| p.as_ref()).collect()
    }

    #[must_use]
    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }
}

impl Default for MarketDataRegistry {
    fn default() -> Self {
        Self::new()
    }
}
