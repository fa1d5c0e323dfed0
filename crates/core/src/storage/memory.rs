use std::collections::HashMap;
use uuid::Uuid;

use super::traits::PortfolioStore;
use crate::errors::CoreError;
use crate::models::portfolio::Portfolio;

/// Portfolio store backed by a `HashMap`. Used by tests and by embedders
/// that keep their portfolios in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPortfolioStore {
    portfolios: HashMap<Uuid, Portfolio>,
}

impl InMemoryPortfolioStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a portfolio. Returns its id.
    pub fn insert(&mut self, portfolio: Portfolio) -> Uuid {
        let id = portfolio.id;
        self.portfolios.insert(id, portfolio);
        id
    }

    pub fn remove(&mut self, id: Uuid) -> Option<Portfolio> {
        self.portfolios.remove(&id)
    }

    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut Portfolio> {
        self.portfolios.get_mut(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.portfolios.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.portfolios.is_empty()
    }
}

impl PortfolioStore for InMemoryPortfolioStore {
    fn get_portfolio(&self, id: Uuid) -> Result<Portfolio, CoreError> {
        self.portfolios
            .get(&id)
            .cloned()
            .ok_or(CoreError::PortfolioNotFound(id))
    }

    fn list_portfolio_ids(&self) -> Vec<Uuid> {
        let mut ids: Vec<Uuid> = self.portfolios.keys().copied().collect();
        ids.sort();
        ids
    }
}
