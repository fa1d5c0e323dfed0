use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::portfolio::Portfolio;

/// Read-only access to stored portfolios.
///
/// Durable persistence lives outside this crate; embedders implement this
/// trait over their database and hand it to `DipPlanner`.
pub trait PortfolioStore: Send + Sync {
    /// Snapshot of a portfolio and its holdings.
    fn get_portfolio(&self, id: Uuid) -> Result<Portfolio, CoreError>;

    /// Ids of every stored portfolio.
    fn list_portfolio_ids(&self) -> Vec<Uuid>;
}
