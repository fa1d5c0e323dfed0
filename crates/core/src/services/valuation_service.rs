use rust_decimal::Decimal;

use crate::errors::CoreError;
use crate::models::holding::Holding;
use crate::models::valuation::{HoldingValuation, PortfolioValuation};

/// Derives value and profit/loss from cost basis and live price.
///
/// Pure: no I/O. Nothing derived here is ever stored; every call recomputes
/// from `shares`, `average_price` and `current_price`.
pub struct ValuationService;

impl ValuationService {
    pub fn new() -> Self {
        Self
    }

    /// Value one holding. Fails with `InvalidHolding` when the cost basis is
    /// not positive or shares are negative.
    ///
    /// Without a live price the derived fields are `None`.
    pub fn valuate(&self, holding: &Holding) -> Result<HoldingValuation, CoreError> {
        holding.validate()?;

        let (value, pl_dollar, pl_percent) = match holding.current_price {
            Some(price) => {
                let diff = price - holding.average_price;
                (
                    Some(holding.shares * price),
                    Some(holding.shares * diff),
                    Some(diff / holding.average_price * Decimal::ONE_HUNDRED),
                )
            }
            None => (None, None, None),
        };

        Ok(HoldingValuation {
            ticker: holding.ticker.clone(),
            shares: holding.shares,
            average_price: holding.average_price,
            current_price: holding.current_price,
            value,
            pl_dollar,
            pl_percent,
        })
    }

    /// Value every holding and sum the totals.
    ///
    /// Unpriced holdings contribute nothing: neither value, P/L, nor cost
    /// basis to the percentage denominator.
    pub fn aggregate(&self, holdings: &[Holding]) -> Result<PortfolioValuation, CoreError> {
        let mut valuations = Vec::with_capacity(holdings.len());
        let mut total_value = Decimal::ZERO;
        let mut total_pl = Decimal::ZERO;
        let mut priced_cost_basis = Decimal::ZERO;
        let mut priced_count = 0;

        for holding in holdings {
            let valuation = self.valuate(holding)?;
            if let (Some(value), Some(pl)) = (valuation.value, valuation.pl_dollar) {
                total_value += value;
                total_pl += pl;
                priced_cost_basis += holding.cost_basis();
                priced_count += 1;
            }
            valuations.push(valuation);
        }

        let total_pl_percent = if priced_cost_basis.is_zero() {
            Decimal::ZERO
        } else {
            total_pl / priced_cost_basis * Decimal::ONE_HUNDRED
        };

        Ok(PortfolioValuation {
            holdings: valuations,
            total_value,
            total_pl,
            total_pl_percent,
            priced_count,
        })
    }
}

impl Default for ValuationService {
    fn default() -> Self {
        Self::new()
    }
}
