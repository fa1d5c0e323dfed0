use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Whole-share purchase decided for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationLine {
    pub ticker: String,
    pub shares_to_buy: u64,
    /// Price used for the purchase
    pub price: Decimal,
    /// `shares_to_buy * price`
    pub investment_amount: Decimal,
}

/// Output of the allocation planner, lines in rank order.
///
/// Invariant: `total_invested() + remaining_cash == available_cash`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationPlan {
    pub available_cash: Decimal,
    pub lines: Vec<AllocationLine>,
    pub remaining_cash: Decimal,
}

impl AllocationPlan {
    /// A plan that buys nothing and keeps all the cash.
    pub fn empty(available_cash: Decimal) -> Self {
        Self {
            available_cash,
            lines: Vec::new(),
            remaining_cash: available_cash,
        }
    }

    #[must_use]
    pub fn total_invested(&self) -> Decimal {
        self.lines.iter().map(|l| l.investment_amount).sum()
    }

    #[must_use]
    pub fn get_line(&self, ticker: &str) -> Option<&AllocationLine> {
        self.lines.iter().find(|l| l.ticker == ticker)
    }

    /// Lines that actually buy something.
    pub fn purchases(&self) -> impl Iterator<Item = &AllocationLine> {
        self.lines.iter().filter(|l| l.shares_to_buy > 0)
    }
}

/// One ticker's share of the post-purchase allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedAllocation {
    pub ticker: String,
    pub value: Decimal,
    pub percentage: Decimal,
}

/// Presentation view of what the plan buys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPortfolio {
    pub total_value: Decimal,
    /// Sorted by percentage, largest first
    pub allocations: Vec<ProjectedAllocation>,
}
