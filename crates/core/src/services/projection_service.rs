use rust_decimal::Decimal;

use crate::models::allocation::{AllocationPlan, ProjectedAllocation, ProjectedPortfolio};

/// Builds the post-purchase allocation breakdown shown next to a plan.
///
/// Only new purchases are projected; existing holdings are not mixed in.
/// Lines buying zero shares are dropped rather than shown at 0%.
pub struct ProjectionBuilder;

impl ProjectionBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn project(&self, plan: &AllocationPlan) -> ProjectedPortfolio {
        let total_value: Decimal = plan.purchases().map(|l| l.investment_amount).sum();
        if total_value <= Decimal::ZERO {
            return ProjectedPortfolio::default();
        }

        let mut allocations: Vec<ProjectedAllocation> = plan
            .purchases()
            .map(|l| ProjectedAllocation {
                ticker: l.ticker.clone(),
                value: l.investment_amount,
                percentage: l.investment_amount / total_value * Decimal::ONE_HUNDRED,
            })
            .collect();

        // Largest first; ticker keeps equal weights in a stable order
        allocations.sort_by(|a, b| {
            b.percentage
                .cmp(&a.percentage)
                .then_with(|| a.ticker.cmp(&b.ticker))
        });

        ProjectedPortfolio {
            total_value,
            allocations,
        }
    }
}

impl Default for ProjectionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
