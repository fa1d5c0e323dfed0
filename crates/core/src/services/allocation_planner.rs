use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};

use crate::errors::CoreError;
use crate::models::allocation::{AllocationLine, AllocationPlan};
use crate::models::signal::DipSignal;

/// Candidate with the price it will be bought at, in rank order.
#[derive(Debug, Clone)]
struct RankedCandidate {
    ticker: String,
    score: Decimal,
    price: Decimal,
}

/// Splits available cash across dip candidates in whole shares.
///
/// Two phases, both pure:
/// 1. **proportional**: each candidate gets `cash × score / Σ score`, rounded
///    down to whole shares.
/// 2. **remainder fill**: leftover cash buys one more share at a time,
///    sweeping candidates in rank order until a sweep buys nothing.
///
/// Every purchase is subtracted from a running remainder, so
/// `Σ investment_amount + remaining_cash == available_cash` holds exactly.
pub struct AllocationPlanner;

impl AllocationPlanner {
    pub fn new() -> Self {
        Self
    }

    /// Build a plan. `candidates` should already exclude `Timeframe::None`;
    /// any that slip through are ignored. Candidates without an entry in
    /// `prices` are skipped.
    pub fn allocate(
        &self,
        available_cash: Decimal,
        candidates: &[DipSignal],
        prices: &HashMap<String, Decimal>,
    ) -> Result<AllocationPlan, CoreError> {
        if available_cash < Decimal::ZERO {
            return Err(CoreError::InvalidAllocationInput(format!(
                "available cash must not be negative, got {available_cash}"
            )));
        }
        if available_cash.is_zero() {
            return Ok(AllocationPlan::empty(Decimal::ZERO));
        }

        let ranked = Self::rank(candidates, prices)?;
        if ranked.is_empty() {
            return Ok(AllocationPlan::empty(available_cash));
        }

        let (shares, leftover) = Self::proportional_pass(available_cash, &ranked)?;
        let (shares, leftover) = Self::remainder_fill(&ranked, shares, leftover);

        let lines: Vec<AllocationLine> = ranked
            .iter()
            .zip(shares)
            .map(|(c, n)| AllocationLine {
                ticker: c.ticker.clone(),
                shares_to_buy: n,
                price: c.price,
                investment_amount: Decimal::from(n) * c.price,
            })
            .collect();

        let plan = AllocationPlan {
            available_cash,
            lines,
            remaining_cash: leftover,
        };
        log::info!(
            "Allocated {} of {} across {} candidates ({} left over)",
            plan.total_invested(),
            available_cash,
            plan.lines.len(),
            plan.remaining_cash
        );
        Ok(plan)
    }

    /// Order by composite score descending, ties broken alphabetically.
    fn rank(
        candidates: &[DipSignal],
        prices: &HashMap<String, Decimal>,
    ) -> Result<Vec<RankedCandidate>, CoreError> {
        let mut ranked = Vec::with_capacity(candidates.len());
        for signal in candidates.iter().filter(|s| s.is_candidate()) {
            let Some(&price) = prices.get(&signal.ticker) else {
                log::warn!("{}: no price for allocation, skipping", signal.ticker);
                continue;
            };
            if price <= Decimal::ZERO {
                return Err(CoreError::InvalidPriceData {
                    ticker: signal.ticker.clone(),
                    message: format!("allocation price must be positive, got {price}"),
                });
            }
            ranked.push(RankedCandidate {
                ticker: signal.ticker.clone(),
                score: signal.composite_score,
                price,
            });
        }

        ranked.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.ticker.cmp(&b.ticker)));

        // A ticker listed twice keeps only its best-ranked entry.
        let mut seen = HashSet::new();
        ranked.retain(|c| seen.insert(c.ticker.clone()));
        Ok(ranked)
    }

    /// Phase 1. Returns shares per candidate and the cash left unspent.
    fn proportional_pass(
        available_cash: Decimal,
        ranked: &[RankedCandidate],
    ) -> Result<(Vec<u64>, Decimal), CoreError> {
        let sum_scores: Decimal = ranked.iter().map(|c| c.score).sum();
        // All-zero scores (only possible with custom weights) split evenly.
        let even = sum_scores <= Decimal::ZERO;

        let mut leftover = available_cash;
        let mut shares = Vec::with_capacity(ranked.len());
        for c in ranked {
            let budget = if even {
                available_cash / Decimal::from(ranked.len())
            } else {
                available_cash
                    .checked_mul(c.score)
                    .map(|v| v / sum_scores)
                    .ok_or_else(|| {
                        CoreError::InvalidAllocationInput(format!(
                            "budget for {} overflows",
                            c.ticker
                        ))
                    })?
            };

            // Never exceed the running remainder, whatever the rounding of `budget`.
            let affordable = budget.min(leftover);
            let count = affordable
                .checked_div(c.price)
                .map(|n| n.floor())
                .ok_or_else(|| {
                    CoreError::InvalidAllocationInput(format!(
                        "share count for {} overflows at price {}",
                        c.ticker, c.price
                    ))
                })?;
            let count = count.to_u64().ok_or_else(|| {
                CoreError::InvalidAllocationInput(format!(
                    "share count for {} out of range: {count}",
                    c.ticker
                ))
            })?;

            leftover -= Decimal::from(count) * c.price;
            shares.push(count);
        }
        Ok((shares, leftover))
    }

    /// Phase 2. Greedy one-share sweeps in rank order.
    fn remainder_fill(
        ranked: &[RankedCandidate],
        mut shares: Vec<u64>,
        mut leftover: Decimal,
    ) -> (Vec<u64>, Decimal) {
        loop {
            let mut bought = false;
            for (i, c) in ranked.iter().enumerate() {
                if leftover >= c.price {
                    shares[i] += 1;
                    leftover -= c.price;
                    bought = true;
                }
            }
            if !bought {
                break;
            }
        }
        (shares, leftover)
    }
}

impl Default for AllocationPlanner {
    fn default() -> Self {
        Self::new()
    }
}
