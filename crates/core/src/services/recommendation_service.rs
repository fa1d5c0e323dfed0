use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::errors::CoreError;
use crate::models::price::PriceProfile;
use crate::models::recommendation::{ExcludedTicker, Recommendation, RecommendationReport};
use crate::models::settings::Settings;
use crate::models::signal::DipSignal;
use crate::services::allocation_planner::AllocationPlanner;
use crate::services::dip_scorer::DipScorer;
use crate::services::projection_service::ProjectionBuilder;

/// Runs score → allocate → project over already-fetched price data.
///
/// Ticker-scoped failures (see `CoreError::is_ticker_scoped`) end up in
/// `RecommendationReport::excluded`. Any other error, or a negative cash
/// amount, aborts the whole request.
pub struct RecommendationService {
    scorer: DipScorer,
    planner: AllocationPlanner,
    projector: ProjectionBuilder,
}

impl RecommendationService {
    pub fn new(settings: &Settings) -> Self {
        Self {
            scorer: DipScorer::new(settings),
            planner: AllocationPlanner::new(),
            projector: ProjectionBuilder::new(),
        }
    }

    pub fn recommend_from_profiles(
        &self,
        available_cash: Decimal,
        profiles: Vec<(String, Result<PriceProfile, CoreError>)>,
    ) -> Result<RecommendationReport, CoreError> {
        let requested_count = profiles.len();
        if available_cash < Decimal::ZERO {
            return Err(CoreError::InvalidAllocationInput(format!(
                "available cash must not be negative, got {available_cash}"
            )));
        }

        let mut excluded = Vec::new();
        let mut signals: Vec<DipSignal> = Vec::new();
        let mut prices: HashMap<String, Decimal> = HashMap::new();

        for (ticker, result) in profiles {
            let error = match result.and_then(|profile| {
                self.scorer
                    .score(&ticker, &profile)
                    .map(|signal| (signal, profile.current_price))
            }) {
                Ok((signal, price)) => {
                    prices.insert(ticker, price);
                    signals.push(signal);
                    continue;
                }
                Err(e) if e.is_ticker_scoped() => e,
                Err(e) => return Err(e),
            };

            let reason = error.to_string();
            log::warn!("Excluding {ticker} from recommendations: {reason}");
            excluded.push(ExcludedTicker { ticker, reason });
        }

        let scored_count = signals.len();
        let candidates: Vec<DipSignal> = signals.into_iter().filter(|s| s.is_candidate()).collect();

        let plan = self.planner.allocate(available_cash, &candidates, &prices)?;
        let projected_portfolio = self.projector.project(&plan);

        let by_ticker: HashMap<&str, &DipSignal> =
            candidates.iter().map(|s| (s.ticker.as_str(), s)).collect();
        let recommendations = plan
            .lines
            .iter()
            .filter_map(|line| {
                let signal = by_ticker.get(line.ticker.as_str())?;
                Some(Recommendation {
                    ticker: line.ticker.clone(),
                    shares_to_buy: line.shares_to_buy,
                    investment_amount: line.investment_amount,
                    current_price: line.price,
                    timeframe: signal.timeframe,
                    dip_percent: signal.dip_percent,
                })
            })
            .collect();

        let report = RecommendationReport {
            recommendations,
            remaining_cash: plan.remaining_cash,
            projected_portfolio,
            scored_count,
            requested_count,
            excluded,
        };
        log::info!(
            "Recommendation: {}, {} candidates, {} remaining",
            report.coverage(),
            candidates.len(),
            report.remaining_cash
        );
        Ok(report)
    }
}

impl Default for RecommendationService {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}
