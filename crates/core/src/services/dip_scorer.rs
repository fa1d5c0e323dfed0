use rust_decimal::Decimal;

use crate::errors::CoreError;
use crate::models::price::PriceProfile;
use crate::models::settings::{DipThresholds, ScoreWeights, Settings};
use crate::models::signal::{DipBreakdown, DipSignal, Timeframe};

/// Turns a ticker's price profile into a classified, weighted dip signal.
///
/// Two independent roles:
/// - **gating** (`classify`): strict precedence yearly → monthly → weekly,
///   decides whether the ticker is a candidate and which label it gets.
/// - **ranking** (`composite_score`): weighted sum of all three dips, used
///   only to order candidates against each other.
pub struct DipScorer {
    thresholds: DipThresholds,
    weights: ScoreWeights,
}

impl DipScorer {
    pub fn new(settings: &Settings) -> Self {
        Self {
            thresholds: settings.thresholds.clone(),
            weights: settings.weights.clone(),
        }
    }

    /// Percent drop of `current` below `high`, clamped at zero.
    /// A price above the high is simply no dip.
    #[must_use]
    pub fn dip_percent(high: Decimal, current: Decimal) -> Decimal {
        if high <= Decimal::ZERO || current >= high {
            return Decimal::ZERO;
        }
        high.checked_sub(current)
            .and_then(|gap| gap.checked_div(high))
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .unwrap_or(Decimal::ZERO)
    }

    /// Clamped dips on all three timeframes.
    #[must_use]
    pub fn dips(profile: &PriceProfile) -> DipBreakdown {
        DipBreakdown {
            yearly: Self::dip_percent(profile.yearly_high, profile.current_price),
            monthly: Self::dip_percent(profile.monthly_high, profile.current_price),
            weekly: Self::dip_percent(profile.weekly_high, profile.current_price),
        }
    }

    /// First timeframe (yearly, then monthly, then weekly) whose dip strictly
    /// exceeds its threshold, with that dip. Magnitude never reorders the checks.
    #[must_use]
    pub fn classify(&self, dips: &DipBreakdown) -> (Timeframe, Decimal) {
        if dips.yearly > self.thresholds.yearly {
            (Timeframe::Yearly, dips.yearly)
        } else if dips.monthly > self.thresholds.monthly {
            (Timeframe::Monthly, dips.monthly)
        } else if dips.weekly > self.thresholds.weekly {
            (Timeframe::Weekly, dips.weekly)
        } else {
            (Timeframe::None, Decimal::ZERO)
        }
    }

    #[must_use]
    pub fn composite_score(&self, dips: &DipBreakdown) -> Decimal {
        self.weights.yearly * dips.yearly
            + self.weights.monthly * dips.monthly
            + self.weights.weekly * dips.weekly
    }

    /// Score one ticker. Fails with `InvalidPriceData` when any profile field
    /// is not strictly positive.
    pub fn score(&self, ticker: &str, profile: &PriceProfile) -> Result<DipSignal, CoreError> {
        profile.validate(ticker)?;

        let dips = Self::dips(profile);
        let (timeframe, dip_percent) = self.classify(&dips);
        let composite_score = self.composite_score(&dips);

        log::debug!(
            "{ticker}: dips y={} m={} w={} -> {timeframe} (score {composite_score})",
            dips.yearly.round_dp(2),
            dips.monthly.round_dp(2),
            dips.weekly.round_dp(2),
        );

        Ok(DipSignal {
            ticker: ticker.to_string(),
            timeframe,
            dip_percent,
            composite_score,
            dips,
        })
    }
}

impl Default for DipScorer {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}
