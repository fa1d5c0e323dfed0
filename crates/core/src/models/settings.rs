use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::CoreError;

/// Dip percentages a ticker must strictly exceed to qualify on each timeframe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DipThresholds {
    pub yearly: Decimal,
    pub monthly: Decimal,
    pub weekly: Decimal,
}

impl Default for DipThresholds {
    fn default() -> Self {
        Self {
            yearly: dec!(10),
            monthly: dec!(5),
            weekly: dec!(2),
        }
    }
}

/// Weights of the composite score (yearly/monthly/weekly).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub yearly: Decimal,
    pub monthly: Decimal,
    pub weekly: Decimal,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            yearly: dec!(0.5),
            monthly: dec!(0.3),
            weekly: dec!(0.2),
        }
    }
}

/// Largest accepted score weight.
pub const MAX_SCORE_WEIGHT: Decimal = Decimal::ONE_THOUSAND;

/// Longest accepted lookback window, in days.
pub const MAX_LOOKBACK_DAYS: u32 = 3650;

/// How many calendar days of daily history feed each timeframe's high.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookbackWindows {
    pub yearly_days: u32,
    pub monthly_days: u32,
    pub weekly_days: u32,
}

impl Default for LookbackWindows {
    fn default() -> Self {
        Self {
            yearly_days: 365,
            monthly_days: 30,
            weekly_days: 7,
        }
    }
}

/// User-configurable settings for scoring and market data access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub thresholds: DipThresholds,

    pub weights: ScoreWeights,

    pub lookback: LookbackWindows,

    /// Optional API keys for providers that require them.
    /// Keys: provider name (e.g., "fmp").
    pub api_keys: HashMap<String, String>,

    /// Timeout applied to every provider HTTP request.
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            thresholds: DipThresholds::default(),
            weights: ScoreWeights::default(),
            lookback: LookbackWindows::default(),
            api_keys: HashMap::new(),
            request_timeout_secs: 10,
        }
    }
}

impl Settings {
    /// Parse settings from JSON. Missing fields take their defaults.
    /// The result is validated before it is returned.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize settings: {e}")))
    }

    /// Reject configurations the scorer cannot work with.
    pub fn validate(&self) -> Result<(), CoreError> {
        let t = &self.thresholds;
        if t.yearly.is_sign_negative() || t.monthly.is_sign_negative() || t.weekly.is_sign_negative()
        {
            return Err(CoreError::ValidationError(
                "Dip thresholds must not be negative".into(),
            ));
        }

        let w = &self.weights;
        if w.yearly.is_sign_negative() || w.monthly.is_sign_negative() || w.weekly.is_sign_negative()
        {
            return Err(CoreError::ValidationError(
                "Score weights must not be negative".into(),
            ));
        }
        if w.yearly.max(w.monthly).max(w.weekly) > MAX_SCORE_WEIGHT {
            return Err(CoreError::ValidationError(format!(
                "Score weights must not exceed {MAX_SCORE_WEIGHT}"
            )));
        }
        if (w.yearly + w.monthly + w.weekly).is_zero() {
            return Err(CoreError::ValidationError(
                "At least one score weight must be positive".into(),
            ));
        }

        let l = &self.lookback;
        if l.yearly_days == 0 || l.monthly_days == 0 || l.weekly_days == 0 {
            return Err(CoreError::ValidationError(
                "Lookback windows must be at least one day".into(),
            ));
        }
        if l.yearly_days.max(l.monthly_days).max(l.weekly_days) > MAX_LOOKBACK_DAYS {
            return Err(CoreError::ValidationError(format!(
                "Lookback windows must not exceed {MAX_LOOKBACK_DAYS} days"
            )));
        }

        if self.request_timeout_secs == 0 {
            return Err(CoreError::ValidationError(
                "Request timeout must be at least one second".into(),
            ));
        }

        Ok(())
    }
}
