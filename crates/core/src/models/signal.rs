use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The timeframe whose dip threshold a ticker cleared, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Yearly,
    Monthly,
    Weekly,
    /// No threshold met; the ticker is not a buy candidate.
    None,
}

impl Timeframe {
    #[must_use]
    pub fn qualifies(&self) -> bool {
        !matches!(self, Timeframe::None)
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Timeframe::Yearly => write!(f, "yearly"),
            Timeframe::Monthly => write!(f, "monthly"),
            Timeframe::Weekly => write!(f, "weekly"),
            Timeframe::None => write!(f, "none"),
        }
    }
}

/// Clamped dip percentages on each timeframe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DipBreakdown {
    pub yearly: Decimal,
    pub monthly: Decimal,
    pub weekly: Decimal,
}

/// Classified dip for one ticker. Lives only for the duration of one
/// recommendation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DipSignal {
    pub ticker: String,

    /// Label used for user-facing explanation
    pub timeframe: Timeframe,

    /// Dip on the classified timeframe (0 when `timeframe` is `None`)
    pub dip_percent: Decimal,

    /// Weighted sum of all three dips; only used to rank candidates
    pub composite_score: Decimal,

    pub dips: DipBreakdown,
}

impl DipSignal {
    #[must_use]
    pub fn is_candidate(&self) -> bool {
        self.timeframe.qualifies()
    }
}
