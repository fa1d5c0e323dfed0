// ═══════════════════════════════════════════════════════════════════
// Model Tests — Holding, Portfolio, PriceProfile, Settings, signals,
// allocation plans, valuation and report types
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use dip_planner_core::errors::CoreError;
use dip_planner_core::models::allocation::{
    AllocationLine, AllocationPlan, ProjectedAllocation, ProjectedPortfolio,
};
use dip_planner_core::models::holding::{normalize_ticker, Holding};
use dip_planner_core::models::portfolio::Portfolio;
use dip_planner_core::models::price::{PriceBar, PriceProfile};
use dip_planner_core::models::recommendation::{
    ExcludedTicker, Recommendation, RecommendationReport,
};
use dip_planner_core::models::settings::{
    LookbackWindows, Settings, MAX_LOOKBACK_DAYS, MAX_SCORE_WEIGHT,
};
use dip_planner_core::models::signal::Timeframe;
use dip_planner_core::models::valuation::{HoldingValuation, PortfolioValuation};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

// ═══════════════════════════════════════════════════════════════════
// Tickers & Holdings
// ═══════════════════════════════════════════════════════════════════

mod ticker {
    use super::*;

    #[test]
    fn uppercases_and_trims() {
        assert_eq!(normalize_ticker("  aapl ").unwrap(), "AAPL");
    }

    #[test]
    fn accepts_digits() {
        assert_eq!(normalize_ticker("brk1").unwrap(), "BRK1");
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(normalize_ticker(""), Err(CoreError::InvalidHolding(_))));
        assert!(matches!(normalize_ticker("   "), Err(CoreError::InvalidHolding(_))));
    }

    #[test]
    fn rejects_too_long() {
        assert!(normalize_ticker("GOOGL").is_ok());
        assert!(normalize_ticker("GOOGLE").is_err());
    }

    #[test]
    fn rejects_punctuation() {
        assert!(normalize_ticker("BRK.B").is_err());
        assert!(normalize_ticker("A-B").is_err());
    }
}

mod holding {
    use super::*;

    #[test]
    fn new_normalizes_ticker() {
        let h = Holding::new("msft", dec!(3), dec!(310.5)).unwrap();
        assert_eq!(h.ticker, "MSFT");
        assert_eq!(h.current_price, None);
    }

    #[test]
    fn zero_cost_basis_rejected() {
        let err = Holding::new("AAPL", dec!(1), Decimal::ZERO).unwrap_err();
        assert!(matches!(err, CoreError::InvalidHolding(_)));
    }

    #[test]
    fn negative_cost_basis_rejected() {
        assert!(Holding::new("AAPL", dec!(1), dec!(-5)).is_err());
    }

    #[test]
    fn negative_shares_rejected() {
        assert!(Holding::new("AAPL", dec!(-1), dec!(100)).is_err());
    }

    #[test]
    fn zero_shares_allowed() {
        assert!(Holding::new("AAPL", Decimal::ZERO, dec!(100)).is_ok());
    }

    #[test]
    fn negative_current_price_fails_validation() {
        let h = Holding::new("AAPL", dec!(1), dec!(100))
            .unwrap()
            .with_price(Some(dec!(-1)));
        assert!(h.validate().is_err());
    }

    #[test]
    fn cost_basis() {
        let h = Holding::new("AAPL", dec!(2.5), dec!(40)).unwrap();
        assert_eq!(h.cost_basis(), dec!(100));
    }

    #[test]
    fn merge_purchase_weighted_average() {
        let mut h = Holding::new("AAPL", dec!(10), dec!(100)).unwrap();
        h.merge_purchase(dec!(10), dec!(200)).unwrap();
        assert_eq!(h.shares, dec!(20));
        assert_eq!(h.average_price, dec!(150));
    }

    #[test]
    fn merge_purchase_uneven_lots() {
        let mut h = Holding::new("AAPL", dec!(3), dec!(10)).unwrap();
        h.merge_purchase(dec!(1), dec!(30)).unwrap();
        assert_eq!(h.shares, dec!(4));
        assert_eq!(h.average_price, dec!(15));
    }

    #[test]
    fn merge_purchase_rejects_bad_input() {
        let mut h = Holding::new("AAPL", dec!(3), dec!(10)).unwrap();
        assert!(h.merge_purchase(Decimal::ZERO, dec!(10)).is_err());
        assert!(h.merge_purchase(dec!(1), Decimal::ZERO).is_err());
        assert_eq!(h.shares, dec!(3));
        assert_eq!(h.average_price, dec!(10));
    }

    #[test]
    fn serde_without_current_price() {
        let json = r#"{"ticker":"AAPL","shares":2.0,"average_price":150.0}"#;
        let h: Holding = serde_json::from_str(json).unwrap();
        assert_eq!(h.ticker, "AAPL");
        assert_eq!(h.shares, dec!(2));
        assert_eq!(h.current_price, None);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Portfolio
// ═══════════════════════════════════════════════════════════════════

mod portfolio {
    use super::*;

    #[test]
    fn new_portfolio_is_empty_with_unique_id() {
        let a = Portfolio::new("Growth");
        let b = Portfolio::new("Growth");
        assert!(a.holdings.is_empty());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn add_new_holding() {
        let mut p = Portfolio::new("Main");
        p.add_holding("aapl", dec!(5), dec!(150)).unwrap();
        assert_eq!(p.holdings.len(), 1);
        assert_eq!(p.holdings[0].ticker, "AAPL");
    }

    #[test]
    fn add_existing_ticker_merges() {
        let mut p = Portfolio::new("Main");
        p.add_holding("AAPL", dec!(10), dec!(100)).unwrap();
        let merged = p.add_holding("aapl", dec!(30), dec!(200)).unwrap();
        assert_eq!(merged.shares, dec!(40));
        assert_eq!(merged.average_price, dec!(175));
        assert_eq!(p.holdings.len(), 1);
    }

    #[test]
    fn add_rejects_non_positive_shares() {
        let mut p = Portfolio::new("Main");
        assert!(p.add_holding("AAPL", Decimal::ZERO, dec!(100)).is_err());
        assert!(p.add_holding("AAPL", dec!(-2), dec!(100)).is_err());
        assert!(p.holdings.is_empty());
    }

    #[test]
    fn add_rejects_bad_ticker() {
        let mut p = Portfolio::new("Main");
        assert!(p.add_holding("TOOLONG", dec!(1), dec!(1)).is_err());
    }

    #[test]
    fn remove_holding_case_insensitive() {
        let mut p = Portfolio::new("Main");
        p.add_holding("MSFT", dec!(1), dec!(300)).unwrap();
        let removed = p.remove_holding("msft").unwrap();
        assert_eq!(removed.ticker, "MSFT");
        assert!(p.remove_holding("MSFT").is_none());
    }

    #[test]
    fn tickers_in_insertion_order() {
        let mut p = Portfolio::new("Main");
        p.add_holding("MSFT", dec!(1), dec!(300)).unwrap();
        p.add_holding("AAPL", dec!(1), dec!(150)).unwrap();
        assert_eq!(p.tickers(), vec!["MSFT".to_string(), "AAPL".to_string()]);
        assert!(p.get_holding("aapl").is_some());
    }
}

// ═══════════════════════════════════════════════════════════════════
// PriceProfile
// ═══════════════════════════════════════════════════════════════════

mod price_profile {
    use super::*;

    fn bar(d: &str, high: Decimal) -> PriceBar {
        PriceBar {
            date: date(d),
            high,
            close: high,
        }
    }

    #[test]
    fn from_history_picks_window_maxima() {
        let bars = vec![
            bar("2024-09-01", dec!(200)), // yearly only
            bar("2025-06-10", dec!(180)), // monthly
            bar("2025-06-28", dec!(170)), // weekly
        ];
        let profile = PriceProfile::from_history(
            dec!(150),
            &bars,
            date("2025-06-30"),
            &LookbackWindows::default(),
        );
        assert_eq!(profile.current_price, dec!(150));
        assert_eq!(profile.yearly_high, dec!(200));
        assert_eq!(profile.monthly_high, dec!(180));
        assert_eq!(profile.weekly_high, dec!(170));
    }

    #[test]
    fn from_history_cutoff_is_inclusive() {
        // 2025-06-23 is exactly 7 days before 2025-06-30
        let bars = vec![bar("2025-06-23", dec!(175))];
        let profile = PriceProfile::from_history(
            dec!(150),
            &bars,
            date("2025-06-30"),
            &LookbackWindows::default(),
        );
        assert_eq!(profile.weekly_high, dec!(175));
    }

    #[test]
    fn from_history_ignores_bars_outside_windows() {
        let bars = vec![
            bar("2023-01-01", dec!(999)), // older than a year
            bar("2025-07-05", dec!(888)), // after as_of
        ];
        let profile = PriceProfile::from_history(
            dec!(150),
            &bars,
            date("2025-06-30"),
            &LookbackWindows::default(),
        );
        assert_eq!(profile.yearly_high, dec!(150));
    }

    #[test]
    fn empty_history_falls_back_to_current_price() {
        let profile = PriceProfile::from_history(
            dec!(42),
            &[],
            date("2025-06-30"),
            &LookbackWindows::default(),
        );
        assert_eq!(profile, PriceProfile::new(dec!(42), dec!(42), dec!(42), dec!(42)));
    }

    #[test]
    fn from_history_with_unbounded_window_uses_all_bars() {
        let lookback = LookbackWindows {
            yearly_days: u32::MAX,
            monthly_days: 30,
            weekly_days: 7,
        };
        let bars = vec![PriceBar {
            date: date("1990-01-02"),
            high: dec!(300),
            close: dec!(290),
        }];
        let profile = PriceProfile::from_history(dec!(100), &bars, date("2025-06-30"), &lookback);
        assert_eq!(profile.yearly_high, dec!(300));
        assert_eq!(profile.monthly_high, dec!(100));
    }

    #[test]
    fn validate_accepts_positive_fields() {
        let p = PriceProfile::new(dec!(1), dec!(2), dec!(3), dec!(4));
        assert!(p.validate("AAPL").is_ok());
    }

    #[test]
    fn validate_accepts_price_above_highs() {
        let p = PriceProfile::new(dec!(500), dec!(100), dec!(100), dec!(100));
        assert!(p.validate("AAPL").is_ok());
    }

    #[test]
    fn validate_rejects_zero_or_negative() {
        let zero_current = PriceProfile::new(Decimal::ZERO, dec!(2), dec!(3), dec!(4));
        let negative_high = PriceProfile::new(dec!(1), dec!(2), dec!(-3), dec!(4));
        assert!(matches!(
            zero_current.validate("AAPL"),
            Err(CoreError::InvalidPriceData { .. })
        ));
        assert!(matches!(
            negative_high.validate("AAPL"),
            Err(CoreError::InvalidPriceData { .. })
        ));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Settings
// ═══════════════════════════════════════════════════════════════════

mod settings {
    use super::*;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.thresholds.yearly, dec!(10));
        assert_eq!(s.thresholds.monthly, dec!(5));
        assert_eq!(s.thresholds.weekly, dec!(2));
        assert_eq!(s.weights.yearly, dec!(0.5));
        assert_eq!(s.weights.monthly, dec!(0.3));
        assert_eq!(s.weights.weekly, dec!(0.2));
        assert_eq!(s.lookback.yearly_days, 365);
        assert_eq!(s.lookback.monthly_days, 30);
        assert_eq!(s.lookback.weekly_days, 7);
        assert_eq!(s.request_timeout_secs, 10);
        assert!(s.api_keys.is_empty());
        assert!(s.validate().is_ok());
    }

    #[test]
    fn from_json_fills_missing_fields() {
        let s = Settings::from_json(r#"{"thresholds": {"yearly": 15}}"#).unwrap();
        assert_eq!(s.thresholds.yearly, dec!(15));
        assert_eq!(s.thresholds.monthly, dec!(5));
        assert_eq!(s.weights, Settings::default().weights);
    }

    #[test]
    fn from_json_reads_api_keys() {
        let s = Settings::from_json(r#"{"api_keys": {"fmp": "secret"}}"#).unwrap();
        assert_eq!(s.api_keys.get("fmp").map(String::as_str), Some("secret"));
    }

    #[test]
    fn from_json_empty_object_is_default() {
        assert_eq!(Settings::from_json("{}").unwrap(), Settings::default());
    }

    #[test]
    fn from_json_rejects_malformed() {
        assert!(matches!(
            Settings::from_json("{"),
            Err(CoreError::Deserialization(_))
        ));
    }

    #[test]
    fn from_json_validates() {
        let err = Settings::from_json(r#"{"weights": {"yearly": -1}}"#).unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
    }

    #[test]
    fn validate_rejects_all_zero_weights() {
        let mut s = Settings::default();
        s.weights.yearly = Decimal::ZERO;
        s.weights.monthly = Decimal::ZERO;
        s.weights.weekly = Decimal::ZERO;
        assert!(s.validate().is_err());
    }

    #[test]
    fn validate_rejects_negative_threshold() {
        let mut s = Settings::default();
        s.thresholds.weekly = dec!(-1);
        assert!(s.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_lookback() {
        let mut s = Settings::default();
        s.lookback.weekly_days = 0;
        assert!(s.validate().is_err());
    }

    #[test]
    fn validate_rejects_huge_weight() {
        let err = Settings::from_json(r#"{"weights": {"monthly": 1e27}}"#).unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));

        let mut s = Settings::default();
        s.weights.yearly = MAX_SCORE_WEIGHT;
        assert!(s.validate().is_ok());
    }

    #[test]
    fn validate_rejects_huge_lookback() {
        let err = Settings::from_json(r#"{"lookback": {"yearly_days": 4000000000}}"#).unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));

        let mut s = Settings::default();
        s.lookback.yearly_days = MAX_LOOKBACK_DAYS;
        assert!(s.validate().is_ok());
        s.lookback.yearly_days = MAX_LOOKBACK_DAYS + 1;
        assert!(s.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut s = Settings::default();
        s.request_timeout_secs = 0;
        assert!(s.validate().is_err());
    }

    #[test]
    fn json_round_trip() {
        let mut s = Settings::default();
        s.api_keys.insert("fmp".into(), "k".into());
        let json = s.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), s);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Timeframe
// ═══════════════════════════════════════════════════════════════════

mod timeframe {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(Timeframe::Yearly.to_string(), "yearly");
        assert_eq!(Timeframe::Monthly.to_string(), "monthly");
        assert_eq!(Timeframe::Weekly.to_string(), "weekly");
        assert_eq!(Timeframe::None.to_string(), "none");
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Timeframe::Monthly).unwrap(), "\"monthly\"");
        let t: Timeframe = serde_json::from_str("\"none\"").unwrap();
        assert_eq!(t, Timeframe::None);
    }

    #[test]
    fn only_none_fails_to_qualify() {
        assert!(Timeframe::Yearly.qualifies());
        assert!(Timeframe::Monthly.qualifies());
        assert!(Timeframe::Weekly.qualifies());
        assert!(!Timeframe::None.qualifies());
    }
}

// ═══════════════════════════════════════════════════════════════════
// AllocationPlan
// ═══════════════════════════════════════════════════════════════════

mod allocation_plan {
    use super::*;

    fn line(ticker: &str, shares: u64, price: Decimal) -> AllocationLine {
        AllocationLine {
            ticker: ticker.into(),
            shares_to_buy: shares,
            price,
            investment_amount: Decimal::from(shares) * price,
        }
    }

    #[test]
    fn empty_keeps_all_cash() {
        let plan = AllocationPlan::empty(dec!(250));
        assert!(plan.lines.is_empty());
        assert_eq!(plan.remaining_cash, dec!(250));
        assert_eq!(plan.total_invested(), Decimal::ZERO);
    }

    #[test]
    fn total_and_purchases() {
        let plan = AllocationPlan {
            available_cash: dec!(1000),
            lines: vec![line("A", 8, dec!(100)), line("B", 0, dec!(301))],
            remaining_cash: dec!(200),
        };
        assert_eq!(plan.total_invested(), dec!(800));
        assert_eq!(plan.purchases().count(), 1);
        assert_eq!(plan.get_line("B").unwrap().shares_to_buy, 0);
        assert!(plan.get_line("C").is_none());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Valuation & Report
// ═══════════════════════════════════════════════════════════════════

mod valuation {
    use super::*;

    fn sample() -> PortfolioValuation {
        PortfolioValuation {
            holdings: vec![
                HoldingValuation {
                    ticker: "AAPL".into(),
                    shares: dec!(10),
                    average_price: dec!(150),
                    current_price: Some(dec!(180)),
                    value: Some(dec!(1800)),
                    pl_dollar: Some(dec!(300)),
                    pl_percent: Some(dec!(20)),
                },
                HoldingValuation {
                    ticker: "TSLA".into(),
                    shares: dec!(2),
                    average_price: dec!(250),
                    current_price: None,
                    value: None,
                    pl_dollar: None,
                    pl_percent: None,
                },
            ],
            total_value: dec!(1800),
            total_pl: dec!(300),
            total_pl_percent: dec!(20),
            priced_count: 1,
        }
    }

    #[test]
    fn partial_when_some_unpriced() {
        let v = sample();
        assert_eq!(v.holding_count(), 2);
        assert!(v.is_partial());
        assert!(v.holdings[0].is_priced());
        assert!(!v.holdings[1].is_priced());
    }

    #[test]
    fn snapshot_copies_totals() {
        let snap = sample().snapshot(date("2025-06-30"));
        assert_eq!(snap.date, date("2025-06-30"));
        assert_eq!(snap.total_value, dec!(1800));
        assert_eq!(snap.total_pl, dec!(300));
        assert_eq!(snap.total_pl_percent, dec!(20));
    }

    #[test]
    fn json_renders_missing_price_as_null() {
        let json = sample().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["holdings"][1]["value"].is_null());
        assert!(value["holdings"][1]["pl_dollar"].is_null());
        assert_eq!(value["total_value"].as_f64(), Some(1800.0));
    }
}

mod report {
    use super::*;

    fn sample() -> RecommendationReport {
        RecommendationReport {
            recommendations: vec![Recommendation {
                ticker: "AAPL".into(),
                shares_to_buy: 3,
                investment_amount: dec!(450),
                current_price: dec!(150),
                timeframe: Timeframe::Yearly,
                dip_percent: dec!(25),
            }],
            remaining_cash: dec!(50),
            projected_portfolio: ProjectedPortfolio {
                total_value: dec!(450),
                allocations: vec![ProjectedAllocation {
                    ticker: "AAPL".into(),
                    value: dec!(450),
                    percentage: dec!(100),
                }],
            },
            scored_count: 2,
            requested_count: 3,
            excluded: vec![ExcludedTicker {
                ticker: "TSLA".into(),
                reason: "Price unavailable for TSLA: timeout".into(),
            }],
        }
    }

    #[test]
    fn coverage_line() {
        assert_eq!(sample().coverage(), "2 of 3 tickers scored");
    }

    #[test]
    fn total_invested() {
        assert_eq!(sample().total_invested(), dec!(450));
    }

    #[test]
    fn json_shape() {
        let json = sample().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let rec = &value["recommendations"][0];
        assert_eq!(rec["ticker"], "AAPL");
        assert_eq!(rec["shares_to_buy"], 3);
        assert_eq!(rec["timeframe"], "yearly");
        assert_eq!(value["remaining_cash"].as_f64(), Some(50.0));
        assert_eq!(
            value["projected_portfolio"]["allocations"][0]["percentage"].as_f64(),
            Some(100.0)
        );
        assert_eq!(value["excluded"][0]["ticker"], "TSLA");
    }

    #[test]
    fn default_projection_is_empty() {
        let p = ProjectedPortfolio::default();
        assert_eq!(p.total_value, Decimal::ZERO);
        assert!(p.allocations.is_empty());
    }
}
