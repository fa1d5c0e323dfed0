// ═══════════════════════════════════════════════════════════════════
// Error Tests — CoreError variants, Display formatting, From impls
// ═══════════════════════════════════════════════════════════════════

use dip_planner_core::errors::CoreError;
use uuid::Uuid;

// ── Display formatting ──────────────────────────────────────────────

mod display {
    use super::*;

    #[test]
    fn invalid_holding() {
        let err = CoreError::InvalidHolding("AAPL: average price must be positive, got 0".into());
        assert_eq!(
            err.to_string(),
            "Invalid holding: AAPL: average price must be positive, got 0"
        );
    }

    #[test]
    fn invalid_price_data() {
        let err = CoreError::InvalidPriceData {
            ticker: "MSFT".into(),
            message: "yearly high must be positive, got 0".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid price data for MSFT: yearly high must be positive, got 0"
        );
    }

    #[test]
    fn invalid_allocation_input() {
        let err = CoreError::InvalidAllocationInput("available cash must not be negative".into());
        assert_eq!(
            err.to_string(),
            "Invalid allocation input: available cash must not be negative"
        );
    }

    #[test]
    fn price_unavailable() {
        let err = CoreError::PriceUnavailable {
            ticker: "TSLA".into(),
            message: "no quote returned".into(),
        };
        assert_eq!(err.to_string(), "Price unavailable for TSLA: no quote returned");
    }

    #[test]
    fn api_error() {
        let err = CoreError::Api {
            provider: "Financial Modeling Prep".into(),
            message: "Limit Reach".into(),
        };
        assert_eq!(
            err.to_string(),
            "API error (Financial Modeling Prep): Limit Reach"
        );
    }

    #[test]
    fn network() {
        let err = CoreError::Network("connection refused".into());
        assert_eq!(err.to_string(), "Network error: connection refused");
    }

    #[test]
    fn no_provider() {
        assert_eq!(
            CoreError::NoProvider.to_string(),
            "No market data provider registered"
        );
    }

    #[test]
    fn portfolio_not_found() {
        let id = Uuid::nil();
        let err = CoreError::PortfolioNotFound(id);
        assert_eq!(
            err.to_string(),
            "Portfolio not found: 00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn validation_error() {
        let err = CoreError::ValidationError("weights must not be negative".into());
        assert_eq!(err.to_string(), "Validation failed: weights must not be negative");
    }

    #[test]
    fn serialization() {
        let err = CoreError::Serialization("bad float".into());
        assert_eq!(err.to_string(), "Serialization error: bad float");
    }

    #[test]
    fn deserialization() {
        let err = CoreError::Deserialization("unexpected EOF".into());
        assert_eq!(err.to_string(), "Deserialization error: unexpected EOF");
    }
}

// ── Ticker-scoped classification ────────────────────────────────────

mod ticker_scoped {
    use super::*;

    #[test]
    fn market_data_failures_are_ticker_scoped() {
        assert!(CoreError::PriceUnavailable {
            ticker: "A".into(),
            message: "x".into()
        }
        .is_ticker_scoped());
        assert!(CoreError::InvalidPriceData {
            ticker: "A".into(),
            message: "x".into()
        }
        .is_ticker_scoped());
        assert!(CoreError::Api {
            provider: "p".into(),
            message: "x".into()
        }
        .is_ticker_scoped());
        assert!(CoreError::Network("timeout".into()).is_ticker_scoped());
    }

    #[test]
    fn request_failures_are_not_ticker_scoped() {
        assert!(!CoreError::InvalidAllocationInput("neg".into()).is_ticker_scoped());
        assert!(!CoreError::PortfolioNotFound(Uuid::nil()).is_ticker_scoped());
        assert!(!CoreError::InvalidHolding("bad".into()).is_ticker_scoped());
        assert!(!CoreError::NoProvider.is_ticker_scoped());
    }
}

// ── From impls ──────────────────────────────────────────────────────

mod conversions {
    use super::*;

    #[test]
    fn from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: CoreError = json_err.into();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }

    #[test]
    fn question_mark_converts_serde_error() {
        fn parse(input: &str) -> Result<serde_json::Value, CoreError> {
            Ok(serde_json::from_str(input)?)
        }
        assert!(parse("[1, 2").is_err());
        assert!(parse("[1, 2]").is_ok());
    }

    #[test]
    fn error_is_debug_and_send_sync() {
        fn assert_send_sync<T: Send + Sync + std::fmt::Debug>() {}
        assert_send_sync::<CoreError>();
    }
}
