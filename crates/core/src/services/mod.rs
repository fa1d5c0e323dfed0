pub mod allocation_planner;
pub mod dip_scorer;
pub mod price_service;
pub mod projection_service;
pub mod recommendation_service;
pub mod valuation_service;
