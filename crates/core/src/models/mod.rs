pub mod allocation;
pub mod holding;
pub mod portfolio;
pub mod price;
pub mod recommendation;
pub mod settings;
pub mod signal;
pub mod valuation;
