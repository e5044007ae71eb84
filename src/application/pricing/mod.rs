//! LMSR pricing engine.
//!
//! Calibrates a two-outcome LMSR curve from raw pool reserves and answers
//! price and cost-of-shares queries against it. Pure computation.

mod lmsr;
pub mod numeric;

pub use lmsr::{cost, cost_of_shares, price, shares_for_cost, LmsrPricer, PricingConfig};
