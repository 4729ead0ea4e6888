//! Markup cascade applied to each cost path.

use serde::{Deserialize, Serialize};

/// Overhead and profit percentages for one cost path.
///
/// Values are passed through unchecked: negative or very large percentages
/// flow straight into the arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkupConfig {
    pub overheads_percent: f64,
    pub profit_percent: f64,
}

impl MarkupConfig {
    pub fn new(overheads_percent: f64, profit_percent: f64) -> Self {
        Self {
            overheads_percent,
            profit_percent,
        }
    }
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self::new(10.0, 15.0)
    }
}

/// Result of pricing one stream of direct cost.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PricedPath {
    pub direct_cost: f64,
    pub overheads: f64,
    pub total_cost: f64,
    pub profit: f64,
    pub selling_annual: f64,
    pub selling_monthly: f64,
}

impl PricedPath {
    /// Field-wise sum. Used to roll separately marked-up streams together.
    pub fn combine(&self, other: &PricedPath) -> PricedPath {
        PricedPath {
            direct_cost: self.direct_cost + other.direct_cost,
            overheads: self.overheads + other.overheads,
            total_cost: self.total_cost + other.total_cost,
            profit: self.profit + other.profit,
            selling_annual: self.selling_annual + other.selling_annual,
            selling_monthly: self.selling_monthly + other.selling_monthly,
        }
    }
}

pub fn price_path(direct_cost: f64, markup: &MarkupConfig) -> PricedPath {
    let overheads = direct_cost * (markup.overheads_percent / 100.0);
    let total_cost = direct_cost + overheads;
    let profit = total_cost * (markup.profit_percent / 100.0);
    let selling_annual = total_cost + profit;
    PricedPath {
        direct_cost,
        overheads,
        total_cost,
        profit,
        selling_annual,
        selling_monthly: selling_annual / 12.0,
    }
}

/// In-house and subcontract paths priced independently, then summed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceSummary {
    pub in_house: PricedPath,
    pub subcontract: PricedPath,
    pub grand_total: PricedPath,
}

impl PriceSummary {
    pub fn new(in_house: PricedPath, subcontract: PricedPath) -> Self {
        Self {
            in_house,
            subcontract,
            grand_total: in_house.combine(&subcontract),
        }
    }
}
