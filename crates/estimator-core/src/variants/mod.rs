//! Input adapters for the three contract types.

mod facilities;
mod housekeeping;
mod retrofit;

pub use facilities::FacilitiesEstimate;
pub use housekeeping::{HousekeepingCosts, HousekeepingEstimate, HousekeepingProductivity};
pub use retrofit::{RetrofitEstimate, RetrofitMaterial};

use crate::costing::{CostLine, manpower_line};
use crate::coverage::{CoverageAdjustment, SiteCalendar};
use crate::error::{EstimateError, EstimateResult};
use crate::normalizer::WorkloadSummary;
use crate::pricing::MarkupConfig;
use crate::requirements::{EstimationMode, RequirementLine, ResourceRequirements};
use crate::resource::TechnicianType;
use crate::task::ResourceBucket;
use crate::task_validation::{ensure_finite, ensure_non_negative};

fn validate_common(
    calendar: &SiteCalendar,
    mode: &EstimationMode,
    markup: &MarkupConfig,
) -> EstimateResult<()> {
    for (label, value) in [
        ("coverage days required", calendar.coverage_days_required),
        ("annual leave days", calendar.annual_leave_days),
        ("sick leave days", calendar.sick_leave_days),
        ("public holiday days", calendar.public_holiday_days),
        ("weekly off days", calendar.weekly_off_days),
        ("shift hours", calendar.shift_hours),
    ] {
        ensure_non_negative(label, value)?;
    }
    if let EstimationMode::InputBased { headcount } = mode {
        ensure_non_negative("input-based headcount", *headcount)?;
    }
    ensure_finite("overheads percent", markup.overheads_percent)?;
    ensure_finite("profit percent", markup.profit_percent)
}

/// A fixed headcount is costed through the trade rates, so it needs at least one trade.
fn validate_input_staffing(
    mode: &EstimationMode,
    trades: &[TechnicianType],
    role: &str,
) -> EstimateResult<()> {
    match mode {
        EstimationMode::InputBased { headcount } if *headcount > 0.0 && trades.is_empty() => {
            Err(EstimateError::invalid(format!(
                "input-based headcount {headcount} needs at least one {role} to cost it"
            )))
        }
        _ => Ok(()),
    }
}

/// One labour line per trade, sized on its asset category's workload.
/// Categories nobody is trained for get a zero-capacity line so the gap shows.
fn trade_requirement_lines(
    workload: &WorkloadSummary,
    technicians: &[TechnicianType],
) -> Vec<RequirementLine> {
    let mut lines: Vec<RequirementLine> = technicians
        .iter()
        .map(|tech| {
            let bucket = ResourceBucket::asset(tech.category.clone());
            let daily = workload.bucket_total(&bucket);
            RequirementLine::labour(tech.id.clone(), Some(bucket), daily, tech.units_per_shift)
        })
        .collect();

    for row in &workload.by_bucket {
        let served = match &row.bucket {
            ResourceBucket::AssetCategory(category) => {
                technicians.iter().any(|tech| &tech.category == category)
            }
            _ => false,
        };
        if !served {
            lines.push(RequirementLine::labour(
                format!("unassigned:{}", row.bucket),
                Some(row.bucket.clone()),
                row.daily_equivalent,
                0.0,
            ));
        }
    }
    lines
}

fn trade_manpower_lines(
    technicians: &[TechnicianType],
    requirements: &ResourceRequirements,
    staffing: &CoverageAdjustment,
) -> Vec<CostLine> {
    let ids: Vec<&str> = technicians.iter().map(|tech| tech.id.as_str()).collect();
    technicians
        .iter()
        .map(|tech| {
            let active = requirements.active_share(&tech.id, &ids);
            manpower_line(&tech.name, tech.monthly_cost(), staffing.with_relief(active))
        })
        .collect()
}
