//! Stage sequencing shared by every estimation variant.
//!
//! A variant supplies its own field shapes through [`EstimateVariant`]; the
//! pipeline runs normalize → requirements → coverage → cost & pricing in that
//! order and never lets an earlier stage see a later stage's output.

use crate::costing::{CostLine, CostTotals, MachineCost, machinery_costs, price_subcontract};
use crate::coverage::{CoverageAdjustment, SiteCalendar, adjust_for_coverage};
use crate::error::EstimateResult;
use crate::normalizer::{WorkloadSummary, aggregate};
use crate::pricing::{MarkupConfig, PriceSummary, price_path};
use crate::requirements::{
    EstimationMode, RequirementLine, ResourceRequirements, machine_capacity,
};
use crate::resource::{Machine, SubcontractService};
use crate::task::RecurringTask;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantKind {
    Housekeeping,
    Facilities,
    Retrofit,
}

impl VariantKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VariantKind::Housekeeping => "housekeeping",
            VariantKind::Facilities => "facilities",
            VariantKind::Retrofit => "retrofit",
        }
    }
}

/// Everything earlier stages produced, handed to a variant's costing.
pub struct CostContext<'a> {
    pub workload: &'a WorkloadSummary,
    pub requirements: &'a ResourceRequirements,
    pub staffing: &'a CoverageAdjustment,
}

/// Adapter between a variant's input record and the shared stage sequence.
pub trait EstimateVariant {
    fn kind(&self) -> VariantKind;
    fn tasks(&self) -> &[RecurringTask];
    fn machines(&self) -> &[Machine];
    fn site_calendar(&self) -> &SiteCalendar;
    fn mode(&self) -> EstimationMode;
    fn in_house_markup(&self) -> MarkupConfig;

    /// Reject inputs the pipeline cannot interpret.
    fn validate(&self) -> EstimateResult<()>;

    /// Labour requirement lines (buckets or trades) for the normalized workload.
    fn labour_lines(&self, workload: &WorkloadSummary) -> Vec<RequirementLine>;

    /// In-house cost lines other than machinery: manpower, consumables, materials.
    fn cost_lines(&self, context: &CostContext<'_>) -> Vec<CostLine>;

    /// Whether each machine needs its own operator on the headcount.
    fn machines_are_staffed(&self) -> bool {
        false
    }

    fn effective_hours_per_shift(&self) -> f64 {
        self.site_calendar().shift_hours
    }

    fn subcontract_services(&self) -> &[SubcontractService] {
        &[]
    }

    fn subcontract_markup(&self) -> MarkupConfig {
        self.in_house_markup()
    }
}

/// The pipeline's sole output. Recomputed wholesale on every input change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimationResult {
    pub variant: VariantKind,
    pub workload: WorkloadSummary,
    pub requirements: ResourceRequirements,
    pub staffing: CoverageAdjustment,
    pub machinery: Vec<MachineCost>,
    pub cost_lines: Vec<CostLine>,
    pub totals: CostTotals,
    pub pricing: PriceSummary,
}

impl EstimationResult {
    pub fn selling_annual(&self) -> f64 {
        self.pricing.grand_total.selling_annual
    }

    pub fn selling_monthly(&self) -> f64 {
        self.pricing.grand_total.selling_monthly
    }

    pub fn total_headcount(&self) -> f64 {
        self.staffing.total_with_relief
    }
}

pub fn run<V: EstimateVariant + ?Sized>(variant: &V) -> EstimateResult<EstimationResult> {
    variant.validate()?;
    let kind = variant.kind();
    let _span = tracing::debug_span!("estimate", variant = kind.as_str()).entered();

    let workload = aggregate(variant.tasks());

    let hours = variant.effective_hours_per_shift();
    let staffed = variant.machines_are_staffed();
    let mut lines = variant.labour_lines(&workload);
    lines.extend(variant.machines().iter().map(|machine| {
        RequirementLine::machine(
            machine.id.clone(),
            workload.machine_total(&machine.id),
            machine_capacity(machine.throughput_per_hour, hours),
            staffed,
        )
    }));
    let requirements = ResourceRequirements::new(variant.mode(), lines);

    let staffing = adjust_for_coverage(requirements.total_active, variant.site_calendar());

    let machinery = machinery_costs(variant.machines(), &requirements);
    let context = CostContext {
        workload: &workload,
        requirements: &requirements,
        staffing: &staffing,
    };
    let mut cost_lines = variant.cost_lines(&context);
    let (subcontract_lines, subcontract_path) =
        price_subcontract(variant.subcontract_services(), &variant.subcontract_markup());
    cost_lines.extend(subcontract_lines);

    let totals = CostTotals::from_lines(&cost_lines, &machinery);
    let in_house = price_path(totals.in_house_direct(), &variant.in_house_markup());
    let pricing = PriceSummary::new(in_house, subcontract_path);

    tracing::debug!(
        headcount = staffing.total_with_relief,
        direct = totals.in_house_direct() + totals.subcontract,
        selling_annual = pricing.grand_total.selling_annual,
        "estimate priced"
    );

    Ok(EstimationResult {
        variant: kind,
        workload,
        requirements,
        staffing,
        machinery,
        cost_lines,
        totals,
        pricing,
    })
}
