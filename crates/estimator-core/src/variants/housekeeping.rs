use crate::costing::{CostLine, flat_role_lines, manpower_line, per_head_consumable_lines};
use crate::coverage::SiteCalendar;
use crate::error::EstimateResult;
use crate::metadata::ProjectMetadata;
use crate::normalizer::WorkloadSummary;
use crate::pipeline::{CostContext, EstimateVariant, VariantKind};
use crate::pricing::MarkupConfig;
use crate::requirements::{EstimationMode, RequirementLine};
use crate::resource::{FlatRole, Machine};
use crate::task::{RecurringTask, ResourceBucket};
use crate::task_validation::{ensure_finite, ensure_non_negative, validate_roles, validate_tasks};
use serde::{Deserialize, Serialize};

/// Sqm one cleaner covers per shift, per bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HousekeepingProductivity {
    pub machine_assisted: f64,
    pub manual_detailed: f64,
    pub manual_general: f64,
    /// Machine running hours per shift; the site shift length when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_hours_per_shift: Option<f64>,
}

impl Default for HousekeepingProductivity {
    fn default() -> Self {
        Self {
            machine_assisted: 600.0,
            manual_detailed: 150.0,
            manual_general: 300.0,
            effective_hours_per_shift: None,
        }
    }
}

impl HousekeepingProductivity {
    fn rate_for(&self, bucket: &ResourceBucket) -> f64 {
        match bucket {
            ResourceBucket::MachineAssisted => self.machine_assisted,
            ResourceBucket::ManualDetailed => self.manual_detailed,
            ResourceBucket::ManualGeneral => self.manual_general,
            ResourceBucket::AssetCategory(_) => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HousekeepingCosts {
    pub cleaner_monthly_salary: f64,
    #[serde(default)]
    pub cleaner_allowances: f64,
    #[serde(default)]
    pub supervisor_monthly_salary: f64,
    #[serde(default)]
    pub supervisor_count: f64,
    #[serde(default)]
    pub consumables_per_head_monthly: f64,
    #[serde(default)]
    pub ppe_per_head_annual: f64,
    #[serde(default)]
    pub markup: MarkupConfig,
}

impl Default for HousekeepingCosts {
    fn default() -> Self {
        Self {
            cleaner_monthly_salary: 1200.0,
            cleaner_allowances: 300.0,
            supervisor_monthly_salary: 0.0,
            supervisor_count: 0.0,
            consumables_per_head_monthly: 0.0,
            ppe_per_head_annual: 0.0,
            markup: MarkupConfig::default(),
        }
    }
}

impl HousekeepingCosts {
    fn supervisors(&self) -> FlatRole {
        FlatRole::new("supervisors", self.supervisor_monthly_salary, self.supervisor_count)
    }
}

/// Cleaning contract: areas by frequency, a cleaner pool, a machine fleet.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HousekeepingEstimate {
    #[serde(default)]
    pub metadata: ProjectMetadata,
    #[serde(default)]
    pub calendar: SiteCalendar,
    #[serde(default)]
    pub productivity: HousekeepingProductivity,
    #[serde(default)]
    pub mode: EstimationMode,
    #[serde(default)]
    pub tasks: Vec<RecurringTask>,
    #[serde(default)]
    pub machines: Vec<Machine>,
    #[serde(default)]
    pub costs: HousekeepingCosts,
}

const LABOUR_BUCKETS: [ResourceBucket; 3] = [
    ResourceBucket::MachineAssisted,
    ResourceBucket::ManualDetailed,
    ResourceBucket::ManualGeneral,
];

impl EstimateVariant for HousekeepingEstimate {
    fn kind(&self) -> VariantKind {
        VariantKind::Housekeeping
    }

    fn tasks(&self) -> &[RecurringTask] {
        &self.tasks
    }

    fn machines(&self) -> &[Machine] {
        &self.machines
    }

    fn site_calendar(&self) -> &SiteCalendar {
        &self.calendar
    }

    fn mode(&self) -> EstimationMode {
        self.mode
    }

    fn in_house_markup(&self) -> MarkupConfig {
        self.costs.markup
    }

    fn machines_are_staffed(&self) -> bool {
        true
    }

    fn effective_hours_per_shift(&self) -> f64 {
        self.productivity
            .effective_hours_per_shift
            .unwrap_or(self.calendar.shift_hours)
    }

    fn validate(&self) -> EstimateResult<()> {
        validate_tasks(&self.tasks, &self.machines)?;
        super::validate_common(&self.calendar, &self.mode, &self.costs.markup)?;
        for (label, value) in [
            ("machine-assisted productivity", self.productivity.machine_assisted),
            ("manual-detailed productivity", self.productivity.manual_detailed),
            ("manual-general productivity", self.productivity.manual_general),
        ] {
            ensure_finite(label, value)?;
        }
        if let Some(hours) = self.productivity.effective_hours_per_shift {
            ensure_non_negative("effective hours per shift", hours)?;
        }
        for (label, value) in [
            ("cleaner salary", self.costs.cleaner_monthly_salary),
            ("cleaner allowances", self.costs.cleaner_allowances),
            ("consumables per head", self.costs.consumables_per_head_monthly),
            ("ppe per head", self.costs.ppe_per_head_annual),
        ] {
            ensure_non_negative(label, value)?;
        }
        validate_roles(&[self.costs.supervisors()])
    }

    fn labour_lines(&self, workload: &WorkloadSummary) -> Vec<RequirementLine> {
        let mut lines: Vec<RequirementLine> = LABOUR_BUCKETS
            .iter()
            .map(|bucket| {
                // Machine lines are sized on top; the bucket line still carries all its work.
                RequirementLine::labour(
                    bucket.label(),
                    Some(bucket.clone()),
                    workload.bucket_total(bucket),
                    self.productivity.rate_for(bucket),
                )
            })
            .collect();

        for row in &workload.by_bucket {
            if let ResourceBucket::AssetCategory(_) = row.bucket {
                lines.push(RequirementLine::labour(
                    row.bucket.label(),
                    Some(row.bucket.clone()),
                    row.daily_equivalent,
                    self.productivity.rate_for(&row.bucket),
                ));
            }
        }
        lines
    }

    fn cost_lines(&self, context: &CostContext<'_>) -> Vec<CostLine> {
        let headcount = context.staffing.total_with_relief;
        let mut lines = vec![manpower_line(
            "cleaners",
            self.costs.cleaner_monthly_salary + self.costs.cleaner_allowances,
            headcount,
        )];
        lines.extend(flat_role_lines(&[self.costs.supervisors()]));
        lines.extend(per_head_consumable_lines(
            self.costs.consumables_per_head_monthly,
            self.costs.ppe_per_head_annual,
            headcount,
        ));
        lines
    }
}
