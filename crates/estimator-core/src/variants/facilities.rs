use crate::costing::{CostCategory, CostLine, catalog_lines, flat_role_lines};
use crate::coverage::SiteCalendar;
use crate::error::EstimateResult;
use crate::metadata::ProjectMetadata;
use crate::normalizer::WorkloadSummary;
use crate::pipeline::{CostContext, EstimateVariant, VariantKind};
use crate::pricing::MarkupConfig;
use crate::requirements::{EstimationMode, RequirementLine};
use crate::resource::{CatalogItem, FlatRole, Machine, SubcontractService, TechnicianType};
use crate::task::RecurringTask;
use crate::task_validation::{
    ensure_finite, ensure_non_negative, validate_catalog, validate_roles, validate_services,
    validate_tasks, validate_technicians,
};
use serde::{Deserialize, Serialize};

/// Facilities-management (MEP) contract: planned maintenance visits on asset
/// categories, served by technician trades, with itemised materials and
/// subcontracted specialist services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilitiesEstimate {
    #[serde(default)]
    pub metadata: ProjectMetadata,
    #[serde(default)]
    pub calendar: SiteCalendar,
    #[serde(default)]
    pub mode: EstimationMode,
    /// Maintenance routines; `quantity` is the asset count per visit.
    #[serde(default)]
    pub tasks: Vec<RecurringTask>,
    #[serde(default)]
    pub technicians: Vec<TechnicianType>,
    #[serde(default)]
    pub tools: Vec<Machine>,
    #[serde(default)]
    pub staff: Vec<FlatRole>,
    #[serde(default)]
    pub materials: Vec<CatalogItem>,
    #[serde(default)]
    pub consumables: Vec<CatalogItem>,
    #[serde(default)]
    pub subcontract_services: Vec<SubcontractService>,
    #[serde(default)]
    pub markup: MarkupConfig,
    #[serde(default)]
    pub subcontract_markup: MarkupConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_hours_per_shift: Option<f64>,
}

impl Default for FacilitiesEstimate {
    fn default() -> Self {
        Self {
            metadata: ProjectMetadata::default(),
            calendar: SiteCalendar::default(),
            mode: EstimationMode::default(),
            tasks: Vec::new(),
            technicians: Vec::new(),
            tools: Vec::new(),
            staff: Vec::new(),
            materials: Vec::new(),
            consumables: Vec::new(),
            subcontract_services: Vec::new(),
            markup: MarkupConfig::default(),
            subcontract_markup: MarkupConfig::new(5.0, 10.0),
            effective_hours_per_shift: None,
        }
    }
}

impl EstimateVariant for FacilitiesEstimate {
    fn kind(&self) -> VariantKind {
        VariantKind::Facilities
    }

    fn tasks(&self) -> &[RecurringTask] {
        &self.tasks
    }

    fn machines(&self) -> &[Machine] {
        &self.tools
    }

    fn site_calendar(&self) -> &SiteCalendar {
        &self.calendar
    }

    fn mode(&self) -> EstimationMode {
        self.mode
    }

    fn in_house_markup(&self) -> MarkupConfig {
        self.markup
    }

    fn effective_hours_per_shift(&self) -> f64 {
        self.effective_hours_per_shift
            .unwrap_or(self.calendar.shift_hours)
    }

    fn subcontract_services(&self) -> &[SubcontractService] {
        &self.subcontract_services
    }

    fn subcontract_markup(&self) -> MarkupConfig {
        self.subcontract_markup
    }

    fn validate(&self) -> EstimateResult<()> {
        validate_tasks(&self.tasks, &self.tools)?;
        super::validate_common(&self.calendar, &self.mode, &self.markup)?;
        ensure_finite("subcontract overheads percent", self.subcontract_markup.overheads_percent)?;
        ensure_finite("subcontract profit percent", self.subcontract_markup.profit_percent)?;
        if let Some(hours) = self.effective_hours_per_shift {
            ensure_non_negative("effective hours per shift", hours)?;
        }
        validate_technicians(&self.technicians)?;
        super::validate_input_staffing(&self.mode, &self.technicians, "technician type")?;
        validate_roles(&self.staff)?;
        validate_catalog("material", &self.materials)?;
        validate_catalog("consumable", &self.consumables)?;
        validate_services(&self.subcontract_services)
    }

    fn labour_lines(&self, workload: &WorkloadSummary) -> Vec<RequirementLine> {
        super::trade_requirement_lines(workload, &self.technicians)
    }

    fn cost_lines(&self, context: &CostContext<'_>) -> Vec<CostLine> {
        let mut lines =
            super::trade_manpower_lines(&self.technicians, context.requirements, context.staffing);
        lines.extend(flat_role_lines(&self.staff));
        lines.extend(catalog_lines(&self.materials, CostCategory::Materials));
        lines.extend(catalog_lines(&self.consumables, CostCategory::Consumables));
        lines
    }
}
