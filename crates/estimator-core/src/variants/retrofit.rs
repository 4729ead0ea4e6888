use crate::catalog::Keyed;
use crate::costing::{CostCategory, CostLine, flat_role_lines};
use crate::coverage::SiteCalendar;
use crate::error::{EstimateError, EstimateResult};
use crate::metadata::ProjectMetadata;
use crate::normalizer::WorkloadSummary;
use crate::pipeline::{CostContext, EstimateVariant, VariantKind};
use crate::pricing::MarkupConfig;
use crate::requirements::{EstimationMode, RequirementLine};
use crate::resource::{FlatRole, Machine, SubcontractService, TechnicianType};
use crate::task::RecurringTask;
use crate::task_validation::{
    ensure_finite, ensure_non_negative, validate_roles, validate_services, validate_tasks,
    validate_technicians,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const DAYS_PER_YEAR: f64 = 365.0;

/// Material drawn per unit of a scope item (e.g. one LED driver per fitting).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrofitMaterial {
    pub id: String,
    pub name: String,
    pub scope_item_id: String,
    pub unit_rate: f64,
    pub units_per_item: f64,
    #[serde(default = "included_by_default")]
    pub included: bool,
}

fn included_by_default() -> bool {
    true
}

impl RetrofitMaterial {
    pub fn new(
        id: impl Into<String>,
        scope_item_id: impl Into<String>,
        unit_rate: f64,
        units_per_item: f64,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            scope_item_id: scope_item_id.into(),
            unit_rate,
            units_per_item,
            included: true,
        }
    }
}

impl Keyed for RetrofitMaterial {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Retrofit programme: scope items replaced or upgraded on a cycle, installed
/// by crews, with materials derived from the scope and specialist packages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrofitEstimate {
    #[serde(default)]
    pub metadata: ProjectMetadata,
    #[serde(default)]
    pub calendar: SiteCalendar,
    #[serde(default)]
    pub mode: EstimationMode,
    #[serde(default)]
    pub scope: Vec<RecurringTask>,
    #[serde(default)]
    pub crews: Vec<TechnicianType>,
    #[serde(default)]
    pub equipment: Vec<Machine>,
    #[serde(default)]
    pub project_team: Vec<FlatRole>,
    #[serde(default)]
    pub materials: Vec<RetrofitMaterial>,
    #[serde(default)]
    pub specialist_services: Vec<SubcontractService>,
    #[serde(default)]
    pub markup: MarkupConfig,
    #[serde(default)]
    pub subcontract_markup: MarkupConfig,
}

impl Default for RetrofitEstimate {
    fn default() -> Self {
        Self {
            metadata: ProjectMetadata::default(),
            calendar: SiteCalendar::default(),
            mode: EstimationMode::default(),
            scope: Vec::new(),
            crews: Vec::new(),
            equipment: Vec::new(),
            project_team: Vec::new(),
            materials: Vec::new(),
            specialist_services: Vec::new(),
            markup: MarkupConfig::default(),
            subcontract_markup: MarkupConfig::new(5.0, 10.0),
        }
    }
}

impl RetrofitEstimate {
    fn material_lines(&self, workload: &WorkloadSummary) -> Vec<CostLine> {
        self.materials
            .iter()
            .filter(|material| material.included)
            .map(|material| {
                let daily = workload
                    .tasks
                    .iter()
                    .find(|task| task.task_id == material.scope_item_id)
                    .map(|task| task.daily_equivalent)
                    .unwrap_or(0.0);
                let annual_units = daily * DAYS_PER_YEAR * material.units_per_item;
                CostLine::new(
                    CostCategory::Materials,
                    &material.name,
                    annual_units,
                    annual_units * material.unit_rate,
                )
            })
            .collect()
    }

    fn validate_materials(&self) -> EstimateResult<()> {
        let scope_ids: HashSet<&str> = self.scope.iter().map(|item| item.id.as_str()).collect();
        let mut seen = HashSet::new();
        for material in &self.materials {
            if !seen.insert(material.id.as_str()) {
                return Err(EstimateError::DuplicateId {
                    kind: "material",
                    id: material.id.clone(),
                });
            }
            if !scope_ids.contains(material.scope_item_id.as_str()) {
                return Err(EstimateError::invalid(format!(
                    "material {} references unknown scope item '{}'",
                    material.id, material.scope_item_id
                )));
            }
            ensure_non_negative(
                &format!("material {} unit rate", material.id),
                material.unit_rate,
            )?;
            ensure_non_negative(
                &format!("material {} units per item", material.id),
                material.units_per_item,
            )?;
        }
        Ok(())
    }
}

impl EstimateVariant for RetrofitEstimate {
    fn kind(&self) -> VariantKind {
        VariantKind::Retrofit
    }

    fn tasks(&self) -> &[RecurringTask] {
        &self.scope
    }

    fn machines(&self) -> &[Machine] {
        &self.equipment
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

    fn subcontract_services(&self) -> &[SubcontractService] {
        &self.specialist_services
    }

    fn subcontract_markup(&self) -> MarkupConfig {
        self.subcontract_markup
    }

    fn validate(&self) -> EstimateResult<()> {
        validate_tasks(&self.scope, &self.equipment)?;
        super::validate_common(&self.calendar, &self.mode, &self.markup)?;
        ensure_finite("subcontract overheads percent", self.subcontract_markup.overheads_percent)?;
        ensure_finite("subcontract profit percent", self.subcontract_markup.profit_percent)?;
        validate_technicians(&self.crews)?;
        super::validate_input_staffing(&self.mode, &self.crews, "crew")?;
        validate_roles(&self.project_team)?;
        self.validate_materials()?;
        validate_services(&self.specialist_services)
    }

    fn labour_lines(&self, workload: &WorkloadSummary) -> Vec<RequirementLine> {
        super::trade_requirement_lines(workload, &self.crews)
    }

    fn cost_lines(&self, context: &CostContext<'_>) -> Vec<CostLine> {
        let mut lines =
            super::trade_manpower_lines(&self.crews, context.requirements, context.staffing);
        lines.extend(flat_role_lines(&self.project_team));
        lines.extend(self.material_lines(context.workload));
        lines
    }
}
