use crate::pricing::MarkupConfig;
use serde::{Deserialize, Serialize};

/// A machine or tool in the contract fleet (scrubber, vacuum, access platform).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    pub id: String,
    pub name: String,
    /// Quantity the estimator declared. Compared against the workload-derived
    /// requirement; never lowers it.
    pub declared_quantity: u32,
    /// Sqm or units a single machine covers per hour.
    pub throughput_per_hour: f64,
    pub purchase_cost: f64,
    pub life_years: f64,
    /// Annual maintenance as a percentage of purchase cost.
    pub maintenance_percent: f64,
}

impl Machine {
    pub fn new(id: impl Into<String>, declared_quantity: u32, throughput_per_hour: f64) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            declared_quantity,
            throughput_per_hour,
            purchase_cost: 0.0,
            life_years: 5.0,
            maintenance_percent: 0.0,
        }
    }

    pub fn with_costs(
        mut self,
        purchase_cost: f64,
        life_years: f64,
        maintenance_percent: f64,
    ) -> Self {
        self.purchase_cost = purchase_cost;
        self.life_years = life_years;
        self.maintenance_percent = maintenance_percent;
        self
    }
}

/// A technician trade. Serves every task tagged with its asset category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicianType {
    pub id: String,
    pub name: String,
    pub category: String,
    pub monthly_salary: f64,
    #[serde(default)]
    pub monthly_allowances: f64,
    /// Asset units one technician services per shift.
    pub units_per_shift: f64,
}

impl TechnicianType {
    pub fn new(
        id: impl Into<String>,
        category: impl Into<String>,
        monthly_salary: f64,
        units_per_shift: f64,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            category: category.into(),
            monthly_salary,
            monthly_allowances: 0.0,
            units_per_shift,
        }
    }

    pub fn monthly_cost(&self) -> f64 {
        self.monthly_salary + self.monthly_allowances
    }
}

/// Staff priced at a fixed count regardless of workload (supervisors,
/// engineers, project managers).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatRole {
    pub name: String,
    pub monthly_salary: f64,
    pub count: f64,
}

impl FlatRole {
    pub fn new(name: impl Into<String>, monthly_salary: f64, count: f64) -> Self {
        Self {
            name: name.into(),
            monthly_salary,
            count,
        }
    }

    pub fn annual_cost(&self) -> f64 {
        self.monthly_salary * self.count * 12.0
    }
}

/// Itemised material or consumable with an expected yearly draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    pub unit_rate: f64,
    pub annual_quantity: f64,
    #[serde(default = "default_included")]
    pub included: bool,
}

impl CatalogItem {
    pub fn new(id: impl Into<String>, unit_rate: f64, annual_quantity: f64) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            unit_rate,
            annual_quantity,
            included: true,
        }
    }

    pub fn annual_cost(&self) -> f64 {
        self.unit_rate * self.annual_quantity
    }
}

/// Third-party service priced on the subcontract path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubcontractService {
    pub id: String,
    pub name: String,
    pub annual_cost: f64,
    #[serde(default = "default_included")]
    pub included: bool,
    /// Replaces the subcontract path markup for this service only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markup_override: Option<MarkupConfig>,
}

impl SubcontractService {
    pub fn new(id: impl Into<String>, annual_cost: f64) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            annual_cost,
            included: true,
            markup_override: None,
        }
    }

    pub fn with_markup(mut self, markup: MarkupConfig) -> Self {
        self.markup_override = Some(markup);
        self
    }
}

fn default_included() -> bool {
    true
}
