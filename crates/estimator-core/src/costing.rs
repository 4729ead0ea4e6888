//! Stage four building blocks: annual cost lines for each component.

use crate::pricing::{MarkupConfig, PricedPath, price_path};
use crate::requirements::ResourceRequirements;
use crate::resource::{CatalogItem, FlatRole, Machine, SubcontractService};
use serde::{Deserialize, Serialize};

pub const MONTHS_PER_YEAR: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostCategory {
    Manpower,
    Machinery,
    Consumables,
    Materials,
    Subcontract,
}

impl CostCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            CostCategory::Manpower => "manpower",
            CostCategory::Machinery => "machinery",
            CostCategory::Consumables => "consumables",
            CostCategory::Materials => "materials",
            CostCategory::Subcontract => "subcontract",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostLine {
    pub category: CostCategory,
    pub item: String,
    pub quantity: f64,
    pub annual_cost: f64,
}

impl CostLine {
    pub fn new(
        category: CostCategory,
        item: impl Into<String>,
        quantity: f64,
        annual_cost: f64,
    ) -> Self {
        Self {
            category,
            item: item.into(),
            quantity,
            annual_cost,
        }
    }
}

/// Annual cost of `headcount` people at `monthly_per_head`.
pub fn manpower_line(item: impl Into<String>, monthly_per_head: f64, headcount: f64) -> CostLine {
    CostLine::new(
        CostCategory::Manpower,
        item,
        headcount,
        monthly_per_head * headcount * MONTHS_PER_YEAR,
    )
}

pub fn flat_role_lines(roles: &[FlatRole]) -> Vec<CostLine> {
    roles
        .iter()
        .map(|role| {
            CostLine::new(CostCategory::Manpower, &role.name, role.count, role.annual_cost())
        })
        .collect()
}

/// Per-head consumables: a monthly rate plus a flat annual allowance (PPE).
pub fn per_head_consumable_lines(
    monthly_per_head: f64,
    annual_allowance_per_head: f64,
    headcount: f64,
) -> Vec<CostLine> {
    vec![
        CostLine::new(
            CostCategory::Consumables,
            "consumables",
            headcount,
            monthly_per_head * headcount * MONTHS_PER_YEAR,
        ),
        CostLine::new(
            CostCategory::Consumables,
            "ppe_allowance",
            headcount,
            annual_allowance_per_head * headcount,
        ),
    ]
}

/// Included catalogue items only.
pub fn catalog_lines(items: &[CatalogItem], category: CostCategory) -> Vec<CostLine> {
    items
        .iter()
        .filter(|item| item.included)
        .map(|item| CostLine::new(category, &item.name, item.annual_quantity, item.annual_cost()))
        .collect()
}

/// Declared fleet compared with what the workload needs.
/// Reported only; never fed back into cost math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FleetVariance {
    Insufficient { shortfall: u32 },
    Matched,
    Excess { surplus: u32 },
}

impl FleetVariance {
    pub fn between(declared: u32, required: u32) -> Self {
        if declared < required {
            FleetVariance::Insufficient {
                shortfall: required - declared,
            }
        } else if declared > required {
            FleetVariance::Excess {
                surplus: declared - required,
            }
        } else {
            FleetVariance::Matched
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineCost {
    pub machine_id: String,
    pub name: String,
    pub declared_quantity: u32,
    pub required_count: f64,
    pub required_quantity: u32,
    pub quantity_used: u32,
    pub annual_depreciation: f64,
    pub annual_maintenance: f64,
    pub annual_cost: f64,
    pub variance: FleetVariance,
}

/// Cost one machine type at the larger of declared and required quantity.
pub fn machine_cost(machine: &Machine, required_count: f64) -> MachineCost {
    let required_quantity = required_count.max(0.0).ceil() as u32;
    let quantity_used = machine.declared_quantity.max(required_quantity);
    let quantity = f64::from(quantity_used);

    let unit_depreciation = if machine.life_years > 0.0 {
        machine.purchase_cost / machine.life_years
    } else {
        tracing::warn!(
            machine = %machine.id,
            "machine life is not positive; depreciation set to 0"
        );
        0.0
    };
    let unit_maintenance = machine.purchase_cost * machine.maintenance_percent / 100.0;
    let annual_depreciation = unit_depreciation * quantity;
    let annual_maintenance = unit_maintenance * quantity;

    MachineCost {
        machine_id: machine.id.clone(),
        name: machine.name.clone(),
        declared_quantity: machine.declared_quantity,
        required_count,
        required_quantity,
        quantity_used,
        annual_depreciation,
        annual_maintenance,
        annual_cost: annual_depreciation + annual_maintenance,
        variance: FleetVariance::between(machine.declared_quantity, required_quantity),
    }
}

pub fn machinery_costs(
    machines: &[Machine],
    requirements: &ResourceRequirements,
) -> Vec<MachineCost> {
    machines
        .iter()
        .map(|machine| {
            let required = requirements
                .machine_lines()
                .find(|line| line.resource_id == machine.id)
                .map(|line| line.required)
                .unwrap_or(0.0);
            machine_cost(machine, required)
        })
        .collect()
}

/// Price included subcontract services.
///
/// Services without an override are pooled and priced once with the path
/// markup; each override is priced on its own. The returned path is the sum.
pub fn price_subcontract(
    services: &[SubcontractService],
    path_markup: &MarkupConfig,
) -> (Vec<CostLine>, PricedPath) {
    let included: Vec<&SubcontractService> =
        services.iter().filter(|service| service.included).collect();

    let lines = included
        .iter()
        .map(|service| {
            CostLine::new(CostCategory::Subcontract, &service.name, 1.0, service.annual_cost)
        })
        .collect();

    let pooled: f64 = included
        .iter()
        .filter(|service| service.markup_override.is_none())
        .fold(0.0, |acc, service| acc + service.annual_cost);
    let mut path = price_path(pooled, path_markup);
    for service in &included {
        if let Some(markup) = &service.markup_override {
            path = path.combine(&price_path(service.annual_cost, markup));
        }
    }
    (lines, path)
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CostTotals {
    pub manpower: f64,
    pub machinery: f64,
    pub consumables: f64,
    pub materials: f64,
    pub subcontract: f64,
}

impl CostTotals {
    pub fn from_lines(lines: &[CostLine], machinery: &[MachineCost]) -> Self {
        let mut totals = CostTotals {
            machinery: machinery
                .iter()
                .fold(0.0, |acc, machine| acc + machine.annual_cost),
            ..CostTotals::default()
        };
        for line in lines {
            match line.category {
                CostCategory::Manpower => totals.manpower += line.annual_cost,
                CostCategory::Machinery => totals.machinery += line.annual_cost,
                CostCategory::Consumables => totals.consumables += line.annual_cost,
                CostCategory::Materials => totals.materials += line.annual_cost,
                CostCategory::Subcontract => totals.subcontract += line.annual_cost,
            }
        }
        totals
    }

    /// Everything self-performed; excludes subcontract.
    pub fn in_house_direct(&self) -> f64 {
        self.manpower + self.machinery + self.consumables + self.materials
    }
}
