use crate::error::{EstimateError, EstimateResult};
use crate::resource::{CatalogItem, FlatRole, Machine, SubcontractService, TechnicianType};
use crate::task::RecurringTask;
use std::collections::HashSet;

pub(crate) fn ensure_finite(label: &str, value: f64) -> EstimateResult<()> {
    if !value.is_finite() {
        return Err(EstimateError::invalid(format!(
            "{label} must be a finite number (got {value})"
        )));
    }
    Ok(())
}

pub(crate) fn ensure_non_negative(label: &str, value: f64) -> EstimateResult<()> {
    ensure_finite(label, value)?;
    if value < 0.0 {
        return Err(EstimateError::invalid(format!(
            "{label} must not be negative (got {value})"
        )));
    }
    Ok(())
}

fn ensure_unique<'a, I>(kind: &'static str, ids: I) -> EstimateResult<()>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    for id in ids {
        if id.trim().is_empty() {
            return Err(EstimateError::invalid(format!("{kind} id must not be empty")));
        }
        if !seen.insert(id) {
            return Err(EstimateError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

pub fn validate_task(task: &RecurringTask) -> EstimateResult<()> {
    ensure_non_negative(&format!("task {} quantity", task.id), task.quantity)?;
    if task.repetitions_per_day == Some(0) {
        return Err(EstimateError::invalid(format!(
            "task {} repetitions_per_day must be at least 1",
            task.id
        )));
    }
    Ok(())
}

/// Check tasks and the machines they reference.
pub fn validate_tasks(tasks: &[RecurringTask], machines: &[Machine]) -> EstimateResult<()> {
    ensure_unique("task", tasks.iter().map(|task| task.id.as_str()))?;
    validate_machines(machines)?;
    let machine_ids: HashSet<&str> = machines.iter().map(|machine| machine.id.as_str()).collect();
    for task in tasks {
        validate_task(task)?;
        if let Some(machine_id) = &task.machine_id {
            if !machine_ids.contains(machine_id.as_str()) {
                return Err(EstimateError::UnknownMachine {
                    task_id: task.id.clone(),
                    machine_id: machine_id.clone(),
                });
            }
        }
    }
    Ok(())
}

pub fn validate_machines(machines: &[Machine]) -> EstimateResult<()> {
    ensure_unique("machine", machines.iter().map(|machine| machine.id.as_str()))?;
    for machine in machines {
        ensure_non_negative(
            &format!("machine {} throughput", machine.id),
            machine.throughput_per_hour,
        )?;
        ensure_non_negative(
            &format!("machine {} purchase cost", machine.id),
            machine.purchase_cost,
        )?;
        ensure_finite(&format!("machine {} life years", machine.id), machine.life_years)?;
        ensure_non_negative(
            &format!("machine {} maintenance percent", machine.id),
            machine.maintenance_percent,
        )?;
    }
    Ok(())
}

/// Technician trades must be unique by id and by category, since a category's
/// workload is served by exactly one trade.
pub fn validate_technicians(technicians: &[TechnicianType]) -> EstimateResult<()> {
    ensure_unique("technician", technicians.iter().map(|tech| tech.id.as_str()))?;
    ensure_unique(
        "technician category",
        technicians.iter().map(|tech| tech.category.as_str()),
    )?;
    for tech in technicians {
        ensure_non_negative(&format!("technician {} salary", tech.id), tech.monthly_salary)?;
        ensure_non_negative(
            &format!("technician {} allowances", tech.id),
            tech.monthly_allowances,
        )?;
        ensure_finite(&format!("technician {} units per shift", tech.id), tech.units_per_shift)?;
    }
    Ok(())
}

pub fn validate_roles(roles: &[FlatRole]) -> EstimateResult<()> {
    for role in roles {
        ensure_non_negative(&format!("role {} salary", role.name), role.monthly_salary)?;
        ensure_non_negative(&format!("role {} count", role.name), role.count)?;
    }
    Ok(())
}

pub fn validate_catalog(kind: &'static str, items: &[CatalogItem]) -> EstimateResult<()> {
    ensure_unique(kind, items.iter().map(|item| item.id.as_str()))?;
    for item in items {
        ensure_non_negative(&format!("{kind} {} unit rate", item.id), item.unit_rate)?;
        ensure_non_negative(&format!("{kind} {} annual quantity", item.id), item.annual_quantity)?;
    }
    Ok(())
}

pub fn validate_services(services: &[SubcontractService]) -> EstimateResult<()> {
    ensure_unique("subcontract service", services.iter().map(|s| s.id.as_str()))?;
    for service in services {
        ensure_non_negative(&format!("service {} annual cost", service.id), service.annual_cost)?;
        if let Some(markup) = &service.markup_override {
            ensure_finite("service overheads percent", markup.overheads_percent)?;
            ensure_finite("service profit percent", markup.profit_percent)?;
        }
    }
    Ok(())
}
