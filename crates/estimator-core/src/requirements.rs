//! Stage two: turn daily workload into fractional headcount and fleet sizes.

use crate::task::ResourceBucket;
use serde::{Deserialize, Serialize};

/// Whether headcount comes from workload math or is fixed by contract.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum EstimationMode {
    #[default]
    OutputBased,
    InputBased { headcount: f64 },
}

/// Units of capacity needed to absorb `daily_workload`.
///
/// Fractional on purpose. A zero, negative or non-finite capacity means nothing
/// has been configured and yields zero rather than an error.
pub fn required_count(daily_workload: f64, capacity: f64) -> f64 {
    if !capacity.is_finite() || capacity <= 0.0 {
        if daily_workload > 0.0 {
            tracing::warn!(
                daily_workload,
                capacity,
                "no capacity configured; requirement set to 0"
            );
        }
        return 0.0;
    }
    daily_workload / capacity
}

/// Throughput of one machine over one shift.
pub fn machine_capacity(throughput_per_hour: f64, effective_hours_per_shift: f64) -> f64 {
    throughput_per_hour * effective_hours_per_shift
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementKind {
    Labour,
    Machine,
}

/// Requirement for one resource: a labour bucket, a technician trade, or a machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementLine {
    pub resource_id: String,
    pub kind: RequirementKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<ResourceBucket>,
    pub daily_workload: f64,
    pub capacity: f64,
    pub required: f64,
    /// Whether this line adds to active headcount (machines that need an operator).
    pub staffed: bool,
}

impl RequirementLine {
    pub fn labour(
        resource_id: impl Into<String>,
        bucket: Option<ResourceBucket>,
        daily_workload: f64,
        capacity: f64,
    ) -> Self {
        Self {
            resource_id: resource_id.into(),
            kind: RequirementKind::Labour,
            bucket,
            daily_workload,
            capacity,
            required: required_count(daily_workload, capacity),
            staffed: true,
        }
    }

    pub fn machine(
        resource_id: impl Into<String>,
        daily_workload: f64,
        capacity: f64,
        staffed: bool,
    ) -> Self {
        Self {
            resource_id: resource_id.into(),
            kind: RequirementKind::Machine,
            bucket: Some(ResourceBucket::MachineAssisted),
            daily_workload,
            capacity,
            required: required_count(daily_workload, capacity),
            staffed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRequirements {
    pub mode: EstimationMode,
    pub lines: Vec<RequirementLine>,
    /// Sum of every staffed line's requirement, whatever the mode.
    pub derived_active: f64,
    /// Headcount the rest of the pipeline works from.
    pub total_active: f64,
}

impl ResourceRequirements {
    pub fn new(mode: EstimationMode, lines: Vec<RequirementLine>) -> Self {
        let derived_active: f64 = lines
            .iter()
            .filter(|line| line.staffed)
            .fold(0.0, |acc, line| acc + line.required);
        let total_active = match mode {
            EstimationMode::OutputBased => derived_active,
            EstimationMode::InputBased { headcount } => headcount,
        };
        tracing::debug!(?mode, derived_active, total_active, "resource requirements derived");
        Self {
            mode,
            lines,
            derived_active,
            total_active,
        }
    }

    pub fn line(&self, resource_id: &str) -> Option<&RequirementLine> {
        self.lines.iter().find(|line| line.resource_id == resource_id)
    }

    pub fn machine_lines(&self) -> impl Iterator<Item = &RequirementLine> {
        self.lines
            .iter()
            .filter(|line| line.kind == RequirementKind::Machine)
    }

    /// Active headcount attributed to the labour line `resource_id`.
    ///
    /// Output-based mode returns the line's own requirement. Input-based mode
    /// apportions the supplied headcount by each line's share of the derived
    /// total, or evenly across `resource_ids` when nothing was derived.
    pub fn active_share(&self, resource_id: &str, resource_ids: &[&str]) -> f64 {
        let own = self
            .lines
            .iter()
            .find(|line| line.kind == RequirementKind::Labour && line.resource_id == resource_id)
            .map(|line| line.required)
            .unwrap_or(0.0);
        match self.mode {
            EstimationMode::OutputBased => own,
            EstimationMode::InputBased { headcount } => {
                if self.derived_active > 0.0 {
                    headcount * own / self.derived_active
                } else if resource_ids.contains(&resource_id) {
                    headcount / resource_ids.len() as f64
                } else {
                    0.0
                }
            }
        }
    }
}
