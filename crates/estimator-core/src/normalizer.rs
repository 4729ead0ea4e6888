//! Stage one: spread every recurring task over an average day.

use crate::task::{RecurringTask, ResourceBucket};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Daily-equivalent workload of a single task.
pub fn normalize(task: &RecurringTask) -> f64 {
    task.quantity / task.frequency.divisor_days() * task.repetition_multiplier()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTask {
    pub task_id: String,
    pub bucket: ResourceBucket,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine_id: Option<String>,
    pub daily_equivalent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketWorkload {
    pub bucket: ResourceBucket,
    pub daily_equivalent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineWorkload {
    pub machine_id: String,
    pub daily_equivalent: f64,
}

/// Daily-equivalent totals, per task, per bucket and per machine.
///
/// Bucket and machine rows are ordered by key so repeated runs sum in the same
/// order and produce identical floats.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkloadSummary {
    pub tasks: Vec<NormalizedTask>,
    pub by_bucket: Vec<BucketWorkload>,
    pub by_machine: Vec<MachineWorkload>,
}

impl WorkloadSummary {
    pub fn bucket_total(&self, bucket: &ResourceBucket) -> f64 {
        self.by_bucket
            .iter()
            .find(|row| &row.bucket == bucket)
            .map(|row| row.daily_equivalent)
            .unwrap_or(0.0)
    }

    pub fn machine_total(&self, machine_id: &str) -> f64 {
        self.by_machine
            .iter()
            .find(|row| row.machine_id == machine_id)
            .map(|row| row.daily_equivalent)
            .unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.by_bucket
            .iter()
            .fold(0.0, |acc, row| acc + row.daily_equivalent)
    }
}

pub fn aggregate(tasks: &[RecurringTask]) -> WorkloadSummary {
    let mut normalized = Vec::with_capacity(tasks.len());
    let mut by_bucket: BTreeMap<ResourceBucket, f64> = BTreeMap::new();
    let mut by_machine: BTreeMap<String, f64> = BTreeMap::new();

    for task in tasks {
        let daily_equivalent = normalize(task);
        *by_bucket.entry(task.bucket.clone()).or_insert(0.0) += daily_equivalent;
        if let Some(machine_id) = &task.machine_id {
            *by_machine.entry(machine_id.clone()).or_insert(0.0) += daily_equivalent;
        }
        normalized.push(NormalizedTask {
            task_id: task.id.clone(),
            bucket: task.bucket.clone(),
            machine_id: task.machine_id.clone(),
            daily_equivalent,
        });
    }

    tracing::debug!(
        tasks = normalized.len(),
        buckets = by_bucket.len(),
        machines = by_machine.len(),
        "normalized recurring tasks"
    );

    WorkloadSummary {
        tasks: normalized,
        by_bucket: by_bucket
            .into_iter()
            .map(|(bucket, daily_equivalent)| BucketWorkload {
                bucket,
                daily_equivalent,
            })
            .collect(),
        by_machine: by_machine
            .into_iter()
            .map(|(machine_id, daily_equivalent)| MachineWorkload {
                machine_id,
                daily_equivalent,
            })
            .collect(),
    }
}
