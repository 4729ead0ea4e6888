use super::migrate::{CURRENT_SCHEMA_VERSION, migrate};
use super::{PersistenceError, PersistenceResult};
use crate::estimate::EstimateInput;
use crate::frequency::Frequency;
use crate::task::{RecurringTask, ResourceBucket};
use crate::task_validation;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

#[derive(Serialize, Deserialize)]
struct EstimateSnapshot {
    schema_version: u64,
    input: EstimateInput,
}

pub fn save_estimate_to_json<P: AsRef<Path>>(
    input: &EstimateInput,
    path: P,
) -> PersistenceResult<()> {
    let snapshot = EstimateSnapshot {
        schema_version: CURRENT_SCHEMA_VERSION,
        input: input.clone(),
    };
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    Ok(())
}

/// Load a snapshot, upgrading older shapes first.
pub fn load_estimate_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<EstimateInput> {
    let file = File::open(path)?;
    let raw: serde_json::Value = serde_json::from_reader(file)?;
    let snapshot: EstimateSnapshot = serde_json::from_value(migrate(raw)?)?;
    Ok(snapshot.input)
}

#[derive(Default, Serialize, Deserialize)]
struct TaskCsvRecord {
    id: String,
    name: String,
    quantity: f64,
    frequency: String,
    #[serde(default)]
    repetitions_per_day: String,
    bucket: String,
    #[serde(default)]
    machine_id: String,
}

impl From<&RecurringTask> for TaskCsvRecord {
    fn from(task: &RecurringTask) -> Self {
        Self {
            id: task.id.clone(),
            name: task.name.clone(),
            quantity: task.quantity,
            frequency: task.frequency.to_string(),
            repetitions_per_day: task
                .repetitions_per_day
                .map(|count| count.to_string())
                .unwrap_or_default(),
            bucket: task.bucket.label(),
            machine_id: task.machine_id.clone().unwrap_or_default(),
        }
    }
}

impl TaskCsvRecord {
    fn into_task(self, row: usize) -> PersistenceResult<RecurringTask> {
        let frequency: Frequency = self.frequency.parse().map_err(|err| {
            PersistenceError::InvalidData(format!("row {row}: {err}"))
        })?;
        let bucket: ResourceBucket = self.bucket.parse().map_err(|err| {
            PersistenceError::InvalidData(format!("row {row}: {err}"))
        })?;
        let repetitions_per_day = parse_u32(&self.repetitions_per_day)
            .map_err(|msg| PersistenceError::InvalidData(format!("row {row}: {msg}")))?;

        let name = if self.name.trim().is_empty() {
            self.id.clone()
        } else {
            self.name
        };
        Ok(RecurringTask {
            id: self.id,
            name,
            quantity: self.quantity,
            frequency,
            repetitions_per_day,
            bucket,
            machine_id: parse_string_option(self.machine_id),
        })
    }
}

pub fn save_tasks_to_csv<P: AsRef<Path>>(
    tasks: &[RecurringTask],
    path: P,
) -> PersistenceResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for task in tasks {
        writer.serialize(TaskCsvRecord::from(task))?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a task list. Rows are checked individually; machine references are
/// checked when the list is estimated against a fleet.
pub fn load_tasks_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<RecurringTask>> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut tasks = Vec::new();
    for (idx, record) in reader.deserialize::<TaskCsvRecord>().enumerate() {
        let task = record?.into_task(idx + 1)?;
        task_validation::validate_task(&task)?;
        tasks.push(task);
    }
    if tasks.is_empty() {
        return Err(PersistenceError::InvalidData(
            "CSV file contained no tasks".into(),
        ));
    }
    let mut seen = std::collections::HashSet::new();
    for task in &tasks {
        if !seen.insert(task.id.as_str()) {
            return Err(PersistenceError::InvalidData(format!(
                "duplicate task id {}",
                task.id
            )));
        }
    }
    Ok(tasks)
}

fn parse_u32(input: &str) -> Result<Option<u32>, String> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    input
        .trim()
        .parse::<u32>()
        .map(Some)
        .map_err(|e| format!("invalid integer '{input}': {e}"))
}

fn parse_string_option(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
