use crate::error::EstimateError;
use crate::frequency::Frequency;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const ASSET_PREFIX: &str = "asset:";

/// Workload bucket a recurring task is charged to.
///
/// Housekeeping uses the three labour buckets; facilities and retrofit scopes
/// tag work by asset category (serialized as `asset:<category>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ResourceBucket {
    MachineAssisted,
    ManualDetailed,
    ManualGeneral,
    AssetCategory(String),
}

impl ResourceBucket {
    pub fn asset(category: impl Into<String>) -> Self {
        ResourceBucket::AssetCategory(category.into())
    }

    pub fn label(&self) -> String {
        match self {
            ResourceBucket::MachineAssisted => "machine_assisted".to_string(),
            ResourceBucket::ManualDetailed => "manual_detailed".to_string(),
            ResourceBucket::ManualGeneral => "manual_general".to_string(),
            ResourceBucket::AssetCategory(category) => format!("{ASSET_PREFIX}{category}"),
        }
    }
}

impl fmt::Display for ResourceBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.label())
    }
}

impl FromStr for ResourceBucket {
    type Err = EstimateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(category) = trimmed.strip_prefix(ASSET_PREFIX) {
            let category = category.trim();
            if category.is_empty() {
                return Err(EstimateError::invalid("asset bucket requires a category"));
            }
            return Ok(ResourceBucket::AssetCategory(category.to_string()));
        }
        match trimmed.to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "machine_assisted" | "machine" => Ok(ResourceBucket::MachineAssisted),
            "manual_detailed" | "detailed" => Ok(ResourceBucket::ManualDetailed),
            "manual_general" | "general" => Ok(ResourceBucket::ManualGeneral),
            _ => Err(EstimateError::invalid(format!("unknown resource bucket '{s}'"))),
        }
    }
}

impl TryFrom<String> for ResourceBucket {
    type Error = EstimateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ResourceBucket> for String {
    fn from(value: ResourceBucket) -> Self {
        value.label()
    }
}

/// One line of recurring work: an area to clean, a set of assets to service,
/// or a retrofit scope item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringTask {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Area (sqm) or unit count per occurrence.
    pub quantity: f64,
    pub frequency: Frequency,
    /// Same-day repeats; only honoured for daily tasks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repetitions_per_day: Option<u32>,
    pub bucket: ResourceBucket,
    /// Machine that performs this task, for machine-assisted work.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine_id: Option<String>,
}

impl RecurringTask {
    pub fn new(
        id: impl Into<String>,
        quantity: f64,
        frequency: Frequency,
        bucket: ResourceBucket,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            quantity,
            frequency,
            repetitions_per_day: None,
            bucket,
            machine_id: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_repetitions(mut self, repetitions: u32) -> Self {
        self.repetitions_per_day = Some(repetitions);
        self
    }

    pub fn with_machine(mut self, machine_id: impl Into<String>) -> Self {
        self.machine_id = Some(machine_id.into());
        self
    }

    pub fn repetition_multiplier(&self) -> f64 {
        match (self.frequency, self.repetitions_per_day) {
            (Frequency::Daily, Some(count)) => f64::from(count),
            _ => 1.0,
        }
    }
}
