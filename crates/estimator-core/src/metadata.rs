use crate::error::EstimateError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a project sits in the bid lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Draft,
    Submitted,
    Approved,
    Awarded,
    Lost,
}

impl ProjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::Draft => "draft",
            ProjectStatus::Submitted => "submitted",
            ProjectStatus::Approved => "approved",
            ProjectStatus::Awarded => "awarded",
            ProjectStatus::Lost => "lost",
        }
    }

    /// Submitted projects may be sent back to draft; awarded and lost are final.
    pub fn can_transition_to(self, next: ProjectStatus) -> bool {
        matches!(
            (self, next),
            (ProjectStatus::Draft, ProjectStatus::Submitted)
                | (ProjectStatus::Submitted, ProjectStatus::Approved)
                | (ProjectStatus::Submitted, ProjectStatus::Draft)
                | (ProjectStatus::Approved, ProjectStatus::Awarded)
                | (ProjectStatus::Approved, ProjectStatus::Lost)
        )
    }

    pub fn is_final(self) -> bool {
        matches!(self, ProjectStatus::Awarded | ProjectStatus::Lost)
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = EstimateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(ProjectStatus::Draft),
            "submitted" => Ok(ProjectStatus::Submitted),
            "approved" => Ok(ProjectStatus::Approved),
            "awarded" => Ok(ProjectStatus::Awarded),
            "lost" => Ok(ProjectStatus::Lost),
            _ => Err(EstimateError::invalid(format!("unknown project status '{s}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    pub project_name: String,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub site_name: String,
    pub contract_start_date: NaiveDate,
    pub contract_end_date: NaiveDate,
    #[serde(default)]
    pub status: ProjectStatus,
}

impl Default for ProjectMetadata {
    fn default() -> Self {
        Self {
            project_name: "New Estimate".to_string(),
            client_name: String::new(),
            site_name: String::new(),
            contract_start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default(),
            contract_end_date: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap_or_default(),
            status: ProjectStatus::Draft,
        }
    }
}
