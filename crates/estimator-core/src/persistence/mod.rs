use crate::error::EstimateError;
use crate::estimate::EstimateInput;
use crate::metadata::ProjectStatus;
use crate::pipeline::{EstimationResult, VariantKind};
use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeJsonError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] SerdeJsonError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("cannot migrate snapshot: {0}")]
    Migration(String),
    #[error("estimate rejected: {0}")]
    Estimate(#[from] EstimateError),
    #[error("project status cannot move from {from} to {to}")]
    InvalidTransition {
        from: ProjectStatus,
        to: ProjectStatus,
    },
    #[error("no project stored with id '{0}'")]
    NotFound(String),
    #[error("store connection lock poisoned")]
    LockPoisoned,
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// A saved estimate: the estimator state plus the last result computed from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredProject {
    pub id: String,
    pub input: EstimateInput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<EstimationResult>,
}

impl StoredProject {
    pub fn new(id: impl Into<String>, input: EstimateInput) -> Self {
        Self {
            id: id.into(),
            input,
            result: None,
        }
    }

    /// Recompute and cache the result. The pipeline itself never caches.
    pub fn recompute(&mut self) -> Result<&EstimationResult, EstimateError> {
        let result = self.input.estimate()?;
        Ok(self.result.insert(result))
    }

    pub fn status(&self) -> ProjectStatus {
        self.input.metadata().status
    }

    pub fn summary(&self) -> ProjectSummary {
        ProjectSummary {
            id: self.id.clone(),
            project_name: self.input.metadata().project_name.clone(),
            variant: self.input.kind(),
            status: self.status(),
            selling_annual: self.result.as_ref().map(EstimationResult::selling_annual),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: String,
    pub project_name: String,
    pub variant: VariantKind,
    pub status: ProjectStatus,
    pub selling_annual: Option<f64>,
}

pub trait EstimateStore {
    fn save_project(&self, project: &StoredProject) -> PersistenceResult<()>;
    fn load_project(&self, id: &str) -> PersistenceResult<Option<StoredProject>>;
    fn list_projects(&self) -> PersistenceResult<Vec<ProjectSummary>>;
    fn delete_project(&self, id: &str) -> PersistenceResult<bool>;

    /// Move a stored project along its lifecycle, rejecting illegal moves.
    fn update_status(&self, id: &str, next: ProjectStatus) -> PersistenceResult<StoredProject> {
        let mut project = self
            .load_project(id)?
            .ok_or_else(|| PersistenceError::NotFound(id.to_string()))?;
        let current = project.status();
        if !current.can_transition_to(next) {
            return Err(PersistenceError::InvalidTransition {
                from: current,
                to: next,
            });
        }
        project.input.metadata_mut().status = next;
        self.save_project(&project)?;
        tracing::info!(project = id, from = %current, to = %next, "project status updated");
        Ok(project)
    }
}

pub mod file;
pub mod migrate;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{
    load_estimate_from_json, load_tasks_from_csv, save_estimate_to_json, save_tasks_to_csv,
};
pub use migrate::{CURRENT_SCHEMA_VERSION, migrate};
