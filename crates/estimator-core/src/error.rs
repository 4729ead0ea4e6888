use thiserror::Error;

/// Failures the estimation pipeline refuses to paper over.
///
/// Degenerate-but-valid inputs (zero productivity, zero working days) never
/// produce an error; they resolve to documented fallback values instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimateError {
    #[error("unknown recurrence frequency '{0}'")]
    UnknownFrequency(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("duplicate {kind} id '{id}'")]
    DuplicateId { kind: &'static str, id: String },
    #[error("task {task_id} references unknown machine '{machine_id}'")]
    UnknownMachine { task_id: String, machine_id: String },
}

impl EstimateError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

pub type EstimateResult<T> = Result<T, EstimateError>;
