use crate::error::EstimateResult;
use crate::metadata::ProjectMetadata;
use crate::pipeline::{EstimateVariant, EstimationResult, VariantKind, run};
use crate::pricing::MarkupConfig;
use crate::requirements::EstimationMode;
use crate::task::RecurringTask;
use crate::variants::{FacilitiesEstimate, HousekeepingEstimate, RetrofitEstimate};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Estimator state for any contract type, as held by the presentation layer
/// and persisted by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum EstimateInput {
    Housekeeping(HousekeepingEstimate),
    Facilities(FacilitiesEstimate),
    Retrofit(RetrofitEstimate),
}

impl Default for EstimateInput {
    fn default() -> Self {
        EstimateInput::Housekeeping(HousekeepingEstimate::default())
    }
}

impl EstimateInput {
    pub fn new(kind: VariantKind) -> Self {
        match kind {
            VariantKind::Housekeeping => {
                EstimateInput::Housekeeping(HousekeepingEstimate::default())
            }
            VariantKind::Facilities => EstimateInput::Facilities(FacilitiesEstimate::default()),
            VariantKind::Retrofit => EstimateInput::Retrofit(RetrofitEstimate::default()),
        }
    }

    fn variant(&self) -> &dyn EstimateVariant {
        match self {
            EstimateInput::Housekeeping(input) => input,
            EstimateInput::Facilities(input) => input,
            EstimateInput::Retrofit(input) => input,
        }
    }

    pub fn kind(&self) -> VariantKind {
        self.variant().kind()
    }

    /// Run the full pipeline on this snapshot.
    pub fn estimate(&self) -> EstimateResult<EstimationResult> {
        run(self.variant())
    }

    pub fn metadata(&self) -> &ProjectMetadata {
        match self {
            EstimateInput::Housekeeping(input) => &input.metadata,
            EstimateInput::Facilities(input) => &input.metadata,
            EstimateInput::Retrofit(input) => &input.metadata,
        }
    }

    pub fn metadata_mut(&mut self) -> &mut ProjectMetadata {
        match self {
            EstimateInput::Housekeeping(input) => &mut input.metadata,
            EstimateInput::Facilities(input) => &mut input.metadata,
            EstimateInput::Retrofit(input) => &mut input.metadata,
        }
    }

    pub fn tasks(&self) -> &[RecurringTask] {
        self.variant().tasks()
    }

    pub fn tasks_mut(&mut self) -> &mut Vec<RecurringTask> {
        match self {
            EstimateInput::Housekeeping(input) => &mut input.tasks,
            EstimateInput::Facilities(input) => &mut input.tasks,
            EstimateInput::Retrofit(input) => &mut input.scope,
        }
    }

    pub fn set_mode(&mut self, mode: EstimationMode) {
        match self {
            EstimateInput::Housekeeping(input) => input.mode = mode,
            EstimateInput::Facilities(input) => input.mode = mode,
            EstimateInput::Retrofit(input) => input.mode = mode,
        }
    }

    /// Replace the in-house markup. Subcontract markups are left alone.
    pub fn set_markup(&mut self, markup: MarkupConfig) {
        match self {
            EstimateInput::Housekeeping(input) => input.costs.markup = markup,
            EstimateInput::Facilities(input) => input.markup = markup,
            EstimateInput::Retrofit(input) => input.markup = markup,
        }
    }
}

impl From<HousekeepingEstimate> for EstimateInput {
    fn from(value: HousekeepingEstimate) -> Self {
        EstimateInput::Housekeeping(value)
    }
}

impl From<FacilitiesEstimate> for EstimateInput {
    fn from(value: FacilitiesEstimate) -> Self {
        EstimateInput::Facilities(value)
    }
}

impl From<RetrofitEstimate> for EstimateInput {
    fn from(value: RetrofitEstimate) -> Self {
        EstimateInput::Retrofit(value)
    }
}

/// Estimate independent snapshots in parallel. Results keep input order.
pub fn estimate_batch(inputs: &[EstimateInput]) -> Vec<EstimateResult<EstimationResult>> {
    inputs.par_iter().map(EstimateInput::estimate).collect()
}
