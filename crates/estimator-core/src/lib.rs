pub mod calendar;
pub mod catalog;
pub mod config;
pub mod costing;
pub mod coverage;
pub mod error;
pub mod estimate;
pub mod frequency;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod metadata;
pub mod normalizer;
pub mod persistence;
pub mod pipeline;
pub mod pricing;
pub mod report;
pub mod requirements;
pub mod resource;
pub mod task;
pub mod task_validation;
pub mod telemetry;
pub mod variants;

pub use calendar::{HolidayCalendar, HolidayCalendarConfig};
pub use catalog::{Keyed, merge_by_key};
pub use config::{AppConfig, ConfigError, TelemetryConfig};
pub use costing::{CostCategory, CostLine, CostTotals, FleetVariance, MachineCost};
pub use coverage::{CoverageAdjustment, SiteCalendar, adjust_for_coverage};
pub use error::{EstimateError, EstimateResult};
pub use estimate::{EstimateInput, estimate_batch};
pub use frequency::Frequency;
pub use metadata::{ProjectMetadata, ProjectStatus};
pub use normalizer::{WorkloadSummary, aggregate, normalize};
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteEstimateStore;
pub use persistence::{
    EstimateStore, PersistenceError, ProjectSummary, StoredProject, load_estimate_from_json,
    load_tasks_from_csv, save_estimate_to_json, save_tasks_to_csv,
};
pub use pipeline::{EstimateVariant, EstimationResult, VariantKind, run};
pub use pricing::{MarkupConfig, PriceSummary, PricedPath, price_path};
pub use requirements::{EstimationMode, RequirementKind, RequirementLine, ResourceRequirements};
pub use resource::{CatalogItem, FlatRole, Machine, SubcontractService, TechnicianType};
pub use task::{RecurringTask, ResourceBucket};
pub use variants::{
    FacilitiesEstimate, HousekeepingCosts, HousekeepingEstimate, HousekeepingProductivity,
    RetrofitEstimate, RetrofitMaterial,
};
