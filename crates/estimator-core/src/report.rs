//! Tabular views of an [`EstimationResult`] for presentation and export layers.

use crate::pipeline::EstimationResult;
use polars::prelude::PlSmallStr;
use polars::prelude::*;

/// One row per normalized task.
pub fn workload_frame(result: &EstimationResult) -> PolarsResult<DataFrame> {
    let tasks = &result.workload.tasks;
    let ids: Vec<&str> = tasks.iter().map(|task| task.task_id.as_str()).collect();
    let buckets: Vec<String> = tasks.iter().map(|task| task.bucket.label()).collect();
    let machines: Vec<Option<&str>> = tasks.iter().map(|task| task.machine_id.as_deref()).collect();
    let daily: Vec<f64> = tasks.iter().map(|task| task.daily_equivalent).collect();

    DataFrame::new(vec![
        Series::new(PlSmallStr::from_static("task_id"), ids).into_column(),
        Series::new(PlSmallStr::from_static("bucket"), buckets).into_column(),
        Series::new(PlSmallStr::from_static("machine_id"), machines).into_column(),
        Series::new(PlSmallStr::from_static("daily_equivalent"), daily).into_column(),
    ])
}

/// One row per annual cost line, machinery included.
pub fn cost_lines_frame(result: &EstimationResult) -> PolarsResult<DataFrame> {
    let mut categories: Vec<&str> = Vec::new();
    let mut items: Vec<String> = Vec::new();
    let mut quantities: Vec<f64> = Vec::new();
    let mut costs: Vec<f64> = Vec::new();

    for line in &result.cost_lines {
        categories.push(line.category.as_str());
        items.push(line.item.clone());
        quantities.push(line.quantity);
        costs.push(line.annual_cost);
    }
    for machine in &result.machinery {
        categories.push("machinery");
        items.push(machine.name.clone());
        quantities.push(f64::from(machine.quantity_used));
        costs.push(machine.annual_cost);
    }

    DataFrame::new(vec![
        Series::new(PlSmallStr::from_static("category"), categories).into_column(),
        Series::new(PlSmallStr::from_static("item"), items).into_column(),
        Series::new(PlSmallStr::from_static("quantity"), quantities).into_column(),
        Series::new(PlSmallStr::from_static("annual_cost"), costs).into_column(),
    ])
}

/// Annual cost summed per category, in first-seen order.
pub fn category_totals(result: &EstimationResult) -> PolarsResult<DataFrame> {
    cost_lines_frame(result)?
        .lazy()
        .group_by_stable([col("category")])
        .agg([col("annual_cost").sum()])
        .collect()
}
