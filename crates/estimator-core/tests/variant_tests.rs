use service_estimator::costing::CostCategory;
use service_estimator::{
    CatalogItem, EstimateError, EstimateInput, EstimationMode, FacilitiesEstimate, FlatRole,
    Frequency, MarkupConfig, RecurringTask, ResourceBucket, RetrofitEstimate, RetrofitMaterial,
    SubcontractService, TechnicianType, VariantKind, merge_by_key, run,
};

const EPS: f64 = 1e-6;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPS,
        "expected {expected}, got {actual}"
    );
}

fn coverage_factor() -> f64 {
    365.0 / 263.0
}

fn hvac_technician() -> TechnicianType {
    let mut tech = TechnicianType::new("hvac_tech", "hvac", 2500.0, 4.0);
    tech.monthly_allowances = 500.0;
    tech
}

fn facilities_estimate() -> FacilitiesEstimate {
    let mut excluded = CatalogItem::new("spare_motor", 900.0, 2.0);
    excluded.included = false;

    FacilitiesEstimate {
        tasks: vec![
            RecurringTask::new("ahu_ppm", 120.0, Frequency::Monthly, ResourceBucket::asset("hvac")),
            RecurringTask::new(
                "db_ppm",
                60.0,
                Frequency::Monthly,
                ResourceBucket::asset("electrical"),
            ),
        ],
        technicians: vec![hvac_technician()],
        staff: vec![FlatRole::new("site_engineer", 4000.0, 1.0)],
        materials: vec![CatalogItem::new("filters", 50.0, 10.0), excluded],
        consumables: vec![CatalogItem::new("cleaning_kit", 5.0, 100.0)],
        subcontract_services: vec![
            SubcontractService::new("lifts", 12_000.0),
            SubcontractService::new("fire_alarm", 10_000.0)
                .with_markup(MarkupConfig::new(0.0, 20.0)),
        ],
        ..FacilitiesEstimate::default()
    }
}

#[test]
fn facilities_trades_are_sized_per_asset_category() {
    let result = run(&facilities_estimate()).expect("estimate runs");

    let hvac = result.requirements.line("hvac_tech").expect("hvac line");
    assert_close(hvac.daily_workload, 4.0);
    assert_close(hvac.required, 1.0);

    let gap = result
        .requirements
        .line("unassigned:asset:electrical")
        .expect("unserved category is reported");
    assert_close(gap.daily_workload, 2.0);
    assert_eq!(gap.required, 0.0);

    assert_close(result.requirements.total_active, 1.0);
    assert_close(result.total_headcount(), coverage_factor());
}

#[test]
fn facilities_costs_split_in_house_and_subcontract_paths() {
    let result = run(&facilities_estimate()).expect("estimate runs");

    let manpower = 3000.0 * 12.0 * coverage_factor() + 48_000.0;
    assert_close(result.totals.manpower, manpower);
    assert_close(result.totals.materials, 500.0);
    assert_close(result.totals.consumables, 500.0);
    assert_close(result.totals.subcontract, 22_000.0);

    let in_house_direct = manpower + 1000.0;
    assert_close(result.pricing.in_house.direct_cost, in_house_direct);
    assert_close(result.pricing.in_house.selling_annual, in_house_direct * 1.1 * 1.15);

    // Pooled services at 5/10, the override at 0/20.
    let subcontract = 12_000.0 * 1.05 * 1.1 + 10_000.0 * 1.2;
    assert_close(result.pricing.subcontract.selling_annual, subcontract);
    assert_close(
        result.selling_annual(),
        in_house_direct * 1.1 * 1.15 + subcontract,
    );

    let subcontract_lines = result
        .cost_lines
        .iter()
        .filter(|line| line.category == CostCategory::Subcontract)
        .count();
    assert_eq!(subcontract_lines, 2);
}

#[test]
fn excluded_subcontract_services_are_not_priced() {
    let mut estimate = facilities_estimate();
    for service in &mut estimate.subcontract_services {
        service.included = false;
    }
    let result = run(&estimate).expect("estimate runs");
    assert_eq!(result.totals.subcontract, 0.0);
    assert_eq!(result.pricing.subcontract.selling_annual, 0.0);
}

#[test]
fn input_based_headcount_is_apportioned_across_trades() {
    let mut estimate = facilities_estimate();
    estimate
        .technicians
        .push(TechnicianType::new("electrician", "electrical", 2000.0, 1.0));
    estimate.mode = EstimationMode::InputBased { headcount: 6.0 };

    let result = run(&estimate).expect("estimate runs");
    // Derived: hvac 1.0, electrical 2.0.
    assert_close(result.requirements.derived_active, 3.0);
    assert_eq!(result.requirements.total_active, 6.0);

    let factor = coverage_factor();
    let hvac_cost = result
        .cost_lines
        .iter()
        .find(|line| line.item == "hvac_tech")
        .expect("hvac cost line");
    assert_close(hvac_cost.quantity, 2.0 * factor);
    let electrician = result
        .cost_lines
        .iter()
        .find(|line| line.item == "electrician")
        .expect("electrician cost line");
    assert_close(electrician.quantity, 4.0 * factor);
}

#[test]
fn input_based_headcount_is_split_evenly_without_workload() {
    let mut estimate = facilities_estimate();
    estimate.tasks.clear();
    estimate
        .technicians
        .push(TechnicianType::new("electrician", "electrical", 2000.0, 1.0));
    estimate.mode = EstimationMode::InputBased { headcount: 4.0 };

    let result = run(&estimate).expect("estimate runs");
    let quantities: Vec<f64> = result
        .cost_lines
        .iter()
        .filter(|line| line.item == "hvac_tech" || line.item == "electrician")
        .map(|line| line.quantity)
        .collect();
    assert_eq!(quantities.len(), 2);
    for quantity in quantities {
        assert_close(quantity, 2.0 * coverage_factor());
    }
}

#[test]
fn input_based_headcount_needs_a_trade_to_cost() {
    let mut estimate = FacilitiesEstimate::default();
    estimate.mode = EstimationMode::InputBased { headcount: 10.0 };
    let err = run(&estimate).unwrap_err();
    assert!(matches!(
        err,
        EstimateError::InvalidInput(ref message) if message.contains("technician")
    ));

    let mut retrofit = RetrofitEstimate::default();
    retrofit.mode = EstimationMode::InputBased { headcount: 10.0 };
    assert!(matches!(run(&retrofit), Err(EstimateError::InvalidInput(_))));

    // Zero heads costs nothing either way.
    estimate.mode = EstimationMode::InputBased { headcount: 0.0 };
    assert!(run(&estimate).is_ok());
}

#[test]
fn technician_categories_must_be_unique() {
    let mut estimate = facilities_estimate();
    estimate
        .technicians
        .push(TechnicianType::new("hvac_helper", "hvac", 1500.0, 2.0));
    let err = run(&estimate).unwrap_err();
    assert!(matches!(
        err,
        EstimateError::DuplicateId {
            kind: "technician category",
            ..
        }
    ));
}

fn retrofit_estimate() -> RetrofitEstimate {
    RetrofitEstimate {
        scope: vec![RecurringTask::new(
            "led_fittings",
            3650.0,
            Frequency::Annual,
            ResourceBucket::asset("lighting"),
        )],
        crews: vec![TechnicianType::new("electricians", "lighting", 2800.0, 20.0)],
        project_team: vec![FlatRole::new("project_manager", 5000.0, 1.0)],
        materials: vec![RetrofitMaterial::new("led_driver", "led_fittings", 15.0, 1.0)],
        specialist_services: vec![SubcontractService::new("commissioning", 20_000.0)],
        ..RetrofitEstimate::default()
    }
}

#[test]
fn retrofit_materials_follow_scope_volume() {
    let result = run(&retrofit_estimate()).expect("estimate runs");

    assert_eq!(result.variant, VariantKind::Retrofit);
    assert_close(result.requirements.total_active, 0.5);

    let driver = result
        .cost_lines
        .iter()
        .find(|line| line.item == "led_driver")
        .expect("material line");
    assert_close(driver.quantity, 3650.0);
    assert_close(driver.annual_cost, 54_750.0);

    let manpower = 2800.0 * 12.0 * 0.5 * coverage_factor() + 60_000.0;
    assert_close(result.totals.manpower, manpower);
    assert_close(result.pricing.subcontract.selling_annual, 20_000.0 * 1.05 * 1.1);
}

#[test]
fn retrofit_material_must_reference_scope() {
    let mut estimate = retrofit_estimate();
    estimate
        .materials
        .push(RetrofitMaterial::new("cable", "rewiring", 2.0, 10.0));
    assert!(matches!(run(&estimate), Err(EstimateError::InvalidInput(_))));
}

#[test]
fn input_dispatches_to_each_variant() {
    for kind in [
        VariantKind::Housekeeping,
        VariantKind::Facilities,
        VariantKind::Retrofit,
    ] {
        let input = EstimateInput::new(kind);
        assert_eq!(input.kind(), kind);
        let result = input.estimate().expect("empty estimate runs");
        assert_eq!(result.variant, kind);
        assert_eq!(result.total_headcount(), 0.0);
    }
}

#[test]
fn organisation_library_merges_with_project_overrides() {
    let library = vec![
        hvac_technician(),
        TechnicianType::new("plumber", "plumbing", 2200.0, 6.0),
    ];
    let mut project_hvac = hvac_technician();
    project_hvac.monthly_salary = 2700.0;
    let overrides = vec![
        project_hvac,
        TechnicianType::new("fire_tech", "fire", 2600.0, 5.0),
    ];

    let merged = merge_by_key(&library, &overrides);
    let ids: Vec<&str> = merged.iter().map(|tech| tech.id.as_str()).collect();
    assert_eq!(ids, ["hvac_tech", "plumber", "fire_tech"]);
    assert_eq!(merged[0].monthly_salary, 2700.0);
    assert_eq!(library[0].monthly_salary, 2500.0);
}
