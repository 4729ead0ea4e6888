use service_estimator::{
    EstimateError, Frequency, RecurringTask, ResourceBucket, aggregate, normalize,
};

fn general(id: &str, quantity: f64, frequency: Frequency) -> RecurringTask {
    RecurringTask::new(id, quantity, frequency, ResourceBucket::ManualGeneral)
}

#[test]
fn daily_equivalent_decreases_as_interval_lengthens() {
    let rates: Vec<f64> = Frequency::ALL
        .iter()
        .map(|frequency| normalize(&general("t", 1000.0, *frequency)))
        .collect();
    for pair in rates.windows(2) {
        assert!(pair[0] > pair[1], "expected strictly decreasing rates: {rates:?}");
    }
    assert_eq!(rates[0], 1000.0);
    assert_eq!(rates[1], 1000.0 / 7.0);
    assert_eq!(rates[6], 1000.0 / 365.0);
}

#[test]
fn repetitions_only_apply_to_daily_tasks() {
    let daily = general("lobby", 200.0, Frequency::Daily).with_repetitions(3);
    assert_eq!(normalize(&daily), 600.0);

    let weekly = general("car_park", 700.0, Frequency::Weekly).with_repetitions(3);
    assert_eq!(normalize(&weekly), 100.0);
}

#[test]
fn unknown_frequency_is_rejected_when_reading_tasks() {
    let json = r#"{ "id": "t1", "quantity": 10.0, "frequency": "hourly", "bucket": "manual_general" }"#;
    let err = serde_json::from_str::<RecurringTask>(json).unwrap_err();
    assert!(err.to_string().contains("hourly"), "{err}");

    let parsed: Result<Frequency, EstimateError> = "every now and then".parse();
    assert!(matches!(parsed, Err(EstimateError::UnknownFrequency(_))));
}

#[test]
fn aggregate_totals_by_bucket_and_machine() {
    let tasks = vec![
        general("corridor", 300.0, Frequency::Daily),
        RecurringTask::new("atrium", 1400.0, Frequency::Weekly, ResourceBucket::MachineAssisted)
            .with_machine("scrubber"),
        RecurringTask::new("hall", 600.0, Frequency::Daily, ResourceBucket::MachineAssisted),
        RecurringTask::new("toilets", 50.0, Frequency::Daily, ResourceBucket::ManualDetailed)
            .with_repetitions(4),
    ];

    let summary = aggregate(&tasks);

    assert_eq!(summary.tasks.len(), 4);
    assert_eq!(summary.bucket_total(&ResourceBucket::ManualGeneral), 300.0);
    assert_eq!(summary.bucket_total(&ResourceBucket::ManualDetailed), 200.0);
    assert_eq!(summary.bucket_total(&ResourceBucket::MachineAssisted), 800.0);
    assert_eq!(summary.machine_total("scrubber"), 200.0);
    assert_eq!(summary.machine_total("unknown"), 0.0);
    assert_eq!(summary.total(), 1300.0);
}

#[test]
fn asset_buckets_aggregate_per_category() {
    let tasks = vec![
        RecurringTask::new("ahu-ppm", 12.0, Frequency::Monthly, ResourceBucket::asset("hvac")),
        RecurringTask::new("fcu-ppm", 90.0, Frequency::Quarterly, ResourceBucket::asset("hvac")),
        RecurringTask::new("db-ppm", 30.0, Frequency::Monthly, ResourceBucket::asset("electrical")),
    ];
    let summary = aggregate(&tasks);

    let hvac = summary.bucket_total(&ResourceBucket::asset("hvac"));
    assert!((hvac - (12.0 / 30.0 + 1.0)).abs() < 1e-12);
    assert_eq!(summary.bucket_total(&ResourceBucket::asset("electrical")), 1.0);
    assert_eq!(summary.by_bucket.len(), 2);
}
