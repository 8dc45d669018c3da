use therapy_dashboard::{
    ColumnSchema, Dataset, FilterSelection, Halt, RenderOutcome, Value,
};

// Build the two-session dataset used by the end-to-end scenarios.
fn sample_dataset(schema: &ColumnSchema) -> Dataset {
    let mut ds = Dataset::new(vec![
        schema.therapist.clone(),
        schema.therapy_type.clone(),
        schema.cost.clone(),
        schema.duration.clone(),
        schema.participants.clone(),
    ]);
    ds.push_row(vec![
        Value::Text("Alice".to_string()),
        Value::Text("CBT".to_string()),
        Value::Number(100.0),
        Value::Number(1.0),
        Value::Number(2.0),
    ]);
    ds.push_row(vec![
        Value::Text("Bob".to_string()),
        Value::Text("CBT".to_string()),
        Value::Number(200.0),
        Value::Number(2.0),
        Value::Number(3.0),
    ]);
    ds
}

fn expect_report(outcome: RenderOutcome) -> therapy_dashboard::DashboardReport {
    match outcome {
        RenderOutcome::Report(report) => report,
        RenderOutcome::Halted(halt) => panic!("unexpected halt: {}", halt.message()),
    }
}

fn test_unfiltered_render() {
    println!("\n====== Testing unfiltered render ======");
    let schema = ColumnSchema::default();
    let ds = sample_dataset(&schema);
    let selection = FilterSelection::all(&ds, &schema);

    let report = expect_report(therapy_dashboard::pipeline::render(&ds, &schema, &selection));
    assert_eq!(report.row_count, 2);
    assert_eq!(report.kpis.total_cost, 300);
    assert_eq!(report.kpis.average_duration, 1.5);
    assert_eq!(report.kpis.average_participants, 2.5);
    assert_eq!(report.cost_by_therapy_type.entries, vec![("CBT".to_string(), 300.0)]);
    assert_eq!(
        report.duration_by_therapist.entries,
        vec![("Alice".to_string(), 1.0), ("Bob".to_string(), 2.0)]
    );
    println!("✓ Unfiltered render produced the expected KPIs and groupings");
}

fn test_single_therapist_render() {
    println!("\n====== Testing single-therapist selection ======");
    let schema = ColumnSchema::default();
    let ds = sample_dataset(&schema);
    let selection =
        FilterSelection::from_lists(vec!["Alice".to_string()], vec!["CBT".to_string()]);

    let report = expect_report(therapy_dashboard::pipeline::render(&ds, &schema, &selection));
    assert_eq!(report.row_count, 1);
    assert_eq!(report.kpis.total_cost, 100);
    assert_eq!(report.kpis.average_duration, 1.0);
    assert_eq!(report.kpis.average_participants, 2.0);
    println!("✓ Selecting only Alice narrowed the report to her session");
}

fn test_empty_selection_halts() {
    println!("\n====== Testing empty-result halt ======");
    let schema = ColumnSchema::default();
    let ds = sample_dataset(&schema);
    let selection =
        FilterSelection::from_lists(vec!["Alice".to_string()], vec!["EMDR".to_string()]);

    match therapy_dashboard::pipeline::render(&ds, &schema, &selection) {
        RenderOutcome::Halted(Halt::EmptyResult) => {
            println!("✓ Unmatched filter combination halted before aggregation")
        }
        other => panic!("expected an empty-result halt, got {:?}", other),
    }
}

fn test_missing_column_halts() {
    println!("\n====== Testing schema halt ======");
    let schema = ColumnSchema::default();
    let ds = Dataset::new(vec![schema.therapist.clone(), schema.therapy_type.clone()]);

    match therapy_dashboard::pipeline::render(&ds, &schema, &FilterSelection::default()) {
        RenderOutcome::Halted(Halt::SchemaFailure { column }) => {
            assert_eq!(column, "Cot_total_de_la_sance");
            println!("✓ Validation reported the first missing column: {}", column);
        }
        other => panic!("expected a schema halt, got {:?}", other),
    }
}

fn test_chart_rendering() {
    println!("\n====== Testing chart rendering ======");
    let schema = ColumnSchema::default();
    let ds = sample_dataset(&schema);
    let selection = FilterSelection::all(&ds, &schema);

    let report = expect_report(therapy_dashboard::pipeline::render(&ds, &schema, &selection));
    let cost_png = therapy_dashboard::charts::cost_by_therapy_type_chart(&report.cost_by_therapy_type)
        .expect("cost chart");
    let duration_png =
        therapy_dashboard::charts::duration_by_therapist_chart(&report.duration_by_therapist)
            .expect("duration chart");
    assert!(cost_png.starts_with(&[0x89, b'P', b'N', b'G']));
    assert!(duration_png.starts_with(&[0x89, b'P', b'N', b'G']));
    println!(
        "✓ Both charts rendered to PNG ({} and {} bytes)",
        cost_png.len(),
        duration_png.len()
    );
}

fn test_grouping_order() {
    println!("\n====== Testing grouped-aggregate ordering ======");
    let schema = ColumnSchema::default();
    let mut ds = Dataset::new(vec![
        schema.therapist.clone(),
        schema.therapy_type.clone(),
        schema.cost.clone(),
        schema.duration.clone(),
        schema.participants.clone(),
    ]);
    for (who, kind, cost) in [("X", "A", 300.0), ("Y", "B", 100.0), ("Z", "C", 200.0)] {
        ds.push_row(vec![
            Value::Text(who.to_string()),
            Value::Text(kind.to_string()),
            Value::Number(cost),
            Value::Number(1.0),
            Value::Number(1.0),
        ]);
    }
    let selection = FilterSelection::all(&ds, &schema);
    let report = expect_report(therapy_dashboard::pipeline::render(&ds, &schema, &selection));

    let keys: Vec<&str> = report
        .cost_by_therapy_type
        .entries
        .iter()
        .map(|(k, _)| k.as_str())
        .collect();
    assert_eq!(keys, vec!["B", "C", "A"]);
    println!("✓ Cost by type is ordered ascending by summed cost: B, C, A");
}

fn main() {
    println!("Running pipeline end-to-end checks...");

    test_unfiltered_render();
    test_single_therapist_render();
    test_empty_selection_halts();
    test_missing_column_halts();
    test_grouping_order();
    test_chart_rendering();

    println!("\nAll pipeline checks passed!");
}
