use polars::prelude::{AnyValue, DataFrame};
use service_estimator::report::{category_totals, cost_lines_frame, workload_frame};
use service_estimator::{
    AppConfig, EstimateInput, EstimateStore, EstimationMode, EstimationResult, MarkupConfig,
    PersistenceError, ProjectStatus, SqliteEstimateStore, StoredProject, VariantKind,
    load_estimate_from_json, load_tasks_from_csv, save_estimate_to_json, save_tasks_to_csv,
    telemetry,
};
use std::io::{self, Write};

fn format_cell(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Float64(v) => format!("{v:.2}"),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}

fn render_df_as_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let mut cells: Vec<Vec<String>> = Vec::with_capacity(df.height());
    for row_idx in 0..df.height() {
        let row = columns
            .iter()
            .map(|col| col.get(row_idx).map(|av| format_cell(&av)).unwrap_or_default())
            .collect::<Vec<_>>();
        cells.push(row);
    }

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.len()).collect();
    for row in &cells {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell.len());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_row = |values: &[String]| {
        let mut line = String::from("|");
        for (ci, value) in values.iter().enumerate() {
            line.push(' ');
            line.push_str(value);
            line.push_str(&" ".repeat(widths[ci].saturating_sub(value.len())));
            line.push_str(" |");
        }
        line
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&col_names));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in &cells {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                         Show this help\n  new <housekeeping|facilities|retrofit>\n                               Start a fresh estimate of the given type\n  show                         Show the current input summary\n  mode output                  Size resources from the workload\n  mode input <headcount>       Use a fixed headcount\n  markup <overheads%> <profit%>\n                               Set the in-house markup\n  compute                      Run the estimate and print the cost tables\n  summary                      Print the headline figures of the last result\n  load <path.json>             Load an estimate snapshot\n  save <path.json>             Save the current estimate snapshot\n  import <path.csv>            Replace the task list from CSV\n  export <path.csv>            Write the task list to CSV\n  projects                     List stored projects\n  store <id>                   Store the current estimate and result\n  open <id>                    Open a stored project\n  status <id> <status>         Move a stored project to draft|submitted|approved|awarded|lost\n  delete <id>                  Delete a stored project\n  quit|exit                    Exit"
    );
}

fn print_input(input: &EstimateInput) {
    let metadata = input.metadata();
    println!("Project      : {}", metadata.project_name);
    println!("Client       : {}", metadata.client_name);
    println!("Contract type: {}", input.kind().as_str());
    println!("Status       : {}", metadata.status);
    println!("Tasks        : {}", input.tasks().len());
    for task in input.tasks() {
        println!(
            "  {:<16} {:>10.2} {:<10} {}",
            task.id, task.quantity, task.frequency, task.bucket
        );
    }
}

fn print_summary(result: &EstimationResult) {
    println!("Contract type     : {}", result.variant.as_str());
    println!("Active headcount  : {:.2}", result.staffing.active);
    println!("Relief headcount  : {:.2}", result.staffing.relief);
    println!("Total headcount   : {:.2}", result.total_headcount());
    println!("Coverage factor   : {:.4}", result.staffing.coverage_factor);
    println!("Selling (annual)  : {:.2}", result.selling_annual());
    println!("Selling (monthly) : {:.2}", result.selling_monthly());
}

fn print_tables(result: &EstimationResult) {
    for (title, frame) in [
        ("Workload", workload_frame(result)),
        ("Cost lines", cost_lines_frame(result)),
        ("Totals by category", category_totals(result)),
    ] {
        match frame {
            Ok(df) => println!("{title}\n{}", render_df_as_text_table(&df)),
            Err(e) => println!("Cannot render {title}: {e}"),
        }
    }
}

fn parse_variant(value: &str) -> Option<VariantKind> {
    match value.to_ascii_lowercase().as_str() {
        "housekeeping" | "hk" => Some(VariantKind::Housekeeping),
        "facilities" | "fm" | "mep" => Some(VariantKind::Facilities),
        "retrofit" => Some(VariantKind::Retrofit),
        _ => None,
    }
}

fn open_store(config: Option<&AppConfig>) -> Result<SqliteEstimateStore, PersistenceError> {
    match config.and_then(|config| config.database_path.as_ref()) {
        Some(path) => SqliteEstimateStore::new(path),
        None => SqliteEstimateStore::in_memory(),
    }
}

fn main() {
    let config = AppConfig::load().ok();
    if let Some(config) = &config {
        let _ = telemetry::init(&config.telemetry);
    }
    let store = match open_store(config.as_ref()) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Cannot open project store: {e}");
            return;
        }
    };

    let mut input = EstimateInput::default();
    let mut last_result: Option<EstimationResult> = None;

    println!("Service Estimator (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let command = line.trim();
        if command.is_empty() {
            continue;
        }

        let mut parts = command.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "show" => print_input(&input),
            "new" => match parts.next().and_then(parse_variant) {
                Some(kind) => {
                    input = EstimateInput::new(kind);
                    last_result = None;
                    println!("Started a new {} estimate.", kind.as_str());
                }
                None => println!("Usage: new <housekeeping|facilities|retrofit>"),
            },
            "mode" => match (parts.next(), parts.next()) {
                (Some("output"), None) => {
                    input.set_mode(EstimationMode::OutputBased);
                    last_result = None;
                    println!("Mode set to output-based.");
                }
                (Some("input"), Some(count)) => match count.parse::<f64>() {
                    Ok(headcount) => {
                        input.set_mode(EstimationMode::InputBased { headcount });
                        last_result = None;
                        println!("Mode set to input-based with {headcount} heads.");
                    }
                    Err(_) => println!("Invalid headcount"),
                },
                _ => println!("Usage: mode output | mode input <headcount>"),
            },
            "markup" => match (parts.next(), parts.next()) {
                (Some(oh), Some(profit)) => match (oh.parse::<f64>(), profit.parse::<f64>()) {
                    (Ok(oh), Ok(profit)) => {
                        input.set_markup(MarkupConfig::new(oh, profit));
                        last_result = None;
                        println!("Markup set to {oh}% overheads, {profit}% profit.");
                    }
                    _ => println!("Invalid percentage"),
                },
                _ => println!("Usage: markup <overheads%> <profit%>"),
            },
            "compute" => match input.estimate() {
                Ok(result) => {
                    print_tables(&result);
                    print_summary(&result);
                    last_result = Some(result);
                }
                Err(e) => println!("Estimate error: {e}"),
            },
            "summary" => match &last_result {
                Some(result) => print_summary(result),
                None => println!("Nothing computed yet; run 'compute'."),
            },
            "load" => match parts.next() {
                Some(path) => match load_estimate_from_json(path) {
                    Ok(loaded) => {
                        input = loaded;
                        last_result = None;
                        println!("Loaded estimate from {path}.");
                    }
                    Err(e) => println!("Load error: {e}"),
                },
                None => println!("Usage: load <path.json>"),
            },
            "save" => match parts.next() {
                Some(path) => match save_estimate_to_json(&input, path) {
                    Ok(()) => println!("Saved estimate to {path}."),
                    Err(e) => println!("Save error: {e}"),
                },
                None => println!("Usage: save <path.json>"),
            },
            "import" => match parts.next() {
                Some(path) => match load_tasks_from_csv(path) {
                    Ok(tasks) => {
                        let count = tasks.len();
                        *input.tasks_mut() = tasks;
                        last_result = None;
                        println!("Imported {count} tasks from {path}.");
                    }
                    Err(e) => println!("Import error: {e}"),
                },
                None => println!("Usage: import <path.csv>"),
            },
            "export" => match parts.next() {
                Some(path) => match save_tasks_to_csv(input.tasks(), path) {
                    Ok(()) => println!("Exported {} tasks to {path}.", input.tasks().len()),
                    Err(e) => println!("Export error: {e}"),
                },
                None => println!("Usage: export <path.csv>"),
            },
            "projects" => match store.list_projects() {
                Ok(projects) if projects.is_empty() => println!("No stored projects."),
                Ok(projects) => {
                    for project in projects {
                        let selling = project
                            .selling_annual
                            .map(|value| format!("{value:.2}"))
                            .unwrap_or_else(|| "-".to_string());
                        println!(
                            "  {:<16} {:<24} {:<12} {:<10} {}",
                            project.id,
                            project.project_name,
                            project.variant.as_str(),
                            project.status,
                            selling
                        );
                    }
                }
                Err(e) => println!("Store error: {e}"),
            },
            "store" => match parts.next() {
                Some(id) => {
                    let project = StoredProject {
                        id: id.to_string(),
                        input: input.clone(),
                        result: last_result.clone(),
                    };
                    match store.save_project(&project) {
                        Ok(()) => println!("Stored project {id}."),
                        Err(e) => println!("Store error: {e}"),
                    }
                }
                None => println!("Usage: store <id>"),
            },
            "open" => match parts.next() {
                Some(id) => match store.load_project(id) {
                    Ok(Some(project)) => {
                        input = project.input;
                        last_result = project.result;
                        println!("Opened project {id}.");
                    }
                    Ok(None) => println!("Project {id} not found."),
                    Err(e) => println!("Store error: {e}"),
                },
                None => println!("Usage: open <id>"),
            },
            "status" => match (parts.next(), parts.next()) {
                (Some(id), Some(status)) => match status.parse::<ProjectStatus>() {
                    Ok(next) => match store.update_status(id, next) {
                        Ok(_) => println!("Project {id} is now {next}."),
                        Err(e) => println!("Status error: {e}"),
                    },
                    Err(e) => println!("Status error: {e}"),
                },
                _ => println!("Usage: status <id> <draft|submitted|approved|awarded|lost>"),
            },
            "delete" => match parts.next() {
                Some(id) => match store.delete_project(id) {
                    Ok(true) => println!("Deleted project {id}."),
                    Ok(false) => println!("Project {id} not found."),
                    Err(e) => println!("Store error: {e}"),
                },
                None => println!("Usage: delete <id>"),
            },
            other => println!("Unknown command '{other}'. Type 'help'."),
        }
    }
}
