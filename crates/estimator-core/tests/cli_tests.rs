#![cfg(feature = "cli_api")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use std::io::Write;
use tempfile::NamedTempFile;

#[allow(deprecated)]
fn run_cli(script: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.env("ESTIMATOR_LOG_LEVEL", "error")
        .env_remove("ESTIMATOR_DB_PATH")
        .write_stdin(script.to_string())
        .assert()
}

fn tasks_csv() -> NamedTempFile {
    let mut tmp = NamedTempFile::new().expect("temp file");
    writeln!(tmp, "id,name,quantity,frequency,repetitions_per_day,bucket,machine_id").unwrap();
    writeln!(tmp, "open_office,Open office,1000,daily,,manual_general,").unwrap();
    tmp.flush().unwrap();
    tmp
}

#[test]
fn cli_computes_imported_tasks() {
    let csv = tasks_csv();
    let script = format!("import {}\ncompute\nquit\n", csv.path().display());
    run_cli(&script)
        .success()
        .stdout(str_contains("Imported 1 tasks"))
        .stdout(str_contains("open_office"))
        .stdout(str_contains("Active headcount  : 3.33"))
        .stdout(str_contains("Totals by category"));
}

#[test]
fn cli_input_mode_overrides_headcount() {
    let csv = tasks_csv();
    let script = format!(
        "import {}\nmode input 10\ncompute\nquit\n",
        csv.path().display()
    );
    run_cli(&script)
        .success()
        .stdout(str_contains("Active headcount  : 10.00"));
}

#[test]
fn cli_reports_import_errors() {
    let mut tmp = NamedTempFile::new().expect("temp file");
    writeln!(tmp, "id,name,quantity,frequency,repetitions_per_day,bucket,machine_id").unwrap();
    writeln!(tmp, "lobby,Lobby,100,hourly,,manual_general,").unwrap();
    tmp.flush().unwrap();

    let script = format!("import {}\nquit\n", tmp.path().display());
    run_cli(&script)
        .success()
        .stdout(str_contains("Import error"))
        .stdout(str_contains("hourly"));
}

#[test]
fn cli_save_and_load_json_round_trip() {
    let csv = tasks_csv();
    let snapshot = NamedTempFile::new().expect("temp file");
    let script = format!(
        "import {}\nsave {}\nnew facilities\nload {}\nshow\nquit\n",
        csv.path().display(),
        snapshot.path().display(),
        snapshot.path().display()
    );
    let assert = run_cli(&script).success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    let after_reload = output.split("Loaded estimate from").last().unwrap_or_default();
    assert!(after_reload.contains("Contract type: housekeeping"), "{after_reload}");
    assert!(after_reload.contains("open_office"), "{after_reload}");
}

#[test]
fn cli_summary_requires_compute() {
    run_cli("summary\nmarkup 12 8\ncompute\nsummary\nquit\n")
        .success()
        .stdout(str_contains("Nothing computed yet"))
        .stdout(str_contains("Markup set to 12% overheads, 8% profit."))
        .stdout(str_contains("Selling (annual)  : 0.00"));
}

#[test]
fn cli_stores_projects_and_moves_status() {
    run_cli(
        "compute\nstore bid-1\nstatus bid-1 submitted\nstatus bid-1 awarded\n\
         status bid-1 pending\nprojects\nopen bid-1\nquit\n",
    )
    .success()
    .stdout(str_contains("Stored project bid-1."))
    .stdout(str_contains("Project bid-1 is now submitted."))
    .stdout(str_contains(
        "Status error: project status cannot move from submitted to awarded",
    ))
    .stdout(str_contains("unknown project status 'pending'"))
    .stdout(str_contains("housekeeping"))
    .stdout(str_contains("Opened project bid-1."));
}
