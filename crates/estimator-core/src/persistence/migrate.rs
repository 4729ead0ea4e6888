//! Upgrade older saved-state shapes before they reach the pipeline.

use super::{PersistenceError, PersistenceResult};
use serde_json::{Map, Value};

pub const CURRENT_SCHEMA_VERSION: u64 = 1;

const TASK_KEY_RENAMES: [(&str, &str); 3] = [
    ("area", "quantity"),
    ("repeat", "repetitions_per_day"),
    ("machine", "machine_id"),
];

const COST_KEY_RENAMES: [(&str, &str); 2] = [
    ("cleaner_benefits", "cleaner_allowances"),
    ("cleaner_salary", "cleaner_monthly_salary"),
];

/// Bring a snapshot to [`CURRENT_SCHEMA_VERSION`].
///
/// Unversioned snapshots are the bare housekeeping state that predates the
/// other contract types: the task list lived under `areas`, tasks carried
/// `area` and `repeat`, and cleaner benefits had their own name.
pub fn migrate(value: Value) -> PersistenceResult<Value> {
    let Value::Object(mut root) = value else {
        return Err(PersistenceError::Migration(
            "snapshot must be a JSON object".into(),
        ));
    };

    let version = match root.get("schema_version") {
        None => 0,
        Some(raw) => raw.as_u64().ok_or_else(|| {
            PersistenceError::Migration(format!("schema_version must be an integer (got {raw})"))
        })?,
    };

    if version > CURRENT_SCHEMA_VERSION {
        return Err(PersistenceError::Migration(format!(
            "snapshot schema_version {version} is newer than supported {CURRENT_SCHEMA_VERSION}"
        )));
    }
    if version == CURRENT_SCHEMA_VERSION {
        return Ok(Value::Object(root));
    }

    tracing::info!(from = version, to = CURRENT_SCHEMA_VERSION, "migrating legacy snapshot");
    root.remove("schema_version");
    let input = upgrade_legacy_input(root);

    let mut upgraded = Map::new();
    upgraded.insert("schema_version".into(), Value::from(CURRENT_SCHEMA_VERSION));
    upgraded.insert("input".into(), Value::Object(input));
    Ok(Value::Object(upgraded))
}

fn upgrade_legacy_input(mut input: Map<String, Value>) -> Map<String, Value> {
    if !input.contains_key("variant") {
        input.insert("variant".into(), Value::from("housekeeping"));
    }
    rename_key(&mut input, "areas", "tasks");

    if let Some(Value::Array(tasks)) = input.get_mut("tasks") {
        for task in tasks.iter_mut() {
            if let Value::Object(task) = task {
                for (old, new) in TASK_KEY_RENAMES {
                    rename_key(task, old, new);
                }
                if !task.contains_key("id") {
                    if let Some(name) = task.get("name").cloned() {
                        task.insert("id".into(), name);
                    }
                }
            }
        }
    }

    if let Some(Value::Object(costs)) = input.get_mut("costs") {
        for (old, new) in COST_KEY_RENAMES {
            rename_key(costs, old, new);
        }
    }
    input
}

fn rename_key(map: &mut Map<String, Value>, old: &str, new: &str) {
    if map.contains_key(new) {
        return;
    }
    if let Some(value) = map.remove(old) {
        map.insert(new.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn current_snapshots_pass_through() {
        let snapshot = json!({ "schema_version": 1, "input": { "variant": "retrofit" } });
        assert_eq!(migrate(snapshot.clone()).unwrap(), snapshot);
    }

    #[test]
    fn legacy_housekeeping_state_is_upgraded() {
        let legacy = json!({
            "areas": [{ "name": "lobby", "area": 500.0, "frequency": "Daily",
                        "repeat": 2, "bucket": "manual_general" }],
            "costs": { "cleaner_salary": 1200.0, "cleaner_benefits": 300.0 }
        });
        let upgraded = migrate(legacy).unwrap();
        assert_eq!(upgraded["schema_version"], json!(1));
        let input = &upgraded["input"];
        assert_eq!(input["variant"], json!("housekeeping"));
        assert_eq!(input["tasks"][0]["id"], json!("lobby"));
        assert_eq!(input["tasks"][0]["quantity"], json!(500.0));
        assert_eq!(input["tasks"][0]["repetitions_per_day"], json!(2));
        assert_eq!(input["costs"]["cleaner_allowances"], json!(300.0));
        assert_eq!(input["costs"]["cleaner_monthly_salary"], json!(1200.0));
    }

    #[test]
    fn rejects_future_versions() {
        let err = migrate(json!({ "schema_version": 9 })).unwrap_err();
        assert!(matches!(err, PersistenceError::Migration(_)));
    }
}
