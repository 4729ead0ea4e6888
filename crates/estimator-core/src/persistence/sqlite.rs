use super::{EstimateStore, PersistenceError, PersistenceResult, ProjectSummary, StoredProject};
use crate::estimate::EstimateInput;
use crate::pipeline::EstimationResult;
use rusqlite::{Connection, OptionalExtension, params};
use std::sync::{Mutex, MutexGuard};

pub struct SqliteEstimateStore {
    connection: Mutex<Connection>,
}

impl SqliteEstimateStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path)?;
        Self::from_connection(connection)
    }

    pub fn in_memory() -> PersistenceResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(connection: Connection) -> PersistenceResult<Self> {
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS projects (
                id TEXT PRIMARY KEY,
                variant TEXT NOT NULL,
                status TEXT NOT NULL,
                input_json TEXT NOT NULL,
                result_json TEXT
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    fn lock(&self) -> PersistenceResult<MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|_| PersistenceError::LockPoisoned)
    }

    fn decode(
        id: String,
        input_json: &str,
        result_json: Option<&str>,
    ) -> PersistenceResult<StoredProject> {
        let input: EstimateInput = serde_json::from_str(input_json)?;
        let result = match result_json {
            Some(json) => Some(serde_json::from_str::<EstimationResult>(json)?),
            None => None,
        };
        Ok(StoredProject { id, input, result })
    }
}

impl EstimateStore for SqliteEstimateStore {
    fn save_project(&self, project: &StoredProject) -> PersistenceResult<()> {
        if project.id.trim().is_empty() {
            return Err(PersistenceError::InvalidData("project id must not be empty".into()));
        }
        let input_json = serde_json::to_string(&project.input)?;
        let result_json = project
            .result
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO projects (id, variant, status, input_json, result_json)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET
                variant = excluded.variant,
                status = excluded.status,
                input_json = excluded.input_json,
                result_json = excluded.result_json",
            params![
                project.id,
                project.input.kind().as_str(),
                project.status().as_str(),
                input_json,
                result_json
            ],
        )?;
        tx.commit()?;
        tracing::debug!(project = %project.id, "project saved");
        Ok(())
    }

    fn load_project(&self, id: &str) -> PersistenceResult<Option<StoredProject>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT input_json, result_json FROM projects WHERE id = ?1")?;
        let row: Option<(String, Option<String>)> = stmt
            .query_row(params![id], |row| Ok((row.get(0)?, row.get(1)?)))
            .optional()?;

        let Some((input_json, result_json)) = row else {
            return Ok(None);
        };
        Self::decode(id.to_string(), &input_json, result_json.as_deref()).map(Some)
    }

    fn list_projects(&self) -> PersistenceResult<Vec<ProjectSummary>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT id, input_json, result_json FROM projects ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
            ))
        })?;

        let mut summaries = Vec::new();
        for row in rows {
            let (id, input_json, result_json) = row?;
            let project = Self::decode(id, &input_json, result_json.as_deref())?;
            summaries.push(project.summary());
        }
        Ok(summaries)
    }

    fn delete_project(&self, id: &str) -> PersistenceResult<bool> {
        let conn = self.lock()?;
        let removed = conn.execute("DELETE FROM projects WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }
}
