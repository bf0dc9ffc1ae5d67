//! SQLite mark store implementation.

use crate::{EntityRef, Error, Mark, MarkFilter, MarkId, MarkStore, Result};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};
use std::path::Path;
use tracing::debug;

/// SQLite-backed mark store.
pub struct SqliteMarkStore {
    conn: Connection,
}

impl SqliteMarkStore {
    /// Open or create a mark store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory mark store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS marks (
                id TEXT PRIMARY KEY,
                markable_type TEXT NOT NULL,
                markable_id INTEGER NOT NULL,
                marker_type TEXT NOT NULL,
                marker_id INTEGER NOT NULL,
                mark TEXT NOT NULL,
                created_at TEXT NOT NULL,
                UNIQUE (markable_type, markable_id, marker_type, marker_id, mark)
            );
            CREATE INDEX IF NOT EXISTS idx_marks_markable
                ON marks(markable_type, mark, markable_id);
            CREATE INDEX IF NOT EXISTS idx_marks_marker
                ON marks(marker_type, marker_id, mark);
            "#,
        )?;
        Ok(())
    }

    fn distinct_ids(&self, column: &str, filter: &MarkFilter) -> Result<Vec<i64>> {
        let (clause, values) = where_clause(filter);
        let mut stmt = self.conn.prepare(&format!(
            "SELECT DISTINCT {column} FROM marks{clause} ORDER BY {column}"
        ))?;
        let ids = stmt
            .query_map(params_from_iter(values), |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok(ids)
    }
}

impl MarkStore for SqliteMarkStore {
    fn exists(&self, filter: &MarkFilter) -> Result<bool> {
        let (clause, values) = where_clause(filter);
        let found = self.conn.query_row(
            &format!("SELECT EXISTS(SELECT 1 FROM marks{clause})"),
            params_from_iter(values),
            |row| row.get(0),
        )?;
        Ok(found)
    }

    fn insert(&self, marks: &[Mark]) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO marks
                 (id, markable_type, markable_id, marker_type, marker_id, mark, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for mark in marks {
                inserted += stmt.execute(params![
                    mark.id.to_string(),
                    mark.markable.type_name,
                    mark.markable.id,
                    mark.marker.type_name,
                    mark.marker.id,
                    mark.mark,
                    mark.created_at.to_rfc3339(),
                ])?;
            }
        }
        tx.commit()?;
        debug!(requested = marks.len(), inserted, "inserted marks");
        Ok(inserted)
    }

    fn delete(&self, filter: &MarkFilter) -> Result<usize> {
        let (clause, values) = where_clause(filter);
        let deleted = self
            .conn
            .execute(&format!("DELETE FROM marks{clause}"), params_from_iter(values))?;
        debug!(deleted, "deleted marks");
        Ok(deleted)
    }

    fn delete_many(&self, filters: &[MarkFilter]) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let mut deleted = 0;
        for filter in filters {
            let (clause, values) = where_clause(filter);
            deleted += tx.execute(&format!("DELETE FROM marks{clause}"), params_from_iter(values))?;
        }
        tx.commit()?;
        debug!(filters = filters.len(), deleted, "deleted marks");
        Ok(deleted)
    }

    fn list(&self, filter: &MarkFilter) -> Result<Vec<Mark>> {
        let (clause, values) = where_clause(filter);
        let mut stmt = self.conn.prepare(&format!(
            "SELECT id, markable_type, markable_id, marker_type, marker_id, mark, created_at
             FROM marks{clause} ORDER BY rowid"
        ))?;

        let rows = stmt.query_map(params_from_iter(values), |row| {
            Ok(MarkRow {
                id: row.get(0)?,
                markable_type: row.get(1)?,
                markable_id: row.get(2)?,
                marker_type: row.get(3)?,
                marker_id: row.get(4)?,
                mark: row.get(5)?,
                created_at: row.get(6)?,
            })
        })?;

        rows.map(|row| row?.into_mark()).collect()
    }

    fn query_markables(
        &self,
        markable_type: &str,
        mark: &str,
        marker: Option<&EntityRef>,
    ) -> Result<Vec<i64>> {
        let mut filter = MarkFilter::new().markable_type(markable_type).mark(mark);
        if let Some(marker) = marker {
            filter = filter.marker(marker);
        }
        self.distinct_ids("markable_id", &filter)
    }

    fn query_markers(
        &self,
        marker_type: &str,
        markable: &EntityRef,
        mark: &str,
    ) -> Result<Vec<i64>> {
        let filter = MarkFilter::new()
            .markable(markable)
            .marker_type(marker_type)
            .mark(mark);
        self.distinct_ids("marker_id", &filter)
    }
}

struct MarkRow {
    id: String,
    markable_type: String,
    markable_id: i64,
    marker_type: String,
    marker_id: i64,
    mark: String,
    created_at: String,
}

impl MarkRow {
    fn into_mark(self) -> Result<Mark> {
        let id = self
            .id
            .parse()
            .map_err(|e| Error::Corrupt(format!("bad id {}: {e}", self.id)))?;
        let created_at = self
            .created_at
            .parse()
            .map_err(|e| Error::Corrupt(format!("bad timestamp {}: {e}", self.created_at)))?;
        Ok(Mark {
            id: MarkId(id),
            markable: EntityRef::new(self.markable_type, self.markable_id),
            marker: EntityRef::new(self.marker_type, self.marker_id),
            mark: self.mark,
            created_at,
        })
    }
}

/// Build a `WHERE` clause with positional parameters for a filter.
fn where_clause(filter: &MarkFilter) -> (String, Vec<Value>) {
    let mut clauses = Vec::new();
    let mut values = Vec::new();

    if let Some(t) = &filter.markable_type {
        clauses.push("markable_type = ?");
        values.push(Value::Text(t.clone()));
    }
    if let Some(id) = filter.markable_id {
        clauses.push("markable_id = ?");
        values.push(Value::Integer(id));
    }
    if let Some(t) = &filter.marker_type {
        clauses.push("marker_type = ?");
        values.push(Value::Text(t.clone()));
    }
    if let Some(id) = filter.marker_id {
        clauses.push("marker_id = ?");
        values.push(Value::Integer(id));
    }
    if let Some(mark) = &filter.mark {
        clauses.push("mark = ?");
        values.push(Value::Text(mark.clone()));
    }

    if clauses.is_empty() {
        (String::new(), values)
    } else {
        (format!(" WHERE {}", clauses.join(" AND ")), values)
    }
}
