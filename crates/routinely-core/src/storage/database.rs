//! SQLite-based routine storage.
//!
//! One JSON document per routine row, ordered by insertion.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use super::data_dir;
use crate::error::{DatabaseError, Result, StoreError};
use crate::routine::{NewRoutine, Routine};
use crate::store::{new_id, RoutineStore};

/// SQLite database backing the CLI.
pub struct Database {
    conn: Connection,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("path", &self.conn.path())
            .finish()
    }
}

impl Database {
    /// Open the database at `<data dir>/routinely.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(&data_dir()?.join("routinely.db"))
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(DatabaseError::from)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS routines (
                    id       TEXT PRIMARY KEY,
                    position INTEGER NOT NULL,
                    body     TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_routines_position ON routines(position);",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(())
    }

    fn next_position(&self) -> Result<i64> {
        let max: Option<i64> = self
            .conn
            .query_row("SELECT MAX(position) FROM routines", [], |row| row.get(0))?;
        Ok(max.map_or(0, |p| p + 1))
    }
}

impl RoutineStore for Database {
    fn routines(&self) -> Result<Vec<Routine>> {
        let mut stmt = self
            .conn
            .prepare("SELECT body FROM routines ORDER BY position")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut routines = Vec::new();
        for body in rows {
            routines.push(serde_json::from_str(&body?)?);
        }
        Ok(routines)
    }

    fn get_routine(&self, id: &str) -> Result<Routine> {
        let body = self
            .conn
            .query_row(
                "SELECT body FROM routines WHERE id = ?1",
                params![id],
                |row| row.get::<_, String>(0),
            )
            .optional()?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        Ok(serde_json::from_str(&body)?)
    }

    fn add_routine(&mut self, new: NewRoutine) -> Result<Routine> {
        let routine = Routine::from_new(new_id(), new);
        let body = serde_json::to_string(&routine)?;
        let position = self.next_position()?;
        self.conn.execute(
            "INSERT INTO routines (id, position, body) VALUES (?1, ?2, ?3)",
            params![routine.id, position, body],
        )?;
        Ok(routine)
    }

    fn save_routine(&mut self, routine: &Routine) -> Result<()> {
        let body = serde_json::to_string(routine)?;
        let changed = self.conn.execute(
            "UPDATE routines SET body = ?2 WHERE id = ?1",
            params![routine.id, body],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(routine.id.clone()).into());
        }
        Ok(())
    }

    fn delete_routine(&mut self, id: &str) -> Result<Routine> {
        let routine = self.get_routine(id)?;
        self.conn
            .execute("DELETE FROM routines WHERE id = ?1", params![id])?;
        Ok(routine)
    }
}
