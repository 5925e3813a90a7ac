//! SQLite storage for tasks.
//!
//! One `tasks` table. Handlers never touch the connection directly; they get
//! it for the span of a single operation through [`crate::routes::AppState`].

use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, params};
use std::{path::Path, sync::Arc};

use crate::model::{Task, TaskIn};

/// Store shared between request handlers; the lock is the per-request session.
pub type SharedStore = Arc<Mutex<TaskStore>>;

pub struct TaskStore {
    conn: Connection,
}

impl TaskStore {
    /// Open (or create) the database at `path` and make sure the schema exists.
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let store = Self { conn: Connection::open(path)? };
        store.init_schema()?;
        Ok(store)
    }

    /// Fresh private database, gone when dropped.
    pub fn in_memory() -> rusqlite::Result<Self> {
        let store = Self { conn: Connection::open_in_memory()? };
        store.init_schema()?;
        Ok(store)
    }

    pub fn into_shared(self) -> SharedStore {
        Arc::new(Mutex::new(self))
    }

    fn init_schema(&self) -> rusqlite::Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title VARCHAR(255) NOT NULL,
                description TEXT NOT NULL DEFAULT ''
            );
            "#,
        )
    }

    fn row_to_task(row: &rusqlite::Row) -> rusqlite::Result<Task> {
        Ok(Task { id: row.get(0)?, title: row.get(1)?, description: row.get(2)? })
    }

    pub fn list(&self) -> rusqlite::Result<Vec<Task>> {
        let mut stmt = self.conn.prepare("SELECT id, title, description FROM tasks ORDER BY id")?;
        let rows = stmt.query_map([], Self::row_to_task)?;
        rows.collect()
    }

    pub fn get(&self, id: i64) -> rusqlite::Result<Option<Task>> {
        self.conn
            .query_row(
                "SELECT id, title, description FROM tasks WHERE id = ?1",
                params![id],
                Self::row_to_task,
            )
            .optional()
    }

    pub fn create(&self, input: &TaskIn) -> rusqlite::Result<Task> {
        self.conn.execute(
            "INSERT INTO tasks (title, description) VALUES (?1, ?2)",
            params![input.title, input.description],
        )?;

        Ok(Task {
            id: self.conn.last_insert_rowid(),
            title: input.title.clone(),
            description: input.description.clone(),
        })
    }

    /// Replace title and description. `None` if no task has this id.
    pub fn update(&self, id: i64, input: &TaskIn) -> rusqlite::Result<Option<Task>> {
        let changed = self.conn.execute(
            "UPDATE tasks SET title = ?1, description = ?2 WHERE id = ?3",
            params![input.title, input.description, id],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        self.get(id)
    }

    /// Returns `false` if no task had this id.
    pub fn delete(&self, id: i64) -> rusqlite::Result<bool> {
        let changed = self.conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }
}
