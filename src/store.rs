//! The record store: the canonical `students` table and its five operations.
//!
//! Every operation is a single statement. Update and delete use `RETURNING`
//! so the row that was written (or removed) comes back from the same
//! statement that touched it.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::db;
use crate::error::{Error, Result};
use crate::model::{Gender, NewStudent, Numeric, StudentRecord};

const COLUMNS: &str = "st_id, name, age, class, marks, gender, created_at, updated_at";

#[derive(Debug)]
pub struct StudentStore {
    conn: Mutex<Connection>,
}

impl StudentStore {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::from_connection(db::open_db(path)?))
    }

    pub fn in_memory() -> Result<Self> {
        Ok(Self::from_connection(db::open_in_memory()?))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::internal("student store lock poisoned"))
    }

    /// All records in insertion order.
    pub fn list(&self) -> Result<Vec<StudentRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM students ORDER BY rowid"))?;
        let rows = stmt
            .query_map([], row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn count(&self) -> Result<usize> {
        let conn = self.conn()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM students", [], |r| r.get(0))?;
        Ok(usize::try_from(n).unwrap_or(0))
    }

    pub fn get(&self, id: &str) -> Result<StudentRecord> {
        let conn = self.conn()?;
        conn.query_row(
            &format!("SELECT {COLUMNS} FROM students WHERE st_id = ?1"),
            [id],
            row_to_record,
        )
        .optional()?
        .ok_or_else(|| Error::not_found(id))
    }

    /// Insert a new record. The identifier is generated here and never changes.
    pub fn create(&self, input: &NewStudent) -> Result<StudentRecord> {
        input.validate()?;
        let input = input.normalized();
        let st_id = Uuid::new_v4().to_string();
        let now = now_stamp();

        let conn = self.conn()?;
        let record = conn.query_row(
            &format!(
                "INSERT INTO students(st_id, name, age, class, marks, gender, created_at, updated_at)
                 VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
                 RETURNING {COLUMNS}"
            ),
            params![
                st_id,
                input.name,
                input.age,
                input.class,
                input.marks,
                input.gender.as_str(),
                now
            ],
            row_to_record,
        )?;
        tracing::debug!(st_id = %record.st_id, "student created");
        Ok(record)
    }

    /// Full replace of the five mutable fields.
    pub fn update(&self, id: &str, input: &NewStudent) -> Result<StudentRecord> {
        input.validate()?;
        let input = input.normalized();
        let now = now_stamp();

        let conn = self.conn()?;
        let record = conn
            .query_row(
                &format!(
                    "UPDATE students
                     SET name = ?1, age = ?2, class = ?3, marks = ?4, gender = ?5, updated_at = ?6
                     WHERE st_id = ?7
                     RETURNING {COLUMNS}"
                ),
                params![
                    input.name,
                    input.age,
                    input.class,
                    input.marks,
                    input.gender.as_str(),
                    now,
                    id
                ],
                row_to_record,
            )
            .optional()?
            .ok_or_else(|| Error::not_found(id))?;
        tracing::debug!(st_id = %id, "student updated");
        Ok(record)
    }

    /// Remove a record and hand back its last snapshot.
    pub fn delete(&self, id: &str) -> Result<StudentRecord> {
        let conn = self.conn()?;
        let record = conn
            .query_row(
                &format!("DELETE FROM students WHERE st_id = ?1 RETURNING {COLUMNS}"),
                [id],
                row_to_record,
            )
            .optional()?
            .ok_or_else(|| Error::not_found(id))?;
        tracing::debug!(st_id = %id, "student deleted");
        Ok(record)
    }
}

fn now_stamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<StudentRecord> {
    let gender_raw: String = row.get(5)?;
    let gender = gender_raw.parse::<Gender>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(5, Type::Text, e.to_string().into())
    })?;
    Ok(StudentRecord {
        st_id: row.get(0)?,
        name: row.get(1)?,
        age: Numeric::Int(row.get(2)?),
        class: row.get(3)?,
        marks: Numeric::Float(row.get(4)?),
        gender,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}
