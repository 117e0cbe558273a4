//! Roster repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the four store operations the attendance core depends on:
//!   lookup, conditional insert, conditional status update, full listing.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `AttendanceRecord::validate()` before SQL mutations.
//! - Key comparisons use the trimmed registration key.
//! - The `UNIQUE` constraint on `registration_number` plus the conditional
//!   writes make register/mark-present race-free at the store.

use crate::db::DbError;
use crate::model::record::{AttendanceRecord, AttendanceStatus, RecordValidationError};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const ROSTER_SELECT_SQL: &str = "SELECT name, registration_number, status FROM roster";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for roster persistence and query operations.
///
/// `Db` is the store-unavailable channel: any backend failure propagates
/// unchanged and the store is left exactly as the backend left it.
#[derive(Debug)]
pub enum RepoError {
    Validation(RecordValidationError),
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted roster data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<RecordValidationError> for RepoError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Store contract for attendance records.
///
/// Any tabular or key-value backend can implement this; the SQLite
/// implementation below is the default. Records are never deleted, so the
/// contract has no delete operation.
pub trait RosterRepository {
    /// Looks up one record by trimmed registration key.
    fn find_by_key(&self, key: &str) -> RepoResult<Option<AttendanceRecord>>;
    /// Appends a record unless its key already exists. Returns whether the
    /// row was inserted; an existing key is not an error.
    fn insert_if_absent(&self, record: &AttendanceRecord) -> RepoResult<bool>;
    /// Updates only the status field, and only when the current status
    /// equals `expected`. Returns whether a row changed.
    fn update_status_if(
        &self,
        key: &str,
        expected: AttendanceStatus,
        new_status: AttendanceStatus,
    ) -> RepoResult<bool>;
    /// Returns every record in store (insertion) order. No pagination.
    fn list_all(&self) -> RepoResult<Vec<AttendanceRecord>>;
}

/// SQLite-backed roster repository.
pub struct SqliteRosterRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRosterRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_roster_ready(conn)?;
        Ok(Self { conn })
    }
}

impl RosterRepository for SqliteRosterRepository<'_> {
    fn find_by_key(&self, key: &str) -> RepoResult<Option<AttendanceRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ROSTER_SELECT_SQL} WHERE registration_number = ?1;"))?;

        let mut rows = stmt.query(params![key.trim()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_roster_row(row)?));
        }

        Ok(None)
    }

    fn insert_if_absent(&self, record: &AttendanceRecord) -> RepoResult<bool> {
        record.validate()?;

        let inserted = self.conn.execute(
            "INSERT INTO roster (name, registration_number, status)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (registration_number) DO NOTHING;",
            params![
                record.name.trim(),
                record.registration_key.trim(),
                status_to_db(record.status),
            ],
        )?;

        Ok(inserted == 1)
    }

    fn update_status_if(
        &self,
        key: &str,
        expected: AttendanceStatus,
        new_status: AttendanceStatus,
    ) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "UPDATE roster
             SET
                status = ?1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE registration_number = ?2 AND status = ?3;",
            params![
                status_to_db(new_status),
                key.trim(),
                status_to_db(expected),
            ],
        )?;

        Ok(changed == 1)
    }

    fn list_all(&self) -> RepoResult<Vec<AttendanceRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ROSTER_SELECT_SQL} ORDER BY id ASC;"))?;

        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_roster_row(row)?);
        }

        Ok(records)
    }
}

fn ensure_roster_ready(conn: &Connection) -> RepoResult<()> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = 'roster'
        );",
        [],
        |row| row.get(0),
    )?;

    if exists != 1 {
        return Err(RepoError::InvalidData(
            "roster table missing; connection was not migrated".to_string(),
        ));
    }

    Ok(())
}

fn parse_roster_row(row: &Row<'_>) -> RepoResult<AttendanceRecord> {
    let status_text: String = row.get("status")?;
    let status = parse_status(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{status_text}` in roster.status"))
    })?;

    let record = AttendanceRecord {
        name: row.get("name")?,
        registration_key: row.get("registration_number")?,
        status,
    };
    record.validate()?;
    Ok(record)
}

fn status_to_db(status: AttendanceStatus) -> &'static str {
    match status {
        AttendanceStatus::Absent => "Absent",
        AttendanceStatus::Present => "Present",
    }
}

fn parse_status(value: &str) -> Option<AttendanceStatus> {
    match value {
        "Absent" => Some(AttendanceStatus::Absent),
        "Present" => Some(AttendanceStatus::Present),
        _ => None,
    }
}
