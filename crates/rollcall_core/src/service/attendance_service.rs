//! Attendance use-case service.
//!
//! # Responsibility
//! - Register participants with duplicate detection (single and bulk).
//! - Run the mark-present transition against the roster store.
//! - Report domain outcomes as closed enums, distinct from store failures.
//!
//! # Invariants
//! - The service is stateless between calls; the only state is what the
//!   repository persists.
//! - Duplicate, already-present and not-found are `Ok` outcomes, never
//!   errors. The `Err` channel carries invalid input and store failures.
//! - Mark-present is idempotent: repeat calls after the first transition
//!   return `AlreadyPresent` and perform no store mutation.

use crate::model::record::{AttendanceRecord, AttendanceStatus};
use crate::model::scan::ScanPayload;
use crate::repo::roster_repo::{RepoError, RosterRepository};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Outcome of a single registration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// A new record was appended with `status = Absent`.
    Registered(AttendanceRecord),
    /// The key is already taken. Carries the existing record so callers
    /// can display the conflicting name and status.
    DuplicateKey(AttendanceRecord),
}

/// Outcome of one mark-present call. The variants are mutually exclusive
/// and exhaustive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkOutcome {
    /// Transitioned `Absent -> Present` and persisted the change.
    Marked { name: String },
    /// Already `Present`; no store mutation happened.
    AlreadyPresent { name: String },
    /// No record with this key exists; no mutation happened.
    NotFound,
}

/// Decode + mark result for one scan event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    /// The parsed payload the mark was attempted for.
    pub payload: ScanPayload,
    /// What the mark-present transition reported.
    pub mark: MarkOutcome,
}

/// One input row for bulk registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    pub name: String,
    pub key: String,
}

/// Per-row outcome of bulk registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkRowOutcome {
    Registered { name: String, key: String },
    Duplicate { name: String, key: String },
    Invalid { name: String, key: String, reason: String },
}

/// Ordered per-row outcomes plus counters for bulk registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkReport {
    pub rows: Vec<BulkRowOutcome>,
    pub registered: usize,
    pub duplicates: usize,
    pub invalid: usize,
}

/// Roster-wide attendance counters.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceSummary {
    pub total: usize,
    pub present: usize,
    pub absent: usize,
    /// Percentage of present participants; 0.0 for an empty roster.
    pub rate_percent: f64,
}

/// Service error for attendance use-cases.
///
/// Domain branches (duplicate, already-present, not-found) are not here:
/// they are outcome variants. This enum carries only boundary rejections
/// and hard failures.
#[derive(Debug)]
pub enum AttendanceError {
    /// Empty name/key/payload; rejected before any store call.
    InvalidInput(String),
    /// Persistence-layer failure (store unavailable, bad persisted data).
    Store(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for AttendanceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(reason) => write!(f, "invalid input: {reason}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => {
                write!(f, "inconsistent roster state: {details}")
            }
        }
    }
}

impl Error for AttendanceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for AttendanceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::InvalidInput(err.to_string()),
            other => Self::Store(other),
        }
    }
}

/// Attendance service facade over roster repository implementations.
pub struct AttendanceService<R: RosterRepository> {
    repo: R,
}

impl<R: RosterRepository> AttendanceService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers one participant.
    ///
    /// # Contract
    /// - New key: appends a record with `status = Absent`, returns
    ///   `Registered` with it.
    /// - Taken key: returns `DuplicateKey` carrying the existing record;
    ///   nothing is written.
    /// - Empty name/key after trimming: `Err(InvalidInput)` before any
    ///   store call.
    pub fn register(&self, name: &str, key: &str) -> Result<RegisterOutcome, AttendanceError> {
        let record = AttendanceRecord::new(name, key)
            .map_err(|err| AttendanceError::InvalidInput(err.to_string()))?;

        if self.repo.insert_if_absent(&record)? {
            info!(
                "event=register module=attendance status=ok key={}",
                record.registration_key
            );
            return Ok(RegisterOutcome::Registered(record));
        }

        let existing = self
            .repo
            .find_by_key(&record.registration_key)?
            .ok_or(AttendanceError::InconsistentState(
                "conflicting key missing on read-back",
            ))?;

        info!(
            "event=register module=attendance status=ok outcome=duplicate key={}",
            record.registration_key
        );
        Ok(RegisterOutcome::DuplicateKey(existing))
    }

    /// Registers many participants, reporting one outcome per input row.
    ///
    /// Invalid rows and duplicates are recorded in the report and do not
    /// stop the batch. A store failure aborts the batch: rows already
    /// written stay written, the error is returned as-is.
    pub fn register_bulk(
        &self,
        rows: &[RegistrationRequest],
    ) -> Result<BulkReport, AttendanceError> {
        let mut report = BulkReport::default();

        for row in rows {
            match self.register(&row.name, &row.key) {
                Ok(RegisterOutcome::Registered(record)) => {
                    report.registered += 1;
                    report.rows.push(BulkRowOutcome::Registered {
                        name: record.name,
                        key: record.registration_key,
                    });
                }
                Ok(RegisterOutcome::DuplicateKey(existing)) => {
                    report.duplicates += 1;
                    report.rows.push(BulkRowOutcome::Duplicate {
                        name: existing.name,
                        key: existing.registration_key,
                    });
                }
                Err(AttendanceError::InvalidInput(reason)) => {
                    report.invalid += 1;
                    report.rows.push(BulkRowOutcome::Invalid {
                        name: row.name.clone(),
                        key: row.key.clone(),
                        reason,
                    });
                }
                Err(other) => return Err(other),
            }
        }

        info!(
            "event=register_bulk module=attendance status=ok rows={} registered={} duplicates={} invalid={}",
            rows.len(),
            report.registered,
            report.duplicates,
            report.invalid
        );
        Ok(report)
    }

    /// Runs the mark-present transition for one registration key.
    ///
    /// # Contract
    /// - `Absent -> Present`: persisted, returns `Marked`.
    /// - Already `Present`: no mutation, returns `AlreadyPresent`.
    /// - Unknown key: no mutation, returns `NotFound`.
    pub fn mark_present(&self, key: &str) -> Result<MarkOutcome, AttendanceError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(AttendanceError::InvalidInput(
                "registration key cannot be empty".to_string(),
            ));
        }

        let record = match self.repo.find_by_key(key)? {
            Some(record) => record,
            None => {
                info!("event=mark_present module=attendance status=ok outcome=not_found key={key}");
                return Ok(MarkOutcome::NotFound);
            }
        };

        if record.is_present() {
            info!(
                "event=mark_present module=attendance status=ok outcome=already_present key={key}"
            );
            return Ok(MarkOutcome::AlreadyPresent { name: record.name });
        }

        if self
            .repo
            .update_status_if(key, AttendanceStatus::Absent, AttendanceStatus::Present)?
        {
            info!("event=mark_present module=attendance status=ok outcome=marked key={key}");
            return Ok(MarkOutcome::Marked { name: record.name });
        }

        // The conditional update found no (key, Absent) row even though the
        // record was just observed Absent. Present is terminal, so the only
        // write that can win this race is another mark.
        info!("event=mark_present module=attendance status=ok outcome=already_present key={key}");
        Ok(MarkOutcome::AlreadyPresent { name: record.name })
    }

    /// Decodes one raw scan payload and marks the participant it names.
    ///
    /// Invalid payloads fail before any store call.
    pub fn process_scan(&self, raw: &str) -> Result<ScanOutcome, AttendanceError> {
        let payload = ScanPayload::decode(raw)
            .map_err(|err| AttendanceError::InvalidInput(err.to_string()))?;
        let mark = self.mark_present(&payload.key)?;
        Ok(ScanOutcome { payload, mark })
    }

    /// Computes roster-wide attendance counters.
    ///
    /// Reads are not isolated from concurrent writes; the counters reflect
    /// whatever the store returned for this one listing.
    pub fn summary(&self) -> Result<AttendanceSummary, AttendanceError> {
        let records = self.repo.list_all()?;
        let total = records.len();
        let present = records.iter().filter(|record| record.is_present()).count();
        let rate_percent = if total == 0 {
            0.0
        } else {
            present as f64 * 100.0 / total as f64
        };

        Ok(AttendanceSummary {
            total,
            present,
            absent: total - present,
            rate_percent,
        })
    }

    /// Filters the roster by case-insensitive substring match on name or
    /// registration key. A blank term returns the full roster.
    pub fn search(&self, term: &str) -> Result<Vec<AttendanceRecord>, AttendanceError> {
        let records = self.repo.list_all()?;
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return Ok(records);
        }

        Ok(records
            .into_iter()
            .filter(|record| {
                record.name.to_lowercase().contains(&term)
                    || record.registration_key.to_lowercase().contains(&term)
            })
            .collect())
    }

    /// Returns every roster record in store order.
    pub fn roster(&self) -> Result<Vec<AttendanceRecord>, AttendanceError> {
        Ok(self.repo.list_all()?)
    }
}
