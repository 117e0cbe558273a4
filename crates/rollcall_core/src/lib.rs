//! Core domain logic for the rollcall attendance tracker.
//! This crate is the single source of truth for attendance invariants.
//!
//! Presentation layers (scanners, UIs) feed in name/key pairs and raw scan
//! strings; this crate answers with tagged outcomes and never formats
//! user-facing text, touches cameras, or renders anything.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::record::{AttendanceRecord, AttendanceStatus, RecordValidationError};
pub use model::scan::{ScanDecodeError, ScanPayload};
pub use repo::roster_repo::{RepoError, RepoResult, RosterRepository, SqliteRosterRepository};
pub use service::attendance_service::{
    AttendanceError, AttendanceService, AttendanceSummary, BulkReport, BulkRowOutcome, MarkOutcome,
    RegisterOutcome, RegistrationRequest, ScanOutcome,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
