//! Attendance record domain model.
//!
//! # Responsibility
//! - Define the canonical participant record persisted in the roster.
//! - Establish creation-time invariants (trimmed, non-empty fields).
//!
//! # Invariants
//! - `registration_key` is the sole identity of a record; comparisons are
//!   case-sensitive on the trimmed value.
//! - `name` is immutable after creation.
//! - `status` starts as `Absent`; the mark-present transition is the only
//!   status write path and it never reverts `Present`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Presence state of a participant.
///
/// Serialized as the exact strings `"Absent"` / `"Present"` to stay
/// compatible with the legacy sheet layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceStatus {
    /// Registered but not yet scanned in.
    Absent,
    /// Scanned in. Terminal for the mark-present transition.
    Present,
}

/// Validation error for record creation and persistence write paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordValidationError {
    /// Display name is empty after trimming.
    EmptyName,
    /// Registration key is empty after trimming.
    EmptyKey,
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "participant name cannot be empty"),
            Self::EmptyKey => write!(f, "registration key cannot be empty"),
        }
    }
}

impl Error for RecordValidationError {}

/// Canonical attendance record.
///
/// Serde field names mirror the legacy sheet header (`Name`,
/// `Registration_Number`, `Status`) so exported rows stay bit-compatible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Display name, fixed at registration time.
    #[serde(rename = "Name")]
    pub name: String,
    /// Unique human-assigned identity, trimmed.
    #[serde(rename = "Registration_Number")]
    pub registration_key: String,
    /// Current presence state.
    #[serde(rename = "Status")]
    pub status: AttendanceStatus,
}

impl AttendanceRecord {
    /// Creates a new record with `status = Absent`.
    ///
    /// Both fields are trimmed; empty results are rejected before any
    /// store interaction can happen.
    pub fn new(
        name: impl AsRef<str>,
        registration_key: impl AsRef<str>,
    ) -> Result<Self, RecordValidationError> {
        let name = name.as_ref().trim();
        let registration_key = registration_key.as_ref().trim();
        if name.is_empty() {
            return Err(RecordValidationError::EmptyName);
        }
        if registration_key.is_empty() {
            return Err(RecordValidationError::EmptyKey);
        }
        Ok(Self {
            name: name.to_string(),
            registration_key: registration_key.to_string(),
            status: AttendanceStatus::Absent,
        })
    }

    /// Re-checks creation invariants.
    ///
    /// Called by repository write paths before SQL mutations so a record
    /// built by other means (deserialization, literals) cannot bypass them.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if self.name.trim().is_empty() {
            return Err(RecordValidationError::EmptyName);
        }
        if self.registration_key.trim().is_empty() {
            return Err(RecordValidationError::EmptyKey);
        }
        Ok(())
    }

    /// Returns whether this participant has been marked present.
    pub fn is_present(&self) -> bool {
        self.status == AttendanceStatus::Present
    }
}
