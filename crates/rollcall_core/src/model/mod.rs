//! Attendance domain model.
//!
//! # Responsibility
//! - Define the canonical attendance record shared by all core layers.
//! - Define the ephemeral scan payload and its decode convention.
//!
//! # Invariants
//! - A record is identified solely by its registration key.
//! - Status starts as `Absent` and only ever moves to `Present`.

pub mod record;
pub mod scan;
