//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the roster store contract used by attendance services.
//! - Isolate SQL details from service/business orchestration.
//!
//! # Invariants
//! - Write operations are conditional (`insert_if_absent`,
//!   `update_status_if`) so check-then-act logic collapses into one atomic
//!   store call.
//! - Repository reads reject invalid persisted state instead of masking it.

pub mod roster_repo;
