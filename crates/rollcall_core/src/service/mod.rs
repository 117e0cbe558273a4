//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate roster store calls into attendance use-cases.
//! - Keep presentation layers decoupled from storage details.

pub mod attendance_service;
