//! Scan payload decoding.
//!
//! # Responsibility
//! - Parse the raw text decoded from a scanned code into key + name.
//! - Provide the inverse encoding used when codes are generated.
//!
//! # Invariants
//! - Decoding is pure: no I/O, deterministic for a given input.
//! - The payload convention is `<key>_<name>`; the first `_` splits, the
//!   remainder (which may itself contain `_`) is the display name.

use crate::model::record::AttendanceRecord;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Decoded scan payload. Ephemeral: one value per scan event, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanPayload {
    /// Registration key extracted from the payload.
    pub key: String,
    /// Display name carried by the payload, when one was encoded.
    pub name: Option<String>,
}

/// Error for payloads that cannot yield a registration key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanDecodeError {
    /// Payload was empty, or the part before the first `_` was empty.
    EmptyKey,
}

impl Display for ScanDecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyKey => write!(f, "scan payload contains no registration key"),
        }
    }
}

impl Error for ScanDecodeError {}

impl ScanPayload {
    /// Decodes a raw payload string.
    ///
    /// `"REG123_John_Doe"` yields key `REG123`, name `John_Doe`. A payload
    /// without `_` is all key, name unknown. An empty key after trimming
    /// (including inputs like `"_"`) is rejected.
    pub fn decode(raw: &str) -> Result<Self, ScanDecodeError> {
        let trimmed = raw.trim();
        let (key, name) = match trimmed.split_once('_') {
            Some((key, rest)) => {
                let rest = rest.trim();
                (key.trim(), (!rest.is_empty()).then(|| rest.to_string()))
            }
            None => (trimmed, None),
        };

        if key.is_empty() {
            return Err(ScanDecodeError::EmptyKey);
        }

        Ok(Self {
            key: key.to_string(),
            name,
        })
    }

    /// Builds the payload string embedded in a generated code for `record`.
    pub fn encode(record: &AttendanceRecord) -> String {
        format!("{}_{}", record.registration_key, record.name)
    }
}
