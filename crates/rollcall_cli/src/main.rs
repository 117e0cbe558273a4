//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `rollcall_core` linkage.
//! - Replay a deterministic register/scan flow and print tagged outcomes.
//!
//! The session cache below belongs here, not in core: it is a UX
//! short-circuit for repeat scans within one live session, while the store
//! stays the source of truth for idempotency.

use rollcall_core::db::open_db_in_memory;
use rollcall_core::{
    AttendanceService, MarkOutcome, RegisterOutcome, ScanPayload, SqliteRosterRepository,
};
use std::collections::HashSet;
use std::error::Error;

/// Keys already scanned in this session.
struct ScanSession {
    seen: HashSet<String>,
}

impl ScanSession {
    fn new() -> Self {
        Self {
            seen: HashSet::new(),
        }
    }

    /// Records a key; returns whether it was seen before in this session.
    fn seen_before(&mut self, key: &str) -> bool {
        !self.seen.insert(key.trim().to_string())
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("rollcall_cli error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    println!("rollcall_core version={}", rollcall_core::core_version());

    let conn = open_db_in_memory()?;
    let service = AttendanceService::new(SqliteRosterRepository::try_new(&conn)?);
    let mut session = ScanSession::new();

    let registered = match service.register("Jane Doe", "REG010")? {
        RegisterOutcome::Registered(record) => record,
        RegisterOutcome::DuplicateKey(existing) => existing,
    };
    println!(
        "registered key={} name={}",
        registered.registration_key, registered.name
    );

    let payload = ScanPayload::encode(&registered);
    for attempt in 1..=2 {
        let decoded = ScanPayload::decode(&payload)?;
        if session.seen_before(&decoded.key) {
            println!("scan {attempt}: key={} skipped (already scanned this session)", decoded.key);
            continue;
        }
        match service.mark_present(&decoded.key)? {
            MarkOutcome::Marked { name } => println!("scan {attempt}: marked name={name}"),
            MarkOutcome::AlreadyPresent { name } => {
                println!("scan {attempt}: already present name={name}")
            }
            MarkOutcome::NotFound => println!("scan {attempt}: not found"),
        }
    }

    match service.mark_present("REG999")? {
        MarkOutcome::NotFound => println!("scan REG999: not found (register first)"),
        other => println!("scan REG999: unexpected outcome {other:?}"),
    }

    let summary = service.summary()?;
    println!(
        "summary total={} present={} absent={} rate={:.1}%",
        summary.total, summary.present, summary.absent, summary.rate_percent
    );

    Ok(())
}
