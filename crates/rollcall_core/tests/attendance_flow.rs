use rollcall_core::db::open_db_in_memory;
use rollcall_core::{
    AttendanceError, AttendanceService, AttendanceStatus, MarkOutcome, RegisterOutcome,
    SqliteRosterRepository,
};
use rusqlite::Connection;

fn service(conn: &Connection) -> AttendanceService<SqliteRosterRepository<'_>> {
    AttendanceService::new(SqliteRosterRepository::try_new(conn).unwrap())
}

fn stored_status(conn: &Connection, key: &str) -> String {
    conn.query_row(
        "SELECT status FROM roster WHERE registration_number = ?1;",
        [key],
        |row| row.get(0),
    )
    .unwrap()
}

#[test]
fn register_then_mark_then_remark_scenario() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let outcome = service.register("Jane Doe", "REG010").unwrap();
    match outcome {
        RegisterOutcome::Registered(record) => {
            assert_eq!(record.name, "Jane Doe");
            assert_eq!(record.status, AttendanceStatus::Absent);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    assert_eq!(
        service.mark_present("REG010").unwrap(),
        MarkOutcome::Marked {
            name: "Jane Doe".to_string()
        }
    );
    assert_eq!(
        service.mark_present("REG010").unwrap(),
        MarkOutcome::AlreadyPresent {
            name: "Jane Doe".to_string()
        }
    );
    assert_eq!(service.mark_present("REG999").unwrap(), MarkOutcome::NotFound);
}

#[test]
fn repeated_marks_never_change_stored_status() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    service.register("Jane Doe", "REG010").unwrap();
    service.mark_present("REG010").unwrap();
    assert_eq!(stored_status(&conn, "REG010"), "Present");

    for _ in 0..5 {
        assert_eq!(
            service.mark_present("REG010").unwrap(),
            MarkOutcome::AlreadyPresent {
                name: "Jane Doe".to_string()
            }
        );
        assert_eq!(stored_status(&conn, "REG010"), "Present");
    }
}

#[test]
fn mark_of_unknown_key_ignores_unrelated_records() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    for (name, key) in [("A", "R1"), ("B", "R2"), ("C", "R3")] {
        service.register(name, key).unwrap();
    }

    assert_eq!(service.mark_present("R9").unwrap(), MarkOutcome::NotFound);
    // No record was touched.
    for key in ["R1", "R2", "R3"] {
        assert_eq!(stored_status(&conn, key), "Absent");
    }
}

#[test]
fn duplicate_register_returns_existing_record_and_writes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    service.register("A", "X").unwrap();
    service.mark_present("X").unwrap();

    match service.register("B", "X").unwrap() {
        RegisterOutcome::DuplicateKey(existing) => {
            assert_eq!(existing.name, "A");
            assert_eq!(existing.status, AttendanceStatus::Present);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM roster WHERE registration_number = 'X';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(count, 1);
    // The duplicate attempt did not revert the status.
    assert_eq!(stored_status(&conn, "X"), "Present");
}

#[test]
fn register_rejects_blank_inputs_before_store() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    assert!(matches!(
        service.register("   ", "REG010"),
        Err(AttendanceError::InvalidInput(_))
    ));
    assert!(matches!(
        service.register("Jane Doe", "  "),
        Err(AttendanceError::InvalidInput(_))
    ));

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM roster;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn register_trims_name_and_key() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let outcome = service.register("  Jane Doe  ", "  REG010  ").unwrap();
    match outcome {
        RegisterOutcome::Registered(record) => {
            assert_eq!(record.name, "Jane Doe");
            assert_eq!(record.registration_key, "REG010");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    // The trimmed key is the stored identity.
    match service.register("Someone Else", "REG010").unwrap() {
        RegisterOutcome::DuplicateKey(existing) => assert_eq!(existing.name, "Jane Doe"),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn process_scan_decodes_then_marks() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    service.register("Jane Doe", "REG010").unwrap();

    let outcome = service.process_scan("REG010_Jane_Doe").unwrap();
    assert_eq!(outcome.payload.key, "REG010");
    assert_eq!(
        outcome.mark,
        MarkOutcome::Marked {
            name: "Jane Doe".to_string()
        }
    );

    // Invalid payloads never reach the store.
    assert!(matches!(
        service.process_scan("_"),
        Err(AttendanceError::InvalidInput(_))
    ));
}

#[test]
fn summary_and_search_reflect_roster_state() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let empty = service.summary().unwrap();
    assert_eq!(empty.total, 0);
    assert_eq!(empty.rate_percent, 0.0);

    service.register("Jane Doe", "REG010").unwrap();
    service.register("John Roe", "REG011").unwrap();
    service.register("Ada Lovelace", "REG012").unwrap();
    service.mark_present("REG010").unwrap();

    let summary = service.summary().unwrap();
    assert_eq!(summary.total, 3);
    assert_eq!(summary.present, 1);
    assert_eq!(summary.absent, 2);
    assert!((summary.rate_percent - 100.0 / 3.0).abs() < 1e-9);

    let by_name = service.search("jane").unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].registration_key, "REG010");

    let by_key = service.search("reg01").unwrap();
    assert_eq!(by_key.len(), 3);

    let blank = service.search("   ").unwrap();
    assert_eq!(blank.len(), 3);

    assert_eq!(service.search("nobody").unwrap().len(), 0);
}
