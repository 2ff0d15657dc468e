use chrono::{TimeZone, Utc};
use serde_json::json;
use std::sync::{Arc, Mutex};
use trello_backup_core::backup::{backup, run_backup, BackupOutcome};
use trello_backup_core::contract::{MockBoardSource, MockSink};
use trello_backup_core::error::{ExportError, FetchError};
use trello_backup_core::export::{export_file_name, rows_to_csv};
use trello_backup_core::row::{ExportRow, COLUMNS};

fn source_with_cards(failing_card: Option<&'static str>) -> MockBoardSource {
    let mut source = MockBoardSource::new();
    source.expect_boards().returning(|| {
        Ok(vec![serde_json::from_value(json!({
            "id": "b1", "name": "Roadmap", "url": "https://trello.com/b/b1", "shortLink": "b1"
        }))
        .unwrap()])
    });
    source.expect_board_lists().returning(|_| {
        Ok(vec![serde_json::from_value(json!({"id": "l1", "name": "Todo"})).unwrap()])
    });
    source.expect_board_custom_fields().returning(|_| Ok(vec![]));
    source.expect_board_cards().returning(|_| {
        Ok(vec![
            serde_json::from_value(json!({"id": "c1", "name": "Keep", "idList": "l1", "desc": "has, comma"}))
                .unwrap(),
            serde_json::from_value(json!({"id": "c2", "name": "Drop", "idList": "l1"})).unwrap(),
        ])
    });
    source.expect_card_labels().returning(|_| Ok(vec![]));
    source.expect_card_members().returning(|_| Ok(vec![]));
    source.expect_card_checklists().returning(|_| Ok(vec![]));
    source.expect_card_attachments().returning(|_| Ok(vec![]));
    source.expect_card_comments().returning(move |id| {
        if Some(id) == failing_card {
            Err(FetchError::Status {
                status: 500,
                path: format!("/cards/{id}/actions"),
                body: String::new(),
            })
        } else {
            Ok(vec![])
        }
    });
    source.expect_card_history().returning(|_| Ok(vec![]));
    source
        .expect_card_custom_field_items()
        .returning(|_| Ok(vec![]));
    source
}

#[test]
fn file_name_uses_the_utc_date() {
    let now = Utc.with_ymd_and_hms(2025, 3, 9, 23, 59, 0).unwrap();
    assert_eq!(export_file_name(now), "trello_export_2025-03-09.csv");
}

#[test]
fn csv_has_the_fixed_header_and_quotes_values() {
    let row = ExportRow {
        board_name: "Roadmap".into(),
        desc: "line, with comma\nand newline".into(),
        closed: "false".into(),
        ..ExportRow::default()
    };

    let csv = String::from_utf8(rows_to_csv(&[row]).unwrap()).unwrap();
    let mut reader = csv::Reader::from_reader(csv.as_bytes());

    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, COLUMNS.to_vec());

    let records: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(records.len(), 1);
    assert_eq!(&records[0][0], "Roadmap");
    assert_eq!(&records[0][9], "line, with comma\nand newline");
    assert_eq!(&records[0][16], "false");
}

#[test]
fn every_record_has_one_value_per_column() {
    let rows = vec![
        ExportRow::default(),
        ExportRow {
            card_name: "Filled".into(),
            custom_fields: "Priority=High".into(),
            ..ExportRow::default()
        },
    ];

    let csv = rows_to_csv(&rows).unwrap();
    let mut reader = csv::Reader::from_reader(csv.as_slice());

    let records: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(records.len(), 2);
    for record in &records {
        assert_eq!(record.len(), COLUMNS.len());
    }
    assert_eq!(&records[1][COLUMNS.len() - 1], "Priority=High");
}

#[test]
fn no_rows_still_yields_a_header() {
    let csv = String::from_utf8(rows_to_csv(&[]).unwrap()).unwrap();
    assert_eq!(csv.trim_end(), COLUMNS.join(","));
}

#[tokio::test]
async fn skipped_card_does_not_fail_the_backup() {
    let source = source_with_cards(Some("c2"));
    let stored = Arc::new(Mutex::new(None::<(String, Vec<u8>)>));
    let mut sink = MockSink::new();
    let captured = stored.clone();
    sink.expect_store().times(1).returning(move |name, payload| {
        *captured.lock().unwrap() = Some((name.to_string(), payload));
        Ok(format!("file:///backups/{name}"))
    });
    let now = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();

    let outcome = run_backup(&source, &sink, now).await;

    assert_eq!(
        outcome,
        BackupOutcome::succeeded("file:///backups/trello_export_2025-01-02.csv")
    );
    let (name, payload) = stored.lock().unwrap().take().expect("sink was called");
    assert_eq!(name, "trello_export_2025-01-02.csv");
    let text = String::from_utf8(payload).unwrap();
    assert!(text.contains("Keep"));
    assert!(text.contains("\"has, comma\""));
    assert!(!text.contains("Drop"));
}

#[tokio::test]
async fn receipt_counts_rows_and_skips() {
    let source = source_with_cards(Some("c1"));
    let mut sink = MockSink::new();
    sink.expect_store()
        .returning(|name, _| Ok(format!("mem://{name}")));

    let receipt = backup(&source, &sink, Utc::now()).await.unwrap();

    assert_eq!(receipt.rows, 1);
    assert_eq!(receipt.skipped.len(), 1);
    assert_eq!(receipt.skipped[0].card_name, "Keep");
    assert!(receipt.locator.starts_with("mem://trello_export_"));
}

#[tokio::test]
async fn sink_failure_is_the_run_failure() {
    let source = source_with_cards(None);
    let mut sink = MockSink::new();
    sink.expect_store()
        .returning(|_, _| Err("bucket unavailable".into()));

    let err = backup(&source, &sink, Utc::now()).await.unwrap_err();
    assert!(matches!(err, ExportError::Sink { .. }), "got {err:?}");

    let outcome = run_backup(&source_with_cards(None), &sink, Utc::now()).await;
    assert!(!outcome.success);
    assert!(outcome.locator.is_none());
    assert!(outcome.error.unwrap().contains("bucket unavailable"));
}

#[tokio::test]
async fn upstream_failure_never_reaches_the_sink() {
    let mut source = MockBoardSource::new();
    source.expect_boards().returning(|| {
        Err(FetchError::Status {
            status: 401,
            path: "/members/me/boards".into(),
            body: "invalid key".into(),
        })
    });
    let mut sink = MockSink::new();
    sink.expect_store().never();

    let outcome = run_backup(&source, &sink, Utc::now()).await;

    assert!(!outcome.success);
    assert!(outcome.error.unwrap().contains("401"));
}

#[test]
fn outcome_json_omits_absent_fields() {
    let ok = serde_json::to_value(BackupOutcome::succeeded("file:///x.csv")).unwrap();
    let failed = serde_json::to_value(BackupOutcome::failed("nope")).unwrap();

    assert_eq!(ok, json!({"success": true, "locator": "file:///x.csv"}));
    assert_eq!(failed, json!({"success": false, "error": "nope"}));
}
