use tempfile::tempdir;
use trello_backup::sink::LocalDirSink;
use trello_backup_core::contract::Sink;

#[tokio::test]
async fn store_writes_the_payload_and_returns_a_file_url() {
    let dir = tempdir().unwrap();
    let sink = LocalDirSink::new(dir.path().join("nested"));

    let locator = sink
        .store("trello_export_2025-01-01.csv", b"a,b\n1,2\n".to_vec())
        .await
        .expect("store succeeds");

    let written = dir.path().join("nested").join("trello_export_2025-01-01.csv");
    assert_eq!(std::fs::read(&written).unwrap(), b"a,b\n1,2\n");
    assert!(locator.starts_with("file://"));
    assert!(locator.ends_with("trello_export_2025-01-01.csv"));

    let leftovers: Vec<_> = std::fs::read_dir(dir.path().join("nested"))
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(leftovers.len(), 1, "temporary files left behind: {leftovers:?}");
}

#[tokio::test]
async fn store_overwrites_an_export_of_the_same_day() {
    let dir = tempdir().unwrap();
    let sink = LocalDirSink::new(dir.path());

    sink.store("same.csv", b"old".to_vec()).await.unwrap();
    sink.store("same.csv", b"new".to_vec()).await.unwrap();

    assert_eq!(std::fs::read(dir.path().join("same.csv")).unwrap(), b"new");
}

#[tokio::test]
async fn store_rejects_path_like_names() {
    let dir = tempdir().unwrap();
    let sink = LocalDirSink::new(dir.path());

    assert!(sink.store("../escape.csv", b"x".to_vec()).await.is_err());
    assert!(sink.store("", b"x".to_vec()).await.is_err());
}

#[tokio::test]
async fn store_reports_filesystem_failures_from_the_blocking_writer() {
    let dir = tempdir().unwrap();
    let occupied = dir.path().join("not-a-dir");
    std::fs::write(&occupied, b"file in the way").unwrap();
    let sink = LocalDirSink::new(&occupied);

    let err = sink
        .store("export.csv", b"x".to_vec())
        .await
        .expect_err("a file where the directory should be must fail");

    assert!(!err.to_string().is_empty());
    assert_eq!(std::fs::read(&occupied).unwrap(), b"file in the way");
}
